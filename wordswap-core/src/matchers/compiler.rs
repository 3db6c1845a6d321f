//! compiler.rs - Turns a rule snapshot into combined matchers and lookup tables.
//!
//! Every enabled key becomes a literal fragment. Fragments are grouped by case
//! sensitivity and joined into one alternation per group, longest key first,
//! because an alternation commits to the first alternative that matches at a
//! position: with "super" ahead of "superman", "superman" could never win.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

use crate::config::MAX_COMPILED_SIZE;
use crate::errors::{Result, WordswapError};
use crate::rules::RuleSet;

/// ASCII-only word boundary. A Unicode `\b` keeps the regex crate off its
/// DFA engines as soon as the haystack holds a non-ASCII byte.
const WORD_BOUNDARY: &str = r"(?-u:\b)";

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Everything derived from one rule snapshot. Holds no history: two
/// compilations of the same snapshot are interchangeable.
#[derive(Debug)]
pub struct CompiledMatcherState {
    /// Exact key to replacement, all enabled rules.
    pub(crate) active_rules: HashMap<String, String>,
    /// Lowercased key to replacement, enabled case-insensitive rules only.
    pub(crate) lower_key_index: HashMap<String, String>,
    pub(crate) sensitive_pattern: Option<Regex>,
    pub(crate) insensitive_pattern: Option<Regex>,
}

impl CompiledMatcherState {
    /// True when at least one combined matcher exists.
    pub fn has_matchers(&self) -> bool {
        self.sensitive_pattern.is_some() || self.insensitive_pattern.is_some()
    }

    pub fn sensitive_pattern(&self) -> Option<&Regex> {
        self.sensitive_pattern.as_ref()
    }

    pub fn insensitive_pattern(&self) -> Option<&Regex> {
        self.insensitive_pattern.as_ref()
    }

    /// Number of enabled rules this state was built from.
    pub fn active_rule_count(&self) -> usize {
        self.active_rules.len()
    }
}

/// Builds the literal-match fragment for one key.
///
/// A word-boundary assertion is added on each side where the key has a word
/// character at that edge, so "cat" does not fire inside "catch" while "cat."
/// still matches right before whatever follows the period.
///
/// Word characters are ASCII letters, digits and `_`. Accented letters and
/// typographic punctuation count as non-word characters on both sides of
/// the assertion.
pub fn literal_fragment(key: &str) -> String {
    let mut fragment = String::with_capacity(key.len() + 2 * WORD_BOUNDARY.len());
    if key.chars().next().is_some_and(is_word_char) {
        fragment.push_str(WORD_BOUNDARY);
    }
    fragment.push_str(&regex::escape(key));
    if key.chars().next_back().is_some_and(is_word_char) {
        fragment.push_str(WORD_BOUNDARY);
    }
    fragment
}

fn build_alternation(
    mut keys: Vec<&str>,
    case_insensitive: bool,
    label: &'static str,
) -> Result<Option<Regex>> {
    if keys.is_empty() {
        return Ok(None);
    }
    keys.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));
    let pattern = keys
        .iter()
        .map(|k| literal_fragment(k))
        .collect::<Vec<_>>()
        .join("|");

    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(case_insensitive)
        .size_limit(MAX_COMPILED_SIZE)
        .build()
        .map_err(|e| WordswapError::MatcherCompilationError(label, e))?;

    log::debug!(
        target: "wordswap_core::compiler",
        "Compiled {} matcher over {} key(s).",
        label,
        keys.len()
    );
    Ok(Some(regex))
}

/// Compiles the enabled rules of `rule_set` into a [`CompiledMatcherState`].
pub fn compile(rule_set: &RuleSet) -> Result<CompiledMatcherState> {
    debug!("Starting compilation of {} rules.", rule_set.len());

    let mut active_rules = HashMap::new();
    let mut lower_key_index = HashMap::new();
    let mut sensitive_keys = Vec::new();
    let mut insensitive_keys = Vec::new();

    for (key, rule) in rule_set.enabled_rules() {
        if key.is_empty() {
            warn!("Skipping a rule with an empty key.");
            continue;
        }
        active_rules.insert(key.to_string(), rule.replacement.clone());
        if rule.case_sensitive {
            sensitive_keys.push(key);
        } else {
            lower_key_index.insert(key.to_lowercase(), rule.replacement.clone());
            insensitive_keys.push(key);
        }
    }

    let sensitive_pattern = build_alternation(sensitive_keys, false, "case-sensitive")?;
    let insensitive_pattern = build_alternation(insensitive_keys, true, "case-insensitive")?;

    debug!(
        "Finished compiling rules. Active: {}, case-insensitive index: {}.",
        active_rules.len(),
        lower_key_index.len()
    );
    Ok(CompiledMatcherState {
        active_rules,
        lower_key_index,
        sensitive_pattern,
        insensitive_pattern,
    })
}
