//! Rule definitions and the editing operations the settings surface relies on.
//!
//! A [`RuleSet`] is always treated as a full snapshot: the engine never diffs
//! individual rules, it recompiles from whatever snapshot it is handed. The
//! validating editors (`add`, `rename`, ...) live here so every writer of the
//! store enforces the same key invariants before the engine sees them.
//!
//! License: MIT OR Apache-2.0

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::MAX_RULES;
use crate::errors::{Result, WordswapError};

/// A single literal substitution. The original text is the key it is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Text written in place of every match. May be empty.
    #[serde(default)]
    pub replacement: String,
    /// When false, the key matches regardless of letter case.
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Rule {
    pub fn new(replacement: impl Into<String>) -> Self {
        Self {
            replacement: replacement.into(),
            case_sensitive: false,
            enabled: true,
        }
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Mapping from original text to its [`Rule`].
///
/// Backed by a `BTreeMap` so iteration order, and therefore compilation, is
/// deterministic for a given snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: BTreeMap<String, Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.rules.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(k, r)| (k.as_str(), r))
    }

    /// Rules with `enabled == true`, in key order.
    pub fn enabled_rules(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.iter().filter(|(_, r)| r.enabled)
    }

    /// Adds a new rule. Fails on an empty or already-present key.
    pub fn add(&mut self, key: impl Into<String>, rule: Rule) -> Result<()> {
        let key = key.into();
        if key.is_empty() {
            return Err(WordswapError::EmptyKey);
        }
        if self.rules.contains_key(&key) {
            return Err(WordswapError::DuplicateKey(key));
        }
        if self.rules.len() >= MAX_RULES {
            return Err(WordswapError::RuleLimitExceeded(self.rules.len() + 1, MAX_RULES));
        }
        debug!(
            "Adding rule ({} chars, case_sensitive={}).",
            key.chars().count(),
            rule.case_sensitive
        );
        self.rules.insert(key, rule);
        Ok(())
    }

    /// Replaces the replacement text and case flag of an existing rule.
    pub fn update(
        &mut self,
        key: &str,
        replacement: impl Into<String>,
        case_sensitive: bool,
    ) -> Result<()> {
        let rule = self
            .rules
            .get_mut(key)
            .ok_or_else(|| WordswapError::UnknownKey(key.to_string()))?;
        rule.replacement = replacement.into();
        rule.case_sensitive = case_sensitive;
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Result<Rule> {
        self.rules
            .remove(key)
            .ok_or_else(|| WordswapError::UnknownKey(key.to_string()))
    }

    pub fn set_enabled(&mut self, key: &str, enabled: bool) -> Result<()> {
        let rule = self
            .rules
            .get_mut(key)
            .ok_or_else(|| WordswapError::UnknownKey(key.to_string()))?;
        rule.enabled = enabled;
        Ok(())
    }

    /// Moves a rule to a new key.
    ///
    /// A target that differs from the source only by letter case is rejected:
    /// under case-insensitive matching both spellings would name the same rule.
    pub fn rename(&mut self, old_key: &str, new_key: impl Into<String>) -> Result<()> {
        let new_key = new_key.into();
        if new_key.is_empty() {
            return Err(WordswapError::EmptyKey);
        }
        if !self.rules.contains_key(old_key) {
            return Err(WordswapError::UnknownKey(old_key.to_string()));
        }
        if new_key == old_key {
            return Ok(());
        }
        if new_key.to_lowercase() == old_key.to_lowercase() {
            return Err(WordswapError::CaseOnlyRename(old_key.to_string(), new_key));
        }
        if self.rules.contains_key(&new_key) {
            return Err(WordswapError::DuplicateKey(new_key));
        }
        if let Some(rule) = self.rules.remove(old_key) {
            self.rules.insert(new_key, rule);
        }
        Ok(())
    }

    /// Rules whose key or replacement contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<(&str, &Rule)> {
        let needle = query.to_lowercase();
        self.iter()
            .filter(|(key, rule)| {
                needle.is_empty()
                    || key.to_lowercase().contains(&needle)
                    || rule.replacement.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Merges an imported rule set into this one. Incoming rules win on key collisions.
    pub fn merge_import(&mut self, incoming: RuleSet) -> Result<usize> {
        incoming.validate()?;
        let mut merged = self.rules.clone();
        let mut overridden = 0;
        for (key, rule) in incoming.rules {
            if merged.insert(key, rule).is_some() {
                overridden += 1;
            }
        }
        if merged.len() > MAX_RULES {
            return Err(WordswapError::RuleLimitExceeded(merged.len(), MAX_RULES));
        }
        if overridden > 0 {
            warn!("Import replaced {} existing rule(s).", overridden);
        }
        debug!("Rule count after import: {}", merged.len());
        self.rules = merged;
        Ok(overridden)
    }

    /// Checks the invariants an imported or loaded snapshot must satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.rules.contains_key("") {
            return Err(WordswapError::EmptyKey);
        }
        if self.rules.len() > MAX_RULES {
            return Err(WordswapError::RuleLimitExceeded(self.rules.len(), MAX_RULES));
        }
        Ok(())
    }

    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| WordswapError::SerializationError("ruleSet".to_string(), e))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let set: RuleSet = serde_json::from_str(text)
            .map_err(|e| WordswapError::SerializationError("ruleSet".to_string(), e))?;
        set.validate()?;
        Ok(set)
    }
}

impl FromIterator<(String, Rule)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (String, Rule)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}
