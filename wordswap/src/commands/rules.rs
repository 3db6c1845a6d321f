//! The `rules` command family: edits the rule set held in the store.
//!
//! Every editing subcommand loads the store, changes the rule set through the
//! validating `RuleSet` editors and persists the result in one step.

use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use wordswap_core::{FileStore, Rule, RuleSet};

use super::{info_msg, success_msg};
use crate::cli::RulesCommand;

/// One row of `rules list --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RuleRow<'a> {
    key: &'a str,
    replacement: &'a str,
    case_sensitive: bool,
    enabled: bool,
}

pub async fn run_rules(cmd: RulesCommand, store_path: &Path, quiet: bool) -> Result<()> {
    let store = FileStore::open(store_path)
        .await
        .with_context(|| format!("Failed to open rule store {}", store_path.display()))?;
    let mut rules = store.store().rule_set().await.with_context(|| {
        format!(
            "The rule set in {} is malformed; fix or remove the store file",
            store.path().display()
        )
    })?;

    let message = match cmd {
        RulesCommand::List { search, json } => {
            let rows = match &search {
                Some(query) => rules.search(query),
                None => rules.iter().collect(),
            };
            let mut stdout = io::stdout().lock();
            if json {
                let rows: Vec<RuleRow> = rows
                    .iter()
                    .map(|(key, rule)| RuleRow {
                        key: *key,
                        replacement: &rule.replacement,
                        case_sensitive: rule.case_sensitive,
                        enabled: rule.enabled,
                    })
                    .collect();
                writeln!(stdout, "{}", serde_json::to_string_pretty(&rows)?)?;
            } else {
                for (key, rule) in &rows {
                    writeln!(stdout, "{}", format_rule(key, rule))?;
                }
            }
            if !quiet && rows.is_empty() {
                info_msg("No rules found.");
            }
            return Ok(());
        }
        RulesCommand::Export { output } => {
            let json = rules.export_json()?;
            match output {
                Some(path) => {
                    fs::write(&path, format!("{}\n", json))
                        .with_context(|| format!("Failed to write export to {}", path.display()))?;
                    if !quiet {
                        success_msg(format!(
                            "Exported {} rule(s) to {}.",
                            rules.len(),
                            path.display()
                        ));
                    }
                }
                None => writeln!(io::stdout().lock(), "{}", json)?,
            }
            return Ok(());
        }
        RulesCommand::Add {
            key,
            replacement,
            case_sensitive,
            disabled,
        } => {
            let rule = Rule::new(replacement)
                .case_sensitive(case_sensitive)
                .enabled(!disabled);
            rules.add(key.clone(), rule)?;
            format!("Added rule '{}'.", key)
        }
        RulesCommand::Edit {
            key,
            replacement,
            case_sensitive,
        } => {
            rules.update(&key, replacement, case_sensitive)?;
            format!("Updated rule '{}'.", key)
        }
        RulesCommand::Remove { key } => {
            rules.remove(&key)?;
            format!("Removed rule '{}'.", key)
        }
        RulesCommand::Rename { old_key, new_key } => {
            rules.rename(&old_key, new_key.clone())?;
            format!("Renamed rule '{}' to '{}'.", old_key, new_key)
        }
        RulesCommand::Enable { key } => {
            rules.set_enabled(&key, true)?;
            format!("Enabled rule '{}'.", key)
        }
        RulesCommand::Disable { key } => {
            rules.set_enabled(&key, false)?;
            format!("Disabled rule '{}'.", key)
        }
        RulesCommand::Import { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read import file {}", file.display()))?;
            let incoming = RuleSet::from_json(&text)
                .with_context(|| format!("Invalid import file {}", file.display()))?;
            let count = incoming.len();
            let overridden = rules.merge_import(incoming)?;
            format!(
                "Imported {} rule(s); {} existing rule(s) replaced.",
                count, overridden
            )
        }
    };

    store.store().save_rule_set(&rules).await?;
    store.persist().await?;
    debug!(
        "Store {} now holds {} rule(s).",
        store.path().display(),
        rules.len()
    );
    if !quiet {
        success_msg(message);
    }
    Ok(())
}

fn format_rule(key: &str, rule: &Rule) -> String {
    let mut line = format!("{} -> {}", key, rule.replacement);
    if rule.case_sensitive {
        line.push_str("  [case-sensitive]");
    }
    if !rule.enabled {
        line.push_str("  [disabled]");
    }
    line
}
