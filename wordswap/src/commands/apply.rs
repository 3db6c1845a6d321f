//! The `apply` command: rewrites an HTML page with the stored rules.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use wordswap_core::{
    headless_apply, ChangeCoordinator, EngineSettings, FileStore, RuleSet, RuleStore, ScanReport,
};

use super::{info_msg, warn_msg};
use crate::cli::ApplyCommand;
use crate::html::parse_document;
use crate::ui::{diff_viewer, scan_summary};

/// Options for one `apply` run, resolved from the command line.
pub struct ApplyOptions {
    pub input: String,
    pub output_path: Option<PathBuf>,
    pub diff: bool,
    pub no_summary: bool,
    pub quiet: bool,
    pub settings: EngineSettings,
    /// Rules to apply instead of the store's. The master switch is ignored.
    pub rules_override: Option<RuleSet>,
}

impl ApplyOptions {
    pub fn from_command(cmd: &ApplyCommand, quiet: bool) -> Result<Self> {
        let input = read_input(cmd.input_file.as_deref())?;

        let mut settings = match &cmd.settings {
            Some(path) => EngineSettings::load_from_file(path).with_context(|| {
                format!("Failed to load engine settings from {}", path.display())
            })?,
            None => EngineSettings::default(),
        };
        if let Some(ms) = cmd.budget_ms {
            settings.time_budget_ms = ms;
        }

        let rules_override = match &cmd.rules_file {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read rules file {}", path.display()))?;
                let rules = RuleSet::from_json(&text)
                    .with_context(|| format!("Invalid rules file {}", path.display()))?;
                Some(rules)
            }
            None => None,
        };

        Ok(Self {
            input,
            output_path: cmd.output.clone(),
            diff: cmd.diff,
            no_summary: cmd.no_summary,
            quiet,
            settings,
            rules_override,
        })
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            debug!("Reading input from file: {}", path.display());
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file {}", path.display()))
        }
        None => {
            debug!("Reading input from stdin.");
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

/// Parses the page, runs the engine over it once and writes the result.
pub async fn run_apply(opts: ApplyOptions, store_path: &Path) -> Result<ScanReport> {
    info!("Starting apply operation.");
    let mut doc = parse_document(&opts.input);
    let before = doc.to_html();

    let report = match &opts.rules_override {
        Some(rules) => headless_apply(rules, &opts.settings, &mut doc)?,
        None => {
            let store = FileStore::open(store_path)
                .await
                .with_context(|| format!("Failed to open rule store {}", store_path.display()))?;
            let snapshot = store.load_snapshot().await?;
            if !snapshot.enabled && !opts.quiet {
                warn_msg("The master switch is off; the page is left unchanged.");
            }
            if snapshot.rule_set.is_empty() && !opts.quiet {
                warn_msg("The rule store has no rules.");
            }
            let mut coordinator = ChangeCoordinator::new(&opts.settings);
            coordinator.start(&mut doc, snapshot)
        }
    };

    let after = doc.to_html();
    debug!(
        "Serialized page: {} bytes before, {} bytes after.",
        before.len(),
        after.len()
    );
    write_output(&opts, &before, &after)?;

    if !opts.no_summary && !opts.quiet {
        let stderr_supports_color = io::stderr().is_terminal();
        scan_summary::print_summary(&report, &mut io::stderr(), stderr_supports_color)?;
    }
    info!("Apply operation completed.");
    Ok(report)
}

fn write_output(opts: &ApplyOptions, before: &str, after: &str) -> Result<()> {
    if let Some(path) = &opts.output_path {
        if !opts.quiet {
            info_msg(format!("Writing output to file: {}", path.display()));
        }
        let mut file = fs::File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        if opts.diff {
            diff_viewer::print_diff(before, after, &mut file, false)?;
        } else {
            writeln!(file, "{}", after)?;
        }
    } else {
        let stdout = io::stdout();
        let supports_color = stdout.is_terminal();
        let mut writer = stdout.lock();
        if opts.diff {
            diff_viewer::print_diff(before, after, &mut writer, supports_color)?;
        } else {
            writeln!(writer, "{}", after)?;
        }
    }
    Ok(())
}
