//! This file defines the command-line interface (CLI) for the wordswap application,
//! including all available commands and their arguments.
//! License: MIT OR Apache-2.0

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "wordswap",
    version = env!("CARGO_PKG_VERSION"),
    about = "Replace words and phrases in HTML pages using a rule store",
    long_about = "Wordswap applies literal word and phrase substitution rules to the text of \
                  HTML pages. Scripts, styles, form fields and editable regions are never \
                  touched. Rules live in a JSON store that the `rules` and `switch` commands \
                  edit.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Suppress informational messages and logging.
    #[arg(
        long,
        short = 'q',
        global = true,
        help = "Suppress all informational and debug messages."
    )]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG).
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// Path to the rule store (JSON).
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        env = "WORDSWAP_STORE",
        help = "Path to the rule store file."
    )]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Applies the stored rules to an HTML document.
    #[command(about = "Apply the stored rules to an HTML document.")]
    Apply(ApplyCommand),

    /// Manages the substitution rules.
    #[command(subcommand, about = "Add, edit, remove, search, export and import rules.")]
    Rules(RulesCommand),

    /// Shows or sets the master switch.
    #[command(about = "Show or set the master switch.")]
    Switch {
        #[arg(value_enum, default_value = "status")]
        state: SwitchState,
    },
}

/// Arguments for the `apply` command.
#[derive(Parser, Debug)]
pub struct ApplyCommand {
    /// Path to an input HTML file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read HTML from a file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Write the rewritten HTML to this file instead of stdout.
    #[arg(
        long,
        short = 'o',
        value_name = "FILE",
        help = "Write output to a file instead of stdout."
    )]
    pub output: Option<PathBuf>,

    /// Show a unified diff of the page before and after.
    #[arg(long, short = 'D', help = "Show a unified diff instead of the rewritten page.")]
    pub diff: bool,

    /// Per-text-node time budget in milliseconds.
    #[arg(
        long = "budget-ms",
        value_name = "MS",
        env = "WORDSWAP_BUDGET_MS",
        help = "Per-text-node time budget in milliseconds."
    )]
    pub budget_ms: Option<u64>,

    /// Apply the rules in this JSON export instead of the store.
    #[arg(
        long = "rules",
        value_name = "FILE",
        help = "Apply rules from a JSON export, ignoring the store."
    )]
    pub rules_file: Option<PathBuf>,

    /// Engine settings file (YAML or JSON).
    #[arg(long = "settings", value_name = "FILE", help = "Engine settings file (YAML or JSON).")]
    pub settings: Option<PathBuf>,

    /// Suppress the replacement summary.
    #[arg(long = "no-summary", help = "Suppress the replacement summary.")]
    pub no_summary: bool,
}

#[derive(Subcommand, Debug)]
pub enum RulesCommand {
    /// Lists rules, optionally filtered.
    List {
        #[arg(
            long,
            short = 's',
            value_name = "QUERY",
            help = "Only show rules whose text contains QUERY (any case)."
        )]
        search: Option<String>,
        #[arg(long, help = "Print the rules as JSON.")]
        json: bool,
    },
    /// Adds a rule.
    Add {
        key: String,
        replacement: String,
        #[arg(long, short = 'c', help = "Match the original text with exact letter case.")]
        case_sensitive: bool,
        #[arg(long, help = "Add the rule switched off.")]
        disabled: bool,
    },
    /// Changes the replacement text or case flag of a rule.
    Edit {
        key: String,
        replacement: String,
        #[arg(long, short = 'c', help = "Match the original text with exact letter case.")]
        case_sensitive: bool,
    },
    /// Removes a rule.
    Remove { key: String },
    /// Changes a rule's original text.
    Rename { old_key: String, new_key: String },
    /// Switches a rule on.
    Enable { key: String },
    /// Switches a rule off.
    Disable { key: String },
    /// Writes all rules as JSON.
    Export {
        #[arg(long, short = 'o', value_name = "FILE", help = "Write to a file instead of stdout.")]
        output: Option<PathBuf>,
    },
    /// Merges rules from a JSON export. Imported rules replace existing ones with the same key.
    Import { file: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SwitchState {
    On,
    Off,
    Status,
}
