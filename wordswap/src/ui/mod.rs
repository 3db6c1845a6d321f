//! Terminal output for the wordswap CLI.

pub mod diff_viewer;
pub mod output_format;
pub mod scan_summary;
