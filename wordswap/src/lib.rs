// wordswap/src/lib.rs
//! # Wordswap CLI Application
//!
//! Command-line front end for `wordswap-core`: applies the stored word and
//! phrase rules to HTML pages and edits the rule store.

pub mod cli;
pub mod commands;
pub mod html;
pub mod logger;
pub mod ui;
pub mod utils;
