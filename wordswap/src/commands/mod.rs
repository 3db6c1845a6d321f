//! Subcommand implementations and the stderr message helpers they share.

pub mod apply;
pub mod rules;
pub mod switch;

use is_terminal::IsTerminal;
use std::io;

use crate::ui::output_format;

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_info_message(
        &mut io::stderr(),
        msg.as_ref(),
        stderr_supports_color,
    );
}

/// Helper for printing success messages to stderr.
pub fn success_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_success_message(
        &mut io::stderr(),
        msg.as_ref(),
        stderr_supports_color,
    );
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_warn_message(
        &mut io::stderr(),
        msg.as_ref(),
        stderr_supports_color,
    );
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_error_message(
        &mut io::stderr(),
        msg.as_ref(),
        stderr_supports_color,
    );
}
