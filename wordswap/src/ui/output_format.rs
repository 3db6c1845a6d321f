//! Status messages written to stderr, coloured only when the stream is a terminal.

use owo_colors::OwoColorize;
use std::io::{self, Write};

pub fn print_info_message<W: Write>(
    writer: &mut W,
    msg: &str,
    supports_color: bool,
) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "{}", msg.cyan())
    } else {
        writeln!(writer, "{}", msg)
    }
}

pub fn print_success_message<W: Write>(
    writer: &mut W,
    msg: &str,
    supports_color: bool,
) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "{}", msg.green())
    } else {
        writeln!(writer, "{}", msg)
    }
}

pub fn print_warn_message<W: Write>(
    writer: &mut W,
    msg: &str,
    supports_color: bool,
) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "{} {}", "Warning:".yellow().bold(), msg.yellow())
    } else {
        writeln!(writer, "Warning: {}", msg)
    }
}

pub fn print_error_message<W: Write>(
    writer: &mut W,
    msg: &str,
    supports_color: bool,
) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "{} {}", "Error:".red().bold(), msg.red())
    } else {
        writeln!(writer, "Error: {}", msg)
    }
}
