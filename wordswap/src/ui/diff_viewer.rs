//! Line diff of a page before and after replacement.

use anyhow::Result;
use diffy::{create_patch, Line as DiffLine};
use owo_colors::OwoColorize;
use std::io::Write;

/// Writes the changed hunks of `original` -> `rewritten` to `writer`.
pub fn print_diff<W: Write>(
    original: &str,
    rewritten: &str,
    writer: &mut W,
    supports_color: bool,
) -> Result<()> {
    let patch = create_patch(original, rewritten);
    let mut changed = false;

    for hunk in patch.hunks() {
        changed = true;
        let header = format!(
            "@@ -{},{} +{},{} @@",
            hunk.old_range().start(),
            hunk.old_range().len(),
            hunk.new_range().start(),
            hunk.new_range().len()
        );
        if supports_color {
            writeln!(writer, "{}", header.yellow())?;
        } else {
            writeln!(writer, "{}", header)?;
        }
        for line in hunk.lines() {
            let (marker, text, tone) = match line {
                DiffLine::Delete(s) => ('-', s, Some(Tone::Removed)),
                DiffLine::Insert(s) => ('+', s, Some(Tone::Added)),
                DiffLine::Context(s) => (' ', s, None),
            };
            write_line(writer, marker, text, tone.filter(|_| supports_color))?;
        }
    }

    if !changed {
        writeln!(writer, "No changes.")?;
    }
    Ok(())
}

enum Tone {
    Added,
    Removed,
}

fn write_line<W: Write>(
    writer: &mut W,
    marker: char,
    text: &str,
    tone: Option<Tone>,
) -> Result<()> {
    let text = text.strip_suffix('\n').unwrap_or(text);
    let line = format!("{}{}", marker, text);
    match tone {
        Some(Tone::Added) => writeln!(writer, "{}", line.green())?,
        Some(Tone::Removed) => writeln!(writer, "{}", line.red())?,
        None => writeln!(writer, "{}", line)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shows_removed_and_added_lines() {
        let mut buf = Vec::new();
        let before = "<p>cat</p>\n<p>same</p>\n";
        let after = "<p>dog</p>\n<p>same</p>\n";
        print_diff(before, after, &mut buf, false).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("-<p>cat</p>"));
        assert!(out.contains("+<p>dog</p>"));
        assert!(out.contains(" <p>same</p>"));
    }

    #[test]
    fn identical_input_reports_no_changes() {
        let mut buf = Vec::new();
        print_diff("a\n", "a\n", &mut buf, false).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "No changes.\n");
    }
}
