// wordswap/tests/cli_integration_tests.rs
//! Command-line integration tests for the `wordswap` binary.
//!
//! Each test gets its own temporary store via `WORDSWAP_STORE`, so nothing
//! touches the real configuration directory. Output is captured from pipes,
//! which keeps it free of colour codes.

use anyhow::Result;
#[allow(unused_imports)]
use assert_cmd::prelude::*;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn wordswap(store: &Path) -> Command {
    let mut cmd = Command::cargo_bin("wordswap").unwrap();
    cmd.env("WORDSWAP_STORE", store);
    cmd.env_remove("WORDSWAP_BUDGET_MS");
    cmd.env("RUST_LOG", "debug");
    cmd
}

fn store_in(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("store.json")
}

fn add_rule(store: &Path, args: &[&str]) {
    wordswap(store).arg("rules").arg("add").args(args).assert().success();
}

#[test]
fn apply_replaces_words_but_not_scripts() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = store_in(&dir);
    add_rule(&store, &["cat", "dog"]);

    wordswap(&store)
        .args(["apply", "--no-summary"])
        .write_stdin("<p>The cat sat. Concatenate!</p><script>var cat = 1;</script>")
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>The dog sat. Concatenate!</p>"))
        .stdout(predicate::str::contains("<script>var cat = 1;</script>"));
    Ok(())
}

#[test]
fn apply_respects_case_sensitive_rules() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = store_in(&dir);
    add_rule(&store, &["NASA", "the agency", "--case-sensitive"]);

    wordswap(&store)
        .args(["apply", "-q"])
        .write_stdin("<p>NASA and nasa</p>")
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>the agency and nasa</p>"));
    Ok(())
}

#[test]
fn apply_leaves_editable_regions_alone() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = store_in(&dir);
    add_rule(&store, &["cat", "dog"]);

    wordswap(&store)
        .args(["apply", "-q"])
        .write_stdin(
            "<div contenteditable=\"true\">cat</div><textarea>cat</textarea><p>cat</p>",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("<div contenteditable=\"true\">cat</div>"))
        .stdout(predicate::str::contains("<textarea>cat</textarea>"))
        .stdout(predicate::str::contains("<p>dog</p>"));
    Ok(())
}

#[test]
fn apply_writes_summary_and_output_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = store_in(&dir);
    add_rule(&store, &["colour", "color"]);
    let input = dir.path().join("page.html");
    let output = dir.path().join("out.html");
    fs::write(&input, "<p>colour</p><p>Colour</p><p>plain</p>")?;

    wordswap(&store)
        .args(["apply", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("2 replacement(s) in 2 of 3 text node(s)."));

    let html = fs::read_to_string(&output)?;
    assert!(html.contains("<p>color</p><p>color</p><p>plain</p>"));
    Ok(())
}

#[test]
fn apply_diff_shows_changed_lines() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = store_in(&dir);
    add_rule(&store, &["cat", "dog"]);

    wordswap(&store)
        .args(["apply", "--diff", "-q"])
        .write_stdin("<p>first line</p>\n<p>a cat</p>\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("-<p>a cat</p>"))
        .stdout(predicate::str::contains("+<p>a dog</p>"));
    Ok(())
}

#[test]
fn master_switch_off_leaves_page_unchanged() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = store_in(&dir);
    add_rule(&store, &["cat", "dog"]);
    wordswap(&store).args(["switch", "off"]).assert().success();

    wordswap(&store)
        .args(["switch"])
        .assert()
        .success()
        .stdout("off\n");

    wordswap(&store)
        .args(["apply", "--no-summary"])
        .write_stdin("<p>cat</p>")
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>cat</p>"))
        .stderr(predicate::str::contains("master switch is off"));

    wordswap(&store).args(["switch", "on"]).assert().success();
    wordswap(&store)
        .args(["apply", "-q"])
        .write_stdin("<p>cat</p>")
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>dog</p>"));
    Ok(())
}

#[test]
fn apply_with_rules_file_bypasses_store() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = store_in(&dir);
    let rules = dir.path().join("rules.json");
    fs::write(
        &rules,
        r#"{"superman": {"replacement": "Y"}, "super": {"replacement": "X"}}"#,
    )?;

    wordswap(&store)
        .args(["apply", "-q", "--rules"])
        .arg(&rules)
        .write_stdin("<p>superman and super</p>")
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>Y and X</p>"));
    assert!(!store.exists());
    Ok(())
}

#[test]
fn rules_list_search_and_json() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = store_in(&dir);
    add_rule(&store, &["cat", "dog"]);
    add_rule(&store, &["Sun", "Moon", "--case-sensitive", "--disabled"]);

    wordswap(&store)
        .args(["rules", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sun -> Moon  [case-sensitive]  [disabled]"))
        .stdout(predicate::str::contains("cat -> dog"));

    wordswap(&store)
        .args(["rules", "list", "--search", "MOON"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sun -> Moon"))
        .stdout(predicate::str::contains("cat").not());

    let out = wordswap(&store).args(["rules", "list", "--json"]).output()?;
    let rows: serde_json::Value = serde_json::from_slice(&out.stdout)?;
    assert_eq!(rows.as_array().map(Vec::len), Some(2));
    assert_eq!(rows[0]["key"], "Sun");
    assert_eq!(rows[0]["caseSensitive"], true);
    Ok(())
}

#[test]
fn duplicate_and_case_only_renames_are_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = store_in(&dir);
    add_rule(&store, &["cat", "dog"]);

    wordswap(&store)
        .args(["rules", "add", "cat", "lion"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: "))
        .stderr(predicate::str::contains("already exists"));

    wordswap(&store)
        .args(["rules", "rename", "cat", "Cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("differing only by letter case"));
    Ok(())
}

#[test]
fn export_then_import_into_another_store() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    let export = dir.path().join("export.json");
    add_rule(&first, &["cat", "dog"]);
    add_rule(&first, &["a+b", "sum"]);

    wordswap(&first)
        .args(["rules", "export", "-o"])
        .arg(&export)
        .assert()
        .success();

    add_rule(&second, &["cat", "mouse"]);
    wordswap(&second)
        .args(["rules", "import"])
        .arg(&export)
        .assert()
        .success()
        .stderr(predicate::str::contains("Imported 2 rule(s); 1 existing rule(s) replaced."));

    wordswap(&second)
        .args(["apply", "-q"])
        .write_stdin("<p>cat and a+b</p>")
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>dog and sum</p>"));
    Ok(())
}

#[test]
fn malformed_store_is_reported_by_editors() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = store_in(&dir);
    fs::write(&store, r#"{"ruleSet": "not a map"}"#)?;

    wordswap(&store)
        .args(["rules", "add", "cat", "dog"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(format!(
            "Error: The rule set in {} is malformed",
            store.display()
        )));

    // The engine treats it as "no rules" instead of failing.
    wordswap(&store)
        .args(["apply", "--no-summary"])
        .write_stdin("<p>cat</p>")
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>cat</p>"));
    Ok(())
}
