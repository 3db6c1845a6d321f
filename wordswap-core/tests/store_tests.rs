// wordswap-core/tests/store_tests.rs
//! File-backed store behavior: persistence, strict editor reads and the
//! lenient engine view of the same data.

use serde_json::json;
use wordswap_core::{FileStore, Rule, RuleSet, RuleStore, WordswapError, MAX_RULES};

#[tokio::test]
async fn persist_and_reopen_round_trips_rules_and_switch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profiles").join("store.json");

    let store = FileStore::open(&path).await.unwrap();
    let mut rules = RuleSet::new();
    rules.add("colour", Rule::new("color")).unwrap();
    rules.add("NASA", Rule::new("the agency").case_sensitive(true).enabled(false)).unwrap();
    store.store().save_rule_set(&rules).await.unwrap();
    store.store().set_enabled(false).await.unwrap();
    store.persist().await.unwrap();

    let reopened = FileStore::open(&path).await.unwrap();
    let snapshot = reopened.load_snapshot().await.unwrap();
    assert_eq!(snapshot.rule_set, rules);
    assert!(!snapshot.enabled);
    assert!(!path.with_extension("json.tmp").exists());
}

#[tokio::test]
async fn empty_file_is_an_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "  \n").unwrap();

    let snapshot = FileStore::open(&path).await.unwrap().load_snapshot().await.unwrap();
    assert!(snapshot.rule_set.is_empty());
    assert!(snapshot.enabled);
}

#[tokio::test]
async fn unparseable_file_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = FileStore::open(&path).await.unwrap_err();
    assert!(matches!(err, WordswapError::SerializationError(_, _)));
}

#[tokio::test]
async fn malformed_rule_set_is_strict_for_editors_and_lenient_for_the_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let contents = json!({"ruleSet": [1, 2, 3], "extensionEnabled": "yes"});
    std::fs::write(&path, contents.to_string()).unwrap();

    let store = FileStore::open(&path).await.unwrap();
    assert!(store.store().rule_set().await.is_err());

    let snapshot = store.load_snapshot().await.unwrap();
    assert!(snapshot.rule_set.is_empty());
    assert!(snapshot.enabled);
}

#[tokio::test]
async fn oversized_rule_sets_are_not_saved() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path().join("store.json")).await.unwrap();
    let oversized: RuleSet = (0..=MAX_RULES)
        .map(|i| (format!("word{}", i), Rule::new("x")))
        .collect();

    let err = store.store().save_rule_set(&oversized).await.unwrap_err();
    assert!(matches!(err, WordswapError::RuleLimitExceeded(n, MAX_RULES) if n == MAX_RULES + 1));
    assert!(store.store().rule_set().await.unwrap().is_empty());
}
