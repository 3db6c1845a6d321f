// File: wordswap-core/src/headless.rs

//! `headless.rs`
//! Convenience wrapper for one-shot replacement over a document, with no
//! store, no change stream and no mutation observer.

use anyhow::{Context, Result};

use crate::config::EngineSettings;
use crate::dom::Document;
use crate::engine::EngineState;
use crate::engines::{scan_whole_document, ScanReport};
use crate::rules::RuleSet;

/// Applies `rule_set` to every eligible text node of `document`.
///
/// Unlike the coordinator, which degrades to doing nothing, this surfaces
/// compile errors to the caller.
pub fn headless_apply(
    rule_set: &RuleSet,
    settings: &EngineSettings,
    document: &mut Document,
) -> Result<ScanReport> {
    let state = EngineState::from_rules(rule_set, settings)
        .context("Failed to compile rules for headless replacement")?;
    Ok(scan_whole_document(document, &state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DomSurface;
    use crate::rules::Rule;

    #[test]
    fn test_headless_apply() -> Result<()> {
        let mut rules = RuleSet::new();
        rules.add("colour", Rule::new("color"))?;
        rules.add("NASA", Rule::new("the agency").case_sensitive(true))?;

        let mut doc = Document::with_body();
        let body = doc.body().unwrap();
        let p = doc.append_element(body, "p");
        doc.append_text(p, "Colour photos from NASA and nasa.");

        let report = headless_apply(&rules, &EngineSettings::default(), &mut doc)?;
        assert_eq!(report.replacements, 2);
        assert_eq!(doc.text_content(body), "color photos from the agency and nasa.");
        Ok(())
    }
}
