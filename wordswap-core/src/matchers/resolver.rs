//! Maps a matched span back to its replacement text.

use log::debug;

use super::compiler::CompiledMatcherState;
use crate::diagnostics::loggable;

impl CompiledMatcherState {
    /// Replacement for a span one of the combined matchers found.
    ///
    /// Tries the exact key first, which covers case-sensitive rules and
    /// exact-case hits of insensitive ones, then the lowercased key for
    /// insensitive rules matched with different casing. A span found in
    /// neither table is returned unchanged.
    pub fn resolve<'a>(&'a self, matched: &'a str) -> &'a str {
        if let Some(replacement) = self.active_rules.get(matched) {
            return replacement;
        }
        if let Some(replacement) = self.lower_key_index.get(&matched.to_lowercase()) {
            return replacement;
        }
        debug!("No rule resolves matched span {}; leaving it unchanged.", loggable(matched));
        matched
    }
}
