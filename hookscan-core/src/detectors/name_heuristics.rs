//! Name-based fallback

use super::{Hook, HookDetector};
use crate::constants::lookup_hint;
use crate::models::hooks::Heuristic;
use crate::models::{HookKey, HookRecord};
use crate::source::AbilitySource;
use crate::Result;

/// Appends the curated table entry for well-known abilities whose handlers
/// are too indirect to read. Runs last so its record trails the structural ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameHeuristicDetector;

impl HookDetector for NameHeuristicDetector {
    fn name(&self) -> &'static str {
        "name_heuristics"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        Ok(lookup_hint(&ability.id)
            .map(|hint| (HookKey::Meta, HookRecord::Heuristic(Heuristic { heuristic: hint.clone() })))
            .into_iter()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::test_support::detect_json;
    use serde_json::json;

    #[test]
    fn test_levitate() {
        let object = "{ flags: { breakable: 1 }, name: 'Levitate', rating: 3.5, num: 26 }";
        assert_eq!(
            detect_json(&NameHeuristicDetector, "levitate", object),
            json!([["meta", {"heuristic": {"immunities": ["ground"]}}]])
        );
    }

    #[test]
    fn test_storm_drain_stage_boost() {
        assert_eq!(
            detect_json(&NameHeuristicDetector, "stormdrain", "{}"),
            json!([["meta", {"heuristic": {"redirect": ["water"], "boosts": {"spa": 1}}}]])
        );
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(detect_json(&NameHeuristicDetector, "flamebody", "{}"), json!([]));
    }
}
