//! Damage, priority and stat modifiers read off `chainModify` literals

use super::{Hook, HookDetector};
use crate::models::hooks::PriorityShift;
use crate::models::{HookKey, HookRecord};
use crate::pattern::{chain_modify_multiplier, checks_full_hp, checks_status_category};
use crate::source::AbilitySource;
use crate::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SUPER_EFFECTIVE: Regex = Regex::new(r"(?i)super|typeMod\s*[>]=?\s*1|isSuperEffective").unwrap();
    static ref PRIORITY_DELTA: Regex = Regex::new(r"return\s+priority\s*\+\s*(-?\d+)").unwrap();
    static ref HEALING_MOVE: Regex = Regex::new(r"move\.(?:flags\.)?heal|healing|drain").unwrap();
}

/// Handler names of the per-stat chain modifiers, with their output keys
const STAT_HANDLERS: [(&str, HookKey); 2] = [
    ("onModifyAtk", HookKey::OnModifyAtk),
    ("onModifySpA", HookKey::OnModifySpA),
];

const FULL_HP_HANDLERS: [&str; 2] = ["onSourceModifyDamage", "onModifyDamage"];

/// Filter-style damage reduction on super-effective hits
#[derive(Debug, Clone, Copy, Default)]
pub struct SuperEffectiveDamageDetector;

impl HookDetector for SuperEffectiveDamageDetector {
    fn name(&self) -> &'static str {
        "super_effective_damage"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        let Some(body) = ability.handler("onModifyDamage").and_then(|h| h.body.as_deref()) else {
            return Ok(Vec::new());
        };
        if !SUPER_EFFECTIVE.is_match(body) {
            return Ok(Vec::new());
        }
        Ok(chain_modify_multiplier(body)
            .filter(|mult| *mult < 1.0)
            .map(|mult| (HookKey::OnModifyDamage, HookRecord::modifier("hit.isSuperEffective", mult)))
            .into_iter()
            .collect())
    }
}

/// `return priority + N`, classified by the kind of move it applies to
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityShiftDetector;

impl HookDetector for PriorityShiftDetector {
    fn name(&self) -> &'static str {
        "priority_shift"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        let Some(body) = ability.handler("onModifyPriority").and_then(|h| h.body.as_deref()) else {
            return Ok(Vec::new());
        };
        let Some(caps) = PRIORITY_DELTA.captures(body) else {
            return Ok(Vec::new());
        };
        let delta = caps[1].parse::<i32>().map_err(|e| Error::Detector {
            detector: "priority_shift",
            message: format!("priority delta '{}' is not an integer: {e}", &caps[1]),
        })?;

        let when = if HEALING_MOVE.is_match(body) {
            "healingMoves"
        } else if checks_status_category(body) {
            "statusMoves"
        } else {
            "always"
        };

        Ok(vec![(
            HookKey::OnModifyPriority,
            HookRecord::Priority(PriorityShift { delta, when: when.to_string() }),
        )])
    }
}

/// `onModifyAtk` / `onModifySpA` with a non-neutral literal
#[derive(Debug, Clone, Copy, Default)]
pub struct StatChainDetector;

impl HookDetector for StatChainDetector {
    fn name(&self) -> &'static str {
        "stat_chain_modify"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        let hooks = STAT_HANDLERS
            .iter()
            .filter_map(|(handler, key)| {
                let body = ability.handler(handler)?.body.as_deref()?;
                let mult = chain_modify_multiplier(body)?;
                #[allow(clippy::float_cmp)]
                let neutral = mult == 1.0;
                (!neutral).then(|| (*key, HookRecord::modifier("conditional_or_always", mult)))
            })
            .collect();
        Ok(hooks)
    }
}

/// Multiscale-style reduction while the holder is at full HP
#[derive(Debug, Clone, Copy, Default)]
pub struct FullHpMitigationDetector;

impl HookDetector for FullHpMitigationDetector {
    fn name(&self) -> &'static str {
        "full_hp_mitigation"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        let hit = ability.bodies_in(&FULL_HP_HANDLERS).find_map(|body| {
            if !checks_full_hp(body) {
                return None;
            }
            chain_modify_multiplier(body).filter(|mult| *mult < 1.0)
        });

        Ok(hit
            .map(|mult| (HookKey::OnModifyDamage, HookRecord::modifier("defenderAtFullHP", mult)))
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
    fn test_filter_reduces_super_effective() {
        let object = r#"{
			onSourceModifyDamage(damage, source, target, move) {},
			onModifyDamage(damage, source, target, move) {
				if (target.getMoveHitData(move).typeMod > 0) {
					this.debug('Filter neutralize');
					return this.chainModify(0.75);
				}
			},
		}"#;
        // typeMod > 0 alone is not a signal; the keyword must appear
        assert_eq!(detect_json(&SuperEffectiveDamageDetector, "filter", object), json!([]));

        let object = "{ onModifyDamage(d, s, t, move) { if (isSuperEffective) return this.chainModify([3, 4]); } }";
        assert_eq!(
            detect_json(&SuperEffectiveDamageDetector, "filter", object),
            json!([["onModifyDamage", {"when": "hit.isSuperEffective", "multiply": 0.75}]])
        );
    }

    #[test]
    fn test_super_effective_boost_is_ignored() {
        let object = "{ onModifyDamage(d, s, t, move) { if (move.typeMod >= 1) return this.chainModify(1.25); } }";
        assert_eq!(detect_json(&SuperEffectiveDamageDetector, "neuroforce", object), json!([]));
    }

    #[test]
    fn test_priority_classification() {
        let triage = "{ onModifyPriority(priority, pokemon, target, move) { if (move?.flags['heal']) return priority + 3; } }";
        assert_eq!(
            detect_json(&PriorityShiftDetector, "triage", triage),
            json!([["onModifyPriority", {"delta": 3, "when": "always"}]])
        );

        let triage_dot = "{ onModifyPriority(priority, pokemon, target, move) { if (move.flags.heal) return priority + 3; } }";
        assert_eq!(
            detect_json(&PriorityShiftDetector, "triage", triage_dot),
            json!([["onModifyPriority", {"delta": 3, "when": "healingMoves"}]])
        );

        let prankster = "{ onModifyPriority(priority, pokemon, target, move) { if (move?.category === 'Status') { return priority + 1; } } }";
        assert_eq!(
            detect_json(&PriorityShiftDetector, "prankster", prankster),
            json!([["onModifyPriority", {"delta": 1, "when": "always"}]])
        );

        let strict = "{ onModifyPriority(priority, pokemon, target, move) { if (move.category === 'Status') return priority + 1; } }";
        assert_eq!(
            detect_json(&PriorityShiftDetector, "prankster", strict),
            json!([["onModifyPriority", {"delta": 1, "when": "statusMoves"}]])
        );
    }

    #[test]
    fn test_negative_priority() {
        let object = "{ onModifyPriority(priority) { return priority + -1; } }";
        assert_eq!(
            detect_json(&PriorityShiftDetector, "stall", object),
            json!([["onModifyPriority", {"delta": -1, "when": "always"}]])
        );
    }

    #[test]
    fn test_overflowing_delta_is_a_detector_error() {
        let ability = crate::detectors::test_support::ability(
            "broken",
            "{ onModifyPriority(priority) { return priority + 99999999999; } }",
        );
        assert!(matches!(
            PriorityShiftDetector.detect(&ability),
            Err(Error::Detector { detector: "priority_shift", .. })
        ));
    }

    #[test]
    fn test_stat_chain_each_stat_independently() {
        let object = r#"{
			onModifyAtk(atk) { return this.chainModify(2); },
			onModifySpA(spa) { return this.chainModify(1); },
		}"#;
        assert_eq!(
            detect_json(&StatChainDetector, "hugepower", object),
            json!([["onModifyAtk", {"when": "conditional_or_always", "multiply": 2.0}]])
        );

        let object = r#"{
			onModifySpA(spa) { return this.chainModify(1.5); },
			onModifyAtk(atk) { return this.chainModify([6144, 4096]); },
		}"#;
        let out = detect_json(&StatChainDetector, "both", object);
        assert_eq!(out[0][0], json!("onModifyAtk"));
        assert_eq!(out[1][0], json!("onModifySpA"));
    }

    #[test]
    fn test_multiscale() {
        let object = r#"{
			onSourceModifyDamage(damage, source, target, move) {
				if (target.hp >= target.maxhp) {
					this.debug('Multiscale weaken');
					return this.chainModify(0.5);
				}
			},
		}"#;
        assert_eq!(
            detect_json(&FullHpMitigationDetector, "multiscale", object),
            json!([["onModifyDamage", {"when": "defenderAtFullHP", "multiply": 0.5}]])
        );
    }

    #[test]
    fn test_full_hp_stops_at_first_candidate() {
        let object = r#"{
			onSourceModifyDamage(d, s, target) { if (target.hp >= target.maxhp) return this.chainModify(0.5); },
			onModifyDamage(d, s, target) { if (target.hp === target.maxhp) return this.chainModify(0.75); },
		}"#;
        let out = detect_json(&FullHpMitigationDetector, "x", object);
        assert_eq!(out.as_array().map(Vec::len), Some(1));
        assert_eq!(out[0][1]["multiply"], json!(0.5));
    }
}
