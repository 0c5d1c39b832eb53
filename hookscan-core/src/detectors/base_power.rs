//! `onBasePower` boosts and the move rewrites that pair with them

use super::{Hook, HookDetector};
use crate::constants::defaults::{
    BITE_BOOST, CONTACT_BOOST, PULSE_BOOST, PUNCH_BOOST, RECOIL_BOOST, SHEER_FORCE_BOOST, SLICING_BOOST,
    TECHNICIAN_BOOST, TYPE_REWRITE_BOOST,
};
use crate::models::hooks::{MoveFlagsSet, MoveRewrite, TypeRewrite};
use crate::models::{HookKey, HookRecord};
use crate::pattern::{captured_lowercase, chain_modify_multiplier, checks_move_flag, MoveFlag};
use crate::source::AbilitySource;
use crate::Result;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TECHNICIAN_THRESHOLD: Regex = Regex::new(r"<=\s*60").unwrap();
    static ref RECOIL_MOVE: Regex = Regex::new(r"move\.(?:recoil|hasCrashDamage|mindBlownRecoil)").unwrap();
    static ref IGNORE_ABILITY: Regex = Regex::new(r"move\.ignoreAbility\s*=\s*true").unwrap();
    static ref TYPE_ASSIGNMENT: Regex =
        Regex::new(r#"move\.type\s*=\s*['"`](Fairy|Flying|Ice|Electric|Normal)['"`]"#).unwrap();
    static ref TYPE_CHANGER_BOOSTED: Regex = Regex::new(r"move\.typeChangerBoosted\s*===\s*this\.effect").unwrap();
    static ref STRIPS_SECONDARIES: Regex = Regex::new(
        r"delete\s+move\.secondaries|move\.secondaries\s*=\s*\[\]|move\.secondaries\s*=\s*null"
    ).unwrap();
}

/// Flag boosts, in emission order
const TAG_BOOSTS: [(MoveFlag, f64); 4] = [
    (MoveFlag::Bite, BITE_BOOST),
    (MoveFlag::Punch, PUNCH_BOOST),
    (MoveFlag::Slicing, SLICING_BOOST),
    (MoveFlag::Pulse, PULSE_BOOST),
];

fn base_power_body(ability: &AbilitySource) -> Option<&str> {
    ability.handler("onBasePower")?.body.as_deref()
}

/// Literal of `text`, or the family default
fn multiplier_or(text: &str, default: f64) -> f64 {
    chain_modify_multiplier(text).unwrap_or(default)
}

/// Strong Jaw, Iron Fist, Sharpness, Mega Launcher
#[derive(Debug, Clone, Copy, Default)]
pub struct FlagBoostDetector;

impl HookDetector for FlagBoostDetector {
    fn name(&self) -> &'static str {
        "base_power_tags"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        let Some(body) = base_power_body(ability) else {
            return Ok(Vec::new());
        };
        let hooks = TAG_BOOSTS
            .iter()
            .filter(|(flag, _)| checks_move_flag(body, *flag))
            .map(|(flag, default)| {
                let when = format!("tag:{}", flag.tag());
                (HookKey::OnBasePower, HookRecord::modifier(when, multiplier_or(body, *default)))
            })
            .collect();
        Ok(hooks)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TechnicianDetector;

impl HookDetector for TechnicianDetector {
    fn name(&self) -> &'static str {
        "technician"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        let Some(body) = base_power_body(ability) else {
            return Ok(Vec::new());
        };
        let cue = body.contains("Technician boost") || body.contains("basePowerAfterMultiplier");
        if !cue && !TECHNICIAN_THRESHOLD.is_match(body) {
            return Ok(Vec::new());
        }
        Ok(vec![(
            HookKey::OnBasePower,
            HookRecord::tagged_modifier("bp<=60", multiplier_or(body, TECHNICIAN_BOOST), "technician"),
        )])
    }
}

/// Tough Claws
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactBoostDetector;

impl HookDetector for ContactBoostDetector {
    fn name(&self) -> &'static str {
        "contact_boost"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        Ok(base_power_body(ability)
            .filter(|body| checks_move_flag(body, MoveFlag::Contact))
            .map(|body| {
                (HookKey::OnBasePower, HookRecord::modifier("tag:contact", multiplier_or(body, CONTACT_BOOST)))
            })
            .into_iter()
            .collect())
    }
}

/// Reckless
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoilBoostDetector;

impl HookDetector for RecoilBoostDetector {
    fn name(&self) -> &'static str {
        "recoil_boost"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        Ok(base_power_body(ability)
            .filter(|body| RECOIL_MOVE.is_match(body))
            .map(|body| {
                (HookKey::OnBasePower, HookRecord::modifier("recoilOrCrash", multiplier_or(body, RECOIL_BOOST)))
            })
            .into_iter()
            .collect())
    }
}

/// Mold Breaker family: `move.ignoreAbility = true`
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreAbilityDetector;

impl HookDetector for IgnoreAbilityDetector {
    fn name(&self) -> &'static str {
        "ignore_ability"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        let matched = ability
            .handler("onModifyMove")
            .and_then(|h| h.body.as_deref())
            .is_some_and(|body| IGNORE_ABILITY.is_match(body));
        if !matched {
            return Ok(Vec::new());
        }
        let record = HookRecord::MoveRewrite(MoveRewrite::Set {
            set: MoveFlagsSet { ignore_ability: true },
        });
        Ok(vec![(HookKey::OnModifyMove, record)])
    }
}

/// Pixilate, Aerilate, Refrigerate, Galvanize, Normalize
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeRewriteDetector;

impl HookDetector for TypeRewriteDetector {
    fn name(&self) -> &'static str {
        "type_rewrite"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        let (Some(modify_type), Some(base_power)) =
            (ability.handler("onModifyType"), ability.handler("onBasePower"))
        else {
            return Ok(Vec::new());
        };
        let Some(to_type) = captured_lowercase(&TYPE_ASSIGNMENT, &modify_type.text) else {
            return Ok(Vec::new());
        };

        // Normalize rewrites every type; the others only rewrite Normal moves
        let rewrites_all = to_type == "normal";
        let rewrite = if rewrites_all {
            TypeRewrite {
                rewrite_type_from: None,
                rewrite_type_to: to_type.clone(),
                stab_upgrade: None,
                rewrite_all: Some(true),
            }
        } else {
            TypeRewrite {
                rewrite_type_from: Some("normal".to_string()),
                rewrite_type_to: to_type.clone(),
                stab_upgrade: Some(true),
                rewrite_all: None,
            }
        };
        let mut hooks = vec![(HookKey::OnModifyType, HookRecord::TypeRewrite(rewrite))];

        if TYPE_CHANGER_BOOSTED.is_match(&base_power.text) {
            let when = if rewrites_all {
                format!("type:{to_type}")
            } else {
                format!("afterTypeRewrite:normal->{to_type}")
            };
            let multiply = multiplier_or(&base_power.text, TYPE_REWRITE_BOOST);
            hooks.push((HookKey::OnBasePower, HookRecord::tagged_modifier(when, multiply, "typeRewrite")));
        }

        Ok(hooks)
    }
}

/// Sheer Force: drop secondaries, boost power
#[derive(Debug, Clone, Copy, Default)]
pub struct SecondaryStrippingDetector;

impl HookDetector for SecondaryStrippingDetector {
    fn name(&self) -> &'static str {
        "secondary_stripping"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        let (Some(modify_move), Some(base_power)) =
            (ability.handler("onModifyMove"), ability.handler("onBasePower"))
        else {
            return Ok(Vec::new());
        };
        if !STRIPS_SECONDARIES.is_match(&modify_move.text) {
            return Ok(Vec::new());
        }

        Ok(vec![
            (
                HookKey::OnModifyMove,
                HookRecord::MoveRewrite(MoveRewrite::StripSecondaries { strip_secondaries: true }),
            ),
            (
                HookKey::OnBasePower,
                HookRecord::tagged_modifier(
                    "hadSecondariesStrippedOrEligible",
                    multiplier_or(&base_power.text, SHEER_FORCE_BOOST),
                    "sheerforce",
                ),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::test_support::detect_json;
    use serde_json::json;

    #[test]
    fn test_iron_fist_default() {
        let object = r#"{
			onBasePowerPriority: 23,
			onBasePower(basePower, attacker, defender, move) {
				if (move.flags['punch']) {
					this.debug('Iron Fist boost');
					return this.chainModify(1.2);
				}
			},
		}"#;
        assert_eq!(
            detect_json(&FlagBoostDetector, "ironfist", object),
            json!([["onBasePower", {"when": "tag:punch", "multiply": 1.2}]])
        );

        let no_literal = "{ onBasePower(bp, a, d, move) { if (move.flags.punch) return bp * 6 / 5; } }";
        assert_eq!(
            detect_json(&FlagBoostDetector, "ironfist", no_literal),
            json!([["onBasePower", {"when": "tag:punch", "multiply": 1.2}]])
        );
    }

    #[test]
    fn test_mega_launcher_aura_counts_as_pulse() {
        let object = "{ onBasePower(bp, a, d, move) { if (move.flags['aura']) return this.chainModify(1.5); } }";
        assert_eq!(
            detect_json(&FlagBoostDetector, "megalauncher", object),
            json!([["onBasePower", {"when": "tag:pulse", "multiply": 1.5}]])
        );
    }

    #[test]
    fn test_technician() {
        let object = r#"{
			onBasePower(basePower, attacker, defender, move) {
				const basePowerAfterMultiplier = this.modify(basePower, this.event.modifier);
				if (basePowerAfterMultiplier <= 60) {
					this.debug('Technician boost');
					return this.chainModify(1.5);
				}
			},
		}"#;
        assert_eq!(
            detect_json(&TechnicianDetector, "technician", object),
            json!([["onBasePower", {"when": "bp<=60", "multiply": 1.5, "tag": "technician"}]])
        );
    }

    #[test]
    fn test_tough_claws_and_reckless() {
        let claws = "{ onBasePower(bp, a, d, move) { if (move.flags['contact']) return this.chainModify([5325, 4096]); } }";
        let out = detect_json(&ContactBoostDetector, "toughclaws", claws);
        assert_eq!(out[0][1]["when"], json!("tag:contact"));
        assert_eq!(out[0][1]["multiply"], json!(5325.0 / 4096.0));

        let reckless = "{ onBasePower(bp, a, d, move) { if (move.recoil || move.hasCrashDamage) return this.chainModify([4915, 4096]); } }";
        let out = detect_json(&RecoilBoostDetector, "reckless", reckless);
        assert_eq!(out[0][1]["when"], json!("recoilOrCrash"));
    }

    #[test]
    fn test_mold_breaker() {
        let object = "{ onModifyMove(move) { move.ignoreAbility = true; } }";
        assert_eq!(
            detect_json(&IgnoreAbilityDetector, "moldbreaker", object),
            json!([["onModifyMove", {"set": {"ignoreAbility": true}}]])
        );
    }

    #[test]
    fn test_pixilate() {
        let object = r#"{
			onModifyTypePriority: -1,
			onModifyType(move, pokemon) {
				const noModifyType = ['judgment', 'multiattack'];
				if (move.type === 'Normal' && !noModifyType.includes(move.id)) {
					move.type = 'Fairy';
					move.typeChangerBoosted = this.effect;
				}
			},
			onBasePowerPriority: 23,
			onBasePower(basePower, pokemon, target, move) {
				if (move.typeChangerBoosted === this.effect) return this.chainModify([4915, 4096]);
			},
		}"#;
        let out = detect_json(&TypeRewriteDetector, "pixilate", object);
        assert_eq!(
            out[0],
            json!(["onModifyType", {"rewriteTypeFrom": "normal", "rewriteTypeTo": "fairy", "stabUpgrade": true}])
        );
        assert_eq!(out[1][1]["when"], json!("afterTypeRewrite:normal->fairy"));
        assert_eq!(out[1][1]["tag"], json!("typeRewrite"));
    }

    #[test]
    fn test_normalize_rewrites_all() {
        let object = r#"{
			onModifyType(move) { move.type = 'Normal'; move.typeChangerBoosted = this.effect; },
			onBasePower(bp, p, t, move) { if (move.typeChangerBoosted === this.effect) return this.chainModify(1.2); },
		}"#;
        assert_eq!(
            detect_json(&TypeRewriteDetector, "normalize", object),
            json!([
                ["onModifyType", {"rewriteTypeTo": "normal", "rewriteAll": true}],
                ["onBasePower", {"when": "type:normal", "multiply": 1.2, "tag": "typeRewrite"}]
            ])
        );
    }

    #[test]
    fn test_type_rewrite_requires_both_handlers() {
        let object = "{ onModifyType(move) { move.type = 'Ice'; } }";
        assert_eq!(detect_json(&TypeRewriteDetector, "x", object), json!([]));
    }

    #[test]
    fn test_sheer_force() {
        let object = r#"{
			onModifyMove(move, pokemon) {
				if (move.secondaries) {
					delete move.secondaries;
					delete move.self;
					move.hasSheerForce = true;
				}
			},
			onBasePower(basePower, pokemon, target, move) {
				if (move.hasSheerForce) return this.chainModify([5325, 4096]);
			},
		}"#;
        let out = detect_json(&SecondaryStrippingDetector, "sheerforce", object);
        assert_eq!(out[0], json!(["onModifyMove", {"stripSecondaries": true}]));
        assert_eq!(out[1][1]["when"], json!("hadSecondariesStrippedOrEligible"));
        assert_eq!(out[1][1]["tag"], json!("sheerforce"));
    }
}
