//! Redirection, absorption and residual healing

use super::{Hook, HookDetector};
use crate::constants::defaults::{ABSORB_FRACTION, ABSORB_HEAL, POISON_HEAL_FRACTION};
use crate::models::hooks::{boosts, Absorb, BoostGrant, Redirect, ResidualHeal};
use crate::models::{HookKey, HookRecord};
use crate::pattern::{captured_lowercase, returns_identifier};
use crate::source::AbilitySource;
use crate::Result;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref REDIRECT_TYPE: Regex = Regex::new(r#"move\.type\s*===\s*['"`](Electric|Water)['"`]"#).unwrap();
    static ref SPA_BOOST: Regex = Regex::new(r"boost\(\s*\{\s*spa\s*:\s*1\s*\}").unwrap();
    static ref ABSORB_TYPE: Regex =
        Regex::new(r#"(?i)move\.type\s*===\s*['"`](Electric|Water|Ground|Fire)['"`]"#).unwrap();
    static ref POISON_STATUS: Regex = Regex::new(r#"status\s*===\s*['"`](?:psn|tox)['"`]"#).unwrap();
}

const REDIRECT_HANDLERS: [&str; 3] = ["onAnyRedirectTarget", "onFoeRedirectTarget", "onAllyRedirectTarget"];
const ABSORB_HANDLERS: [&str; 4] = ["onTryHit", "onDamagingHit", "onSourceHit", "onDamage"];

/// Lightning Rod, Storm Drain
#[derive(Debug, Clone, Copy, Default)]
pub struct RedirectDetector;

impl HookDetector for RedirectDetector {
    fn name(&self) -> &'static str {
        "redirect"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        for body in ability.bodies_in(&REDIRECT_HANDLERS) {
            let Some(move_type) = captured_lowercase(&REDIRECT_TYPE, body) else {
                continue;
            };
            if !returns_identifier(body) {
                continue;
            }

            let mut hooks = vec![(HookKey::Redirect, HookRecord::Redirect(Redirect { move_type }))];
            if SPA_BOOST.is_match(body) {
                hooks.push((
                    HookKey::OnRedirect,
                    HookRecord::Boost(BoostGrant::Granted { boosts: boosts(&[("spa", 1)]) }),
                ));
            }
            return Ok(hooks);
        }
        Ok(Vec::new())
    }
}

/// Volt Absorb, Water Absorb, Earth Eater and similar
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsorbDetector;

impl HookDetector for AbsorbDetector {
    fn name(&self) -> &'static str {
        "absorb"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        let absorbed = ability.bodies_in(&ABSORB_HANDLERS).find_map(|body| {
            let move_type = captured_lowercase(&ABSORB_TYPE, body)?;
            body.contains("heal(").then_some(move_type)
        });

        Ok(absorbed
            .map(|move_type| {
                let record = Absorb {
                    move_type,
                    heal: ABSORB_HEAL.to_string(),
                    fraction: ABSORB_FRACTION.to_string(),
                };
                (HookKey::Absorb, HookRecord::Absorb(record))
            })
            .into_iter()
            .collect())
    }
}

/// Poison Heal
#[derive(Debug, Clone, Copy, Default)]
pub struct PoisonHealDetector;

impl HookDetector for PoisonHealDetector {
    fn name(&self) -> &'static str {
        "poison_heal"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        let Some(handler) = ability.handler("onResidual") else {
            return Ok(Vec::new());
        };
        let lowered = handler.text.to_lowercase();
        if !(POISON_STATUS.is_match(&lowered) && lowered.contains("this.heal(")) {
            return Ok(Vec::new());
        }
        let record = ResidualHeal {
            when: "status:poison".to_string(),
            heal_fraction: POISON_HEAL_FRACTION.to_string(),
        };
        Ok(vec![(HookKey::OnResidual, HookRecord::ResidualHeal(record))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::test_support::detect_json;
    use serde_json::json;

    #[test]
    fn test_lightning_rod() {
        let object = r#"{
			onTryHit(target, source, move) {
				if (target !== source && move.type === 'Electric') {
					if (!this.boost({ spa: 1 })) {
						this.add('-immune', target, '[from] ability: Lightning Rod');
					}
					return null;
				}
			},
			onAnyRedirectTarget(target, source, source2, move) {
				if (move.type !== 'Electric' || move.flags['pledgecombo']) return;
				const redirectTarget = ['randomNormal', 'adjacentFoe'].includes(move.target) ? 'normal' : move.target;
				if (this.validTarget(this.effectState.target, source, redirectTarget)) {
					if (move.smartTarget) move.smartTarget = false;
					if (this.effectState.target !== target) {
						this.add('-activate', this.effectState.target, 'ability: Lightning Rod');
					}
					return this.effectState.target;
				}
			},
		}"#;
        // `!==` plus a member return; neither matches the redirect shape
        assert_eq!(detect_json(&RedirectDetector, "lightningrod", object), json!([]));
    }

    #[test]
    fn test_redirect_with_boost() {
        let object = r#"{
			onFoeRedirectTarget(target, source, source2, move) {
				if (move.type === 'Water') {
					this.boost({spa: 1});
					return target;
				}
			},
		}"#;
        assert_eq!(
            detect_json(&RedirectDetector, "stormdrain", object),
            json!([["redirect", {"type": "water"}], ["onRedirect", {"boosts": {"spa": 1}}]])
        );
    }

    #[test]
    fn test_redirect_skips_candidates_without_type() {
        let object = r#"{
			onAnyRedirectTarget(target) { return target; },
			onAllyRedirectTarget(target, source, source2, move) { if (move.type === 'Electric') return target; },
		}"#;
        assert_eq!(
            detect_json(&RedirectDetector, "x", object),
            json!([["redirect", {"type": "electric"}]])
        );
    }

    #[test]
    fn test_volt_absorb() {
        let object = r#"{
			onTryHit(target, source, move) {
				if (target !== source && move.type === 'Electric') {
					if (!this.heal(target.baseMaxhp / 4)) {
						this.add('-immune', target, '[from] ability: Volt Absorb');
					}
					return null;
				}
			},
		}"#;
        assert_eq!(
            detect_json(&AbsorbDetector, "voltabsorb", object),
            json!([["absorb", {"type": "electric", "heal": "fraction", "fraction": "1/4"}]])
        );
    }

    #[test]
    fn test_absorb_without_heal_is_ignored() {
        let object = "{ onTryHit(target, source, move) { if (move.type === 'Water') { this.boost({spa: 1}); return null; } } }";
        assert_eq!(detect_json(&AbsorbDetector, "stormdrain", object), json!([]));
    }

    #[test]
    fn test_poison_heal() {
        let object = r#"{
			onDamagePriority: 1,
			onDamage(damage, target, source, effect) {
				if (effect.id === 'psn' || effect.id === 'tox') {
					this.heal(target.baseMaxhp / 8);
					return false;
				}
			},
			onResidual(pokemon) {
				if (pokemon.status === 'PSN' || pokemon.status === 'tox') this.heal(pokemon.baseMaxhp / 8);
			},
		}"#;
        assert_eq!(
            detect_json(&PoisonHealDetector, "poisonheal", object),
            json!([["onResidual", {"when": "status:poison", "healFraction": "1/8"}]])
        );
    }
}
