//! Stat stages: ignoring them, dropping foes', reacting to drops, and the
//! paradox stat boosters

use super::{Hook, HookDetector};
use crate::constants::defaults::{PARADOX_OTHER_STAT_MULT, PARADOX_SPEED_MULT};
use crate::models::hooks::{
    boosts, BlockRule, BoostGrant, IgnoreBoosts, ParadoxBoost, ParadoxEffects, ParadoxTriggers, StateAction,
};
use crate::models::{HookKey, HookRecord};
use crate::source::AbilitySource;
use crate::Result;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ZEROES_DEFENDER_SIDE: Regex =
        Regex::new(r#"boosts\[['"](?:def|spd|evasion)['"]\]\s*=\s*0"#).unwrap();
    static ref ZEROES_ATTACKER_SIDE: Regex =
        Regex::new(r#"boosts\[['"](?:atk|spa|accuracy)['"]\]\s*=\s*0"#).unwrap();

    static ref FOE_ATK_DROP: Regex = Regex::new(r"this\.boost\(\s*\{\s*atk\s*:\s*-1\s*\}").unwrap();
    static ref NEGATIVE_BOOST_LOOP: Regex =
        Regex::new(r"for\s*\(\s*const\s+stat\s+in\s+boost\s*\)\s*\{[^}]*if\s*\(\s*boost\[stat\]\s*<\s*0").unwrap();
    static ref NEGATIVE_BOOST_FIELD: Regex = Regex::new(r"boost\.\w+\s*<\s*0").unwrap();
    static ref CANCELS: Regex = Regex::new(r"\breturn\s+null\b|\breturn\s+false\b").unwrap();
    static ref SELF_ATK_RAISE: Regex = Regex::new(r"this\.boost\(\s*\{\s*atk\s*:\s*2\s*\}").unwrap();
    static ref SELF_SPA_RAISE: Regex = Regex::new(r"this\.boost\(\s*\{\s*spa\s*:\s*2\s*\}").unwrap();

    static ref SUN_TRIGGER: Regex = Regex::new(r"(?i)sunnyday|desolateland|sun").unwrap();
    static ref ELECTRIC_TERRAIN_TRIGGER: Regex = Regex::new(r"(?i)electricterrain").unwrap();
    static ref BOOSTER_ENERGY_TRIGGER: Regex = Regex::new(r"(?i)booster\s*energy").unwrap();
}

const REACTION_HANDLERS: [&str; 3] = ["onAfterEachBoost", "onAfterBoost", "onBoost"];

/// Unaware
#[derive(Debug, Clone, Copy, Default)]
pub struct StatIgnoringDetector;

impl HookDetector for StatIgnoringDetector {
    fn name(&self) -> &'static str {
        "stat_ignoring"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        let Some(body) = ability.handler("onAnyModifyBoost").and_then(|h| h.body.as_deref()) else {
            return Ok(Vec::new());
        };
        let defender_side = ZEROES_DEFENDER_SIDE.is_match(body);
        let attacker_side = ZEROES_ATTACKER_SIDE.is_match(body);
        if !defender_side && !attacker_side {
            return Ok(Vec::new());
        }
        // Zeroing the defender's stages means the holder ignores them while attacking
        let record = IgnoreBoosts { attacker: defender_side, defender: attacker_side };
        Ok(vec![(HookKey::IgnoreBoosts, HookRecord::IgnoreBoosts(record))])
    }
}

/// Intimidate, Clear Body, Defiant and Competitive
#[derive(Debug, Clone, Copy, Default)]
pub struct ReactiveBoostDetector;

impl ReactiveBoostDetector {
    fn foe_debuff(ability: &AbilitySource) -> Option<Hook> {
        let entry = ability.first_handler(&["onStart", "onSwitchIn"])?;
        FOE_ATK_DROP.is_match(&entry.text).then(|| {
            let action = StateAction::FoeBoost {
                boosts: boosts(&[("atk", -1)]),
                when: "adjacentFoes".to_string(),
            };
            (HookKey::OnSwitchIn, HookRecord::Action(action))
        })
    }

    fn drop_guard(ability: &AbilitySource) -> Option<Hook> {
        let text = &ability.handler("onTryBoost")?.text;
        let checks_negative = NEGATIVE_BOOST_LOOP.is_match(text) || NEGATIVE_BOOST_FIELD.is_match(text);
        (checks_negative && CANCELS.is_match(text)).then(|| {
            let rule = BlockRule::StatDrops { from: "opponents".to_string() };
            (HookKey::BlockStatDrops, HookRecord::Block(rule))
        })
    }

    fn self_raises(ability: &AbilitySource) -> Vec<Hook> {
        let raised = |stat: &'static str| {
            let grant = BoostGrant::OnStatLowered { self_boosts: boosts(&[(stat, 2)]) };
            (HookKey::OnStatLoweredByFoe, HookRecord::Boost(grant))
        };

        let mut hooks = Vec::new();
        for handler in ability.handlers_in(&REACTION_HANDLERS) {
            if SELF_ATK_RAISE.is_match(&handler.text) {
                hooks.push(raised("atk"));
            }
            if SELF_SPA_RAISE.is_match(&handler.text) {
                hooks.push(raised("spa"));
            }
        }
        hooks
    }
}

impl HookDetector for ReactiveBoostDetector {
    fn name(&self) -> &'static str {
        "reactive_boosts"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        let mut hooks: Vec<Hook> = Self::foe_debuff(ability)
            .into_iter()
            .chain(Self::drop_guard(ability))
            .collect();
        hooks.extend(Self::self_raises(ability));
        Ok(hooks)
    }
}

/// Protosynthesis and Quark Drive
#[derive(Debug, Clone, Copy, Default)]
pub struct ParadoxBoosterDetector;

impl HookDetector for ParadoxBoosterDetector {
    fn name(&self) -> &'static str {
        "paradox_booster"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        let lowered = ability.text.to_lowercase();
        let kind = if lowered.contains("protosynthesis") {
            "protosynthesis"
        } else if lowered.contains("quark drive") || lowered.contains("quarkdrive") {
            "quarkdrive"
        } else {
            return Ok(Vec::new());
        };

        let record = ParadoxBoost {
            kind: kind.to_string(),
            triggers: ParadoxTriggers {
                sun: SUN_TRIGGER.is_match(&ability.text),
                electric_terrain: ELECTRIC_TERRAIN_TRIGGER.is_match(&ability.text),
                booster_energy: BOOSTER_ENERGY_TRIGGER.is_match(&ability.text),
            },
            effects: ParadoxEffects {
                speed_mult: PARADOX_SPEED_MULT,
                other_stat_mult: PARADOX_OTHER_STAT_MULT,
            },
        };
        Ok(vec![(HookKey::Protoquark, HookRecord::Paradox(record))])
    }
}
