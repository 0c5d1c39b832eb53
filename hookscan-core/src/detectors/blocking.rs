//! Move blocking, immunities and damage negation
//!
//! Detectors with several candidate handlers try them in order and stop at
//! the first one that matches.

use super::{Hook, HookDetector};
use crate::models::hooks::{BlockRule, ResidualImmunity};
use crate::models::{HookKey, HookRecord};
use crate::pattern::{
    captured_lowercase, checks_move_flag, checks_status_category, returns_block, returns_false, MoveFlag,
};
use crate::source::{AbilitySource, HandlerView};
use crate::Result;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LAST_MOVE_ATTR: Regex = Regex::new(r"this\.attrLastMove").unwrap();
    static ref IMMUNE_TYPE: Regex =
        Regex::new(r#"(?i)type\s*===\s*['"`](Ground|Electric|Water|Fire)['"`]"#).unwrap();
    static ref RECOIL_EFFECT: Regex =
        Regex::new(r#"effect\.id\s*===\s*['"`](?:recoil|crash)['"`]|move\.(?:recoil|hasCrashDamage)"#).unwrap();
    static ref BOUNCE: Regex = Regex::new(r"bounced|hasBounced|this\.useMove|this\.hitStepMoveHit").unwrap();
    static ref NON_MOVE_EFFECT: Regex =
        Regex::new(r#"effect(?:\.\w+)?\.effectType\s*!==\s*['"`]Move['"`]"#).unwrap();
    static ref BARE_FALSE_RETURN: Regex = Regex::new(r"return\s+false\s*;").unwrap();
}

const TRY_HIT_HANDLERS: [&str; 3] = ["onTryHit", "onTryMove", "onAllyTryHit"];
const HIT_OR_DAMAGE_HANDLERS: [&str; 3] = ["onTryHit", "onAllyTryHit", "onDamage"];
const POWDER_HANDLERS: [&str; 3] = ["onTryHit", "onAllyTryHit", "onImmunity"];
const WEATHER_CHIP_HANDLERS: [&str; 2] = ["onImmunity", "onDamage"];
const RECOIL_HANDLERS: [&str; 3] = ["onDamage", "onTryMove", "onModifyMove"];
const REFLECT_HANDLERS: [&str; 2] = ["onTryHit", "onAllyTryHit"];

fn body(handler: &HandlerView) -> Option<&str> {
    handler.body.as_deref()
}

fn text(handler: &HandlerView) -> Option<&str> {
    Some(&handler.text)
}

/// One record if any candidate's chosen text satisfies `matches`
fn first_match(
    ability: &AbilitySource,
    candidates: &[&str],
    view: fn(&HandlerView) -> Option<&str>,
    matches: impl Fn(&str) -> bool,
    hook: impl FnOnce() -> Hook,
) -> Vec<Hook> {
    let hit = ability
        .handlers_in(candidates)
        .filter_map(view)
        .any(matches);
    if hit {
        vec![hook()]
    } else {
        Vec::new()
    }
}

fn block_tags(tag: &str) -> Hook {
    (
        HookKey::BlockTags,
        HookRecord::Block(BlockRule::Tags { tags: vec![tag.to_string()] }),
    )
}

/// Good as Gold: status moves fail against the holder
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusMoveBlockDetector;

impl HookDetector for StatusMoveBlockDetector {
    fn name(&self) -> &'static str {
        "block_status_moves"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        Ok(first_match(
            ability,
            &TRY_HIT_HANDLERS,
            body,
            |text| checks_status_category(text) && (returns_block(text) || LAST_MOVE_ATTR.is_match(text)),
            || {
                (
                    HookKey::BlockMove,
                    HookRecord::Block(BlockRule::Moves { when: "statusMoves".to_string() }),
                )
            },
        ))
    }
}

/// Bulletproof
#[derive(Debug, Clone, Copy, Default)]
pub struct BallisticBlockDetector;

impl HookDetector for BallisticBlockDetector {
    fn name(&self) -> &'static str {
        "block_ballistic"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        Ok(first_match(
            ability,
            &HIT_OR_DAMAGE_HANDLERS,
            body,
            |text| checks_move_flag(text, MoveFlag::Bullet) && returns_block(text),
            || block_tags(MoveFlag::Bullet.tag()),
        ))
    }
}

/// Soundproof
#[derive(Debug, Clone, Copy, Default)]
pub struct SoundBlockDetector;

impl HookDetector for SoundBlockDetector {
    fn name(&self) -> &'static str {
        "block_sound"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        Ok(first_match(
            ability,
            &HIT_OR_DAMAGE_HANDLERS,
            text,
            |text| checks_move_flag(text, MoveFlag::Sound) && returns_block(text),
            || block_tags(MoveFlag::Sound.tag()),
        ))
    }
}

/// Overcoat, powder half
#[derive(Debug, Clone, Copy, Default)]
pub struct PowderImmunityDetector;

impl HookDetector for PowderImmunityDetector {
    fn name(&self) -> &'static str {
        "powder_immunity"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        Ok(first_match(
            ability,
            &POWDER_HANDLERS,
            text,
            |text| text.to_lowercase().contains("powder") && returns_block(text),
            || block_tags("powder"),
        ))
    }
}

/// Overcoat, weather half
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherChipImmunityDetector;

impl HookDetector for WeatherChipImmunityDetector {
    fn name(&self) -> &'static str {
        "weather_chip_immunity"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        Ok(first_match(
            ability,
            &WEATHER_CHIP_HANDLERS,
            text,
            |text| {
                let lowered = text.to_lowercase();
                let weather = ["sandstorm", "hail", "snow"].iter().any(|w| lowered.contains(w));
                weather && returns_block(text)
            },
            || {
                let record = ResidualImmunity { weather_chip: Some(true), ..Default::default() };
                (HookKey::IgnoreResidualDamage, HookRecord::ResidualImmunity(record))
            },
        ))
    }
}

/// `onImmunity` refusing one of the elemental types
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeImmunityDetector;

impl HookDetector for TypeImmunityDetector {
    fn name(&self) -> &'static str {
        "type_immunity"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        let Some(body) = ability.handler("onImmunity").and_then(body) else {
            return Ok(Vec::new());
        };
        let Some(immune) = captured_lowercase(&IMMUNE_TYPE, body) else {
            return Ok(Vec::new());
        };
        if !returns_false(body) {
            return Ok(Vec::new());
        }
        Ok(vec![(
            HookKey::Immunity,
            HookRecord::Block(BlockRule::Types { types: vec![immune] }),
        )])
    }
}

/// Rock Head
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoilNegationDetector;

impl HookDetector for RecoilNegationDetector {
    fn name(&self) -> &'static str {
        "recoil_negation"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        Ok(first_match(
            ability,
            &RECOIL_HANDLERS,
            text,
            |text| RECOIL_EFFECT.is_match(text),
            || (HookKey::NegateRecoil, HookRecord::Block(BlockRule::Recoil { crash_too: true })),
        ))
    }
}

/// Magic Bounce
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusReflectionDetector;

impl HookDetector for StatusReflectionDetector {
    fn name(&self) -> &'static str {
        "status_reflection"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        Ok(first_match(
            ability,
            &REFLECT_HANDLERS,
            text,
            |text| checks_status_category(text) && BOUNCE.is_match(text),
            || {
                (
                    HookKey::ReflectStatusMoves,
                    HookRecord::Block(BlockRule::Reflect { scope: "singleTarget".to_string() }),
                )
            },
        ))
    }
}

/// Magic Guard: no damage from anything but moves
#[derive(Debug, Clone, Copy, Default)]
pub struct ResidualImmunityDetector;

impl HookDetector for ResidualImmunityDetector {
    fn name(&self) -> &'static str {
        "residual_immunity"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        Ok(first_match(
            ability,
            &["onDamage"],
            text,
            |text| NON_MOVE_EFFECT.is_match(text) || BARE_FALSE_RETURN.is_match(text),
            || {
                let record = ResidualImmunity {
                    hazards: Some(true),
                    status_chip: Some(true),
                    weather_chip: Some(true),
                    life_orb: Some(true),
                };
                (HookKey::IgnoreResidualDamage, HookRecord::ResidualImmunity(record))
            },
        ))
    }
}
