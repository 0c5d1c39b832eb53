//! Hook records
//!
//! A hook record is the declarative description of one inferred behavioural
//! effect. Records serialize untagged: each variant's JSON shape alone says
//! what kind of effect it is, which is the form the downstream engine reads.

use serde::Serialize;
use std::collections::BTreeMap;

/// Canonical hook-kind keys of the IR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum HookKey {
    #[serde(rename = "onModifySTAB")]
    OnModifyStab,
    #[serde(rename = "onSwitchIn")]
    OnSwitchIn,
    #[serde(rename = "onModifyDamage")]
    OnModifyDamage,
    #[serde(rename = "onModifyPriority")]
    OnModifyPriority,
    #[serde(rename = "onModifyAtk")]
    OnModifyAtk,
    #[serde(rename = "onModifySpA")]
    OnModifySpA,
    #[serde(rename = "onModifySpe")]
    OnModifySpe,
    #[serde(rename = "onBasePower")]
    OnBasePower,
    #[serde(rename = "onModifyMove")]
    OnModifyMove,
    #[serde(rename = "onModifyType")]
    OnModifyType,
    #[serde(rename = "onRedirect")]
    OnRedirect,
    #[serde(rename = "onResidual")]
    OnResidual,
    #[serde(rename = "onStatLoweredByFoe")]
    OnStatLoweredByFoe,
    #[serde(rename = "blockMove")]
    BlockMove,
    #[serde(rename = "blockTags")]
    BlockTags,
    #[serde(rename = "blockStatDrops")]
    BlockStatDrops,
    #[serde(rename = "redirect")]
    Redirect,
    #[serde(rename = "absorb")]
    Absorb,
    #[serde(rename = "immunity")]
    Immunity,
    #[serde(rename = "ignoreBoosts")]
    IgnoreBoosts,
    #[serde(rename = "ignoreResidualDamage")]
    IgnoreResidualDamage,
    #[serde(rename = "negateRecoil")]
    NegateRecoil,
    #[serde(rename = "reflectStatusMoves")]
    ReflectStatusMoves,
    #[serde(rename = "protoquark")]
    Protoquark,
    #[serde(rename = "meta")]
    Meta,
}

impl HookKey {
    /// The key exactly as it appears in the serialized IR
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnModifyStab => "onModifySTAB",
            Self::OnSwitchIn => "onSwitchIn",
            Self::OnModifyDamage => "onModifyDamage",
            Self::OnModifyPriority => "onModifyPriority",
            Self::OnModifyAtk => "onModifyAtk",
            Self::OnModifySpA => "onModifySpA",
            Self::OnModifySpe => "onModifySpe",
            Self::OnBasePower => "onBasePower",
            Self::OnModifyMove => "onModifyMove",
            Self::OnModifyType => "onModifyType",
            Self::OnRedirect => "onRedirect",
            Self::OnResidual => "onResidual",
            Self::OnStatLoweredByFoe => "onStatLoweredByFoe",
            Self::BlockMove => "blockMove",
            Self::BlockTags => "blockTags",
            Self::BlockStatDrops => "blockStatDrops",
            Self::Redirect => "redirect",
            Self::Absorb => "absorb",
            Self::Immunity => "immunity",
            Self::IgnoreBoosts => "ignoreBoosts",
            Self::IgnoreResidualDamage => "ignoreResidualDamage",
            Self::NegateRecoil => "negateRecoil",
            Self::ReflectStatusMoves => "reflectStatusMoves",
            Self::Protoquark => "protoquark",
            Self::Meta => "meta",
        }
    }
}

impl std::fmt::Display for HookKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stat-stage changes keyed by stat id (`atk`, `spa`, ...)
pub type Boosts = BTreeMap<&'static str, i32>;

/// Build a [`Boosts`] table from `(stat, stages)` pairs
pub fn boosts(stages: &[(&'static str, i32)]) -> Boosts {
    stages.iter().copied().collect()
}

/// One inferred behavioural effect
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HookRecord {
    /// Same-type attack bonus raised to a fixed value
    Stab(StabBonus),
    /// Conditional multiplicative modifier
    Modifier(Modifier),
    /// Additive move-priority change
    Priority(PriorityShift),
    /// Field or foe state set on entry
    Action(StateAction),
    /// Move, tag, type or stat-drop blocking
    Block(BlockRule),
    /// Indirect-damage immunity flags
    ResidualImmunity(ResidualImmunity),
    /// Stat-stage ignoring
    IgnoreBoosts(IgnoreBoosts),
    /// Move redirection to the holder
    Redirect(Redirect),
    /// Type absorption with healing
    Absorb(Absorb),
    /// Stat boosts granted by a reaction
    Boost(BoostGrant),
    /// Healing at end of turn
    ResidualHeal(ResidualHeal),
    /// Move type mutation
    TypeRewrite(TypeRewrite),
    /// Move property mutation
    MoveRewrite(MoveRewrite),
    /// Weather/terrain-activated stat booster
    Paradox(ParadoxBoost),
    /// Hand-curated fragment from the name table
    Heuristic(Heuristic),
    /// Handler seen but not understood
    Note(Note),
}

impl HookRecord {
    pub fn modifier(when: impl Into<String>, multiply: f64) -> Self {
        Self::Modifier(Modifier { when: when.into(), multiply, tag: None })
    }

    pub fn tagged_modifier(when: impl Into<String>, multiply: f64, tag: &str) -> Self {
        Self::Modifier(Modifier {
            when: when.into(),
            multiply,
            tag: Some(tag.to_string()),
        })
    }

    pub const fn note(kind: NoteKind) -> Self {
        Self::Note(Note { note: kind })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StabBonus {
    pub when: String,
    pub value: f64,
    pub upgrade_from: f64,
    pub tera_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Modifier {
    pub when: String,
    pub multiply: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityShift {
    pub delta: i32,
    pub when: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum StateAction {
    SetWeather {
        weather: String,
        #[serde(rename = "durationTurns")]
        duration_turns: u32,
        #[serde(rename = "itemExtend")]
        item_extend: String,
    },
    SetTerrain {
        terrain: String,
        #[serde(rename = "durationTurns")]
        duration_turns: u32,
        #[serde(rename = "itemExtend")]
        item_extend: String,
    },
    FoeBoost { boosts: Boosts, when: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BlockRule {
    /// `blockMove`
    Moves { when: String },
    /// `blockTags`
    Tags { tags: Vec<String> },
    /// `blockStatDrops`
    StatDrops { from: String },
    /// `immunity`
    Types { types: Vec<String> },
    /// `reflectStatusMoves`
    Reflect { scope: String },
    /// `negateRecoil`
    Recoil {
        #[serde(rename = "crashToo")]
        crash_too: bool,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidualImmunity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hazards: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_chip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_chip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub life_orb: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IgnoreBoosts {
    pub attacker: bool,
    pub defender: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    #[serde(rename = "type")]
    pub move_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Absorb {
    #[serde(rename = "type")]
    pub move_type: String,
    pub heal: String,
    pub fraction: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BoostGrant {
    Granted { boosts: Boosts },
    OnStatLowered {
        #[serde(rename = "selfBoosts")]
        self_boosts: Boosts,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidualHeal {
    pub when: String,
    pub heal_fraction: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRewrite {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite_type_from: Option<String>,
    pub rewrite_type_to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stab_upgrade: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite_all: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MoveRewrite {
    Set { set: MoveFlagsSet },
    StripSecondaries {
        #[serde(rename = "stripSecondaries")]
        strip_secondaries: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveFlagsSet {
    pub ignore_ability: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParadoxBoost {
    #[serde(rename = "type")]
    pub kind: String,
    pub triggers: ParadoxTriggers,
    pub effects: ParadoxEffects,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParadoxTriggers {
    pub sun: bool,
    pub electric_terrain: bool,
    pub booster_energy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParadoxEffects {
    pub speed_mult: f64,
    pub other_stat_mult: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heuristic {
    pub heuristic: HeuristicHint,
}

/// A hand-curated hook fragment keyed by normalized ability name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeuristicHint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub immunities: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absorb: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_tags: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boosts: Option<HintBoosts>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HintBoosts {
    Stages(Boosts),
    Power { power: PowerBoost },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerBoost {
    #[serde(rename = "type")]
    pub move_type: &'static str,
    pub multiply: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Note {
    pub note: NoteKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    /// Handler has a body no detector signal recognised
    CustomUnparsed,
    /// Handler property exists but carries no block body
    PresentNoBody,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_serialization_matches_as_str() {
        for key in [HookKey::OnModifyStab, HookKey::BlockTags, HookKey::Meta, HookKey::OnModifySpA] {
            assert_eq!(serde_json::to_value(key).unwrap(), json!(key.as_str()));
        }
    }

    #[test]
    fn test_state_action_shape() {
        let record = HookRecord::Action(StateAction::SetWeather {
            weather: "raindance".to_string(),
            duration_turns: 5,
            item_extend: "icyrock".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"action": "setWeather", "weather": "raindance", "durationTurns": 5, "itemExtend": "icyrock"})
        );
    }

    #[test]
    fn test_modifier_omits_missing_tag() {
        assert_eq!(
            serde_json::to_value(HookRecord::modifier("tag:punch", 1.2)).unwrap(),
            json!({"when": "tag:punch", "multiply": 1.2})
        );
        assert_eq!(
            serde_json::to_value(HookRecord::tagged_modifier("bp<=60", 1.5, "technician")).unwrap(),
            json!({"when": "bp<=60", "multiply": 1.5, "tag": "technician"})
        );
    }

    #[test]
    fn test_note_shape() {
        assert_eq!(
            serde_json::to_value(HookRecord::note(NoteKind::CustomUnparsed)).unwrap(),
            json!({"note": "custom_unparsed"})
        );
        assert_eq!(
            serde_json::to_value(HookRecord::note(NoteKind::PresentNoBody)).unwrap(),
            json!({"note": "present_no_body"})
        );
    }

    #[test]
    fn test_heuristic_power_boost_shape() {
        let hint = HeuristicHint {
            absorb: Some(vec!["fire"]),
            boosts: Some(HintBoosts::Power {
                power: PowerBoost { move_type: "fire", multiply: 1.5 },
            }),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(HookRecord::Heuristic(Heuristic { heuristic: hint })).unwrap(),
            json!({"heuristic": {"absorb": ["fire"], "boosts": {"power": {"type": "fire", "multiply": 1.5}}}})
        );
    }
}
