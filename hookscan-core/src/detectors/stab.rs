//! Same-type attack bonus

use super::{Hook, HookDetector};
use crate::constants::defaults::{STAB_TERA_VALUE, STAB_UPGRADE_FROM, STAB_VALUE};
use crate::models::hooks::StabBonus;
use crate::models::{HookKey, HookRecord, NoteKind};
use crate::source::AbilitySource;
use crate::Result;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TERA_LADDER: Regex = Regex::new(r"stab\s*===\s*2[\s\S]*return\s*2\.25[\s\S]*return\s*2").unwrap();
    static ref NINE_QUARTERS: Regex = Regex::new(r"chainModify\(\s*\[\s*9\s*,\s*4\s*\]\s*\)").unwrap();
    static ref RETURNS_TWO: Regex = Regex::new(r"return\s*2(\.0)?\s*;").unwrap();
}

/// `onModifySTAB`. Always answers for a handler with a body: either the
/// Adaptability-style bonus or an explicit unparsed note.
#[derive(Debug, Clone, Copy, Default)]
pub struct StabDetector;

impl HookDetector for StabDetector {
    fn name(&self) -> &'static str {
        "stab"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        let Some(handler) = ability.handler("onModifySTAB") else {
            return Ok(Vec::new());
        };

        let record = match handler.body.as_deref() {
            None => HookRecord::note(NoteKind::PresentNoBody),
            Some(body) if is_adaptability(body) => HookRecord::Stab(StabBonus {
                when: "hasSTAB".to_string(),
                value: STAB_VALUE,
                upgrade_from: STAB_UPGRADE_FROM,
                tera_value: STAB_TERA_VALUE,
            }),
            Some(_) => HookRecord::note(NoteKind::CustomUnparsed),
        };

        Ok(vec![(HookKey::OnModifyStab, record)])
    }
}

fn is_adaptability(body: &str) -> bool {
    TERA_LADDER.is_match(body) || NINE_QUARTERS.is_match(body) || RETURNS_TWO.is_match(body)
}
