//! Hook accumulator and output IR

use super::hooks::{HookKey, HookRecord};
use indexmap::IndexMap;
use serde::Serialize;

/// Per-ability, append-only multimap from hook key to records.
///
/// Keys only come into existence through [`HookAccumulator::push`], and keep
/// first-insertion order. Duplicate records under one key are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HookAccumulator {
    hooks: IndexMap<HookKey, Vec<HookRecord>>,
}

impl HookAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: HookKey, record: HookRecord) {
        self.hooks.entry(key).or_default().push(record);
    }

    pub fn get(&self, key: HookKey) -> Option<&[HookRecord]> {
        self.hooks.get(&key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: HookKey) -> bool {
        self.hooks.contains_key(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = HookKey> + '_ {
        self.hooks.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HookKey, &[HookRecord])> {
        self.hooks.iter().map(|(key, records)| (*key, records.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Total number of records across all keys
    pub fn record_count(&self) -> usize {
        self.hooks.values().map(Vec::len).sum()
    }
}

/// Hooks inferred for one ability
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityIR {
    pub id: String,
    pub hooks: HookAccumulator,
}

impl AbilityIR {
    /// Materialize an ability entry; empty accumulators never produce one.
    pub fn from_accumulator(id: impl Into<String>, hooks: HookAccumulator) -> Option<Self> {
        if hooks.is_empty() {
            return None;
        }
        Some(Self { id: id.into(), hooks })
    }
}

/// Ability id to hooks, across all processed modules
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OutputIR {
    abilities: IndexMap<String, AbilityIR>,
}

impl OutputIR {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an ability, replacing any earlier entry with the same id
    /// wholesale. The replaced entry keeps its original position. Returns
    /// `true` if an earlier entry was replaced.
    pub fn insert(&mut self, ability: AbilityIR) -> bool {
        self.abilities.insert(ability.id.clone(), ability).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&AbilityIR> {
        self.abilities.get(id)
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.abilities.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AbilityIR> {
        self.abilities.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::hooks::NoteKind;

    fn single(id: &str, key: HookKey, record: HookRecord) -> AbilityIR {
        let mut hooks = HookAccumulator::new();
        hooks.push(key, record);
        AbilityIR::from_accumulator(id, hooks).unwrap()
    }

    #[test]
    fn test_accumulator_keeps_duplicates_in_order() {
        let mut hooks = HookAccumulator::new();
        hooks.push(HookKey::OnBasePower, HookRecord::modifier("tag:punch", 1.2));
        hooks.push(HookKey::Meta, HookRecord::note(NoteKind::CustomUnparsed));
        hooks.push(HookKey::OnBasePower, HookRecord::modifier("tag:punch", 1.2));

        assert_eq!(hooks.len(), 2);
        assert_eq!(hooks.record_count(), 3);
        assert_eq!(hooks.get(HookKey::OnBasePower).map(<[_]>::len), Some(2));
        assert_eq!(hooks.keys().collect::<Vec<_>>(), vec![HookKey::OnBasePower, HookKey::Meta]);
        assert!(!hooks.contains(HookKey::OnSwitchIn));
    }

    #[test]
    fn test_empty_accumulator_is_not_materialized() {
        assert!(AbilityIR::from_accumulator("noability", HookAccumulator::new()).is_none());
    }

    #[test]
    fn test_output_override_replaces_whole_entry() {
        let mut out = OutputIR::new();
        assert!(!out.insert(single("X", HookKey::OnBasePower, HookRecord::modifier("tag:bite", 1.5))));
        assert!(!out.insert(single("Y", HookKey::Meta, HookRecord::note(NoteKind::CustomUnparsed))));
        assert!(out.insert(single("X", HookKey::OnModifySpe, HookRecord::modifier("weather:rain", 2.0))));

        let x = out.get("X").unwrap();
        assert!(!x.hooks.contains(HookKey::OnBasePower));
        assert!(x.hooks.contains(HookKey::OnModifySpe));
        assert_eq!(out.ids().collect::<Vec<_>>(), vec!["X", "Y"]);
    }

    #[test]
    fn test_serialized_shape() {
        let mut out = OutputIR::new();
        out.insert(single("ironfist", HookKey::OnBasePower, HookRecord::modifier("tag:punch", 1.2)));
        assert_eq!(
            serde_json::to_value(&out).unwrap(),
            serde_json::json!({
                "ironfist": {"id": "ironfist", "hooks": {"onBasePower": [{"when": "tag:punch", "multiply": 1.2}]}}
            })
        );
    }
}
