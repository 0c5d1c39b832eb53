//! Hook detectors
//!
//! Each detector recognises one behavioural pattern in an ability's handlers
//! and returns the hook records it implies. Detectors are stateless and do
//! not depend on each other; the registry fixes the order in which their
//! records are appended.

use crate::analysis::events::{EventSink, ExtractionEvent};
use crate::models::{HookAccumulator, HookKey, HookRecord};
use crate::source::AbilitySource;
use crate::Result;

pub mod absorb;
pub mod base_power;
pub mod blocking;
pub mod boosts;
pub mod field;
pub mod modifiers;
pub mod name_heuristics;
pub mod stab;

/// One record to append, under its key
pub type Hook = (HookKey, HookRecord);

/// A single pattern recogniser
pub trait HookDetector: Send + Sync {
    /// Stable identifier used in events and the `detectors` listing
    fn name(&self) -> &'static str;

    /// Records implied by this ability; an empty vector when nothing matched
    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>>;
}

/// Ordered set of detectors run against every ability
pub struct DetectorRegistry {
    detectors: Vec<Box<dyn HookDetector>>,
}

impl std::fmt::Debug for DetectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectorRegistry")
            .field("detectors", &self.names())
            .finish()
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::new()
            .with(stab::StabDetector)
            .with(field::FieldStateDetector::weather())
            .with(field::FieldStateDetector::terrain())
            .with(modifiers::SuperEffectiveDamageDetector)
            .with(modifiers::PriorityShiftDetector)
            .with(modifiers::StatChainDetector)
            .with(blocking::StatusMoveBlockDetector)
            .with(blocking::BallisticBlockDetector)
            .with(absorb::RedirectDetector)
            .with(absorb::AbsorbDetector)
            .with(blocking::TypeImmunityDetector)
            .with(modifiers::FullHpMitigationDetector)
            .with(boosts::StatIgnoringDetector)
            .with(boosts::ReactiveBoostDetector)
            .with(base_power::TechnicianDetector)
            .with(base_power::FlagBoostDetector)
            .with(boosts::ParadoxBoosterDetector)
            .with(base_power::IgnoreAbilityDetector)
            .with(base_power::TypeRewriteDetector)
            .with(base_power::ContactBoostDetector)
            .with(base_power::RecoilBoostDetector)
            .with(blocking::RecoilNegationDetector)
            .with(base_power::SecondaryStrippingDetector)
            .with(field::WeatherSpeedDetector)
            .with(field::WeatherPowerDetector)
            .with(blocking::StatusReflectionDetector)
            .with(blocking::ResidualImmunityDetector)
            .with(absorb::PoisonHealDetector)
            .with(blocking::SoundBlockDetector)
            .with(blocking::PowderImmunityDetector)
            .with(blocking::WeatherChipImmunityDetector)
            .with(name_heuristics::NameHeuristicDetector)
    }
}

impl DetectorRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self { detectors: Vec::new() }
    }

    /// Append a detector to the end of the run order
    #[must_use]
    pub fn with(mut self, detector: impl HookDetector + 'static) -> Self {
        self.detectors.push(Box::new(detector));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Run every detector against one ability, in registry order.
    ///
    /// A detector that fails contributes nothing; the failure is reported
    /// to `sink` and the remaining detectors still run.
    pub fn run(&self, ability: &AbilitySource, sink: &dyn EventSink) -> HookAccumulator {
        let mut hooks = HookAccumulator::new();

        for detector in &self.detectors {
            match detector.detect(ability) {
                Ok(found) => {
                    for (key, record) in found {
                        sink.emit(&ExtractionEvent::HookRecorded {
                            ability: ability.id.clone(),
                            key,
                            detector: detector.name(),
                        });
                        hooks.push(key, record);
                    }
                }
                Err(e) => sink.emit(&ExtractionEvent::DetectorFailed {
                    ability: ability.id.clone(),
                    detector: detector.name(),
                    error: e.to_string(),
                }),
            }
        }

        hooks
    }
}
