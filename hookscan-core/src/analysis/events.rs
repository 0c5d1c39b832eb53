//! Structured diagnostics emitted while extracting
//!
//! The orchestrator and the registry never log directly. They hand
//! [`ExtractionEvent`] values to an [`EventSink`]; the default sink forwards
//! them to `tracing`, tests collect them.

use crate::models::HookKey;
use crate::source::{LocateStrategy, SkipReason};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExtractionEvent {
    ModuleStarted { path: PathBuf },
    ContainerNotFound { path: PathBuf },
    ContainerLocated { path: PathBuf, strategy: LocateStrategy, entries: usize },
    EntrySkipped { key: String, reason: SkipReason },
    HookRecorded { ability: String, key: HookKey, detector: &'static str },
    DetectorFailed { ability: String, detector: &'static str, error: String },
    /// Every detector ran and nothing matched
    NoHooks { ability: String },
    AbilityEmitted { ability: String, keys: usize },
    AbilityOverridden { ability: String },
    ModuleFailed { path: PathBuf, error: String },
    RunFinished { abilities: usize },
}

/// Receiver of extraction events; shared across rayon workers
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &ExtractionEvent);
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &ExtractionEvent) {
        use ExtractionEvent as E;
        match event {
            E::ModuleStarted { path } => {
                tracing::info!(path = %path.display(), "Processing module");
            }
            E::ContainerNotFound { path } => {
                tracing::warn!(path = %path.display(), "'Abilities' object not found in this file");
            }
            E::ContainerLocated { path, strategy, entries } => {
                tracing::info!(path = %path.display(), %strategy, entries, "Found ability entries");
            }
            E::EntrySkipped { key, reason } => {
                tracing::warn!(%key, %reason, "Skipping container entry");
            }
            E::HookRecorded { ability, key, detector } => {
                tracing::debug!(%ability, %key, detector, "Hook recorded");
            }
            E::DetectorFailed { ability, detector, error } => {
                tracing::warn!(%ability, detector, %error, "Detector failed; its records were dropped");
            }
            E::NoHooks { ability } => {
                tracing::debug!(%ability, "No hooks found");
            }
            E::AbilityEmitted { ability, keys } => {
                tracing::debug!(%ability, keys, "Hooks found for ability");
            }
            E::AbilityOverridden { ability } => {
                tracing::info!(%ability, "Ability replaced by a later module");
            }
            E::ModuleFailed { path, error } => {
                tracing::warn!(path = %path.display(), %error, "Skipping module");
            }
            E::RunFinished { abilities } => {
                tracing::info!(abilities, "Extraction complete");
            }
        }
    }
}

/// Keeps every event in memory, in emission order
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<ExtractionEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events seen so far
    pub fn events(&self) -> Vec<ExtractionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn count(&self, predicate: impl Fn(&ExtractionEvent) -> bool) -> usize {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: &ExtractionEvent) {
        let mut events = self
            .events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        events.push(event.clone());
    }
}

impl<S: EventSink + ?Sized> EventSink for std::sync::Arc<S> {
    fn emit(&self, event: &ExtractionEvent) {
        (**self).emit(event);
    }
}
