//! Extraction orchestration
//!
//! Walks the ability table of each module, runs the detector registry over
//! every qualifying entry and folds the results into one [`OutputIR`].

pub mod events;

use crate::detectors::DetectorRegistry;
use crate::models::{AbilityIR, OutputIR};
use crate::source::{AbilitySource, ContainerEntry, SourceModule};
use crate::{CoreConfig, Error, ExecutionMode, Result};
use events::{EventSink, ExtractionEvent, TracingSink};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

/// Main extraction orchestrator
pub struct Extractor {
    registry: DetectorRegistry,
    config: CoreConfig,
    sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(CoreConfig::default())
    }
}

impl Extractor {
    /// Default registry, events forwarded to `tracing`
    pub fn new(config: CoreConfig) -> Self {
        Self {
            registry: DetectorRegistry::default(),
            config,
            sink: Arc::new(TracingSink),
        }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub fn with_registry(mut self, registry: DetectorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &DetectorRegistry {
        &self.registry
    }

    fn emit(&self, event: ExtractionEvent) {
        self.sink.emit(&event);
    }

    /// Run the full registry against one ability
    pub fn extract_ability(&self, ability: &AbilitySource) -> Option<AbilityIR> {
        let hooks = self.registry.run(ability, self.sink.as_ref());
        let keys = hooks.len();

        match AbilityIR::from_accumulator(ability.id.clone(), hooks) {
            Some(ir) => {
                self.emit(ExtractionEvent::AbilityEmitted { ability: ability.id.clone(), keys });
                Some(ir)
            }
            None => {
                self.emit(ExtractionEvent::NoHooks { ability: ability.id.clone() });
                None
            }
        }
    }

    /// Abilities of one parsed module, in declaration order
    pub fn extract_module(&self, module: &SourceModule) -> Vec<AbilityIR> {
        let path = module.path().to_path_buf();
        self.emit(ExtractionEvent::ModuleStarted { path: path.clone() });

        let Some(container) = module.locate_abilities() else {
            self.emit(ExtractionEvent::ContainerNotFound { path });
            return Vec::new();
        };
        self.emit(ExtractionEvent::ContainerLocated {
            path,
            strategy: container.strategy,
            entries: container.entry_count(),
        });

        let mut abilities = Vec::new();
        for entry in container.entries(module.text().as_bytes()) {
            match entry {
                ContainerEntry::Ability(ability) => abilities.push(ability),
                ContainerEntry::Skipped { key, reason } => {
                    self.emit(ExtractionEvent::EntrySkipped { key, reason });
                }
            }
        }

        match self.config.mode {
            ExecutionMode::Sequential => abilities
                .iter()
                .filter_map(|ability| self.extract_ability(ability))
                .collect(),
            // Collecting into a `Vec` keeps declaration order even after `filter_map`
            ExecutionMode::Parallel => abilities
                .par_iter()
                .filter_map(|ability| self.extract_ability(ability))
                .collect(),
        }
    }

    /// Process modules in order; a later module replaces an earlier one's
    /// ability wholesale.
    pub fn extract_sources(&self, modules: &[SourceModule]) -> Result<OutputIR> {
        if modules.is_empty() {
            return Err(Error::NoInputModules);
        }

        let mut output = OutputIR::new();
        for module in modules {
            for ability in self.extract_module(module) {
                let id = ability.id.clone();
                if output.insert(ability) {
                    self.emit(ExtractionEvent::AbilityOverridden { ability: id });
                }
            }
        }

        self.emit(ExtractionEvent::RunFinished { abilities: output.len() });
        Ok(output)
    }

    /// Read, parse and process files in order. Unreadable files are reported
    /// and skipped; only a run with no loadable file at all fails.
    pub fn extract_paths(&self, paths: &[PathBuf]) -> Result<OutputIR> {
        let modules: Vec<SourceModule> = paths
            .iter()
            .filter_map(|path| match SourceModule::load(path) {
                Ok(module) => Some(module),
                Err(e) => {
                    self.emit(ExtractionEvent::ModuleFailed {
                        path: path.clone(),
                        error: e.to_string(),
                    });
                    None
                }
            })
            .collect();

        self.extract_sources(&modules)
    }
}
