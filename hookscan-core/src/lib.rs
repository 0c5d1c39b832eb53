//! hookscan core - ability hook extraction engine
//!
//! This crate turns the imperative event handlers of a battle simulator's
//! ability table into a declarative hook IR:
//! - `source`: TypeScript parsing, the `Abilities` locator and the owned
//!   per-ability view detectors consume
//! - `pattern`: pure textual predicates shared by detectors
//! - `detectors`: the detector registry
//! - `constants`: fixed design constants and the name-based heuristic table
//! - `models`: hook records, the per-ability accumulator and the output IR
//! - `analysis`: the extraction orchestrator and its event stream

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
)]
#![allow(
    clippy::module_name_repetitions,  // Often necessary for clarity
)]

pub mod analysis;
pub mod constants;
pub mod detectors;
pub mod models;
pub mod pattern;
pub mod source;

pub use analysis::{
    events::{CollectingSink, EventSink, ExtractionEvent, TracingSink},
    Extractor,
};
pub use detectors::{DetectorRegistry, HookDetector};
pub use models::{AbilityIR, HookAccumulator, HookKey, HookRecord, OutputIR};
pub use source::{AbilitySource, SourceModule};

/// Result type used throughout hookscan core
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for hookscan core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// A detector hit input it could not interpret
    #[error("Detector error: {detector}: {message}")]
    Detector { detector: &'static str, message: String },

    /// No source module could be loaded; the only fatal extraction outcome
    #[error("No input modules were loaded")]
    NoInputModules,
}

/// How the per-ability detector pass is scheduled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One ability after another on the calling thread
    #[default]
    Sequential,
    /// Abilities of a module fan out over the rayon pool; results are merged
    /// back in declaration order
    Parallel,
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::Parallel => write!(f, "parallel"),
        }
    }
}

impl std::str::FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "parallel" => Ok(Self::Parallel),
            _ => Err(format!("Invalid execution mode: '{s}'. Valid options: sequential, parallel")),
        }
    }
}

/// Runtime configuration for the extraction core
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CoreConfig {
    pub mode: ExecutionMode,
}

impl CoreConfig {
    pub fn parallel() -> Self {
        Self { mode: ExecutionMode::Parallel }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let detector = Error::Detector { detector: "priority_shift", message: "delta overflows i8".into() };
        assert_eq!(detector.to_string(), "Detector error: priority_shift: delta overflows i8");
        assert_eq!(Error::NoInputModules.to_string(), "No input modules were loaded");

        let io: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "abilities.ts").into();
        assert!(matches!(io, Error::Io(_)));
    }

    #[test]
    fn test_execution_mode_parsing() {
        assert_eq!("Parallel".parse::<ExecutionMode>(), Ok(ExecutionMode::Parallel));
        assert_eq!(ExecutionMode::default(), ExecutionMode::Sequential);
        assert!("threaded".parse::<ExecutionMode>().is_err());
        assert_eq!(CoreConfig::parallel().mode.to_string(), "parallel");
    }
}
