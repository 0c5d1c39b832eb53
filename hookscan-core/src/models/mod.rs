//! Data models for the hook IR
//!
//! `hooks` holds the record vocabulary; `ir` holds the per-ability
//! accumulator and the cross-module output mapping.

pub mod hooks;
pub mod ir;

pub use hooks::{HookKey, HookRecord, NoteKind};
pub use ir::{AbilityIR, HookAccumulator, OutputIR};
