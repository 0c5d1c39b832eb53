//! Fixed design constants and the name-based heuristic table

pub mod defaults;
pub mod name_table;

pub use name_table::{lookup_hint, normalize_ability_id};
