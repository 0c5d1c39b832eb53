//! Default multipliers and fixed record constants
//!
//! Values used when a handler matches but carries no `chainModify` literal.

/// Same-type attack bonus raised by an Adaptability-style handler
pub const STAB_VALUE: f64 = 2.0;
pub const STAB_UPGRADE_FROM: f64 = 1.5;
pub const STAB_TERA_VALUE: f64 = 2.25;

pub const FIELD_DURATION_TURNS: u32 = 5;
pub const WEATHER_EXTEND_ITEM: &str = "icyrock";
pub const TERRAIN_EXTEND_ITEM: &str = "terrainextender";

pub const BITE_BOOST: f64 = 1.5;
pub const PUNCH_BOOST: f64 = 1.2;
pub const SLICING_BOOST: f64 = 1.5;
pub const PULSE_BOOST: f64 = 1.5;
pub const CONTACT_BOOST: f64 = 1.3;
pub const RECOIL_BOOST: f64 = 1.2;
pub const TECHNICIAN_BOOST: f64 = 1.5;
pub const TYPE_REWRITE_BOOST: f64 = 1.2;
pub const SHEER_FORCE_BOOST: f64 = 1.3;
pub const WEATHER_SPEED_BOOST: f64 = 2.0;
pub const WEATHER_POWER_BOOST: f64 = 1.3;

pub const PARADOX_SPEED_MULT: f64 = 1.5;
pub const PARADOX_OTHER_STAT_MULT: f64 = 1.3;

pub const ABSORB_HEAL: &str = "fraction";
pub const ABSORB_FRACTION: &str = "1/4";
pub const POISON_HEAL_FRACTION: &str = "1/8";
