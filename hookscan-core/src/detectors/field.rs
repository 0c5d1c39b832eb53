//! Weather and terrain: setting them on entry, and stat/power boosts under them

use super::{Hook, HookDetector};
use crate::constants::defaults::{
    FIELD_DURATION_TURNS, TERRAIN_EXTEND_ITEM, WEATHER_EXTEND_ITEM, WEATHER_POWER_BOOST, WEATHER_SPEED_BOOST,
};
use crate::models::hooks::StateAction;
use crate::models::{HookKey, HookRecord};
use crate::pattern::{captured_lowercase, chain_modify_multiplier, power_weather, speed_weather};
use crate::source::{AbilitySource, CallArgument};
use crate::Result;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref POWER_TYPE: Regex =
        Regex::new(r#"(?i)move\.type\s*===\s*['"`](rock|ground|steel|water|fire|ice|electric)['"`]"#).unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Weather,
    Terrain,
}

/// `setWeather('x')` / `setTerrain('x')` anywhere in the ability
#[derive(Debug, Clone, Copy)]
pub struct FieldStateDetector {
    kind: FieldKind,
}

impl FieldStateDetector {
    pub const fn weather() -> Self {
        Self { kind: FieldKind::Weather }
    }

    pub const fn terrain() -> Self {
        Self { kind: FieldKind::Terrain }
    }

    const fn callee(self) -> &'static str {
        match self.kind {
            FieldKind::Weather => "setWeather",
            FieldKind::Terrain => "setTerrain",
        }
    }

    fn action(self, value: String) -> StateAction {
        match self.kind {
            FieldKind::Weather => StateAction::SetWeather {
                weather: value,
                duration_turns: FIELD_DURATION_TURNS,
                item_extend: WEATHER_EXTEND_ITEM.to_string(),
            },
            FieldKind::Terrain => StateAction::SetTerrain {
                terrain: value,
                duration_turns: FIELD_DURATION_TURNS,
                item_extend: TERRAIN_EXTEND_ITEM.to_string(),
            },
        }
    }
}

impl HookDetector for FieldStateDetector {
    fn name(&self) -> &'static str {
        match self.kind {
            FieldKind::Weather => "set_weather",
            FieldKind::Terrain => "set_terrain",
        }
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        // Only the first matching call counts, even if its argument is dynamic
        let Some(call) = ability.first_call_ending_with(self.callee()) else {
            return Ok(Vec::new());
        };
        let Some(CallArgument::StringLiteral(value)) = &call.first_argument else {
            return Ok(Vec::new());
        };
        Ok(vec![(HookKey::OnSwitchIn, HookRecord::Action(self.action(value.clone())))])
    }
}

/// `onModifySpe` doubling speed under a weather
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherSpeedDetector;

impl HookDetector for WeatherSpeedDetector {
    fn name(&self) -> &'static str {
        "weather_speed"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        let Some(body) = ability.handler("onModifySpe").and_then(|h| h.body.as_deref()) else {
            return Ok(Vec::new());
        };
        let lowered = body.to_lowercase();
        let Some(weather) = speed_weather(&lowered) else {
            return Ok(Vec::new());
        };
        let multiply = chain_modify_multiplier(body).unwrap_or(WEATHER_SPEED_BOOST);
        Ok(vec![(HookKey::OnModifySpe, HookRecord::modifier(format!("weather:{weather}"), multiply))])
    }
}

/// `onBasePower` boosting certain move types under a weather
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherPowerDetector;

impl HookDetector for WeatherPowerDetector {
    fn name(&self) -> &'static str {
        "weather_power"
    }

    fn detect(&self, ability: &AbilitySource) -> Result<Vec<Hook>> {
        let Some(body) = ability.handler("onBasePower").and_then(|h| h.body.as_deref()) else {
            return Ok(Vec::new());
        };
        let lowered = body.to_lowercase();
        let Some(weather) = power_weather(&lowered) else {
            return Ok(Vec::new());
        };
        let Some(move_type) = captured_lowercase(&POWER_TYPE, &lowered) else {
            return Ok(Vec::new());
        };
        let multiply = chain_modify_multiplier(body).unwrap_or(WEATHER_POWER_BOOST);
        Ok(vec![(
            HookKey::OnBasePower,
            HookRecord::modifier(format!("weather:{weather}:type:{move_type}"), multiply),
        )])
    }
}
