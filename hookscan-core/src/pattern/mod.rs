//! Textual pattern primitives shared by detectors
//!
//! Every function here is a pure predicate or extractor over handler text.
//! None of them touch the parser, so they are testable on plain strings.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CHAIN_DECIMAL: Regex = Regex::new(r"chainModify\(\s*([0-9]*\.?[0-9]+)\s*\)").unwrap();
    static ref CHAIN_FRACTION: Regex =
        Regex::new(r"chainModify\(\s*\[\s*(\d+)\s*,\s*(\d+)\s*\]\s*\)").unwrap();
    static ref CHAIN_PERCENT: Regex =
        Regex::new(r"chainModify\(\s*\[\s*(\d{2,3})\s*,\s*(100)\s*\]\s*\)").unwrap();

    static ref STATUS_CATEGORY: Regex = Regex::new(r#"move\.category\s*===\s*['"`]Status['"`]"#).unwrap();
    static ref BLOCK_RETURN: Regex = Regex::new(r"\breturn\s+(?:false|null|undefined)\s*;").unwrap();
    static ref FALSE_RETURN: Regex = Regex::new(r"\breturn\s+false\s*;").unwrap();
    static ref IDENTIFIER_RETURN: Regex = Regex::new(r"\breturn\s+[a-zA-Z_]\w*\s*;").unwrap();

    static ref HP_PAIR: Regex =
        Regex::new(r"\b([A-Za-z_]\w*)\.hp\s*(?:===|>=)\s*([A-Za-z_]\w*)\.maxhp").unwrap();
    static ref HP_LOOSE: Regex = Regex::new(r"\b(hp)\s*(?:===|>=)\s*[^;]*\bmaxhp\b").unwrap();

    static ref FLAG_BITE: Regex = flag_regex("bite");
    static ref FLAG_PUNCH: Regex = flag_regex("punch");
    static ref FLAG_SLICING: Regex = flag_regex("slicing");
    static ref FLAG_PULSE: Regex = flag_regex("pulse|aura");
    static ref FLAG_CONTACT: Regex = flag_regex("contact");
    static ref FLAG_SOUND: Regex = flag_regex("sound");
    static ref FLAG_BULLET: Regex = flag_regex("bullet|ballistic");
}

fn flag_regex(alternatives: &str) -> Regex {
    let pattern = format!(r#"move\.flags\.(?:{alternatives})|move\.flags\[['"](?:{alternatives})['"]\]"#);
    Regex::new(&pattern).unwrap()
}

/// Extract the multiplier literal of a `chainModify(...)` call.
///
/// Forms are tried in priority order: decimal argument, two-integer list,
/// percent-over-100 list. A form whose value would be zero or non-finite
/// counts as not found and the next form is tried.
pub fn chain_modify_multiplier(text: &str) -> Option<f64> {
    let usable = |value: f64| (value.is_finite() && value > 0.0).then_some(value);

    let decimal = CHAIN_DECIMAL
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .and_then(usable);
    if decimal.is_some() {
        return decimal;
    }

    let ratio = |re: &Regex| {
        re.captures(text).and_then(|caps| {
            let numerator = caps[1].parse::<f64>().ok()?;
            let denominator = caps[2].parse::<f64>().ok()?;
            if denominator == 0.0 {
                return None;
            }
            usable(numerator / denominator)
        })
    };

    ratio(&CHAIN_FRACTION).or_else(|| ratio(&CHAIN_PERCENT))
}

/// `move.category === 'Status'`
pub fn checks_status_category(text: &str) -> bool {
    STATUS_CATEGORY.is_match(text)
}

/// `return false;`, `return null;` or `return undefined;`
pub fn returns_block(text: &str) -> bool {
    BLOCK_RETURN.is_match(text)
}

/// `return false;` only
pub fn returns_false(text: &str) -> bool {
    FALSE_RETURN.is_match(text)
}

/// `return <identifier>;`, the usual shape of a redirect
pub fn returns_identifier(text: &str) -> bool {
    IDENTIFIER_RETURN.is_match(text)
}

/// Any full-HP comparison between `hp` and `maxhp`
pub fn checks_full_hp(text: &str) -> bool {
    let same_subject = HP_PAIR
        .captures_iter(text)
        .any(|caps| caps[1] == caps[2]);
    same_subject || HP_LOOSE.is_match(text) || text.contains("Multiscale weaken")
}

/// Move flags recognised through `move.flags.x` or `move.flags['x']`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveFlag {
    Bite,
    Punch,
    Slicing,
    /// `pulse` or `aura`
    Pulse,
    Contact,
    Sound,
    /// `bullet` or `ballistic`
    Bullet,
}

impl MoveFlag {
    /// Tag name used in `when` conditions
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Bite => "bite",
            Self::Punch => "punch",
            Self::Slicing => "slicing",
            Self::Pulse => "pulse",
            Self::Contact => "contact",
            Self::Sound => "sound",
            Self::Bullet => "ballistic",
        }
    }

    fn regex(self) -> &'static Regex {
        match self {
            Self::Bite => &FLAG_BITE,
            Self::Punch => &FLAG_PUNCH,
            Self::Slicing => &FLAG_SLICING,
            Self::Pulse => &FLAG_PULSE,
            Self::Contact => &FLAG_CONTACT,
            Self::Sound => &FLAG_SOUND,
            Self::Bullet => &FLAG_BULLET,
        }
    }
}

pub fn checks_move_flag(text: &str, flag: MoveFlag) -> bool {
    flag.regex().is_match(text)
}

/// Weather families as they appear in `when` conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherGroup {
    Rain,
    Sun,
    Sand,
    Snow,
}

impl WeatherGroup {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rain => "rain",
            Self::Sun => "sun",
            Self::Sand => "sand",
            Self::Snow => "snow",
        }
    }

    fn mentioned_in(self, lowered: &str) -> bool {
        match self {
            Self::Rain => lowered.contains("rain"),
            Self::Sun => lowered.contains("sun") || lowered.contains("desolateland"),
            Self::Sand => lowered.contains("sandstorm"),
            Self::Snow => lowered.contains("snow") || lowered.contains("hail"),
        }
    }
}

impl std::fmt::Display for WeatherGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const SPEED_WEATHER_ORDER: [WeatherGroup; 4] =
    [WeatherGroup::Rain, WeatherGroup::Sun, WeatherGroup::Sand, WeatherGroup::Snow];

// "sun" hides inside unrelated identifiers, so sand is checked first here
const POWER_WEATHER_ORDER: [WeatherGroup; 4] =
    [WeatherGroup::Sand, WeatherGroup::Rain, WeatherGroup::Sun, WeatherGroup::Snow];

fn first_weather(lowered: &str, order: &[WeatherGroup]) -> Option<WeatherGroup> {
    order.iter().copied().find(|group| group.mentioned_in(lowered))
}

/// Weather group of a speed handler; expects lower-cased text
pub fn speed_weather(lowered: &str) -> Option<WeatherGroup> {
    first_weather(lowered, &SPEED_WEATHER_ORDER)
}

/// Weather group of a base-power handler; expects lower-cased text
pub fn power_weather(lowered: &str) -> Option<WeatherGroup> {
    first_weather(lowered, &POWER_WEATHER_ORDER)
}

/// First capture group of `re` in `text`, lower-cased
pub fn captured_lowercase(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}
