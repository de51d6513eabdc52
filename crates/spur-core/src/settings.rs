//! Server-wide tunable settings.
//!
//! Settings are stored loosely typed because staff edit them by hand. The
//! typed accessors return `None` for a missing or malformed value, and the
//! calculators that read them fall back to their defaults instead of failing.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Extra action points charged for requesting a brand-new placeholder clue.
pub const NEW_CLUE_AP_COST: &str = "NEW_CLUE_AP_COST";
/// Flat amount added to every investigation's difficulty.
pub const INVESTIGATION_DIFFICULTY_MOD: &str = "INVESTIGATION_DIFFICULTY_MOD";
/// Scalar applied to every investigation roll.
pub const INVESTIGATION_PROGRESS_RATE: &str = "INVESTIGATION_PROGRESS_RATE";

/// Default for [`NEW_CLUE_AP_COST`].
pub const DEFAULT_NEW_CLUE_AP_COST: u32 = 50;
/// Default for [`INVESTIGATION_DIFFICULTY_MOD`].
pub const DEFAULT_DIFFICULTY_MOD: i64 = 5;
/// Default for [`INVESTIGATION_PROGRESS_RATE`].
pub const DEFAULT_PROGRESS_RATE: f64 = 1.0;

/// A loosely typed setting value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// A whole number.
    Integer(i64),
    /// A floating-point number.
    Float(f64),
    /// A boolean flag.
    Boolean(bool),
    /// Free text, possibly a number typed as a string.
    String(String),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for SettingValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for SettingValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

/// The server's configuration store for investigation knobs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    values: HashMap<String, SettingValue>,
}

impl GameSettings {
    /// Create an empty settings store. Every knob reads as its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a knob, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<SettingValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder form of [`GameSettings::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Raw access to a knob.
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    /// All knobs, sorted by key.
    pub fn entries(&self) -> Vec<(&str, &SettingValue)> {
        let mut entries: Vec<_> = self.values.iter().map(|(k, v)| (k.as_str(), v)).collect();
        entries.sort_by_key(|(k, _)| *k);
        entries
    }

    /// The new-clue surcharge in action points.
    pub fn new_clue_ap_cost(&self) -> u32 {
        extract_integer(&self.values, NEW_CLUE_AP_COST)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(DEFAULT_NEW_CLUE_AP_COST)
    }

    /// The flat difficulty modifier, or `None` when it is malformed.
    ///
    /// A missing key yields the default. Only a present but unreadable value
    /// yields `None`, which tells the difficulty calculator to skip its
    /// adjustment step.
    pub fn difficulty_mod(&self) -> Option<i64> {
        match self.values.get(INVESTIGATION_DIFFICULTY_MOD) {
            None => Some(DEFAULT_DIFFICULTY_MOD),
            Some(_) => extract_integer(&self.values, INVESTIGATION_DIFFICULTY_MOD),
        }
    }

    /// The roll scalar, or `None` when it is malformed.
    pub fn progress_rate(&self) -> Option<f64> {
        match self.values.get(INVESTIGATION_PROGRESS_RATE) {
            None => Some(DEFAULT_PROGRESS_RATE),
            Some(_) => extract_float(&self.values, INVESTIGATION_PROGRESS_RATE),
        }
    }
}

// --- Helper functions for reading loosely typed values ---

/// Extract an integer, accepting floats (truncated) and numeric strings.
fn extract_integer(values: &HashMap<String, SettingValue>, key: &str) -> Option<i64> {
    match values.get(key)? {
        SettingValue::Integer(n) => Some(*n),
        SettingValue::Float(f) if f.is_finite() => Some(*f as i64),
        SettingValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Extract a float, accepting integers and numeric strings.
fn extract_float(values: &HashMap<String, SettingValue>, key: &str) -> Option<f64> {
    match values.get(key)? {
        SettingValue::Integer(n) => Some(*n as f64),
        SettingValue::Float(f) if f.is_finite() => Some(*f),
        SettingValue::String(s) => s.trim().parse().ok().filter(|f: &f64| f.is_finite()),
        _ => None,
    }
}
