//! Number extraction from recognized price text.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Concatenate every ASCII digit run in `text` into one integer.
///
/// `"12 34"` reads as `1234`: OCR splits thousands groupings and currency
/// glyphs into separate runs, and the digits belong to one figure.
/// Returns `None` when the text has no digits or the result overflows.
pub fn concat_digit_runs(text: &str) -> Option<i64> {
    static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

    let digits: String = DIGITS_RE.find_iter(text).map(|m| m.as_str()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Verdict of the plausibility filter for one perceived number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plausibility {
    /// Inside the open bounds; used as-is.
    Accepted(i64),
    /// A ticket glyph was read as a leading digit; trailing digits kept.
    Corrected { raw: i64, value: i64 },
    /// Outside the bounds and not correctable.
    Rejected(i64),
}

impl Plausibility {
    pub fn value(self) -> Option<i64> {
        match self {
            Plausibility::Accepted(value) | Plausibility::Corrected { value, .. } => Some(value),
            Plausibility::Rejected(_) => None,
        }
    }
}

/// Sanity bounds for prices read off the trade screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceBounds {
    /// Values at or below this are rejected.
    pub floor: i64,
    /// Values at or above this are rejected unless correctable.
    pub ceiling: i64,
    /// Values at or above this are reduced modulo this and accepted.
    pub ticket_modulus: i64,
}

impl Default for PriceBounds {
    fn default() -> Self {
        Self {
            floor: 100,
            ceiling: 7000,
            ticket_modulus: 10_000,
        }
    }
}

impl PriceBounds {
    pub fn check(&self, value: i64) -> Plausibility {
        if value > self.floor && value < self.ceiling {
            return Plausibility::Accepted(value);
        }
        if value >= self.ticket_modulus {
            return Plausibility::Corrected {
                raw: value,
                value: value % self.ticket_modulus,
            };
        }
        Plausibility::Rejected(value)
    }
}
