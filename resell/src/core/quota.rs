//! Grammars for the quota banner.
//!
//! The banner has two parts: a `<current>/<max>` counter and an increment
//! announcement such as `2 小时后+300`, `45 分钟后+300` or just `+300`.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

/// Parsed increment announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Increment {
    /// Hours until the increment lands; 0 for minute countdowns or unknown.
    pub hours: i64,
    pub amount: i64,
}

/// Parse `<current>/<max>` anywhere in `text`.
pub fn parse_counter(text: &str) -> Option<(i64, i64)> {
    static COUNTER_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([0-9]+)/([0-9]+)").unwrap());

    let caps = COUNTER_RE.captures(text)?;
    let current = caps[1].parse().ok()?;
    let max = caps[2].parse().ok()?;
    Some((current, max))
}

/// Increment grammars, tried in order: hours, minutes, bare `+N`.
#[derive(Debug, Clone)]
pub struct IncrementGrammar {
    hours: Regex,
    minutes: Regex,
    bare: Regex,
}

impl IncrementGrammar {
    /// Build the grammar for the given hour/minute unit markers.
    pub fn new(hours_marker: &str, minutes_marker: &str) -> Result<Self> {
        let unit = |marker: &str| {
            let pattern = format!(r"([0-9]+)\s*{}.*?[+]\s*([0-9]+)", regex::escape(marker));
            Regex::new(&pattern).with_context(|| format!("compile quota pattern for '{marker}'"))
        };
        Ok(Self {
            hours: unit(hours_marker)?,
            minutes: unit(minutes_marker)?,
            bare: Regex::new(r"[+]\s*([0-9]+)").context("compile bare increment pattern")?,
        })
    }

    /// First grammar that matches wins.
    pub fn parse(&self, text: &str) -> Option<Increment> {
        if let Some(caps) = self.hours.captures(text) {
            return Some(Increment {
                hours: caps[1].parse().ok()?,
                amount: caps[2].parse().ok()?,
            });
        }
        if let Some(caps) = self.minutes.captures(text) {
            return Some(Increment {
                hours: 0,
                amount: caps[2].parse().ok()?,
            });
        }
        let caps = self.bare.captures(text)?;
        Some(Increment {
            hours: 0,
            amount: caps[1].parse().ok()?,
        })
    }
}
