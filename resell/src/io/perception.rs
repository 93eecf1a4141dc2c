//! Screen perception: capture, recognize a named region, interpret the text.
//!
//! Perception failures are soft. Every read returns `Option` and logs why it
//! came back empty; the caller decides whether to skip a cell or a row.

use regex::Regex;
use tracing::{debug, info, warn};

use crate::core::candidates::{NUMBER_ORDER, TEXT_ORDER, first_match};
use crate::core::digits::{Plausibility, PriceBounds, concat_digit_runs};
use crate::core::types::{Point, RecognitionResult};
use crate::io::device::{Frame, Recognizer, ScreenCapture};

/// A plausible number and the click target of the text it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberReading {
    pub value: i64,
    pub center: Point,
}

/// Wraps screen capture and recognition for region-level reads.
pub struct Perception<'a> {
    screen: &'a dyn ScreenCapture,
    recognizer: &'a dyn Recognizer,
    bounds: PriceBounds,
}

impl<'a> Perception<'a> {
    pub fn new(
        screen: &'a dyn ScreenCapture,
        recognizer: &'a dyn Recognizer,
        bounds: PriceBounds,
    ) -> Self {
        Self {
            screen,
            recognizer,
            bounds,
        }
    }

    /// Read a price from `region`, re-capturing once if the first read fails.
    pub fn extract_number_with_center(&self, region: &str) -> Option<NumberReading> {
        self.read_number_once(region).or_else(|| {
            debug!(region, "number read failed, retrying with a fresh capture");
            self.read_number_once(region)
        })
    }

    /// Find `keyword` in `region` and return the matching text's center.
    ///
    /// Single attempt; callers that need a retry probe again themselves.
    pub fn extract_text_with_center(&self, region: &str, keyword: &Regex) -> Option<Point> {
        let result = self.capture_and_recognize(region)?;
        match first_match(&result, TEXT_ORDER, |candidate| {
            keyword
                .is_match(&candidate.text)
                .then(|| (candidate.text.as_str(), candidate.bbox.center()))
        }) {
            Some((list, (text, center))) => {
                info!(region, text, keyword = keyword.as_str(), ?list, "keyword found");
                Some(center)
            }
            None => {
                info!(region, keyword = keyword.as_str(), "keyword not found");
                None
            }
        }
    }

    /// Capture one frame for several region reads.
    pub fn capture(&self) -> Option<Frame> {
        match self.screen.capture() {
            Ok(frame) => Some(frame),
            Err(err) => {
                warn!(error = %format!("{err:#}"), "screen capture failed");
                None
            }
        }
    }

    /// Recognize `region` on an already captured frame.
    pub fn recognize(&self, region: &str, frame: &Frame) -> Option<RecognitionResult> {
        match self.recognizer.recognize(region, frame) {
            Ok(result) if result.is_empty() => {
                info!(region, "region has no recognition results");
                None
            }
            Ok(result) => Some(result),
            Err(err) => {
                warn!(region, error = %format!("{err:#}"), "recognition failed");
                None
            }
        }
    }

    fn capture_and_recognize(&self, region: &str) -> Option<RecognitionResult> {
        let frame = self.capture()?;
        self.recognize(region, &frame)
    }

    fn read_number_once(&self, region: &str) -> Option<NumberReading> {
        let result = self.capture_and_recognize(region)?;
        let Some((_, (text, raw, center))) = first_match(&result, NUMBER_ORDER, |candidate| {
            concat_digit_runs(&candidate.text)
                .map(|raw| (candidate.text.as_str(), raw, candidate.bbox.center()))
        }) else {
            info!(region, "no digits in region");
            return None;
        };

        match self.bounds.check(raw) {
            Plausibility::Accepted(value) => {
                info!(region, text, value, "number read");
                Some(NumberReading { value, center })
            }
            Plausibility::Corrected { raw, value } => {
                info!(region, text, raw, value, "ticket digit stripped from number");
                Some(NumberReading { value, center })
            }
            Plausibility::Rejected(value) => {
                info!(region, text, value, "implausible number discarded");
                None
            }
        }
    }
}
