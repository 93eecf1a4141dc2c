//! Collaborator seams for the game client and the task scheduler.
//!
//! The scan loop never talks to a screen, an OCR engine or the scheduler
//! directly. Everything goes through these traits so tests and replays can
//! substitute scripted implementations.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::core::types::RecognitionResult;

/// Cancel/back key code sent to close game pages.
pub const KEY_CANCEL: i32 = 27;

/// One captured screen image.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Monotonic capture counter assigned by the screen source.
    pub seq: u64,
    pub width: u32,
    pub height: u32,
    /// Encoded image bytes; opaque to the core.
    pub data: Arc<[u8]>,
}

impl Frame {
    /// A frame without pixel data, used by scripted screens.
    pub fn blank(seq: u64) -> Self {
        Self {
            seq,
            width: 0,
            height: 0,
            data: Arc::from(Vec::new()),
        }
    }
}

/// Screen capture service. Must reflect the screen at call time.
pub trait ScreenCapture {
    fn capture(&self) -> Result<Frame>;
}

/// Recognition service bound to named regions of interest.
pub trait Recognizer {
    fn recognize(&self, region: &str, frame: &Frame) -> Result<RecognitionResult>;
}

/// Input injection. Both calls return once the event was delivered.
pub trait InputDevice {
    fn click(&self, x: i32, y: i32) -> Result<()>;
    fn key_press(&self, code: i32) -> Result<()>;
}

/// Pause that lets UI animations finish before the next capture.
pub trait Pacer {
    fn settle(&self, delay: Duration);
}

/// Replaces the scheduler's next step after the current task.
pub trait TaskOverride {
    fn override_next(&self, current_task: &str, next: &[String]) -> Result<()>;
}

/// Operator-facing message display.
pub trait MessageSink {
    fn show_message(&self, text: &str) -> Result<()>;
}

/// Game-side collaborators used while scanning.
#[derive(Clone, Copy)]
pub struct Device<'a> {
    pub screen: &'a dyn ScreenCapture,
    pub recognizer: &'a dyn Recognizer,
    pub input: &'a dyn InputDevice,
    pub pacer: &'a dyn Pacer,
}

/// Scheduler-side collaborators used when presenting a decision.
#[derive(Clone, Copy)]
pub struct Host<'a> {
    pub tasks: &'a dyn TaskOverride,
    pub messages: &'a dyn MessageSink,
}

/// Pacer that blocks the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn settle(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// Pacer that returns immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

impl Pacer for NoDelay {
    fn settle(&self, _delay: Duration) {}
}
