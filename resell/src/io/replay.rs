//! Replay collaborators driven by a recorded recognition script.
//!
//! A replay script lists, per region, the recognition responses the game
//! produced in order. Each `recognize` call for a region consumes the next
//! response; an exhausted region yields an empty result, which reads as
//! "nothing on screen". Input, messages and task overrides are recorded so a
//! session can be inspected afterwards.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::{Candidate, RecognitionResult};
use crate::io::device::{
    Frame, InputDevice, MessageSink, Pacer, Recognizer, ScreenCapture, TaskOverride,
};

/// One scripted recognition response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptedResponse {
    /// When set, the recognizer fails with this message.
    pub error: Option<String>,
    pub filtered: Vec<Candidate>,
    pub best: Vec<Candidate>,
    pub all: Vec<Candidate>,
}

impl ScriptedResponse {
    pub fn best(candidates: Vec<Candidate>) -> Self {
        Self {
            best: candidates,
            ..Self::default()
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn into_result(self) -> Result<RecognitionResult> {
        if let Some(message) = self.error {
            return Err(anyhow!(message));
        }
        Ok(RecognitionResult {
            filtered: self.filtered,
            best: self.best,
            all: self.all,
        })
    }
}

/// Recorded recognition responses keyed by region name (TOML).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayScript {
    pub regions: BTreeMap<String, Vec<ScriptedResponse>>,
}

/// Load a replay script from a TOML file.
pub fn load_script(path: &Path) -> Result<ReplayScript> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))
}

/// Screen source that hands out blank, numbered frames.
#[derive(Debug, Default)]
pub struct ReplayScreen {
    captured: Cell<u64>,
    fail_after: Option<u64>,
}

impl ReplayScreen {
    /// A screen whose captures fail once `ok` frames were handed out.
    pub fn failing_after(ok: u64) -> Self {
        Self {
            captured: Cell::new(0),
            fail_after: Some(ok),
        }
    }

    /// Number of successful captures so far.
    pub fn captures(&self) -> u64 {
        self.captured.get()
    }
}

impl ScreenCapture for ReplayScreen {
    fn capture(&self) -> Result<Frame> {
        let seq = self.captured.get();
        if self.fail_after.is_some_and(|limit| seq >= limit) {
            return Err(anyhow!("screen unavailable"));
        }
        self.captured.set(seq + 1);
        Ok(Frame::blank(seq + 1))
    }
}

/// Recognizer that replays scripted responses per region.
#[derive(Debug, Default)]
pub struct ReplayRecognizer {
    queues: RefCell<HashMap<String, VecDeque<ScriptedResponse>>>,
    calls: RefCell<Vec<String>>,
}

impl ReplayRecognizer {
    pub fn from_script(script: ReplayScript) -> Self {
        let queues = script
            .regions
            .into_iter()
            .map(|(region, responses)| (region, responses.into()))
            .collect();
        Self {
            queues: RefCell::new(queues),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Queue one more response for `region`.
    pub fn push(&self, region: &str, response: ScriptedResponse) {
        self.queues
            .borrow_mut()
            .entry(region.to_string())
            .or_default()
            .push_back(response);
    }

    /// Responses not yet consumed for `region`.
    pub fn remaining(&self, region: &str) -> usize {
        self.queues.borrow().get(region).map_or(0, VecDeque::len)
    }

    /// Region names in the order they were recognized.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Recognizer for ReplayRecognizer {
    fn recognize(&self, region: &str, frame: &Frame) -> Result<RecognitionResult> {
        self.calls.borrow_mut().push(region.to_string());
        let next = self
            .queues
            .borrow_mut()
            .get_mut(region)
            .and_then(VecDeque::pop_front);
        debug!(region, frame = frame.seq, scripted = next.is_some(), "replay recognize");
        next.map_or_else(|| Ok(RecognitionResult::default()), ScriptedResponse::into_result)
    }
}

/// Input event captured by [`RecordingInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InputEvent {
    Click { x: i32, y: i32 },
    Key { code: i32 },
}

#[derive(Debug, Default)]
pub struct RecordingInput {
    events: RefCell<Vec<InputEvent>>,
}

impl RecordingInput {
    pub fn events(&self) -> Vec<InputEvent> {
        self.events.borrow().clone()
    }
}

impl InputDevice for RecordingInput {
    fn click(&self, x: i32, y: i32) -> Result<()> {
        self.events.borrow_mut().push(InputEvent::Click { x, y });
        Ok(())
    }

    fn key_press(&self, code: i32) -> Result<()> {
        self.events.borrow_mut().push(InputEvent::Key { code });
        Ok(())
    }
}

/// Pacer that records requested delays without sleeping.
#[derive(Debug, Default)]
pub struct RecordingPacer {
    delays: RefCell<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.borrow().clone()
    }
}

impl Pacer for RecordingPacer {
    fn settle(&self, delay: Duration) {
        self.delays.borrow_mut().push(delay);
    }
}

/// A recorded task override call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverrideCall {
    pub current_task: String,
    pub next: Vec<String>,
}

#[derive(Debug, Default)]
pub struct RecordingTasks {
    calls: RefCell<Vec<OverrideCall>>,
}

impl RecordingTasks {
    pub fn calls(&self) -> Vec<OverrideCall> {
        self.calls.borrow().clone()
    }
}

impl TaskOverride for RecordingTasks {
    fn override_next(&self, current_task: &str, next: &[String]) -> Result<()> {
        self.calls.borrow_mut().push(OverrideCall {
            current_task: current_task.to_string(),
            next: next.to_vec(),
        });
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingMessages {
    messages: RefCell<Vec<String>>,
}

impl RecordingMessages {
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl MessageSink for RecordingMessages {
    fn show_message(&self, text: &str) -> Result<()> {
        self.messages.borrow_mut().push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::BoundingBox;

    #[test]
    fn script_parses_from_toml() {
        let raw = r#"
[[regions.Resell_ROI_Product_Row1_Col1_Price]]
best = [{ text = "1200", bbox = { x = 10, y = 20, width = 30, height = 40 } }]

[[regions.Resell_ROI_Product_Row1_Col1_Price]]
error = "timeout"

[[regions.Resell_ROI_ViewFriendPrice]]
filtered = [{ text = "查看好友价格" }]
"#;
        let script: ReplayScript = toml::from_str(raw).expect("parse");
        let price = &script.regions["Resell_ROI_Product_Row1_Col1_Price"];
        assert_eq!(price.len(), 2);
        assert_eq!(price[0].best[0].bbox, BoundingBox::new(10, 20, 30, 40));
        assert_eq!(price[1].error.as_deref(), Some("timeout"));
        let friend = &script.regions["Resell_ROI_ViewFriendPrice"];
        assert_eq!(friend[0].filtered[0].bbox, BoundingBox::default());
    }

    #[test]
    fn recognizer_consumes_in_order_then_runs_dry() {
        let mut script = ReplayScript::default();
        script.regions.insert(
            "r".to_string(),
            vec![ScriptedResponse::error("busy"), ScriptedResponse::default()],
        );
        let recognizer = ReplayRecognizer::from_script(script);
        let frame = Frame::blank(1);

        assert!(recognizer.recognize("r", &frame).is_err());
        assert!(recognizer.recognize("r", &frame).expect("ok").is_empty());
        assert!(recognizer.recognize("r", &frame).expect("dry").is_empty());
        assert!(recognizer.recognize("other", &frame).expect("unknown").is_empty());
        assert_eq!(recognizer.calls(), vec!["r", "r", "r", "other"]);
    }

    #[test]
    fn failing_screen_counts_successes_only() {
        let screen = ReplayScreen::failing_after(1);
        assert_eq!(screen.capture().expect("first").seq, 1);
        assert!(screen.capture().is_err());
        assert_eq!(screen.captures(), 1);
    }
}
