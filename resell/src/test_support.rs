//! Test-only helpers for scripting game screens and running sessions.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::types::{BoundingBox, Candidate};
use crate::io::device::{Device, Host};
use crate::io::replay::{
    RecordingInput, RecordingMessages, RecordingPacer, RecordingTasks, ReplayRecognizer,
    ReplayScreen, ReplayScript, ScriptedResponse,
};

pub const FRIEND_REGION: &str = "Resell_ROI_ViewFriendPrice";
pub const DETAIL_REGION: &str = "Resell_ROI_DetailCostPrice";
pub const SALE_REGION: &str = "Resell_ROI_FriendSalePrice";
pub const RETURN_REGION: &str = "Resell_ROI_ReturnButton";
pub const QUOTA_CURRENT_REGION: &str = "Resell_ROI_Quota_Current";
pub const QUOTA_NEXT_REGION: &str = "Resell_ROI_Quota_NextAdd";

/// Default list-page price region for a cell.
pub fn price_region(row: u32, col: u32) -> String {
    format!("Resell_ROI_Product_Row{row}_Col{col}_Price")
}

/// A `best` response with one candidate at a 20x10 box.
pub fn text_at(text: &str, x: i32, y: i32) -> ScriptedResponse {
    ScriptedResponse::best(vec![Candidate {
        text: text.to_string(),
        bbox: BoundingBox::new(x, y, 20, 10),
    }])
}

/// Builder for replay scripts that follow the per-cell protocol.
#[derive(Debug, Default, Clone)]
pub struct ScriptBuilder {
    script: ReplayScript,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, region: &str, response: ScriptedResponse) -> Self {
        self.script
            .regions
            .entry(region.to_string())
            .or_default()
            .push(response);
        self
    }

    pub fn quota(self, counter: &str, increment: &str) -> Self {
        self.push(QUOTA_CURRENT_REGION, text_at(counter, 0, 0))
            .push(QUOTA_NEXT_REGION, text_at(increment, 0, 0))
    }

    /// A cell that goes through every step and closes both pages.
    pub fn item(self, row: u32, col: u32, cost: i64, sale: i64) -> Self {
        let cost = cost.to_string();
        self.push(&price_region(row, col), text_at(&cost, 100, 100))
            .push(FRIEND_REGION, text_at("查看好友价格", 500, 600))
            .push(DETAIL_REGION, text_at(&cost, 0, 0))
            .push(SALE_REGION, text_at(&sale.to_string(), 0, 0))
            .push(RETURN_REGION, text_at("返回", 0, 0))
            .push(FRIEND_REGION, text_at("查看好友价格", 500, 600))
    }

    /// A cell whose item has no friend-market entry.
    pub fn no_friend_entry(self, row: u32, col: u32, cost: i64) -> Self {
        self.push(&price_region(row, col), text_at(&cost.to_string(), 100, 100))
            .push(FRIEND_REGION, text_at("购买", 500, 600))
    }

    pub fn build(self) -> ReplayScript {
        self.script
    }
}

/// Replay collaborators wired for one session.
#[derive(Debug, Default)]
pub struct Rig {
    pub screen: ReplayScreen,
    pub recognizer: ReplayRecognizer,
    pub input: RecordingInput,
    pub pacer: RecordingPacer,
    pub tasks: RecordingTasks,
    pub messages: RecordingMessages,
}

impl Rig {
    pub fn new(script: ReplayScript) -> Self {
        Self {
            recognizer: ReplayRecognizer::from_script(script),
            ..Self::default()
        }
    }

    pub fn device(&self) -> Device<'_> {
        Device {
            screen: &self.screen,
            recognizer: &self.recognizer,
            input: &self.input,
            pacer: &self.pacer,
        }
    }

    pub fn host(&self) -> Host<'_> {
        Host {
            tasks: &self.tasks,
            messages: &self.messages,
        }
    }
}

/// Write `script` as TOML into a fresh temp dir.
pub fn write_script(script: &ReplayScript) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("script.toml");
    let raw = toml::to_string_pretty(script).context("serialize script")?;
    std::fs::write(&path, raw).with_context(|| format!("write {}", path.display()))?;
    Ok((dir, path))
}
