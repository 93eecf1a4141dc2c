//! Resell configuration stored in `resell.toml`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::digits::PriceBounds;
use crate::core::quota::IncrementGrammar;
use crate::core::types::GridPos;
use crate::error::ConfigError;
use crate::io::device::KEY_CANCEL;

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "resell.toml";

/// Resell configuration (TOML).
///
/// Region names must match the recognition pipeline of the game client.
/// Missing fields default to the values for the stock trade screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResellConfig {
    pub grid: GridConfig,
    pub regions: RegionConfig,
    pub keywords: KeywordConfig,
    pub pacing: PacingConfig,
    pub prices: PriceBounds,
    pub tasks: TaskConfig,
    /// Key code sent to back out of a page.
    pub cancel_key: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GridConfig {
    pub rows: u32,
    pub cols: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RegionConfig {
    /// List-page price region; `{row}` and `{col}` are substituted.
    pub price: String,
    pub view_friend_price: String,
    pub detail_cost_price: String,
    pub friend_sale_price: String,
    pub return_button: String,
    pub quota_current: String,
    pub quota_next_add: String,
}

/// Keyword patterns are regular expressions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeywordConfig {
    pub friend: String,
    pub return_button: String,
    pub hours_marker: String,
    pub minutes_marker: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PacingConfig {
    pub cell_settle_ms: u64,
    pub friend_list_settle_ms: u64,
    pub quota_settle_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TaskConfig {
    pub next_region: String,
    /// Purchase selector task; `{row}` and `{col}` are substituted.
    pub select_product: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { rows: 3, cols: 8 }
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            price: "Resell_ROI_Product_Row{row}_Col{col}_Price".to_string(),
            view_friend_price: "Resell_ROI_ViewFriendPrice".to_string(),
            detail_cost_price: "Resell_ROI_DetailCostPrice".to_string(),
            friend_sale_price: "Resell_ROI_FriendSalePrice".to_string(),
            return_button: "Resell_ROI_ReturnButton".to_string(),
            quota_current: "Resell_ROI_Quota_Current".to_string(),
            quota_next_add: "Resell_ROI_Quota_NextAdd".to_string(),
        }
    }
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            friend: "好友".to_string(),
            return_button: "返回".to_string(),
            hours_marker: "小时".to_string(),
            minutes_marker: "分钟".to_string(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            cell_settle_ms: 200,
            friend_list_settle_ms: 600,
            quota_settle_ms: 500,
        }
    }
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            next_region: "ChangeNextRegionPrepare".to_string(),
            select_product: "ResellSelectProductRow{row}Col{col}".to_string(),
        }
    }
}

impl Default for ResellConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            regions: RegionConfig::default(),
            keywords: KeywordConfig::default(),
            pacing: PacingConfig::default(),
            prices: PriceBounds::default(),
            tasks: TaskConfig::default(),
            cancel_key: KEY_CANCEL,
        }
    }
}

impl RegionConfig {
    pub fn price_region(&self, pos: GridPos) -> String {
        fill_cell(&self.price, pos)
    }
}

impl TaskConfig {
    pub fn select_product_task(&self, pos: GridPos) -> String {
        fill_cell(&self.select_product, pos)
    }
}

impl PacingConfig {
    pub fn cell_settle(&self) -> Duration {
        Duration::from_millis(self.cell_settle_ms)
    }

    pub fn friend_list_settle(&self) -> Duration {
        Duration::from_millis(self.friend_list_settle_ms)
    }

    pub fn quota_settle(&self) -> Duration {
        Duration::from_millis(self.quota_settle_ms)
    }
}

impl KeywordConfig {
    pub fn friend_pattern(&self) -> Result<Regex, ConfigError> {
        compile_keyword("keywords.friend", &self.friend)
    }

    pub fn return_pattern(&self) -> Result<Regex, ConfigError> {
        compile_keyword("keywords.return_button", &self.return_button)
    }

    pub fn increment_grammar(&self) -> Result<IncrementGrammar, ConfigError> {
        IncrementGrammar::new(&self.hours_marker, &self.minutes_marker)
            .map_err(|err| ConfigError::field("keywords.hours_marker", format!("{err:#}")))
    }
}

impl ResellConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.rows == 0 || self.grid.cols == 0 {
            return Err(ConfigError::field("grid", "rows and cols must be > 0"));
        }
        for (field, template) in [
            ("regions.price", &self.regions.price),
            ("tasks.select_product", &self.tasks.select_product),
        ] {
            if !template.contains("{row}") || !template.contains("{col}") {
                return Err(ConfigError::field(
                    field,
                    "must contain {row} and {col} placeholders",
                ));
            }
        }
        for (field, name) in [
            ("regions.view_friend_price", &self.regions.view_friend_price),
            ("regions.detail_cost_price", &self.regions.detail_cost_price),
            ("regions.friend_sale_price", &self.regions.friend_sale_price),
            ("regions.return_button", &self.regions.return_button),
            ("regions.quota_current", &self.regions.quota_current),
            ("regions.quota_next_add", &self.regions.quota_next_add),
            ("tasks.next_region", &self.tasks.next_region),
        ] {
            if name.trim().is_empty() {
                return Err(ConfigError::field(field, "must not be empty"));
            }
        }
        for (field, marker) in [
            ("keywords.hours_marker", &self.keywords.hours_marker),
            ("keywords.minutes_marker", &self.keywords.minutes_marker),
        ] {
            if marker.is_empty() {
                return Err(ConfigError::field(field, "must not be empty"));
            }
        }
        self.keywords.friend_pattern()?;
        self.keywords.return_pattern()?;
        let prices = &self.prices;
        if prices.floor < 0 || prices.floor >= prices.ceiling {
            return Err(ConfigError::field("prices", "floor must be >= 0 and < ceiling"));
        }
        if prices.ticket_modulus < prices.ceiling {
            return Err(ConfigError::field("prices.ticket_modulus", "must be >= ceiling"));
        }
        Ok(())
    }

    /// Render as TOML, for `resell check-config`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialize config toml")
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ResellConfig::default()`.
pub fn load_config(path: &Path) -> Result<ResellConfig> {
    if !path.exists() {
        let cfg = ResellConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ResellConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

fn fill_cell(template: &str, pos: GridPos) -> String {
    template
        .replace("{row}", &pos.row.to_string())
        .replace("{col}", &pos.col.to_string())
}

fn compile_keyword(field: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::field(field, "must not be empty"));
    }
    Regex::new(pattern).map_err(|err| ConfigError::field(field, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = ResellConfig::default();
        cfg.validate().expect("valid defaults");
        assert_eq!(cfg.grid, GridConfig { rows: 3, cols: 8 });
        assert_eq!(cfg.cancel_key, 27);
    }

    #[test]
    fn templates_fill_row_and_col() {
        let cfg = ResellConfig::default();
        let pos = GridPos::new(2, 7);
        assert_eq!(
            cfg.regions.price_region(pos),
            "Resell_ROI_Product_Row2_Col7_Price"
        );
        assert_eq!(
            cfg.tasks.select_product_task(pos),
            "ResellSelectProductRow2Col7"
        );
    }

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("absent.toml")).expect("load");
        assert_eq!(cfg, ResellConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("resell.toml");
        fs::write(
            &path,
            "[pacing]\ncell_settle_ms = 50\n\n[tasks]\nnext_region = \"NextTown\"\n",
        )
        .expect("write");

        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.pacing.cell_settle_ms, 50);
        assert_eq!(cfg.pacing.friend_list_settle_ms, 600);
        assert_eq!(cfg.tasks.next_region, "NextTown");
        assert_eq!(cfg.regions, RegionConfig::default());
    }

    #[test]
    fn invalid_keyword_is_a_config_error() {
        let mut cfg = ResellConfig::default();
        cfg.keywords.friend = "(unclosed".to_string();
        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Field {
                field: "keywords.friend",
                ..
            }
        ));
    }

    #[test]
    fn template_without_placeholders_is_rejected() {
        let mut cfg = ResellConfig::default();
        cfg.tasks.select_product = "BuyIt".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_surfaces_typed_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("resell.toml");
        fs::write(&path, "[grid]\nrows = 0\n").expect("write");

        let err = load_config(&path).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn round_trips_through_toml() {
        let cfg = ResellConfig::default();
        let rendered = cfg.to_toml().expect("toml");
        let parsed: ResellConfig = toml::from_str(&rendered).expect("parse");
        assert_eq!(parsed, cfg);
    }
}
