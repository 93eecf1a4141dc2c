//! Row-major traversal of the trade grid.
//!
//! Each cell follows a fixed protocol: read the list price, open the item,
//! confirm it has a friend-market entry, re-read the cost on the detail
//! page, open the friend list, read the top friend price, record the profit
//! and back out. A missing list price ends the row; any other miss skips
//! only the cell.

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{info, instrument};

use crate::core::ledger::ProfitLedger;
use crate::core::types::{GridPos, Point, ProfitRecord};
use crate::error::ConfigError;
use crate::io::config::ResellConfig;
use crate::io::device::{InputDevice, Pacer};
use crate::io::perception::Perception;

/// How a single cell ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOutcome {
    /// Profit recorded.
    Recorded(ProfitRecord),
    /// No list price: the row has no more items.
    EndOfRow,
    /// The item has no friend-market entry.
    NoFriendEntry,
    /// The friend list showed no readable sale price.
    NoSalePrice,
}

/// Drives the per-cell protocol over the configured grid.
pub struct GridScanner<'a> {
    perception: &'a Perception<'a>,
    input: &'a dyn InputDevice,
    pacer: &'a dyn Pacer,
    cfg: &'a ResellConfig,
    friend: Regex,
    back: Regex,
}

impl<'a> GridScanner<'a> {
    pub fn new(
        perception: &'a Perception<'a>,
        input: &'a dyn InputDevice,
        pacer: &'a dyn Pacer,
        cfg: &'a ResellConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            perception,
            input,
            pacer,
            cfg,
            friend: cfg.keywords.friend_pattern()?,
            back: cfg.keywords.return_pattern()?,
        })
    }

    /// Scan every row, top to bottom, left to right.
    ///
    /// Errors only come from the input device; perception misses are
    /// absorbed per cell or per row.
    #[instrument(skip_all, fields(rows = self.cfg.grid.rows, cols = self.cfg.grid.cols))]
    pub fn scan(&self) -> Result<ProfitLedger> {
        let mut ledger = ProfitLedger::new();
        for row in 1..=self.cfg.grid.rows {
            info!(row, "scanning row");
            for col in 1..=self.cfg.grid.cols {
                let pos = GridPos::new(row, col);
                match self.scan_cell(pos)? {
                    CellOutcome::Recorded(record) => ledger.push(record),
                    CellOutcome::EndOfRow => {
                        info!(row, col, "no price at cell, moving to next row");
                        break;
                    }
                    CellOutcome::NoFriendEntry | CellOutcome::NoSalePrice => {}
                }
            }
        }

        for (index, record) in ledger.records().iter().enumerate() {
            info!(
                no = index + 1,
                row = record.pos.row,
                col = record.pos.col,
                cost = record.cost_price,
                sale = record.sale_price,
                profit = record.profit,
                "scanned item"
            );
        }
        Ok(ledger)
    }

    /// Run the full protocol for one cell.
    #[instrument(skip_all, fields(row = pos.row, col = pos.col))]
    pub fn scan_cell(&self, pos: GridPos) -> Result<CellOutcome> {
        let regions = &self.cfg.regions;
        let pacing = &self.cfg.pacing;

        self.pacer.settle(pacing.cell_settle());
        let Some(listed) = self
            .perception
            .extract_number_with_center(&regions.price_region(pos))
        else {
            return Ok(CellOutcome::EndOfRow);
        };
        self.click(listed.center).context("open item detail")?;

        self.pacer.settle(pacing.cell_settle());
        let Some(friend_button) = self
            .perception
            .extract_text_with_center(&regions.view_friend_price, &self.friend)
        else {
            info!("item has no friend price entry, skipping");
            return Ok(CellOutcome::NoFriendEntry);
        };

        let cost_price = match self
            .perception
            .extract_number_with_center(&regions.detail_cost_price)
        {
            Some(detail) => detail.value,
            None => {
                info!(
                    listed = listed.value,
                    "detail cost unreadable, keeping list price"
                );
                listed.value
            }
        };
        info!(cost = cost_price, "cost price");
        self.click(friend_button).context("open friend prices")?;

        self.pacer.settle(pacing.friend_list_settle());
        let Some(sale) = self
            .perception
            .extract_number_with_center(&regions.friend_sale_price)
        else {
            info!("friend sale price unreadable, skipping");
            return Ok(CellOutcome::NoSalePrice);
        };

        let record = ProfitRecord::new(pos, cost_price, sale.value);
        info!(sale = record.sale_price, profit = record.profit, "profit recorded");

        self.close_pages()?;
        Ok(CellOutcome::Recorded(record))
    }

    /// Back out of the friend list, then out of the item detail.
    ///
    /// Missing affordances are fine; the page is already closed.
    fn close_pages(&self) -> Result<()> {
        let regions = &self.cfg.regions;
        let pacing = &self.cfg.pacing;

        self.pacer.settle(pacing.cell_settle());
        if self
            .perception
            .extract_text_with_center(&regions.return_button, &self.back)
            .is_some()
        {
            info!("leaving friend list");
            self.cancel().context("leave friend list")?;
        }

        self.pacer.settle(pacing.cell_settle());
        if self
            .perception
            .extract_text_with_center(&regions.view_friend_price, &self.friend)
            .is_some()
        {
            info!("closing item detail");
            self.cancel().context("close item detail")?;
        }
        Ok(())
    }

    fn click(&self, target: Point) -> Result<()> {
        self.input.click(target.x, target.y)
    }

    fn cancel(&self) -> Result<()> {
        self.input.key_press(self.cfg.cancel_key)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::core::types::{BoundingBox, Candidate};
    use crate::io::replay::{
        InputEvent, RecordingInput, RecordingPacer, ReplayRecognizer, ReplayScreen,
        ScriptedResponse,
    };

    const FRIEND: &str = "Resell_ROI_ViewFriendPrice";
    const DETAIL: &str = "Resell_ROI_DetailCostPrice";
    const SALE: &str = "Resell_ROI_FriendSalePrice";
    const BACK: &str = "Resell_ROI_ReturnButton";

    fn at(text: &str, x: i32, y: i32) -> ScriptedResponse {
        ScriptedResponse::best(vec![Candidate {
            text: text.to_string(),
            bbox: BoundingBox::new(x, y, 20, 10),
        }])
    }

    fn price(row: u32, col: u32) -> String {
        format!("Resell_ROI_Product_Row{row}_Col{col}_Price")
    }

    struct Rig {
        cfg: ResellConfig,
        screen: ReplayScreen,
        recognizer: ReplayRecognizer,
        input: RecordingInput,
        pacer: RecordingPacer,
    }

    impl Rig {
        fn new(rows: u32, cols: u32) -> Self {
            let mut cfg = ResellConfig::default();
            cfg.grid.rows = rows;
            cfg.grid.cols = cols;
            Self {
                cfg,
                screen: ReplayScreen::default(),
                recognizer: ReplayRecognizer::default(),
                input: RecordingInput::default(),
                pacer: RecordingPacer::default(),
            }
        }

        fn full_cell(&self, row: u32, col: u32, cost: &str, sale: &str) {
            let r = &self.recognizer;
            r.push(&price(row, col), at(cost, 100, 100));
            r.push(FRIEND, at("查看好友价格", 500, 600));
            r.push(DETAIL, at(cost, 0, 0));
            r.push(SALE, at(sale, 0, 0));
            r.push(BACK, at("返回", 0, 0));
            r.push(FRIEND, at("查看好友价格", 500, 600));
        }

        fn scan(&self) -> ProfitLedger {
            let perception =
                Perception::new(&self.screen, &self.recognizer, self.cfg.prices);
            GridScanner::new(&perception, &self.input, &self.pacer, &self.cfg)
                .expect("scanner")
                .scan()
                .expect("scan")
        }
    }

    #[test]
    fn full_cell_records_profit_and_backs_out() {
        let rig = Rig::new(1, 1);
        rig.full_cell(1, 1, "1200", "1450");

        let ledger = rig.scan();
        assert_eq!(
            ledger.records(),
            &[ProfitRecord::new(GridPos::new(1, 1), 1200, 1450)]
        );
        assert_eq!(
            rig.input.events(),
            vec![
                InputEvent::Click { x: 110, y: 105 },
                InputEvent::Click { x: 510, y: 605 },
                InputEvent::Key { code: 27 },
                InputEvent::Key { code: 27 },
            ]
        );
        assert_eq!(
            rig.pacer.delays(),
            vec![
                Duration::from_millis(200),
                Duration::from_millis(200),
                Duration::from_millis(600),
                Duration::from_millis(200),
                Duration::from_millis(200),
            ]
        );
    }

    #[test]
    fn detail_cost_overrides_list_price() {
        let rig = Rig::new(1, 1);
        let r = &rig.recognizer;
        r.push(&price(1, 1), at("1200", 100, 100));
        r.push(FRIEND, at("好友", 500, 600));
        r.push(DETAIL, at("1180", 0, 0));
        r.push(SALE, at("1400", 0, 0));

        let ledger = rig.scan();
        assert_eq!(ledger.records()[0].cost_price, 1180);
        assert_eq!(ledger.records()[0].profit, 220);
    }

    #[test]
    fn unreadable_detail_cost_keeps_list_price() {
        let rig = Rig::new(1, 1);
        let r = &rig.recognizer;
        r.push(&price(1, 1), at("1200", 100, 100));
        r.push(FRIEND, at("好友", 500, 600));
        r.push(DETAIL, at("??", 0, 0));
        r.push(DETAIL, at("99999999999999999999", 0, 0));
        r.push(SALE, at("1400", 0, 0));

        let ledger = rig.scan();
        assert_eq!(ledger.records()[0].cost_price, 1200);
        assert_eq!(r.remaining(DETAIL), 0);
    }

    #[test]
    fn missing_price_ends_the_row_not_the_scan() {
        let rig = Rig::new(2, 3);
        rig.full_cell(1, 1, "1200", "1300");
        rig.full_cell(2, 1, "2000", "2600");
        rig.full_cell(2, 2, "2100", "2150");
        rig.recognizer.push(&price(1, 3), at("2222", 0, 0));

        let ledger = rig.scan();
        let cells: Vec<GridPos> = ledger.records().iter().map(|r| r.pos).collect();
        assert_eq!(
            cells,
            vec![GridPos::new(1, 1), GridPos::new(2, 1), GridPos::new(2, 2)]
        );
        assert_eq!(rig.recognizer.remaining(&price(1, 3)), 1);
    }

    #[test]
    fn no_friend_entry_skips_cell_without_backing_out() {
        let rig = Rig::new(1, 2);
        let r = &rig.recognizer;
        r.push(&price(1, 1), at("1500", 100, 100));
        r.push(FRIEND, at("购买", 500, 600));
        rig.full_cell(1, 2, "1600", "1900");

        let ledger = rig.scan();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.records()[0].pos, GridPos::new(1, 2));
        let events = rig.input.events();
        assert_eq!(events[0], InputEvent::Click { x: 110, y: 105 });
        assert_eq!(events[1], InputEvent::Click { x: 110, y: 105 });
    }

    #[test]
    fn missing_sale_price_skips_cell() {
        let rig = Rig::new(1, 1);
        let r = &rig.recognizer;
        r.push(&price(1, 1), at("1500", 100, 100));
        r.push(FRIEND, at("好友", 500, 600));
        r.push(DETAIL, at("1500", 0, 0));

        let ledger = rig.scan();
        assert!(ledger.is_empty());
        assert_eq!(rig.input.events().len(), 2);
    }

    #[test]
    fn closing_is_best_effort() {
        let rig = Rig::new(1, 1);
        let r = &rig.recognizer;
        r.push(&price(1, 1), at("1500", 100, 100));
        r.push(FRIEND, at("好友", 500, 600));
        r.push(DETAIL, at("1500", 0, 0));
        r.push(SALE, at("1700", 0, 0));

        let ledger = rig.scan();
        assert_eq!(ledger.len(), 1);
        assert!(
            !rig.input
                .events()
                .iter()
                .any(|e| matches!(e, InputEvent::Key { .. }))
        );
    }

    #[test]
    fn input_failure_aborts_the_scan() {
        struct BrokenInput;
        impl InputDevice for BrokenInput {
            fn click(&self, _x: i32, _y: i32) -> Result<()> {
                Err(anyhow::anyhow!("controller disconnected"))
            }
            fn key_press(&self, _code: i32) -> Result<()> {
                Ok(())
            }
        }

        let rig = Rig::new(1, 1);
        rig.full_cell(1, 1, "1200", "1450");
        let perception = Perception::new(&rig.screen, &rig.recognizer, rig.cfg.prices);
        let err = GridScanner::new(&perception, &BrokenInput, &rig.pacer, &rig.cfg)
            .expect("scanner")
            .scan()
            .unwrap_err();
        assert!(format!("{err:#}").contains("controller disconnected"));
    }
}
