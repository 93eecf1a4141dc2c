//! Shared deterministic types for the resell core.
//!
//! These types define stable contracts between the scanner, the decision
//! engine and the presentation layer. They carry no I/O and serialize
//! deterministically so session reports stay stable across runs.

use serde::{Deserialize, Serialize};

/// Sentinel for a quota field that could not be perceived.
pub const UNKNOWN: i64 = -1;

/// A 1-based position on the item grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: u32,
    pub col: u32,
}

impl GridPos {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// A screen coordinate used as a click target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Axis-aligned bounding box reported by the recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center of the box, truncating odd extents.
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2,
            y: self.y + self.height / 2,
        }
    }
}

/// One recognized text fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub text: String,
    #[serde(default)]
    pub bbox: BoundingBox,
}

/// Ranked candidate lists returned by one recognition call.
///
/// `filtered` holds keyword-matched hits, `best` the recognizer's top
/// ranking, `all` every fragment it saw.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionResult {
    pub filtered: Vec<Candidate>,
    pub best: Vec<Candidate>,
    pub all: Vec<Candidate>,
}

impl RecognitionResult {
    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty() && self.best.is_empty() && self.all.is_empty()
    }
}

/// Profit observed for one grid cell.
///
/// Created once per cell where both the cost price and the friend sale
/// price were perceived; never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitRecord {
    pub pos: GridPos,
    pub cost_price: i64,
    pub sale_price: i64,
    pub profit: i64,
}

impl ProfitRecord {
    pub fn new(pos: GridPos, cost_price: i64, sale_price: i64) -> Self {
        Self {
            pos,
            cost_price,
            sale_price,
            profit: sale_price - cost_price,
        }
    }
}

/// Daily purchase quota as read from the quota banner.
///
/// Every field stays at [`UNKNOWN`] until parsed. `hours_until_increment`
/// is 0 when the banner counts in minutes or only shows the increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaState {
    pub current: i64,
    pub max: i64,
    pub hours_until_increment: i64,
    pub increment: i64,
}

impl Default for QuotaState {
    fn default() -> Self {
        Self {
            current: UNKNOWN,
            max: UNKNOWN,
            hours_until_increment: UNKNOWN,
            increment: UNKNOWN,
        }
    }
}

impl QuotaState {
    /// Amount by which the next increment would push the quota past its cap.
    ///
    /// Zero unless `current`, `max` and `increment` were all parsed.
    pub fn overflow_amount(&self) -> i64 {
        if self.current >= 0 && self.max > 0 && self.increment >= 0 {
            self.current + self.increment - self.max
        } else {
            0
        }
    }
}

/// Why a recommendation was issued instead of a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendReason {
    /// Tomorrow's increment would exceed the cap by `amount`.
    QuotaOverflow { amount: i64 },
    /// The best profit did not reach the configured minimum.
    BelowMinimum { minimum: i64 },
}

/// The chosen cell: `cell` is the scanned position, `label` the row-adjusted
/// position shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub cell: GridPos,
    pub label: GridPos,
    pub profit: i64,
}

/// Exactly one outcome is produced per scan session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DecisionOutcome {
    Purchase(Pick),
    Recommend { pick: Pick, reason: RecommendReason },
    SoldOut,
}

/// What the scheduler should run after this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum NextStep {
    /// Leave the scheduler's own successor in place.
    Unchanged,
    /// Move on to the next trading region.
    NextRegion,
    /// Open the purchase selector for this raw grid cell.
    SelectProduct(GridPos),
}

/// Decision engine output: the outcome plus its routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub outcome: DecisionOutcome,
    pub next: NextStep,
}
