//! In-memory profit records for one scan session.

use serde::Serialize;

use crate::core::types::ProfitRecord;

/// Ordered profit records, in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProfitLedger {
    records: Vec<ProfitRecord>,
}

impl ProfitLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ProfitRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ProfitRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record with the highest profit; the earliest one wins ties.
    ///
    /// `None` means no items were found.
    pub fn max_profit(&self) -> Option<&ProfitRecord> {
        self.records.iter().fold(None, |best, record| match best {
            Some(current) if current.profit >= record.profit => Some(current),
            _ => Some(record),
        })
    }
}

impl FromIterator<ProfitRecord> for ProfitLedger {
    fn from_iter<I: IntoIterator<Item = ProfitRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
