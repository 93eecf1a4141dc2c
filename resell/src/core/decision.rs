//! Deterministic purchase decision for a finished scan.

use crate::core::ledger::ProfitLedger;
use crate::core::types::{
    Decision, DecisionOutcome, GridPos, NextStep, Pick, QuotaState, RecommendReason,
};

/// Row label the game shows for a scanned row.
///
/// Scanned rows 2 and up are reported one lower. Only the operator-facing
/// label is shifted; purchase routing keeps the scanned row.
// TODO: confirm with the product owner whether the purchase selector should
// use the shifted row too; the two currently disagree for rows >= 2.
pub fn display_row(row: u32) -> u32 {
    if row >= 2 { row - 1 } else { row }
}

/// Decide what to do with the scanned grid.
///
/// Rules, in order: no records is `SoldOut`; a positive quota overflow
/// recommends the best item and moves on; a best profit at or above
/// `minimum_profit` buys it; otherwise the best item is only recommended.
pub fn decide(ledger: &ProfitLedger, quota: &QuotaState, minimum_profit: i64) -> Decision {
    let Some(best) = ledger.max_profit() else {
        return Decision {
            outcome: DecisionOutcome::SoldOut,
            next: NextStep::Unchanged,
        };
    };

    let pick = Pick {
        cell: best.pos,
        label: GridPos::new(display_row(best.pos.row), best.pos.col),
        profit: best.profit,
    };

    let overflow = quota.overflow_amount();
    if overflow > 0 {
        return Decision {
            outcome: DecisionOutcome::Recommend {
                pick,
                reason: RecommendReason::QuotaOverflow { amount: overflow },
            },
            next: NextStep::NextRegion,
        };
    }

    if best.profit >= minimum_profit {
        return Decision {
            outcome: DecisionOutcome::Purchase(pick),
            next: NextStep::SelectProduct(best.pos),
        };
    }

    Decision {
        outcome: DecisionOutcome::Recommend {
            pick,
            reason: RecommendReason::BelowMinimum {
                minimum: minimum_profit,
            },
        },
        next: NextStep::NextRegion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ProfitRecord;

    fn ledger(entries: &[(u32, u32, i64)]) -> ProfitLedger {
        entries
            .iter()
            .map(|&(row, col, profit)| ProfitRecord::new(GridPos::new(row, col), 2000, 2000 + profit))
            .collect()
    }

    fn quota_with_overflow(amount: i64) -> QuotaState {
        QuotaState {
            current: 5000 - 300 + amount,
            max: 5000,
            hours_until_increment: 3,
            increment: 300,
        }
    }

    #[test]
    fn display_row_shifts_rows_after_the_first() {
        assert_eq!(display_row(1), 1);
        assert_eq!(display_row(2), 1);
        assert_eq!(display_row(3), 2);
    }

    #[test]
    fn empty_ledger_is_sold_out() {
        let decision = decide(&ProfitLedger::new(), &quota_with_overflow(50), 100);
        assert_eq!(decision.outcome, DecisionOutcome::SoldOut);
        assert_eq!(decision.next, NextStep::Unchanged);
    }

    #[test]
    fn overflow_recommends_regardless_of_threshold() {
        let quota = quota_with_overflow(5);
        assert_eq!(quota.overflow_amount(), 5);

        let decision = decide(&ledger(&[(3, 4, 30)]), &quota, 100);
        assert_eq!(
            decision.outcome,
            DecisionOutcome::Recommend {
                pick: Pick {
                    cell: GridPos::new(3, 4),
                    label: GridPos::new(2, 4),
                    profit: 30,
                },
                reason: RecommendReason::QuotaOverflow { amount: 5 },
            }
        );
        assert_eq!(decision.next, NextStep::NextRegion);

        let rich = decide(&ledger(&[(1, 1, 900)]), &quota, 100);
        assert!(matches!(rich.outcome, DecisionOutcome::Recommend { .. }));
    }

    #[test]
    fn profitable_item_is_purchased_at_raw_cell() {
        let decision = decide(&ledger(&[(1, 2, 40), (2, 6, 150)]), &QuotaState::default(), 100);
        assert_eq!(
            decision.outcome,
            DecisionOutcome::Purchase(Pick {
                cell: GridPos::new(2, 6),
                label: GridPos::new(1, 6),
                profit: 150,
            })
        );
        assert_eq!(decision.next, NextStep::SelectProduct(GridPos::new(2, 6)));
    }

    #[test]
    fn threshold_is_inclusive() {
        let decision = decide(&ledger(&[(1, 1, 100)]), &QuotaState::default(), 100);
        assert!(matches!(decision.outcome, DecisionOutcome::Purchase(_)));
    }

    #[test]
    fn below_minimum_only_recommends() {
        let decision = decide(&ledger(&[(1, 5, 50)]), &quota_with_overflow(0), 100);
        assert_eq!(
            decision.outcome,
            DecisionOutcome::Recommend {
                pick: Pick {
                    cell: GridPos::new(1, 5),
                    label: GridPos::new(1, 5),
                    profit: 50,
                },
                reason: RecommendReason::BelowMinimum { minimum: 100 },
            }
        );
        assert_eq!(decision.next, NextStep::NextRegion);
    }

    #[test]
    fn same_inputs_same_decision() {
        let records = ledger(&[(1, 3, 50), (2, 1, 80), (3, 2, 80)]);
        let quota = quota_with_overflow(-20);
        let first = decide(&records, &quota, 60);
        for _ in 0..3 {
            assert_eq!(decide(&records, &quota, 60), first);
        }
        assert_eq!(first.next, NextStep::SelectProduct(GridPos::new(2, 1)));
    }
}
