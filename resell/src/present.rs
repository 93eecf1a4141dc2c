//! Hands a decision back to the operator and the task scheduler.

use anyhow::{Context, Result};
use tracing::info;

use crate::core::types::{Decision, DecisionOutcome, NextStep, Pick, RecommendReason};
use crate::io::config::TaskConfig;
use crate::io::device::Host;

/// Operator message for an outcome; purchases are silent.
pub fn render_message(outcome: &DecisionOutcome) -> Option<String> {
    match outcome {
        DecisionOutcome::Purchase(_) => None,
        DecisionOutcome::SoldOut => Some("⚠️ Sold out: no items available to buy".to_string()),
        DecisionOutcome::Recommend {
            pick,
            reason: RecommendReason::QuotaOverflow { amount },
        } => Some(format!(
            "⚠️ Quota overflow\nTomorrow's quota will exceed its cap; buy {amount} item(s) today\n{}",
            recommendation(pick, "best profit")
        )),
        DecisionOutcome::Recommend {
            pick,
            reason: RecommendReason::BelowMinimum { .. },
        } => Some(format!(
            "💡 No item reaches the minimum profit; consider keeping the quota for tomorrow\n{}",
            recommendation(pick, "profit")
        )),
    }
}

/// Scheduler task name for the next step, if it changes.
pub fn next_task(next: &NextStep, tasks: &TaskConfig) -> Option<String> {
    match next {
        NextStep::Unchanged => None,
        NextStep::NextRegion => Some(tasks.next_region.clone()),
        NextStep::SelectProduct(cell) => Some(tasks.select_product_task(*cell)),
    }
}

/// Emit the operator message and the task override for `decision`.
///
/// Returns the task name the scheduler was pointed at, if any.
pub fn present(
    decision: &Decision,
    current_task: &str,
    host: Host<'_>,
    tasks: &TaskConfig,
) -> Result<Option<String>> {
    if let Some(message) = render_message(&decision.outcome) {
        host.messages
            .show_message(&message)
            .context("show operator message")?;
    }

    let next = next_task(&decision.next, tasks);
    if let Some(task) = &next {
        info!(current_task, next_task = %task, "overriding next task");
        host.tasks
            .override_next(current_task, std::slice::from_ref(task))
            .context("override next task")?;
    }
    Ok(next)
}

fn recommendation(pick: &Pick, label: &str) -> String {
    format!(
        "Recommended: row {} col {} ({label}: {})",
        pick.label.row, pick.label.col, pick.profit
    )
}
