//! One resell invocation: forecast, scan, decide, present.

use anyhow::Result;
use serde::Serialize;
use tracing::{info, instrument};

use crate::core::decision::decide;
use crate::core::ledger::ProfitLedger;
use crate::core::params::SessionParams;
use crate::core::types::{Decision, DecisionOutcome, QuotaState};
use crate::forecast::QuotaForecaster;
use crate::io::config::ResellConfig;
use crate::io::device::{Device, Host};
use crate::io::perception::Perception;
use crate::present::present;
use crate::scan::GridScanner;

/// Scheduler task that invoked the session when none is given.
pub const DEFAULT_CURRENT_TASK: &str = "ResellMain";

/// Inputs that identify one session.
#[derive(Debug, Clone)]
pub struct SessionRequest {
    /// Task whose successor gets overridden.
    pub current_task: String,
    pub params: SessionParams,
}

/// Everything one session observed and decided.
///
/// Owned by the caller; nothing carries over to the next session.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSession {
    pub quota: QuotaState,
    pub overflow: i64,
    pub records: ProfitLedger,
    pub decision: Decision,
    pub next_task: Option<String>,
}

/// Run one full session against the given collaborators.
///
/// Configuration is validated before the first capture. Perception misses
/// never fail the session; device and host errors do.
#[instrument(skip_all, fields(current_task = %request.current_task, minimum_profit = request.params.minimum_profit))]
pub fn run_session(
    device: Device<'_>,
    host: Host<'_>,
    cfg: &ResellConfig,
    request: &SessionRequest,
) -> Result<ScanSession> {
    cfg.validate()?;
    info!("resell session started");

    let perception = Perception::new(device.screen, device.recognizer, cfg.prices);
    let forecaster = QuotaForecaster::new(&perception, device.pacer, cfg)?;
    let scanner = GridScanner::new(&perception, device.input, device.pacer, cfg)?;

    let quota = forecaster.forecast();
    let records = scanner.scan()?;
    let decision = decide(&records, &quota, request.params.minimum_profit);
    log_decision(&decision, request.params.minimum_profit);

    let next_task = present(&decision, &request.current_task, host, &cfg.tasks)?;
    info!(items = records.len(), "resell session finished");

    Ok(ScanSession {
        overflow: quota.overflow_amount(),
        quota,
        records,
        decision,
        next_task,
    })
}

fn log_decision(decision: &Decision, minimum_profit: i64) {
    match &decision.outcome {
        DecisionOutcome::SoldOut => info!("sold out, nothing to buy"),
        DecisionOutcome::Purchase(pick) => info!(
            row = pick.label.row,
            col = pick.label.col,
            profit = pick.profit,
            minimum_profit,
            "profit meets minimum, purchasing"
        ),
        DecisionOutcome::Recommend { pick, reason } => info!(
            row = pick.label.row,
            col = pick.label.col,
            profit = pick.profit,
            ?reason,
            "recommending without purchase"
        ),
    }
}
