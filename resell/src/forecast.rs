//! Quota forecasting from the quota banner.

use tracing::{info, instrument};

use crate::core::candidates::{CandidateList, first_match};
use crate::core::quota::{IncrementGrammar, parse_counter};
use crate::core::types::QuotaState;
use crate::error::ConfigError;
use crate::io::config::ResellConfig;
use crate::io::device::{Frame, Pacer};
use crate::io::perception::Perception;

const BANNER_ORDER: &[CandidateList] = &[CandidateList::Best, CandidateList::All];

/// Reads the remaining quota and the next increment from one screenshot.
///
/// Never fails: anything it cannot read stays unknown, which the decision
/// engine treats as "no overflow".
pub struct QuotaForecaster<'a> {
    perception: &'a Perception<'a>,
    pacer: &'a dyn Pacer,
    cfg: &'a ResellConfig,
    grammar: IncrementGrammar,
}

impl<'a> QuotaForecaster<'a> {
    pub fn new(
        perception: &'a Perception<'a>,
        pacer: &'a dyn Pacer,
        cfg: &'a ResellConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            perception,
            pacer,
            cfg,
            grammar: cfg.keywords.increment_grammar()?,
        })
    }

    #[instrument(skip_all)]
    pub fn forecast(&self) -> QuotaState {
        let mut quota = QuotaState::default();
        self.pacer.settle(self.cfg.pacing.quota_settle());
        let Some(frame) = self.perception.capture() else {
            info!("no screenshot for quota banner, assuming no overflow");
            return quota;
        };

        let regions = &self.cfg.regions;
        if let Some(text) = self.banner_text(&regions.quota_current, &frame) {
            match parse_counter(&text) {
                Some((current, max)) => {
                    info!(text = %text, current, max, "quota counter parsed");
                    quota.current = current;
                    quota.max = max;
                }
                None => info!(text = %text, "quota counter not recognized"),
            }
        }

        if let Some(text) = self.banner_text(&regions.quota_next_add, &frame) {
            match self.grammar.parse(&text) {
                Some(increment) => {
                    info!(
                        text = %text,
                        hours = increment.hours,
                        amount = increment.amount,
                        "quota increment parsed"
                    );
                    quota.hours_until_increment = increment.hours;
                    quota.increment = increment.amount;
                }
                None => info!(text = %text, "quota increment not recognized"),
            }
        }

        info!(
            current = quota.current,
            max = quota.max,
            increment = quota.increment,
            overflow = quota.overflow_amount(),
            "quota forecast"
        );
        quota
    }

    fn banner_text(&self, region: &str, frame: &Frame) -> Option<String> {
        let result = self.perception.recognize(region, frame)?;
        first_match(&result, BANNER_ORDER, |candidate| {
            (!candidate.text.is_empty()).then(|| candidate.text.clone())
        })
        .map(|(_, text)| text)
    }
}
