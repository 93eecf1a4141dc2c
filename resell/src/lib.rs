//! Grid-scanning resell decision engine.
//!
//! Walks the trade grid of the game client, reads each item's cost and the
//! best friend sale price through OCR, forecasts the daily purchase quota
//! and decides whether to buy, recommend or move on. The architecture
//! enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (price parsing, quota grammars,
//!   the ledger and the decision rule). No I/O, fully testable in isolation.
//! - **[`io`]**: Collaborator traits for the screen, recognizer, input and
//!   scheduler, plus the perception adapter and configuration.
//!
//! Orchestration modules ([`forecast`], [`scan`], [`present`], [`session`])
//! combine the two into one session.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod forecast;
pub mod io;
pub mod logging;
pub mod present;
pub mod scan;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
