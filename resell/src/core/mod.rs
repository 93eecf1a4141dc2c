//! Deterministic, pure logic shared by the resell session.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data and return deterministic outputs suitable for tests.

pub mod candidates;
pub mod decision;
pub mod digits;
pub mod ledger;
pub mod params;
pub mod quota;
pub mod types;
