//! Ordered candidate-list strategies over a recognition result.
//!
//! Each strategy looks at the head of one ranked list. Strategies are tried
//! in order and the first one that produces a value wins.

use crate::core::types::{Candidate, RecognitionResult};

/// One ranked list of a [`RecognitionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateList {
    Filtered,
    Best,
    All,
}

/// Order used for number reads.
pub const NUMBER_ORDER: &[CandidateList] = &[CandidateList::Best, CandidateList::All];

/// Order used for keyword probes.
pub const TEXT_ORDER: &[CandidateList] = &[
    CandidateList::Filtered,
    CandidateList::Best,
    CandidateList::All,
];

impl CandidateList {
    /// Top-ranked candidate of this list, if any.
    pub fn head(self, result: &RecognitionResult) -> Option<&Candidate> {
        let list = match self {
            CandidateList::Filtered => &result.filtered,
            CandidateList::Best => &result.best,
            CandidateList::All => &result.all,
        };
        list.first()
    }
}

/// Apply `extract` to the head of each list in `order`; first `Some` wins.
pub fn first_match<'a, T>(
    result: &'a RecognitionResult,
    order: &[CandidateList],
    mut extract: impl FnMut(&'a Candidate) -> Option<T>,
) -> Option<(CandidateList, T)> {
    order.iter().find_map(|&list| {
        list.head(result)
            .and_then(|candidate| extract(candidate))
            .map(|value| (list, value))
    })
}
