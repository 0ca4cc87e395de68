use crate::error::CanonicalizationError;
use std::fmt;

/// Counts calls to the Hash N-Degree Quads algorithm against a hard
/// budget, derived once per canonicalization as
/// `complexity factor x number of blank nodes`. Crafted datasets can
/// otherwise drive the permutation search into exponential work.
pub(crate) struct HndqCallCounter {
    counter: usize,
    limit: usize,
}

impl HndqCallCounter {
    pub fn new(limit: usize) -> Self {
        Self { counter: 0, limit }
    }

    pub fn add(&mut self) -> Result<(), CanonicalizationError> {
        self.counter += 1;
        if self.counter > self.limit {
            Err(CanonicalizationError::ComplexityExceeded(self.limit))
        } else {
            Ok(())
        }
    }

    pub fn sum(&self) -> usize {
        self.counter
    }
}

impl fmt::Debug for HndqCallCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("")
            .field("counter", &self.counter)
            .field("limit", &self.limit)
            .finish()
    }
}
