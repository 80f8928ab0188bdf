//! Masonry row spans for the staggered grid

use crate::random::RandomSource;

/// Inclusive range of grid row spans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanRange {
    pub min: u32,
    pub max: u32,
}

impl Default for SpanRange {
    fn default() -> Self {
        Self { min: 15, max: 60 }
    }
}

/// One random span per item, uniform within `range`
pub fn assign_spans<R: RandomSource + ?Sized>(
    item_count: usize,
    range: SpanRange,
    rng: &mut R,
) -> Vec<u32> {
    let (min, max) = if range.min <= range.max {
        (range.min, range.max)
    } else {
        (range.max, range.min)
    };
    (0..item_count).map(|_| rng.next_in_range(min, max)).collect()
}
