// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Codepoint ranges
//!
//! A [`RangeSet`] selects which codepoints are candidates for inclusion in an
//! atlas. Glyphs are packed in range order, ascending within each range; since
//! lookup uses a binary search over the resulting table, ranges must be
//! ascending and disjoint. This is checked on construction.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid range or range set
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeError {
    /// A range has `first > last`
    #[error("range U+{first:04X}..=U+{last:04X} is reversed")]
    Reversed { first: u32, last: u32 },
    /// A range starts before the preceding range
    #[error("range starting U+{first:04X} follows a range starting U+{prev:04X}")]
    Unordered { prev: u32, first: u32 },
    /// A range starts at or before the end of the preceding range
    #[error("range starting U+{first:04X} overlaps a range ending U+{prev_last:04X}")]
    Overlapping { prev_last: u32, first: u32 },
}

/// An inclusive range of codepoints
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CodepointRange {
    pub first: u32,
    pub last: u32,
}

impl CodepointRange {
    /// Construct `first..=last`
    pub fn new(first: u32, last: u32) -> Result<Self, RangeError> {
        if first > last {
            return Err(RangeError::Reversed { first, last });
        }
        Ok(CodepointRange { first, last })
    }

    /// A range covering one codepoint
    #[inline]
    pub fn single(c: u32) -> Self {
        CodepointRange { first: c, last: c }
    }

    /// Number of codepoints covered
    #[inline]
    pub fn len(&self) -> usize {
        (self.last - self.first) as usize + 1
    }

    /// True if `c` lies within the range
    #[inline]
    pub fn contains(&self, c: u32) -> bool {
        self.first <= c && c <= self.last
    }

    /// Iterate over covered codepoints
    #[inline]
    pub fn iter(&self) -> std::ops::RangeInclusive<u32> {
        self.first..=self.last
    }
}

/// A validated list of ascending, disjoint codepoint ranges
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RangeSet(Vec<CodepointRange>);

impl RangeSet {
    /// Basic Latin (printable ASCII)
    pub const BASIC_LATIN: CodepointRange = CodepointRange {
        first: 0x20,
        last: 0x7E,
    };
    /// Latin-1 Supplement (printable)
    pub const LATIN_1: CodepointRange = CodepointRange {
        first: 0xA0,
        last: 0xFF,
    };

    /// Basic Latin followed by Latin-1 Supplement
    pub fn latin() -> Self {
        RangeSet(vec![Self::BASIC_LATIN, Self::LATIN_1])
    }

    /// Construct, validating order
    pub fn new(ranges: impl IntoIterator<Item = CodepointRange>) -> Result<Self, RangeError> {
        let ranges: Vec<CodepointRange> = ranges.into_iter().collect();
        let mut prev: Option<CodepointRange> = None;
        for r in &ranges {
            if r.first > r.last {
                return Err(RangeError::Reversed {
                    first: r.first,
                    last: r.last,
                });
            }
            if let Some(p) = prev {
                if r.first < p.first {
                    return Err(RangeError::Unordered {
                        prev: p.first,
                        first: r.first,
                    });
                }
                if r.first <= p.last {
                    return Err(RangeError::Overlapping {
                        prev_last: p.last,
                        first: r.first,
                    });
                }
            }
            prev = Some(*r);
        }
        Ok(RangeSet(ranges))
    }

    /// Construct from `(first, last)` pairs
    pub fn from_pairs(pairs: &[(u32, u32)]) -> Result<Self, RangeError> {
        Self::new(pairs.iter().map(|&(first, last)| CodepointRange { first, last }))
    }

    /// Access ranges
    #[inline]
    pub fn ranges(&self) -> &[CodepointRange] {
        &self.0
    }

    /// Number of candidate codepoints
    pub fn len(&self) -> usize {
        self.0.iter().map(|r| r.len()).sum()
    }

    /// True if no codepoints are selected
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all candidate codepoints, in order
    pub fn codepoints(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().flat_map(|r| r.iter())
    }
}
