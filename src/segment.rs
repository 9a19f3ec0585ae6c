// Copyright 2022 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Sequence ranges occupied by arriving segments.

use core::fmt;
use core::ops::Range;

use crate::error::RangeError;
use crate::seqnum::SeqNum;

/// The maximum length of a scored range.
///
/// Beyond this bound the modular order of the two edges is ambiguous, so
/// longer ranges are rejected at construction. This mirrors the payload
/// length cap a segment can occupy in sequence-number space.
pub const MAX_RANGE_LEN: u32 = 1 << 31;

/// The half-open range `[start, end)` of sequence numbers occupied by a
/// segment's payload.
///
/// Invariant: `start` is before `end` in the modular sequence space and the
/// range is shorter than [`MAX_RANGE_LEN`]; a value of this type is always
/// non-empty. Pure ACKs occupy no sequence space and therefore have no
/// `SegmentRange`; they are never scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRange {
    start: SeqNum,
    end: SeqNum,
}

impl fmt::Display for SegmentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { start, end } = self;
        write!(f, "[{}, {})", start, end)
    }
}

impl SegmentRange {
    /// Creates a range from its two edges.
    ///
    /// Fails with [`RangeError`] if the range is empty, inverted, or too
    /// long for its modular order to be defined; such metadata indicates a
    /// malformed segment upstream and the segment must be dropped.
    pub fn new(start: SeqNum, end: SeqNum) -> Result<Self, RangeError> {
        let len = end - start;
        if len == 0 {
            return Err(RangeError::Empty { start, end });
        }
        if len < 0 {
            // A negative distance means `end` is before `start`; the
            // positive distance it would wrap to is >= MAX_RANGE_LEN.
            return Err(RangeError::TooLong { len: (start - end) as u32 });
        }
        Ok(Self { start, end })
    }

    /// Creates a range from a starting sequence number and a payload length.
    pub fn with_len(start: SeqNum, len: u32) -> Result<Self, RangeError> {
        if len == 0 {
            return Err(RangeError::Empty { start, end: start });
        }
        if len >= MAX_RANGE_LEN {
            return Err(RangeError::TooLong { len });
        }
        Ok(Self { start, end: start + len })
    }

    /// Creates a range whose edges are already known to be ordered, e.g.
    /// sub-ranges carved out of an existing `SegmentRange`.
    pub(crate) fn new_unchecked(start: SeqNum, end: SeqNum) -> Self {
        debug_assert!(start.before(end));
        Self { start, end }
    }

    /// The left edge (inclusive).
    pub fn start(&self) -> SeqNum {
        self.start
    }

    /// The right edge (exclusive).
    pub fn end(&self) -> SeqNum {
        self.end
    }

    /// The number of sequence numbers covered.
    pub fn len(&self) -> u32 {
        // Non-negative by construction.
        (self.end - self.start) as u32
    }

    /// Whether the entire range lies before `seq`.
    pub fn entirely_before(&self, seq: SeqNum) -> bool {
        !self.end.after(seq)
    }

    /// Whether `other` is fully contained in `self`.
    pub fn contains_range(&self, other: &SegmentRange) -> bool {
        !other.start.before(self.start) && !other.end.after(self.end)
    }

    /// The overlap of the two ranges, if any.
    pub fn intersection(&self, other: &SegmentRange) -> Option<SegmentRange> {
        let start = if self.start.before(other.start) { other.start } else { self.start };
        let end = if self.end.after(other.end) { other.end } else { self.end };
        start.before(end).then(|| Self { start, end })
    }
}

impl From<SegmentRange> for Range<SeqNum> {
    fn from(SegmentRange { start, end }: SegmentRange) -> Self {
        start..end
    }
}

impl TryFrom<Range<SeqNum>> for SegmentRange {
    type Error = RangeError;

    fn try_from(Range { start, end }: Range<SeqNum>) -> Result<Self, Self::Error> {
        Self::new(start, end)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_matches::assert_matches;
    use test_case::test_case;

    fn range(start: u32, end: u32) -> SegmentRange {
        SegmentRange::new(SeqNum::new(start), SeqNum::new(end)).unwrap()
    }

    #[test]
    fn rejects_empty() {
        assert_matches!(
            SegmentRange::new(SeqNum::new(10), SeqNum::new(10)),
            Err(RangeError::Empty { .. })
        );
        assert_matches!(
            SegmentRange::with_len(SeqNum::new(10), 0),
            Err(RangeError::Empty { .. })
        );
    }

    #[test]
    fn rejects_inverted() {
        assert_matches!(
            SegmentRange::new(SeqNum::new(10), SeqNum::new(5)),
            Err(RangeError::TooLong { len: 5 })
        );
        assert_matches!(
            SegmentRange::with_len(SeqNum::new(0), MAX_RANGE_LEN),
            Err(RangeError::TooLong { .. })
        );
    }

    #[test]
    fn wraparound_range() {
        let r = range(u32::MAX - 9, 10);
        assert_eq!(r.len(), 20);
        assert!(r.contains_range(&range(u32::MAX - 1, 5)));
    }

    #[test_case(range(0, 10), range(10, 20) => None; "adjacent")]
    #[test_case(range(0, 10), range(5, 20) => Some(range(5, 10)); "right overlap")]
    #[test_case(range(5, 20), range(0, 10) => Some(range(5, 10)); "left overlap")]
    #[test_case(range(0, 20), range(5, 10) => Some(range(5, 10)); "contained")]
    #[test_case(range(0, 10), range(0, 10) => Some(range(0, 10)); "identical")]
    fn intersection(a: SegmentRange, b: SegmentRange) -> Option<SegmentRange> {
        a.intersection(&b)
    }

    #[test_case(range(0, 10), 10 => true)]
    #[test_case(range(0, 10), 9 => false)]
    #[test_case(range(0, 10), 11 => true)]
    fn entirely_before(r: SegmentRange, seq: u32) -> bool {
        r.entirely_before(SeqNum::new(seq))
    }
}
