// Copyright 2022 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The receive-side segment scoreboard.
//!
//! The scoreboard records which byte ranges of the inbound stream have
//! been seen and classifies every arriving segment as new, partially new,
//! or fully duplicate. It produces no wire bytes; the classification and
//! the accompanying [`DuplicateEvent`] drive the DSACK block builder.

use core::ops::Range;

use log::trace;

use crate::error::RangeError;
use crate::segment::SegmentRange;
use crate::seqnum::SeqNum;

/// How an arriving segment relates to data already received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No byte of the segment was seen before.
    NewData,
    /// Some bytes are new, some were seen before.
    PartialOverlap,
    /// Every byte of the segment was seen before.
    FullDuplicate,
}

/// Why a duplicate range was received again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateCause {
    /// The duplicate lies below the cumulative-ack frontier: the peer
    /// retransmitted data we already acknowledged cumulatively.
    Retransmission,
    /// The duplicate lies in already-recorded out-of-order territory:
    /// a second copy arrived of data we had only selectively acknowledged.
    Reorder,
}

/// A range that was received more than once.
///
/// Ephemeral: produced on segment arrival and consumed immediately by the
/// block builder (receiver role) or reported by the consumer (sender
/// role); never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateEvent {
    /// The duplicated sub-range. When a segment is only partially
    /// duplicate, this covers the overlapping portion only; when the
    /// overlap spans multiple recorded ranges, the lowest overlapping
    /// sub-range is reported.
    pub range: SegmentRange,
    /// Why the range was seen again.
    pub cause: DuplicateCause,
}

/// The outcome of scoring one arriving segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentOutcome {
    /// The classification of the segment.
    pub classification: Classification,
    /// The duplicate range, if any byte was seen before.
    pub duplicate: Option<DuplicateEvent>,
    /// By how many bytes this arrival advanced the cumulative-ack
    /// frontier (non-zero only for in-order data).
    pub advanced: u32,
}

/// Per-connection record of received byte ranges.
///
/// Holds the cumulative-ack frontier and the set of out-of-order ranges
/// above it. The ranges are sorted, disjoint, and separated by a gap of at
/// least one byte; anything adjacent is coalesced on insertion. Owned
/// exclusively by one connection's receive side; callers serialize access
/// per connection.
#[derive(Debug, PartialEq, Eq)]
pub struct Scoreboard {
    /// The next in-order sequence number expected; all bytes before it
    /// have been received contiguously.
    frontier: SeqNum,
    /// Out-of-order ranges already received, all strictly after
    /// `frontier`.
    recorded: Vec<SegmentRange>,
}

impl Scoreboard {
    /// Creates a scoreboard expecting `frontier` as the next in-order
    /// sequence number.
    pub fn new(frontier: SeqNum) -> Self {
        Self { frontier, recorded: Vec::new() }
    }

    /// The cumulative-ack frontier.
    pub fn frontier(&self) -> SeqNum {
        self.frontier
    }

    /// The out-of-order ranges above the frontier, sorted by left edge.
    ///
    /// These are the ranges an ACK emitter reports as regular SACK blocks.
    pub fn recorded(&self) -> &[SegmentRange] {
        &self.recorded
    }

    /// Scores an arriving data segment.
    ///
    /// Validates the range first; a malformed range fails with
    /// [`RangeError`] and leaves the scoreboard untouched. Scoring is
    /// deterministic and idempotent: redelivering the exact same segment
    /// yields `FullDuplicate` and an unchanged range set.
    pub fn on_segment_arrival(
        &mut self,
        range: Range<SeqNum>,
    ) -> Result<SegmentOutcome, RangeError> {
        let range = SegmentRange::try_from(range)?;
        let outcome = self.score(range);
        trace!(
            "segment {} scored {:?} (frontier now {}, {} recorded ranges)",
            range,
            outcome.classification,
            self.frontier,
            self.recorded.len()
        );
        Ok(outcome)
    }

    fn score(&mut self, range: SegmentRange) -> SegmentOutcome {
        if range.entirely_before(self.frontier) {
            // Everything was already delivered in order; the peer
            // retransmitted spuriously.
            return SegmentOutcome {
                classification: Classification::FullDuplicate,
                duplicate: Some(DuplicateEvent { range, cause: DuplicateCause::Retransmission }),
                advanced: 0,
            };
        }

        if range.start().before(self.frontier) {
            // Straddles the frontier: the head is a retransmission, the
            // tail is recorded as new data. The tail cannot itself be
            // fully duplicate since recorded ranges never touch the
            // frontier.
            let duplicate = SegmentRange::new_unchecked(range.start(), self.frontier);
            let fresh = SegmentRange::new_unchecked(self.frontier, range.end());
            let advanced = self.record(fresh);
            return SegmentOutcome {
                classification: Classification::PartialOverlap,
                duplicate: Some(DuplicateEvent {
                    range: duplicate,
                    cause: DuplicateCause::Retransmission,
                }),
                advanced,
            };
        }

        if self.recorded.iter().any(|r| r.contains_range(&range)) {
            // A second copy of out-of-order data we already hold.
            return SegmentOutcome {
                classification: Classification::FullDuplicate,
                duplicate: Some(DuplicateEvent { range, cause: DuplicateCause::Reorder }),
                advanced: 0,
            };
        }

        // `recorded` is sorted, so the first intersection found is the
        // lowest overlapping sub-range.
        let duplicate = self.recorded.iter().find_map(|r| r.intersection(&range)).map(|overlap| {
            DuplicateEvent { range: overlap, cause: DuplicateCause::Reorder }
        });
        let classification = if duplicate.is_some() {
            Classification::PartialOverlap
        } else {
            Classification::NewData
        };
        let advanced = self.record(range);
        SegmentOutcome { classification, duplicate, advanced }
    }

    /// Inserts `range` into the recorded set, coalescing with any
    /// overlapping or adjacent neighbors, then advances the frontier if
    /// the lowest range now starts at it. Returns the number of bytes the
    /// frontier advanced.
    fn record(&mut self, range: SegmentRange) -> u32 {
        let mut start = range.start();
        let mut end = range.end();

        // The merge window: every recorded range that overlaps or touches
        // `range`. Ranges are sorted, so it is contiguous.
        let lo = self
            .recorded
            .iter()
            .position(|r| !r.end().before(start))
            .unwrap_or(self.recorded.len());
        let mut hi = lo;
        while hi < self.recorded.len() && !self.recorded[hi].start().after(end) {
            hi += 1;
        }

        if lo < hi {
            if self.recorded[lo].start().before(start) {
                start = self.recorded[lo].start();
            }
            if self.recorded[hi - 1].end().after(end) {
                end = self.recorded[hi - 1].end();
            }
        }
        let _ = self.recorded.splice(lo..hi, [SegmentRange::new_unchecked(start, end)]);

        if self.recorded[0].start() == self.frontier {
            let advanced = self.recorded.remove(0);
            self.frontier = advanced.end();
            advanced.len()
        } else {
            0
        }
    }
}
