// Copyright 2022 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Sender-side interpretation of received SACK options.
//!
//! RFC 2883 does not flag a DSACK block explicitly; the sender recognizes
//! one by position and shape. A first block that is neither below the
//! cumulative ACK nor contained in the second block is ordinary SACK data,
//! and treating it as a duplicate report would corrupt spurious-
//! retransmission detection. That disambiguation is the whole job of this
//! module.

use log::{debug, trace};

use crate::negotiation::NegotiationState;
use crate::sack::SackBlockList;
use crate::scoreboard::{DuplicateCause, DuplicateEvent};
use crate::seqnum::SeqNum;

/// Consumes SACK options carried by incoming acknowledgments and
/// recognizes duplicate reports.
///
/// Holds the frozen sender-direction [`NegotiationState`] and a
/// per-connection count of recognized reports. Reacting to a report
/// (retransmission-timeout suppression, congestion response) belongs to
/// the TCP state machine, not here.
#[derive(Debug)]
pub struct DuplicateReportConsumer {
    negotiation: NegotiationState,
    duplicate_reports: u64,
}

impl DuplicateReportConsumer {
    /// Creates a consumer for a connection with the given negotiation
    /// outcome.
    pub fn new(negotiation: NegotiationState) -> Self {
        Self { negotiation, duplicate_reports: 0 }
    }

    /// How many duplicate reports this connection has received.
    pub fn duplicate_reports(&self) -> u64 {
        self.duplicate_reports
    }

    /// Inspects the blocks of one incoming acknowledgment.
    ///
    /// Returns the reported duplicate when the first block is a DSACK
    /// report: either it lies entirely below `cumulative_ack` (the peer
    /// received a spurious retransmission of acknowledged data), or it is
    /// a subset of the second block (a second copy arrived inside
    /// territory the peer had already selectively acknowledged).
    /// Otherwise, including when DSACK was not negotiated, returns `None`
    /// and the blocks are left to ordinary SACK processing.
    pub fn interpret(
        &mut self,
        blocks: &SackBlockList,
        cumulative_ack: SeqNum,
    ) -> Option<DuplicateEvent> {
        if !self.negotiation.dsack_eligible() {
            return None;
        }
        let first = blocks.blocks().first()?;

        let cause = if first.entirely_before(cumulative_ack) {
            DuplicateCause::Retransmission
        } else if blocks.blocks().get(1).map_or(false, |second| second.contains_range(first)) {
            DuplicateCause::Reorder
        } else {
            trace!("first SACK block {} is not a duplicate report", first);
            return None;
        };

        self.duplicate_reports += 1;
        debug!(
            "peer reported duplicate {} ({:?}), {} reports total",
            first, cause, self.duplicate_reports
        );
        Some(DuplicateEvent { range: *first, cause })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::segment::SegmentRange;
    use assert_matches::assert_matches;
    use test_case::test_case;

    fn block(start: u32, end: u32) -> SegmentRange {
        SegmentRange::new(SeqNum::new(start), SeqNum::new(end)).unwrap()
    }

    fn list(blocks: impl IntoIterator<Item = (u32, u32)>) -> SackBlockList {
        blocks.into_iter().map(|(s, e)| block(s, e)).collect()
    }

    fn consumer() -> DuplicateReportConsumer {
        DuplicateReportConsumer::new(NegotiationState::new(true, true))
    }

    #[test]
    fn not_eligible_never_reports() {
        let mut consumer = DuplicateReportConsumer::new(NegotiationState::new(true, false));
        let blocks = list([(1000, 1500)]);
        assert_eq!(consumer.interpret(&blocks, SeqNum::new(2000)), None);
        assert_eq!(consumer.duplicate_reports(), 0);
    }

    #[test]
    fn block_below_cumulative_ack_is_a_retransmission_report() {
        let mut consumer = consumer();
        let blocks = list([(1000, 1500), (3000, 3500)]);
        assert_eq!(
            consumer.interpret(&blocks, SeqNum::new(2000)),
            Some(DuplicateEvent {
                range: block(1000, 1500),
                cause: DuplicateCause::Retransmission,
            })
        );
        assert_eq!(consumer.duplicate_reports(), 1);
    }

    #[test]
    fn subset_of_second_block_is_a_reorder_report() {
        let mut consumer = consumer();
        let blocks = list([(3100, 3300), (3000, 3500)]);
        assert_eq!(
            consumer.interpret(&blocks, SeqNum::new(2000)),
            Some(DuplicateEvent { range: block(3100, 3300), cause: DuplicateCause::Reorder })
        );
    }

    // The primary correctness risk: an ordinary SACK block in position 0
    // must not be mistaken for a duplicate report.
    #[test_case(&[(3000, 3500)], 2000; "single block above cumack")]
    #[test_case(&[(3000, 3500), (5000, 5500)], 2000; "first block disjoint from second")]
    #[test_case(&[(3000, 3600), (3000, 3500)], 2000; "first block exceeds second")]
    #[test_case(&[(1500, 2500)], 2000; "block straddles cumack")]
    fn ordinary_sack_data_is_not_reported(blocks: &[(u32, u32)], cumack: u32) {
        let mut consumer = consumer();
        let blocks = list(blocks.iter().copied());
        assert_eq!(consumer.interpret(&blocks, SeqNum::new(cumack)), None);
        assert_eq!(consumer.duplicate_reports(), 0);
    }

    #[test]
    fn empty_list_is_not_reported() {
        let mut consumer = consumer();
        assert_eq!(consumer.interpret(&SackBlockList::new(), SeqNum::new(2000)), None);
    }

    #[test]
    fn counter_accumulates_across_acknowledgments() {
        let mut consumer = consumer();
        for _ in 0..3 {
            assert_matches!(
                consumer.interpret(&list([(1000, 1500)]), SeqNum::new(2000)),
                Some(_)
            );
        }
        assert_eq!(consumer.duplicate_reports(), 3);
    }
}
