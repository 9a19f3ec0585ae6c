// Copyright 2022 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Assembly of the outgoing SACK option when a duplicate was received.
//!
//! Per RFC 2883, a DSACK report is an ordinary SACK block placed first in
//! the option: for a duplicate below the cumulative ACK it carries the
//! duplicate segment's range, for a duplicate inside already-SACKed
//! territory it carries the overlapping sub-range. Both ranges are
//! classified by the scoreboard; the builder only orders blocks and never
//! recomputes them.

use log::trace;

use crate::negotiation::NegotiationState;
use crate::sack::SackBlockList;
use crate::scoreboard::DuplicateEvent;

/// Builds the block list to attach to the next outgoing acknowledgment.
///
/// Holds the frozen receiver-direction [`NegotiationState`]; when DSACK
/// was not negotiated the builder degrades to a pass-through and the
/// acknowledgment carries standard SACK blocks only.
#[derive(Debug)]
pub struct DsackBlockBuilder {
    negotiation: NegotiationState,
}

impl DsackBlockBuilder {
    /// Creates a builder for a connection with the given negotiation
    /// outcome.
    pub fn new(negotiation: NegotiationState) -> Self {
        Self { negotiation }
    }

    /// Produces the ordered block list for one acknowledgment cycle.
    ///
    /// `regular` holds the non-duplicate selectively-acknowledged ranges
    /// the ACK emitter wants to report. With no duplicate event this cycle,
    /// or without DSACK negotiated, `regular` is returned unchanged.
    /// Otherwise the duplicate's range becomes block 0 and the oldest
    /// regular blocks are dropped as needed; the DSACK block itself is
    /// never dropped.
    pub fn build_blocks(
        &self,
        mut regular: SackBlockList,
        duplicate: Option<&DuplicateEvent>,
    ) -> SackBlockList {
        if !self.negotiation.dsack_eligible() {
            return regular;
        }
        let Some(DuplicateEvent { range, cause }) = duplicate else {
            return regular;
        };
        trace!("reporting DSACK block {} ({:?})", range, cause);
        regular.prepend(*range);
        regular
    }
}
