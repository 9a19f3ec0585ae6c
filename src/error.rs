// Copyright 2022 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Errors surfaced by the DSACK engine.
//!
//! All failures here are local and synchronous; the caller (the TCP state
//! machine) decides whether to reset the connection or drop the offending
//! segment. Truncating a SACK block list to fit the option space is
//! expected behavior and is not represented here.

use crate::seqnum::SeqNum;

/// An advertisement was recorded out of handshake order.
///
/// The negotiation methods must each be called exactly once while the
/// handshake is in progress; anything else is a protocol-sequencing bug
/// that is fatal to the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// The local advertisement was already recorded.
    #[error("local SACK-Permitted advertisement already recorded")]
    LocalAlreadyRecorded,
    /// The remote advertisement was already recorded.
    #[error("remote SACK-Permitted advertisement already recorded")]
    RemoteAlreadyRecorded,
}

/// A segment carried malformed sequence-range metadata.
///
/// The segment is dropped and not scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// The range is empty or its end is not after its start in the
    /// modular sequence space.
    #[error("sequence range [{start}, {end}) is empty or inverted")]
    Empty {
        /// The left edge of the offending range.
        start: SeqNum,
        /// The right edge of the offending range.
        end: SeqNum,
    },
    /// The range is too long for its order to be defined in the modular
    /// sequence space.
    #[error("sequence range of length {len} exceeds the representable bound")]
    TooLong {
        /// The offending length.
        len: u32,
    },
}
