// Copyright 2022 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The TCP DSACK negotiation and duplicate-segment reporting engine.
//!
//! Duplicate SACK (RFC 2883) lets a receiver tell its peer that a range
//! of bytes arrived more than once, so the sender can distinguish
//! spurious retransmissions and reordering from genuine loss. This crate
//! implements the per-connection core of that mechanism:
//!
//! - [`NegotiationTracker`] records the SACK-Permitted advertisements
//!   exchanged during the handshake and freezes them into a
//!   [`NegotiationState`]; DSACK is only active in a direction where both
//!   peers advertised support.
//! - [`Scoreboard`] tracks which byte ranges of the inbound stream have
//!   been received and classifies every arriving segment, emitting a
//!   [`DuplicateEvent`] for ranges seen before.
//! - [`DsackBlockBuilder`] turns a duplicate event into block 0 of the
//!   outgoing SACK option.
//! - [`DuplicateReportConsumer`] recognizes such blocks in received
//!   acknowledgments on the sending side.
//!
//! The surrounding TCP state machine, retransmission timers, congestion
//! control, and regular SACK block selection are external collaborators:
//! they feed segments and handshake observations in, and serialize the
//! block lists this crate hands back. All types here are plain owned
//! per-connection values; callers serialize access per connection, and no
//! operation blocks or suspends.

#![deny(missing_docs, unreachable_patterns)]

mod builder;
mod consumer;
pub mod error;
mod negotiation;
pub mod sack;
mod scoreboard;
mod segment;
mod seqnum;

pub use crate::{
    builder::DsackBlockBuilder,
    consumer::DuplicateReportConsumer,
    error::{RangeError, StateError},
    negotiation::{NegotiationState, NegotiationTracker},
    sack::SackBlockList,
    scoreboard::{
        Classification, DuplicateCause, DuplicateEvent, Scoreboard, SegmentOutcome,
    },
    segment::{SegmentRange, MAX_RANGE_LEN},
    seqnum::SeqNum,
};
