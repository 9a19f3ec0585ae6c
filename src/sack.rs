// Copyright 2022 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! SACK block lists and their wire representation.
//!
//! A SACK option carries up to four blocks of eight bytes each, plus two
//! bytes of kind/length, inside the 40 bytes of TCP option space. Blocks
//! are encoded left-edge-first as big-endian u32 pairs, in list order.

use bytes::{Buf, BufMut};
use log::trace;

use crate::segment::SegmentRange;
use crate::seqnum::SeqNum;

/// Option kind of SACK-Permitted (RFC 2018).
pub const SACK_PERMITTED_KIND: u8 = 4;
/// Option length of SACK-Permitted.
pub const SACK_PERMITTED_LEN: u8 = 2;
/// Option kind of a SACK block list (RFC 2018).
pub const SACK_KIND: u8 = 5;

/// The total option space in a TCP header.
pub const MAX_OPTION_BYTES: usize = 40;
/// The size of one encoded block.
const BLOCK_WIRE_LEN: usize = 8;
/// Kind and length octets of the SACK option.
const OPTION_HEADER_LEN: usize = 2;
/// The most blocks that fit in a full option space:
/// `(40 - 2) / 8 == 4`.
pub const MAX_SACK_BLOCKS: usize = (MAX_OPTION_BYTES - OPTION_HEADER_LEN) / BLOCK_WIRE_LEN;

/// An ordered list of SACK blocks, bounded by the option space.
///
/// Blocks near the front are the highest priority; when the list must
/// shrink, either to respect [`MAX_SACK_BLOCKS`] or to fit a smaller
/// remaining option space, blocks are dropped from the tail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SackBlockList {
    blocks: Vec<SegmentRange>,
}

impl SackBlockList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// The blocks, highest priority first.
    pub fn blocks(&self) -> &[SegmentRange] {
        &self.blocks
    }

    /// The number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the list carries no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Appends a block at the tail, dropping it if the list is full.
    pub fn push(&mut self, block: SegmentRange) {
        if self.blocks.len() < MAX_SACK_BLOCKS {
            self.blocks.push(block);
        }
    }

    /// Inserts a block at the front, dropping the tail block if the list
    /// is full.
    pub fn prepend(&mut self, block: SegmentRange) {
        self.blocks.truncate(MAX_SACK_BLOCKS - 1);
        self.blocks.insert(0, block);
    }

    /// Encodes the list as a SACK option into `buf`, truncated to fit
    /// `available_option_bytes` of remaining header option space.
    ///
    /// Truncation drops tail blocks and is silent: it is expected,
    /// observable behavior, not a failure. Returns the number of bytes
    /// written; nothing is written when the list is empty or not even one
    /// block fits.
    pub fn encode<B: BufMut>(&self, buf: &mut B, available_option_bytes: usize) -> usize {
        let budget = available_option_bytes.min(MAX_OPTION_BYTES);
        let fitting = budget.saturating_sub(OPTION_HEADER_LEN) / BLOCK_WIRE_LEN;
        let count = fitting.min(self.blocks.len());
        if count == 0 {
            return 0;
        }
        if count < self.blocks.len() {
            trace!("truncating SACK option from {} to {} blocks", self.blocks.len(), count);
        }
        let wire_len = OPTION_HEADER_LEN + count * BLOCK_WIRE_LEN;
        buf.put_u8(SACK_KIND);
        // The following cast is fine: `wire_len <= MAX_OPTION_BYTES`.
        buf.put_u8(wire_len as u8);
        for block in &self.blocks[..count] {
            buf.put_u32(block.start().into());
            buf.put_u32(block.end().into());
        }
        wire_len
    }

    /// Decodes a received SACK option payload (the bytes after kind and
    /// length) into a block list.
    ///
    /// A short tail is ignored; a block whose edges are inverted or equal
    /// is skipped, since it cannot describe received data.
    pub fn decode<B: Buf>(mut payload: B) -> Self {
        let mut blocks = Self::new();
        while payload.remaining() >= BLOCK_WIRE_LEN {
            let left = SeqNum::new(payload.get_u32());
            let right = SeqNum::new(payload.get_u32());
            match SegmentRange::new(left, right) {
                Ok(block) => blocks.push(block),
                Err(e) => trace!("skipping malformed SACK block: {}", e),
            }
        }
        blocks
    }
}

impl FromIterator<SegmentRange> for SackBlockList {
    fn from_iter<T: IntoIterator<Item = SegmentRange>>(iter: T) -> Self {
        let mut list = Self::new();
        for block in iter {
            list.push(block);
        }
        list
    }
}

/// Encodes a SACK-Permitted option into `buf`, returning its length.
///
/// Carried in SYN/SYN-ACK segments when the local end has the SACK family
/// enabled; its presence is what [`crate::NegotiationTracker`] records.
pub fn encode_sack_permitted<B: BufMut>(buf: &mut B) -> usize {
    buf.put_u8(SACK_PERMITTED_KIND);
    buf.put_u8(SACK_PERMITTED_LEN);
    usize::from(SACK_PERMITTED_LEN)
}
