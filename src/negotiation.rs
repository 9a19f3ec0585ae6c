// Copyright 2022 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Tracking of the SACK-Permitted option exchange.
//!
//! DSACK reporting rides on the SACK option family, so it is only usable
//! on a connection where both peers advertised SACK-Permitted in the
//! SYN/SYN-ACK exchange. An endpoint with the feature disabled locally
//! simply leaves the option out of its SYN, which the peer records as a
//! `false` advertisement. Eligibility is therefore mutual per direction:
//! enabling DSACK on only one endpoint never makes it eligible.

use log::debug;

use crate::error::StateError;

/// The frozen outcome of the handshake option exchange for one direction.
///
/// Created once the handshake completes and immutable for the life of the
/// connection. Both the block builder (receiver role) and the report
/// consumer (sender role) take their own value of this type, evaluated
/// independently for their direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiationState {
    local_permitted: bool,
    remote_permitted: bool,
}

impl NegotiationState {
    /// Creates a negotiation state directly from the two advertisement
    /// flags. Useful for tests and for callers that complete the handshake
    /// outside of [`NegotiationTracker`].
    pub fn new(local_permitted: bool, remote_permitted: bool) -> Self {
        Self { local_permitted, remote_permitted }
    }

    /// Whether DSACK computation/consumption is active for this direction.
    ///
    /// True iff both peers advertised SACK-Permitted.
    pub fn dsack_eligible(&self) -> bool {
        let Self { local_permitted, remote_permitted } = self;
        *local_permitted && *remote_permitted
    }
}

/// Records the SACK-Permitted advertisements observed during the handshake.
///
/// Each `record_*` method must be called exactly once, during handshake
/// processing and before any data segment is processed. The tracker
/// freezes into a [`NegotiationState`] once both sides are recorded;
/// recording again afterwards fails with [`StateError`].
#[derive(Debug, Default)]
pub struct NegotiationTracker {
    local: Option<bool>,
    remote: Option<bool>,
}

impl NegotiationTracker {
    /// Creates a tracker with neither advertisement recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records whether we carried SACK-Permitted in our own SYN/SYN-ACK.
    pub fn record_local_advertisement(&mut self, permitted: bool) -> Result<(), StateError> {
        if self.local.is_some() {
            return Err(StateError::LocalAlreadyRecorded);
        }
        self.local = Some(permitted);
        self.maybe_log_outcome();
        Ok(())
    }

    /// Records whether the peer's SYN/SYN-ACK carried SACK-Permitted.
    pub fn record_remote_advertisement(&mut self, permitted: bool) -> Result<(), StateError> {
        if self.remote.is_some() {
            return Err(StateError::RemoteAlreadyRecorded);
        }
        self.remote = Some(permitted);
        self.maybe_log_outcome();
        Ok(())
    }

    /// The frozen negotiation outcome, once both advertisements are in.
    pub fn negotiated(&self) -> Option<NegotiationState> {
        let Self { local, remote } = self;
        match (local, remote) {
            (Some(local_permitted), Some(remote_permitted)) => Some(NegotiationState {
                local_permitted: *local_permitted,
                remote_permitted: *remote_permitted,
            }),
            _ => None,
        }
    }

    /// Whether DSACK is active for this direction.
    ///
    /// False while the handshake is still in progress.
    pub fn is_dsack_eligible(&self) -> bool {
        self.negotiated().map_or(false, |state| state.dsack_eligible())
    }

    fn maybe_log_outcome(&self) {
        if let Some(state) = self.negotiated() {
            debug!(
                "SACK-Permitted exchange complete: local={} remote={} dsack_eligible={}",
                state.local_permitted,
                state.remote_permitted,
                state.dsack_eligible()
            );
        }
    }
}
