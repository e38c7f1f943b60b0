// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reception statistics
//!
//! Plain counters, no atomics: the receiver is single-threaded and owns its
//! stats. Counters saturate instead of wrapping so a long-lived node never
//! reports a small number after overflow.

use crate::error::DropReason;

/// Counters kept by the receiver
///
/// Every datagram increments `datagrams` and then exactly one of `accepted`
/// or a drop counter, so `datagrams == accepted + dropped_total()` holds at
/// all times.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverStats {
    /// Datagrams handed to the dispatcher
    pub datagrams: u32,
    /// Frames applied to a subscribed universe
    pub accepted: u32,
    /// Accepted frames that carried fewer channels than declared
    pub truncated: u32,

    /// Dropped: shorter than an ArtDmx header
    pub too_short: u32,
    /// Dropped: missing Art-Net signature
    pub bad_signature: u32,
    /// Dropped: opcode other than ArtDmx
    pub unknown_opcode: u32,
    /// Dropped: protocol revision below 14
    pub unsupported_version: u32,
    /// Dropped: reserved bit set in the port-address
    pub malformed_header: u32,
    /// Dropped: universe not subscribed
    pub unsubscribed: u32,
    /// Dropped: sequence behind the ordering window
    pub stale_or_duplicate: u32,

    /// Status sink calls that failed (does not affect the frame counters)
    pub output_errors: u32,
}

impl ReceiverStats {
    /// Count one datagram entering the dispatcher
    pub fn record_datagram(&mut self) {
        self.datagrams = self.datagrams.saturating_add(1);
    }

    /// Count an accepted frame
    pub fn record_accepted(&mut self, truncated: bool) {
        self.accepted = self.accepted.saturating_add(1);
        if truncated {
            self.truncated = self.truncated.saturating_add(1);
        }
    }

    /// Count a dropped datagram under its reason
    pub fn record_drop(&mut self, reason: DropReason) {
        let counter = match reason {
            DropReason::TooShort => &mut self.too_short,
            DropReason::BadSignature => &mut self.bad_signature,
            DropReason::UnknownOpcode(_) => &mut self.unknown_opcode,
            DropReason::UnsupportedVersion => &mut self.unsupported_version,
            DropReason::MalformedHeader => &mut self.malformed_header,
            DropReason::Unsubscribed => &mut self.unsubscribed,
            DropReason::StaleOrDuplicate => &mut self.stale_or_duplicate,
        };
        *counter = counter.saturating_add(1);
    }

    /// Count a failed status sink call
    pub fn record_output_error(&mut self) {
        self.output_errors = self.output_errors.saturating_add(1);
    }

    /// Total dropped datagrams across all reasons (saturating, like the
    /// counters themselves)
    pub const fn dropped_total(&self) -> u32 {
        self.too_short
            .saturating_add(self.bad_signature)
            .saturating_add(self.unknown_opcode)
            .saturating_add(self.unsupported_version)
            .saturating_add(self.malformed_header)
            .saturating_add(self.unsubscribed)
            .saturating_add(self.stale_or_duplicate)
    }

    /// Immutable copy of the current counters
    pub const fn snapshot(&self) -> Self {
        *self
    }

    /// Format stats as a multi-line string
    #[cfg(feature = "std")]
    pub fn format_summary(&self) -> String {
        format!(
            "Receiver Stats\n\
             Frames: rx={}, accepted={}, truncated={}\n\
             Drops:  short={}, signature={}, opcode={}, version={}, malformed={}, unsubscribed={}, stale={}\n\
             Sink:   errors={}",
            self.datagrams,
            self.accepted,
            self.truncated,
            self.too_short,
            self.bad_signature,
            self.unknown_opcode,
            self.unsupported_version,
            self.malformed_header,
            self.unsubscribed,
            self.stale_or_duplicate,
            self.output_errors
        )
    }
}
