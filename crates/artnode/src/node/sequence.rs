// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-universe sequence gating

/// Forward-window gate over the 8-bit ArtDmx sequence counter
///
/// Broadcast delivery reorders and duplicates datagrams, so each universe
/// admits a frame only if its sequence number is ahead of the last admitted
/// one. "Ahead" is the signed 8-bit difference: deltas 1..=127 pass, 0 and
/// negative deltas (including the ambiguous -128) are stale. The counter
/// wraps 255 -> 1 without a glitch.
///
/// Sequence 0 is the sender's "ordering disabled" marker. Such frames always
/// pass and leave the stored state untouched; recording 0 would turn the
/// window against legitimate traffic after the next real counter value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceGate {
    last: Option<u8>,
}

impl SequenceGate {
    /// Create a fresh gate (admits any first frame)
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Admit or reject a sequence number, updating the window on admit
    pub fn admit(&mut self, sequence: u8) -> bool {
        if sequence == 0 {
            return true;
        }

        match self.last {
            None => {
                self.last = Some(sequence);
                true
            }
            Some(last) => {
                let delta = sequence.wrapping_sub(last) as i8;
                if delta > 0 {
                    self.last = Some(sequence);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Last admitted sequence number, if any
    pub const fn last(&self) -> Option<u8> {
        self.last
    }

    /// Forget the window (next frame is admitted unconditionally)
    pub fn reset(&mut self) {
        self.last = None;
    }
}
