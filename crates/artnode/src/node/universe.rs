// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-universe channel storage

use crate::DMX_CHANNELS;

/// Fixed 512-slot channel buffer for one DMX universe
///
/// Starts at blackout (all zeros). Frames shorter than a full universe update
/// only their leading channels; the tail keeps its previous values, matching
/// how consoles thin out refresh traffic.
#[derive(Debug, Clone)]
pub struct UniverseBuffer {
    channels: [u8; DMX_CHANNELS],
    updates: u32,
}

impl UniverseBuffer {
    /// Create a new buffer at blackout
    pub const fn new() -> Self {
        Self {
            channels: [0u8; DMX_CHANNELS],
            updates: 0,
        }
    }

    /// Apply channel data to the front of the buffer
    ///
    /// # Returns
    ///
    /// Number of channels written (input beyond 512 is ignored)
    pub fn apply(&mut self, data: &[u8]) -> usize {
        let len = data.len().min(DMX_CHANNELS);
        self.channels[..len].copy_from_slice(&data[..len]);
        self.updates = self.updates.saturating_add(1);
        len
    }

    /// Read one channel (zero-based slot index)
    pub fn channel(&self, index: u16) -> Option<u8> {
        self.channels.get(index as usize).copied()
    }

    /// Copy out the full universe
    ///
    /// The copy is detached: later frames never mutate data a caller already
    /// holds.
    pub fn snapshot(&self) -> [u8; DMX_CHANNELS] {
        self.channels
    }

    /// First three channels as an RGB triple
    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.channels[0], self.channels[1], self.channels[2])
    }

    /// Number of frames applied so far
    pub const fn updates(&self) -> u32 {
        self.updates
    }

    /// Whether any frame has ever been applied
    pub const fn has_data(&self) -> bool {
        self.updates > 0
    }
}

impl Default for UniverseBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_blackout() {
        let buf = UniverseBuffer::new();
        assert!(!buf.has_data());
        assert_eq!(buf.channel(0), Some(0));
        assert_eq!(buf.channel(511), Some(0));
        assert_eq!(buf.rgb(), (0, 0, 0));
    }

    #[test]
    fn test_partial_update_preserves_tail() {
        let mut buf = UniverseBuffer::new();
        let mut full = [7u8; DMX_CHANNELS];
        full[511] = 99;
        assert_eq!(buf.apply(&full), DMX_CHANNELS);

        // Shorter frame touches only the front
        assert_eq!(buf.apply(&[1, 2, 3]), 3);
        assert_eq!(buf.channel(0), Some(1));
        assert_eq!(buf.channel(2), Some(3));
        assert_eq!(buf.channel(3), Some(7));
        assert_eq!(buf.channel(511), Some(99));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut buf = UniverseBuffer::new();
        buf.apply(&[10, 20, 30]);

        let snap = buf.snapshot();
        buf.apply(&[200]);

        assert_eq!(snap[0], 10);
        assert_eq!(buf.channel(0), Some(200));
    }

    #[test]
    fn test_rgb_reads_front_slots() {
        let mut buf = UniverseBuffer::new();
        buf.apply(&[255, 128, 64, 32]);
        assert_eq!(buf.rgb(), (255, 128, 64));
    }

    #[test]
    fn test_channel_out_of_range() {
        let buf = UniverseBuffer::new();
        assert_eq!(buf.channel(512), None);
        assert_eq!(buf.channel(u16::MAX), None);
    }

    #[test]
    fn test_update_counter() {
        let mut buf = UniverseBuffer::new();
        assert_eq!(buf.updates(), 0);
        buf.apply(&[1]);
        buf.apply(&[]);
        assert_eq!(buf.updates(), 2);
        assert!(buf.has_data());
    }
}
