// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Status outputs - indicator colour and status text
//!
//! [`StatusSink`] is the seam between the protocol core and whatever a board
//! actually has: an RGB LED and an OLED, a single GPIO, or nothing at all.
//! The receiver calls it with derived state only; sinks never see raw frames.
//!
//! Sink errors are soft. The receiver counts and logs them but keeps
//! receiving, so a disconnected display cannot take the node offline.

use crate::error::Result;

/// Indicator colour for the idle heartbeat blink
pub const IDLE_BLUE: (u8, u8, u8) = (0, 0, 255);

/// Indicator colour while the transport link is down
pub const FAULT_RED: (u8, u8, u8) = (255, 0, 0);

/// Indicator colour for a successful link bring-up
pub const LINK_GREEN: (u8, u8, u8) = (0, 255, 0);

/// Indicator off
pub const OFF: (u8, u8, u8) = (0, 0, 0);

/// Board-facing status output
///
/// Implementations drive real hardware; the methods take `&mut self` so a
/// sink can own pin drivers or a display handle directly.
pub trait StatusSink {
    /// Drive the indicator to an RGB colour
    ///
    /// On an accepted frame this is the colour of the universe's first three
    /// channels; outside traffic the receiver uses it for heartbeat and
    /// fault signalling.
    fn set_color(&mut self, r: u8, g: u8, b: u8) -> Result<()>;

    /// Show a short status line, e.g. `univ 0: rgb(255,0,0)`
    ///
    /// Lines stay under 48 bytes; a sink with a narrower display truncates
    /// as it sees fit.
    fn show_status(&mut self, text: &str) -> Result<()>;
}

/// Sink that discards everything
///
/// For headless nodes and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn set_color(&mut self, _r: u8, _g: u8, _b: u8) -> Result<()> {
        Ok(())
    }

    fn show_status(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
}

/// Sink that mirrors updates to the log
///
/// Useful on boards whose only observable output is the serial console.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl StatusSink for LogSink {
    fn set_color(&mut self, r: u8, g: u8, b: u8) -> Result<()> {
        log::info!("[sink] color rgb({},{},{})", r, g, b);
        Ok(())
    }

    fn show_status(&mut self, text: &str) -> Result<()> {
        log::info!("[sink] {}", text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sink_accepts_everything() {
        let mut sink = NullSink;
        assert!(sink.set_color(255, 128, 0).is_ok());
        assert!(sink.show_status("univ 0: rgb(255,128,0)").is_ok());
    }

    #[test]
    fn test_log_sink_accepts_everything() {
        let mut sink = LogSink;
        assert!(sink.set_color(0, 0, 0).is_ok());
        assert!(sink.show_status("").is_ok());
    }
}
