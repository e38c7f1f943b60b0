// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Transport abstraction for artnode
//!
//! Defines a generic datagram source that can be implemented for:
//! - WiFi UDP (ESP32, RP2040W)
//! - Ethernet UDP (host builds, W5500)
//! - Replay/capture feeds in tests
//!
//! ## Design Principles
//!
//! - **No heap allocations** - callers own the receive buffer
//! - **Bounded blocking** - every receive carries a timeout so the node can
//!   run housekeeping between datagrams
//! - **Error handling** - Result-based, no panics
//!
//! A timeout is not an error: `poll_recv` reports it as `Ok(None)` and the
//! receiver treats it as an idle tick.

use crate::error::Result;
use crate::ARTNET_PORT;

#[cfg(feature = "std")]
pub mod udp;

#[cfg(feature = "std")]
pub use udp::UdpTransport;

/// Datagram source for the reception loop
///
/// Implementors must handle:
/// - Socket/radio bring-up before the receiver starts polling
/// - One datagram per `poll_recv` call, truncating to the buffer if needed
pub trait Transport {
    /// Receive one datagram, waiting at most `timeout_ms`
    ///
    /// # Returns
    ///
    /// - `Ok(Some(len))` - a datagram of `len` bytes is in `buf`
    /// - `Ok(None)` - the timeout elapsed with no traffic
    /// - `Err(Error::TransportError)` - the underlying socket failed
    fn poll_recv(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<Option<usize>>;

    /// Whether the underlying link is currently usable
    ///
    /// Transports that cannot tell (plain sockets) report `true`.
    fn link_up(&self) -> bool {
        true
    }

    /// Local port the transport listens on
    fn local_port(&self) -> u16;
}

/// Null transport (for testing)
///
/// Never receives anything; every poll times out.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTransport;

impl NullTransport {
    /// Create a new null transport
    pub const fn new() -> Self {
        Self
    }
}

impl Transport for NullTransport {
    fn poll_recv(&mut self, _buf: &mut [u8], _timeout_ms: u32) -> Result<Option<usize>> {
        Ok(None)
    }

    fn local_port(&self) -> u16 {
        ARTNET_PORT
    }
}
