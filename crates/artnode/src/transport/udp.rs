// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! UDP transport backed by `std::net` (host builds and ESP-IDF)
//!
//! ESP-IDF exposes lwIP through `std::net`, so the same socket code serves
//! both the workstation and the ESP32 once the `std` feature is on.

use std::net::UdpSocket;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::transport::Transport;
use crate::ARTNET_PORT;

/// Receive-only UDP socket bound to all interfaces
///
/// Broadcast and unicast datagrams both land on the same socket; Art-Net
/// controllers commonly use either.
pub struct UdpTransport {
    socket: UdpSocket,
    /// Read timeout currently applied to the socket, to skip the syscall
    /// when the poll timeout has not changed. `None` until the first poll.
    applied_timeout_ms: Option<u32>,
}

impl UdpTransport {
    /// Bind to `0.0.0.0:port` (0 lets the OS pick)
    pub fn bind(port: u16) -> Result<Self> {
        let addr = format!("0.0.0.0:{}", port);
        let socket = UdpSocket::bind(&addr).map_err(|_| Error::TransportError)?;

        Ok(Self {
            socket,
            applied_timeout_ms: None,
        })
    }

    /// Bind to the well-known Art-Net port 6454
    pub fn artnet() -> Result<Self> {
        Self::bind(ARTNET_PORT)
    }

    fn apply_timeout(&mut self, timeout_ms: u32) -> Result<()> {
        if self.applied_timeout_ms == Some(timeout_ms) {
            return Ok(());
        }

        // A zero read timeout means "block forever" to std; clamp up so a
        // zero poll timeout still returns
        let millis = timeout_ms.max(1);
        self.socket
            .set_read_timeout(Some(Duration::from_millis(u64::from(millis))))
            .map_err(|_| Error::TransportError)?;
        self.applied_timeout_ms = Some(timeout_ms);

        Ok(())
    }
}

impl Transport for UdpTransport {
    fn poll_recv(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<Option<usize>> {
        self.apply_timeout(timeout_ms)?;

        match self.socket.recv_from(buf) {
            Ok((len, _source)) => Ok(Some(len)),
            Err(ref e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                Ok(None)
            }
            Err(_) => Err(Error::TransportError),
        }
    }

    fn local_port(&self) -> u16 {
        self.socket
            .local_addr()
            .map(|addr| addr.port())
            .unwrap_or(0)
    }
}
