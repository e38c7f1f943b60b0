// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # artnode - Embedded Art-Net DMX Receiver
//!
//! A `no_std` receiver for Art-Net, the UDP broadcast protocol used to carry
//! DMX512 lighting data. Designed for resource-constrained nodes such as
//! ESP32 and RP2040 boards driving LEDs from a lighting console.
//!
//! ## Design Constraints
//!
//! - **No heap allocations** (const generics and bounded collections)
//! - **No floating point** (embedded-friendly)
//! - **Single-threaded** reception loop with bounded poll timeouts
//! - **`no_std` compatible** (`std` feature adds host transports)
//!
//! ## Architecture
//!
//! ```text
//! +-----------------------------------------+
//! |  Application (User Code)                |
//! +-----------------------------------------+
//!           v                    ^
//! +-----------------------------------------+
//! |  DmxReceiver (dispatch, housekeeping)   |
//! +-----------------------------------------+
//!           v                    ^
//! +-----------------------------------------+
//! |  Art-Net Wire (DmxHeader, PortAddress)  |
//! +-----------------------------------------+
//!           v                    ^
//! +-----------------------------------------+
//! |  Transport (WiFi UDP / custom)          |
//! +-----------------------------------------+
//! ```
//!
//! Accepted frames land in per-universe channel buffers and are mirrored to a
//! [`StatusSink`] (indicator colour derived from the first three channels plus
//! a one-line status text). Everything else is classified, counted and
//! dropped without ever stopping the loop.
//!
//! ## Feature Flags
//!
//! - `esp32` -- ESP32-specific optimizations
//! - `rp2040` -- RP2040-specific optimizations
//! - `std` -- Enable std (host UDP transport, examples)

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Art-Net wire protocol (header codec, opcodes, port addresses)
pub mod artnet;

/// Receiver core (sequence gating, universe buffers, dispatch loop)
pub mod node;

/// Status output adapter (indicator colour + status text)
pub mod output;

/// Transport abstraction for UDP and custom links
pub mod transport;

/// Reception statistics
pub mod stats;

/// Error types for artnode
pub mod error;

// Re-exports for convenience
pub use crate::artnet::{DmxHeader, OpCode, PortAddress, ProtocolVersion};
pub use crate::error::{DropReason, Error, Result};
pub use crate::node::{Dispatch, DmxReceiver, ReceiverConfig};
pub use crate::output::{NullSink, StatusSink};
pub use crate::stats::ReceiverStats;
pub use crate::transport::Transport;

/// UDP port registered for Art-Net
pub const ARTNET_PORT: u16 = 6454;

/// Channel slots per DMX universe
pub const DMX_CHANNELS: usize = 512;

/// Largest ArtDmx datagram this node handles (header + full universe)
pub const MAX_FRAME_LEN: usize = artnet::DmxHeader::SIZE + DMX_CHANNELS;

/// Version of artnode
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
