// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Art-Net wire protocol
//!
//! Minimal subset of Art-Net 4 for a receive-only node: the ArtDmx header
//! codec plus the opcode, protocol revision and port-address types. Polls,
//! replies and sync are recognized by opcode but never answered.

pub mod header;
pub mod types;

// Re-exports
pub use header::{DmxHeader, ARTNET_ID};
pub use types::{OpCode, PortAddress, ProtocolVersion};
