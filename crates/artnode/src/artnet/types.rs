// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Art-Net protocol types

use core::fmt;

/// Art-Net opcode (2 bytes, little-endian on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum OpCode {
    /// ArtPoll - controller discovery request (0x2000)
    Poll = 0x2000,
    /// ArtPollReply - node discovery answer (0x2100)
    PollReply = 0x2100,
    /// ArtDmx - one universe of DMX channel data (0x5000)
    Dmx = 0x5000,
    /// ArtSync - synchronize buffered outputs (0x5200)
    Sync = 0x5200,
}

impl OpCode {
    /// Parse from wire value
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x2000 => Some(Self::Poll),
            0x2100 => Some(Self::PollReply),
            0x5000 => Some(Self::Dmx),
            0x5200 => Some(Self::Sync),
            _ => None,
        }
    }

    /// Wire value
    ///
    /// Uses an explicit match instead of an enum cast to avoid Xtensa LLVM
    /// compiler bugs.
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::Poll => 0x2000,
            Self::PollReply => 0x2100,
            Self::Dmx => 0x5000,
            Self::Sync => 0x5200,
        }
    }
}

// Compile-time assertion to ensure enum discriminants are correct
const _: () = {
    assert!(OpCode::Poll as u16 == 0x2000, "ArtPoll opcode must be 0x2000");
    assert!(
        OpCode::PollReply as u16 == 0x2100,
        "ArtPollReply opcode must be 0x2100"
    );
    assert!(OpCode::Dmx as u16 == 0x5000, "ArtDmx opcode must be 0x5000");
    assert!(OpCode::Sync as u16 == 0x5200, "ArtSync opcode must be 0x5200");
};

/// Art-Net protocol revision (2 bytes, big-endian on the wire)
///
/// Senders may report anything at or above [`ProtocolVersion::CURRENT`];
/// older revisions are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProtocolVersion(pub u16);

impl ProtocolVersion {
    /// Art-Net 4 wire revision
    pub const CURRENT: Self = Self(14);

    /// Create a new protocol revision
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Whether this node accepts frames at this revision
    pub const fn is_supported(self) -> bool {
        self.0 >= Self::CURRENT.0
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 15-bit Art-Net port address
///
/// Identifies one DMX universe within the Art-Net hierarchy:
///
/// ```text
/// bit 15    : reserved, must be zero
/// bits 14-8 : net      (0..=127)
/// bits  7-4 : sub-net  (0..=15)
/// bits  3-0 : universe (0..=15)
/// ```
///
/// Flat addressing is the degenerate case net = sub-net = 0, so the familiar
/// universes 0 through 15 keep their plain numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortAddress(u16);

impl PortAddress {
    /// Universe 0 on net 0, sub-net 0
    pub const ZERO: Self = Self(0);

    /// Create from a full 15-bit value
    ///
    /// Returns `None` if the reserved top bit is set.
    pub const fn new(raw: u16) -> Option<Self> {
        if raw & 0x8000 != 0 {
            return None;
        }
        Some(Self(raw))
    }

    /// Create from hierarchy components
    ///
    /// Returns `None` if any component is out of range.
    pub const fn from_parts(net: u8, subnet: u8, universe: u8) -> Option<Self> {
        if net > 0x7f || subnet > 0x0f || universe > 0x0f {
            return None;
        }
        Some(Self(
            ((net as u16) << 8) | ((subnet as u16) << 4) | universe as u16,
        ))
    }

    /// Full 15-bit value
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Net component (bits 14-8)
    pub const fn net(self) -> u8 {
        ((self.0 >> 8) & 0x7f) as u8
    }

    /// Sub-net component (bits 7-4)
    pub const fn subnet(self) -> u8 {
        ((self.0 >> 4) & 0x0f) as u8
    }

    /// Universe component (bits 3-0)
    pub const fn universe(self) -> u8 {
        (self.0 & 0x0f) as u8
    }
}

impl Default for PortAddress {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for PortAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
