// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! ArtDmx header codec

use super::types::{OpCode, PortAddress, ProtocolVersion};
use crate::error::{DropReason, Error, Result};
use crate::DMX_CHANNELS;

/// Art-Net packet signature "Art-Net\0"
pub const ARTNET_ID: [u8; 8] = *b"Art-Net\0";

/// ArtDmx header (18 bytes)
///
/// ```text
///  0...7: Signature "Art-Net\0"
///  8...9: OpCode 0x5000 (little-endian)
/// 10..11: Protocol revision (big-endian, >= 14)
/// 12    : Sequence (0 = sender disabled sequencing)
/// 13    : Physical input port (diagnostic only)
/// 14..15: Port address (little-endian, bit 15 reserved)
/// 16..17: Channel data length (big-endian)
/// ```
///
/// The mixed byte order is the protocol's, not ours: opcode and port address
/// travel little-endian, revision and length big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DmxHeader {
    /// Protocol revision reported by the sender
    pub version: ProtocolVersion,
    /// Sequence number (0 disables ordering for this frame)
    pub sequence: u8,
    /// Physical input port of the sender
    pub physical: u8,
    /// Addressed universe
    pub address: PortAddress,
    /// Declared channel data length
    pub length: u16,
}

impl DmxHeader {
    /// Size of ArtDmx header in bytes
    pub const SIZE: usize = 18;

    /// Create a new ArtDmx header at the current protocol revision
    pub const fn new(sequence: u8, physical: u8, address: PortAddress, length: u16) -> Self {
        Self {
            version: ProtocolVersion::CURRENT,
            sequence,
            physical,
            address,
            length,
        }
    }

    /// Encode header to bytes (fixed 18 bytes)
    ///
    /// Channel data is appended by the caller, `self.length` bytes starting
    /// at offset [`Self::SIZE`].
    ///
    /// # Returns
    ///
    /// Number of bytes written (always 18)
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        if self.length as usize > DMX_CHANNELS {
            return Err(Error::InvalidParameter);
        }
        if buf.len() < Self::SIZE {
            return Err(Error::BufferTooSmall);
        }

        // Signature "Art-Net\0"
        buf[0..8].copy_from_slice(&ARTNET_ID);

        // OpCode (little-endian)
        buf[8..10].copy_from_slice(&OpCode::Dmx.to_u16().to_le_bytes());

        // Protocol revision (big-endian)
        buf[10..12].copy_from_slice(&self.version.0.to_be_bytes());

        buf[12] = self.sequence;
        buf[13] = self.physical;

        // Port address (little-endian)
        buf[14..16].copy_from_slice(&self.address.raw().to_le_bytes());

        // Channel data length (big-endian)
        buf[16..18].copy_from_slice(&self.length.to_be_bytes());

        Ok(Self::SIZE)
    }

    /// Decode an ArtDmx datagram
    ///
    /// Validates in pipeline order: datagram length, signature, opcode,
    /// protocol revision, reserved address bit. On success returns the header
    /// plus the channel data clamped to
    /// `min(declared length, bytes available, 512)`; the caller detects
    /// truncation by comparing the slice length against [`DmxHeader::length`].
    pub fn decode(datagram: &[u8]) -> core::result::Result<(Self, &[u8]), DropReason> {
        if datagram.len() < Self::SIZE {
            return Err(DropReason::TooShort);
        }

        if datagram[0..8] != ARTNET_ID {
            return Err(DropReason::BadSignature);
        }

        let opcode = u16::from_le_bytes([datagram[8], datagram[9]]);
        if opcode != OpCode::Dmx.to_u16() {
            return Err(DropReason::UnknownOpcode(opcode));
        }

        let version = ProtocolVersion::new(u16::from_be_bytes([datagram[10], datagram[11]]));
        if !version.is_supported() {
            return Err(DropReason::UnsupportedVersion);
        }

        let raw_address = u16::from_le_bytes([datagram[14], datagram[15]]);
        let address = match PortAddress::new(raw_address) {
            Some(address) => address,
            None => return Err(DropReason::MalformedHeader),
        };

        let length = u16::from_be_bytes([datagram[16], datagram[17]]);

        let header = Self {
            version,
            sequence: datagram[12],
            physical: datagram[13],
            address,
            length,
        };

        let available = datagram.len() - Self::SIZE;
        let take = (length as usize).min(available).min(DMX_CHANNELS);
        let channels = &datagram[Self::SIZE..Self::SIZE + take];

        Ok((header, channels))
    }
}
