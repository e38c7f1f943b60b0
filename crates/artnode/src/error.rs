// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for artnode

use core::fmt;

/// Result type for artnode operations
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for artnode operations
///
/// Covers failures of the node itself. Per-datagram rejects are not errors;
/// they are classified as [`DropReason`] and never interrupt reception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Buffer too small for operation
    BufferTooSmall,

    /// Invalid parameter
    InvalidParameter,

    /// Resource exhausted (subscription table full, etc.)
    ResourceExhausted,

    /// Transport error
    TransportError,

    /// Status output driver failure
    OutputError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BufferTooSmall => write!(f, "Buffer too small"),
            Error::InvalidParameter => write!(f, "Invalid parameter"),
            Error::ResourceExhausted => write!(f, "Resource exhausted"),
            Error::TransportError => write!(f, "Transport error"),
            Error::OutputError => write!(f, "Status output driver failure"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Why an incoming datagram was not applied
///
/// Every received datagram resolves to either an accepted update or exactly
/// one of these reasons. The order matches the validation pipeline: length,
/// signature, opcode, version, header fields, subscription, sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Datagram shorter than the 18-byte ArtDmx header
    TooShort,

    /// Protocol signature is not "Art-Net\0"
    BadSignature,

    /// Opcode is not ArtDmx; carries the wire value (polls, replies and
    /// sync are ignored)
    UnknownOpcode(u16),

    /// Protocol revision below the minimum this node speaks
    UnsupportedVersion,

    /// Header field violates the wire format (reserved bit set)
    MalformedHeader,

    /// No subscription for the addressed universe
    Unsubscribed,

    /// Sequence number outside the forward window (stale or duplicate)
    StaleOrDuplicate,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::TooShort => write!(f, "datagram too short"),
            DropReason::BadSignature => write!(f, "bad protocol signature"),
            DropReason::UnknownOpcode(opcode) => {
                write!(f, "not an ArtDmx opcode ({:#06x})", opcode)
            }
            DropReason::UnsupportedVersion => write!(f, "unsupported protocol revision"),
            DropReason::MalformedHeader => write!(f, "malformed header"),
            DropReason::Unsubscribed => write!(f, "universe not subscribed"),
            DropReason::StaleOrDuplicate => write!(f, "stale or duplicate sequence"),
        }
    }
}
