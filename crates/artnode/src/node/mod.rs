// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Receiver core
//!
//! Ties the wire layer to application state: per-universe sequence gating
//! ([`SequenceGate`]), channel storage ([`UniverseBuffer`]) and the dispatch
//! plus housekeeping loop ([`DmxReceiver`]).

pub mod receiver;
pub mod sequence;
pub mod universe;

// Re-exports
pub use receiver::{Dispatch, DmxReceiver, ReceiverConfig};
pub use sequence::SequenceGate;
pub use universe::UniverseBuffer;
