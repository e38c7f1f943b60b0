// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fuzz target for the full dispatch pipeline
//!
//! Drives arbitrary datagrams through validation, sequence gating, buffer
//! updates and the status outputs. Nothing on this path may panic.

#![no_main]

use libfuzzer_sys::fuzz_target;

use artnode::{DmxReceiver, NullSink, PortAddress};

fuzz_target!(|data: &[u8]| {
    let mut node: DmxReceiver<NullSink, 2> = DmxReceiver::new(NullSink);
    let _ = node.subscribe(PortAddress::ZERO);
    let _ = node.subscribe(PortAddress::from_parts(0, 0, 1).unwrap());

    let _ = node.dispatch(data);

    // Feed it twice so the sequence gate sees history as well
    let _ = node.dispatch(data);
});
