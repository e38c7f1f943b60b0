// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fuzz target for the ArtDmx wire parser
//!
//! This fuzzer tests the parser's robustness against malformed input.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decode arbitrary datagrams - must not panic on any input
    let _ = artnode::artnet::DmxHeader::decode(data);
});
