// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Art-Net Status Node Example
//!
//! Receives ArtDmx on the well-known port and mirrors the status outputs a
//! board would drive (RGB LED, status display) to the terminal.
//!
//! ## Usage
//!
//! ```sh
//! cargo run --example status_node --features std -- [universe]
//! ```
//!
//! Send it traffic from a lighting console, or from another terminal:
//! ```sh
//! cargo run -p artnode-echo -- --send --channels 255,0,0
//! ```

use std::sync::atomic::AtomicBool;

use artnode::transport::UdpTransport;
use artnode::{Dispatch, DmxReceiver, PortAddress, Result, StatusSink, Transport};

static RUNNING: AtomicBool = AtomicBool::new(true);

/// Sink that prints what a board would show
struct PrintSink;

impl StatusSink for PrintSink {
    fn set_color(&mut self, r: u8, g: u8, b: u8) -> Result<()> {
        println!("[LED] rgb({},{},{})", r, g, b);
        Ok(())
    }

    fn show_status(&mut self, text: &str) -> Result<()> {
        println!("[LCD] {}", text);
        Ok(())
    }
}

fn main() -> Result<()> {
    println!("[*]  artnode - Art-Net Status Node");
    println!("==================================\n");

    let args: Vec<String> = std::env::args().collect();
    let universe = args
        .get(1)
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(0);
    let address = match PortAddress::new(universe) {
        Some(address) => address,
        None => {
            eprintln!("[X] Invalid universe {} (must be 0..=32767)", universe);
            std::process::exit(1);
        }
    };

    let mut transport = UdpTransport::artnet()?;
    println!("[OK] Listening on udp/{}", transport.local_port());

    let mut node: DmxReceiver<PrintSink, 1> = DmxReceiver::new(PrintSink);
    node.subscribe(address)?;
    println!("[OK] Subscribed universe {}", address);
    println!("[<]  Waiting for ArtDmx... (Ctrl+C to stop)\n");

    let mut polls: u32 = 0;
    while RUNNING.load(std::sync::atomic::Ordering::Relaxed) {
        if let Some(Dispatch::Dropped(reason)) = node.poll_once(&mut transport)? {
            println!("[X] drop: {}", reason);
        }

        // Periodic counters, roughly once a minute at the default timeout
        polls = polls.wrapping_add(1);
        if polls % 600 == 0 {
            println!("\n{}\n", node.stats().format_summary());
        }
    }

    Ok(())
}
