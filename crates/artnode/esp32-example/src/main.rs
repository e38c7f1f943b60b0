// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! artnode ESP32 WiFi Example - Art-Net DMX Receiver
//!
//! Joins WiFi, binds the well-known Art-Net port and mirrors the subscribed
//! universe's first three channels to the status outputs.

use std::sync::atomic::AtomicBool;

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::prelude::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use log::*;

use anyhow::Context as _;
use artnode::output::{FAULT_RED, LINK_GREEN};
use artnode::transport::UdpTransport;
use artnode::{DmxReceiver, PortAddress, StatusSink, Transport};

// WiFi credentials - update these for your network
const WIFI_SSID: &str = "YOUR_WIFI_SSID";
const WIFI_PASS: &str = "YOUR_WIFI_PASSWORD";

// Universe to listen on (0..=32767, packed net/subnet/universe)
const UNIVERSE: u16 = 0;

const WIFI_MAX_ATTEMPTS: u32 = 3;

static RUNNING: AtomicBool = AtomicBool::new(true);

/// Status sink backed by the serial console
struct LedSink;

impl StatusSink for LedSink {
    fn set_color(&mut self, r: u8, g: u8, b: u8) -> artnode::Result<()> {
        // TODO: drive the board's WS2812 via the RMT peripheral
        info!("[led] rgb({},{},{})", r, g, b);
        Ok(())
    }

    fn show_status(&mut self, text: &str) -> artnode::Result<()> {
        info!("[status] {}", text);
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    info!("========================================");
    info!("  artnode ESP32 - Art-Net DMX Receiver");
    info!("========================================");

    // Initialize peripherals
    let peripherals = Peripherals::take()?;
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let mut wifi = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sys_loop.clone(), Some(nvs))?,
        sys_loop,
    )?;

    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: WIFI_SSID.try_into().unwrap(),
        password: WIFI_PASS.try_into().unwrap(),
        ..Default::default()
    }))?;
    wifi.start()?;

    let mut sink = LedSink;

    let mut attempt = 1;
    loop {
        info!(
            "Connecting to WiFi: {} (attempt {}/{})",
            WIFI_SSID, attempt, WIFI_MAX_ATTEMPTS
        );
        match wifi.connect() {
            Ok(()) => break,
            Err(e) if attempt < WIFI_MAX_ATTEMPTS => {
                warn!("WiFi connect failed: {}", e);
                attempt += 1;
            }
            Err(e) => {
                let (r, g, b) = FAULT_RED;
                let _ = sink.set_color(r, g, b);
                return Err(e.into());
            }
        }
    }
    wifi.wait_netif_up()?;

    let ip_info = wifi.wifi().sta_netif().get_ip_info()?;
    info!("WiFi connected!");
    info!("  IP: {}", ip_info.ip);
    let (r, g, b) = LINK_GREEN;
    let _ = sink.set_color(r, g, b);

    let mut transport = UdpTransport::artnet()?;
    info!("Listening for ArtDmx on udp/{}", transport.local_port());

    let mut node: DmxReceiver<LedSink, 1> = DmxReceiver::new(sink);
    let address = PortAddress::new(UNIVERSE).context("UNIVERSE has the reserved bit set")?;
    node.subscribe(address)?;
    info!("Subscribed universe {}", address);

    // The flag is never cleared on the device; run() only returns on a
    // transport failure, which ESP-IDF answers with a reboot.
    node.run(&mut transport, &RUNNING)?;

    Ok(())
}
