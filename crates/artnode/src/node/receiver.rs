// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DmxReceiver - dispatch pipeline and reception loop

use core::fmt::Write as _;
use core::sync::atomic::{AtomicBool, Ordering};

use heapless::{String, Vec};

use crate::artnet::{DmxHeader, PortAddress};
use crate::error::{DropReason, Error, Result};
use crate::node::sequence::SequenceGate;
use crate::node::universe::UniverseBuffer;
use crate::output::{StatusSink, FAULT_RED, IDLE_BLUE, OFF};
use crate::stats::ReceiverStats;
use crate::transport::Transport;
use crate::{DMX_CHANNELS, MAX_FRAME_LEN};

/// Outcome of dispatching one datagram
///
/// Every datagram handed to the receiver resolves to exactly one of these;
/// neither variant is an error and neither interrupts reception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Frame applied to a subscribed universe
    Accepted {
        /// Universe that was updated
        address: PortAddress,
        /// Channels written
        channels: u16,
        /// Frame carried fewer channel bytes than its header declared
        truncated: bool,
    },
    /// Datagram classified and ignored
    Dropped(DropReason),
}

/// Receiver tuning
///
/// Housekeeping cadence is measured in polls rather than wall clock so the
/// receiver stays free of platform timers.
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Transport poll timeout in milliseconds
    pub poll_timeout_ms: u32,

    /// Polls between housekeeping passes, heartbeat toggle and link check
    /// (0 disables)
    pub heartbeat_polls: u32,

    /// Polls between statistics log lines (0 disables)
    pub stats_polls: u32,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: 100,
            heartbeat_polls: 5,
            stats_polls: 600,
        }
    }
}

/// One subscribed universe: ordering gate plus channel storage
#[derive(Debug)]
struct Subscription {
    address: PortAddress,
    gate: SequenceGate,
    buffer: UniverseBuffer,
}

impl Subscription {
    fn new(address: PortAddress) -> Self {
        Self {
            address,
            gate: SequenceGate::new(),
            buffer: UniverseBuffer::new(),
        }
    }
}

/// Art-Net DMX receiver
///
/// Owns the subscription table, per-universe state and the status sink, and
/// drives the whole node from a single cooperative loop. `N` bounds the
/// number of subscribed universes.
///
/// # Example
///
/// ```ignore
/// let mut node: DmxReceiver<LedSink, 2> = DmxReceiver::new(LedSink::new());
/// node.subscribe(PortAddress::ZERO)?;
/// node.run(&mut transport, &RUNNING)?;
/// ```
pub struct DmxReceiver<S: StatusSink, const N: usize = 4> {
    config: ReceiverConfig,
    subscriptions: Vec<Subscription, N>,
    sink: S,
    stats: ReceiverStats,

    /// Total polls (housekeeping and stats cadence)
    polls: u32,
    heartbeat_on: bool,
    /// Set on the first accepted frame; hands the indicator over to traffic
    traffic_seen: bool,
}

impl<S: StatusSink, const N: usize> DmxReceiver<S, N> {
    /// Create a receiver with default tuning
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, ReceiverConfig::default())
    }

    /// Create a receiver with explicit tuning
    pub fn with_config(sink: S, config: ReceiverConfig) -> Self {
        Self {
            config,
            subscriptions: Vec::new(),
            sink,
            stats: ReceiverStats::default(),
            polls: 0,
            heartbeat_on: false,
            traffic_seen: false,
        }
    }

    /// Subscribe to a universe
    ///
    /// Subscribing twice to the same address is a no-op. Returns
    /// `Err(Error::ResourceExhausted)` once all `N` slots are taken.
    pub fn subscribe(&mut self, address: PortAddress) -> Result<()> {
        if self.subscription(address).is_some() {
            return Ok(());
        }
        self.subscriptions
            .push(Subscription::new(address))
            .map_err(|_| Error::ResourceExhausted)?;
        log::debug!("[node] subscribed universe {}", address);
        Ok(())
    }

    /// Number of subscribed universes
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Iterate over subscribed universes
    pub fn subscriptions(&self) -> impl Iterator<Item = PortAddress> + '_ {
        self.subscriptions.iter().map(|s| s.address)
    }

    /// Channel storage of a subscribed universe
    pub fn universe(&self, address: PortAddress) -> Option<&UniverseBuffer> {
        self.subscription(address).map(|s| &s.buffer)
    }

    /// Copy out the full channel state of a universe
    pub fn snapshot(&self, address: PortAddress) -> Option<[u8; DMX_CHANNELS]> {
        self.universe(address).map(UniverseBuffer::snapshot)
    }

    /// Read one channel of a subscribed universe
    pub fn channel(&self, address: PortAddress, index: u16) -> Option<u8> {
        self.universe(address).and_then(|b| b.channel(index))
    }

    /// Reception statistics
    pub const fn stats(&self) -> &ReceiverStats {
        &self.stats
    }

    /// Status sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable status sink access
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn subscription(&self, address: PortAddress) -> Option<&Subscription> {
        self.subscriptions.iter().find(|s| s.address == address)
    }

    /// Classify one datagram and apply it if every check passes
    ///
    /// The pipeline: wire validation, subscription lookup, sequence gate,
    /// buffer update, status outputs. Each rejected datagram is counted under
    /// exactly one [`DropReason`].
    pub fn dispatch(&mut self, datagram: &[u8]) -> Dispatch {
        self.stats.record_datagram();

        let (header, payload) = match DmxHeader::decode(datagram) {
            Ok(parts) => parts,
            Err(reason) => return self.drop_frame(reason),
        };

        let sub = match self
            .subscriptions
            .iter_mut()
            .find(|s| s.address == header.address)
        {
            Some(sub) => sub,
            None => return self.drop_frame(DropReason::Unsubscribed),
        };

        if !sub.gate.admit(header.sequence) {
            return self.drop_frame(DropReason::StaleOrDuplicate);
        }

        let written = sub.buffer.apply(payload);
        let (r, g, b) = sub.buffer.rgb();
        let address = header.address;
        let truncated = written < header.length as usize;

        self.stats.record_accepted(truncated);
        if truncated {
            log::warn!(
                "[node] univ {}: truncated frame ({} of {} channels)",
                address,
                written,
                header.length
            );
        }
        log::trace!(
            "[node] univ {}: {} channels, seq {}",
            address,
            written,
            header.sequence
        );

        self.update_outputs(address, r, g, b);

        Dispatch::Accepted {
            address,
            channels: written as u16,
            truncated,
        }
    }

    /// Poll the transport once
    ///
    /// Returns `Ok(None)` when the poll timed out with no datagram.
    /// Housekeeping (heartbeat, link check) and the periodic statistics line
    /// run from here on every pass, datagram or not, so a busy broadcast
    /// segment cannot starve them.
    pub fn poll_once<T: Transport>(&mut self, transport: &mut T) -> Result<Option<Dispatch>> {
        self.polls = self.polls.wrapping_add(1);
        self.maybe_log_stats();

        let mut buf = [0u8; MAX_FRAME_LEN];
        let outcome = transport
            .poll_recv(&mut buf, self.config.poll_timeout_ms)?
            .map(|len| self.dispatch(&buf[..len]));

        self.housekeeping(transport.link_up());
        Ok(outcome)
    }

    /// Run the reception loop until `running` is cleared
    ///
    /// The flag is consulted between polls only; embedded callers typically
    /// pass a flag that is never cleared. Dropped datagrams never end the
    /// loop, a failing transport does.
    pub fn run<T: Transport>(&mut self, transport: &mut T, running: &AtomicBool) -> Result<()> {
        log::info!(
            "[node] receiving on udp/{} ({} universes)",
            transport.local_port(),
            self.subscriptions.len()
        );

        while running.load(Ordering::Relaxed) {
            self.poll_once(transport)?;
        }

        log::info!("[node] stopped");
        Ok(())
    }

    fn drop_frame(&mut self, reason: DropReason) -> Dispatch {
        self.stats.record_drop(reason);
        match reason {
            // Foreign traffic is routine on a broadcast medium
            DropReason::UnknownOpcode(_) | DropReason::Unsubscribed => {
                log::trace!("[node] drop: {}", reason);
            }
            _ => log::debug!("[node] drop: {}", reason),
        }
        Dispatch::Dropped(reason)
    }

    /// Mirror an accepted update to the status outputs
    ///
    /// Sink failures are counted and logged, never propagated: a broken LED
    /// must not stall reception.
    fn update_outputs(&mut self, address: PortAddress, r: u8, g: u8, b: u8) {
        self.traffic_seen = true;

        if let Err(e) = self.sink.set_color(r, g, b) {
            self.stats.record_output_error();
            log::debug!("[node] sink rejected color: {}", e);
        }

        let mut text: String<48> = String::new();
        let _ = write!(text, "univ {}: rgb({},{},{})", address, r, g, b);
        if let Err(e) = self.sink.show_status(&text) {
            self.stats.record_output_error();
            log::debug!("[node] sink rejected status: {}", e);
        }
    }

    /// Periodic housekeeping, run once per poll
    ///
    /// The indicator belongs to housekeeping only until the first accepted
    /// frame; from then on it follows traffic exclusively. The cadence counts
    /// dispatching polls as well as timeouts, so steady foreign traffic (all
    /// of it dropped) cannot starve the heartbeat or the link check.
    fn housekeeping(&mut self, link_up: bool) {
        if self.config.heartbeat_polls == 0 || self.polls % self.config.heartbeat_polls != 0 {
            return;
        }

        if !link_up {
            log::warn!("[node] transport link down");
            if !self.traffic_seen {
                let (r, g, b) = FAULT_RED;
                if self.sink.set_color(r, g, b).is_err() {
                    self.stats.record_output_error();
                }
            }
            return;
        }

        if self.traffic_seen {
            return;
        }

        self.heartbeat_on = !self.heartbeat_on;
        let (r, g, b) = if self.heartbeat_on { IDLE_BLUE } else { OFF };
        if self.sink.set_color(r, g, b).is_err() {
            self.stats.record_output_error();
        }
    }

    fn maybe_log_stats(&self) {
        if self.config.stats_polls == 0 || self.polls % self.config.stats_polls != 0 {
            return;
        }
        let s = &self.stats;
        log::info!(
            "[node] rx={} accepted={} truncated={} dropped={} (stale={} unsub={}) sink_err={}",
            s.datagrams,
            s.accepted,
            s.truncated,
            s.dropped_total(),
            s.stale_or_duplicate,
            s.unsubscribed,
            s.output_errors
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::NullTransport;

    struct TestSink {
        colors: u32,
        statuses: u32,
        last_color: (u8, u8, u8),
        last_status: String<48>,
        fail: bool,
    }

    impl TestSink {
        fn new() -> Self {
            Self {
                colors: 0,
                statuses: 0,
                last_color: (0, 0, 0),
                last_status: String::new(),
                fail: false,
            }
        }
    }

    impl StatusSink for TestSink {
        fn set_color(&mut self, r: u8, g: u8, b: u8) -> Result<()> {
            if self.fail {
                return Err(Error::OutputError);
            }
            self.colors += 1;
            self.last_color = (r, g, b);
            Ok(())
        }

        fn show_status(&mut self, text: &str) -> Result<()> {
            if self.fail {
                return Err(Error::OutputError);
            }
            self.statuses += 1;
            self.last_status.clear();
            let _ = self.last_status.push_str(text);
            Ok(())
        }
    }

    /// Transport whose every poll delivers the same datagram
    struct BusySource {
        frame: [u8; MAX_FRAME_LEN],
        len: usize,
        link: bool,
    }

    impl Transport for BusySource {
        fn poll_recv(&mut self, buf: &mut [u8], _timeout_ms: u32) -> Result<Option<usize>> {
            buf[..self.len].copy_from_slice(&self.frame[..self.len]);
            Ok(Some(self.len))
        }

        fn link_up(&self) -> bool {
            self.link
        }

        fn local_port(&self) -> u16 {
            crate::ARTNET_PORT
        }
    }

    fn dmx_frame(
        address: PortAddress,
        sequence: u8,
        channels: &[u8],
    ) -> ([u8; MAX_FRAME_LEN], usize) {
        let mut buf = [0u8; MAX_FRAME_LEN];
        let header = DmxHeader::new(sequence, 0, address, channels.len() as u16);
        let n = header.encode(&mut buf).unwrap();
        buf[n..n + channels.len()].copy_from_slice(channels);
        (buf, n + channels.len())
    }

    fn receiver() -> DmxReceiver<TestSink, 4> {
        let mut rx = DmxReceiver::new(TestSink::new());
        rx.subscribe(PortAddress::ZERO).unwrap();
        rx
    }

    #[test]
    fn test_dispatch_updates_universe_and_outputs() {
        let mut rx = receiver();
        let (buf, len) = dmx_frame(PortAddress::ZERO, 1, &[255, 0, 0, 42]);

        let outcome = rx.dispatch(&buf[..len]);
        assert_eq!(
            outcome,
            Dispatch::Accepted {
                address: PortAddress::ZERO,
                channels: 4,
                truncated: false,
            }
        );

        assert_eq!(rx.channel(PortAddress::ZERO, 0), Some(255));
        assert_eq!(rx.channel(PortAddress::ZERO, 3), Some(42));
        assert_eq!(rx.sink().last_color, (255, 0, 0));
        assert_eq!(rx.sink().last_status.as_str(), "univ 0: rgb(255,0,0)");
    }

    #[test]
    fn test_dispatch_unsubscribed_universe() {
        let mut rx = receiver();
        let other = PortAddress::from_parts(0, 0, 7).unwrap();
        let (buf, len) = dmx_frame(other, 1, &[1, 2, 3]);

        assert_eq!(
            rx.dispatch(&buf[..len]),
            Dispatch::Dropped(DropReason::Unsubscribed)
        );
        assert_eq!(rx.stats().unsubscribed, 1);
        assert_eq!(rx.sink().colors, 0);
    }

    #[test]
    fn test_dispatch_stale_sequence_keeps_buffer() {
        let mut rx = receiver();
        let (fresh, fresh_len) = dmx_frame(PortAddress::ZERO, 10, &[100]);
        let (stale, stale_len) = dmx_frame(PortAddress::ZERO, 9, &[200]);

        rx.dispatch(&fresh[..fresh_len]);
        assert_eq!(
            rx.dispatch(&stale[..stale_len]),
            Dispatch::Dropped(DropReason::StaleOrDuplicate)
        );
        assert_eq!(rx.channel(PortAddress::ZERO, 0), Some(100));
    }

    #[test]
    fn test_dispatch_sequence_wraparound() {
        let mut rx = receiver();
        for (seq, value) in [(250u8, 1u8), (255, 2), (1, 3)] {
            let (buf, len) = dmx_frame(PortAddress::ZERO, seq, &[value]);
            assert!(matches!(
                rx.dispatch(&buf[..len]),
                Dispatch::Accepted { .. }
            ));
        }
        assert_eq!(rx.channel(PortAddress::ZERO, 0), Some(3));
    }

    #[test]
    fn test_dispatch_partial_update_keeps_tail() {
        let mut rx = receiver();
        let full = [9u8; DMX_CHANNELS];
        let (buf, len) = dmx_frame(PortAddress::ZERO, 1, &full);
        rx.dispatch(&buf[..len]);

        let (short, short_len) = dmx_frame(PortAddress::ZERO, 2, &[1, 2, 3]);
        rx.dispatch(&short[..short_len]);

        assert_eq!(rx.channel(PortAddress::ZERO, 2), Some(3));
        assert_eq!(rx.channel(PortAddress::ZERO, 3), Some(9));
        assert_eq!(rx.channel(PortAddress::ZERO, 511), Some(9));
    }

    #[test]
    fn test_dispatch_truncated_frame() {
        let mut rx = receiver();
        // Header declares 512 channels, datagram carries 2
        let mut buf = [0u8; DmxHeader::SIZE + 2];
        DmxHeader::new(1, 0, PortAddress::ZERO, 512)
            .encode(&mut buf)
            .unwrap();
        buf[18] = 5;
        buf[19] = 6;

        assert_eq!(
            rx.dispatch(&buf),
            Dispatch::Accepted {
                address: PortAddress::ZERO,
                channels: 2,
                truncated: true,
            }
        );
        assert_eq!(rx.stats().truncated, 1);
    }

    #[test]
    fn test_independent_universe_sequences() {
        let mut rx = receiver();
        let second = PortAddress::from_parts(0, 0, 1).unwrap();
        rx.subscribe(second).unwrap();

        let (a, a_len) = dmx_frame(PortAddress::ZERO, 100, &[1]);
        let (b, b_len) = dmx_frame(second, 5, &[2]);
        rx.dispatch(&a[..a_len]);
        rx.dispatch(&b[..b_len]);

        // Universe 1's window is far behind universe 0's and must not care
        let (b2, b2_len) = dmx_frame(second, 6, &[3]);
        assert!(matches!(
            rx.dispatch(&b2[..b2_len]),
            Dispatch::Accepted { .. }
        ));
        assert_eq!(rx.channel(second, 0), Some(3));
        assert_eq!(rx.channel(PortAddress::ZERO, 0), Some(1));
    }

    #[test]
    fn test_failing_sink_never_blocks_dispatch() {
        let mut rx = receiver();
        rx.sink_mut().fail = true;

        let (buf, len) = dmx_frame(PortAddress::ZERO, 1, &[7, 8, 9]);
        assert!(matches!(
            rx.dispatch(&buf[..len]),
            Dispatch::Accepted { .. }
        ));
        assert_eq!(rx.channel(PortAddress::ZERO, 0), Some(7));
        assert_eq!(rx.stats().output_errors, 2); // color + status
    }

    #[test]
    fn test_subscribe_capacity_and_idempotence() {
        let mut rx: DmxReceiver<TestSink, 1> = DmxReceiver::new(TestSink::new());
        rx.subscribe(PortAddress::ZERO).unwrap();
        rx.subscribe(PortAddress::ZERO).unwrap(); // no-op
        assert_eq!(rx.subscription_count(), 1);

        let other = PortAddress::from_parts(0, 0, 1).unwrap();
        assert_eq!(rx.subscribe(other), Err(Error::ResourceExhausted));
    }

    #[test]
    fn test_poll_once_without_traffic() {
        let mut rx = receiver();
        let mut transport = NullTransport::default();
        assert_eq!(rx.poll_once(&mut transport).unwrap(), None);
    }

    #[test]
    fn test_idle_heartbeat_stops_after_first_frame() {
        let mut rx: DmxReceiver<TestSink, 4> = DmxReceiver::with_config(
            TestSink::new(),
            ReceiverConfig {
                poll_timeout_ms: 1,
                heartbeat_polls: 1,
                stats_polls: 0,
            },
        );
        rx.subscribe(PortAddress::ZERO).unwrap();

        let mut transport = NullTransport::default();
        rx.poll_once(&mut transport).unwrap();
        rx.poll_once(&mut transport).unwrap();
        let blinks = rx.sink().colors;
        assert!(blinks >= 2);

        let (buf, len) = dmx_frame(PortAddress::ZERO, 1, &[1, 2, 3]);
        rx.dispatch(&buf[..len]);
        let after_accept = rx.sink().colors;

        // Idle polls no longer touch the indicator
        rx.poll_once(&mut transport).unwrap();
        rx.poll_once(&mut transport).unwrap();
        assert_eq!(rx.sink().colors, after_accept);
    }

    #[test]
    fn test_housekeeping_runs_under_steady_foreign_traffic() {
        let mut rx: DmxReceiver<TestSink, 4> = DmxReceiver::with_config(
            TestSink::new(),
            ReceiverConfig {
                poll_timeout_ms: 1,
                heartbeat_polls: 1,
                stats_polls: 0,
            },
        );
        rx.subscribe(PortAddress::ZERO).unwrap();

        // Every poll delivers a frame for a universe this node ignores
        let foreign = PortAddress::from_parts(0, 0, 7).unwrap();
        let (frame, len) = dmx_frame(foreign, 1, &[1, 2, 3]);
        let mut transport = BusySource {
            frame,
            len,
            link: true,
        };

        for _ in 0..10 {
            assert_eq!(
                rx.poll_once(&mut transport).unwrap(),
                Some(Dispatch::Dropped(DropReason::Unsubscribed))
            );
        }

        // Ten drops, and the heartbeat still blinked on every pass
        assert_eq!(rx.stats().unsubscribed, 10);
        assert_eq!(rx.sink().colors, 10);

        // The first accepted frame still hands the indicator over to traffic
        let (own, own_len) = dmx_frame(PortAddress::ZERO, 1, &[9]);
        rx.dispatch(&own[..own_len]);
        let after_accept = rx.sink().colors;

        for _ in 0..5 {
            rx.poll_once(&mut transport).unwrap();
        }
        assert_eq!(rx.sink().colors, after_accept);
    }

    #[test]
    fn test_link_down_signalled_despite_queued_traffic() {
        let mut rx: DmxReceiver<TestSink, 4> = DmxReceiver::with_config(
            TestSink::new(),
            ReceiverConfig {
                poll_timeout_ms: 1,
                heartbeat_polls: 1,
                stats_polls: 0,
            },
        );
        rx.subscribe(PortAddress::ZERO).unwrap();

        // The driver still drains buffered foreign datagrams while the link
        // is down; the fault colour must show anyway
        let foreign = PortAddress::from_parts(0, 0, 7).unwrap();
        let (frame, len) = dmx_frame(foreign, 1, &[1, 2, 3]);
        let mut transport = BusySource {
            frame,
            len,
            link: false,
        };

        rx.poll_once(&mut transport).unwrap();
        assert_eq!(rx.sink().last_color, FAULT_RED);
    }

    #[test]
    fn test_stats_count_each_datagram_once() {
        let mut rx = receiver();
        let (good, good_len) = dmx_frame(PortAddress::ZERO, 1, &[1]);
        rx.dispatch(&good[..good_len]);
        rx.dispatch(b"garbage");
        rx.dispatch(&good[..good_len]); // duplicate seq

        let s = rx.stats();
        assert_eq!(s.datagrams, 3);
        assert_eq!(s.accepted, 1);
        assert_eq!(s.too_short, 1);
        assert_eq!(s.stale_or_duplicate, 1);
        assert_eq!(s.dropped_total(), 2);
    }
}
