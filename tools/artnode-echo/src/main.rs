// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! artnode-echo - Echo Art-Net DMX frames in real-time
//!
//! Like `tcpdump` but it speaks ArtDmx: shows decoded headers, channel data
//! and the derived RGB colour for every frame on the wire. Can also generate
//! test frames (`--send`) to exercise a receiver.

use chrono::Local;
use clap::Parser;
use colored::*;
use std::io::{self, Write};
use std::net::UdpSocket;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use artnode::artnet::DmxHeader;
use artnode::transport::UdpTransport;
use artnode::{DropReason, PortAddress, ReceiverStats, Transport, MAX_FRAME_LEN};

/// Echo Art-Net DMX frames in real-time
#[derive(Parser, Debug)]
#[command(name = "artnode-echo")]
#[command(version = "0.1.0")]
#[command(about = "Echo Art-Net DMX frames (like tcpdump for ArtDmx)")]
struct Args {
    /// Universe to show (packed port-address, 0..=32767; omit for all)
    universe: Option<u16>,

    /// UDP port to listen or send on
    #[arg(short, long, default_value = "6454")]
    port: u16,

    /// Output format: pretty, json, compact, raw
    #[arg(short, long, default_value = "pretty")]
    format: OutputFormat,

    /// Shortcut for --format json
    #[arg(long)]
    json: bool,

    /// Shortcut for --format raw
    #[arg(long)]
    raw: bool,

    /// Maximum number of frames to show or send (0 = unlimited)
    #[arg(short = 'n', long, default_value = "0")]
    count: u64,

    /// Show non-DMX traffic and drop reasons as well
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Quiet mode - only output data, no headers
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Send ArtDmx frames instead of listening
    #[arg(long)]
    send: bool,

    /// Destination for --send
    #[arg(long, default_value = "255.255.255.255")]
    target: String,

    /// Channel values for --send, comma separated
    #[arg(long, default_value = "255,0,0")]
    channels: String,

    /// Frames per second for --send
    #[arg(long, default_value = "10")]
    rate: u32,
}

#[derive(Clone, Debug, PartialEq)]
enum OutputFormat {
    Pretty,
    Json,
    Compact,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "p" => Ok(OutputFormat::Pretty),
            "json" | "j" => Ok(OutputFormat::Json),
            "compact" | "c" => Ok(OutputFormat::Compact),
            "raw" | "r" | "hex" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

fn main() {
    let args = Args::parse();

    // Handle color preference
    if args.no_color || !is_tty() {
        colored::control::set_override(false);
    }

    // Determine output format (shortcuts override --format)
    let format = if args.json {
        OutputFormat::Json
    } else if args.raw {
        OutputFormat::Raw
    } else {
        args.format.clone()
    };

    let result = if args.send {
        run_send(&args)
    } else {
        run_echo(&args, format)
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_echo(args: &Args, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    // Setup Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let filter = match args.universe {
        Some(u) => {
            Some(PortAddress::new(u).ok_or("universe must be 0..=32767 (bit 15 is reserved)")?)
        }
        None => None,
    };

    if !args.quiet {
        print_header(args, &format);
    }

    let mut transport = UdpTransport::bind(args.port)?;
    let mut stats = ReceiverStats::default();
    let mut shown: u64 = 0;

    // Oversized so foreign packets (ArtPollReply is 239 bytes) fit whole
    let mut buf = [0u8; 1024];

    while running.load(Ordering::SeqCst) {
        if args.count > 0 && shown >= args.count {
            break;
        }

        let len = match transport.poll_recv(&mut buf, 100)? {
            Some(len) => len,
            None => continue,
        };
        let datagram = &buf[..len];
        stats.record_datagram();

        match DmxHeader::decode(datagram) {
            Ok((header, payload)) => {
                if let Some(wanted) = filter {
                    if header.address != wanted {
                        stats.record_drop(DropReason::Unsubscribed);
                        continue;
                    }
                }

                let truncated = payload.len() < header.length as usize;
                stats.record_accepted(truncated);
                shown += 1;

                print_frame(&header, payload, &format, args.verbose, shown);
                let _ = io::stdout().flush();
            }
            Err(reason) => {
                stats.record_drop(reason);
                if args.verbose {
                    print_drop(datagram, reason);
                }
            }
        }
    }

    if !args.quiet {
        eprintln!("\n{}", "---".dimmed());
        eprintln!("{}", stats.format_summary());
    }

    Ok(())
}

fn run_send(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let address = PortAddress::new(args.universe.unwrap_or(0))
        .ok_or("universe must be 0..=32767 (bit 15 is reserved)")?;
    let channels = parse_channels(&args.channels)?;

    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.set_broadcast(true)?;
    let target = format!("{}:{}", args.target, args.port);

    if !args.quiet {
        eprintln!(
            "{} {} {} (univ={}, {} channels, {} fps)",
            ">>>".green().bold(),
            "Sending ArtDmx to".bold(),
            target.cyan(),
            address,
            channels.len(),
            args.rate.max(1)
        );
        eprintln!("{}", "Press Ctrl+C to stop".dimmed());
        eprintln!();
    }

    let frames = if args.count == 0 { u64::MAX } else { args.count };
    let period = Duration::from_secs_f64(1.0 / f64::from(args.rate.max(1)));

    // Sequence 0 tells receivers to skip ordering, so the counter wraps
    // 255 -> 1
    let mut sequence: u8 = 1;
    let mut buf = [0u8; MAX_FRAME_LEN];
    let mut sent: u64 = 0;

    while sent < frames && running.load(Ordering::SeqCst) {
        let header = DmxHeader::new(sequence, 0, address, channels.len() as u16);
        let header_len = header.encode(&mut buf)?;
        buf[header_len..header_len + channels.len()].copy_from_slice(&channels);
        socket.send_to(&buf[..header_len + channels.len()], &target)?;

        sent += 1;
        if !args.quiet {
            println!(
                "{} {} univ {} seq {} ({} channels)",
                ">>".green(),
                format!("#{}", sent).yellow(),
                address,
                sequence,
                channels.len()
            );
        }

        sequence = if sequence == 255 { 1 } else { sequence + 1 };
        std::thread::sleep(period);
    }

    if !args.quiet {
        eprintln!("\n{} Sent {} frame(s)", "---".dimmed(), sent);
    }

    Ok(())
}

fn parse_channels(arg: &str) -> Result<Vec<u8>, String> {
    let values: Result<Vec<u8>, _> = arg
        .split(',')
        .map(|v| v.trim().parse::<u8>())
        .collect();
    let values = values.map_err(|e| format!("bad channel value in '{}': {}", arg, e))?;

    if values.is_empty() {
        return Err("need at least one channel value".to_string());
    }
    if values.len() > 512 {
        return Err(format!("at most 512 channels, got {}", values.len()));
    }
    Ok(values)
}

fn print_header(args: &Args, format: &OutputFormat) {
    let scope = match args.universe {
        Some(u) => format!("universe {}", u),
        None => "all universes".to_string(),
    };
    eprintln!(
        "{} {} {} (port={}, format={:?})",
        ">>>".green().bold(),
        "Listening for ArtDmx on".bold(),
        scope.cyan(),
        args.port,
        format
    );
    eprintln!("{}", "Press Ctrl+C to stop".dimmed());
    eprintln!();
}

fn print_frame(
    header: &DmxHeader,
    payload: &[u8],
    format: &OutputFormat,
    verbose: bool,
    seq: u64,
) {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

    match format {
        OutputFormat::Pretty => print_pretty(header, payload, verbose, &timestamp.to_string(), seq),
        OutputFormat::Json => print_json(header, payload, seq),
        OutputFormat::Compact => print_compact(header, payload, seq),
        OutputFormat::Raw => print_raw(header, payload, &timestamp.to_string(), seq),
    }
}

fn print_pretty(header: &DmxHeader, payload: &[u8], verbose: bool, timestamp: &str, seq: u64) {
    if verbose {
        println!(
            "{} {} univ {} seq {} phys {} ({} of {} channels)",
            format!("[{}]", timestamp).dimmed(),
            format!("#{}", seq).yellow(),
            header.address.to_string().cyan(),
            header.sequence,
            header.physical,
            payload.len(),
            header.length
        );
    } else {
        println!(
            "{} {} univ {} seq {} ({} channels)",
            format!("[{}]", timestamp).dimmed(),
            format!("#{}", seq).yellow(),
            header.address.to_string().cyan(),
            header.sequence,
            payload.len()
        );
    }

    // Colour a receiver node would derive from this frame
    let r = payload.first().copied().unwrap_or(0);
    let g = payload.get(1).copied().unwrap_or(0);
    let b = payload.get(2).copied().unwrap_or(0);
    println!(
        "  {} {}",
        format!("rgb({},{},{})", r, g, b).truecolor(r, g, b),
        "    ".on_truecolor(r, g, b)
    );

    print_channel_preview(payload);
    println!();
}

fn print_json(header: &DmxHeader, payload: &[u8], seq: u64) {
    println!(
        r#"{{"seq":{},"univ":{},"dmx_seq":{},"len":{},"channels":"{}"}}"#,
        seq,
        header.address.raw(),
        header.sequence,
        payload.len(),
        base64_encode(payload)
    );
}

fn print_compact(header: &DmxHeader, payload: &[u8], seq: u64) {
    let preview: String = payload
        .iter()
        .take(16)
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join("");
    let suffix = if payload.len() > 16 { "..." } else { "" };

    println!(
        "#{}: univ={} seq={} len={} {}{}",
        seq,
        header.address,
        header.sequence,
        payload.len(),
        preview,
        suffix
    );
}

fn print_raw(header: &DmxHeader, payload: &[u8], timestamp: &str, seq: u64) {
    println!(
        "{} #{} univ {} ({} bytes)",
        format!("[{}]", timestamp).dimmed(),
        seq,
        header.address,
        payload.len()
    );
    print_hex_dump(payload);
    println!();
}

fn print_drop(datagram: &[u8], reason: DropReason) {
    // Name the routine neighbours on this port before falling back to the
    // numeric opcode
    if let DropReason::UnknownOpcode(opcode) = reason {
        let label = match opcode {
            0x2000 => "ArtPoll".to_string(),
            0x2100 => "ArtPollReply".to_string(),
            0x5200 => "ArtSync".to_string(),
            other => format!("opcode {:#06x}", other),
        };
        println!(
            "{}",
            format!("-- {} ({} bytes)", label, datagram.len()).dimmed()
        );
    } else {
        println!(
            "{} {}",
            "--".yellow(),
            format!("{} ({} bytes)", reason, datagram.len()).yellow()
        );
    }
}

fn print_channel_preview(payload: &[u8]) {
    if payload.is_empty() {
        println!("  {}", "(no channel data)".dimmed());
        return;
    }

    let preview: String = payload
        .iter()
        .take(16)
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ");
    let suffix = if payload.len() > 16 { " ..." } else { "" };
    println!("  {}: {}{}", "channels".cyan(), preview, suffix);
}

fn print_hex_dump(data: &[u8]) {
    for (i, chunk) in data.chunks(16).enumerate() {
        print!("  {:04x}  ", i * 16);

        for (j, byte) in chunk.iter().enumerate() {
            if j == 8 {
                print!(" ");
            }
            print!("{:02x} ", byte);
        }

        for j in chunk.len()..16 {
            if j == 8 {
                print!(" ");
            }
            print!("   ");
        }

        print!(" |");
        for byte in chunk {
            print!(
                "{}",
                if *byte >= 0x20 && *byte < 0x7f {
                    *byte as char
                } else {
                    '.'
                }
            );
        }
        println!("|");
    }
}

fn base64_encode(data: &[u8]) -> String {
    const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut result = String::new();

    for chunk in data.chunks(3) {
        let (b0, b1, b2) = (
            chunk[0] as usize,
            chunk.get(1).copied().unwrap_or(0) as usize,
            chunk.get(2).copied().unwrap_or(0) as usize,
        );

        result.push(CHARS[b0 >> 2] as char);
        result.push(CHARS[((b0 & 0x03) << 4) | (b1 >> 4)] as char);
        result.push(if chunk.len() > 1 {
            CHARS[((b1 & 0x0f) << 2) | (b2 >> 6)] as char
        } else {
            '='
        });
        result.push(if chunk.len() > 2 {
            CHARS[b2 & 0x3f] as char
        } else {
            '='
        });
    }
    result
}

fn is_tty() -> bool {
    #[cfg(unix)]
    unsafe {
        libc::isatty(libc::STDOUT_FILENO) != 0
    }
    #[cfg(not(unix))]
    true
}
