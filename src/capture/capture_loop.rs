//! Polling capture loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::device::PacketSource;
use crate::storage::{to_hex_string, FilenameGenerator, PacketWriter, WriteOutcome};

/// Packet buffer capacity in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Pause between two reads.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result of a single poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// A packet was read and handed to the writer.
    Captured(WriteOutcome),
    /// Nothing was available this cycle.
    Idle,
}

/// Counters kept over the lifetime of a loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    pub packets: u64,
    pub bytes: u64,
    pub idle_cycles: u64,
    pub failed_writes: u64,
}

/// Single-reader capture loop owning the source and the packet buffer.
pub struct CaptureLoop<S> {
    source: S,
    buffer: Vec<u8>,
    filenames: FilenameGenerator,
    writer: PacketWriter,
    poll_interval: Duration,
    running: Arc<AtomicBool>,
    stats: CaptureStats,
}

impl<S: PacketSource> CaptureLoop<S> {
    pub fn new(source: S, filenames: FilenameGenerator, writer: PacketWriter) -> Self {
        Self {
            source,
            buffer: vec![0; DEFAULT_BUFFER_SIZE],
            filenames,
            writer,
            poll_interval: DEFAULT_POLL_INTERVAL,
            running: Arc::new(AtomicBool::new(true)),
            stats: CaptureStats::default(),
        }
    }

    /// Set the packet buffer capacity. Longer packets are cut by the read.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer = vec![0; size.max(1)];
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Get a handle to stop the loop.
    ///
    /// Clearing the flag ends `run` after the current iteration.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    pub fn stats(&self) -> CaptureStats {
        self.stats
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Poll the source until the running flag is cleared.
    pub fn run(&mut self) {
        info!(
            "Capturing packets on {} into {}",
            self.source.interface_name(),
            self.filenames.dir().display()
        );

        while self.running.load(Ordering::SeqCst) {
            self.poll_once();
            thread::sleep(self.poll_interval);
        }

        info!(
            "Capture stopped after {} packets ({} bytes)",
            self.stats.packets, self.stats.bytes
        );
    }

    /// Run one read and, if it produced a packet, persist it.
    pub fn poll_once(&mut self) -> PollOutcome {
        self.buffer.fill(0);

        match self.source.read_packet(&mut self.buffer) {
            Ok(0) => {
                warn!("Nothing to read.");
                self.stats.idle_cycles += 1;
                PollOutcome::Idle
            }
            Ok(len) => {
                let len = len.min(self.buffer.len());
                PollOutcome::Captured(self.process_packet(len))
            }
            Err(e) => {
                warn!("Nothing to read: {}", e);
                self.stats.idle_cycles += 1;
                PollOutcome::Idle
            }
        }
    }

    fn process_packet(&mut self, len: usize) -> WriteOutcome {
        let packet = &self.buffer[..len];

        debug!("Read {} bytes.", len);
        debug!("{}", to_hex_string(packet));

        let path = self.filenames.generate();
        let outcome = self.writer.write(packet, &path);

        self.stats.packets += 1;
        self.stats.bytes += len as u64;
        if !outcome.is_written() {
            self.stats.failed_writes += 1;
        }

        outcome
    }
}
