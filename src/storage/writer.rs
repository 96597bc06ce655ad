//! Packet persistence.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use tracing::{error, info, warn};

/// Default permission bits for packet files.
pub const DEFAULT_FILE_MODE: u32 = 0o777;

/// Result of persisting one packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Nothing to write, or nowhere to write it.
    Skipped,
    /// The file could not be opened.
    OpenFailed,
    /// The write attempt stored no bytes.
    WriteFailed,
    /// At least one byte was stored.
    Written { written: usize, requested: usize },
}

impl WriteOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Written { written, requested } if written < requested)
    }
}

/// Writes each packet to its own file with a single write attempt.
#[derive(Debug, Clone)]
pub struct PacketWriter {
    mode: u32,
}

impl PacketWriter {
    pub fn new() -> Self {
        Self {
            mode: DEFAULT_FILE_MODE,
        }
    }

    /// Set the permission bits used when creating files.
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    /// Write `data` to `path`, creating or truncating the file.
    ///
    /// Empty data or an empty path is treated as absent and skipped silently.
    /// The file is closed on every return path.
    pub fn write(&self, data: &[u8], path: &Path) -> WriteOutcome {
        if data.is_empty() || path.as_os_str().is_empty() {
            return WriteOutcome::Skipped;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(self.mode);

        let mut file = match options.open(path) {
            Ok(file) => file,
            Err(e) => {
                error!("Could not open {}. Error: {}", path.display(), e);
                return WriteOutcome::OpenFailed;
            }
        };

        write_to(&mut file, data, path)
    }
}

impl Default for PacketWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Make one write attempt of `data` into `sink`, logging the outcome.
///
/// A short write is reported as a warning but still counts as written;
/// it is never retried. `path` is only used for diagnostics.
pub fn write_to<W: Write>(sink: &mut W, data: &[u8], path: &Path) -> WriteOutcome {
    if data.is_empty() {
        return WriteOutcome::Skipped;
    }

    let requested = data.len();
    let written = match sink.write(data) {
        Ok(0) => {
            error!("Could not write packet data to file {}. No bytes written", path.display());
            return WriteOutcome::WriteFailed;
        }
        Ok(n) => n.min(requested),
        Err(e) => {
            error!("Could not write packet data to file {}. Error: {}", path.display(), e);
            return WriteOutcome::WriteFailed;
        }
    };

    if written < requested {
        warn!(
            "Could not write all packet data to file. Written {} of {} bytes",
            written, requested
        );
    }

    info!("Successfully written packet to file {}", path.display());
    WriteOutcome::Written { written, requested }
}
