//! tunsniff - capture raw packets from a TUN interface into files.
//!
//! Each packet read from the interface is logged as a hex dump and written
//! to its own `<timestamp><suffix>.bin` file in the output directory.

pub mod capture;
pub mod config;
pub mod device;
pub mod error;
pub mod logging;
pub mod storage;

#[cfg(test)]
mod test_support;

pub use capture::{CaptureLoop, CaptureStats, PollOutcome};
pub use config::Config;
pub use device::PacketSource;
#[cfg(target_os = "linux")]
pub use device::TunDevice;
pub use error::{BootstrapError, ConfigError, DeviceError};
pub use storage::{ensure_output_dir, to_hex_string, FilenameGenerator, PacketWriter, WriteOutcome};
