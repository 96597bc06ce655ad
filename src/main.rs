//! tunsniff - TUN packet sniffer
//!
//! Captures every packet arriving on a TUN interface into its own file.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use tunsniff::{logging, Config};

#[derive(Parser)]
#[command(name = "tunsniff")]
#[command(about = "Capture packets from a TUN interface into files")]
struct Cli {
    /// Config file (default: $TUNSNIFF_CONFIG or /etc/tunsniff.conf)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory receiving one file per packet
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Interface name to bind (truncated to 15 bytes)
    #[arg(short, long)]
    interface: Option<String>,

    /// Extension of packet files
    #[arg(long)]
    extension: Option<String>,

    /// Packet buffer size in bytes
    #[arg(long)]
    buffer_size: Option<NonZeroUsize>,

    /// Pause between reads in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Longest wait for a packet in milliseconds (0 follows the poll interval)
    #[arg(long)]
    read_timeout_ms: Option<u64>,
}

impl Cli {
    /// Overlay command line flags on the loaded configuration.
    fn apply(self, config: &mut Config) {
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(name) = self.interface {
            config.interface = Some(name).filter(|n| !n.is_empty());
        }
        if let Some(ext) = self.extension {
            config.extension = ext;
        }
        if let Some(size) = self.buffer_size {
            config.buffer_size = size.get();
        }
        if let Some(ms) = self.poll_interval_ms {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = self.read_timeout_ms {
            config.read_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    cli.apply(&mut config);

    logging::init(&config.log_filter);

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_os = "linux")]
fn run(config: Config) -> Result<()> {
    use std::sync::atomic::Ordering;

    use anyhow::Context;
    use tracing::info;
    use tunsniff::{ensure_output_dir, CaptureLoop, FilenameGenerator, PacketWriter, TunDevice};

    let output_dir =
        ensure_output_dir(&config.output_dir).context("Could not prepare output directory")?;

    let device = TunDevice::acquire(config.interface.as_deref())
        .context("Could not acquire TUN device")?
        .with_read_timeout(config.effective_read_timeout());
    info!("Opened device: {}", device.name());

    let mut capture = CaptureLoop::new(
        device,
        FilenameGenerator::new(output_dir, config.extension.as_str()),
        PacketWriter::new().with_mode(config.file_mode),
    )
    .with_buffer_size(config.buffer_size)
    .with_poll_interval(config.poll_interval);

    let running = capture.running_flag();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal, stopping capture");
        running.store(false, Ordering::SeqCst);
    })
    .context("Failed to install signal handler")?;

    capture.run();
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn run(_config: Config) -> Result<()> {
    Err(tunsniff::DeviceError::Unsupported.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(args: &[&str]) -> Config {
        let mut config = Config::default();
        Cli::parse_from(args).apply(&mut config);
        config
    }

    #[test]
    fn test_no_flags_keep_config() {
        assert_eq!(apply(&["tunsniff"]), Config::default());
    }

    #[test]
    fn test_flags_override_config() {
        let config = apply(&[
            "tunsniff",
            "--output-dir",
            "/tmp/captures",
            "--interface",
            "sniff0",
            "--extension",
            "pkt",
            "--buffer-size",
            "2048",
            "--poll-interval-ms",
            "25",
            "--read-timeout-ms",
            "500",
        ]);

        assert_eq!(config.output_dir, PathBuf::from("/tmp/captures"));
        assert_eq!(config.interface.as_deref(), Some("sniff0"));
        assert_eq!(config.extension, "pkt");
        assert_eq!(config.buffer_size, 2048);
        assert_eq!(config.poll_interval, Duration::from_millis(25));
        assert_eq!(config.read_timeout, Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_zero_read_timeout_follows_poll_interval() {
        let mut config = Config::default();
        config.read_timeout = Some(Duration::from_millis(900));
        Cli::parse_from(["tunsniff", "--read-timeout-ms", "0", "--poll-interval-ms", "30"])
            .apply(&mut config);

        assert_eq!(config.read_timeout, None);
        assert_eq!(config.effective_read_timeout(), Duration::from_millis(30));
    }

    #[test]
    fn test_empty_interface_clears_pin() {
        let mut config = Config::default();
        config.interface = Some("tun7".to_string());
        Cli::parse_from(["tunsniff", "--interface", ""]).apply(&mut config);

        assert_eq!(config.interface, None);
    }

    #[test]
    fn test_zero_buffer_size_rejected() {
        assert!(Cli::try_parse_from(["tunsniff", "--buffer-size", "0"]).is_err());
    }
}
