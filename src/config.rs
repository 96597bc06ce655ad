use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::capture::{DEFAULT_BUFFER_SIZE, DEFAULT_POLL_INTERVAL};
use crate::error::ConfigError;
use crate::storage::DEFAULT_FILE_MODE;

const DEFAULT_CONFIG_PATH: &str = "/etc/tunsniff.conf";
const DEFAULT_OUTPUT_DIR: &str = "./packets";
const DEFAULT_EXTENSION: &str = "bin";
const DEFAULT_LOG_FILTER: &str = "debug";

/// Shortest wait allowed for a single read.
const MIN_READ_TIMEOUT: Duration = Duration::from_millis(1);

/// Environment variables that override config file keys.
const ENV_OVERRIDES: [(&str, &str); 8] = [
    ("output_dir", "TUNSNIFF_OUTPUT_DIR"),
    ("interface", "TUNSNIFF_INTERFACE"),
    ("extension", "TUNSNIFF_EXTENSION"),
    ("buffer_size", "TUNSNIFF_BUFFER_SIZE"),
    ("poll_interval_ms", "TUNSNIFF_POLL_INTERVAL_MS"),
    ("read_timeout_ms", "TUNSNIFF_READ_TIMEOUT_MS"),
    ("file_mode", "TUNSNIFF_FILE_MODE"),
    ("log_filter", "TUNSNIFF_LOG_FILTER"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory receiving one file per captured packet.
    pub output_dir: PathBuf,
    /// Interface name to pin; the kernel picks one when unset.
    pub interface: Option<String>,
    pub extension: String,
    pub buffer_size: usize,
    pub poll_interval: Duration,
    /// Wait at most this long for a packet; follows `poll_interval` when unset.
    pub read_timeout: Option<Duration>,
    pub file_mode: u32,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            interface: None,
            extension: DEFAULT_EXTENSION.to_string(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            read_timeout: None,
            file_mode: DEFAULT_FILE_MODE,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, an optional config file and the environment.
    ///
    /// The file is read from `path`, else `$TUNSNIFF_CONFIG`, else
    /// `/etc/tunsniff.conf`. A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = path
            .map(Path::to_path_buf)
            .or_else(|| env::var("TUNSNIFF_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = Config::default();

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            config.apply_file(&content)?;
        }

        // Allow environment variable overrides
        for (key, var) in ENV_OVERRIDES {
            if let Ok(value) = env::var(var) {
                config.set(key, &value)?;
            }
        }

        Ok(config)
    }

    /// How long one read may wait for a packet.
    ///
    /// Always bounded, so the capture loop sees a shutdown request even
    /// when the interface stays quiet.
    pub fn effective_read_timeout(&self) -> Duration {
        self.read_timeout
            .unwrap_or(self.poll_interval)
            .max(MIN_READ_TIMEOUT)
    }

    /// Apply every `key=value` line of a config file.
    pub fn apply_file(&mut self, content: &str) -> Result<(), ConfigError> {
        for line in content.lines() {
            if let Some((key, value)) = parse_config_line(line) {
                self.set(key, value)?;
            }
        }
        Ok(())
    }

    /// Set a single key. Unknown keys are ignored.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "output_dir" => self.output_dir = PathBuf::from(value),
            "interface" => {
                self.interface = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "extension" => self.extension = value.to_string(),
            "buffer_size" => {
                let size: usize = parse_number(key, value)?;
                if size == 0 {
                    return Err(invalid(key, value));
                }
                self.buffer_size = size;
            }
            "poll_interval_ms" => {
                self.poll_interval = Duration::from_millis(parse_number(key, value)?);
            }
            "read_timeout_ms" => {
                self.read_timeout = match value {
                    "" | "0" => None,
                    _ => Some(Duration::from_millis(parse_number(key, value)?)),
                };
            }
            "file_mode" => {
                let digits = value.trim_start_matches("0o");
                self.file_mode =
                    u32::from_str_radix(digits, 8).map_err(|_| invalid(key, value))?;
            }
            "log_filter" => self.log_filter = value.to_string(),
            _ => {}
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Parse a `key=value` line, skipping blanks and `#` comments.
fn parse_config_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, value) = line.split_once('=')?;
    Some((key.trim(), value.trim()))
}
