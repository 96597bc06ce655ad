//! Linux TUN device.

use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::mem;
use std::os::unix::io::AsRawFd;
use std::time::Duration;

use libc::{c_char, c_int, c_short, ifreq, pollfd, IFF_NO_PI, IFF_TUN, POLLIN, TUNSETIFF};
use tracing::info;

use super::{truncate_interface_name, PacketSource};
use crate::error::DeviceError;

/// Clone device used to create TUN interfaces.
pub const TUN_CONTROL_PATH: &str = "/dev/net/tun";

/// Longest wait for a packet before a read reports an idle cycle.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Build the `TUNSETIFF` request: raw IP tunnel, no packet info header.
fn interface_request(preferred_name: Option<&str>) -> ifreq {
    // SAFETY: ifreq is plain old data and all-zero is a valid value.
    let mut req: ifreq = unsafe { mem::zeroed() };
    req.ifr_ifru.ifru_flags = (IFF_TUN | IFF_NO_PI) as c_short;

    if let Some(name) = preferred_name {
        let name = truncate_interface_name(name).as_bytes();
        for (dst, &src) in req.ifr_name.iter_mut().zip(name) {
            *dst = src as c_char;
        }
    }

    req
}

/// Interface name stored in a request, up to the first NUL.
fn request_name(req: &ifreq) -> String {
    let bytes: Vec<u8> = req
        .ifr_name
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// An open TUN interface delivering raw IP packets.
///
/// Every read first waits at most the read timeout for the interface to
/// become readable, so the capture loop regains control on a quiet link.
#[derive(Debug)]
pub struct TunDevice {
    file: File,
    name: String,
    read_timeout: Duration,
}

impl TunDevice {
    /// Open `/dev/net/tun` and bind a TUN interface.
    ///
    /// `preferred_name` pins the interface name and is truncated to the
    /// kernel limit; when absent or empty the kernel picks one (`tun0`, ...).
    pub fn acquire(preferred_name: Option<&str>) -> Result<Self, DeviceError> {
        Self::acquire_at(TUN_CONTROL_PATH, preferred_name)
    }

    /// Like [`TunDevice::acquire`] with an explicit control path.
    pub fn acquire_at(control_path: &str, preferred_name: Option<&str>) -> Result<Self, DeviceError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(control_path)
            .map_err(|source| DeviceError::Open {
                path: control_path.to_string(),
                source,
            })?;

        info!("Successfully opened TUN device.");

        let mut req = interface_request(preferred_name);

        // SAFETY: req is a live ifreq for the whole call.
        let rc = unsafe { libc::ioctl(file.as_raw_fd(), TUNSETIFF, &mut req as *mut ifreq) };
        if rc < 0 {
            let source = io::Error::last_os_error();
            let name = match request_name(&req) {
                n if n.is_empty() => "(auto)".to_string(),
                n => n,
            };
            // file is dropped here, closing the handle
            return Err(DeviceError::Configure { name, source });
        }

        Ok(Self::from_file(file, request_name(&req)))
    }

    fn from_file(file: File, name: String) -> Self {
        Self {
            file,
            name,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Wait at most `timeout` for a packet before reporting an idle read.
    ///
    /// Clamped to at least one millisecond so reads never block indefinitely.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout.max(Duration::from_millis(1));
        self
    }

    /// Name the kernel bound the interface to.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    fn wait_readable(&self) -> io::Result<bool> {
        let mut pfd = pollfd {
            fd: self.file.as_raw_fd(),
            events: POLLIN,
            revents: 0,
        };
        let millis = self.read_timeout.as_millis().min(c_int::MAX as u128) as c_int;

        // SAFETY: pfd is a single valid pollfd.
        let rc = unsafe { libc::poll(&mut pfd, 1, millis) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(rc > 0)
    }
}

impl PacketSource for TunDevice {
    fn read_packet(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.wait_readable()? {
            return Ok(0);
        }
        self.file.read(buf)
    }

    fn interface_name(&self) -> &str {
        &self.name
    }
}
