//! Packet source abstraction.
//!
//! This module defines the `PacketSource` trait the capture loop reads from
//! and the Linux TUN implementation behind it. Tests drive the loop with
//! scripted sources instead of a real device.

#[cfg(target_os = "linux")]
mod tun_device;

#[cfg(target_os = "linux")]
pub use tun_device::{TunDevice, DEFAULT_READ_TIMEOUT, TUN_CONTROL_PATH};

use std::io;

/// Longest interface name the kernel accepts (`IFNAMSIZ` minus the NUL).
pub const MAX_INTERFACE_NAME_LEN: usize = 15;

/// Something that yields one raw packet per read.
pub trait PacketSource {
    /// Read one packet into `buf` and return the number of bytes stored.
    ///
    /// `Ok(0)` means nothing was available this cycle, not end of stream.
    fn read_packet(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Name of the interface being read.
    fn interface_name(&self) -> &str;
}

/// Cut `name` down to the interface-name limit on a character boundary.
pub fn truncate_interface_name(name: &str) -> &str {
    if name.len() <= MAX_INTERFACE_NAME_LEN {
        return name;
    }

    let mut end = MAX_INTERFACE_NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}
