//! Hex rendering of packet bytes for diagnostics.

/// Uppercase hex digit for each nibble value.
const HEX_DIGITS: [u8; 16] = *b"0123456789ABCDEF";

const SEPARATOR: char = ':';

/// Render bytes as colon-separated uppercase hex pairs, e.g. `DE:AD:BE:EF`.
///
/// The output is exactly `3 * len - 1` characters long. An empty slice
/// renders as an empty string.
pub fn to_hex_string(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(3 * bytes.len() - 1);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
        out.push(HEX_DIGITS[(byte & 0x0F) as usize] as char);
    }
    out
}
