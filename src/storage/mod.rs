//! Packet persistence.
//!
//! Everything between a captured byte buffer and a file on disk: output
//! directory bootstrap, filename generation, hex diagnostics and the writer.

mod bootstrap;
mod filename;
mod hex;
mod writer;

pub use bootstrap::ensure_output_dir;
pub use filename::FilenameGenerator;
pub use hex::to_hex_string;
pub use writer::{write_to, PacketWriter, WriteOutcome, DEFAULT_FILE_MODE};
