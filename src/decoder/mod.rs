//! QR code decoding modules
//!
//! Everything after sampling: a [`ModuleGrid`](crate::models::ModuleGrid)
//! goes in, the payload and symbol metadata come out.
//! - Format and version information (BCH protected)
//! - Unmasking and zig-zag codeword extraction
//! - Reed-Solomon correction per block
//! - Data mode decoding (numeric, alphanumeric, byte, kanji, ECI)

/// BCH codes for format and version info
pub mod bch;
/// Codeword extraction in placement order
pub mod bitstream;
/// Format information extraction (mask pattern, EC level)
pub mod format;
/// Function module mask builder (finder/timing/format/alignment/version)
pub mod function_mask;
/// Data mode decoders
pub mod modes;
/// Reed-Solomon error correction
pub mod reed_solomon;
/// Grid-to-payload decoding
pub mod symbol_decoder;
/// QR specification tables (ECC codewords/blocks)
pub mod tables;
/// Mask removal
pub mod unmask;
/// Version information extraction (versions 7-40)
pub mod version;

pub use modes::DecodedContent;
pub use symbol_decoder::{GridDecode, SymbolDecoder};
