use std::ops::Range;

use super::{ModuleGrid, Point};

/// QR Code Model 2 version (1-40)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u8);

impl Version {
    /// Smallest legal version
    pub const MIN: Version = Version(1);
    /// Largest legal version
    pub const MAX: Version = Version(40);

    /// Version `number`, if it is within 1-40
    pub fn new(number: u8) -> Option<Self> {
        (1..=40).contains(&number).then_some(Self(number))
    }

    /// Version whose symbol is `dimension` modules wide
    pub fn from_dimension(dimension: usize) -> Option<Self> {
        if dimension < 21 || (dimension - 17) % 4 != 0 {
            return None;
        }
        u8::try_from((dimension - 17) / 4).ok().and_then(Self::new)
    }

    /// Get the version number
    pub fn number(&self) -> u8 {
        self.0
    }

    /// Get the size in modules (width = height)
    pub fn dimension(&self) -> usize {
        4 * self.0 as usize + 17
    }
}

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ECLevel {
    /// Low (~7% recovery capacity)
    L,
    /// Medium (~15% recovery capacity)
    M,
    /// Quartile (~25% recovery capacity)
    Q,
    /// High (~30% recovery capacity)
    H,
}

impl ECLevel {
    /// Level from the two format-information bits (01=L, 00=M, 11=Q, 10=H)
    pub fn from_format_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0b01 => ECLevel::L,
            0b00 => ECLevel::M,
            0b11 => ECLevel::Q,
            _ => ECLevel::H,
        }
    }

    /// The two format-information bits for this level
    pub fn format_bits(&self) -> u8 {
        match self {
            ECLevel::L => 0b01,
            ECLevel::M => 0b00,
            ECLevel::Q => 0b11,
            ECLevel::H => 0b10,
        }
    }
}

/// Mask pattern (0-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskPattern {
    /// (row + col) % 2 == 0
    Pattern0 = 0,
    /// row % 2 == 0
    Pattern1 = 1,
    /// col % 3 == 0
    Pattern2 = 2,
    /// (row + col) % 3 == 0
    Pattern3 = 3,
    /// (row/2 + col/3) % 2 == 0
    Pattern4 = 4,
    /// (row*col)%2 + (row*col)%3 == 0
    Pattern5 = 5,
    /// ((row*col)%2 + (row*col)%3) % 2 == 0
    Pattern6 = 6,
    /// ((row+col)%2 + (row*col)%3) % 2 == 0
    Pattern7 = 7,
}

impl MaskPattern {
    /// Get mask pattern from its three-bit id
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => MaskPattern::Pattern0,
            1 => MaskPattern::Pattern1,
            2 => MaskPattern::Pattern2,
            3 => MaskPattern::Pattern3,
            4 => MaskPattern::Pattern4,
            5 => MaskPattern::Pattern5,
            6 => MaskPattern::Pattern6,
            _ => MaskPattern::Pattern7,
        }
    }

    /// Three-bit id
    pub fn id(&self) -> u8 {
        *self as u8
    }

    /// Check if the module at (`row`, `col`) is inverted by this mask
    pub fn is_masked(&self, row: usize, col: usize) -> bool {
        let (i, j) = (row, col);
        match self {
            MaskPattern::Pattern0 => (i + j) % 2 == 0,
            MaskPattern::Pattern1 => i % 2 == 0,
            MaskPattern::Pattern2 => j % 3 == 0,
            MaskPattern::Pattern3 => (i + j) % 3 == 0,
            MaskPattern::Pattern4 => (i / 2 + j / 3) % 2 == 0,
            MaskPattern::Pattern5 => (i * j) % 2 + (i * j) % 3 == 0,
            MaskPattern::Pattern6 => ((i * j) % 2 + (i * j) % 3) % 2 == 0,
            MaskPattern::Pattern7 => ((i + j) % 2 + (i * j) % 3) % 2 == 0,
        }
    }
}

/// The four corners of a located symbol, in image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Corners {
    /// Outer corner next to the top-left finder pattern
    pub top_left: Point,
    /// Outer corner next to the top-right finder pattern
    pub top_right: Point,
    /// Outer corner next to the bottom-left finder pattern
    pub bottom_left: Point,
    /// Derived fourth corner
    pub bottom_right: Point,
}

/// Data-stream segment modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentMode {
    /// Digits, three per 10 bits
    Numeric,
    /// 45-character set, two per 11 bits
    Alphanumeric,
    /// Raw 8-bit bytes
    Byte,
    /// Shift-JIS double-byte characters, 13 bits each
    Kanji,
}

/// One decoded data segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Encoding mode
    pub mode: SegmentMode,
    /// Character count from the segment header
    pub char_count: usize,
    /// Bytes of [`DecodedSymbol::payload`] produced by this segment
    pub range: Range<usize>,
}

/// Structured-append header: this symbol's place in a multi-symbol message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuredAppend {
    /// Zero-based position of this symbol
    pub index: u8,
    /// Number of symbols in the message
    pub total: u8,
    /// Parity byte over the whole message
    pub parity: u8,
}

/// FNC1 marker found in the data stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fnc1 {
    /// GS1 formatted data
    FirstPosition,
    /// AIM industry application with its indicator byte
    SecondPosition(u8),
}

/// Successfully decoded QR symbol
#[derive(Debug, Clone)]
pub struct DecodedSymbol {
    /// Raw decoded bytes, all segments concatenated
    pub payload: Vec<u8>,
    /// Payload as text (UTF-8 when valid, ISO-8859-1 otherwise)
    pub text: String,
    /// QR code version
    pub version: Version,
    /// Error correction level
    pub ec_level: ECLevel,
    /// Mask pattern used
    pub mask_pattern: MaskPattern,
    /// Corner points in the original image's coordinates
    pub corners: Corners,
    /// Segments in stream order
    pub segments: Vec<Segment>,
    /// First ECI designator seen, if any
    pub eci: Option<u32>,
    /// Structured-append header, if present
    pub structured_append: Option<StructuredAppend>,
    /// FNC1 marker, if present
    pub fnc1: Option<Fnc1>,
    /// Codewords repaired by Reed-Solomon across all blocks
    pub corrected_errors: usize,
    /// Whether the colour-inverted pass produced this result
    pub inverted: bool,
    /// Sampled module grid (true = dark)
    pub grid: ModuleGrid,
}
