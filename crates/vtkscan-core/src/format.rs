//! Numeric value formats of the legacy VTK binary layout and their codec.
//!
//! Legacy VTK binary payloads are always big-endian regardless of the host,
//! so every multi-byte decode goes through [`byteorder::BigEndian`] and
//! never through a host memory overlay.

use byteorder::{BigEndian, ByteOrder};
use serde::{Deserialize, Serialize};

/// A numeric format appearing in legacy VTK header tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueFormat {
    /// 4-byte signed integer (`int`).
    Int,
    /// 4-byte IEEE-754 float (`float`).
    Float,
    /// 8-byte IEEE-754 float (`double`).
    Double,
    /// Single unsigned byte (`unsigned_char`).
    UnsignedChar,
    /// Single signed byte (`char`).
    Char,
}

impl ValueFormat {
    /// Size of one value of this format, in bytes.
    pub const fn size(self) -> usize {
        match self {
            ValueFormat::Int | ValueFormat::Float => 4,
            ValueFormat::Double => 8,
            ValueFormat::UnsignedChar | ValueFormat::Char => 1,
        }
    }

    /// Maps a header type name (`int`, `float`, `double`, `unsigned_char`,
    /// `char`) to its format. Any other name is unusable for sizing and
    /// yields `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(ValueFormat::Int),
            "float" => Some(ValueFormat::Float),
            "double" => Some(ValueFormat::Double),
            "unsigned_char" => Some(ValueFormat::UnsignedChar),
            "char" => Some(ValueFormat::Char),
            _ => None,
        }
    }

    /// The header token for this format.
    pub const fn name(self) -> &'static str {
        match self {
            ValueFormat::Int => "int",
            ValueFormat::Float => "float",
            ValueFormat::Double => "double",
            ValueFormat::UnsignedChar => "unsigned_char",
            ValueFormat::Char => "char",
        }
    }
}

/// Decodes one big-endian `int` from the first 4 bytes of `buf`.
pub fn decode_i32(buf: &[u8]) -> i32 {
    BigEndian::read_i32(buf)
}

/// Decodes one big-endian `float` from the first 4 bytes of `buf`.
pub fn decode_f32(buf: &[u8]) -> f32 {
    BigEndian::read_f32(buf)
}

/// Decodes one big-endian `double` from the first 8 bytes of `buf`.
pub fn decode_f64(buf: &[u8]) -> f64 {
    BigEndian::read_f64(buf)
}

/// Writes one component of `format` at the start of `dest`, in native
/// layout, converting from the `f64` working value.
///
/// `dest` must hold at least `format.size()` bytes; used by the cell
/// geometry engine to emit caller-chosen output formats.
pub fn write_component(dest: &mut [u8], format: ValueFormat, value: f64) {
    match format {
        ValueFormat::Int => dest[..4].copy_from_slice(&(value as i32).to_ne_bytes()),
        ValueFormat::Float => dest[..4].copy_from_slice(&(value as f32).to_ne_bytes()),
        ValueFormat::Double => dest[..8].copy_from_slice(&value.to_ne_bytes()),
        ValueFormat::UnsignedChar => dest[0] = value as u8,
        ValueFormat::Char => dest[0] = value as i8 as u8,
    }
}
