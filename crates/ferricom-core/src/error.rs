use std::fmt;

use crate::cartridge::header::{NES_HEADER_LEN, RomFormat};

#[derive(Debug)]
pub enum Error {
    /// Provided buffer is shorter than the 16-byte header.
    TooShort { actual: usize },
    /// Magic number ("NES<EOF>") is missing.
    InvalidMagic,
    /// Header advertises zero 16 KiB PRG-ROM banks.
    EmptyPrgRom,
    /// Header advertises a format we do not implement.
    UnsupportedFormat(RomFormat),
    /// A ROM section (trainer/PRG/CHR) is shorter than advertised.
    SectionTooShort {
        section: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Header advertises a mapper number outside the supported set.
    UnsupportedMapper(u16),
    /// Palette blobs must contain exactly 64 RGB triples.
    InvalidPaletteSize { actual: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { actual } => {
                write!(f, "header expected {NES_HEADER_LEN} bytes, got {actual}")
            }
            Self::InvalidMagic => write!(f, "missing NES magic bytes"),
            Self::EmptyPrgRom => write!(f, "header reports no PRG-ROM banks"),
            Self::UnsupportedFormat(format) => {
                write!(f, "unsupported ROM header format: {format:?}")
            }
            Self::SectionTooShort {
                section,
                expected,
                actual,
            } => write!(
                f,
                "{section} section expected {expected} bytes, got {actual}"
            ),
            Self::UnsupportedMapper(mapper) => {
                write!(f, "mapper {mapper} is not implemented")
            }
            Self::InvalidPaletteSize { actual } => {
                write!(f, "palette blobs must be 192 bytes (got {actual})")
            }
        }
    }
}

impl std::error::Error for Error {}
