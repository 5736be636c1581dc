//! Palette RAM and the 64-color system palette.

use crate::{error::Error, memory::ppu as ppu_mem};

/// Raw byte length of a `.pal` blob: 64 RGB triples.
pub const PALETTE_BLOB_LEN: usize = 192;

/// The 32 bytes of palette RAM at `$3F00-$3F1F`.
///
/// Entries `$10/$14/$18/$1C` are aliases of `$00/$04/$08/$0C` on both read
/// and write: the sprite palettes' transparent slots are physically the
/// background ones.
#[derive(Debug, Clone)]
pub struct PaletteRam {
    bytes: [u8; ppu_mem::PALETTE_RAM_SIZE],
}

impl Default for PaletteRam {
    fn default() -> Self {
        Self {
            bytes: [0; ppu_mem::PALETTE_RAM_SIZE],
        }
    }
}

impl PaletteRam {
    /// Folds the four sprite-transparent slots onto their background twins.
    fn index(addr: u16) -> usize {
        let index = (addr & 0x1F) as usize;
        match index {
            0x10 | 0x14 | 0x18 | 0x1C => index & 0x0F,
            _ => index,
        }
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[Self::index(addr)]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.bytes[Self::index(addr)] = value;
    }

    /// Raw view for debug snapshots.
    pub fn as_bytes(&self) -> &[u8; ppu_mem::PALETTE_RAM_SIZE] {
        &self.bytes
    }
}

/// Master system palette mapping 6-bit color numbers to RGB.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: [[u8; 3]; 64],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS,
        }
    }
}

impl Palette {
    /// Builds a palette from a 192-byte `.pal` blob (64 RGB triples).
    pub fn from_pal_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != PALETTE_BLOB_LEN {
            return Err(Error::InvalidPaletteSize {
                actual: bytes.len(),
            });
        }
        let mut colors = [[0u8; 3]; 64];
        for (color, triple) in colors.iter_mut().zip(bytes.chunks_exact(3)) {
            color.copy_from_slice(triple);
        }
        Ok(Self { colors })
    }

    /// RGB triple for a 6-bit system color.
    pub fn color(&self, index: u8) -> [u8; 3] {
        self.colors[(index & 0x3F) as usize]
    }
}

/// Built-in fallback palette, used when the host supplies no `.pal` file.
#[rustfmt::skip]
const DEFAULT_COLORS: [[u8; 3]; 64] = [
    [0x52, 0x52, 0x52], [0x01, 0x1A, 0x51], [0x0F, 0x0F, 0x65], [0x23, 0x06, 0x63],
    [0x36, 0x03, 0x4B], [0x40, 0x04, 0x26], [0x3F, 0x09, 0x04], [0x32, 0x13, 0x00],
    [0x1F, 0x20, 0x00], [0x0B, 0x2A, 0x00], [0x00, 0x2F, 0x00], [0x00, 0x2E, 0x0A],
    [0x00, 0x26, 0x2D], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00],
    [0xA0, 0xA0, 0xA0], [0x1E, 0x4A, 0x9D], [0x38, 0x37, 0xBC], [0x58, 0x28, 0xB8],
    [0x75, 0x21, 0x94], [0x84, 0x23, 0x5C], [0x82, 0x2E, 0x24], [0x6F, 0x3F, 0x00],
    [0x51, 0x52, 0x00], [0x31, 0x63, 0x00], [0x1A, 0x6B, 0x05], [0x0E, 0x69, 0x2E],
    [0x10, 0x5C, 0x68], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00],
    [0xFE, 0xFF, 0xFF], [0x69, 0x9E, 0xFC], [0x89, 0x87, 0xFF], [0xAE, 0x76, 0xFF],
    [0xCE, 0x6D, 0xF1], [0xE0, 0x70, 0xB2], [0xDE, 0x7C, 0x70], [0xC8, 0x91, 0x3E],
    [0xA6, 0xA7, 0x25], [0x81, 0xBA, 0x28], [0x63, 0xC4, 0x46], [0x54, 0xC1, 0x7D],
    [0x56, 0xB3, 0xC0], [0x3C, 0x3C, 0x3C], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00],
    [0xFE, 0xFF, 0xFF], [0xBE, 0xD6, 0xFD], [0xCC, 0xCC, 0xFF], [0xDD, 0xC4, 0xFF],
    [0xEA, 0xC0, 0xF9], [0xF2, 0xC1, 0xDF], [0xF1, 0xC7, 0xC2], [0xE8, 0xD0, 0xAA],
    [0xD9, 0xDA, 0x9D], [0xC9, 0xE2, 0x9E], [0xBC, 0xE6, 0xAE], [0xB4, 0xE5, 0xC7],
    [0xB5, 0xDF, 0xE4], [0xA9, 0xA9, 0xA9], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_transparent_slots_alias_background() {
        let mut ram = PaletteRam::default();
        ram.write(0x3F10, 0x2A);
        assert_eq!(ram.read(0x3F00), 0x2A);
        ram.write(0x3F04, 0x15);
        assert_eq!(ram.read(0x3F14), 0x15);
        // Non-transparent sprite slots stay independent.
        ram.write(0x3F11, 0x01);
        assert_ne!(ram.read(0x3F01), 0x01);
    }

    #[test]
    fn mirrors_every_32_bytes() {
        let mut ram = PaletteRam::default();
        ram.write(0x3F21, 0x17);
        assert_eq!(ram.read(0x3F01), 0x17);
    }

    #[test]
    fn pal_blob_must_be_192_bytes() {
        assert!(matches!(
            Palette::from_pal_bytes(&[0; 100]),
            Err(Error::InvalidPaletteSize { actual: 100 })
        ));
        let blob: Vec<u8> = (0..192).map(|i| i as u8).collect();
        let palette = Palette::from_pal_bytes(&blob).expect("valid blob");
        assert_eq!(palette.color(1), [3, 4, 5]);
    }

    #[test]
    fn default_palette_first_entry_is_grey() {
        let palette = Palette::default();
        assert_eq!(palette.color(0), [0x52, 0x52, 0x52]);
        // Index wraps at 64.
        assert_eq!(palette.color(0x40), palette.color(0));
    }
}
