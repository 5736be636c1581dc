//! CPU-visible PPU registers and the internal v/t/x/w scroll state.

use bitflags::bitflags;

bitflags! {
    /// `$2000` PPUCTRL.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Control: u8 {
        /// Base nametable select, copied into t bits 10-11.
        const NAMETABLE_X     = 0b0000_0001;
        const NAMETABLE_Y     = 0b0000_0010;
        /// VRAM increment per `$2007` access: 1 across, 32 down.
        const VRAM_INCREMENT  = 0b0000_0100;
        /// Sprite pattern table half for 8x8 sprites.
        const SPRITE_PATTERN  = 0b0000_1000;
        /// Background pattern table half.
        const BG_PATTERN      = 0b0001_0000;
        /// Sprite size: 8x8 or 8x16.
        const SPRITE_SIZE     = 0b0010_0000;
        const MASTER_SLAVE    = 0b0100_0000;
        /// Generate NMI at the start of vertical blank.
        const NMI_ENABLE      = 0b1000_0000;
    }
}

impl Control {
    /// Sprite height in pixels per the size bit.
    pub fn sprite_height(self) -> u16 {
        if self.contains(Self::SPRITE_SIZE) { 16 } else { 8 }
    }

    /// `$2007` address increment.
    pub fn vram_increment(self) -> u16 {
        if self.contains(Self::VRAM_INCREMENT) {
            32
        } else {
            1
        }
    }

    /// Pattern table base for background fetches.
    pub fn bg_pattern_base(self) -> u16 {
        if self.contains(Self::BG_PATTERN) {
            0x1000
        } else {
            0x0000
        }
    }

    /// Pattern table base for 8x8 sprite fetches.
    pub fn sprite_pattern_base(self) -> u16 {
        if self.contains(Self::SPRITE_PATTERN) {
            0x1000
        } else {
            0x0000
        }
    }
}

bitflags! {
    /// `$2001` PPUMASK.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Mask: u8 {
        const GREYSCALE       = 0b0000_0001;
        /// Show background in the leftmost 8 pixels.
        const BG_LEFT         = 0b0000_0010;
        /// Show sprites in the leftmost 8 pixels.
        const SPRITE_LEFT     = 0b0000_0100;
        const SHOW_BG         = 0b0000_1000;
        const SHOW_SPRITES    = 0b0001_0000;
        const EMPHASIZE_RED   = 0b0010_0000;
        const EMPHASIZE_GREEN = 0b0100_0000;
        const EMPHASIZE_BLUE  = 0b1000_0000;
    }
}

impl Mask {
    /// True when either background or sprite rendering is enabled.
    pub fn rendering_enabled(self) -> bool {
        self.intersects(Self::SHOW_BG | Self::SHOW_SPRITES)
    }
}

bitflags! {
    /// `$2002` PPUSTATUS. Only the top three bits are driven by the PPU;
    /// the rest of a read comes from the open bus.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Status: u8 {
        const SPRITE_OVERFLOW = 0b0010_0000;
        const SPRITE_ZERO_HIT = 0b0100_0000;
        const VBLANK          = 0b1000_0000;
    }
}

/// The 15-bit VRAM address in its Loopy decomposition:
/// `yyy NN YYYYY XXXXX` = fine y, nametable, coarse y, coarse x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VramAddr(u16);

impl VramAddr {
    pub fn raw(self) -> u16 {
        self.0
    }

    pub fn set_raw(&mut self, value: u16) {
        self.0 = value & 0x7FFF;
    }

    pub fn coarse_x(self) -> u16 {
        self.0 & 0x1F
    }

    pub fn coarse_y(self) -> u16 {
        (self.0 >> 5) & 0x1F
    }

    pub fn fine_y(self) -> u16 {
        (self.0 >> 12) & 0x7
    }

    /// Nametable byte address for the tile under this scroll position.
    pub fn tile_addr(self) -> u16 {
        0x2000 | (self.0 & 0x0FFF)
    }

    /// Attribute byte address for the tile under this scroll position.
    pub fn attribute_addr(self) -> u16 {
        0x23C0 | (self.0 & 0x0C00) | ((self.0 >> 4) & 0x38) | ((self.0 >> 2) & 0x07)
    }

    /// Advances coarse X, toggling the horizontal nametable on wrap.
    pub fn increment_coarse_x(&mut self) {
        if self.0 & 0x1F == 31 {
            self.0 &= !0x1F;
            self.0 ^= 0x0400;
        } else {
            self.0 += 1;
        }
    }

    /// Advances fine Y with carry into coarse Y; row 29 wraps with a
    /// vertical nametable toggle, row 31 wraps without one.
    pub fn increment_y(&mut self) {
        if self.0 & 0x7000 != 0x7000 {
            self.0 += 0x1000;
            return;
        }
        self.0 &= !0x7000;
        let mut coarse_y = (self.0 >> 5) & 0x1F;
        match coarse_y {
            29 => {
                coarse_y = 0;
                self.0 ^= 0x0800;
            }
            31 => coarse_y = 0,
            _ => coarse_y += 1,
        }
        self.0 = (self.0 & !0x03E0) | (coarse_y << 5);
    }

    /// Copies the horizontal scroll bits from `t`.
    pub fn copy_horizontal(&mut self, t: VramAddr) {
        self.0 = (self.0 & !0x041F) | (t.0 & 0x041F);
    }

    /// Copies the vertical scroll bits from `t`.
    pub fn copy_vertical(&mut self, t: VramAddr) {
        self.0 = (self.0 & !0x7BE0) | (t.0 & 0x7BE0);
    }
}

/// Internal scroll/address state in the NESdev `v/t/x/w` terminology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VramRegisters {
    /// Current VRAM address (`v`).
    pub v: VramAddr,
    /// Temporary VRAM address (`t`).
    pub t: VramAddr,
    /// Fine X scroll (`x`, 0..7).
    pub x: u8,
    /// Write toggle (`w`): false selects the first write of a pair.
    pub w: bool,
}

impl VramRegisters {
    /// `$2000` write: nametable select lands in t bits 10-11.
    pub fn write_control(&mut self, value: u8) {
        let t = (self.t.raw() & !0x0C00) | (u16::from(value & 0x3) << 10);
        self.t.set_raw(t);
    }

    /// `$2005` writes: first sets coarse/fine X, second coarse/fine Y.
    pub fn write_scroll(&mut self, value: u8) {
        if !self.w {
            self.x = value & 0x7;
            let t = (self.t.raw() & !0x001F) | u16::from(value >> 3);
            self.t.set_raw(t);
        } else {
            let t = (self.t.raw() & !0x73E0)
                | (u16::from(value & 0x7) << 12)
                | (u16::from(value & 0xF8) << 2);
            self.t.set_raw(t);
        }
        self.w = !self.w;
    }

    /// `$2006` writes: high six bits first (bit 14 cleared), then the low
    /// byte, which also commits `t` into `v`.
    pub fn write_addr(&mut self, value: u8) {
        if !self.w {
            let t = (self.t.raw() & 0x00FF) | (u16::from(value & 0x3F) << 8);
            self.t.set_raw(t);
        } else {
            let t = (self.t.raw() & 0x7F00) | u16::from(value);
            self.t.set_raw(t);
            self.v = self.t;
        }
        self.w = !self.w;
    }

    /// `$2002` reads clear the pair toggle.
    pub fn reset_toggle(&mut self) {
        self.w = false;
    }
}
