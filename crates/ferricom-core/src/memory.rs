//! Shared definitions for the NES memory map.
//!
//! Keeping the address layout in one place stops magic numbers from leaking
//! into the bus, PPU, and mapper code, and makes cross-checking against the
//! console documentation much easier.

/// CPU memory map details.
pub mod cpu {
    /// First address of the hardware stack page.
    pub const STACK_PAGE_START: u16 = 0x0100;

    /// NMI vector (`$FFFA/$FFFB`).
    pub const NMI_VECTOR: u16 = 0xFFFA;
    /// Reset vector (`$FFFC/$FFFD`).
    pub const RESET_VECTOR: u16 = 0xFFFC;
    /// IRQ/BRK vector (`$FFFE/$FFFF`).
    pub const IRQ_VECTOR: u16 = 0xFFFE;

    /// First byte of CPU internal RAM.
    pub const INTERNAL_RAM_START: u16 = 0x0000;
    /// Last mirrored internal RAM address visible to the CPU (`$1FFF`).
    pub const INTERNAL_RAM_MIRROR_END: u16 = 0x1FFF;
    /// Size of the CPU internal RAM block (2 KiB mirrored through `$1FFF`).
    pub const INTERNAL_RAM_SIZE: usize = 0x0800;
    /// Mask applied to mirror CPU RAM accesses within `$0000-$1FFF`.
    pub const INTERNAL_RAM_MASK: u16 = (INTERNAL_RAM_SIZE as u16) - 1;

    /// First CPU address mapped to the PPU register mirror.
    pub const PPU_REGISTER_BASE: u16 = 0x2000;
    /// Last CPU address mirrored to the PPU register set.
    pub const PPU_REGISTER_END: u16 = 0x3FFF;

    /// First CPU-visible APU channel register.
    pub const APU_REGISTER_BASE: u16 = 0x4000;
    /// Final APU channel register before the DMA / status / port region.
    pub const APU_REGISTER_END: u16 = 0x4013;
    /// OAM DMA trigger register (`$4014`).
    pub const OAM_DMA: u16 = 0x4014;
    /// APU status register (`$4015`).
    pub const APU_STATUS: u16 = 0x4015;
    /// Controller port 1 strobe/read address (`$4016`).
    pub const CONTROLLER_PORT_1: u16 = 0x4016;
    /// Controller port 2 read address; writes configure the APU frame counter.
    pub const CONTROLLER_PORT_2: u16 = 0x4017;

    /// Diagnostics-only I/O range, disabled on retail consoles.
    pub const TEST_MODE_BASE: u16 = 0x4018;
    /// End of the test mode I/O window.
    pub const TEST_MODE_END: u16 = 0x401F;

    /// First address handled by the cartridge expansion / PRG window.
    pub const CARTRIDGE_SPACE_BASE: u16 = 0x4020;
    /// PRG RAM window start address (`$6000`).
    pub const PRG_RAM_START: u16 = 0x6000;
    /// PRG RAM window end address (inclusive).
    pub const PRG_RAM_END: u16 = 0x7FFF;
    /// PRG ROM window start address (`$8000`).
    pub const PRG_ROM_START: u16 = 0x8000;
    /// Final CPU-visible address (`$FFFF`).
    pub const CPU_ADDR_END: u16 = 0xFFFF;
}

/// PPU register layout and VRAM mirror rules.
pub mod ppu {
    /// Mask for decoding register mirrors (`addr & 0x0007`).
    pub const REGISTER_SELECT_MASK: u16 = 0x0007;

    /// Address mask applied to every VRAM access (14-bit PPU bus).
    pub const VRAM_MIRROR_MASK: u16 = 0x3FFF;

    /// Palette RAM base address (`$3F00`).
    pub const PALETTE_BASE: u16 = 0x3F00;
    /// Palette RAM byte count (32 bytes mirrored every 32 bytes).
    pub const PALETTE_RAM_SIZE: usize = 0x20;

    /// Base address of nametable 0.
    pub const NAMETABLE_BASE: u16 = 0x2000;
    /// Internal nametable RAM size (2 KiB shared across four logical tables).
    pub const VRAM_SIZE: usize = 0x0800;

    /// Primary Object Attribute Memory byte count.
    pub const OAM_RAM_SIZE: usize = 0x100;
    /// Sprite slots held in secondary OAM for one scanline.
    pub const SECONDARY_OAM_SPRITES: usize = 8;

    /// CPU-visible PPU register identifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Register {
        /// `$2000` - PPUCTRL
        Control,
        /// `$2001` - PPUMASK
        Mask,
        /// `$2002` - PPUSTATUS
        Status,
        /// `$2003` - OAMADDR
        OamAddr,
        /// `$2004` - OAMDATA
        OamData,
        /// `$2005` - PPUSCROLL
        Scroll,
        /// `$2006` - PPUADDR
        Addr,
        /// `$2007` - PPUDATA
        Data,
    }

    impl Register {
        /// Resolves the canonical register for a CPU address in `$2000-$3FFF`.
        pub const fn from_cpu_addr(addr: u16) -> Self {
            match addr & REGISTER_SELECT_MASK {
                0 => Self::Control,
                1 => Self::Mask,
                2 => Self::Status,
                3 => Self::OamAddr,
                4 => Self::OamData,
                5 => Self::Scroll,
                6 => Self::Addr,
                _ => Self::Data,
            }
        }
    }
}

/// Audio Processing Unit (APU) register layout.
pub mod apu {
    /// Start of the CPU-mapped APU register range.
    pub const REGISTER_BASE: u16 = 0x4000;
    /// Final channel register before the status and frame counter bridges.
    pub const CHANNEL_REGISTER_END: u16 = 0x4013;
    /// Address of the status register (`$4015`).
    pub const STATUS: u16 = 0x4015;
    /// Address of the frame counter configuration register (`$4017`).
    pub const FRAME_COUNTER: u16 = 0x4017;
}
