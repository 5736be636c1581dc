//! Cartridge mapper dispatch and shared access-target types.
//!
//! Every board answers the same four address-translation questions (CPU
//! read/write, PPU read/write) by naming which memory region backs the
//! access and at which offset; the [`Cartridge`](crate::cartridge::Cartridge)
//! owns the bytes and performs the actual load or store. Boards are a tagged
//! enum rather than trait objects: the set is closed, dispatch is an
//! exhaustive match, and each variant carries its own register block.

pub mod axrom;
pub mod mmc1;
pub mod mmc2;
pub mod mmc3;
pub mod nrom;
pub mod uxrom;

pub use axrom::Axrom;
pub use mmc1::Mmc1;
pub use mmc2::Mmc2;
pub use mmc3::Mmc3;
pub use nrom::Nrom;
pub use uxrom::Uxrom;

use crate::{
    cartridge::header::{Header, Mirroring},
    error::Error,
};

/// Backing region for a CPU-side cartridge access.
///
/// `Unmapped` reads land on the open bus; unmapped writes are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuTarget {
    PrgRom(usize),
    PrgRam(usize),
    Unmapped,
}

/// Backing region for a PPU-side cartridge access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PpuTarget {
    /// CHR ROM or RAM, depending on the board.
    Chr(usize),
    /// Console-internal 2 KiB nametable VRAM.
    Vram(usize),
    /// Writes to CHR-ROM resolve here and are dropped.
    Unmapped,
}

/// The supported board family, one variant per iNES mapper number.
#[derive(Debug, Clone)]
pub enum Mapper {
    Nrom(Nrom),
    Mmc1(Mmc1),
    Uxrom(Uxrom),
    Mmc3(Mmc3),
    Axrom(Axrom),
    Mmc2(Mmc2),
}

impl Mapper {
    /// Instantiates the board named by the header's mapper id.
    pub fn for_header(header: &Header) -> Result<Self, Error> {
        let mapper = match header.mapper_id {
            0 => Self::Nrom(Nrom::new()),
            1 => Self::Mmc1(Mmc1::new(header)),
            2 => Self::Uxrom(Uxrom::new()),
            4 => Self::Mmc3(Mmc3::new(header)),
            7 => Self::Axrom(Axrom::new()),
            9 => Self::Mmc2(Mmc2::new(header)),
            other => return Err(Error::UnsupportedMapper(other)),
        };
        tracing::debug!(mapper = mapper.name(), id = header.mapper_id, "board selected");
        Ok(mapper)
    }

    /// Resolves a CPU read in `$4020-$FFFF`.
    pub fn cpu_read(&self, header: &Header, addr: u16) -> CpuTarget {
        match self {
            Self::Nrom(m) => m.cpu_read(header, addr),
            Self::Mmc1(m) => m.cpu_read(header, addr),
            Self::Uxrom(m) => m.cpu_read(header, addr),
            Self::Mmc3(m) => m.cpu_read(header, addr),
            Self::Axrom(m) => m.cpu_read(header, addr),
            Self::Mmc2(m) => m.cpu_read(header, addr),
        }
    }

    /// Resolves a CPU write in `$4020-$FFFF`, mutating board registers for
    /// writes that land in the control range.
    pub fn cpu_write(&mut self, header: &Header, addr: u16, data: u8) -> CpuTarget {
        match self {
            Self::Nrom(m) => m.cpu_write(header, addr, data),
            Self::Mmc1(m) => m.cpu_write(header, addr, data),
            Self::Uxrom(m) => m.cpu_write(header, addr, data),
            Self::Mmc3(m) => m.cpu_write(header, addr, data),
            Self::Axrom(m) => m.cpu_write(header, addr, data),
            Self::Mmc2(m) => m.cpu_write(header, addr, data),
        }
    }

    /// Resolves a PPU read in `$0000-$3EFF`.
    ///
    /// Takes the current CPU cycle so boards that observe the PPU address
    /// bus (MMC3's A12 counter, MMC2's CHR latches) can update their state.
    pub fn ppu_read(&mut self, header: &Header, addr: u16, cpu_cycle: u64) -> PpuTarget {
        match self {
            Self::Nrom(m) => m.ppu_access(header, addr),
            Self::Mmc1(m) => m.ppu_access(header, addr, false),
            Self::Uxrom(m) => m.ppu_access(header, addr, false),
            Self::Mmc3(m) => m.ppu_access(header, addr, cpu_cycle, false),
            Self::Axrom(m) => m.ppu_access(header, addr, false),
            Self::Mmc2(m) => m.ppu_read(header, addr),
        }
    }

    /// Resolves a PPU write in `$0000-$3EFF`.
    pub fn ppu_write(&mut self, header: &Header, addr: u16, cpu_cycle: u64) -> PpuTarget {
        match self {
            Self::Nrom(m) => m.ppu_access_write(header, addr),
            Self::Mmc1(m) => m.ppu_access(header, addr, true),
            Self::Uxrom(m) => m.ppu_access(header, addr, true),
            Self::Mmc3(m) => m.ppu_access(header, addr, cpu_cycle, true),
            Self::Axrom(m) => m.ppu_access(header, addr, true),
            Self::Mmc2(m) => m.ppu_write(header, addr),
        }
    }

    /// True while the board holds the CPU IRQ line low.
    pub fn irq_pending(&self) -> bool {
        match self {
            Self::Mmc3(m) => m.irq_pending(),
            _ => false,
        }
    }

    /// Current effective nametable arrangement.
    pub fn mirroring(&self, header: &Header) -> Mirroring {
        match self {
            Self::Nrom(_) | Self::Uxrom(_) => header.mirroring,
            Self::Mmc1(m) => m.mirroring(),
            Self::Mmc3(m) => m.mirroring(),
            Self::Axrom(m) => m.mirroring(),
            Self::Mmc2(m) => m.mirroring(),
        }
    }

    /// Human readable board name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nrom(_) => "NROM",
            Self::Mmc1(_) => "MMC1",
            Self::Uxrom(_) => "UxROM",
            Self::Mmc3(_) => "MMC3",
            Self::Axrom(_) => "AxROM",
            Self::Mmc2(_) => "MMC2",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::header::NES_HEADER_LEN;

    fn header(mapper_id: u8) -> Header {
        let bytes: [u8; NES_HEADER_LEN] = [
            b'N',
            b'E',
            b'S',
            0x1A,
            1,
            1,
            mapper_id << 4,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
        ];
        Header::parse(&bytes).expect("test header")
    }

    #[test]
    fn builds_every_supported_board() {
        for id in [0u8, 1, 2, 4, 7, 9] {
            let h = header(id);
            let mapper = Mapper::for_header(&h).expect("supported");
            assert_eq!(u16::from(id), h.mapper_id);
            let _ = mapper.name();
        }
    }

    #[test]
    fn rejects_unknown_board() {
        let h = header(12);
        assert!(matches!(
            Mapper::for_header(&h),
            Err(Error::UnsupportedMapper(12))
        ));
    }
}
