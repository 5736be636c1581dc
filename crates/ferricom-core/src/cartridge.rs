//! Cartridge model: byte regions plus the board that maps them.
//!
//! The cartridge owns PRG-ROM, PRG-RAM, CHR (ROM or RAM), and the console's
//! 2 KiB nametable VRAM; the [`Mapper`] only translates addresses into
//! region offsets. All offsets are wrapped to the region length on access —
//! address lines beyond the fitted memory simply don't exist on the board,
//! so out-of-range banks alias instead of faulting.

pub mod header;
pub mod mapper;
pub mod nametable;

use crate::{
    cartridge::{
        header::{Header, NES_HEADER_LEN},
        mapper::{CpuTarget, Mapper, PpuTarget},
    },
    error::Error,
    memory::ppu as ppu_mem,
};

/// Byte length of the optional trainer section.
pub const TRAINER_SIZE: usize = 512;

#[derive(Debug, Clone)]
pub struct Cartridge {
    header: Header,
    mapper: Mapper,
    prg_rom: Box<[u8]>,
    prg_ram: Box<[u8]>,
    chr: Box<[u8]>,
    vram: Box<[u8]>,
    /// Last byte driven onto the cartridge data bus, returned for unmapped reads.
    bus_latch: u8,
}

impl Cartridge {
    /// Builds a cartridge from a complete iNES image (header included).
    ///
    /// The trainer section, when present, is skipped: it only matters to
    /// Famicom disk conversions that the core does not model.
    pub fn from_ines(bytes: &[u8]) -> Result<Self, Error> {
        let header = Header::parse(bytes)?;
        let mapper = Mapper::for_header(&header)?;

        let mut cursor = NES_HEADER_LEN;
        if header.trainer {
            slice_section(bytes, &mut cursor, TRAINER_SIZE, "trainer")?;
        }
        let prg_rom = slice_section(bytes, &mut cursor, header.prg_rom_size(), "PRG ROM")?;
        let chr: Box<[u8]> = if header.chr_is_ram() {
            vec![0; header::CHR_BANK_SIZE].into_boxed_slice()
        } else {
            slice_section(bytes, &mut cursor, header.chr_rom_size(), "CHR ROM")?
                .to_vec()
                .into_boxed_slice()
        };

        tracing::debug!(
            mapper = mapper.name(),
            prg = header.prg_rom_size(),
            chr = chr.len(),
            chr_ram = header.chr_is_ram(),
            battery = header.battery,
            "cartridge loaded"
        );

        Ok(Self {
            header,
            mapper,
            prg_rom: prg_rom.to_vec().into_boxed_slice(),
            prg_ram: vec![0; header.prg_ram_size()].into_boxed_slice(),
            chr,
            vram: vec![0; ppu_mem::VRAM_SIZE].into_boxed_slice(),
            bus_latch: 0,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    /// PRG-RAM contents, exposed for battery-backed save persistence.
    pub fn prg_ram(&self) -> &[u8] {
        &self.prg_ram
    }

    /// Mutable PRG-RAM, letting the host restore a battery save.
    pub fn prg_ram_mut(&mut self) -> &mut [u8] {
        &mut self.prg_ram
    }

    /// CPU-side read of `$4020-$FFFF`.
    pub fn cpu_read(&mut self, addr: u16) -> u8 {
        let value = match self.mapper.cpu_read(&self.header, addr) {
            CpuTarget::PrgRom(offset) => self.prg_rom[offset % self.prg_rom.len()],
            CpuTarget::PrgRam(offset) => self.prg_ram[offset % self.prg_ram.len()],
            CpuTarget::Unmapped => self.bus_latch,
        };
        self.bus_latch = value;
        value
    }

    /// CPU-side write of `$4020-$FFFF`. ROM writes reach only the mapper.
    pub fn cpu_write(&mut self, addr: u16, data: u8) {
        if let CpuTarget::PrgRam(offset) = self.mapper.cpu_write(&self.header, addr, data) {
            let len = self.prg_ram.len();
            self.prg_ram[offset % len] = data;
        }
    }

    /// PPU-side read of `$0000-$3EFF` (palette addresses never reach here).
    pub fn ppu_read(&mut self, addr: u16, cpu_cycle: u64) -> u8 {
        let addr = addr & ppu_mem::VRAM_MIRROR_MASK;
        match self.mapper.ppu_read(&self.header, addr, cpu_cycle) {
            PpuTarget::Chr(offset) => self.chr[offset % self.chr.len()],
            PpuTarget::Vram(offset) => self.vram[offset % self.vram.len()],
            PpuTarget::Unmapped => 0,
        }
    }

    /// PPU-side write of `$0000-$3EFF`. CHR-ROM writes are dropped.
    pub fn ppu_write(&mut self, addr: u16, data: u8, cpu_cycle: u64) {
        let addr = addr & ppu_mem::VRAM_MIRROR_MASK;
        match self.mapper.ppu_write(&self.header, addr, cpu_cycle) {
            PpuTarget::Chr(offset) => {
                let len = self.chr.len();
                self.chr[offset % len] = data;
            }
            PpuTarget::Vram(offset) => {
                let len = self.vram.len();
                self.vram[offset % len] = data;
            }
            PpuTarget::Unmapped => {}
        }
    }

    /// True while the board asserts the CPU IRQ line.
    pub fn irq_pending(&self) -> bool {
        self.mapper.irq_pending()
    }
}

fn slice_section<'a>(
    bytes: &'a [u8],
    cursor: &mut usize,
    len: usize,
    name: &'static str,
) -> Result<&'a [u8], Error> {
    let end = cursor.checked_add(len).ok_or(Error::SectionTooShort {
        section: name,
        expected: len,
        actual: bytes.len().saturating_sub(*cursor),
    })?;
    let slice = bytes.get(*cursor..end).ok_or(Error::SectionTooShort {
        section: name,
        expected: len,
        actual: bytes.len().saturating_sub(*cursor),
    })?;
    *cursor = end;
    Ok(slice)
}
