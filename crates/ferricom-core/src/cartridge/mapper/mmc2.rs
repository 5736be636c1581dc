//! Mapper 9 (MMC2, Punch-Out!!).
//!
//! One switchable 8 KiB PRG bank at `$8000` with the remaining three banks
//! fixed to the end of ROM. The interesting part is CHR: each 4 KiB pattern
//! window has a latch toggled *by the PPU's own fetches* — reading the
//! trigger tiles at `$0FD8`/`$0FE8` (and the `$1FD8-$1FDF`/`$1FE8-$1FEF`
//! ranges for the upper window) flips that window between its `$FD` and
//! `$FE` bank registers. Games draw the trigger tiles to switch mid-frame.

use crate::cartridge::{
    header::{Header, Mirroring},
    mapper::{CpuTarget, PpuTarget},
    nametable,
};
use crate::memory::cpu as cpu_mem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Latch {
    Fd,
    Fe,
}

#[derive(Debug, Clone)]
pub struct Mmc2 {
    prg_bank: u8,
    chr_fd_0: u8,
    chr_fe_0: u8,
    chr_fd_1: u8,
    chr_fe_1: u8,
    latch_0: Latch,
    latch_1: Latch,
    horizontal: bool,
}

impl Mmc2 {
    pub fn new(header: &Header) -> Self {
        Self {
            prg_bank: 0,
            chr_fd_0: 0,
            chr_fe_0: 0,
            chr_fd_1: 0,
            chr_fe_1: 0,
            latch_0: Latch::Fd,
            latch_1: Latch::Fd,
            horizontal: header.mirroring == Mirroring::Horizontal,
        }
    }

    pub fn mirroring(&self) -> Mirroring {
        if self.horizontal {
            Mirroring::Horizontal
        } else {
            Mirroring::Vertical
        }
    }

    pub fn cpu_read(&self, header: &Header, addr: u16) -> CpuTarget {
        let last_8k = header.prg_banks as usize * 2;
        match addr {
            cpu_mem::PRG_RAM_START..=cpu_mem::PRG_RAM_END => {
                CpuTarget::PrgRam((addr & 0x1FFF) as usize)
            }
            0x8000..=0x9FFF => {
                CpuTarget::PrgRom((addr & 0x1FFF) as usize + self.prg_bank as usize * 0x2000)
            }
            0xA000..=0xBFFF => {
                CpuTarget::PrgRom((addr & 0x1FFF) as usize + (last_8k - 3) * 0x2000)
            }
            0xC000..=0xDFFF => {
                CpuTarget::PrgRom((addr & 0x1FFF) as usize + (last_8k - 2) * 0x2000)
            }
            0xE000..=cpu_mem::CPU_ADDR_END => {
                CpuTarget::PrgRom((addr & 0x1FFF) as usize + (last_8k - 1) * 0x2000)
            }
            _ => CpuTarget::Unmapped,
        }
    }

    pub fn cpu_write(&mut self, _header: &Header, addr: u16, data: u8) -> CpuTarget {
        match addr {
            cpu_mem::PRG_RAM_START..=cpu_mem::PRG_RAM_END => {
                return CpuTarget::PrgRam((addr & 0x1FFF) as usize);
            }
            0xA000..=0xAFFF => self.prg_bank = data & 0xF,
            0xB000..=0xBFFF => self.chr_fd_0 = data & 0x1F,
            0xC000..=0xCFFF => self.chr_fe_0 = data & 0x1F,
            0xD000..=0xDFFF => self.chr_fd_1 = data & 0x1F,
            0xE000..=0xEFFF => self.chr_fe_1 = data & 0x1F,
            0xF000..=0xFFFF => self.horizontal = data & 0x1 != 0,
            _ => {}
        }
        CpuTarget::Unmapped
    }

    pub fn ppu_read(&mut self, header: &Header, addr: u16) -> PpuTarget {
        if addr > 0x1FFF {
            return PpuTarget::Vram(nametable::mirror(addr, self.mirroring()));
        }

        // Resolve against the latch as it stood *before* this fetch; the
        // trigger tile itself still comes from the old bank.
        let target = PpuTarget::Chr(self.chr_offset(header, addr));

        if addr <= 0x0FFF {
            match addr {
                0x0FD8 => self.latch_0 = Latch::Fd,
                0x0FE8 => self.latch_0 = Latch::Fe,
                _ => {}
            }
        } else {
            match addr {
                0x1FD8..=0x1FDF => self.latch_1 = Latch::Fd,
                0x1FE8..=0x1FEF => self.latch_1 = Latch::Fe,
                _ => {}
            }
        }

        target
    }

    pub fn ppu_write(&mut self, header: &Header, addr: u16) -> PpuTarget {
        if addr > 0x1FFF {
            PpuTarget::Vram(nametable::mirror(addr, self.mirroring()))
        } else if header.chr_is_ram() {
            PpuTarget::Chr((addr & 0x1FFF) as usize)
        } else {
            PpuTarget::Unmapped
        }
    }

    fn chr_offset(&self, _header: &Header, addr: u16) -> usize {
        let (latch, fd, fe) = if addr <= 0x0FFF {
            (self.latch_0, self.chr_fd_0, self.chr_fe_0)
        } else {
            (self.latch_1, self.chr_fd_1, self.chr_fe_1)
        };
        let bank = match latch {
            Latch::Fd => fd,
            Latch::Fe => fe,
        };
        (addr & 0xFFF) as usize + bank as usize * 0x1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::header::NES_HEADER_LEN;

    fn header(prg_banks: u8, chr_banks: u8) -> Header {
        let bytes: [u8; NES_HEADER_LEN] = [
            b'N', b'E', b'S', 0x1A, prg_banks, chr_banks, 0x90, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        ];
        Header::parse(&bytes).expect("test header")
    }

    #[test]
    fn only_first_window_switches() {
        let h = header(8, 4);
        let mut mmc2 = Mmc2::new(&h);
        mmc2.cpu_write(&h, 0xA000, 0x02);
        assert_eq!(mmc2.cpu_read(&h, 0x8000), CpuTarget::PrgRom(2 * 0x2000));
        assert_eq!(mmc2.cpu_read(&h, 0xA000), CpuTarget::PrgRom(13 * 0x2000));
        assert_eq!(mmc2.cpu_read(&h, 0xE000), CpuTarget::PrgRom(15 * 0x2000));
    }

    #[test]
    fn trigger_fetch_switches_the_latch_afterwards() {
        let h = header(8, 4);
        let mut mmc2 = Mmc2::new(&h);
        mmc2.cpu_write(&h, 0xB000, 0x01); // FD bank for window 0
        mmc2.cpu_write(&h, 0xC000, 0x02); // FE bank for window 0

        // Latch starts at FD.
        assert_eq!(mmc2.ppu_read(&h, 0x0000), PpuTarget::Chr(0x1000));
        // The trigger tile itself still reads from the FD bank...
        assert_eq!(mmc2.ppu_read(&h, 0x0FE8), PpuTarget::Chr(0x1FE8));
        // ...but the next fetch sees the FE bank.
        assert_eq!(mmc2.ppu_read(&h, 0x0000), PpuTarget::Chr(0x2000));
        // And $0FD8 switches back.
        mmc2.ppu_read(&h, 0x0FD8);
        assert_eq!(mmc2.ppu_read(&h, 0x0000), PpuTarget::Chr(0x1000));
    }

    #[test]
    fn upper_window_triggers_on_ranges() {
        let h = header(8, 4);
        let mut mmc2 = Mmc2::new(&h);
        mmc2.cpu_write(&h, 0xD000, 0x00);
        mmc2.cpu_write(&h, 0xE000, 0x03);
        mmc2.ppu_read(&h, 0x1FEC); // anywhere in $1FE8-$1FEF
        assert_eq!(mmc2.ppu_read(&h, 0x1000), PpuTarget::Chr(0x3000));
        mmc2.ppu_read(&h, 0x1FDB);
        assert_eq!(mmc2.ppu_read(&h, 0x1000), PpuTarget::Chr(0x0000));
    }

    #[test]
    fn mirroring_register() {
        let bytes: [u8; NES_HEADER_LEN] = [
            b'N', b'E', b'S', 0x1A, 8, 4, 0x91, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        ];
        let h = Header::parse(&bytes).expect("test header");
        let mut mmc2 = Mmc2::new(&h);
        assert_eq!(mmc2.mirroring(), Mirroring::Vertical);
        mmc2.cpu_write(&h, 0xF000, 0x01);
        assert_eq!(mmc2.mirroring(), Mirroring::Horizontal);
    }
}
