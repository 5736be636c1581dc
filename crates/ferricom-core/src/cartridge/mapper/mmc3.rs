//! Mapper 4 (MMC3, TxROM family).
//!
//! Eight bank registers shared between CHR and PRG, selected by the even
//! write to `$8000` and loaded by the odd write to `$8001`. PRG is banked in
//! 8 KiB windows (two switchable, two fixed) with a mode bit swapping which
//! window is fixed; CHR splits into two 2 KiB plus four 1 KiB windows with
//! an inversion bit exchanging the halves.
//!
//! The scanline IRQ counter is clocked by rising edges of PPU address line
//! A12, debounced by requiring A12 to have idled low for at least three CPU
//! cycles so the rapid toggles inside a single tile fetch don't count.

use crate::cartridge::{
    header::{Header, Mirroring},
    mapper::{CpuTarget, PpuTarget},
    nametable,
};
use crate::memory::cpu as cpu_mem;

/// Minimum CPU cycles A12 must idle low before a rise clocks the counter.
const A12_LOW_MIN_CPU_CYCLES: u8 = 3;

/// Debounced A12 rising-edge detector.
///
/// Counts distinct CPU cycles observed while A12 is low; a low-to-high
/// transition only qualifies once that count reaches the threshold.
#[derive(Debug, Clone, Default)]
struct A12Filter {
    a12_high: bool,
    low_cycles: u8,
    last_cpu_cycle: u64,
}

impl A12Filter {
    /// Observes one PPU bus address; returns true on a qualified rising edge.
    fn observe(&mut self, addr: u16, cpu_cycle: u64) -> bool {
        let high = addr & 0x1000 != 0;
        let mut rise = false;

        if !high {
            if cpu_cycle != self.last_cpu_cycle {
                self.low_cycles = self.low_cycles.saturating_add(1);
            }
        } else if !self.a12_high {
            rise = self.low_cycles >= A12_LOW_MIN_CPU_CYCLES;
            self.low_cycles = 0;
        }

        self.last_cpu_cycle = cpu_cycle;
        self.a12_high = high;
        rise
    }
}

/// Register addressed by a CPU write, derived from the window + parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CpuRegister {
    BankSelect,
    BankData,
    Mirroring,
    PrgRamProtect,
    IrqLatch,
    IrqReload,
    IrqDisable,
    IrqEnable,
}

impl CpuRegister {
    fn from_addr(addr: u16) -> Option<Self> {
        use CpuRegister::*;
        let odd = addr & 1 != 0;
        match addr {
            0x8000..=0x9FFF => Some(if odd { BankData } else { BankSelect }),
            0xA000..=0xBFFF => Some(if odd { PrgRamProtect } else { Mirroring }),
            0xC000..=0xDFFF => Some(if odd { IrqReload } else { IrqLatch }),
            0xE000..=0xFFFF => Some(if odd { IrqEnable } else { IrqDisable }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Mmc3 {
    /// Target register index for the next `$8001` write (0-7).
    register_select: u8,
    /// R0-R5 are CHR banks (1 KiB units), R6/R7 PRG banks (8 KiB units).
    bank_registers: [u8; 8],
    /// PRG mode: false swaps at `$8000`, true swaps at `$C000`.
    prg_swap_high: bool,
    /// CHR mode: false places the 2 KiB windows at `$0000`, true at `$1000`.
    chr_invert: bool,
    mirroring: Mirroring,
    prg_ram_enable: bool,
    prg_ram_write_protect: bool,
    irq_latch: u8,
    irq_counter: u8,
    irq_enable: bool,
    irq_pending: bool,
    a12: A12Filter,
}

impl Mmc3 {
    pub fn new(header: &Header) -> Self {
        Self {
            register_select: 0,
            bank_registers: [0; 8],
            prg_swap_high: false,
            chr_invert: false,
            mirroring: header.mirroring,
            prg_ram_enable: false,
            prg_ram_write_protect: false,
            irq_latch: 0,
            irq_counter: 0,
            irq_enable: false,
            irq_pending: false,
            a12: A12Filter::default(),
        }
    }

    pub fn irq_pending(&self) -> bool {
        self.irq_pending
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    /// Number of 8 KiB PRG banks on this board.
    fn prg_bank_count(header: &Header) -> usize {
        header.prg_banks as usize * 2
    }

    pub fn cpu_read(&self, header: &Header, addr: u16) -> CpuTarget {
        match addr {
            cpu_mem::PRG_RAM_START..=cpu_mem::PRG_RAM_END if self.prg_ram_enable => {
                CpuTarget::PrgRam((addr & 0x1FFF) as usize)
            }
            cpu_mem::PRG_ROM_START..=cpu_mem::CPU_ADDR_END => {
                CpuTarget::PrgRom(self.prg_rom_offset(header, addr))
            }
            _ => CpuTarget::Unmapped,
        }
    }

    fn prg_rom_offset(&self, header: &Header, addr: u16) -> usize {
        let banks = Self::prg_bank_count(header);
        let (second_last, last) = (banks - 2, banks - 1);
        let bank = match (addr, self.prg_swap_high) {
            (0x8000..=0x9FFF, false) => self.bank_registers[6] as usize,
            (0x8000..=0x9FFF, true) => second_last,
            (0xA000..=0xBFFF, _) => self.bank_registers[7] as usize,
            (0xC000..=0xDFFF, false) => second_last,
            (0xC000..=0xDFFF, true) => self.bank_registers[6] as usize,
            _ => last,
        };
        (addr & 0x1FFF) as usize + bank * 0x2000
    }

    pub fn cpu_write(&mut self, _header: &Header, addr: u16, data: u8) -> CpuTarget {
        if (cpu_mem::PRG_RAM_START..=cpu_mem::PRG_RAM_END).contains(&addr) {
            if self.prg_ram_enable && !self.prg_ram_write_protect {
                return CpuTarget::PrgRam((addr & 0x1FFF) as usize);
            }
            return CpuTarget::Unmapped;
        }

        if let Some(register) = CpuRegister::from_addr(addr) {
            match register {
                CpuRegister::BankSelect => {
                    self.register_select = data & 0x7;
                    self.prg_swap_high = data & 0x40 != 0;
                    self.chr_invert = data & 0x80 != 0;
                }
                CpuRegister::BankData => {
                    let index = self.register_select as usize;
                    self.bank_registers[index] = match index {
                        // 2 KiB CHR windows ignore the low bank bit.
                        0 | 1 => data & 0xFE,
                        6 | 7 => data & 0x3F,
                        _ => data,
                    };
                }
                CpuRegister::Mirroring => {
                    self.mirroring = if data & 0x1 != 0 {
                        Mirroring::Horizontal
                    } else {
                        Mirroring::Vertical
                    };
                }
                CpuRegister::PrgRamProtect => {
                    self.prg_ram_write_protect = data & 0x40 != 0;
                    self.prg_ram_enable = data & 0x80 != 0;
                }
                CpuRegister::IrqLatch => self.irq_latch = data,
                CpuRegister::IrqReload => self.irq_counter = 0,
                CpuRegister::IrqDisable => {
                    self.irq_enable = false;
                    self.irq_pending = false;
                }
                CpuRegister::IrqEnable => self.irq_enable = true,
            }
        }
        CpuTarget::Unmapped
    }

    pub fn ppu_access(
        &mut self,
        header: &Header,
        addr: u16,
        cpu_cycle: u64,
        write: bool,
    ) -> PpuTarget {
        if self.a12.observe(addr, cpu_cycle) {
            self.clock_irq_counter();
        }

        if addr <= 0x1FFF {
            if write && !header.chr_is_ram() {
                return PpuTarget::Unmapped;
            }
            PpuTarget::Chr(self.chr_offset(addr))
        } else {
            PpuTarget::Vram(nametable::mirror(addr, self.mirroring))
        }
    }

    fn chr_offset(&self, addr: u16) -> usize {
        // With inversion off, R0/R1 are the 2 KiB windows at $0000/$0800 and
        // R2-R5 the 1 KiB windows at $1000-$1FFF; inversion swaps the halves.
        let effective = if self.chr_invert { addr ^ 0x1000 } else { addr };
        let (bank, window_mask) = match effective {
            0x0000..=0x07FF => (self.bank_registers[0] as usize, 0x7FF),
            0x0800..=0x0FFF => (self.bank_registers[1] as usize, 0x7FF),
            0x1000..=0x13FF => (self.bank_registers[2] as usize, 0x3FF),
            0x1400..=0x17FF => (self.bank_registers[3] as usize, 0x3FF),
            0x1800..=0x1BFF => (self.bank_registers[4] as usize, 0x3FF),
            _ => (self.bank_registers[5] as usize, 0x3FF),
        };
        (addr as usize & window_mask) + bank * 0x400
    }

    /// Counter step on a qualified A12 rising edge: reload when exhausted,
    /// decrement otherwise, and latch the IRQ when reaching zero enabled.
    fn clock_irq_counter(&mut self) {
        if self.irq_counter == 0 {
            self.irq_counter = self.irq_latch;
        } else {
            self.irq_counter -= 1;
        }
        if self.irq_counter == 0 && self.irq_enable {
            self.irq_pending = true;
            tracing::trace!("mmc3 irq latched");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::header::NES_HEADER_LEN;

    fn header(prg_banks: u8, chr_banks: u8) -> Header {
        let bytes: [u8; NES_HEADER_LEN] = [
            b'N', b'E', b'S', 0x1A, prg_banks, chr_banks, 0x40, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        ];
        Header::parse(&bytes).expect("test header")
    }

    fn select_bank(mmc3: &mut Mmc3, header: &Header, register: u8, value: u8) {
        mmc3.cpu_write(header, 0x8000, register);
        mmc3.cpu_write(header, 0x8001, value);
    }

    #[test]
    fn prg_mode_0_swaps_at_8000() {
        let h = header(8, 8); // 16 banks of 8 KiB
        let mut mmc3 = Mmc3::new(&h);
        select_bank(&mut mmc3, &h, 6, 3);
        select_bank(&mut mmc3, &h, 7, 5);
        assert_eq!(mmc3.cpu_read(&h, 0x8000), CpuTarget::PrgRom(3 * 0x2000));
        assert_eq!(mmc3.cpu_read(&h, 0xA000), CpuTarget::PrgRom(5 * 0x2000));
        assert_eq!(mmc3.cpu_read(&h, 0xC000), CpuTarget::PrgRom(14 * 0x2000));
        assert_eq!(mmc3.cpu_read(&h, 0xE000), CpuTarget::PrgRom(15 * 0x2000));
    }

    #[test]
    fn prg_mode_1_swaps_at_c000() {
        let h = header(8, 8);
        let mut mmc3 = Mmc3::new(&h);
        mmc3.cpu_write(&h, 0x8000, 0x46);
        mmc3.cpu_write(&h, 0x8001, 3);
        assert_eq!(mmc3.cpu_read(&h, 0x8000), CpuTarget::PrgRom(14 * 0x2000));
        assert_eq!(mmc3.cpu_read(&h, 0xC000), CpuTarget::PrgRom(3 * 0x2000));
    }

    #[test]
    fn chr_inversion_swaps_halves() {
        let h = header(8, 8);
        let mut mmc3 = Mmc3::new(&h);
        select_bank(&mut mmc3, &h, 0, 0x08);
        select_bank(&mut mmc3, &h, 2, 0x20);
        assert_eq!(mmc3.ppu_access(&h, 0x0000, 0, false), PpuTarget::Chr(0x08 * 0x400));
        assert_eq!(mmc3.ppu_access(&h, 0x1000, 0, false), PpuTarget::Chr(0x20 * 0x400));
        // Invert: the 2 KiB windows move to $1000.
        mmc3.cpu_write(&h, 0x8000, 0x80);
        assert_eq!(mmc3.ppu_access(&h, 0x1000, 0, false), PpuTarget::Chr(0x08 * 0x400));
        assert_eq!(mmc3.ppu_access(&h, 0x0000, 0, false), PpuTarget::Chr(0x20 * 0x400));
    }

    #[test]
    fn irq_counts_qualified_a12_edges() {
        let h = header(8, 8);
        let mut mmc3 = Mmc3::new(&h);
        mmc3.cpu_write(&h, 0xC000, 2); // latch
        mmc3.cpu_write(&h, 0xC001, 0); // reload
        mmc3.cpu_write(&h, 0xE001, 0); // enable

        let mut cycle = 0u64;
        let mut rise = |mmc3: &mut Mmc3, cycle: &mut u64| {
            // Hold A12 low for four CPU cycles, then raise it.
            for _ in 0..4 {
                *cycle += 1;
                mmc3.ppu_access(&h, 0x0000, *cycle, false);
            }
            *cycle += 1;
            mmc3.ppu_access(&h, 0x1000, *cycle, false);
        };

        rise(&mut mmc3, &mut cycle); // reload to 2
        assert!(!mmc3.irq_pending());
        rise(&mut mmc3, &mut cycle); // 1
        assert!(!mmc3.irq_pending());
        rise(&mut mmc3, &mut cycle); // 0 -> IRQ
        assert!(mmc3.irq_pending());

        mmc3.cpu_write(&h, 0xE000, 0); // ack + disable
        assert!(!mmc3.irq_pending());
    }

    #[test]
    fn glitch_edges_are_filtered() {
        let h = header(8, 8);
        let mut mmc3 = Mmc3::new(&h);
        mmc3.cpu_write(&h, 0xC000, 0);
        mmc3.cpu_write(&h, 0xC001, 0);
        mmc3.cpu_write(&h, 0xE001, 0);

        // A12 toggling within a single CPU cycle never clocks the counter.
        for _ in 0..32 {
            mmc3.ppu_access(&h, 0x0000, 7, false);
            mmc3.ppu_access(&h, 0x1000, 7, false);
        }
        assert!(!mmc3.irq_pending());
    }

    #[test]
    fn prg_ram_gated_by_protect_register() {
        let h = header(8, 8);
        let mut mmc3 = Mmc3::new(&h);
        assert_eq!(mmc3.cpu_read(&h, 0x6000), CpuTarget::Unmapped);
        mmc3.cpu_write(&h, 0xA001, 0x80);
        assert_eq!(mmc3.cpu_read(&h, 0x6000), CpuTarget::PrgRam(0));
        assert_eq!(mmc3.cpu_write(&h, 0x6000, 0xAA), CpuTarget::PrgRam(0));
        mmc3.cpu_write(&h, 0xA001, 0xC0);
        assert_eq!(mmc3.cpu_write(&h, 0x6000, 0xAA), CpuTarget::Unmapped);
        assert_eq!(mmc3.cpu_read(&h, 0x6000), CpuTarget::PrgRam(0));
    }
}
