//! CPU-visible bus: address decoding plus the master clock.
//!
//! Every CPU bus access — read, write, or internal dead cycle — advances
//! the console by one CPU tick, which runs the PPU three dots and the APU
//! once before the access itself completes. Time therefore flows *through*
//! the bus: the CPU never counts cycles, it just touches memory the way the
//! hardware does.

use crate::{
    apu::Apu,
    bus::OpenBus,
    cartridge::Cartridge,
    controller::Controller,
    memory::cpu as cpu_mem,
    ppu::Ppu,
};

/// Borrowed view of the console hardware, alive for one CPU operation.
#[derive(Debug)]
pub struct CpuBus<'a> {
    ram: &'a mut [u8; cpu_mem::INTERNAL_RAM_SIZE],
    ppu: &'a mut Ppu,
    apu: &'a mut Apu,
    cartridge: &'a mut Cartridge,
    controllers: &'a mut [Controller; 2],
    open_bus: &'a mut OpenBus,
    /// Console-wide CPU cycle counter.
    cycles: &'a mut u64,
}

impl<'a> CpuBus<'a> {
    pub(crate) fn new(
        ram: &'a mut [u8; cpu_mem::INTERNAL_RAM_SIZE],
        ppu: &'a mut Ppu,
        apu: &'a mut Apu,
        cartridge: &'a mut Cartridge,
        controllers: &'a mut [Controller; 2],
        open_bus: &'a mut OpenBus,
        cycles: &'a mut u64,
    ) -> Self {
        Self {
            ram,
            ppu,
            apu,
            cartridge,
            controllers,
            open_bus,
            cycles,
        }
    }

    /// Current CPU cycle count.
    pub fn cycles(&self) -> u64 {
        *self.cycles
    }

    /// Advances the master clock by one CPU tick: three PPU dots, one APU
    /// cycle.
    fn tick(&mut self) {
        *self.cycles += 1;
        for _ in 0..3 {
            self.ppu.clock(self.cartridge, *self.cycles);
        }
        self.apu.clock();
    }

    /// A bus cycle with no memory traffic (stack-pointer adjustments,
    /// DMA alignment stalls).
    pub fn internal_cycle(&mut self) {
        self.tick();
    }

    /// One CPU read; costs one tick.
    pub fn read(&mut self, addr: u16) -> u8 {
        self.tick();

        let value = match addr {
            cpu_mem::INTERNAL_RAM_START..=cpu_mem::INTERNAL_RAM_MIRROR_END => {
                self.ram[(addr & cpu_mem::INTERNAL_RAM_MASK) as usize]
            }
            cpu_mem::PPU_REGISTER_BASE..=cpu_mem::PPU_REGISTER_END => {
                self.ppu.cpu_read(addr, self.cartridge, *self.cycles)
            }
            cpu_mem::APU_STATUS => self.apu.read_status(),
            cpu_mem::CONTROLLER_PORT_1 => 0x40 | self.controllers[0].read(),
            cpu_mem::CONTROLLER_PORT_2 => 0x40 | self.controllers[1].read(),
            // Write-only APU/DMA registers and the test-mode window float.
            cpu_mem::APU_REGISTER_BASE..=cpu_mem::APU_REGISTER_END
            | cpu_mem::OAM_DMA
            | cpu_mem::TEST_MODE_BASE..=cpu_mem::TEST_MODE_END => self.open_bus.sample(),
            cpu_mem::CARTRIDGE_SPACE_BASE..=cpu_mem::CPU_ADDR_END => {
                self.cartridge.cpu_read(addr)
            }
        };

        self.open_bus.latch(value);
        value
    }

    /// One CPU write; costs one tick.
    pub fn write(&mut self, addr: u16, data: u8) {
        self.tick();
        self.open_bus.latch(data);

        match addr {
            cpu_mem::INTERNAL_RAM_START..=cpu_mem::INTERNAL_RAM_MIRROR_END => {
                self.ram[(addr & cpu_mem::INTERNAL_RAM_MASK) as usize] = data;
            }
            cpu_mem::PPU_REGISTER_BASE..=cpu_mem::PPU_REGISTER_END => {
                self.ppu.cpu_write(addr, data, self.cartridge, *self.cycles);
            }
            cpu_mem::OAM_DMA => self.ppu.request_oam_dma(data),
            cpu_mem::CONTROLLER_PORT_1 => {
                // The strobe line is wired to both pads.
                for pad in self.controllers.iter_mut() {
                    pad.write_strobe(data);
                }
            }
            cpu_mem::APU_REGISTER_BASE..=cpu_mem::APU_REGISTER_END
            | cpu_mem::APU_STATUS
            | cpu_mem::CONTROLLER_PORT_2 => {
                // $4017 writes configure the APU frame counter.
                self.apu.cpu_write(addr, data);
            }
            cpu_mem::TEST_MODE_BASE..=cpu_mem::TEST_MODE_END => {}
            cpu_mem::CARTRIDGE_SPACE_BASE..=cpu_mem::CPU_ADDR_END => {
                self.cartridge.cpu_write(addr, data);
            }
        }
    }

    /// Level of the combined IRQ line (APU frame, APU DMC, mapper).
    pub fn irq_line(&self) -> bool {
        self.apu.irq_pending() || self.cartridge.irq_pending()
    }
}
