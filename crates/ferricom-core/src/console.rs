//! The console: owns every subsystem and the master clock.
//!
//! Time advances in CPU instructions. Each bus access inside an instruction
//! moves the whole machine (PPU x3, APU x1), so by the time an instruction
//! retires, every subsystem has already seen its cycles. Interrupts, OAM
//! DMA, and DMC sample fetches are serviced between instructions.

use crate::{
    apu::Apu,
    audio::DEFAULT_SAMPLE_RATE,
    bus::{CpuBus, OpenBus},
    cartridge::Cartridge,
    controller::Controller,
    cpu::Cpu,
    error::Error,
    memory::cpu as cpu_mem,
    ppu::{Ppu, buffer::FrameBuffer, palette::Palette},
    state::{CpuSnapshot, PpuSnapshot},
};

#[derive(Debug)]
pub struct Console {
    cpu: Cpu,
    ppu: Ppu,
    apu: Apu,
    cartridge: Cartridge,
    ram: [u8; cpu_mem::INTERNAL_RAM_SIZE],
    controllers: [Controller; 2],
    open_bus: OpenBus,
    /// CPU cycles since power-on; the PPU has seen exactly three dots per.
    cycles: u64,
    palette: Palette,
}

impl Console {
    /// Builds a console around a parsed iNES image and performs the
    /// power-on reset (PC loads from the reset vector).
    pub fn new(rom: &[u8]) -> Result<Self, Error> {
        let cartridge = Cartridge::from_ines(rom)?;
        let mut console = Self {
            cpu: Cpu::new(),
            ppu: Ppu::new(),
            apu: Apu::new(DEFAULT_SAMPLE_RATE),
            cartridge,
            ram: [0; cpu_mem::INTERNAL_RAM_SIZE],
            controllers: [Controller::new(), Controller::new()],
            open_bus: OpenBus::default(),
            cycles: 0,
            palette: Palette::default(),
        };
        console.with_bus(|cpu, bus| cpu.reset(bus));
        Ok(console)
    }

    /// Soft reset, as if the console's reset button was pressed. RAM and
    /// cartridge state survive; the CPU restarts from the reset vector.
    pub fn reset(&mut self) {
        self.ppu.reset();
        self.with_bus(|cpu, bus| cpu.reset(bus));
    }

    fn with_bus<R>(&mut self, f: impl FnOnce(&mut Cpu, &mut CpuBus) -> R) -> R {
        let mut bus = CpuBus::new(
            &mut self.ram,
            &mut self.ppu,
            &mut self.apu,
            &mut self.cartridge,
            &mut self.controllers,
            &mut self.open_bus,
            &mut self.cycles,
        );
        f(&mut self.cpu, &mut bus)
    }

    /// Executes one CPU instruction, then services interrupt edges, OAM
    /// DMA, and DMC sample fetches at the boundary.
    pub fn step_instruction(&mut self) {
        self.with_bus(|cpu, bus| cpu.step(bus));

        if self.ppu.take_nmi_request() {
            self.cpu.latch_nmi();
        }
        self.with_bus(|cpu, bus| cpu.poll_interrupts(bus));

        if let Some(page) = self.ppu.take_oam_dma_request() {
            self.run_oam_dma(page);
        }
        if let Some(addr) = self.apu.take_dmc_fetch() {
            self.run_dmc_fetch(addr);
        }
    }

    /// Runs until the PPU crosses the start of vertical blank, then closes
    /// the audio frame. On return the frame buffer holds the finished
    /// picture and the sample buffer one frame of audio.
    pub fn run_frame(&mut self) {
        loop {
            self.step_instruction();
            if self.ppu.take_frame_complete() {
                break;
            }
        }
        self.apu.end_frame();
    }

    /// The 256-byte OAM copy triggered by `$4014`: one halt cycle (two when
    /// the write landed on an odd CPU cycle), then 256 read/write pairs
    /// through the OAMDATA port.
    fn run_oam_dma(&mut self, page: u8) {
        let odd_start = self.cycles & 1 == 1;
        self.with_bus(|_, bus| {
            bus.internal_cycle();
            if odd_start {
                bus.internal_cycle();
            }
            let base = u16::from(page) << 8;
            for offset in 0..=255u16 {
                let value = bus.read(base | offset);
                bus.write(0x2004, value);
            }
        });
    }

    /// A DMC sample fetch: the reader steals the bus for a few idle cycles
    /// before the actual PRG read. The PPU keeps running through the stall.
    fn run_dmc_fetch(&mut self, addr: u16) {
        let odd_start = self.cycles & 1 == 1;
        let byte = self.with_bus(|_, bus| {
            let idle = if odd_start { 3 } else { 2 };
            for _ in 0..idle {
                bus.internal_cycle();
            }
            bus.read(addr)
        });
        self.apu.finish_dmc_fetch(byte);
    }

    /// Replaces the live button mask for one controller port
    /// (bit 0 = A ... bit 7 = Right).
    pub fn set_controller(&mut self, port: usize, mask: u8) {
        if let Some(pad) = self.controllers.get_mut(port) {
            pad.set_state(mask);
        }
    }

    /// Installs a 192-byte `.pal` system palette; on error the previous
    /// (default) palette stays active.
    pub fn load_palette(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.palette = Palette::from_pal_bytes(bytes)?;
        Ok(())
    }

    /// Palette-index frame buffer for the last completed frame.
    pub fn framebuffer(&self) -> &FrameBuffer {
        self.ppu.framebuffer()
    }

    /// Renders the last frame as RGB triples into `out`
    /// (`256 * 240 * 3` bytes).
    pub fn render_frame_rgb(&self, out: &mut [u8]) {
        self.ppu.framebuffer().render_rgb(&self.palette, out);
    }

    /// Moves the finished frame's audio samples into `out`.
    pub fn take_audio_samples(&mut self, out: &mut Vec<i16>) {
        self.apu.drain_samples(out);
    }

    /// Reconfigures the host audio rate (default 44.1 kHz).
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.apu.set_sample_rate(sample_rate);
    }

    /// CPU cycles since power-on.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Frames completed since power-on.
    pub fn frame_count(&self) -> u64 {
        self.ppu.frame_count()
    }

    /// True when the cartridge declares battery-backed PRG-RAM.
    pub fn has_battery(&self) -> bool {
        self.cartridge.header().battery
    }

    /// PRG-RAM contents, for battery-save persistence.
    pub fn prg_ram(&self) -> &[u8] {
        self.cartridge.prg_ram()
    }

    /// Restores PRG-RAM contents from a battery save.
    pub fn prg_ram_mut(&mut self) -> &mut [u8] {
        self.cartridge.prg_ram_mut()
    }

    pub fn cartridge(&self) -> &Cartridge {
        &self.cartridge
    }

    /// CPU register snapshot for debugging.
    pub fn cpu_state(&self) -> CpuSnapshot {
        CpuSnapshot {
            a: self.cpu.a,
            x: self.cpu.x,
            y: self.cpu.y,
            sp: self.cpu.sp,
            pc: self.cpu.pc,
            p: self.cpu.p.bits(),
            cycles: self.cycles,
        }
    }

    /// PPU timing/scroll snapshot for debugging.
    pub fn ppu_state(&self) -> PpuSnapshot {
        let vram = self.ppu.vram_registers();
        PpuSnapshot {
            scanline: self.ppu.scanline(),
            dot: self.ppu.cycle(),
            v: vram.v.raw(),
            t: vram.t.raw(),
            fine_x: vram.x,
            write_toggle: vram.w,
            control: self.ppu.control().bits(),
            mask: self.ppu.mask().bits(),
            status: self.ppu.status().bits(),
            frame: self.ppu.frame_count(),
        }
    }

    /// Raw bus read bypassing the clock, for tests and debug tooling.
    /// PPU and APU registers are not touched to avoid read side effects.
    pub fn peek(&mut self, addr: u16) -> u8 {
        match addr {
            cpu_mem::INTERNAL_RAM_START..=cpu_mem::INTERNAL_RAM_MIRROR_END => {
                self.ram[(addr & cpu_mem::INTERNAL_RAM_MASK) as usize]
            }
            cpu_mem::CARTRIDGE_SPACE_BASE..=cpu_mem::CPU_ADDR_END => {
                self.cartridge.cpu_read(addr)
            }
            _ => 0,
        }
    }
}
