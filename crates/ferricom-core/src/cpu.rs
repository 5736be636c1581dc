//! MOS 6502 core (2A03 flavor: decimal mode is stored but ignored).
//!
//! The CPU is stepped one instruction at a time. Timing falls out of the
//! bus: every read, write, and internal cycle advances the console clock,
//! so faithfully performing the hardware's dummy accesses — the PC re-read
//! of implied opcodes, the pre-index reads of the indexed zero-page modes,
//! the wrong-address read when indexing carries across a page, the
//! write-back of unmodified data in read-modify-write instructions — yields
//! the documented cycle counts without any per-opcode bookkeeping.

pub mod addressing;
pub mod instruction;
pub mod lookup;
pub mod status;

use crate::{
    bus::CpuBus,
    cpu::{
        addressing::{Addressing, Operand},
        instruction::{Instruction, Mnemonic},
        lookup::LOOKUP_TABLE,
        status::Status,
    },
    memory::cpu as cpu_mem,
};

#[derive(Debug, Clone)]
pub struct Cpu {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub p: Status,
    /// One-shot NMI flip-flop, latched from the PPU's vblank edge.
    nmi_pending: bool,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0,
            p: Status::power_on(),
            nmi_pending: false,
        }
    }

    /// Reset: SP and flags to their post-reset values, PC from the reset
    /// vector. Memory is left untouched.
    pub fn reset(&mut self, bus: &mut CpuBus) {
        self.sp = 0xFD;
        self.p.insert(Status::INTERRUPT);
        self.nmi_pending = false;
        let lo = bus.read(cpu_mem::RESET_VECTOR);
        let hi = bus.read(cpu_mem::RESET_VECTOR + 1);
        self.pc = u16::from_le_bytes([lo, hi]);
    }

    /// Latches the NMI edge; serviced at the next instruction boundary.
    pub fn latch_nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Executes one instruction.
    pub fn step(&mut self, bus: &mut CpuBus) {
        let opcode = self.fetch(bus);
        let instruction = &LOOKUP_TABLE[opcode as usize];
        let operand = self.resolve_operand(bus, instruction);
        self.execute(bus, instruction, operand);
    }

    /// Services pending interrupts at the instruction boundary: NMI first,
    /// then level-triggered IRQ when the I flag allows.
    pub fn poll_interrupts(&mut self, bus: &mut CpuBus) {
        if self.nmi_pending {
            self.nmi_pending = false;
            self.interrupt(bus, cpu_mem::NMI_VECTOR);
        } else if bus.irq_line() && !self.p.contains(Status::INTERRUPT) {
            self.interrupt(bus, cpu_mem::IRQ_VECTOR);
        }
    }

    /// Hardware interrupt entry: seven cycles ending at the vector target.
    fn interrupt(&mut self, bus: &mut CpuBus, vector: u16) {
        // The aborted instruction fetch and the dead pipeline slot.
        bus.read(self.pc);
        bus.read(self.pc);
        self.push(bus, (self.pc >> 8) as u8);
        self.push(bus, self.pc as u8);
        self.push(bus, ((self.p | Status::UNUSED) - Status::BREAK).bits());
        self.p.insert(Status::INTERRUPT);
        let lo = bus.read(vector);
        let hi = bus.read(vector + 1);
        self.pc = u16::from_le_bytes([lo, hi]);
    }

    fn fetch(&mut self, bus: &mut CpuBus) -> u8 {
        let byte = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        byte
    }

    /// Forms the operand, performing the addressing mode's documented
    /// memory traffic (including dummy reads) along the way.
    fn resolve_operand(&mut self, bus: &mut CpuBus, instruction: &Instruction) -> Operand {
        match instruction.mode {
            Addressing::Implied => {
                bus.read(self.pc);
                Operand::None
            }
            Addressing::Accumulator => {
                bus.read(self.pc);
                Operand::Accumulator
            }
            Addressing::Immediate => Operand::Immediate(self.fetch(bus)),
            Addressing::ZeroPage => Operand::Address(u16::from(self.fetch(bus))),
            Addressing::ZeroPageX => {
                let base = self.fetch(bus);
                bus.read(u16::from(base));
                Operand::Address(u16::from(base.wrapping_add(self.x)))
            }
            Addressing::ZeroPageY => {
                let base = self.fetch(bus);
                bus.read(u16::from(base));
                Operand::Address(u16::from(base.wrapping_add(self.y)))
            }
            Addressing::Absolute => {
                let lo = self.fetch(bus);
                let hi = self.fetch(bus);
                Operand::Address(u16::from_le_bytes([lo, hi]))
            }
            Addressing::AbsoluteX => self.indexed_absolute(bus, instruction, self.x),
            Addressing::AbsoluteY => self.indexed_absolute(bus, instruction, self.y),
            Addressing::Indirect => {
                let lo = self.fetch(bus);
                let hi = self.fetch(bus);
                let ptr = u16::from_le_bytes([lo, hi]);
                // The high fetch wraps within the pointer's page when the
                // low byte is $FF; JMP ($xxFF) reads $xx00, not $(xx+1)00.
                let target_lo = bus.read(ptr);
                let target_hi = bus.read((ptr & 0xFF00) | u16::from(lo.wrapping_add(1)));
                Operand::Address(u16::from_le_bytes([target_lo, target_hi]))
            }
            Addressing::IndirectX => {
                let base = self.fetch(bus);
                bus.read(u16::from(base));
                let ptr = base.wrapping_add(self.x);
                let lo = bus.read(u16::from(ptr));
                let hi = bus.read(u16::from(ptr.wrapping_add(1)));
                Operand::Address(u16::from_le_bytes([lo, hi]))
            }
            Addressing::IndirectY => {
                let ptr = self.fetch(bus);
                let lo = bus.read(u16::from(ptr));
                let hi = bus.read(u16::from(ptr.wrapping_add(1)));
                let base = u16::from_le_bytes([lo, hi]);
                let addr = base.wrapping_add(u16::from(self.y));
                // Write-class opcodes always read the not-yet-corrected
                // address; read-class ones only pay when the carry actually
                // crosses a page.
                if instruction.mnemonic.always_dummy_reads() || addr & 0xFF00 != base & 0xFF00 {
                    bus.read((base & 0xFF00) | (addr & 0x00FF));
                }
                Operand::Address(addr)
            }
            Addressing::Relative => {
                let offset = self.fetch(bus) as i8;
                Operand::Address(self.pc.wrapping_add_signed(i16::from(offset)))
            }
        }
    }

    fn indexed_absolute(&mut self, bus: &mut CpuBus, instruction: &Instruction, index: u8) -> Operand {
        let lo = self.fetch(bus);
        let hi = self.fetch(bus);
        let base = u16::from_le_bytes([lo, hi]);
        let addr = base.wrapping_add(u16::from(index));
        if instruction.mnemonic.always_dummy_reads() || addr & 0xFF00 != base & 0xFF00 {
            bus.read((base & 0xFF00) | u16::from(lo.wrapping_add(index)));
        }
        Operand::Address(addr)
    }

    /// Loads the operand value for read-class instructions.
    fn load(&mut self, bus: &mut CpuBus, operand: Operand) -> u8 {
        match operand {
            Operand::Immediate(value) => value,
            Operand::Address(addr) => bus.read(addr),
            Operand::Accumulator => self.a,
            Operand::None => 0,
        }
    }

    fn push(&mut self, bus: &mut CpuBus, value: u8) {
        bus.write(cpu_mem::STACK_PAGE_START | u16::from(self.sp), value);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn pop(&mut self, bus: &mut CpuBus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(cpu_mem::STACK_PAGE_START | u16::from(self.sp))
    }

    fn execute(&mut self, bus: &mut CpuBus, instruction: &Instruction, operand: Operand) {
        match instruction.mnemonic {
            // Loads and stores ------------------------------------------
            Mnemonic::Lda => {
                self.a = self.load(bus, operand);
                self.p.set_zn(self.a);
            }
            Mnemonic::Ldx => {
                self.x = self.load(bus, operand);
                self.p.set_zn(self.x);
            }
            Mnemonic::Ldy => {
                self.y = self.load(bus, operand);
                self.p.set_zn(self.y);
            }
            Mnemonic::Lax => {
                let value = self.load(bus, operand);
                self.a = value;
                self.x = value;
                self.p.set_zn(value);
            }
            Mnemonic::Sta => bus.write(operand.address(), self.a),
            Mnemonic::Stx => bus.write(operand.address(), self.x),
            Mnemonic::Sty => bus.write(operand.address(), self.y),
            Mnemonic::Sax => bus.write(operand.address(), self.a & self.x),

            // Transfers -------------------------------------------------
            Mnemonic::Tax => {
                self.x = self.a;
                self.p.set_zn(self.x);
            }
            Mnemonic::Tay => {
                self.y = self.a;
                self.p.set_zn(self.y);
            }
            Mnemonic::Tsx => {
                self.x = self.sp;
                self.p.set_zn(self.x);
            }
            Mnemonic::Txa => {
                self.a = self.x;
                self.p.set_zn(self.a);
            }
            Mnemonic::Txs => self.sp = self.x,
            Mnemonic::Tya => {
                self.a = self.y;
                self.p.set_zn(self.a);
            }

            // Stack -----------------------------------------------------
            Mnemonic::Pha => self.push(bus, self.a),
            Mnemonic::Php => {
                self.push(bus, (self.p | Status::BREAK | Status::UNUSED).bits())
            }
            Mnemonic::Pla => {
                bus.internal_cycle();
                self.a = self.pop(bus);
                self.p.set_zn(self.a);
            }
            Mnemonic::Plp => {
                bus.internal_cycle();
                let byte = self.pop(bus);
                self.p = Status::from_stack_byte(byte);
            }

            // Shifts and rotates ---------------------------------------
            Mnemonic::Asl => {
                self.rmw(bus, operand, Self::asl);
            }
            Mnemonic::Lsr => {
                self.rmw(bus, operand, Self::lsr);
            }
            Mnemonic::Rol => {
                self.rmw(bus, operand, Self::rol);
            }
            Mnemonic::Ror => {
                self.rmw(bus, operand, Self::ror);
            }

            // Logic -----------------------------------------------------
            Mnemonic::And => {
                self.a &= self.load(bus, operand);
                self.p.set_zn(self.a);
            }
            Mnemonic::Ora => {
                self.a |= self.load(bus, operand);
                self.p.set_zn(self.a);
            }
            Mnemonic::Eor => {
                self.a ^= self.load(bus, operand);
                self.p.set_zn(self.a);
            }
            Mnemonic::Bit => {
                let value = self.load(bus, operand);
                self.p.set(Status::ZERO, self.a & value == 0);
                self.p.set(Status::NEGATIVE, value & 0x80 != 0);
                self.p.set(Status::OVERFLOW, value & 0x40 != 0);
            }

            // Arithmetic ------------------------------------------------
            Mnemonic::Adc => {
                let value = self.load(bus, operand);
                self.adc(value);
            }
            Mnemonic::Sbc => {
                let value = self.load(bus, operand);
                self.adc(!value);
            }
            Mnemonic::Cmp => {
                let value = self.load(bus, operand);
                self.compare(self.a, value);
            }
            Mnemonic::Cpx => {
                let value = self.load(bus, operand);
                self.compare(self.x, value);
            }
            Mnemonic::Cpy => {
                let value = self.load(bus, operand);
                self.compare(self.y, value);
            }

            // Undocumented read-modify-write combos ---------------------
            Mnemonic::Dcp => {
                let result = self.rmw(bus, operand, |_, v| v.wrapping_sub(1));
                self.compare(self.a, result);
            }
            Mnemonic::Isb => {
                let result = self.rmw(bus, operand, |_, v| v.wrapping_add(1));
                self.adc(!result);
            }
            Mnemonic::Slo => {
                let result = self.rmw(bus, operand, Self::asl);
                self.a |= result;
                self.p.set_zn(self.a);
            }
            Mnemonic::Rla => {
                let result = self.rmw(bus, operand, Self::rol);
                self.a &= result;
                self.p.set_zn(self.a);
            }
            Mnemonic::Sre => {
                let result = self.rmw(bus, operand, Self::lsr);
                self.a ^= result;
                self.p.set_zn(self.a);
            }
            Mnemonic::Rra => {
                let result = self.rmw(bus, operand, Self::ror);
                self.adc(result);
            }

            // Increments and decrements ---------------------------------
            Mnemonic::Dec => {
                self.rmw(bus, operand, |cpu, v| {
                    let r = v.wrapping_sub(1);
                    cpu.p.set_zn(r);
                    r
                });
            }
            Mnemonic::Inc => {
                self.rmw(bus, operand, |cpu, v| {
                    let r = v.wrapping_add(1);
                    cpu.p.set_zn(r);
                    r
                });
            }
            Mnemonic::Dex => {
                self.x = self.x.wrapping_sub(1);
                self.p.set_zn(self.x);
            }
            Mnemonic::Dey => {
                self.y = self.y.wrapping_sub(1);
                self.p.set_zn(self.y);
            }
            Mnemonic::Inx => {
                self.x = self.x.wrapping_add(1);
                self.p.set_zn(self.x);
            }
            Mnemonic::Iny => {
                self.y = self.y.wrapping_add(1);
                self.p.set_zn(self.y);
            }

            // Control flow ----------------------------------------------
            Mnemonic::Jmp => self.pc = operand.address(),
            Mnemonic::Jsr => {
                bus.internal_cycle();
                let ret = self.pc.wrapping_sub(1);
                self.push(bus, (ret >> 8) as u8);
                self.push(bus, ret as u8);
                self.pc = operand.address();
            }
            Mnemonic::Rts => {
                bus.internal_cycle();
                let lo = self.pop(bus);
                let hi = self.pop(bus);
                bus.internal_cycle();
                self.pc = u16::from_le_bytes([lo, hi]).wrapping_add(1);
            }
            Mnemonic::Rti => {
                bus.internal_cycle();
                let byte = self.pop(bus);
                self.p = Status::from_stack_byte(byte);
                let lo = self.pop(bus);
                let hi = self.pop(bus);
                self.pc = u16::from_le_bytes([lo, hi]);
            }
            Mnemonic::Brk => {
                // The byte after BRK is skipped; its fetch was the implied
                // dummy read.
                self.pc = self.pc.wrapping_add(1);
                self.push(bus, (self.pc >> 8) as u8);
                self.push(bus, self.pc as u8);
                self.push(bus, (self.p | Status::BREAK | Status::UNUSED).bits());
                self.p.insert(Status::INTERRUPT);
                let lo = bus.read(cpu_mem::IRQ_VECTOR);
                let hi = bus.read(cpu_mem::IRQ_VECTOR + 1);
                self.pc = u16::from_le_bytes([lo, hi]);
            }

            // Branches --------------------------------------------------
            Mnemonic::Bcc => self.branch(bus, !self.p.contains(Status::CARRY), operand),
            Mnemonic::Bcs => self.branch(bus, self.p.contains(Status::CARRY), operand),
            Mnemonic::Bne => self.branch(bus, !self.p.contains(Status::ZERO), operand),
            Mnemonic::Beq => self.branch(bus, self.p.contains(Status::ZERO), operand),
            Mnemonic::Bpl => self.branch(bus, !self.p.contains(Status::NEGATIVE), operand),
            Mnemonic::Bmi => self.branch(bus, self.p.contains(Status::NEGATIVE), operand),
            Mnemonic::Bvc => self.branch(bus, !self.p.contains(Status::OVERFLOW), operand),
            Mnemonic::Bvs => self.branch(bus, self.p.contains(Status::OVERFLOW), operand),

            // Flags -----------------------------------------------------
            Mnemonic::Clc => self.p.remove(Status::CARRY),
            Mnemonic::Cld => self.p.remove(Status::DECIMAL),
            Mnemonic::Cli => self.p.remove(Status::INTERRUPT),
            Mnemonic::Clv => self.p.remove(Status::OVERFLOW),
            Mnemonic::Sec => self.p.insert(Status::CARRY),
            Mnemonic::Sed => self.p.insert(Status::DECIMAL),
            Mnemonic::Sei => self.p.insert(Status::INTERRUPT),

            // No-ops and stubs ------------------------------------------
            Mnemonic::Nop => {
                // Memory-form NOPs still perform their operand read.
                if let Operand::Address(addr) = operand {
                    bus.read(addr);
                }
            }
            Mnemonic::Jam => {}
            // Rarely-used undocumented opcodes execute as operand-consuming
            // no-ops; the read keeps their bus traffic (and thus timing)
            // aligned with the documented counts.
            Mnemonic::Anc
            | Mnemonic::Arr
            | Mnemonic::Asr
            | Mnemonic::Las
            | Mnemonic::Sbx
            | Mnemonic::Sha
            | Mnemonic::Shs
            | Mnemonic::Shx
            | Mnemonic::Shy
            | Mnemonic::Xaa => {
                if let Operand::Address(addr) = operand {
                    bus.read(addr);
                }
            }
        }
    }

    /// Read-modify-write access pattern: read, write back the unmodified
    /// value, then write the result. Accumulator forms skip the bus.
    fn rmw(
        &mut self,
        bus: &mut CpuBus,
        operand: Operand,
        f: impl FnOnce(&mut Self, u8) -> u8,
    ) -> u8 {
        match operand {
            Operand::Accumulator => {
                let result = f(self, self.a);
                self.a = result;
                result
            }
            Operand::Address(addr) => {
                let value = bus.read(addr);
                bus.write(addr, value);
                let result = f(self, value);
                bus.write(addr, result);
                result
            }
            _ => 0,
        }
    }

    fn asl(&mut self, value: u8) -> u8 {
        self.p.set(Status::CARRY, value & 0x80 != 0);
        let result = value << 1;
        self.p.set_zn(result);
        result
    }

    fn lsr(&mut self, value: u8) -> u8 {
        self.p.set(Status::CARRY, value & 0x01 != 0);
        let result = value >> 1;
        self.p.set_zn(result);
        result
    }

    fn rol(&mut self, value: u8) -> u8 {
        let carry_in = self.p.contains(Status::CARRY) as u8;
        self.p.set(Status::CARRY, value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.p.set_zn(result);
        result
    }

    fn ror(&mut self, value: u8) -> u8 {
        let carry_in = (self.p.contains(Status::CARRY) as u8) << 7;
        self.p.set(Status::CARRY, value & 0x01 != 0);
        let result = (value >> 1) | carry_in;
        self.p.set_zn(result);
        result
    }

    fn adc(&mut self, value: u8) {
        let carry = self.p.contains(Status::CARRY) as u16;
        let sum = u16::from(self.a) + u16::from(value) + carry;
        let result = sum as u8;
        self.p.set(Status::CARRY, sum > 0xFF);
        self.p
            .set(Status::OVERFLOW, (!(self.a ^ value) & (self.a ^ result)) & 0x80 != 0);
        self.a = result;
        self.p.set_zn(result);
    }

    fn compare(&mut self, register: u8, value: u8) {
        let result = register.wrapping_sub(value);
        self.p.set(Status::CARRY, register >= value);
        self.p.set_zn(result);
    }

    /// Taken branches re-read the next instruction byte; crossing a page
    /// costs one more cycle to fix the PC high byte.
    fn branch(&mut self, bus: &mut CpuBus, condition: bool, operand: Operand) {
        if !condition {
            return;
        }
        let target = operand.address();
        bus.read(self.pc);
        if target & 0xFF00 != self.pc & 0xFF00 {
            bus.internal_cycle();
        }
        self.pc = target;
    }
}
