//! The 256-entry opcode dispatch table.
//!
//! Each slot names the semantic operation, the addressing mode, and the
//! documented base cycle count (page-cross and taken-branch penalties come
//! on top). Undocumented opcodes fill their official slots.

use crate::cpu::addressing::Addressing as A;
use crate::cpu::instruction::{Instruction, Mnemonic as M};

// Short aliases keep the table readable at 8 entries per line.
const IMP: A = A::Implied;
const ACC: A = A::Accumulator;
const IMM: A = A::Immediate;
const REL: A = A::Relative;
const ZPG: A = A::ZeroPage;
const ZPX: A = A::ZeroPageX;
const ZPY: A = A::ZeroPageY;
const ABS: A = A::Absolute;
const ABX: A = A::AbsoluteX;
const ABY: A = A::AbsoluteY;
const IND: A = A::Indirect;
const IZX: A = A::IndirectX;
const IZY: A = A::IndirectY;

macro_rules! op {
    ($mnemonic:ident, $mode:ident, $cycles:literal) => {
        Instruction {
            mnemonic: M::$mnemonic,
            mode: $mode,
            cycles: $cycles,
        }
    };
}

#[rustfmt::skip]
pub static LOOKUP_TABLE: [Instruction; 256] = [
    // 0x00
    op!(Brk, IMP, 7), op!(Ora, IZX, 6), op!(Jam, IMP, 2), op!(Slo, IZX, 8),
    op!(Nop, ZPG, 3), op!(Ora, ZPG, 3), op!(Asl, ZPG, 5), op!(Slo, ZPG, 5),
    op!(Php, IMP, 3), op!(Ora, IMM, 2), op!(Asl, ACC, 2), op!(Anc, IMM, 2),
    op!(Nop, ABS, 4), op!(Ora, ABS, 4), op!(Asl, ABS, 6), op!(Slo, ABS, 6),
    // 0x10
    op!(Bpl, REL, 2), op!(Ora, IZY, 5), op!(Jam, IMP, 2), op!(Slo, IZY, 8),
    op!(Nop, ZPX, 4), op!(Ora, ZPX, 4), op!(Asl, ZPX, 6), op!(Slo, ZPX, 6),
    op!(Clc, IMP, 2), op!(Ora, ABY, 4), op!(Nop, IMP, 2), op!(Slo, ABY, 7),
    op!(Nop, ABX, 4), op!(Ora, ABX, 4), op!(Asl, ABX, 7), op!(Slo, ABX, 7),
    // 0x20
    op!(Jsr, ABS, 6), op!(And, IZX, 6), op!(Jam, IMP, 2), op!(Rla, IZX, 8),
    op!(Bit, ZPG, 3), op!(And, ZPG, 3), op!(Rol, ZPG, 5), op!(Rla, ZPG, 5),
    op!(Plp, IMP, 4), op!(And, IMM, 2), op!(Rol, ACC, 2), op!(Anc, IMM, 2),
    op!(Bit, ABS, 4), op!(And, ABS, 4), op!(Rol, ABS, 6), op!(Rla, ABS, 6),
    // 0x30
    op!(Bmi, REL, 2), op!(And, IZY, 5), op!(Jam, IMP, 2), op!(Rla, IZY, 8),
    op!(Nop, ZPX, 4), op!(And, ZPX, 4), op!(Rol, ZPX, 6), op!(Rla, ZPX, 6),
    op!(Sec, IMP, 2), op!(And, ABY, 4), op!(Nop, IMP, 2), op!(Rla, ABY, 7),
    op!(Nop, ABX, 4), op!(And, ABX, 4), op!(Rol, ABX, 7), op!(Rla, ABX, 7),
    // 0x40
    op!(Rti, IMP, 6), op!(Eor, IZX, 6), op!(Jam, IMP, 2), op!(Sre, IZX, 8),
    op!(Nop, ZPG, 3), op!(Eor, ZPG, 3), op!(Lsr, ZPG, 5), op!(Sre, ZPG, 5),
    op!(Pha, IMP, 3), op!(Eor, IMM, 2), op!(Lsr, ACC, 2), op!(Asr, IMM, 2),
    op!(Jmp, ABS, 3), op!(Eor, ABS, 4), op!(Lsr, ABS, 6), op!(Sre, ABS, 6),
    // 0x50
    op!(Bvc, REL, 2), op!(Eor, IZY, 5), op!(Jam, IMP, 2), op!(Sre, IZY, 8),
    op!(Nop, ZPX, 4), op!(Eor, ZPX, 4), op!(Lsr, ZPX, 6), op!(Sre, ZPX, 6),
    op!(Cli, IMP, 2), op!(Eor, ABY, 4), op!(Nop, IMP, 2), op!(Sre, ABY, 7),
    op!(Nop, ABX, 4), op!(Eor, ABX, 4), op!(Lsr, ABX, 7), op!(Sre, ABX, 7),
    // 0x60
    op!(Rts, IMP, 6), op!(Adc, IZX, 6), op!(Jam, IMP, 2), op!(Rra, IZX, 8),
    op!(Nop, ZPG, 3), op!(Adc, ZPG, 3), op!(Ror, ZPG, 5), op!(Rra, ZPG, 5),
    op!(Pla, IMP, 4), op!(Adc, IMM, 2), op!(Ror, ACC, 2), op!(Arr, IMM, 2),
    op!(Jmp, IND, 5), op!(Adc, ABS, 4), op!(Ror, ABS, 6), op!(Rra, ABS, 6),
    // 0x70
    op!(Bvs, REL, 2), op!(Adc, IZY, 5), op!(Jam, IMP, 2), op!(Rra, IZY, 8),
    op!(Nop, ZPX, 4), op!(Adc, ZPX, 4), op!(Ror, ZPX, 6), op!(Rra, ZPX, 6),
    op!(Sei, IMP, 2), op!(Adc, ABY, 4), op!(Nop, IMP, 2), op!(Rra, ABY, 7),
    op!(Nop, ABX, 4), op!(Adc, ABX, 4), op!(Ror, ABX, 7), op!(Rra, ABX, 7),
    // 0x80
    op!(Nop, IMM, 2), op!(Sta, IZX, 6), op!(Nop, IMM, 2), op!(Sax, IZX, 6),
    op!(Sty, ZPG, 3), op!(Sta, ZPG, 3), op!(Stx, ZPG, 3), op!(Sax, ZPG, 3),
    op!(Dey, IMP, 2), op!(Nop, IMM, 2), op!(Txa, IMP, 2), op!(Xaa, IMM, 2),
    op!(Sty, ABS, 4), op!(Sta, ABS, 4), op!(Stx, ABS, 4), op!(Sax, ABS, 4),
    // 0x90
    op!(Bcc, REL, 2), op!(Sta, IZY, 6), op!(Jam, IMP, 2), op!(Sha, IZY, 6),
    op!(Sty, ZPX, 4), op!(Sta, ZPX, 4), op!(Stx, ZPY, 4), op!(Sax, ZPY, 4),
    op!(Tya, IMP, 2), op!(Sta, ABY, 5), op!(Txs, IMP, 2), op!(Shs, ABY, 5),
    op!(Shy, ABX, 5), op!(Sta, ABX, 5), op!(Shx, ABY, 5), op!(Sha, ABY, 5),
    // 0xA0
    op!(Ldy, IMM, 2), op!(Lda, IZX, 6), op!(Ldx, IMM, 2), op!(Lax, IZX, 6),
    op!(Ldy, ZPG, 3), op!(Lda, ZPG, 3), op!(Ldx, ZPG, 3), op!(Lax, ZPG, 3),
    op!(Tay, IMP, 2), op!(Lda, IMM, 2), op!(Tax, IMP, 2), op!(Lax, IMM, 2),
    op!(Ldy, ABS, 4), op!(Lda, ABS, 4), op!(Ldx, ABS, 4), op!(Lax, ABS, 4),
    // 0xB0
    op!(Bcs, REL, 2), op!(Lda, IZY, 5), op!(Jam, IMP, 2), op!(Lax, IZY, 5),
    op!(Ldy, ZPX, 4), op!(Lda, ZPX, 4), op!(Ldx, ZPY, 4), op!(Lax, ZPY, 4),
    op!(Clv, IMP, 2), op!(Lda, ABY, 4), op!(Tsx, IMP, 2), op!(Las, ABY, 4),
    op!(Ldy, ABX, 4), op!(Lda, ABX, 4), op!(Ldx, ABY, 4), op!(Lax, ABY, 4),
    // 0xC0
    op!(Cpy, IMM, 2), op!(Cmp, IZX, 6), op!(Nop, IMM, 2), op!(Dcp, IZX, 8),
    op!(Cpy, ZPG, 3), op!(Cmp, ZPG, 3), op!(Dec, ZPG, 5), op!(Dcp, ZPG, 5),
    op!(Iny, IMP, 2), op!(Cmp, IMM, 2), op!(Dex, IMP, 2), op!(Sbx, IMM, 2),
    op!(Cpy, ABS, 4), op!(Cmp, ABS, 4), op!(Dec, ABS, 6), op!(Dcp, ABS, 6),
    // 0xD0
    op!(Bne, REL, 2), op!(Cmp, IZY, 5), op!(Jam, IMP, 2), op!(Dcp, IZY, 8),
    op!(Nop, ZPX, 4), op!(Cmp, ZPX, 4), op!(Dec, ZPX, 6), op!(Dcp, ZPX, 6),
    op!(Cld, IMP, 2), op!(Cmp, ABY, 4), op!(Nop, IMP, 2), op!(Dcp, ABY, 7),
    op!(Nop, ABX, 4), op!(Cmp, ABX, 4), op!(Dec, ABX, 7), op!(Dcp, ABX, 7),
    // 0xE0
    op!(Cpx, IMM, 2), op!(Sbc, IZX, 6), op!(Nop, IMM, 2), op!(Isb, IZX, 8),
    op!(Cpx, ZPG, 3), op!(Sbc, ZPG, 3), op!(Inc, ZPG, 5), op!(Isb, ZPG, 5),
    op!(Inx, IMP, 2), op!(Sbc, IMM, 2), op!(Nop, IMP, 2), op!(Sbc, IMM, 2),
    op!(Cpx, ABS, 4), op!(Sbc, ABS, 4), op!(Inc, ABS, 6), op!(Isb, ABS, 6),
    // 0xF0
    op!(Beq, REL, 2), op!(Sbc, IZY, 5), op!(Jam, IMP, 2), op!(Isb, IZY, 8),
    op!(Nop, ZPX, 4), op!(Sbc, ZPX, 4), op!(Inc, ZPX, 6), op!(Isb, ZPX, 6),
    op!(Sed, IMP, 2), op!(Sbc, ABY, 4), op!(Nop, IMP, 2), op!(Isb, ABY, 7),
    op!(Nop, ABX, 4), op!(Sbc, ABX, 4), op!(Inc, ABX, 7), op!(Isb, ABX, 7),
];
