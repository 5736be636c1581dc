//! Opcode table entry: a semantic operation plus its addressing mode.

use crate::cpu::addressing::Addressing;

/// Semantic operation selected by an opcode. Undocumented opcodes with
/// commonly-relied-upon behavior (LAX/SAX/DCP/ISB/SLO/RLA/SRE/RRA and the
/// NOP/SBC variants) are implemented; the rest execute as operand-consuming
/// stubs, and JAM opcodes as two-cycle no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    // Loads and stores
    Lda, Ldx, Ldy, Sta, Stx, Sty, Lax, Sax,
    // Transfers
    Tax, Tay, Tsx, Txa, Txs, Tya,
    // Stack
    Pha, Php, Pla, Plp,
    // Shifts and rotates
    Asl, Lsr, Rol, Ror,
    // Logic
    And, Bit, Eor, Ora,
    // Arithmetic
    Adc, Sbc, Cmp, Cpx, Cpy,
    // Read-modify-write combos (undocumented)
    Dcp, Isb, Rla, Rra, Slo, Sre,
    // Increments and decrements
    Dec, Dex, Dey, Inc, Inx, Iny,
    // Control flow
    Brk, Jmp, Jsr, Rti, Rts,
    // Branches
    Bcc, Bcs, Beq, Bmi, Bne, Bpl, Bvc, Bvs,
    // Flags
    Clc, Cld, Cli, Clv, Sec, Sed, Sei,
    // No-ops, halts, and unemulated undocumented opcodes
    Nop, Jam,
    Anc, Arr, Asr, Las, Sbx, Sha, Shs, Shx, Shy, Xaa,
}

impl Mnemonic {
    /// Write-class opcodes never save the page-cross cycle: the dummy read
    /// at the partially-carried address always happens in the indexed
    /// addressing modes.
    pub fn always_dummy_reads(self) -> bool {
        matches!(
            self,
            Mnemonic::Sta
                | Mnemonic::Shx
                | Mnemonic::Shy
                | Mnemonic::Sha
                | Mnemonic::Shs
                | Mnemonic::Asl
                | Mnemonic::Dcp
                | Mnemonic::Dec
                | Mnemonic::Inc
                | Mnemonic::Isb
                | Mnemonic::Lsr
                | Mnemonic::Rla
                | Mnemonic::Rol
                | Mnemonic::Ror
                | Mnemonic::Rra
                | Mnemonic::Slo
                | Mnemonic::Sre
        )
    }
}

/// One entry of the 256-slot dispatch table.
#[derive(Debug, Clone, Copy)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub mode: Addressing,
    /// Documented base cycles, before page-cross and branch penalties.
    /// The executor derives its timing from bus accesses; this field is the
    /// reference the timing tests check against.
    pub cycles: u8,
}
