//! Functional CPU checks: reset state, flag behavior, and the documented
//! 6502 quirks.

mod common;

use common::{console_with_program, ines_image};
use ferricom_core::Console;

#[test]
fn power_on_state_matches_the_2a03() {
    let image = ines_image(0, 2, |prg| {
        prg[0x7FFC] = 0x00;
        prg[0x7FFD] = 0xC0;
    });
    let console = Console::new(&image).expect("load");
    let cpu = console.cpu_state();
    assert_eq!(cpu.pc, 0xC000);
    assert_eq!(cpu.a, 0);
    assert_eq!(cpu.x, 0);
    assert_eq!(cpu.y, 0);
    assert_eq!(cpu.sp, 0xFD);
    assert_eq!(cpu.p, 0x24);
}

#[test]
fn ram_mirrors_read_and_write() {
    let mut console = console_with_program(&[
        0xA9, 0xAB, // LDA #$AB
        0x8D, 0x05, 0x00, // STA $0005
        0xA9, 0xCD, // LDA #$CD
        0x8D, 0x10, 0x18, // STA $1810 (third mirror)
    ]);
    for _ in 0..4 {
        console.step_instruction();
    }
    assert_eq!(console.peek(0x0005), 0xAB);
    assert_eq!(console.peek(0x0805), 0xAB);
    assert_eq!(console.peek(0x1005), 0xAB);
    assert_eq!(console.peek(0x1805), 0xAB);
    assert_eq!(console.peek(0x0010), 0xCD);
}

#[test]
fn jmp_indirect_wraps_within_the_page() {
    let mut console = console_with_program(&[
        0xA9, 0x34, // LDA #$34
        0x8D, 0xFF, 0x02, // STA $02FF (pointer low)
        0xA9, 0x12, // LDA #$12
        0x8D, 0x00, 0x02, // STA $0200 (wrapped pointer high)
        0xA9, 0x56, // LDA #$56
        0x8D, 0x00, 0x03, // STA $0300 (the address a correct fetch would use)
        0x6C, 0xFF, 0x02, // JMP ($02FF)
    ]);
    for _ in 0..7 {
        console.step_instruction();
    }
    assert_eq!(console.cpu_state().pc, 0x1234);
}

#[test]
fn zero_page_pointer_wraps() {
    let mut console = console_with_program(&[
        0xA9, 0x20, // LDA #$20
        0x85, 0xFF, // STA $FF (pointer low)
        0xA9, 0x03, // LDA #$03
        0x85, 0x00, // STA $00 (pointer high, wrapped)
        0xA9, 0x77, // LDA #$77
        0x8D, 0x20, 0x03, // STA $0320
        0xA9, 0x00, // LDA #$00
        0xA0, 0x00, // LDY #$00
        0xB1, 0xFF, // LDA ($FF),Y
        0x85, 0x10, // STA $10
    ]);
    for _ in 0..10 {
        console.step_instruction();
    }
    assert_eq!(console.peek(0x0010), 0x77);
}

#[test]
fn adc_sets_carry_and_overflow() {
    let mut console = console_with_program(&[
        0x18, // CLC
        0xA9, 0x50, // LDA #$50
        0x69, 0x50, // ADC #$50 -> $A0, V set, C clear
        0x85, 0x00, // STA $00
        0x08, // PHP
        0x18, // CLC
        0xA9, 0xFF, // LDA #$FF
        0x69, 0x01, // ADC #$01 -> $00, C set, Z set
        0x08, // PHP
    ]);
    for _ in 0..5 {
        console.step_instruction();
    }
    let p = console.cpu_state().p;
    assert_eq!(p & 0x40, 0x40, "overflow set");
    assert_eq!(p & 0x01, 0x00, "carry clear");
    assert_eq!(p & 0x80, 0x80, "negative set");
    for _ in 0..4 {
        console.step_instruction();
    }
    let p = console.cpu_state().p;
    assert_eq!(p & 0x01, 0x01, "carry set");
    assert_eq!(p & 0x02, 0x02, "zero set");
    assert_eq!(console.peek(0x0000), 0xA0);
}

#[test]
fn sbc_is_adc_of_the_complement() {
    let mut console = console_with_program(&[
        0x38, // SEC
        0xA9, 0x50, // LDA #$50
        0xE9, 0x10, // SBC #$10 -> $40, C set (no borrow)
        0x85, 0x00, // STA $00
    ]);
    for _ in 0..4 {
        console.step_instruction();
    }
    assert_eq!(console.peek(0x0000), 0x40);
    assert_eq!(console.cpu_state().p & 0x01, 0x01);
}

#[test]
fn brk_pushes_b_and_vectors_to_irq_handler() {
    // IRQ vector points at $FFF0 (RTI); BRK skips its padding byte.
    let mut console = console_with_program(&[
        0x00, 0xFF, // BRK + padding
        0xA9, 0x99, // LDA #$99 (resumed here after RTI)
        0x85, 0x00, // STA $00
    ]);
    console.step_instruction(); // BRK
    assert_eq!(console.cpu_state().pc, 0xFFF0);
    // The pushed status byte has B and bit 5 set.
    let sp = console.cpu_state().sp;
    let pushed_p = console.peek(0x0100 | u16::from(sp.wrapping_add(1)));
    assert_eq!(pushed_p & 0x30, 0x30);
    console.step_instruction(); // RTI
    console.step_instruction(); // LDA
    console.step_instruction(); // STA
    assert_eq!(console.peek(0x0000), 0x99);
}

#[test]
fn lax_and_sax_pair_up() {
    let mut console = console_with_program(&[
        0xA9, 0xF0, // LDA #$F0
        0x85, 0x20, // STA $20
        0xA7, 0x20, // LAX $20
        0xA9, 0x3C, // LDA #$3C
        0x87, 0x21, // SAX $21 -> A & X = $3C & $F0 = $30
    ]);
    for _ in 0..5 {
        console.step_instruction();
    }
    assert_eq!(console.cpu_state().x, 0xF0);
    assert_eq!(console.peek(0x0021), 0x30);
}

#[test]
fn dcp_decrements_then_compares() {
    let mut console = console_with_program(&[
        0xA9, 0x41, // LDA #$41
        0x85, 0x20, // STA $20
        0xA9, 0x40, // LDA #$40
        0xC7, 0x20, // DCP $20 -> memory $40, compare equal
    ]);
    for _ in 0..4 {
        console.step_instruction();
    }
    assert_eq!(console.peek(0x0020), 0x40);
    let p = console.cpu_state().p;
    assert_eq!(p & 0x02, 0x02, "zero set by the comparison");
    assert_eq!(p & 0x01, 0x01, "carry set by the comparison");
}
