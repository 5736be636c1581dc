//! Nametable mirroring: collapses the four logical nametables at
//! `$2000-$2FFF` into the console's 2 KiB of internal VRAM.

use crate::cartridge::header::Mirroring;

/// Resolves a PPU nametable address (`$2000-$3EFF`, mirrors included) to an
/// index into the 2 KiB VRAM block under the given mirroring arrangement.
pub fn mirror(addr: u16, mirroring: Mirroring) -> usize {
    let addr = addr & 0x2FFF;
    let folded = match mirroring {
        // NT0/NT2 share the first KiB, NT1/NT3 the second.
        Mirroring::Vertical => addr & !0x0800,
        // NT0/NT1 share the first KiB, NT2/NT3 the second.
        Mirroring::Horizontal => {
            if addr <= 0x27FF {
                addr & !0x0400
            } else {
                (addr & !0x0C00) | 0x0400
            }
        }
        Mirroring::SingleScreenLower => addr & !0x0C00,
        Mirroring::SingleScreenUpper => (addr & !0x0C00) | 0x0400,
    };
    (folded & 0x07FF) as usize
}
