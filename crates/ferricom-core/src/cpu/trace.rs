//! Per-instruction trace lines in the conformance format:
//!
//! ```text
//! C000  4C F4 C5  JMP $C5F4                   A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7
//! ```
//!
//! The program counter prints as four hex digits, the disassembly (raw bytes
//! plus mnemonic and operand) is left-justified to 28 columns, and the tail
//! carries the register file, the PPU beam position, and the cycle counter at
//! fetch time.

use std::fmt::Write;

use crate::cpu::CpuSnapshot;
use crate::cpu::addressing::Addressing;
use crate::cpu::lookup::OPCODE_TABLE;

/// Width of the disassembly column.
const DISASM_WIDTH: usize = 28;

/// Renders one trace line. `peek` must read CPU memory without side effects.
pub(crate) fn line(
    snapshot: CpuSnapshot,
    peek: &mut dyn FnMut(u16) -> u8,
    scanline: u16,
    dot: u16,
    cycles: u64,
) -> String {
    let pc = snapshot.pc;
    let opcode = peek(pc);
    let entry = OPCODE_TABLE[opcode as usize];
    let len = entry.addressing.instruction_len();

    let mut bytes = String::new();
    for offset in 0..len {
        let _ = write!(bytes, "{:02X} ", peek(pc.wrapping_add(offset)));
    }

    let operand_lo = peek(pc.wrapping_add(1));
    let operand_hi = peek(pc.wrapping_add(2));
    let operand_word = u16::from_le_bytes([operand_lo, operand_hi]);

    let operand = match entry.addressing {
        Addressing::Implied => String::new(),
        Addressing::Accumulator => "A".into(),
        Addressing::Immediate => format!("#${operand_lo:02X}"),
        Addressing::ZeroPage => format!("${operand_lo:02X}"),
        Addressing::ZeroPageX => format!("${operand_lo:02X},X"),
        Addressing::ZeroPageY => format!("${operand_lo:02X},Y"),
        Addressing::Absolute => format!("${operand_word:04X}"),
        Addressing::AbsoluteX => format!("${operand_word:04X},X"),
        Addressing::AbsoluteY => format!("${operand_word:04X},Y"),
        Addressing::Indirect => format!("(${operand_word:04X})"),
        Addressing::IndirectX => format!("(${operand_lo:02X},X)"),
        Addressing::IndirectY => format!("(${operand_lo:02X}),Y"),
        Addressing::Relative => {
            let target = pc
                .wrapping_add(2)
                .wrapping_add(operand_lo as i8 as u16);
            format!("${target:04X}")
        }
    };

    let asm = if operand.is_empty() {
        format!("{bytes:<9} {}", entry.mnemonic)
    } else {
        format!("{bytes:<9} {} {operand}", entry.mnemonic)
    };

    format!(
        "{pc:04X}  {asm:<DISASM_WIDTH$}A:{a:02X} X:{x:02X} Y:{y:02X} P:{p:02X} SP:{s:02X} PPU:{scanline:3},{dot:3} CYC:{cycles}",
        a = snapshot.a,
        x = snapshot.x,
        y = snapshot.y,
        p = snapshot.p,
        s = snapshot.s,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_the_conformance_layout() {
        let snapshot = CpuSnapshot {
            pc: 0xC000,
            a: 0,
            x: 0,
            y: 0,
            s: 0xFD,
            p: 0x24,
        };
        let memory = [0x4C, 0xF4, 0xC5];
        let mut peek = |addr: u16| memory[(addr - 0xC000) as usize % 3];

        let line = line(snapshot, &mut peek, 0, 21, 7);
        assert!(line.starts_with("C000  4C F4 C5  JMP $C5F4"));
        assert!(line.ends_with("A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7"));
        // PC (4) + two spaces + 28-column disassembly field precede the tail.
        assert_eq!(line.find("A:00"), Some(4 + 2 + DISASM_WIDTH));
    }

    #[test]
    fn branch_targets_are_absolute() {
        let snapshot = CpuSnapshot {
            pc: 0x80FE,
            a: 0,
            x: 0,
            y: 0,
            s: 0xFD,
            p: 0x26,
        };
        let memory = [0xF0, 0x00];
        let mut peek = |addr: u16| memory[(addr as usize - 0x80FE) % 2];

        let line = line(snapshot, &mut peek, 0, 0, 0);
        assert!(line.contains("BEQ $8100"));
    }
}
