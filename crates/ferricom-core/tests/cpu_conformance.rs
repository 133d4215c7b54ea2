//! CPU-level conformance scenarios: reset state, the JMP (ind) page-wrap
//! bug, branch and page-cross cycle accounting, status invariants, and the
//! unknown-opcode halt.

mod common;

use anyhow::Result;
use common::{boot, set_reset_vector, write_code};
use ferricom_core::error::Error;

#[test]
fn reset_loads_the_vector_and_costs_seven_cycles() {
    let nes = boot(|prg| set_reset_vector(prg, 0x1234));

    let cpu = nes.cpu_snapshot();
    assert_eq!(cpu.pc, 0x1234);
    assert_eq!(cpu.s, 0xFD);
    assert_eq!(cpu.p, 0x24);
    assert_eq!(cpu.a, 0x00);
    assert_eq!(nes.cycles(), 7);
    // Three dots per cycle puts the beam at (0, 21) after the sequence.
    assert_eq!(nes.ppu_scanline(), 0);
    assert_eq!(nes.ppu_dot(), 21);
}

#[test]
fn jmp_indirect_wraps_within_the_pointer_page() -> Result<()> {
    let mut nes = boot(|prg| {
        set_reset_vector(prg, 0x8000);
        write_code(prg, 0x8000, &[0x6C, 0xFF, 0x02]); // JMP ($02FF)
    });
    nes.poke(0x02FF, 0x80); // target low
    nes.poke(0x0200, 0x40); // buggy high fetch ($0200, not $0300)
    nes.poke(0x0300, 0x50); // the byte a correct CPU would read

    let cycles = nes.step_instruction()?;
    assert_eq!(nes.cpu_snapshot().pc, 0x4080);
    assert_eq!(cycles, 5);
    Ok(())
}

#[test]
fn taken_branch_across_a_page_costs_four_cycles() -> Result<()> {
    let mut nes = boot(|prg| {
        set_reset_vector(prg, 0x8000);
        write_code(prg, 0x8000, &[0xA9, 0x00]); // LDA #$00 (sets Z)
        write_code(prg, 0x80FE, &[0xF0, 0x00]); // BEQ +0 -> $8100
    });

    nes.step_instruction()?;
    nes.set_pc(0x80FE);
    let cycles = nes.step_instruction()?;
    assert_eq!(nes.cpu_snapshot().pc, 0x8100);
    assert_eq!(cycles, 4);
    Ok(())
}

#[test]
fn branch_cycles_form_the_two_three_four_triple() -> Result<()> {
    let mut nes = boot(|prg| {
        set_reset_vector(prg, 0x8000);
        write_code(prg, 0x8000, &[0xA9, 0x01]); // LDA #$01 (clears Z)
        write_code(prg, 0x8002, &[0xF0, 0x10]); // BEQ, not taken
        write_code(prg, 0x8004, &[0xD0, 0x10]); // BNE, taken, same page
    });

    nes.step_instruction()?;
    assert_eq!(nes.step_instruction()?, 2, "branch not taken");
    assert_eq!(nes.step_instruction()?, 3, "branch taken, no cross");
    assert_eq!(nes.cpu_snapshot().pc, 0x8016);
    Ok(())
}

#[test]
fn page_cross_penalty_applies_to_reads_but_not_stores() -> Result<()> {
    let mut nes = boot(|prg| {
        set_reset_vector(prg, 0x8000);
        write_code(
            prg,
            0x8000,
            &[
                0xA2, 0x01, // LDX #$01
                0xBD, 0xFF, 0x02, // LDA $02FF,X (crosses into $0300)
                0xBD, 0x00, 0x02, // LDA $0200,X (no cross)
                0x9D, 0xFF, 0x02, // STA $02FF,X (store: no penalty)
                0xA0, 0x01, // LDY #$01
                0xB1, 0x10, // LDA ($10),Y (crosses)
            ],
        );
    });
    // ($10) -> $02FF, so +Y lands in the next page.
    nes.poke(0x0010, 0xFF);
    nes.poke(0x0011, 0x02);

    nes.step_instruction()?; // LDX
    assert_eq!(nes.step_instruction()?, 5, "LDA abs,X crossing");
    assert_eq!(nes.step_instruction()?, 4, "LDA abs,X same page");
    assert_eq!(nes.step_instruction()?, 5, "STA abs,X never pays");
    nes.step_instruction()?; // LDY
    assert_eq!(nes.step_instruction()?, 6, "LDA (zp),Y crossing");
    Ok(())
}

#[test]
fn unused_status_bit_reads_set_after_every_instruction() -> Result<()> {
    let mut nes = boot(|prg| {
        set_reset_vector(prg, 0x8000);
        write_code(
            prg,
            0x8000,
            &[
                0xA9, 0x00, // LDA #$00
                0x48, // PHA
                0x28, // PLP (pulls all-zero status)
                0xA9, 0xFF, // LDA #$FF
                0x48, // PHA
                0x28, // PLP (pulls all-ones status)
            ],
        );
    });

    for _ in 0..6 {
        nes.step_instruction()?;
        assert_eq!(nes.cpu_snapshot().p & 0x20, 0x20);
    }
    // The all-ones pull also drops the phantom B bit.
    assert_eq!(nes.cpu_snapshot().p & 0x10, 0);
    Ok(())
}

#[test]
fn php_pushes_b_and_u_set() -> Result<()> {
    let mut nes = boot(|prg| {
        set_reset_vector(prg, 0x8000);
        write_code(prg, 0x8000, &[0x08]); // PHP
    });

    nes.step_instruction()?;
    let pushed = nes.peek(0x01FD);
    assert_eq!(pushed & 0x30, 0x30, "PHP pushes B and U set");
    Ok(())
}

#[test]
fn unknown_opcode_halts_and_keeps_reporting() {
    let mut nes = boot(|prg| {
        set_reset_vector(prg, 0x8000);
        write_code(prg, 0x8000, &[0x02]); // jammed opcode
    });

    let err = nes.step_instruction().expect_err("must refuse to execute");
    assert!(matches!(
        err,
        Error::UnknownOpcode {
            pc: 0x8000,
            opcode: 0x02
        }
    ));
    assert_eq!(nes.halted(), Some((0x8000, 0x02)));

    // The halt is sticky until the host resets.
    assert!(nes.clock().is_err());
    nes.reset();
    assert_eq!(nes.halted(), None);
}

#[test]
fn unmapped_reads_return_the_address_high_byte() -> Result<()> {
    let mut nes = boot(|prg| {
        set_reset_vector(prg, 0x8000);
        write_code(prg, 0x8000, &[0xAD, 0x23, 0x51]); // LDA $5123 (open bus)
    });

    assert_eq!(nes.peek(0x5123), 0x51);
    nes.step_instruction()?;
    assert_eq!(nes.cpu_snapshot().a, 0x51);
    Ok(())
}

#[test]
fn unofficial_lax_and_sax_round_trip() -> Result<()> {
    let mut nes = boot(|prg| {
        set_reset_vector(prg, 0x8000);
        write_code(
            prg,
            0x8000,
            &[
                0xA7, 0x10, // LAX $10
                0x87, 0x11, // SAX $11
                0xE7, 0x12, // ISC $12
            ],
        );
    });
    nes.poke(0x0010, 0x5A);
    nes.poke(0x0012, 0x0F);

    nes.step_instruction()?;
    let cpu = nes.cpu_snapshot();
    assert_eq!(cpu.a, 0x5A);
    assert_eq!(cpu.x, 0x5A);

    nes.step_instruction()?;
    assert_eq!(nes.peek(0x0011), 0x5A);

    nes.step_instruction()?;
    assert_eq!(nes.peek(0x0012), 0x10, "ISC increments before subtracting");
    Ok(())
}
