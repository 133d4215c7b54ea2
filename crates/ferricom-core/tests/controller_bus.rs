//! Controller protocol exercised through `$4016` by a real program.

mod common;

use anyhow::Result;
use common::{boot, set_reset_vector, write_code};
use ferricom_core::Buttons;

#[test]
fn program_reads_buttons_in_serial_order() -> Result<()> {
    let mut nes = boot(|prg| {
        set_reset_vector(prg, 0x8000);
        write_code(
            prg,
            0x8000,
            &[
                0xA9, 0x01, 0x8D, 0x16, 0x40, // LDA #$01, STA $4016 (strobe)
                0xA9, 0x00, 0x8D, 0x16, 0x40, // LDA #$00, STA $4016 (latch)
                0xAD, 0x16, 0x40, 0x29, 0x01, 0x85, 0x00, // read bit A -> $00
                0xAD, 0x16, 0x40, 0x29, 0x01, 0x85, 0x01, // read bit B -> $01
                0xAD, 0x16, 0x40, 0x29, 0x01, 0x85, 0x02, // read Select -> $02
            ],
        );
    });
    nes.set_buttons(Buttons::A | Buttons::SELECT);

    for _ in 0..13 {
        nes.step_instruction()?;
    }
    assert_eq!(nes.peek(0x0000), 1, "A pressed");
    assert_eq!(nes.peek(0x0001), 0, "B released");
    assert_eq!(nes.peek(0x0002), 1, "Select pressed");
    Ok(())
}
