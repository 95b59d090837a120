//! Software-interrupt services.
//!
//! The machine run loop hands pending `INT` vectors here after the
//! instruction retires. Only the classic video teletype service is
//! provided: `INT 10h` with AH=0Eh appends AL to the machine's teletype
//! sink. Unknown vectors and functions are logged and ignored so a guest
//! probing for BIOS features does not take the machine down.

use log::warn;

use crate::emulator::Emulator;

/// AH index in the 8-bit register encoding.
const AH: u8 = 4;
/// AL index in the 8-bit register encoding.
const AL: u8 = 0;

/// Service a software interrupt, appending teletype output to `sink`.
pub fn service_interrupt(emu: &mut Emulator, vector: u8, sink: &mut Vec<u8>) {
    match vector {
        0x10 => video_service(emu, sink),
        _ => warn!(
            "unserviced interrupt 0x{:02X} at eip=0x{:08X}",
            vector, emu.regs.eip
        ),
    }
}

/// INT 10h video services.
fn video_service(emu: &mut Emulator, sink: &mut Vec<u8>) {
    match emu.regs.read_gpr8(AH) {
        // Teletype output: write AL at the cursor
        0x0E => sink.push(emu.regs.read_gpr8(AL)),
        ah => warn!("unsupported INT 10h function AH=0x{:02X}", ah),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teletype_appends_al() {
        let mut emu = Emulator::new(0x1000, 0x100, 0x800);
        emu.regs.write_gpr8(AH, 0x0E);
        emu.regs.write_gpr8(AL, b'A');

        let mut sink = Vec::new();
        service_interrupt(&mut emu, 0x10, &mut sink);
        assert_eq!(sink, b"A");
    }

    #[test]
    fn unknown_vector_is_ignored() {
        let mut emu = Emulator::new(0x1000, 0x100, 0x800);
        let mut sink = Vec::new();
        service_interrupt(&mut emu, 0x21, &mut sink);
        assert!(sink.is_empty());
    }
}
