//! System-level handlers: port I/O, software interrupts, interrupt return.

use crate::emulator::Emulator;
use crate::error::Result;
use crate::io::IoDispatch;
use crate::registers::Gpr;

/// IN AL, DX (0xEC): read a byte from the port in DX.
pub fn in_al_dx(emu: &mut Emulator, io: &mut IoDispatch) -> Result<()> {
    let port = (emu.regs.read_gpr32(Gpr::Edx as u8) & 0xFFFF) as u16;
    let value = io.port_in8(port);
    emu.regs.write_gpr8(0, value); // AL
    emu.regs.eip = emu.regs.eip.wrapping_add(1);
    Ok(())
}

/// OUT DX, AL (0xEE): write AL to the port in DX.
pub fn out_dx_al(emu: &mut Emulator, io: &mut IoDispatch) -> Result<()> {
    let port = (emu.regs.read_gpr32(Gpr::Edx as u8) & 0xFFFF) as u16;
    let value = emu.regs.read_gpr8(0); // AL
    io.port_out8(port, value);
    emu.regs.eip = emu.regs.eip.wrapping_add(1);
    Ok(())
}

/// INT imm8 (0xCD): record the vector for the host loop and move on.
///
/// Servicing happens outside the engine; the host observes the pending
/// vector after the instruction retires and clears it before resuming.
pub fn int_imm8(emu: &mut Emulator) -> Result<()> {
    emu.pending_int = Some(emu.code_u8(1));
    emu.regs.eip = emu.regs.eip.wrapping_add(2);
    Ok(())
}

/// IRETD (0xCF): pop `eip`, then the whole EFLAGS image.
pub fn iretd(emu: &mut Emulator) -> Result<()> {
    emu.regs.eip = emu.pop32();
    emu.regs.eflags = emu.pop32();
    Ok(())
}
