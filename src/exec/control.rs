//! Control flow handlers: JMP, Jcc, CALL, RET.
//!
//! Relative targets are computed from the address of the *next*
//! instruction, i.e. `eip + length + displacement`.

use crate::emulator::Emulator;
use crate::error::{EmuError, Result};
use crate::flags;

/// JMP rel8 (0xEB): short unconditional jump.
pub fn jmp_rel8(emu: &mut Emulator) -> Result<()> {
    let diff = emu.code_i8(1) as i32;
    emu.regs.eip = emu.regs.eip.wrapping_add(2).wrapping_add(diff as u32);
    Ok(())
}

/// JMP rel32 (0xE9): near unconditional jump.
pub fn jmp_rel32(emu: &mut Emulator) -> Result<()> {
    let diff = emu.code_i32(1);
    emu.regs.eip = emu.regs.eip.wrapping_add(5).wrapping_add(diff as u32);
    Ok(())
}

/// Jcc rel8 (0x70..0x7F): two-byte conditional short jump.
///
/// The condition is the low nibble of the opcode; the parity conditions
/// (0x7A/0x7B) are rejected because PF is not tracked.
pub fn jcc_rel8(emu: &mut Emulator) -> Result<()> {
    let opcode = emu.code_u8(0);
    let taken = flags::eval_cond(opcode & 0x0F, emu.regs.eflags).ok_or(
        EmuError::UndefinedOpcode {
            opcode,
            eip: emu.regs.eip,
        },
    )?;
    let diff = if taken { emu.code_i8(1) as i32 } else { 0 };
    emu.regs.eip = emu.regs.eip.wrapping_add(2).wrapping_add(diff as u32);
    Ok(())
}

/// CALL rel32 (0xE8): push the return address, then jump.
pub fn call_rel32(emu: &mut Emulator) -> Result<()> {
    let diff = emu.code_i32(1);
    let next = emu.regs.eip.wrapping_add(5);
    emu.push32(next);
    emu.regs.eip = next.wrapping_add(diff as u32);
    Ok(())
}

/// RET (0xC3): pop the return address into `eip`.
pub fn ret(emu: &mut Emulator) -> Result<()> {
    emu.regs.eip = emu.pop32();
    Ok(())
}
