//! Stack operation handlers: PUSH, POP, LEAVE.

use crate::emulator::Emulator;
use crate::error::Result;
use crate::registers::Gpr;

/// PUSH r32 (0x50+r).
pub fn push_r32(emu: &mut Emulator) -> Result<()> {
    let reg = emu.code_u8(0) - 0x50;
    let val = emu.regs.read_gpr32(reg);
    emu.push32(val);
    emu.regs.eip = emu.regs.eip.wrapping_add(1);
    Ok(())
}

/// POP r32 (0x58+r).
pub fn pop_r32(emu: &mut Emulator) -> Result<()> {
    let reg = emu.code_u8(0) - 0x58;
    let val = emu.pop32();
    emu.regs.write_gpr32(reg, val);
    emu.regs.eip = emu.regs.eip.wrapping_add(1);
    Ok(())
}

/// PUSH imm32 (0x68).
pub fn push_imm32(emu: &mut Emulator) -> Result<()> {
    let value = emu.code_u32(1);
    emu.push32(value);
    emu.regs.eip = emu.regs.eip.wrapping_add(5);
    Ok(())
}

/// PUSH imm8 (0x6A): the immediate is zero-extended.
pub fn push_imm8(emu: &mut Emulator) -> Result<()> {
    let value = emu.code_u8(1);
    emu.push32(value as u32);
    emu.regs.eip = emu.regs.eip.wrapping_add(2);
    Ok(())
}

/// LEAVE (0xC9): tear down the current stack frame.
pub fn leave(emu: &mut Emulator) -> Result<()> {
    let ebp = emu.regs.read_gpr32(Gpr::Ebp as u8);
    emu.regs.set_esp(ebp);
    let saved = emu.pop32();
    emu.regs.write_gpr32(Gpr::Ebp as u8, saved);
    emu.regs.eip = emu.regs.eip.wrapping_add(1);
    Ok(())
}
