//! Data movement handlers: the MOV family and LEA.
//!
//! None of these touch EFLAGS.

use crate::emulator::Emulator;
use crate::error::{EmuError, Result};
use crate::registers::Gpr;

/// MOV r8, imm8 (0xB0+r).
pub fn mov_r8_imm8(emu: &mut Emulator) -> Result<()> {
    let reg = emu.code_u8(0) - 0xB0;
    let imm8 = emu.code_u8(1);
    emu.regs.write_gpr8(reg, imm8);
    emu.regs.eip = emu.regs.eip.wrapping_add(2);
    Ok(())
}

/// MOV r32, imm32 (0xB8+r).
pub fn mov_r32_imm32(emu: &mut Emulator) -> Result<()> {
    let reg = emu.code_u8(0) - 0xB8;
    let imm32 = emu.code_u32(1);
    emu.regs.write_gpr32(reg, imm32);
    emu.regs.eip = emu.regs.eip.wrapping_add(5);
    Ok(())
}

/// MOV r/m8, r8 (0x88).
pub fn mov_rm8_r8(emu: &mut Emulator) -> Result<()> {
    emu.regs.eip = emu.regs.eip.wrapping_add(1);
    let modrm = emu.parse_modrm();
    let r8 = emu.get_r8(&modrm);
    emu.set_rm8(&modrm, r8);
    Ok(())
}

/// MOV r/m32, r32 (0x89).
pub fn mov_rm32_r32(emu: &mut Emulator) -> Result<()> {
    emu.regs.eip = emu.regs.eip.wrapping_add(1);
    let modrm = emu.parse_modrm();
    let r32 = emu.get_r32(&modrm);
    emu.set_rm32(&modrm, r32);
    Ok(())
}

/// MOV r8, r/m8 (0x8A).
pub fn mov_r8_rm8(emu: &mut Emulator) -> Result<()> {
    emu.regs.eip = emu.regs.eip.wrapping_add(1);
    let modrm = emu.parse_modrm();
    let rm8 = emu.get_rm8(&modrm);
    emu.set_r8(&modrm, rm8);
    Ok(())
}

/// MOV r32, r/m32 (0x8B).
pub fn mov_r32_rm32(emu: &mut Emulator) -> Result<()> {
    emu.regs.eip = emu.regs.eip.wrapping_add(1);
    let modrm = emu.parse_modrm();
    let rm32 = emu.get_rm32(&modrm);
    emu.set_r32(&modrm, rm32);
    Ok(())
}

/// MOV r/m32, imm32 (0xC7): the immediate follows the ModR/M byte and
/// any displacement.
pub fn mov_rm32_imm32(emu: &mut Emulator) -> Result<()> {
    emu.regs.eip = emu.regs.eip.wrapping_add(1);
    let modrm = emu.parse_modrm();
    let value = emu.code_u32(0);
    emu.regs.eip = emu.regs.eip.wrapping_add(4);
    emu.set_rm32(&modrm, value);
    Ok(())
}

/// LEA r32, m (0x8D): store the effective address itself; no memory read.
pub fn lea_r32_m(emu: &mut Emulator) -> Result<()> {
    let fault_eip = emu.regs.eip;
    emu.regs.eip = emu.regs.eip.wrapping_add(1);
    let modrm = emu.parse_modrm();
    if modrm.md == 3 {
        // LEA with a register source has no address to take.
        return Err(EmuError::UndefinedOpcode {
            opcode: 0x8D,
            eip: fault_eip,
        });
    }
    let address = emu.effective_address(&modrm);
    emu.set_r32(&modrm, address);
    Ok(())
}

/// MOV EAX, moffs32 (0xA1): load EAX from an absolute address.
pub fn mov_eax_moffs32(emu: &mut Emulator) -> Result<()> {
    let address = emu.code_u32(1);
    let value = emu.memory.read_u32(address);
    emu.regs.write_gpr32(Gpr::Eax as u8, value);
    emu.regs.eip = emu.regs.eip.wrapping_add(5);
    Ok(())
}

/// MOV moffs32, EAX (0xA3): store EAX to an absolute address.
pub fn mov_moffs32_eax(emu: &mut Emulator) -> Result<()> {
    let address = emu.code_u32(1);
    let value = emu.regs.read_gpr32(Gpr::Eax as u8);
    emu.memory.write_u32(address, value);
    emu.regs.eip = emu.regs.eip.wrapping_add(5);
    Ok(())
}
