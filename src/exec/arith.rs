//! Arithmetic and compare handlers.
//!
//! Implements ADD, CMP, INC, IDIV, CDQ, and the 0x83/0xF7/0xFF opcode
//! groups. Each handler reads its operands, computes the result at 64-bit
//! width so the carry-out is observable, writes back (except CMP), and
//! updates EFLAGS where the instruction defines it.
//!
//! Two deliberate departures from hardware are kept for compatibility
//! with the programs this engine targets: the INC forms (0x40+r and
//! 0xFF /0) leave EFLAGS untouched, and 0x83 /0 ADD does not update
//! flags either.

use crate::emulator::Emulator;
use crate::error::{EmuError, Result};
use crate::modrm::ModRm;
use crate::registers::Gpr;

/// ADD r/m32, r32 (0x01).
pub fn add_rm32_r32(emu: &mut Emulator) -> Result<()> {
    emu.regs.eip = emu.regs.eip.wrapping_add(1);
    let modrm = emu.parse_modrm();
    let r32 = emu.get_r32(&modrm);
    let rm32 = emu.get_rm32(&modrm);
    let result = rm32 as u64 + r32 as u64;
    emu.set_rm32(&modrm, result as u32);
    emu.update_eflags_add(rm32, r32, result);
    Ok(())
}

/// CMP r32, r/m32 (0x3B): flags from `r32 - rm32`, no write-back.
pub fn cmp_r32_rm32(emu: &mut Emulator) -> Result<()> {
    emu.regs.eip = emu.regs.eip.wrapping_add(1);
    let modrm = emu.parse_modrm();
    let r32 = emu.get_r32(&modrm);
    let rm32 = emu.get_rm32(&modrm);
    let result = (r32 as u64).wrapping_sub(rm32 as u64);
    emu.update_eflags_sub(r32, rm32, result);
    Ok(())
}

/// CMP AL, imm8 (0x3C).
pub fn cmp_al_imm8(emu: &mut Emulator) -> Result<()> {
    let al = emu.regs.read_gpr8(0);
    let value = emu.code_u8(1);
    let result = (al as u64).wrapping_sub(value as u64);
    emu.update_eflags_sub(al as u32, value as u32, result);
    emu.regs.eip = emu.regs.eip.wrapping_add(2);
    Ok(())
}

/// CMP EAX, imm32 (0x3D).
pub fn cmp_eax_imm32(emu: &mut Emulator) -> Result<()> {
    let eax = emu.regs.read_gpr32(Gpr::Eax as u8);
    let value = emu.code_u32(1);
    let result = (eax as u64).wrapping_sub(value as u64);
    emu.update_eflags_sub(eax, value, result);
    emu.regs.eip = emu.regs.eip.wrapping_add(5);
    Ok(())
}

/// INC r32 (0x40+r). EFLAGS are left untouched.
pub fn inc_r32(emu: &mut Emulator) -> Result<()> {
    let reg = emu.code_u8(0) - 0x40;
    let val = emu.regs.read_gpr32(reg);
    emu.regs.write_gpr32(reg, val.wrapping_add(1));
    emu.regs.eip = emu.regs.eip.wrapping_add(1);
    Ok(())
}

/// CDQ (0x99): sign-extend EAX into EDX:EAX.
pub fn cdq(emu: &mut Emulator) -> Result<()> {
    let eax = emu.regs.read_gpr32(Gpr::Eax as u8);
    let edx = if eax >> 31 != 0 { 0xFFFF_FFFF } else { 0 };
    emu.regs.write_gpr32(Gpr::Edx as u8, edx);
    emu.regs.eip = emu.regs.eip.wrapping_add(1);
    Ok(())
}

// ── Group 1 (0x83): r/m32, imm8 sign-extended ──

/// Opcode group 0x83: the ModR/M reg field selects ADD (/0), SUB (/5),
/// or CMP (/7).
pub fn group_83(emu: &mut Emulator) -> Result<()> {
    let fault_eip = emu.regs.eip;
    emu.regs.eip = emu.regs.eip.wrapping_add(1);
    let modrm = emu.parse_modrm();
    match modrm.reg {
        0 => add_rm32_imm8(emu, &modrm),
        5 => sub_rm32_imm8(emu, &modrm, true),
        7 => sub_rm32_imm8(emu, &modrm, false),
        ext => {
            return Err(EmuError::UnimplementedExtension {
                opcode: 0x83,
                ext,
                eip: fault_eip,
            })
        }
    }
    Ok(())
}

/// ADD r/m32, imm8 (0x83 /0). Flags are left untouched.
fn add_rm32_imm8(emu: &mut Emulator, modrm: &ModRm) {
    let rm32 = emu.get_rm32(modrm);
    let imm8 = emu.code_i8(0) as i32 as u32;
    emu.regs.eip = emu.regs.eip.wrapping_add(1);
    emu.set_rm32(modrm, rm32.wrapping_add(imm8));
}

/// SUB (0x83 /5) and CMP (0x83 /7) r/m32, imm8: identical except that
/// CMP skips the write-back.
fn sub_rm32_imm8(emu: &mut Emulator, modrm: &ModRm, write_back: bool) {
    let rm32 = emu.get_rm32(modrm);
    let imm8 = emu.code_i8(0) as i32 as u32;
    emu.regs.eip = emu.regs.eip.wrapping_add(1);
    let result = (rm32 as u64).wrapping_sub(imm8 as u64);
    if write_back {
        emu.set_rm32(modrm, result as u32);
    }
    emu.update_eflags_sub(rm32, imm8, result);
}

// ── Group 3 (0xF7) ──

/// Opcode group 0xF7: only IDIV (/7) is supported.
pub fn group_f7(emu: &mut Emulator) -> Result<()> {
    let fault_eip = emu.regs.eip;
    emu.regs.eip = emu.regs.eip.wrapping_add(1);
    let modrm = emu.parse_modrm();
    match modrm.reg {
        7 => idiv_rm32(emu, &modrm, fault_eip),
        ext => Err(EmuError::UnimplementedExtension {
            opcode: 0xF7,
            ext,
            eip: fault_eip,
        }),
    }
}

/// IDIV r/m32 (0xF7 /7): divide EDX:EAX by the r/m operand; EAX takes
/// the quotient, EDX the remainder.
///
/// The division is carried out unsigned on the 64-bit dividend. A zero
/// divisor or a quotient above 32 bits is a fatal divide error.
fn idiv_rm32(emu: &mut Emulator, modrm: &ModRm, fault_eip: u32) -> Result<()> {
    let divisor = emu.get_rm32(modrm) as u64;
    if divisor == 0 {
        return Err(EmuError::DivideError { eip: fault_eip });
    }

    let eax = emu.regs.read_gpr32(Gpr::Eax as u8);
    let edx = emu.regs.read_gpr32(Gpr::Edx as u8);
    let dividend = ((edx as u64) << 32) | eax as u64;

    let quotient = dividend / divisor;
    let remainder = dividend % divisor;
    if quotient > u32::MAX as u64 {
        return Err(EmuError::DivideError { eip: fault_eip });
    }

    emu.regs.write_gpr32(Gpr::Eax as u8, quotient as u32);
    emu.regs.write_gpr32(Gpr::Edx as u8, remainder as u32);
    Ok(())
}

// ── Group 5 (0xFF) ──

/// Opcode group 0xFF: only INC (/0) is supported.
pub fn group_ff(emu: &mut Emulator) -> Result<()> {
    let fault_eip = emu.regs.eip;
    emu.regs.eip = emu.regs.eip.wrapping_add(1);
    let modrm = emu.parse_modrm();
    match modrm.reg {
        0 => {
            inc_rm32(emu, &modrm);
            Ok(())
        }
        ext => Err(EmuError::UnimplementedExtension {
            opcode: 0xFF,
            ext,
            eip: fault_eip,
        }),
    }
}

/// INC r/m32 (0xFF /0). EFLAGS are left untouched.
fn inc_rm32(emu: &mut Emulator, modrm: &ModRm) {
    let value = emu.get_rm32(modrm);
    emu.set_rm32(modrm, value.wrapping_add(1));
}
