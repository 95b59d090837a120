//! Instruction dispatch and handler conventions.
//!
//! [`execute`] maps the opcode byte at `eip` to its handler with a dense
//! match over the one-byte opcode space, so there is no half-initialized
//! function table to trip over. Every handler advances `eip` past its
//! entire encoding, applies its state effect, and updates EFLAGS when the
//! instruction defines it. Group opcodes (0x83, 0xF7, 0xFF) dispatch a
//! second time on the ModR/M reg field after the parse.

pub mod arith;
pub mod control;
pub mod data;
pub mod stack;
pub mod system;

use log::trace;

use crate::emulator::Emulator;
use crate::error::{EmuError, Result};
use crate::io::IoDispatch;

/// Execute the single instruction at `eip`.
///
/// # Errors
///
/// Returns an [`EmuError`] for an undefined opcode, an unimplemented
/// opcode-group extension, or a divide fault. The error carries the
/// opcode byte and the `eip` of the faulting instruction.
pub fn execute(emu: &mut Emulator, io: &mut IoDispatch) -> Result<()> {
    let opcode = emu.code_u8(0);
    trace!("eip=0x{:08X} opcode=0x{:02X}", emu.regs.eip, opcode);

    match opcode {
        // ── ADD ──
        0x01 => arith::add_rm32_r32(emu),

        // ── CMP ──
        0x3B => arith::cmp_r32_rm32(emu),
        0x3C => arith::cmp_al_imm8(emu),
        0x3D => arith::cmp_eax_imm32(emu),

        // ── INC r32 ──
        0x40..=0x47 => arith::inc_r32(emu),

        // ── PUSH / POP r32 ──
        0x50..=0x57 => stack::push_r32(emu),
        0x58..=0x5F => stack::pop_r32(emu),

        // ── PUSH imm ──
        0x68 => stack::push_imm32(emu),
        0x6A => stack::push_imm8(emu),

        // ── Jcc short ──
        0x70..=0x7F => control::jcc_rel8(emu),

        // ── Group 1: ADD/SUB/CMP r/m32, imm8 ──
        0x83 => arith::group_83(emu),

        // ── MOV ──
        0x88 => data::mov_rm8_r8(emu),
        0x89 => data::mov_rm32_r32(emu),
        0x8A => data::mov_r8_rm8(emu),
        0x8B => data::mov_r32_rm32(emu),

        // ── LEA ──
        0x8D => data::lea_r32_m(emu),

        // ── CDQ ──
        0x99 => arith::cdq(emu),

        // ── MOV accumulator/moffs ──
        0xA1 => data::mov_eax_moffs32(emu),
        0xA3 => data::mov_moffs32_eax(emu),

        // ── MOV r, imm ──
        0xB0..=0xB7 => data::mov_r8_imm8(emu),
        0xB8..=0xBF => data::mov_r32_imm32(emu),

        // ── RET ──
        0xC3 => control::ret(emu),

        // ── MOV r/m32, imm32 ──
        0xC7 => data::mov_rm32_imm32(emu),

        // ── LEAVE ──
        0xC9 => stack::leave(emu),

        // ── INT imm8 ──
        0xCD => system::int_imm8(emu),

        // ── IRETD ──
        0xCF => system::iretd(emu),

        // ── CALL / JMP ──
        0xE8 => control::call_rel32(emu),
        0xE9 => control::jmp_rel32(emu),
        0xEB => control::jmp_rel8(emu),

        // ── Port I/O ──
        0xEC => system::in_al_dx(emu, io),
        0xEE => system::out_dx_al(emu, io),

        // ── Group 3: IDIV ──
        0xF7 => arith::group_f7(emu),

        // ── Group 5: INC r/m32 ──
        0xFF => arith::group_ff(emu),

        _ => Err(EmuError::UndefinedOpcode {
            opcode,
            eip: emu.regs.eip,
        }),
    }
}
