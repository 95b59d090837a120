//! EFLAGS computation for add/sub arithmetic and Jcc condition evaluation.
//!
//! Flag helpers are pure functions over the operands and a 64-bit result.
//! All arithmetic feeding them is performed at 64-bit width so the
//! carry-out of a 32-bit operation is observable in bit 32.

/// Carry flag.
pub const CF: u32 = 1 << 0;
/// Zero flag.
pub const ZF: u32 = 1 << 6;
/// Sign flag.
pub const SF: u32 = 1 << 7;
/// Overflow flag.
pub const OF: u32 = 1 << 11;

/// The status bits rewritten by add/sub flag updates.
pub const STATUS_MASK: u32 = CF | ZF | SF | OF;

/// Compute CF/ZF/SF/OF for `a + b`, where `result` is the 64-bit sum.
#[inline]
pub fn flags_add(a: u32, b: u32, result: u64) -> u32 {
    let res = result as u32;

    let mut f = 0u32;
    // CF: carry out of bit 31
    if result & (1u64 << 32) != 0 {
        f |= CF;
    }
    if res == 0 {
        f |= ZF;
    }
    if res & 0x8000_0000 != 0 {
        f |= SF;
    }
    // OF: both operands share a sign the result lacks
    if ((a ^ res) & (b ^ res)) >> 31 != 0 {
        f |= OF;
    }
    f
}

/// Compute CF/ZF/SF/OF for `a - b`, where `result` is the 64-bit difference.
#[inline]
pub fn flags_sub(a: u32, b: u32, result: u64) -> u32 {
    let res = result as u32;

    let mut f = 0u32;
    // CF: borrow into bit 32
    if result & (1u64 << 32) != 0 {
        f |= CF;
    }
    if res == 0 {
        f |= ZF;
    }
    if res & 0x8000_0000 != 0 {
        f |= SF;
    }
    // OF: operands differ in sign and the result's sign differs from the
    // minuend
    if ((a ^ b) & (a ^ res)) >> 31 != 0 {
        f |= OF;
    }
    f
}

/// Merge freshly computed status bits into EFLAGS, preserving the rest.
#[inline]
pub fn update_status(eflags: &mut u32, new: u32) {
    *eflags = (*eflags & !STATUS_MASK) | (new & STATUS_MASK);
}

/// Evaluate a Jcc condition code (the low 4 bits of the opcode) against
/// EFLAGS.
///
/// Odd condition codes negate the even ones. Returns `None` for the
/// parity conditions (0xA/0xB); PF is not tracked by this engine.
#[inline]
pub fn eval_cond(cc: u8, eflags: u32) -> Option<bool> {
    let result = match cc & 0x0E {
        // O: OF=1
        0x00 => eflags & OF != 0,
        // C/B: CF=1
        0x02 => eflags & CF != 0,
        // Z/E: ZF=1
        0x04 => eflags & ZF != 0,
        // BE: CF=1 or ZF=1
        0x06 => eflags & (CF | ZF) != 0,
        // S: SF=1
        0x08 => eflags & SF != 0,
        // P: parity is not modeled
        0x0A => return None,
        // L: SF != OF
        0x0C => (eflags & SF != 0) != (eflags & OF != 0),
        // LE: ZF=1 or SF != OF
        0x0E => eflags & ZF != 0 || (eflags & SF != 0) != (eflags & OF != 0),
        _ => unreachable!(),
    };
    Some(if cc & 1 != 0 { !result } else { result })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_no_flags() {
        let result = 2u64 + 5u64;
        assert_eq!(flags_add(2, 5, result), 0);
    }

    #[test]
    fn add_wrap_to_zero_sets_cf_zf() {
        let a = 0x1FFF_FFFFu32;
        let b = 0xE000_0001u32;
        let result = a as u64 + b as u64;
        assert_eq!(flags_add(a, b, result), CF | ZF);
    }

    #[test]
    fn add_signed_overflow() {
        // 0x7FFFFFFF + 1: positive operands, negative result
        let result = 0x7FFF_FFFFu64 + 1;
        assert_eq!(flags_add(0x7FFF_FFFF, 1, result), SF | OF);
    }

    #[test]
    fn sub_flag_table() {
        // (a, b, cf, zf, sf, of) — a - b
        let cases: &[(u32, u32, bool, bool, bool, bool)] = &[
            (5, 4, false, false, false, false),
            (5, 5, false, true, false, false),
            (5, 6, true, false, true, false),
            (-3i32 as u32, -2i32 as u32, true, false, true, false),
            (-3i32 as u32, -3i32 as u32, false, true, false, false),
            (-3i32 as u32, -4i32 as u32, false, false, false, false),
        ];
        for &(a, b, cf, zf, sf, of) in cases {
            let result = (a as u64).wrapping_sub(b as u64);
            let f = flags_sub(a, b, result);
            assert_eq!(f & CF != 0, cf, "CF for {:#X} - {:#X}", a, b);
            assert_eq!(f & ZF != 0, zf, "ZF for {:#X} - {:#X}", a, b);
            assert_eq!(f & SF != 0, sf, "SF for {:#X} - {:#X}", a, b);
            assert_eq!(f & OF != 0, of, "OF for {:#X} - {:#X}", a, b);
        }
    }

    #[test]
    fn sub_signed_underflow_boundary() {
        // 0x80000000 - 1: minuend negative, subtrahend positive, result
        // positive — signed overflow without a borrow.
        let a = 0x8000_0000u32;
        let result = (a as u64).wrapping_sub(1);
        assert_eq!(flags_sub(a, 1, result), OF);
    }

    #[test]
    fn update_status_preserves_other_bits() {
        let mut eflags = 0x0000_0200; // IF, outside the status mask
        update_status(&mut eflags, CF | ZF);
        assert_eq!(eflags, 0x0000_0200 | CF | ZF);

        update_status(&mut eflags, 0);
        assert_eq!(eflags, 0x0000_0200);
    }

    #[test]
    fn eval_cond_less_than() {
        // JL is taken exactly when SF != OF.
        assert_eq!(eval_cond(0x0C, 0), Some(false));
        assert_eq!(eval_cond(0x0C, OF), Some(true));
        assert_eq!(eval_cond(0x0C, SF), Some(true));
        assert_eq!(eval_cond(0x0C, SF | OF), Some(false));
    }

    #[test]
    fn eval_cond_negation() {
        assert_eq!(eval_cond(0x04, ZF), Some(true)); // JZ
        assert_eq!(eval_cond(0x05, ZF), Some(false)); // JNZ
        assert_eq!(eval_cond(0x05, 0), Some(true));
    }

    #[test]
    fn eval_cond_parity_unsupported() {
        assert_eq!(eval_cond(0x0A, 0), None);
        assert_eq!(eval_cond(0x0B, 0), None);
    }
}
