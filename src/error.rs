//! Error types for corex86.
//!
//! `EmuError` serves dual purpose: it is both the Rust error type returned
//! from fallible operations and the engine's fault taxonomy. The machine
//! run loop in `lib.rs` catches these errors and surfaces them to the host
//! as an exit reason; none of them is recovered locally.

use thiserror::Error;

/// Fatal faults raised by the instruction engine.
///
/// Every variant carries the `eip` of the faulting instruction so the host
/// can report exactly where execution stopped. Non-fatal conditions
/// (carry, overflow) are reflected in EFLAGS and are the guest program's
/// concern, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmuError {
    /// The dispatch table has no handler for this opcode byte.
    #[error("undefined opcode 0x{opcode:02X} at eip=0x{eip:08X}")]
    UndefinedOpcode { opcode: u8, eip: u32 },
    /// A group opcode (0x83, 0xF7, 0xFF) with an unsupported ModR/M
    /// opcode-extension subcase.
    #[error("unimplemented opcode 0x{opcode:02X} /{ext} at eip=0x{eip:08X}")]
    UnimplementedExtension { opcode: u8, ext: u8, eip: u32 },
    /// IDIV with a zero divisor, or a quotient that does not fit in 32 bits.
    #[error("divide error at eip=0x{eip:08X}")]
    DivideError { eip: u32 },
}

/// Convenience result alias for engine operations.
pub type Result<T> = std::result::Result<T, EmuError>;
