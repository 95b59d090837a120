//! corex86 — software emulator for a 32-bit x86 (IA-32) subset.
//!
//! Executes flat-memory 32-bit x86 machine code: early-boot and user-mode
//! programs built from the MOV/ADD/CMP/PUSH/POP/Jcc/CALL/RET/IDIV core of
//! the architecture, with port I/O and BIOS-style software interrupts.
//! No segmentation, paging, or privilege levels — one flat address space,
//! one instruction at a time.
//!
//! # Architecture
//!
//! The library is organized into these layers:
//! - **Registers** (`registers.rs`) — 8 GPRs with 8/32-bit aliasing, `eip`, EFLAGS
//! - **Memory** (`memory.rs`) — flat little-endian guest RAM
//! - **Emulator** (`emulator.rs`) — the mutable aggregate: code fetch, stack, flags
//! - **ModR/M** (`modrm.rs`) — addressing-mode decoding and operand access
//! - **Executor** (`exec/`) — one handler per opcode, dense dispatch
//! - **I/O & BIOS** (`io.rs`, `devices/`, `bios.rs`) — host-side collaborators
//! - **Machine** (below) — ties everything together in the fetch-execute loop

pub mod bios;
pub mod devices;
pub mod emulator;
pub mod error;
pub mod exec;
pub mod flags;
pub mod io;
pub mod memory;
pub mod modrm;
pub mod registers;

pub use emulator::Emulator;
pub use error::{EmuError, Result};
pub use io::{IoDispatch, IoHandler};
pub use memory::FlatMemory;
pub use modrm::{Disp, ModRm};
pub use registers::{Gpr, RegisterFile};

use log::error;

/// Conventional boot-sector load address; programs are loaded and entered
/// here unless the host overrides it.
pub const LOAD_ADDRESS: u32 = 0x7C00;

/// Reason the machine stopped executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Control transferred to address 0, the program-end sentinel.
    Finished,
    /// The configured instruction limit was reached.
    InstructionLimit,
    /// External stop request via [`Machine::request_stop`].
    StopRequested,
    /// The engine raised a fatal fault.
    Fault(EmuError),
}

/// High-level machine: the emulator core plus its host-side collaborators
/// (port I/O dispatch and the BIOS interrupt servicer).
pub struct Machine {
    /// CPU and memory state.
    pub emu: Emulator,
    /// Port I/O dispatch table.
    pub io: IoDispatch,
    /// INT 10h teletype output collected by the BIOS service.
    teletype: Vec<u8>,
    /// If true, stop at the next instruction boundary.
    stop_requested: bool,
}

impl Machine {
    /// Create a machine with `ram_size` bytes of zeroed memory. Execution
    /// and the stack both start at [`LOAD_ADDRESS`]; use
    /// [`set_eip`](Machine::set_eip) / [`set_esp`](Machine::set_esp) to
    /// override.
    pub fn new(ram_size: usize) -> Self {
        Machine {
            emu: Emulator::new(ram_size, LOAD_ADDRESS, LOAD_ADDRESS),
            io: IoDispatch::new(),
            teletype: Vec::new(),
            stop_requested: false,
        }
    }

    /// Load raw binary data at a guest address.
    pub fn load_binary(&mut self, addr: usize, data: &[u8]) {
        self.emu.memory.load_at(addr, data);
    }

    /// Set the instruction pointer directly.
    pub fn set_eip(&mut self, eip: u32) {
        self.emu.regs.eip = eip;
    }

    /// Set the stack pointer directly.
    pub fn set_esp(&mut self, esp: u32) {
        self.emu.regs.set_esp(esp);
    }

    /// Register a port I/O handler for a range of ports.
    pub fn register_io(&mut self, base: u16, count: u16, handler: Box<dyn IoHandler>) {
        self.io.register(base, count, handler);
    }

    /// Request the machine to stop at the next instruction boundary.
    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    /// Number of instructions retired so far.
    pub fn instruction_count(&self) -> u64 {
        self.emu.instruction_count
    }

    /// Drain and return the teletype output accumulated by INT 10h.
    pub fn take_teletype(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.teletype)
    }

    /// Execute instructions until an exit condition is reached.
    ///
    /// `max_instructions` bounds the run (0 = unlimited). Each iteration
    /// retires one instruction, then services a pending software
    /// interrupt — clearing it — before the next fetch.
    pub fn run(&mut self, max_instructions: u64) -> ExitReason {
        loop {
            if self.stop_requested {
                self.stop_requested = false;
                return ExitReason::StopRequested;
            }

            if max_instructions > 0 && self.emu.instruction_count >= max_instructions {
                return ExitReason::InstructionLimit;
            }

            // Address 0 is the program-end sentinel: startup code pushes a
            // zero return address, so the final RET lands here.
            if self.emu.regs.eip == 0 {
                return ExitReason::Finished;
            }

            if let Err(e) = exec::execute(&mut self.emu, &mut self.io) {
                error!("{}", e);
                return ExitReason::Fault(e);
            }
            self.emu.instruction_count += 1;

            if let Some(vector) = self.emu.pending_int.take() {
                bios::service_interrupt(&mut self.emu, vector, &mut self.teletype);
            }
        }
    }
}
