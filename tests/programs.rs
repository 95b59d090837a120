//! End-to-end machine runs over hand-assembled flat binaries.
//!
//! Programs follow the loader convention: they are entered at 0x7C00 with
//! the stack top at 0x7C00, and they terminate by returning to address 0
//! (startup code pushes the zero sentinel itself).

use std::cell::RefCell;
use std::rc::Rc;

use corex86::devices::serial::{Serial, COM1_BASE, COM1_PORTS};
use corex86::{EmuError, ExitReason, Gpr, Machine, LOAD_ADDRESS};

const RAM_SIZE: usize = 1 << 20;

fn machine_with(program: &[u8]) -> Machine {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut machine = Machine::new(RAM_SIZE);
    machine.load_binary(LOAD_ADDRESS as usize, program);
    machine
}

#[test]
fn function_call_returns_through_sentinel() {
    let program = [
        0x6A, 0x00, // push 0              ; end-of-program sentinel
        0xE8, 0x01, 0x00, 0x00, 0x00, // call 0x7C08
        0xC3, // ret                 ; pops the sentinel
        0xB8, 0x2A, 0x00, 0x00, 0x00, // mov eax, 42
        0xC3, // ret
    ];
    let mut machine = machine_with(&program);

    assert_eq!(machine.run(0), ExitReason::Finished);
    assert_eq!(machine.emu.regs.read_gpr32(Gpr::Eax as u8), 42);
    assert_eq!(machine.instruction_count(), 5);
}

#[test]
fn countdown_loop_exercises_sub_and_jnz() {
    let program = [
        0xB8, 0x05, 0x00, 0x00, 0x00, // mov eax, 5
        0x83, 0xE8, 0x01, // sub eax, 1
        0x75, 0xFB, // jnz 0x7C05
        0x6A, 0x00, // push 0
        0xC3, // ret
    ];
    let mut machine = machine_with(&program);

    assert_eq!(machine.run(0), ExitReason::Finished);
    assert_eq!(machine.emu.regs.read_gpr32(Gpr::Eax as u8), 0);
    assert!(machine.emu.is_zero());
    assert_eq!(machine.instruction_count(), 13);
}

#[test]
fn stack_frame_round_trip() {
    let program = [
        0x6A, 0x00, // push 0
        0xE8, 0x06, 0x00, 0x00, 0x00, // call 0x7C0D
        0xA3, 0x00, 0x02, 0x00, 0x00, // mov [0x200], eax
        0xC3, // ret
        0x55, // push ebp
        0x89, 0xE5, // mov ebp, esp
        0x68, 0x07, 0x00, 0x00, 0x00, // push 7
        0x58, // pop eax
        0x83, 0xC0, 0x05, // add eax, 5
        0xC9, // leave
        0xC3, // ret
    ];
    let mut machine = machine_with(&program);

    assert_eq!(machine.run(0), ExitReason::Finished);
    assert_eq!(machine.emu.memory.read_u32(0x200), 12);
    assert_eq!(machine.emu.regs.read_gpr32(Gpr::Ebp as u8), 0);
}

#[test]
fn bios_teletype_collects_output() {
    let program = [
        0xB4, 0x0E, // mov ah, 0x0E
        0xB0, b'H', // mov al, 'H'
        0xCD, 0x10, // int 0x10
        0xB0, b'i', // mov al, 'i'
        0xCD, 0x10, // int 0x10
        0x6A, 0x00, // push 0
        0xC3, // ret
    ];
    let mut machine = machine_with(&program);

    assert_eq!(machine.run(0), ExitReason::Finished);
    assert_eq!(machine.take_teletype(), b"Hi");
}

#[test]
fn serial_echo_through_port_io() {
    let program = [
        0xBA, 0xF8, 0x03, 0x00, 0x00, // mov edx, 0x3F8
        0xEC, // in al, dx
        0xEE, // out dx, al
        0x6A, 0x00, // push 0
        0xC3, // ret
    ];
    let mut machine = machine_with(&program);

    let serial = Rc::new(RefCell::new(Serial::new()));
    serial.borrow_mut().send_input(b"x");
    machine.register_io(COM1_BASE, COM1_PORTS, Box::new(serial.clone()));

    assert_eq!(machine.run(0), ExitReason::Finished);
    assert_eq!(serial.borrow_mut().take_output(), b"x");
}

#[test]
fn fault_reports_opcode_and_location() {
    // The second instruction is an unsupported opcode.
    let program = [
        0x40, // inc eax
        0x0F, 0xA2, // cpuid — not in the supported set
    ];
    let mut machine = machine_with(&program);

    assert_eq!(
        machine.run(0),
        ExitReason::Fault(EmuError::UndefinedOpcode {
            opcode: 0x0F,
            eip: LOAD_ADDRESS + 1,
        })
    );
    assert_eq!(machine.instruction_count(), 1);
}
