//! Fuzz target for CPU step execution.
//!
//! Builds arbitrary register state and memory contents, executes one
//! instruction, and checks the invariants that must hold afterwards.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mos6502::{Cpu, FlatMemory, MemoryBus, Registers};

/// Arbitrary register file for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzRegisters {
    a: u8,
    x: u8,
    y: u8,
    sp: u8,
    status: u8,
}

/// Memory regions seeded from fuzz input
#[derive(Debug, Arbitrary)]
struct FuzzMemory {
    /// Bytes at the PC location (opcode + operands)
    instruction_bytes: [u8; 3],
    /// Zero page contents
    zero_page: [u8; 256],
    /// Stack page contents
    stack_page: [u8; 256],
    /// Region at 0x4000 for absolute addressing
    main_memory: [u8; 256],
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    registers: FuzzRegisters,
    memory: FuzzMemory,
}

fuzz_target!(|input: FuzzInput| {
    let mut memory = FlatMemory::new();

    memory.write_range(0x0000, &input.memory.zero_page);
    memory.write_range(0x0100, &input.memory.stack_page);
    memory.write_range(0x4000, &input.memory.main_memory);
    memory.write_range(0x8000, &input.memory.instruction_bytes);

    // IRQ/BRK vector
    memory.write_word(0xFFFE, 0x9000);

    let mut cpu = Cpu::new(memory);
    cpu.load_image(
        Some(Registers {
            pc: 0x8000,
            sp: input.registers.sp,
            status: input.registers.status,
            a: input.registers.a,
            x: input.registers.x,
            y: input.registers.y,
            cycles: 0,
        }),
        None,
    );

    // Undefined opcodes may error; nothing may panic.
    let result = cpu.step();

    // Invariants that hold no matter what executed
    assert_eq!(cpu.status() & 0x20, 0x20, "unused bit must read 1");
    match result {
        Ok(cycles) => assert!(cycles >= 2, "every instruction costs cycles"),
        Err(_) => assert_eq!(cpu.cycles(), 0, "failed dispatch consumes nothing"),
    }
});
