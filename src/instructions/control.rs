//! # Control Flow Instructions
//!
//! JMP, JSR, RTS, RTI, and BRK. All of these set PC themselves; the driver
//! leaves PC alone after they run.
//!
//! When these execute, PC has been advanced past the opcode byte and sits
//! on the first operand byte (the signature byte, for BRK).

use crate::addressing::{self, AddressingMode, Operand};
use crate::cpu::{Cpu, Status, IRQ_VECTOR};
use crate::memory::MemoryBus;

/// JMP: unconditional jump, absolute or indirect.
///
/// The indirect form reads its pointer with the page-wrap quirk:
/// `JMP ($10FF)` fetches the target's low byte from 0x10FF and its high
/// byte from 0x1000.
pub(crate) fn jmp<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    let (Operand::Address(target), _) = addressing::resolve(cpu, mode) else {
        unreachable!("JMP supports absolute and indirect only");
    };
    cpu.pc = target;
}

/// JSR: push the address of the last operand byte, then jump. RTS supplies
/// the +1 on return.
pub(crate) fn jsr<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let target = cpu.memory.read_word(cpu.pc);
    let return_addr = cpu.pc.wrapping_add(1);
    cpu.push_word(return_addr);
    cpu.pc = target;
}

/// RTS: pop the return address and resume one past it.
pub(crate) fn rts<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.pc = cpu.pop_word().wrapping_add(1);
}

/// RTI: pop the status register, then the return address (no +1).
///
/// The popped Break bit is discarded; Unused reads 1 as always.
pub(crate) fn rti<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let popped = cpu.pop_byte();
    cpu.status = (Status::from_bits_retain(popped) - Status::BREAK) | Status::UNUSED;
    cpu.pc = cpu.pop_word();
}

/// BRK: software interrupt.
///
/// Pushes PC+1 (skipping the signature byte after the opcode), sets Break,
/// pushes the status, sets Interrupt-disable, and jumps through the
/// IRQ/BRK vector.
pub(crate) fn brk<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let return_addr = cpu.pc.wrapping_add(1);
    cpu.push_word(return_addr);

    cpu.status.insert(Status::BREAK);
    cpu.push_byte(cpu.status.bits() | Status::UNUSED.bits());
    cpu.status.insert(Status::INTERRUPT_DISABLE);

    cpu.pc = cpu.memory.read_word(IRQ_VECTOR);
}
