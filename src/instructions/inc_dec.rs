//! # Increment and Decrement Instructions
//!
//! INC/DEC operate on memory (read-modify-write); INX, INY, DEX, DEY
//! operate on the index registers. All wrap at the byte boundary and set
//! N and Z from the result.

use crate::addressing::Operand;
use crate::cpu::Cpu;
use crate::memory::MemoryBus;

/// INC: memory <- memory + 1.
pub(crate) fn inc<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let result = cpu.read_operand(operand).wrapping_add(1);
    cpu.write_operand(operand, result);
    cpu.set_flags_nz(result);
}

/// DEC: memory <- memory - 1.
pub(crate) fn dec<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let result = cpu.read_operand(operand).wrapping_sub(1);
    cpu.write_operand(operand, result);
    cpu.set_flags_nz(result);
}

pub(crate) fn inx<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.x = cpu.x.wrapping_add(1);
    cpu.set_flags_nz(cpu.x);
}

pub(crate) fn iny<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.y = cpu.y.wrapping_add(1);
    cpu.set_flags_nz(cpu.y);
}

pub(crate) fn dex<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.x = cpu.x.wrapping_sub(1);
    cpu.set_flags_nz(cpu.x);
}

pub(crate) fn dey<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.y = cpu.y.wrapping_sub(1);
    cpu.set_flags_nz(cpu.y);
}
