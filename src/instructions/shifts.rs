//! # Shift and Rotate Instructions
//!
//! ASL, LSR, ROL, ROR. The same semantics apply to the accumulator and to
//! memory; the operand tag decides where the result lands. Carry receives
//! the bit shifted out; the rotates feed the old Carry in at the other end.

use crate::addressing::Operand;
use crate::cpu::Cpu;
use crate::memory::MemoryBus;

/// ASL: shift left, bit 0 <- 0, Carry <- old bit 7.
pub(crate) fn asl<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.read_operand(operand);
    cpu.set_flag_c(value & 0x80 != 0);
    let result = value << 1;
    cpu.write_operand(operand, result);
    cpu.set_flags_nz(result);
}

/// LSR: shift right, bit 7 <- 0, Carry <- old bit 0. Negative always ends
/// up clear.
pub(crate) fn lsr<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.read_operand(operand);
    cpu.set_flag_c(value & 0x01 != 0);
    let result = value >> 1;
    cpu.write_operand(operand, result);
    cpu.set_flags_nz(result);
}

/// ROL: rotate left through Carry, bit 0 <- old Carry.
pub(crate) fn rol<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.read_operand(operand);
    let carry_in = cpu.flag_c() as u8;
    cpu.set_flag_c(value & 0x80 != 0);
    let result = (value << 1) | carry_in;
    cpu.write_operand(operand, result);
    cpu.set_flags_nz(result);
}

/// ROR: rotate right through Carry, bit 7 <- old Carry.
pub(crate) fn ror<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.read_operand(operand);
    let carry_in = cpu.flag_c() as u8;
    cpu.set_flag_c(value & 0x01 != 0);
    let result = (value >> 1) | (carry_in << 7);
    cpu.write_operand(operand, result);
    cpu.set_flags_nz(result);
}
