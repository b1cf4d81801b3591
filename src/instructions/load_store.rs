//! # Load and Store Instructions
//!
//! LDA, LDX, LDY set N and Z from the loaded value. STA, STX, STY affect
//! no flags.

use crate::addressing::Operand;
use crate::cpu::Cpu;
use crate::memory::MemoryBus;

pub(crate) fn lda<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    cpu.a = cpu.read_operand(operand);
    cpu.set_flags_nz(cpu.a);
}

pub(crate) fn ldx<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    cpu.x = cpu.read_operand(operand);
    cpu.set_flags_nz(cpu.x);
}

pub(crate) fn ldy<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    cpu.y = cpu.read_operand(operand);
    cpu.set_flags_nz(cpu.y);
}

pub(crate) fn sta<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    cpu.write_operand(operand, cpu.a);
}

pub(crate) fn stx<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    cpu.write_operand(operand, cpu.x);
}

pub(crate) fn sty<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    cpu.write_operand(operand, cpu.y);
}
