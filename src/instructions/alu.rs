//! # ALU Instructions
//!
//! Arithmetic and logic: ADC, SBC, AND, ORA, EOR, BIT, CMP, CPX, CPY.
//!
//! ADC/SBC compute in binary regardless of the Decimal flag (NES-profile
//! behavior). SBC is ADC of the one's complement: the carry-in supplies
//! the missing +1, so Carry doubles as the borrow indicator.

use crate::addressing::Operand;
use crate::cpu::Cpu;
use crate::memory::MemoryBus;

/// ADC: A <- A + operand + Carry; sets C, V, N, Z.
pub(crate) fn adc<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.read_operand(operand);
    add_with_carry(cpu, value);
}

/// SBC: A <- A - operand - (1 - Carry), implemented as ADC of !operand.
pub(crate) fn sbc<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.read_operand(operand);
    add_with_carry(cpu, !value);
}

fn add_with_carry<M: MemoryBus>(cpu: &mut Cpu<M>, value: u8) {
    let a = cpu.a;
    let sum = a as u16 + value as u16 + cpu.flag_c() as u16;
    let result = sum as u8;

    cpu.set_flag_c(sum > 0xFF);
    // Signed overflow: both addends share a sign the result lacks.
    cpu.set_flag_v(((a ^ result) & (value ^ result) & 0x80) != 0);
    cpu.a = result;
    cpu.set_flags_nz(result);
}

/// AND: A <- A & operand; sets N, Z.
pub(crate) fn and<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let result = cpu.a & cpu.read_operand(operand);
    cpu.a = result;
    cpu.set_flags_nz(result);
}

/// ORA: A <- A | operand; sets N, Z.
pub(crate) fn ora<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let result = cpu.a | cpu.read_operand(operand);
    cpu.a = result;
    cpu.set_flags_nz(result);
}

/// EOR: A <- A ^ operand; sets N, Z.
pub(crate) fn eor<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let result = cpu.a ^ cpu.read_operand(operand);
    cpu.a = result;
    cpu.set_flags_nz(result);
}

/// BIT: Z from A & operand, N and V copied from operand bits 7 and 6.
/// A is untouched.
pub(crate) fn bit<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let value = cpu.read_operand(operand);
    cpu.set_flag_z(cpu.a & value == 0);
    cpu.set_flag_n(value & 0x80 != 0);
    cpu.set_flag_v(value & 0x40 != 0);
}

/// CMP: flags from A - operand.
pub(crate) fn cmp<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let reg = cpu.a;
    compare(cpu, reg, operand);
}

/// CPX: flags from X - operand.
pub(crate) fn cpx<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let reg = cpu.x;
    compare(cpu, reg, operand);
}

/// CPY: flags from Y - operand.
pub(crate) fn cpy<M: MemoryBus>(cpu: &mut Cpu<M>, operand: Operand) {
    let reg = cpu.y;
    compare(cpu, reg, operand);
}

// Carry means "no borrow": reg >= operand. The register is not modified.
fn compare<M: MemoryBus>(cpu: &mut Cpu<M>, reg: u8, operand: Operand) {
    let value = cpu.read_operand(operand);
    cpu.set_flag_c(reg >= value);
    cpu.set_flags_nz(reg.wrapping_sub(value));
}
