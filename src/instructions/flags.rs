//! # Status Flag Instructions
//!
//! CLC, SEC, CLI, SEI, CLD, SED, CLV. All implied, 1 byte, 2 cycles.
//!
//! There is no SEV; Overflow can only be set by arithmetic (or BIT).

use crate::cpu::{Cpu, Status};
use crate::memory::MemoryBus;

pub(crate) fn clc<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.status.remove(Status::CARRY);
}

pub(crate) fn sec<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.status.insert(Status::CARRY);
}

pub(crate) fn cli<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.status.remove(Status::INTERRUPT_DISABLE);
}

pub(crate) fn sei<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.status.insert(Status::INTERRUPT_DISABLE);
}

pub(crate) fn cld<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.status.remove(Status::DECIMAL);
}

pub(crate) fn sed<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.status.insert(Status::DECIMAL);
}

pub(crate) fn clv<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.status.remove(Status::OVERFLOW);
}
