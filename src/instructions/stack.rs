//! # Stack Instructions
//!
//! PHA, PHP, PLA, PLP. The stack lives at 0x0100-0x01FF and grows
//! downward; SP is the 8-bit offset into that page.

use crate::cpu::{Cpu, Status};
use crate::memory::MemoryBus;

/// PHA: push the accumulator.
pub(crate) fn pha<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.push_byte(cpu.a);
}

/// PHP: push the status register with Break and Unused forced to 1 in the
/// pushed byte.
pub(crate) fn php<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.push_byte((cpu.status | Status::BREAK | Status::UNUSED).bits());
}

/// PLA: pull into the accumulator; sets N, Z.
pub(crate) fn pla<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.a = cpu.pop_byte();
    cpu.set_flags_nz(cpu.a);
}

/// PLP: pull the status register. Break is restored from the stack byte;
/// Unused reads 1 regardless.
pub(crate) fn plp<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let popped = cpu.pop_byte();
    cpu.status = Status::from_bits_retain(popped) | Status::UNUSED;
}
