//! # Branch Instructions
//!
//! The eight conditional branches, all using relative addressing with a
//! signed 8-bit offset.
//!
//! Cycle timing: 2 cycles untaken, +1 taken, +1 more when the target lands
//! on a different page than the instruction following the branch. Each
//! handler returns that penalty to the driver; the base cost comes from the
//! opcode table. No flags are affected.

use crate::addressing;
use crate::cpu::Cpu;
use crate::memory::MemoryBus;

/// BCC: branch if Carry clear.
pub(crate) fn bcc<M: MemoryBus>(cpu: &mut Cpu<M>) -> u64 {
    let taken = !cpu.flag_c();
    branch_if(cpu, taken)
}

/// BCS: branch if Carry set.
pub(crate) fn bcs<M: MemoryBus>(cpu: &mut Cpu<M>) -> u64 {
    let taken = cpu.flag_c();
    branch_if(cpu, taken)
}

/// BEQ: branch if Zero set.
pub(crate) fn beq<M: MemoryBus>(cpu: &mut Cpu<M>) -> u64 {
    let taken = cpu.flag_z();
    branch_if(cpu, taken)
}

/// BNE: branch if Zero clear.
pub(crate) fn bne<M: MemoryBus>(cpu: &mut Cpu<M>) -> u64 {
    let taken = !cpu.flag_z();
    branch_if(cpu, taken)
}

/// BMI: branch if Negative set.
pub(crate) fn bmi<M: MemoryBus>(cpu: &mut Cpu<M>) -> u64 {
    let taken = cpu.flag_n();
    branch_if(cpu, taken)
}

/// BPL: branch if Negative clear.
pub(crate) fn bpl<M: MemoryBus>(cpu: &mut Cpu<M>) -> u64 {
    let taken = !cpu.flag_n();
    branch_if(cpu, taken)
}

/// BVC: branch if Overflow clear.
pub(crate) fn bvc<M: MemoryBus>(cpu: &mut Cpu<M>) -> u64 {
    let taken = !cpu.flag_v();
    branch_if(cpu, taken)
}

/// BVS: branch if Overflow set.
pub(crate) fn bvs<M: MemoryBus>(cpu: &mut Cpu<M>) -> u64 {
    let taken = cpu.flag_v();
    branch_if(cpu, taken)
}

fn branch_if<M: MemoryBus>(cpu: &mut Cpu<M>, taken: bool) -> u64 {
    if taken {
        let (target, penalty) = addressing::relative(cpu);
        cpu.pc = target;
        penalty
    } else {
        // Untaken: step over the offset byte only.
        cpu.pc = cpu.pc.wrapping_add(1);
        0
    }
}
