//! # CPU State and Execution
//!
//! The [`Cpu`] struct holds the 6502 register file and drives the
//! fetch-decode-execute cycle.
//!
//! ## CPU State
//!
//! - **Registers**: accumulator (A), index registers (X, Y)
//! - **Program counter** (PC): 16-bit address of the next instruction
//! - **Stack pointer** (SP): 8-bit offset into the stack page
//!   (0x0100-0x01FF)
//! - **Status register** (SR): one byte with named bits; bit 5 always
//!   reads 1
//! - **Cycle counter**: monotonically increasing count of emulated cycles
//!
//! ## Execution Model
//!
//! [`Cpu::step`] executes exactly one instruction. The driver fetches the
//! opcode, looks up its metadata, resolves the addressing mode, runs the
//! instruction's semantics, advances PC past the operands unless the
//! instruction controls PC itself, and adds the base cycles plus any
//! page-cross or branch penalty. [`Cpu::run_for_cycles`] repeats that
//! until a cycle budget is spent. After each instruction a pending IRQ
//! line on the bus is serviced when interrupts are enabled.

use bitflags::bitflags;
use log::{debug, trace};

use crate::addressing::{self, AddressingMode, Operand};
use crate::instructions::{
    alu, branches, control, flags, inc_dec, load_store, shifts, stack, transfer,
};
use crate::memory::MemoryBus;
use crate::opcodes::{Mnemonic, OPCODE_TABLE};
use crate::CpuError;

/// Base address of the hardware stack page.
pub const STACK_BASE: u16 = 0x0100;

/// NMI vector location (0xFFFA/0xFFFB).
pub const NMI_VECTOR: u16 = 0xFFFA;

/// Reset vector location (0xFFFC/0xFFFD); also the PC power-on value.
pub const RESET_VECTOR: u16 = 0xFFFC;

/// IRQ/BRK vector location (0xFFFE/0xFFFF).
pub const IRQ_VECTOR: u16 = 0xFFFE;

bitflags! {
    /// Processor status register, bit layout NV-BDIZC.
    ///
    /// Kept as a single byte so that PHP/PLP/RTI move it byte-exactly,
    /// including the Break and Unused quirks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        const CARRY             = 0b0000_0001;
        const ZERO              = 0b0000_0010;
        const INTERRUPT_DISABLE = 0b0000_0100;
        const DECIMAL           = 0b0000_1000;
        const BREAK             = 0b0001_0000;
        const UNUSED            = 0b0010_0000;
        const OVERFLOW          = 0b0100_0000;
        const NEGATIVE          = 0b1000_0000;
    }
}

impl Default for Status {
    // Power-on value 0x30: Break and Unused set.
    fn default() -> Status {
        Status::BREAK | Status::UNUSED
    }
}

/// Register-file snapshot, exchanged by [`Cpu::load_image`] and
/// [`Cpu::save_image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub pc: u16,
    pub sp: u8,
    pub status: u8,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub cycles: u64,
}

impl Default for Registers {
    /// The 6502 power-on state: PC=0xFFFC, SP=0xFF, SR=0x30, everything
    /// else zero.
    fn default() -> Registers {
        Registers {
            pc: RESET_VECTOR,
            sp: 0xFF,
            status: Status::default().bits(),
            a: 0,
            x: 0,
            y: 0,
            cycles: 0,
        }
    }
}

/// 6502 CPU state and execution context, generic over the memory bus.
///
/// # Examples
///
/// ```
/// use mos6502::{Cpu, FlatMemory, MemoryBus};
///
/// let mut memory = FlatMemory::new();
/// memory.write(0x8000, 0xE8); // INX
///
/// let mut cpu = Cpu::new(memory);
/// cpu.set_pc(0x8000);
/// cpu.step().unwrap();
/// assert_eq!(cpu.x(), 1);
/// ```
pub struct Cpu<M: MemoryBus> {
    pub(crate) a: u8,
    pub(crate) x: u8,
    pub(crate) y: u8,
    pub(crate) pc: u16,
    pub(crate) sp: u8,
    pub(crate) status: Status,
    pub(crate) cycles: u64,
    pub(crate) memory: M,
}

impl<M: MemoryBus> Cpu<M> {
    /// Creates a CPU in the power-on state over the given bus.
    ///
    /// PC starts at the literal 0xFFFC; hosts that follow the hardware
    /// convention install their entry point through the reset vector and
    /// jump there, or simply call [`set_pc`](Cpu::set_pc).
    pub fn new(memory: M) -> Self {
        let r = Registers::default();
        Self {
            a: r.a,
            x: r.x,
            y: r.y,
            pc: r.pc,
            sp: r.sp,
            status: Status::default(),
            cycles: 0,
            memory,
        }
    }

    /// Restores the power-on register state and replaces memory with its
    /// default contents.
    pub fn reset(&mut self)
    where
        M: Default,
    {
        self.set_registers(Registers::default());
        self.memory = M::default();
        debug!("reset: registers and memory restored to defaults");
    }

    /// Installs a caller-supplied register file and/or memory. `None`
    /// leaves the corresponding half untouched.
    pub fn load_image(&mut self, registers: Option<Registers>, memory: Option<M>) {
        if let Some(r) = registers {
            self.set_registers(r);
        }
        if let Some(m) = memory {
            self.memory = m;
            debug!("memory image installed");
        }
    }

    /// Returns a snapshot pair of the register file and memory.
    pub fn save_image(&self) -> (Registers, M)
    where
        M: Clone,
    {
        (self.registers(), self.memory.clone())
    }

    /// Executes one instruction and returns the cumulative cycle count.
    ///
    /// The driver:
    /// 1. fetches the opcode and bumps PC past it,
    /// 2. looks the opcode up; an empty slot fails with
    ///    [`CpuError::UnknownOpcode`] before any further state change,
    /// 3. resolves the addressing mode,
    /// 4. runs the instruction's semantics,
    /// 5. advances PC past the operand bytes unless the instruction
    ///    controls PC itself,
    /// 6. adds the base cycles plus any page-cross or branch penalty.
    ///
    /// A pending IRQ on the bus line is serviced afterwards when the
    /// Interrupt-disable flag is clear.
    pub fn step(&mut self) -> Result<u64, CpuError> {
        let opcode_pc = self.pc;
        let opcode = self.memory.read(opcode_pc);
        self.pc = self.pc.wrapping_add(1);

        let entry = OPCODE_TABLE[opcode as usize].ok_or(CpuError::UnknownOpcode {
            opcode,
            pc: opcode_pc,
        })?;
        trace!(
            "{:04X}  {:02X}  {} {:?}",
            opcode_pc,
            opcode,
            entry.mnemonic,
            entry.mode
        );

        let mut penalty: u64 = 0;
        if entry.mnemonic.controls_pc() {
            penalty = self.execute_pc_controlling(entry.mnemonic, entry.mode);
        } else {
            let (operand, crossed) = addressing::resolve(self, entry.mode);
            if crossed && entry.mnemonic.page_cross_penalty() {
                penalty = 1;
            }
            self.execute(entry.mnemonic, operand);
            if entry.bytes > 1 {
                self.pc = self.pc.wrapping_add(entry.bytes as u16 - 1);
            }
        }
        self.cycles += entry.cycles as u64 + penalty;

        // Sample the level-sensitive IRQ line between instructions.
        if self.memory.irq_active() && !self.flag_i() {
            self.irq();
        }

        Ok(self.cycles)
    }

    fn execute_pc_controlling(&mut self, mnemonic: Mnemonic, mode: AddressingMode) -> u64 {
        match mnemonic {
            Mnemonic::Bcc => branches::bcc(self),
            Mnemonic::Bcs => branches::bcs(self),
            Mnemonic::Beq => branches::beq(self),
            Mnemonic::Bmi => branches::bmi(self),
            Mnemonic::Bne => branches::bne(self),
            Mnemonic::Bpl => branches::bpl(self),
            Mnemonic::Bvc => branches::bvc(self),
            Mnemonic::Bvs => branches::bvs(self),
            Mnemonic::Jmp => {
                control::jmp(self, mode);
                0
            }
            Mnemonic::Jsr => {
                control::jsr(self);
                0
            }
            Mnemonic::Rts => {
                control::rts(self);
                0
            }
            Mnemonic::Rti => {
                control::rti(self);
                0
            }
            Mnemonic::Brk => {
                control::brk(self);
                0
            }
            _ => unreachable!("{mnemonic} does not control PC"),
        }
    }

    fn execute(&mut self, mnemonic: Mnemonic, operand: Operand) {
        match mnemonic {
            Mnemonic::Adc => alu::adc(self, operand),
            Mnemonic::And => alu::and(self, operand),
            Mnemonic::Asl => shifts::asl(self, operand),
            Mnemonic::Bit => alu::bit(self, operand),
            Mnemonic::Clc => flags::clc(self),
            Mnemonic::Cld => flags::cld(self),
            Mnemonic::Cli => flags::cli(self),
            Mnemonic::Clv => flags::clv(self),
            Mnemonic::Cmp => alu::cmp(self, operand),
            Mnemonic::Cpx => alu::cpx(self, operand),
            Mnemonic::Cpy => alu::cpy(self, operand),
            Mnemonic::Dec => inc_dec::dec(self, operand),
            Mnemonic::Dex => inc_dec::dex(self),
            Mnemonic::Dey => inc_dec::dey(self),
            Mnemonic::Eor => alu::eor(self, operand),
            Mnemonic::Inc => inc_dec::inc(self, operand),
            Mnemonic::Inx => inc_dec::inx(self),
            Mnemonic::Iny => inc_dec::iny(self),
            Mnemonic::Lda => load_store::lda(self, operand),
            Mnemonic::Ldx => load_store::ldx(self, operand),
            Mnemonic::Ldy => load_store::ldy(self, operand),
            Mnemonic::Lsr => shifts::lsr(self, operand),
            Mnemonic::Nop => {}
            Mnemonic::Ora => alu::ora(self, operand),
            Mnemonic::Pha => stack::pha(self),
            Mnemonic::Php => stack::php(self),
            Mnemonic::Pla => stack::pla(self),
            Mnemonic::Plp => stack::plp(self),
            Mnemonic::Rol => shifts::rol(self, operand),
            Mnemonic::Ror => shifts::ror(self, operand),
            Mnemonic::Sbc => alu::sbc(self, operand),
            Mnemonic::Sec => flags::sec(self),
            Mnemonic::Sed => flags::sed(self),
            Mnemonic::Sei => flags::sei(self),
            Mnemonic::Sta => load_store::sta(self, operand),
            Mnemonic::Stx => load_store::stx(self, operand),
            Mnemonic::Sty => load_store::sty(self, operand),
            Mnemonic::Tax => transfer::tax(self),
            Mnemonic::Tay => transfer::tay(self),
            Mnemonic::Tsx => transfer::tsx(self),
            Mnemonic::Txa => transfer::txa(self),
            Mnemonic::Txs => transfer::txs(self),
            Mnemonic::Tya => transfer::tya(self),
            _ => unreachable!("{mnemonic} controls PC"),
        }
    }

    /// Runs the CPU until at least `cycle_budget` cycles have elapsed.
    ///
    /// Returns the cycles actually consumed, which may overshoot the budget
    /// by up to one instruction. Useful for frame-locked hosts (e.g. 29780
    /// cycles per 60 Hz NTSC frame).
    pub fn run_for_cycles(&mut self, cycle_budget: u64) -> Result<u64, CpuError> {
        let start_cycles = self.cycles;
        let target_cycles = start_cycles + cycle_budget;

        while self.cycles < target_cycles {
            self.step()?;
        }

        Ok(self.cycles - start_cycles)
    }

    // ========== Interrupts ==========

    /// Services a non-maskable interrupt through the vector at 0xFFFA.
    pub fn nmi(&mut self) {
        self.interrupt(NMI_VECTOR);
    }

    /// Services a maskable interrupt through the vector at 0xFFFE. Does
    /// nothing while the Interrupt-disable flag is set.
    pub fn irq(&mut self) {
        if !self.flag_i() {
            self.interrupt(IRQ_VECTOR);
        }
    }

    fn interrupt(&mut self, vector: u16) {
        self.push_word(self.pc);
        // Hardware interrupts push the status with Break clear.
        self.push_byte((self.status - Status::BREAK).bits());
        self.status.insert(Status::INTERRUPT_DISABLE);
        self.pc = self.memory.read_word(vector);
        self.cycles += 7;
        debug!("interrupt via {:04X} -> {:04X}", vector, self.pc);
    }

    // ========== Stack ==========

    /// Pushes a byte at 0x0100 + SP, then decrements SP (wrapping).
    pub fn push_byte(&mut self, value: u8) {
        self.memory.write(STACK_BASE + self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    /// Pushes the high byte, then the low byte, so a pop yields low first.
    pub fn push_word(&mut self, value: u16) {
        self.push_byte((value >> 8) as u8);
        self.push_byte((value & 0xFF) as u8);
    }

    /// Increments SP (wrapping), then returns the byte at 0x0100 + SP.
    pub fn pop_byte(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.memory.read(STACK_BASE + self.sp as u16)
    }

    /// Pops the low byte, then the high byte.
    pub fn pop_word(&mut self) -> u16 {
        let lo = self.pop_byte() as u16;
        let hi = self.pop_byte() as u16;
        (hi << 8) | lo
    }

    // ========== Operand Access ==========

    pub(crate) fn read_operand(&self, operand: Operand) -> u8 {
        match operand {
            Operand::Accumulator => self.a,
            Operand::Address(addr) => self.memory.read(addr),
            Operand::Implied => unreachable!("implied operand carries no value"),
        }
    }

    pub(crate) fn write_operand(&mut self, operand: Operand, value: u8) {
        match operand {
            Operand::Accumulator => self.a = value,
            Operand::Address(addr) => self.memory.write(addr, value),
            Operand::Implied => unreachable!("implied operand has no destination"),
        }
    }

    /// Sets Zero from `value == 0` and Negative from bit 7 of `value`.
    pub(crate) fn set_flags_nz(&mut self, value: u8) {
        self.status.set(Status::ZERO, value == 0);
        self.status.set(Status::NEGATIVE, value & 0x80 != 0);
    }

    // ========== Registers ==========

    /// Returns the accumulator.
    pub fn a(&self) -> u8 {
        self.a
    }

    /// Returns the X index register.
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Returns the Y index register.
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Returns the program counter.
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Returns the stack pointer. The full stack address is 0x0100 + SP.
    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Returns the status register as a packed byte (NV-BDIZC); bit 5
    /// reads 1.
    pub fn status(&self) -> u8 {
        (self.status | Status::UNUSED).bits()
    }

    /// Returns the cycles executed since power-on or the last image load.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    pub fn set_x(&mut self, value: u8) {
        self.x = value;
    }

    pub fn set_y(&mut self, value: u8) {
        self.y = value;
    }

    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    pub fn set_sp(&mut self, value: u8) {
        self.sp = value;
    }

    /// Replaces the status register; the Unused bit stays set regardless
    /// of the written value.
    pub fn set_status(&mut self, value: u8) {
        self.status = Status::from_bits_retain(value) | Status::UNUSED;
    }

    /// Returns the full register-file snapshot.
    pub fn registers(&self) -> Registers {
        Registers {
            pc: self.pc,
            sp: self.sp,
            status: self.status(),
            a: self.a,
            x: self.x,
            y: self.y,
            cycles: self.cycles,
        }
    }

    /// Installs a register-file snapshot.
    pub fn set_registers(&mut self, r: Registers) {
        self.pc = r.pc;
        self.sp = r.sp;
        self.set_status(r.status);
        self.a = r.a;
        self.x = r.x;
        self.y = r.y;
        self.cycles = r.cycles;
    }

    // ========== Status Flags ==========

    /// Returns true if the Carry flag is set.
    pub fn flag_c(&self) -> bool {
        self.status.contains(Status::CARRY)
    }

    /// Returns true if the Zero flag is set.
    pub fn flag_z(&self) -> bool {
        self.status.contains(Status::ZERO)
    }

    /// Returns true if the Interrupt-disable flag is set.
    pub fn flag_i(&self) -> bool {
        self.status.contains(Status::INTERRUPT_DISABLE)
    }

    /// Returns true if the Decimal flag is set. The flag is tracked but
    /// ADC/SBC always compute in binary.
    pub fn flag_d(&self) -> bool {
        self.status.contains(Status::DECIMAL)
    }

    /// Returns true if the Break flag is set.
    pub fn flag_b(&self) -> bool {
        self.status.contains(Status::BREAK)
    }

    /// Returns true if the Overflow flag is set.
    pub fn flag_v(&self) -> bool {
        self.status.contains(Status::OVERFLOW)
    }

    /// Returns true if the Negative flag is set.
    pub fn flag_n(&self) -> bool {
        self.status.contains(Status::NEGATIVE)
    }

    pub fn set_flag_c(&mut self, value: bool) {
        self.status.set(Status::CARRY, value);
    }

    pub fn set_flag_z(&mut self, value: bool) {
        self.status.set(Status::ZERO, value);
    }

    pub fn set_flag_i(&mut self, value: bool) {
        self.status.set(Status::INTERRUPT_DISABLE, value);
    }

    pub fn set_flag_d(&mut self, value: bool) {
        self.status.set(Status::DECIMAL, value);
    }

    pub fn set_flag_b(&mut self, value: bool) {
        self.status.set(Status::BREAK, value);
    }

    pub fn set_flag_v(&mut self, value: bool) {
        self.status.set(Status::OVERFLOW, value);
    }

    pub fn set_flag_n(&mut self, value: bool) {
        self.status.set(Status::NEGATIVE, value);
    }

    /// Reads a single named status bit as 0 or 1.
    pub fn status_bit(&self, flag: Status) -> u8 {
        self.status.contains(flag) as u8
    }

    /// Writes a single named status bit.
    ///
    /// Only the literal values 0 and 1 are accepted; anything else fails
    /// with [`CpuError::StatusBit`] carrying the bit index. The Unused bit
    /// reads 1 no matter what is written.
    pub fn set_status_bit(&mut self, flag: Status, value: u8) -> Result<(), CpuError> {
        match value {
            0 => self.status.remove(flag),
            1 => self.status.insert(flag),
            _ => {
                return Err(CpuError::StatusBit {
                    bit: flag.bits().trailing_zeros() as u8,
                    value,
                })
            }
        }
        self.status.insert(Status::UNUSED);
        Ok(())
    }

    // ========== Memory ==========

    /// Shared access to the memory bus.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Mutable access to the memory bus, for hosts and tests that need to
    /// write directly.
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlatMemory;

    #[test]
    fn test_power_on_state() {
        let cpu = Cpu::new(FlatMemory::new());

        assert_eq!(cpu.pc(), 0xFFFC);
        assert_eq!(cpu.sp(), 0xFF);
        assert_eq!(cpu.status(), 0x30);
        assert_eq!(cpu.a(), 0x00);
        assert_eq!(cpu.x(), 0x00);
        assert_eq!(cpu.y(), 0x00);
        assert_eq!(cpu.cycles(), 0);
    }

    #[test]
    fn test_unknown_opcode_only_bumps_pc() {
        let mut cpu = Cpu::new(FlatMemory::new());
        cpu.set_pc(0x8000);
        cpu.memory_mut().write(0x8000, 0x02);
        cpu.set_a(0x7F);

        let err = cpu.step().unwrap_err();
        assert_eq!(
            err,
            CpuError::UnknownOpcode {
                opcode: 0x02,
                pc: 0x8000
            }
        );
        // Only the opcode fetch bumped PC; nothing else moved.
        assert_eq!(cpu.pc(), 0x8001);
        assert_eq!(cpu.cycles(), 0);
        assert_eq!(cpu.a(), 0x7F);
    }

    #[test]
    fn test_status_bit_rejects_non_boolean() {
        let mut cpu = Cpu::new(FlatMemory::new());

        cpu.set_status_bit(Status::CARRY, 1).unwrap();
        assert_eq!(cpu.status_bit(Status::CARRY), 1);
        cpu.set_status_bit(Status::CARRY, 0).unwrap();
        assert_eq!(cpu.status_bit(Status::CARRY), 0);

        let err = cpu.set_status_bit(Status::OVERFLOW, 2).unwrap_err();
        assert_eq!(err, CpuError::StatusBit { bit: 6, value: 2 });
    }

    #[test]
    fn test_unused_bit_always_reads_one() {
        let mut cpu = Cpu::new(FlatMemory::new());

        cpu.set_status(0x00);
        assert_eq!(cpu.status() & 0x20, 0x20);

        cpu.set_status_bit(Status::UNUSED, 0).unwrap();
        assert_eq!(cpu.status_bit(Status::UNUSED), 1);
    }

    #[test]
    fn test_stack_roundtrip() {
        let mut cpu = Cpu::new(FlatMemory::new());

        cpu.push_byte(0x42);
        assert_eq!(cpu.sp(), 0xFE);
        assert_eq!(cpu.memory().read(0x01FF), 0x42);
        assert_eq!(cpu.pop_byte(), 0x42);
        assert_eq!(cpu.sp(), 0xFF);

        cpu.push_word(0x1234);
        assert_eq!(cpu.pop_word(), 0x1234);
        assert_eq!(cpu.sp(), 0xFF);
    }

    #[test]
    fn test_run_for_cycles() {
        let mut cpu = Cpu::new(FlatMemory::new());
        cpu.set_pc(0x8000);
        for addr in 0x8000..0x8010 {
            cpu.memory_mut().write(addr, 0xEA); // NOP
        }

        let consumed = cpu.run_for_cycles(10).unwrap();
        assert_eq!(consumed, 10); // five NOPs
        assert_eq!(cpu.pc(), 0x8005);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut cpu = Cpu::new(FlatMemory::new());
        cpu.set_pc(0x8000);
        cpu.set_a(0x55);
        cpu.memory_mut().write(0x1234, 0xAA);

        cpu.reset();
        assert_eq!(cpu.registers(), Registers::default());
        assert_eq!(cpu.memory().read(0x1234), 0x00);
    }

    #[test]
    fn test_save_and_load_image() {
        let mut cpu = Cpu::new(FlatMemory::new());
        cpu.set_pc(0x8000);
        cpu.set_a(0x99);
        cpu.memory_mut().write(0x2000, 0x77);

        let (regs, mem) = cpu.save_image();

        let mut other = Cpu::new(FlatMemory::new());
        other.load_image(Some(regs), Some(mem));
        assert_eq!(other.pc(), 0x8000);
        assert_eq!(other.a(), 0x99);
        assert_eq!(other.memory().read(0x2000), 0x77);
    }
}
