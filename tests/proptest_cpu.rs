//! Property-based tests for CPU invariants.
//!
//! These use proptest to verify that the core maintains its contracts
//! across all input combinations: PC advancement, cycle accounting,
//! arithmetic identities, flag laws, and stack behavior.

use mos6502::{Cpu, FlatMemory, MemoryBus, Mnemonic, OPCODE_TABLE};
use proptest::prelude::*;

/// Helper to create a CPU with the program origin at 0x8000
fn setup_cpu() -> Cpu<FlatMemory> {
    let mut cpu = Cpu::new(FlatMemory::new());
    cpu.set_pc(0x8000);
    cpu
}

/// Every defined opcode
fn defined_opcodes() -> Vec<u8> {
    OPCODE_TABLE
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_some())
        .map(|(i, _)| i as u8)
        .collect()
}

/// Opcodes whose instructions leave PC management to the driver
fn non_pc_controlling_opcodes() -> Vec<u8> {
    OPCODE_TABLE
        .iter()
        .enumerate()
        .filter_map(|(i, e)| e.map(|e| (i, e)))
        .filter(|(_, e)| {
            !matches!(
                e.mnemonic,
                Mnemonic::Bcc
                    | Mnemonic::Bcs
                    | Mnemonic::Beq
                    | Mnemonic::Bmi
                    | Mnemonic::Bne
                    | Mnemonic::Bpl
                    | Mnemonic::Bvc
                    | Mnemonic::Bvs
                    | Mnemonic::Brk
                    | Mnemonic::Jmp
                    | Mnemonic::Jsr
                    | Mnemonic::Rts
                    | Mnemonic::Rti
            )
        })
        .map(|(i, _)| i as u8)
        .collect()
}

// ========== Driver Properties ==========

proptest! {
    /// PC advances by exactly the instruction size for non-PC-controlling
    /// instructions.
    #[test]
    fn prop_pc_advances_by_instruction_size(
        opcode in prop::sample::select(non_pc_controlling_opcodes()),
        operand1 in 0u8..=255u8,
        operand2 in 0u8..=255u8,
    ) {
        let mut cpu = setup_cpu();
        let metadata = OPCODE_TABLE[opcode as usize].unwrap();

        cpu.memory_mut().write(0x8000, opcode);
        cpu.memory_mut().write(0x8001, operand1);
        cpu.memory_mut().write(0x8002, operand2);

        cpu.step().unwrap();

        prop_assert_eq!(
            cpu.pc(),
            0x8000 + metadata.bytes as u16,
            "PC should advance by {} for opcode 0x{:02X} ({})",
            metadata.bytes,
            opcode,
            metadata.mnemonic
        );
    }

    /// Every instruction consumes at least its base cycles.
    #[test]
    fn prop_cycles_increase_by_at_least_base(
        opcode in prop::sample::select(defined_opcodes()),
        operand1 in 0u8..=255u8,
        operand2 in 0u8..=255u8,
    ) {
        let mut cpu = setup_cpu();
        let metadata = OPCODE_TABLE[opcode as usize].unwrap();

        cpu.memory_mut().write(0x8000, opcode);
        cpu.memory_mut().write(0x8001, operand1);
        cpu.memory_mut().write(0x8002, operand2);

        let total = cpu.step().unwrap();

        prop_assert!(
            total >= metadata.cycles as u64,
            "opcode 0x{:02X} ({}) consumed {} < base {}",
            opcode,
            metadata.mnemonic,
            total,
            metadata.cycles
        );
        prop_assert_eq!(total, cpu.cycles());
    }

    /// The Unused status bit reads 1 after any instruction.
    #[test]
    fn prop_unused_bit_survives_every_instruction(
        opcode in prop::sample::select(defined_opcodes()),
        operand1 in 0u8..=255u8,
        operand2 in 0u8..=255u8,
        status in 0u8..=255u8,
    ) {
        let mut cpu = setup_cpu();
        cpu.set_status(status);

        cpu.memory_mut().write(0x8000, opcode);
        cpu.memory_mut().write(0x8001, operand1);
        cpu.memory_mut().write(0x8002, operand2);

        cpu.step().unwrap();

        prop_assert_eq!(cpu.status() & 0x20, 0x20);
    }
}

// ========== N/Z Flag Laws ==========

proptest! {
    /// Zero iff the loaded value is zero; Negative iff bit 7 is set.
    #[test]
    fn prop_lda_immediate_nz(value in 0u8..=255u8) {
        let mut cpu = setup_cpu();

        cpu.memory_mut().write(0x8000, 0xA9);
        cpu.memory_mut().write(0x8001, value);

        cpu.step().unwrap();

        prop_assert_eq!(cpu.a(), value);
        prop_assert_eq!(cpu.flag_z(), value == 0);
        prop_assert_eq!(cpu.flag_n(), value & 0x80 != 0);
    }

    /// AND result and flags.
    #[test]
    fn prop_and_immediate(a in 0u8..=255u8, operand in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.set_a(a);

        cpu.memory_mut().write(0x8000, 0x29);
        cpu.memory_mut().write(0x8001, operand);

        cpu.step().unwrap();

        let expected = a & operand;
        prop_assert_eq!(cpu.a(), expected);
        prop_assert_eq!(cpu.flag_z(), expected == 0);
        prop_assert_eq!(cpu.flag_n(), expected & 0x80 != 0);
    }

    /// EOR result and flags.
    #[test]
    fn prop_eor_immediate(a in 0u8..=255u8, operand in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.set_a(a);

        cpu.memory_mut().write(0x8000, 0x49);
        cpu.memory_mut().write(0x8001, operand);

        cpu.step().unwrap();

        let expected = a ^ operand;
        prop_assert_eq!(cpu.a(), expected);
        prop_assert_eq!(cpu.flag_z(), expected == 0);
        prop_assert_eq!(cpu.flag_n(), expected & 0x80 != 0);
    }
}

// ========== ADC / SBC Identities ==========

proptest! {
    /// ADC computes A + M + C with the right carry and signed overflow.
    #[test]
    fn prop_adc_immediate(
        a in 0u8..=255u8,
        operand in 0u8..=255u8,
        carry_in in proptest::bool::ANY,
    ) {
        let mut cpu = setup_cpu();
        cpu.set_a(a);
        cpu.set_flag_c(carry_in);

        cpu.memory_mut().write(0x8000, 0x69);
        cpu.memory_mut().write(0x8001, operand);

        cpu.step().unwrap();

        let sum = a as u16 + operand as u16 + carry_in as u16;
        prop_assert_eq!(cpu.a(), (sum & 0xFF) as u8);
        prop_assert_eq!(cpu.flag_c(), sum > 0xFF);

        let a_sign = a & 0x80 != 0;
        let m_sign = operand & 0x80 != 0;
        let r_sign = cpu.a() & 0x80 != 0;
        prop_assert_eq!(cpu.flag_v(), a_sign == m_sign && a_sign != r_sign);
    }

    /// SBC computes A - M - !C; Carry means no borrow.
    #[test]
    fn prop_sbc_immediate(
        a in 0u8..=255u8,
        operand in 0u8..=255u8,
        carry_in in proptest::bool::ANY,
    ) {
        let mut cpu = setup_cpu();
        cpu.set_a(a);
        cpu.set_flag_c(carry_in);

        cpu.memory_mut().write(0x8000, 0xE9);
        cpu.memory_mut().write(0x8001, operand);

        cpu.step().unwrap();

        let diff = a as i16 - operand as i16 - (!carry_in) as i16;
        prop_assert_eq!(cpu.a(), (diff & 0xFF) as u8);
        prop_assert_eq!(cpu.flag_c(), diff >= 0);
    }

    /// CMP flags: C = A >= M, Z = A == M, N = bit 7 of the difference.
    #[test]
    fn prop_cmp_immediate(a in 0u8..=255u8, operand in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.set_a(a);

        cpu.memory_mut().write(0x8000, 0xC9);
        cpu.memory_mut().write(0x8001, operand);

        cpu.step().unwrap();

        prop_assert_eq!(cpu.flag_c(), a >= operand);
        prop_assert_eq!(cpu.flag_z(), a == operand);
        prop_assert_eq!(cpu.flag_n(), a.wrapping_sub(operand) & 0x80 != 0);
        prop_assert_eq!(cpu.a(), a); // untouched
    }
}

// ========== Shift / Rotate ==========

proptest! {
    /// ASL doubles the value and moves bit 7 into Carry.
    #[test]
    fn prop_asl_accumulator(value in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.set_a(value);
        cpu.memory_mut().write(0x8000, 0x0A);

        cpu.step().unwrap();

        prop_assert_eq!(cpu.a(), value << 1);
        prop_assert_eq!(cpu.flag_c(), value & 0x80 != 0);
    }

    /// ROL then ROR through the same carry restores the value.
    #[test]
    fn prop_rol_ror_inverse(value in 0u8..=255u8, carry_in in proptest::bool::ANY) {
        let mut cpu = setup_cpu();
        cpu.set_a(value);
        cpu.set_flag_c(carry_in);

        cpu.memory_mut().write(0x8000, 0x2A); // ROL A
        cpu.memory_mut().write(0x8001, 0x6A); // ROR A

        cpu.step().unwrap();
        cpu.step().unwrap();

        prop_assert_eq!(cpu.a(), value);
        prop_assert_eq!(cpu.flag_c(), carry_in);
    }
}

// ========== Stack ==========

proptest! {
    /// push_byte/pop_byte round-trips and restores SP.
    #[test]
    fn prop_push_pop_byte(value in 0u8..=255u8, sp in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.set_sp(sp);

        cpu.push_byte(value);
        prop_assert_eq!(cpu.pop_byte(), value);
        prop_assert_eq!(cpu.sp(), sp);
    }

    /// push_word/pop_word round-trips and restores SP, even across the
    /// stack-page wrap.
    #[test]
    fn prop_push_pop_word(value in 0u16..=0xFFFFu16, sp in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.set_sp(sp);

        cpu.push_word(value);
        prop_assert_eq!(cpu.pop_word(), value);
        prop_assert_eq!(cpu.sp(), sp);
    }

    /// PHA/PLA preserves the accumulator.
    #[test]
    fn prop_pha_pla_roundtrip(value in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.set_a(value);

        cpu.memory_mut().write(0x8000, 0x48);
        cpu.memory_mut().write(0x8001, 0x68);

        cpu.step().unwrap();
        cpu.set_a(0x00);
        cpu.step().unwrap();

        prop_assert_eq!(cpu.a(), value);
    }
}

// ========== Cycle Accounting ==========

proptest! {
    /// LDA abs,X pays the extra cycle exactly when the high byte changes.
    #[test]
    fn prop_absolute_x_page_cross_penalty(base in 0u16..=0xFFFFu16, x in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.set_x(x);

        cpu.memory_mut().write(0x8000, 0xBD);
        cpu.memory_mut().write(0x8001, (base & 0xFF) as u8);
        cpu.memory_mut().write(0x8002, (base >> 8) as u8);

        cpu.step().unwrap();

        let crossed = base & 0xFF00 != base.wrapping_add(x as u16) & 0xFF00;
        prop_assert_eq!(cpu.cycles(), 4 + crossed as u64);
    }

    /// STA abs,X never pays a page-cross penalty.
    #[test]
    fn prop_sta_absolute_x_flat_cost(base in 0u16..=0x7000u16, x in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.set_x(x);
        cpu.set_a(0x42);

        cpu.memory_mut().write(0x8000, 0x9D);
        cpu.memory_mut().write(0x8001, (base & 0xFF) as u8);
        cpu.memory_mut().write(0x8002, (base >> 8) as u8);

        cpu.step().unwrap();

        prop_assert_eq!(cpu.cycles(), 5);
        prop_assert_eq!(cpu.memory().read(base.wrapping_add(x as u16)), 0x42);
    }
}

// ========== Register Width ==========

proptest! {
    /// INX/DEX wrap modulo 256 with the right flags.
    #[test]
    fn prop_inx_dex_wrap(x in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.set_x(x);

        cpu.memory_mut().write(0x8000, 0xE8); // INX
        cpu.memory_mut().write(0x8001, 0xCA); // DEX

        cpu.step().unwrap();
        let incremented = x.wrapping_add(1);
        prop_assert_eq!(cpu.x(), incremented);
        prop_assert_eq!(cpu.flag_z(), incremented == 0);
        prop_assert_eq!(cpu.flag_n(), incremented & 0x80 != 0);

        cpu.step().unwrap();
        prop_assert_eq!(cpu.x(), x);
    }

    /// Transfers copy the value and set N/Z from it.
    #[test]
    fn prop_tax_transfer(a in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.set_a(a);
        cpu.memory_mut().write(0x8000, 0xAA);

        cpu.step().unwrap();

        prop_assert_eq!(cpu.x(), a);
        prop_assert_eq!(cpu.a(), a);
        prop_assert_eq!(cpu.flag_z(), a == 0);
        prop_assert_eq!(cpu.flag_n(), a & 0x80 != 0);
    }
}
