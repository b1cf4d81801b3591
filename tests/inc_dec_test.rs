//! Tests for INC, DEC, INX, INY, DEX, DEY.

use mos6502::{Cpu, FlatMemory, MemoryBus};

fn setup_cpu() -> Cpu<FlatMemory> {
    let mut cpu = Cpu::new(FlatMemory::new());
    cpu.set_pc(0x8000);
    cpu
}

#[test]
fn test_inc_zero_page() {
    let mut cpu = setup_cpu();

    cpu.memory_mut().write(0x8000, 0xE6);
    cpu.memory_mut().write(0x8001, 0x42);
    cpu.memory_mut().write(0x0042, 0x7F);

    cpu.step().unwrap();

    assert_eq!(cpu.memory().read(0x0042), 0x80);
    assert!(cpu.flag_n());
    assert!(!cpu.flag_z());
    assert_eq!(cpu.cycles(), 5);
}

#[test]
fn test_inc_wraps_to_zero() {
    let mut cpu = setup_cpu();

    cpu.memory_mut().write(0x8000, 0xE6);
    cpu.memory_mut().write(0x8001, 0x42);
    cpu.memory_mut().write(0x0042, 0xFF);

    cpu.step().unwrap();

    assert_eq!(cpu.memory().read(0x0042), 0x00);
    assert!(cpu.flag_z());
}

#[test]
fn test_dec_absolute() {
    let mut cpu = setup_cpu();

    cpu.memory_mut().write(0x8000, 0xCE);
    cpu.memory_mut().write(0x8001, 0x00);
    cpu.memory_mut().write(0x8002, 0x20);
    cpu.memory_mut().write(0x2000, 0x01);

    cpu.step().unwrap();

    assert_eq!(cpu.memory().read(0x2000), 0x00);
    assert!(cpu.flag_z());
    assert_eq!(cpu.cycles(), 6);
}

#[test]
fn test_dec_wraps_below_zero() {
    let mut cpu = setup_cpu();

    cpu.memory_mut().write(0x8000, 0xC6);
    cpu.memory_mut().write(0x8001, 0x10);
    cpu.memory_mut().write(0x0010, 0x00);

    cpu.step().unwrap();

    assert_eq!(cpu.memory().read(0x0010), 0xFF);
    assert!(cpu.flag_n());
}

#[test]
fn test_inc_absolute_x_fixed_cost_despite_cross() {
    let mut cpu = setup_cpu();

    cpu.memory_mut().write(0x8000, 0xFE);
    cpu.memory_mut().write(0x8001, 0xFF);
    cpu.memory_mut().write(0x8002, 0x20);
    cpu.memory_mut().write(0x2101, 0x10);

    cpu.set_x(0x02);
    cpu.step().unwrap();

    assert_eq!(cpu.memory().read(0x2101), 0x11);
    assert_eq!(cpu.cycles(), 7);
}

#[test]
fn test_inx_wraps() {
    let mut cpu = setup_cpu();

    cpu.memory_mut().write(0x8000, 0xE8);

    cpu.set_x(0xFF);
    cpu.step().unwrap();

    assert_eq!(cpu.x(), 0x00);
    assert!(cpu.flag_z());
    assert_eq!(cpu.cycles(), 2);
}

#[test]
fn test_iny_sets_negative() {
    let mut cpu = setup_cpu();

    cpu.memory_mut().write(0x8000, 0xC8);

    cpu.set_y(0x7F);
    cpu.step().unwrap();

    assert_eq!(cpu.y(), 0x80);
    assert!(cpu.flag_n());
}

#[test]
fn test_dex_wraps() {
    let mut cpu = setup_cpu();

    cpu.memory_mut().write(0x8000, 0xCA);

    cpu.set_x(0x00);
    cpu.step().unwrap();

    assert_eq!(cpu.x(), 0xFF);
    assert!(cpu.flag_n());
}

#[test]
fn test_dey_to_zero() {
    let mut cpu = setup_cpu();

    cpu.memory_mut().write(0x8000, 0x88);

    cpu.set_y(0x01);
    cpu.step().unwrap();

    assert_eq!(cpu.y(), 0x00);
    assert!(cpu.flag_z());
}
