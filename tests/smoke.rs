//! Top-level sanity checks for the public `Gameboy` API.

use dmg_core::{Cartridge, Gameboy, CPU_HZ, CYCLES_PER_FRAME};

fn minimal_rom() -> Vec<u8> {
    let mut rom = vec![0x00u8; 32 * 1024];
    rom[0x100] = 0x00; // NOP
    rom[0x101] = 0xC3; // JP 0x0150
    rom[0x102] = 0x50;
    rom[0x103] = 0x01;
    for (i, b) in b"GBCORE_TEST".iter().enumerate() {
        rom[0x134 + i] = *b;
    }
    rom[0x147] = 0x00;
    rom[0x148] = 0x00;
    rom[0x149] = 0x00;
    rom
}

#[test]
fn cartridge_parse() {
    let cart = Cartridge::from_bytes(minimal_rom()).unwrap();
    assert_eq!(cart.title, "GBCORE_TEST");
    assert_eq!(cart.rom_size_kb, 32);
}

#[test]
fn clock_frame_model() {
    assert_eq!(CPU_HZ, 4_194_304);
    assert_eq!(CYCLES_PER_FRAME, 70224);
}

#[test]
fn step_advances_pc_past_the_leading_nop() {
    let mut gb = Gameboy::boot_skipped(Cartridge::from_bytes(minimal_rom()).unwrap(), 48_000);
    let cycles = gb.step().unwrap();
    assert_eq!(cycles, 4);
    assert_eq!(gb.cpu.regs.pc, 0x0101);
}

#[test]
fn run_frame_consumes_at_least_one_frame_of_cycles() {
    let mut gb = Gameboy::boot_skipped(Cartridge::from_bytes(minimal_rom()).unwrap(), 48_000);
    let t_cycles = gb.run_frame().unwrap();
    assert!(t_cycles >= CYCLES_PER_FRAME);
}
