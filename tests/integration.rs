//! Cross-component invariants exercised only through the public `Gameboy`
//! surface -- the kind of thing unit tests inside a single module can't see.

use dmg_core::{Cartridge, Gameboy};

fn blank_rom() -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000];
    rom[0x147] = 0x00;
    rom
}

/// VBlank (bit 0) outranks Joypad (bit 4) when both are pending: the CPU's
/// interrupt dispatch picks the lowest-numbered set bit in IE & IF.
#[test]
fn vblank_interrupt_is_serviced_before_a_pending_joypad_interrupt() {
    let cart = Cartridge::from_bytes(blank_rom()).unwrap();
    let mut gb = Gameboy::boot_skipped(cart, 48_000);

    gb.cpu.ime = true;
    gb.bus.write(0xFFFF, 0x1F); // IE: all five enabled
    gb.bus.write(0xFF0F, 0x11); // IF: VBlank (bit 0) and Joypad (bit 4) both pending

    gb.step().unwrap(); // dispatch happens before any opcode fetch
    assert_eq!(gb.cpu.regs.pc, 0x0040); // VBlank vector, not 0x0060 (Joypad)
}

#[test]
fn save_state_round_trip_preserves_mid_run_cpu_and_memory_state() {
    let cart = Cartridge::from_bytes(blank_rom()).unwrap();
    let mut gb = Gameboy::boot_skipped(cart, 48_000);
    gb.run_frame().unwrap();
    gb.bus.write(0xC123, 0x55);

    let state = gb.save_state();
    let restored = state.load(blank_rom()).unwrap();

    assert_eq!(restored.cpu.regs.pc, gb.cpu.regs.pc);
    assert_eq!(restored.bus.read(0xC123), 0x55);
}
