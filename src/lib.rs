//! A cycle-paced DMG (original Game Boy) emulator core: SM83 interpreter,
//! 16-bit address bus, system timer, 4-channel APU, a boundary-only PPU, and
//! the joypad/cartridge seams around them. `Gameboy` is the single entry
//! point a host program drives; everything else is a component it owns.
//!
//! No windowing and no real audio backend ship here — those are external
//! collaborators that consume `Gameboy::run_frame`'s output and the APU's
//! drained sample ring.

pub mod apu;
pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod error;
pub mod interrupts;
pub mod joypad;
pub mod ppu;
pub mod registers;
mod save_state;
pub mod timer;

pub use cartridge::{Cartridge, CartridgeKind};
pub use error::CoreError;
pub use joypad::Button;
pub use save_state::SaveState;

use bus::Bus;
use cpu::Cpu;
use interrupts::InterruptKind;

/// SM83 clock rate in Hz.
pub const CPU_HZ: u32 = 4_194_304;
/// Dots per scanline (also the PPU's T-cycle granularity).
pub const DOTS_PER_LINE: u32 = ppu::DOTS_PER_LINE;
/// Scanlines per frame, including the ten VBlank lines.
pub const SCANLINES: u32 = ppu::SCANLINES;
/// T-cycles in one full frame: `DOTS_PER_LINE * SCANLINES`.
pub const CYCLES_PER_FRAME: u32 = DOTS_PER_LINE * SCANLINES;
/// Visible LCD width in pixels. The PPU in this core is boundary-only (LY
/// and VBlank timing only, see `ppu`) and never produces a framebuffer, but
/// hosts building a front end still need this hardware constant.
pub const LCD_WIDTH: u32 = 160;
/// Visible LCD height in pixels.
pub const LCD_HEIGHT: u32 = 144;

/// Owns the CPU and the bus (and, through the bus, the timer/PPU/APU/
/// joypad) and runs the scheduler step described in the design notes:
/// `cpu.step` produces T-cycles, which the driver fans out to the timer,
/// PPU, and APU in turn before looping.
pub struct Gameboy {
    pub cpu: Cpu,
    pub bus: Bus,
}

impl Gameboy {
    pub fn new(cartridge: Cartridge, sample_rate_hz: u32) -> Self {
        Gameboy {
            cpu: Cpu::new(),
            bus: Bus::new(cartridge, sample_rate_hz),
        }
    }

    /// Post-boot state per the external interfaces table: register/I-O
    /// image as if the boot ROM had just handed off at 0x0100.
    pub fn boot_skipped(cartridge: Cartridge, sample_rate_hz: u32) -> Self {
        Gameboy {
            cpu: Cpu::boot_skipped(),
            bus: Bus::boot_skipped(cartridge, sample_rate_hz),
        }
    }

    /// Runs one CPU step (instruction, interrupt dispatch, or halted idle
    /// tick) and fans its T-cycles out to the timer, PPU, and APU, OR-ing
    /// any interrupt requests they raise into the bus's IF register.
    /// Returns the T-cycles consumed, or the fatal error from an
    /// unimplemented/undefined opcode.
    pub fn step(&mut self) -> Result<u8, CoreError> {
        let t_cycles = self.cpu.step(&mut self.bus)?;

        let mut pending = self.bus.timer.step(t_cycles);
        pending |= self.bus.ppu.step(t_cycles);
        self.bus.apu.step(t_cycles, self.bus.timer.div_counter);
        self.bus.if_flags |= pending;

        Ok(t_cycles)
    }

    /// Steps until accumulated T-cycles reach `CYCLES_PER_FRAME`, returning
    /// the exact total consumed (one step may slightly overshoot the frame
    /// boundary; callers pacing real-time audio/video should use that total,
    /// not assume it's exactly `CYCLES_PER_FRAME`).
    pub fn run_frame(&mut self) -> Result<u32, CoreError> {
        let mut total = 0u32;
        while total < CYCLES_PER_FRAME {
            total += self.step()? as u32;
        }
        Ok(total)
    }

    /// Host-facing button input. Raises a Joypad interrupt request on a
    /// newly-pressed button whose column is currently selected.
    pub fn press(&mut self, button: Button, pressed: bool) {
        if self.bus.joypad.set_button(button, pressed) {
            self.bus.request_interrupt(InterruptKind::Joypad);
        }
    }

    pub fn save_state(&self) -> SaveState {
        save_state::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom_with_loop() -> Vec<u8> {
        // JP 0x0100 forever, at the post-boot entry point.
        let mut rom = vec![0u8; 0x8000];
        rom[0x100] = 0xC3; // JP a16
        rom[0x101] = 0x00;
        rom[0x102] = 0x01;
        rom[0x147] = 0x00;
        rom
    }

    #[test]
    fn run_frame_reaches_exactly_one_vblank() {
        let cart = Cartridge::from_bytes(rom_with_loop()).unwrap();
        let mut gb = Gameboy::boot_skipped(cart, 48_000);
        let mut vblanks = 0;
        let mut total = 0u32;
        while total < CYCLES_PER_FRAME {
            let before = gb.bus.ppu.ly;
            total += gb.step().unwrap() as u32;
            if before == 143 && gb.bus.ppu.ly == 144 {
                vblanks += 1;
            }
        }
        assert_eq!(vblanks, 1);
    }

    #[test]
    fn pressing_a_selected_button_requests_joypad_interrupt() {
        let cart = Cartridge::from_bytes(rom_with_loop()).unwrap();
        let mut gb = Gameboy::new(cart, 48_000);
        gb.bus.write(0xFF00, 0x10); // select action row
        gb.press(Button::A, true);
        assert!(gb
            .bus
            .if_flags
            .contains(interrupts::InterruptFlags::JOYPAD));
    }
}
