//! The 0xCB-prefixed page: rotates/shifts, then BIT/RES/SET, each over
//! the same eight `r8` operand slots as the unprefixed table.

use super::alu;
use super::Cpu;
use crate::bus::Bus;
use crate::error::CoreError;

pub(super) fn execute(cpu: &mut Cpu, bus: &mut Bus, opcode: u8) -> Result<u8, CoreError> {
    let r = opcode & 0x07;
    let rw_cycles = if r == 6 { 16 } else { 8 };

    match opcode {
        op if (0x00..=0x3F).contains(&op) => {
            let group = (op >> 3) & 0x07;
            let value = cpu.read_r8(bus, r);
            let (result, flags) = match group {
                0 => {
                    let (v, c) = alu::rlc(value);
                    (v, alu::shift_flags(v, c))
                }
                1 => {
                    let (v, c) = alu::rrc(value);
                    (v, alu::shift_flags(v, c))
                }
                2 => {
                    let (v, c) = alu::rl(value, cpu.regs.flag_c());
                    (v, alu::shift_flags(v, c))
                }
                3 => {
                    let (v, c) = alu::rr(value, cpu.regs.flag_c());
                    (v, alu::shift_flags(v, c))
                }
                4 => {
                    let (v, c) = alu::sla(value);
                    (v, alu::shift_flags(v, c))
                }
                5 => {
                    let (v, c) = alu::sra(value);
                    (v, alu::shift_flags(v, c))
                }
                6 => alu::swap(value),
                7 => {
                    let (v, c) = alu::srl(value);
                    (v, alu::shift_flags(v, c))
                }
                _ => unreachable!("rotate/shift group out of range"),
            };
            cpu.write_r8(bus, r, result);
            cpu.regs.set_flags(flags);
            Ok(rw_cycles)
        }

        op if (0x40..=0x7F).contains(&op) => {
            let bit = (op >> 3) & 0x07;
            let value = cpu.read_r8(bus, r);
            let flags = alu::bit_test(value, bit, cpu.regs.flag_c());
            cpu.regs.set_flags(flags);
            Ok(if r == 6 { 12 } else { 8 })
        }

        op if (0x80..=0xBF).contains(&op) => {
            let bit = (op >> 3) & 0x07;
            let value = cpu.read_r8(bus, r);
            cpu.write_r8(bus, r, alu::res_bit(value, bit));
            Ok(rw_cycles)
        }

        op if (0xC0..=0xFF).contains(&op) => {
            let bit = (op >> 3) & 0x07;
            let value = cpu.read_r8(bus, r);
            cpu.write_r8(bus, r, alu::set_bit(value, bit));
            Ok(rw_cycles)
        }

        _ => unreachable!("0xCB opcode space is fully covered by the four ranges above"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::Cartridge;

    fn test_bus() -> Bus {
        let mut rom = vec![0u8; 0x8000];
        rom[0x147] = 0x00;
        Bus::new(Cartridge::from_bytes(rom).unwrap(), 48_000)
    }

    #[test]
    fn bit_7_h_sets_zero_when_bit_clear() {
        let mut cpu = Cpu::new();
        let mut bus = test_bus();
        cpu.regs.h = 0x00;
        execute(&mut cpu, &mut bus, 0x7C).unwrap(); // BIT 7,H
        assert!(cpu.regs.flag_z());
        assert!(!cpu.regs.flag_n());
        assert!(cpu.regs.flag_h());
    }

    #[test]
    fn res_0_b_clears_only_bit_zero() {
        let mut cpu = Cpu::new();
        let mut bus = test_bus();
        cpu.regs.b = 0xFF;
        execute(&mut cpu, &mut bus, 0x80).unwrap(); // RES 0,B
        assert_eq!(cpu.regs.b, 0xFE);
    }

    #[test]
    fn set_3_hl_indirect_writes_through_bus() {
        let mut cpu = Cpu::new();
        let mut bus = test_bus();
        cpu.regs.set_hl(0xC000);
        bus.write(0xC000, 0x00);
        execute(&mut cpu, &mut bus, 0xDE).unwrap(); // SET 3,(HL)
        assert_eq!(bus.read(0xC000), 0x08);
    }

    #[test]
    fn swap_a_exchanges_nibbles_and_sets_zero_flag() {
        let mut cpu = Cpu::new();
        let mut bus = test_bus();
        cpu.regs.a = 0x00;
        execute(&mut cpu, &mut bus, 0x37).unwrap(); // SWAP A
        assert!(cpu.regs.flag_z());
        cpu.regs.a = 0xAB;
        execute(&mut cpu, &mut bus, 0x37).unwrap();
        assert_eq!(cpu.regs.a, 0xBA);
    }
}
