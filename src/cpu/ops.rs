//! The unprefixed opcode page. One flat match keyed on the opcode byte;
//! related opcodes (the eight `INC r8` forms, the four conditional `JR`
//! forms, ...) are grouped behind a guard and decoded by bit position
//! rather than spelled out 8 times over.

use super::alu;
use super::Cpu;
use crate::bus::Bus;
use crate::error::CoreError;

fn condition(cpu: &Cpu, idx: u8) -> bool {
    match idx {
        0 => !cpu.regs.flag_z(),
        1 => cpu.regs.flag_z(),
        2 => !cpu.regs.flag_c(),
        3 => cpu.regs.flag_c(),
        _ => unreachable!("condition index out of range"),
    }
}

pub(super) fn execute(cpu: &mut Cpu, bus: &mut Bus, opcode: u8) -> Result<u8, CoreError> {
    match opcode {
        0x00 => Ok(4),

        // STOP: open question in the spec beyond consuming its padding byte.
        0x10 => {
            cpu.fetch_byte(bus);
            Ok(4)
        }

        0x01 | 0x11 | 0x21 | 0x31 => {
            let idx = (opcode >> 4) & 0x03;
            let value = cpu.fetch_word(bus);
            cpu.write_r16(idx, value);
            Ok(12)
        }

        0x02 => {
            bus.write(cpu.regs.bc(), cpu.regs.a);
            Ok(8)
        }
        0x12 => {
            bus.write(cpu.regs.de(), cpu.regs.a);
            Ok(8)
        }
        0x22 => {
            let hl = cpu.regs.hl();
            bus.write(hl, cpu.regs.a);
            cpu.regs.set_hl(hl.wrapping_add(1));
            Ok(8)
        }
        0x32 => {
            let hl = cpu.regs.hl();
            bus.write(hl, cpu.regs.a);
            cpu.regs.set_hl(hl.wrapping_sub(1));
            Ok(8)
        }

        0x03 | 0x13 | 0x23 | 0x33 => {
            let idx = (opcode >> 4) & 0x03;
            let value = cpu.read_r16(idx).wrapping_add(1);
            cpu.write_r16(idx, value);
            Ok(8)
        }
        0x0B | 0x1B | 0x2B | 0x3B => {
            let idx = (opcode >> 4) & 0x03;
            let value = cpu.read_r16(idx).wrapping_sub(1);
            cpu.write_r16(idx, value);
            Ok(8)
        }

        0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
            let idx = (opcode >> 3) & 0x07;
            let carry = cpu.regs.flag_c();
            let value = cpu.read_r8(bus, idx);
            let (result, flags) = alu::inc8(value, carry);
            cpu.write_r8(bus, idx, result);
            cpu.regs.set_flags(flags);
            Ok(if idx == 6 { 12 } else { 4 })
        }
        0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
            let idx = (opcode >> 3) & 0x07;
            let carry = cpu.regs.flag_c();
            let value = cpu.read_r8(bus, idx);
            let (result, flags) = alu::dec8(value, carry);
            cpu.write_r8(bus, idx, result);
            cpu.regs.set_flags(flags);
            Ok(if idx == 6 { 12 } else { 4 })
        }
        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
            let idx = (opcode >> 3) & 0x07;
            let value = cpu.fetch_byte(bus);
            cpu.write_r8(bus, idx, value);
            Ok(if idx == 6 { 12 } else { 8 })
        }

        0x07 => {
            let (result, carry) = alu::rlc(cpu.regs.a);
            cpu.regs.a = result;
            cpu.regs.set_flags(alu::accumulator_rotate_flags(carry));
            Ok(4)
        }
        0x0F => {
            let (result, carry) = alu::rrc(cpu.regs.a);
            cpu.regs.a = result;
            cpu.regs.set_flags(alu::accumulator_rotate_flags(carry));
            Ok(4)
        }
        0x17 => {
            let (result, carry) = alu::rl(cpu.regs.a, cpu.regs.flag_c());
            cpu.regs.a = result;
            cpu.regs.set_flags(alu::accumulator_rotate_flags(carry));
            Ok(4)
        }
        0x1F => {
            let (result, carry) = alu::rr(cpu.regs.a, cpu.regs.flag_c());
            cpu.regs.a = result;
            cpu.regs.set_flags(alu::accumulator_rotate_flags(carry));
            Ok(4)
        }

        0x08 => {
            let addr = cpu.fetch_word(bus);
            bus.write(addr, cpu.regs.sp as u8);
            bus.write(addr.wrapping_add(1), (cpu.regs.sp >> 8) as u8);
            Ok(20)
        }

        0x09 | 0x19 | 0x29 | 0x39 => {
            let idx = (opcode >> 4) & 0x03;
            let hl = cpu.regs.hl();
            let rhs = cpu.read_r16(idx);
            let (result, mut flags) = alu::add16(hl, rhs);
            flags.set(crate::registers::Flags::Z, cpu.regs.flag_z());
            cpu.regs.set_hl(result);
            cpu.regs.set_flags(flags);
            Ok(8)
        }

        0x0A => {
            cpu.regs.a = bus.read(cpu.regs.bc());
            Ok(8)
        }
        0x1A => {
            cpu.regs.a = bus.read(cpu.regs.de());
            Ok(8)
        }
        0x2A => {
            let hl = cpu.regs.hl();
            cpu.regs.a = bus.read(hl);
            cpu.regs.set_hl(hl.wrapping_add(1));
            Ok(8)
        }
        0x3A => {
            let hl = cpu.regs.hl();
            cpu.regs.a = bus.read(hl);
            cpu.regs.set_hl(hl.wrapping_sub(1));
            Ok(8)
        }

        0x18 => {
            let offset = cpu.fetch_byte(bus) as i8;
            cpu.regs.pc = cpu.regs.pc.wrapping_add(offset as i16 as u16);
            Ok(12)
        }
        0x20 | 0x28 | 0x30 | 0x38 => {
            let offset = cpu.fetch_byte(bus) as i8;
            let idx = (opcode >> 3) & 0x03;
            if condition(cpu, idx) {
                cpu.regs.pc = cpu.regs.pc.wrapping_add(offset as i16 as u16);
                Ok(12)
            } else {
                Ok(8)
            }
        }

        0x27 => {
            let (result, flags) = alu::daa(cpu.regs.a, cpu.regs.flags());
            cpu.regs.a = result;
            cpu.regs.set_flags(flags);
            Ok(4)
        }
        0x2F => {
            let (result, flags) = alu::cpl(cpu.regs.a, cpu.regs.flags());
            cpu.regs.a = result;
            cpu.regs.set_flags(flags);
            Ok(4)
        }
        0x37 => {
            let flags = alu::scf(cpu.regs.flags());
            cpu.regs.set_flags(flags);
            Ok(4)
        }
        0x3F => {
            let flags = alu::ccf(cpu.regs.flags());
            cpu.regs.set_flags(flags);
            Ok(4)
        }

        0x76 => {
            cpu.enter_halt(bus);
            Ok(4)
        }

        op if (0x40..=0x7F).contains(&op) => {
            let dst = (op >> 3) & 0x07;
            let src = op & 0x07;
            let value = cpu.read_r8(bus, src);
            cpu.write_r8(bus, dst, value);
            Ok(if dst == 6 || src == 6 { 8 } else { 4 })
        }

        op if (0x80..=0xBF).contains(&op) => {
            let group = (op >> 3) & 0x07;
            let src = op & 0x07;
            let value = cpu.read_r8(bus, src);
            cpu.alu_op_a(group, value);
            Ok(if src == 6 { 8 } else { 4 })
        }

        0xC0 | 0xC8 | 0xD0 | 0xD8 => {
            let idx = (opcode >> 3) & 0x03;
            if condition(cpu, idx) {
                cpu.regs.pc = cpu.pop_u16(bus);
                Ok(20)
            } else {
                Ok(8)
            }
        }
        0xC1 | 0xD1 | 0xE1 | 0xF1 => {
            let idx = (opcode >> 4) & 0x03;
            let value = cpu.pop_u16(bus);
            cpu.write_r16_stack(idx, value);
            Ok(12)
        }
        0xC2 | 0xCA | 0xD2 | 0xDA => {
            let addr = cpu.fetch_word(bus);
            let idx = (opcode >> 3) & 0x03;
            if condition(cpu, idx) {
                cpu.regs.pc = addr;
                Ok(16)
            } else {
                Ok(12)
            }
        }
        0xC3 => {
            let addr = cpu.fetch_word(bus);
            cpu.regs.pc = addr;
            Ok(16)
        }
        0xC4 | 0xCC | 0xD4 | 0xDC => {
            let addr = cpu.fetch_word(bus);
            let idx = (opcode >> 3) & 0x03;
            if condition(cpu, idx) {
                let pc = cpu.regs.pc;
                cpu.push_u16(bus, pc);
                cpu.regs.pc = addr;
                Ok(24)
            } else {
                Ok(12)
            }
        }
        0xC5 | 0xD5 | 0xE5 | 0xF5 => {
            let idx = (opcode >> 4) & 0x03;
            let value = cpu.read_r16_stack(idx);
            cpu.push_u16(bus, value);
            Ok(16)
        }

        0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
            let group = (opcode >> 3) & 0x07;
            let imm = cpu.fetch_byte(bus);
            cpu.alu_op_a(group, imm);
            Ok(8)
        }

        0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
            let vector = (opcode & 0x38) as u16;
            let pc = cpu.regs.pc;
            cpu.push_u16(bus, pc);
            cpu.regs.pc = vector;
            Ok(16)
        }

        0xC9 => {
            cpu.regs.pc = cpu.pop_u16(bus);
            Ok(16)
        }
        0xD9 => {
            cpu.regs.pc = cpu.pop_u16(bus);
            cpu.ime = true;
            Ok(16)
        }

        0xCB => {
            let cb_opcode = cpu.fetch_byte(bus);
            super::cb_ops::execute(cpu, bus, cb_opcode)
        }

        0xCD => {
            let addr = cpu.fetch_word(bus);
            let pc = cpu.regs.pc;
            cpu.push_u16(bus, pc);
            cpu.regs.pc = addr;
            Ok(24)
        }

        0xE0 => {
            let offset = cpu.fetch_byte(bus) as u16;
            bus.write(0xFF00 + offset, cpu.regs.a);
            Ok(12)
        }
        0xE2 => {
            let addr = 0xFF00 + cpu.regs.c as u16;
            bus.write(addr, cpu.regs.a);
            Ok(8)
        }
        0xE8 => {
            let imm = cpu.fetch_byte(bus) as i8;
            let (result, mut flags) = alu::add_sp_i8(cpu.regs.sp, imm);
            flags.remove(crate::registers::Flags::Z);
            cpu.regs.sp = result;
            cpu.regs.set_flags(flags);
            Ok(16)
        }
        0xE9 => {
            cpu.regs.pc = cpu.regs.hl();
            Ok(4)
        }
        0xEA => {
            let addr = cpu.fetch_word(bus);
            bus.write(addr, cpu.regs.a);
            Ok(16)
        }

        0xF0 => {
            let offset = cpu.fetch_byte(bus) as u16;
            cpu.regs.a = bus.read(0xFF00 + offset);
            Ok(12)
        }
        0xF2 => {
            let addr = 0xFF00 + cpu.regs.c as u16;
            cpu.regs.a = bus.read(addr);
            Ok(8)
        }
        0xF3 => {
            cpu.ime = false;
            cpu.ime_scheduled = false;
            Ok(4)
        }
        0xF8 => {
            let imm = cpu.fetch_byte(bus) as i8;
            let (result, mut flags) = alu::add_sp_i8(cpu.regs.sp, imm);
            flags.remove(crate::registers::Flags::Z);
            cpu.regs.set_hl(result);
            cpu.regs.set_flags(flags);
            Ok(12)
        }
        0xF9 => {
            cpu.regs.sp = cpu.regs.hl();
            Ok(8)
        }
        0xFA => {
            let addr = cpu.fetch_word(bus);
            cpu.regs.a = bus.read(addr);
            Ok(16)
        }
        0xFB => {
            cpu.ime_scheduled = true;
            Ok(4)
        }

        // 0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD
        // and anything this table doesn't otherwise cover: undefined on
        // real hardware, fatal here.
        _ => Err(cpu.fatal_opcode(opcode)),
    }
}
