//! 6502 (2A03) interpreter.
//!
//! Decode is table-driven: `lookup::OPCODE_TABLE` maps each opcode byte to a
//! `(mnemonic, addressing)` pair and `cycle::CYCLE_TABLE` carries its cost.
//! Execution is one `match` over the mnemonic tag in `execute_instruction`.
//!
//! Stepping is cycle-granular with front-loaded execution: when the current
//! instruction has no cycles left, `clock` services interrupts or executes the
//! next instruction in full and loads `cycles_left` with its cost; each call
//! then burns exactly one cycle. The container advances the PPU three dots
//! per call, which keeps the two clocks in lockstep.

use crate::bus::CpuBus;
use crate::cpu::addressing::{Addressing, Operand};
use crate::cpu::cycle::CYCLE_TABLE;
use crate::cpu::lookup::{OPCODE_TABLE, Opcode};
use crate::cpu::mnemonic::Mnemonic;
use crate::cpu::status::Status;
use crate::error::Error;
use crate::memory::cpu as cpu_mem;

pub mod addressing;
mod cycle;
mod lookup;
pub mod mnemonic;
mod status;
pub(crate) mod trace;

/// Lightweight CPU register snapshot used for tracing and debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CpuSnapshot {
    pub pc: u16,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub s: u8,
    pub p: u8,
}

#[derive(Debug, Clone)]
pub struct Cpu {
    // Registers
    pub(crate) a: u8,
    pub(crate) x: u8,
    pub(crate) y: u8,
    pub(crate) s: u8,
    pub(crate) p: Status,
    pub(crate) pc: u16,

    /// Cycles consumed since power-on (monotonic).
    pub(crate) cycles: u64,
    /// Cycles the current instruction still has to burn.
    pub(crate) cycles_left: u32,
    /// Edge latch sampled at instruction boundaries.
    pub(crate) nmi_pending: bool,
    /// Level input from peripherals (APU/mapper); masked by the I flag.
    pub(crate) irq_line: bool,
    /// PC and opcode byte of the fetch that halted the interpreter.
    pub(crate) halted: Option<(u16, u8)>,
}

impl Cpu {
    pub(crate) fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            s: 0xFD,
            p: Status::INTERRUPT | Status::UNUSED,
            pc: 0,
            cycles: 0,
            cycles_left: 0,
            nmi_pending: false,
            irq_line: false,
            halted: None,
        }
    }

    /// Hardware reset: loads PC from `$FFFC/D`, re-arms the stack pointer and
    /// status register, and accounts the 7 cycles the sequence takes.
    pub(crate) fn reset(&mut self, bus: &mut CpuBus<'_>) {
        self.pc = bus.read_word(cpu_mem::RESET_VECTOR);
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.s = 0xFD;
        self.p = Status::INTERRUPT | Status::UNUSED;
        self.cycles = 7;
        self.cycles_left = 0;
        self.nmi_pending = false;
        self.irq_line = false;
        self.halted = None;
    }

    /// Advances the CPU by one cycle.
    ///
    /// At an instruction boundary this samples the NMI edge (and the IRQ line
    /// when I is clear) before fetching, then executes the next instruction in
    /// full. A pending OAM DMA stall raised by that instruction's writes is
    /// folded into the cycle debt so the CPU stays suspended for the copy.
    pub(crate) fn clock(&mut self, bus: &mut CpuBus<'_>) -> Result<(), Error> {
        if let Some((pc, opcode)) = self.halted {
            return Err(Error::UnknownOpcode { pc, opcode });
        }

        if self.cycles_left == 0 {
            if bus.ppu.take_nmi_edge() {
                self.nmi_pending = true;
            }

            if self.nmi_pending {
                self.nmi_pending = false;
                tracing::trace!(pc = self.pc, "servicing NMI");
                self.cycles_left = self.interrupt(bus, cpu_mem::NMI_VECTOR);
            } else if self.irq_line && !self.p.contains(Status::INTERRUPT) {
                self.cycles_left = self.interrupt(bus, cpu_mem::IRQ_VECTOR);
            } else {
                match self.execute_instruction(bus) {
                    Ok(cost) => self.cycles_left = cost,
                    Err(err) => {
                        if let Error::UnknownOpcode { pc, opcode } = err {
                            tracing::debug!(pc, opcode, "interpreter halted");
                            self.halted = Some((pc, opcode));
                        }
                        return Err(err);
                    }
                }
            }

            if let Some(stall) = bus.take_dma_stall() {
                self.cycles_left += stall;
            }
        }

        self.cycles_left -= 1;
        self.cycles = self.cycles.wrapping_add(1);
        Ok(())
    }

    /// `true` while the current instruction still owes cycles.
    pub(crate) fn mid_instruction(&self) -> bool {
        self.cycles_left > 0
    }

    pub(crate) fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot {
            pc: self.pc,
            a: self.a,
            x: self.x,
            y: self.y,
            s: self.s,
            p: self.p.bits(),
        }
    }

    /// Pushes PC and P, sets I, and vectors through `vector`. Used for both
    /// NMI and IRQ; the pushed status has B clear.
    fn interrupt(&mut self, bus: &mut CpuBus<'_>, vector: u16) -> u32 {
        self.push_word(bus, self.pc);
        self.push(bus, self.p.to_pushed_irq());
        self.p.insert(Status::INTERRUPT);
        self.pc = bus.read_word(vector);
        7
    }

    /// Fetches, decodes, and executes one instruction, returning its cycle
    /// cost including page-cross and branch penalties.
    fn execute_instruction(&mut self, bus: &mut CpuBus<'_>) -> Result<u32, Error> {
        let pc = self.pc;
        let opcode = bus.read(pc);
        let Opcode {
            mnemonic,
            addressing,
        } = OPCODE_TABLE[opcode as usize];

        if mnemonic == Mnemonic::JAM {
            return Err(Error::UnknownOpcode { pc, opcode });
        }

        let operand = self.resolve(bus, addressing, pc);
        let addr = operand.addr;
        let mut branch_taken = false;

        match mnemonic {
            // Loads and stores
            Mnemonic::LDA => {
                self.a = bus.read(addr);
                self.p.set_zn(self.a);
            }
            Mnemonic::LDX => {
                self.x = bus.read(addr);
                self.p.set_zn(self.x);
            }
            Mnemonic::LDY => {
                self.y = bus.read(addr);
                self.p.set_zn(self.y);
            }
            Mnemonic::STA => bus.write(addr, self.a),
            Mnemonic::STX => bus.write(addr, self.x),
            Mnemonic::STY => bus.write(addr, self.y),

            // Transfers
            Mnemonic::TAX => {
                self.x = self.a;
                self.p.set_zn(self.x);
            }
            Mnemonic::TAY => {
                self.y = self.a;
                self.p.set_zn(self.y);
            }
            Mnemonic::TSX => {
                self.x = self.s;
                self.p.set_zn(self.x);
            }
            Mnemonic::TXA => {
                self.a = self.x;
                self.p.set_zn(self.a);
            }
            Mnemonic::TYA => {
                self.a = self.y;
                self.p.set_zn(self.a);
            }
            Mnemonic::TXS => self.s = self.x,

            // Stack
            Mnemonic::PHA => self.push(bus, self.a),
            Mnemonic::PHP => self.push(bus, self.p.to_pushed()),
            Mnemonic::PLA => {
                self.a = self.pull(bus);
                self.p.set_zn(self.a);
            }
            Mnemonic::PLP => {
                let pulled = self.pull(bus);
                self.p = Status::from_pulled(pulled);
            }

            // Shifts and rotates
            Mnemonic::ASL => self.read_modify_write(bus, addressing, addr, Cpu::asl),
            Mnemonic::LSR => self.read_modify_write(bus, addressing, addr, Cpu::lsr),
            Mnemonic::ROL => self.read_modify_write(bus, addressing, addr, Cpu::rol),
            Mnemonic::ROR => self.read_modify_write(bus, addressing, addr, Cpu::ror),

            // Logic
            Mnemonic::AND => {
                let value = bus.read(addr);
                self.and(value);
            }
            Mnemonic::ORA => {
                let value = bus.read(addr);
                self.ora(value);
            }
            Mnemonic::EOR => {
                let value = bus.read(addr);
                self.eor(value);
            }
            Mnemonic::BIT => {
                let value = bus.read(addr);
                self.p.set(Status::ZERO, self.a & value == 0);
                self.p.set_v(value & 0x40 != 0);
                self.p.set(Status::NEGATIVE, value & 0x80 != 0);
            }

            // Arithmetic
            Mnemonic::ADC => {
                let value = bus.read(addr);
                self.adc(value);
            }
            Mnemonic::SBC => {
                let value = bus.read(addr);
                self.adc(value ^ 0xFF);
            }
            Mnemonic::CMP => {
                let value = bus.read(addr);
                self.compare(self.a, value);
            }
            Mnemonic::CPX => {
                let value = bus.read(addr);
                self.compare(self.x, value);
            }
            Mnemonic::CPY => {
                let value = bus.read(addr);
                self.compare(self.y, value);
            }

            // Increment/decrement
            Mnemonic::INC => self.read_modify_write(bus, addressing, addr, Cpu::inc),
            Mnemonic::DEC => self.read_modify_write(bus, addressing, addr, Cpu::dec),
            Mnemonic::INX => {
                self.x = self.x.wrapping_add(1);
                self.p.set_zn(self.x);
            }
            Mnemonic::DEX => {
                self.x = self.x.wrapping_sub(1);
                self.p.set_zn(self.x);
            }
            Mnemonic::INY => {
                self.y = self.y.wrapping_add(1);
                self.p.set_zn(self.y);
            }
            Mnemonic::DEY => {
                self.y = self.y.wrapping_sub(1);
                self.p.set_zn(self.y);
            }

            // Control flow
            Mnemonic::JMP => self.pc = addr,
            Mnemonic::JSR => {
                // The pushed address is that of the instruction's last byte.
                self.push_word(bus, pc.wrapping_add(2));
                self.pc = addr;
            }
            Mnemonic::RTS => {
                self.pc = self.pull_word(bus).wrapping_add(1);
            }
            Mnemonic::BRK => {
                self.push_word(bus, pc.wrapping_add(2));
                self.push(bus, self.p.to_pushed());
                self.p.insert(Status::INTERRUPT);
                self.pc = bus.read_word(cpu_mem::IRQ_VECTOR);
            }
            Mnemonic::RTI => {
                let pulled = self.pull(bus);
                self.p = Status::from_pulled(pulled);
                self.pc = self.pull_word(bus);
            }

            // Branches
            Mnemonic::BPL => branch_taken = self.branch(!self.p.contains(Status::NEGATIVE), addr, pc),
            Mnemonic::BMI => branch_taken = self.branch(self.p.contains(Status::NEGATIVE), addr, pc),
            Mnemonic::BVC => branch_taken = self.branch(!self.p.contains(Status::OVERFLOW), addr, pc),
            Mnemonic::BVS => branch_taken = self.branch(self.p.contains(Status::OVERFLOW), addr, pc),
            Mnemonic::BCC => branch_taken = self.branch(!self.p.contains(Status::CARRY), addr, pc),
            Mnemonic::BCS => branch_taken = self.branch(self.p.contains(Status::CARRY), addr, pc),
            Mnemonic::BNE => branch_taken = self.branch(!self.p.contains(Status::ZERO), addr, pc),
            Mnemonic::BEQ => branch_taken = self.branch(self.p.contains(Status::ZERO), addr, pc),

            // Flag operations
            Mnemonic::CLC => self.p.remove(Status::CARRY),
            Mnemonic::SEC => self.p.insert(Status::CARRY),
            Mnemonic::CLI => self.p.remove(Status::INTERRUPT),
            Mnemonic::SEI => self.p.insert(Status::INTERRUPT),
            Mnemonic::CLD => self.p.remove(Status::DECIMAL),
            Mnemonic::SED => self.p.insert(Status::DECIMAL),
            Mnemonic::CLV => self.p.remove(Status::OVERFLOW),

            // Unofficial opcodes
            Mnemonic::NOP => {
                // The wide NOP variants still perform their operand read.
                if addressing.references_memory() {
                    let _ = bus.read(addr);
                }
            }
            Mnemonic::LAX => {
                let value = bus.read(addr);
                self.a = value;
                self.x = value;
                self.p.set_zn(value);
            }
            Mnemonic::SAX => bus.write(addr, self.a & self.x),
            Mnemonic::DCP => {
                let value = bus.read(addr).wrapping_sub(1);
                bus.write(addr, value);
                self.compare(self.a, value);
            }
            Mnemonic::ISC => {
                let value = bus.read(addr).wrapping_add(1);
                bus.write(addr, value);
                self.adc(value ^ 0xFF);
            }
            Mnemonic::SLO => {
                let value = bus.read(addr);
                let shifted = self.asl(value);
                bus.write(addr, shifted);
                self.ora(shifted);
            }
            Mnemonic::RLA => {
                let value = bus.read(addr);
                let rotated = self.rol(value);
                bus.write(addr, rotated);
                self.and(rotated);
            }
            Mnemonic::SRE => {
                let value = bus.read(addr);
                let shifted = self.lsr(value);
                bus.write(addr, shifted);
                self.eor(shifted);
            }
            Mnemonic::RRA => {
                let value = bus.read(addr);
                let rotated = self.ror(value);
                bus.write(addr, rotated);
                self.adc(rotated);
            }

            Mnemonic::JAM => unreachable!("jam rejected before execution"),
        }

        if !mnemonic.modifies_pc() {
            self.pc = pc.wrapping_add(addressing.instruction_len());
        }

        let cycles = CYCLE_TABLE[opcode as usize].total(operand.page_crossed, branch_taken);
        Ok(cycles as u32)
    }

    /// Computes the effective address for `addressing`, reading operand bytes
    /// from `pc + 1..`. Page crossings are recorded for the cycle penalty.
    fn resolve(&mut self, bus: &mut CpuBus<'_>, addressing: Addressing, pc: u16) -> Operand {
        match addressing {
            Addressing::Implied | Addressing::Accumulator => Operand::default(),
            Addressing::Immediate => Operand::at(pc.wrapping_add(1)),
            Addressing::ZeroPage => Operand::at(bus.read(pc.wrapping_add(1)) as u16),
            Addressing::ZeroPageX => {
                let base = bus.read(pc.wrapping_add(1));
                Operand::at(base.wrapping_add(self.x) as u16)
            }
            Addressing::ZeroPageY => {
                let base = bus.read(pc.wrapping_add(1));
                Operand::at(base.wrapping_add(self.y) as u16)
            }
            Addressing::Absolute => Operand::at(bus.read_word(pc.wrapping_add(1))),
            Addressing::AbsoluteX => {
                let base = bus.read_word(pc.wrapping_add(1));
                Operand::crossing(base.wrapping_add(self.x as u16), base)
            }
            Addressing::AbsoluteY => {
                let base = bus.read_word(pc.wrapping_add(1));
                Operand::crossing(base.wrapping_add(self.y as u16), base)
            }
            Addressing::Indirect => {
                let pointer = bus.read_word(pc.wrapping_add(1));
                let lo = bus.read(pointer);
                // 6502 bug: the high byte is fetched without carrying into
                // the pointer's page.
                let hi_addr = if pointer & 0x00FF == 0x00FF {
                    pointer & 0xFF00
                } else {
                    pointer + 1
                };
                let hi = bus.read(hi_addr);
                Operand::at(u16::from_le_bytes([lo, hi]))
            }
            Addressing::IndirectX => {
                let zp = bus.read(pc.wrapping_add(1)).wrapping_add(self.x);
                let lo = bus.read(zp as u16);
                let hi = bus.read(zp.wrapping_add(1) as u16);
                Operand::at(u16::from_le_bytes([lo, hi]))
            }
            Addressing::IndirectY => {
                let zp = bus.read(pc.wrapping_add(1));
                let lo = bus.read(zp as u16);
                let hi = bus.read(zp.wrapping_add(1) as u16);
                let base = u16::from_le_bytes([lo, hi]);
                Operand::crossing(base.wrapping_add(self.y as u16), base)
            }
            Addressing::Relative => {
                let offset = bus.read(pc.wrapping_add(1)) as i8;
                let target = pc.wrapping_add(2).wrapping_add(offset as u16);
                // The cross reference point is the operand byte's address.
                Operand::crossing(target, pc.wrapping_add(1))
            }
        }
    }

    /// Takes (or skips) a branch. Returns `true` when taken.
    fn branch(&mut self, condition: bool, target: u16, pc: u16) -> bool {
        if condition {
            self.pc = target;
        } else {
            self.pc = pc.wrapping_add(2);
        }
        condition
    }

    /// Shared read-modify-write path for shifts, rotates, and INC/DEC.
    fn read_modify_write(
        &mut self,
        bus: &mut CpuBus<'_>,
        addressing: Addressing,
        addr: u16,
        op: fn(&mut Cpu, u8) -> u8,
    ) {
        if addressing == Addressing::Accumulator {
            self.a = op(self, self.a);
        } else {
            let value = bus.read(addr);
            let result = op(self, value);
            bus.write(addr, result);
        }
    }

    fn adc(&mut self, value: u8) {
        let carry = self.p.c() as u16;
        let sum = self.a as u16 + value as u16 + carry;
        let result = sum as u8;
        self.p.set_c(sum > 0xFF);
        self.p
            .set_v((!(self.a ^ value) & (self.a ^ result) & 0x80) != 0);
        self.a = result;
        self.p.set_zn(result);
    }

    fn and(&mut self, value: u8) {
        self.a &= value;
        self.p.set_zn(self.a);
    }

    fn ora(&mut self, value: u8) {
        self.a |= value;
        self.p.set_zn(self.a);
    }

    fn eor(&mut self, value: u8) {
        self.a ^= value;
        self.p.set_zn(self.a);
    }

    fn compare(&mut self, register: u8, value: u8) {
        let diff = register.wrapping_sub(value);
        self.p.set_c(register >= value);
        self.p.set_zn(diff);
    }

    fn asl(&mut self, value: u8) -> u8 {
        self.p.set_c(value & 0x80 != 0);
        let result = value << 1;
        self.p.set_zn(result);
        result
    }

    fn lsr(&mut self, value: u8) -> u8 {
        self.p.set_c(value & 0x01 != 0);
        let result = value >> 1;
        self.p.set_zn(result);
        result
    }

    fn rol(&mut self, value: u8) -> u8 {
        let carry_in = self.p.c() as u8;
        self.p.set_c(value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.p.set_zn(result);
        result
    }

    fn ror(&mut self, value: u8) -> u8 {
        let carry_in = (self.p.c() as u8) << 7;
        self.p.set_c(value & 0x01 != 0);
        let result = (value >> 1) | carry_in;
        self.p.set_zn(result);
        result
    }

    fn inc(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.p.set_zn(result);
        result
    }

    fn dec(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.p.set_zn(result);
        result
    }

    fn push(&mut self, bus: &mut CpuBus<'_>, value: u8) {
        bus.write(cpu_mem::STACK_PAGE_START | self.s as u16, value);
        self.s = self.s.wrapping_sub(1);
    }

    fn push_word(&mut self, bus: &mut CpuBus<'_>, value: u16) {
        self.push(bus, (value >> 8) as u8);
        self.push(bus, value as u8);
    }

    fn pull(&mut self, bus: &mut CpuBus<'_>) -> u8 {
        self.s = self.s.wrapping_add(1);
        bus.read(cpu_mem::STACK_PAGE_START | self.s as u16)
    }

    fn pull_word(&mut self, bus: &mut CpuBus<'_>) -> u16 {
        let lo = self.pull(bus);
        let hi = self.pull(bus);
        u16::from_le_bytes([lo, hi])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apu::Apu;
    use crate::controller::Controller;
    use crate::mem_block::cpu as cpu_ram;
    use crate::ppu::Ppu;

    /// Owns the devices a `CpuBus` borrows; programs live in internal RAM so
    /// no cartridge is needed.
    struct Devices {
        ram: cpu_ram::Ram,
        ppu: Ppu,
        apu: Apu,
        controller: Controller,
    }

    impl Devices {
        fn new() -> Self {
            Self {
                ram: cpu_ram::Ram::new(),
                ppu: Ppu::new(),
                apu: Apu::new(),
                controller: Controller::new(),
            }
        }

        fn bus(&mut self) -> CpuBus<'_> {
            CpuBus {
                ram: &mut self.ram,
                ppu: &mut self.ppu,
                apu: &mut self.apu,
                cartridge: None,
                controller: &mut self.controller,
                cycles: 0,
                dma_stall: None,
            }
        }

        fn load(&mut self, addr: u16, bytes: &[u8]) {
            let start = addr as usize;
            self.ram[start..start + bytes.len()].copy_from_slice(bytes);
        }
    }

    fn cpu_at(pc: u16) -> Cpu {
        let mut cpu = Cpu::new();
        cpu.pc = pc;
        cpu
    }

    fn exec(cpu: &mut Cpu, devices: &mut Devices) -> u32 {
        let mut bus = devices.bus();
        cpu.execute_instruction(&mut bus).expect("instruction executes")
    }

    #[test]
    fn adc_reports_carry_zero_and_signed_overflow() {
        let mut devices = Devices::new();
        devices.load(0x0200, &[0x69, 0x50]); // ADC #$50
        let mut cpu = cpu_at(0x0200);
        cpu.a = 0x50;
        exec(&mut cpu, &mut devices);
        assert_eq!(cpu.a, 0xA0);
        assert!(cpu.p.contains(Status::OVERFLOW), "0x50 + 0x50 overflows");
        assert!(cpu.p.contains(Status::NEGATIVE));
        assert!(!cpu.p.c());

        devices.load(0x0210, &[0x69, 0x01]); // ADC #$01
        let mut cpu = cpu_at(0x0210);
        cpu.a = 0xFF;
        exec(&mut cpu, &mut devices);
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.p.c());
        assert!(cpu.p.contains(Status::ZERO));
        assert!(!cpu.p.contains(Status::OVERFLOW));
    }

    #[test]
    fn sbc_is_adc_of_the_complement() {
        let mut devices = Devices::new();
        devices.load(0x0200, &[0xE9, 0x3F]); // SBC #$3F
        let mut cpu = cpu_at(0x0200);
        cpu.a = 0x40;
        cpu.p.set_c(true); // no borrow
        exec(&mut cpu, &mut devices);
        assert_eq!(cpu.a, 0x01);
        assert!(cpu.p.c(), "no borrow needed");

        devices.load(0x0210, &[0xE9, 0x41]); // SBC #$41
        let mut cpu = cpu_at(0x0210);
        cpu.a = 0x40;
        cpu.p.set_c(true);
        exec(&mut cpu, &mut devices);
        assert_eq!(cpu.a, 0xFF);
        assert!(!cpu.p.c(), "borrow clears carry");
    }

    #[test]
    fn compare_orders_register_against_memory() {
        let mut devices = Devices::new();
        devices.load(0x0200, &[0xC9, 0x30]); // CMP #$30
        for (a, carry, zero) in [(0x40u8, true, false), (0x30, true, true), (0x20, false, false)] {
            let mut cpu = cpu_at(0x0200);
            cpu.a = a;
            exec(&mut cpu, &mut devices);
            assert_eq!(cpu.p.c(), carry, "A={a:#04X}");
            assert_eq!(cpu.p.contains(Status::ZERO), zero, "A={a:#04X}");
        }
    }

    #[test]
    fn rotates_circulate_through_carry() {
        let mut devices = Devices::new();
        devices.load(0x0200, &[0x6A]); // ROR A
        let mut cpu = cpu_at(0x0200);
        cpu.a = 0x01;
        cpu.p.set_c(true);
        exec(&mut cpu, &mut devices);
        assert_eq!(cpu.a, 0x80, "carry enters bit 7");
        assert!(cpu.p.c(), "ejected bit lands in carry");

        devices.load(0x0210, &[0x2A]); // ROL A
        let mut cpu = cpu_at(0x0210);
        cpu.a = 0x80;
        exec(&mut cpu, &mut devices);
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.p.c());
        assert!(cpu.p.contains(Status::ZERO));
    }

    #[test]
    fn bit_copies_memory_bits_into_v_and_n() {
        let mut devices = Devices::new();
        devices.load(0x0010, &[0xC0]);
        devices.load(0x0200, &[0x24, 0x10]); // BIT $10
        let mut cpu = cpu_at(0x0200);
        cpu.a = 0x3F;
        exec(&mut cpu, &mut devices);
        assert!(cpu.p.contains(Status::ZERO), "A & M == 0");
        assert!(cpu.p.contains(Status::OVERFLOW), "bit 6 of M");
        assert!(cpu.p.contains(Status::NEGATIVE), "bit 7 of M");
    }

    #[test]
    fn rmw_writes_the_shifted_value_back() {
        let mut devices = Devices::new();
        devices.load(0x0010, &[0x81]);
        devices.load(0x0200, &[0x06, 0x10]); // ASL $10
        let mut cpu = cpu_at(0x0200);
        exec(&mut cpu, &mut devices);
        assert_eq!(devices.ram[0x10], 0x02);
        assert!(cpu.p.c(), "bit 7 ejected");
    }

    #[test]
    fn jsr_and_rts_round_trip() {
        let mut devices = Devices::new();
        devices.load(0x0200, &[0x20, 0x20, 0x02]); // JSR $0220
        devices.load(0x0220, &[0x60]); // RTS
        let mut cpu = cpu_at(0x0200);

        exec(&mut cpu, &mut devices);
        assert_eq!(cpu.pc, 0x0220);
        // The pushed return address is the JSR's last byte.
        assert_eq!(devices.ram[0x01FD], 0x02);
        assert_eq!(devices.ram[0x01FC], 0x02);

        exec(&mut cpu, &mut devices);
        assert_eq!(cpu.pc, 0x0203, "RTS resumes after the JSR");
        assert_eq!(cpu.s, 0xFD);
    }

    #[test]
    fn brk_pushes_pc_plus_two_with_b_set() {
        let mut devices = Devices::new();
        devices.load(0x0200, &[0x00]); // BRK
        let mut cpu = cpu_at(0x0200);
        exec(&mut cpu, &mut devices);

        assert_eq!(devices.ram[0x01FD], 0x02, "pushed PC high");
        assert_eq!(devices.ram[0x01FC], 0x02, "pushed PC low");
        assert_eq!(devices.ram[0x01FB] & 0x30, 0x30, "B and U set");
        assert!(cpu.p.contains(Status::INTERRUPT));
    }

    #[test]
    fn hardware_interrupt_pushes_b_clear_and_costs_seven() {
        let mut devices = Devices::new();
        let mut cpu = cpu_at(0x1234);
        let mut bus = devices.bus();
        let cost = cpu.interrupt(&mut bus, cpu_mem::NMI_VECTOR);
        drop(bus);

        assert_eq!(cost, 7);
        assert_eq!(devices.ram[0x01FD], 0x12);
        assert_eq!(devices.ram[0x01FC], 0x34);
        assert_eq!(devices.ram[0x01FB] & 0x30, 0x20, "B clear, U set");
        assert!(cpu.p.contains(Status::INTERRUPT));
    }

    #[test]
    fn read_instructions_pay_the_cross_penalty_in_ram_too() {
        let mut devices = Devices::new();
        devices.load(0x0200, &[0xBD, 0xFF, 0x02]); // LDA $02FF,X
        let mut cpu = cpu_at(0x0200);
        cpu.x = 0x01;
        assert_eq!(exec(&mut cpu, &mut devices), 5);

        devices.load(0x0210, &[0xBD, 0x00, 0x02]); // LDA $0200,X
        let mut cpu = cpu_at(0x0210);
        cpu.x = 0x01;
        assert_eq!(exec(&mut cpu, &mut devices), 4);
    }
}
