//! 6502 CPU core.
//!
//! The interpreter executes whole instructions: fetch, decode through
//! [`crate::opcodes::OPCODE_TABLE`], resolve the addressing mode, execute,
//! and account cycles. Pending interrupts are serviced at instruction
//! boundaries only.

use crate::CpuError;
use crate::addressing::{AddrMode, Operand};
use crate::instructions;
use crate::opcodes::OPCODE_TABLE;
use crate::status::Status;
use crate::vectors;

/// Cycles consumed by the NMI/IRQ entry sequence (and charged for RESET).
const INTERRUPT_CYCLES: u8 = 7;

/// Memory seam between the CPU and the rest of the system.
///
/// The CPU issues plain byte reads and writes; address translation,
/// register dispatch, and DMA all live behind this trait.
pub trait Bus {
    /// Read one byte.
    fn read(&mut self, addr: u16) -> u8;

    /// Write one byte.
    fn write(&mut self, addr: u16, value: u8);

    /// Read a little-endian word as two independent byte reads.
    fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr);
        let hi = self.read(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Cycles the bus spent on DMA since the last call, to be charged
    /// against the CPU budget. Implementations without DMA return 0.
    fn take_dma_stall(&mut self) -> u32 {
        0
    }
}

/// Interrupt kinds that can be latched with [`Cpu::set_interrupt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Interrupt {
    /// Maskable interrupt; ignored while the I flag is set.
    Irq,
    /// Non-maskable interrupt, raised by the PPU at VBlank entry.
    Nmi,
    /// Power/reset line.
    Reset,
}

/// NES 6502 CPU (Ricoh 2A03 core, BCD absent but the D flag latches).
#[derive(Debug)]
pub struct Cpu {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Program counter.
    pub pc: u16,
    /// Stack pointer; the stack lives at $0100-$01FF.
    pub sp: u8,
    /// Status flags.
    pub status: Status,
    /// Total cycles executed, DMA stalls included.
    pub cycles: u64,
    /// Latched interrupt, serviced at the next instruction boundary.
    pending: Option<Interrupt>,
    /// Set when an illegal opcode was fetched; the CPU then burns one
    /// cycle per step until reset.
    jammed: bool,
    /// The fault that jammed the CPU, for the host to surface.
    fault: Option<CpuError>,
}

impl Cpu {
    /// Create a CPU in the pre-reset state. Call [`Cpu::reset`] before
    /// executing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            pc: 0,
            sp: 0xFD,
            status: Status::RESET,
            cycles: 0,
            pending: None,
            jammed: false,
            fault: None,
        }
    }

    /// Run the RESET sequence: SP to $FD, I set, PC from the reset vector.
    pub fn reset(&mut self, bus: &mut impl Bus) {
        self.sp = 0xFD;
        self.status = Status::RESET;
        self.pc = bus.read_word(vectors::RESET);
        self.pending = None;
        self.jammed = false;
        self.fault = None;
        self.cycles += u64::from(INTERRUPT_CYCLES);
    }

    /// Latch a pending interrupt. A higher-priority kind replaces a lower
    /// one (Reset > NMI > IRQ); the reverse is dropped.
    pub fn set_interrupt(&mut self, kind: Interrupt) {
        match self.pending {
            Some(current) if current >= kind => {}
            _ => self.pending = Some(kind),
        }
    }

    /// Execute one instruction (servicing a pending interrupt first) and
    /// return its cycle cost, page-cross and branch penalties included.
    pub fn step(&mut self, bus: &mut impl Bus) -> u8 {
        // A jammed CPU only listens to the reset line.
        if self.jammed && self.pending != Some(Interrupt::Reset) {
            self.cycles += 1;
            return 1;
        }

        if let Some(kind) = self.take_serviceable_interrupt() {
            return match kind {
                Interrupt::Reset => {
                    self.reset(bus);
                    INTERRUPT_CYCLES
                }
                Interrupt::Nmi => self.interrupt(bus, vectors::NMI),
                Interrupt::Irq => self.interrupt(bus, vectors::IRQ),
            };
        }

        let opcode = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);

        let Some(info) = OPCODE_TABLE[opcode as usize] else {
            return self.jam(opcode);
        };

        let operand = self.fetch_operand(info.mode, bus);
        let extra = instructions::execute(self, bus, info.op, operand);
        let penalty = u8::from(info.page_penalty && operand.page_crossed());

        let total = info.cycles + extra + penalty;
        self.cycles += u64::from(total);
        total
    }

    /// Execute whole instructions until `budget` cycles are met or
    /// exceeded, then return the non-positive overrun. The caller adds the
    /// overrun to the next budget so long-term timing stays exact.
    ///
    /// DMA stalls reported by the bus are charged here, between
    /// instructions, which is where the 6502 pauses for OAM DMA.
    pub fn emulate(&mut self, bus: &mut impl Bus, budget: i32) -> i32 {
        let mut remaining = budget;
        while remaining > 0 {
            let spent = i32::from(self.step(bus));
            let stall = bus.take_dma_stall();
            self.cycles += u64::from(stall);
            remaining -= spent + stall as i32;
        }
        remaining
    }

    /// Total cycles executed since power-on.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Whether an illegal opcode has halted the CPU.
    #[must_use]
    pub fn is_jammed(&self) -> bool {
        self.jammed
    }

    /// The fault that jammed the CPU, if any.
    #[must_use]
    pub fn fault(&self) -> Option<&CpuError> {
        self.fault.as_ref()
    }

    fn take_serviceable_interrupt(&mut self) -> Option<Interrupt> {
        match self.pending {
            // IRQ stays latched while masked.
            Some(Interrupt::Irq) if self.status.contains(Status::I) => None,
            taken => {
                self.pending = None;
                taken
            }
        }
    }

    /// NMI/IRQ entry: push PC and status (B clear), set I, load the vector.
    fn interrupt(&mut self, bus: &mut impl Bus, vector: u16) -> u8 {
        self.push_word(bus, self.pc);
        self.push_byte(bus, self.status.to_stack_byte(false));
        self.status.insert(Status::I);
        self.pc = bus.read_word(vector);
        self.cycles += u64::from(INTERRUPT_CYCLES);
        INTERRUPT_CYCLES
    }

    fn jam(&mut self, opcode: u8) -> u8 {
        let at = self.pc.wrapping_sub(1);
        log::warn!("illegal opcode 0x{opcode:02X} at 0x{at:04X}; CPU jammed");
        self.jammed = true;
        self.fault = Some(CpuError::IllegalOpcode(opcode, at));
        self.cycles += 1;
        1
    }

    /// Resolve the operand for `mode`, consuming operand bytes at PC.
    fn fetch_operand(&mut self, mode: AddrMode, bus: &mut impl Bus) -> Operand {
        match mode {
            AddrMode::Implied => Operand::None,
            AddrMode::Accumulator => Operand::Accumulator,
            AddrMode::Immediate => {
                let addr = self.pc;
                self.pc = self.pc.wrapping_add(1);
                Operand::Address {
                    addr,
                    page_crossed: false,
                }
            }
            AddrMode::ZeroPage => {
                let addr = u16::from(self.fetch_byte(bus));
                Operand::Address {
                    addr,
                    page_crossed: false,
                }
            }
            AddrMode::ZeroPageX => {
                let addr = u16::from(self.fetch_byte(bus).wrapping_add(self.x));
                Operand::Address {
                    addr,
                    page_crossed: false,
                }
            }
            AddrMode::ZeroPageY => {
                let addr = u16::from(self.fetch_byte(bus).wrapping_add(self.y));
                Operand::Address {
                    addr,
                    page_crossed: false,
                }
            }
            AddrMode::Absolute => {
                let addr = self.fetch_word(bus);
                Operand::Address {
                    addr,
                    page_crossed: false,
                }
            }
            AddrMode::AbsoluteX => self.indexed(bus, self.x),
            AddrMode::AbsoluteY => self.indexed(bus, self.y),
            AddrMode::Indirect => {
                // JMP ($xxFF) fetches the high byte from $xx00: the pointer
                // increment never carries into the high byte.
                let ptr = self.fetch_word(bus);
                let lo = bus.read(ptr);
                let hi = bus.read((ptr & 0xFF00) | u16::from((ptr as u8).wrapping_add(1)));
                Operand::Address {
                    addr: u16::from_le_bytes([lo, hi]),
                    page_crossed: false,
                }
            }
            AddrMode::IndexedIndirect => {
                let zp = self.fetch_byte(bus).wrapping_add(self.x);
                let lo = bus.read(u16::from(zp));
                let hi = bus.read(u16::from(zp.wrapping_add(1)));
                Operand::Address {
                    addr: u16::from_le_bytes([lo, hi]),
                    page_crossed: false,
                }
            }
            AddrMode::IndirectIndexed => {
                let zp = self.fetch_byte(bus);
                let lo = bus.read(u16::from(zp));
                let hi = bus.read(u16::from(zp.wrapping_add(1)));
                let base = u16::from_le_bytes([lo, hi]);
                let addr = base.wrapping_add(u16::from(self.y));
                Operand::Address {
                    addr,
                    page_crossed: (base & 0xFF00) != (addr & 0xFF00),
                }
            }
            AddrMode::Relative => {
                let offset = self.fetch_byte(bus) as i8;
                let target = self.pc.wrapping_add(offset as u16);
                Operand::Address {
                    addr: target,
                    page_crossed: (self.pc & 0xFF00) != (target & 0xFF00),
                }
            }
        }
    }

    fn indexed(&mut self, bus: &mut impl Bus, index: u8) -> Operand {
        let base = self.fetch_word(bus);
        let addr = base.wrapping_add(u16::from(index));
        Operand::Address {
            addr,
            page_crossed: (base & 0xFF00) != (addr & 0xFF00),
        }
    }

    fn fetch_byte(&mut self, bus: &mut impl Bus) -> u8 {
        let value = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    fn fetch_word(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = self.fetch_byte(bus);
        let hi = self.fetch_byte(bus);
        u16::from_le_bytes([lo, hi])
    }

    pub(crate) fn push_byte(&mut self, bus: &mut dyn Bus, value: u8) {
        bus.write(0x0100 | u16::from(self.sp), value);
        self.sp = self.sp.wrapping_sub(1);
    }

    pub(crate) fn push_word(&mut self, bus: &mut dyn Bus, value: u16) {
        self.push_byte(bus, (value >> 8) as u8);
        self.push_byte(bus, (value & 0xFF) as u8);
    }

    pub(crate) fn pull_byte(&mut self, bus: &mut dyn Bus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(0x0100 | u16::from(self.sp))
    }

    pub(crate) fn pull_word(&mut self, bus: &mut dyn Bus) -> u16 {
        let lo = self.pull_byte(bus);
        let hi = self.pull_byte(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Update Z and N from a result byte.
    #[inline]
    pub(crate) fn set_zn(&mut self, value: u8) {
        self.status.set_zn(value);
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
