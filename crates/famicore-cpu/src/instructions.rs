//! 6502 instruction implementations.
//!
//! [`execute`] dispatches a decoded operation against its resolved operand.
//! Shared arithmetic lives in small helpers; SBC is ADC of the complement,
//! and read-modify-write instructions keep the hardware's dummy write-back.

use crate::addressing::Operand;
use crate::cpu::{Bus, Cpu};
use crate::opcodes::Op;
use crate::status::Status;
use crate::vectors;

/// Execute `op` with `operand`, returning extra cycles beyond the opcode
/// table's base count (non-zero only for taken branches).
pub(crate) fn execute(cpu: &mut Cpu, bus: &mut dyn Bus, op: Op, operand: Operand) -> u8 {
    match op {
        // Loads and stores
        Op::Lda => {
            cpu.a = load(cpu, bus, operand);
            cpu.set_zn(cpu.a);
        }
        Op::Ldx => {
            cpu.x = load(cpu, bus, operand);
            cpu.set_zn(cpu.x);
        }
        Op::Ldy => {
            cpu.y = load(cpu, bus, operand);
            cpu.set_zn(cpu.y);
        }
        Op::Sta => bus.write(target(operand), cpu.a),
        Op::Stx => bus.write(target(operand), cpu.x),
        Op::Sty => bus.write(target(operand), cpu.y),

        // Arithmetic
        Op::Adc => {
            let value = load(cpu, bus, operand);
            add(cpu, value);
        }
        Op::Sbc => {
            // SBC is ADC of the one's complement.
            let value = load(cpu, bus, operand);
            add(cpu, !value);
        }
        Op::Cmp => {
            let value = load(cpu, bus, operand);
            compare(cpu, cpu.a, value);
        }
        Op::Cpx => {
            let value = load(cpu, bus, operand);
            compare(cpu, cpu.x, value);
        }
        Op::Cpy => {
            let value = load(cpu, bus, operand);
            compare(cpu, cpu.y, value);
        }

        // Logic
        Op::And => {
            cpu.a &= load(cpu, bus, operand);
            cpu.set_zn(cpu.a);
        }
        Op::Ora => {
            cpu.a |= load(cpu, bus, operand);
            cpu.set_zn(cpu.a);
        }
        Op::Eor => {
            cpu.a ^= load(cpu, bus, operand);
            cpu.set_zn(cpu.a);
        }
        Op::Bit => {
            let value = load(cpu, bus, operand);
            cpu.status.set(Status::Z, cpu.a & value == 0);
            cpu.status.set(Status::V, value & 0x40 != 0);
            cpu.status.set(Status::N, value & 0x80 != 0);
        }

        // Shifts and rotates
        Op::Asl => shift(cpu, bus, operand, asl_byte),
        Op::Lsr => shift(cpu, bus, operand, lsr_byte),
        Op::Rol => shift(cpu, bus, operand, rol_byte),
        Op::Ror => shift(cpu, bus, operand, ror_byte),

        // Increments and decrements
        Op::Inc => modify(cpu, bus, operand, |value| value.wrapping_add(1)),
        Op::Dec => modify(cpu, bus, operand, |value| value.wrapping_sub(1)),
        Op::Inx => {
            cpu.x = cpu.x.wrapping_add(1);
            cpu.set_zn(cpu.x);
        }
        Op::Iny => {
            cpu.y = cpu.y.wrapping_add(1);
            cpu.set_zn(cpu.y);
        }
        Op::Dex => {
            cpu.x = cpu.x.wrapping_sub(1);
            cpu.set_zn(cpu.x);
        }
        Op::Dey => {
            cpu.y = cpu.y.wrapping_sub(1);
            cpu.set_zn(cpu.y);
        }

        // Branches
        Op::Bcc => return branch(cpu, operand, !cpu.status.contains(Status::C)),
        Op::Bcs => return branch(cpu, operand, cpu.status.contains(Status::C)),
        Op::Bne => return branch(cpu, operand, !cpu.status.contains(Status::Z)),
        Op::Beq => return branch(cpu, operand, cpu.status.contains(Status::Z)),
        Op::Bpl => return branch(cpu, operand, !cpu.status.contains(Status::N)),
        Op::Bmi => return branch(cpu, operand, cpu.status.contains(Status::N)),
        Op::Bvc => return branch(cpu, operand, !cpu.status.contains(Status::V)),
        Op::Bvs => return branch(cpu, operand, cpu.status.contains(Status::V)),

        // Jumps and returns
        Op::Jmp => cpu.pc = target(operand),
        Op::Jsr => {
            // Pushes the address of the last byte of the JSR instruction.
            cpu.push_word(bus, cpu.pc.wrapping_sub(1));
            cpu.pc = target(operand);
        }
        Op::Rts => {
            cpu.pc = cpu.pull_word(bus).wrapping_add(1);
        }
        Op::Rti => {
            let pulled = cpu.pull_byte(bus);
            cpu.status = Status::from_stack_byte(pulled);
            cpu.pc = cpu.pull_word(bus);
        }
        Op::Brk => brk(cpu, bus),

        // Stack
        Op::Pha => cpu.push_byte(bus, cpu.a),
        Op::Php => cpu.push_byte(bus, cpu.status.to_stack_byte(true)),
        Op::Pla => {
            cpu.a = cpu.pull_byte(bus);
            cpu.set_zn(cpu.a);
        }
        Op::Plp => {
            let pulled = cpu.pull_byte(bus);
            cpu.status = Status::from_stack_byte(pulled);
        }

        // Register transfers
        Op::Tax => {
            cpu.x = cpu.a;
            cpu.set_zn(cpu.x);
        }
        Op::Tay => {
            cpu.y = cpu.a;
            cpu.set_zn(cpu.y);
        }
        Op::Txa => {
            cpu.a = cpu.x;
            cpu.set_zn(cpu.a);
        }
        Op::Tya => {
            cpu.a = cpu.y;
            cpu.set_zn(cpu.a);
        }
        Op::Tsx => {
            cpu.x = cpu.sp;
            cpu.set_zn(cpu.x);
        }
        Op::Txs => cpu.sp = cpu.x, // no flags

        // Flags
        Op::Clc => cpu.status.remove(Status::C),
        Op::Sec => cpu.status.insert(Status::C),
        Op::Cli => cpu.status.remove(Status::I),
        Op::Sei => cpu.status.insert(Status::I),
        Op::Clv => cpu.status.remove(Status::V),
        Op::Cld => cpu.status.remove(Status::D),
        Op::Sed => cpu.status.insert(Status::D),

        Op::Nop => {}
    }
    0
}

/// Read the operand value (memory or accumulator).
fn load(cpu: &Cpu, bus: &mut dyn Bus, operand: Operand) -> u8 {
    match operand {
        Operand::Address { addr, .. } => bus.read(addr),
        Operand::Accumulator => cpu.a,
        Operand::None => unreachable!("value operand required"),
    }
}

/// The effective address of a store or jump target.
fn target(operand: Operand) -> u16 {
    match operand {
        Operand::Address { addr, .. } => addr,
        _ => unreachable!("address operand required"),
    }
}

/// Shared ADC core; SBC feeds the complemented operand through here.
fn add(cpu: &mut Cpu, value: u8) {
    let a = u16::from(cpu.a);
    let v = u16::from(value);
    let carry = u16::from(cpu.status.contains(Status::C));

    let sum = a + v + carry;
    let result = sum as u8;

    cpu.status.set(Status::C, sum > 0xFF);
    // Signed overflow: both inputs share a sign the result does not.
    cpu.status
        .set(Status::V, (!(a ^ v) & (a ^ sum)) & 0x80 != 0);
    cpu.a = result;
    cpu.set_zn(result);
}

fn compare(cpu: &mut Cpu, register: u8, value: u8) {
    cpu.status.set(Status::C, register >= value);
    cpu.set_zn(register.wrapping_sub(value));
}

/// Taken branches cost +1 cycle, +1 more when the target crosses a page.
fn branch(cpu: &mut Cpu, operand: Operand, condition: bool) -> u8 {
    if !condition {
        return 0;
    }
    cpu.pc = target(operand);
    1 + u8::from(operand.page_crossed())
}

/// BRK pushes the address two past the opcode (one padding byte) with the
/// B flag set, then vectors through $FFFE.
fn brk(cpu: &mut Cpu, bus: &mut dyn Bus) {
    cpu.pc = cpu.pc.wrapping_add(1);
    cpu.push_word(bus, cpu.pc);
    cpu.push_byte(bus, cpu.status.to_stack_byte(true));
    cpu.status.insert(Status::I);
    cpu.pc = bus.read_word(vectors::IRQ);
}

/// Apply a shift/rotate to the accumulator or memory.
/// Memory forms write the unmodified value back first (RMW bus pattern).
fn shift(cpu: &mut Cpu, bus: &mut dyn Bus, operand: Operand, f: fn(&mut Cpu, u8) -> u8) {
    match operand {
        Operand::Accumulator => {
            cpu.a = f(cpu, cpu.a);
            cpu.set_zn(cpu.a);
        }
        Operand::Address { addr, .. } => {
            let value = bus.read(addr);
            bus.write(addr, value); // dummy write
            let result = f(cpu, value);
            bus.write(addr, result);
            cpu.set_zn(result);
        }
        Operand::None => unreachable!("shift operand required"),
    }
}

/// INC/DEC read-modify-write with the dummy write-back.
fn modify(cpu: &mut Cpu, bus: &mut dyn Bus, operand: Operand, f: fn(u8) -> u8) {
    let addr = target(operand);
    let value = bus.read(addr);
    bus.write(addr, value); // dummy write
    let result = f(value);
    bus.write(addr, result);
    cpu.set_zn(result);
}

fn asl_byte(cpu: &mut Cpu, value: u8) -> u8 {
    cpu.status.set(Status::C, value & 0x80 != 0);
    value << 1
}

fn lsr_byte(cpu: &mut Cpu, value: u8) -> u8 {
    cpu.status.set(Status::C, value & 0x01 != 0);
    value >> 1
}

fn rol_byte(cpu: &mut Cpu, value: u8) -> u8 {
    let carry_in = u8::from(cpu.status.contains(Status::C));
    cpu.status.set(Status::C, value & 0x80 != 0);
    (value << 1) | carry_in
}

fn ror_byte(cpu: &mut Cpu, value: u8) -> u8 {
    let carry_in = u8::from(cpu.status.contains(Status::C)) << 7;
    cpu.status.set(Status::C, value & 0x01 != 0);
    (value >> 1) | carry_in
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::Cpu;

    struct FlatBus {
        memory: [u8; 65536],
    }

    impl Bus for FlatBus {
        fn read(&mut self, addr: u16) -> u8 {
            self.memory[addr as usize]
        }

        fn write(&mut self, addr: u16, value: u8) {
            self.memory[addr as usize] = value;
        }
    }

    /// Run `program` from $8000 for `steps` instructions.
    fn run(program: &[u8], steps: usize) -> (Cpu, FlatBus) {
        let mut bus = FlatBus { memory: [0; 65536] };
        for (i, &byte) in program.iter().enumerate() {
            bus.memory[0x8000 + i] = byte;
        }
        bus.memory[0xFFFC] = 0x00;
        bus.memory[0xFFFD] = 0x80;

        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        for _ in 0..steps {
            cpu.step(&mut bus);
        }
        (cpu, bus)
    }

    fn flags(cpu: &Cpu) -> (bool, bool, bool, bool) {
        (
            cpu.status.contains(Status::N),
            cpu.status.contains(Status::Z),
            cpu.status.contains(Status::C),
            cpu.status.contains(Status::V),
        )
    }

    #[test]
    fn adc_carry_and_overflow() {
        // 0x50 + 0x50 = 0xA0: overflow (positive + positive = negative), no carry.
        let (cpu, _) = run(&[0xA9, 0x50, 0x69, 0x50], 2);
        assert_eq!(cpu.a, 0xA0);
        assert_eq!(flags(&cpu), (true, false, false, true));

        // 0xFF + 0x02 = 0x01 with carry out, no signed overflow.
        let (cpu, _) = run(&[0xA9, 0xFF, 0x69, 0x02], 2);
        assert_eq!(cpu.a, 0x01);
        assert_eq!(flags(&cpu), (false, false, true, false));
    }

    #[test]
    fn adc_uses_carry_in() {
        // SEC; LDA #$01; ADC #$01 -> 0x03.
        let (cpu, _) = run(&[0x38, 0xA9, 0x01, 0x69, 0x01], 3);
        assert_eq!(cpu.a, 0x03);
    }

    #[test]
    fn sbc_flags() {
        // SEC; LDA #$50; SBC #$F0 = 0x60 with borrow (C clear), no signed
        // overflow (80 - -16 = 96 fits).
        let (cpu, _) = run(&[0x38, 0xA9, 0x50, 0xE9, 0xF0], 3);
        assert_eq!(cpu.a, 0x60);
        assert_eq!(flags(&cpu), (false, false, false, false));

        // SEC; LDA #$D0; SBC #$70 = 0x60: -48 - 112 overflows, no borrow.
        let (cpu, _) = run(&[0x38, 0xA9, 0xD0, 0xE9, 0x70], 3);
        assert_eq!(cpu.a, 0x60);
        assert_eq!(flags(&cpu), (false, false, true, true));

        // SEC; LDA #$50; SBC #$10 = 0x40, no borrow.
        let (cpu, _) = run(&[0x38, 0xA9, 0x50, 0xE9, 0x10], 3);
        assert_eq!(cpu.a, 0x40);
        assert_eq!(flags(&cpu), (false, false, true, false));
    }

    #[test]
    fn cmp_sets_carry_zero_negative() {
        // LDA #$40; CMP #$40 -> Z and C.
        let (cpu, _) = run(&[0xA9, 0x40, 0xC9, 0x40], 2);
        assert_eq!(flags(&cpu), (false, true, true, false));

        // LDA #$40; CMP #$41 -> N, no C.
        let (cpu, _) = run(&[0xA9, 0x40, 0xC9, 0x41], 2);
        assert_eq!(flags(&cpu), (true, false, false, false));
    }

    #[test]
    fn bit_copies_high_bits() {
        let mut bus = FlatBus { memory: [0; 65536] };
        bus.memory[0x0010] = 0xC0;
        let program = [0xA9, 0x00, 0x24, 0x10]; // LDA #0; BIT $10
        for (i, &byte) in program.iter().enumerate() {
            bus.memory[0x8000 + i] = byte;
        }
        bus.memory[0xFFFC] = 0x00;
        bus.memory[0xFFFD] = 0x80;
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        cpu.step(&mut bus);
        cpu.step(&mut bus);

        assert!(cpu.status.contains(Status::N));
        assert!(cpu.status.contains(Status::V));
        assert!(cpu.status.contains(Status::Z)); // 0x00 & 0xC0 == 0
    }

    #[test]
    fn shifts_move_through_carry() {
        // LDA #$81; ASL A -> 0x02, C set.
        let (cpu, _) = run(&[0xA9, 0x81, 0x0A], 2);
        assert_eq!(cpu.a, 0x02);
        assert!(cpu.status.contains(Status::C));

        // LDA #$01; LSR A -> 0x00, C and Z set.
        let (cpu, _) = run(&[0xA9, 0x01, 0x4A], 2);
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.status.contains(Status::C));
        assert!(cpu.status.contains(Status::Z));

        // SEC; LDA #$80; ROL A -> 0x01 with C from bit 7.
        let (cpu, _) = run(&[0x38, 0xA9, 0x80, 0x2A], 3);
        assert_eq!(cpu.a, 0x01);
        assert!(cpu.status.contains(Status::C));

        // SEC; LDA #$01; ROR A -> 0x80 with C from bit 0.
        let (cpu, _) = run(&[0x38, 0xA9, 0x01, 0x6A], 3);
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.status.contains(Status::C));
        assert!(cpu.status.contains(Status::N));
    }

    #[test]
    fn rmw_writes_result_to_memory() {
        // INC $10 twice, DEC $10 once -> 1.
        let (_, bus) = run(&[0xE6, 0x10, 0xE6, 0x10, 0xC6, 0x10], 3);
        assert_eq!(bus.memory[0x0010], 1);
    }

    #[test]
    fn branch_cycle_accounting() {
        // BNE taken, no page cross: 3 cycles.
        let mut bus = FlatBus { memory: [0; 65536] };
        let program = [0xA9, 0x01, 0xD0, 0x02]; // LDA #1; BNE +2
        for (i, &byte) in program.iter().enumerate() {
            bus.memory[0x8000 + i] = byte;
        }
        bus.memory[0xFFFC] = 0x00;
        bus.memory[0xFFFD] = 0x80;
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        cpu.step(&mut bus);
        assert_eq!(cpu.step(&mut bus), 3);
        assert_eq!(cpu.pc, 0x8006);

        // Not taken: 2 cycles.
        let mut cpu2 = Cpu::new();
        bus.memory[0x8001] = 0x00; // LDA #0 -> Z set, BNE falls through
        cpu2.reset(&mut bus);
        cpu2.step(&mut bus);
        assert_eq!(cpu2.step(&mut bus), 2);
        assert_eq!(cpu2.pc, 0x8004);
    }

    #[test]
    fn branch_page_cross_costs_four() {
        let mut bus = FlatBus { memory: [0; 65536] };
        // BEQ at $80FD: PC after the operand is $80FF, offset +1 lands on
        // $8100, crossing a page.
        bus.memory[0x80FD] = 0xF0;
        bus.memory[0x80FE] = 0x01;
        bus.memory[0xFFFC] = 0xFD;
        bus.memory[0xFFFD] = 0x80;
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        cpu.status.insert(Status::Z);
        assert_eq!(cpu.step(&mut bus), 4);
        assert_eq!(cpu.pc, 0x8100);
    }

    #[test]
    fn jsr_rts_round_trip() {
        // JSR $8010; (at $8010) RTS.
        let (cpu, bus) = run(&[0x20, 0x10, 0x80], 1);
        // Return address on stack is $8002 (last byte of JSR).
        assert_eq!(bus.memory[0x01FD], 0x80);
        assert_eq!(bus.memory[0x01FC], 0x02);
        assert_eq!(cpu.pc, 0x8010);

        let mut bus = FlatBus { memory: [0; 65536] };
        bus.memory[0x8000] = 0x20;
        bus.memory[0x8001] = 0x10;
        bus.memory[0x8002] = 0x80;
        bus.memory[0x8010] = 0x60; // RTS
        bus.memory[0xFFFC] = 0x00;
        bus.memory[0xFFFD] = 0x80;
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        let sp0 = cpu.sp;
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        assert_eq!(cpu.pc, 0x8003);
        assert_eq!(cpu.sp, sp0);
    }

    #[test]
    fn brk_pushes_pc_plus_two_with_b_set() {
        let mut bus = FlatBus { memory: [0; 65536] };
        bus.memory[0x8000] = 0x00; // BRK
        bus.memory[0xFFFC] = 0x00;
        bus.memory[0xFFFD] = 0x80;
        bus.memory[0xFFFE] = 0x34;
        bus.memory[0xFFFF] = 0x12;
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        cpu.step(&mut bus);

        assert_eq!(cpu.pc, 0x1234);
        // Pushed return address is BRK + 2 = $8002.
        assert_eq!(bus.memory[0x01FD], 0x80);
        assert_eq!(bus.memory[0x01FC], 0x02);
        // Pushed status has B set.
        assert_ne!(bus.memory[0x01FB] & Status::B.bits(), 0);
        assert!(cpu.status.contains(Status::I));
    }

    #[test]
    fn rti_restores_status_and_pc() {
        let mut bus = FlatBus { memory: [0; 65536] };
        bus.memory[0x8000] = 0x40; // RTI
        bus.memory[0xFFFC] = 0x00;
        bus.memory[0xFFFD] = 0x80;
        // Hand-build the stack frame an interrupt would have pushed.
        bus.memory[0x01FB] = (Status::C | Status::N).bits();
        bus.memory[0x01FC] = 0x56;
        bus.memory[0x01FD] = 0x34;
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        cpu.sp = 0xFA;
        cpu.step(&mut bus);

        assert_eq!(cpu.pc, 0x3456);
        assert!(cpu.status.contains(Status::C));
        assert!(cpu.status.contains(Status::N));
        assert!(cpu.status.contains(Status::U)); // forced on
        assert!(!cpu.status.contains(Status::B)); // never restored
    }

    #[test]
    fn php_sets_b_in_pushed_copy_only() {
        let (cpu, bus) = run(&[0x08], 1); // PHP
        assert_ne!(bus.memory[0x01FD] & Status::B.bits(), 0);
        assert!(!cpu.status.contains(Status::B));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// Run LDA #a; SEC or CLC; ADC/SBC #v and return the CPU.
        fn arith(opcode: u8, a: u8, v: u8, carry: bool) -> Cpu {
            let carry_op = if carry { 0x38 } else { 0x18 };
            let (cpu, _) = run(&[0xA9, a, carry_op, opcode, v], 3);
            cpu
        }

        proptest! {
            #[test]
            fn adc_matches_wide_arithmetic(a: u8, v: u8, carry: bool) {
                let cpu = arith(0x69, a, v, carry);
                let wide = u16::from(a) + u16::from(v) + u16::from(carry);
                prop_assert_eq!(cpu.a, wide as u8);
                prop_assert_eq!(cpu.status.contains(Status::C), wide > 0xFF);
                prop_assert_eq!(cpu.status.contains(Status::Z), wide as u8 == 0);
                prop_assert_eq!(cpu.status.contains(Status::N), wide & 0x80 != 0);
            }

            #[test]
            fn sbc_matches_wide_arithmetic(a: u8, v: u8, carry: bool) {
                let cpu = arith(0xE9, a, v, carry);
                let borrow = u16::from(!carry);
                let wide = u16::from(a).wrapping_sub(u16::from(v)).wrapping_sub(borrow);
                prop_assert_eq!(cpu.a, wide as u8);
                // C is the inverted borrow.
                let no_borrow = u16::from(a) >= u16::from(v) + borrow;
                prop_assert_eq!(cpu.status.contains(Status::C), no_borrow);
            }

            #[test]
            fn compare_orders_operands(a: u8, v: u8) {
                let (cpu, _) = run(&[0xA9, a, 0xC9, v], 2);
                prop_assert_eq!(cpu.status.contains(Status::C), a >= v);
                prop_assert_eq!(cpu.status.contains(Status::Z), a == v);
                // The accumulator is never modified by CMP.
                prop_assert_eq!(cpu.a, a);
            }

            #[test]
            fn logic_ops_track_zn(a: u8, v: u8) {
                let (cpu, _) = run(&[0xA9, a, 0x29, v], 2); // AND
                prop_assert_eq!(cpu.a, a & v);
                prop_assert_eq!(cpu.status.contains(Status::Z), a & v == 0);
                prop_assert_eq!(cpu.status.contains(Status::N), (a & v) & 0x80 != 0);
            }
        }
    }

    #[test]
    fn transfers_update_flags_except_txs() {
        // LDA #$80; TAX -> N set.
        let (cpu, _) = run(&[0xA9, 0x80, 0xAA], 2);
        assert_eq!(cpu.x, 0x80);
        assert!(cpu.status.contains(Status::N));

        // LDX #$00; TXS leaves flags alone.
        let (cpu, _) = run(&[0xA2, 0x01, 0xA9, 0x00, 0x9A], 3);
        assert_eq!(cpu.sp, 0x01);
        // Z still reflects the LDA #0, untouched by TXS.
        assert!(cpu.status.contains(Status::Z));
    }
}
