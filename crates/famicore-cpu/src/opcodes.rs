//! Opcode definitions and the decode table for the 6502 CPU.
//!
//! Only the 151 documented opcodes are populated; the remaining table
//! entries are `None` and decode as illegal instructions.

use crate::addressing::AddrMode;

/// Instruction operations, one variant per documented mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)] // Mnemonics are their own documentation.
pub enum Op {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
}

/// Decoded opcode information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    /// Operation to perform.
    pub op: Op,
    /// How the operand is resolved.
    pub mode: AddrMode,
    /// Base cycle count, before page-cross and branch penalties.
    pub cycles: u8,
    /// Whether a page crossing during operand resolution costs +1 cycle.
    pub page_penalty: bool,
}

const fn entry(op: Op, mode: AddrMode, cycles: u8) -> Option<Opcode> {
    Some(Opcode {
        op,
        mode,
        cycles,
        page_penalty: false,
    })
}

/// Entry for read instructions that pay +1 cycle when indexing crosses a page.
const fn entry_pc(op: Op, mode: AddrMode, cycles: u8) -> Option<Opcode> {
    Some(Opcode {
        op,
        mode,
        cycles,
        page_penalty: true,
    })
}

/// 256-entry decode table indexed by opcode byte. Holes are illegal opcodes.
pub const OPCODE_TABLE: [Option<Opcode>; 256] = {
    use AddrMode::{
        Absolute, AbsoluteX, AbsoluteY, Accumulator, Immediate, Implied, IndexedIndirect,
        Indirect, IndirectIndexed, Relative, ZeroPage, ZeroPageX, ZeroPageY,
    };

    let mut t: [Option<Opcode>; 256] = [None; 256];

    // ADC - Add with Carry
    t[0x69] = entry(Op::Adc, Immediate, 2);
    t[0x65] = entry(Op::Adc, ZeroPage, 3);
    t[0x75] = entry(Op::Adc, ZeroPageX, 4);
    t[0x6D] = entry(Op::Adc, Absolute, 4);
    t[0x7D] = entry_pc(Op::Adc, AbsoluteX, 4);
    t[0x79] = entry_pc(Op::Adc, AbsoluteY, 4);
    t[0x61] = entry(Op::Adc, IndexedIndirect, 6);
    t[0x71] = entry_pc(Op::Adc, IndirectIndexed, 5);

    // AND - Logical AND
    t[0x29] = entry(Op::And, Immediate, 2);
    t[0x25] = entry(Op::And, ZeroPage, 3);
    t[0x35] = entry(Op::And, ZeroPageX, 4);
    t[0x2D] = entry(Op::And, Absolute, 4);
    t[0x3D] = entry_pc(Op::And, AbsoluteX, 4);
    t[0x39] = entry_pc(Op::And, AbsoluteY, 4);
    t[0x21] = entry(Op::And, IndexedIndirect, 6);
    t[0x31] = entry_pc(Op::And, IndirectIndexed, 5);

    // ASL - Arithmetic Shift Left
    t[0x0A] = entry(Op::Asl, Accumulator, 2);
    t[0x06] = entry(Op::Asl, ZeroPage, 5);
    t[0x16] = entry(Op::Asl, ZeroPageX, 6);
    t[0x0E] = entry(Op::Asl, Absolute, 6);
    t[0x1E] = entry(Op::Asl, AbsoluteX, 7);

    // Branches (all 2 cycles base; taken/page penalties handled in execution)
    t[0x90] = entry(Op::Bcc, Relative, 2);
    t[0xB0] = entry(Op::Bcs, Relative, 2);
    t[0xF0] = entry(Op::Beq, Relative, 2);
    t[0x30] = entry(Op::Bmi, Relative, 2);
    t[0xD0] = entry(Op::Bne, Relative, 2);
    t[0x10] = entry(Op::Bpl, Relative, 2);
    t[0x50] = entry(Op::Bvc, Relative, 2);
    t[0x70] = entry(Op::Bvs, Relative, 2);

    // BIT - Bit Test
    t[0x24] = entry(Op::Bit, ZeroPage, 3);
    t[0x2C] = entry(Op::Bit, Absolute, 4);

    // BRK - Force Interrupt
    t[0x00] = entry(Op::Brk, Implied, 7);

    // Flag operations
    t[0x18] = entry(Op::Clc, Implied, 2);
    t[0xD8] = entry(Op::Cld, Implied, 2);
    t[0x58] = entry(Op::Cli, Implied, 2);
    t[0xB8] = entry(Op::Clv, Implied, 2);
    t[0x38] = entry(Op::Sec, Implied, 2);
    t[0xF8] = entry(Op::Sed, Implied, 2);
    t[0x78] = entry(Op::Sei, Implied, 2);

    // CMP - Compare Accumulator
    t[0xC9] = entry(Op::Cmp, Immediate, 2);
    t[0xC5] = entry(Op::Cmp, ZeroPage, 3);
    t[0xD5] = entry(Op::Cmp, ZeroPageX, 4);
    t[0xCD] = entry(Op::Cmp, Absolute, 4);
    t[0xDD] = entry_pc(Op::Cmp, AbsoluteX, 4);
    t[0xD9] = entry_pc(Op::Cmp, AbsoluteY, 4);
    t[0xC1] = entry(Op::Cmp, IndexedIndirect, 6);
    t[0xD1] = entry_pc(Op::Cmp, IndirectIndexed, 5);

    // CPX / CPY - Compare Index Registers
    t[0xE0] = entry(Op::Cpx, Immediate, 2);
    t[0xE4] = entry(Op::Cpx, ZeroPage, 3);
    t[0xEC] = entry(Op::Cpx, Absolute, 4);
    t[0xC0] = entry(Op::Cpy, Immediate, 2);
    t[0xC4] = entry(Op::Cpy, ZeroPage, 3);
    t[0xCC] = entry(Op::Cpy, Absolute, 4);

    // DEC / DEX / DEY
    t[0xC6] = entry(Op::Dec, ZeroPage, 5);
    t[0xD6] = entry(Op::Dec, ZeroPageX, 6);
    t[0xCE] = entry(Op::Dec, Absolute, 6);
    t[0xDE] = entry(Op::Dec, AbsoluteX, 7);
    t[0xCA] = entry(Op::Dex, Implied, 2);
    t[0x88] = entry(Op::Dey, Implied, 2);

    // EOR - Exclusive OR
    t[0x49] = entry(Op::Eor, Immediate, 2);
    t[0x45] = entry(Op::Eor, ZeroPage, 3);
    t[0x55] = entry(Op::Eor, ZeroPageX, 4);
    t[0x4D] = entry(Op::Eor, Absolute, 4);
    t[0x5D] = entry_pc(Op::Eor, AbsoluteX, 4);
    t[0x59] = entry_pc(Op::Eor, AbsoluteY, 4);
    t[0x41] = entry(Op::Eor, IndexedIndirect, 6);
    t[0x51] = entry_pc(Op::Eor, IndirectIndexed, 5);

    // INC / INX / INY
    t[0xE6] = entry(Op::Inc, ZeroPage, 5);
    t[0xF6] = entry(Op::Inc, ZeroPageX, 6);
    t[0xEE] = entry(Op::Inc, Absolute, 6);
    t[0xFE] = entry(Op::Inc, AbsoluteX, 7);
    t[0xE8] = entry(Op::Inx, Implied, 2);
    t[0xC8] = entry(Op::Iny, Implied, 2);

    // JMP / JSR
    t[0x4C] = entry(Op::Jmp, Absolute, 3);
    t[0x6C] = entry(Op::Jmp, Indirect, 5);
    t[0x20] = entry(Op::Jsr, Absolute, 6);

    // LDA - Load Accumulator
    t[0xA9] = entry(Op::Lda, Immediate, 2);
    t[0xA5] = entry(Op::Lda, ZeroPage, 3);
    t[0xB5] = entry(Op::Lda, ZeroPageX, 4);
    t[0xAD] = entry(Op::Lda, Absolute, 4);
    t[0xBD] = entry_pc(Op::Lda, AbsoluteX, 4);
    t[0xB9] = entry_pc(Op::Lda, AbsoluteY, 4);
    t[0xA1] = entry(Op::Lda, IndexedIndirect, 6);
    t[0xB1] = entry_pc(Op::Lda, IndirectIndexed, 5);

    // LDX / LDY
    t[0xA2] = entry(Op::Ldx, Immediate, 2);
    t[0xA6] = entry(Op::Ldx, ZeroPage, 3);
    t[0xB6] = entry(Op::Ldx, ZeroPageY, 4);
    t[0xAE] = entry(Op::Ldx, Absolute, 4);
    t[0xBE] = entry_pc(Op::Ldx, AbsoluteY, 4);
    t[0xA0] = entry(Op::Ldy, Immediate, 2);
    t[0xA4] = entry(Op::Ldy, ZeroPage, 3);
    t[0xB4] = entry(Op::Ldy, ZeroPageX, 4);
    t[0xAC] = entry(Op::Ldy, Absolute, 4);
    t[0xBC] = entry_pc(Op::Ldy, AbsoluteX, 4);

    // LSR - Logical Shift Right
    t[0x4A] = entry(Op::Lsr, Accumulator, 2);
    t[0x46] = entry(Op::Lsr, ZeroPage, 5);
    t[0x56] = entry(Op::Lsr, ZeroPageX, 6);
    t[0x4E] = entry(Op::Lsr, Absolute, 6);
    t[0x5E] = entry(Op::Lsr, AbsoluteX, 7);

    // NOP
    t[0xEA] = entry(Op::Nop, Implied, 2);

    // ORA - Logical Inclusive OR
    t[0x09] = entry(Op::Ora, Immediate, 2);
    t[0x05] = entry(Op::Ora, ZeroPage, 3);
    t[0x15] = entry(Op::Ora, ZeroPageX, 4);
    t[0x0D] = entry(Op::Ora, Absolute, 4);
    t[0x1D] = entry_pc(Op::Ora, AbsoluteX, 4);
    t[0x19] = entry_pc(Op::Ora, AbsoluteY, 4);
    t[0x01] = entry(Op::Ora, IndexedIndirect, 6);
    t[0x11] = entry_pc(Op::Ora, IndirectIndexed, 5);

    // Stack operations
    t[0x48] = entry(Op::Pha, Implied, 3);
    t[0x08] = entry(Op::Php, Implied, 3);
    t[0x68] = entry(Op::Pla, Implied, 4);
    t[0x28] = entry(Op::Plp, Implied, 4);

    // ROL / ROR - Rotates
    t[0x2A] = entry(Op::Rol, Accumulator, 2);
    t[0x26] = entry(Op::Rol, ZeroPage, 5);
    t[0x36] = entry(Op::Rol, ZeroPageX, 6);
    t[0x2E] = entry(Op::Rol, Absolute, 6);
    t[0x3E] = entry(Op::Rol, AbsoluteX, 7);
    t[0x6A] = entry(Op::Ror, Accumulator, 2);
    t[0x66] = entry(Op::Ror, ZeroPage, 5);
    t[0x76] = entry(Op::Ror, ZeroPageX, 6);
    t[0x6E] = entry(Op::Ror, Absolute, 6);
    t[0x7E] = entry(Op::Ror, AbsoluteX, 7);

    // RTI / RTS
    t[0x40] = entry(Op::Rti, Implied, 6);
    t[0x60] = entry(Op::Rts, Implied, 6);

    // SBC - Subtract with Carry
    t[0xE9] = entry(Op::Sbc, Immediate, 2);
    t[0xE5] = entry(Op::Sbc, ZeroPage, 3);
    t[0xF5] = entry(Op::Sbc, ZeroPageX, 4);
    t[0xED] = entry(Op::Sbc, Absolute, 4);
    t[0xFD] = entry_pc(Op::Sbc, AbsoluteX, 4);
    t[0xF9] = entry_pc(Op::Sbc, AbsoluteY, 4);
    t[0xE1] = entry(Op::Sbc, IndexedIndirect, 6);
    t[0xF1] = entry_pc(Op::Sbc, IndirectIndexed, 5);

    // STA - Store Accumulator (indexed stores never pay the page penalty;
    // the fixup cycle is folded into the base count)
    t[0x85] = entry(Op::Sta, ZeroPage, 3);
    t[0x95] = entry(Op::Sta, ZeroPageX, 4);
    t[0x8D] = entry(Op::Sta, Absolute, 4);
    t[0x9D] = entry(Op::Sta, AbsoluteX, 5);
    t[0x99] = entry(Op::Sta, AbsoluteY, 5);
    t[0x81] = entry(Op::Sta, IndexedIndirect, 6);
    t[0x91] = entry(Op::Sta, IndirectIndexed, 6);

    // STX / STY
    t[0x86] = entry(Op::Stx, ZeroPage, 3);
    t[0x96] = entry(Op::Stx, ZeroPageY, 4);
    t[0x8E] = entry(Op::Stx, Absolute, 4);
    t[0x84] = entry(Op::Sty, ZeroPage, 3);
    t[0x94] = entry(Op::Sty, ZeroPageX, 4);
    t[0x8C] = entry(Op::Sty, Absolute, 4);

    // Register transfers
    t[0xAA] = entry(Op::Tax, Implied, 2);
    t[0xA8] = entry(Op::Tay, Implied, 2);
    t[0xBA] = entry(Op::Tsx, Implied, 2);
    t[0x8A] = entry(Op::Txa, Implied, 2);
    t[0x9A] = entry(Op::Txs, Implied, 2);
    t[0x98] = entry(Op::Tya, Implied, 2);

    t
};
