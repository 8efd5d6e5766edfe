use crate::decoder::{Handler, Op};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrMode {
    /// No operands.
    None,
    /// One register.
    Reg,
    /// Two registers.
    RegReg,
    /// Register and an immediate byte.
    RegImm,
}

#[derive(Debug, Clone, Copy)]
pub struct InstrDesc {
    pub opcode: u8,
    pub op: Op,
    pub mnemonic: &'static str,
    pub width: u8,
    pub mode: AddrMode,
    pub handler: Handler,
}

const fn desc(
    opcode: u8,
    op: Op,
    mnemonic: &'static str,
    width: u8,
    mode: AddrMode,
    handler: Handler,
) -> InstrDesc {
    InstrDesc {
        opcode,
        op,
        mnemonic,
        width,
        mode,
        handler,
    }
}

pub const TABLE: &[InstrDesc] = &[
    desc(0b0000_0001, Op::Hlt, "HLT", 0, AddrMode::None, Handler::Alu),
    desc(0b0001_0001, Op::Ret, "RET", 0, AddrMode::None, Handler::Ret),
    desc(0b0100_0101, Op::Push, "PUSH", 2, AddrMode::Reg, Handler::Alu),
    desc(0b0100_0110, Op::Pop, "POP", 2, AddrMode::Reg, Handler::Alu),
    desc(0b0100_0111, Op::Prn, "PRN", 2, AddrMode::Reg, Handler::Alu),
    desc(0b0101_0000, Op::Call, "CALL", 2, AddrMode::Reg, Handler::Call),
    desc(0b0101_0100, Op::Jmp, "JMP", 2, AddrMode::Reg, Handler::Jmp),
    desc(0b0101_0101, Op::Jeq, "JEQ", 2, AddrMode::Reg, Handler::Jeq),
    desc(0b0101_0110, Op::Jne, "JNE", 2, AddrMode::Reg, Handler::Jne),
    desc(0b0110_1001, Op::Not, "NOT", 2, AddrMode::Reg, Handler::Alu),
    desc(0b1000_0010, Op::Ldi, "LDI", 3, AddrMode::RegImm, Handler::Alu),
    desc(0b1000_0100, Op::St, "ST", 3, AddrMode::RegReg, Handler::Alu),
    desc(0b1010_0000, Op::Add, "ADD", 3, AddrMode::RegReg, Handler::Alu),
    desc(0b1010_0001, Op::Addi, "ADDI", 3, AddrMode::RegImm, Handler::Alu),
    desc(0b1010_0010, Op::Mul, "MUL", 3, AddrMode::RegReg, Handler::Alu),
    desc(0b1010_0100, Op::Mod, "MOD", 3, AddrMode::RegReg, Handler::Alu),
    desc(0b1010_0111, Op::Cmp, "CMP", 3, AddrMode::RegReg, Handler::Alu),
    desc(0b1010_1000, Op::And, "AND", 3, AddrMode::RegReg, Handler::Alu),
    desc(0b1010_1010, Op::Or, "OR", 3, AddrMode::RegReg, Handler::Alu),
    desc(0b1010_1011, Op::Xor, "XOR", 3, AddrMode::RegReg, Handler::Xor),
    desc(0b1010_1100, Op::Shl, "SHL", 3, AddrMode::RegReg, Handler::Alu),
    desc(0b1010_1101, Op::Shr, "SHR", 3, AddrMode::RegReg, Handler::Alu),
];

pub fn by_op(op: Op) -> Option<&'static InstrDesc> {
    TABLE.iter().find(|d| d.op == op)
}

pub fn by_mnemonic(mnemonic: &str) -> Option<&'static InstrDesc> {
    TABLE
        .iter()
        .find(|d| d.mnemonic.eq_ignore_ascii_case(mnemonic))
}
