use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cpu::Trap;
use crate::memory::Bus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    Hlt,
    Ret,
    Push,
    Pop,
    Prn,
    Call,
    Jmp,
    Jeq,
    Jne,
    Not,
    Ldi,
    St,
    Add,
    Addi,
    Mul,
    Mod,
    Cmp,
    And,
    Or,
    Xor,
    Shl,
    Shr,
}

/// How the execution loop routes a decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handler {
    /// Advance PC by the instruction width, then run the ALU.
    Alu,
    Call,
    Ret,
    Jmp,
    Jeq,
    Jne,
    Xor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded {
    pub op: Op,
    pub handler: Handler,
    pub opcode: u8,
    pub width: u8, // 0, 2 or 3
    pub operands: u8,
    pub a: u8,
    pub b: u8,
}

/// Number of operand bytes following `opcode`, taken from its two high bits.
pub fn operand_count(opcode: u8) -> u8 {
    let bits = opcode.view_bits::<Msb0>();
    match (bits[0], bits[1]) {
        (true, false) => 2,
        (false, true) => 1,
        _ => 0,
    }
}

pub trait Decoder {
    /// Decode the instruction at `pc`, reading its operand bytes through `bus`.
    /// PC itself is left to the caller.
    fn decode<B: Bus>(&self, bus: &mut B, pc: u8) -> Result<Decoded, Trap>;
}

/// Read `count` operand bytes following `pc`. Missing operands read as zero.
pub fn fetch_operands<B: Bus>(bus: &mut B, pc: u8, count: u8) -> Result<(u8, u8), Trap> {
    let mut ops = [0u8; 2];
    for (i, slot) in ops.iter_mut().enumerate().take(count as usize) {
        let addr = pc.wrapping_add(1 + i as u8);
        *slot = bus
            .read_u8(addr)
            .map_err(|source| Trap::Bus { addr, source })?;
    }
    Ok((ops[0], ops[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Ram;

    #[test]
    fn arity_from_high_bits() {
        assert_eq!(operand_count(0b1000_0010), 2);
        assert_eq!(operand_count(0b0100_0111), 1);
        assert_eq!(operand_count(0b0000_0001), 0);
        assert_eq!(operand_count(0b0001_0001), 0);
        // 11 is not a valid arity pattern
        assert_eq!(operand_count(0b1100_0000), 0);
    }

    #[test]
    fn operands_wrap_past_end_of_memory() {
        let mut ram = Ram::new();
        ram.mem[255] = 0x82;
        ram.mem[0] = 3;
        ram.mem[1] = 9;
        assert_eq!(fetch_operands(&mut ram, 255, 2).unwrap(), (3, 9));
        assert_eq!(fetch_operands(&mut ram, 255, 1).unwrap(), (3, 0));
        assert_eq!(fetch_operands(&mut ram, 255, 0).unwrap(), (0, 0));
    }
}
