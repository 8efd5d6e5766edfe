use crate::cpu::Trap;
use crate::decoder::{fetch_operands, operand_count, Decoded, Decoder};
use crate::instructions::{InstrDesc, TABLE};
use crate::memory::Bus;

/// LS-8 decoder.
///
/// Holds the opcode → descriptor dispatch table, built once from
/// [`TABLE`] and indexed directly by the opcode byte.
pub struct Ls8Decoder {
    lookup: [Option<&'static InstrDesc>; 256],
}

impl Ls8Decoder {
    pub fn new() -> Self {
        let mut lookup = [None; 256];
        for d in TABLE {
            lookup[d.opcode as usize] = Some(d);
        }
        Self { lookup }
    }

    pub fn describe(&self, opcode: u8) -> Option<&'static InstrDesc> {
        self.lookup[opcode as usize]
    }
}

impl Default for Ls8Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for Ls8Decoder {
    fn decode<B: Bus>(&self, bus: &mut B, pc: u8) -> Result<Decoded, Trap> {
        let opcode = bus
            .read_u8(pc)
            .map_err(|source| Trap::Bus { addr: pc, source })?;
        let desc = self
            .describe(opcode)
            .ok_or(Trap::UnsupportedOpcode { pc, opcode })?;
        let operands = operand_count(opcode);
        let (a, b) = fetch_operands(bus, pc, operands)?;
        Ok(Decoded {
            op: desc.op,
            handler: desc.handler,
            opcode,
            width: desc.width,
            operands,
            a,
            b,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{Handler, Op};
    use crate::memory::Ram;

    #[test]
    fn decodes_ldi_with_both_operands() {
        let mut ram = Ram::new();
        ram.load(&[0b1000_0010, 0, 8]).unwrap();
        let d = Ls8Decoder::new().decode(&mut ram, 0).unwrap();
        assert_eq!(d.op, Op::Ldi);
        assert_eq!(d.handler, Handler::Alu);
        assert_eq!((d.width, d.operands, d.a, d.b), (3, 2, 0, 8));
    }

    #[test]
    fn one_operand_leaves_b_zero() {
        let mut ram = Ram::new();
        ram.load(&[0b0101_0000, 2, 0xFF]).unwrap();
        let d = Ls8Decoder::new().decode(&mut ram, 0).unwrap();
        assert_eq!(d.op, Op::Call);
        assert_eq!(d.handler, Handler::Call);
        assert_eq!((d.width, d.a, d.b), (2, 2, 0));
    }

    #[test]
    fn unknown_byte_is_unsupported() {
        let mut ram = Ram::new();
        ram.load(&[0, 0b1111_1111]).unwrap();
        let dec = Ls8Decoder::new();
        assert!(matches!(
            dec.decode(&mut ram, 0),
            Err(Trap::UnsupportedOpcode { pc: 0, opcode: 0 })
        ));
        assert!(matches!(
            dec.decode(&mut ram, 1),
            Err(Trap::UnsupportedOpcode { pc: 1, opcode: 0xFF })
        ));
    }
}
