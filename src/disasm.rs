use crate::decoder::Decoded;
use crate::instructions::{by_op, AddrMode};

pub fn fmt_decoded(d: &Decoded) -> String {
    let Some(desc) = by_op(d.op) else {
        return format!(".byte {:#010b}", d.opcode);
    };
    let mn = desc.mnemonic;
    match desc.mode {
        AddrMode::None => mn.to_string(),
        AddrMode::Reg => format!("{mn} R{}", d.a),
        AddrMode::RegReg => format!("{mn} R{}, R{}", d.a, d.b),
        AddrMode::RegImm => format!("{mn} R{}, {}", d.a, d.b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Decoder;
    use crate::isa::ls8::Ls8Decoder;
    use crate::memory::Ram;

    fn text(bytes: &[u8]) -> String {
        let mut ram = Ram::new();
        ram.load(bytes).unwrap();
        fmt_decoded(&Ls8Decoder::new().decode(&mut ram, 0).unwrap())
    }

    #[test]
    fn formats_each_mode() {
        assert_eq!(text(&[0b0000_0001]), "HLT");
        assert_eq!(text(&[0b0100_0111, 3]), "PRN R3");
        assert_eq!(text(&[0b1010_0010, 0, 1]), "MUL R0, R1");
        assert_eq!(text(&[0b1000_0010, 2, 200]), "LDI R2, 200");
    }
}
