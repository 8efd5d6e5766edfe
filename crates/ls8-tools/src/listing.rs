use ls8_rs::decoder::Decoder;
use ls8_rs::disasm::fmt_decoded;
use ls8_rs::isa::ls8::Ls8Decoder;
use ls8_rs::Ram;
use serde::Serialize;

use crate::model::{read_u8, Image};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub addr: u8,
    pub bytes: Vec<u8>,
    pub text: String,
}

/// Linear sweep over the image. Bytes that are not opcodes become `.byte`.
pub fn listing(img: &Image) -> Vec<Line> {
    let mut mem = Ram::new();
    let len = img.bytes.len().min(ls8_rs::memory::MEM_SIZE);
    mem.mem[..len].copy_from_slice(&img.bytes[..len]);
    let dec = Ls8Decoder::new();

    let mut out = Vec::new();
    let mut off = 0usize;
    while off < len {
        let addr = off as u8;
        let (size, text) = match dec.decode(&mut mem, addr) {
            // HLT and RET have width 0; the listing still steps over the opcode
            Ok(d) => (1 + d.operands as usize, fmt_decoded(&d)),
            Err(_) => (1, format!(".byte {:#010b}", mem.mem[off])),
        };
        let bytes = (0..size)
            .filter_map(|i| read_u8(img, addr.wrapping_add(i as u8)))
            .take(len - off)
            .collect();
        out.push(Line { addr, bytes, text });
        off += size;
    }
    out
}
