use anyhow::{anyhow, bail, Result};
use std::collections::HashMap;
use std::fmt::Write as _;

use ls8_rs::instructions::{by_mnemonic, AddrMode, InstrDesc};
use ls8_rs::memory::MEM_SIZE;

/// One source statement turned into bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembled {
    pub addr: u8,
    pub bytes: Vec<u8>,
    pub source: String,
}

#[derive(Debug, Clone)]
enum Item {
    Instr { desc: &'static InstrDesc, args: Vec<String> },
    Byte(Arg),
}

#[derive(Debug, Clone)]
enum Arg {
    Num(u8),
    Label(String),
}

struct Stmt {
    line: usize,
    addr: usize,
    item: Item,
    source: String,
}

fn parse_num(s: &str) -> Option<u32> {
    let t = s.trim();
    if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = t.strip_prefix("0b").or_else(|| t.strip_prefix("0B")) {
        u32::from_str_radix(bin, 2).ok()
    } else {
        t.parse::<u32>().ok()
    }
}

fn parse_reg(s: &str) -> Option<u8> {
    let r = s.trim();
    let idx = r.strip_prefix('R').or_else(|| r.strip_prefix('r'))?;
    idx.parse::<u8>().ok().filter(|&i| i < 8)
}

fn parse_arg(s: &str) -> Result<Arg> {
    let t = s.trim();
    if t.starts_with(|c: char| c.is_ascii_digit()) {
        let v = parse_num(t).ok_or_else(|| anyhow!("bad number: {t}"))?;
        let v = u8::try_from(v).map_err(|_| anyhow!("{t} does not fit in a byte"))?;
        Ok(Arg::Num(v))
    } else if !t.is_empty() && t.chars().all(|c| c.is_alphanumeric() || c == '_') {
        Ok(Arg::Label(t.to_string()))
    } else {
        Err(anyhow!("bad operand: {t:?}"))
    }
}

fn resolve(arg: &Arg, labels: &HashMap<String, usize>) -> Result<u8> {
    match arg {
        Arg::Num(v) => Ok(*v),
        Arg::Label(name) => {
            let &addr = labels
                .get(name)
                .ok_or_else(|| anyhow!("undefined label: {name}"))?;
            u8::try_from(addr).map_err(|_| anyhow!("{name} = {addr} does not fit in a byte"))
        }
    }
}

fn strip_comment(line: &str) -> &str {
    let end = line.find(|c: char| c == ';' || c == '#').unwrap_or(line.len());
    line[..end].trim()
}

/// Assemble LS-8 source.
///
/// ```text
/// ; comments start with ';' or '#'
/// start:  LDI R0, 8
///         PRN R0
///         LDI R1, start   ; labels resolve to addresses
///         .byte 0b1010
///         HLT
/// ```
pub fn assemble(src: &str) -> Result<Vec<Assembled>> {
    let mut labels: HashMap<String, usize> = HashMap::new();
    let mut stmts: Vec<Stmt> = Vec::new();
    let mut addr = 0usize;

    // Pass 1: addresses and labels
    for (idx, raw) in src.lines().enumerate() {
        let line = idx + 1;
        let mut s = strip_comment(raw);
        if let Some((name, rest)) = s.split_once(':') {
            let name = name.trim();
            if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                bail!("line {line}: bad label {name:?}");
            }
            if labels.insert(name.to_string(), addr).is_some() {
                bail!("line {line}: duplicate label {name}");
            }
            s = rest.trim();
        }
        if s.is_empty() {
            continue;
        }
        let (head, rest) = s.split_once(char::is_whitespace).unwrap_or((s, ""));
        let item = if head.eq_ignore_ascii_case(".byte") {
            Item::Byte(parse_arg(rest).map_err(|e| anyhow!("line {line}: {e}"))?)
        } else {
            let desc = by_mnemonic(head).ok_or_else(|| anyhow!("line {line}: unknown mnemonic {head}"))?;
            let args: Vec<String> = if rest.trim().is_empty() {
                Vec::new()
            } else {
                rest.split(',').map(|a| a.trim().to_string()).collect()
            };
            let want = match desc.mode {
                AddrMode::None => 0,
                AddrMode::Reg => 1,
                AddrMode::RegReg | AddrMode::RegImm => 2,
            };
            if args.len() != want {
                bail!("line {line}: {} takes {want} operand(s), got {}", desc.mnemonic, args.len());
            }
            Item::Instr { desc, args }
        };
        let size = match &item {
            Item::Instr { args, .. } => 1 + args.len(),
            Item::Byte(_) => 1,
        };
        stmts.push(Stmt { line, addr, item, source: s.to_string() });
        addr += size;
        if addr > MEM_SIZE {
            bail!("line {line}: program exceeds {MEM_SIZE} bytes");
        }
    }

    // Pass 2: encode
    let mut out = Vec::with_capacity(stmts.len());
    for st in stmts {
        let line = st.line;
        let ctx = |e: anyhow::Error| anyhow!("line {line}: {e}");
        let bytes = match &st.item {
            Item::Byte(arg) => vec![resolve(arg, &labels).map_err(ctx)?],
            Item::Instr { desc, args } => {
                let mut bytes = vec![desc.opcode];
                for (i, a) in args.iter().enumerate() {
                    let imm = desc.mode == AddrMode::RegImm && i == 1;
                    let b = if imm {
                        resolve(&parse_arg(a).map_err(ctx)?, &labels).map_err(ctx)?
                    } else {
                        parse_reg(a).ok_or_else(|| anyhow!("line {line}: bad register {a:?}"))?
                    };
                    bytes.push(b);
                }
                bytes
            }
        };
        out.push(Assembled { addr: st.addr as u8, bytes, source: st.source });
    }
    Ok(out)
}

/// Render as `.ls8` program text: one binary byte per line, the first byte of
/// each statement annotated with its source.
pub fn render_ls8(prog: &[Assembled]) -> String {
    let mut buf = String::new();
    for a in prog {
        for (i, b) in a.bytes.iter().enumerate() {
            if i == 0 {
                let _ = writeln!(buf, "{b:08b} # {}", a.source);
            } else {
                let _ = writeln!(buf, "{b:08b}");
            }
        }
    }
    buf
}

pub fn flatten(prog: &[Assembled]) -> Vec<u8> {
    prog.iter().flat_map(|a| a.bytes.iter().copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ls8_rs::loader::parse_program;
    use pretty_assertions::assert_eq;

    #[test]
    fn assembles_print8() {
        let prog = assemble("LDI R0, 8\nPRN R0 ; print\nHLT\n").unwrap();
        assert_eq!(flatten(&prog), vec![0b1000_0010, 0, 8, 0b0100_0111, 0, 0b0000_0001]);
    }

    #[test]
    fn labels_resolve_forward_and_back() {
        let src = "\
top:    LDI R1, sub
        CALL R1
        HLT
sub:    LDI R2, top
        RET
";
        let prog = assemble(src).unwrap();
        let bytes = flatten(&prog);
        assert_eq!(bytes[2], 6);
        assert_eq!(&bytes[6..9], &[0b1000_0010, 2, 0]);
    }

    #[test]
    fn numbers_and_byte_directive() {
        let prog = assemble("ADDI r3, 0x10\n.byte 0b101\nldi R0, 255\n").unwrap();
        assert_eq!(flatten(&prog), vec![0b1010_0001, 3, 16, 5, 0b1000_0010, 0, 255]);
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = assemble("HLT\nFOO R0\n").unwrap_err();
        assert!(err.to_string().starts_with("line 2:"));
        let err = assemble("LDI R9, 1\n").unwrap_err();
        assert!(err.to_string().contains("bad register"));
        let err = assemble("LDI R0, nowhere\n").unwrap_err();
        assert!(err.to_string().contains("undefined label"));
        let err = assemble("ADD R0\n").unwrap_err();
        assert!(err.to_string().contains("takes 2 operand(s)"));
        assert!(assemble("LDI R0, 256\n").is_err());
        assert!(assemble("a:\na:\n").is_err());
    }

    #[test]
    fn label_past_end_of_memory_is_rejected() {
        // 253 bytes of padding and LDI fill memory, so `end` sits at 256
        let src = format!("LDI R0, end\n{}end:\n", ".byte 0\n".repeat(253));
        let err = assemble(&src).unwrap_err();
        assert!(err.to_string().contains("end = 256 does not fit in a byte"), "{err}");
        let src = format!("LDI R0, end\n{}end:\n", ".byte 0\n".repeat(252));
        assert_eq!(flatten(&assemble(&src).unwrap())[2], 255);
    }

    #[test]
    fn rendered_text_loads_back() {
        let prog = assemble("LDI R0, 5\nLDI R1, 6\nMUL R0, R1\nPRN R0\nHLT\n").unwrap();
        let text = render_ls8(&prog);
        assert!(text.starts_with("10000010 # LDI R0, 5\n00000000\n00000101\n"));
        assert_eq!(parse_program(&text).unwrap(), flatten(&prog));
    }
}
