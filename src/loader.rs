use std::path::{Path, PathBuf};

use crate::memory::{Bus, MEM_SIZE};

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("{}: not found", .path.display())]
    NotFound { path: PathBuf },
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {text:?} is not an 8-bit binary literal")]
    Parse { line: usize, text: String },
    #[error("program is {len} bytes, memory holds {}", MEM_SIZE)]
    TooLarge { len: usize },
}

/// Parse LS-8 program text: one base-2 byte per line, `#` starts a comment,
/// blank and comment-only lines are skipped.
pub fn parse_program(src: &str) -> Result<Vec<u8>, LoadError> {
    let mut bytes = Vec::new();
    for (idx, raw) in src.lines().enumerate() {
        let num = raw.split('#').next().unwrap_or("").trim();
        if num.is_empty() {
            continue;
        }
        let byte = u8::from_str_radix(num, 2).map_err(|_| LoadError::Parse {
            line: idx + 1,
            text: num.to_string(),
        })?;
        bytes.push(byte);
    }
    if bytes.len() > MEM_SIZE {
        return Err(LoadError::TooLarge { len: bytes.len() });
    }
    Ok(bytes)
}

pub fn load_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    let src = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound { path: path.to_path_buf() }
        } else {
            LoadError::Io { path: path.to_path_buf(), source }
        }
    })?;
    let bytes = parse_program(&src)?;
    tracing::debug!(path = %path.display(), len = bytes.len(), "program loaded");
    Ok(bytes)
}

/// Write `program` into memory from address 0.
pub fn load_into<B: Bus>(bus: &mut B, program: &[u8]) -> anyhow::Result<()> {
    if program.len() > MEM_SIZE {
        return Err(LoadError::TooLarge { len: program.len() }.into());
    }
    for (addr, &byte) in program.iter().enumerate() {
        bus.write_u8(addr as u8, byte)?;
    }
    Ok(())
}
