use anyhow::{Context, Result};
use std::path::Path;

use ls8_rs::loader::load_file;

#[derive(Debug, Clone)]
pub struct Image {
    pub name: String,
    pub bytes: Vec<u8>,
}

pub fn load_program(path: &Path) -> Result<Image> {
    let bytes = load_file(path).with_context(|| format!("loading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "program".into());
    Ok(Image { name, bytes })
}

pub fn read_u8(img: &Image, addr: u8) -> Option<u8> {
    img.bytes.get(addr as usize).copied()
}
