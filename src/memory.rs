use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const MEM_SIZE: usize = 256;

pub trait Bus {
    fn read_u8(&mut self, addr: u8) -> Result<u8>;
    fn write_u8(&mut self, addr: u8, val: u8) -> Result<()>;
}

/// 256 byte RAM with memory address / memory data latches.
///
/// `mar` and `mdr` hold the last address and value that went through the bus;
/// they are kept for debugging only and never feed back into execution.
#[derive(Clone, Serialize, Deserialize)]
pub struct Ram {
    pub mem: Vec<u8>,
    pub mar: u8,
    pub mdr: u8,
}

impl Ram {
    pub fn new() -> Self {
        Self {
            mem: vec![0; MEM_SIZE],
            mar: 0,
            mdr: 0,
        }
    }

    /// Copy `bytes` into memory starting at address 0.
    pub fn load(&mut self, bytes: &[u8]) -> Result<()> {
        anyhow::ensure!(
            bytes.len() <= MEM_SIZE,
            "program is {} bytes, memory holds {MEM_SIZE}",
            bytes.len()
        );
        self.mem[..bytes.len()].copy_from_slice(bytes);
        Ok(())
    }
}

impl Default for Ram {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for Ram {
    fn read_u8(&mut self, addr: u8) -> Result<u8> {
        self.mar = addr;
        self.mdr = self.mem[addr as usize];
        Ok(self.mdr)
    }
    fn write_u8(&mut self, addr: u8, val: u8) -> Result<()> {
        self.mar = addr;
        self.mdr = val;
        self.mem[addr as usize] = val;
        Ok(())
    }
}
