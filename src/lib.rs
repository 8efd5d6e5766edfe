pub mod cpu;
pub mod decoder;
pub mod exec;
pub mod disasm;
pub mod instructions;
pub mod loader;
pub mod memory;
pub mod output;

pub mod isa {
    pub mod ls8; // LS-8 opcode table and decoder
}

pub use cpu::{Cpu, CpuConfig, Flags, Trap};
pub use memory::{Bus, Ram};
pub use output::{Output, StdoutSink};
