use std::fmt::Write as _;

use anyhow::Error;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::decoder::{Decoded, Decoder, Handler, Op};
use crate::disasm::fmt_decoded;
use crate::exec::Executor;
use crate::memory::Bus;
use crate::output::Output;

/// Interrupt mask register (reserved, never driven).
pub const IM: u8 = 5;
/// Interrupt status register (reserved, never driven).
pub const IS: u8 = 6;
/// Stack pointer register.
pub const SP: u8 = 7;

pub const STACK_TOP: u8 = 0xF4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuConfig {
    pub stack_top: u8,          // initial SP; the stack grows down from here
    pub max_steps: Option<u64>, // `run` traps once this many instructions executed
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            stack_top: STACK_TOP,
            max_steps: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cpu {
    pub pc: u8,        // Program Counter
    pub ir: u8,        // Instruction Register (last fetched opcode)
    pub fl: Flags,     // Flags
    pub reg: [u8; 8],  // R0..R7, R7 is SP
    pub running: bool,
    pub cfg: CpuConfig,
}

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags: u8 {
const E = 1 << 0; // Equal
const G = 1 << 1; // Greater (reserved)
const L = 1 << 2; // Less (reserved)
}
}

#[derive(thiserror::Error, Debug)]
pub enum Trap {
    #[error("Unsupported instruction {opcode:#010b} at {pc:#04x}")]
    UnsupportedOpcode { pc: u8, opcode: u8 },
    #[error("Unsupported ALU operation {op:?}")]
    UnsupportedAluOperation { op: Op },
    #[error("Divide by zero (divisor R{reg})")]
    DivideByZero { reg: u8 },
    #[error("Invalid register R{index}")]
    InvalidRegister { index: u8 },
    #[error("Step limit of {steps} instructions reached")]
    StepLimit { steps: u64 },
    #[error("Bus error at {addr:#04x}: {source}")]
    Bus { addr: u8, #[source] source: Error },
}

impl Cpu {
    pub fn new(cfg: CpuConfig) -> Self {
        let mut cpu = Self {
            pc: 0,
            ir: 0,
            fl: Flags::empty(),
            reg: [0; 8],
            running: true,
            cfg,
        };
        cpu.reg[SP as usize] = cfg.stack_top;
        cpu
    }

    /// Clear all state and start again at `reset_pc`.
    pub fn reset(&mut self, reset_pc: u8) {
        *self = Self::new(self.cfg);
        self.pc = reset_pc;
    }

    pub fn get(&self, index: u8) -> Result<u8, Trap> {
        self.reg
            .get(index as usize)
            .copied()
            .ok_or(Trap::InvalidRegister { index })
    }

    pub fn reg_mut(&mut self, index: u8) -> Result<&mut u8, Trap> {
        self.reg
            .get_mut(index as usize)
            .ok_or(Trap::InvalidRegister { index })
    }

    pub fn sp(&self) -> u8 {
        self.reg[SP as usize]
    }

    /// `SP -= 1; mem[SP] = R[a]`. With `a == SP` the decremented SP is stored.
    pub fn push<B: Bus>(&mut self, bus: &mut B, a: u8) -> Result<(), Trap> {
        self.get(a)?;
        let addr = self.sp().wrapping_sub(1);
        self.reg[SP as usize] = addr;
        let val = self.get(a)?;
        bus.write_u8(addr, val)
            .map_err(|source| Trap::Bus { addr, source })
    }

    /// `R[a] = mem[SP]; SP += 1`. With `a == SP` the popped value is incremented.
    pub fn pop<B: Bus>(&mut self, bus: &mut B, a: u8) -> Result<(), Trap> {
        let addr = self.sp();
        let val = bus
            .read_u8(addr)
            .map_err(|source| Trap::Bus { addr, source })?;
        *self.reg_mut(a)? = val;
        self.reg[SP as usize] = self.sp().wrapping_add(1);
        Ok(())
    }

    pub fn step<B: Bus, D: Decoder, X: Executor, O: Output>(
        &mut self,
        bus: &mut B,
        dec: &D,
        exec: &X,
        out: &mut O,
    ) -> Result<(), Trap> {
        let pc = self.pc;
        let d = dec.decode(bus, pc)?;
        self.ir = d.opcode;
        tracing::debug!(pc, insn = %fmt_decoded(&d), "exec");
        match d.handler {
            Handler::Alu => {
                // HLT has width 0, so PC stays on it
                self.pc = pc.wrapping_add(d.width);
                exec.exec(self, bus, out, d.op, d.a, d.b)
            }
            Handler::Call => self.call(bus, exec, out, pc, &d),
            Handler::Ret => {
                exec.exec(self, bus, out, Op::Pop, SP, 0)?;
                self.pc = self.sp();
                Ok(())
            }
            Handler::Jmp => self.jump(d.a),
            Handler::Jeq => {
                if self.fl.contains(Flags::E) {
                    self.jump(d.a)
                } else {
                    self.pc = pc.wrapping_add(d.width);
                    Ok(())
                }
            }
            Handler::Jne => {
                if !self.fl.contains(Flags::E) {
                    self.jump(d.a)
                } else {
                    self.pc = pc.wrapping_add(d.width);
                    Ok(())
                }
            }
            Handler::Xor => self.xor(bus, exec, out, pc, &d),
        }
    }

    /// Step until HLT. Returns the number of instructions executed.
    pub fn run<B: Bus, D: Decoder, X: Executor, O: Output>(
        &mut self,
        bus: &mut B,
        dec: &D,
        exec: &X,
        out: &mut O,
    ) -> Result<u64, Trap> {
        let mut steps = 0u64;
        while self.running {
            if let Some(max) = self.cfg.max_steps {
                if steps >= max {
                    tracing::warn!(steps, pc = self.pc, "step limit reached");
                    return Err(Trap::StepLimit { steps });
                }
            }
            if tracing::enabled!(tracing::Level::TRACE) {
                let line = self.trace_line(bus)?;
                tracing::trace!("{line}");
            }
            if let Err(trap) = self.step(bus, dec, exec, out) {
                tracing::warn!(%trap, pc = self.pc, steps, "emulation aborted");
                return Err(trap);
            }
            steps += 1;
        }
        tracing::info!(steps, "halted");
        Ok(steps)
    }

    /// `TRACE: PC | b0 b1 b2 | R0 .. R7`, all two digit uppercase hex.
    pub fn trace_line<B: Bus>(&self, bus: &mut B) -> Result<String, Trap> {
        let mut line = format!("TRACE: {:02X} |", self.pc);
        for i in 0..3u8 {
            let addr = self.pc.wrapping_add(i);
            let b = bus
                .read_u8(addr)
                .map_err(|source| Trap::Bus { addr, source })?;
            let _ = write!(line, " {b:02X}");
        }
        line.push_str(" |");
        for r in self.reg {
            let _ = write!(line, " {r:02X}");
        }
        Ok(line)
    }

    fn jump(&mut self, a: u8) -> Result<(), Trap> {
        self.pc = self.get(a)?;
        Ok(())
    }

    /// The return address goes into SP and is then pushed, so SP ends at
    /// `ret - 1` with `mem[ret - 1] == ret - 1`. RET pops it back into SP and
    /// jumps to `mem[SP] + 1`. This overwrites the CALL operand byte and the
    /// old stack pointer, so calls do not nest.
    fn call<B: Bus, X: Executor, O: Output>(
        &mut self,
        bus: &mut B,
        exec: &X,
        out: &mut O,
        pc: u8,
        d: &Decoded,
    ) -> Result<(), Trap> {
        self.get(d.a)?;
        self.reg[SP as usize] = pc.wrapping_add(d.width);
        exec.exec(self, bus, out, Op::Push, SP, 0)?;
        self.pc = self.get(d.a)?;
        Ok(())
    }

    /// XOR built from ALU gates: (a | b) & !(a & b).
    ///
    /// R[a+2] is used as scratch and is clobbered; programs must not keep
    /// live data there (or pass it as `b`) across an XOR.
    fn xor<B: Bus, X: Executor, O: Output>(
        &mut self,
        bus: &mut B,
        exec: &X,
        out: &mut O,
        pc: u8,
        d: &Decoded,
    ) -> Result<(), Trap> {
        let (a, b) = (d.a, d.b);
        let c = a.wrapping_add(2);
        self.get(b)?;
        let va = self.get(a)?;
        *self.reg_mut(c)? = va;
        exec.exec(self, bus, out, Op::Or, a, b)?;
        exec.exec(self, bus, out, Op::And, c, b)?;
        exec.exec(self, bus, out, Op::Not, c, 0)?;
        exec.exec(self, bus, out, Op::And, a, c)?;
        self.pc = pc.wrapping_add(d.width);
        Ok(())
    }
}
