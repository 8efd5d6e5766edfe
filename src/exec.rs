use crate::cpu::{Cpu, Flags, Trap};
use crate::decoder::Op;
use crate::memory::Bus;
use crate::output::Output;

pub trait Executor {
    /// Apply `op` to registers `a` and `b`. For `LDI` and `ADDI`, `b` is an
    /// immediate value rather than a register index.
    fn exec<B: Bus, O: Output>(
        &self,
        cpu: &mut Cpu,
        bus: &mut B,
        out: &mut O,
        op: Op,
        a: u8,
        b: u8,
    ) -> Result<(), Trap>;
}

/// The arithmetic/logic unit. All results wrap modulo 256.
pub struct Alu;

impl Executor for Alu {
    fn exec<B: Bus, O: Output>(
        &self,
        cpu: &mut Cpu,
        bus: &mut B,
        out: &mut O,
        op: Op,
        a: u8,
        b: u8,
    ) -> Result<(), Trap> {
        match op {
            Op::Add => {
                let rhs = cpu.get(b)?;
                let ra = cpu.reg_mut(a)?;
                *ra = ra.wrapping_add(rhs);
            }
            Op::Addi => {
                let ra = cpu.reg_mut(a)?;
                *ra = ra.wrapping_add(b);
            }
            Op::Mul => {
                let rhs = cpu.get(b)?;
                let ra = cpu.reg_mut(a)?;
                *ra = ra.wrapping_mul(rhs);
            }
            Op::Mod => {
                let rhs = cpu.get(b)?;
                if rhs == 0 {
                    return Err(Trap::DivideByZero { reg: b });
                }
                let ra = cpu.reg_mut(a)?;
                *ra %= rhs;
            }
            Op::And => {
                let rhs = cpu.get(b)?;
                *cpu.reg_mut(a)? &= rhs;
            }
            Op::Or => {
                let rhs = cpu.get(b)?;
                *cpu.reg_mut(a)? |= rhs;
            }
            Op::Not => {
                let ra = cpu.reg_mut(a)?;
                *ra = !*ra;
            }
            Op::Shl => {
                let rhs = cpu.get(b)?;
                let ra = cpu.reg_mut(a)?;
                // bits shifted past the top are dropped
                *ra = ra.checked_shl(rhs as u32).unwrap_or(0);
            }
            Op::Shr => {
                let rhs = cpu.get(b)?;
                let ra = cpu.reg_mut(a)?;
                *ra = ra.checked_shr(rhs as u32).unwrap_or(0);
            }
            Op::St => {
                let rhs = cpu.get(b)?;
                *cpu.reg_mut(a)? = rhs;
            }
            Op::Ldi => {
                *cpu.reg_mut(a)? = b;
            }
            Op::Prn => {
                out.emit(cpu.get(a)?);
            }
            Op::Hlt => {
                cpu.running = false;
            }
            Op::Push => {
                cpu.push(bus, a)?;
            }
            Op::Pop => {
                cpu.pop(bus, a)?;
            }
            Op::Cmp => {
                let equal = cpu.get(a)? == cpu.get(b)?;
                cpu.fl = Flags::empty();
                cpu.fl.set(Flags::E, equal);
            }
            Op::Ret | Op::Call | Op::Jmp | Op::Jeq | Op::Jne | Op::Xor => {
                return Err(Trap::UnsupportedAluOperation { op });
            }
        }
        Ok(())
    }
}
