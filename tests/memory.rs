use ls8_rs::exec::Alu;
use ls8_rs::isa::ls8::Ls8Decoder;
use ls8_rs::{Bus, Cpu, CpuConfig, Ram};

fn step_n(cpu: &mut Cpu, mem: &mut Ram, n: usize) {
    let dec = Ls8Decoder::new();
    let mut out = Vec::<u8>::new();
    for _ in 0..n {
        cpu.step(mem, &dec, &Alu, &mut out).unwrap();
    }
}

#[test]
fn push_then_pop_restores_register_and_sp() {
    for v in [0u8, 1, 0x7F, 0xFF] {
        // LDI R0,v; PUSH R0; POP R0
        let mut mem = Ram::new();
        mem.load(&[0b1000_0010, 0, v, 0b0100_0101, 0, 0b0100_0110, 0]).unwrap();
        let mut cpu = Cpu::new(CpuConfig::default());
        step_n(&mut cpu, &mut mem, 2);
        assert_eq!(cpu.sp(), 0xF3);
        assert_eq!(mem.read_u8(0xF3).unwrap(), v);
        step_n(&mut cpu, &mut mem, 1);
        assert_eq!(cpu.reg[0], v);
        assert_eq!(cpu.sp(), 0xF4);
    }
}

#[test]
fn pop_into_other_register_moves_value() {
    // LDI R0,9; PUSH R0; POP R4
    let mut mem = Ram::new();
    mem.load(&[0b1000_0010, 0, 9, 0b0100_0101, 0, 0b0100_0110, 4]).unwrap();
    let mut cpu = Cpu::new(CpuConfig::default());
    step_n(&mut cpu, &mut mem, 3);
    assert_eq!(cpu.reg[4], 9);
    assert_eq!(cpu.reg[0], 9);
}

#[test]
fn stack_pointer_wraps_below_zero() {
    let mut mem = Ram::new();
    mem.load(&[0b0100_0101, 0]).unwrap();
    let mut cpu = Cpu::new(CpuConfig { stack_top: 0, max_steps: None });
    cpu.reg[0] = 0x5A;
    step_n(&mut cpu, &mut mem, 1);
    assert_eq!(cpu.sp(), 0xFF);
    assert_eq!(mem.mem[0xFF], 0x5A);
}

#[test]
fn operand_reads_go_through_latches() {
    let mut mem = Ram::new();
    mem.load(&[0b1000_0010, 2, 0x33]).unwrap();
    let mut cpu = Cpu::new(CpuConfig::default());
    step_n(&mut cpu, &mut mem, 1);
    assert_eq!(mem.mar, 2);
    assert_eq!(mem.mdr, 0x33);
}

#[test]
fn push_r7_stores_decremented_sp() {
    let mut mem = Ram::new();
    mem.load(&[0b0100_0101, 7]).unwrap();
    let mut cpu = Cpu::new(CpuConfig::default());
    step_n(&mut cpu, &mut mem, 1);
    assert_eq!(cpu.sp(), 0xF3);
    assert_eq!(mem.mem[0xF3], 0xF3);
}

#[test]
fn pop_r7_increments_popped_value() {
    let mut mem = Ram::new();
    mem.load(&[0b0100_0110, 7]).unwrap();
    mem.mem[0xF4] = 0x40;
    let mut cpu = Cpu::new(CpuConfig::default());
    step_n(&mut cpu, &mut mem, 1);
    assert_eq!(cpu.sp(), 0x41);
}
