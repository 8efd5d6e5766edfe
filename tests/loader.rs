use std::path::PathBuf;

use ls8_rs::exec::Alu;
use ls8_rs::isa::ls8::Ls8Decoder;
use ls8_rs::loader::{load_file, load_into, LoadError};
use ls8_rs::{Cpu, CpuConfig, Ram};

fn temp_program(name: &str, body: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("ls8-{}-{name}", std::process::id()));
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn loads_and_runs_program_file() {
    let path = temp_program("print8.ls8", include_str!("../programs/print8.ls8"));
    let program = load_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let mut mem = Ram::new();
    load_into(&mut mem, &program).unwrap();
    let mut cpu = Cpu::new(CpuConfig::default());
    let mut out = Vec::<u8>::new();
    cpu.run(&mut mem, &Ls8Decoder::new(), &Alu, &mut out).unwrap();
    assert_eq!(out, vec![8]);
}

#[test]
fn bad_line_reports_line_number() {
    let path = temp_program("bad.ls8", "# header\n10000010\n00000000\nLDI\n");
    let err = load_file(&path).unwrap_err();
    let _ = std::fs::remove_file(&path);
    assert!(matches!(err, LoadError::Parse { line: 4, .. }));
    assert!(err.to_string().contains("line 4"));
}

#[test]
fn missing_file() {
    let path = std::env::temp_dir().join("ls8-definitely-missing.ls8");
    let err = load_file(&path).unwrap_err();
    assert!(matches!(err, LoadError::NotFound { .. }));
    assert!(err.to_string().ends_with("not found"));
}
