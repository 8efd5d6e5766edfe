use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ls8_rs::{exec::Alu, isa::ls8::Ls8Decoder, loader, Cpu, CpuConfig, Ram, StdoutSink};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run an LS-8 program on the ls8-rs emulator")]
struct Opts {
    /// Stop with an error after this many instructions
    #[arg(long)]
    max_steps: Option<u64>,
    /// Log a TRACE line to stderr before every instruction
    #[arg(short, long)]
    trace: bool,
    /// JSON file with a CpuConfig
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    #[arg(value_name = "PROGRAM")]
    input: PathBuf,
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    let mut filter = EnvFilter::from_default_env();
    if opts.trace {
        filter = filter.add_directive("ls8_rs::cpu=trace".parse()?);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut cfg = match &opts.config {
        Some(path) => {
            let txt = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<CpuConfig>(&txt)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => CpuConfig::default(),
    };
    if opts.max_steps.is_some() {
        cfg.max_steps = opts.max_steps;
    }

    let program = loader::load_file(&opts.input)?;
    let mut mem = Ram::new();
    loader::load_into(&mut mem, &program)?;

    let mut cpu = Cpu::new(cfg);
    let dec = Ls8Decoder::new();
    let exec = Alu;
    let mut out = StdoutSink;

    cpu.run(&mut mem, &dec, &exec, &mut out)
        .with_context(|| format!("running {}", opts.input.display()))?;

    Ok(())
}
