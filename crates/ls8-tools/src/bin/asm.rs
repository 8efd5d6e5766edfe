use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ls8_tools::{assemble, render_ls8};

#[derive(Parser, Debug)]
#[command(author, version, about = "Tiny LS-8 assembler")]
struct Opts {
    /// Input assembly file (one instruction, label or directive per line)
    #[arg(short, long)]
    input: PathBuf,
    /// Output program file (.ls8 binary text)
    #[arg(short, long)]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    let src = fs::read_to_string(&opts.input)
        .with_context(|| format!("reading {}", opts.input.display()))?;
    let prog = assemble(&src).with_context(|| format!("assembling {}", opts.input.display()))?;
    let size: usize = prog.iter().map(|a| a.bytes.len()).sum();
    fs::write(&opts.output, render_ls8(&prog))
        .with_context(|| format!("writing {}", opts.output.display()))?;
    tracing::info!(bytes = size, output = %opts.output.display(), "assembled");
    Ok(())
}
