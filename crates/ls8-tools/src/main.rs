use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ls8_tools::{listing, load_program, Line};

#[derive(Parser, Debug)]
#[command(author, version, about = "LS-8 disassembler CLI", long_about = None)]
struct Cli {
    /// Program file (.ls8 binary text)
    #[arg(value_name = "PROGRAM")]
    input: PathBuf,
    /// Subcommand
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print program size
    Info,
    /// Linear disassembly of the whole program
    List {
        /// Show instruction bytes
        #[arg(long)]
        show_bytes: bool,
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Write output to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn render_text(lines: &[Line], show_bytes: bool) -> String {
    let mut buf = String::new();
    for l in lines {
        let _ = write!(buf, "{:#04x}: ", l.addr);
        if show_bytes {
            let mut bytes = String::new();
            for b in &l.bytes {
                let _ = write!(bytes, "{b:08b} ");
            }
            let _ = write!(buf, "{bytes:<28}");
        }
        let _ = writeln!(buf, "{}", l.text);
    }
    buf
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let img = load_program(&cli.input)?;

    match cli.cmd {
        Command::Info => {
            println!("{:<16} {:>6}", "name", "bytes");
            println!("{:<16} {:>6}", img.name, img.bytes.len());
        }
        Command::List { show_bytes, format, out } => {
            let lines = listing(&img);
            tracing::debug!(count = lines.len(), "disassembled");
            let text = match format {
                OutputFormat::Text => render_text(&lines, show_bytes),
                OutputFormat::Json => serde_json::to_string_pretty(&lines)? + "\n",
            };
            if let Some(path) = out {
                std::fs::write(path, text)?;
            } else {
                print!("{text}");
            }
        }
    }

    Ok(())
}
