use std::io::Write;

/// Destination for values printed by `PRN`.
pub trait Output {
    fn emit(&mut self, value: u8);
}

/// Collects emitted values, mostly for tests and embedding.
impl Output for Vec<u8> {
    fn emit(&mut self, value: u8) {
        self.push(value);
    }
}

/// Prints each value as a decimal line on stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl Output for StdoutSink {
    fn emit(&mut self, value: u8) {
        let mut out = std::io::stdout().lock();
        if let Err(err) = writeln!(out, "{value}") {
            tracing::warn!(%err, "failed to write PRN output");
        }
    }
}
