use std::io::Write;

use anyhow::{Context, Result};

/// Write the crew's result once, unmodified, followed by a newline
pub fn emit<W: Write>(writer: &mut W, result: &str) -> Result<()> {
    writeln!(writer, "{}", result).context("Failed to write result")?;
    writer.flush().context("Failed to flush result")
}
