//! CLI subcommands.

pub mod get;
pub mod policies;
pub mod products;
pub mod seed;

use std::io::Write;

use serde::Serialize;

/// Write `value` to stdout as pretty JSON.
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
