use std::{
    fs,
    io::{self, BufWriter, IsTerminal, Write},
    path::Path,
};

use eyre::Context;
use serde::Serialize;

/// Writes `value` as JSON to `out`, or to stdout when no path is given.
///
/// Terminals get pretty-printed output; files and pipes get one
/// compact line.
pub fn write_json_output<T: Serialize>(out: Option<&Path>, value: &T) -> eyre::Result<()> {
    let Some(path) = out else {
        let stdout = io::stdout().lock();
        let pretty = stdout.is_terminal();
        return write_json(stdout, value, pretty);
    };

    let file = fs::File::create(path)
        .with_context(|| format!("failed to create output file '{}'", path.display()))?;
    write_json(BufWriter::new(file), value, false)
        .with_context(|| format!("failed to write '{}'", path.display()))?;

    log::info!("Wrote decoded fields to '{}'", path.display());
    Ok(())
}

fn write_json<W: Write, T: Serialize>(mut writer: W, value: &T, pretty: bool) -> eyre::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }

    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}
