use std::{
    io::{self, IsTerminal, Read},
    process,
};

use clap::CommandFactory;

use crate::cli::Cli;

/// Reads all of stdin into a byte vector.
///
/// Decoding from an interactive terminal makes no sense, so this
/// prints the help and terminates the process instead when stdin is
/// connected to one.
pub fn read_stdin() -> io::Result<Vec<u8>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        let _ = Cli::command().print_help();
        process::exit(2);
    }

    let mut buf = Vec::new();
    stdin.lock().read_to_end(&mut buf)?;
    Ok(buf)
}
