use clap::{Parser, Subcommand};

use crate::cmd::*;

mod args;

pub mod io;
pub use io::*;

pub const HYPHEN: &str = "-";

/// The CLI interface for the bitqueue application.
#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct Cli {
    /// The selected command.
    #[clap(subcommand)]
    pub command: BitQueueCommand,

    #[clap(flatten)]
    pub verbosity: args::Verbosity,
}

/// The top-level commands supported by bitqueue.
#[derive(Debug, Subcommand)]
pub enum BitQueueCommand {
    Demo(demo::Demo),
    Pack(pack::Pack),
    Read(read::Read),
}

impl Command for BitQueueCommand {
    fn handle(self) -> eyre::Result<()> {
        match self {
            Self::Demo(demo) => demo.handle(),
            Self::Pack(pack) => pack.handle(),
            Self::Read(read) => read.handle(),
        }
    }
}
