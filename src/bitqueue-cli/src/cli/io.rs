use std::{fs, path::PathBuf};

use clap::Args;
use eyre::Context;

use crate::{cli::HYPHEN, utils};

/// An input source for commands that decode binary data.
#[derive(Clone, Debug)]
pub enum InputSource {
    /// The input will be read from stdin.
    Stdin,
    /// The input will be read from a single file.
    File(PathBuf),
    /// The input is given as hexadecimal digits.
    Hex(String),
}

impl InputSource {
    /// Reads the whole input into a byte vector.
    pub fn read_to_vec(self) -> eyre::Result<Vec<u8>> {
        match self {
            Self::Stdin => Ok(utils::read_stdin()?),

            Self::File(path) => {
                fs::read(&path).with_context(|| format!("failed to read '{}'", path.display()))
            }

            Self::Hex(digits) => utils::parse_hex(&digits),
        }
    }
}

/// Generalized command options for accepting binary input.
#[derive(Debug, Args)]
pub struct Input {
    /// Specifies the input file to process.
    ///
    /// When the value is "-", then input will be read from stdin.
    #[clap(required_unless_present = "hex", conflicts_with = "hex")]
    pub input: Option<String>,

    /// Takes the input as hexadecimal digits from the command line
    /// instead.
    ///
    /// Bytes are given in ascending order, i.e. "aa01" is the byte
    /// 0xAA followed by 0x01.
    #[clap(long, value_name = "DIGITS")]
    pub hex: Option<String>,
}

impl Input {
    /// Evaluates the supplied arguments into an input source.
    pub fn evaluate(self) -> eyre::Result<InputSource> {
        match (self.input, self.hex) {
            (_, Some(digits)) => Ok(InputSource::Hex(digits)),
            (Some(path), None) if path == HYPHEN => Ok(InputSource::Stdin),
            (Some(path), None) => Ok(InputSource::File(path.into())),
            (None, None) => Err(eyre::eyre!("no input was specified")),
        }
    }
}
