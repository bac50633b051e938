use std::{fmt, path::PathBuf};

use bitqueue::{BitQueue, utils::sign_extend};
use clap::Args;
use eyre::Context;
use serde::Serialize;

use super::Command;
use crate::{cli::Input, utils};

/// Subcommand for decoding LSB-first bit fields from binary data.
#[derive(Debug, Args)]
pub struct Read {
    #[clap(flatten)]
    input: Input,

    /// Comma-separated widths of the fields to decode, in bits.
    ///
    /// Fields are read in order starting at bit 0 of the first byte.
    /// Each field may be at most 64 bits wide.
    #[clap(
        short,
        long,
        required = true,
        value_delimiter = ',',
        value_parser = clap::value_parser!(u32).range(1..=64)
    )]
    fields: Vec<u32>,

    /// Interprets the decoded fields as two's complement integers.
    #[clap(short, long)]
    signed: bool,

    /// Prints the decoded fields as JSON.
    #[clap(long)]
    json: bool,

    /// Writes the JSON output to the given file instead of stdout.
    ///
    /// Implies `--json`.
    #[clap(short, long)]
    output: Option<PathBuf>,
}

/// The value of a decoded field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
enum FieldValue {
    Unsigned(u64),
    Signed(i64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsigned(v) => write!(f, "{v}"),
            Self::Signed(v) => write!(f, "{v}"),
        }
    }
}

/// A field decoded from the input.
#[derive(Clone, Copy, Debug, Serialize)]
struct Field {
    /// The bit offset of the field in the input.
    offset: usize,
    /// The width of the field in bits.
    width: u32,
    /// The decoded value.
    value: FieldValue,
}

fn decode(data: Vec<u8>, widths: &[u32], signed: bool) -> eyre::Result<Vec<Field>> {
    let mut queue = BitQueue::from_vec(data)?;
    let mut offset = 0;

    let fields = widths
        .iter()
        .map(|&width| -> eyre::Result<Field> {
            let raw = queue
                .read_value(width as usize)
                .wrap_err_with(|| format!("failed to decode {width}-bit field at bit {offset}"))?;

            let value = if signed {
                FieldValue::Signed(sign_extend(raw, width))
            } else {
                FieldValue::Unsigned(raw)
            };

            let field = Field {
                offset,
                width,
                value,
            };
            offset += width as usize;

            log::trace!("Decoded {field:?}");
            Ok(field)
        })
        .collect::<eyre::Result<Vec<_>>>()?;

    if queue.written_bits() != 0 {
        log::debug!("{} trailing bits were not decoded", queue.written_bits());
    }
    queue.destroy()?;

    Ok(fields)
}

impl Command for Read {
    fn handle(self) -> eyre::Result<()> {
        let data = self.input.evaluate()?.read_to_vec()?;
        log::debug!("Decoding {} fields from {} bytes", self.fields.len(), data.len());

        let fields = decode(data, &self.fields, self.signed)?;

        if self.json || self.output.is_some() {
            utils::write_json_output(self.output.as_deref(), &fields)
        } else {
            for field in fields {
                println!("{}:{} = {}", field.offset, field.width, field.value);
            }

            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(fields: &[Field]) -> Vec<FieldValue> {
        fields.iter().map(|f| f.value).collect()
    }

    #[test]
    fn decode_unsigned_fields() {
        let fields = decode(vec![0xAA, 0xAA], &[8, 5, 1], false).unwrap();

        assert_eq!(
            values(&fields),
            [
                FieldValue::Unsigned(170),
                FieldValue::Unsigned(10),
                FieldValue::Unsigned(1)
            ]
        );
        assert_eq!(
            fields.iter().map(|f| f.offset).collect::<Vec<_>>(),
            [0, 8, 13]
        );
    }

    #[test]
    fn decode_signed_fields() {
        let fields = decode(vec![0xAA, 0xAA], &[8, 5, 1], true).unwrap();

        assert_eq!(
            values(&fields),
            [
                FieldValue::Signed(-86),
                FieldValue::Signed(10),
                FieldValue::Signed(-1)
            ]
        );
    }

    #[test]
    fn decode_past_input_fails() {
        assert!(decode(vec![0xFF], &[4, 5], false).is_err());
        assert!(decode(vec![0xFF], &[9], false).is_err());
        assert!(decode(Vec::new(), &[1], false).is_err());
    }

    #[test]
    fn serialize_fields() {
        let fields = decode(vec![0x0F], &[4], true).unwrap();
        assert_eq!(
            serde_json::to_string(&fields).unwrap(),
            r#"[{"offset":0,"width":4,"value":-1}]"#
        );
    }
}
