use bitqueue::{BitQueue, bits::bytes_for_bits};
use clap::Args;
use eyre::Context;

use super::Command;
use crate::utils;

/// Subcommand for packing values into LSB-first bit fields.
#[derive(Debug, Args)]
pub struct Pack {
    /// The fields to pack, each given as VALUE:BITS.
    ///
    /// VALUE may be decimal, negative decimal or hexadecimal with a
    /// "0x" prefix. Only its low BITS bits are packed. Negative values
    /// must follow a "--" separator.
    #[clap(required = true, value_parser = parse_field)]
    fields: Vec<PackField>,

    /// The capacity of the packing queue in bytes.
    ///
    /// Defaults to the smallest number of bytes that fits all fields.
    #[clap(short, long, env = "BITQUEUE_CAPACITY")]
    capacity: Option<usize>,
}

/// A value to pack along with its width.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PackField {
    value: u64,
    width: u32,
}

fn parse_field(s: &str) -> Result<PackField, String> {
    let (value, width) = s
        .split_once(':')
        .ok_or_else(|| format!("expected VALUE:BITS, got '{s}'"))?;

    let value = if let Some(hex) = value.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).map_err(|e| e.to_string())?
    } else if value.starts_with('-') {
        value.parse::<i64>().map_err(|e| e.to_string())? as u64
    } else {
        value.parse::<u64>().map_err(|e| e.to_string())?
    };

    let width = width.parse::<u32>().map_err(|e| e.to_string())?;
    if !(1..=u64::BITS).contains(&width) {
        return Err(format!("field width must be in 1..=64, got {width}"));
    }

    Ok(PackField { value, width })
}

fn pack(fields: &[PackField], capacity: Option<usize>) -> eyre::Result<Vec<u8>> {
    let total: usize = fields.iter().map(|f| f.width as usize).sum();
    let mut queue = BitQueue::new(capacity.unwrap_or_else(|| bytes_for_bits(total)))?;

    for (i, field) in fields.iter().enumerate() {
        queue
            .write_value(field.value, field.width as usize)
            .wrap_err_with(|| format!("failed to pack field #{i} ({} bits)", field.width))?;
    }

    log::debug!(
        "Packed {total} bits; {} bits of capacity left",
        queue.free_bits()
    );

    let packed = queue.as_bytes()?[..bytes_for_bits(total)].to_vec();
    queue.destroy()?;

    Ok(packed)
}

impl Command for Pack {
    fn handle(self) -> eyre::Result<()> {
        let packed = pack(&self.fields, self.capacity)?;
        println!("{}", utils::to_hex(&packed));

        Ok(())
    }
}
