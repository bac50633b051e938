use bitqueue::BitQueue;
use clap::Args;

use super::Command;

// Widths of the fields read by the demo, in order.
const FIELDS: [usize; 3] = [8, 5, 1];

/// Subcommand for reading a few fields from a 16-bit pattern held
/// in a borrowed buffer.
#[derive(Debug, Args)]
pub struct Demo {
    /// The 16-bit pattern to read from, stored little endian.
    #[clap(long, default_value = "0xaaaa", value_parser = parse_pattern)]
    pattern: u16,
}

fn parse_pattern(s: &str) -> Result<u16, String> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u16::from_str_radix(digits, 16).map_err(|e| e.to_string())
}

/// Reads the demo fields from `pattern` through a queue that borrows
/// its buffer, then tears the queue down.
///
/// Returns the decoded values along with the buffer as it was left.
fn run(pattern: u16) -> eyre::Result<(Vec<u16>, [u8; 2])> {
    let mut buffer = pattern.to_le_bytes();
    let mut values = Vec::with_capacity(FIELDS.len());

    {
        let mut queue = BitQueue::from_slice(&mut buffer)?;
        for width in FIELDS {
            let mut res = [0; 2];
            queue.read_bits(&mut res, width)?;
            values.push(u16::from_le_bytes(res));
        }

        log::debug!("{} bits left in the queue", queue.written_bits());
        queue.destroy()?;
    }

    Ok((values, buffer))
}

impl Command for Demo {
    fn handle(self) -> eyre::Result<()> {
        let (values, buffer) = run(self.pattern)?;
        for (i, value) in values.into_iter().enumerate() {
            println!("m{} = {value}", i + 1);
        }

        log::debug!("Buffer after teardown: {:#06x}", u16::from_le_bytes(buffer));

        Ok(())
    }
}
