use std::fmt::Write;

/// Parses a string of hexadecimal digits into bytes.
///
/// Whitespace and `_` separators are ignored, and an optional `0x`
/// prefix is accepted.
pub fn parse_hex(digits: &str) -> eyre::Result<Vec<u8>> {
    let digits = digits.trim();
    let digits = digits.strip_prefix("0x").unwrap_or(digits);

    let nibbles = digits
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .map(|c| {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| eyre::eyre!("invalid hex digit '{c}'"))
        })
        .collect::<eyre::Result<Vec<u8>>>()?;

    if nibbles.len() % 2 != 0 {
        return Err(eyre::eyre!("hex input has an odd number of digits"));
    }

    Ok(nibbles.chunks_exact(2).map(|p| p[0] << 4 | p[1]).collect())
}

/// Formats bytes as a string of lowercase hexadecimal digits.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_digits() {
        assert_eq!(parse_hex("aaaa").unwrap(), [0xAA, 0xAA]);
        assert_eq!(parse_hex("0xDE_AD be ef\n").unwrap(), [0xDE, 0xAD, 0xBE, 0xEF]);
        assert!(parse_hex("").unwrap().is_empty());
    }

    #[test]
    fn reject_bad_digits() {
        assert!(parse_hex("abc").is_err());
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn format_digits() {
        assert_eq!(to_hex(&[0xAA, 0x2A, 0x01]), "aa2a01");
        assert_eq!(to_hex(&[]), "");
    }
}
