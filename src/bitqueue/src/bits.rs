//! Low-level routines for moving bits between byte buffers.
//!
//! Bit positions are absolute offsets into a byte slice, where
//! position `p` names bit `p % 8` of byte `p / 8`, counted from
//! the LSB.

/// The number of bits in a byte.
pub const BITS_PER_BYTE: usize = u8::BITS as usize;

/// Gets the number of bytes needed to hold `nbits` bits.
#[inline]
pub const fn bytes_for_bits(nbits: usize) -> usize {
    nbits.div_ceil(BITS_PER_BYTE)
}

/// Splits an absolute bit position into its byte index and the
/// bit offset within that byte.
#[inline]
pub const fn split_position(pos: usize) -> (usize, u32) {
    (pos >> 3, (pos & 7) as u32)
}

/// Builds a mask of the `width` lowest bits in a byte.
///
/// `width` must not exceed 8.
#[inline]
pub const fn low_mask(width: u32) -> u8 {
    debug_assert!(width <= u8::BITS);
    ((1u16 << width) - 1) as u8
}

/// Copies `count` bits from `src` starting at bit `src_pos` into
/// `dst` starting at bit `dst_pos`.
///
/// Bits are moved low-to-high and retain their order. Every step
/// moves as many bits as fit before either the source or the
/// destination byte ends, so the two positions may be in any phase
/// relative to each other.
///
/// Destination bits outside of the copied range keep their values.
///
/// # Panics
///
/// Panics when either range reaches past the end of its slice.
pub fn copy_bits(
    src: &[u8],
    mut src_pos: usize,
    dst: &mut [u8],
    mut dst_pos: usize,
    count: usize,
) {
    let mut remaining = count;

    while remaining != 0 {
        let (src_byte, src_bit) = split_position(src_pos);
        let (dst_byte, dst_bit) = split_position(dst_pos);

        // When both sides are at a byte boundary, whole bytes can be
        // taken over as they are.
        if src_bit == 0 && dst_bit == 0 && remaining >= BITS_PER_BYTE {
            let nbytes = remaining / BITS_PER_BYTE;
            dst[dst_byte..dst_byte + nbytes].copy_from_slice(&src[src_byte..src_byte + nbytes]);

            let nbits = nbytes * BITS_PER_BYTE;
            src_pos += nbits;
            dst_pos += nbits;
            remaining -= nbits;
            continue;
        }

        let width = (u8::BITS - src_bit)
            .min(u8::BITS - dst_bit)
            .min(remaining.min(BITS_PER_BYTE) as u32);
        let mask = low_mask(width);

        // Extract the bits aligned to bit 0, then merge them into the
        // destination byte at its own offset.
        let value = (src[src_byte] >> src_bit) & mask;
        let target = &mut dst[dst_byte];
        *target = (*target & !(mask << dst_bit)) | (value << dst_bit);

        src_pos += width as usize;
        dst_pos += width as usize;
        remaining -= width as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks() {
        assert_eq!(low_mask(0), 0);
        assert_eq!(low_mask(1), 0b1);
        assert_eq!(low_mask(5), 0b1_1111);
        assert_eq!(low_mask(8), 0xFF);
    }

    #[test]
    fn positions() {
        assert_eq!(split_position(0), (0, 0));
        assert_eq!(split_position(7), (0, 7));
        assert_eq!(split_position(8), (1, 0));
        assert_eq!(split_position(21), (2, 5));

        assert_eq!(bytes_for_bits(0), 0);
        assert_eq!(bytes_for_bits(1), 1);
        assert_eq!(bytes_for_bits(8), 1);
        assert_eq!(bytes_for_bits(17), 3);
    }

    #[test]
    fn aligned_bytes() {
        let src = [0xDE, 0xAD, 0xBE, 0xEF];
        let mut dst = [0; 4];

        copy_bits(&src, 8, &mut dst, 0, 20);
        assert_eq!(dst, [0xAD, 0xBE, 0x0F, 0x00]);
    }

    #[test]
    fn shifted_source() {
        // 0b1010_1010 0b1010_1010, starting at bit 3.
        let src = [0xAA, 0xAA];
        let mut dst = [0; 2];

        copy_bits(&src, 3, &mut dst, 0, 10);
        assert_eq!(u16::from_le_bytes(dst), 0b01_0101_0101);
    }

    #[test]
    fn shifted_destination() {
        let src = [0xFF, 0x01];
        let mut dst = [0; 3];

        copy_bits(&src, 0, &mut dst, 6, 9);
        assert_eq!(dst, [0b1100_0000, 0b0111_1111, 0]);
    }

    #[test]
    fn preserves_surrounding_bits() {
        let src = [0x00];
        let mut dst = [0xFF, 0xFF];

        copy_bits(&src, 0, &mut dst, 5, 6);
        assert_eq!(dst, [0b0001_1111, 0b1111_1000]);
    }

    #[test]
    fn zero_count_is_noop() {
        let src = [0xFF];
        let mut dst = [0x12];

        copy_bits(&src, 3, &mut dst, 1, 0);
        assert_eq!(dst, [0x12]);
    }
}
