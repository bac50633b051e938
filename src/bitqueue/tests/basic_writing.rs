use bitqueue::{BitQueue, QueueError};

// Clears all bits of `src` from position `nbits` onwards.
fn truncated(src: &[u8], nbits: usize) -> Vec<u8> {
    src.iter()
        .enumerate()
        .map(|(i, &b)| {
            let keep = nbits.saturating_sub(i * 8).min(8);
            (b as u16 & ((1u16 << keep) - 1)) as u8
        })
        .collect()
}

#[test]
fn write_then_read_round_trip() -> Result<(), QueueError> {
    let src = [0b1011_0110, 0b1100_1010, 0b0101_1111];

    for nbits in [1, 3, 7, 8, 9, 15, 16, 17] {
        let mut queue = BitQueue::new(4)?;

        assert_eq!(queue.write_bits(&src, nbits)?, nbits);
        assert_eq!(queue.written_bits(), nbits);

        let mut dest = [0; 3];
        assert_eq!(queue.read_bits(&mut dest, nbits)?, nbits);
        assert_eq!(dest.to_vec(), truncated(&src, nbits), "nbits = {nbits}");
        assert_eq!(queue.written_bits(), 0);
    }

    Ok(())
}

#[test]
fn write_primitives() -> Result<(), QueueError> {
    let mut queue = BitQueue::new(4)?;

    queue.write_value(0xFF, u8::BITS as usize)?;
    queue.write_value(0xDEAD, u16::BITS as usize)?;
    queue.write_value(0xFF, u8::BITS as usize)?;

    assert_eq!(queue.as_bytes()?, &[0xFF, 0xAD, 0xDE, 0xFF]);
    assert_eq!(queue.free_bits(), 0);

    Ok(())
}

#[test]
fn write_partial_fields() -> Result<(), QueueError> {
    let mut queue = BitQueue::new(2)?;

    queue.write_value(170, 8)?;
    queue.write_value(10, 5)?;
    queue.write_value(1, 1)?;

    assert_eq!(queue.as_bytes()?, &[0xAA, 0x2A]);
    assert_eq!(queue.written_bits(), 14);

    assert_eq!(queue.read_value(8)?, 170);
    assert_eq!(queue.read_value(5)?, 10);
    assert_eq!(queue.read_value(1)?, 1);

    Ok(())
}

#[test]
fn write_ignores_excess_source_bits() -> Result<(), QueueError> {
    let mut queue = BitQueue::new(1)?;

    queue.write_value(u64::MAX, 3)?;
    assert_eq!(queue.as_bytes()?, &[0b111]);
    assert_eq!(queue.read_value(3)?, 0b111);

    Ok(())
}

#[test]
fn write_wraps_around_buffer_end() -> Result<(), QueueError> {
    let mut queue = BitQueue::new(2)?;

    queue.write_value(0xABC, 12)?;
    assert_eq!(queue.read_value(8)?, 0xBC);

    // Four bits still fit before the end of the buffer, the other
    // six go into space freed up by the read.
    queue.write_value(0x2F5, 10)?;
    assert_eq!(queue.written_bits(), 14);

    assert_eq!(queue.read_value(14)?, 0x2F5A);
    assert_eq!(queue.cursor(), (0, 6));
    assert_eq!(queue.written_bits(), 0);

    Ok(())
}

#[test]
fn write_into_full_queue_would_block() -> Result<(), QueueError> {
    let mut queue = BitQueue::new(1)?;
    queue.write_value(0x5A, 8)?;

    let err = queue.write_value(1, 1).unwrap_err();
    assert_eq!(
        err,
        QueueError::WouldBlock {
            requested: 1,
            available: 0
        }
    );

    assert_eq!(queue.written_bits(), 8);
    assert_eq!(queue.as_bytes()?, &[0x5A]);

    // Reading frees up space again.
    queue.read_value(4)?;
    queue.write_value(0b1001, 4)?;
    assert_eq!(queue.read_value(8)?, 0b1001_0101);

    Ok(())
}

#[test]
fn write_past_capacity_is_too_large() -> Result<(), QueueError> {
    let mut queue = BitQueue::new(1)?;

    assert_eq!(
        queue.write_value(0, 9),
        Err(QueueError::MessageTooLarge {
            requested: 9,
            capacity: 8
        })
    );
    assert_eq!(queue.written_bits(), 0);

    Ok(())
}

#[test]
fn write_rejects_bad_arguments() -> Result<(), QueueError> {
    let mut queue = BitQueue::new(2)?;

    assert!(matches!(
        queue.write_bits(&[0xFF], 0),
        Err(QueueError::InvalidArgument(..))
    ));
    assert!(matches!(
        queue.write_bits(&[], 3),
        Err(QueueError::InvalidArgument(..))
    ));
    assert!(matches!(
        queue.write_bits(&[0xFF], 12),
        Err(QueueError::InvalidArgument(..))
    ));

    assert_eq!(queue.written_bits(), 0);

    Ok(())
}
