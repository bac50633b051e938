use std::mem::size_of;

use crate::{
    bits::{self, BITS_PER_BYTE},
    QueueError,
};

/// Describes who is responsible for releasing a queue's buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ownership {
    /// The queue owns its buffer and frees it on teardown.
    Owned,
    /// The buffer is borrowed from the caller and stays intact
    /// after teardown.
    Borrowed,
}

/// The byte buffer backing a [`BitQueue`].
#[derive(Debug)]
pub enum Storage<'a> {
    /// A heap buffer owned by the queue.
    Owned(Vec<u8>),
    /// A buffer borrowed from the caller.
    Borrowed(&'a mut [u8]),
}

impl Storage<'_> {
    /// Gets the [`Ownership`] mode of this storage.
    #[inline]
    pub fn ownership(&self) -> Ownership {
        match self {
            Self::Owned(..) => Ownership::Owned,
            Self::Borrowed(..) => Ownership::Borrowed,
        }
    }

    /// Gets the length of the storage in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Indicates whether the storage holds no bytes at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets a view of the storage as a byte slice.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        match self {
            Self::Owned(v) => v,
            Self::Borrowed(s) => s,
        }
    }

    #[inline]
    fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            Self::Owned(v) => v,
            Self::Borrowed(s) => s,
        }
    }
}

impl From<Vec<u8>> for Storage<'_> {
    fn from(value: Vec<u8>) -> Self {
        Self::Owned(value)
    }
}

impl<'a> From<&'a mut [u8]> for Storage<'a> {
    fn from(value: &'a mut [u8]) -> Self {
        Self::Borrowed(value)
    }
}

/// A FIFO queue of individual bits over a fixed-size byte buffer.
///
/// Bits are written at the tail of the queue and read from its head.
/// Both ends wrap around at the end of the buffer, so the queue holds
/// at most [`Self::capacity_bits`] bits at any time.
///
/// A queue is torn down with [`Self::destroy`], after which every
/// operation on it fails with [`QueueError::InvalidArgument`].
#[derive(Debug)]
pub struct BitQueue<'a> {
    // The backing buffer; `None` once the queue was destroyed.
    storage: Option<Storage<'a>>,

    // Total size of the ring in bits.
    capacity: usize,

    // Absolute bit position of the next bit to read.
    head: usize,

    // How many bits starting at `head` hold unread data.
    len: usize,
}

impl BitQueue<'static> {
    /// Creates an empty queue with a zero-filled, owned buffer of
    /// `byte_capacity` bytes.
    ///
    /// Data must be written to the queue before anything can be read.
    pub fn new(byte_capacity: usize) -> Result<Self, QueueError> {
        if byte_capacity == 0 {
            return Err(QueueError::InvalidArgument("queue capacity must not be zero"));
        }

        let mut buf = Vec::new();
        buf.try_reserve_exact(byte_capacity)?;
        let capacity = capacity_bits_for(byte_capacity)?;
        buf.resize(byte_capacity, 0);

        log::debug!("Created empty queue with capacity of {capacity} bits");

        Ok(Self {
            storage: Some(Storage::Owned(buf)),
            capacity,
            head: 0,
            len: 0,
        })
    }
}

impl<'a> BitQueue<'a> {
    /// Wraps the first `byte_capacity` bytes of an existing buffer in
    /// a queue.
    ///
    /// All of these bytes are assumed to hold valid data, so the
    /// queue starts out full. The variant of `storage` determines
    /// whether the buffer is released on teardown.
    pub fn wrap<S>(storage: S, byte_capacity: usize) -> Result<Self, QueueError>
    where
        S: Into<Storage<'a>>,
    {
        let storage = storage.into();
        let capacity = capacity_bits_for(byte_capacity)?;

        if storage.len() < byte_capacity {
            return Err(QueueError::InvalidArgument(
                "buffer is shorter than the declared capacity",
            ));
        }

        log::debug!(
            "Wrapped {:?} buffer as full queue of {capacity} bits",
            storage.ownership()
        );

        Ok(Self {
            storage: Some(storage),
            capacity,
            head: 0,
            len: capacity,
        })
    }

    /// Wraps a whole owned byte vector in a full queue.
    ///
    /// See [`BitQueue::wrap`] for details.
    pub fn from_vec(vec: Vec<u8>) -> Result<Self, QueueError> {
        let len = vec.len();
        Self::wrap(vec, len)
    }

    /// Wraps a whole borrowed byte slice in a full queue.
    ///
    /// See [`BitQueue::wrap`] for details.
    pub fn from_slice(slice: &'a mut [u8]) -> Result<Self, QueueError> {
        let len = slice.len();
        Self::wrap(slice, len)
    }

    /// Gets the total capacity of the queue in bits.
    #[inline]
    pub fn capacity_bits(&self) -> usize {
        self.capacity
    }

    /// Gets the number of unread bits in the queue.
    #[inline]
    pub fn written_bits(&self) -> usize {
        self.len
    }

    /// Gets the number of bits that can currently be written.
    #[inline]
    pub fn free_bits(&self) -> usize {
        self.capacity - self.len
    }

    /// Gets the read position as byte index and bit offset within
    /// that byte, counted from the LSB.
    #[inline]
    pub fn cursor(&self) -> (usize, u8) {
        let (byte, bit) = bits::split_position(self.head);
        (byte, bit as u8)
    }

    /// Gets the [`Ownership`] of the queue's buffer, or [`None`] if
    /// the queue was destroyed.
    #[inline]
    pub fn ownership(&self) -> Option<Ownership> {
        self.storage.as_ref().map(Storage::ownership)
    }

    /// Indicates whether [`Self::destroy`] was already called.
    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.storage.is_none()
    }

    /// Gets a view of the bytes that make up the queue's ring.
    pub fn as_bytes(&self) -> Result<&[u8], QueueError> {
        let nbytes = self.capacity / BITS_PER_BYTE;
        self.storage().map(|s| &s.as_slice()[..nbytes])
    }

    /// Checks if `bit_count` more bits can be written right now.
    pub fn has_space(&self, bit_count: usize) -> Result<bool, QueueError> {
        self.storage()?;
        Ok(self.free_bits() >= bit_count)
    }

    /// Checks if at least `bit_count` unread bits are in the queue.
    pub fn has_data(&self, bit_count: usize) -> Result<bool, QueueError> {
        self.storage()?;
        Ok(self.len >= bit_count)
    }

    /// Reads `bit_count` bits from the head of the queue into the
    /// low bits of `dest`, starting at its bit 0.
    ///
    /// Bits of `dest` past `bit_count` are left untouched. Returns
    /// the number of bits read, which is always `bit_count`.
    ///
    /// When the queue does not hold enough data yet, this fails with
    /// [`QueueError::WouldBlock`] and the queue stays unchanged.
    pub fn read_bits(&mut self, dest: &mut [u8], bit_count: usize) -> Result<usize, QueueError> {
        self.validate_request(dest.len(), bit_count)?;

        if !self.has_data(bit_count)? {
            log::debug!(
                "Read of {bit_count} bits would block; {} bits available",
                self.len
            );
            return Err(QueueError::WouldBlock {
                requested: bit_count,
                available: self.len,
            });
        }

        let runs = self.ring_runs(self.head, bit_count);
        let buf = self.storage()?.as_slice();
        for (pos, offset, count) in runs {
            bits::copy_bits(buf, pos, dest, offset, count);
        }

        self.head = (self.head + bit_count) % self.capacity;
        self.len -= bit_count;

        log::trace!(
            "Read {bit_count} bits; cursor now at {:?} with {} bits left",
            self.cursor(),
            self.len
        );

        Ok(bit_count)
    }

    /// Writes the low `bit_count` bits of `src`, starting at its bit 0,
    /// to the tail of the queue.
    ///
    /// Returns the number of bits written, which is always `bit_count`.
    ///
    /// When the queue does not have enough free space, this fails with
    /// [`QueueError::WouldBlock`] and the queue stays unchanged.
    pub fn write_bits(&mut self, src: &[u8], bit_count: usize) -> Result<usize, QueueError> {
        self.validate_request(src.len(), bit_count)?;

        if !self.has_space(bit_count)? {
            log::debug!(
                "Write of {bit_count} bits would block; {} bits free",
                self.free_bits()
            );
            return Err(QueueError::WouldBlock {
                requested: bit_count,
                available: self.free_bits(),
            });
        }

        let tail = (self.head + self.len) % self.capacity;
        let runs = self.ring_runs(tail, bit_count);
        let buf = self.storage_mut()?.as_mut_slice();
        for (pos, offset, count) in runs {
            bits::copy_bits(src, offset, buf, pos, count);
        }

        self.len += bit_count;

        log::trace!("Wrote {bit_count} bits; {} bits now queued", self.len);

        Ok(bit_count)
    }

    /// Reads a `bit_count` wide unsigned value from the queue.
    ///
    /// At most 64 bits can be read this way.
    pub fn read_value(&mut self, bit_count: usize) -> Result<u64, QueueError> {
        let mut buf = [0; size_of::<u64>()];
        self.read_bits(&mut buf, bit_count)?;
        Ok(u64::from_le_bytes(buf))
    }

    /// Writes the low `bit_count` bits of `value` to the queue.
    ///
    /// At most 64 bits can be written this way.
    pub fn write_value(&mut self, value: u64, bit_count: usize) -> Result<usize, QueueError> {
        self.write_bits(&value.to_le_bytes(), bit_count)
    }

    /// Tears down the queue.
    ///
    /// An owned buffer is freed while a borrowed one is handed back to
    /// its owner untouched. Calling this on an already destroyed queue
    /// fails with [`QueueError::InvalidArgument`].
    pub fn destroy(&mut self) -> Result<(), QueueError> {
        let storage = self
            .storage
            .take()
            .ok_or(QueueError::InvalidArgument("queue was already destroyed"))?;

        log::debug!("Destroying queue with {:?} buffer", storage.ownership());
        drop(storage);

        self.capacity = 0;
        self.head = 0;
        self.len = 0;

        Ok(())
    }

    /// Consumes the queue and returns its storage, if the queue was
    /// not destroyed before.
    #[inline]
    pub fn into_inner(self) -> Option<Storage<'a>> {
        self.storage
    }

    fn storage(&self) -> Result<&Storage<'a>, QueueError> {
        self.storage
            .as_ref()
            .ok_or(QueueError::InvalidArgument("queue was destroyed"))
    }

    fn storage_mut(&mut self) -> Result<&mut Storage<'a>, QueueError> {
        self.storage
            .as_mut()
            .ok_or(QueueError::InvalidArgument("queue was destroyed"))
    }

    // Runs the checks shared by reads and writes, except for the
    // availability of data or space.
    fn validate_request(&self, user_len: usize, bit_count: usize) -> Result<(), QueueError> {
        if bit_count == 0 {
            return Err(QueueError::InvalidArgument("bit count must not be zero"));
        }
        if user_len == 0 {
            return Err(QueueError::InvalidArgument("user buffer is empty"));
        }
        self.storage()?;

        if bit_count > self.capacity {
            return Err(QueueError::MessageTooLarge {
                requested: bit_count,
                capacity: self.capacity,
            });
        }

        if user_len < bits::bytes_for_bits(bit_count) {
            return Err(QueueError::InvalidArgument(
                "user buffer is too short for the requested bits",
            ));
        }

        Ok(())
    }

    // Splits `count` bits starting at ring position `start` into the
    // contiguous runs before and after the wrap point. Each run is
    // given as (ring position, offset into the request, length).
    fn ring_runs(&self, start: usize, count: usize) -> [(usize, usize, usize); 2] {
        let first = count.min(self.capacity - start);
        [(start, 0, first), (0, first, count - first)]
    }
}

fn capacity_bits_for(byte_capacity: usize) -> Result<usize, QueueError> {
    if byte_capacity == 0 {
        return Err(QueueError::InvalidArgument("queue capacity must not be zero"));
    }

    byte_capacity
        .checked_mul(BITS_PER_BYTE)
        .ok_or(QueueError::InvalidArgument("queue capacity overflows bit count"))
}
