use std::collections::TryReserveError;

use thiserror::Error;

/// Errors that may occur when operating on a [`BitQueue`][crate::BitQueue].
///
/// A failed operation never leaves the queue partially modified.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The request or the queue itself is unusable.
    ///
    /// This covers zero-length requests and zero-capacity queues,
    /// buffers too short for the requested bits, and queues that
    /// were already destroyed.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The buffer for an owning queue could not be allocated.
    #[error("failed to allocate queue buffer: {0}")]
    AllocationFailure(#[from] TryReserveError),

    /// More bits were requested than the queue could ever hold.
    #[error("request of {requested} bits exceeds queue capacity of {capacity} bits")]
    MessageTooLarge {
        /// The number of bits that were requested.
        requested: usize,
        /// The total capacity of the queue in bits.
        capacity: usize,
    },

    /// Not enough data (on read) or free space (on write) is in
    /// the queue at the moment.
    #[error("request of {requested} bits would block, only {available} available")]
    WouldBlock {
        /// The number of bits that were requested.
        requested: usize,
        /// The number of bits that could be served right now.
        available: usize,
    },
}

impl QueueError {
    /// Whether the failed operation may succeed when retried after
    /// the other side of the queue made progress.
    #[inline]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::WouldBlock { .. })
    }
}
