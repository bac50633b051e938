//! A bit-granular queue over a fixed-size byte buffer.
//!
//! Producers push an arbitrary number of bits into the queue and
//! consumers pull them back out in the same order, without either
//! side having to care about where byte boundaries fall.
//!
//! Bits are numbered starting at the LSB of each byte, working
//! towards the MSB, and bytes are consumed in ascending order.
//!
//! # Storage
//!
//! A [`BitQueue`] either owns its buffer or borrows one from the
//! caller, see [`Storage`]. Queues created empty with [`BitQueue::new`]
//! are meant to be filled through writes, whereas wrapped buffers are
//! considered to be full of data from the start.
//!
//! The buffer is treated as a ring: once bits were read, the space
//! they occupied can be written again.

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bits;

mod error;
pub use error::QueueError;

mod queue;
pub use queue::*;

pub mod utils;
