/*!
Error types.
*/
use thiserror::Error;

use crate::alloc::AllocError;

/**
The ways an operation on a counted string can fail.

A failed operation never leaves an engine-allocated buffer behind.  A caller-supplied destination may have been partially written, but never beyond its capacity.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum Error {
    /// A radix, flag, grammar or size argument was not acceptable.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// The destination does not have room, and this operation does not truncate.
    #[error("buffer too small")]
    BufferTooSmall,

    /// The allocator could not provide the requested buffer.
    #[error("out of memory")]
    OutOfMemory,

    /// The string is too long to be described by a 16-bit byte count.
    #[error("name too long")]
    NameTooLong,

    /// A required output location was not supplied.
    #[error("access violation: required output is missing")]
    AccessViolation,
}

impl From<AllocError> for Error {
    fn from(_: AllocError) -> Self {
        Error::OutOfMemory
    }
}

pub type Result<T> = ::std::result::Result<T, Error>;
