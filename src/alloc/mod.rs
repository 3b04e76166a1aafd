/*!
Allocation types and traits.
*/
use std::alloc::{self as rust_alloc, Layout};
use std::fmt;
use std::mem;
use std::ptr::NonNull;

use libc::{self, c_void};
use log::trace;
use thiserror::Error;

/**
Identifies which kind of string an allocation was made for.

Every buffer is freed with the same tag it was allocated with.  The owned string types carry their encoding in their type, so they always pass the matching tag; allocators may use it for accounting or leak tracking.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PoolTag {
    Narrow,
    Oem,
    Wide,
}

impl PoolTag {
    /**
    The four-character pool tag conventionally associated with this kind of string.
    */
    pub fn fourcc(self) -> [u8; 4] {
        match self {
            PoolTag::Narrow => *b"ASTR",
            PoolTag::Oem => *b"OSTR",
            PoolTag::Wide => *b"USTR",
        }
    }
}

impl fmt::Display for PoolTag {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.fourcc() {
            write!(fmt, "{}", b as char)?;
        }
        Ok(())
    }
}

/**
Abstracts over different memory allocators.

In practice, this will be implemented by a marker type (which is not intended to actually be instantiated anywhere).  All allocations returned must be zero-filled.
*/
pub trait Allocator {
    /**
    Allocate the specified number of bytes, with the specified alignment.

    A request for zero bytes must still return a unique, freeable pointer.
    */
    fn alloc_bytes(bytes: usize, align: usize, tag: PoolTag) -> Result<NonNull<u8>, AllocError>;

    /**
    Free an allocation.

    # Safety

    `ptr` must have been returned by `alloc_bytes` on this allocator with the same `bytes`, `align` and `tag`, and must not have been freed already.
    */
    unsafe fn free(ptr: NonNull<u8>, bytes: usize, align: usize, tag: PoolTag);

    /**
    Returns a string which can be used to uniquely identify this allocator in debug output.

    This string should *preferably* be short, reasonably evocative, unique, and a single `Camelword`, although nothing will break if this is not done.
    */
    fn debug_prefix() -> &'static str;
}

/**
A general allocation error.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum AllocError {
    #[error("failed to allocate memory")]
    Failed,
    #[error("cannot satisfy requested alignment")]
    CannotAlign,
    #[error("overflow while computing size")]
    SizeOverflow,
}

/**
Represents the C runtime heap allocator.
*/
pub enum Malloc {}

impl Allocator for Malloc {
    fn alloc_bytes(bytes: usize, align: usize, tag: PoolTag) -> Result<NonNull<u8>, AllocError> {
        trace!("Malloc::alloc_bytes({:?}, {:?}, {})", bytes, align, tag);

        // A conservative guess.
        if align > mem::align_of::<usize>() {
            return Err(AllocError::CannotAlign);
        }

        // calloc(0, _) is allowed to hand back null.
        let ptr = unsafe { libc::calloc(bytes.max(1), 1) };
        NonNull::new(ptr as *mut u8).ok_or(AllocError::Failed)
    }

    unsafe fn free(ptr: NonNull<u8>, bytes: usize, _align: usize, tag: PoolTag) {
        trace!("Malloc::free(_, {:?}, {})", bytes, tag);
        unsafe {
            libc::free(ptr.as_ptr() as *mut c_void);
        }
    }

    fn debug_prefix() -> &'static str { "C" }
}

/**
Represents the Rust runtime heap allocator.
*/
pub enum RustHeap {}

impl RustHeap {
    fn layout(bytes: usize, align: usize) -> Result<Layout, AllocError> {
        Layout::from_size_align(bytes.max(1), align).map_err(|_| AllocError::SizeOverflow)
    }
}

impl Allocator for RustHeap {
    fn alloc_bytes(bytes: usize, align: usize, tag: PoolTag) -> Result<NonNull<u8>, AllocError> {
        trace!("RustHeap::alloc_bytes({:?}, {:?}, {})", bytes, align, tag);
        let layout = Self::layout(bytes, align)?;
        let ptr = unsafe { rust_alloc::alloc_zeroed(layout) };
        NonNull::new(ptr).ok_or(AllocError::Failed)
    }

    unsafe fn free(ptr: NonNull<u8>, bytes: usize, align: usize, tag: PoolTag) {
        trace!("RustHeap::free(_, {:?}, {:?}, {})", bytes, align, tag);
        if let Ok(layout) = Self::layout(bytes, align) {
            unsafe {
                rust_alloc::dealloc(ptr.as_ptr(), layout);
            }
        }
    }

    fn debug_prefix() -> &'static str { "R" }
}
