/*!
Engine-owned counted strings.

An `OwnedStr` is the only kind of counted string this crate ever frees.  Its buffer comes from the allocator `A`, tagged with the pool tag of its encoding, and goes back to the same allocator with the same tag exactly once: either through an explicit `free`, or when the value is dropped.
*/
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;
use std::slice;

use bitflags::bitflags;
use log::trace;

use crate::alloc::{Allocator, RustHeap};
use crate::encoding::{Encoding, Unit};
use crate::error::{Error, Result};
use crate::ffi::RawCounted;
use crate::structure::{debug_units, max_capacity, max_terminated_length, Counted, CountedMut, CountedStr};
use crate::util::terminated_len;

bitflags! {
    /**
    Flags accepted by `OwnedStr::duplicate`.
    */
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct DuplicateFlags: u32 {
        /// Reserve one extra unit of capacity and write a terminator into it.
        const NULL_TERMINATE = 0x1;
        /// Together with `NULL_TERMINATE`, allocate even when the source is empty.
        const ALLOCATE_NULL_STRING = 0x2;
    }
}

/**
A counted string whose buffer was allocated by this crate.

# Parameters

`E` is the encoding of the contents, and also selects the pool tag used for the allocation.

`A` is the allocator which manages the buffer.  Defaults to the Rust heap.
*/
pub struct OwnedStr<E, A = RustHeap> where E: Encoding, A: Allocator {
    ptr: Option<NonNull<E::Unit>>,
    length: u16,
    capacity: u16,
    _marker: PhantomData<(E, A)>,
}

impl<E, A> OwnedStr<E, A> where E: Encoding, A: Allocator {
    /**
    The null string.  Dropping it frees nothing.
    */
    pub fn null() -> Self {
        OwnedStr {
            ptr: None,
            length: 0,
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /**
    Allocates a zero-filled, empty string with a capacity of `bytes`.

    # Failure

    Fails with `InvalidParameter` if `bytes` is larger than the 16-bit capacity field allows, or is not a whole number of units.  Fails with `OutOfMemory` if the allocator does.
    */
    pub fn allocate(bytes: usize) -> Result<Self> {
        if bytes > max_capacity::<E>() || bytes % E::unit_size() != 0 {
            return Err(Error::InvalidParameter("capacity out of range"));
        }

        let ptr = A::alloc_bytes(bytes, mem::align_of::<E::Unit>(), E::TAG)?;
        trace!("OwnedStr::allocate: {}{} {} bytes", A::debug_prefix(), E::debug_prefix(), bytes);
        Ok(OwnedStr {
            ptr: Some(ptr.cast()),
            length: 0,
            capacity: bytes as u16,
            _marker: PhantomData,
        })
    }

    /**
    Allocates a string holding a copy of `units`.  If `terminate` is set, one extra unit of capacity is reserved and zeroed.

    # Failure

    Fails with `NameTooLong` if the result would not fit the 16-bit fields.
    */
    pub fn from_units(units: &[E::Unit], terminate: bool) -> Result<Self> {
        let len = units.len() * E::unit_size();
        let cap = if terminate { len + E::unit_size() } else { len };
        if cap > max_capacity::<E>() {
            return Err(Error::NameTooLong);
        }

        let mut owned = Self::allocate(cap)?;
        owned.storage_mut()[..units.len()].copy_from_slice(units);
        owned.length = len as u16;
        Ok(owned)
    }

    /**
    Creates a terminated copy of terminated text.  The length covers the units before the first zero unit.

    # Failure

    Fails with `NameTooLong` if that length exceeds `max_terminated_length::<E>()`.
    */
    pub fn create_terminated(text: &[E::Unit]) -> Result<Self> {
        let len = terminated_len(text);
        if len * E::unit_size() > max_terminated_length::<E>() {
            return Err(Error::NameTooLong);
        }
        Self::from_units(&text[..len], true)
    }

    /**
    Duplicates `src` into a new allocation.

    `flags` is a combination of `DuplicateFlags` bits.  An empty source produces the null string unless both `NULL_TERMINATE` and `ALLOCATE_NULL_STRING` are given, in which case a buffer holding just the terminator is allocated.

    # Failure

    Fails with `InvalidParameter` for unknown flag bits, and with `NameTooLong` if the terminator does not fit the 16-bit capacity.
    */
    pub fn duplicate<C>(flags: u32, src: &C) -> Result<Self> where C: Counted<E> + ?Sized {
        let flags = DuplicateFlags::from_bits(flags)
            .ok_or(Error::InvalidParameter("unknown duplicate flags"))?;

        if src.length() == 0 && !flags.contains(DuplicateFlags::all()) {
            return Ok(Self::null());
        }
        Self::from_units(src.units(), flags.contains(DuplicateFlags::NULL_TERMINATE))
    }

    /**
    Frees the buffer and zeroes the triple.  Calling this on a null string does nothing.
    */
    pub fn free(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            trace!("OwnedStr::free: {}{} {} bytes", A::debug_prefix(), E::debug_prefix(), self.capacity);
            unsafe {
                A::free(ptr.cast(), self.capacity as usize, mem::align_of::<E::Unit>(), E::TAG);
            }
        }
        self.length = 0;
        self.capacity = 0;
    }

    /**
    Gives up ownership of the buffer.  The caller becomes responsible for freeing it with `A`, using the pool tag of `E`.
    */
    pub fn into_raw(self) -> RawCounted<E::Unit> {
        let raw = RawCounted {
            length: self.length,
            maximum_length: self.capacity,
            buffer: self.ptr.map(NonNull::as_ptr).unwrap_or(::std::ptr::null_mut()),
        };
        mem::forget(self);
        raw
    }

    /**
    Takes ownership of a raw triple.

    # Safety

    `raw.buffer` must be null, or have been allocated by `A` for `raw.maximum_length` bytes with the pool tag of `E`, and must not be owned by anything else.  `raw.length` must not exceed `raw.maximum_length`.
    */
    pub unsafe fn from_raw(raw: RawCounted<E::Unit>) -> Self {
        match NonNull::new(raw.buffer) {
            Some(ptr) => OwnedStr {
                ptr: Some(ptr),
                length: raw.length,
                capacity: raw.maximum_length,
                _marker: PhantomData,
            },
            None => Self::null(),
        }
    }

    /**
    The occupied units.
    */
    pub fn as_units(&self) -> &[E::Unit] {
        self.units()
    }
}

impl<E, A> Counted<E> for OwnedStr<E, A> where E: Encoding, A: Allocator {
    fn length(&self) -> u16 {
        self.length
    }

    fn capacity(&self) -> u16 {
        self.capacity
    }

    fn is_null(&self) -> bool {
        self.ptr.is_none()
    }

    fn storage(&self) -> &[E::Unit] {
        match self.ptr {
            Some(ptr) => unsafe {
                slice::from_raw_parts(ptr.as_ptr(), self.capacity as usize / E::unit_size())
            },
            None => &[],
        }
    }
}

impl<E, A> CountedMut<E> for OwnedStr<E, A> where E: Encoding, A: Allocator {
    fn storage_mut(&mut self) -> &mut [E::Unit] {
        match self.ptr {
            Some(ptr) => unsafe {
                slice::from_raw_parts_mut(ptr.as_ptr(), self.capacity as usize / E::unit_size())
            },
            None => &mut [],
        }
    }

    fn set_length(&mut self, length: u16) {
        debug_assert!(length <= self.capacity);
        self.length = length;
    }
}

impl<E, A> Drop for OwnedStr<E, A> where E: Encoding, A: Allocator {
    fn drop(&mut self) {
        self.free();
    }
}

impl<E, A> Debug for OwnedStr<E, A> where E: Encoding, A: Allocator {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_units::<E>(fmt, A::debug_prefix(), self.units(), self.capacity)
    }
}

impl<E, A> Default for OwnedStr<E, A> where E: Encoding, A: Allocator {
    fn default() -> Self {
        Self::null()
    }
}

impl<E, A> Eq for OwnedStr<E, A> where E: Encoding, A: Allocator {}

impl<E, A, B> PartialEq<OwnedStr<E, B>> for OwnedStr<E, A> where E: Encoding, A: Allocator, B: Allocator {
    fn eq(&self, other: &OwnedStr<E, B>) -> bool {
        self.units() == other.units()
    }
}

impl<'b, E, A> PartialEq<CountedStr<'b, E>> for OwnedStr<E, A> where E: Encoding, A: Allocator {
    fn eq(&self, other: &CountedStr<'b, E>) -> bool {
        self.units() == other.as_units()
    }
}

impl<E, A> PartialEq<[E::Unit]> for OwnedStr<E, A> where E: Encoding, A: Allocator {
    fn eq(&self, other: &[E::Unit]) -> bool {
        self.units() == other
    }
}

/**
Checks that the unit one past the length is a terminator.  Used by tests and debug assertions.
*/
pub fn is_terminated<E, C>(string: &C) -> bool where E: Encoding, C: Counted<E> + ?Sized {
    let at = string.length() as usize / E::unit_size();
    string.storage().get(at).map(Unit::is_zero).unwrap_or(false)
}
