/*!
The C layout of a counted string.

`RawCounted` matches the `(Length, MaximumLength, Buffer)` triple used by foreign counted-string APIs.  It carries no ownership information; use `CountedStr::from_raw`, `CountedBuf::from_raw_mut` or `OwnedStr::from_raw` to say what the memory actually is.
*/
use std::ptr;
use std::slice;

use crate::encoding::Encoding;
use crate::error::{Error, Result};
use crate::structure::{Counted, CountedBuf, CountedStr};

#[repr(C)]
#[derive(Debug)]
pub struct RawCounted<U> {
    pub length: u16,
    pub maximum_length: u16,
    pub buffer: *mut U,
}

pub type RawNarrow = RawCounted<u8>;
pub type RawOem = RawCounted<u8>;
pub type RawWide = RawCounted<u16>;

impl<U> RawCounted<U> {
    pub fn null() -> Self {
        RawCounted {
            length: 0,
            maximum_length: 0,
            buffer: ptr::null_mut(),
        }
    }

    pub fn is_null(&self) -> bool {
        self.buffer.is_null()
    }
}

impl<U> Default for RawCounted<U> {
    fn default() -> Self {
        RawCounted::null()
    }
}

/**
Describes a borrowed string with the C layout.  The result aliases the string's memory; it must not be used to free it.
*/
pub fn to_raw<E, C>(string: &C) -> RawCounted<E::Unit> where E: Encoding, C: Counted<E> + ?Sized {
    RawCounted {
        length: string.length(),
        maximum_length: string.capacity(),
        buffer: if string.is_null() { ptr::null_mut() } else { string.storage().as_ptr() as *mut _ },
    }
}

fn check_raw<E>(raw: &RawCounted<E::Unit>) -> Result<()> where E: Encoding {
    let (len, cap) = (raw.length as usize, raw.maximum_length as usize);
    if raw.buffer.is_null() {
        if len != 0 || cap != 0 {
            return Err(Error::InvalidParameter("null buffer with non-zero size"));
        }
        return Ok(());
    }
    if len > cap || len % E::unit_size() != 0 {
        return Err(Error::InvalidParameter("malformed counted string"));
    }
    Ok(())
}

impl<'a, E> CountedStr<'a, E> where E: Encoding {
    /**
    Borrows a string from its C layout.

    # Safety

    `raw.buffer` must be null, or valid for reads of `raw.maximum_length` bytes for the lifetime `'a`.
    */
    pub unsafe fn from_raw(raw: &RawCounted<E::Unit>) -> Result<Self> {
        check_raw::<E>(raw)?;
        if raw.buffer.is_null() {
            return Ok(CountedStr::null());
        }
        let units = raw.maximum_length as usize / E::unit_size();
        let storage: &'a [E::Unit] = unsafe { slice::from_raw_parts(raw.buffer, units) };
        CountedStr::from_parts(storage, raw.length)
    }
}

impl<'a, E> CountedBuf<'a, E> where E: Encoding {
    /**
    Mutably borrows a string from its C layout.  A null buffer has nowhere to write, and is rejected.

    # Safety

    `raw.buffer` must be valid for reads and writes of `raw.maximum_length` bytes for the lifetime `'a`, and nothing else may access it during that time.
    */
    pub unsafe fn from_raw_mut(raw: &RawCounted<E::Unit>) -> Result<Self> {
        check_raw::<E>(raw)?;
        if raw.buffer.is_null() {
            return Err(Error::InvalidParameter("null buffer"));
        }
        let units = raw.maximum_length as usize / E::unit_size();
        let storage: &'a mut [E::Unit] = unsafe { slice::from_raw_parts_mut(raw.buffer, units) };
        CountedBuf::from_parts(storage, raw.length)
    }
}
