/*!
The counted-string model.

A counted string is a (length, capacity, buffer) triple.  Both sizes are in *bytes*, and both fit in 16 bits.  The length never includes a terminator; when a terminator is written, it sits inside the capacity just past the length.

There are three representations, distinguished by type rather than by a runtime flag:

- `CountedStr` is a read-only view over memory the caller owns.  It is `Copy` and is never freed.
- `CountedBuf` is a writable view over caller-owned storage.  Operations can fill it, but never free it or grow it.
- `OwnedStr` (see the `owned` module) is allocated by this crate, and freed exactly once when dropped.

The `Counted` and `CountedMut` traits let every operation accept any of them.
*/
use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::encoding::{Encoding, Unit, Wide};
use crate::error::{Error, Result};
use crate::util::terminated_len;

/**
Largest byte count representable in a length or capacity field.
*/
pub const MAX_COUNTED_BYTES: usize = 0xFFFF;

/**
Largest length, in bytes, accepted for a wide view built from terminated text.  This leaves room for the terminator in the capacity field.

This is `max_terminated_length::<Wide>()`, spelled out.
*/
pub const MAX_WIDE_TERMINATED_BYTES: usize = 0xFFFC;

/**
Largest capacity, in bytes, a string of encoding `E` can have.  Always a multiple of the unit size.
*/
pub fn max_capacity<E>() -> usize where E: Encoding {
    MAX_COUNTED_BYTES / E::unit_size() * E::unit_size()
}

/**
Largest length, in bytes, a view built from terminated text can have while still counting its terminator in the capacity.
*/
pub fn max_terminated_length<E>() -> usize where E: Encoding {
    max_capacity::<E>() - E::unit_size()
}

/**
Read access to a counted string of encoding `E`.
*/
pub trait Counted<E> where E: Encoding {
    /**
    Occupied size, in bytes.
    */
    fn length(&self) -> u16;

    /**
    Available size, in bytes.
    */
    fn capacity(&self) -> u16;

    /**
    Returns `true` if there is no buffer at all.
    */
    fn is_null(&self) -> bool;

    /**
    The whole buffer, `capacity` bytes long.  Empty for null strings.
    */
    fn storage(&self) -> &[E::Unit];

    /**
    The occupied units.
    */
    fn units(&self) -> &[E::Unit] {
        let n = self.length() as usize / E::unit_size();
        &self.storage()[..n]
    }

    /**
    Re-borrows this string as a read-only view.
    */
    fn as_counted_str(&self) -> CountedStr<'_, E> {
        if self.is_null() {
            CountedStr::null()
        } else {
            CountedStr {
                storage: Some(self.storage()),
                length: self.length(),
                _marker: PhantomData,
            }
        }
    }
}

/**
Write access to a counted string of encoding `E`.

The capacity can never change through this trait.
*/
pub trait CountedMut<E>: Counted<E> where E: Encoding {
    /**
    The whole buffer, `capacity` bytes long.
    */
    fn storage_mut(&mut self) -> &mut [E::Unit];

    /**
    Sets the occupied size, in bytes.

    Callers must keep `length <= capacity`, and a multiple of the unit size.
    */
    fn set_length(&mut self, length: u16);
}

/**
Clamps a storage size in units down to the largest capacity, in bytes, the 16-bit fields can describe.
*/
pub(crate) fn clamp_capacity<E>(units: usize) -> u16 where E: Encoding {
    let bytes = units.saturating_mul(E::unit_size()).min(max_capacity::<E>());
    bytes as u16
}

/**
A borrowed, read-only counted string.

Views never own their memory; dropping one does nothing.
*/
pub struct CountedStr<'a, E> where E: Encoding {
    storage: Option<&'a [E::Unit]>,
    length: u16,
    _marker: PhantomData<E>,
}

impl<'a, E> CountedStr<'a, E> where E: Encoding {
    /**
    The null string: no buffer, zero length and zero capacity.
    */
    pub fn null() -> Self {
        CountedStr {
            storage: None,
            length: 0,
            _marker: PhantomData,
        }
    }

    /**
    A view whose length and capacity both cover exactly `units`.

    # Failure

    Fails with `NameTooLong` if `units` cannot be described by a 16-bit byte count.
    */
    pub fn new(units: &'a [E::Unit]) -> Result<Self> {
        let bytes = units.len() * E::unit_size();
        if bytes > max_capacity::<E>() {
            return Err(Error::NameTooLong);
        }

        Ok(CountedStr {
            storage: Some(units),
            length: bytes as u16,
            _marker: PhantomData,
        })
    }

    /**
    A view over terminated text.

    The length covers the units before the first zero unit.  If a zero unit is present, the capacity covers it too; otherwise the whole slice is the string.

    # Failure

    Fails with `NameTooLong` if the length exceeds `max_terminated_length::<E>()`.
    */
    pub fn from_terminated(text: &'a [E::Unit]) -> Result<Self> {
        let len = terminated_len(text);
        if len * E::unit_size() > max_terminated_length::<E>() {
            return Err(Error::NameTooLong);
        }

        let cap = if len < text.len() { len + 1 } else { len };
        Ok(CountedStr {
            storage: Some(&text[..cap]),
            length: (len * E::unit_size()) as u16,
            _marker: PhantomData,
        })
    }

    /**
    A view with an explicit length over `storage`, which provides the capacity.

    # Failure

    Fails with `InvalidParameter` if `length` exceeds the storage or is not a whole number of units, and with `NameTooLong` if the storage cannot be described by a 16-bit byte count.
    */
    pub fn from_parts(storage: &'a [E::Unit], length: u16) -> Result<Self> {
        if storage.len() * E::unit_size() > max_capacity::<E>() {
            return Err(Error::NameTooLong);
        }
        if length as usize > storage.len() * E::unit_size() || length as usize % E::unit_size() != 0 {
            return Err(Error::InvalidParameter("length does not fit the storage"));
        }

        Ok(CountedStr {
            storage: Some(storage),
            length: length,
            _marker: PhantomData,
        })
    }

    /**
    The occupied units, with the lifetime of the underlying memory.
    */
    pub fn as_units(&self) -> &'a [E::Unit] {
        match self.storage {
            Some(storage) => &storage[..self.length as usize / E::unit_size()],
            None => &[],
        }
    }
}

impl<'a, E> Counted<E> for CountedStr<'a, E> where E: Encoding {
    fn length(&self) -> u16 {
        self.length
    }

    fn capacity(&self) -> u16 {
        self.storage.map(|s| (s.len() * E::unit_size()) as u16).unwrap_or(0)
    }

    fn is_null(&self) -> bool {
        self.storage.is_none()
    }

    fn storage(&self) -> &[E::Unit] {
        self.storage.unwrap_or(&[])
    }
}

impl<'a, E> Clone for CountedStr<'a, E> where E: Encoding {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, E> Copy for CountedStr<'a, E> where E: Encoding {}

impl<'a, E> Default for CountedStr<'a, E> where E: Encoding {
    fn default() -> Self {
        CountedStr::null()
    }
}

impl<'a, E> Debug for CountedStr<'a, E> where E: Encoding {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_units::<E>(fmt, "", self.as_units(), self.capacity())
    }
}

impl<'a, E> Eq for CountedStr<'a, E> where E: Encoding {}

impl<'a, E> Hash for CountedStr<'a, E> where E: Encoding {
    fn hash<H>(&self, state: &mut H) where H: Hasher {
        self.as_units().hash(state)
    }
}

impl<'a, 'b, E> PartialEq<CountedStr<'b, E>> for CountedStr<'a, E> where E: Encoding {
    fn eq(&self, other: &CountedStr<'b, E>) -> bool {
        self.as_units() == other.as_units()
    }
}

impl<'a, E> Ord for CountedStr<'a, E> where E: Encoding {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_units().cmp(other.as_units())
    }
}

impl<'a, E> PartialOrd for CountedStr<'a, E> where E: Encoding {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/**
A counted string over caller-supplied, writable storage.

The storage is borrowed for the lifetime of the `CountedBuf`.  Nothing in this crate frees or reallocates it.
*/
pub struct CountedBuf<'a, E> where E: Encoding {
    storage: &'a mut [E::Unit],
    length: u16,
    _marker: PhantomData<E>,
}

impl<'a, E> CountedBuf<'a, E> where E: Encoding {
    /**
    An empty string using all of `storage` as its capacity.

    Storage beyond what a 16-bit byte count can describe is ignored.
    */
    pub fn new(storage: &'a mut [E::Unit]) -> Self {
        let cap = clamp_capacity::<E>(storage.len()) as usize / E::unit_size();
        CountedBuf {
            storage: &mut storage[..cap],
            length: 0,
            _marker: PhantomData,
        }
    }

    /**
    A string over `storage` that already holds `length` bytes.

    # Failure

    Fails with `InvalidParameter` if `length` exceeds the usable storage or is not a whole number of units.
    */
    pub fn from_parts(storage: &'a mut [E::Unit], length: u16) -> Result<Self> {
        let mut buf = CountedBuf::new(storage);
        if length > buf.capacity() || length as usize % E::unit_size() != 0 {
            return Err(Error::InvalidParameter("length does not fit the storage"));
        }
        buf.length = length;
        Ok(buf)
    }

    /**
    A string over terminated text in writable storage.  The length stops at the first zero unit; the capacity is the whole storage.
    */
    pub fn from_terminated(storage: &'a mut [E::Unit]) -> Self {
        let len = terminated_len(storage);
        let mut buf = CountedBuf::new(storage);
        let len_b = (len * E::unit_size()).min(buf.capacity() as usize);
        buf.length = len_b as u16;
        buf
    }

    /**
    Releases the borrow, returning the storage.
    */
    pub fn into_storage(self) -> &'a mut [E::Unit] {
        self.storage
    }
}

impl<'a, E> Counted<E> for CountedBuf<'a, E> where E: Encoding {
    fn length(&self) -> u16 {
        self.length
    }

    fn capacity(&self) -> u16 {
        (self.storage.len() * E::unit_size()) as u16
    }

    fn is_null(&self) -> bool {
        false
    }

    fn storage(&self) -> &[E::Unit] {
        &self.storage[..]
    }
}

impl<'a, E> CountedMut<E> for CountedBuf<'a, E> where E: Encoding {
    fn storage_mut(&mut self) -> &mut [E::Unit] {
        &mut self.storage[..]
    }

    fn set_length(&mut self, length: u16) {
        debug_assert!(length <= self.capacity());
        self.length = length;
    }
}

impl<'a, E> Debug for CountedBuf<'a, E> where E: Encoding {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_units::<E>(fmt, "", self.units(), self.capacity())
    }
}

/**
Writes a counted string in the form `W"text"/cap`, escaping anything outside printable ASCII.
*/
pub(crate) fn debug_units<E>(fmt: &mut fmt::Formatter<'_>, prefix: &str, units: &[E::Unit], capacity: u16) -> fmt::Result
where E: Encoding {
    write!(fmt, "{}{}\"", E::debug_prefix(), prefix)?;
    for &unit in units {
        match unit.to_u32() {
            c @ 0x20..=0x7E if c != b'"' as u32 && c != b'\\' as u32 => write!(fmt, "{}", c as u8 as char)?,
            c if E::unit_size() == 1 => write!(fmt, "\\x{:02x}", c)?,
            c => write!(fmt, "\\u{{{:04x}}}", c)?,
        }
    }
    write!(fmt, "\"/{}", capacity)
}

/**
Validation flags accepted by `validate_wide`.  None are defined.
*/
pub const VALIDATE_FLAGS_NONE: u32 = 0;

/**
Checks that a wide counted string is well formed.

A null string is valid.  Otherwise the length and capacity must both be even, and the capacity must cover the length.  No flags are defined; any non-zero `flags` fails.
*/
pub fn validate_wide<C>(flags: u32, string: Option<&C>) -> Result<()> where C: Counted<Wide> + ?Sized {
    if flags != VALIDATE_FLAGS_NONE {
        return Err(Error::InvalidParameter("unknown validation flags"));
    }

    let string = match string {
        Some(s) => s,
        None => return Ok(()),
    };

    if string.is_null() {
        if string.length() == 0 && string.capacity() == 0 {
            return Ok(());
        }
        return Err(Error::InvalidParameter("null buffer with non-zero size"));
    }

    let (len, cap) = (string.length(), string.capacity());
    if len % 2 != 0 || cap % 2 != 0 || cap < len {
        return Err(Error::InvalidParameter("malformed counted string"));
    }
    Ok(())
}
