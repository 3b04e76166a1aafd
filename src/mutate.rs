/*!
In-place mutation of counted strings.

None of these ever change a destination's capacity.  They work the same way for every encoding; lengths are compared in bytes, and terminators are one unit wide.
*/
use log::debug;

use crate::encoding::{Encoding, Unit};
use crate::error::{Error, Result};
use crate::structure::{Counted, CountedMut};
use crate::util::{terminated_len, zero_fill};

fn append_units<E, D>(dst: &mut D, units: &[E::Unit]) -> Result<()>
where E: Encoding, D: CountedMut<E> + ?Sized {
    if units.is_empty() {
        return Ok(());
    }

    let start = dst.length() as usize;
    let new_len = start + units.len() * E::unit_size();
    let cap = dst.capacity() as usize;
    if new_len > cap {
        debug!("append: {} bytes does not fit capacity {}", new_len, cap);
        return Err(Error::BufferTooSmall);
    }

    {
        let at = start / E::unit_size();
        let storage = dst.storage_mut();
        storage[at..at + units.len()].copy_from_slice(units);
        if cap > new_len {
            storage[new_len / E::unit_size()] = <E::Unit as Unit>::zero();
        }
    }
    dst.set_length(new_len as u16);
    Ok(())
}

/**
Appends the content of `src` to `dst`.

An empty `src` leaves `dst` untouched.  A terminator follows the new content only if there is capacity left for one.

# Failure

Fails with `BufferTooSmall` if the combined length exceeds the capacity of `dst`.  An exact fit succeeds.
*/
pub fn append<E, D, S>(dst: &mut D, src: &S) -> Result<()>
where E: Encoding, D: CountedMut<E> + ?Sized, S: Counted<E> + ?Sized {
    append_units::<E, D>(dst, src.units())
}

/**
Appends terminated text to `dst`.  Only the units before the first zero unit are appended.  See `append`.
*/
pub fn append_terminated<E, D>(dst: &mut D, text: &[E::Unit]) -> Result<()>
where E: Encoding, D: CountedMut<E> + ?Sized {
    let len = terminated_len(text);
    append_units::<E, D>(dst, &text[..len])
}

/**
Overwrites `dst` with as much of `src` as fits, never failing.

A terminator follows the copied content if there is capacity left for one.  A missing `src` just empties `dst`.
*/
pub fn copy<E, D, S>(dst: &mut D, src: Option<&S>)
where E: Encoding, D: CountedMut<E> + ?Sized, S: Counted<E> + ?Sized {
    let src = match src {
        Some(src) => src,
        None => {
            dst.set_length(0);
            return;
        },
    };

    let cap = dst.capacity() as usize;
    let len = cap.min(src.length() as usize);
    let units = len / E::unit_size();
    {
        let storage = dst.storage_mut();
        storage[..units].copy_from_slice(&src.units()[..units]);
        if cap >= len + E::unit_size() {
            storage[units] = <E::Unit as Unit>::zero();
        }
    }
    dst.set_length(len as u16);
}

/**
Zeroes the whole capacity of `dst`, not just its content, and empties it.  Null or zero-capacity strings are left alone.
*/
pub fn erase<E, D>(dst: &mut D) where E: Encoding, D: CountedMut<E> + ?Sized {
    if dst.is_null() || dst.capacity() == 0 {
        return;
    }
    zero_fill(dst.storage_mut());
    dst.set_length(0);
}
