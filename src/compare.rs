/*!
Comparison, prefix and hash relations over counted strings.

Case-insensitive relations upcase each unit through the code-page service before comparing, using whichever mapping suits the encoding.  Hashing is the exception: it only folds ASCII letters, so that its results do not depend on the code-page service at all.
*/
use log::debug;

use crate::encoding::{Encoding, Transcoder, Unit, Wide};
use crate::error::{Error, Result};
use crate::structure::Counted;

pub const HASH_STRING_ALGORITHM_DEFAULT: u32 = 0;
pub const HASH_STRING_ALGORITHM_X65599: u32 = 1;

fn fold<E, T>(transcoder: &T, unit: E::Unit, case_insensitive: bool) -> E::Unit
where E: Encoding, T: Transcoder + ?Sized {
    if case_insensitive { E::upcase(transcoder, unit) } else { unit }
}

/**
Compares two strings, returning the signed difference of the first pair of units that differ.

The walk treats an exhausted string as supplying zero units, and stops at the first zero unit on either side.  Units are compared as unsigned values.  If either string is null, the result is 0.
*/
pub fn compare<E, T, A, B>(transcoder: &T, a: &A, b: &B, case_insensitive: bool) -> i32
where
    E: Encoding,
    T: Transcoder + ?Sized,
    A: Counted<E> + ?Sized,
    B: Counted<E> + ?Sized,
{
    if a.is_null() || b.is_null() {
        return 0;
    }

    let mut a = a.units().iter();
    let mut b = b.units().iter();
    loop {
        let c1 = a.next().map(|&u| fold::<E, T>(transcoder, u, case_insensitive)).unwrap_or(<E::Unit as Unit>::zero());
        let c2 = b.next().map(|&u| fold::<E, T>(transcoder, u, case_insensitive)).unwrap_or(<E::Unit as Unit>::zero());
        if c1.is_zero() || c2.is_zero() || c1 != c2 {
            return c1.to_u32() as i32 - c2.to_u32() as i32;
        }
    }
}

/**
Returns `true` if both strings have the same length and the same units.
*/
pub fn equal<E, T, A, B>(transcoder: &T, a: &A, b: &B, case_insensitive: bool) -> bool
where
    E: Encoding,
    T: Transcoder + ?Sized,
    A: Counted<E> + ?Sized,
    B: Counted<E> + ?Sized,
{
    if a.length() != b.length() {
        return false;
    }

    a.units().iter().zip(b.units())
        .all(|(&x, &y)| fold::<E, T>(transcoder, x, case_insensitive) == fold::<E, T>(transcoder, y, case_insensitive))
}

/**
Returns `true` if `target` begins with `pattern`.

A `target` shorter than `pattern` never matches, and neither does a null string on either side.
*/
pub fn is_prefix<E, T, P, S>(transcoder: &T, pattern: &P, target: &S, case_insensitive: bool) -> bool
where
    E: Encoding,
    T: Transcoder + ?Sized,
    P: Counted<E> + ?Sized,
    S: Counted<E> + ?Sized,
{
    if target.length() < pattern.length() {
        return false;
    }
    if pattern.is_null() || target.is_null() {
        return false;
    }

    pattern.units().iter().zip(target.units())
        .all(|(&x, &y)| fold::<E, T>(transcoder, x, case_insensitive) == fold::<E, T>(transcoder, y, case_insensitive))
}

/**
The X65599 hash of a wide string: `h = h * 65599 + unit`, wrapping, starting from zero.

When `case_insensitive` is set, only `a` through `z` are folded to upper case.

# Failure

Fails with `InvalidParameter` for any algorithm other than `HASH_STRING_ALGORITHM_DEFAULT` or `HASH_STRING_ALGORITHM_X65599`.
*/
pub fn hash_wide<C>(string: &C, case_insensitive: bool, algorithm: u32) -> Result<u32>
where C: Counted<Wide> + ?Sized {
    match algorithm {
        HASH_STRING_ALGORITHM_DEFAULT | HASH_STRING_ALGORITHM_X65599 => (),
        _ => {
            debug!("hash_wide: unknown algorithm {}", algorithm);
            return Err(Error::InvalidParameter("unknown hash algorithm"));
        },
    }

    Ok(string.units().iter().fold(0u32, |h, &unit| {
        let unit = match unit {
            0x61..=0x7A if case_insensitive => unit - 0x20,
            _ => unit,
        };
        h.wrapping_mul(65599).wrapping_add(unit as u32)
    }))
}
