/*!
Integer text codec.

Parsing is deliberately forgiving: it skips leading whitespace and control characters, accepts a sign, stops quietly at the first character that is not a digit of the base, and lets the accumulator wrap.  Rendering is strict about the destination size.
*/
use log::debug;

use crate::encoding::{Unit, Wide};
use crate::error::{Error, Result};
use crate::structure::Counted;
use crate::util::trim_terminated;

/**
Room for the longest rendering: 64 binary digits, plus a terminator.
*/
const SCRATCH_LEN: usize = 65;

fn check_base(base: u32) -> Result<u32> {
    match base {
        2 | 8 | 10 | 16 => Ok(base),
        _ => {
            debug!("unsupported radix {}", base);
            Err(Error::InvalidParameter("radix must be 2, 8, 10 or 16"))
        },
    }
}

/**
The value of `unit` as a digit, in the range 0-35, or `None`.  Letters of either case are accepted.
*/
pub fn digit_value<U>(unit: U) -> Option<u32> where U: Unit {
    let c = unit.to_u32();
    match c {
        0x30..=0x39 => Some(c - 0x30),
        0x41..=0x5A => Some(c - 0x41 + 10),
        0x61..=0x7A => Some(c - 0x61 + 10),
        _ => None,
    }
}

/**
Parses an unsigned 32-bit integer from `text`, writing it to `value`.

Leading units at or below the space character are skipped, then an optional `+` or `-`.  With `base` 0, a lowercase `0b`, `0o` or `0x` prefix selects the base, defaulting to 10.  Otherwise `base` must be 2, 8, 10 or 16.

Accumulation wraps silently.  Parsing stops at the first unit that is not a digit of the base; whatever was accumulated, with the sign applied, is still written and the call succeeds.

# Failure

Fails with `InvalidParameter` for an unsupported base.  The base is checked first; a missing `value` then fails with `AccessViolation`.
*/
pub fn text_to_integer_into<U>(text: &[U], base: u32, value: Option<&mut u32>) -> Result<()> where U: Unit {
    let mut text = text;
    while let Some((&first, rest)) = text.split_first() {
        if first.to_u32() > 0x20 {
            break;
        }
        text = rest;
    }

    let mut negative = false;
    if let Some((&first, rest)) = text.split_first() {
        match first.to_u32() {
            0x2B => text = rest,
            0x2D => {
                negative = true;
                text = rest;
            },
            _ => (),
        }
    }

    let base = if base == 0 {
        let prefixed = match text {
            [zero, marker, ..] if zero.to_u32() == 0x30 => match marker.to_u32() {
                0x62 => Some(2),
                0x6F => Some(8),
                0x78 => Some(16),
                _ => None,
            },
            _ => None,
        };
        match prefixed {
            Some(b) => {
                text = &text[2..];
                b
            },
            None => 10,
        }
    } else {
        check_base(base)?
    };

    let value = value.ok_or(Error::AccessViolation)?;

    let mut total: u32 = 0;
    for &unit in text {
        match digit_value(unit) {
            Some(d) if d < base => total = total.wrapping_mul(base).wrapping_add(d),
            _ => break,
        }
    }

    *value = if negative { total.wrapping_neg() } else { total };
    Ok(())
}

/**
Parses an unsigned 32-bit integer from `text`.  See `text_to_integer_into`.
*/
pub fn text_to_integer<U>(text: &[U], base: u32) -> Result<u32> where U: Unit {
    let mut value = 0;
    text_to_integer_into(text, base, Some(&mut value))?;
    Ok(value)
}

/**
Parses terminated narrow text.  Only the units before the first zero unit are considered.
*/
pub fn char_to_integer(text: &[u8], base: u32, value: Option<&mut u32>) -> Result<()> {
    text_to_integer_into(trim_terminated(text), base, value)
}

/**
Parses the content of a wide counted string.
*/
pub fn wide_to_integer<C>(string: &C, base: u32, value: Option<&mut u32>) -> Result<()>
where C: Counted<Wide> + ?Sized {
    text_to_integer_into(string.units(), base, value)
}

fn render<U>(mut value: u64, base: u32, dst: &mut [U]) -> Result<usize> where U: Unit {
    let radix = match base {
        0 => 10,
        b => check_base(b)?,
    } as u64;

    let mut scratch = [0u8; SCRATCH_LEN];
    let mut n = 0;
    loop {
        let d = (value % radix) as u8;
        value /= radix;
        scratch[n] = if d < 10 { b'0' + d } else { b'a' + d - 10 };
        n += 1;
        if value == 0 {
            break;
        }
    }

    if n >= dst.len() {
        debug!("rendering needs {} units plus terminator, limit is {}", n, dst.len());
        return Err(Error::BufferTooSmall);
    }

    for (d, &s) in dst.iter_mut().zip(scratch[..n].iter().rev()) {
        *d = U::from_ascii(s);
    }
    dst[n] = U::zero();
    Ok(n)
}

/**
Renders `value` into `dst`, most significant digit first, followed by a terminator.  Returns the number of digits written.

`base` 0 means 10.  Digits above 9 are lowercase.  The length of `dst` is the limit: the digits plus terminator must fit inside it.

# Failure

Fails with `InvalidParameter` for an unsupported base, and with `BufferTooSmall` if the digits do not leave room for the terminator.
*/
pub fn integer_to_text<U>(value: u32, base: u32, dst: &mut [U]) -> Result<usize> where U: Unit {
    render(value as u64, base, dst)
}

/**
The 64-bit form of `integer_to_text`.
*/
pub fn large_integer_to_text<U>(value: u64, base: u32, dst: &mut [U]) -> Result<usize> where U: Unit {
    render(value, base, dst)
}

/**
Renders into a fixed narrow scratch buffer large enough for any value in any base.  Returns the buffer and the digit count.
*/
pub(crate) fn render_scratch(value: u64, base: u32) -> Result<([u8; SCRATCH_LEN + 1], usize)> {
    let mut buf = [0u8; SCRATCH_LEN + 1];
    let n = render(value, base, &mut buf[..])?;
    Ok((buf, n))
}
