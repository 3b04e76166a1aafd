/*!
Encoding conversion support.

The code-page tables themselves live outside this crate.  Everything the conversion engine needs from them is expressed by the `Transcoder` trait; `Latin1` and `Whatwg` are two ready-made implementations.
*/
use crate::encoding::CodePage;
use crate::error::Result;

pub mod latin1;
pub mod whatwg;

pub use self::latin1::Latin1;
pub use self::whatwg::Whatwg;

/**
The code-page service consumed by the conversion engine.

Sizes are in bytes and *exclude* any terminator.  The transcoding methods write at most `dst.len()` units and return how many they wrote; running out of room is not an error.
*/
pub trait Transcoder {
    /**
    Bytes needed to hold `src`, read as `page`, in the wide encoding.
    */
    fn wide_size(&self, page: CodePage, src: &[u8]) -> Result<usize>;

    /**
    Bytes needed to hold `src` in `page`.
    */
    fn multi_byte_size(&self, page: CodePage, src: &[u16]) -> Result<usize>;

    /**
    Convert `src`, read as `page`, into wide units.
    */
    fn to_wide(&self, page: CodePage, dst: &mut [u16], src: &[u8]) -> Result<usize>;

    /**
    Convert wide units into `page`.

    Implementations must not write a partial multi-byte character at the end of `dst`.
    */
    fn from_wide(&self, page: CodePage, dst: &mut [u8], src: &[u16]) -> Result<usize>;

    /**
    Convert wide units into `page`, mapping each to upper case first.
    */
    fn upcase_from_wide(&self, page: CodePage, dst: &mut [u8], src: &[u16]) -> Result<usize> {
        let upper: Vec<u16> = src.iter().map(|&u| self.uppercase_unit(u)).collect();
        self.from_wide(page, dst, &upper)
    }

    fn uppercase_unit(&self, unit: u16) -> u16 {
        simple_uppercase(unit)
    }

    fn lowercase_unit(&self, unit: u16) -> u16 {
        simple_lowercase(unit)
    }

    /**
    Upper case mapping for byte-oriented units, used by narrow and OEM comparisons.
    */
    fn uppercase_narrow_unit(&self, unit: u8) -> u8 {
        unit.to_ascii_uppercase()
    }
}

impl<'a, T> Transcoder for &'a T where T: Transcoder + ?Sized {
    fn wide_size(&self, page: CodePage, src: &[u8]) -> Result<usize> {
        (**self).wide_size(page, src)
    }

    fn multi_byte_size(&self, page: CodePage, src: &[u16]) -> Result<usize> {
        (**self).multi_byte_size(page, src)
    }

    fn to_wide(&self, page: CodePage, dst: &mut [u16], src: &[u8]) -> Result<usize> {
        (**self).to_wide(page, dst, src)
    }

    fn from_wide(&self, page: CodePage, dst: &mut [u8], src: &[u16]) -> Result<usize> {
        (**self).from_wide(page, dst, src)
    }

    fn upcase_from_wide(&self, page: CodePage, dst: &mut [u8], src: &[u16]) -> Result<usize> {
        (**self).upcase_from_wide(page, dst, src)
    }

    fn uppercase_unit(&self, unit: u16) -> u16 {
        (**self).uppercase_unit(unit)
    }

    fn lowercase_unit(&self, unit: u16) -> u16 {
        (**self).lowercase_unit(unit)
    }

    fn uppercase_narrow_unit(&self, unit: u8) -> u8 {
        (**self).uppercase_narrow_unit(unit)
    }
}

/**
One-to-one upper case mapping of a single wide unit.

Surrogates, and characters whose upper case form is not exactly one BMP character (such as `ß`), are returned unchanged.
*/
pub fn simple_uppercase(unit: u16) -> u16 {
    map_single(unit, |c| c.to_uppercase())
}

/**
One-to-one lower case mapping of a single wide unit.  See `simple_uppercase`.
*/
pub fn simple_lowercase(unit: u16) -> u16 {
    map_single(unit, |c| c.to_lowercase())
}

fn map_single<F, It>(unit: u16, f: F) -> u16
where
    F: FnOnce(char) -> It,
    It: Iterator<Item=char>,
{
    let c = match char::from_u32(unit as u32) {
        Some(c) => c,
        None => return unit,
    };

    let mut mapped = f(c);
    match (mapped.next(), mapped.next()) {
        (Some(m), None) if (m as u32) <= 0xFFFF => m as u32 as u16,
        _ => unit,
    }
}
