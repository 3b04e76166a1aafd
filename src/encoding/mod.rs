/*!
Encoding types and traits.

There are exactly three encodings: `Narrow` (the active "ANSI" code page), `Oem` (the secondary single-byte console code page) and `Wide` (16-bit units).  The first two share a unit type, but are distinct types so that a string cannot move between them without an explicit conversion.
*/
pub mod conv;

use std::fmt::Debug;
use std::hash::Hash;

use crate::alloc::PoolTag;
pub use self::conv::Transcoder;

macro_rules! naive_unit_impl {
    ($ty_name:ident) => {
        impl Unit for $ty_name {
            #[inline]
            fn zero() -> Self {
                0
            }

            #[inline]
            fn is_zero(&self) -> bool {
                *self == 0
            }

            #[inline]
            fn from_ascii(b: u8) -> Self {
                b as $ty_name
            }

            #[inline]
            fn to_u32(self) -> u32 {
                self as u32
            }
        }
    };
}

/**
A single code unit.
*/
pub trait Unit: Copy + Eq + Ord + Hash + Debug + 'static {
    fn zero() -> Self;
    fn is_zero(&self) -> bool;
    fn from_ascii(b: u8) -> Self;
    fn to_u32(self) -> u32;
}

naive_unit_impl! { u8 }
naive_unit_impl! { u16 }

/**
Describes one of the string encodings.

This will be implemented by a marker type which is never instantiated.
*/
pub trait Encoding: 'static {
    type Unit: Unit;

    /**
    The tag that buffers holding this encoding are allocated and freed with.
    */
    const TAG: PoolTag;

    /**
    Returns a string which can be used to uniquely identify this encoding in debug output.
    */
    fn debug_prefix() -> &'static str;

    /**
    Maps a unit to upper case, using whichever mapping the transcoder provides for this encoding.
    */
    fn upcase<T>(transcoder: &T, unit: Self::Unit) -> Self::Unit where T: Transcoder + ?Sized;

    /**
    The size of one unit, in bytes.
    */
    fn unit_size() -> usize {
        ::std::mem::size_of::<Self::Unit>()
    }
}

/**
Selects one of the two byte-oriented code pages.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CodePage {
    Narrow,
    Oem,
}

/**
Implemented by the byte-oriented encodings.
*/
pub trait MultiByte: Encoding<Unit=u8> {
    const CODE_PAGE: CodePage;
}

/**
The active narrow ("ANSI") code page.  May be multi-byte.
*/
pub enum Narrow {}

impl Encoding for Narrow {
    type Unit = u8;
    const TAG: PoolTag = PoolTag::Narrow;

    fn debug_prefix() -> &'static str { "A" }

    fn upcase<T>(transcoder: &T, unit: u8) -> u8 where T: Transcoder + ?Sized {
        transcoder.uppercase_narrow_unit(unit)
    }
}

impl MultiByte for Narrow {
    const CODE_PAGE: CodePage = CodePage::Narrow;
}

/**
The active OEM code page.
*/
pub enum Oem {}

impl Encoding for Oem {
    type Unit = u8;
    const TAG: PoolTag = PoolTag::Oem;

    fn debug_prefix() -> &'static str { "O" }

    fn upcase<T>(transcoder: &T, unit: u8) -> u8 where T: Transcoder + ?Sized {
        transcoder.uppercase_narrow_unit(unit)
    }
}

impl MultiByte for Oem {
    const CODE_PAGE: CodePage = CodePage::Oem;
}

/**
Fixed 16-bit units.
*/
pub enum Wide {}

impl Encoding for Wide {
    type Unit = u16;
    const TAG: PoolTag = PoolTag::Wide;

    fn debug_prefix() -> &'static str { "W" }

    fn upcase<T>(transcoder: &T, unit: u16) -> u16 where T: Transcoder + ?Sized {
        transcoder.uppercase_unit(unit)
    }
}
