/*!
This crate defines counted strings: buffers with an explicit byte length and a separate byte capacity, independent of any terminator, in three encodings: narrow, OEM and wide.  It also defines the conversions between them, and the small codecs and relations built on the same buffer discipline.

For more details, see the [additional documentation](doc/index.html).

# Quick Reference

The following table describes the string types, and when to use them.  Which conversion functions fail, truncate or allocate is described in the `convert` module.

| Situation | Documented properties | Rust Type |
| ---: | --- | --- |
| Reading a string | *Unowned*, read-only | `CountedStr<E>` |
| … | Zero-terminated narrow text | `CountedStr::<Narrow>::from_terminated` |
| Writing into a caller's buffer | *Unowned*, fixed capacity | `CountedBuf<E>` |
| Receiving a newly allocated string | *Owned*, freed on drop | `OwnedStr<E, A>` |
| Crossing an FFI boundary | `#[repr(C)]` length, maximum length, buffer | `RawCounted<U>` |

Here, `E` is one of `Narrow`, `Oem` or `Wide`, and `A` is one of `RustHeap` or `Malloc`.
*/
pub mod alloc;
pub mod compare;
pub mod convert;
#[doc(hidden)] pub mod doc;
pub mod encoding;
pub mod error;
pub mod ffi;
pub mod guid;
pub mod mutate;
pub mod numeric;
pub mod owned;
pub mod structure;

mod util;

use crate::alloc as a;
use crate::encoding as e;
use crate::structure as s;

pub use crate::convert::{Fit, Nls, NlsConfig};
pub use crate::error::{Error, Result};
pub use crate::ffi::RawCounted;
pub use crate::guid::Guid;
pub use crate::owned::{DuplicateFlags, OwnedStr};
pub use crate::structure::{Counted, CountedBuf, CountedMut, CountedStr};

pub type NarrowStr<'a> = s::CountedStr<'a, e::Narrow>;
pub type OemStr<'a> = s::CountedStr<'a, e::Oem>;
pub type WideStr<'a> = s::CountedStr<'a, e::Wide>;

pub type NarrowBuf<'a> = s::CountedBuf<'a, e::Narrow>;
pub type OemBuf<'a> = s::CountedBuf<'a, e::Oem>;
pub type WideBuf<'a> = s::CountedBuf<'a, e::Wide>;

pub type NarrowString<A = a::RustHeap> = owned::OwnedStr<e::Narrow, A>;
pub type OemString<A = a::RustHeap> = owned::OwnedStr<e::Oem, A>;
pub type WideString<A = a::RustHeap> = owned::OwnedStr<e::Wide, A>;
