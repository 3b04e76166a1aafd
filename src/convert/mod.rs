/*!
Conversions between the narrow, OEM and wide encodings.

All conversions go through an `Nls` context, which bundles the code-page service with an immutable snapshot of the code-page configuration.  Every conversion comes in two forms:

- `foo(src)` allocates a destination of exactly the required size and returns it.  If the transform fails, the allocation is released before the error is returned.
- `foo_into(dst, src)` writes into a caller-supplied destination.  Whether a too-small destination fails or truncates, whether a terminator is written, and whether the destination is zeroed first, is fixed per conversion:

| Conversion | Too small | Terminator | Zero-fill |
| --- | --- | --- | --- |
| `narrow_to_wide` | fails | yes | content |
| `wide_to_narrow` | truncates, keeping room for the terminator | yes | no |
| `oem_to_wide` | fails | yes | content |
| `oem_to_counted_wide` | fails | no | no |
| `wide_to_oem` | truncates, keeping room for the terminator | yes | no |
| `wide_to_counted_oem` | truncates to the capacity | no | no |
| `upcase_wide_to_narrow` | truncates, keeping room for the terminator | yes | content |
| `upcase_wide_to_oem` | truncates, keeping room for the terminator | yes | allocation only |
| `upcase_wide_to_counted_oem` | truncates to the capacity | no | content |
| `upcase_wide`, `downcase_wide` | fails | no | no |

A destination with no capacity always fails with `BufferTooSmall`, and a required size beyond the 16-bit maximum always fails with `InvalidParameter`.
*/
pub mod policy;

use std::marker::PhantomData;

use log::{debug, trace};

use crate::alloc::{Allocator, RustHeap};
use crate::compare;
use crate::encoding::{CodePage, Encoding, MultiByte, Narrow, Oem, Transcoder, Wide};
use crate::error::{Error, Result};
use crate::numeric;
use crate::owned::OwnedStr;
use crate::structure::{Counted, CountedMut, CountedStr};

pub use self::policy::Fit;
use self::policy::Policy;

/**
Which code pages are "non-trivial", *i.e.* may need more than one byte per character.

When a flag is clear, sizes for that page use the fixed multiplier (one byte per wide unit, two bytes per narrow byte) instead of asking the transcoder.
*/
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NlsConfig {
    pub narrow_multi_byte: bool,
    pub oem_multi_byte: bool,
}

impl NlsConfig {
    pub fn is_multi_byte(&self, page: CodePage) -> bool {
        match page {
            CodePage::Narrow => self.narrow_multi_byte,
            CodePage::Oem => self.oem_multi_byte,
        }
    }
}

/**
A conversion context: a code-page service, a configuration snapshot, and the allocator used for allocating conversions.
*/
pub struct Nls<T, A = RustHeap> where T: Transcoder, A: Allocator {
    transcoder: T,
    config: NlsConfig,
    _marker: PhantomData<A>,
}

impl<T> Nls<T, RustHeap> where T: Transcoder {
    pub fn new(transcoder: T, config: NlsConfig) -> Self {
        Nls::with_allocator(transcoder, config)
    }
}

impl<T, A> Nls<T, A> where T: Transcoder, A: Allocator {
    /**
    Creates a context whose allocating conversions use `A`.
    */
    pub fn with_allocator(transcoder: T, config: NlsConfig) -> Self {
        Nls {
            transcoder: transcoder,
            config: config,
            _marker: PhantomData,
        }
    }

    pub fn transcoder(&self) -> &T {
        &self.transcoder
    }

    pub fn config(&self) -> NlsConfig {
        self.config
    }

    /*
    Content sizes, excluding the terminator, as used by the conversions themselves.
    */

    fn content_to_wide(&self, page: CodePage, src: &[u8]) -> Result<usize> {
        if self.config.is_multi_byte(page) {
            self.transcoder.wide_size(page, src)
        } else {
            Ok(src.len() * 2)
        }
    }

    fn content_from_wide(&self, page: CodePage, src: &[u16]) -> Result<usize> {
        if self.config.is_multi_byte(page) {
            self.transcoder.multi_byte_size(page, src)
        } else {
            Ok(src.len())
        }
    }

    /**
    Bytes needed to hold `src` as wide text, including the terminator.  Always asks the transcoder.
    */
    pub fn narrow_to_wide_size<S>(&self, src: &S) -> Result<usize> where S: Counted<Narrow> + ?Sized {
        Ok(self.transcoder.wide_size(CodePage::Narrow, src.units())? + 2)
    }

    /**
    Bytes needed to hold `src` as wide text, including the terminator.  Always asks the transcoder.
    */
    pub fn oem_to_wide_size<S>(&self, src: &S) -> Result<usize> where S: Counted<Oem> + ?Sized {
        Ok(self.transcoder.wide_size(CodePage::Oem, src.units())? + 2)
    }

    /**
    Bytes needed to hold `src` as narrow text, including the terminator.  Always asks the transcoder.
    */
    pub fn wide_to_narrow_size<S>(&self, src: &S) -> Result<usize> where S: Counted<Wide> + ?Sized {
        Ok(self.transcoder.multi_byte_size(CodePage::Narrow, src.units())? + 1)
    }

    /**
    Bytes needed to hold `src` as OEM text, including the terminator.  Always asks the transcoder.
    */
    pub fn wide_to_oem_size<S>(&self, src: &S) -> Result<usize> where S: Counted<Wide> + ?Sized {
        Ok(self.transcoder.multi_byte_size(CodePage::Oem, src.units())? + 1)
    }

    /*
    Direction helpers.  Each pairs a policy with a content size and a transform.
    */

    fn multi_byte_to_wide<E, S>(&self, policy: &Policy, src: &S) -> Result<OwnedStr<Wide, A>>
    where E: MultiByte, S: Counted<E> + ?Sized {
        let src = src.units();
        let len = self.content_to_wide(E::CODE_PAGE, src)?;
        policy.allocate::<Wide, A, _>(len, |out| self.transcoder.to_wide(E::CODE_PAGE, out, src))
    }

    fn multi_byte_to_wide_into<E, D, S>(&self, policy: &Policy, dst: &mut D, src: &S) -> Result<Fit>
    where E: MultiByte, D: CountedMut<Wide> + ?Sized, S: Counted<E> + ?Sized {
        let src = src.units();
        let len = self.content_to_wide(E::CODE_PAGE, src)?;
        policy.fill_existing::<Wide, D, _>(dst, len, |out| self.transcoder.to_wide(E::CODE_PAGE, out, src))
    }

    fn transform_from_wide(&self, page: CodePage, upcase: bool, out: &mut [u8], src: &[u16]) -> Result<usize> {
        if upcase {
            self.transcoder.upcase_from_wide(page, out, src)
        } else {
            self.transcoder.from_wide(page, out, src)
        }
    }

    fn wide_to_multi_byte<E, S>(&self, policy: &Policy, upcase: bool, src: &S) -> Result<OwnedStr<E, A>>
    where E: MultiByte, S: Counted<Wide> + ?Sized {
        let src = src.units();
        let len = self.content_from_wide(E::CODE_PAGE, src)?;
        policy.allocate::<E, A, _>(len, |out| self.transform_from_wide(E::CODE_PAGE, upcase, out, src))
    }

    fn wide_to_multi_byte_into<E, D, S>(&self, policy: &Policy, upcase: bool, dst: &mut D, src: &S) -> Result<Fit>
    where E: MultiByte, D: CountedMut<E> + ?Sized, S: Counted<Wide> + ?Sized {
        let src = src.units();
        let len = self.content_from_wide(E::CODE_PAGE, src)?;
        policy.fill_existing::<E, D, _>(dst, len, |out| self.transform_from_wide(E::CODE_PAGE, upcase, out, src))
    }

    /**
    Converts narrow text to a newly allocated, terminated wide string.
    */
    pub fn narrow_to_wide<S>(&self, src: &S) -> Result<OwnedStr<Wide, A>> where S: Counted<Narrow> + ?Sized {
        self.multi_byte_to_wide::<Narrow, S>(&policy::NARROW_TO_WIDE, src)
    }

    /**
    Converts narrow text into `dst`, which must hold the whole result plus a terminator.
    */
    pub fn narrow_to_wide_into<D, S>(&self, dst: &mut D, src: &S) -> Result<Fit>
    where D: CountedMut<Wide> + ?Sized, S: Counted<Narrow> + ?Sized {
        self.multi_byte_to_wide_into::<Narrow, D, S>(&policy::NARROW_TO_WIDE, dst, src)
    }

    pub fn wide_to_narrow<S>(&self, src: &S) -> Result<OwnedStr<Narrow, A>> where S: Counted<Wide> + ?Sized {
        self.wide_to_multi_byte::<Narrow, S>(&policy::WIDE_TO_NARROW, false, src)
    }

    /**
    Converts wide text into `dst`.  If it does not fit, as much as fits while leaving room for the terminator is written.
    */
    pub fn wide_to_narrow_into<D, S>(&self, dst: &mut D, src: &S) -> Result<Fit>
    where D: CountedMut<Narrow> + ?Sized, S: Counted<Wide> + ?Sized {
        self.wide_to_multi_byte_into::<Narrow, D, S>(&policy::WIDE_TO_NARROW, false, dst, src)
    }

    pub fn oem_to_wide<S>(&self, src: &S) -> Result<OwnedStr<Wide, A>> where S: Counted<Oem> + ?Sized {
        self.multi_byte_to_wide::<Oem, S>(&policy::OEM_TO_WIDE, src)
    }

    pub fn oem_to_wide_into<D, S>(&self, dst: &mut D, src: &S) -> Result<Fit>
    where D: CountedMut<Wide> + ?Sized, S: Counted<Oem> + ?Sized {
        self.multi_byte_to_wide_into::<Oem, D, S>(&policy::OEM_TO_WIDE, dst, src)
    }

    /**
    Converts OEM text to a newly allocated wide string, without a terminator.
    */
    pub fn oem_to_counted_wide<S>(&self, src: &S) -> Result<OwnedStr<Wide, A>> where S: Counted<Oem> + ?Sized {
        self.multi_byte_to_wide::<Oem, S>(&policy::OEM_TO_COUNTED_WIDE, src)
    }

    /**
    Converts OEM text into `dst`, without a terminator.  The whole result must fit.
    */
    pub fn oem_to_counted_wide_into<D, S>(&self, dst: &mut D, src: &S) -> Result<Fit>
    where D: CountedMut<Wide> + ?Sized, S: Counted<Oem> + ?Sized {
        self.multi_byte_to_wide_into::<Oem, D, S>(&policy::OEM_TO_COUNTED_WIDE, dst, src)
    }

    pub fn wide_to_oem<S>(&self, src: &S) -> Result<OwnedStr<Oem, A>> where S: Counted<Wide> + ?Sized {
        self.wide_to_multi_byte::<Oem, S>(&policy::WIDE_TO_OEM, false, src)
    }

    pub fn wide_to_oem_into<D, S>(&self, dst: &mut D, src: &S) -> Result<Fit>
    where D: CountedMut<Oem> + ?Sized, S: Counted<Wide> + ?Sized {
        self.wide_to_multi_byte_into::<Oem, D, S>(&policy::WIDE_TO_OEM, false, dst, src)
    }

    pub fn wide_to_counted_oem<S>(&self, src: &S) -> Result<OwnedStr<Oem, A>> where S: Counted<Wide> + ?Sized {
        self.wide_to_multi_byte::<Oem, S>(&policy::WIDE_TO_COUNTED_OEM, false, src)
    }

    /**
    Converts wide text into `dst`, without a terminator.  If it does not fit, the whole capacity is used.
    */
    pub fn wide_to_counted_oem_into<D, S>(&self, dst: &mut D, src: &S) -> Result<Fit>
    where D: CountedMut<Oem> + ?Sized, S: Counted<Wide> + ?Sized {
        self.wide_to_multi_byte_into::<Oem, D, S>(&policy::WIDE_TO_COUNTED_OEM, false, dst, src)
    }

    pub fn upcase_wide_to_narrow<S>(&self, src: &S) -> Result<OwnedStr<Narrow, A>> where S: Counted<Wide> + ?Sized {
        self.wide_to_multi_byte::<Narrow, S>(&policy::UPCASE_WIDE_TO_NARROW, true, src)
    }

    pub fn upcase_wide_to_narrow_into<D, S>(&self, dst: &mut D, src: &S) -> Result<Fit>
    where D: CountedMut<Narrow> + ?Sized, S: Counted<Wide> + ?Sized {
        self.wide_to_multi_byte_into::<Narrow, D, S>(&policy::UPCASE_WIDE_TO_NARROW, true, dst, src)
    }

    pub fn upcase_wide_to_oem<S>(&self, src: &S) -> Result<OwnedStr<Oem, A>> where S: Counted<Wide> + ?Sized {
        self.wide_to_multi_byte::<Oem, S>(&policy::UPCASE_WIDE_TO_OEM, true, src)
    }

    pub fn upcase_wide_to_oem_into<D, S>(&self, dst: &mut D, src: &S) -> Result<Fit>
    where D: CountedMut<Oem> + ?Sized, S: Counted<Wide> + ?Sized {
        self.wide_to_multi_byte_into::<Oem, D, S>(&policy::UPCASE_WIDE_TO_OEM, true, dst, src)
    }

    pub fn upcase_wide_to_counted_oem<S>(&self, src: &S) -> Result<OwnedStr<Oem, A>> where S: Counted<Wide> + ?Sized {
        self.wide_to_multi_byte::<Oem, S>(&policy::UPCASE_WIDE_TO_COUNTED_OEM, true, src)
    }

    pub fn upcase_wide_to_counted_oem_into<D, S>(&self, dst: &mut D, src: &S) -> Result<Fit>
    where D: CountedMut<Oem> + ?Sized, S: Counted<Wide> + ?Sized {
        self.wide_to_multi_byte_into::<Oem, D, S>(&policy::UPCASE_WIDE_TO_COUNTED_OEM, true, dst, src)
    }

    /*
    Wide to wide case changes.  The required size is exactly the source length, and no terminator is written, so `dst` may be a view of the same text the source was copied from.
    */

    pub fn upcase_char(&self, unit: u16) -> u16 {
        self.transcoder.uppercase_unit(unit)
    }

    /**
    Lower case mapping with an ASCII fast path: units below `A` are unchanged, `A` through `Z` map directly, and everything else asks the transcoder.
    */
    pub fn downcase_char(&self, unit: u16) -> u16 {
        match unit {
            0..=0x40 => unit,
            0x41..=0x5A => unit + 0x20,
            _ => self.transcoder.lowercase_unit(unit),
        }
    }

    pub fn upcase_narrow_char(&self, unit: u8) -> u8 {
        self.transcoder.uppercase_narrow_unit(unit)
    }

    fn map_into(out: &mut [u16], src: &[u16], map: impl Fn(u16) -> u16) -> Result<usize> {
        for (d, &s) in out.iter_mut().zip(src) {
            *d = map(s);
        }
        Ok(out.len().min(src.len()))
    }

    pub fn upcase_wide<S>(&self, src: &S) -> Result<OwnedStr<Wide, A>> where S: Counted<Wide> + ?Sized {
        let src = src.units();
        policy::CHANGE_CASE_WIDE.allocate::<Wide, A, _>(src.len() * 2, |out| {
            Self::map_into(out, src, |u| self.upcase_char(u))
        })
    }

    pub fn upcase_wide_into<D, S>(&self, dst: &mut D, src: &S) -> Result<Fit>
    where D: CountedMut<Wide> + ?Sized, S: Counted<Wide> + ?Sized {
        let src = src.units();
        policy::CHANGE_CASE_WIDE.fill_existing::<Wide, D, _>(dst, src.len() * 2, |out| {
            Self::map_into(out, src, |u| self.upcase_char(u))
        })
    }

    pub fn downcase_wide<S>(&self, src: &S) -> Result<OwnedStr<Wide, A>> where S: Counted<Wide> + ?Sized {
        let src = src.units();
        policy::CHANGE_CASE_WIDE.allocate::<Wide, A, _>(src.len() * 2, |out| {
            Self::map_into(out, src, |u| self.downcase_char(u))
        })
    }

    pub fn downcase_wide_into<D, S>(&self, dst: &mut D, src: &S) -> Result<Fit>
    where D: CountedMut<Wide> + ?Sized, S: Counted<Wide> + ?Sized {
        let src = src.units();
        policy::CHANGE_CASE_WIDE.fill_existing::<Wide, D, _>(dst, src.len() * 2, |out| {
            Self::map_into(out, src, |u| self.downcase_char(u))
        })
    }

    /**
    Copies `src` into `dst` in upper case, within a single byte-oriented encoding.

    At most `capacity - 1` units are copied, and a terminator always follows them.  The length is the number of units copied.

    # Failure

    Fails with `BufferTooSmall` if `dst` has no capacity.
    */
    pub fn upper_into<E, D, S>(&self, dst: &mut D, src: &S) -> Result<Fit>
    where E: MultiByte, D: CountedMut<E> + ?Sized, S: Counted<E> + ?Sized {
        let cap = dst.capacity() as usize;
        if cap == 0 {
            debug!("upper_into: destination has no capacity");
            return Err(Error::BufferTooSmall);
        }

        let src = src.units();
        let n = src.len().min(cap - 1);
        {
            let out = dst.storage_mut();
            for (d, &s) in out.iter_mut().zip(&src[..n]) {
                *d = E::upcase(&self.transcoder, s);
            }
            out[n] = 0;
        }
        dst.set_length(n as u16);

        if n < src.len() {
            trace!("upper_into: truncating {} bytes to {}", src.len(), n);
            Ok(Fit::Truncated)
        } else {
            Ok(Fit::Whole)
        }
    }

    fn decode_char(&self, bytes: &[u8]) -> Result<Option<u16>> {
        let mut wide = [0u16; 2];
        match self.transcoder.to_wide(CodePage::Narrow, &mut wide, bytes)? {
            1 => Ok(Some(wide[0])),
            _ => Ok(None),
        }
    }

    /**
    Converts the narrow character at the start of `text` to a single wide unit.  Returns the unit and the number of bytes consumed.

    The character is one byte, unless the narrow page is multi-byte and the first byte does not decode on its own, in which case a two-byte character is tried.  Anything that still does not decode becomes U+FFFD.

    # Failure

    Fails with `InvalidParameter` if `text` is empty.
    */
    pub fn narrow_char_to_wide_char(&self, text: &[u8]) -> Result<(u16, usize)> {
        if text.is_empty() {
            return Err(Error::InvalidParameter("no character to convert"));
        }

        let single = self.decode_char(&text[..1])?;
        let lead = single.map(|u| u == REPLACEMENT_CHARACTER).unwrap_or(true);
        if self.config.narrow_multi_byte && lead && text.len() >= 2 {
            if let Some(unit) = self.decode_char(&text[..2])? {
                return Ok((unit, 2));
            }
        }
        Ok((single.unwrap_or(REPLACEMENT_CHARACTER), 1))
    }

    /**
    Creates a terminated wide string from terminated narrow text.  Only the units before the first zero unit are converted.
    */
    pub fn create_wide_from_narrow(&self, text: &[u8]) -> Result<OwnedStr<Wide, A>> {
        let text = CountedStr::<Narrow>::from_terminated(text)?;
        self.narrow_to_wide(&text)
    }

    /**
    Renders `value` in `base` (0 meaning 10) and converts it into `dst` with the `narrow_to_wide_into` rules: the digits plus terminator must fit.
    */
    pub fn integer_to_wide_into<D>(&self, value: u32, base: u32, dst: &mut D) -> Result<()>
    where D: CountedMut<Wide> + ?Sized {
        self.rendered_to_wide_into(value as u64, base, dst)
    }

    /**
    The 64-bit form of `integer_to_wide_into`.
    */
    pub fn int64_to_wide_into<D>(&self, value: u64, base: u32, dst: &mut D) -> Result<()>
    where D: CountedMut<Wide> + ?Sized {
        self.rendered_to_wide_into(value, base, dst)
    }

    fn rendered_to_wide_into<D>(&self, value: u64, base: u32, dst: &mut D) -> Result<()>
    where D: CountedMut<Wide> + ?Sized {
        let (digits, n) = numeric::render_scratch(value, base)?;
        let text = CountedStr::<Narrow>::new(&digits[..n])?;
        self.narrow_to_wide_into(dst, &text).map(|_| ())
    }

    /**
    See `compare::compare`.
    */
    pub fn compare<E, X, Y>(&self, a: &X, b: &Y, case_insensitive: bool) -> i32
    where E: Encoding, X: Counted<E> + ?Sized, Y: Counted<E> + ?Sized {
        compare::compare::<E, T, X, Y>(&self.transcoder, a, b, case_insensitive)
    }

    /**
    See `compare::equal`.
    */
    pub fn equal<E, X, Y>(&self, a: &X, b: &Y, case_insensitive: bool) -> bool
    where E: Encoding, X: Counted<E> + ?Sized, Y: Counted<E> + ?Sized {
        compare::equal::<E, T, X, Y>(&self.transcoder, a, b, case_insensitive)
    }

    /**
    See `compare::is_prefix`.
    */
    pub fn is_prefix<E, X, Y>(&self, pattern: &X, target: &Y, case_insensitive: bool) -> bool
    where E: Encoding, X: Counted<E> + ?Sized, Y: Counted<E> + ?Sized {
        compare::is_prefix::<E, T, X, Y>(&self.transcoder, pattern, target, case_insensitive)
    }
}

const REPLACEMENT_CHARACTER: u16 = 0xFFFD;
