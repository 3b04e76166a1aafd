/*!
The sizing, allocation and truncation policy shared by every conversion.

Each conversion entry point owns one `Policy` constant.  The executor in this module takes the pre-computed content size, decides between allocating, failing and truncating, runs the transform, and writes the terminator.  Nothing here knows which encodings are involved beyond their unit sizes.
*/
use log::{debug, trace};

use crate::alloc::Allocator;
use crate::encoding::{Encoding, Unit};
use crate::error::{Error, Result};
use crate::owned::OwnedStr;
use crate::structure::{CountedMut, MAX_COUNTED_BYTES};
use crate::util::zero_fill;

/**
What happens when a caller-supplied destination is too small.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Overflow {
    /// Fail with `BufferTooSmall`, writing nothing.
    Fail,
    /// Shrink the length to `capacity - one unit`, keeping room for the terminator.
    TruncateReserving,
    /// Shrink the length to the whole capacity.
    Truncate,
}

/**
Which part of the destination is zeroed before the transform runs.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ZeroFill {
    None,
    /// The content region, `length` bytes, of any destination.
    Content,
    /// Only buffers allocated by this call.  Allocations are always zeroed, so this needs no work.
    Allocation,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Policy {
    pub name: &'static str,
    pub overflow: Overflow,
    pub terminate: bool,
    pub zero_fill: ZeroFill,
}

macro_rules! policy {
    ($name:ident, $overflow:ident, terminate: $term:expr, zero: $zero:ident) => {
        pub const $name: Policy = Policy {
            name: stringify!($name),
            overflow: Overflow::$overflow,
            terminate: $term,
            zero_fill: ZeroFill::$zero,
        };
    };
}

policy! { NARROW_TO_WIDE, Fail, terminate: true, zero: Content }
policy! { WIDE_TO_NARROW, TruncateReserving, terminate: true, zero: None }
policy! { OEM_TO_WIDE, Fail, terminate: true, zero: Content }
policy! { OEM_TO_COUNTED_WIDE, Fail, terminate: false, zero: None }
policy! { WIDE_TO_OEM, TruncateReserving, terminate: true, zero: None }
policy! { WIDE_TO_COUNTED_OEM, Truncate, terminate: false, zero: None }
policy! { UPCASE_WIDE_TO_NARROW, TruncateReserving, terminate: true, zero: Content }
policy! { UPCASE_WIDE_TO_OEM, TruncateReserving, terminate: true, zero: Allocation }
policy! { UPCASE_WIDE_TO_COUNTED_OEM, Truncate, terminate: false, zero: Content }
policy! { CHANGE_CASE_WIDE, Fail, terminate: false, zero: None }

/**
Whether a conversion into an existing destination produced all of its output.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Fit {
    Whole,
    /// The destination was too small, and the entry point's policy is to truncate.  The length was shrunk to fit.
    Truncated,
}

impl Fit {
    pub fn is_truncated(self) -> bool {
        self == Fit::Truncated
    }
}

impl Policy {
    fn terminator_size<D>(&self) -> usize where D: Encoding {
        if self.terminate { D::unit_size() } else { 0 }
    }

    /**
    Content plus terminator.  Sizes that the 16-bit fields cannot describe are rejected up front, before any allocation or write.
    */
    fn required<D>(&self, len: usize) -> Result<usize> where D: Encoding {
        let size = len + self.terminator_size::<D>();
        if size > MAX_COUNTED_BYTES {
            debug!("{}: required size {} exceeds the counted maximum", self.name, size);
            return Err(Error::InvalidParameter("required size exceeds the counted maximum"));
        }
        Ok(size)
    }

    /**
    Allocates a destination for `len` bytes of content (plus terminator, if any) and fills it.

    `fill` receives exactly the content region.  If it fails, the allocation is released before the error is returned.
    */
    pub fn allocate<D, A, F>(&self, len: usize, fill: F) -> Result<OwnedStr<D, A>>
    where
        D: Encoding,
        A: Allocator,
        F: FnOnce(&mut [D::Unit]) -> Result<usize>,
    {
        let size = self.required::<D>(len)?;
        let mut dst = OwnedStr::<D, A>::allocate(size)?;
        self.write::<D, _, _>(&mut dst, len, fill)?;
        Ok(dst)
    }

    /**
    Fills an existing destination with `len` bytes of content, applying the overflow rule if it does not fit.

    The destination's capacity is never exceeded.  Its length is only updated once `fill` has succeeded.
    */
    pub fn fill_existing<D, C, F>(&self, dst: &mut C, len: usize, fill: F) -> Result<Fit>
    where
        D: Encoding,
        C: CountedMut<D> + ?Sized,
        F: FnOnce(&mut [D::Unit]) -> Result<usize>,
    {
        let size = self.required::<D>(len)?;
        let cap = dst.capacity() as usize;
        if cap == 0 {
            debug!("{}: destination has no capacity", self.name);
            return Err(Error::BufferTooSmall);
        }

        let (len, fit) = if size <= cap {
            (len, Fit::Whole)
        } else {
            match self.overflow {
                Overflow::Fail => {
                    debug!("{}: need {} bytes, capacity is {}", self.name, size, cap);
                    return Err(Error::BufferTooSmall);
                },
                Overflow::TruncateReserving => (cap - D::unit_size(), Fit::Truncated),
                Overflow::Truncate => (cap, Fit::Truncated),
            }
        };
        if fit.is_truncated() {
            trace!("{}: truncating {} bytes to {}", self.name, size, len);
        }

        self.write::<D, C, F>(dst, len, fill)?;
        Ok(fit)
    }

    fn write<D, C, F>(&self, dst: &mut C, len: usize, fill: F) -> Result<()>
    where
        D: Encoding,
        C: CountedMut<D> + ?Sized,
        F: FnOnce(&mut [D::Unit]) -> Result<usize>,
    {
        let units = len / D::unit_size();
        {
            let storage = dst.storage_mut();
            if self.zero_fill == ZeroFill::Content {
                zero_fill(&mut storage[..units]);
            }
            fill(&mut storage[..units])?;
            if self.terminate {
                if let Some(t) = storage.get_mut(units) {
                    *t = <D::Unit as Unit>::zero();
                }
            }
        }
        dst.set_length(len as u16);
        Ok(())
    }
}
