use crate::encoding::CodePage;
use crate::encoding::conv::{simple_uppercase, Transcoder};
use crate::error::Result;

/// Substituted for wide units with no Latin-1 equivalent.
pub const DEFAULT_CHAR: u8 = b'?';

/**
The ISO 8859-1 code page, used for both the narrow and OEM pages.

Byte `b` is always U+00`b`, so this page is never multi-byte and its sizes always agree with the fixed one-byte-per-unit rule.
*/
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Latin1;

impl Transcoder for Latin1 {
    fn wide_size(&self, _page: CodePage, src: &[u8]) -> Result<usize> {
        Ok(src.len() * 2)
    }

    fn multi_byte_size(&self, _page: CodePage, src: &[u16]) -> Result<usize> {
        Ok(src.len())
    }

    fn to_wide(&self, _page: CodePage, dst: &mut [u16], src: &[u8]) -> Result<usize> {
        let n = dst.len().min(src.len());
        for (d, &s) in dst[..n].iter_mut().zip(src) {
            *d = s as u16;
        }
        Ok(n)
    }

    fn from_wide(&self, _page: CodePage, dst: &mut [u8], src: &[u16]) -> Result<usize> {
        let n = dst.len().min(src.len());
        for (d, &s) in dst[..n].iter_mut().zip(src) {
            *d = if s <= 0xFF { s as u8 } else { DEFAULT_CHAR };
        }
        Ok(n)
    }

    fn uppercase_narrow_unit(&self, unit: u8) -> u8 {
        // ÿ and µ upcase out of the page.
        match simple_uppercase(unit as u16) {
            up if up <= 0xFF => up as u8,
            _ => unit,
        }
    }
}
