/*!
GUID text codec.

The only accepted text form is the 38-unit braced form, `{XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX}`.  Hex digits may be either case on input, and are always upper case on output.
*/
use std::fmt;

use crate::alloc::Allocator;
use crate::encoding::{Unit, Wide};
use crate::error::{Error, Result};
use crate::owned::OwnedStr;
use crate::structure::Counted;

/// Length of the text form, in units.
pub const GUID_TEXT_LEN: usize = 38;

const HYPHENS: [usize; 4] = [9, 14, 19, 24];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

fn hex_value<U>(unit: U) -> Result<u8> where U: Unit {
    match unit.to_u32() {
        c @ 0x30..=0x39 => Ok((c - 0x30) as u8),
        c @ 0x41..=0x46 => Ok((c - 0x41 + 10) as u8),
        c @ 0x61..=0x66 => Ok((c - 0x61 + 10) as u8),
        _ => Err(Error::InvalidParameter("expected a hex digit")),
    }
}

impl Guid {
    pub const NIL: Guid = Guid { data1: 0, data2: 0, data3: 0, data4: [0; 8] };

    /**
    Parses the braced text form.

    The byte sequence is read off the text two digits at a time, then laid out in memory the way a native `GUID` structure is: the first three fields are host-endian integers, the last eight bytes are kept in order.

    # Failure

    Fails with `InvalidParameter` if `text` is not exactly 38 units long, if a brace or hyphen is missing, or if any digit position holds something other than a hex digit.
    */
    pub fn parse<U>(text: &[U]) -> Result<Guid> where U: Unit {
        if text.len() != GUID_TEXT_LEN {
            return Err(Error::InvalidParameter("GUID text must be 38 units long"));
        }

        let mut bytes = [0u8; 16];
        let mut n = 0;
        let mut i = 0;
        while i < GUID_TEXT_LEN {
            let expect = match i {
                0 => Some(b'{'),
                37 => Some(b'}'),
                _ if HYPHENS.contains(&i) => Some(b'-'),
                _ => None,
            };
            match expect {
                Some(c) => {
                    if text[i].to_u32() != c as u32 {
                        return Err(Error::InvalidParameter("malformed GUID text"));
                    }
                    i += 1;
                },
                None => {
                    bytes[n] = hex_value(text[i])? << 4 | hex_value(text[i + 1])?;
                    n += 1;
                    i += 2;
                },
            }
        }

        let mut data4 = [0u8; 8];
        data4.copy_from_slice(&bytes[8..]);
        // The text spells each of the first three fields most significant byte first.
        Ok(Guid {
            data1: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            data2: u16::from_be_bytes([bytes[4], bytes[5]]),
            data3: u16::from_be_bytes([bytes[6], bytes[7]]),
            data4: data4,
        })
    }

    /**
    Parses the content of a wide counted string.  See `parse`.
    */
    pub fn from_counted<C>(string: &C) -> Result<Guid> where C: Counted<Wide> + ?Sized {
        Guid::parse(string.units())
    }

    /**
    The in-memory representation: host-endian `data1`, `data2` and `data3`, then `data4` verbatim.
    */
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..4].copy_from_slice(&self.data1.to_ne_bytes());
        out[4..6].copy_from_slice(&self.data2.to_ne_bytes());
        out[6..8].copy_from_slice(&self.data3.to_ne_bytes());
        out[8..].copy_from_slice(&self.data4);
        out
    }

    /**
    The inverse of `to_bytes`.
    */
    pub fn from_bytes(bytes: [u8; 16]) -> Guid {
        let mut data4 = [0u8; 8];
        data4.copy_from_slice(&bytes[8..]);
        Guid {
            data1: u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            data2: u16::from_ne_bytes([bytes[4], bytes[5]]),
            data3: u16::from_ne_bytes([bytes[6], bytes[7]]),
            data4: data4,
        }
    }

    /**
    Renders the braced text form into a newly allocated, terminated wide string.
    */
    pub fn to_wide_string<A>(&self) -> Result<OwnedStr<Wide, A>> where A: Allocator {
        let text = self.to_string();
        let units: Vec<u16> = text.bytes().map(|b| b as u16).collect();
        OwnedStr::from_units(&units, true)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{{{:08X}-{:04X}-{:04X}-{:02X}{:02X}-",
            self.data1, self.data2, self.data3, self.data4[0], self.data4[1])?;
        for b in &self.data4[2..] {
            write!(fmt, "{:02X}", b)?;
        }
        write!(fmt, "}}")
    }
}
