use encoding_rs::{CoderResult, EncoderResult, Encoding};
use log::trace;

use crate::encoding::CodePage;
use crate::encoding::conv::Transcoder;
use crate::error::{Error, Result};

/// Substituted for characters the target page cannot represent.
pub const DEFAULT_CHAR: u8 = b'?';

/**
Code pages backed by `encoding_rs` encodings.

This is the easiest way to get a genuinely multi-byte narrow page (Shift_JIS, GBK, and so on).  Malformed input decodes to U+FFFD; characters the target page lacks encode as `?`.
*/
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Whatwg {
    narrow: &'static Encoding,
    oem: &'static Encoding,
}

impl Whatwg {
    pub fn new(narrow: &'static Encoding, oem: &'static Encoding) -> Self {
        Whatwg {
            narrow: narrow,
            oem: oem,
        }
    }

    /**
    Looks both pages up by their WHATWG labels, *e.g.* `"shift_jis"` or `"ibm866"`.
    */
    pub fn for_labels(narrow: &str, oem: &str) -> Result<Self> {
        let lookup = |label: &str| Encoding::for_label(label.as_bytes())
            .ok_or(Error::InvalidParameter("unknown code page label"));
        Ok(Whatwg::new(lookup(narrow)?, lookup(oem)?))
    }

    pub fn encoding(&self, page: CodePage) -> &'static Encoding {
        match page {
            CodePage::Narrow => self.narrow,
            CodePage::Oem => self.oem,
        }
    }

    fn decode(&self, page: CodePage, src: &[u8]) -> Result<Vec<u16>> {
        let mut decoder = self.encoding(page).new_decoder_without_bom_handling();
        let max = decoder.max_utf16_buffer_length(src.len())
            .ok_or(Error::InvalidParameter("source too long to transcode"))?;

        let mut out = vec![0u16; max];
        let (result, _, written, replaced) = decoder.decode_to_utf16(src, &mut out, true);
        if !matches!(result, CoderResult::InputEmpty) {
            return Err(Error::InvalidParameter("source too long to transcode"));
        }
        if replaced {
            trace!("Whatwg::decode: malformed input replaced in {}", self.encoding(page).name());
        }

        out.truncate(written);
        Ok(out)
    }

    /**
    Encodes `src` one character at a time, handing each character's bytes to `sink`.  Stops early when `sink` returns `false`, so a character is never split.
    */
    fn encode<F>(&self, page: CodePage, src: &[u16], mut sink: F) -> Result<()>
    where F: FnMut(&[u8]) -> bool {
        let mut encoder = self.encoding(page).new_encoder();
        let mut buf = [0u8; 16];
        let mut at = 0;

        while at < src.len() {
            let step = match (src[at], src.get(at + 1)) {
                (0xD800..=0xDBFF, Some(&(0xDC00..=0xDFFF))) => 2,
                _ => 1,
            };

            let (result, _, written) = encoder
                .encode_from_utf16_without_replacement(&src[at..at + step], &mut buf, false);
            let len = match result {
                EncoderResult::InputEmpty => written,
                EncoderResult::Unmappable(_) if written < buf.len() => {
                    buf[written] = DEFAULT_CHAR;
                    written + 1
                },
                _ => return Err(Error::InvalidParameter("character too large to transcode")),
            };

            if !sink(&buf[..len]) {
                return Ok(());
            }
            at += step;
        }

        let (_, _, written) = encoder.encode_from_utf16_without_replacement(&[], &mut buf, true);
        if written > 0 {
            sink(&buf[..written]);
        }
        Ok(())
    }
}

impl Transcoder for Whatwg {
    fn wide_size(&self, page: CodePage, src: &[u8]) -> Result<usize> {
        Ok(self.decode(page, src)?.len() * 2)
    }

    fn multi_byte_size(&self, page: CodePage, src: &[u16]) -> Result<usize> {
        let mut size = 0;
        self.encode(page, src, |bytes| {
            size += bytes.len();
            true
        })?;
        Ok(size)
    }

    fn to_wide(&self, page: CodePage, dst: &mut [u16], src: &[u8]) -> Result<usize> {
        let wide = self.decode(page, src)?;
        let n = dst.len().min(wide.len());
        dst[..n].copy_from_slice(&wide[..n]);
        Ok(n)
    }

    fn from_wide(&self, page: CodePage, dst: &mut [u8], src: &[u16]) -> Result<usize> {
        let mut written = 0;
        self.encode(page, src, |bytes| {
            let end = written + bytes.len();
            if end > dst.len() {
                return false;
            }
            dst[written..end].copy_from_slice(bytes);
            written = end;
            true
        })?;
        Ok(written)
    }
}
