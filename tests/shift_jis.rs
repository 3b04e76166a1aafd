use countedstr::{Counted, CountedBuf, CountedStr, Fit, Nls, NlsConfig};
use countedstr::encoding::{CodePage, Narrow, Oem, Transcoder, Wide};
use countedstr::encoding::conv::Whatwg;

macro_rules! here { () => { &format!(concat!(file!(), ":{:?}"), line!()) } }

const NIHON_SJIS: &'static [u8] = &[0x93, 0xFA, 0x96, 0x7B];
const NIHON_W: &'static [u16] = &[0x65E5, 0x672C];

fn multi_byte() -> NlsConfig {
    NlsConfig {
        narrow_multi_byte: true,
        oem_multi_byte: true,
    }
}

fn pages() -> Whatwg {
    Whatwg::for_labels("shift_jis", "ibm866").expect(here!())
}

#[test]
fn test_transcoder_sizes() {
    let sjis = pages();
    assert_eq!(sjis.wide_size(CodePage::Narrow, NIHON_SJIS).expect(here!()), 4);
    assert_eq!(sjis.multi_byte_size(CodePage::Narrow, NIHON_W).expect(here!()), 4);
    assert_eq!(sjis.multi_byte_size(CodePage::Narrow, &[0x65E5, 0x61]).expect(here!()), 3);
    assert!(Whatwg::for_labels("not-a-code-page", "ibm866").is_err());
}

#[test]
fn test_multi_byte_round_trip() {
    let nls = Nls::new(pages(), multi_byte());
    let src = CountedStr::<Narrow>::new(NIHON_SJIS).expect(here!());

    let wide = nls.narrow_to_wide(&src).expect(here!());
    assert_eq!(wide.as_units(), NIHON_W);
    assert_eq!(wide.capacity(), 6);

    let back = nls.wide_to_narrow(&wide).expect(here!());
    assert_eq!(back.as_units(), NIHON_SJIS);
    assert_eq!(back.capacity(), 5);

    assert_eq!(nls.narrow_to_wide_size(&src).expect(here!()), 6);
    assert_eq!(nls.wide_to_narrow_size(&wide).expect(here!()), 5);
}

#[test]
fn test_truncation_never_splits() {
    let nls = Nls::new(pages(), multi_byte());
    let src = CountedStr::<Wide>::new(NIHON_W).expect(here!());

    // Room for three bytes of content: the second character needs two.
    let mut storage = [0xCCu8; 5];
    {
        let mut buf = CountedBuf::<Narrow>::new(&mut storage[..4]);
        assert_eq!(nls.upcase_wide_to_narrow_into(&mut buf, &src).expect(here!()), Fit::Truncated);
        assert_eq!(buf.length(), 3);
    }
    assert_eq!(&storage[..], &[0x93, 0xFA, 0x00, 0x00, 0xCC]);
}

#[test]
fn test_fixed_multiplier_sizing() {
    // With the flag clear, one byte is budgeted per wide unit, whatever the page actually needs.
    let nls = Nls::new(pages(), NlsConfig::default());
    let src = CountedStr::<Wide>::new(NIHON_W).expect(here!());

    let narrow = nls.wide_to_narrow(&src).expect(here!());
    assert_eq!(narrow.capacity(), 3);
    assert_eq!(narrow.length(), 2);
    assert_eq!(narrow.as_units(), &NIHON_SJIS[..2]);

    let sjis = CountedStr::<Narrow>::new(NIHON_SJIS).expect(here!());
    let wide = nls.narrow_to_wide(&sjis).expect(here!());
    assert_eq!(wide.length(), 8);
    assert_eq!(&wide.as_units()[..2], NIHON_W);
    assert_eq!(&wide.as_units()[2..], &[0, 0]);
}

#[test]
fn test_unmappable_oem() {
    let nls = Nls::new(pages(), multi_byte());
    let src = CountedStr::<Wide>::new(&[0x65E5, 0x41]).expect(here!());
    let oem = nls.wide_to_oem(&src).expect(here!());
    assert_eq!(oem.as_units(), b"?A");

    let cyrillic = CountedStr::<Oem>::new(&[0x80]).expect(here!());
    let wide = nls.oem_to_wide(&cyrillic).expect(here!());
    assert_eq!(wide.as_units(), &[0x0410]);
}

#[test]
fn test_lead_byte_char() {
    let nls = Nls::new(pages(), multi_byte());
    assert_eq!(nls.narrow_char_to_wide_char(NIHON_SJIS).expect(here!()), (0x65E5, 2));
    assert_eq!(nls.narrow_char_to_wide_char(b"ab").expect(here!()), (0x61, 1));

    let single = Nls::new(pages(), NlsConfig::default());
    assert_eq!(single.narrow_char_to_wide_char(NIHON_SJIS).expect(here!()), (0xFFFD, 1));
}

#[test]
fn test_counted_oem_zeroes_unfilled_bytes() {
    // One byte budgeted per unit, but both kanji need two: the second does not fit.
    let nls = Nls::new(Whatwg::for_labels("windows-1252", "shift_jis").expect(here!()), NlsConfig::default());
    let text = [0x65E5, 0x672C, 0x61];
    let src = CountedStr::<Wide>::new(&text).expect(here!());

    let mut storage = [0xCCu8; 4];
    {
        let mut buf = CountedBuf::<Oem>::new(&mut storage[..3]);
        assert_eq!(nls.upcase_wide_to_counted_oem_into(&mut buf, &src).expect(here!()), Fit::Whole);
        assert_eq!(buf.length(), 3);
    }
    assert_eq!(&storage[..], &[0x93, 0xFA, 0x00, 0xCC]);

    let oem = nls.upcase_wide_to_counted_oem(&src).expect(here!());
    assert_eq!(oem.as_units(), &[0x93, 0xFA, 0x00]);
}
