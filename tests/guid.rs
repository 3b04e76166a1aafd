use countedstr::{Counted, CountedStr, Error, Guid, WideString};
use countedstr::alloc::RustHeap;
use countedstr::encoding::Wide;
use countedstr::owned::is_terminated;

macro_rules! here { () => { &format!(concat!(file!(), ":{:?}"), line!()) } }

const SAMPLE: &'static str = "{12345678-9ABC-DEF0-1234-56789ABCDEF0}";

fn w(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

fn sample() -> Guid {
    Guid {
        data1: 0x12345678,
        data2: 0x9ABC,
        data3: 0xDEF0,
        data4: [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0],
    }
}

#[test]
fn test_parse() {
    {
        let zero = Guid::parse(&w("{00000000-0000-0000-0000-000000000000}")[..]).expect(here!());
        assert_eq!(zero, Guid::NIL);
    }
    {
        assert_eq!(Guid::parse(&w(SAMPLE)[..]).expect(here!()), sample());
        assert_eq!(Guid::parse(&w(&SAMPLE.to_lowercase())[..]).expect(here!()), sample());
        assert_eq!(Guid::parse(SAMPLE.as_bytes()).expect(here!()), sample());
    }
    {
        let text = w(SAMPLE);
        let string = CountedStr::<Wide>::new(&text).expect(here!());
        assert_eq!(Guid::from_counted(&string).expect(here!()), sample());
    }
}

#[test]
fn test_bytes() {
    let bytes = sample().to_bytes();
    assert_eq!(&bytes[..4], &0x12345678u32.to_ne_bytes());
    assert_eq!(&bytes[4..6], &0x9ABCu16.to_ne_bytes());
    assert_eq!(&bytes[8..], &sample().data4);
    assert_eq!(Guid::from_bytes(bytes), sample());
}

#[test]
fn test_parse_failures() {
    let bad = |s: &str| matches!(Guid::parse(&w(s)[..]), Err(Error::InvalidParameter(_)));

    assert!(bad("{12345678-9ABC-DEF0-1234-56789ABCDEF}"));
    assert!(bad("{12345678-9ABC-DEF0-1234-56789ABCDEF00}"));
    assert!(bad("{12345678-9ABC-DEF0-1234+56789ABCDEF0}"));
    assert!(bad("{12345678-9ABC-DEF0-1234-56789ABCDEFG}"));
    assert!(bad("{12345678-9ABC-DEF0-1234-56789ABCDEF0)"));
    assert!(bad("(12345678-9ABC-DEF0-1234-56789ABCDEF0}"));
    assert!(bad(""));
}

#[test]
fn test_render() {
    assert_eq!(sample().to_string(), SAMPLE);
    assert_eq!(Guid::NIL.to_string(), "{00000000-0000-0000-0000-000000000000}");

    let text: WideString = sample().to_wide_string::<RustHeap>().expect(here!());
    assert_eq!(text.length(), 76);
    assert_eq!(text.capacity(), 78);
    assert!(is_terminated::<Wide, _>(&text));
    assert_eq!(text.as_units(), &w(SAMPLE)[..]);
    assert_eq!(Guid::from_counted(&text).expect(here!()), sample());
}
