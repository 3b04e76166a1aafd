use countedstr::{Counted, CountedBuf, CountedStr, DuplicateFlags, Error, OwnedStr, RawCounted, WideString};
use countedstr::alloc::Malloc;
use countedstr::encoding::{Narrow, Wide};
use countedstr::ffi::to_raw;
use countedstr::mutate::{append, append_terminated, copy, erase};
use countedstr::owned::is_terminated;
use countedstr::structure::{max_terminated_length, validate_wide, MAX_WIDE_TERMINATED_BYTES};

macro_rules! here { () => { &format!(concat!(file!(), ":{:?}"), line!()) } }

fn w(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

#[test]
fn test_views() {
    {
        let text = w("hi\0x");
        let view = CountedStr::<Wide>::from_terminated(&text).expect(here!());
        assert_eq!(view.length(), 4);
        assert_eq!(view.capacity(), 6);
        assert_eq!(view.as_units(), &w("hi")[..]);
    }
    {
        let view = CountedStr::<Narrow>::from_terminated(b"abc").expect(here!());
        assert_eq!(view.length(), 3);
        assert_eq!(view.capacity(), 3);
    }
    {
        let view = CountedStr::<Wide>::null();
        assert!(view.is_null());
        assert_eq!((view.length(), view.capacity()), (0, 0));
        assert_eq!(view, CountedStr::<Wide>::default());
    }
    {
        assert_eq!(max_terminated_length::<Wide>(), MAX_WIDE_TERMINATED_BYTES);
        let fits = vec![0x61u16; 0x7FFE];
        assert_eq!(CountedStr::<Wide>::from_terminated(&fits).expect(here!()).length(), 0xFFFC);
        let long = vec![0x61u16; 0x7FFF];
        assert_eq!(CountedStr::<Wide>::from_terminated(&long), Err(Error::NameTooLong));
    }
    {
        let text = w("abc");
        assert!(matches!(CountedStr::<Wide>::from_parts(&text, 3), Err(Error::InvalidParameter(_))));
        assert!(matches!(CountedStr::<Wide>::from_parts(&text, 8), Err(Error::InvalidParameter(_))));
        let view = CountedStr::<Wide>::from_parts(&text, 2).expect(here!());
        assert_eq!(view.as_units(), &w("a")[..]);
        assert_eq!(view.capacity(), 6);
    }
}

#[test]
fn test_debug() {
    let text = w("abc");
    let view = CountedStr::<Wide>::new(&text).expect(here!());
    assert_eq!(format!("{:?}", view), r#"W"abc"/6"#);

    let owned: WideString = OwnedStr::create_terminated(&text).expect(here!());
    assert_eq!(format!("{:?}", owned), r#"WR"abc"/8"#);

    let narrow = CountedStr::<Narrow>::new(b"a\xff").expect(here!());
    assert_eq!(format!("{:?}", narrow), r#"A"a\xff"/2"#);
}

#[test]
fn test_create_and_free() {
    let text = w("hello\0world");
    let mut owned: WideString = OwnedStr::create_terminated(&text).expect(here!());
    assert_eq!(owned.length(), 10);
    assert_eq!(owned.capacity(), 12);
    assert!(is_terminated::<Wide, _>(&owned));

    owned.free();
    assert!(owned.is_null());
    assert_eq!((owned.length(), owned.capacity()), (0, 0));
    // Freeing again is harmless.
    owned.free();

    let malloc = OwnedStr::<Wide, Malloc>::create_terminated(&text).expect(here!());
    assert_eq!(malloc, owned_copy(&text));
}

fn owned_copy(text: &[u16]) -> WideString {
    OwnedStr::create_terminated(text).expect(here!())
}

#[test]
fn test_duplicate() {
    let text = w("abc");
    let src = CountedStr::<Wide>::new(&text).expect(here!());
    let empty = CountedStr::<Wide>::new(&[]).expect(here!());
    let both = (DuplicateFlags::NULL_TERMINATE | DuplicateFlags::ALLOCATE_NULL_STRING).bits();
    {
        let dup: WideString = OwnedStr::duplicate(0, &src).expect(here!());
        assert_eq!(dup.as_units(), &text[..]);
        assert_eq!(dup.capacity(), 6);
    }
    {
        let dup: WideString = OwnedStr::duplicate(DuplicateFlags::NULL_TERMINATE.bits(), &src).expect(here!());
        assert_eq!(dup.capacity(), 8);
        assert!(is_terminated::<Wide, _>(&dup));
    }
    {
        let dup: WideString = OwnedStr::duplicate(DuplicateFlags::NULL_TERMINATE.bits(), &empty).expect(here!());
        assert!(dup.is_null());
    }
    {
        let dup: WideString = OwnedStr::duplicate(both, &empty).expect(here!());
        assert!(!dup.is_null());
        assert_eq!((dup.length(), dup.capacity()), (0, 2));
    }
    {
        // Without NULL_TERMINATE there is no terminator, whatever else is set.
        let dup: WideString = OwnedStr::duplicate(DuplicateFlags::ALLOCATE_NULL_STRING.bits(), &src).expect(here!());
        assert_eq!((dup.length(), dup.capacity()), (6, 6));
        let dup: WideString = OwnedStr::duplicate(DuplicateFlags::ALLOCATE_NULL_STRING.bits(), &empty).expect(here!());
        assert!(dup.is_null());
    }
    {
        let dup: Result<WideString, _> = OwnedStr::duplicate(4, &src);
        assert!(matches!(dup, Err(Error::InvalidParameter(_))));
    }
}

struct Malformed {
    length: u16,
    capacity: u16,
    storage: Vec<u16>,
}

impl Counted<Wide> for Malformed {
    fn length(&self) -> u16 { self.length }
    fn capacity(&self) -> u16 { self.capacity }
    fn is_null(&self) -> bool { false }
    fn storage(&self) -> &[u16] { &self.storage }
}

#[test]
fn test_validate() {
    let text = w("abc");
    let good = CountedStr::<Wide>::new(&text).expect(here!());
    validate_wide(0, Some(&good)).expect(here!());
    validate_wide(0, Some(&CountedStr::<Wide>::null())).expect(here!());
    validate_wide::<CountedStr<Wide>>(0, None).expect(here!());
    assert!(validate_wide(1, Some(&good)).is_err());

    let odd = Malformed { length: 3, capacity: 6, storage: vec![0; 3] };
    assert!(validate_wide(0, Some(&odd)).is_err());
    let short = Malformed { length: 6, capacity: 4, storage: vec![0; 2] };
    assert!(validate_wide(0, Some(&short)).is_err());
}

#[test]
fn test_append() {
    let cd = w("cd");
    let cd = CountedStr::<Wide>::new(&cd).expect(here!());
    {
        let mut storage = w("ab\u{aaaa}\u{aaaa}\u{aaaa}\u{aaaa}");
        {
            let mut buf = CountedBuf::<Wide>::from_parts(&mut storage, 4).expect(here!());
            append(&mut buf, &cd).expect(here!());
            assert_eq!(buf.units(), &w("abcd")[..]);
        }
        assert_eq!(storage[4], 0);
    }
    {
        // An exact fit is allowed, and leaves no room for a terminator.
        let mut storage = w("ab\u{aaaa}\u{aaaa}\u{aaaa}");
        {
            let mut buf = CountedBuf::<Wide>::from_parts(&mut storage[..4], 4).expect(here!());
            append(&mut buf, &cd).expect(here!());
            assert_eq!(buf.length(), 8);
        }
        assert_eq!(storage[4], 0xAAAA);
    }
    {
        let mut storage = w("ab\u{aaaa}\u{aaaa}");
        let before = storage.clone();
        {
            let cde = w("cde");
            let cde = CountedStr::<Wide>::new(&cde).expect(here!());
            let mut buf = CountedBuf::<Wide>::from_parts(&mut storage, 4).expect(here!());
            assert_eq!(append(&mut buf, &cde), Err(Error::BufferTooSmall));
            assert_eq!(buf.length(), 4);
        }
        assert_eq!(storage, before);
    }
    {
        let mut storage = w("ab\u{aaaa}");
        let before = storage.clone();
        {
            let mut buf = CountedBuf::<Wide>::from_parts(&mut storage, 4).expect(here!());
            append(&mut buf, &CountedStr::<Wide>::null()).expect(here!());
            assert_eq!(buf.length(), 4);
        }
        assert_eq!(storage, before);
    }
}

#[test]
fn test_append_narrow() {
    let mut storage = *b"ab\xcc\xcc\xcc";
    {
        let mut buf = CountedBuf::<Narrow>::from_parts(&mut storage[..4], 2).expect(here!());
        append_terminated::<Narrow, _>(&mut buf, &b"cd\0ef"[..]).expect(here!());
        assert_eq!(buf.units(), b"abcd");
    }
    assert_eq!(&storage[..], b"abcd\xcc");

    let mut storage = *b"ab\xcc\xcc\xcc";
    {
        let mut buf = CountedBuf::<Narrow>::from_parts(&mut storage, 2).expect(here!());
        append_terminated::<Narrow, _>(&mut buf, &b"cd"[..]).expect(here!());
    }
    assert_eq!(&storage[..], b"abcd\0");
}

#[test]
fn test_copy() {
    let text = w("abcdef");
    let src = CountedStr::<Wide>::new(&text).expect(here!());
    {
        let mut storage = [0xAAAAu16; 4];
        {
            let mut buf = CountedBuf::<Wide>::new(&mut storage[..3]);
            copy(&mut buf, Some(&src));
            assert_eq!(buf.units(), &w("abc")[..]);
        }
        assert_eq!(storage[3], 0xAAAA);
    }
    {
        let mut storage = [0xAAAAu16; 8];
        {
            let mut buf = CountedBuf::<Wide>::new(&mut storage);
            copy(&mut buf, Some(&src));
            assert_eq!(buf.length(), 12);
        }
        assert_eq!(storage[6], 0);
        assert_eq!(storage[7], 0xAAAA);
    }
    {
        let mut storage = w("xyz");
        {
            let mut buf = CountedBuf::<Wide>::from_parts(&mut storage, 6).expect(here!());
            copy::<Wide, _, CountedStr<Wide>>(&mut buf, None);
            assert_eq!(buf.length(), 0);
        }
        assert_eq!(storage, w("xyz"));
    }
}

#[test]
fn test_erase() {
    let mut storage = w("secret");
    {
        let mut buf = CountedBuf::<Wide>::from_parts(&mut storage, 4).expect(here!());
        erase(&mut buf);
        assert_eq!(buf.length(), 0);
    }
    assert!(storage.iter().all(|&u| u == 0));

    let mut owned: WideString = OwnedStr::null();
    erase(&mut owned);
    assert!(owned.is_null());
}

#[test]
fn test_raw() {
    let text = w("abc");
    {
        let view = CountedStr::<Wide>::new(&text).expect(here!());
        let raw = to_raw(&view);
        assert_eq!((raw.length, raw.maximum_length), (6, 6));
        let back = unsafe { CountedStr::<Wide>::from_raw(&raw) }.expect(here!());
        assert_eq!(back, view);
    }
    {
        let raw = RawCounted::<u16>::null();
        let view = unsafe { CountedStr::<Wide>::from_raw(&raw) }.expect(here!());
        assert!(view.is_null());
        assert!(unsafe { CountedBuf::<Wide>::from_raw_mut(&raw) }.is_err());
    }
    {
        let mut storage = [0u16; 4];
        let raw = RawCounted {
            length: 0,
            maximum_length: 8,
            buffer: storage.as_mut_ptr(),
        };
        {
            let mut buf = unsafe { CountedBuf::<Wide>::from_raw_mut(&raw) }.expect(here!());
            let src = CountedStr::<Wide>::new(&text).expect(here!());
            append(&mut buf, &src).expect(here!());
        }
        assert_eq!(&storage[..3], &text[..]);
    }
    {
        let owned: WideString = OwnedStr::create_terminated(&text).expect(here!());
        let raw = owned.into_raw();
        assert_eq!((raw.length, raw.maximum_length), (6, 8));
        let owned: WideString = unsafe { OwnedStr::from_raw(raw) };
        assert_eq!(owned.as_units(), &text[..]);
    }
    {
        let raw = RawCounted { length: 8, maximum_length: 6, buffer: std::ptr::null_mut::<u16>() };
        assert!(unsafe { CountedStr::<Wide>::from_raw(&raw) }.is_err());
    }
}
