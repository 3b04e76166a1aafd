use countedstr::{CountedStr, Error, Nls, NlsConfig};
use countedstr::compare::{compare, equal, hash_wide, is_prefix, HASH_STRING_ALGORITHM_DEFAULT, HASH_STRING_ALGORITHM_X65599};
use countedstr::encoding::{Narrow, Wide};
use countedstr::encoding::conv::Latin1;

macro_rules! here { () => { &format!(concat!(file!(), ":{:?}"), line!()) } }

fn n(s: &[u8]) -> CountedStr<Narrow> {
    CountedStr::new(s).expect(here!())
}

fn w(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

#[test]
fn test_compare() {
    assert_eq!(compare(&Latin1, &n(b"abc"), &n(b"abd"), false), -1);
    assert_eq!(compare(&Latin1, &n(b"abd"), &n(b"abc"), false), 1);
    assert_eq!(compare(&Latin1, &n(b"abc"), &n(b"ab"), false), 99);
    assert_eq!(compare(&Latin1, &n(b"ab"), &n(b"abc"), false), -99);
    assert_eq!(compare(&Latin1, &n(b"abc"), &n(b"abc"), false), 0);
    assert_eq!(compare(&Latin1, &n(b"abc"), &n(b"ABC"), false), 32);
    assert_eq!(compare(&Latin1, &n(b"abc"), &n(b"ABC"), true), 0);
    // Units are unsigned.
    assert_eq!(compare(&Latin1, &n(b"\xe9"), &n(b"a"), false), 136);
    // The walk stops at an embedded zero.
    assert_eq!(compare(&Latin1, &n(b"a\0x"), &n(b"a\0y"), false), 0);
    assert_eq!(compare(&Latin1, &CountedStr::<Narrow>::null(), &n(b"abc"), false), 0);
}

#[test]
fn test_compare_wide() {
    let nls = Nls::new(Latin1, NlsConfig::default());
    let a = w("Ünïcode");
    let b = w("üNÏCODE");
    let a = CountedStr::<Wide>::new(&a).expect(here!());
    let b = CountedStr::<Wide>::new(&b).expect(here!());
    assert_eq!(nls.compare::<Wide, _, _>(&a, &b, true), 0);
    assert!(nls.compare::<Wide, _, _>(&a, &b, false) < 0);
    assert!(nls.equal::<Wide, _, _>(&a, &b, true));
    assert!(!nls.equal::<Wide, _, _>(&a, &b, false));
}

#[test]
fn test_equal() {
    assert!(equal(&Latin1, &n(b"abc"), &n(b"abc"), false));
    assert!(!equal(&Latin1, &n(b"abc"), &n(b"aBc"), false));
    assert!(equal(&Latin1, &n(b"abc"), &n(b"aBc"), true));
    assert!(!equal(&Latin1, &n(b"abc"), &n(b"abcd"), true));
    assert!(equal(&Latin1, &n(b""), &CountedStr::<Narrow>::null(), false));
}

#[test]
fn test_is_prefix() {
    assert!(is_prefix(&Latin1, &n(b"ab"), &n(b"abc"), false));
    assert!(is_prefix(&Latin1, &n(b"abc"), &n(b"abc"), false));
    assert!(!is_prefix(&Latin1, &n(b"abc"), &n(b"ab"), false));
    assert!(!is_prefix(&Latin1, &n(b"AB"), &n(b"abc"), false));
    assert!(is_prefix(&Latin1, &n(b"AB"), &n(b"abc"), true));
    assert!(is_prefix(&Latin1, &n(b""), &n(b"abc"), false));
    assert!(!is_prefix(&Latin1, &CountedStr::<Narrow>::null(), &n(b"abc"), false));
    assert!(!is_prefix(&Latin1, &n(b""), &CountedStr::<Narrow>::null(), false));

    // A prefix compares equal over its own length.
    let pattern = n(b"hel");
    let target = n(b"hello");
    assert!(is_prefix(&Latin1, &pattern, &target, false));
    assert_eq!(compare(&Latin1, &pattern, &n(b"hel"), false), 0);
}

#[test]
fn test_hash() {
    let hash = |s: &str, ci: bool| {
        let text = w(s);
        let string = CountedStr::<Wide>::new(&text).expect(here!());
        hash_wide(&string, ci, HASH_STRING_ALGORITHM_X65599).expect(here!())
    };

    assert_eq!(hash("", false), 0);
    assert_eq!(hash("A", false), 65);
    assert_eq!(hash("AB", false), 4264001);
    assert_eq!(hash("ABC", true), hash("abc", true));
    assert_ne!(hash("ABC", false), hash("abc", false));
    assert_ne!(hash("abc", true), hash("abd", true));
    // Only ASCII letters are folded.
    assert_ne!(hash("é", true), hash("É", true));

    let text = w("abc");
    let string = CountedStr::<Wide>::new(&text).expect(here!());
    assert_eq!(hash_wide(&string, false, HASH_STRING_ALGORITHM_DEFAULT), Ok(hash("abc", false)));
    assert!(matches!(hash_wide(&string, false, 2), Err(Error::InvalidParameter(_))));
}
