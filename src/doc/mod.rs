/*!
Additional documentation.

# Components

These tables summarise the provided string components.  Prefixes are used in type aliases and debug output.

## Representations

See the `structure` and `owned` modules.

| Type         | Owns its buffer? | Writable? | Notes |
| ------------ | ---------------- | --------- | ----- |
| `CountedStr` | no  | no  | `Copy`.  May be null. |
| `CountedBuf` | no  | yes | Capacity is fixed by the borrowed storage. |
| `OwnedStr`   | yes | yes | Freed exactly once, on `free` or drop. |
| `RawCounted` | -   | -   | The C layout.  Says nothing about ownership. |

## Encodings

See the `encoding` module.

| Prefix | Name     | Unit  | Encoding |
| ------ | -------- | ----- | -------- |
| `A`    | `Narrow` | `u8`  | The active narrow ("ANSI") code page.  May be multi-byte. |
| `O`    | `Oem`    | `u8`  | The active OEM code page. |
| `W`    | `Wide`   | `u16` | Fixed 16-bit units. |

## Allocators

See the `alloc` module.

| Prefix | Name       | Allocator |
| ------ | ---------- | --------- |
| `C`    | `Malloc`   | C runtime heap allocator (*i.e.* `calloc`/`free`). |
| `R`    | `RustHeap` | Rust heap allocator. |

Debug output for a string is its encoding prefix, then its allocator prefix if it is owned, then the content and capacity: `WR"abc"/8`.

# Sizes

All lengths and capacities are in *bytes*, never units.  A wide string holding `abc` has a length of 6.  Both fields are 16 bits wide, so no string can be longer than 65535 bytes; for wide strings, 65534.

A terminator, when written, is never counted in the length.  It sits in the capacity, one unit past the length.

# Conversion policies

See the `convert` module for the full table.  In short:

* Conversions *into* wide text fail when the destination is too small.
* Conversions *out of* wide text truncate, keeping room for a terminator, unless they are "counted" conversions, which use the whole capacity and write no terminator.
* Wide case changes fail, and write no terminator.
* A destination with no capacity at all is always an error.
* `narrow_to_wide`, `oem_to_wide`, `upcase_wide_to_narrow` and `upcase_wide_to_counted_oem` zero the whole counted length of the destination first.  Bytes the transcoder could not fill read as zero.

# Common Misconceptions and Mistakes

* *"The length tells me where the terminator is."*  It tells you where a terminator *would* be.  Counted conversions never write one, and an exact-fit append leaves no room for one.

* *"A truncated conversion failed."*  Truncating conversions succeed and report `Fit::Truncated`.  The destination holds a valid, shorter string.

* *"The OEM and narrow code pages are the same."*  They can be set independently, and usually are.

* *"A multi-byte conversion never splits a character."*  The transcoder is responsible for that; `Latin1` has nothing to split, and `Whatwg` stops before a character that would not fit.

* *"Parsing `99999999999` fails."*  It wraps.  Integer parsing never reports overflow, and stops quietly at the first character it does not recognise.
*/
