//! Byte escaping for COPY text fields.
//!
//! # Classes
//!
//! | Bytes           | Output            | Width |
//! |-----------------|-------------------|-------|
//! | `0x20..=0x7E`   | the byte itself   | 1     |
//! | `0x08..=0x0D`   | `\b \t \n \v \f \r` | 2   |
//! | everything else | `\xHH` (lowercase) | 4    |
//!
//! The backslash (0x5C) sits in the printable range and is written as a
//! single byte. It is not doubled.
//!
//! [`measure`] sums [`WIDTH`], which is built from [`classify`]; [`write`]
//! dispatches on [`classify`] directly. The size predicted for a span is
//! exactly the number of bytes written for it.

/// Escape classification of a single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    /// Printable ASCII, copied verbatim.
    Printable,
    /// One of the six control codes with a letter escape.
    Short,
    /// Anything else, written as `\xHH`.
    Hex,
}

impl Class {
    /// Bytes this class contributes to the output.
    pub const fn width(self) -> usize {
        match self {
            Class::Printable => 1,
            Class::Short => 2,
            Class::Hex => 4,
        }
    }
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Escape letters for codes 8..=13, indexed by `c - 8`.
const SHORT_ESCAPES: [u8; 6] = [b'b', b't', b'n', b'v', b'f', b'r'];

/// Output width for every byte value.
pub const WIDTH: [u8; 256] = build_width_table();

const fn build_width_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = classify(i as u8).width() as u8;
        i += 1;
    }
    table
}

/// Classify one byte.
#[inline]
pub const fn classify(c: u8) -> Class {
    match c {
        b' '..=b'~' => Class::Printable,
        8..=13 => Class::Short,
        _ => Class::Hex,
    }
}

/// Number of bytes [`write`] will emit for `bytes`.
#[inline]
pub fn measure(bytes: &[u8]) -> usize {
    bytes.iter().map(|&c| WIDTH[c as usize] as usize).sum()
}

/// Append the escaped form of `bytes` to `dest`.
///
/// Callers reserve `measure(bytes)` bytes beforehand.
pub fn write(bytes: &[u8], dest: &mut Vec<u8>) {
    for &c in bytes {
        match classify(c) {
            Class::Printable => dest.push(c),
            Class::Short => dest.extend_from_slice(&[b'\\', SHORT_ESCAPES[(c - 8) as usize]]),
            Class::Hex => dest.extend_from_slice(&[
                b'\\',
                b'x',
                HEX_DIGITS[(c >> 4) as usize],
                HEX_DIGITS[(c & 0x0f) as usize],
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn escaped(bytes: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        write(bytes, &mut out);
        out
    }

    #[test]
    fn test_width_matches_write_for_every_byte() {
        for c in 0..=255u8 {
            let out = escaped(&[c]);
            assert_eq!(out.len(), measure(&[c]), "byte 0x{:02x}", c);
        }
    }

    #[test]
    fn test_width_table_matches_classify() {
        for c in 0..=255u8 {
            assert_eq!(WIDTH[c as usize] as usize, classify(c).width(), "byte 0x{:02x}", c);
        }
    }

    #[test]
    fn test_printable_is_identity() {
        let printable: Vec<u8> = (0x20..=0x7e).collect();
        assert_eq!(escaped(&printable), printable);
        assert_eq!(measure(&printable), printable.len());
    }

    #[test]
    fn test_short_escapes_by_value() {
        assert_eq!(escaped(&[8]), b"\\b");
        assert_eq!(escaped(&[9]), b"\\t");
        assert_eq!(escaped(&[10]), b"\\n");
        assert_eq!(escaped(&[11]), b"\\v");
        assert_eq!(escaped(&[12]), b"\\f");
        assert_eq!(escaped(&[13]), b"\\r");
    }

    #[test]
    fn test_hex_escapes_lowercase() {
        assert_eq!(escaped(&[0x00]), b"\\x00");
        assert_eq!(escaped(&[0x07]), b"\\x07");
        assert_eq!(escaped(&[0x0e]), b"\\x0e");
        assert_eq!(escaped(&[0x1f]), b"\\x1f");
        assert_eq!(escaped(&[0x7f]), b"\\x7f");
        assert_eq!(escaped(&[0xab]), b"\\xab");
        assert_eq!(escaped(&[0xff]), b"\\xff");
    }

    #[test]
    fn test_utf8_multibyte_is_hex_escaped() {
        // "é" is 0xc3 0xa9 in UTF-8.
        assert_eq!(escaped("é".as_bytes()), b"\\xc3\\xa9");
        assert_eq!(measure("é".as_bytes()), 8);
    }

    // The COPY reader treats `\` as an escape lead. This encoder writes it
    // as-is; the test pins that behaviour so any change is deliberate.
    #[test]
    fn test_backslash_is_not_doubled() {
        assert_eq!(classify(b'\\'), Class::Printable);
        assert_eq!(escaped(b"a\\b"), b"a\\b");
    }

    #[test]
    fn test_empty_span() {
        assert_eq!(measure(&[]), 0);
        assert!(escaped(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn prop_measure_matches_write(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
            prop_assert_eq!(escaped(&bytes).len(), measure(&bytes));
        }

        #[test]
        fn prop_output_has_no_raw_controls(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
            let out = escaped(&bytes);
            prop_assert!(out.iter().all(|&c| (0x20..=0x7e).contains(&c)));
        }
    }
}
