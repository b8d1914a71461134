//! Byte filter for file bodies.
//!
//! The server only accepts printable ASCII plus tab, newline and space
//! inline after a `file` header. Every other byte is dropped.

use std::borrow::Cow;

/// Punctuation accepted on the wire (in addition to letters and digits).
pub const ALLOWED_PUNCTUATION: &[u8] = b"./,<>?;:\"'`!@#$%^&*()[]{}_+=|\\-";

/// Lookup table: `ALLOWED[b]` is true when byte `b` may be sent.
pub static ALLOWED: [bool; 256] = build_table();

const fn build_table() -> [bool; 256] {
    let mut table = [false; 256];
    let mut i = 0;
    while i < 256 {
        let b = i as u8;
        table[i] = b.is_ascii_alphanumeric() || b == b'\t' || b == b'\n' || b == b' ';
        i += 1;
    }
    let mut j = 0;
    while j < ALLOWED_PUNCTUATION.len() {
        table[ALLOWED_PUNCTUATION[j] as usize] = true;
        j += 1;
    }
    table
}

/// Whether `byte` survives sanitization.
#[inline]
pub fn is_allowed(byte: u8) -> bool {
    ALLOWED[byte as usize]
}

/// Strip every disallowed byte. Borrows when nothing needs removing.
pub fn sanitize(input: &[u8]) -> Cow<'_, [u8]> {
    match input.iter().position(|&b| !is_allowed(b)) {
        None => Cow::Borrowed(input),
        Some(first) => {
            let mut out = Vec::with_capacity(input.len());
            out.extend_from_slice(&input[..first]);
            out.extend(input[first..].iter().copied().filter(|&b| is_allowed(b)));
            Cow::Owned(out)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_source_is_borrowed() {
        let src = b"def f(x):\n\treturn x * 2  # [ok] {y} <z> ~?\n";
        // '~' is not on the wire alphabet
        let out = sanitize(src);
        assert_eq!(&*out, &b"def f(x):\n\treturn x * 2  # [ok] {y} <z> ?\n"[..]);

        let clean = b"int main() { return 0; }\n";
        assert!(matches!(sanitize(clean), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strips_control_and_high_bytes() {
        let src = b"a\r\nb\x00c\x1bd\x7fe\xc3\xa9f";
        assert_eq!(&*sanitize(src), b"a\nbcdef");
    }

    #[test]
    fn test_punctuation_set() {
        for &b in ALLOWED_PUNCTUATION {
            assert!(is_allowed(b), "{} should be allowed", b as char);
        }
        for b in [b'~', b'\r', 0x0b, 0x0c, 0x80, 0xff] {
            assert!(!is_allowed(b), "{:#x} should be stripped", b);
        }
    }

    #[test]
    fn test_allowed_count() {
        // 62 alphanumerics, tab, newline, space, 31 punctuation marks
        assert_eq!(ALLOWED.iter().filter(|&&a| a).count(), 62 + 3 + 31);
    }
}
