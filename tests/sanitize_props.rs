//! Property tests for body sanitization and `file` record framing.

use bytes::Bytes;
use moss::codec::{is_allowed, sanitize, FileRecord, ALLOWED_PUNCTUATION};
use moss::protocol::{Command, Language};
use proptest::prelude::*;

fn allowed_byte() -> impl Strategy<Value = u8> {
    let mut alphabet: Vec<u8> = (b'a'..=b'z')
        .chain(b'A'..=b'Z')
        .chain(b'0'..=b'9')
        .chain([b'\t', b'\n', b' '])
        .collect();
    alphabet.extend_from_slice(ALLOWED_PUNCTUATION);
    proptest::sample::select(alphabet)
}

proptest! {
    #[test]
    fn clean_content_passes_through(body in proptest::collection::vec(allowed_byte(), 0..512)) {
        prop_assert_eq!(&*sanitize(&body), body.as_slice());
    }

    #[test]
    fn only_disallowed_bytes_are_removed(body in proptest::collection::vec(any::<u8>(), 0..512)) {
        let expected: Vec<u8> = body.iter().copied().filter(|&b| is_allowed(b)).collect();
        let out = sanitize(&body);
        prop_assert_eq!(&*out, expected.as_slice());
        prop_assert!(out.iter().all(|&b| is_allowed(b)));
    }

    #[test]
    fn header_declares_sanitized_length(body in proptest::collection::vec(any::<u8>(), 0..512)) {
        let record = FileRecord::from_raw(Bytes::from(body));
        let header = Command::File {
            id: 1,
            language: Language::Ascii,
            len: record.len(),
            description: "f".to_string(),
        };
        let wire = record.encode(&header);
        let line_end = wire.iter().position(|&b| b == b'\n').unwrap();
        let line = std::str::from_utf8(&wire[..line_end]).unwrap();
        let declared: usize = line.split(' ').nth(3).unwrap().parse().unwrap();
        prop_assert_eq!(declared, wire.len() - line_end - 1);
    }
}
