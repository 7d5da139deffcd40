// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Streaming UTF-8 decoder
//!
//! Unlike [`std::str::from_utf8`] this decodes raw, possibly NUL-terminated
//! byte buffers one codepoint at a time, reporting the position of the first
//! malformed sequence. Decoding is strict (overlong forms, surrogates and
//! values above U+10FFFF are rejected) and does not attempt to resynchronise
//! after an error.

use crate::BadEncoding;
use smallvec::{smallvec, SmallVec};

/// Smallest codepoint representable with a sequence of each length
const MIN_FOR_LEN: [u32; 5] = [0, 0, 0x80, 0x800, 0x10000];

#[derive(Clone, Copy, Debug)]
enum State {
    /// Expecting a leading byte
    Start,
    /// Expecting `remaining` continuation bytes of a `len`-byte sequence
    NeedCont { remaining: u8, len: u8, cp: u32 },
}

/// Iterator over codepoints of a UTF-8 byte buffer
///
/// Yields `(offset, codepoint)` where `offset` is the index of the leading
/// byte. Iteration ends at the first NUL byte, at the end of input or after
/// the first error.
#[derive(Clone, Debug)]
pub struct Utf8Decoder<'a> {
    bytes: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> Utf8Decoder<'a> {
    /// Construct
    #[inline]
    pub fn new(bytes: &'a [u8]) -> Self {
        Utf8Decoder {
            bytes,
            pos: 0,
            done: false,
        }
    }

    /// Byte offset of the next sequence to decode
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    fn fail(&mut self, offset: usize, bytes: SmallVec<[u8; 4]>) -> Option<<Self as Iterator>::Item> {
        self.done = true;
        Some(Err(BadEncoding { offset, bytes }))
    }
}

impl<'a> Iterator for Utf8Decoder<'a> {
    type Item = Result<(usize, u32), BadEncoding>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let start = self.pos;
        let mut state = State::Start;
        loop {
            let byte = self.bytes.get(self.pos).copied();
            state = match state {
                State::Start => {
                    let b = match byte {
                        None | Some(0) => {
                            self.done = true;
                            return None;
                        }
                        Some(b) => b,
                    };
                    self.pos += 1;
                    let (len, cp) = match b {
                        0x00..=0x7F => return Some(Ok((start, u32::from(b)))),
                        0xC0..=0xDF => (2, b & 0x1F),
                        0xE0..=0xEF => (3, b & 0x0F),
                        0xF0..=0xF7 => (4, b & 0x07),
                        // continuation byte or invalid leading byte
                        _ => return self.fail(start, smallvec![b]),
                    };
                    State::NeedCont {
                        remaining: len - 1,
                        len,
                        cp: u32::from(cp),
                    }
                }
                State::NeedCont { remaining, len, cp } => {
                    let b = match byte {
                        Some(b) if b & 0xC0 == 0x80 => b,
                        _ => {
                            // Truncated sequence: report what we have plus
                            // the offending byte, if any
                            let mut seq = SmallVec::from_slice(&self.bytes[start..self.pos]);
                            seq.extend(byte);
                            let offset = self.pos;
                            return self.fail(offset, seq);
                        }
                    };
                    self.pos += 1;
                    let cp = (cp << 6) | u32::from(b & 0x3F);
                    if remaining > 1 {
                        State::NeedCont {
                            remaining: remaining - 1,
                            len,
                            cp,
                        }
                    } else {
                        let overlong = cp < MIN_FOR_LEN[usize::from(len)];
                        if overlong || char::from_u32(cp).is_none() {
                            let seq = SmallVec::from_slice(&self.bytes[start..self.pos]);
                            return self.fail(start, seq);
                        }
                        return Some(Ok((start, cp)));
                    }
                }
            };
        }
    }
}

impl<'a> std::iter::FusedIterator for Utf8Decoder<'a> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Result<Vec<u32>, BadEncoding> {
        Utf8Decoder::new(bytes).map(|r| r.map(|(_, c)| c)).collect()
    }

    fn bad(offset: usize, bytes: &[u8]) -> BadEncoding {
        BadEncoding {
            offset,
            bytes: SmallVec::from_slice(bytes),
        }
    }

    #[test]
    fn ascii_and_multibyte() {
        let text = "aé€😀";
        let items: Vec<_> = Utf8Decoder::new(text.as_bytes())
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(
            items,
            [(0, 0x61), (1, 0xE9), (3, 0x20AC), (6, 0x1F600)]
        );
    }

    #[test]
    fn stops_at_nul() {
        assert_eq!(decode(b"ab\0cd"), Ok(vec![0x61, 0x62]));
        assert_eq!(decode(b""), Ok(vec![]));
        assert_eq!(decode(b"\0\xFF"), Ok(vec![]));
    }

    #[test]
    fn round_trip_all_scalars() {
        let mut buf = [0u8; 4];
        for c in (1..=0x10FFFF).filter_map(char::from_u32) {
            let encoded = c.encode_utf8(&mut buf).as_bytes();
            let mut dec = Utf8Decoder::new(encoded);
            assert_eq!(dec.next(), Some(Ok((0, c as u32))));
            assert_eq!(dec.next(), None);
        }
    }

    #[test]
    fn round_trip_string() {
        let text: String = ['x', '\u{7FF}', '\u{800}', '\u{FFFF}', '\u{10000}', '\u{10FFFF}']
            .iter()
            .collect();
        let expected: Vec<u32> = text.chars().map(|c| c as u32).collect();
        assert_eq!(decode(text.as_bytes()), Ok(expected));
    }

    #[test]
    fn lone_continuation() {
        assert_eq!(decode(b"\x80"), Err(bad(0, &[0x80])));
        assert_eq!(decode(b"ab\xBF"), Err(bad(2, &[0xBF])));
    }

    #[test]
    fn invalid_leading_byte() {
        assert_eq!(decode(b"\xF8\x80\x80\x80\x80"), Err(bad(0, &[0xF8])));
        assert_eq!(decode(b"\xFF"), Err(bad(0, &[0xFF])));
    }

    #[test]
    fn truncated() {
        // end of input
        assert_eq!(decode(b"\xE2\x82"), Err(bad(2, &[0xE2, 0x82])));
        // NUL in place of a continuation byte
        assert_eq!(decode(b"\xC3\0"), Err(bad(1, &[0xC3, 0x00])));
        // ASCII in place of a continuation byte
        assert_eq!(decode(b"x\xF0\x9F\x98A"), Err(bad(4, &[0xF0, 0x9F, 0x98, 0x41])));
    }

    #[test]
    fn overlong() {
        assert_eq!(decode(b"\xC0\xAF"), Err(bad(0, &[0xC0, 0xAF])));
        assert_eq!(decode(b"\xC1\xBF"), Err(bad(0, &[0xC1, 0xBF])));
        assert_eq!(decode(b"\xE0\x80\xAF"), Err(bad(0, &[0xE0, 0x80, 0xAF])));
        assert_eq!(decode(b"\xF0\x80\x80\xAF"), Err(bad(0, &[0xF0, 0x80, 0x80, 0xAF])));
    }

    #[test]
    fn surrogates_and_out_of_range() {
        assert_eq!(decode(b"\xED\xA0\x80"), Err(bad(0, &[0xED, 0xA0, 0x80])));
        assert_eq!(decode(b"\xF4\x90\x80\x80"), Err(bad(0, &[0xF4, 0x90, 0x80, 0x80])));
    }

    #[test]
    fn no_codepoints_after_error() {
        let mut dec = Utf8Decoder::new(b"a\x80b");
        assert_eq!(dec.next(), Some(Ok((0, 0x61))));
        assert!(matches!(dec.next(), Some(Err(_))));
        assert_eq!(dec.next(), None);
    }
}
