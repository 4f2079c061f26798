// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmtext

//! Zero-width character embedding channel.
//!
//! Hides a bit sequence inside visible text using two invisible code points:
//! U+200B ZERO WIDTH SPACE encodes a 0 bit, U+200C ZERO WIDTH NON-JOINER
//! encodes a 1 bit. Markers are injected immediately after boundary
//! characters (space, sentence/clause punctuation, newline); bits left over
//! once the cover text runs out are appended as trailing markers.
//!
//! Stripping the markers restores the cover text exactly, and extraction
//! returns the bits in embed order — the channel is lossless as long as the
//! text is transported verbatim. Any transport that normalizes whitespace or
//! strips zero-width characters destroys the channel silently; there is no
//! integrity check at this layer. That responsibility sits with the GCM
//! authentication tag upstream.

/// Marker for a 0 bit.
const ZERO: char = '\u{200B}';

/// Marker for a 1 bit.
const ONE: char = '\u{200C}';

/// Characters after which a marker may be injected.
const INJECT_AFTER: [char; 8] = [' ', '.', ',', '!', '?', ';', ':', '\n'];

/// Embed a bit sequence into cover text.
///
/// Every cover character is emitted unchanged; after each boundary character
/// the next unconsumed bit is emitted as a marker. Exactly `bits.len()`
/// markers end up in the output, in order, regardless of how many boundary
/// characters the cover text offers.
pub fn embed(cover_text: &str, bits: &[u8]) -> String {
    let mut out = String::with_capacity(cover_text.len() + bits.len() * 3);
    let mut iter = bits.iter();

    for ch in cover_text.chars() {
        out.push(ch);
        if INJECT_AFTER.contains(&ch) {
            if let Some(&bit) = iter.next() {
                out.push(if bit & 1 == 1 { ONE } else { ZERO });
            }
        }
    }
    for &bit in iter {
        out.push(if bit & 1 == 1 { ONE } else { ZERO });
    }
    out
}

/// Extract the embedded bits, in encounter order.
pub fn extract(text: &str) -> Vec<u8> {
    text.chars()
        .filter_map(|ch| match ch {
            ZERO => Some(0),
            ONE => Some(1),
            _ => None,
        })
        .collect()
}

/// Strip all markers, leaving only the visible cover text.
pub fn get_visible(text: &str) -> String {
    text.chars().filter(|&ch| ch != ZERO && ch != ONE).collect()
}

/// Cheap pre-check: does the text carry at least one marker?
pub fn has_hidden(text: &str) -> bool {
    text.chars().any(|ch| ch == ZERO || ch == ONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_extract_roundtrip() {
        let cover = "The quick brown fox jumps, then rests.";
        let bits = vec![1, 0, 1, 1, 0, 0, 1, 0];
        let stego = embed(cover, &bits);
        assert_eq!(extract(&stego), bits);
    }

    #[test]
    fn visible_text_is_cover() {
        let cover = "Hello, world! How are you?";
        let bits = vec![0, 1, 0, 1, 1];
        let stego = embed(cover, &bits);
        assert_eq!(get_visible(&stego), cover);
        assert_ne!(stego, cover);
    }

    #[test]
    fn marker_count_matches_bits() {
        let cover = "a b c.";
        let bits = vec![1; 40]; // far more bits than boundaries
        let stego = embed(cover, &bits);
        let markers = stego.chars().filter(|&c| c == '\u{200C}').count();
        assert_eq!(markers, 40);
    }

    #[test]
    fn overflow_bits_trail_the_text() {
        let cover = "ab"; // no boundary characters at all
        let bits = vec![1, 0, 1];
        let stego = embed(cover, &bits);
        assert!(stego.starts_with("ab"));
        assert_eq!(extract(&stego), bits);
        assert_eq!(get_visible(&stego), cover);
    }

    #[test]
    fn empty_bits_leave_text_untouched() {
        let cover = "Nothing hidden here.";
        assert_eq!(embed(cover, &[]), cover);
        assert!(!has_hidden(cover));
    }

    #[test]
    fn has_hidden_detects_single_marker() {
        assert!(has_hidden("plain\u{200B}text"));
        assert!(has_hidden("plain\u{200C}text"));
        assert!(!has_hidden("plain text"));
    }

    #[test]
    fn extraction_order_is_embed_order() {
        let cover = "w x y z."; // four spaces + period = five boundaries
        let bits = vec![1, 1, 0, 1, 0];
        assert_eq!(extract(&embed(cover, &bits)), bits);
    }

    #[test]
    fn unicode_cover_preserved() {
        let cover = "Kumusta ka? Mabuti naman, salamat!";
        let bits = vec![0, 1, 1, 0];
        let stego = embed(cover, &bits);
        assert_eq!(get_visible(&stego), cover);
        assert_eq!(extract(&stego), bits);
    }
}
