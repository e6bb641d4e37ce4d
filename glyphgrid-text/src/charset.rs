//! Ordered character sets fed to the atlas builder.

use std::collections::HashSet;
use std::ops::Range;

/// An ordered sequence of distinct characters.
///
/// Order matters: the atlas builder assigns cells in this order, so the
/// first character lands in the top-left cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharacterSet {
    chars: Vec<char>,
}

impl CharacterSet {
    /// Build from any character sequence, keeping the first occurrence of
    /// each character.
    pub fn new(chars: impl IntoIterator<Item = char>) -> Self {
        let mut seen = HashSet::new();
        let chars = chars.into_iter().filter(|c| seen.insert(*c)).collect();
        Self { chars }
    }

    /// Characters for a half-open code point range. Surrogates are skipped.
    pub fn from_range(range: Range<u32>) -> Self {
        Self::new(range.filter_map(char::from_u32))
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(text.chars())
    }

    /// U+0000..U+007F.
    pub fn ascii() -> Self {
        Self::from_range(0x00..0x80)
    }

    /// U+0000..U+00FF. Fills a 1024px atlas of 64px cells exactly.
    pub fn latin1() -> Self {
        Self::from_range(0x00..0x100)
    }

    /// CJK Unified Ideographs, U+4E00..U+9FFF.
    pub fn cjk_unified() -> Self {
        Self::from_range(0x4E00..0xA000)
    }

    /// Append characters not already present.
    pub fn extend(&mut self, chars: impl IntoIterator<Item = char>) {
        for ch in chars {
            if !self.chars.contains(&ch) {
                self.chars.push(ch);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }
}

impl FromIterator<char> for CharacterSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self::new(iter)
    }
}
