// Link value objects consumed by the registry
//
// All offsets are UTF-16 code units so ranges line up with what the host
// toolkit reports for characters.

use crate::errors::ParseLinkError;
use std::ops::Range;
use std::str::FromStr;
use url::Url;

/// A span of text addressed in UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextRange {
    pub start: usize,
    pub length: usize,
}

impl TextRange {
    pub const fn new(start: usize, length: usize) -> Self {
        TextRange { start, length }
    }

    /// One past the last code unit.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.length)
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end()
    }

    /// Whether the range lies entirely within a text of `len` code units.
    pub fn fits(&self, len: usize) -> bool {
        self.end() <= len
    }

    /// Truncate to `[0, len)`. Starting at or past `len` yields an empty range.
    pub fn clamped(&self, len: usize) -> TextRange {
        let start = self.start.min(len);
        let end = self.end().min(len);
        TextRange::new(start, end - start)
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

impl From<Range<usize>> for TextRange {
    fn from(range: Range<usize>) -> Self {
        TextRange::new(range.start, range.end.saturating_sub(range.start))
    }
}

/// A URL attached to an explicit range of the label's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeLink {
    pub url: Url,
    pub range: TextRange,
}

impl RangeLink {
    pub fn new(url: Url, range: impl Into<TextRange>) -> Self {
        RangeLink {
            url,
            range: range.into(),
        }
    }
}

/// A URL attached to the first occurrence of `text` in the label's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLink {
    pub url: Url,
    pub text: String,
}

impl TextLink {
    pub fn new(url: Url, text: impl Into<String>) -> Self {
        TextLink {
            url,
            text: text.into(),
        }
    }

    /// Locate this link in `haystack`, producing the range form.
    pub fn resolve(&self, haystack: &str) -> Option<RangeLink> {
        find_utf16(haystack, &self.text).map(|range| RangeLink {
            url: self.url.clone(),
            range,
        })
    }
}

/// Parses `TEXT=URL`, splitting at the first `=` so the URL may carry a query.
impl FromStr for TextLink {
    type Err = ParseLinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (text, url) = s
            .split_once('=')
            .ok_or_else(|| ParseLinkError::MissingSeparator(s.to_string()))?;
        if text.is_empty() {
            return Err(ParseLinkError::EmptyText);
        }
        let url = Url::parse(url).map_err(|source| ParseLinkError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        Ok(TextLink::new(url, text))
    }
}

/// Number of UTF-16 code units in `text`.
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// First exact, case-sensitive occurrence of `needle` in `haystack`, as a
/// UTF-16 range. An empty needle never matches.
pub fn find_utf16(haystack: &str, needle: &str) -> Option<TextRange> {
    if needle.is_empty() {
        return None;
    }
    let byte_start = haystack.find(needle)?;
    let start = utf16_len(&haystack[..byte_start]);
    Some(TextRange::new(start, utf16_len(needle)))
}
