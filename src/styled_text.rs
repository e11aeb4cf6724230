// Styled text: plain text plus attribute runs carrying an optional link
//
// Runs are kept sorted, non-overlapping and covering exactly [0, len_utf16).
// Adjacent runs never carry the same link.

use crate::link::{TextRange, utf16_len};
use url::Url;

/// A maximal range over which the link attribute is constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRun {
    pub range: TextRange,
    pub link: Option<Url>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledText {
    text: String,
    len_utf16: usize,
    runs: Vec<AttributeRun>,
}

impl StyledText {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let len_utf16 = utf16_len(&text);
        let runs = if len_utf16 == 0 {
            Vec::new()
        } else {
            vec![AttributeRun {
                range: TextRange::new(0, len_utf16),
                link: None,
            }]
        };
        StyledText {
            text,
            len_utf16,
            runs,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in UTF-16 code units.
    pub fn len_utf16(&self) -> usize {
        self.len_utf16
    }

    pub fn is_empty(&self) -> bool {
        self.len_utf16 == 0
    }

    pub fn runs(&self) -> &[AttributeRun] {
        &self.runs
    }

    /// Iterate over the linked runs only.
    pub fn links(&self) -> impl Iterator<Item = (TextRange, &Url)> {
        self.runs
            .iter()
            .filter_map(|run| run.link.as_ref().map(|url| (run.range, url)))
    }

    pub fn has_links(&self) -> bool {
        self.runs.iter().any(|run| run.link.is_some())
    }

    /// Attach `url` to every code unit in `range`, replacing whatever link was
    /// there before. The range is clamped to the text; an empty result is a
    /// no-op.
    pub fn set_link(&mut self, range: TextRange, url: &Url) {
        let range = range.clamped(self.len_utf16);
        if range.is_empty() {
            return;
        }

        self.split_at(range.start);
        self.split_at(range.end());

        for run in &mut self.runs {
            if run.range.start >= range.start && run.range.end() <= range.end() {
                run.link = Some(url.clone());
            }
        }

        self.merge_adjacent();
    }

    /// Link at a single code unit. Only the run containing `index` is
    /// consulted; out-of-bounds indices have no link.
    pub fn link_at(&self, index: usize) -> Option<&Url> {
        self.run_at(index).and_then(|run| run.link.as_ref())
    }

    /// Link at `index` together with the full range it spans.
    pub fn link_run_at(&self, index: usize) -> Option<(&Url, TextRange)> {
        self.run_at(index)
            .and_then(|run| run.link.as_ref().map(|url| (url, run.range)))
    }

    fn run_at(&self, index: usize) -> Option<&AttributeRun> {
        let idx = self.runs.partition_point(|run| run.range.end() <= index);
        self.runs.get(idx).filter(|run| run.range.contains(index))
    }

    fn split_at(&mut self, pos: usize) {
        if pos == 0 || pos >= self.len_utf16 {
            return;
        }
        let idx = self.runs.partition_point(|run| run.range.end() <= pos);
        let Some(run) = self.runs.get_mut(idx) else {
            return;
        };
        if run.range.start == pos {
            return;
        }

        let tail = AttributeRun {
            range: TextRange::new(pos, run.range.end() - pos),
            link: run.link.clone(),
        };
        run.range.length = pos - run.range.start;
        self.runs.insert(idx + 1, tail);
    }

    fn merge_adjacent(&mut self) {
        let mut merged: Vec<AttributeRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if let Some(last) = merged.last_mut() {
                if last.link == run.link {
                    last.range.length += run.range.length;
                    continue;
                }
            }
            merged.push(run);
        }
        self.runs = merged;
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        StyledText::new(text)
    }
}

impl From<String> for StyledText {
    fn from(text: String) -> Self {
        StyledText::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_plain_text_has_single_unlinked_run() {
        let styled = StyledText::new("hello world");
        assert_eq!(styled.runs().len(), 1);
        assert_eq!(styled.runs()[0].range, TextRange::new(0, 11));
        assert!(!styled.has_links());
        assert!(styled.link_at(3).is_none());
    }

    #[test]
    fn test_empty_text_has_no_runs() {
        let mut styled = StyledText::new("");
        assert!(styled.is_empty());
        assert!(styled.runs().is_empty());
        styled.set_link(TextRange::new(0, 3), &url("https://a.example/"));
        assert!(styled.runs().is_empty());
        assert!(styled.link_at(0).is_none());
    }

    #[test]
    fn test_set_link_splits_runs() {
        let mut styled = StyledText::new("Please click here now");
        let a = url("https://a.example/");
        styled.set_link(TextRange::new(7, 10), &a);

        let ranges: Vec<_> = styled.runs().iter().map(|r| r.range).collect();
        assert_eq!(
            ranges,
            vec![
                TextRange::new(0, 7),
                TextRange::new(7, 10),
                TextRange::new(17, 4)
            ]
        );
        assert_eq!(styled.link_at(7), Some(&a));
        assert_eq!(styled.link_at(16), Some(&a));
        assert!(styled.link_at(6).is_none());
        assert!(styled.link_at(17).is_none());
    }

    #[test]
    fn test_overlap_last_write_wins() {
        let mut styled = StyledText::new("0123456789");
        let a = url("https://a.example/");
        let b = url("https://b.example/");
        styled.set_link(TextRange::new(0, 6), &a);
        styled.set_link(TextRange::new(4, 4), &b);

        assert_eq!(styled.link_at(3), Some(&a));
        assert_eq!(styled.link_at(4), Some(&b));
        assert_eq!(styled.link_at(7), Some(&b));
        assert!(styled.link_at(8).is_none());
        assert_eq!(styled.link_run_at(5), Some((&b, TextRange::new(4, 4))));
        assert_eq!(styled.link_run_at(1), Some((&a, TextRange::new(0, 4))));
    }

    #[test]
    fn test_same_link_twice_is_idempotent() {
        let a = url("https://a.example/");
        let mut once = StyledText::new("foo and bar");
        once.set_link(TextRange::new(0, 3), &a);
        let mut twice = once.clone();
        twice.set_link(TextRange::new(0, 3), &a);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_adjacent_equal_links_merge() {
        let a = url("https://a.example/");
        let mut styled = StyledText::new("abcdef");
        styled.set_link(TextRange::new(0, 3), &a);
        styled.set_link(TextRange::new(3, 3), &a);
        assert_eq!(styled.runs().len(), 1);
        assert_eq!(styled.link_run_at(0), Some((&a, TextRange::new(0, 6))));
    }

    #[test]
    fn test_set_link_clamps_to_text() {
        let a = url("https://a.example/");
        let mut styled = StyledText::new("abcdef");
        styled.set_link(TextRange::new(4, 100), &a);
        assert_eq!(styled.link_run_at(5), Some((&a, TextRange::new(4, 2))));
        assert!(styled.link_at(6).is_none());
    }

    #[test]
    fn test_links_iterator() {
        let a = url("https://a.example/");
        let b = url("https://b.example/");
        let mut styled = StyledText::new("foo and bar");
        styled.set_link(TextRange::new(8, 3), &b);
        styled.set_link(TextRange::new(0, 3), &a);
        let links: Vec<_> = styled.links().collect();
        assert_eq!(
            links,
            vec![(TextRange::new(0, 3), &a), (TextRange::new(8, 3), &b)]
        );
    }
}
