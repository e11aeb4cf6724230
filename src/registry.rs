// Link registry: attaches URLs to ranges of the label's styled text
//
// Every mutation is copy-replace: clone the current styled text, apply the
// links to the copy, then swap it in. Nothing here ever fails loudly; links
// that cannot be placed are dropped with a debug event.

use crate::link::{RangeLink, TextLink, TextRange};
use crate::styled_text::StyledText;
use serde::{Deserialize, Serialize};
use url::Url;

/// What to do with a range that extends past the end of the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// Keep the part that overlaps the text.
    #[default]
    Clamp,
    /// Ignore the whole range.
    Discard,
}

#[derive(Debug, Clone, Default)]
pub struct LinkRegistry {
    styled: StyledText,
    policy: RangePolicy,
    revision: u64,
}

impl LinkRegistry {
    pub fn new(text: impl Into<String>) -> Self {
        LinkRegistry {
            styled: StyledText::new(text),
            policy: RangePolicy::default(),
            revision: 0,
        }
    }

    pub fn with_policy(mut self, policy: RangePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RangePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: RangePolicy) {
        self.policy = policy;
    }

    pub fn styled_text(&self) -> &StyledText {
        &self.styled
    }

    pub fn text(&self) -> &str {
        self.styled.text()
    }

    /// Bumped every time the styled text is replaced.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the text, dropping every link.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.replace(StyledText::new(text));
    }

    pub fn link_at(&self, index: usize) -> Option<&Url> {
        self.styled.link_at(index)
    }

    /// Link one explicit range. Returns whether the styled text changed.
    pub fn add_link(&mut self, url: &Url, range: TextRange) -> bool {
        self.add_range_links(&[RangeLink {
            url: url.clone(),
            range,
        }])
    }

    /// Link the first occurrence of `text`; a no-op when it does not occur.
    pub fn add_link_for_text(&mut self, url: &Url, text: &str) -> bool {
        self.add_text_links(&[TextLink::new(url.clone(), text)])
    }

    /// Resolve every entry against the current text before applying any of
    /// them, then apply the resolved ones in one replacement. Entries whose
    /// text does not occur are dropped without affecting the others.
    pub fn add_text_links(&mut self, links: &[TextLink]) -> bool {
        if self.styled.is_empty() {
            tracing::debug!(count = links.len(), "ignoring text links on empty label");
            return false;
        }

        let resolved: Vec<RangeLink> = links
            .iter()
            .filter_map(|link| {
                let found = link.resolve(self.styled.text());
                if found.is_none() {
                    tracing::debug!(
                        text = %link.text,
                        url = %link.url,
                        "link text not found, dropping"
                    );
                }
                found
            })
            .collect();

        self.add_range_links(&resolved)
    }

    /// Apply ranges in order. Later ranges overwrite earlier ones where they
    /// overlap.
    pub fn add_range_links(&mut self, links: &[RangeLink]) -> bool {
        if self.styled.is_empty() || links.is_empty() {
            return false;
        }

        let len = self.styled.len_utf16();
        let mut updated = self.styled.clone();
        let mut applied = 0;
        for link in links {
            let Some(range) = self.admit(link.range, len) else {
                continue;
            };
            updated.set_link(range, &link.url);
            applied += 1;
        }

        if applied == 0 {
            return false;
        }
        self.replace(updated);
        true
    }

    fn admit(&self, range: TextRange, len: usize) -> Option<TextRange> {
        if range.fits(len) {
            return (!range.is_empty()).then_some(range);
        }

        match self.policy {
            RangePolicy::Clamp => {
                let clamped = range.clamped(len);
                tracing::debug!(
                    start = range.start,
                    length = range.length,
                    text_len = len,
                    "clamping link range to text"
                );
                (!clamped.is_empty()).then_some(clamped)
            }
            RangePolicy::Discard => {
                tracing::debug!(
                    start = range.start,
                    length = range.length,
                    text_len = len,
                    "discarding out-of-bounds link range"
                );
                None
            }
        }
    }

    fn replace(&mut self, styled: StyledText) {
        self.styled = styled;
        self.revision += 1;
    }
}
