//! Dedup/filter gate between extraction and output.

use crate::domain::{CrawlState, PostRecord};

/// Link substrings whose posts are never emitted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Denylist {
    entries: Vec<String>,
}

impl Denylist {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(Into::into)
                .filter(|e: &String| !e.is_empty())
                .collect(),
        }
    }

    /// First entry contained in `link`, if any
    pub fn matching(&self, link: &str) -> Option<&str> {
        self.entries
            .iter()
            .map(String::as_str)
            .find(|entry| link.contains(entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Admitted,
    Denylisted(String),
    Duplicate,
}

impl Verdict {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Verdict::Admitted)
    }
}

/// Decide whether `record` may be emitted for this crawl.
///
/// Rejections leave `crawl` untouched. Records without a link cannot be
/// matched against anything and are always admitted.
pub fn admit(record: &PostRecord, crawl: &mut CrawlState, denylist: &Denylist) -> Verdict {
    let link = record.permalink();

    if let Some(link) = link {
        if let Some(entry) = denylist.matching(link) {
            return Verdict::Denylisted(entry.to_string());
        }
        if crawl.has_emitted(link) {
            return Verdict::Duplicate;
        }
    }

    crawl.record_admission(link);
    Verdict::Admitted
}
