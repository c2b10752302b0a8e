use std::collections::HashSet;
use std::time::Duration;

use tokio::time::Instant;

use crate::wait::deadline_after;

/// Per-keyword crawl bookkeeping. Owned by a single collection run.
#[derive(Debug)]
pub struct CrawlState {
    emitted_links: HashSet<String>,
    scroll_attempts: u32,
    admitted: usize,
    budget: Duration,
    deadline: Option<Instant>,
}

impl CrawlState {
    /// A crawl with a time budget of `max_posts * per_post`. The clock does
    /// not run until [`start_clock`](Self::start_clock).
    pub fn new(max_posts: usize, per_post: Duration) -> Self {
        Self {
            emitted_links: HashSet::new(),
            scroll_attempts: 0,
            admitted: 0,
            budget: per_post.saturating_mul(u32::try_from(max_posts).unwrap_or(u32::MAX)),
            deadline: None,
        }
    }

    /// Fix the deadline at `budget` from now. Later calls keep the first one.
    pub fn start_clock(&mut self) {
        if self.deadline.is_none() {
            self.deadline = Some(deadline_after(self.budget));
        }
    }

    pub fn has_emitted(&self, link: &str) -> bool {
        self.emitted_links.contains(link)
    }

    /// Count an admitted record, remembering its link when it has one
    pub fn record_admission(&mut self, link: Option<&str>) {
        if let Some(link) = link {
            self.emitted_links.insert(link.to_string());
        }
        self.admitted += 1;
    }

    pub fn admitted(&self) -> usize {
        self.admitted
    }

    pub fn emitted_links(&self) -> usize {
        self.emitted_links.len()
    }

    pub fn scroll_attempts(&self) -> u32 {
        self.scroll_attempts
    }

    /// Register a scroll cycle that loaded nothing; returns the consecutive count
    pub fn note_stall(&mut self) -> u32 {
        self.scroll_attempts += 1;
        self.scroll_attempts
    }

    pub fn note_growth(&mut self) {
        self.scroll_attempts = 0;
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() > deadline)
    }
}
