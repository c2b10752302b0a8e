//! Collection engine: the bounded scroll-and-scrape loop for one keyword.
//!
//! ```text
//! Searching ──fail──────────────────────────────┐
//!     │                                         ▼
//!     ├─captcha─▶ Suspended ─resume─┐          Done
//!     ▼                             ▼           ▲
//! Collecting ◀──────────────────────┘           │
//!     │  ▲                                      │
//!     ▼  │ grew / stall < limit                 │
//! Scrolling ──stall limit──────────────────────-┤
//!            max_posts reached / deadline ──────┘
//! ```
//!
//! A [`Collection`] produces records lazily: each call to
//! [`Collection::next`] drives the page only as far as the next admitted
//! post, so the caller can persist it before the next one is extracted.

mod config;
mod suspension;

pub use config::{CollectConfig, Timeouts};
pub use suspension::{suspension_channel, Suspended, SuspensionControl, SuspensionPoint};

use std::collections::VecDeque;

use futures::Stream;
use tracing::{debug, error, info, warn};

use crate::domain::{CrawlState, PostRecord};
use crate::extractor::{ContentExtractor, PermalinkOutcome};
use crate::gate::{self, Denylist, Verdict};
use crate::navigation::Navigator;
use crate::surface::FeedSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Searching,
    /// Waiting for a human to clear a CAPTCHA
    Suspended,
    Collecting,
    Scrolling,
    Done,
}

pub struct CollectionEngine {
    navigator: Navigator,
    extractor: ContentExtractor,
    denylist: Denylist,
    config: CollectConfig,
    suspension: SuspensionPoint,
}

impl CollectionEngine {
    pub fn new(
        config: CollectConfig,
        timeouts: Timeouts,
        decorative: Vec<String>,
        denylist: Denylist,
        suspension: SuspensionPoint,
    ) -> Self {
        let navigator = Navigator::new(timeouts.clone(), config.poll_interval(), config.scroll_settle());
        let extractor = ContentExtractor::new(timeouts, config.poll_interval(), decorative);
        Self {
            navigator,
            extractor,
            denylist,
            config,
            suspension,
        }
    }

    pub fn config(&self) -> &CollectConfig {
        &self.config
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn suspension(&self) -> &SuspensionPoint {
        &self.suspension
    }

    /// Start collecting posts for `keyword`. Nothing touches the page until
    /// the returned collection is polled. The deadline starts once the search
    /// has landed and any CAPTCHA has been cleared.
    pub fn scrape<'a, S: FeedSurface>(
        &'a self,
        surface: &'a S,
        keyword: &str,
        max_posts: usize,
    ) -> Collection<'a, S> {
        let phase = if max_posts == 0 {
            Phase::Done
        } else {
            Phase::Searching
        };

        Collection {
            engine: self,
            surface,
            keyword: keyword.to_string(),
            max_posts,
            phase,
            crawl: CrawlState::new(max_posts, self.config.per_post_budget()),
            pending: VecDeque::new(),
            scanned: false,
            last_height: 0,
            last_count: 0,
            reported: false,
        }
    }
}

/// Finite, non-restartable production of the posts found for one keyword
pub struct Collection<'a, S: FeedSurface> {
    engine: &'a CollectionEngine,
    surface: &'a S,
    keyword: String,
    max_posts: usize,
    phase: Phase,
    crawl: CrawlState,
    pending: VecDeque<S::Fragment>,
    scanned: bool,
    last_height: u64,
    last_count: usize,
    reported: bool,
}

impl<'a, S: FeedSurface> Collection<'a, S> {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn admitted(&self) -> usize {
        self.crawl.admitted()
    }

    /// Drive the page until the next admitted post, or `None` once done
    pub async fn next(&mut self) -> Option<PostRecord> {
        loop {
            if self.phase != Phase::Done && self.crawl.is_expired() {
                warn!("Scrolling timed out for keyword '{}'", self.keyword);
                self.phase = Phase::Done;
            }

            match self.phase {
                Phase::Searching => self.search().await,
                Phase::Suspended => self.wait_for_resume().await,
                Phase::Collecting => {
                    if let Some(record) = self.collect_one().await {
                        return Some(record);
                    }
                }
                Phase::Scrolling => self.scroll().await,
                Phase::Done => {
                    self.report();
                    return None;
                }
            }
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = PostRecord> + 'a {
        futures::stream::unfold(self, |mut collection| async move {
            let record = collection.next().await?;
            Some((record, collection))
        })
    }

    async fn search(&mut self) {
        let navigator = &self.engine.navigator;
        if let Err(e) = navigator.search(self.surface, &self.keyword).await {
            error!("Search failed: {}", e);
            self.phase = Phase::Done;
            return;
        }

        self.phase = if navigator.captcha_shown(self.surface).await {
            Phase::Suspended
        } else {
            Phase::Collecting
        };
    }

    async fn wait_for_resume(&mut self) {
        let notice = Suspended {
            reason: "CAPTCHA detected after search".to_string(),
            keyword: Some(self.keyword.clone()),
        };
        match self.engine.suspension.suspend(notice).await {
            Ok(()) => {
                info!("Resuming keyword '{}'", self.keyword);
                self.phase = Phase::Collecting;
            }
            Err(e) => {
                error!("Cannot wait for CAPTCHA resolution: {}", e);
                self.phase = Phase::Done;
            }
        }
    }

    /// Process one visible fragment; moves to `Scrolling` when none are left
    async fn collect_one(&mut self) -> Option<PostRecord> {
        self.crawl.start_clock();
        if !self.scanned {
            self.scan().await;
        }

        let Some(fragment) = self.pending.pop_front() else {
            self.scanned = false;
            self.phase = Phase::Scrolling;
            return None;
        };

        let extraction = match self
            .engine
            .extractor
            .extract(self.surface, &fragment, &self.keyword)
            .await
        {
            Ok(extraction) => extraction,
            Err(skip) => {
                debug!("Could not extract post content: {}", skip);
                return None;
            }
        };

        if let PermalinkOutcome::Failed { stage, reason } = &extraction.permalink {
            debug!("Could not extract post link/date ({:?}): {}", stage, reason);
        }

        let record = extraction.record;
        match gate::admit(&record, &mut self.crawl, &self.engine.denylist) {
            Verdict::Admitted => {
                if self.crawl.admitted() >= self.max_posts {
                    self.phase = Phase::Done;
                }
                Some(record)
            }
            Verdict::Denylisted(entry) => {
                info!(
                    "Skipping post from denylisted source: {} (matched '{}')",
                    record.permalink().unwrap_or_default(),
                    entry
                );
                None
            }
            Verdict::Duplicate => {
                info!("Skipping crawled post: {}", record.permalink().unwrap_or_default());
                None
            }
        }
    }

    async fn scan(&mut self) {
        match self.surface.fragments().await {
            Ok(fragments) => {
                self.last_count = fragments.len();
                self.pending = fragments.into();
            }
            Err(e) => {
                warn!("Could not list posts: {}", e);
                self.pending.clear();
            }
        }
        if let Ok(height) = self.surface.page_height().await {
            self.last_height = height;
        }
        self.scanned = true;
    }

    async fn scroll(&mut self) {
        let outcome = self
            .engine
            .navigator
            .scroll_for_more(self.surface, self.last_count, self.last_height)
            .await;
        self.last_height = outcome.new_height;
        self.last_count = outcome.new_fragment_count;

        if outcome.grew {
            self.crawl.note_growth();
        } else {
            let limit = self.engine.config.max_stalled_scrolls;
            let attempts = self.crawl.note_stall();
            info!("No new content loaded. Scroll attempt {}/{}", attempts, limit);
            if attempts >= limit {
                self.phase = Phase::Done;
                return;
            }
        }
        self.phase = Phase::Collecting;
    }

    fn report(&mut self) {
        if self.reported {
            return;
        }
        self.reported = true;
        info!(
            "Scraped {} posts for keyword '{}' ({} distinct links)",
            self.crawl.admitted(),
            self.keyword,
            self.crawl.emitted_links()
        );
    }
}
