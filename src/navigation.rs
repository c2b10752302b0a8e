//! Search submission and feed scrolling.

use std::time::Duration;

use tracing::{debug, info};

use crate::engine::Timeouts;
use crate::surface::FeedSurface;
use crate::wait::{poll_for, poll_until, WaitTimeout};

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search input unavailable: {0}")]
    InputMissing(WaitTimeout),

    #[error("location never changed after submitting: {0}")]
    LocationUnchanged(WaitTimeout),

    #[error("results never rendered: {0}")]
    ResultsMissing(WaitTimeout),

    #[error("page interaction failed: {0}")]
    Interaction(String),
}

/// Result of one scroll-for-more cycle. `grew == false` is a stall, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOutcome {
    pub grew: bool,
    pub new_height: u64,
    pub new_fragment_count: usize,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    timeouts: Timeouts,
    poll: Duration,
    scroll_settle: Duration,
}

impl Navigator {
    pub fn new(timeouts: Timeouts, poll: Duration, scroll_settle: Duration) -> Self {
        Self {
            timeouts,
            poll,
            scroll_settle,
        }
    }

    /// Type `keyword` into the search box and wait for the results view
    pub async fn search<S: FeedSurface>(&self, surface: &S, keyword: &str) -> Result<(), SearchError> {
        info!("Searching for posts with keyword: {}", keyword);

        poll_until("search input", self.timeouts.search_input(), self.poll, move || async move {
            surface.has_search_input().await.unwrap_or(false)
        })
        .await
        .map_err(SearchError::InputMissing)?;

        let interaction = |e: crate::app::GleanerError| SearchError::Interaction(e.to_string());

        // The box may still hold the previous keyword
        surface.clear_search_input().await.map_err(interaction)?;
        surface.type_query(keyword).await.map_err(interaction)?;
        let before = surface.location().await.map_err(interaction)?;
        let before = before.as_str();
        surface.submit_query().await.map_err(interaction)?;

        poll_for("results location", self.timeouts.location_change(), self.poll, move || async move {
            surface.location().await.ok().filter(|l| l.as_str() != before)
        })
        .await
        .map_err(SearchError::LocationUnchanged)?;

        poll_until("results container", self.timeouts.results(), self.poll, move || async move {
            surface.has_results().await.unwrap_or(false)
        })
        .await
        .map_err(SearchError::ResultsMissing)?;

        Ok(())
    }

    /// Scroll to the bottom and wait for the page height or post count to grow
    pub async fn scroll_for_more<S: FeedSurface>(
        &self,
        surface: &S,
        prior_count: usize,
        prior_height: u64,
    ) -> ScrollOutcome {
        if let Err(e) = surface.scroll_to_bottom().await {
            debug!("Scroll failed: {}", e);
        }
        tokio::time::sleep(self.scroll_settle).await;

        let grown = poll_for("new content", self.timeouts.scroll_growth(), self.poll, move || async move {
            let height = surface.page_height().await.ok()?;
            let count = surface.fragment_count().await.ok()?;
            (height > prior_height || count > prior_count).then_some((height, count))
        })
        .await;

        match grown {
            Ok((new_height, new_fragment_count)) => ScrollOutcome {
                grew: true,
                new_height,
                new_fragment_count,
            },
            Err(_) => ScrollOutcome {
                grew: false,
                new_height: surface.page_height().await.unwrap_or(prior_height),
                new_fragment_count: surface.fragment_count().await.unwrap_or(prior_count),
            },
        }
    }

    /// Look for a CAPTCHA interstitial for a short, bounded time
    pub async fn captcha_shown<S: FeedSurface>(&self, surface: &S) -> bool {
        let found = poll_until("captcha", self.timeouts.captcha(), self.poll, move || async move {
            surface.captcha_present().await.unwrap_or(false)
        })
        .await;

        if found.is_err() {
            debug!("No CAPTCHA detected");
        }
        found.is_ok()
    }
}
