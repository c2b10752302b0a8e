use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits and pacing for collecting one keyword
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectConfig {
    /// Maximum number of posts to collect per keyword (default: 15)
    pub max_posts: usize,

    /// Time budget per requested post in seconds; the keyword deadline is
    /// `max_posts * secs_per_post` (default: 5)
    pub secs_per_post: u64,

    /// Consecutive scrolls without new content before the feed counts as exhausted (default: 5)
    pub max_stalled_scrolls: u32,

    /// Records per persistence batch (default: 5)
    pub batch_size: usize,

    /// Interval between checks in every bounded wait, in milliseconds (default: 250)
    pub poll_interval_ms: u64,

    /// Pause after scrolling before looking for new content, in milliseconds (default: 500)
    pub scroll_settle_ms: u64,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            max_posts: 15,
            secs_per_post: 5,
            max_stalled_scrolls: 5,
            batch_size: 5,
            poll_interval_ms: 250,
            scroll_settle_ms: 500,
        }
    }
}

impl CollectConfig {
    pub fn per_post_budget(&self) -> Duration {
        Duration::from_secs(self.secs_per_post)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }
}

/// Upper bounds, in seconds, for each wait against the page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Search input to appear
    pub search_input_secs: u64,
    /// Location to change after submitting a search
    pub location_change_secs: u64,
    /// Results container to render
    pub results_secs: u64,
    /// CAPTCHA interstitial to show up after a search
    pub captcha_secs: u64,
    /// Expanded text to replace the "see more" affordance
    pub expand_secs: u64,
    /// Timestamp to settle inside the viewport
    pub viewport_secs: u64,
    /// Date tooltip to show non-empty text
    pub tooltip_secs: u64,
    /// Location to change after clicking a timestamp
    pub permalink_secs: u64,
    /// Permalink document to finish loading
    pub ready_state_secs: u64,
    /// Location to return to the results page
    pub back_secs: u64,
    /// Page height or post count to grow after a scroll
    pub scroll_growth_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            search_input_secs: 10,
            location_change_secs: 15,
            results_secs: 20,
            captcha_secs: 5,
            expand_secs: 5,
            viewport_secs: 10,
            tooltip_secs: 10,
            permalink_secs: 15,
            ready_state_secs: 15,
            back_secs: 10,
            scroll_growth_secs: 10,
        }
    }
}

impl Timeouts {
    pub fn search_input(&self) -> Duration {
        Duration::from_secs(self.search_input_secs)
    }

    pub fn location_change(&self) -> Duration {
        Duration::from_secs(self.location_change_secs)
    }

    pub fn results(&self) -> Duration {
        Duration::from_secs(self.results_secs)
    }

    pub fn captcha(&self) -> Duration {
        Duration::from_secs(self.captcha_secs)
    }

    pub fn expand(&self) -> Duration {
        Duration::from_secs(self.expand_secs)
    }

    pub fn viewport(&self) -> Duration {
        Duration::from_secs(self.viewport_secs)
    }

    pub fn tooltip(&self) -> Duration {
        Duration::from_secs(self.tooltip_secs)
    }

    pub fn permalink(&self) -> Duration {
        Duration::from_secs(self.permalink_secs)
    }

    pub fn ready_state(&self) -> Duration {
        Duration::from_secs(self.ready_state_secs)
    }

    pub fn back(&self) -> Duration {
        Duration::from_secs(self.back_secs)
    }

    pub fn scroll_growth(&self) -> Duration {
        Duration::from_secs(self.scroll_growth_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_collect_values() {
        let config = CollectConfig::default();
        assert_eq!(config.max_posts, 15);
        assert_eq!(config.secs_per_post, 5);
        assert_eq!(config.max_stalled_scrolls, 5);
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_partial_timeouts() {
        let timeouts: Timeouts = toml::from_str("results_secs = 40").unwrap();
        assert_eq!(timeouts.results(), Duration::from_secs(40));
        assert_eq!(timeouts.search_input(), Duration::from_secs(10));
    }
}
