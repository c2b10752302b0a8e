//! Capability interface over the rendered search page.
//!
//! The collection algorithm only talks to these traits. The chromiumoxide
//! adapter in [`chrome`] is the one implementation that knows about CSS
//! selectors and CDP calls; tests drive the same algorithm through a scripted
//! in-memory page.
//!
//! ```text
//! FeedSurface (page-level)      PostFragment (one post in the feed)
//!   location / search input       see-more affordance
//!   fragments / height / scroll   story body, media
//!   tooltip / back navigation     timestamp, author
//! ```

mod chrome;
pub(crate) mod scripts;
mod selectors;

#[cfg(test)]
pub(crate) mod mock;

pub use chrome::{ChromeFragment, ChromeSurface};
pub use selectors::Selectors;

use async_trait::async_trait;

use crate::app::Result;
use crate::session::StoredCookie;

/// Page-level operations on the live session
#[async_trait]
pub trait FeedSurface: Send + Sync {
    type Fragment: PostFragment + 'static;

    /// Current navigable location
    async fn location(&self) -> Result<String>;

    async fn open_home(&self) -> Result<()>;

    /// Install cookies into the session; returns how many were accepted
    async fn install_cookies(&self, cookies: &[StoredCookie]) -> Result<usize>;

    async fn reload(&self) -> Result<()>;

    async fn has_search_input(&self) -> Result<bool>;

    /// Remove any residual text from the search input
    async fn clear_search_input(&self) -> Result<()>;

    async fn type_query(&self, query: &str) -> Result<()>;

    async fn submit_query(&self) -> Result<()>;

    /// Whether the results container has rendered
    async fn has_results(&self) -> Result<bool>;

    async fn captcha_present(&self) -> Result<bool>;

    /// All currently rendered post fragments, in DOM order
    async fn fragments(&self) -> Result<Vec<Self::Fragment>>;

    async fn fragment_count(&self) -> Result<usize>;

    async fn page_height(&self) -> Result<u64>;

    async fn scroll_to_bottom(&self) -> Result<()>;

    /// Whether the document has finished loading
    async fn document_ready(&self) -> Result<bool>;

    /// Text of the hover tooltip, if one is showing
    async fn tooltip_text(&self) -> Result<Option<String>>;

    async fn go_back(&self) -> Result<()>;
}

/// Operations scoped to one rendered post
#[async_trait]
pub trait PostFragment: Send + Sync {
    async fn has_see_more(&self) -> Result<bool>;

    async fn click_see_more(&self) -> Result<()>;

    /// Trimmed text of the story body, `None` when the fragment has no body
    async fn story_text(&self) -> Result<Option<String>>;

    /// Raw image URLs in DOM order
    async fn image_sources(&self) -> Result<Vec<String>>;

    /// Targets of the links enclosing each video, in DOM order
    async fn video_links(&self) -> Result<Vec<String>>;

    /// Scroll the timestamp to the middle of the viewport; `false` when there is none
    async fn center_timestamp(&self) -> Result<bool>;

    async fn timestamp_in_viewport(&self) -> Result<bool>;

    async fn hover_timestamp(&self) -> Result<()>;

    async fn click_timestamp(&self) -> Result<()>;

    /// Author display name, trying the primary then the fallback element
    async fn author_name(&self) -> Result<Option<String>>;
}
