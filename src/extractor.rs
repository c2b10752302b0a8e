//! Turns one rendered post fragment into a [`PostRecord`].
//!
//! Extraction runs as a fixed sequence of steps. Only the story body is
//! mandatory; every other step degrades to a partial record, and the outcome
//! of the fragile ones is reported alongside the record.

use std::time::Duration;

use tracing::debug;

use crate::domain::PostRecord;
use crate::engine::Timeouts;
use crate::surface::{FeedSurface, PostFragment};
use crate::wait::{poll_for, poll_until};

/// The fragment is not a post (ad placeholder, unrelated widget)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionSkip {
    #[error("fragment has no story body")]
    NoStoryBody,

    #[error("story body could not be read: {0}")]
    Unreadable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionOutcome {
    /// No "see more" affordance; the text was complete
    NotTruncated,
    Expanded,
    /// The affordance was there but the text did not expand in time
    StillTruncated,
}

/// Step of the permalink sub-path that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermalinkStage {
    Timestamp,
    Viewport,
    Hover,
    Tooltip,
    Click,
    Navigation,
    DocumentLoad,
    Return,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermalinkOutcome {
    Resolved,
    /// Link, date and author are absent from the record
    Failed { stage: PermalinkStage, reason: String },
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub record: PostRecord,
    pub expansion: ExpansionOutcome,
    pub permalink: PermalinkOutcome,
}

impl Extraction {
    pub fn is_partial(&self) -> bool {
        self.permalink != PermalinkOutcome::Resolved
    }
}

struct Permalink {
    link: String,
    date: String,
    name: Option<String>,
}

fn failed(stage: PermalinkStage, reason: impl ToString) -> PermalinkOutcome {
    PermalinkOutcome::Failed {
        stage,
        reason: reason.to_string(),
    }
}

pub struct ContentExtractor {
    timeouts: Timeouts,
    poll: Duration,
    decorative: Vec<String>,
}

impl ContentExtractor {
    pub fn new(timeouts: Timeouts, poll: Duration, decorative: Vec<String>) -> Self {
        Self {
            timeouts,
            poll,
            decorative,
        }
    }

    pub async fn extract<S: FeedSurface>(
        &self,
        surface: &S,
        fragment: &S::Fragment,
        keyword: &str,
    ) -> Result<Extraction, ExtractionSkip> {
        let expansion = self.expand(fragment).await;

        let text = match fragment.story_text().await {
            Ok(Some(text)) => text,
            Ok(None) => return Err(ExtractionSkip::NoStoryBody),
            Err(e) => return Err(ExtractionSkip::Unreadable(e.to_string())),
        };
        debug!("Post found!");

        let mut record = PostRecord::new(keyword, text.trim());
        record.images = self.images(fragment).await;
        record.videos = videos(fragment).await;

        let permalink = match self.permalink(surface, fragment).await {
            Ok(permalink) => {
                record.link = Some(permalink.link);
                record.date = Some(permalink.date);
                record.name = permalink.name;
                PermalinkOutcome::Resolved
            }
            Err(outcome) => outcome,
        };

        Ok(Extraction {
            record,
            expansion,
            permalink,
        })
    }

    /// Drop empty and decorative image URLs, keeping DOM order
    pub fn content_images(&self, sources: Vec<String>) -> Vec<String> {
        sources
            .into_iter()
            .filter(|src| !src.is_empty())
            .filter(|src| !self.decorative.iter().any(|p| src.contains(p.as_str())))
            .collect()
    }

    async fn expand<F: PostFragment>(&self, fragment: &F) -> ExpansionOutcome {
        match fragment.has_see_more().await {
            Ok(true) => {}
            Ok(false) => return ExpansionOutcome::NotTruncated,
            Err(e) => {
                debug!("See more probe failed: {}", e);
                return ExpansionOutcome::NotTruncated;
            }
        }

        if let Err(e) = fragment.click_see_more().await {
            debug!("See more click failed: {}", e);
            return ExpansionOutcome::StillTruncated;
        }

        let collapsed = poll_until("see more to disappear", self.timeouts.expand(), self.poll, move || async move {
            !fragment.has_see_more().await.unwrap_or(true)
        })
        .await;

        match collapsed {
            Ok(()) => ExpansionOutcome::Expanded,
            Err(e) => {
                debug!("{}", e);
                ExpansionOutcome::StillTruncated
            }
        }
    }

    async fn images<F: PostFragment>(&self, fragment: &F) -> Vec<String> {
        match fragment.image_sources().await {
            Ok(sources) => self.content_images(sources),
            Err(e) => {
                debug!("Could not collect images: {}", e);
                Vec::new()
            }
        }
    }

    /// Hover the timestamp for the date, click it for the permalink, and come back.
    async fn permalink<S: FeedSurface>(
        &self,
        surface: &S,
        fragment: &S::Fragment,
    ) -> Result<Permalink, PermalinkOutcome> {
        let origin = surface
            .location()
            .await
            .map_err(|e| failed(PermalinkStage::Timestamp, e))?;
        let origin = origin.as_str();

        match fragment.center_timestamp().await {
            Ok(true) => {}
            Ok(false) => return Err(failed(PermalinkStage::Timestamp, "no timestamp element")),
            Err(e) => return Err(failed(PermalinkStage::Timestamp, e)),
        }

        poll_until("timestamp in viewport", self.timeouts.viewport(), self.poll, move || async move {
            fragment.timestamp_in_viewport().await.unwrap_or(false)
        })
        .await
        .map_err(|e| failed(PermalinkStage::Viewport, e))?;

        fragment
            .hover_timestamp()
            .await
            .map_err(|e| failed(PermalinkStage::Hover, e))?;

        let date = poll_for("date tooltip", self.timeouts.tooltip(), self.poll, move || async move {
            surface
                .tooltip_text()
                .await
                .ok()
                .flatten()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
        })
        .await
        .map_err(|e| failed(PermalinkStage::Tooltip, e))?;

        fragment
            .click_timestamp()
            .await
            .map_err(|e| failed(PermalinkStage::Click, e))?;

        // Always try to get back to the results, even when the permalink page misbehaved
        let followed = self.follow(surface, fragment, origin).await;
        let returned = self.return_to(surface, origin).await;
        let (link, name) = followed?;
        returned?;

        Ok(Permalink { link, date, name })
    }

    async fn follow<S: FeedSurface>(
        &self,
        surface: &S,
        fragment: &S::Fragment,
        origin: &str,
    ) -> Result<(String, Option<String>), PermalinkOutcome> {
        let changed = poll_for("permalink location", self.timeouts.permalink(), self.poll, move || async move {
            surface.location().await.ok().filter(|l| l.as_str() != origin)
        })
        .await
        .map_err(|e| failed(PermalinkStage::Navigation, e))?;

        poll_until("permalink document", self.timeouts.ready_state(), self.poll, move || async move {
            surface.document_ready().await.unwrap_or(false)
        })
        .await
        .map_err(|e| failed(PermalinkStage::DocumentLoad, e))?;

        let link = match surface.location().await {
            Ok(location) if location != origin => location,
            _ => changed,
        };

        let name = fragment.author_name().await.unwrap_or_else(|e| {
            debug!("Could not read author: {}", e);
            None
        });

        Ok((link, name))
    }

    async fn return_to<S: FeedSurface>(&self, surface: &S, origin: &str) -> Result<(), PermalinkOutcome> {
        if surface.location().await.ok().as_deref() == Some(origin) {
            return Ok(());
        }

        surface
            .go_back()
            .await
            .map_err(|e| failed(PermalinkStage::Return, e))?;

        poll_until("return to results", self.timeouts.back(), self.poll, move || async move {
            surface.location().await.ok().as_deref() == Some(origin)
        })
        .await
        .map_err(|e| failed(PermalinkStage::Return, e))
    }
}

async fn videos<F: PostFragment>(fragment: &F) -> Vec<String> {
    match fragment.video_links().await {
        Ok(links) => links.into_iter().filter(|l| !l.is_empty()).collect(),
        Err(e) => {
            debug!("Could not collect videos: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::mock::{MockPost, MockSurface};

    fn extractor() -> ContentExtractor {
        ContentExtractor::new(
            Timeouts::default(),
            Duration::from_millis(250),
            vec!["emoji.php".to_string()],
        )
    }

    async fn first(surface: &MockSurface) -> Result<Extraction, ExtractionSkip> {
        let fragments = surface.fragments().await.unwrap();
        extractor().extract(surface, &fragments[0], "rust").await
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_extraction() {
        let mut post = MockPost::linked("  Hello world  ", "https://social.test/p/1");
        post.images = vec![
            "https://cdn.test/a.jpg".into(),
            "https://static.test/images/emoji.php/v9/smile.png".into(),
            String::new(),
            "https://cdn.test/b.jpg".into(),
        ];
        post.videos = vec!["https://social.test/watch/1".into(), String::new()];
        let surface = MockSurface::new(vec![vec![post]]).on_results_page();
        let origin = surface.current_location();

        let extraction = first(&surface).await.unwrap();
        let record = extraction.record;

        assert_eq!(extraction.permalink, PermalinkOutcome::Resolved);
        assert_eq!(extraction.expansion, ExpansionOutcome::NotTruncated);
        assert_eq!(record.text, "Hello world");
        assert_eq!(record.link.as_deref(), Some("https://social.test/p/1"));
        assert_eq!(record.date.as_deref(), Some("Monday, 1 January 2024 at 09:00"));
        assert_eq!(record.name.as_deref(), Some("Alice"));
        assert_eq!(record.images, vec!["https://cdn.test/a.jpg", "https://cdn.test/b.jpg"]);
        assert_eq!(record.videos, vec!["https://social.test/watch/1"]);
        assert_eq!(record.keyword, "rust");
        assert_eq!(surface.current_location(), origin);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_body_skips_fragment() {
        let surface = MockSurface::new(vec![vec![MockPost::widget()]]).on_results_page();
        assert_eq!(first(&surface).await.unwrap_err(), ExtractionSkip::NoStoryBody);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permalink_failure_keeps_text_and_media() {
        let mut post = MockPost::unlinked("No timestamp here");
        post.images = vec!["https://cdn.test/a.jpg".into()];
        let surface = MockSurface::new(vec![vec![post]]).on_results_page();

        let extraction = first(&surface).await.unwrap();

        assert!(extraction.is_partial());
        assert!(matches!(
            extraction.permalink,
            PermalinkOutcome::Failed { stage: PermalinkStage::Timestamp, .. }
        ));
        assert_eq!(extraction.record.text, "No timestamp here");
        assert_eq!(extraction.record.images, vec!["https://cdn.test/a.jpg"]);
        assert_eq!(extraction.record.link, None);
        assert_eq!(extraction.record.date, None);
        assert_eq!(extraction.record.name, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_tooltip_leaves_page_untouched() {
        let mut post = MockPost::linked("Body", "https://social.test/p/1");
        post.date = None;
        let surface = MockSurface::new(vec![vec![post]]).on_results_page();
        let origin = surface.current_location();

        let extraction = first(&surface).await.unwrap();

        assert!(matches!(
            extraction.permalink,
            PermalinkOutcome::Failed { stage: PermalinkStage::Tooltip, .. }
        ));
        assert_eq!(extraction.record.link, None);
        assert_eq!(surface.current_location(), origin);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_without_navigation_fails_softly() {
        let mut post = MockPost::linked("Body", "https://social.test/p/1");
        post.link = None;
        let surface = MockSurface::new(vec![vec![post]]).on_results_page();

        let extraction = first(&surface).await.unwrap();

        assert!(matches!(
            extraction.permalink,
            PermalinkOutcome::Failed { stage: PermalinkStage::Navigation, .. }
        ));
        assert_eq!(extraction.record.date, None);
        assert_eq!(extraction.record.name, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_see_more_reveals_full_text() {
        let mut post = MockPost::linked("Short...", "https://social.test/p/1");
        post.expanded_body = Some("Short but actually much longer".into());
        let surface = MockSurface::new(vec![vec![post]]).on_results_page();

        let extraction = first(&surface).await.unwrap();

        assert_eq!(extraction.expansion, ExpansionOutcome::Expanded);
        assert_eq!(extraction.record.text, "Short but actually much longer");
    }

    #[test]
    fn test_content_images_filters_decorative() {
        let images = extractor().content_images(vec![
            "https://static.test/emoji.php/x.png".into(),
            "https://cdn.test/photo.jpg".into(),
        ]);
        assert_eq!(images, vec!["https://cdn.test/photo.jpg"]);
    }
}
