use std::path::PathBuf;

use tracing::{error, info};

use crate::app::{GleanerError, Result};
use crate::engine::{CollectionEngine, Suspended};
use crate::session::{authenticate, SessionConfig};
use crate::store::{BatchWriter, PostSink};
use crate::surface::FeedSurface;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSummary {
    pub keyword: String,
    pub posts: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub keywords: usize,
    pub posts: usize,
    pub per_keyword: Vec<KeywordSummary>,
}

/// Logs in once, then collects and stores posts keyword by keyword.
///
/// Closing the browser is left to the owner of the session.
pub struct Runner<'a, S: FeedSurface, K: PostSink> {
    surface: &'a S,
    engine: CollectionEngine,
    sink: K,
    session: SessionConfig,
    cookies: Option<PathBuf>,
}

impl<'a, S: FeedSurface, K: PostSink> Runner<'a, S, K> {
    pub fn new(
        surface: &'a S,
        engine: CollectionEngine,
        sink: K,
        session: SessionConfig,
        cookies: Option<PathBuf>,
    ) -> Self {
        Self {
            surface,
            engine,
            sink,
            session,
            cookies,
        }
    }

    pub async fn run(&self, keywords: &[String]) -> Result<RunSummary> {
        if !authenticate(self.surface, self.cookies.as_deref(), &self.session).await? {
            error!("Authentication failed, no keywords processed");
            return Err(GleanerError::AuthenticationFailed);
        }

        if self.engine.navigator().captcha_shown(self.surface).await {
            self.engine
                .suspension()
                .suspend(Suspended {
                    reason: "CAPTCHA detected after login".to_string(),
                    keyword: None,
                })
                .await?;
        }

        let mut summary = RunSummary::default();
        for keyword in keywords {
            let keyword_summary = self.scrape_keyword(keyword).await?;
            summary.keywords += 1;
            summary.posts += keyword_summary.posts;
            summary.per_keyword.push(keyword_summary);
        }

        info!(
            "Run complete: {} posts across {} keywords",
            summary.posts, summary.keywords
        );
        Ok(summary)
    }

    async fn scrape_keyword(&self, keyword: &str) -> Result<KeywordSummary> {
        info!("Processing keyword: {}", keyword);

        let config = self.engine.config();
        let mut writer = BatchWriter::new(&self.sink, config.batch_size);
        let mut collection = self.engine.scrape(self.surface, keyword, config.max_posts);

        while let Some(record) = collection.next().await {
            writer.push(record)?;
        }

        let posts = writer.finish()?;
        if posts == 0 {
            info!("No posts found for keyword: {}", keyword);
        }

        Ok(KeywordSummary {
            keyword: keyword.to_string(),
            posts,
        })
    }
}
