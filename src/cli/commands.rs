use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::app::{Result, RunSummary, Runner};
use crate::config::Config;
use crate::engine::{suspension_channel, CollectionEngine, SuspensionControl};
use crate::inputs::{load_denylist, load_keywords};
use crate::session::ChromeSession;
use crate::store::sqlite::StoredPost;
use crate::store::SqliteStore;

/// Full scrape: every keyword in the keyword file, stored as they come in
pub async fn run(config: &Config) -> Result<RunSummary> {
    let keywords = load_keywords(&config.files.keywords)?;
    if keywords.is_empty() {
        println!("No keywords in {}", config.files.keywords.display());
        return Ok(RunSummary::default());
    }

    let denylist = load_denylist(&config.files.denylist);
    let store = SqliteStore::new(config.files.database_path()?)?;

    let session = ChromeSession::open(&config.session, config.selectors.clone()).await?;
    let (point, control) = suspension_channel();
    let prompter = tokio::spawn(prompt_on_suspension(control));

    let engine = CollectionEngine::new(
        config.collect.clone(),
        config.timeouts.clone(),
        config.selectors.decorative_patterns.clone(),
        denylist,
        point,
    );

    let result = {
        let runner = Runner::new(
            session.surface(),
            engine,
            &store,
            config.session.clone(),
            Some(config.files.cookies.clone()),
        );
        runner.run(&keywords).await
    };
    session.close().await;
    prompter.abort();

    let summary = result?;
    for keyword in &summary.per_keyword {
        println!("  {}: {} posts", keyword.keyword, keyword.posts);
    }
    println!(
        "Scraped {} posts for {} keywords",
        summary.posts, summary.keywords
    );
    Ok(summary)
}

/// Ask on the terminal for each CAPTCHA to be solved, resuming on Enter
pub async fn prompt_on_suspension(mut control: SuspensionControl) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(notice) = control.next_suspension().await {
        match &notice.keyword {
            Some(keyword) => println!("{} (keyword '{}')", notice.reason, keyword),
            None => println!("{}", notice.reason),
        }
        print!("Solve it in the browser, then press Enter to continue...");
        let _ = std::io::stdout().flush();

        match lines.next_line().await {
            Ok(Some(_)) => {}
            Ok(None) => warn!("stdin closed, resuming without confirmation"),
            Err(e) => warn!("Failed to read stdin: {}", e),
        }
        info!("Manual intervention complete");
        control.resume();
    }
}

fn stored_posts(store: &SqliteStore, keyword: Option<&str>) -> Result<Vec<StoredPost>> {
    match keyword {
        Some(keyword) => store.posts_for_keyword(keyword),
        None => store.all_posts(),
    }
}

pub fn list_posts(store: &SqliteStore, keyword: Option<&str>) -> Result<()> {
    let posts = stored_posts(store, keyword)?;

    if posts.is_empty() {
        println!("No posts");
        return Ok(());
    }

    for stored in posts {
        let post = &stored.post;
        println!(
            "[{}] {} - {}",
            post.keyword,
            post.date.as_deref().unwrap_or("-"),
            post.display_name()
        );
        println!("    {}", post.preview(80));
        if let Some(link) = post.permalink() {
            println!("    {}", link);
        }
    }

    Ok(())
}

pub fn export_posts<W: Write>(store: &SqliteStore, keyword: Option<&str>, out: &mut W) -> Result<usize> {
    let posts = stored_posts(store, keyword)?;
    for stored in &posts {
        writeln!(out, "{}", serde_json::to_string(stored)?)?;
    }
    Ok(posts.len())
}
