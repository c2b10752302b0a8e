use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use rand::seq::IndexedRandom;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::{GleanerError, Result};
use crate::session::SessionConfig;
use crate::surface::{ChromeSurface, Selectors};

pub const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/118.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36",
];

/// A launched Chrome instance with the single page the scraper drives
pub struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
    surface: ChromeSurface,
}

impl ChromeSession {
    /// Launch Chrome and open a blank working page
    pub async fn open(config: &SessionConfig, selectors: Selectors) -> Result<Self> {
        let user_agent = pick_user_agent();
        debug!("Using user agent: {}", user_agent);

        let mut builder = BrowserConfig::builder().viewport(None);
        for arg in launch_args(config, user_agent) {
            builder = builder.arg(arg);
        }
        if let Some(dir) = config.identity_dir() {
            info!("Using Chrome profile directory {}", dir.display());
            builder = builder.user_data_dir(dir);
        }
        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| GleanerError::browser("Failed to build browser config", e))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            GleanerError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {}", e);
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| GleanerError::browser("Failed to create page", e))?;

        info!("Browser session opened");
        Ok(Self {
            browser,
            handler,
            surface: ChromeSurface::new(page, selectors, config.home_url.clone()),
        })
    }

    pub fn surface(&self) -> &ChromeSurface {
        &self.surface
    }

    /// Shut the browser down. Failures are logged and otherwise ignored.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("Failed to wait for browser exit: {}", e);
        }
        self.handler.abort();
        info!("Browser closed");
    }
}

pub fn pick_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Chrome flags for a session that should look like a normal desktop browser
pub fn launch_args(config: &SessionConfig, user_agent: &str) -> Vec<String> {
    let mut args = vec![
        format!("--user-agent={}", user_agent),
        "--disable-blink-features=AutomationControlled".to_string(),
        "--mute-audio".to_string(),
        "--start-maximized".to_string(),
    ];

    if let Some(proxy) = config.proxy.as_deref().filter(|p| !p.is_empty()) {
        args.push(format!("--proxy-server={}", proxy));
    }

    if let Some(profile) = config.profile_name.as_deref().filter(|p| !p.is_empty()) {
        args.push(format!("--profile-directory={}", profile));
    }

    args
}
