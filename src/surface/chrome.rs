use std::sync::Arc;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::{CookieParam, CookieSameSite, TimeSinceEpoch};
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::app::{GleanerError, Result};
use crate::session::StoredCookie;
use crate::surface::scripts;
use crate::surface::{FeedSurface, PostFragment, Selectors};

/// The search page of a live Chrome session
pub struct ChromeSurface {
    page: Page,
    selectors: Arc<Selectors>,
    home_url: String,
}

impl ChromeSurface {
    pub fn new(page: Page, selectors: Selectors, home_url: impl Into<String>) -> Self {
        Self {
            page,
            selectors: Arc::new(selectors),
            home_url: home_url.into(),
        }
    }

    async fn evaluate<T: DeserializeOwned>(&self, expression: impl Into<String>) -> Result<T> {
        let expression = expression.into();
        self.page
            .evaluate(expression.as_str())
            .await
            .map_err(|e| GleanerError::browser("Script execution failed", e))?
            .into_value()
            .map_err(|e| GleanerError::Browser(format!("Failed to parse result: {:?}", e)))
    }

    async fn search_input(&self) -> Result<Element> {
        self.page
            .find_element(self.selectors.search_input.as_str())
            .await
            .map_err(|e| GleanerError::browser("Search input not found", e))
    }

    fn cookie_param(&self, cookie: &StoredCookie) -> Option<CookieParam> {
        let mut builder = CookieParam::builder()
            .name(cookie.name.clone())
            .value(cookie.value.clone());

        builder = match cookie.domain {
            Some(ref domain) => builder.domain(domain.clone()),
            None => builder.url(self.home_url.clone()),
        };
        if let Some(ref path) = cookie.path {
            builder = builder.path(path.clone());
        }
        if let Some(secure) = cookie.secure {
            builder = builder.secure(secure);
        }
        if let Some(http_only) = cookie.http_only {
            builder = builder.http_only(http_only);
        }
        if let Some(expires) = cookie.expires {
            builder = builder.expires(TimeSinceEpoch::new(expires));
        }
        if let Some(same_site) = cookie.same_site.as_deref().and_then(same_site) {
            builder = builder.same_site(same_site);
        }

        match builder.build() {
            Ok(param) => Some(param),
            Err(e) => {
                warn!("Skipping cookie {}: {}", cookie.name, e);
                None
            }
        }
    }
}

fn same_site(value: &str) -> Option<CookieSameSite> {
    match value.to_ascii_lowercase().as_str() {
        "strict" => Some(CookieSameSite::Strict),
        "lax" => Some(CookieSameSite::Lax),
        "none" | "no_restriction" => Some(CookieSameSite::None),
        _ => None,
    }
}

#[async_trait]
impl FeedSurface for ChromeSurface {
    type Fragment = ChromeFragment;

    async fn location(&self) -> Result<String> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| GleanerError::browser("Failed to read location", e))?;
        Ok(url.unwrap_or_default())
    }

    async fn open_home(&self) -> Result<()> {
        self.page
            .goto(self.home_url.as_str())
            .await
            .map_err(|e| GleanerError::browser("Navigation failed", e))?;
        Ok(())
    }

    async fn install_cookies(&self, cookies: &[StoredCookie]) -> Result<usize> {
        let params: Vec<CookieParam> = cookies.iter().filter_map(|c| self.cookie_param(c)).collect();
        let count = params.len();
        self.page
            .set_cookies(params)
            .await
            .map_err(|e| GleanerError::browser("Failed to set cookies", e))?;
        Ok(count)
    }

    async fn reload(&self) -> Result<()> {
        self.page
            .reload()
            .await
            .map_err(|e| GleanerError::browser("Reload failed", e))?;
        Ok(())
    }

    async fn has_search_input(&self) -> Result<bool> {
        Ok(self.search_input().await.is_ok())
    }

    async fn clear_search_input(&self) -> Result<()> {
        let input = self.search_input().await?;
        input
            .click()
            .await
            .map_err(|e| GleanerError::browser("Failed to focus search input", e))?;
        input
            .call_js_fn(scripts::CLEAR_INPUT, false)
            .await
            .map_err(|e| GleanerError::browser("Failed to clear search input", e))?;
        Ok(())
    }

    async fn type_query(&self, query: &str) -> Result<()> {
        self.search_input()
            .await?
            .type_str(query)
            .await
            .map_err(|e| GleanerError::browser("Failed to type query", e))?;
        Ok(())
    }

    async fn submit_query(&self) -> Result<()> {
        self.search_input()
            .await?
            .press_key("Enter")
            .await
            .map_err(|e| GleanerError::browser("Failed to submit query", e))?;
        Ok(())
    }

    async fn has_results(&self) -> Result<bool> {
        Ok(self
            .page
            .find_element(self.selectors.post_container.as_str())
            .await
            .is_ok())
    }

    async fn captcha_present(&self) -> Result<bool> {
        Ok(self
            .page
            .find_element(self.selectors.captcha.as_str())
            .await
            .is_ok())
    }

    async fn fragments(&self) -> Result<Vec<ChromeFragment>> {
        let elements = self
            .page
            .find_elements(self.selectors.post_container.as_str())
            .await
            .map_err(|e| GleanerError::browser("Failed to list posts", e))?;

        Ok(elements
            .into_iter()
            .map(|element| ChromeFragment {
                element,
                selectors: self.selectors.clone(),
            })
            .collect())
    }

    async fn fragment_count(&self) -> Result<usize> {
        self.evaluate(scripts::count(&self.selectors.post_container))
            .await
    }

    async fn page_height(&self) -> Result<u64> {
        let height: f64 = self.evaluate(scripts::PAGE_HEIGHT).await?;
        Ok(height.max(0.0) as u64)
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        let _: bool = self.evaluate(scripts::SCROLL_TO_BOTTOM).await?;
        Ok(())
    }

    async fn document_ready(&self) -> Result<bool> {
        let state: String = self.evaluate(scripts::READY_STATE).await?;
        Ok(state == "complete")
    }

    async fn tooltip_text(&self) -> Result<Option<String>> {
        let Ok(tooltip) = self.page.find_element(self.selectors.tooltip.as_str()).await else {
            return Ok(None);
        };
        let text = tooltip
            .inner_text()
            .await
            .map_err(|e| GleanerError::browser("Failed to read tooltip", e))?;
        Ok(text.map(|t| t.trim().to_string()))
    }

    async fn go_back(&self) -> Result<()> {
        let _: bool = self.evaluate(scripts::HISTORY_BACK).await?;
        Ok(())
    }
}

/// One post container element on the results page
pub struct ChromeFragment {
    element: Element,
    selectors: Arc<Selectors>,
}

impl ChromeFragment {
    async fn call<T: DeserializeOwned>(&self, function: &str) -> Result<T> {
        let returns = self
            .element
            .call_js_fn(function, false)
            .await
            .map_err(|e| GleanerError::browser("Element script failed", e))?;
        let value = returns.result.value.unwrap_or(serde_json::Value::Null);
        Ok(serde_json::from_value(value)?)
    }

    async fn call_list(&self, function: &str) -> Result<Vec<String>> {
        let json: String = self.call(function).await?;
        Ok(serde_json::from_str(&json)?)
    }

    async fn timestamp(&self) -> Result<Element> {
        self.element
            .find_element(self.selectors.timestamp.as_str())
            .await
            .map_err(|e| GleanerError::browser("Timestamp not found", e))
    }

    async fn text_of(&self, selector: &str) -> Option<String> {
        let element = self.element.find_element(selector).await.ok()?;
        match element.inner_text().await {
            Ok(text) => text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
            Err(e) => {
                debug!("Failed to read text of {}: {}", selector, e);
                None
            }
        }
    }
}

#[async_trait]
impl PostFragment for ChromeFragment {
    async fn has_see_more(&self) -> Result<bool> {
        self.call(&scripts::has_see_more(&self.selectors.see_more_labels))
            .await
    }

    async fn click_see_more(&self) -> Result<()> {
        let _: bool = self
            .call(&scripts::click_see_more(&self.selectors.see_more_labels))
            .await?;
        Ok(())
    }

    async fn story_text(&self) -> Result<Option<String>> {
        let Ok(body) = self
            .element
            .find_element(self.selectors.story_body.as_str())
            .await
        else {
            return Ok(None);
        };
        let text = body
            .inner_text()
            .await
            .map_err(|e| GleanerError::browser("Failed to read story body", e))?;
        Ok(Some(text.unwrap_or_default().trim().to_string()))
    }

    async fn image_sources(&self) -> Result<Vec<String>> {
        self.call_list(&scripts::image_sources(&self.selectors.images))
            .await
    }

    async fn video_links(&self) -> Result<Vec<String>> {
        self.call_list(&scripts::video_links(&self.selectors.videos))
            .await
    }

    async fn center_timestamp(&self) -> Result<bool> {
        self.call(&scripts::center(&self.selectors.timestamp)).await
    }

    async fn timestamp_in_viewport(&self) -> Result<bool> {
        self.call(&scripts::in_viewport(&self.selectors.timestamp))
            .await
    }

    async fn hover_timestamp(&self) -> Result<()> {
        self.timestamp()
            .await?
            .hover()
            .await
            .map_err(|e| GleanerError::browser("Hover failed", e))?;
        Ok(())
    }

    async fn click_timestamp(&self) -> Result<()> {
        self.timestamp()
            .await?
            .click()
            .await
            .map_err(|e| GleanerError::browser("Click failed", e))?;
        Ok(())
    }

    async fn author_name(&self) -> Result<Option<String>> {
        if let Some(name) = self.text_of(&self.selectors.author_primary).await {
            return Ok(Some(name));
        }
        Ok(self.text_of(&self.selectors.author_fallback).await)
    }
}
