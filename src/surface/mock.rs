//! Scripted in-memory search page for exercising the collection algorithm.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::app::Result;
use crate::session::StoredCookie;
use crate::surface::{FeedSurface, PostFragment};

pub const HOME: &str = "https://social.test/";
pub const LOGIN: &str = "https://social.test/login/";
pub const SESSION_COOKIE: &str = "c_user";

#[derive(Debug, Clone, Default)]
pub struct MockPost {
    pub body: Option<String>,
    /// Text revealed by "see more"; replaces `body` once expanded
    pub expanded_body: Option<String>,
    pub link: Option<String>,
    pub date: Option<String>,
    pub author: Option<String>,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    /// No timestamp element, so the permalink can never be resolved
    pub no_timestamp: bool,
}

impl MockPost {
    /// A post with a body and a resolvable permalink
    pub fn linked(text: &str, link: &str) -> Self {
        Self {
            body: Some(text.to_string()),
            link: Some(link.to_string()),
            date: Some("Monday, 1 January 2024 at 09:00".to_string()),
            author: Some("Alice".to_string()),
            ..Default::default()
        }
    }

    /// A post whose permalink sub-path fails
    pub fn unlinked(text: &str) -> Self {
        Self {
            body: Some(text.to_string()),
            no_timestamp: true,
            ..Default::default()
        }
    }

    /// A feed widget with no story body
    pub fn widget() -> Self {
        Self {
            no_timestamp: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    batches: Vec<Vec<MockPost>>,
    loaded: usize,
    grow_forever: bool,
    location: String,
    history: Vec<String>,
    search_input: bool,
    render_results: bool,
    captcha: bool,
    logged_in: bool,
    query: String,
    searches: usize,
    scrolls: usize,
    hovered: Option<usize>,
    expanded: Vec<usize>,
    extra_height: u64,
    late: Option<Vec<MockPost>>,
    late_armed: bool,
}

impl MockState {
    fn visible(&self) -> Vec<MockPost> {
        self.batches[..self.loaded].concat()
    }

    /// Show the late batch once a scroll has happened
    fn deliver_late(&mut self) {
        if self.late_armed {
            if let Some(batch) = self.late.take() {
                self.batches.push(batch);
                self.loaded = self.batches.len();
            }
            self.late_armed = false;
        }
    }

    fn post(&self, index: usize) -> MockPost {
        self.visible().get(index).cloned().unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct MockSurface {
    state: Arc<Mutex<MockState>>,
}

impl MockSurface {
    /// A page whose feed loads `batches` one at a time: the first after the
    /// search, each further one after a scroll.
    pub fn new(batches: Vec<Vec<MockPost>>) -> Self {
        let loaded = usize::from(!batches.is_empty());
        Self {
            state: Arc::new(Mutex::new(MockState {
                batches,
                loaded,
                location: LOGIN.to_string(),
                search_input: true,
                render_results: true,
                ..Default::default()
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Every scroll past the scripted batches appends another widget
    pub fn growing_forever(self) -> Self {
        self.state().grow_forever = true;
        self
    }

    /// Every scroll grows the page without adding posts
    pub fn growing_height_only(self) -> Self {
        self.state().extra_height = 1;
        self
    }

    /// `batch` renders after the first scroll, but only shows up when the
    /// posts are listed again; height and count don't change while scrolling
    pub fn with_late_batch(self, batch: Vec<MockPost>) -> Self {
        self.state().late = Some(batch);
        self
    }

    pub fn without_search_input(self) -> Self {
        self.state().search_input = false;
        self
    }

    pub fn without_results(self) -> Self {
        self.state().render_results = false;
        self
    }

    pub fn with_captcha(self) -> Self {
        self.state().captcha = true;
        self
    }

    pub fn on_results_page(self) -> Self {
        {
            let mut state = self.state();
            state.logged_in = true;
            state.location = format!("{}search/?q=seed", HOME);
        }
        self
    }

    pub fn clear_captcha(&self) {
        self.state().captcha = false;
    }

    pub fn searches(&self) -> usize {
        self.state().searches
    }

    pub fn scrolls(&self) -> usize {
        self.state().scrolls
    }

    pub fn current_location(&self) -> String {
        self.state().location.clone()
    }

    pub fn last_query(&self) -> String {
        self.state().query.clone()
    }
}

#[async_trait]
impl FeedSurface for MockSurface {
    type Fragment = MockFragment;

    async fn location(&self) -> Result<String> {
        Ok(self.state().location.clone())
    }

    async fn open_home(&self) -> Result<()> {
        let mut state = self.state();
        state.location = if state.logged_in { HOME } else { LOGIN }.to_string();
        Ok(())
    }

    async fn install_cookies(&self, cookies: &[StoredCookie]) -> Result<usize> {
        if cookies.iter().any(|c| c.name == SESSION_COOKIE) {
            self.state().logged_in = true;
        }
        Ok(cookies.len())
    }

    async fn reload(&self) -> Result<()> {
        self.open_home().await
    }

    async fn has_search_input(&self) -> Result<bool> {
        Ok(self.state().search_input)
    }

    async fn clear_search_input(&self) -> Result<()> {
        self.state().query.clear();
        Ok(())
    }

    async fn type_query(&self, query: &str) -> Result<()> {
        self.state().query.push_str(query);
        Ok(())
    }

    async fn submit_query(&self) -> Result<()> {
        let mut state = self.state();
        state.searches += 1;
        state.location = format!("{}search/?q={}&n={}", HOME, state.query, state.searches);
        Ok(())
    }

    async fn has_results(&self) -> Result<bool> {
        let state = self.state();
        Ok(state.render_results && state.location.contains("/search/"))
    }

    async fn captcha_present(&self) -> Result<bool> {
        Ok(self.state().captcha)
    }

    async fn fragments(&self) -> Result<Vec<MockFragment>> {
        let count = {
            let mut state = self.state();
            state.deliver_late();
            state.visible().len()
        };
        Ok((0..count)
            .map(|index| MockFragment {
                state: self.state.clone(),
                index,
            })
            .collect())
    }

    async fn fragment_count(&self) -> Result<usize> {
        Ok(self.state().visible().len())
    }

    async fn page_height(&self) -> Result<u64> {
        let state = self.state();
        Ok(state.visible().len() as u64 * 1000 + state.scrolls as u64 * state.extra_height)
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        let mut state = self.state();
        state.scrolls += 1;
        if state.late.is_some() {
            state.late_armed = true;
        }
        if state.loaded < state.batches.len() {
            state.loaded += 1;
        } else if state.grow_forever {
            state.batches.push(vec![MockPost::widget()]);
            state.loaded += 1;
        }
        Ok(())
    }

    async fn document_ready(&self) -> Result<bool> {
        Ok(true)
    }

    async fn tooltip_text(&self) -> Result<Option<String>> {
        let state = self.state();
        Ok(state.hovered.and_then(|i| state.post(i).date))
    }

    async fn go_back(&self) -> Result<()> {
        let mut state = self.state();
        if let Some(previous) = state.history.pop() {
            state.location = previous;
        }
        Ok(())
    }
}

pub struct MockFragment {
    state: Arc<Mutex<MockState>>,
    index: usize,
}

impl MockFragment {
    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    fn post(&self) -> MockPost {
        self.state().post(self.index)
    }

    fn is_expanded(&self) -> bool {
        self.state().expanded.contains(&self.index)
    }
}

#[async_trait]
impl PostFragment for MockFragment {
    async fn has_see_more(&self) -> Result<bool> {
        Ok(self.post().expanded_body.is_some() && !self.is_expanded())
    }

    async fn click_see_more(&self) -> Result<()> {
        let index = self.index;
        self.state().expanded.push(index);
        Ok(())
    }

    async fn story_text(&self) -> Result<Option<String>> {
        let post = self.post();
        let text = if self.is_expanded() {
            post.expanded_body.or(post.body)
        } else {
            post.body
        };
        Ok(text.map(|t| t.trim().to_string()))
    }

    async fn image_sources(&self) -> Result<Vec<String>> {
        Ok(self.post().images)
    }

    async fn video_links(&self) -> Result<Vec<String>> {
        Ok(self.post().videos)
    }

    async fn center_timestamp(&self) -> Result<bool> {
        Ok(!self.post().no_timestamp)
    }

    async fn timestamp_in_viewport(&self) -> Result<bool> {
        Ok(!self.post().no_timestamp)
    }

    async fn hover_timestamp(&self) -> Result<()> {
        let index = self.index;
        self.state().hovered = Some(index);
        Ok(())
    }

    async fn click_timestamp(&self) -> Result<()> {
        let post = self.post();
        let mut state = self.state();
        if let Some(link) = post.link {
            let previous = std::mem::replace(&mut state.location, link);
            state.history.push(previous);
        }
        Ok(())
    }

    async fn author_name(&self) -> Result<Option<String>> {
        Ok(self.post().author)
    }
}
