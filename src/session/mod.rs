//! Browser session: launch, cookie login and shutdown.

mod auth;
mod chrome;
mod config;
mod cookies;

pub use auth::{authenticate, is_login_location};
pub use chrome::{launch_args, pick_user_agent, ChromeSession, USER_AGENTS};
pub use config::{default_chrome_data_dir, SessionConfig};
pub use cookies::{load_cookies, StoredCookie};
