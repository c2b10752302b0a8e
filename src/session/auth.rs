use std::path::Path;

use tracing::{debug, error, info};

use crate::app::Result;
use crate::session::{load_cookies, SessionConfig};
use crate::surface::FeedSurface;

/// Log the session in with stored cookies.
///
/// Returns `false` when the page still shows the login screen afterwards;
/// an absent or unreadable cookie file is not an error by itself.
pub async fn authenticate<S: FeedSurface>(
    surface: &S,
    cookies: Option<&Path>,
    config: &SessionConfig,
) -> Result<bool> {
    surface.open_home().await?;

    if let Some(path) = cookies {
        let cookies = load_cookies(path);
        if !cookies.is_empty() {
            let installed = surface.install_cookies(&cookies).await?;
            debug!("Installed {}/{} cookies", installed, cookies.len());
        }
    }

    surface.reload().await?;
    tokio::time::sleep(config.login_settle()).await;

    let location = surface.location().await?;
    if is_login_location(&location, &config.login_marker) {
        error!("Login failed. Still on login page: {}", location);
        return Ok(false);
    }

    info!("Login successful");
    Ok(true)
}

pub fn is_login_location(location: &str, marker: &str) -> bool {
    !marker.is_empty() && location.contains(marker)
}
