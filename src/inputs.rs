//! Line-oriented input files: search keywords and the link denylist.

use std::path::Path;

use tracing::{info, warn};

use crate::app::Result;
use crate::config::ConfigError;
use crate::gate::Denylist;

/// Trimmed, non-blank lines of `content`
pub fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read the keyword file. Without it the run has nothing to do, so a missing
/// file is an error.
pub fn load_keywords(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let keywords = parse_lines(&content);
    info!("Loaded {} keywords from {}", keywords.len(), path.display());
    Ok(keywords)
}

/// Read the denylist, falling back to an empty one
pub fn load_denylist(path: &Path) -> Denylist {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let denylist = Denylist::new(parse_lines(&content));
            info!("Loaded {} denylist entries from {}", denylist.len(), path.display());
            denylist
        }
        Err(e) => {
            warn!("Denylist file {} not readable: {}", path.display(), e);
            Denylist::default()
        }
    }
}
