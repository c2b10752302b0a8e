use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One harvested post. Built once by the extractor and handed out by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub name: Option<String>,
    pub text: String,
    pub link: Option<String>,
    pub date: Option<String>,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub keyword: String,
}

impl PostRecord {
    pub fn new(keyword: &str, text: impl Into<String>) -> Self {
        Self {
            name: None,
            text: text.into(),
            link: None,
            date: None,
            images: Vec::new(),
            videos: Vec::new(),
            keyword: keyword.to_string(),
        }
    }

    /// The link, if one was resolved and is non-empty
    pub fn permalink(&self) -> Option<&str> {
        self.link.as_deref().filter(|l| !l.is_empty())
    }

    /// Deterministic ID from keyword and permalink (or body text when no link resolved)
    pub fn generate_id(keyword: &str, identity: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(keyword.as_bytes());
        hasher.update(identity.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn id(&self) -> String {
        Self::generate_id(&self.keyword, self.permalink().unwrap_or(&self.text))
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(Unknown)")
    }

    /// First line of the body, cut to `max_chars` characters
    pub fn preview(&self, max_chars: usize) -> String {
        let first_line = self.text.lines().next().unwrap_or("");
        let mut preview: String = first_line.chars().take(max_chars).collect();
        if first_line.chars().count() > max_chars || self.text.lines().count() > 1 {
            preview.push_str("...");
        }
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permalink_ignores_empty_link() {
        let mut post = PostRecord::new("rust", "body");
        post.link = Some(String::new());
        assert_eq!(post.permalink(), None);

        post.link = Some("https://example.com/p/1".into());
        assert_eq!(post.permalink(), Some("https://example.com/p/1"));
    }

    #[test]
    fn test_id_uses_link_when_present() {
        let mut a = PostRecord::new("rust", "first body");
        let mut b = PostRecord::new("rust", "second body");
        a.link = Some("https://example.com/p/1".into());
        b.link = Some("https://example.com/p/1".into());
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn test_id_differs_across_keywords() {
        let mut a = PostRecord::new("rust", "body");
        let mut b = PostRecord::new("go", "body");
        a.link = Some("https://example.com/p/1".into());
        b.link = Some("https://example.com/p/1".into());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_id_is_hex_sha256() {
        let id = PostRecord::new("rust", "body").id();
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_display_name_without_name() {
        let post = PostRecord::new("rust", "body");
        assert_eq!(post.display_name(), "(Unknown)");
    }

    #[test]
    fn test_preview_truncates() {
        let post = PostRecord::new("rust", "abcdefghij\nsecond line");
        assert_eq!(post.preview(4), "abcd...");

        let short = PostRecord::new("rust", "abc");
        assert_eq!(short.preview(10), "abc");
    }
}
