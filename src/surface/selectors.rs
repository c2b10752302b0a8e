use serde::{Deserialize, Serialize};

/// Structural selectors for the search results page.
///
/// These are the only place the page's markup is encoded. When the site
/// changes its class names, this table (or the `[selectors]` section of the
/// config file) is the thing to update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// Search input in the top bar
    pub search_input: String,

    /// Container of a single post in the results feed
    pub post_container: String,

    /// Mandatory story body inside a post; posts without it are skipped
    pub story_body: String,

    /// Visible labels of the "see more" affordance that expands truncated text
    pub see_more_labels: Vec<String>,

    /// Image elements inside a post
    pub images: String,

    /// Video elements inside a post; the enclosing link carries the URL
    pub videos: String,

    /// Substrings of image URLs that are decorative (emoji glyphs and the like)
    pub decorative_patterns: Vec<String>,

    /// Timestamp link that shows a date tooltip on hover and opens the permalink on click
    pub timestamp: String,

    /// Tooltip holding the human-readable post date
    pub tooltip: String,

    /// Author name, tried first
    pub author_primary: String,

    /// Author name, tried when the primary selector finds nothing
    pub author_fallback: String,

    /// CAPTCHA interstitial
    pub captcha: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            search_input: "input[type=\"search\"]".to_string(),
            post_container: "div.x1yztbdb.x1n2onr6.xh8yej3.x1ja2u2z".to_string(),
            story_body: "div[data-ad-rendering-role=\"story_message\"]".to_string(),
            see_more_labels: vec!["See more".to_string(), "Xem thêm".to_string()],
            images: "a[role=\"link\"] img".to_string(),
            videos: "a[role=\"link\"] video".to_string(),
            decorative_patterns: vec!["emoji.php".to_string()],
            timestamp: "span.html-span.xdj266r.x11i5rnm.xat24cr.x1mh8g0r.xexx8yu.x4uap5.x18d9i69.\
                        xkhd6sd.x1hl2dhg.x16tdsg8.x1vvkbs.x4k7w5x.x1h91t0o.x1h9r5lt.x1jfb8zj.\
                        xv2umb2.x1beo9mf.xaigb6o.x12ejxvf.x3igimt.xarpa2k.xedcshv.x1lytzrv.\
                        x1t2pt76.x7ja8zs.x1qrby5j"
                .to_string(),
            tooltip: "div.x11i5rnm.x1mh8g0r.xexx8yu.x4uap5.x18d9i69.xkhd6sd.x78zum5.xjpr12u.\
                      xr9ek0c.x3ieub6.x6s0dn4"
                .to_string(),
            author_primary: "span.x193iq5w.xeuugli.x13faqbe.x1vvkbs.xlh3980.xvmahel.x1n0sxbx.\
                             x1nxh6w3.x1sibtaa.x1s688f.xi81zsa"
                .to_string(),
            author_fallback: "span.html-span.xdj266r.x11i5rnm.xat24cr.x1mh8g0r.xexx8yu.x4uap5.\
                              x18d9i69.xkhd6sd.x1hl2dhg.x16tdsg8.x1vvkbs"
                .to_string(),
            captcha: "iframe[title*=\"CAPTCHA\"]".to_string(),
        }
    }
}
