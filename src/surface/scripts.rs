//! JavaScript snippets run in the page.
//!
//! Element-scoped snippets are function declarations invoked with the element
//! as `this`. Anything returning a list comes back as a JSON string, since CDP
//! only hands back primitives by value.

use serde_json::Value;

pub const PAGE_HEIGHT: &str = "document.body.scrollHeight";

pub const READY_STATE: &str = "document.readyState";

pub const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight); true";

pub const HISTORY_BACK: &str = "window.history.back(); true";

pub const CLEAR_INPUT: &str = r#"function() {
    this.focus();
    if (typeof this.select === 'function') { this.select(); }
    this.value = '';
    this.dispatchEvent(new Event('input', { bubbles: true }));
    return true;
}"#;

/// Quote a string as a JavaScript literal
pub fn literal(s: &str) -> String {
    Value::from(s).to_string()
}

fn literal_list(items: &[String]) -> String {
    Value::from(items.to_vec()).to_string()
}

pub fn count(selector: &str) -> String {
    format!("document.querySelectorAll({}).length", literal(selector))
}

/// Finds the first `div` whose own text contains one of the labels.
/// `action` runs on it; the whole function returns whether one was found.
fn see_more(labels: &[String], action: &str) -> String {
    format!(
        r#"function() {{
    const labels = {labels};
    const target = Array.from(this.querySelectorAll('div')).find(el =>
        Array.from(el.childNodes).some(n =>
            n.nodeType === Node.TEXT_NODE && labels.some(l => n.textContent.includes(l))));
    if (!target) {{ return false; }}
    {action}
    return true;
}}"#,
        labels = literal_list(labels),
        action = action,
    )
}

pub fn has_see_more(labels: &[String]) -> String {
    see_more(labels, "")
}

pub fn click_see_more(labels: &[String]) -> String {
    see_more(labels, "target.click();")
}

pub fn image_sources(selector: &str) -> String {
    format!(
        r#"function() {{
    return JSON.stringify(Array.from(this.querySelectorAll({sel})).map(img => img.src || img.getAttribute('src') || ''));
}}"#,
        sel = literal(selector),
    )
}

pub fn video_links(selector: &str) -> String {
    format!(
        r#"function() {{
    return JSON.stringify(Array.from(this.querySelectorAll({sel})).map(video => {{
        const link = video.closest('a');
        return link ? link.href : '';
    }}));
}}"#,
        sel = literal(selector),
    )
}

pub fn center(selector: &str) -> String {
    format!(
        r#"function() {{
    const el = this.querySelector({sel});
    if (!el) {{ return false; }}
    el.scrollIntoView({{ block: 'center' }});
    return true;
}}"#,
        sel = literal(selector),
    )
}

pub fn in_viewport(selector: &str) -> String {
    format!(
        r#"function() {{
    const el = this.querySelector({sel});
    if (!el) {{ return false; }}
    const rect = el.getBoundingClientRect();
    return rect.top >= 0 && rect.bottom <= window.innerHeight;
}}"#,
        sel = literal(selector),
    )
}
