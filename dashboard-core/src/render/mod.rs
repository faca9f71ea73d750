//! HTML fragments for the dashboard panels.
//!
//! Renderers are pure: they take model values and return markup. Writing the
//! markup into a panel is the session's job.

pub mod forecast;
pub mod snapshot;

/// Round half up, the way the numbers have always been displayed
/// (`-2.5` shows as `-2`, not `-3`).
pub fn rounded(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Inline status line used for loading, empty and error states.
pub fn placeholder(message: &str) -> String {
    format!(r#"<div class="loading">{}</div>"#, html_escape(message))
}

pub fn error_placeholder(message: &str) -> String {
    placeholder(&format!("⚠️ {message}"))
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
