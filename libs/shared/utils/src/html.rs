use std::fmt;

use axum::response::{Html, IntoResponse, Response};

use shared_models::Notice;

pub const NOT_AVAILABLE: &str = "N/A";
pub const UNKNOWN: &str = "Unknown";

/// Escape text for interpolation into element content or quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Escaped value, or `placeholder` when the value is absent or blank.
pub fn text_or(value: Option<&str>, placeholder: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => escape(v),
        _ => escape(placeholder),
    }
}

/// A rendered markup fragment. Only constructible from escaped text or from
/// markup the caller vouches for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment(String);

impl Fragment {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Markup assembled by a renderer that already escaped every value.
    pub fn trusted(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn text(raw: &str) -> Self {
        Self(escape(raw))
    }

    pub fn push(&mut self, other: Fragment) {
        self.0.push_str(&other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromIterator<Fragment> for Fragment {
    fn from_iter<I: IntoIterator<Item = Fragment>>(iter: I) -> Self {
        let mut out = Fragment::empty();
        for fragment in iter {
            out.push(fragment);
        }
        out
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl IntoResponse for Fragment {
    fn into_response(self) -> Response {
        Html(self.0).into_response()
    }
}

pub fn render_notices(notices: &[Notice]) -> Fragment {
    notices
        .iter()
        .map(|notice| {
            Fragment::trusted(format!(
                r#"<div class="toast toast-{}" role="status">{}</div>"#,
                notice.level.as_str(),
                escape(&notice.message)
            ))
        })
        .collect()
}

/// Prompt shown before an irreversible action; re-posts with `confirm=true`.
pub fn render_confirmation(prompt: &str, action: &str) -> Fragment {
    Fragment::trusted(format!(
        r#"<form class="confirm-dialog" method="post" action="{}"><p>{}</p><input type="hidden" name="confirm" value="true"><button type="submit" class="btn-confirm">Yes</button></form>"#,
        escape(action),
        escape(prompt)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_models::Notice;

    #[test]
    fn escape_handles_markup_characters() {
        assert_eq!(
            escape(r#"<img src=x onerror="alert('x')">&"#),
            "&lt;img src=x onerror=&quot;alert(&#39;x&#39;)&quot;&gt;&amp;"
        );
        assert_eq!(escape("Dr. Smith"), "Dr. Smith");
    }

    #[test]
    fn text_or_falls_back_for_blank_values() {
        assert_eq!(text_or(None, NOT_AVAILABLE), "N/A");
        assert_eq!(text_or(Some("   "), UNKNOWN), "Unknown");
        assert_eq!(text_or(Some("555<1>"), NOT_AVAILABLE), "555&lt;1&gt;");
    }

    #[test]
    fn notices_render_escaped() {
        let html = render_notices(&[Notice::error("<b>Booking failed</b>")]);
        assert_eq!(
            html.as_str(),
            r#"<div class="toast toast-error" role="status">&lt;b&gt;Booking failed&lt;/b&gt;</div>"#
        );
    }
}
