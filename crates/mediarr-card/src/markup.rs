//! Markup helpers and the card stylesheet.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate};

/// Escape text for HTML content and attribute values.
pub fn esc(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}

/// `background-image` value for an artwork URL. Quotes are percent-encoded
/// so the URL can never terminate the CSS string early.
pub fn css_url(url: &str) -> String {
    let url = url.replace('\'', "%27").replace('"', "%22");
    format!("url('{}')", esc(&url))
}

/// `M/D/YYYY` for ISO dates and timestamps. `None` when the text is not a date.
pub fn format_date(text: &str) -> Option<String> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive().format("%-m/%-d/%Y").to_string());
    }
    let head = text.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%-m/%-d/%Y").to_string())
}

/// Formatted date, or the text itself when it does not parse.
pub fn display_date(text: &str) -> String {
    format_date(text).unwrap_or_else(|| text.trim().to_string())
}

/// Year of an ISO date (`2024-05-01` → `2024`).
pub fn year_of(text: &str) -> Option<String> {
    let head = text.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y").to_string())
}

pub fn runtime_text(runtime: Option<u32>) -> Option<String> {
    runtime.map(|minutes| format!("{} min", minutes))
}

/// Join the present parts with ` | `.
pub fn join_metadata(parts: &[Option<String>]) -> String {
    parts
        .iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Percentage for a `width:` style. Two decimals at most, no trailing zeros.
pub fn format_percent(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}%", rounded)
}

pub const STYLES: &str = "\
ha-card{overflow:hidden;position:relative}\
.card-content{position:relative;padding:0}\
.hidden{display:none!important}\
.media-content{position:relative;min-height:200px}\
.media-background{position:absolute;inset:0;background-size:cover;background-position:center}\
.media-info{position:relative;padding:16px;color:#fff;text-shadow:0 1px 2px rgba(0,0,0,.8)}\
.media-info .title{font-size:1.4em;font-weight:600}\
.media-info .overview{margin-top:8px;font-size:.9em}\
.play-button{position:absolute;right:16px;bottom:16px;cursor:pointer}\
.section-header{cursor:pointer;padding:8px 16px}\
.section-toggle-icon{transition:transform .2s}\
.section-content{overflow-x:auto;padding:0 16px 12px}\
.section-content.collapsed{display:none}\
.section-content>div{display:flex;gap:8px}\
.media-item{width:90px;flex:0 0 auto;cursor:pointer;opacity:.8}\
.media-item.selected{opacity:1;outline:2px solid var(--primary-color)}\
.media-item img{width:100%;border-radius:4px}\
.empty-section-content{padding:12px;opacity:.7}\
.now-playing{position:relative;min-height:64px}\
.now-playing-background{position:absolute;inset:0;background-size:cover;opacity:.3}\
.now-playing-content{position:relative;padding:8px 16px}\
.progress-bar{height:3px;background:rgba(255,255,255,.2)}\
.progress-bar-fill{height:100%;background:var(--primary-color)}\
.client-modal{position:absolute;inset:0;z-index:10;background:rgba(0,0,0,.6)}\
.client-modal-content{margin:24px;background:var(--card-background-color);border-radius:8px}\
.client-modal-header{display:flex;justify-content:space-between;padding:12px 16px}\
.client-item{display:flex;gap:12px;padding:8px 16px;cursor:pointer}";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-05-01").as_deref(), Some("5/1/2024"));
        assert_eq!(
            format_date("2023-11-20T19:30:00+00:00").as_deref(),
            Some("11/20/2023")
        );
        assert_eq!(format_date("2023-11-20T19:30:00").as_deref(), Some("11/20/2023"));
        assert_eq!(format_date("Unknown"), None);
        assert_eq!(display_date("Mon 8pm"), "Mon 8pm");
    }

    #[test]
    fn test_year_of() {
        assert_eq!(year_of("1999-03-31").as_deref(), Some("1999"));
        assert_eq!(year_of("soon"), None);
    }

    #[test]
    fn test_join_metadata_skips_missing() {
        assert_eq!(
            join_metadata(&[Some("5/1/2024".into()), None, Some("120 min".into())]),
            "5/1/2024 | 120 min"
        );
        assert_eq!(join_metadata(&[None, runtime_text(None)]), "");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(25.0), "25%");
        assert_eq!(format_percent(100.0 / 3.0), "33.33%");
    }

    #[test]
    fn test_css_url_escapes_quotes() {
        assert_eq!(css_url("a'b.jpg"), "url('a%27b.jpg')");
        assert_eq!(css_url("x.jpg?a=1&b=2"), "url('x.jpg?a=1&amp;b=2')");
    }
}
