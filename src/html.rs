use scraper::{Html, Selector};
use url::Url;

/// An `<a href>` element as seen by the scanners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    /// Visible text: text nodes trimmed, empties dropped, joined by a space.
    pub text: String,
}

/// All anchors carrying an `href` attribute, in document order.
pub fn anchors(html: &str) -> Vec<Anchor> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .map(|el| Anchor {
            href: el.value().attr("href").unwrap_or("").to_string(),
            text: el
                .text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        })
        .collect()
}

/// Hrefs starting with `http` pass through; anything else is joined onto
/// `base`. An empty href is the base itself. If the join is impossible the
/// href is returned unchanged.
pub fn resolve(base: &str, href: &str) -> String {
    if href.is_empty() {
        return base.to_string();
    }
    if href.starts_with("http") {
        return href.to_string();
    }
    Url::parse(base)
        .and_then(|b| b.join(href))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}
