//! HTML link extraction
//!
//! Pulls anchor hrefs out of a fetched page and resolves them against the
//! page URL. Malformed HTML is not an error: the html5ever-based parser
//! recovers what it can, so a garbage page simply yields zero links.

use crate::url::resolve_link;
use scraper::{Html, Selector};
use url::Url;

/// Extracts all anchor hrefs from a page, resolved to absolute URLs
///
/// Duplicate hrefs are preserved; the caller decides whether to deduplicate.
/// Hrefs with non-web schemes (`mailto:`, `javascript:`, fragments, data
/// URIs) are dropped during resolution.
///
/// # Arguments
///
/// * `html` - The HTML content
/// * `base_url` - The URL the page was fetched from, for resolving relative
///   links
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    // The selector literal is valid; parse cannot fail
    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}
