//! Link extraction from parsed pages
//!
//! Scans anchor elements for references that stay inside the target
//! domain. Only absolute and root-relative references are followed;
//! path-relative references are dropped. That restriction is observable
//! crawl behavior, kept on purpose.

use crate::crawler::document::Document;
use scraper::Selector;
use std::collections::HashSet;
use url::Url;

/// Extracts in-domain links from a parsed page
///
/// Root-relative references are resolved against the scheme+host prefix
/// of the location the page was fetched from.
///
/// # Arguments
///
/// * `doc` - The parsed page
/// * `marker` - The domain marker a reference must contain to be kept
///
/// # Returns
///
/// A deduplicated set of absolute locations; iteration order is not
/// significant.
pub fn extract_links(doc: &Document, marker: &str) -> HashSet<String> {
    let mut links = HashSet::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in doc.html().select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            if !href.contains(marker) {
                continue;
            }

            if href.starts_with("http") {
                links.insert(href.to_string());
            } else if href.starts_with('/') {
                if let Some(prefix) = scheme_host_prefix(doc.location()) {
                    links.insert(format!("{}{}", prefix, href));
                }
            }
        }
    }

    links
}

/// The `scheme://host[:port]` prefix of a location, for root-relative
/// resolution. Returns `None` when the base cannot be parsed, in which
/// case root-relative references from that page are dropped.
fn scheme_host_prefix(base: &str) -> Option<String> {
    let url = Url::parse(base).ok()?;
    let host = url.host_str()?;
    match url.port() {
        Some(port) => Some(format!("{}://{}:{}", url.scheme(), host, port)),
        None => Some(format!("{}://{}", url.scheme(), host)),
    }
}
