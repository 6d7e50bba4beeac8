//! Parsed representation of one fetched page

use scraper::Html;

/// One fetched page, parsed and ready for extraction
///
/// Produced by a single fetch, handed to the link and content extractors
/// for that page, then dropped. The inner tree is not `Send`, so a
/// `Document` must not be held across an `await`; the engine scopes its
/// use between suspension points.
pub struct Document {
    html: Html,
    location: String,
}

impl Document {
    /// Parses a response body fetched from `location`.
    ///
    /// HTML parsing is error-tolerant; malformed markup still yields a
    /// traversable tree.
    pub fn parse(body: &str, location: impl Into<String>) -> Self {
        Self {
            html: Html::parse_document(body),
            location: location.into(),
        }
    }

    /// The location this page was fetched from.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub(crate) fn html(&self) -> &Html {
        &self.html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    #[test]
    fn test_parse_keeps_location() {
        let doc = Document::parse("<html><body></body></html>", "http://a.onion/");
        assert_eq!(doc.location(), "http://a.onion/");
    }

    #[test]
    fn test_parse_is_error_tolerant() {
        let doc = Document::parse("<p>unclosed <div>markup", "http://a.onion/");
        let selector = Selector::parse("p").unwrap();
        assert!(doc.html().select(&selector).next().is_some());
    }
}
