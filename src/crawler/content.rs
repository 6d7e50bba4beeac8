//! Content extraction from parsed pages
//!
//! This module applies an ordered list of selection rules to a page,
//! falling back to a default tag scan when none match, and turns the
//! selected elements into [`Record`]s.

use crate::crawler::document::Document;
use scraper::{ElementRef, Selector};
use serde::Serialize;

/// Minimum trimmed text length for an element to qualify
const MIN_TEXT_CHARS: usize = 20;

/// Record text is truncated to this many characters
const MAX_TEXT_CHARS: usize = 500;

/// Tags scanned when no selection rule matches
const DEFAULT_TAGS: &str = "p, div, span, h1, h2, li";

/// One extracted content unit
///
/// Immutable once created. Serializes with lower-case keys for the
/// external exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Trimmed visible text, at most 500 characters
    pub text: String,

    /// Associated link, possibly empty
    pub link: String,

    /// Tag name of the element the text came from
    pub tag: String,

    /// Location of the page the record was extracted from
    pub source: String,
}

/// A single content selection rule
///
/// Rules are evaluated in order; the first one whose selection matches at
/// least one element wins and later rules are never evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionRule {
    /// A structural CSS selector
    Selector(String),

    /// The default tag scan (paragraphs, blocks, spans, headings, list
    /// items) used when no selector is given
    DefaultTags,
}

/// Compiled selector with its display form kept for log lines
struct CompiledRule {
    raw: String,
    selector: Selector,
}

/// Applies selection rules and per-element filters to parsed pages
pub struct ContentExtractor {
    max_items: usize,
    /// Lowercased; empty disables the filter
    keywords: Vec<String>,
    rules: Vec<CompiledRule>,
}

impl ContentExtractor {
    /// Builds an extractor from its limits, keyword filter, and rules.
    ///
    /// Rules with unparseable selectors are logged and dropped here; a
    /// dropped rule behaves exactly like one that never matches.
    pub fn new(max_items: usize, keywords: &[String], rules: &[ExtractionRule]) -> Self {
        let keywords = keywords.iter().map(|k| k.to_lowercase()).collect();

        let mut compiled = Vec::new();
        for rule in rules {
            let raw = match rule {
                ExtractionRule::Selector(s) => s.as_str(),
                ExtractionRule::DefaultTags => DEFAULT_TAGS,
            };
            match Selector::parse(raw) {
                Ok(selector) => compiled.push(CompiledRule {
                    raw: raw.to_string(),
                    selector,
                }),
                Err(e) => {
                    tracing::warn!("Ignoring unparseable selector '{}': {}", raw, e);
                }
            }
        }

        Self {
            max_items,
            keywords,
            rules: compiled,
        }
    }

    /// Extracts records from one page, capped at the per-page limit.
    ///
    /// The cap applies to the selected candidates before the per-element
    /// filters run, so a page of short or keyword-less elements can yield
    /// fewer records than the cap even when more elements qualify later
    /// in the document.
    pub fn extract(&self, doc: &Document) -> Vec<Record> {
        let candidates = self.select_candidates(doc);

        let mut records = Vec::new();
        for element in candidates {
            if let Some(record) = self.build_record(element, doc.location()) {
                records.push(record);
            }
        }
        records
    }

    /// Selects candidate elements: first matching rule wins, default tag
    /// scan otherwise, capped either way.
    fn select_candidates<'a>(&self, doc: &'a Document) -> Vec<ElementRef<'a>> {
        for rule in &self.rules {
            let matched: Vec<_> = doc
                .html()
                .select(&rule.selector)
                .take(self.max_items)
                .collect();
            if !matched.is_empty() {
                tracing::debug!(
                    "Selector '{}' matched {} elements on {}",
                    rule.raw,
                    matched.len(),
                    doc.location()
                );
                return matched;
            }
        }

        if let Ok(selector) = Selector::parse(DEFAULT_TAGS) {
            doc.html().select(&selector).take(self.max_items).collect()
        } else {
            Vec::new()
        }
    }

    /// Turns one candidate element into a record, or filters it out.
    fn build_record(&self, element: ElementRef<'_>, source: &str) -> Option<Record> {
        let text = element.text().collect::<String>();
        let text = text.trim();

        if text.chars().count() < MIN_TEXT_CHARS {
            return None;
        }

        if !self.keywords.is_empty() {
            let lowered = text.to_lowercase();
            if !self.keywords.iter().any(|kw| lowered.contains(kw)) {
                return None;
            }
        }

        Some(Record {
            text: text.chars().take(MAX_TEXT_CHARS).collect(),
            link: associated_link(element),
            tag: element.value().name().to_string(),
            source: source.to_string(),
        })
    }
}

/// Finds the link associated with an element: a nested anchor first,
/// then the nearest enclosing anchor, else empty.
///
/// When a nested anchor exists but carries no reference, the result is
/// empty rather than falling back to an ancestor.
fn associated_link(element: ElementRef<'_>) -> String {
    if let Ok(selector) = Selector::parse("a") {
        if let Some(anchor) = element.select(&selector).next() {
            return anchor.value().attr("href").unwrap_or("").to_string();
        }
    }

    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "a")
        .and_then(|anchor| anchor.value().attr("href"))
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "http://source.onion/";

    fn doc(html: &str) -> Document {
        Document::parse(html, SOURCE)
    }

    fn extractor(max_items: usize) -> ContentExtractor {
        ContentExtractor::new(max_items, &[], &[])
    }

    fn rules(selectors: &[&str]) -> Vec<ExtractionRule> {
        selectors
            .iter()
            .map(|s| ExtractionRule::Selector(s.to_string()))
            .collect()
    }

    #[test]
    fn test_default_tags_scanned_in_document_order() {
        let doc = doc(
            r#"<h1>A heading with enough characters</h1>
               <p>A paragraph with enough characters too</p>"#,
        );
        let records = extractor(10).extract(&doc);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].tag, "h1");
        assert_eq!(records[1].tag, "p");
        assert_eq!(records[0].source, SOURCE);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let doc = doc(
            r#"<div class="post">This post body is long enough to keep</div>
               <p>This paragraph is also long enough to keep</p>"#,
        );
        let extractor = ContentExtractor::new(10, &[], &rules(&["div.post", "p"]));
        let records = extractor.extract(&doc);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tag, "div");
    }

    #[test]
    fn test_non_matching_rule_falls_through_to_next() {
        let doc = doc(r#"<p>This paragraph is long enough to qualify</p>"#);
        let extractor = ContentExtractor::new(10, &[], &rules(&["div.missing", "p"]));
        let records = extractor.extract(&doc);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tag, "p");
    }

    #[test]
    fn test_no_rule_matches_falls_back_to_default_tags() {
        let doc = doc(r#"<li>A list item with enough characters in it</li>"#);
        let extractor = ContentExtractor::new(10, &[], &rules(&["div.missing"]));
        let records = extractor.extract(&doc);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tag, "li");
    }

    #[test]
    fn test_unparseable_selector_is_dropped() {
        let doc = doc(r#"<p>This paragraph is long enough to qualify</p>"#);
        let extractor = ContentExtractor::new(10, &[], &rules(&["[[[not a selector", "p"]));
        let records = extractor.extract(&doc);

        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_explicit_default_tags_rule() {
        let doc = doc(r#"<span>A span with more than twenty characters</span>"#);
        let extractor =
            ContentExtractor::new(10, &[], &[ExtractionRule::DefaultTags]);
        let records = extractor.extract(&doc);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tag, "span");
    }

    #[test]
    fn test_short_text_skipped() {
        let doc = doc(r#"<p>too short</p><p></p>"#);
        assert!(extractor(10).extract(&doc).is_empty());
    }

    #[test]
    fn test_cap_applies_before_filtering() {
        // Three candidates are taken; the first two are too short, so the
        // qualifying fourth paragraph is never considered.
        let doc = doc(
            r#"<p>short</p>
               <p>short</p>
               <p>This third paragraph has enough characters</p>
               <p>This fourth paragraph has enough characters</p>"#,
        );
        let records = extractor(3).extract(&doc);

        assert_eq!(records.len(), 1);
        assert!(records[0].text.contains("third"));
    }

    #[test]
    fn test_per_page_cap_is_never_exceeded() {
        let html: String = (0..30)
            .map(|i| format!("<p>Paragraph number {} with enough characters</p>", i))
            .collect();
        let records = extractor(5).extract(&doc(&html));

        assert_eq!(records.len(), 5);
    }

    #[test]
    fn test_keyword_filter_is_case_insensitive_substring() {
        let doc = doc(
            r#"<p>forum post about Market prices and more</p>
               <p>the weather today was entirely uneventful</p>"#,
        );
        let extractor = ContentExtractor::new(10, &["market".to_string()], &[]);
        let records = extractor.extract(&doc);

        assert_eq!(records.len(), 1);
        assert!(records[0].text.contains("Market"));
    }

    #[test]
    fn test_any_keyword_match_keeps_record() {
        let doc = doc(r#"<p>a long enough line mentioning forums only</p>"#);
        let keywords = vec!["market".to_string(), "forum".to_string()];
        let records = ContentExtractor::new(10, &keywords, &[]).extract(&doc);

        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_text_truncated_on_char_boundary() {
        let long: String = "é".repeat(600);
        let html = format!("<p>{}</p>", long);
        let records = extractor(10).extract(&doc(&html));

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text.chars().count(), 500);
    }

    #[test]
    fn test_link_from_nested_anchor() {
        let doc = doc(
            r#"<li>A list item with <a href="http://x.onion/item">a link inside</a></li>"#,
        );
        let records = extractor(10).extract(&doc);

        // The li and its inner a text both qualify as candidates; the li
        // comes first in document order
        assert_eq!(records[0].link, "http://x.onion/item");
        assert_eq!(records[0].tag, "li");
    }

    #[test]
    fn test_link_from_enclosing_anchor() {
        let doc = doc(
            r#"<a href="http://x.onion/wrap"><span>A wrapped span with enough characters</span></a>"#,
        );
        let extractor = ContentExtractor::new(10, &[], &rules(&["span"]));
        let records = extractor.extract(&doc);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].link, "http://x.onion/wrap");
    }

    #[test]
    fn test_link_empty_when_no_anchor() {
        let doc = doc(r#"<p>A paragraph without any link around it</p>"#);
        let records = extractor(10).extract(&doc);

        assert_eq!(records[0].link, "");
    }

    #[test]
    fn test_nested_anchor_without_href_yields_empty_link() {
        let doc = doc(
            r#"<a href="http://x.onion/outer"><p>Enough characters here <a name="n">inner</a></p></a>"#,
        );
        let extractor = ContentExtractor::new(10, &[], &rules(&["p"]));
        let records = extractor.extract(&doc);

        // The nested anchor wins the lookup even though it has no href
        assert_eq!(records[0].link, "");
    }
}
