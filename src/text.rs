use log::trace;

use crate::page::Page;
use crate::selection::SelectionPolicy;

/// Collects the article text of a page.
pub struct TextCollector<'a> {
    policy: &'a SelectionPolicy,
}

impl<'a> TextCollector<'a> {
    pub fn new(policy: &'a SelectionPolicy) -> Self {
        Self { policy }
    }

    /// All unique text snippets of the page in document order.
    ///
    /// Paragraphs are taken when the policy accepts them. Unless text is
    /// relaxed, the first paragraph nested in each embedded container is
    /// taken as well. Blank snippets are dropped.
    pub fn snippets(&self, page: &Page) -> Vec<String> {
        let mut snippets: Vec<String> = Vec::new();

        let mut push = |text: String| {
            let text = text.trim();
            if !text.is_empty() && !snippets.iter().any(|s| s == text) {
                snippets.push(text.to_string());
            }
        };

        for paragraph in page.paragraphs() {
            if self.policy.text_qualifies(&paragraph) {
                push(paragraph.text());
            }
        }

        if !self.policy.mode().relaxes_text() {
            for paragraph in self.policy.embedded_paragraphs(page) {
                push(paragraph.text());
            }
        }

        trace!("Collected {} snippets", snippets.len());
        snippets
    }

    /// The unique snippets of the page joined by a single space, empty if
    /// nothing qualified.
    pub fn collect(&self, page: &Page) -> String {
        self.snippets(page).join(" ")
    }
}

/// Returns an iterator over all whitespace separated words of the text.
pub fn words(txt: &str) -> impl Iterator<Item = &str> {
    txt.split_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{ClassSet, RelaxationMode};

    fn policy(mode: RelaxationMode) -> SelectionPolicy {
        SelectionPolicy::new(
            ClassSet::default()
                .text_classes(vec!["article-body"])
                .embedded_classes(vec!["comment"]),
            mode,
        )
    }

    #[test]
    fn unclassed_paragraphs() {
        let page = Page::from_html("<p>First para.</p><p>Second para.</p>");

        assert_eq!(
            TextCollector::new(&policy(RelaxationMode::Strict)).collect(&page),
            ""
        );
        assert_eq!(
            TextCollector::new(&policy(RelaxationMode::SloppyLink)).collect(&page),
            ""
        );
        for mode in &[RelaxationMode::SloppyText, RelaxationMode::SloppyBoth] {
            assert_eq!(
                TextCollector::new(&policy(*mode)).collect(&page),
                "First para. Second para."
            );
        }
    }

    #[test]
    fn dedup_within_page() {
        let page = Page::from_html(
            r#"<p class="article-body">Same.</p>
               <p class="article-body">Other.</p>
               <p class="article-body">Same.</p>"#,
        );
        let policy = policy(RelaxationMode::Strict);
        assert_eq!(
            TextCollector::new(&policy).snippets(&page),
            vec!["Same.", "Other."]
        );
    }

    #[test]
    fn embedded_fallback() {
        let page = Page::from_html(
            r#"<p class="article-body">Body text.</p>
               <div class="comment"><div><p>Reader comment.</p><p>Second.</p></div></div>
               <div class="comment"><p class="article-body">Body text.</p></div>
               <div class="comment"><span>No paragraph.</span></div>"#,
        );

        assert_eq!(
            TextCollector::new(&policy(RelaxationMode::Strict)).collect(&page),
            "Body text. Reader comment."
        );
        // relaxed text takes every paragraph, the containers add nothing new
        assert_eq!(
            TextCollector::new(&policy(RelaxationMode::SloppyText)).collect(&page),
            "Body text. Reader comment. Second."
        );
    }

    #[test]
    fn nested_markup_text() {
        let page = Page::from_html(r#"<p class="article-body">A <b>bold</b> claim.</p>"#);
        assert_eq!(
            TextCollector::new(&policy(RelaxationMode::Strict)).collect(&page),
            "A bold claim."
        );
    }
}
