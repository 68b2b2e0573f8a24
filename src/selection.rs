use std::fmt;

use log::trace;
use select::node::Node;
use select::predicate::Name;
use serde::{Deserialize, Serialize};

use crate::link::{LinkResolver, PageRef};
use crate::page::Page;

/// Which of the class constraints a crawl ignores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelaxationMode {
    /// Links and text must carry a configured class.
    Strict,
    /// Every paragraph is text, links still need a class.
    SloppyText,
    /// Every link inside the site is followed, text still needs a class.
    SloppyLink,
    /// No class constraints at all.
    SloppyBoth,
}

impl RelaxationMode {
    pub fn from_flags(sloppy_text: bool, sloppy_link: bool) -> Self {
        match (sloppy_text, sloppy_link) {
            (false, false) => RelaxationMode::Strict,
            (true, false) => RelaxationMode::SloppyText,
            (false, true) => RelaxationMode::SloppyLink,
            (true, true) => RelaxationMode::SloppyBoth,
        }
    }

    pub fn relaxes_text(&self) -> bool {
        matches!(self, RelaxationMode::SloppyText | RelaxationMode::SloppyBoth)
    }

    pub fn relaxes_links(&self) -> bool {
        matches!(self, RelaxationMode::SloppyLink | RelaxationMode::SloppyBoth)
    }

    /// The modes that drop at least the constraints this one drops, and more.
    pub fn looser(&self) -> Vec<RelaxationMode> {
        [
            RelaxationMode::SloppyText,
            RelaxationMode::SloppyLink,
            RelaxationMode::SloppyBoth,
        ]
        .iter()
        .copied()
        .filter(|mode| {
            mode != self
                && (mode.relaxes_text() || !self.relaxes_text())
                && (mode.relaxes_links() || !self.relaxes_links())
        })
        .collect()
    }

    /// The command line flag that selects this mode.
    pub fn flag(&self) -> Option<&'static str> {
        match self {
            RelaxationMode::Strict => None,
            RelaxationMode::SloppyText => Some("--sloppytext"),
            RelaxationMode::SloppyLink => Some("--sloppylink"),
            RelaxationMode::SloppyBoth => Some("--sloppy"),
        }
    }
}

impl Default for RelaxationMode {
    fn default() -> Self {
        RelaxationMode::Strict
    }
}

impl fmt::Display for RelaxationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelaxationMode::Strict => f.write_str("strict"),
            RelaxationMode::SloppyText => f.write_str("sloppytext"),
            RelaxationMode::SloppyLink => f.write_str("sloppylink"),
            RelaxationMode::SloppyBoth => f.write_str("sloppy"),
        }
    }
}

/// The css classes that mark the interesting parts of a site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSet {
    /// Classes of anchors worth following.
    #[serde(default)]
    pub link_classes: Vec<String>,
    /// Classes of paragraphs holding article text.
    #[serde(default)]
    pub text_classes: Vec<String>,
    /// Classes of containers whose first nested anchor or paragraph is taken
    /// regardless of its own classes.
    #[serde(default)]
    pub embedded_classes: Vec<String>,
}

impl ClassSet {
    pub fn link_classes<I, T>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.link_classes = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn text_classes<I, T>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.text_classes = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn embedded_classes<I, T>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.embedded_classes = classes.into_iter().map(Into::into).collect();
        self
    }

    /// Add all classes of `other` that are not already present.
    pub fn merge(&mut self, other: &ClassSet) {
        fn extend(into: &mut Vec<String>, from: &[String]) {
            for class in from {
                if !into.contains(class) {
                    into.push(class.clone());
                }
            }
        }
        extend(&mut self.link_classes, &other.link_classes);
        extend(&mut self.text_classes, &other.text_classes);
        extend(&mut self.embedded_classes, &other.embedded_classes);
    }

    pub fn is_empty(&self) -> bool {
        self.link_classes.is_empty()
            && self.text_classes.is_empty()
            && self.embedded_classes.is_empty()
    }
}

/// Whether the `class` attribute of the node names any of `classes`.
///
/// A node without a `class` attribute matches nothing.
pub fn has_any_class(node: &Node, classes: &[String]) -> bool {
    node.attr("class")
        .map(|attr| {
            attr.split_whitespace()
                .any(|class| classes.iter().any(|c| c == class))
        })
        .unwrap_or(false)
}

/// Decides which links get followed and which paragraphs count as text.
#[derive(Debug, Clone)]
pub struct SelectionPolicy {
    classes: ClassSet,
    mode: RelaxationMode,
}

impl SelectionPolicy {
    pub fn new(classes: ClassSet, mode: RelaxationMode) -> Self {
        Self { classes, mode }
    }

    pub fn mode(&self) -> RelaxationMode {
        self.mode
    }

    pub fn classes(&self) -> &ClassSet {
        &self.classes
    }

    /// Whether the anchor, resolved to `link`, should be followed.
    pub fn link_qualifies(&self, anchor: &Node, link: &str, resolver: &LinkResolver) -> bool {
        resolver.contains(link)
            && (self.mode.relaxes_links() || has_any_class(anchor, &self.classes.link_classes))
    }

    /// Whether the paragraph counts as article text.
    pub fn text_qualifies(&self, paragraph: &Node) -> bool {
        self.mode.relaxes_text() || has_any_class(paragraph, &self.classes.text_classes)
    }

    /// All links of the page worth following, in document order.
    ///
    /// Unless links are relaxed, the first anchor inside every embedded
    /// container is followed as well, provided it stays inside the site.
    pub fn select_links(&self, page: &Page, resolver: &LinkResolver) -> Vec<PageRef> {
        let mut links = Vec::new();

        for anchor in page.anchors() {
            let link = resolver.resolve(anchor.attr("href"));
            if self.link_qualifies(&anchor, link.as_str(), resolver) {
                links.push(link);
            } else {
                trace!("Skipping link `{}`", link);
            }
        }

        if !self.mode.relaxes_links() {
            links.extend(self.embedded_links(page, resolver));
        }

        links
    }

    /// The first anchor of every embedded container that stays inside the
    /// site.
    pub fn embedded_links(&self, page: &Page, resolver: &LinkResolver) -> Vec<PageRef> {
        let mut links = Vec::new();
        for class in &self.classes.embedded_classes {
            for container in page.with_class(class) {
                if let Some(anchor) = container.find(Name("a")).next() {
                    let link = resolver.resolve(anchor.attr("href"));
                    if resolver.contains(link.as_str()) {
                        links.push(link);
                    }
                }
            }
        }
        links
    }

    /// The first paragraph nested in every embedded container.
    pub fn embedded_paragraphs<'a>(&'a self, page: &'a Page) -> Vec<Node<'a>> {
        self.classes
            .embedded_classes
            .iter()
            .flat_map(|class| page.with_class(class))
            .filter_map(|container| container.find(Name("p")).next())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes() -> ClassSet {
        ClassSet::default()
            .link_classes(vec!["headline"])
            .text_classes(vec!["body"])
            .embedded_classes(vec!["teaser"])
    }

    fn links(mode: RelaxationMode, html: &str) -> Vec<String> {
        let page = Page::from_html(html);
        let resolver = LinkResolver::new("example.com");
        SelectionPolicy::new(classes(), mode)
            .select_links(&page, &resolver)
            .into_iter()
            .map(PageRef::into_string)
            .collect()
    }

    const PAGE: &str = r#"<html><body>
        <a href="/a" class="headline big">a</a>
        <a href="https://other.com/x" class="headline">x</a>
        <a href="/b">b</a>
        <div class="teaser"><span><a href="/c">c</a><a href="/d">d</a></span></div>
        <div class="teaser"><span>no link</span></div>
    </body></html>"#;

    #[test]
    fn strict_links() {
        assert_eq!(
            links(RelaxationMode::Strict, PAGE),
            vec!["example.com/a", "example.com/c"]
        );
        assert_eq!(
            links(RelaxationMode::SloppyText, PAGE),
            vec!["example.com/a", "example.com/c"]
        );
    }

    #[test]
    fn relaxed_links() {
        assert_eq!(
            links(RelaxationMode::SloppyLink, PAGE),
            vec!["example.com/a", "example.com/b", "example.com/c", "example.com/d"]
        );
        assert_eq!(
            links(RelaxationMode::SloppyBoth, PAGE),
            links(RelaxationMode::SloppyLink, PAGE)
        );
    }

    #[test]
    fn external_link_rejected_regardless_of_class() {
        let html = r#"<a href="/a" class="headline">a</a>
            <a href="https://other.com/x" class="headline">x</a>"#;
        for mode in &[
            RelaxationMode::Strict,
            RelaxationMode::SloppyLink,
            RelaxationMode::SloppyBoth,
        ] {
            assert_eq!(links(*mode, html), vec!["example.com/a"]);
        }
    }

    #[test]
    fn missing_href_falls_back_to_base() {
        assert_eq!(
            links(RelaxationMode::Strict, r#"<a class="headline">home</a>"#),
            vec!["example.com"]
        );
    }

    #[test]
    fn text_rules() {
        let page = Page::from_html(r#"<p class="body lead">a</p><p>b</p><p class="aside">c</p>"#);
        let strict = SelectionPolicy::new(classes(), RelaxationMode::Strict);
        let sloppy = SelectionPolicy::new(classes(), RelaxationMode::SloppyText);

        let strict_hits: Vec<_> = page.paragraphs().map(|p| strict.text_qualifies(&p)).collect();
        assert_eq!(strict_hits, vec![true, false, false]);
        assert!(page.paragraphs().all(|p| sloppy.text_qualifies(&p)));
    }

    #[test]
    fn nested_paragraphs() {
        let page = Page::from_html(
            r#"<div class="teaser"><p>first</p><p>second</p></div><div class="teaser"></div>"#,
        );
        let policy = SelectionPolicy::new(classes(), RelaxationMode::Strict);
        let texts: Vec<_> = policy
            .embedded_paragraphs(&page)
            .iter()
            .map(|p| p.text())
            .collect();
        assert_eq!(texts, vec!["first"]);
    }

    #[test]
    fn modes() {
        assert_eq!(RelaxationMode::from_flags(false, false), RelaxationMode::Strict);
        assert!(RelaxationMode::SloppyBoth.relaxes_text());
        assert!(!RelaxationMode::SloppyLink.relaxes_text());
        assert!(RelaxationMode::SloppyLink.relaxes_links());
        assert_eq!(RelaxationMode::SloppyLink.flag(), Some("--sloppylink"));
        assert_eq!(RelaxationMode::Strict.flag(), None);
    }

    #[test]
    fn looser_modes() {
        assert_eq!(
            RelaxationMode::Strict.looser(),
            vec![
                RelaxationMode::SloppyText,
                RelaxationMode::SloppyLink,
                RelaxationMode::SloppyBoth
            ]
        );
        assert_eq!(RelaxationMode::SloppyText.looser(), vec![RelaxationMode::SloppyBoth]);
        assert_eq!(RelaxationMode::SloppyLink.looser(), vec![RelaxationMode::SloppyBoth]);
        assert!(RelaxationMode::SloppyBoth.looser().is_empty());
    }

    #[test]
    fn merge_classes() {
        let mut set = classes();
        set.merge(&ClassSet::default().link_classes(vec!["headline", "nav"]));
        assert_eq!(set.link_classes, vec!["headline", "nav"]);
        assert!(!set.is_empty());
    }
}
