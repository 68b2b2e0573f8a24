use std::cell::RefCell;
use std::collections::HashMap;

use spotlight::{
    ClassSet, Config, CrawlState, Crawler, Fetch, GibbsLda, LexiconTagger, Page, PageRef,
    RelaxationMode, ReportStore, SpotlightError,
};

const ROOT: &str = "https://news.example.com/";

/// Serves pages from memory and remembers what was requested.
struct FakeSite {
    pages: HashMap<String, String>,
    fetched: RefCell<Vec<String>>,
}

impl FakeSite {
    fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, html)| (url.to_string(), html.to_string()))
                .collect(),
            fetched: RefCell::new(Vec::new()),
        }
    }

    fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }
}

impl Fetch for &FakeSite {
    async fn fetch(&self, url: &PageRef) -> Page {
        self.fetched.borrow_mut().push(url.to_string());
        match self.pages.get(url.as_str()) {
            Some(html) => Page::from_html(html),
            None => Page::empty(),
        }
    }
}

fn news_site() -> FakeSite {
    FakeSite::new(&[
        (
            ROOT,
            r#"<html><body>
                <a class="headline" href="/politics/budget">Budget</a>
                <a class="headline" href="https://elsewhere.org/story">Elsewhere</a>
                <a href="/about">About</a>
                <div class="teaser"><a href="/sport/derby#comments">Derby</a></div>
                <p class="body">Parliament debated the budget deficit and taxation reform.</p>
            </body></html>"#,
        ),
        (
            "https://news.example.com/politics/budget",
            r#"<html><body>
                <a class="headline" href="/">Home</a>
                <a class="headline" href="/politics/budget">Budget</a>
                <p class="body">Ministers defended budget cuts while opposition parties demanded taxation reform.</p>
                <p class="body">Ministers defended budget cuts while opposition parties demanded taxation reform.</p>
            </body></html>"#,
        ),
        (
            "https://news.example.com/sport/derby",
            r#"<html><body>
                <a class="headline" href="/sport/league">League</a>
                <p class="body">The derby ended with a late goal from the striker, stadium fans celebrated.</p>
            </body></html>"#,
        ),
        (
            "https://news.example.com/sport/league",
            r#"<html><body>
                <p class="body">League standings changed after the derby goal.</p>
            </body></html>"#,
        ),
        (
            "https://news.example.com/about",
            r#"<html><body><p class="body">Editorial team contact details.</p></body></html>"#,
        ),
    ])
}

fn classes() -> ClassSet {
    ClassSet::default()
        .link_classes(vec!["headline"])
        .text_classes(vec!["body"])
        .embedded_classes(vec!["teaser"])
}

fn config() -> Config {
    Config::builder().topic_count(2).iterations(30).build()
}

fn crawler(
    site: &FakeSite,
    budget: usize,
    relaxation: RelaxationMode,
) -> Crawler<&FakeSite, LexiconTagger, GibbsLda> {
    Crawler::builder(ROOT)
        .unwrap()
        .budget(budget)
        .language("en")
        .relaxation(relaxation)
        .classes(classes())
        .config(config())
        .build_with(site, LexiconTagger, GibbsLda::default())
        .unwrap()
}

#[tokio::test]
async fn strict_crawl_follows_classed_links() -> Result<(), Box<dyn std::error::Error>> {
    let site = news_site();
    let dir = tempfile::tempdir()?;
    let mut crawler = crawler(&site, 10, RelaxationMode::Strict);

    let (report, path) = crawler.run(&ReportStore::new(dir.path())).await?;

    assert_eq!(
        site.fetched(),
        vec![
            ROOT,
            "https://news.example.com/politics/budget",
            "https://news.example.com/sport/derby",
            "https://news.example.com/sport/league",
        ]
    );
    assert_eq!(report.visited, 4);
    assert_eq!(crawler.state(), CrawlState::Done);

    let vocabulary = crawler.vocabulary();
    assert_eq!(vocabulary.articles().len(), 4);
    assert!(vocabulary.vocabulary().contains("taxation"));
    assert!(vocabulary.vocabulary().contains("striker"));
    assert!(!vocabulary.vocabulary().contains("the"));
    assert!(!vocabulary.vocabulary().contains("contact"));
    assert_eq!(
        vocabulary.articles()[1],
        "ministers defended budget cuts opposition parties demanded taxation reform"
    );

    assert_eq!(report.topics.topics.len(), 2);
    assert!(report.topics.topics.iter().all(|words| words.len() == 7));

    assert_eq!(path, dir.path().join("news.example.txt"));
    let content = std::fs::read_to_string(&path)?;
    assert!(content.contains("crawled 4 pages on https://news.example.com/"));
    assert!(content.contains("TOPICS:\nTopic 0: "));
    assert!(content.contains("\nTopic 1: "));
    Ok(())
}

#[tokio::test]
async fn relaxed_links_stay_inside_the_site() {
    let site = news_site();
    let mut crawler = crawler(&site, 10, RelaxationMode::SloppyLink);
    crawler.crawl().await.unwrap();

    let fetched = site.fetched();
    assert_eq!(fetched.len(), 5);
    assert!(fetched.contains(&"https://news.example.com/about".to_string()));
    assert!(fetched.iter().all(|url| url.contains("https://news.example.com")));

    let mut unique = fetched.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), fetched.len());
    assert_eq!(crawler.frontier().visited_count(), 5);
    assert_eq!(crawler.frontier().visited().count(), 5);
}

#[tokio::test]
async fn budget_caps_the_crawl() {
    let site = news_site();
    let mut crawler = crawler(&site, 2, RelaxationMode::SloppyBoth);
    crawler.crawl().await.unwrap();

    assert_eq!(site.fetched().len(), 2);
    assert_eq!(crawler.frontier().visited_count(), 2);
    assert!(crawler.frontier().is_exhausted());
}

#[tokio::test]
async fn missing_pages_are_empty() {
    let site = FakeSite::new(&[(
        ROOT,
        r#"<a class="headline" href="/gone">Gone</a>
           <p class="body">Reporters investigated municipal spending.</p>"#,
    )]);
    let mut crawler = crawler(&site, 10, RelaxationMode::Strict);
    crawler.crawl().await.unwrap();

    assert_eq!(site.fetched().len(), 2);
    assert_eq!(crawler.vocabulary().articles().len(), 1);
}

#[tokio::test]
async fn anchor_without_href_does_not_revisit_root() {
    let site = FakeSite::new(&[(
        ROOT,
        r#"<a class="headline">Home</a>
           <p class="body">Parliament debated taxation.</p>"#,
    )]);
    for mode in &[RelaxationMode::Strict, RelaxationMode::SloppyLink] {
        let mut crawler = crawler(&site, 10, *mode);
        crawler.crawl().await.unwrap();
        assert_eq!(crawler.frontier().visited_count(), 1);
        assert_eq!(crawler.vocabulary().articles(), &["parliament debated taxation"]);
    }
    assert_eq!(site.fetched(), vec![ROOT, ROOT]);
}

fn unclassed_site() -> FakeSite {
    FakeSite::new(&[
        (
            ROOT,
            r#"<a href="/opinion">Opinion</a>
               <p>Columnists questioned renewable energy subsidies.</p>"#,
        ),
        (
            "https://news.example.com/opinion",
            "<p>Readers argued about energy prices and nuclear power.</p>",
        ),
    ])
}

#[tokio::test]
async fn strict_mode_on_unclassed_site_reports_empty_corpus() {
    let site = unclassed_site();
    let dir = tempfile::tempdir().unwrap();
    let store = ReportStore::new(dir.path());
    let mut crawler = crawler(&site, 10, RelaxationMode::Strict);

    let err = crawler.run(&store).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SpotlightError>(),
        Some(SpotlightError::EmptyCorpus)
    ));
    assert_eq!(crawler.state(), CrawlState::Failed);
    assert!(!store.path_for(crawler.url()).exists());
}

#[tokio::test]
async fn sloppy_modes_recover_unclassed_text() {
    let site = unclassed_site();
    let dir = tempfile::tempdir().unwrap();
    let mut crawler = crawler(&site, 10, RelaxationMode::SloppyBoth);

    let (report, _) = crawler.run(&ReportStore::new(dir.path())).await.unwrap();
    assert_eq!(report.visited, 2);
    assert_eq!(crawler.vocabulary().articles().len(), 2);
    assert!(crawler.vocabulary().vocabulary().contains("energy"));
    assert!(report.to_string().contains("crawled 2 pages on https://news.example.com/"));
}

#[tokio::test]
async fn repeated_runs_append() {
    let dir = tempfile::tempdir().unwrap();
    let store = ReportStore::new(dir.path());

    for _ in 0..2 {
        let site = news_site();
        let mut crawler = crawler(&site, 3, RelaxationMode::Strict);
        crawler.run(&store).await.unwrap();
    }

    let content = std::fs::read_to_string(dir.path().join("news.example.txt")).unwrap();
    assert_eq!(content.matches("crawled 3 pages on").count(), 2);
}
