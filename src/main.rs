use std::path::PathBuf;
use std::time::Duration;

use log::{info, LevelFilter};
use structopt::StructOpt;

use spotlight::{Config, Crawler, RelaxationMode, ReportStore, SiteProfiles, SpotlightError};

/// What to tell the user when no page produced any usable text.
fn relax_hint(mode: RelaxationMode) -> String {
    let flags: Vec<_> = mode
        .looser()
        .into_iter()
        .filter(RelaxationMode::relaxes_text)
        .filter_map(|mode| mode.flag())
        .collect();
    if flags.is_empty() {
        return "Extraction produced no usable content, even without css class constraints."
            .to_string();
    }
    format!(
        "Something went wrong during extraction, which probably means that the site has no \
         matching CSS classes.\nTry again with the {} flag.",
        flags.join(" or ")
    )
}

#[allow(missing_docs)]
#[derive(Debug, StructOpt)]
#[structopt(
    name = "spotlight",
    about = "Crawls a website for text and analyzes the topics of that text."
)]
enum App {
    #[structopt(name = "run", about = "Crawl a site and append its topics to <site>.txt")]
    Run {
        #[structopt(name = "url", help = "The page to start crawling from.")]
        url: String,
        #[structopt(name = "count", help = "The number of pages to visit.")]
        count: usize,
        #[structopt(name = "lang", help = "The language of the site, either en or sv.")]
        lang: String,
        #[structopt(
            name = "sloppy",
            long = "sloppy",
            help = "Ignore the css classes of both links and text.",
            conflicts_with_all = &["sloppytext", "sloppylink"]
        )]
        sloppy: bool,
        #[structopt(
            name = "sloppytext",
            long = "sloppytext",
            help = "Take the text of every paragraph, links still need a class.",
            conflicts_with = "sloppylink"
        )]
        sloppy_text: bool,
        #[structopt(
            name = "sloppylink",
            long = "sloppylink",
            help = "Follow every link inside the site, text still needs a class."
        )]
        sloppy_link: bool,
        #[structopt(flatten)]
        opts: Opts,
    },
}

impl App {
    async fn run(self) -> anyhow::Result<()> {
        let App::Run {
            url,
            count,
            lang,
            sloppy,
            sloppy_text,
            sloppy_link,
            opts,
        } = self;

        if url.trim().is_empty() {
            println!("Please enter a valid URL");
            return Ok(());
        }

        let relaxation = if sloppy {
            RelaxationMode::SloppyBoth
        } else {
            RelaxationMode::from_flags(sloppy_text, sloppy_link)
        };

        let mut builder = Crawler::builder(&url)?
            .budget(count)
            .language(lang)
            .relaxation(relaxation)
            .config(opts.as_config());
        if let Some(sites) = &opts.sites {
            builder = builder.site_profiles(SiteProfiles::from_path(sites)?);
        }
        let mut crawler = builder.build()?;
        let store = ReportStore::new(&opts.output_dir);

        tokio::select! {
            res = crawler.run(&store) => match res {
                Ok((report, path)) => {
                    println!("{}", report);
                    info!("Appended report to {:?}", path);
                }
                Err(err) => match err.downcast_ref::<SpotlightError>() {
                    Some(SpotlightError::EmptyCorpus) => eprintln!("{}", relax_hint(relaxation)),
                    _ => return Err(err),
                },
            },
            _ = tokio::signal::ctrl_c() => println!("User interrupt"),
        }

        Ok(())
    }
}

#[derive(Debug, Clone, StructOpt)]
pub struct Opts {
    #[structopt(
        long = "sites",
        help = "Json file with the css classes per site, replaces the builtin table.",
        parse(from_os_str)
    )]
    sites: Option<PathBuf>,
    #[structopt(
        long = "output-dir",
        help = "Directory of the <site>.txt report files.",
        default_value = ".",
        parse(from_os_str)
    )]
    output_dir: PathBuf,
    #[structopt(long = "timeout", help = "Timeout for requests in seconds.")]
    timeout: Option<u64>,
    #[structopt(long = "user-agent", help = "The user-agent used for requests.")]
    user_agent: Option<String>,
}

impl Opts {
    fn as_config(&self) -> Config {
        let mut config = Config::builder();
        if let Some(timeout) = self.timeout {
            config = config.request_timeout(Duration::from_secs(timeout));
        }
        if let Some(user_agent) = self.user_agent.clone() {
            config = config.browser_user_agent(user_agent);
        }
        config.build()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mut logger = pretty_env_logger::formatted_timed_builder();
    logger.filter_level(LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        logger.parse_filters(&filters);
    }
    logger.init();

    App::from_args().run().await
}
