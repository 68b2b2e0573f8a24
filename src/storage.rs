use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::crawler::CrawlReport;
use crate::link::site_identifier;

/// Appends crawl reports to one text file per site.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    pub fn new<T: AsRef<Path>>(dir: T) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// `<dir>/<site>.txt`, e.g. `theguardian.txt` for `https://www.theguardian.com/uk`.
    pub fn path_for(&self, url: &Url) -> PathBuf {
        self.dir.join(format!("{}.txt", site_identifier(url)))
    }

    /// Append the rendered report in a single write and return the file it
    /// was written to.
    pub async fn append(&self, report: &CrawlReport) -> Result<PathBuf> {
        let path = self.path_for(&report.url);
        let block = report.to_string();

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to open {:?}", path))?;
        file.write_all(block.as_bytes())
            .await
            .with_context(|| format!("Failed to write report to {:?}", path))?;
        file.flush().await?;

        Ok(path)
    }
}
