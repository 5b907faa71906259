use anyhow::{bail, Result};
use regex::Regex;
use serde::Serialize;

use crate::fetcher::Fetcher;
use crate::html;

/// Job slots per company in the output schema.
pub const JOB_SLOTS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobPosting {
    pub url: String,
    pub title: String,
    pub location: String,
    pub posted_date: String,
}

impl JobPosting {
    pub fn is_empty(&self) -> bool {
        self.url.is_empty() && self.title.is_empty()
    }
}

/// Pulls job-title-shaped anchors off a listings page.
pub struct JobExtractor {
    title_re: Regex,
}

impl JobExtractor {
    pub fn new(title_keywords: &[String]) -> Result<Self> {
        if title_keywords.is_empty() {
            bail!("job title keyword list is empty");
        }
        let alternation = title_keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let title_re = Regex::new(&format!("(?i)({})", alternation))?;
        Ok(Self { title_re })
    }

    pub fn is_job_title(&self, text: &str) -> bool {
        self.title_re.is_match(text)
    }

    /// Fetches `listings_url` and returns up to [`JOB_SLOTS`] postings.
    pub async fn extract(&self, fetcher: &dyn Fetcher, listings_url: &str) -> Vec<JobPosting> {
        match fetcher.fetch(listings_url).await {
            Some(page) => self.extract_from_html(listings_url, &page.body),
            None => Vec::new(),
        }
    }

    /// The first matching anchors in document order; not ranked.
    pub fn extract_from_html(&self, listings_url: &str, listings_html: &str) -> Vec<JobPosting> {
        let mut jobs = Vec::new();
        for anchor in html::anchors(listings_html) {
            if anchor.text.is_empty() || !self.is_job_title(&anchor.text) {
                continue;
            }
            if anchor.href.is_empty() {
                continue;
            }
            jobs.push(JobPosting {
                url: html::resolve(listings_url, &anchor.href),
                title: anchor.text,
                ..Default::default()
            });
            if jobs.len() >= JOB_SLOTS {
                break;
            }
        }
        jobs
    }
}
