use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::ats::AtsClassifier;
use crate::careers::CareersLocator;
use crate::domain::{self, DomainGuesser};
use crate::fetcher::Fetcher;
use crate::jobs::{JobExtractor, JobPosting, JOB_SLOTS};
use crate::settings::Heuristics;

/// Everything inferred about one company. `jobs` always holds exactly
/// [`JOB_SLOTS`] entries, padded with empty postings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyResult {
    pub company_name: String,
    pub website_url: String,
    pub linkedin_url: String,
    pub careers_url: String,
    pub jobs_listing_url: String,
    pub provider: String,
    pub jobs: Vec<JobPosting>,
}

impl CompanyResult {
    pub fn found_jobs(&self) -> usize {
        self.jobs.iter().filter(|j| !j.is_empty()).count()
    }
}

pub fn pad_jobs(mut jobs: Vec<JobPosting>) -> Vec<JobPosting> {
    jobs.truncate(JOB_SLOTS);
    jobs.resize_with(JOB_SLOTS, JobPosting::default);
    jobs
}

/// Linear best-effort composition: every step tolerates an empty upstream
/// value and degrades to empty fields.
pub struct CompanyPipeline {
    fetcher: Box<dyn Fetcher>,
    guesser: DomainGuesser,
    careers: CareersLocator,
    ats: AtsClassifier,
    jobs: JobExtractor,
}

impl CompanyPipeline {
    pub fn new(fetcher: Box<dyn Fetcher>, heuristics: &Heuristics) -> Result<Self> {
        Ok(Self {
            fetcher,
            guesser: DomainGuesser::new(heuristics.tlds.clone()),
            careers: CareersLocator::new(heuristics.careers_keywords.clone()),
            ats: AtsClassifier::new(heuristics.ats_signatures.clone()),
            jobs: JobExtractor::new(&heuristics.job_title_keywords)?,
        })
    }

    pub async fn process(&self, company: &str) -> CompanyResult {
        let name = company.trim().to_string();
        let linkedin_url = domain::linkedin_url(&name);

        let website_url = self.guesser.guess(self.fetcher.as_ref(), &name).await;

        let mut careers_url = String::new();
        if !website_url.is_empty() {
            if let Some(home) = self.fetcher.fetch(&website_url).await {
                debug!(url = %home.url, status = home.status, "homepage fetched");
                careers_url = self.careers.find(&website_url, &home.body);
            }
        }

        let jobs_listing_url = if !careers_url.is_empty() {
            careers_url.clone()
        } else {
            website_url.clone()
        };
        let provider = self.ats.detect(&jobs_listing_url);

        let jobs = if jobs_listing_url.is_empty() {
            Vec::new()
        } else {
            self.jobs
                .extract(self.fetcher.as_ref(), &jobs_listing_url)
                .await
        };

        let result = CompanyResult {
            company_name: name,
            website_url,
            linkedin_url,
            careers_url,
            jobs_listing_url,
            provider,
            jobs: pad_jobs(jobs),
        };
        info!(
            company = %result.company_name,
            website = %result.website_url,
            careers = %result.careers_url,
            provider = %result.provider,
            jobs = result.found_jobs(),
            "processed"
        );
        result
    }
}
