use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::settings::Settings;

/// Why a request produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// A successfully retrieved page (status < 400).
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// Single-attempt HTTP access. Implementors report failures through
/// `get`/`head`; callers use `fetch`/`probe`, which collapse every failure
/// to absent/false.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET with body. Statuses >= 400 are errors.
    async fn get(&self, url: &str) -> Result<Page, FetchError>;

    /// HEAD without following redirects. Returns the status when < 400.
    async fn head(&self, url: &str) -> Result<u16, FetchError>;

    async fn fetch(&self, url: &str) -> Option<Page> {
        match self.get(url).await {
            Ok(page) => Some(page),
            Err(e) => {
                debug!(url, error = %e, "fetch failed");
                None
            }
        }
    }

    async fn probe(&self, url: &str) -> bool {
        match self.head(url).await {
            Ok(_) => true,
            Err(e) => {
                debug!(url, error = %e, "probe failed");
                false
            }
        }
    }
}

fn check_status(status: reqwest::StatusCode) -> Result<u16, FetchError> {
    let code = status.as_u16();
    if code < 400 {
        Ok(code)
    } else {
        Err(FetchError::Status(code))
    }
}

pub struct HttpFetcher {
    client: reqwest::Client,
    probe_client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;
        let probe_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Failed to create probe client")?;
        Ok(Self {
            client,
            probe_client,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.timeout(), &settings.user_agent)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<Page, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = check_status(response.status())?;
        let final_url = response.url().to_string();
        let body = response.text().await?;
        Ok(Page {
            url: final_url,
            status,
            body,
        })
    }

    async fn head(&self, url: &str) -> Result<u16, FetchError> {
        let response = self.probe_client.head(url).send().await?;
        check_status(response.status())
    }
}

// ── Test support ──

#[cfg(test)]
pub mod testing {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use super::*;

    /// In-memory fetcher: URLs not registered fail with a transport error.
    #[derive(Default)]
    pub struct StubFetcher {
        pages: HashMap<String, (u16, String)>,
        head_only: HashSet<String>,
        requests: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), (200, body.to_string()));
            self
        }

        pub fn status(mut self, url: &str, status: u16) -> Self {
            self.pages.insert(url.to_string(), (status, String::new()));
            self
        }

        /// Answers HEAD with 200 but times out on GET.
        pub fn head_only(mut self, url: &str) -> Self {
            self.pages.insert(url.to_string(), (200, String::new()));
            self.head_only.insert(url.to_string());
            self
        }

        pub fn requested(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        fn lookup(&self, url: &str) -> Result<(u16, String), FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            let (status, body) = self
                .pages
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Transport(format!("no route to {}", url)))?;
            if status >= 400 {
                return Err(FetchError::Status(status));
            }
            Ok((status, body))
        }
    }

    #[async_trait]
    impl Fetcher for StubFetcher {
        async fn get(&self, url: &str) -> Result<Page, FetchError> {
            let (status, body) = self.lookup(url)?;
            if self.head_only.contains(url) {
                return Err(FetchError::Timeout);
            }
            Ok(Page {
                url: url.to_string(),
                status,
                body,
            })
        }

        async fn head(&self, url: &str) -> Result<u16, FetchError> {
            self.lookup(url).map(|(status, _)| status)
        }
    }
}
