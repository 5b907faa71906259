use tracing::debug;

use crate::fetcher::Fetcher;

/// Guesses a company's website by probing `https://{name}.{tld}` for each
/// candidate TLD in order.
pub struct DomainGuesser {
    tlds: Vec<String>,
}

impl DomainGuesser {
    pub fn new(tlds: Vec<String>) -> Self {
        Self { tlds }
    }

    /// Candidate URLs in probe order. Empty when the name has no usable text.
    pub fn candidates(&self, company: &str) -> Vec<String> {
        let host = company.to_lowercase().replace(' ', "");
        if host.is_empty() {
            return Vec::new();
        }
        self.tlds
            .iter()
            .map(|tld| format!("https://{}.{}", host, tld))
            .collect()
    }

    /// First candidate that answers a probe, or an empty string.
    pub async fn guess(&self, fetcher: &dyn Fetcher, company: &str) -> String {
        for url in self.candidates(company) {
            if fetcher.probe(&url).await {
                debug!(company, url = %url, "website guessed");
                return url;
            }
        }
        String::new()
    }
}

/// LinkedIn company page synthesized from the display name. Never validated.
pub fn linkedin_url(company: &str) -> String {
    if company.is_empty() {
        return String::new();
    }
    format!(
        "https://www.linkedin.com/company/{}/",
        company.to_lowercase().replace(' ', "-")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::testing::StubFetcher;
    use crate::settings::Heuristics;

    fn guesser() -> DomainGuesser {
        DomainGuesser::new(Heuristics::default().tlds)
    }

    #[test]
    fn candidates_strip_spaces_and_lowercase() {
        let c = guesser().candidates("Blue Bottle");
        assert_eq!(c[0], "https://bluebottle.com");
        assert_eq!(c[5], "https://bluebottle.co");
    }

    #[tokio::test]
    async fn earliest_tld_wins() {
        let stub = StubFetcher::new()
            .page("https://acme.io", "")
            .page("https://acme.com", "");
        assert_eq!(guesser().guess(&stub, "Acme").await, "https://acme.com");
        assert_eq!(stub.requested(), ["https://acme.com"]);
    }

    #[tokio::test]
    async fn falls_through_failed_probes() {
        let stub = StubFetcher::new()
            .status("https://acme.com", 404)
            .page("https://acme.ai", "");
        assert_eq!(guesser().guess(&stub, "Acme").await, "https://acme.ai");
        assert_eq!(stub.requested().len(), 4);
    }

    #[tokio::test]
    async fn nothing_resolves() {
        let stub = StubFetcher::new();
        assert_eq!(guesser().guess(&stub, "Acme").await, "");
        assert_eq!(stub.requested().len(), 6);
    }

    #[tokio::test]
    async fn blank_name_probes_nothing() {
        let stub = StubFetcher::new();
        assert_eq!(guesser().guess(&stub, "   ").await, "");
        assert!(stub.requested().is_empty());
    }

    #[test]
    fn linkedin_slug_uses_hyphens() {
        assert_eq!(
            linkedin_url("Blue Bottle Coffee"),
            "https://www.linkedin.com/company/blue-bottle-coffee/"
        );
        assert_eq!(linkedin_url(""), "");
    }
}
