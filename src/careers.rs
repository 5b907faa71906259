use crate::html;

/// Finds the careers page link on a homepage.
pub struct CareersLocator {
    keywords: Vec<String>,
}

impl CareersLocator {
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// First anchor whose href or text contains a careers keyword, resolved
    /// against `base_url`. No ranking between matches.
    pub fn find(&self, base_url: &str, homepage_html: &str) -> String {
        for anchor in html::anchors(homepage_html) {
            let href = anchor.href.trim();
            let href_lc = href.to_lowercase();
            let text_lc = anchor.text.to_lowercase();
            if self
                .keywords
                .iter()
                .any(|kw| href_lc.contains(kw.as_str()) || text_lc.contains(kw.as_str()))
            {
                return html::resolve(base_url, href);
            }
        }
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Heuristics;

    fn locator() -> CareersLocator {
        CareersLocator::new(Heuristics::default().careers_keywords)
    }

    #[test]
    fn first_match_in_document_order() {
        let html = r#"
            <a href="/about">About</a>
            <a href="/work-with-us">Join us</a>
            <a href="/careers">Careers</a>"#;
        assert_eq!(
            locator().find("https://acme.com", html),
            "https://acme.com/work-with-us"
        );
    }

    #[test]
    fn matches_on_href_alone() {
        let html = r#"<a href="https://acme.teamtailor.com/jobs"><img src="x.png"></a>"#;
        assert_eq!(
            locator().find("https://acme.com", html),
            "https://acme.teamtailor.com/jobs"
        );
    }

    #[test]
    fn text_match_is_case_insensitive() {
        let html = r#"<a href=" /team ">OPEN JOBS</a>"#;
        assert_eq!(locator().find("https://acme.com", html), "https://acme.com/team");
    }

    #[test]
    fn substring_keywords_catch_incidental_links() {
        // "join" inside "joinery" still matches
        let html = r#"<a href="/products/joinery">Products</a><a href="/careers">Careers</a>"#;
        assert_eq!(
            locator().find("https://acme.com", html),
            "https://acme.com/products/joinery"
        );
    }

    #[test]
    fn empty_href_resolves_to_homepage() {
        let html = r#"<a href="">Careers</a>"#;
        assert_eq!(locator().find("https://acme.com", html), "https://acme.com");
    }

    #[test]
    fn no_match_is_empty() {
        let html = r#"<a href="/about">About</a><a href="/contact">Contact</a>"#;
        assert_eq!(locator().find("https://acme.com", html), "");
        assert_eq!(locator().find("https://acme.com", ""), "");
    }

    #[test]
    fn custom_keywords() {
        let l = CareersLocator::new(vec!["Karriere".into()]);
        let html = r#"<a href="/careers">Careers</a><a href="/de/karriere">Stellen</a>"#;
        assert_eq!(l.find("https://acme.de", html), "https://acme.de/de/karriere");
    }
}
