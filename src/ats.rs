use crate::settings::AtsSignature;

pub const INTERNAL: &str = "Internal";

/// Maps a URL to the applicant-tracking system hosting it.
pub struct AtsClassifier {
    signatures: Vec<AtsSignature>,
}

impl AtsClassifier {
    pub fn new(signatures: Vec<AtsSignature>) -> Self {
        Self { signatures }
    }

    /// Name of the first signature contained in `url`, `"Internal"` when a
    /// non-empty URL matches none, empty for an empty URL.
    pub fn detect(&self, url: &str) -> String {
        if url.is_empty() {
            return String::new();
        }
        self.signatures
            .iter()
            .find(|sig| url.contains(sig.pattern.as_str()))
            .map(|sig| sig.name.clone())
            .unwrap_or_else(|| INTERNAL.to_string())
    }
}
