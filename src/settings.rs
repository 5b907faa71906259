use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

const CONFIG_FILE: &str = "scout";
const ENV_PREFIX: &str = "SCOUT";

/// Runtime settings: defaults, then `scout.toml`, then `SCOUT_*` env vars.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub db_path: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Pause between companies in a batch run.
    pub delay_ms: u64,
    pub batch_count: usize,
    pub heuristics: Heuristics,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: "data/careers.sqlite".into(),
            timeout_secs: 15,
            user_agent: "Mozilla/5.0".into(),
            delay_ms: 800,
            batch_count: 800,
            heuristics: Heuristics::default(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Keyword lists and signatures that drive the inference heuristics.
///
/// Order matters everywhere: TLDs are tried in sequence, and the first
/// matching keyword/signature wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    pub careers_keywords: Vec<String>,
    pub tlds: Vec<String>,
    pub job_title_keywords: Vec<String>,
    pub ats_signatures: Vec<AtsSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AtsSignature {
    pub name: String,
    pub pattern: String,
}

impl AtsSignature {
    pub fn new(name: &str, pattern: &str) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
        }
    }
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            careers_keywords: strings(&["career", "careers", "jobs", "join"]),
            tlds: strings(&["com", "org", "io", "ai", "net", "co"]),
            job_title_keywords: strings(&[
                "engineer",
                "manager",
                "developer",
                "analyst",
                "designer",
                "specialist",
                "intern",
                "consultant",
                "coordinator",
                "technician",
            ]),
            ats_signatures: vec![
                AtsSignature::new("Personio", "personio.com"),
                AtsSignature::new("Teamtailor", "teamtailor.com"),
                AtsSignature::new("Zoho Recruit", "zohorecruit.com"),
                AtsSignature::new("Lever", "lever.co"),
                AtsSignature::new("Greenhouse", "greenhouse.io"),
            ],
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_tld_order() {
        let h = Heuristics::default();
        assert_eq!(h.tlds, ["com", "org", "io", "ai", "net", "co"]);
        assert_eq!(h.ats_signatures[0].name, "Personio");
        assert_eq!(h.ats_signatures.len(), 5);
        assert_eq!(h.job_title_keywords.len(), 10);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from_str(
                "timeout_secs = 5\n[heuristics]\ntlds = [\"io\"]\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.timeout(), Duration::from_secs(5));
        assert_eq!(settings.user_agent, "Mozilla/5.0");
        assert_eq!(settings.heuristics.tlds, ["io"]);
        assert_eq!(settings.heuristics.careers_keywords.len(), 4);
    }
}
