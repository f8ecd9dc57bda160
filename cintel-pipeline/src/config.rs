//! Pipeline Configuration
//!
//! One immutable `PipelineConfig` value is assembled at startup from
//! compiled defaults ← optional TOML config file ← `CINTEL_*` environment
//! variables ← CLI flags, then passed by reference into every component.
//! Nothing re-reads ambient environment state mid-run.
//!
//! Every setting has a working default: with zero credentials the pipeline
//! runs in degraded mode (pattern-based address discovery and the heuristic
//! narrative only, everything else consulted-but-empty).

use cintel_common::config::ConfigFile;
use std::path::{Path, PathBuf};

/// Default dual-window rate caps (requests per minute / per hour)
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 30;
pub const DEFAULT_REQUESTS_PER_HOUR: u32 = 500;

/// Default cache entry time-to-live
pub const DEFAULT_CACHE_TTL_HOURS: u64 = 24;

/// Contacts between checkpoint flushes
pub const DEFAULT_CHECKPOINT_INTERVAL: usize = 10;

/// Immutable pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    // Rate limiting
    pub requests_per_minute: u32,
    pub requests_per_hour: u32,

    // Cache
    pub cache_dir: PathBuf,
    pub cache_ttl_hours: u64,

    // Persistence
    pub checkpoint_path: PathBuf,
    pub checkpoint_interval: usize,
    pub output_dir: PathBuf,

    // Research source enable flags
    pub enable_email_finder: bool,
    pub enable_profile_research: bool,
    pub enable_mention_research: bool,
    pub enable_page_scraping: bool,
    pub enable_narrative_analysis: bool,

    // Source endpoints and credentials (all optional; absent = degraded)
    pub email_finder_api_url: String,
    pub email_finder_api_key: Option<String>,
    pub profile_api_url: Option<String>,
    pub profile_api_key: Option<String>,
    pub mention_api_url: Option<String>,
    pub mention_api_key: Option<String>,
    pub narrative_api_url: Option<String>,
    pub narrative_api_key: Option<String>,
    pub narrative_model: String,

    /// Focus terms appended to mention queries
    pub focus_terms: String,
}

impl PipelineConfig {
    /// Compiled defaults rooted at a data directory
    pub fn defaults(data_dir: &Path) -> Self {
        Self {
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            requests_per_hour: DEFAULT_REQUESTS_PER_HOUR,
            cache_dir: data_dir.join("research_cache"),
            cache_ttl_hours: DEFAULT_CACHE_TTL_HOURS,
            checkpoint_path: data_dir.join("enrichment_checkpoint.json"),
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            output_dir: data_dir.join("strategic_analysis"),
            enable_email_finder: true,
            enable_profile_research: true,
            enable_mention_research: true,
            enable_page_scraping: true,
            enable_narrative_analysis: true,
            email_finder_api_url: "https://api.hunter.io/v2/email-finder".to_string(),
            email_finder_api_key: None,
            profile_api_url: None,
            profile_api_key: None,
            mention_api_url: None,
            mention_api_key: None,
            narrative_api_url: None,
            narrative_api_key: None,
            narrative_model: "gpt-3.5-turbo".to_string(),
            focus_terms: "youth justice".to_string(),
        }
    }

    /// Apply values from the optional config file
    pub fn apply_file(mut self, file: &ConfigFile) -> Self {
        if let Some(ref dir) = file.cache_dir {
            self.cache_dir = dir.clone();
        }
        if let Some(ttl) = file.cache_ttl_hours {
            self.cache_ttl_hours = ttl;
        }
        if let Some(rpm) = file.requests_per_minute {
            self.requests_per_minute = rpm;
        }
        if let Some(rph) = file.requests_per_hour {
            self.requests_per_hour = rph;
        }
        if let Some(ref dir) = file.output_dir {
            self.output_dir = dir.clone();
        }
        self
    }

    /// Apply `CINTEL_*` environment variables (read exactly once, here)
    pub fn apply_env(mut self) -> Self {
        if let Some(rpm) = env_u32("CINTEL_REQUESTS_PER_MINUTE") {
            self.requests_per_minute = rpm;
        }
        if let Some(rph) = env_u32("CINTEL_REQUESTS_PER_HOUR") {
            self.requests_per_hour = rph;
        }
        if let Some(ttl) = env_u32("CINTEL_CACHE_TTL_HOURS") {
            self.cache_ttl_hours = ttl as u64;
        }
        if let Some(dir) = env_string("CINTEL_CACHE_DIR") {
            self.cache_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env_string("CINTEL_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(path) = env_string("CINTEL_CHECKPOINT_PATH") {
            self.checkpoint_path = PathBuf::from(path);
        }

        if let Some(flag) = env_bool("CINTEL_ENABLE_EMAIL_FINDER") {
            self.enable_email_finder = flag;
        }
        if let Some(flag) = env_bool("CINTEL_ENABLE_PROFILE_RESEARCH") {
            self.enable_profile_research = flag;
        }
        if let Some(flag) = env_bool("CINTEL_ENABLE_MENTION_RESEARCH") {
            self.enable_mention_research = flag;
        }
        if let Some(flag) = env_bool("CINTEL_ENABLE_PAGE_SCRAPING") {
            self.enable_page_scraping = flag;
        }
        if let Some(flag) = env_bool("CINTEL_ENABLE_NARRATIVE_ANALYSIS") {
            self.enable_narrative_analysis = flag;
        }

        if let Some(url) = env_string("CINTEL_EMAIL_FINDER_API_URL") {
            self.email_finder_api_url = url;
        }
        self.email_finder_api_key =
            env_string("CINTEL_EMAIL_FINDER_API_KEY").or(self.email_finder_api_key);
        self.profile_api_url = env_string("CINTEL_PROFILE_API_URL").or(self.profile_api_url);
        self.profile_api_key = env_string("CINTEL_PROFILE_API_KEY").or(self.profile_api_key);
        self.mention_api_url = env_string("CINTEL_MENTION_API_URL").or(self.mention_api_url);
        self.mention_api_key = env_string("CINTEL_MENTION_API_KEY").or(self.mention_api_key);
        self.narrative_api_url = env_string("CINTEL_NARRATIVE_API_URL").or(self.narrative_api_url);
        self.narrative_api_key = env_string("CINTEL_NARRATIVE_API_KEY").or(self.narrative_api_key);
        if let Some(model) = env_string("CINTEL_NARRATIVE_MODEL") {
            self.narrative_model = model;
        }
        if let Some(terms) = env_string("CINTEL_FOCUS_TERMS") {
            self.focus_terms = terms;
        }

        self
    }

    /// Disable every research source (scoring-only / offline run)
    pub fn offline(mut self) -> Self {
        self.enable_email_finder = false;
        self.enable_profile_research = false;
        self.enable_mention_research = false;
        self.enable_page_scraping = false;
        self.enable_narrative_analysis = false;
        self
    }

    /// Names of the enabled sources in declared order (for log lines)
    pub fn enabled_sources(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.enable_email_finder {
            names.push("email_finder");
        }
        if self.enable_profile_research {
            names.push("profile_researcher");
        }
        if self.enable_mention_research {
            names.push("mention_researcher");
        }
        if self.enable_page_scraping {
            names.push("page_scraper");
        }
        if self.enable_narrative_analysis {
            names.push("narrative_analyzer");
        }
        names
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_u32(name: &str) -> Option<u32> {
    let raw = env_string(name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "Ignoring non-numeric environment value");
            None
        }
    }
}

fn env_bool(name: &str) -> Option<bool> {
    let raw = env_string(name)?.to_lowercase();
    match raw.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            tracing::warn!(var = name, value = %raw, "Ignoring non-boolean environment value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_every_source() {
        let config = PipelineConfig::defaults(&PathBuf::from("/data"));
        assert_eq!(config.enabled_sources().len(), 5);
        assert_eq!(config.requests_per_minute, 30);
        assert_eq!(config.requests_per_hour, 500);
        assert_eq!(config.cache_ttl_hours, 24);
        assert_eq!(config.cache_dir, PathBuf::from("/data/research_cache"));
    }

    #[test]
    fn test_offline_disables_every_source() {
        let config = PipelineConfig::defaults(&PathBuf::from("/data")).offline();
        assert!(config.enabled_sources().is_empty());
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let file = ConfigFile {
            requests_per_minute: Some(5),
            output_dir: Some(PathBuf::from("/reports")),
            ..Default::default()
        };
        let config = PipelineConfig::defaults(&PathBuf::from("/data")).apply_file(&file);
        assert_eq!(config.requests_per_minute, 5);
        assert_eq!(config.output_dir, PathBuf::from("/reports"));
        // Untouched values keep their defaults
        assert_eq!(config.requests_per_hour, 500);
    }
}
