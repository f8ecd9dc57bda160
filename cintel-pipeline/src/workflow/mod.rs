//! Enrichment workflow: source assembly, orchestration, checkpointing

pub mod checkpoint;
pub mod orchestrator;

pub use checkpoint::Checkpoint;
pub use orchestrator::EnrichmentOrchestrator;

use crate::config::PipelineConfig;
use crate::services::{CacheStore, RateLimiter};
use crate::sources::{
    EmailFinder, MentionResearcher, NarrativeAnalyzer, PageScraper, ProfileResearcher,
};
use crate::types::ResearchSource;
use cintel_common::{Error, Result};
use std::sync::Arc;
use std::time::Duration;

/// User agent sent with every outbound research request
const USER_AGENT: &str = "CIntel-Research/0.1 (educational/non-profit research)";

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the shared HTTP client used by every network-bound source
pub fn build_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| Error::Internal(format!("HTTP client construction failed: {}", e)))
}

/// Instantiate the enabled research sources in declared order:
/// address discovery, profile research, mention research, page scraping,
/// narrative analysis.
pub fn build_sources(
    config: &PipelineConfig,
    cache: Arc<CacheStore>,
    limiter: Arc<RateLimiter>,
    client: reqwest::Client,
) -> Vec<Box<dyn ResearchSource>> {
    let mut sources: Vec<Box<dyn ResearchSource>> = Vec::new();

    if config.enable_email_finder {
        sources.push(Box::new(EmailFinder::new(
            cache.clone(),
            limiter.clone(),
            client.clone(),
            config.email_finder_api_url.clone(),
            config.email_finder_api_key.clone(),
        )));
    }
    if config.enable_profile_research {
        sources.push(Box::new(ProfileResearcher::new(
            cache.clone(),
            limiter.clone(),
            client.clone(),
            config.profile_api_url.clone(),
            config.profile_api_key.clone(),
        )));
    }
    if config.enable_mention_research {
        sources.push(Box::new(MentionResearcher::new(
            cache.clone(),
            limiter.clone(),
            client.clone(),
            config.mention_api_url.clone(),
            config.mention_api_key.clone(),
            config.focus_terms.clone(),
        )));
    }
    if config.enable_page_scraping {
        sources.push(Box::new(PageScraper::new(
            cache.clone(),
            limiter.clone(),
            client.clone(),
        )));
    }
    if config.enable_narrative_analysis {
        sources.push(Box::new(NarrativeAnalyzer::new(
            cache,
            limiter,
            client,
            config.narrative_api_url.clone(),
            config.narrative_api_key.clone(),
            config.narrative_model.clone(),
        )));
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use std::path::PathBuf;

    #[test]
    fn test_sources_built_in_declared_order() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::defaults(&PathBuf::from(dir.path()));
        let cache = Arc::new(CacheStore::new(dir.path(), ChronoDuration::hours(24)));
        let limiter = Arc::new(RateLimiter::new(30, 500));
        let client = build_http_client().unwrap();

        let sources = build_sources(&config, cache, limiter, client);
        let names: Vec<_> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "email_finder",
                "profile_researcher",
                "mention_researcher",
                "page_scraper",
                "narrative_analyzer",
            ]
        );
    }

    #[test]
    fn test_disabled_sources_are_not_built() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PipelineConfig::defaults(&PathBuf::from(dir.path()));
        config.enable_profile_research = false;
        config.enable_page_scraping = false;

        let cache = Arc::new(CacheStore::new(dir.path(), ChronoDuration::hours(24)));
        let limiter = Arc::new(RateLimiter::new(30, 500));
        let client = build_http_client().unwrap();

        let sources = build_sources(&config, cache, limiter, client);
        let names: Vec<_> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["email_finder", "mention_researcher", "narrative_analyzer"]
        );
    }
}
