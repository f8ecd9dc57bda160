//! Organisation Page Scraping
//!
//! Fetches candidate organisation home pages and extracts social media
//! profile links by pattern. The first responsive domain wins; every
//! fetched page is cached, including known-empty results, so dead domains
//! are not re-tried within the TTL.

use crate::services::{CacheStore, RateLimiter};
use crate::types::{ContactIdentity, EvidenceFragment, ResearchSource, SourceError, SourceHints};
use regex::Regex;
use std::sync::Arc;

/// Candidate domains tried per organisation
const MAX_CANDIDATE_PAGES: usize = 3;

/// Organisation home-page scraper
pub struct PageScraper {
    cache: Arc<CacheStore>,
    limiter: Arc<RateLimiter>,
    client: reqwest::Client,
    /// (platform, handle-capturing pattern) pairs, compiled once
    social_patterns: Vec<(&'static str, Regex)>,
}

impl PageScraper {
    pub fn new(cache: Arc<CacheStore>, limiter: Arc<RateLimiter>, client: reqwest::Client) -> Self {
        // Patterns capture the profile handle; compile failures are
        // programmer errors caught by the constructor test below.
        let social_patterns = [
            ("linkedin", r"linkedin\.com/in/([A-Za-z0-9_-]+)"),
            ("twitter", r"twitter\.com/([A-Za-z0-9_]+)"),
            ("facebook", r"facebook\.com/([A-Za-z0-9.]+)"),
            ("instagram", r"instagram\.com/([A-Za-z0-9_.]+)"),
        ]
        .into_iter()
        .filter_map(|(platform, pattern)| Regex::new(pattern).ok().map(|re| (platform, re)))
        .collect();

        Self {
            cache,
            limiter,
            client,
            social_patterns,
        }
    }

    /// Candidate home-page URLs for an organisation name
    pub fn candidate_urls(organization: &str) -> Vec<String> {
        let slug: String = organization
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        if slug.is_empty() {
            return Vec::new();
        }

        ["org.au", "com.au", "gov.au"]
            .iter()
            .map(|suffix| format!("https://www.{}.{}", slug, suffix))
            .collect()
    }

    /// Extract the first handle per platform from page markup
    fn extract_social_links(&self, body: &str) -> Vec<EvidenceFragment> {
        self.social_patterns
            .iter()
            .filter_map(|(platform, pattern)| {
                pattern.captures(body).map(|captures| {
                    let handle = captures[1].to_string();
                    EvidenceFragment::SocialProfile {
                        platform: platform.to_string(),
                        url: Some(format!("https://{}", &captures[0])),
                        handle,
                    }
                })
            })
            .collect()
    }

    async fn fetch(&self, url: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Api(status.as_u16(), url.to_string()));
        }

        response
            .text()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))
    }
}

#[async_trait::async_trait]
impl ResearchSource for PageScraper {
    fn name(&self) -> &'static str {
        "page_scraper"
    }

    fn uses_network(&self) -> bool {
        true
    }

    async fn lookup(
        &self,
        identity: &ContactIdentity,
        hints: &SourceHints,
    ) -> Vec<EvidenceFragment> {
        let organization = hints.get("organization").map(String::as_str).unwrap_or("");
        if organization.is_empty() {
            return Vec::new();
        }

        for url in Self::candidate_urls(organization)
            .into_iter()
            .take(MAX_CANDIDATE_PAGES)
        {
            let key = CacheStore::key(self.name(), identity, &url);
            if let Some(cached) = self.cache.get(&key) {
                if cached.is_empty() {
                    // Known dead or linkless page; try the next candidate
                    continue;
                }
                return cached;
            }

            self.limiter.reserve().await;
            match self.fetch(&url).await {
                Ok(body) => {
                    let fragments = self.extract_social_links(&body);
                    self.cache.set(&key, &fragments);
                    if !fragments.is_empty() {
                        return fragments;
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        source = self.name(),
                        url = %url,
                        error = %e,
                        "Candidate page fetch failed, trying next"
                    );
                    self.cache.set(&key, &[]);
                }
            }
        }

        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn scraper() -> PageScraper {
        let dir = tempfile::tempdir().unwrap();
        PageScraper::new(
            Arc::new(CacheStore::new(dir.path(), Duration::hours(24))),
            Arc::new(RateLimiter::new(30, 500)),
            reqwest::Client::new(),
        )
    }

    #[test]
    fn test_all_social_patterns_compile() {
        assert_eq!(scraper().social_patterns.len(), 4);
    }

    #[test]
    fn test_candidate_urls_slugified() {
        let urls = PageScraper::candidate_urls("Justice Reform Initiative");
        assert_eq!(urls[0], "https://www.justicereforminitiative.org.au");
        assert_eq!(urls.len(), 3);
        assert!(PageScraper::candidate_urls("  ").is_empty());
    }

    #[test]
    fn test_extracts_first_handle_per_platform() {
        let body = r#"
            <a href="https://www.linkedin.com/in/jane-doe">LinkedIn</a>
            <a href="https://twitter.com/justiceorg">Twitter</a>
            <a href="https://twitter.com/second_account">Other</a>
        "#;
        let fragments = scraper().extract_social_links(body);
        assert_eq!(fragments.len(), 2);
        assert!(fragments.iter().any(|f| matches!(
            f,
            EvidenceFragment::SocialProfile { platform, handle, .. }
                if platform == "linkedin" && handle == "jane-doe"
        )));
        assert!(fragments.iter().any(|f| matches!(
            f,
            EvidenceFragment::SocialProfile { platform, handle, .. }
                if platform == "twitter" && handle == "justiceorg"
        )));
    }

    #[test]
    fn test_plain_page_yields_nothing() {
        assert!(scraper().extract_social_links("<html>no links</html>").is_empty());
    }
}
