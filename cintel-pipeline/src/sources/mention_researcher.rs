//! Media Mention Research
//!
//! Searches a news index for coverage naming the contact alongside the
//! campaign focus terms and converts each article into a mention fragment
//! with a sentiment polarity and publication timestamp.

use super::sentiment;
use crate::services::{CacheStore, RateLimiter};
use crate::types::{ContactIdentity, EvidenceFragment, ResearchSource, SourceError, SourceHints};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

/// Mentions kept per contact
const MAX_MENTIONS: usize = 10;

/// News mention search source
pub struct MentionResearcher {
    cache: Arc<CacheStore>,
    limiter: Arc<RateLimiter>,
    client: reqwest::Client,
    api_url: Option<String>,
    api_key: Option<String>,
    /// Focus terms appended to every query (e.g. "youth justice")
    focus_terms: String,
}

impl MentionResearcher {
    pub fn new(
        cache: Arc<CacheStore>,
        limiter: Arc<RateLimiter>,
        client: reqwest::Client,
        api_url: Option<String>,
        api_key: Option<String>,
        focus_terms: String,
    ) -> Self {
        Self {
            cache,
            limiter,
            client,
            api_url,
            api_key,
            focus_terms,
        }
    }

    async fn search(&self, name: &str) -> Result<Vec<EvidenceFragment>, SourceError> {
        let api_url = self.api_url.as_deref().ok_or(SourceError::NoCredentials)?;

        let query = format!("\"{}\" {}", name, self.focus_terms);
        let mut request = self.client.get(api_url).query(&[("q", query.as_str())]);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api(status.as_u16(), body));
        }

        let parsed: MentionResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(parsed
            .articles
            .into_iter()
            .take(MAX_MENTIONS)
            .filter_map(Self::fragment_from_article)
            .collect())
    }

    fn fragment_from_article(article: Article) -> Option<EvidenceFragment> {
        let text = article
            .summary
            .filter(|s| !s.trim().is_empty())
            .or(article.title)?;

        let published = article
            .published
            .as_deref()
            .and_then(|p| DateTime::parse_from_rfc3339(p).ok())
            .map(|p| p.with_timezone(&Utc));

        Some(EvidenceFragment::MentionRecord {
            sentiment: sentiment::polarity(&text),
            text,
            published,
        })
    }
}

#[derive(Debug, Deserialize)]
struct MentionResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
    summary: Option<String>,
    published: Option<String>,
}

#[async_trait::async_trait]
impl ResearchSource for MentionResearcher {
    fn name(&self) -> &'static str {
        "mention_researcher"
    }

    fn uses_network(&self) -> bool {
        true
    }

    async fn lookup(
        &self,
        identity: &ContactIdentity,
        hints: &SourceHints,
    ) -> Vec<EvidenceFragment> {
        let name = hints.get("name").map(String::as_str).unwrap_or("");
        if name.is_empty() {
            return Vec::new();
        }

        let key = CacheStore::key(self.name(), identity, &self.focus_terms);
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        if self.api_url.is_none() {
            tracing::debug!(source = self.name(), "No news index configured, skipping");
            return Vec::new();
        }

        self.limiter.reserve().await;
        match self.search(name).await {
            Ok(fragments) => {
                self.cache.set(&key, &fragments);
                fragments
            }
            Err(e) => {
                tracing::warn!(
                    source = self.name(),
                    contact = %identity,
                    error = %e,
                    "Mention search failed, continuing without it"
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_with_summary_becomes_mention() {
        let article = Article {
            title: Some("Headline".to_string()),
            summary: Some("Praised the reform program".to_string()),
            published: Some("2025-08-01T10:00:00+10:00".to_string()),
        };
        let fragment = MentionResearcher::fragment_from_article(article).unwrap();
        match fragment {
            EvidenceFragment::MentionRecord {
                text,
                sentiment,
                published,
            } => {
                assert_eq!(text, "Praised the reform program");
                assert!(sentiment > 0.0);
                assert!(published.is_some());
            }
            other => panic!("unexpected fragment: {:?}", other),
        }
    }

    #[test]
    fn test_article_without_text_is_dropped() {
        let article = Article {
            title: None,
            summary: Some("   ".to_string()),
            published: None,
        };
        assert!(MentionResearcher::fragment_from_article(article).is_none());
    }

    #[test]
    fn test_bad_timestamp_keeps_mention() {
        let article = Article {
            title: Some("Headline".to_string()),
            summary: None,
            published: Some("last tuesday".to_string()),
        };
        let fragment = MentionResearcher::fragment_from_article(article).unwrap();
        assert!(matches!(
            fragment,
            EvidenceFragment::MentionRecord { published: None, .. }
        ));
    }
}
