//! Professional Profile Research
//!
//! Looks a contact up in a professional profile directory (LinkedIn-style
//! people search behind a configurable endpoint) and yields the matched
//! profile plus current position information.
//!
//! Match selection: the first result whose headline or organisation
//! mentions the contact's organisation wins; otherwise the first result.
//! Without configured credentials the source is consulted but yields
//! nothing.

use crate::services::{CacheStore, RateLimiter};
use crate::types::{ContactIdentity, EvidenceFragment, ResearchSource, SourceError, SourceHints};
use serde::Deserialize;
use std::sync::Arc;

/// Profile directory lookup source
pub struct ProfileResearcher {
    cache: Arc<CacheStore>,
    limiter: Arc<RateLimiter>,
    client: reqwest::Client,
    api_url: Option<String>,
    api_key: Option<String>,
}

impl ProfileResearcher {
    pub fn new(
        cache: Arc<CacheStore>,
        limiter: Arc<RateLimiter>,
        client: reqwest::Client,
        api_url: Option<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            cache,
            limiter,
            client,
            api_url,
            api_key,
        }
    }

    async fn search(&self, name: &str, organization: &str) -> Result<Vec<EvidenceFragment>, SourceError> {
        let api_url = self.api_url.as_deref().ok_or(SourceError::NoCredentials)?;
        let api_key = self.api_key.as_deref().ok_or(SourceError::NoCredentials)?;

        let query = if organization.is_empty() {
            name.to_string()
        } else {
            format!("{} {}", name, organization)
        };

        let response = self
            .client
            .get(api_url)
            .bearer_auth(api_key)
            .query(&[("q", query.as_str()), ("limit", "10")])
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api(status.as_u16(), body));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(Self::fragments_from_hits(parsed.results, organization))
    }

    /// Pick the best organisation match (else first hit) and convert it
    fn fragments_from_hits(hits: Vec<ProfileHit>, organization: &str) -> Vec<EvidenceFragment> {
        let org_lower = organization.to_lowercase();
        let best = if org_lower.is_empty() {
            hits.into_iter().next()
        } else {
            let mut hits = hits;
            let matched = hits.iter().position(|hit| {
                hit.headline
                    .as_deref()
                    .map(|h| h.to_lowercase().contains(&org_lower))
                    .unwrap_or(false)
                    || hit
                        .organization
                        .as_deref()
                        .map(|o| o.to_lowercase().contains(&org_lower))
                        .unwrap_or(false)
            });
            match matched {
                Some(index) => Some(hits.swap_remove(index)),
                None if !hits.is_empty() => Some(hits.swap_remove(0)),
                None => None,
            }
        };

        let Some(hit) = best else {
            return Vec::new();
        };

        let mut fragments = Vec::new();

        let handle = hit
            .public_id
            .clone()
            .or_else(|| {
                hit.profile_url
                    .as_deref()
                    .and_then(|url| url.rsplit('/').find(|part| !part.is_empty()))
                    .map(str::to_string)
            })
            .unwrap_or_default();

        if !handle.is_empty() || hit.profile_url.is_some() {
            fragments.push(EvidenceFragment::SocialProfile {
                platform: "linkedin".to_string(),
                handle,
                url: hit.profile_url.clone(),
            });
        }

        if let Some(headline) = hit.headline.filter(|h| !h.trim().is_empty()) {
            fragments.push(EvidenceFragment::PositionInfo {
                title: headline,
                organization: hit.organization,
                span: None,
            });
        }

        fragments
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ProfileHit>,
}

#[derive(Debug, Deserialize)]
struct ProfileHit {
    profile_url: Option<String>,
    public_id: Option<String>,
    headline: Option<String>,
    organization: Option<String>,
}

#[async_trait::async_trait]
impl ResearchSource for ProfileResearcher {
    fn name(&self) -> &'static str {
        "profile_researcher"
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
        let organization = hints.get("organization").map(String::as_str).unwrap_or("");
        if name.is_empty() {
            return Vec::new();
        }

        let key = CacheStore::key(self.name(), identity, "");
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        if self.api_url.is_none() || self.api_key.is_none() {
            tracing::debug!(
                source = self.name(),
                "No profile directory credentials configured, skipping"
            );
            return Vec::new();
        }

        self.limiter.reserve().await;
        match self.search(name, organization).await {
            Ok(fragments) => {
                self.cache.set(&key, &fragments);
                fragments
            }
            Err(e) => {
                tracing::warn!(
                    source = self.name(),
                    contact = %identity,
                    error = %e,
                    "Profile search failed, continuing without it"
                );
                Vec::new()
            }
        }
    }
}
