//! Email Address Discovery
//!
//! Two discovery paths, merged into one fragment stream:
//! - Pattern generation: common `first.last@domain` shapes over candidate
//!   organisation domains. Zero network calls, low confidence (0.3).
//! - Finder API: an email-finder endpoint queried per candidate domain when
//!   an API key is configured; confidence comes from the service.
//!
//! The API path consults the cache before and the rate limiter immediately
//! before each request. Pattern generation bypasses both.

use crate::services::{CacheStore, RateLimiter};
use crate::types::{ContactIdentity, EvidenceFragment, ResearchSource, SourceError, SourceHints};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Confidence assigned to pattern-generated addresses
const PATTERN_CONFIDENCE: f64 = 0.3;

/// Domains tried against the finder API per contact
const MAX_API_DOMAINS: usize = 3;

/// Domains and patterns used for pattern generation per contact
const MAX_PATTERN_DOMAINS: usize = 2;
const MAX_PATTERNS_PER_DOMAIN: usize = 5;

/// Email discovery source
pub struct EmailFinder {
    cache: Arc<CacheStore>,
    limiter: Arc<RateLimiter>,
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl EmailFinder {
    pub fn new(
        cache: Arc<CacheStore>,
        limiter: Arc<RateLimiter>,
        client: reqwest::Client,
        api_url: String,
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

    /// Candidate organisation domains, most specific suffix first.
    ///
    /// The first word of the cleaned organisation name is tried against the
    /// common Australian and generic suffixes.
    pub fn candidate_domains(organization: &str) -> Vec<String> {
        let cleaned: String = organization
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == ' ' { c } else { ' ' })
            .collect();

        let Some(primary) = cleaned.split_whitespace().next().map(str::to_string) else {
            return Vec::new();
        };

        ["org.au", "com.au", "gov.au", "edu.au", "org", "com"]
            .iter()
            .map(|suffix| format!("{}.{}", primary, suffix))
            .collect()
    }

    /// Common address patterns for a name at a domain, duplicates removed.
    pub fn generate_patterns(first: &str, last: &str, domain: &str) -> Vec<String> {
        let first = first.trim().to_lowercase();
        let last = last.trim().to_lowercase();
        if first.is_empty() || last.is_empty() {
            return Vec::new();
        }
        let fi = &first[..first.chars().next().map(char::len_utf8).unwrap_or(0)];
        let li = &last[..last.chars().next().map(char::len_utf8).unwrap_or(0)];

        let candidates = [
            format!("{first}.{last}@{domain}"),
            format!("{first}_{last}@{domain}"),
            format!("{first}{last}@{domain}"),
            format!("{fi}{last}@{domain}"),
            format!("{first}{li}@{domain}"),
            format!("{first}.{li}@{domain}"),
            format!("{fi}.{last}@{domain}"),
            format!("{last}.{first}@{domain}"),
            format!("{last}_{first}@{domain}"),
            format!("{last}{first}@{domain}"),
        ];

        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|p| seen.insert(p.clone()))
            .collect()
    }

    async fn query_finder(
        &self,
        domain: &str,
        first: &str,
        last: &str,
    ) -> Result<Vec<EvidenceFragment>, SourceError> {
        let api_key = self.api_key.as_deref().ok_or(SourceError::NoCredentials)?;

        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("domain", domain),
                ("first_name", first),
                ("last_name", last),
                ("api_key", api_key),
            ])
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api(status.as_u16(), body));
        }

        let parsed: FinderResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        let mut fragments = Vec::new();
        if let Some(data) = parsed.data {
            if let Some(address) = data.email {
                let confidence = data.confidence.unwrap_or(0.0) / 100.0;
                fragments.push(EvidenceFragment::FoundEmail {
                    address,
                    confidence,
                });
            }
        }
        Ok(fragments)
    }
}

#[derive(Debug, Deserialize)]
struct FinderResponse {
    data: Option<FinderData>,
}

#[derive(Debug, Deserialize)]
struct FinderData {
    email: Option<String>,
    confidence: Option<f64>,
}

#[async_trait::async_trait]
impl ResearchSource for EmailFinder {
    fn name(&self) -> &'static str {
        "email_finder"
    }

    fn uses_network(&self) -> bool {
        self.api_key.is_some()
    }

    async fn lookup(
        &self,
        identity: &ContactIdentity,
        hints: &SourceHints,
    ) -> Vec<EvidenceFragment> {
        let first = hints.get("first_name").map(String::as_str).unwrap_or("");
        let last = hints.get("last_name").map(String::as_str).unwrap_or("");
        let organization = hints.get("organization").map(String::as_str).unwrap_or("");

        let mut domains = Vec::new();
        if let Some(domain) = hints.get("domain") {
            domains.push(domain.clone());
        }
        domains.extend(Self::candidate_domains(organization));

        let mut fragments = Vec::new();

        // Finder API path (network, cached, rate-limited)
        if self.api_key.is_some() {
            for domain in domains.iter().take(MAX_API_DOMAINS) {
                let key = CacheStore::key(self.name(), identity, &format!("api|{}", domain));
                if let Some(cached) = self.cache.get(&key) {
                    fragments.extend(cached);
                    continue;
                }

                self.limiter.reserve().await;
                match self.query_finder(domain, first, last).await {
                    Ok(found) => {
                        self.cache.set(&key, &found);
                        fragments.extend(found);
                    }
                    Err(e) => {
                        tracing::warn!(
                            source = self.name(),
                            domain = %domain,
                            error = %e,
                            "Finder API lookup failed, continuing without it"
                        );
                    }
                }
            }
        }

        // Pattern path (zero network)
        for domain in domains.iter().take(MAX_PATTERN_DOMAINS) {
            for address in Self::generate_patterns(first, last, domain)
                .into_iter()
                .take(MAX_PATTERNS_PER_DOMAIN)
            {
                fragments.push(EvidenceFragment::FoundEmail {
                    address,
                    confidence: PATTERN_CONFIDENCE,
                });
            }
        }

        // One fragment per distinct address, keeping the best confidence
        let mut seen: HashSet<String> = HashSet::new();
        fragments.retain(|f| match f {
            EvidenceFragment::FoundEmail { address, .. } => seen.insert(address.clone()),
            _ => true,
        });

        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn finder(api_key: Option<&str>) -> EmailFinder {
        let dir = tempfile::tempdir().unwrap();
        EmailFinder::new(
            Arc::new(CacheStore::new(dir.path(), Duration::hours(24))),
            Arc::new(RateLimiter::new(30, 500)),
            reqwest::Client::new(),
            "https://finder.invalid/v2/email-finder".to_string(),
            api_key.map(str::to_string),
        )
    }

    #[test]
    fn test_candidate_domains_from_organisation() {
        let domains = EmailFinder::candidate_domains("Justice Reform Initiative");
        assert_eq!(domains[0], "justice.org.au");
        assert_eq!(domains.len(), 6);
        assert!(EmailFinder::candidate_domains("").is_empty());
    }

    #[test]
    fn test_patterns_are_unique_and_lowercased() {
        let patterns = EmailFinder::generate_patterns("Jane", "Doe", "org.au");
        assert_eq!(patterns.len(), 10);
        assert!(patterns.contains(&"jane.doe@org.au".to_string()));
        assert!(patterns.contains(&"jdoe@org.au".to_string()));
        let unique: HashSet<_> = patterns.iter().collect();
        assert_eq!(unique.len(), patterns.len());
    }

    #[test]
    fn test_patterns_need_both_name_parts() {
        assert!(EmailFinder::generate_patterns("Jane", "", "org.au").is_empty());
        assert!(EmailFinder::generate_patterns("", "Doe", "org.au").is_empty());
    }

    #[test]
    fn test_pattern_only_mode_skips_network() {
        assert!(!finder(None).uses_network());
        assert!(finder(Some("key")).uses_network());
    }

    #[tokio::test]
    async fn test_lookup_without_key_yields_pattern_fragments() {
        let finder = finder(None);
        let identity = ContactIdentity::NameOrg {
            name_lower: "jane doe".to_string(),
            organization_lower: "justice reform initiative".to_string(),
        };
        let mut hints = SourceHints::new();
        hints.insert("first_name".to_string(), "Jane".to_string());
        hints.insert("last_name".to_string(), "Doe".to_string());
        hints.insert(
            "organization".to_string(),
            "Justice Reform Initiative".to_string(),
        );

        let fragments = finder.lookup(&identity, &hints).await;
        assert!(!fragments.is_empty());
        assert!(fragments.iter().all(|f| matches!(
            f,
            EvidenceFragment::FoundEmail { confidence, .. } if *confidence == PATTERN_CONFIDENCE
        )));
    }

    #[tokio::test]
    async fn test_lookup_without_name_parts_is_empty_not_an_error() {
        let finder = finder(None);
        let identity = ContactIdentity::NameOrg {
            name_lower: "jane doe".to_string(),
            organization_lower: "justice reform initiative".to_string(),
        };
        let fragments = finder.lookup(&identity, &SourceHints::new()).await;
        assert!(fragments.is_empty());
    }
}
