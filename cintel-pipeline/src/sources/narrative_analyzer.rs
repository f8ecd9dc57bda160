//! Narrative Assessment
//!
//! Produces a free-text engagement assessment for a contact from the
//! evidence accumulated by the earlier sources. When a completion API is
//! configured the assessment comes from the model; otherwise a
//! deterministic heuristic narrative is composed locally so the pipeline
//! still yields a usable recommendation with zero credentials.

use crate::services::{CacheStore, RateLimiter};
use crate::types::{ContactIdentity, EvidenceFragment, ResearchSource, SourceError, SourceHints};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

const SYSTEM_PROMPT: &str =
    "You are an expert in stakeholder engagement and Australian youth justice policy. \
     Provide a concise engagement assessment for the contact described.";

/// Completion-API narrative source
pub struct NarrativeAnalyzer {
    cache: Arc<CacheStore>,
    limiter: Arc<RateLimiter>,
    client: reqwest::Client,
    api_url: Option<String>,
    api_key: Option<String>,
    model: String,
}

impl NarrativeAnalyzer {
    pub fn new(
        cache: Arc<CacheStore>,
        limiter: Arc<RateLimiter>,
        client: reqwest::Client,
        api_url: Option<String>,
        api_key: Option<String>,
        model: String,
    ) -> Self {
        Self {
            cache,
            limiter,
            client,
            api_url,
            api_key,
            model,
        }
    }

    fn context_from_hints(hints: &SourceHints) -> String {
        let get = |key: &str| hints.get(key).map(String::as_str).unwrap_or("unknown");
        format!(
            "Name: {}\nOrganisation: {}\nRole: {}\nNotes: {}\nEvidence collected: {}",
            get("name"),
            get("organization"),
            get("title"),
            get("notes"),
            get("evidence_summary"),
        )
    }

    async fn complete(&self, hints: &SourceHints) -> Result<String, SourceError> {
        let api_url = self.api_url.as_deref().ok_or(SourceError::NoCredentials)?;
        let api_key = self.api_key.as_deref().ok_or(SourceError::NoCredentials)?;

        let body = json!({
            "model": self.model,
            "max_tokens": 500,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": Self::context_from_hints(hints) },
            ],
        });

        let response = self
            .client
            .post(api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api(status.as_u16(), body));
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| SourceError::Parse("empty completion".to_string()))
    }

    /// Deterministic local assessment used when no completion API is
    /// available (or the call fails): a professional-register template
    /// built from whatever the hints carry.
    pub fn heuristic_assessment(hints: &SourceHints) -> String {
        let title = hints.get("title").map(String::as_str).unwrap_or("");
        let organization = hints.get("organization").map(String::as_str).unwrap_or("");
        let evidence = hints
            .get("evidence_summary")
            .map(String::as_str)
            .unwrap_or("");

        let mut lines = vec!["Professional email introduction recommended.".to_string()];

        if !organization.is_empty() {
            lines.push(format!(
                "Reference shared interest in youth justice reform when approaching {}.",
                organization
            ));
        } else {
            lines.push("Reference shared interest in youth justice reform.".to_string());
        }

        let title_lower = title.to_lowercase();
        if ["director", "chief", "minister", "commissioner", "head"]
            .iter()
            .any(|t| title_lower.contains(t))
        {
            lines.push(
                "Senior role: route the approach through a formal channel and allow longer lead time."
                    .to_string(),
            );
        }

        if evidence.contains("mention_record") {
            lines.push("Recent media coverage available as a conversation opener.".to_string());
        }

        lines.push("Engage during business hours, avoiding Mondays and Fridays.".to_string());
        lines.join(" ")
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

#[async_trait::async_trait]
impl ResearchSource for NarrativeAnalyzer {
    fn name(&self) -> &'static str {
        "narrative_analyzer"
    }

    fn uses_network(&self) -> bool {
        self.api_url.is_some() && self.api_key.is_some()
    }

    async fn lookup(
        &self,
        identity: &ContactIdentity,
        hints: &SourceHints,
    ) -> Vec<EvidenceFragment> {
        let key = CacheStore::key(self.name(), identity, &self.model);
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        let text = if self.uses_network() {
            self.limiter.reserve().await;
            match self.complete(hints).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(
                        source = self.name(),
                        contact = %identity,
                        error = %e,
                        "Completion failed, falling back to heuristic assessment"
                    );
                    Self::heuristic_assessment(hints)
                }
            }
        } else {
            Self::heuristic_assessment(hints)
        };

        let fragments = vec![EvidenceFragment::NarrativeAssessment { text }];
        self.cache.set(&key, &fragments);
        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn analyzer() -> NarrativeAnalyzer {
        let dir = tempfile::tempdir().unwrap();
        NarrativeAnalyzer::new(
            Arc::new(CacheStore::new(dir.path(), Duration::hours(24))),
            Arc::new(RateLimiter::new(30, 500)),
            reqwest::Client::new(),
            None,
            None,
            "assessor-small".to_string(),
        )
    }

    fn hints(title: &str, org: &str) -> SourceHints {
        let mut hints = SourceHints::new();
        hints.insert("name".to_string(), "Jane Doe".to_string());
        hints.insert("title".to_string(), title.to_string());
        hints.insert("organization".to_string(), org.to_string());
        hints
    }

    #[test]
    fn test_heuristic_mentions_organisation() {
        let text = NarrativeAnalyzer::heuristic_assessment(&hints("Analyst", "Justice Org"));
        assert!(text.contains("Justice Org"));
    }

    #[test]
    fn test_heuristic_flags_senior_roles() {
        let text = NarrativeAnalyzer::heuristic_assessment(&hints("Director, Reform", "Org"));
        assert!(text.contains("Senior role"));

        let junior = NarrativeAnalyzer::heuristic_assessment(&hints("Analyst", "Org"));
        assert!(!junior.contains("Senior role"));
    }

    #[tokio::test]
    async fn test_degraded_mode_still_yields_assessment() {
        let analyzer = analyzer();
        assert!(!analyzer.uses_network());

        let identity = ContactIdentity::NameOrg {
            name_lower: "jane doe".to_string(),
            organization_lower: "justice org".to_string(),
        };
        let fragments = analyzer.lookup(&identity, &hints("Analyst", "Justice Org")).await;
        assert_eq!(fragments.len(), 1);
        assert!(matches!(
            &fragments[0],
            EvidenceFragment::NarrativeAssessment { text } if !text.is_empty()
        ));
    }
}
