//! Core Types and Trait Definitions for the Contact Intelligence Pipeline
//!
//! Defines the data model shared across ingestion, enrichment, scoring and
//! classification:
//! - `RawContactRecord` - a contact row as ingested, never mutated after merge
//! - `ContactIdentity` - the deduplication / cache key for one real-world person
//! - `EvidenceFragment` - one discrete unit of research evidence (closed enum)
//! - `ContactEnrichment` - the per-contact aggregate built by the orchestrator
//! - `ResearchSource` - the capability trait every research adapter implements

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Raw Records
// ============================================================================

/// A contact row as ingested from a source file.
///
/// All fields are plain strings; the empty string means "not supplied".
/// Heterogeneous exports (LinkedIn connection dumps, strategic contact
/// sheets, address-list blobs) are normalised into this shape by the ingest
/// loaders and the record is frozen from then on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawContactRecord {
    /// Full display name
    #[serde(default)]
    pub full_name: String,
    /// Given name, when the source file split names
    #[serde(default)]
    pub first_name: String,
    /// Family name, when the source file split names
    #[serde(default)]
    pub last_name: String,
    /// Job title / role
    #[serde(default)]
    pub title: String,
    /// Organisation name
    #[serde(default)]
    pub organization: String,
    /// Sector label, when the source file carried one
    #[serde(default)]
    pub sector: String,
    /// Location text
    #[serde(default)]
    pub location: String,
    /// Directly supplied email address
    #[serde(default)]
    pub email: String,
    /// Directly supplied LinkedIn profile URL
    #[serde(default)]
    pub linkedin_url: String,
    /// Free-text public contact information
    #[serde(default)]
    pub contact_info: String,
    /// Free-text relevance notes; fed verbatim into keyword scoring
    #[serde(default)]
    pub notes: String,
    /// Connection date text, when the source file carried one
    #[serde(default)]
    pub connected_date: String,
    /// Source file this row came from
    #[serde(default)]
    pub source_file: String,
}

impl RawContactRecord {
    /// Display name, falling back to "first last" when full_name is absent
    pub fn display_name(&self) -> String {
        if !self.full_name.trim().is_empty() {
            return self.full_name.trim().to_string();
        }
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Count of non-empty fields, used as the dedup completeness measure
    pub fn completeness(&self) -> usize {
        [
            &self.full_name,
            &self.first_name,
            &self.last_name,
            &self.title,
            &self.organization,
            &self.sector,
            &self.location,
            &self.email,
            &self.linkedin_url,
            &self.contact_info,
            &self.notes,
            &self.connected_date,
        ]
        .iter()
        .filter(|f| !f.trim().is_empty())
        .count()
    }
}

// ============================================================================
// Contact Identity
// ============================================================================

/// Normalised identity key for one real-world contact.
///
/// A directly supplied email address identifies the contact outright;
/// otherwise the lowercased name + organisation pair does. Immutable once
/// assigned; used for deduplication, checkpoint resume and cache keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContactIdentity {
    /// Verified email address (lowercased)
    VerifiedEmail(String),
    /// Lowercased name + organisation pair
    NameOrg {
        name_lower: String,
        organization_lower: String,
    },
}

impl ContactIdentity {
    /// Build the identity for a raw record.
    ///
    /// Returns `None` for records with no identity material at all
    /// (no email, no name, no organisation) - those are malformed input.
    pub fn from_record(record: &RawContactRecord) -> Option<Self> {
        let email = record.email.trim().to_lowercase();
        if !email.is_empty() {
            return Some(ContactIdentity::VerifiedEmail(email));
        }

        let name = record.display_name().to_lowercase();
        let org = record.organization.trim().to_lowercase();
        if name.is_empty() && org.is_empty() {
            return None;
        }
        Some(ContactIdentity::NameOrg {
            name_lower: name,
            organization_lower: org,
        })
    }

    /// Stable token used in cache key derivation and log lines
    pub fn token(&self) -> String {
        match self {
            ContactIdentity::VerifiedEmail(email) => format!("email:{}", email),
            ContactIdentity::NameOrg {
                name_lower,
                organization_lower,
            } => format!("name-org:{}|{}", name_lower, organization_lower),
        }
    }
}

impl std::fmt::Display for ContactIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.token())
    }
}

// ============================================================================
// Evidence Fragments
// ============================================================================

/// One discrete unit of evidence returned by a research source.
///
/// The set of variants is closed on purpose: merging and scoring handle
/// every kind exhaustively instead of poking at string-keyed blobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvidenceFragment {
    /// A discovered email address with finder confidence (0.0-1.0)
    FoundEmail { address: String, confidence: f64 },
    /// A social media profile (platform identifier + handle, URL if known)
    SocialProfile {
        platform: String,
        handle: String,
        url: Option<String>,
    },
    /// Current or past position information
    PositionInfo {
        title: String,
        organization: Option<String>,
        span: Option<String>,
    },
    /// A media mention with sentiment polarity (-1.0..1.0)
    MentionRecord {
        text: String,
        sentiment: f64,
        published: Option<DateTime<Utc>>,
    },
    /// Free-text narrative assessment of the contact
    NarrativeAssessment { text: String },
}

impl EvidenceFragment {
    /// Short label for log lines and provenance summaries
    pub fn kind(&self) -> &'static str {
        match self {
            EvidenceFragment::FoundEmail { .. } => "found_email",
            EvidenceFragment::SocialProfile { .. } => "social_profile",
            EvidenceFragment::PositionInfo { .. } => "position_info",
            EvidenceFragment::MentionRecord { .. } => "mention_record",
            EvidenceFragment::NarrativeAssessment { .. } => "narrative_assessment",
        }
    }
}

// ============================================================================
// Contact Enrichment
// ============================================================================

/// Per-contact aggregate of raw record plus all collected evidence.
///
/// Created once per contact per pipeline run; mutated only by the
/// orchestrator while fragments arrive (append-only, in source declaration
/// order); frozen once every enabled source has been tried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactEnrichment {
    /// Row id for report output
    pub contact_id: Uuid,
    /// Identity key this enrichment belongs to
    pub identity: ContactIdentity,
    /// The surviving raw record (never mutated)
    pub record: RawContactRecord,
    /// Evidence fragments in source declaration order
    pub fragments: Vec<EvidenceFragment>,
    /// Every source that was consulted, evidence or not
    pub sources_consulted: BTreeSet<String>,
    /// The subset of consulted sources that returned at least one fragment
    pub sources_with_evidence: BTreeSet<String>,
    /// |sources_with_evidence| / |sources enabled| in [0,1]
    pub research_confidence: f64,
    /// Completion timestamp
    pub researched_at: DateTime<Utc>,
}

impl ContactEnrichment {
    /// Start an empty enrichment for one contact
    pub fn new(identity: ContactIdentity, record: RawContactRecord) -> Self {
        Self {
            contact_id: Uuid::new_v4(),
            identity,
            record,
            fragments: Vec::new(),
            sources_consulted: BTreeSet::new(),
            sources_with_evidence: BTreeSet::new(),
            research_confidence: 0.0,
            researched_at: Utc::now(),
        }
    }

    /// All discovered email addresses, highest confidence first
    pub fn found_emails(&self) -> Vec<(&str, f64)> {
        let mut emails: Vec<(&str, f64)> = self
            .fragments
            .iter()
            .filter_map(|f| match f {
                EvidenceFragment::FoundEmail {
                    address,
                    confidence,
                } => Some((address.as_str(), *confidence)),
                _ => None,
            })
            .collect();
        emails.sort_by(|a, b| b.1.total_cmp(&a.1));
        emails
    }

    /// First discovered profile handle for a platform, if any
    pub fn social_profile(&self, platform: &str) -> Option<&str> {
        self.fragments.iter().find_map(|f| match f {
            EvidenceFragment::SocialProfile {
                platform: p,
                handle,
                ..
            } if p == platform => Some(handle.as_str()),
            _ => None,
        })
    }

    /// Number of media mentions collected
    pub fn mention_count(&self) -> usize {
        self.fragments
            .iter()
            .filter(|f| matches!(f, EvidenceFragment::MentionRecord { .. }))
            .count()
    }
}

// ============================================================================
// Research Source Capability
// ============================================================================

/// Free-form hints passed from the orchestrator to each source
/// (well-known keys: "first_name", "last_name", "domain", "title",
/// "organization", "notes", "evidence_summary").
pub type SourceHints = HashMap<String, String>;

/// Internal fault inside a research source adapter.
///
/// These never cross the orchestrator boundary: each adapter catches its
/// own faults and degrades to an empty fragment list plus a log line.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream rejected the request (status, body excerpt)
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Response did not match the expected contract
    #[error("Parse error: {0}")]
    Parse(String),

    /// The source is enabled but has no usable credentials
    #[error("No credentials configured")]
    NoCredentials,
}

/// Research source capability.
///
/// One implementation per external information source. The orchestrator
/// invokes the enabled sources in a fixed declared order and treats each
/// one uniformly; adding a source means implementing this trait, never
/// branching orchestrator logic on a concrete type.
#[async_trait::async_trait]
pub trait ResearchSource: Send + Sync {
    /// Source name for provenance tracking
    fn name(&self) -> &'static str;

    /// Whether lookups may perform network calls.
    ///
    /// Zero-network sources (pattern-based address generation) bypass the
    /// rate limiter entirely.
    fn uses_network(&self) -> bool;

    /// Look up evidence for one contact.
    ///
    /// Must not fail: internal faults become an empty list plus a logged
    /// diagnostic. The returned fragments are owned by the orchestrator
    /// and immutable from then on.
    async fn lookup(&self, identity: &ContactIdentity, hints: &SourceHints)
        -> Vec<EvidenceFragment>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, org: &str, email: &str) -> RawContactRecord {
        RawContactRecord {
            full_name: name.to_string(),
            organization: org.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_identity_prefers_verified_email() {
        let identity = ContactIdentity::from_record(&record("Jane Doe", "Justice Org", "Jane@Org.au"));
        assert_eq!(
            identity,
            Some(ContactIdentity::VerifiedEmail("jane@org.au".to_string()))
        );
    }

    #[test]
    fn test_identity_normalizes_name_org() {
        let identity = ContactIdentity::from_record(&record("Jane DOE", "Justice Org", ""));
        assert_eq!(
            identity,
            Some(ContactIdentity::NameOrg {
                name_lower: "jane doe".to_string(),
                organization_lower: "justice org".to_string(),
            })
        );
    }

    #[test]
    fn test_identity_missing_everything_is_none() {
        assert_eq!(ContactIdentity::from_record(&record("", "", "")), None);
    }

    #[test]
    fn test_display_name_falls_back_to_parts() {
        let mut r = record("", "", "");
        r.first_name = "Jane".to_string();
        r.last_name = "Doe".to_string();
        assert_eq!(r.display_name(), "Jane Doe");
    }

    #[test]
    fn test_completeness_counts_nonempty_fields() {
        let empty = RawContactRecord::default();
        assert_eq!(empty.completeness(), 0);

        let r = record("Jane Doe", "Justice Org", "jane@org.au");
        assert_eq!(r.completeness(), 3);
    }

    #[test]
    fn test_fragment_roundtrip_preserves_kind() {
        let fragment = EvidenceFragment::FoundEmail {
            address: "jane@org.au".to_string(),
            confidence: 0.3,
        };
        let json = serde_json::to_string(&fragment).unwrap();
        let back: EvidenceFragment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fragment);
        assert_eq!(back.kind(), "found_email");
    }

    #[test]
    fn test_found_emails_sorted_by_confidence() {
        let mut enrichment = ContactEnrichment::new(
            ContactIdentity::VerifiedEmail("jane@org.au".to_string()),
            record("Jane Doe", "Justice Org", "jane@org.au"),
        );
        enrichment.fragments.push(EvidenceFragment::FoundEmail {
            address: "low@org.au".to_string(),
            confidence: 0.3,
        });
        enrichment.fragments.push(EvidenceFragment::FoundEmail {
            address: "high@org.au".to_string(),
            confidence: 0.9,
        });

        let emails = enrichment.found_emails();
        assert_eq!(emails[0].0, "high@org.au");
        assert_eq!(emails[1].0, "low@org.au");
    }
}
