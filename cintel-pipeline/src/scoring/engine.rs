//! Contact Scoring Engine
//!
//! Pure, synchronous scorer: a frozen enrichment (plus its raw record) in,
//! a `ScoreVector` out. No I/O, no suspension, no shared state - the
//! orchestrator is the only part of the pipeline that awaits anything.
//!
//! Each dimension is additive over keyword/indicator hits, adjusted by
//! role-seniority and sector multipliers, and clipped to [0,100] before
//! weighting. Per-tier contributions are capped at twice the tier weight
//! so one long notes field cannot saturate a dimension on repetition.
//! Risk is computed separately and never folds into the composite.

use super::keywords as kw;
use super::sector::{self, SectorClass};
use crate::types::ContactEnrichment;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Dimension weights; sum to 1.0 so the composite stays in [0,100]
const W_RELEVANCE: f64 = 0.30;
const W_INFLUENCE: f64 = 0.25;
const W_ACCESSIBILITY: f64 = 0.20;
const W_TIMING: f64 = 0.15;
const W_STRATEGIC: f64 = 0.10;

/// Five weighted dimensions plus risk, all in [0,100].
///
/// Derived data: recomputed on demand from the frozen enrichment, never
/// hand-edited or treated as a source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreVector {
    pub relevance: f64,
    pub influence: f64,
    pub accessibility: f64,
    pub timing: f64,
    pub strategic_value: f64,
    /// Engagement risk; gates classification only, excluded from composite
    pub risk: f64,
    /// Weighted sum of the five dimensions
    pub composite: f64,
}

/// Deterministic contact scorer
pub struct ScoringEngine {
    /// Year treated as "current" for connection-recency scoring; fixed at
    /// construction so a run scores consistently across midnight
    current_year: i32,
}

impl ScoringEngine {
    pub fn new() -> Self {
        Self {
            current_year: Utc::now().year(),
        }
    }

    /// Engine pinned to a specific year (tests)
    pub fn with_current_year(current_year: i32) -> Self {
        Self { current_year }
    }

    /// Score one enriched contact.
    pub fn score(&self, enrichment: &ContactEnrichment) -> ScoreVector {
        let relevance = self.relevance(enrichment);
        let influence = self.influence(enrichment);
        let accessibility = self.accessibility(enrichment);
        let timing = self.timing(enrichment);
        let strategic_value = self.strategic_value(enrichment);
        let risk = self.risk(enrichment);

        let composite = relevance * W_RELEVANCE
            + influence * W_INFLUENCE
            + accessibility * W_ACCESSIBILITY
            + timing * W_TIMING
            + strategic_value * W_STRATEGIC;

        ScoreVector {
            relevance,
            influence,
            accessibility,
            timing,
            strategic_value,
            risk,
            composite: clamp(composite),
        }
    }

    /// Campaign relevance: keyword tiers over the combined text fields,
    /// organisation and sector bonuses, scaled by role seniority.
    fn relevance(&self, enrichment: &ContactEnrichment) -> f64 {
        let record = &enrichment.record;
        let text = format!(
            "{} {} {} {}",
            record.title, record.organization, record.sector, record.notes
        )
        .to_lowercase();

        let mut score = tier_contribution(&text, kw::HIGH_RELEVANCE, 25.0, 50.0)
            + tier_contribution(&text, kw::MEDIUM_RELEVANCE, 10.0, 30.0)
            + tier_contribution(&text, kw::LOW_RELEVANCE, 5.0, 15.0);

        let org_lower = record.organization.to_lowercase();
        if kw::RELEVANT_ORGS.iter().any(|o| org_lower.contains(o)) {
            score += 20.0;
        }

        let sector_lower = record.sector.to_lowercase();
        for (label, bonus) in kw::SECTOR_RELEVANCE {
            if sector_lower.contains(label) {
                score += bonus;
            }
        }

        clamp(score * seniority_multiplier(&record.title))
    }

    /// Influence: title indicators plus organisation reach bonuses, the
    /// whole base scaled by the sector multiplier, plus a media-mention
    /// evidence boost.
    fn influence(&self, enrichment: &ContactEnrichment) -> f64 {
        let record = &enrichment.record;
        let title_lower = record.title.to_lowercase();
        let org_lower = record.organization.to_lowercase();

        let mut base = tier_contribution(&title_lower, kw::HIGH_INFLUENCE_TITLES, 30.0, 60.0)
            + tier_contribution(&title_lower, kw::MEDIUM_INFLUENCE_TITLES, 15.0, 30.0);

        if kw::MEDIA_ORGS.iter().any(|o| org_lower.contains(o)) {
            base += 25.0;
        }
        if kw::GOV_INDICATORS.iter().any(|o| org_lower.contains(o)) {
            base += 20.0;
        }
        if kw::ACADEMIC_INDICATORS.iter().any(|o| org_lower.contains(o)) {
            base += 15.0;
        }

        let multiplier = self.sector_class(enrichment).influence_multiplier();
        let mention_boost = (enrichment.mention_count() as f64 * 10.0).min(30.0);

        clamp(base * multiplier + mention_boost)
    }

    /// Accessibility: base 50 adjusted by available contact channels
    /// (raw fields or discovered evidence) and sector reachability.
    fn accessibility(&self, enrichment: &ContactEnrichment) -> f64 {
        let record = &enrichment.record;
        let mut score = 50.0;

        let has_email = !record.email.trim().is_empty() || !enrichment.found_emails().is_empty();
        if has_email {
            score += 20.0;
        }

        let has_linkedin = !record.linkedin_url.trim().is_empty()
            || enrichment.social_profile("linkedin").is_some();
        if has_linkedin {
            score += 15.0;
        }

        if !record.contact_info.trim().is_empty() {
            score += 10.0;
        }

        let contact_lower = record.contact_info.to_lowercase();
        if contact_lower.contains("public contact") {
            score += 15.0;
        }
        if contact_lower.contains("twitter")
            || contact_lower.contains('@')
            || enrichment.social_profile("twitter").is_some()
        {
            score += 10.0;
        }

        let org_lower = record.organization.to_lowercase();
        if kw::ACCESSIBLE_ORGS.iter().any(|o| org_lower.contains(o)) {
            score += 10.0;
        }

        match self.sector_class(enrichment) {
            SectorClass::Media => score += 15.0,
            SectorClass::CivilSociety => score += 10.0,
            SectorClass::Government => score -= 10.0,
            _ => {}
        }

        clamp(score)
    }

    /// Timing: base 60 adjusted by engagement-window signals in the notes
    /// and connection recency.
    fn timing(&self, enrichment: &ContactEnrichment) -> f64 {
        let record = &enrichment.record;
        let notes_lower = record.notes.to_lowercase();
        let mut score = 60.0;

        if notes_lower.contains("launch") || notes_lower.contains("co-founder") {
            score += 30.0;
        } else if notes_lower.contains("keynote") || notes_lower.contains("speaker") {
            score += 25.0;
        } else if notes_lower.contains("partner") {
            score += 20.0;
        }

        if self.sector_class(enrichment) == SectorClass::Media {
            score += 15.0;
        }

        if record
            .connected_date
            .contains(&self.current_year.to_string())
        {
            score += 10.0;
        }

        clamp(score)
    }

    /// Long-term strategic value from title and note indicators.
    fn strategic_value(&self, enrichment: &ContactEnrichment) -> f64 {
        let record = &enrichment.record;
        let text = format!("{} {}", record.title, record.notes).to_lowercase();
        let notes_lower = record.notes.to_lowercase();

        let mut score = tier_contribution(&text, kw::HIGH_VALUE_INDICATORS, 20.0, 60.0);

        if notes_lower.contains("network") || notes_lower.contains("connects") {
            score += 15.0;
        }
        if notes_lower.contains("lived experience") {
            score += 25.0;
        }
        if notes_lower.contains("international") || notes_lower.contains("global") {
            score += 20.0;
        }
        if notes_lower.contains("digital") || notes_lower.contains("innovation") {
            score += 15.0;
        }

        clamp(score)
    }

    /// Engagement risk from partisan, sensitivity and bureaucracy markers.
    fn risk(&self, enrichment: &ContactEnrichment) -> f64 {
        let record = &enrichment.record;
        let org_lower = record.organization.to_lowercase();
        let notes_lower = record.notes.to_lowercase();
        let title_lower = record.title.to_lowercase();
        let mut risk = 0.0;

        if kw::PARTISAN_ORGS.iter().any(|o| org_lower.contains(o)) {
            risk += 20.0;
        }
        if notes_lower.contains("abuse") || notes_lower.contains("expose") {
            risk += 10.0;
        }
        if notes_lower.contains("investigative") {
            risk += 15.0;
        }
        if org_lower.contains("government") && !title_lower.contains("minister") {
            risk += 10.0;
        }

        clamp(risk)
    }

    fn sector_class(&self, enrichment: &ContactEnrichment) -> SectorClass {
        let record = &enrichment.record;
        sector::classify(&record.sector, &record.title, &record.organization)
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Sum of keyword hits at a fixed weight, capped per tier
fn tier_contribution(text: &str, keywords: &[&str], weight: f64, cap: f64) -> f64 {
    let hits = keywords.iter().filter(|k| text.contains(*k)).count();
    (hits as f64 * weight).min(cap)
}

/// Role-seniority multiplier from the title
fn seniority_multiplier(title: &str) -> f64 {
    let title_lower = title.to_lowercase();
    if kw::HIGH_INFLUENCE_TITLES.iter().any(|t| title_lower.contains(t)) {
        1.5
    } else if kw::MEDIUM_INFLUENCE_TITLES.iter().any(|t| title_lower.contains(t)) {
        1.25
    } else {
        1.0
    }
}

fn clamp(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContactIdentity, EvidenceFragment, RawContactRecord};

    fn enrichment(record: RawContactRecord) -> ContactEnrichment {
        let identity = ContactIdentity::from_record(&record).unwrap_or(ContactIdentity::NameOrg {
            name_lower: "unknown".to_string(),
            organization_lower: String::new(),
        });
        ContactEnrichment::new(identity, record)
    }

    fn jane_doe() -> ContactEnrichment {
        enrichment(RawContactRecord {
            full_name: "Jane Doe".to_string(),
            title: "Director, Youth Justice Reform".to_string(),
            organization: "Department of Justice".to_string(),
            notes: "youth justice policy advisor".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_senior_policy_contact_scores_high() {
        let engine = ScoringEngine::with_current_year(2025);
        let scores = engine.score(&jane_doe());

        assert!(scores.relevance >= 55.0, "relevance was {}", scores.relevance);
        // Mid-level title plus the government sector multiplier
        assert!(scores.influence >= 60.0, "influence was {}", scores.influence);
        assert!(scores.composite >= 65.0, "composite was {}", scores.composite);
    }

    #[test]
    fn test_empty_record_scores_from_bases_only() {
        let engine = ScoringEngine::with_current_year(2025);
        let scores = engine.score(&enrichment(RawContactRecord {
            full_name: "Nobody Inparticular".to_string(),
            ..Default::default()
        }));

        assert_eq!(scores.relevance, 0.0);
        assert_eq!(scores.influence, 0.0);
        assert_eq!(scores.accessibility, 50.0);
        assert_eq!(scores.timing, 60.0);
        assert_eq!(scores.strategic_value, 0.0);
        assert_eq!(scores.risk, 0.0);
        // Weighted bases only: 50*0.20 + 60*0.15
        assert!((scores.composite - 19.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_dimensions_stay_in_range() {
        let engine = ScoringEngine::with_current_year(2025);
        // Pathological record repeating every keyword family
        let scores = engine.score(&enrichment(RawContactRecord {
            full_name: "Max Out".to_string(),
            title: "Minister Professor CEO Chair Commissioner Director".to_string(),
            organization: "ABC Guardian University Department Government Justice Youth".to_string(),
            sector: "campaign leader campaign partner global expert media government legal"
                .to_string(),
            notes: "youth justice juvenile justice launch keynote partner lived experience \
                    international digital network abuse investigative"
                .to_string(),
            email: "max@out.org".to_string(),
            linkedin_url: "https://linkedin.com/in/max".to_string(),
            contact_info: "public contact, twitter @max".to_string(),
            ..Default::default()
        }));

        for value in [
            scores.relevance,
            scores.influence,
            scores.accessibility,
            scores.timing,
            scores.strategic_value,
            scores.risk,
            scores.composite,
        ] {
            assert!((0.0..=100.0).contains(&value), "out of range: {}", value);
        }
    }

    #[test]
    fn test_risk_is_excluded_from_composite() {
        let engine = ScoringEngine::with_current_year(2025);
        let calm = enrichment(RawContactRecord {
            full_name: "Jane Doe".to_string(),
            organization: "Community Foundation".to_string(),
            ..Default::default()
        });
        let risky = enrichment(RawContactRecord {
            full_name: "Jane Doe".to_string(),
            organization: "Community Foundation".to_string(),
            notes: "abuse expose investigative".to_string(),
            ..Default::default()
        });

        let calm_scores = engine.score(&calm);
        let risky_scores = engine.score(&risky);

        assert!(risky_scores.risk > calm_scores.risk);
        assert_eq!(calm_scores.composite, risky_scores.composite);
    }

    #[test]
    fn test_mention_evidence_boosts_influence() {
        let engine = ScoringEngine::with_current_year(2025);
        let mut with_mentions = jane_doe();
        let without = engine.score(&jane_doe());

        for i in 0..5 {
            with_mentions.fragments.push(EvidenceFragment::MentionRecord {
                text: format!("coverage {}", i),
                sentiment: 0.0,
                published: None,
            });
        }
        let with = engine.score(&with_mentions);

        // Boost is capped at +30 and the dimension is clipped at 100
        assert!(with.influence >= without.influence);
        assert!(with.influence <= 100.0);
    }

    #[test]
    fn test_keyword_stacking_is_capped_per_tier() {
        let engine = ScoringEngine::with_current_year(2025);
        // Many high-tier hits, no title (no seniority multiplier), no org bonus
        let scores = engine.score(&enrichment(RawContactRecord {
            full_name: "Keyword Stacker".to_string(),
            notes: "youth justice juvenile justice youth detention young offenders \
                    youth advocacy juvenile reform youth crime detention centre"
                .to_string(),
            ..Default::default()
        }));

        // High tier caps at 50 even with eight hits
        assert!(scores.relevance <= 50.0 + 30.0 + 15.0);
    }

    #[test]
    fn test_recent_connection_boosts_timing() {
        let engine = ScoringEngine::with_current_year(2025);
        let mut record = RawContactRecord {
            full_name: "Jane Doe".to_string(),
            ..Default::default()
        };
        record.connected_date = "12 Mar 2025".to_string();
        let recent = engine.score(&enrichment(record.clone()));

        record.connected_date = "12 Mar 2019".to_string();
        let stale = engine.score(&enrichment(record));

        assert!(recent.timing > stale.timing);
    }
}
