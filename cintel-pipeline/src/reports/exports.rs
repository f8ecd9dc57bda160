//! Strategic Report Exports
//!
//! Writes the output artifacts for a run:
//! - master scored table (one row per surviving contact)
//! - tier-partitioned extracts
//! - campaign-segment extracts
//! - high-risk assessment extract (risk ≥ 40)
//! - immediate-priority action list
//!
//! Every file goes through a temp-file + rename so a failed run never
//! leaves a partially written artifact. Any write failure is fatal.

use super::ScoredContact;
use crate::strategy::{CampaignSegment, EngagementTier, TimingWindow};
use crate::types::EvidenceFragment;
use cintel_common::{Error, Result};
use std::path::{Path, PathBuf};

const MASTER_HEADER: &[&str] = &[
    "contact_id",
    "full_name",
    "title",
    "organization",
    "sector",
    "sector_class",
    "location",
    "email",
    "linkedin_url",
    "contact_info",
    "notes",
    "connected_date",
    "source_file",
    "found_emails",
    "social_profiles",
    "mention_count",
    "narrative_assessment",
    "sources_consulted",
    "sources_with_evidence",
    "research_confidence",
    "relevance",
    "influence",
    "accessibility",
    "timing",
    "strategic_value",
    "risk_score",
    "composite_priority",
    "tier",
    "category",
    "approaches",
    "campaign_segments",
    "pathway",
    "success_probability",
    "resource_requirement",
    "timing_recommendation",
    "risk_notes",
];

const EXTRACT_HEADER: &[&str] = &[
    "full_name",
    "title",
    "organization",
    "email",
    "linkedin_url",
    "composite_priority",
    "success_probability",
    "pathway",
    "timing_recommendation",
];

const RISK_HEADER: &[&str] = &[
    "full_name",
    "title",
    "organization",
    "risk_score",
    "risk_notes",
    "category",
    "composite_priority",
];

/// Report writer rooted at an output directory
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    /// Create the writer, making the output directory if needed.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| Error::Persistence(format!("{}: {}", output_dir.display(), e)))?;
        Ok(Self { output_dir })
    }

    /// Write every report artifact for the run.
    pub fn export_all(&self, contacts: &[ScoredContact]) -> Result<()> {
        self.export_master(contacts)?;
        self.export_tiers(contacts)?;
        self.export_segments(contacts)?;
        self.export_risk(contacts)?;
        self.export_immediate_priority(contacts)?;
        Ok(())
    }

    /// Master scored dataset, one row per surviving contact
    pub fn export_master(&self, contacts: &[ScoredContact]) -> Result<PathBuf> {
        let rows: Vec<Vec<String>> = contacts.iter().map(master_row).collect();
        let path = self.output_dir.join("strategic_contacts_master_scored.csv");
        persist_csv(&path, MASTER_HEADER, rows)?;
        tracing::info!(path = %path.display(), rows = contacts.len(), "Wrote master scored dataset");
        Ok(path)
    }

    /// One extract per non-empty tier
    pub fn export_tiers(&self, contacts: &[ScoredContact]) -> Result<()> {
        for tier in EngagementTier::all() {
            let rows: Vec<Vec<String>> = contacts
                .iter()
                .filter(|c| c.strategy.tier == tier)
                .map(extract_row)
                .collect();
            if rows.is_empty() {
                continue;
            }
            let path = self.output_dir.join(format!("contacts_{}.csv", tier.slug()));
            let count = rows.len();
            persist_csv(&path, EXTRACT_HEADER, rows)?;
            tracing::info!(path = %path.display(), rows = count, tier = tier.label(), "Wrote tier extract");
        }
        Ok(())
    }

    /// One extract per non-empty campaign segment
    pub fn export_segments(&self, contacts: &[ScoredContact]) -> Result<()> {
        for segment in CampaignSegment::all() {
            let rows: Vec<Vec<String>> = contacts
                .iter()
                .filter(|c| c.strategy.campaign_segments.contains(&segment))
                .map(extract_row)
                .collect();
            if rows.is_empty() {
                continue;
            }
            let path = self
                .output_dir
                .join(format!("campaign_{}.csv", segment.slug()));
            let count = rows.len();
            persist_csv(&path, EXTRACT_HEADER, rows)?;
            tracing::info!(path = %path.display(), rows = count, segment = segment.as_str(), "Wrote campaign extract");
        }
        Ok(())
    }

    /// Risk assessment extract: everything at risk ≥ 40, riskiest first
    pub fn export_risk(&self, contacts: &[ScoredContact]) -> Result<PathBuf> {
        let mut risky: Vec<&ScoredContact> =
            contacts.iter().filter(|c| c.scores.risk >= 40.0).collect();
        risky.sort_by(|a, b| b.scores.risk.total_cmp(&a.scores.risk));

        let rows: Vec<Vec<String>> = risky.iter().map(|c| risk_row(c)).collect();
        let path = self.output_dir.join("high_risk_contacts_assessment.csv");
        let count = rows.len();
        persist_csv(&path, RISK_HEADER, rows)?;
        tracing::info!(path = %path.display(), rows = count, "Wrote risk assessment");
        Ok(path)
    }

    /// Tier 1 and immediate-timing contacts, highest priority first
    pub fn export_immediate_priority(&self, contacts: &[ScoredContact]) -> Result<PathBuf> {
        let mut urgent: Vec<&ScoredContact> = contacts
            .iter()
            .filter(|c| {
                c.strategy.tier == EngagementTier::Tier1
                    || c.strategy.timing_recommendation == TimingWindow::Immediate
            })
            .collect();
        urgent.sort_by(|a, b| b.scores.composite.total_cmp(&a.scores.composite));

        let rows: Vec<Vec<String>> = urgent.iter().map(|c| extract_row(c)).collect();
        let path = self.output_dir.join("immediate_priority_contacts.csv");
        let count = rows.len();
        persist_csv(&path, EXTRACT_HEADER, rows)?;
        tracing::info!(path = %path.display(), rows = count, "Wrote immediate priority list");
        Ok(path)
    }
}

fn master_row(contact: &ScoredContact) -> Vec<String> {
    let enrichment = &contact.enrichment;
    let record = &enrichment.record;
    let scores = &contact.scores;
    let strategy = &contact.strategy;

    let found_emails = enrichment
        .found_emails()
        .iter()
        .map(|(address, confidence)| format!("{} ({:.2})", address, confidence))
        .collect::<Vec<_>>()
        .join("; ");

    let social_profiles = enrichment
        .fragments
        .iter()
        .filter_map(|f| match f {
            EvidenceFragment::SocialProfile {
                platform, handle, ..
            } => Some(format!("{}:{}", platform, handle)),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("; ");

    let narrative = enrichment
        .fragments
        .iter()
        .find_map(|f| match f {
            EvidenceFragment::NarrativeAssessment { text } => Some(text.clone()),
            _ => None,
        })
        .unwrap_or_default();

    vec![
        enrichment.contact_id.to_string(),
        record.display_name(),
        record.title.clone(),
        record.organization.clone(),
        record.sector.clone(),
        contact.sector.as_str().to_string(),
        record.location.clone(),
        record.email.clone(),
        record.linkedin_url.clone(),
        record.contact_info.clone(),
        record.notes.clone(),
        record.connected_date.clone(),
        record.source_file.clone(),
        found_emails,
        social_profiles,
        enrichment.mention_count().to_string(),
        narrative,
        join_set(&enrichment.sources_consulted),
        join_set(&enrichment.sources_with_evidence),
        format!("{:.2}", enrichment.research_confidence),
        format!("{:.1}", scores.relevance),
        format!("{:.1}", scores.influence),
        format!("{:.1}", scores.accessibility),
        format!("{:.1}", scores.timing),
        format!("{:.1}", scores.strategic_value),
        format!("{:.1}", scores.risk),
        format!("{:.1}", scores.composite),
        strategy.tier.label().to_string(),
        strategy.category.as_str().to_string(),
        strategy
            .approaches
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join("; "),
        strategy
            .campaign_segments
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join("; "),
        strategy.pathway.as_str().to_string(),
        format!("{:.1}", strategy.success_probability),
        strategy.resource_requirement.as_str().to_string(),
        strategy.timing_recommendation.as_str().to_string(),
        strategy.risk_notes.join("; "),
    ]
}

fn extract_row(contact: &ScoredContact) -> Vec<String> {
    let record = &contact.enrichment.record;
    vec![
        record.display_name(),
        record.title.clone(),
        record.organization.clone(),
        record.email.clone(),
        record.linkedin_url.clone(),
        format!("{:.1}", contact.scores.composite),
        format!("{:.1}", contact.strategy.success_probability),
        contact.strategy.pathway.as_str().to_string(),
        contact.strategy.timing_recommendation.as_str().to_string(),
    ]
}

fn risk_row(contact: &ScoredContact) -> Vec<String> {
    let record = &contact.enrichment.record;
    vec![
        record.display_name(),
        record.title.clone(),
        record.organization.clone(),
        format!("{:.1}", contact.scores.risk),
        contact.strategy.risk_notes.join("; "),
        contact.strategy.category.as_str().to_string(),
        format!("{:.1}", contact.scores.composite),
    ]
}

fn join_set(set: &std::collections::BTreeSet<String>) -> String {
    set.iter().cloned().collect::<Vec<_>>().join("; ")
}

/// Serialize rows to CSV bytes, then temp-write + rename into place
fn persist_csv(path: &Path, header: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(header)
        .map_err(|e| Error::Persistence(e.to_string()))?;
    for row in rows {
        writer
            .write_record(&row)
            .map_err(|e| Error::Persistence(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Persistence(e.to_string()))?;

    let temp_path = path.with_extension("csv.tmp");
    std::fs::write(&temp_path, bytes)
        .map_err(|e| Error::Persistence(format!("{}: {}", temp_path.display(), e)))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| Error::Persistence(format!("{}: {}", path.display(), e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::score_contacts;
    use crate::scoring::ScoringEngine;
    use crate::types::{ContactEnrichment, ContactIdentity, RawContactRecord};

    fn scored(records: Vec<RawContactRecord>) -> Vec<ScoredContact> {
        let engine = ScoringEngine::with_current_year(2025);
        let enrichments = records
            .into_iter()
            .map(|record| {
                let identity = ContactIdentity::from_record(&record).unwrap();
                ContactEnrichment::new(identity, record)
            })
            .collect();
        score_contacts(enrichments, &engine)
    }

    fn jane() -> RawContactRecord {
        RawContactRecord {
            full_name: "Jane Doe".to_string(),
            title: "Director, Youth Justice Reform".to_string(),
            organization: "Department of Justice".to_string(),
            notes: "youth justice policy advisor".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_master_export_has_one_row_per_contact() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path()).unwrap();
        let contacts = scored(vec![
            jane(),
            RawContactRecord {
                full_name: "Bob Smith".to_string(),
                organization: "Somewhere".to_string(),
                ..Default::default()
            },
        ]);

        let path = writer.export_master(&contacts).unwrap();
        let mut reader = csv::Reader::from_path(path).unwrap();
        assert_eq!(reader.records().count(), 2);
    }

    #[test]
    fn test_master_header_matches_row_width() {
        let contacts = scored(vec![jane()]);
        let row = master_row(&contacts[0]);
        assert_eq!(row.len(), MASTER_HEADER.len());
    }

    #[test]
    fn test_tier_extracts_partition_contacts() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path()).unwrap();
        let contacts = scored(vec![jane()]);
        writer.export_tiers(&contacts).unwrap();

        let tier = contacts[0].strategy.tier;
        let path = dir.path().join(format!("contacts_{}.csv", tier.slug()));
        assert!(path.exists());
    }

    #[test]
    fn test_risk_extract_filters_below_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path()).unwrap();

        // Jane has zero risk; a partisan investigative contact clears 40
        let risky = RawContactRecord {
            full_name: "Riley Writer".to_string(),
            organization: "Labor Press Office".to_string(),
            notes: "investigative expose work".to_string(),
            ..Default::default()
        };
        let contacts = scored(vec![jane(), risky]);

        let path = writer.export_risk(&contacts).unwrap();
        let mut reader = csv::Reader::from_path(path).unwrap();
        let rows: Vec<_> = reader.records().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "Riley Writer");
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path()).unwrap();
        writer.export_all(&scored(vec![jane()])).unwrap();

        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map(|x| x == "tmp").unwrap_or(false))
            .count();
        assert_eq!(leftovers, 0);
    }
}
