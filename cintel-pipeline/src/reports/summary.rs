//! Run Summary
//!
//! Machine-readable digest of a run: counts per tier and category, mean
//! scores, and the headline action counts. Written as JSON next to the
//! CSV artifacts.

use super::ScoredContact;
use crate::strategy::TimingWindow;
use cintel_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Mean scores across the run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeanScores {
    pub composite_priority: f64,
    pub relevance: f64,
    pub influence: f64,
    pub accessibility: f64,
    pub success_probability: f64,
}

/// Machine-readable run summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_contacts: usize,
    pub tier_distribution: BTreeMap<String, usize>,
    pub category_distribution: BTreeMap<String, usize>,
    pub mean_scores: MeanScores,
    /// Contacts with composite ≥ 80
    pub high_priority_count: usize,
    /// Contacts recommended for immediate engagement
    pub immediate_action_count: usize,
    /// Contacts with risk ≥ 60
    pub high_risk_count: usize,
    /// Mean research confidence across the run
    pub mean_research_confidence: f64,
}

impl RunSummary {
    pub fn from_contacts(contacts: &[ScoredContact]) -> Self {
        let total = contacts.len();
        let mut tier_distribution = BTreeMap::new();
        let mut category_distribution = BTreeMap::new();

        for contact in contacts {
            *tier_distribution
                .entry(contact.strategy.tier.label().to_string())
                .or_insert(0) += 1;
            *category_distribution
                .entry(contact.strategy.category.as_str().to_string())
                .or_insert(0) += 1;
        }

        let mean = |f: &dyn Fn(&ScoredContact) -> f64| {
            if total == 0 {
                0.0
            } else {
                contacts.iter().map(|c| f(c)).sum::<f64>() / total as f64
            }
        };

        Self {
            total_contacts: total,
            tier_distribution,
            category_distribution,
            mean_scores: MeanScores {
                composite_priority: mean(&|c| c.scores.composite),
                relevance: mean(&|c| c.scores.relevance),
                influence: mean(&|c| c.scores.influence),
                accessibility: mean(&|c| c.scores.accessibility),
                success_probability: mean(&|c| c.strategy.success_probability),
            },
            high_priority_count: contacts.iter().filter(|c| c.scores.composite >= 80.0).count(),
            immediate_action_count: contacts
                .iter()
                .filter(|c| c.strategy.timing_recommendation == TimingWindow::Immediate)
                .count(),
            high_risk_count: contacts.iter().filter(|c| c.scores.risk >= 60.0).count(),
            mean_research_confidence: mean(&|c| c.enrichment.research_confidence),
        }
    }

    /// Write the summary JSON into the output directory. Fatal on failure.
    pub fn write(&self, output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join("engagement_strategy_summary.json");
        let json = serde_json::to_string_pretty(self)?;

        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)
            .map_err(|e| Error::Persistence(format!("{}: {}", temp_path.display(), e)))?;
        std::fs::rename(&temp_path, &path)
            .map_err(|e| Error::Persistence(format!("{}: {}", path.display(), e)))?;

        tracing::info!(path = %path.display(), "Wrote run summary");
        Ok(path)
    }
}
