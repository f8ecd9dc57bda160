//! Report generation: scored output rows, partitioned extracts, run summary

pub mod exports;
pub mod summary;

pub use exports::ReportWriter;
pub use summary::RunSummary;

use crate::scoring::{sector, ScoreVector, ScoringEngine, SectorClass};
use crate::strategy::{self, EngagementStrategy};
use crate::types::ContactEnrichment;

/// One fully scored and classified contact - the unit every report row,
/// extract and summary statistic is derived from.
#[derive(Debug, Clone)]
pub struct ScoredContact {
    pub enrichment: ContactEnrichment,
    pub scores: ScoreVector,
    pub sector: SectorClass,
    pub strategy: EngagementStrategy,
}

impl ScoredContact {
    /// Score and classify one frozen enrichment.
    pub fn build(enrichment: ContactEnrichment, engine: &ScoringEngine) -> Self {
        let scores = engine.score(&enrichment);
        let record = &enrichment.record;
        let sector = sector::classify(&record.sector, &record.title, &record.organization);
        let strategy = strategy::classify(&scores, sector);
        Self {
            enrichment,
            scores,
            sector,
            strategy,
        }
    }
}

/// Score and classify a completed enrichment set.
pub fn score_contacts(
    enrichments: Vec<ContactEnrichment>,
    engine: &ScoringEngine,
) -> Vec<ScoredContact> {
    enrichments
        .into_iter()
        .map(|enrichment| ScoredContact::build(enrichment, engine))
        .collect()
}
