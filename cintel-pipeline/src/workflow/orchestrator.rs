//! Enrichment Orchestrator
//!
//! Coordinates the research sources for one contact at a time. Contacts
//! are processed strictly sequentially and, within a contact, sources run
//! sequentially in their declared order, so evidence fragments accumulate
//! deterministically and the rate-limiter accounting stays exact.
//!
//! # Error Handling
//! - Per-source isolation: a failing source contributes nothing and never
//!   aborts the contact (the adapters already catch their own faults)
//! - Checkpoint flush every N contacts; a flush failure is fatal
//! - Cancellation flushes the completed batch before returning

use super::checkpoint::Checkpoint;
use crate::types::{
    ContactEnrichment, ContactIdentity, RawContactRecord, ResearchSource, SourceHints,
};
use chrono::Utc;
use cintel_common::{Error, Result};
use std::collections::BTreeSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Enrichment orchestrator for a fixed set of enabled sources
pub struct EnrichmentOrchestrator {
    sources: Vec<Box<dyn ResearchSource>>,
    checkpoint: Checkpoint,
    checkpoint_interval: usize,
}

impl EnrichmentOrchestrator {
    /// Create an orchestrator. `sources` must already be in declared
    /// research order; disabled sources are simply not passed in.
    pub fn new(
        sources: Vec<Box<dyn ResearchSource>>,
        checkpoint: Checkpoint,
        checkpoint_interval: usize,
    ) -> Self {
        Self {
            sources,
            checkpoint,
            checkpoint_interval: checkpoint_interval.max(1),
        }
    }

    /// Research every contact, resuming from the checkpoint.
    ///
    /// Returns the full completed set (checkpointed work plus this run's).
    /// On cancellation the completed batch is flushed and the run ends
    /// with an error so callers never emit a partial master output.
    pub async fn run(
        &self,
        contacts: Vec<(ContactIdentity, RawContactRecord)>,
        cancel: &CancellationToken,
    ) -> Result<Vec<ContactEnrichment>> {
        let mut completed = self.checkpoint.load();
        let done: BTreeSet<ContactIdentity> =
            completed.iter().map(|e| e.identity.clone()).collect();

        let total = contacts.len();
        let pending: Vec<_> = contacts
            .into_iter()
            .filter(|(identity, _)| !done.contains(identity))
            .collect();

        info!(
            total = total,
            resumed = done.len(),
            pending = pending.len(),
            sources = self.sources.len(),
            "Starting enrichment run"
        );

        let mut since_flush = 0usize;
        for (index, (identity, record)) in pending.into_iter().enumerate() {
            if cancel.is_cancelled() {
                warn!("Enrichment interrupted, flushing checkpoint before exit");
                self.checkpoint.flush(&completed)?;
                return Err(Error::Internal(
                    "enrichment run interrupted; completed work checkpointed".to_string(),
                ));
            }

            let enrichment = self.enrich_contact(identity, record).await;
            completed.push(enrichment);
            since_flush += 1;

            if since_flush >= self.checkpoint_interval {
                self.checkpoint.flush(&completed)?;
                since_flush = 0;
                info!(processed = index + 1, completed = completed.len(), "Progress checkpointed");
            }
        }

        self.checkpoint.flush(&completed)?;
        info!(completed = completed.len(), "Enrichment run complete");
        Ok(completed)
    }

    /// Research a single contact through every source in declared order.
    pub async fn enrich_contact(
        &self,
        identity: ContactIdentity,
        record: RawContactRecord,
    ) -> ContactEnrichment {
        let name = record.display_name();
        info!(contact = %name, organization = %record.organization, "Researching contact");

        let mut enrichment = ContactEnrichment::new(identity, record);

        for source in &self.sources {
            // Hints are rebuilt per source so later sources (narrative
            // analysis in particular) see the evidence gathered so far.
            let hints = build_hints(&enrichment);

            let fragments = source.lookup(&enrichment.identity, &hints).await;
            enrichment.sources_consulted.insert(source.name().to_string());

            if fragments.is_empty() {
                debug!(contact = %name, source = source.name(), "No evidence returned");
            } else {
                debug!(
                    contact = %name,
                    source = source.name(),
                    fragments = fragments.len(),
                    "Evidence collected"
                );
                enrichment
                    .sources_with_evidence
                    .insert(source.name().to_string());
                enrichment.fragments.extend(fragments);
            }
        }

        enrichment.research_confidence = if self.sources.is_empty() {
            0.0
        } else {
            enrichment.sources_with_evidence.len() as f64 / self.sources.len() as f64
        };
        enrichment.researched_at = Utc::now();

        info!(
            contact = %name,
            fragments = enrichment.fragments.len(),
            confidence = %format!("{:.2}", enrichment.research_confidence),
            "Contact research complete"
        );
        enrichment
    }
}

/// Assemble the hint map for one source invocation
fn build_hints(enrichment: &ContactEnrichment) -> SourceHints {
    let record = &enrichment.record;
    let mut hints = SourceHints::new();

    hints.insert("name".to_string(), record.display_name());
    if !record.first_name.trim().is_empty() {
        hints.insert("first_name".to_string(), record.first_name.trim().to_string());
    } else if let Some((first, rest)) = record.display_name().split_once(' ') {
        // Derive name parts from the display name when the export did not
        // split them
        hints.insert("first_name".to_string(), first.to_string());
        if record.last_name.trim().is_empty() {
            hints.insert("last_name".to_string(), rest.to_string());
        }
    }
    if !record.last_name.trim().is_empty() {
        hints.insert("last_name".to_string(), record.last_name.trim().to_string());
    }
    if !record.organization.trim().is_empty() {
        hints.insert("organization".to_string(), record.organization.trim().to_string());
    }
    if !record.title.trim().is_empty() {
        hints.insert("title".to_string(), record.title.trim().to_string());
    }
    if !record.notes.trim().is_empty() {
        hints.insert("notes".to_string(), record.notes.trim().to_string());
    }
    if let Some((_, domain)) = record.email.trim().split_once('@') {
        hints.insert("domain".to_string(), domain.to_lowercase());
    }

    if !enrichment.fragments.is_empty() {
        let summary: Vec<&'static str> =
            enrichment.fragments.iter().map(|f| f.kind()).collect();
        hints.insert("evidence_summary".to_string(), summary.join(", "));
    }

    hints
}
