//! cintel-pipeline - Contact Research and Scoring Pipeline
//!
//! Thin binary entry point: resolves configuration, loads and
//! deduplicates the input records, runs the enrichment orchestrator, then
//! scores, classifies and exports the results.

use anyhow::{Context, Result};
use chrono::Duration as ChronoDuration;
use cintel_common::config::{self as common_config, ConfigFile};
use cintel_pipeline::config::PipelineConfig;
use cintel_pipeline::reports::{score_contacts, ReportWriter, RunSummary};
use cintel_pipeline::scoring::ScoringEngine;
use cintel_pipeline::services::{CacheStore, RateLimiter};
use cintel_pipeline::workflow::{
    build_http_client, build_sources, Checkpoint, EnrichmentOrchestrator,
};
use cintel_pipeline::{ingest, ContactIdentity};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Contact research, scoring and engagement classification pipeline
#[derive(Debug, Parser)]
#[command(name = "cintel-pipeline", version, about)]
struct Cli {
    /// Input contact file (.csv export, or a plain-text address list)
    input: PathBuf,

    /// Data directory (cache, checkpoint, reports); overrides env/config
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Report output directory; overrides env/config
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Disable every research source (scoring-only run)
    #[arg(long)]
    offline: bool,

    /// Process at most this many contacts this run
    #[arg(long)]
    limit: Option<usize>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing (RUST_LOG overrides the default level)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!("Starting cintel-pipeline (Contact Intelligence)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Configuration: defaults ← config file ← environment ← CLI
    let file = ConfigFile::load_default();
    let data_dir = common_config::resolve_data_dir(cli.data_dir.as_deref(), &file);
    common_config::ensure_dir(&data_dir).context("Failed to initialize data directory")?;

    let mut config = PipelineConfig::defaults(&data_dir)
        .apply_file(&file)
        .apply_env();
    if cli.offline {
        config = config.offline();
    }
    if let Some(ref output_dir) = cli.output_dir {
        config.output_dir = output_dir.clone();
    }

    info!(
        input = %cli.input.display(),
        output = %config.output_dir.display(),
        rate = %format!("{}/min, {}/hour", config.requests_per_minute, config.requests_per_hour),
        sources = ?config.enabled_sources(),
        "Configuration resolved"
    );

    // Ingest and deduplicate
    let (records, skipped) =
        ingest::load_contacts(&cli.input).context("Failed to load input contacts")?;
    if skipped > 0 {
        warn!(skipped = skipped, "Some input rows were malformed and skipped");
    }

    let outcome = ingest::dedupe(records);
    info!(
        unique = outcome.unique.len(),
        discarded = outcome.discarded,
        malformed = outcome.malformed,
        "Deduplication complete"
    );

    let mut contacts: Vec<(ContactIdentity, _)> = outcome.unique;
    if let Some(limit) = cli.limit {
        contacts.truncate(limit);
    }

    // Shared infrastructure
    let cache = Arc::new(CacheStore::new(
        &config.cache_dir,
        ChronoDuration::hours(config.cache_ttl_hours as i64),
    ));
    let limiter = Arc::new(RateLimiter::new(
        config.requests_per_minute,
        config.requests_per_hour,
    ));
    let client = build_http_client().context("Failed to build HTTP client")?;

    // Orchestrate enrichment, flushing the checkpoint on Ctrl-C
    let sources = build_sources(&config, cache, limiter, client);
    let orchestrator = EnrichmentOrchestrator::new(
        sources,
        Checkpoint::new(&config.checkpoint_path),
        config.checkpoint_interval,
    );

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing current contact then stopping");
            signal_token.cancel();
        }
    });

    let enrichments = orchestrator
        .run(contacts, &cancel)
        .await
        .context("Enrichment run did not complete")?;

    // Score, classify, export
    let engine = ScoringEngine::new();
    let scored = score_contacts(enrichments, &engine);

    let writer = ReportWriter::new(&config.output_dir)?;
    writer.export_all(&scored)?;

    let summary = RunSummary::from_contacts(&scored);
    summary.write(&config.output_dir)?;

    info!(
        contacts = summary.total_contacts,
        high_priority = summary.high_priority_count,
        immediate_action = summary.immediate_action_count,
        high_risk = summary.high_risk_count,
        mean_composite = %format!("{:.1}", summary.mean_scores.composite_priority),
        "Pipeline complete"
    );

    let mut top = scored;
    top.sort_by(|a, b| b.scores.composite.total_cmp(&a.scores.composite));
    for contact in top.iter().take(10) {
        info!(
            name = %contact.enrichment.record.display_name(),
            organization = %contact.enrichment.record.organization,
            score = %format!("{:.1}", contact.scores.composite),
            tier = contact.strategy.tier.label(),
            "Priority contact"
        );
    }

    Ok(())
}
