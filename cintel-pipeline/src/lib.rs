//! # Contact Intelligence Pipeline
//!
//! Builds an enriched, scored contact intelligence database from
//! heterogeneous input records by fanning out to multiple independent,
//! rate-limited external research sources per contact, merging partial
//! results, and producing a deterministic multi-dimensional
//! priority/engagement classification.
//!
//! # Architecture
//! - `ingest` - file loading, header normalisation, deduplication
//! - `services` - rate limiter and research cache (shared infrastructure)
//! - `sources` - one adapter per external research source
//! - `workflow` - per-contact orchestration and recovery checkpointing
//! - `scoring` - pure five-dimension + risk scoring engine
//! - `strategy` - tier/category/engagement classification rules
//! - `reports` - master table, partitioned extracts, run summary

pub mod config;
pub mod ingest;
pub mod reports;
pub mod scoring;
pub mod services;
pub mod sources;
pub mod strategy;
pub mod types;
pub mod workflow;

pub use config::PipelineConfig;
pub use types::{ContactEnrichment, ContactIdentity, EvidenceFragment, RawContactRecord};
