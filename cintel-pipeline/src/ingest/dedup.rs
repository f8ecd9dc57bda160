//! Contact Deduplication
//!
//! Collapses raw records referring to the same real-world contact. Identity
//! is the verified email when present, else normalised name+organisation.
//! The surviving record is the one with the highest non-empty field count;
//! equal completeness falls back to a total order on the serialised record,
//! so the outcome is independent of input order. Every discard is logged.
//!
//! Idempotent by construction: a second pass over an already-deduplicated
//! set finds no collisions and changes nothing.

use crate::types::{ContactIdentity, RawContactRecord};
use std::collections::BTreeMap;

/// Deduplication result
#[derive(Debug)]
pub struct DedupOutcome {
    /// Surviving records, ordered by identity key (stable across runs)
    pub unique: Vec<(ContactIdentity, RawContactRecord)>,
    /// Number of discarded colliding records
    pub discarded: usize,
    /// Number of skipped malformed records (no identity material)
    pub malformed: usize,
}

/// Deduplicate raw records by contact identity.
pub fn dedupe(records: Vec<RawContactRecord>) -> DedupOutcome {
    let mut survivors: BTreeMap<ContactIdentity, RawContactRecord> = BTreeMap::new();
    let mut discarded = 0usize;
    let mut malformed = 0usize;

    for record in records {
        let Some(identity) = ContactIdentity::from_record(&record) else {
            tracing::warn!(
                source = %record.source_file,
                "Skipping record with no identity material"
            );
            malformed += 1;
            continue;
        };

        match survivors.remove(&identity) {
            None => {
                survivors.insert(identity, record);
            }
            Some(existing) => {
                let (keep, dropped) = if wins_over(&record, &existing) {
                    (record, existing)
                } else {
                    (existing, record)
                };
                tracing::info!(
                    identity = %identity,
                    kept_completeness = keep.completeness(),
                    dropped_completeness = dropped.completeness(),
                    dropped_source = %dropped.source_file,
                    "Discarding duplicate contact record"
                );
                survivors.insert(identity, keep);
                discarded += 1;
            }
        }
    }

    DedupOutcome {
        unique: survivors.into_iter().collect(),
        discarded,
        malformed,
    }
}

/// Whether `candidate` replaces `incumbent`: higher completeness wins;
/// ties fall to the lexicographically smaller serialisation so the choice
/// does not depend on arrival order.
fn wins_over(candidate: &RawContactRecord, incumbent: &RawContactRecord) -> bool {
    match candidate.completeness().cmp(&incumbent.completeness()) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => stable_token(candidate) < stable_token(incumbent),
    }
}

fn stable_token(record: &RawContactRecord) -> String {
    serde_json::to_string(record).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, org: &str, title: &str) -> RawContactRecord {
        RawContactRecord {
            full_name: name.to_string(),
            organization: org.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_collision_keeps_most_complete() {
        let sparse = record("Jane Doe", "Justice Org", "");
        let mut complete = record("Jane Doe", "Justice Org", "Director");
        complete.email = String::new();
        complete.location = "Canberra".to_string();

        let outcome = dedupe(vec![sparse.clone(), complete.clone()]);
        assert_eq!(outcome.unique.len(), 1);
        assert_eq!(outcome.discarded, 1);
        assert_eq!(outcome.unique[0].1, complete);

        // Survivor completeness >= every discarded record's completeness
        assert!(outcome.unique[0].1.completeness() >= sparse.completeness());
    }

    #[test]
    fn test_case_differences_still_collide() {
        let a = record("Jane DOE", "Justice Org", "Director");
        let b = record("jane doe", "JUSTICE ORG", "");

        let outcome = dedupe(vec![a, b]);
        assert_eq!(outcome.unique.len(), 1);
        assert_eq!(outcome.discarded, 1);
    }

    #[test]
    fn test_order_independent() {
        let a = record("Jane Doe", "Justice Org", "Director");
        let b = record("Jane Doe", "Justice Org", "Advisor");
        let c = record("Bob Smith", "Uni", "Professor");

        let forward = dedupe(vec![a.clone(), b.clone(), c.clone()]);
        let reverse = dedupe(vec![c, b, a]);

        let forward_records: Vec<_> = forward.unique.iter().map(|(_, r)| r.clone()).collect();
        let reverse_records: Vec<_> = reverse.unique.iter().map(|(_, r)| r.clone()).collect();
        assert_eq!(forward_records, reverse_records);
    }

    #[test]
    fn test_idempotent() {
        let records = vec![
            record("Jane Doe", "Justice Org", "Director"),
            record("Jane Doe", "Justice Org", ""),
            record("Bob Smith", "Uni", "Professor"),
        ];

        let once = dedupe(records);
        let survivors: Vec<_> = once.unique.iter().map(|(_, r)| r.clone()).collect();
        let twice = dedupe(survivors.clone());

        assert_eq!(twice.discarded, 0);
        let twice_records: Vec<_> = twice.unique.iter().map(|(_, r)| r.clone()).collect();
        assert_eq!(twice_records, survivors);
    }

    #[test]
    fn test_shared_email_collides_across_names() {
        let mut a = record("Jane Doe", "Justice Org", "Director");
        a.email = "jane@org.au".to_string();
        let mut b = record("J. Doe", "Elsewhere", "");
        b.email = "JANE@org.au".to_string();

        let outcome = dedupe(vec![a, b]);
        assert_eq!(outcome.unique.len(), 1);
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let outcome = dedupe(vec![record("", "", ""), record("Jane Doe", "Org", "")]);
        assert_eq!(outcome.unique.len(), 1);
        assert_eq!(outcome.malformed, 1);
    }
}
