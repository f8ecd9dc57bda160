//! Email Address List Ingestion
//!
//! Turns a pasted address blob ("Name <jane.doe@org.gov.au>, bob@uni.edu.au,
//! ...") into raw contact records. The local part supplies a best-guess name,
//! the domain supplies the organisation and a coarse sector label.

use crate::types::RawContactRecord;
use regex::Regex;
use std::collections::HashSet;

/// Sector guesses by domain suffix, first match wins
const DOMAIN_SECTORS: &[(&str, &str)] = &[
    ("gov.au", "Government"),
    (".gov", "Government"),
    ("edu.au", "Academic"),
    (".edu", "Academic"),
    (".ac.", "Academic"),
    ("org.au", "NGO"),
    (".org", "NGO"),
];

/// Parse a comma-separated email list into contact records.
///
/// Addresses are extracted by pattern from each comma-separated item (so
/// "Name <address>" entries work), lowercased, and deduplicated while
/// preserving first-seen order.
pub fn parse_email_list(content: &str, source_file: &str) -> Vec<RawContactRecord> {
    // Address shape only, not full RFC 5322
    let email_pattern = match Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}") {
        Ok(pattern) => pattern,
        Err(e) => {
            tracing::error!(error = %e, "Email pattern failed to compile");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for item in content.split([',', '\n', ';']) {
        let Some(found) = email_pattern.find(item) else {
            continue;
        };
        let email = found.as_str().to_lowercase();
        if !seen.insert(email.clone()) {
            continue;
        }
        records.push(record_from_email(&email, source_file));
    }

    tracing::info!(file = %source_file, loaded = records.len(), "Parsed email list");
    records
}

/// Derive a contact record from a bare address.
pub fn record_from_email(email: &str, source_file: &str) -> RawContactRecord {
    let (local, domain) = email.split_once('@').unwrap_or((email, ""));

    let mut record = RawContactRecord {
        email: email.to_string(),
        source_file: source_file.to_string(),
        ..Default::default()
    };

    // "jane.doe" / "jane_doe" / "jane-doe" -> Jane Doe
    let parts: Vec<&str> = local
        .split(['.', '_', '-'])
        .filter(|p| !p.is_empty())
        .collect();
    match parts.as_slice() {
        [] => {}
        [single] => {
            record.first_name = title_case(single);
            record.full_name = record.first_name.clone();
        }
        [first, last, ..] => {
            record.first_name = title_case(first);
            record.last_name = title_case(last);
            record.full_name = format!("{} {}", record.first_name, record.last_name);
        }
    }

    if !domain.is_empty() {
        if let Some(org_label) = domain.split('.').next() {
            record.organization = title_case(org_label);
        }
        for (suffix, sector) in DOMAIN_SECTORS {
            if domain.ends_with(suffix) || domain.contains(suffix) {
                record.sector = sector.to_string();
                break;
            }
        }
    }

    record
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_names_and_dedupes() {
        let records = parse_email_list(
            "Jane Doe <jane.doe@justice.gov.au>, bob_smith@uni.edu.au, jane.doe@justice.gov.au",
            "inbox.txt",
        );
        assert_eq!(records.len(), 2);

        let jane = &records[0];
        assert_eq!(jane.full_name, "Jane Doe");
        assert_eq!(jane.email, "jane.doe@justice.gov.au");
        assert_eq!(jane.organization, "Justice");
        assert_eq!(jane.sector, "Government");

        let bob = &records[1];
        assert_eq!(bob.full_name, "Bob Smith");
        assert_eq!(bob.sector, "Academic");
    }

    #[test]
    fn test_single_word_local_part() {
        let record = record_from_email("info@reformcoalition.org", "inbox.txt");
        assert_eq!(record.full_name, "Info");
        assert_eq!(record.last_name, "");
        assert_eq!(record.organization, "Reformcoalition");
        assert_eq!(record.sector, "NGO");
    }

    #[test]
    fn test_plain_commercial_domain_has_no_sector() {
        let record = record_from_email("jane@company.com.au", "inbox.txt");
        assert_eq!(record.sector, "");
    }

    #[test]
    fn test_items_without_addresses_are_ignored() {
        let records = parse_email_list("no address here, also nothing", "inbox.txt");
        assert!(records.is_empty());
    }
}
