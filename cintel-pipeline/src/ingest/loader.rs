//! Contact File Ingestion
//!
//! Reads heterogeneous contact exports into `RawContactRecord`s. CSV
//! headers vary wildly between LinkedIn connection dumps, strategic
//! contact sheets and workspace exports, so columns are mapped through an
//! alias table; unmapped free-text columns are appended to the notes field
//! and feed keyword scoring verbatim.
//!
//! Rows with no identity material (no name, no organisation, no email) are
//! malformed input: skipped and logged, never fatal.

use crate::types::RawContactRecord;
use cintel_common::{Error, Result};
use std::path::Path;

/// Canonical fields a header can map onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    FullName,
    FirstName,
    LastName,
    Title,
    Organization,
    Sector,
    Location,
    Email,
    LinkedinUrl,
    ContactInfo,
    Notes,
    ConnectedDate,
}

/// Header alias table (compared after trim + lowercase)
const HEADER_ALIASES: &[(&str, Field)] = &[
    ("name", Field::FullName),
    ("full name", Field::FullName),
    ("first name", Field::FirstName),
    ("last name", Field::LastName),
    ("title", Field::Title),
    ("position", Field::Title),
    ("role", Field::Title),
    ("title/role", Field::Title),
    ("company", Field::Organization),
    ("organisation", Field::Organization),
    ("organization", Field::Organization),
    ("sector", Field::Sector),
    ("sector/type", Field::Sector),
    ("location", Field::Location),
    ("email", Field::Email),
    ("email address", Field::Email),
    ("url", Field::LinkedinUrl),
    ("linkedin url", Field::LinkedinUrl),
    ("linkedin", Field::LinkedinUrl),
    ("public contact info", Field::ContactInfo),
    ("contact info", Field::ContactInfo),
    ("notes", Field::Notes),
    ("relevance", Field::Notes),
    ("relevance to conx campaign", Field::Notes),
    ("campaign relevance", Field::Notes),
    ("connected on", Field::ConnectedDate),
    ("connected date", Field::ConnectedDate),
];

fn map_header(header: &str) -> Option<Field> {
    let normalized = header.trim().to_lowercase();
    HEADER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, field)| *field)
}

/// Load contact records from a CSV export.
///
/// Returns the parsed records along with the count of skipped malformed
/// rows (already logged individually).
pub fn load_csv(path: &Path) -> Result<(Vec<RawContactRecord>, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::InvalidInput(format!("{}: {}", path.display(), e)))?;

    let headers = reader
        .headers()
        .map_err(|e| Error::InvalidInput(format!("{}: {}", path.display(), e)))?
        .clone();

    let columns: Vec<Option<Field>> = headers.iter().map(map_header).collect();
    let source_file = path.display().to_string();

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (row_index, row) in reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(file = %source_file, row = row_index + 1, error = %e, "Skipping unreadable row");
                skipped += 1;
                continue;
            }
        };

        let mut record = RawContactRecord {
            source_file: source_file.clone(),
            ..Default::default()
        };

        for (value, field) in row.iter().zip(columns.iter()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match field {
                Some(Field::FullName) => record.full_name = value.to_string(),
                Some(Field::FirstName) => record.first_name = value.to_string(),
                Some(Field::LastName) => record.last_name = value.to_string(),
                Some(Field::Title) => record.title = value.to_string(),
                Some(Field::Organization) => record.organization = value.to_string(),
                Some(Field::Sector) => record.sector = value.to_string(),
                Some(Field::Location) => record.location = value.to_string(),
                Some(Field::Email) => record.email = value.to_string(),
                Some(Field::LinkedinUrl) => record.linkedin_url = value.to_string(),
                Some(Field::ContactInfo) => record.contact_info = value.to_string(),
                Some(Field::Notes) => {
                    if record.notes.is_empty() {
                        record.notes = value.to_string();
                    } else {
                        record.notes.push_str("; ");
                        record.notes.push_str(value);
                    }
                }
                Some(Field::ConnectedDate) => record.connected_date = value.to_string(),
                // Unmapped free-text columns are still relevance hints
                None => {
                    if !record.notes.is_empty() {
                        record.notes.push_str("; ");
                    }
                    record.notes.push_str(value);
                }
            }
        }

        if record.display_name().is_empty()
            && record.organization.trim().is_empty()
            && record.email.trim().is_empty()
        {
            tracing::warn!(
                file = %source_file,
                row = row_index + 1,
                "Skipping row with no name, organisation or email"
            );
            skipped += 1;
            continue;
        }

        records.push(record);
    }

    tracing::info!(
        file = %source_file,
        loaded = records.len(),
        skipped = skipped,
        "Loaded contact CSV"
    );

    Ok((records, skipped))
}

/// Dispatch a contact file by extension: `.csv` exports or plain-text
/// address lists (anything else is treated as an address list).
pub fn load_contacts(path: &Path) -> Result<(Vec<RawContactRecord>, usize)> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => load_csv(path),
        _ => {
            let content = std::fs::read_to_string(path)?;
            let records = super::email_list::parse_email_list(&content, &path.display().to_string());
            Ok((records, 0))
        }
    }
}
