//! Sector Classification
//!
//! Standardises the free-text sector column - or, when absent, infers a
//! sector from title and organisation keywords. First matching class wins,
//! evaluated in a fixed order. The class feeds the influence multiplier
//! and a handful of accessibility/timing adjustments.

/// Standardised sector classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorClass {
    Government,
    Media,
    Ngo,
    Philanthropy,
    Academic,
    Legal,
    Corporate,
    CivilSociety,
    Other,
}

impl SectorClass {
    /// Display label for report output
    pub fn as_str(&self) -> &'static str {
        match self {
            SectorClass::Government => "Government",
            SectorClass::Media => "Media",
            SectorClass::Ngo => "NGO",
            SectorClass::Philanthropy => "Philanthropy",
            SectorClass::Academic => "Academic",
            SectorClass::Legal => "Legal",
            SectorClass::Corporate => "Corporate",
            SectorClass::CivilSociety => "Civil Society",
            SectorClass::Other => "Other",
        }
    }

    /// Influence multiplier applied to the indicator base
    pub fn influence_multiplier(&self) -> f64 {
        match self {
            SectorClass::Government => 3.0,
            SectorClass::Media => 2.5,
            SectorClass::Legal => 2.2,
            SectorClass::Academic => 2.0,
            SectorClass::Ngo | SectorClass::Philanthropy => 1.8,
            SectorClass::CivilSociety => 1.5,
            SectorClass::Corporate => 1.3,
            SectorClass::Other => 1.0,
        }
    }
}

/// Keyword classes in evaluation order (first match wins)
const SECTOR_KEYWORDS: &[(SectorClass, &[&str])] = &[
    (
        SectorClass::Government,
        &[
            "politician",
            "minister",
            "mp",
            "senator",
            "council",
            "commission",
            "department",
        ],
    ),
    (
        SectorClass::Media,
        &[
            "journalist", "reporter", "editor", "producer", "abc", "sbs", "nine", "seven", "ten",
            "radio",
        ],
    ),
    (
        SectorClass::Ngo,
        &["foundation", "charity", "advocacy", "rights", "coalition", "community"],
    ),
    (
        SectorClass::Philanthropy,
        &["philanthropist", "donor", "grant", "funding"],
    ),
    (
        SectorClass::Academic,
        &["university", "professor", "researcher", "phd", "academic", "research"],
    ),
    (
        SectorClass::Legal,
        &["judge", "magistrate", "lawyer", "barrister", "solicitor", "court", "legal"],
    ),
    (
        SectorClass::Corporate,
        &["ceo", "director", "manager", "executive", "business", "corporate", "company"],
    ),
    (
        SectorClass::CivilSociety,
        &["activist", "advocate", "organiser", "campaigner", "community leader"],
    ),
];

/// Names matched against the explicit sector column
const SECTOR_LABELS: &[(SectorClass, &str)] = &[
    (SectorClass::Government, "government"),
    (SectorClass::Media, "media"),
    (SectorClass::Ngo, "ngo"),
    (SectorClass::Philanthropy, "philanthropy"),
    (SectorClass::Academic, "academic"),
    (SectorClass::Legal, "legal"),
    (SectorClass::Corporate, "corporate"),
    (SectorClass::CivilSociety, "civil society"),
];

/// Classify a contact's sector.
///
/// The explicit sector column wins when it names a known class; otherwise
/// title + organisation text is scanned class by class.
pub fn classify(sector_field: &str, title: &str, organization: &str) -> SectorClass {
    let sector_lower = sector_field.to_lowercase();
    if !sector_lower.trim().is_empty() {
        for (class, label) in SECTOR_LABELS {
            if sector_lower.contains(label) {
                return *class;
            }
        }
    }

    let text = format!("{} {}", title, organization).to_lowercase();
    for (class, keywords) in SECTOR_KEYWORDS {
        if keywords.iter().any(|k| text.contains(k)) {
            return *class;
        }
    }

    SectorClass::Other
}
