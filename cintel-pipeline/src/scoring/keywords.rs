//! Keyword and indicator tables for contact scoring
//!
//! The domain vocabulary behind every keyword-based scoring term. Matching
//! is plain lowercase substring search over the combined text fields, so
//! multi-word phrases are listed exactly as they appear in source material.

/// High-relevance phrases (25 points, tier contribution capped at 50)
pub const HIGH_RELEVANCE: &[&str] = &[
    "youth justice",
    "juvenile justice",
    "youth detention",
    "young offenders",
    "children's court",
    "youth advocacy",
    "juvenile reform",
    "youth crime",
    "detention centre",
    "first nations youth",
    "indigenous youth",
    "children's ground",
    "youth at risk",
    "young people in custody",
];

/// Medium-relevance phrases (10 points, tier contribution capped at 30)
pub const MEDIUM_RELEVANCE: &[&str] = &[
    "criminal justice",
    "justice reform",
    "social justice",
    "human rights",
    "child protection",
    "social work",
    "community services",
    "legal aid",
    "indigenous affairs",
    "first nations",
    "aboriginal",
    "torres strait",
    "disadvantaged youth",
    "at-risk youth",
    "youth services",
];

/// Low-relevance phrases (5 points, tier contribution capped at 15)
pub const LOW_RELEVANCE: &[&str] = &[
    "policy",
    "government",
    "public service",
    "research",
    "academic",
    "social impact",
    "community",
    "nonprofit",
    "philanthropy",
    "media",
    "journalism",
    "education",
    "health",
];

/// Organisation names that earn the direct relevance bonus
pub const RELEVANT_ORGS: &[&str] = &["children's ground", "justice", "youth", "juvenile"];

/// Sector labels that add relevance when present in the sector field
pub const SECTOR_RELEVANCE: &[(&str, f64)] = &[
    ("campaign leader", 40.0),
    ("campaign partner", 30.0),
    ("global expert", 35.0),
    ("civil society", 20.0),
    ("media", 25.0),
    ("government", 30.0),
    ("academic", 15.0),
    ("legal", 25.0),
];

/// Senior titles (30 points each, base capped at 60; ×1.5 seniority)
pub const HIGH_INFLUENCE_TITLES: &[&str] = &[
    "minister",
    "secretary",
    "director-general",
    "ceo",
    "chair",
    "commissioner",
    "chief",
    "president",
    "premier",
    "mp",
    "senator",
    "judge",
    "magistrate",
    "professor",
    "dean",
];

/// Mid-level titles (15 points each, base capped at 30; ×1.25 seniority)
pub const MEDIUM_INFLUENCE_TITLES: &[&str] = &[
    "director",
    "manager",
    "head of",
    "principal",
    "coordinator",
    "senior",
    "lead",
    "executive",
    "advisor",
    "consultant",
    "journalist",
    "editor",
    "producer",
    "researcher",
];

/// National media organisations with outsized reach
pub const MEDIA_ORGS: &[&str] = &[
    "abc",
    "sbs",
    "guardian",
    "age",
    "smh",
    "four corners",
    "60 minutes",
];

/// Government organisation markers
pub const GOV_INDICATORS: &[&str] = &["minister", "department", "government", "public service"];

/// Academic organisation markers
pub const ACADEMIC_INDICATORS: &[&str] = &["university", "professor", "research", "institute"];

/// Organisations that tend to respond to cold contact
pub const ACCESSIBLE_ORGS: &[&str] = &["abc", "sbs", "university", "foundation", "nonprofit"];

/// Titles and note phrases carrying long-term strategic value
pub const HIGH_VALUE_INDICATORS: &[&str] = &[
    "founder",
    "ceo",
    "director",
    "minister",
    "professor",
    "editor",
    "columnist",
    "commissioner",
    "chair",
];

/// Partisan political affiliations (risk)
pub const PARTISAN_ORGS: &[&str] = &["liberal", "labor", "greens"];
