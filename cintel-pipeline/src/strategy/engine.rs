//! Engagement Strategy Classification
//!
//! Pure function from a `ScoreVector` to an `EngagementStrategy`. Tier and
//! category use ordered rule lists evaluated top-down (first satisfied rule
//! wins, so there is no overlap ambiguity); approaches and campaign
//! segments are independent additive inclusion rules where order does not
//! matter.

use crate::scoring::{ScoreVector, SectorClass};
use serde::{Deserialize, Serialize};

// ============================================================================
// Strategy vocabulary
// ============================================================================

/// Engagement tier, ordered by outreach urgency (1 = highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EngagementTier {
    Tier1,
    Tier2,
    Tier3,
    Tier4,
}

impl EngagementTier {
    /// Numeric rank (1 = highest priority)
    pub fn rank(&self) -> u8 {
        match self {
            EngagementTier::Tier1 => 1,
            EngagementTier::Tier2 => 2,
            EngagementTier::Tier3 => 3,
            EngagementTier::Tier4 => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EngagementTier::Tier1 => "Tier 1: Immediate Priority",
            EngagementTier::Tier2 => "Tier 2: Important Influencers",
            EngagementTier::Tier3 => "Tier 3: Network Builders",
            EngagementTier::Tier4 => "Tier 4: Long-term Cultivation",
        }
    }

    /// File-name friendly slug for tier-partitioned exports
    pub fn slug(&self) -> &'static str {
        match self {
            EngagementTier::Tier1 => "tier_1_immediate_priority",
            EngagementTier::Tier2 => "tier_2_important_influencers",
            EngagementTier::Tier3 => "tier_3_network_builders",
            EngagementTier::Tier4 => "tier_4_long_term_cultivation",
        }
    }

    pub fn all() -> [EngagementTier; 4] {
        [
            EngagementTier::Tier1,
            EngagementTier::Tier2,
            EngagementTier::Tier3,
            EngagementTier::Tier4,
        ]
    }
}

/// Strategic category (fixed label set, first matching rule wins)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Champions,
    Gatekeepers,
    Amplifiers,
    Validators,
    Blockers,
    Convincibles,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Champions => "Champions",
            Category::Gatekeepers => "Gatekeepers",
            Category::Amplifiers => "Amplifiers",
            Category::Validators => "Validators",
            Category::Blockers => "Blockers",
            Category::Convincibles => "Convincibles",
        }
    }
}

/// Engagement approaches (a contact may accumulate several)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Approach {
    DirectApproach,
    EventInvitation,
    AdvisoryRole,
    MediaCollaboration,
    ResearchPartnership,
}

impl Approach {
    pub fn as_str(&self) -> &'static str {
        match self {
            Approach::DirectApproach => "Direct Approach",
            Approach::EventInvitation => "Event Invitation",
            Approach::AdvisoryRole => "Advisory Role",
            Approach::MediaCollaboration => "Media Collaboration",
            Approach::ResearchPartnership => "Research Partnership",
        }
    }
}

/// Campaign segments (a contact may belong to several)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignSegment {
    YouthJusticeChampions,
    PoliticalEngagement,
    MediaOutreach,
    AcademicAlliance,
}

impl CampaignSegment {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignSegment::YouthJusticeChampions => "Youth Justice Champions Campaign",
            CampaignSegment::PoliticalEngagement => "Political Engagement Campaign",
            CampaignSegment::MediaOutreach => "Media Outreach Campaign",
            CampaignSegment::AcademicAlliance => "Academic Alliance Campaign",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            CampaignSegment::YouthJusticeChampions => "youth_justice_champions_campaign",
            CampaignSegment::PoliticalEngagement => "political_engagement_campaign",
            CampaignSegment::MediaOutreach => "media_outreach_campaign",
            CampaignSegment::AcademicAlliance => "academic_alliance_campaign",
        }
    }

    pub fn all() -> [CampaignSegment; 4] {
        [
            CampaignSegment::YouthJusticeChampions,
            CampaignSegment::PoliticalEngagement,
            CampaignSegment::MediaOutreach,
            CampaignSegment::AcademicAlliance,
        ]
    }
}

/// First-contact pathway (single-threshold ladder on accessibility)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pathway {
    DirectContact,
    SocialMediaEngagement,
    FormalRequest,
    WarmIntroduction,
}

impl Pathway {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pathway::DirectContact => "Direct Contact",
            Pathway::SocialMediaEngagement => "Social Media Engagement",
            Pathway::FormalRequest => "Formal Request",
            Pathway::WarmIntroduction => "Warm Introduction",
        }
    }
}

/// Resource tier (ladder on composite priority)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceTier {
    HighTouch,
    MediumTouch,
    LowTouch,
}

impl ResourceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceTier::HighTouch => "High Touch",
            ResourceTier::MediumTouch => "Medium Touch",
            ResourceTier::LowTouch => "Low Touch",
        }
    }
}

/// Timing recommendation (ladder on the timing score)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimingWindow {
    Immediate,
    ShortTerm,
    LongTerm,
}

impl TimingWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimingWindow::Immediate => "Immediate (1-2 weeks)",
            TimingWindow::ShortTerm => "Short-term (1-2 months)",
            TimingWindow::LongTerm => "Long-term (3-6 months)",
        }
    }
}

/// The full recommendation bundle for one contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementStrategy {
    pub tier: EngagementTier,
    pub category: Category,
    pub approaches: Vec<Approach>,
    pub campaign_segments: Vec<CampaignSegment>,
    pub pathway: Pathway,
    /// In [0,100], clipped to at most 95 - never claims certainty
    pub success_probability: f64,
    pub resource_requirement: ResourceTier,
    pub timing_recommendation: TimingWindow,
    pub risk_notes: Vec<String>,
}

// ============================================================================
// Classification
// ============================================================================

/// Classify a score vector into an engagement strategy.
pub fn classify(scores: &ScoreVector, sector: SectorClass) -> EngagementStrategy {
    EngagementStrategy {
        tier: tier(scores.composite),
        category: category(scores),
        approaches: approaches(scores),
        campaign_segments: campaign_segments(scores, sector),
        pathway: pathway(scores.accessibility),
        success_probability: success_probability(scores),
        resource_requirement: resource_requirement(scores.composite),
        timing_recommendation: timing_recommendation(scores.timing),
        risk_notes: risk_notes(scores),
    }
}

/// Ordered tier thresholds, first satisfied wins
fn tier(composite: f64) -> EngagementTier {
    if composite >= 80.0 {
        EngagementTier::Tier1
    } else if composite >= 65.0 {
        EngagementTier::Tier2
    } else if composite >= 50.0 {
        EngagementTier::Tier3
    } else {
        EngagementTier::Tier4
    }
}

/// Ordered category rules, first satisfied wins
fn category(s: &ScoreVector) -> Category {
    if s.relevance >= 70.0 && s.influence >= 60.0 {
        Category::Champions
    } else if s.influence >= 70.0 {
        Category::Gatekeepers
    } else if s.accessibility >= 70.0 && s.influence >= 50.0 {
        Category::Amplifiers
    } else if s.relevance >= 60.0 {
        Category::Validators
    } else if s.accessibility <= 40.0 || s.risk >= 60.0 {
        Category::Blockers
    } else {
        Category::Convincibles
    }
}

/// Additive inclusion rules; order carries no meaning
fn approaches(s: &ScoreVector) -> Vec<Approach> {
    let mut approaches = Vec::new();
    if s.accessibility >= 70.0 {
        approaches.push(Approach::DirectApproach);
    }
    if s.influence >= 60.0 {
        approaches.push(Approach::EventInvitation);
        approaches.push(Approach::AdvisoryRole);
    }
    if s.influence >= 50.0 {
        approaches.push(Approach::MediaCollaboration);
    }
    if s.strategic_value >= 60.0 {
        approaches.push(Approach::ResearchPartnership);
    }
    approaches
}

/// Additive inclusion rules; order carries no meaning
fn campaign_segments(s: &ScoreVector, sector: SectorClass) -> Vec<CampaignSegment> {
    let mut segments = Vec::new();
    if s.relevance >= 70.0 {
        segments.push(CampaignSegment::YouthJusticeChampions);
    }
    if s.influence >= 70.0 {
        segments.push(CampaignSegment::PoliticalEngagement);
    }
    if sector == SectorClass::Media {
        segments.push(CampaignSegment::MediaOutreach);
    }
    if s.strategic_value >= 60.0 {
        segments.push(CampaignSegment::AcademicAlliance);
    }
    segments
}

fn pathway(accessibility: f64) -> Pathway {
    if accessibility >= 80.0 {
        Pathway::DirectContact
    } else if accessibility >= 60.0 {
        Pathway::SocialMediaEngagement
    } else if accessibility >= 40.0 {
        Pathway::FormalRequest
    } else {
        Pathway::WarmIntroduction
    }
}

/// Mean of accessibility, timing and inverted risk, clipped to ≤95
fn success_probability(s: &ScoreVector) -> f64 {
    ((s.accessibility + s.timing + (100.0 - s.risk)) / 3.0).min(95.0)
}

fn resource_requirement(composite: f64) -> ResourceTier {
    if composite >= 80.0 {
        ResourceTier::HighTouch
    } else if composite >= 60.0 {
        ResourceTier::MediumTouch
    } else {
        ResourceTier::LowTouch
    }
}

fn timing_recommendation(timing: f64) -> TimingWindow {
    if timing >= 80.0 {
        TimingWindow::Immediate
    } else if timing >= 60.0 {
        TimingWindow::ShortTerm
    } else {
        TimingWindow::LongTerm
    }
}

fn risk_notes(s: &ScoreVector) -> Vec<String> {
    let mut notes = Vec::new();
    if s.risk >= 60.0 {
        notes.push("High reputation risk".to_string());
    }
    if s.risk >= 40.0 {
        notes.push("Political sensitivities".to_string());
    }
    if s.accessibility <= 40.0 {
        notes.push("Low response probability".to_string());
    }
    notes
}

// ============================================================================
// Tests
// ============================================================================
