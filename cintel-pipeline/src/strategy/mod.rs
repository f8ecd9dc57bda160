//! Engagement strategy classification
//!
//! Pure threshold rules from score vector to recommendation bundle.

pub mod engine;

pub use engine::{
    classify, Approach, CampaignSegment, Category, EngagementStrategy, EngagementTier, Pathway,
    ResourceTier, TimingWindow,
};
