//! Campaign Types
//!
//! Wire-compatible representations of the campaign resources served by the
//! remote API. Field names follow the API's camelCase JSON.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Identifiers
// ============================================================================

/// Server-assigned campaign identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(String);

impl CampaignId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CampaignId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CampaignId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ============================================================================
// Category
// ============================================================================

/// Fundraising category a campaign is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Health,
    Education,
    #[serde(rename = "Disaster Relief")]
    DisasterRelief,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Health, Category::Education, Category::DisasterRelief];

    /// Human-readable label, identical to the wire value.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Health => "Health",
            Category::Education => "Education",
            Category::DisasterRelief => "Disaster Relief",
        }
    }

    pub fn all() -> Vec<Self> {
        Self::ALL.to_vec()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a category label is not one of the known categories.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "health" => Ok(Category::Health),
            "education" => Ok(Category::Education),
            "disaster relief" => Ok(Category::DisasterRelief),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

// ============================================================================
// Status
// ============================================================================

/// Moderation status of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Pending,
    Active,
    Rejected,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Pending => "pending",
            CampaignStatus::Active => "active",
            CampaignStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Campaign records
// ============================================================================

/// A campaign as stored by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(alias = "_id")]
    pub id: CampaignId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub goal_amount: f64,
    pub status: CampaignStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Image asset URLs.
    #[serde(default)]
    pub image: Vec<String>,
    /// Video asset URLs; only the first is used.
    #[serde(default)]
    pub video: Vec<String>,
    /// Supporting document URLs.
    #[serde(default)]
    pub document: Vec<String>,
}

impl Campaign {
    pub fn is_pending(&self) -> bool {
        self.status == CampaignStatus::Pending
    }

    pub fn primary_image(&self) -> Option<&str> {
        self.image.first().map(String::as_str)
    }

    pub fn video_url(&self) -> Option<&str> {
        self.video.first().map(String::as_str)
    }
}

/// The lighter record returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    #[serde(alias = "_id")]
    pub id: CampaignId,
    pub title: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub goal_amount: Option<f64>,
    #[serde(default)]
    pub image: Vec<String>,
}

impl From<&Campaign> for CampaignSummary {
    fn from(campaign: &Campaign) -> Self {
        Self {
            id: campaign.id.clone(),
            title: campaign.title.clone(),
            category: Some(campaign.category),
            goal_amount: Some(campaign.goal_amount),
            image: campaign.image.clone(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
