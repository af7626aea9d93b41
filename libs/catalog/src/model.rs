//! Video catalog models

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a showcased video
pub type VideoId = Uuid;

/// Aspect-ratio treatment of a video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// 16:9 long-form video
    #[serde(alias = "normal")]
    Wide,
    /// 9:16 short-form video
    #[serde(alias = "shorts")]
    Tall,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Wide => "wide",
            Category::Tall => "tall",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wide" | "normal" => Ok(Category::Wide),
            "tall" | "shorts" => Ok(Category::Tall),
            other => Err(format!("unknown video category: {}", other)),
        }
    }
}

/// One showcased video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoEntry {
    pub id: VideoId,
    pub source_url: String,
    pub external_id: String,
    pub display_order: i32,
    pub is_active: bool,
    pub category: Category,
    /// Optimistic-concurrency token, bumped by every update
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload; the store assigns id, version and timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVideoEntry {
    pub source_url: String,
    pub external_id: String,
    pub display_order: i32,
    pub is_active: bool,
    pub category: Category,
}

/// Partial update payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoPatch {
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
    pub category: Option<Category>,
    /// When set, the update fails with a conflict unless the stored version matches
    pub expected_version: Option<i64>,
}

/// Target position of one entry in a reorder commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAssignment {
    pub id: VideoId,
    pub display_order: i32,
    pub expected_version: i64,
}

impl From<OrderAssignment> for VideoPatch {
    fn from(assignment: OrderAssignment) -> Self {
        VideoPatch {
            display_order: Some(assignment.display_order),
            expected_version: Some(assignment.expected_version),
            ..VideoPatch::default()
        }
    }
}

/// Listing filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilter {
    pub active_only: bool,
}

impl ListFilter {
    /// Everything, including inactive entries (admin listing)
    pub fn all() -> Self {
        Self { active_only: false }
    }

    /// Public listing
    pub fn active() -> Self {
        Self { active_only: true }
    }

    pub fn matches(&self, entry: &VideoEntry) -> bool {
        !self.active_only || entry.is_active
    }
}

/// Sort into presentation order: `display_order` ascending, newest first on ties
pub fn canonical_order(entries: &mut [VideoEntry]) {
    entries.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// `display_order` for a newly added entry: current maximum + 1, or 0
pub fn next_display_order(entries: &[VideoEntry]) -> i32 {
    entries
        .iter()
        .map(|e| e.display_order)
        .max()
        .map_or(0, |max| max.saturating_add(1))
}

/// Identity sequence of a list
pub fn identities(entries: &[VideoEntry]) -> Vec<VideoId> {
    entries.iter().map(|e| e.id).collect()
}
