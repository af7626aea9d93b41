//! Request and response bodies for the API service

use catalog::{
    Category, VideoEntry, VideoId,
    drag::{DropTarget, Step},
    pagination::Page,
    youtube::{self, ThumbnailQuality},
};
use serde::{Deserialize, Serialize};

/// Request to add a video by URL
#[derive(Debug, Deserialize)]
pub struct AddVideoRequest {
    pub url: String,
    /// Overrides the category detected from the URL
    pub category: Option<Category>,
}

/// Direct move by absolute index
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub from: usize,
    pub to: usize,
}

/// A finished pointer drag
#[derive(Debug, Deserialize)]
pub struct DragRequest {
    pub source_id: VideoId,
    pub target: DropTarget,
}

/// One keyboard reorder action
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum KeyboardRequest {
    Lift { source_id: VideoId },
    Step { direction: Step },
    Confirm,
    Cancel,
}

/// `?page=` for admin listings, 1-based
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
}

impl PageQuery {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }
}

/// `?category=&page=` for the public showcase
#[derive(Debug, Default, Deserialize)]
pub struct ShowcaseQuery {
    pub category: Option<Category>,
    pub page: Option<usize>,
}

/// A video as shown on the public site
#[derive(Debug, Serialize)]
pub struct PublicVideo {
    pub id: VideoId,
    pub external_id: String,
    pub category: Category,
    pub embed_url: String,
    pub thumbnail_url: String,
}

impl From<VideoEntry> for PublicVideo {
    fn from(entry: VideoEntry) -> Self {
        Self {
            embed_url: youtube::embed_url(&entry.external_id),
            thumbnail_url: youtube::thumbnail_url(&entry.external_id, ThumbnailQuality::High),
            id: entry.id,
            external_id: entry.external_id,
            category: entry.category,
        }
    }
}

/// One page of a public lane
#[derive(Debug, Serialize)]
pub struct LanePage {
    pub items: Vec<PublicVideo>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl From<Page<VideoEntry>> for LanePage {
    fn from(page: Page<VideoEntry>) -> Self {
        Self {
            items: page.items.into_iter().map(PublicVideo::from).collect(),
            page: page.page,
            page_size: page.page_size,
            total: page.total,
            total_pages: page.total_pages,
        }
    }
}

/// Public showcase; a lane is omitted when another category was requested
#[derive(Debug, Serialize)]
pub struct ShowcaseResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wide: Option<LanePage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tall: Option<LanePage>,
}
