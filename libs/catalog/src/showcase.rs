//! Public showcase: active videos split into wide and tall lanes

use serde::{Deserialize, Serialize};

use crate::{
    model::{Category, VideoEntry},
    pagination::{Page, Pager},
};

/// Window sizes of the two public lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowcaseLayout {
    pub wide_page_size: usize,
    pub tall_page_size: usize,
}

impl Default for ShowcaseLayout {
    fn default() -> Self {
        Self {
            wide_page_size: 8,
            tall_page_size: 3,
        }
    }
}

/// Active entries partitioned by category, each lane in canonical order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Showcase {
    wide: Vec<VideoEntry>,
    tall: Vec<VideoEntry>,
}

impl Showcase {
    /// Build from a listing already in canonical order; inactive entries are skipped
    pub fn from_listing(entries: impl IntoIterator<Item = VideoEntry>) -> Self {
        let (wide, tall): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .filter(|e| e.is_active)
            .partition(|e| e.category == Category::Wide);

        Self { wide, tall }
    }

    pub fn lane(&self, category: Category) -> &[VideoEntry] {
        match category {
            Category::Wide => &self.wide,
            Category::Tall => &self.tall,
        }
    }

    pub fn page(&self, category: Category, page: usize, layout: &ShowcaseLayout) -> Page<VideoEntry> {
        let size = match category {
            Category::Wide => layout.wide_page_size,
            Category::Tall => layout.tall_page_size,
        };
        Pager::new(size).paginate(self.lane(category), page)
    }
}
