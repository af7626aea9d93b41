//! Drag coordinator
//!
//! Turns pointer and keyboard reorder gestures over a paginated list into a
//! single [`Move`] on absolute indices. Gestures remember entry ids, not
//! positions, and resolve them against the working list only when the
//! gesture completes; an id that disappeared in the meantime aborts the
//! gesture.

use serde::{Deserialize, Serialize};

use crate::{
    model::{VideoEntry, VideoId},
    pagination::Pager,
    staging::Move,
};

/// Where a pointer drag was released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropTarget {
    /// Onto another entry, wherever it is rendered
    Entry(VideoId),
    /// Onto a visible position of a page
    Slot { page: usize, slot: usize },
}

/// One keyboard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    Pointer { source: VideoId },
    Keyboard { source: VideoId, target: usize },
}

#[derive(Debug, Clone)]
pub struct DragCoordinator {
    pager: Pager,
    gesture: Option<Gesture>,
}

fn position(working: &[VideoEntry], id: VideoId) -> Option<usize> {
    working.iter().position(|e| e.id == id)
}

impl DragCoordinator {
    pub fn new(pager: Pager) -> Self {
        Self {
            pager,
            gesture: None,
        }
    }

    pub fn pager(&self) -> Pager {
        self.pager
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Start a pointer drag on `source`, replacing any gesture in progress
    pub fn begin(&mut self, source: VideoId) {
        self.gesture = Some(Gesture::Pointer { source });
    }

    /// Finish a pointer drag
    pub fn drop_on(&mut self, target: DropTarget, working: &[VideoEntry]) -> Option<Move> {
        let Some(Gesture::Pointer { source }) = self.gesture.take() else {
            return None;
        };

        let from = position(working, source)?;
        let to = match target {
            DropTarget::Entry(id) => position(working, id)?,
            DropTarget::Slot { page, slot } => {
                self.pager.absolute_index(page, slot, working.len())?
            }
        };

        (from != to).then_some(Move { from, to })
    }

    /// Abandon whatever gesture is in progress
    pub fn cancel(&mut self) {
        self.gesture = None;
    }

    /// Pick up `source` for keyboard reordering
    pub fn lift(&mut self, source: VideoId, working: &[VideoEntry]) -> bool {
        match position(working, source) {
            Some(target) => {
                self.gesture = Some(Gesture::Keyboard { source, target });
                true
            }
            None => {
                self.gesture = None;
                false
            }
        }
    }

    /// Shift the keyboard target by one position, clamped to the list
    pub fn step(&mut self, step: Step, working: &[VideoEntry]) -> Option<usize> {
        let Some(Gesture::Keyboard { target, .. }) = self.gesture.as_mut() else {
            return None;
        };

        let last = working.len().checked_sub(1)?;
        *target = match step {
            Step::Up => target.saturating_sub(1),
            Step::Down => (*target + 1).min(last),
        };
        Some(*target)
    }

    /// Pending keyboard target and the page it falls on
    pub fn keyboard_target(&self) -> Option<(usize, usize)> {
        match self.gesture {
            Some(Gesture::Keyboard { target, .. }) => Some((target, self.pager.page_of(target))),
            _ => None,
        }
    }

    /// Drop the lifted entry at the keyboard target
    pub fn confirm(&mut self, working: &[VideoEntry]) -> Option<Move> {
        let Some(Gesture::Keyboard { source, target }) = self.gesture.take() else {
            return None;
        };

        let from = position(working, source)?;
        let to = target.min(working.len().checked_sub(1)?);
        (from != to).then_some(Move { from, to })
    }
}
