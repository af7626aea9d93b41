//! Order staging store
//!
//! Holds the last order known to match the store (`confirmed`) next to the
//! live editing buffer (`working`). `working` is always a permutation of
//! `confirmed`; only [`StagingStore::load`] can change the set of entries.

use crate::{
    error::{OrderError, OrderResult},
    model::{OrderAssignment, VideoEntry, VideoId, identities},
};

/// A single reorder step on absolute indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, Default)]
pub struct StagingStore {
    confirmed: Vec<VideoEntry>,
    working: Vec<VideoEntry>,
    dirty: bool,
}

impl StagingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace both sequences with `entries` and clear the dirty flag
    pub fn load(&mut self, entries: Vec<VideoEntry>) {
        self.working = entries.clone();
        self.confirmed = entries;
        self.dirty = false;
    }

    /// Move the working entry at `from` to `to`
    ///
    /// Out-of-range or equal indices are a no-op. Returns whether the working
    /// order changed.
    pub fn move_entry(&mut self, from: usize, to: usize) -> bool {
        let len = self.working.len();
        if from == to || from >= len || to >= len {
            return false;
        }

        let entry = self.working.remove(from);
        self.working.insert(to, entry);
        self.dirty = self.differs();
        true
    }

    pub fn apply(&mut self, step: Move) -> bool {
        self.move_entry(step.from, step.to)
    }

    /// Throw away staged changes
    pub fn discard(&mut self) {
        self.working = self.confirmed.clone();
        self.dirty = false;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn confirmed(&self) -> &[VideoEntry] {
        &self.confirmed
    }

    pub fn working(&self) -> &[VideoEntry] {
        &self.working
    }

    pub fn position_of(&self, id: VideoId) -> Option<usize> {
        self.working.iter().position(|e| e.id == id)
    }

    /// Target `display_order` of every working entry: its 0-based position
    ///
    /// Fails when a position does not fit the `display_order` column.
    pub fn plan(&self) -> OrderResult<Vec<OrderAssignment>> {
        self.working
            .iter()
            .enumerate()
            .map(|(position, entry)| {
                Ok(OrderAssignment {
                    id: entry.id,
                    display_order: display_order_at(position)?,
                    expected_version: entry.version,
                })
            })
            .collect()
    }

    fn differs(&self) -> bool {
        identities(&self.working) != identities(&self.confirmed)
    }
}

fn display_order_at(position: usize) -> OrderResult<i32> {
    i32::try_from(position).map_err(|_| {
        OrderError::Validation(format!(
            "Cannot order more than {} videos",
            i64::from(i32::MAX) + 1
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::entries;

    fn loaded(n: u128) -> StagingStore {
        let mut store = StagingStore::new();
        store.load(entries(n));
        store
    }

    fn reference_move(list: &[VideoEntry], from: usize, to: usize) -> Vec<VideoEntry> {
        let mut expected = list.to_vec();
        let entry = expected.remove(from);
        expected.insert(to, entry);
        expected
    }

    #[test]
    fn test_move_matches_remove_then_insert_for_every_pair() {
        let base = entries(5);
        for from in 0..5 {
            for to in 0..5 {
                let mut store = loaded(5);
                store.move_entry(from, to);

                let expected = reference_move(&base, from, to);
                assert_eq!(identities(store.working()), identities(&expected));
                assert_eq!(store.is_dirty(), identities(&expected) != identities(&base));
            }
        }
    }

    #[test]
    fn test_move_back_clears_dirty() {
        let mut store = loaded(3);

        assert!(store.move_entry(2, 0));
        assert!(store.is_dirty());

        assert!(store.move_entry(0, 2));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_invalid_moves_are_noops() {
        let mut store = loaded(3);

        assert!(!store.move_entry(1, 1));
        assert!(!store.move_entry(3, 0));
        assert!(!store.move_entry(0, 3));
        assert!(!store.is_dirty());
        assert_eq!(identities(store.working()), identities(store.confirmed()));
    }

    #[test]
    fn test_discard_is_idempotent() {
        let mut store = loaded(4);
        store.move_entry(0, 3);

        store.discard();
        let once = identities(store.working());
        store.discard();

        assert_eq!(identities(store.working()), once);
        assert_eq!(once, identities(store.confirmed()));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_load_resets_pending_reorder() {
        let mut store = loaded(3);
        store.move_entry(2, 0);

        let fresh = entries(2);
        store.load(fresh.clone());

        assert!(!store.is_dirty());
        assert_eq!(identities(store.working()), identities(&fresh));
    }

    #[test]
    fn test_plan_uses_working_positions_and_versions() {
        let mut store = loaded(3);
        store.move_entry(2, 0);

        let plan = store.plan().unwrap();
        let ids = identities(store.working());

        assert_eq!(plan.iter().map(|a| a.id).collect::<Vec<_>>(), ids);
        assert_eq!(
            plan.iter().map(|a| a.display_order).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(plan.iter().all(|a| a.expected_version == 1));
    }

    #[test]
    fn test_positions_past_the_column_range_are_rejected() {
        assert_eq!(display_order_at(7), Ok(7));
        assert_eq!(display_order_at(i32::MAX as usize), Ok(i32::MAX));
        assert!(matches!(
            display_order_at(i32::MAX as usize + 1),
            Err(OrderError::Validation(_))
        ));
    }
}
