//! Items the user has picked for a bulk action.
//!
//! A [`Selection`] belongs to one UI session. It collects item ids across
//! screens (pick a few shirts, then a pair of pants) until they are assigned
//! to a day or a category; the API clears it once that assignment is saved.

use uuid::Uuid;

/// Ordered set of chosen item ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<Uuid>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip an item in or out. Returns true if it is selected afterwards.
    pub fn toggle(&mut self, id: Uuid) -> bool {
        if self.remove(id) {
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    /// Returns false if the item was already selected.
    pub fn insert(&mut self, id: Uuid) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Returns false if the item was not selected.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.ids.len();
        self.ids.retain(|other| *other != id);
        self.ids.len() != before
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.ids.contains(&id)
    }

    /// Selected ids in the order they were picked.
    pub fn ids(&self) -> &[Uuid] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids for which `keep` returns false.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&Uuid) -> bool,
    {
        self.ids.retain(keep);
    }
}
