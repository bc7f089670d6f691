//! Bidirectional link index.
//!
//! Stores a many-to-many relation between "owners" (categories, days) and
//! items. Both directions are updated by the same call, so a link is
//! either present on both sides or on neither.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct LinkIndex<O, I> {
    forward: HashMap<O, Vec<I>>,
    backward: HashMap<I, Vec<O>>,
}

impl<O, I> Default for LinkIndex<O, I> {
    fn default() -> Self {
        Self {
            forward: HashMap::new(),
            backward: HashMap::new(),
        }
    }
}

impl<O, I> LinkIndex<O, I>
where
    O: Copy + Eq + Hash,
    I: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Link an owner and an item. Returns false if they were already linked.
    pub fn link(&mut self, owner: O, item: I) -> bool {
        if self.contains(owner, item) {
            return false;
        }
        self.forward.entry(owner).or_default().push(item);
        self.backward.entry(item).or_default().push(owner);
        true
    }

    /// Unlink an owner and an item. Returns false if they were not linked.
    pub fn unlink(&mut self, owner: O, item: I) -> bool {
        if !self.contains(owner, item) {
            return false;
        }
        remove_from(&mut self.forward, owner, item);
        remove_from(&mut self.backward, item, owner);
        true
    }

    /// Flip the link. Returns true if the pair is linked afterwards.
    pub fn toggle(&mut self, owner: O, item: I) -> bool {
        if self.unlink(owner, item) {
            false
        } else {
            self.link(owner, item)
        }
    }

    pub fn contains(&self, owner: O, item: I) -> bool {
        self.forward
            .get(&owner)
            .is_some_and(|items| items.contains(&item))
    }

    /// Items linked to the owner, in link order.
    pub fn items_of(&self, owner: O) -> &[I] {
        self.forward.get(&owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Owners linked to the item, in link order.
    pub fn owners_of(&self, item: I) -> &[O] {
        self.backward.get(&item).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Drop every link of an owner. Returns the items it was linked to.
    pub fn remove_owner(&mut self, owner: O) -> Vec<I> {
        let items = self.forward.remove(&owner).unwrap_or_default();
        for item in &items {
            remove_from(&mut self.backward, *item, owner);
        }
        items
    }

    /// Drop every link of an item. Returns the owners it was linked to.
    pub fn remove_item(&mut self, item: I) -> Vec<O> {
        let owners = self.backward.remove(&item).unwrap_or_default();
        for owner in &owners {
            remove_from(&mut self.forward, *owner, item);
        }
        owners
    }
}

fn remove_from<K, V>(map: &mut HashMap<K, Vec<V>>, key: K, value: V)
where
    K: Eq + Hash,
    V: PartialEq,
{
    if let Some(values) = map.get_mut(&key) {
        values.retain(|v| *v != value);
        if values.is_empty() {
            map.remove(&key);
        }
    }
}
