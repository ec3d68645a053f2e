//! Ordered registry of live subscriptions.
//!
//! Newest entries sit at the front, so a front-to-back scan reaches the most
//! recently opened overlay first. Entries are stored in a slotmap arena and
//! addressed by [`SubscriptionKey`]; the scan order lives in a separate deque.

use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

use super::spec::SubscriptionSpec;

new_key_type! {
    /// Token for one registry entry.
    pub struct SubscriptionKey;
}

/// The subscription registry.
///
/// A spec instance (compared by pointer) is stored at most once.
pub struct Registry {
    entries: SlotMap<SubscriptionKey, Rc<dyn SubscriptionSpec>>,
    order: VecDeque<SubscriptionKey>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            order: VecDeque::new(),
        }
    }

    /// Put `spec` on top of the registry.
    ///
    /// If this exact instance is already registered, nothing changes and its
    /// existing key is returned.
    pub fn insert(&mut self, spec: Rc<dyn SubscriptionSpec>) -> SubscriptionKey {
        if let Some(key) = self.key_of(&spec) {
            return key;
        }
        let key = self.entries.insert(spec);
        self.order.push_front(key);
        key
    }

    /// Remove the entry for `key`. Returns `false` if it was not present.
    pub fn remove(&mut self, key: SubscriptionKey) -> bool {
        if self.entries.remove(key).is_none() {
            return false;
        }
        self.order.retain(|&k| k != key);
        true
    }

    /// Whether `key` is live.
    pub fn contains(&self, key: SubscriptionKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Key of an already registered spec instance.
    pub fn key_of(&self, spec: &Rc<dyn SubscriptionSpec>) -> Option<SubscriptionKey> {
        let needle = Rc::as_ptr(spec) as *const ();
        self.order.iter().copied().find(|&key| {
            self.entries
                .get(key)
                .is_some_and(|entry| Rc::as_ptr(entry) as *const () == needle)
        })
    }

    /// Keys in scan order (newest first).
    #[cfg(test)]
    pub(crate) fn keys(&self) -> impl Iterator<Item = SubscriptionKey> + '_ {
        self.order.iter().copied()
    }

    /// Clone out the specs in scan order.
    ///
    /// Dispatch iterates this snapshot so that `close` callbacks may mutate the
    /// registry without disturbing the scan in progress.
    pub fn snapshot(&self) -> Vec<Rc<dyn SubscriptionSpec>> {
        self.order
            .iter()
            .filter_map(|&key| self.entries.get(key).cloned())
            .collect()
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no live subscriptions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("order", &self.order)
            .finish()
    }
}
