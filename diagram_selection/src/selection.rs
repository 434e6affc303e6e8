// Copyright 2026 the Diagram Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

/// A small selection container tracking a set of keys plus primary/anchor
/// and a revision (§4.7 "Selection model").
///
/// `Selection` does not impose hashing or ordering constraints on `T`; it
/// only requires equality for most mutation and query methods. Keys live in
/// a `Vec<T>` with uniqueness enforced by scanning for existing entries,
/// which keeps the type easy to integrate with generational handle types
/// such as [`diagram_model::Handle`] without forcing them to be `Ord` or
/// `Hash`.
///
/// This crate does not know how selected cells are laid out; callers (the
/// marker/pointer-dispatch layer, [`crate::Rubberband`]) decide how to map
/// user input into concrete sets of keys.
#[derive(Clone, Debug, Default)]
pub struct Selection<T> {
    items: Vec<T>,
    primary: Option<usize>,
    anchor: Option<usize>,
    revision: u64,
}

impl<T> Selection<T> {
    /// Creates an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new(), primary: None, anchor: None, revision: 0 }
    }

    /// Returns `true` if the selection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of selected keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns a slice of all selected keys in their internal order.
    ///
    /// The order is stable within a single `Selection` instance but should
    /// not be relied upon for application semantics.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Returns an iterator over the selected keys.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Returns a reference to the primary key, if any.
    ///
    /// The primary is typically the most recently interacted-with item in
    /// the selection.
    #[must_use]
    pub fn primary(&self) -> Option<&T> {
        self.primary.map(|idx| &self.items[idx])
    }

    /// Returns a reference to the anchor key, if any.
    ///
    /// The anchor is the reference point for a rubberband or range-style
    /// extension gesture; this crate does not compute ranges itself.
    #[must_use]
    pub fn anchor(&self) -> Option<&T> {
        self.anchor.map(|idx| &self.items[idx])
    }

    /// Returns the current revision counter.
    ///
    /// Monotonically increasing, local to this instance, and bumped only
    /// when a mutation changes the semantic contents: selected items,
    /// primary, or anchor. A no-op call leaves it unchanged, so observers
    /// can use it as a cheap "did anything actually change" marker.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Removes all keys from the selection and clears primary/anchor.
    pub fn clear(&mut self) {
        if self.items.is_empty() && self.primary.is_none() && self.anchor.is_none() {
            return;
        }

        self.items.clear();
        self.primary = None;
        self.anchor = None;
        self.bump_revision();
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl<T> Selection<T>
where
    T: PartialEq,
{
    /// Returns `true` if the selection currently contains `key`.
    #[must_use]
    pub fn contains(&self, key: &T) -> bool {
        self.position_of(key).is_some()
    }

    /// Replaces the selection with a single key, setting both primary and
    /// anchor. The typical mapping for a plain click without modifiers.
    pub fn select_only(&mut self, key: T) {
        if self.items.len() == 1 && self.items.first() == Some(&key) && self.primary == Some(0) && self.anchor == Some(0) {
            return;
        }

        self.items.clear();
        self.items.push(key);
        self.primary = Some(0);
        self.anchor = Some(0);
        self.bump_revision();
    }

    /// Replaces the current selection with the provided batch of keys.
    ///
    /// Duplicates in the input are ignored. If the previous anchor key is
    /// still present, it remains the anchor; otherwise the first unique key
    /// becomes the anchor. The primary key defaults to the first unique
    /// key. This de-duplicates by scanning the accumulated output, so it is
    /// quadratic in the number of input keys; for a batch already known to
    /// be unique, prefer [`Selection::replace_with_unique`].
    pub fn replace_with<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut new_items: Vec<T> = Vec::new();
        for key in keys {
            if !new_items.iter().any(|existing| existing == &key) {
                new_items.push(key);
            }
        }
        self.replace_with_items(new_items);
    }

    /// Replaces the current selection with the provided batch of *unique*
    /// keys, without de-duplicating. A linear-time alternative to
    /// [`Selection::replace_with`] for callers (e.g. a rubberband query
    /// result from [`diagram_index::SpatialIndex`]) that already guarantee
    /// uniqueness.
    ///
    /// # Panics (debug only)
    ///
    /// Panics in debug builds if the input contains duplicates.
    pub fn replace_with_unique<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = T>,
    {
        let iter = keys.into_iter();
        let (lower, _) = iter.size_hint();
        let mut new_items: Vec<T> = Vec::with_capacity(lower);
        for key in iter {
            new_items.push(key);
        }

        debug_assert_unique(&new_items);
        self.replace_with_items(new_items);
    }

    /// Extends the selection with the provided batch of keys.
    ///
    /// Existing keys remain selected; new keys are appended and duplicates
    /// in the input are ignored. The primary key is updated to the last
    /// unique key added, if any; the anchor is left unchanged.
    pub fn extend_with<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut last_added = None;
        for key in keys {
            if self.position_of(&key).is_none() {
                self.items.push(key);
                last_added = Some(self.items.len() - 1);
            }
        }

        if let Some(idx) = last_added {
            self.primary = Some(idx);
            self.bump_revision();
        }
    }

    /// Adds `key` to the selection if it is not already present.
    ///
    /// If `key` is newly added, it becomes the primary key; the anchor is
    /// left unchanged.
    pub fn add(&mut self, key: T) {
        if let Some(idx) = self.position_of(&key) {
            if self.primary != Some(idx) {
                self.primary = Some(idx);
                self.bump_revision();
            }
        } else {
            self.items.push(key);
            self.primary = Some(self.items.len() - 1);
            self.bump_revision();
        }
    }

    /// Removes `key` from the selection if present.
    ///
    /// If the removed key was primary or anchor, those roles are cleared.
    pub fn remove(&mut self, key: &T) {
        if let Some(idx) = self.position_of(key) {
            self.remove_at(idx);
            self.bump_revision();
        }
    }

    /// Toggles `key` in the selection: adds it (becoming primary) if
    /// absent, removes it if present.
    pub fn toggle(&mut self, key: T) {
        if let Some(idx) = self.position_of(&key) {
            self.remove_at(idx);
            self.bump_revision();
        } else {
            self.items.push(key);
            self.primary = Some(self.items.len() - 1);
            self.bump_revision();
        }
    }

    /// Sets the primary key to `key` if it is already selected.
    pub fn set_primary(&mut self, key: &T) {
        if let Some(idx) = self.position_of(key) {
            if self.primary != Some(idx) {
                self.primary = Some(idx);
                self.bump_revision();
            }
        }
    }

    /// Sets the anchor key to `key` if it is already selected.
    pub fn set_anchor(&mut self, key: &T) {
        if let Some(idx) = self.position_of(key) {
            if self.anchor != Some(idx) {
                self.anchor = Some(idx);
                self.bump_revision();
            }
        }
    }

    /// Clears the anchor while leaving the selection and primary untouched.
    pub fn clear_anchor(&mut self) {
        if self.anchor.is_some() {
            self.anchor = None;
            self.bump_revision();
        }
    }

    fn position_of(&self, key: &T) -> Option<usize> {
        self.items.iter().position(|k| k == key)
    }

    fn replace_with_items(&mut self, new_items: Vec<T>) {
        let new_primary = if new_items.is_empty() { None } else { Some(0) };

        let mut new_anchor = None;
        if let Some(old_anchor_idx) = self.anchor {
            if let Some(old_key) = self.items.get(old_anchor_idx) {
                new_anchor = new_items.iter().position(|k| k == old_key);
            }
        }
        if new_anchor.is_none() {
            new_anchor = new_primary;
        }

        if new_items == self.items && self.primary == new_primary && self.anchor == new_anchor {
            return;
        }

        self.items = new_items;
        self.primary = new_primary;
        self.anchor = new_anchor;
        self.bump_revision();
    }

    fn remove_at(&mut self, idx: usize) {
        self.items.remove(idx);

        let update_index = |slot: &mut Option<usize>| {
            if let Some(current) = *slot {
                if current == idx {
                    *slot = None;
                } else if current > idx {
                    *slot = Some(current - 1);
                }
            }
        };

        update_index(&mut self.primary);
        update_index(&mut self.anchor);

        if self.items.is_empty() {
            self.primary = None;
            self.anchor = None;
        }
    }
}

impl<T> PartialEq for Selection<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items && self.primary == other.primary && self.anchor == other.anchor
    }
}

fn debug_assert_unique<T>(items: &[T])
where
    T: PartialEq,
{
    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            debug_assert!(items[i] != items[j], "duplicate selection key");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_only_sets_primary_and_anchor() {
        let mut selection = Selection::<u32>::new();
        selection.select_only(10);
        assert_eq!(selection.items(), &[10]);
        assert_eq!(selection.primary(), Some(&10));
        assert_eq!(selection.anchor(), Some(&10));
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = Selection::<u32>::new();
        selection.toggle(10);
        assert!(selection.contains(&10));
        selection.toggle(10);
        assert!(selection.is_empty());
        assert_eq!(selection.primary(), None);
    }

    #[test]
    fn replace_with_dedups_and_preserves_anchor_when_present() {
        let mut selection = Selection::<u32>::new();
        selection.replace_with([1, 2, 3]);
        selection.set_anchor(&2);
        selection.replace_with([2, 3, 1, 1]);
        assert_eq!(selection.items(), &[2, 3, 1]);
        assert_eq!(selection.anchor(), Some(&2));
        assert_eq!(selection.primary(), Some(&2));
    }

    #[test]
    fn extend_with_keeps_anchor_and_moves_primary() {
        let mut selection = Selection::<u32>::new();
        selection.select_only(1);
        selection.extend_with([2, 3]);
        assert_eq!(selection.items(), &[1, 2, 3]);
        assert_eq!(selection.anchor(), Some(&1));
        assert_eq!(selection.primary(), Some(&3));
    }

    #[test]
    fn remove_clears_roles_pointing_at_the_removed_key() {
        let mut selection = Selection::<u32>::new();
        selection.replace_with([1, 2, 3]);
        selection.remove(&2);
        assert_eq!(selection.items(), &[1, 3]);
        assert_eq!(selection.primary(), Some(&1));
        assert_eq!(selection.anchor(), Some(&1));
    }

    #[test]
    fn no_op_mutations_do_not_bump_revision() {
        let mut selection = Selection::<u32>::new();
        selection.select_only(1);
        let revision = selection.revision();
        selection.select_only(1);
        assert_eq!(selection.revision(), revision);
    }

    #[test]
    fn clear_resets_everything() {
        let mut selection = Selection::<u32>::new();
        selection.replace_with([1, 2]);
        selection.clear();
        assert!(selection.is_empty());
        assert_eq!(selection.primary(), None);
        assert_eq!(selection.anchor(), None);
    }
}
