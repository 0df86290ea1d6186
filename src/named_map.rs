//! Insertion-ordered collection unique by (normalized) name.
//!
//! Sections and entries are both stored in a [`NamedMap`]. A single
//! `IndexMap` holds the order and the name index at once, so the two can
//! never disagree in cardinality; the remaining invariant is that every key
//! equals `T::key_for(value.name())`, which each mutator preserves and
//! [`NamedMap::is_consistent`] checks.
//!
//! Mutators never partially apply: a rejected value is handed back to the
//! caller and the map is left as it was.

use std::ops::{Index, IndexMut};

use indexmap::IndexMap;

/// Something stored in a [`NamedMap`].
pub(crate) trait Named {
    fn name(&self) -> &str;

    /// Only called by [`NamedMap::rename_at`], which re-keys the value.
    fn set_name(&mut self, name: String);

    /// The index key for `name`.
    fn key_for(name: &str) -> String;
}

#[derive(Debug, Clone)]
pub(crate) struct NamedMap<T> {
    inner: IndexMap<String, T>,
}

impl<T> Default for NamedMap<T> {
    fn default() -> Self {
        Self {
            inner: IndexMap::new(),
        }
    }
}

impl<T: Named> NamedMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.inner.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.inner.values_mut()
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.inner.get(&T::key_for(name))
    }

    pub fn get_index(&self, index: usize) -> Option<&T> {
        self.inner.get_index(index).map(|(_, v)| v)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.inner.get_index_of(&T::key_for(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(&T::key_for(name))
    }

    /// Position of this exact instance. The key it was found under must
    /// still decode to its current name.
    pub fn position_of(&self, target: &T) -> Option<usize> {
        self.inner
            .iter()
            .position(|(_, v)| std::ptr::eq(v, target))
            .filter(|&i| {
                self.inner
                    .get_index(i)
                    .is_some_and(|(k, v)| *k == T::key_for(v.name()))
            })
    }

    /// Append. Fails when the name is taken.
    pub fn push(&mut self, value: T) -> Result<usize, T> {
        let key = T::key_for(value.name());
        if self.inner.contains_key(&key) {
            return Err(value);
        }
        Ok(self.inner.insert_full(key, value).0)
    }

    /// Insert at `index` (`0..=len`). Fails when the name is taken or the
    /// index is out of range.
    pub fn insert_at(&mut self, index: usize, value: T) -> Result<(), T> {
        let key = T::key_for(value.name());
        if index > self.inner.len() || self.inner.contains_key(&key) {
            return Err(value);
        }
        self.inner.shift_insert(index, key, value);
        Ok(())
    }

    /// Swap the value at `index` for `value`, returning the old one. The new
    /// name may equal the old one but not any other sibling's.
    pub fn replace_at(&mut self, index: usize, value: T) -> Result<T, T> {
        let key = T::key_for(value.name());
        match self.inner.get_index_of(&key) {
            Some(i) if i != index => return Err(value),
            _ if index >= self.inner.len() => return Err(value),
            Some(_) => {
                let slot = &mut self.inner[index];
                return Ok(std::mem::replace(slot, value));
            }
            None => {}
        }
        let Some((_, old)) = self.inner.shift_remove_index(index) else {
            return Err(value);
        };
        self.inner.shift_insert(index, key, value);
        Ok(old)
    }

    /// Rename the value at `index` without moving it: erase under the old
    /// key, mutate, re-insert under the new key. Returns the old name.
    pub fn rename_at(&mut self, index: usize, new_name: String) -> Result<String, String> {
        let new_key = T::key_for(&new_name);
        let Some((old_key, _)) = self.inner.get_index(index) else {
            return Err(new_name);
        };
        if *old_key == new_key {
            // Same key (a case-only change for sections): the index is untouched.
            let value = &mut self.inner[index];
            let old = value.name().to_string();
            value.set_name(new_name);
            return Ok(old);
        }
        if self.inner.contains_key(&new_key) {
            return Err(new_name);
        }
        let Some((_, mut value)) = self.inner.shift_remove_index(index) else {
            return Err(new_name);
        };
        let old = value.name().to_string();
        value.set_name(new_name);
        self.inner.shift_insert(index, new_key, value);
        Ok(old)
    }

    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        self.inner.shift_remove_index(index).map(|(_, v)| v)
    }

    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.inner.drain(..).map(|(_, v)| v)
    }

    /// Every key matches the normalized name of its value.
    pub fn is_consistent(&self) -> bool {
        self.inner.iter().all(|(k, v)| *k == T::key_for(v.name()))
    }
}

impl<T> Index<usize> for NamedMap<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.inner[index]
    }
}

impl<T> IndexMut<usize> for NamedMap<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.inner[index]
    }
}
