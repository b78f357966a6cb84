#![forbid(unsafe_code)]

//! The caller-owned data source as the engine sees it.
//!
//! The engine never stores or mutates items; it reads them through this
//! trait on every pass, so dataset length may change freely between renders.
//! Row identity comes from [`Dataset::key`], never from array position —
//! selection and measurement correlate by key across re-sorts and refreshes.

/// An ordered collection of opaque items with stable per-item keys.
pub trait Dataset {
    /// The caller's item type. The engine only ever hands out `&Item`.
    type Item;

    /// Current number of items.
    fn len(&self) -> usize;

    /// Whether the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item at `index`.
    fn item(&self, index: usize) -> &Self::Item;

    /// Stable identity of the item at `index`.
    fn key(&self, index: usize) -> String;
}

impl<D: Dataset + ?Sized> Dataset for &D {
    type Item = D::Item;

    fn len(&self) -> usize {
        (**self).len()
    }

    fn item(&self, index: usize) -> &Self::Item {
        (**self).item(index)
    }

    fn key(&self, index: usize) -> String {
        (**self).key(index)
    }
}

/// A slice plus a key extractor — the common case for hosts that keep their
/// rows in a `Vec`.
pub struct KeyedSlice<'a, T, F> {
    items: &'a [T],
    key_of: F,
}

impl<'a, T, F: Fn(&T) -> String> KeyedSlice<'a, T, F> {
    /// Wrap `items` with `key_of` as the identity function.
    #[must_use]
    pub fn new(items: &'a [T], key_of: F) -> Self {
        Self { items, key_of }
    }
}

impl<T, F: Fn(&T) -> String> Dataset for KeyedSlice<'_, T, F> {
    type Item = T;

    fn len(&self) -> usize {
        self.items.len()
    }

    fn item(&self, index: usize) -> &T {
        &self.items[index]
    }

    fn key(&self, index: usize) -> String {
        (self.key_of)(&self.items[index])
    }
}
