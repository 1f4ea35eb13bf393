use std::collections::{hash_map, HashMap};

use crate::Value;

/// Number of slots reserved up front, so small and medium matrices never rehash.
pub const INITIAL_CAPACITY: usize = 16384;

/// Coordinate-keyed store of the non-zero cells of a matrix.
///
/// Only non-zero values are ever present: [`CoordinateMap::insert`] expects a
/// non-zero value and [`CoordinateMap::put`] turns a zero write into a removal.
/// Enumeration order is whatever the underlying hash map yields.
#[derive(Debug, Clone)]
pub struct CoordinateMap {
    /// `entries[(u, v)]` = non-zero value at (`u`, `v`)
    entries: HashMap<(usize, usize), Value>,
    /// `nnz_row[u]` = number of non-zeros in row `u`
    nnz_row: HashMap<usize, usize>,
}

impl Default for CoordinateMap {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinateMap {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            nnz_row: HashMap::new(),
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Value {
        self.entries.get(&(row, col)).copied().unwrap_or(0)
    }

    pub fn get_ref(&self, row: usize, col: usize) -> Option<&Value> {
        self.entries.get(&(row, col))
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.entries.contains_key(&(row, col))
    }

    /// Stores `value` at (`row`, `col`), overwriting any previous value.
    /// `value` must be non-zero.
    pub fn insert(&mut self, row: usize, col: usize, value: Value) {
        debug_assert_ne!(value, 0, "zero must not be stored");
        if self.entries.insert((row, col), value).is_none() {
            *self.nnz_row.entry(row).or_insert(0) += 1;
        }
    }

    /// Like [`CoordinateMap::insert`], but a zero `value` deletes the cell.
    pub fn put(&mut self, row: usize, col: usize, value: Value) {
        if value == 0 {
            self.remove(row, col);
        } else {
            self.insert(row, col, value);
        }
    }

    /// Removes the cell, returning its previous value if it was stored.
    pub fn remove(&mut self, row: usize, col: usize) -> Option<Value> {
        let old = self.entries.remove(&(row, col))?;
        decrement(&mut self.nnz_row, row);
        Some(old)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    pub fn nnz_row(&self, row: usize) -> usize {
        self.nnz_row.get(&row).map_or(0, |&n| n)
    }

    /// Number of rows holding at least one non-zero.
    pub fn occupied_rows(&self) -> usize {
        self.nnz_row.len()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            iter: self.entries.iter(),
        }
    }

    /// Snapshot of every stored `(row, col, value)` triple.
    pub fn entries(&self) -> Vec<(usize, usize, Value)> {
        self.iter().collect()
    }
}

fn decrement(counts: &mut HashMap<usize, usize>, key: usize) {
    if let hash_map::Entry::Occupied(mut o) = counts.entry(key) {
        *o.get_mut() -= 1;
        if *o.get() == 0 {
            o.remove();
        }
    }
}

impl PartialEq for CoordinateMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for CoordinateMap {}

pub struct Iter<'a> {
    iter: hash_map::Iter<'a, (usize, usize), Value>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, usize, Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(&(i, j), &v)| (i, j, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a CoordinateMap {
    type Item = (usize, usize, Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(usize, usize, Value)> for CoordinateMap {
    fn from_iter<I: IntoIterator<Item = (usize, usize, Value)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (row, col, value) in iter {
            map.put(row, col, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_absent_is_zero() {
        let map = CoordinateMap::new();
        assert_eq!(map.get(3, 4), 0);
        assert!(map.is_empty());
        assert!(map.capacity() >= INITIAL_CAPACITY);
    }

    #[test]
    fn test_insert_overwrites() {
        let mut map = CoordinateMap::new();
        map.insert(1, 2, 5);
        map.insert(1, 2, -7);
        assert_eq!(map.get(1, 2), -7);
        assert_eq!(map.len(), 1);
        assert_eq!(map.nnz_row(1), 1);
    }

    #[test]
    fn test_put_zero_removes() {
        let mut map = CoordinateMap::new();
        map.put(0, 0, 9);
        map.put(0, 1, 4);
        map.put(0, 0, 0);
        assert_eq!(map.get(0, 0), 0);
        assert!(!map.contains(0, 0));
        assert_eq!(map.len(), 1);
        assert_eq!(map.nnz_row(0), 1);

        // zero write on an absent cell is a no-op
        map.put(5, 5, 0);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut map = CoordinateMap::new();
        map.insert(2, 2, 1);
        assert_eq!(map.remove(2, 3), None);
        assert_eq!(map.remove(2, 2), Some(1));
        assert!(map.is_empty());
        assert_eq!(map.nnz_row(2), 0);
        assert_eq!(map.occupied_rows(), 0);
    }

    #[test]
    fn test_occupied_rows_tracks_inserts_and_removes() {
        let mut map = CoordinateMap::new();
        map.insert(0, 0, 1);
        map.insert(0, 5, 2);
        map.insert(3, 1, 3);
        assert_eq!(map.occupied_rows(), 2);
        assert_eq!(map.nnz_row(0), 2);

        map.remove(3, 1);
        assert_eq!(map.occupied_rows(), 1);
        map.put(0, 0, 0);
        assert_eq!(map.occupied_rows(), 1);
        map.put(0, 5, 0);
        assert_eq!(map.occupied_rows(), 0);
    }

    #[test]
    fn test_grows_past_initial_capacity() {
        let mut map = CoordinateMap::new();
        let n = INITIAL_CAPACITY * 2;
        for k in 0..n {
            map.insert(k / 100, k % 100, k as Value + 1);
        }
        assert_eq!(map.len(), n);
        assert!(map.capacity() >= n);
        for k in (0..n).step_by(997) {
            assert_eq!(map.get(k / 100, k % 100), k as Value + 1);
        }
    }

    #[test]
    fn test_wide_columns_do_not_collide() {
        // columns beyond 16 bits must stay distinct keys
        let mut map = CoordinateMap::new();
        map.insert(0, 65536, 1);
        map.insert(1, 0, 2);
        assert_eq!(map.get(0, 65536), 1);
        assert_eq!(map.get(1, 0), 2);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_iter_visits_every_entry() {
        let map: CoordinateMap = vec![(0, 0, 1), (4, 2, -3), (1, 1, 0)].into_iter().collect();
        let mut entries = map.entries();
        entries.sort();
        assert_eq!(entries, vec![(0, 0, 1), (4, 2, -3)]);
        assert_eq!(map.iter().len(), 2);
    }
}
