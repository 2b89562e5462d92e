// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::DrfError::DrfErr;
use crate::error::Result;
use crate::h5::IndexEntry;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// First and last recorded sample of a channel, both inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub start: u64,
    pub end: u64,
}

impl Bounds {
    /// Number of sample indices between the bounds
    pub fn span(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Maximal gap-free runs of samples, keyed by start sample, valued by length.
///
/// Runs never overlap or touch; inserting a run that does is merged into its
/// neighbours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContinuousBlocks(BTreeMap<u64, u64>);

impl ContinuousBlocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, start: u64, len: u64) {
        if len == 0 {
            return;
        }
        let mut new_start = start;
        let mut new_end = start.saturating_add(len);

        if let Some((&prev_start, &prev_len)) = self.0.range(..=start).next_back() {
            let prev_end = prev_start.saturating_add(prev_len);
            if prev_end >= start {
                self.0.remove(&prev_start);
                new_start = prev_start;
                new_end = new_end.max(prev_end);
            }
        }
        while let Some((&next_start, &next_len)) = self.0.range(new_start..=new_end).next() {
            self.0.remove(&next_start);
            new_end = new_end.max(next_start.saturating_add(next_len));
        }
        self.0.insert(new_start, new_end - new_start);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all block lengths
    pub fn total_samples(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, u64, u64> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a ContinuousBlocks {
    type Item = (&'a u64, &'a u64);
    type IntoIter = btree_map::Iter<'a, u64, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(u64, u64)> for ContinuousBlocks {
    fn from_iter<I: IntoIterator<Item = (u64, u64)>>(iter: I) -> Self {
        let mut blocks = ContinuousBlocks::new();
        for (start, len) in iter {
            blocks.insert(start, len);
        }
        blocks
    }
}

impl fmt::Display for ContinuousBlocks {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Splits one file's `rf_data_index` into `(global start, length)` runs. Each
/// row runs up to the next row's local index, the last one to `data_len`.
pub fn file_blocks(index: &[IndexEntry], data_len: u64, path: &Path) -> Result<Vec<(u64, u64)>> {
    let mut blocks = Vec::with_capacity(index.len());
    for (i, row) in index.iter().enumerate() {
        let next_local = index.get(i + 1).map_or(data_len, |next| next.local);
        if next_local < row.local || next_local > data_len {
            return Err(DrfErr(format!(
                "malformed rf_data_index in {}: row {} local index {} to {} with {} samples",
                path.display(),
                i,
                row.local,
                next_local,
                data_len
            )));
        }
        if next_local > row.local {
            blocks.push((row.global, next_local - row.local));
        }
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(global: u64, local: u64) -> IndexEntry {
        IndexEntry { global, local }
    }

    #[test]
    fn test_insert_merges_adjacent() {
        let mut blocks = ContinuousBlocks::new();
        blocks.insert(100, 50);
        blocks.insert(150, 50);
        blocks.insert(300, 10);
        assert_eq!(blocks.iter().collect::<Vec<_>>(), vec![(&100, &100), (&300, &10)]);
    }

    #[test]
    fn test_insert_out_of_order_bridges_gap() {
        let blocks: ContinuousBlocks = vec![(0, 10), (20, 10), (10, 10)].into_iter().collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks.total_samples(), 30);
    }

    #[test]
    fn test_insert_overlap_is_union() {
        let blocks: ContinuousBlocks = vec![(0, 10), (5, 20), (40, 5), (2, 3)].into_iter().collect();
        assert_eq!(blocks.iter().collect::<Vec<_>>(), vec![(&0, &25), (&40, &5)]);
    }

    #[test]
    fn test_insert_zero_length_ignored() {
        let mut blocks = ContinuousBlocks::new();
        blocks.insert(7, 0);
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_display_matches_dict_style() {
        let blocks: ContinuousBlocks = vec![(0, 100), (250, 50)].into_iter().collect();
        assert_eq!(blocks.to_string(), "{0: 100, 250: 50}");
        assert_eq!(ContinuousBlocks::new().to_string(), "{}");
    }

    #[test]
    fn test_file_blocks_split_on_index_rows() {
        let index = [entry(1000, 0), entry(2000, 40), entry(2060, 70)];
        let blocks = file_blocks(&index, 100, Path::new("f.h5")).unwrap();
        assert_eq!(blocks, vec![(1000, 40), (2000, 30), (2060, 30)]);
    }

    #[test]
    fn test_file_blocks_rejects_decreasing_local() {
        let index = [entry(0, 10), entry(50, 5)];
        assert!(file_blocks(&index, 100, Path::new("f.h5")).is_err());
    }

    #[test]
    fn test_file_blocks_rejects_local_past_end() {
        let index = [entry(0, 0), entry(50, 120)];
        assert!(file_blocks(&index, 100, Path::new("f.h5")).is_err());
    }

    #[test]
    fn test_bounds_span() {
        let bounds = Bounds { start: 10, end: 19 };
        assert_eq!(bounds.span(), 10);
    }
}
