//! Offset table for removing vertices from an indexed array.

use crate::{WeldError, WeldResult};

/// Index bookkeeping for dropping a set of vertices.
///
/// For a retained original index `i`, [`offset`](Self::offset) is the number
/// of dropped indices strictly below `i`, so the vertex lands at
/// `i - offset(i)` in the filtered array.
///
/// # Example
///
/// ```
/// use tetmesh_weld::VertexCompaction;
///
/// let compaction = VertexCompaction::new(6, &[1, 4]).unwrap();
/// assert_eq!(compaction.kept_count(), 4);
/// assert_eq!(compaction.offset(3), 1);
/// assert_eq!(compaction.new_index(5), Some(3));
/// assert_eq!(compaction.new_index(4), None);
///
/// let kept = compaction.filter(&["a", "b", "c", "d", "e", "f"]);
/// assert_eq!(kept, vec!["a", "c", "d", "f"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexCompaction {
    dropped: Vec<bool>,
    offsets: Vec<u32>,
    dropped_count: usize,
}

impl VertexCompaction {
    /// Build the table for `vertex_count` vertices with `dropped` removed.
    ///
    /// Repeated entries in `dropped` count once.
    ///
    /// # Errors
    ///
    /// Returns [`WeldError::InvalidDroppedIndex`] if an entry of `dropped`
    /// is not below `vertex_count`.
    pub fn new(vertex_count: usize, dropped: &[u32]) -> WeldResult<Self> {
        let mut mask = vec![false; vertex_count];
        for &index in dropped {
            let slot = mask
                .get_mut(index as usize)
                .ok_or(WeldError::InvalidDroppedIndex {
                    index,
                    vertex_count,
                })?;
            *slot = true;
        }

        let mut offsets = Vec::with_capacity(vertex_count);
        let mut running = 0_u32;
        for &is_dropped in &mask {
            offsets.push(running);
            if is_dropped {
                running += 1;
            }
        }

        Ok(Self {
            dropped: mask,
            offsets,
            dropped_count: running as usize,
        })
    }

    /// Number of vertices before compaction.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.dropped.len()
    }

    /// Number of vertices that survive.
    #[must_use]
    pub fn kept_count(&self) -> usize {
        self.dropped.len() - self.dropped_count
    }

    /// Number of vertices removed.
    #[must_use]
    pub const fn dropped_count(&self) -> usize {
        self.dropped_count
    }

    /// Whether `index` is removed. Out-of-range indices are not.
    #[must_use]
    pub fn is_dropped(&self, index: u32) -> bool {
        self.dropped.get(index as usize).copied().unwrap_or(false)
    }

    /// Dropped indices strictly below `index`.
    ///
    /// For indices past the end this is the total dropped count.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn offset(&self, index: u32) -> u32 {
        self.offsets
            .get(index as usize)
            .copied()
            .unwrap_or(self.dropped_count as u32)
    }

    /// Position of `index` in the filtered array, or `None` if it is
    /// dropped or out of range.
    #[must_use]
    pub fn new_index(&self, index: u32) -> Option<u32> {
        let i = index as usize;
        if i >= self.dropped.len() || self.dropped[i] {
            None
        } else {
            Some(index - self.offsets[i])
        }
    }

    /// Copy the retained entries of `items`, preserving order.
    ///
    /// Entries past [`vertex_count`](Self::vertex_count) are kept.
    #[must_use]
    pub fn filter<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.dropped.get(*i).copied().unwrap_or(false))
            .map(|(_, item)| item.clone())
            .collect()
    }
}
