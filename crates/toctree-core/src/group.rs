//! Grouping of adjacent items
//!
//! [`GroupAdjacent`] splits a sequence into maximal runs of consecutive items
//! whose keys compare equal. Keys only need [`PartialEq`]; runs with the same
//! key that are separated by other items stay separate groups.
//!
//! ```
//! use toctree_core::SequenceExt;
//!
//! let groups: Vec<_> = [1, 1, 2, 2, 1].into_iter().group_adjacent(|n| *n).collect();
//! assert_eq!(groups.len(), 3);
//! assert_eq!(groups[0].items(), &[1, 1]);
//! assert_eq!(groups[2].key(), &1);
//! ```

use std::iter::Fuse;

/// A key together with the adjacent items that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<K, T> {
    key: K,
    items: Vec<T>,
}

impl<K, T> Group<K, T> {
    /// The key shared by every item of the group
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Items in source order; never empty
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of items in the group
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the group has no items
    ///
    /// Groups produced by [`GroupAdjacent`] always hold at least one item.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the items by reference
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Split into key and items
    pub fn into_parts(self) -> (K, Vec<T>) {
        (self.key, self.items)
    }
}

impl<K, T> IntoIterator for Group<K, T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'g, K, T> IntoIterator for &'g Group<K, T> {
    type Item = &'g T;
    type IntoIter = std::slice::Iter<'g, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Iterator returned by [`SequenceExt::group_adjacent`](crate::SequenceExt::group_adjacent)
///
/// Each group is complete before it is yielded, which means the source is
/// read one item ahead: the first item of the next run is held back until
/// the following call.
pub struct GroupAdjacent<I, F, K>
where
    I: Iterator,
{
    source: Fuse<I>,
    key_selector: F,
    pending: Option<(K, I::Item)>,
}

impl<I, F, K> GroupAdjacent<I, F, K>
where
    I: Iterator,
    F: FnMut(&I::Item) -> K,
    K: PartialEq,
{
    pub(crate) fn new(source: I, key_selector: F) -> Self {
        Self {
            source: source.fuse(),
            key_selector,
            pending: None,
        }
    }

    fn pull(&mut self) -> Option<(K, I::Item)> {
        let item = self.source.next()?;
        let key = (self.key_selector)(&item);
        Some((key, item))
    }
}

impl<I, F, K> Iterator for GroupAdjacent<I, F, K>
where
    I: Iterator,
    F: FnMut(&I::Item) -> K,
    K: PartialEq,
{
    type Item = Group<K, I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let (key, first) = match self.pending.take() {
            Some(pending) => pending,
            None => self.pull()?,
        };
        let mut items = vec![first];
        while let Some((next_key, item)) = self.pull() {
            if next_key != key {
                self.pending = Some((next_key, item));
                break;
            }
            items.push(item);
        }
        Some(Group { key, items })
    }
}

#[cfg(test)]
mod tests {
    use crate::SequenceExt;

    #[test]
    fn test_non_adjacent_runs_stay_separate() {
        let groups: Vec<_> = [1, 1, 2, 2, 1]
            .into_iter()
            .group_adjacent(|n| *n)
            .map(|g| g.into_parts())
            .collect();
        assert_eq!(
            groups,
            vec![(1, vec![1, 1]), (2, vec![2, 2]), (1, vec![1])]
        );
    }

    #[test]
    fn test_empty_source() {
        let groups: Vec<_> = std::iter::empty::<u8>().group_adjacent(|n| *n).collect();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_single_item() {
        let groups: Vec<_> = ["only"].into_iter().group_adjacent(|s| s.len()).collect();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key(), &4);
        assert_eq!(groups[0].len(), 1);
    }

    #[test]
    fn test_key_only_needs_partial_eq() {
        // f64 is neither Eq nor Hash
        let groups: Vec<_> = [1.0_f64, 1.0, 2.5]
            .into_iter()
            .group_adjacent(|x| *x)
            .collect();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].key(), &2.5);
    }

    #[test]
    fn test_groups_are_produced_lazily() {
        let mut pulled = 0;
        let mut groups = [1, 1, 2, 3, 3, 3]
            .into_iter()
            .inspect(|_| pulled += 1)
            .group_adjacent(|n| *n);
        let first = groups.next().unwrap();
        assert_eq!(first.items(), &[1, 1]);
        drop(groups);
        // two items of the first run plus one item of lookahead
        assert_eq!(pulled, 3);
    }

    #[test]
    fn test_group_by_derived_key() {
        let words = ["apple", "avocado", "banana", "blueberry", "cherry", "apricot"];
        let runs: Vec<(char, usize)> = words
            .into_iter()
            .group_adjacent(|w| w.chars().next().unwrap())
            .map(|g| (*g.key(), g.len()))
            .collect();
        assert_eq!(runs, vec![('a', 2), ('b', 2), ('c', 1), ('a', 1)]);
    }

    #[test]
    fn test_group_iterates_items() {
        let group = [5, 5].into_iter().group_adjacent(|_| ()).next().unwrap();
        let borrowed: Vec<_> = (&group).into_iter().copied().collect();
        assert_eq!(borrowed, vec![5, 5]);
        assert_eq!(group.iter().sum::<i32>(), 10);
        assert!(!group.is_empty());
        let owned: Vec<_> = group.into_iter().collect();
        assert_eq!(owned, vec![5, 5]);
    }
}
