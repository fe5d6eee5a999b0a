//! Sequence helpers
//!
//! Lazy adapters that work on any iterator, independent of the tree:
//! positional zipping with a combining function, running folds, slice tails
//! and string concatenation into a single buffer.

use crate::group::GroupAdjacent;

/// Extension methods available on every [`Iterator`]
pub trait SequenceExt: Iterator + Sized {
    /// Pair items positionally with `other` and combine each pair
    ///
    /// Stops as soon as either side runs out; a length mismatch silently
    /// truncates to the shorter input.
    fn zip_with<J, F, R>(self, other: J, combine: F) -> ZipWith<Self, J::IntoIter, F>
    where
        J: IntoIterator,
        F: FnMut(Self::Item, J::Item) -> R,
    {
        ZipWith {
            first: self,
            second: other.into_iter(),
            combine,
        }
    }

    /// Running fold that yields every intermediate accumulator
    ///
    /// `projection(item, &acc)` produces the next output, which also becomes
    /// the accumulator for the following item.
    ///
    /// ```
    /// use toctree_core::SequenceExt;
    ///
    /// let sums: Vec<i32> = [1, 2, 3].into_iter().rollup(0, |x, acc| x + acc).collect();
    /// assert_eq!(sums, vec![1, 3, 6]);
    /// ```
    fn rollup<R, F>(self, seed: R, projection: F) -> Rollup<Self, R, F>
    where
        R: Clone,
        F: FnMut(Self::Item, &R) -> R,
    {
        Rollup {
            source: self,
            accumulator: seed,
            projection,
        }
    }

    /// Group runs of adjacent items that share a key
    ///
    /// See [`GroupAdjacent`].
    fn group_adjacent<K, F>(self, key_selector: F) -> GroupAdjacent<Self, F, K>
    where
        K: PartialEq,
        F: FnMut(&Self::Item) -> K,
    {
        GroupAdjacent::new(self, key_selector)
    }

    /// Concatenate string items into one `String`
    fn string_concatenate(self) -> String
    where
        Self::Item: AsRef<str>,
    {
        let mut buffer = String::new();
        for item in self {
            buffer.push_str(item.as_ref());
        }
        buffer
    }

    /// Concatenate the projection of every item into one `String`
    fn string_concatenate_by<F, S>(self, mut projection: F) -> String
    where
        F: FnMut(Self::Item) -> S,
        S: AsRef<str>,
    {
        self.fold(String::new(), |mut buffer, item| {
            buffer.push_str(projection(item).as_ref());
            buffer
        })
    }
}

impl<I: Iterator> SequenceExt for I {}

/// Items of `source` from `index` to the end
///
/// Empty when `index` is past the end.
pub fn sequence_at<T>(source: &[T], index: usize) -> std::slice::Iter<'_, T> {
    source.get(index..).unwrap_or_default().iter()
}

/// Iterator returned by [`SequenceExt::zip_with`]
#[derive(Debug, Clone)]
pub struct ZipWith<A, B, F> {
    first: A,
    second: B,
    combine: F,
}

impl<A, B, F, R> Iterator for ZipWith<A, B, F>
where
    A: Iterator,
    B: Iterator,
    F: FnMut(A::Item, B::Item) -> R,
{
    type Item = R;

    fn next(&mut self) -> Option<R> {
        let a = self.first.next()?;
        let b = self.second.next()?;
        Some((self.combine)(a, b))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (a_low, a_high) = self.first.size_hint();
        let (b_low, b_high) = self.second.size_hint();
        let high = match (a_high, b_high) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        (a_low.min(b_low), high)
    }
}

/// Iterator returned by [`SequenceExt::rollup`]
#[derive(Debug, Clone)]
pub struct Rollup<I, R, F> {
    source: I,
    accumulator: R,
    projection: F,
}

impl<I, R, F> Iterator for Rollup<I, R, F>
where
    I: Iterator,
    R: Clone,
    F: FnMut(I::Item, &R) -> R,
{
    type Item = R;

    fn next(&mut self) -> Option<R> {
        let item = self.source.next()?;
        self.accumulator = (self.projection)(item, &self.accumulator);
        Some(self.accumulator.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}
