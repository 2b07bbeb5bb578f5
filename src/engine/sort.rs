//! Recursive sorting and searching.
//!
//! Merge sort is the stable workhorse used for every ranked view. Quicksort
//! is offered as the in-place alternative; it is not stable. A three-way
//! partition keeps runs of equal keys linear, and the pivot strategy guards
//! the remaining quadratic worst case.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// How quicksort picks its pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotStrategy {
    /// Median of the first, middle and last elements.
    #[default]
    MedianOfThree,
    /// Always the first element.
    First,
    /// Always the middle element.
    Middle,
    /// Always the last element.
    Last,
}

/// Sorting algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortAlgorithm {
    /// Stable top-down merge sort, O(n log n), O(n) extra space.
    #[default]
    Merge,
    /// In-place quicksort with the given pivot strategy. Not stable.
    Quick(PivotStrategy),
}

impl SortAlgorithm {
    /// Whether equal keys keep their input order.
    #[must_use]
    pub const fn is_stable(self) -> bool {
        matches!(self, Self::Merge)
    }
}

/// Produce a new sequence sorted ascending by `key_fn`.
///
/// Keys are computed once per element. With [`SortAlgorithm::Merge`] ties
/// keep their input order; with [`SortAlgorithm::Quick`] tie order is
/// unspecified.
pub fn sort_by<T, K, F>(items: &[T], mut key_fn: F, algorithm: SortAlgorithm) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: FnMut(&T) -> K,
{
    let keyed: Vec<(K, T)> = items.iter().map(|t| (key_fn(t), t.clone())).collect();
    let mut by_key = |a: &(K, T), b: &(K, T)| a.0.cmp(&b.0);

    let sorted = match algorithm {
        SortAlgorithm::Merge => merge_sort_with(keyed, &mut by_key),
        SortAlgorithm::Quick(pivot) => {
            let mut keyed = keyed;
            quick_sort_with(&mut keyed, pivot, &mut by_key);
            keyed
        }
    };
    sorted.into_iter().map(|(_, t)| t).collect()
}

/// Stable merge sort by a key function.
pub fn merge_sort_by_key<T, K, F>(items: Vec<T>, mut key: F) -> Vec<T>
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    merge_sort_with(items, &mut |a: &T, b: &T| key(a).cmp(&key(b)))
}

/// In-place quicksort by a key function.
pub fn quick_sort_by_key<T, K, F>(items: &mut [T], mut key: F, pivot: PivotStrategy)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    quick_sort_with(items, pivot, &mut |a: &T, b: &T| key(a).cmp(&key(b)));
}

/// Index of the first element whose key is not less than `target`.
///
/// `items` must already be sorted ascending by `key`. Returns `items.len()`
/// if every key is smaller.
pub fn lower_bound_by_key<T, K, F>(items: &[T], target: &K, mut key: F) -> usize
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    let (mut lo, mut hi) = (0, items.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if key(&items[mid]) < *target {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

fn merge_sort_with<T, F>(mut items: Vec<T>, cmp: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort_with(items, cmp);
    let right = merge_sort_with(right, cmp);
    merge(left, right, cmp)
}

fn merge<T, F>(left: Vec<T>, right: Vec<T>, cmp: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut out = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        // Left wins ties.
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(l, r) != Ordering::Greater,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        if take_left {
            out.extend(left.next());
        } else {
            out.extend(right.next());
        }
    }
    out
}

fn quick_sort_with<T, F>(items: &mut [T], pivot: PivotStrategy, cmp: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut slice = items;
    while slice.len() > 1 {
        let (lt, gt) = partition(slice, pivot, cmp);
        let (left, rest) = std::mem::take(&mut slice).split_at_mut(lt);
        let right = &mut rest[gt - lt..];

        // Recurse on the smaller side, loop on the larger: stack depth stays O(log n).
        if left.len() < right.len() {
            quick_sort_with(left, pivot, cmp);
            slice = right;
        } else {
            quick_sort_with(right, pivot, cmp);
            slice = left;
        }
    }
}

/// Three-way partition around the chosen pivot.
///
/// Returns `(lt, gt)` such that `slice[..lt]` is less than the pivot,
/// `slice[lt..gt]` equals it and `slice[gt..]` is greater. Runs of equal
/// keys are settled in one pass.
fn partition<T, F>(slice: &mut [T], pivot: PivotStrategy, cmp: &mut F) -> (usize, usize)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let p = pivot_index(slice, pivot, cmp);
    slice.swap(0, p);

    // slice[lt] always holds a pivot-equal element.
    let (mut lt, mut i, mut gt) = (0, 1, slice.len());
    while i < gt {
        match cmp(&slice[i], &slice[lt]) {
            Ordering::Less => {
                slice.swap(lt, i);
                lt += 1;
                i += 1;
            }
            Ordering::Greater => {
                gt -= 1;
                slice.swap(i, gt);
            }
            Ordering::Equal => i += 1,
        }
    }
    (lt, gt)
}

fn pivot_index<T, F>(slice: &[T], pivot: PivotStrategy, cmp: &mut F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    let last = slice.len() - 1;
    let mid = last / 2;
    match pivot {
        PivotStrategy::First => 0,
        PivotStrategy::Middle => mid,
        PivotStrategy::Last => last,
        PivotStrategy::MedianOfThree => {
            let le =
                |cmp: &mut F, a: usize, b: usize| cmp(&slice[a], &slice[b]) != Ordering::Greater;
            if le(cmp, 0, mid) {
                if le(cmp, mid, last) {
                    mid
                } else if le(cmp, 0, last) {
                    last
                } else {
                    0
                }
            } else if le(cmp, 0, last) {
                0
            } else if le(cmp, mid, last) {
                last
            } else {
                mid
            }
        }
    }
}
