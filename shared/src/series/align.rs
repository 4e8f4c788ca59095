//! Sort and alignment helpers for parallel arrays.
//!
//! The series assemblers keep several arrays in lockstep. Reordering one of
//! them is done by computing a permutation once and applying it to all.

/// Returns the permutation that stably sorts `keys` ascending.
///
/// `perm[i]` is the index in `keys` of the element that lands at position `i`.
/// Equal keys keep their original relative order. NaN sorts after every number.
#[must_use]
pub fn sort_permutation(keys: &[f64]) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..keys.len()).collect();
    perm.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]));
    perm
}

/// Reorders `values` by a permutation from [`sort_permutation`].
///
/// # Panics
///
/// Panics if `perm` holds an index out of bounds for `values`.
#[must_use]
pub fn apply_permutation<T: Clone>(values: &[T], perm: &[usize]) -> Vec<T> {
    perm.iter().map(|&i| values[i].clone()).collect()
}

/// Zips two equally long arrays into `[a, b]` pairs.
///
/// Extra elements of the longer array are dropped.
#[must_use]
pub fn merge_pairs<T: Copy>(first: &[T], second: &[T]) -> Vec<[T; 2]> {
    first
        .iter()
        .zip(second)
        .map(|(&a, &b)| [a, b])
        .collect()
}

/// Concatenates groups into one array, keeping group order.
#[must_use]
pub fn flatten<T: Clone>(groups: &[Vec<T>]) -> Vec<T> {
    groups.iter().flatten().cloned().collect()
}

/// Splits a flat array back into consecutive groups of the given sizes.
///
/// Counts that run past the end produce shorter (possibly empty) groups;
/// elements past the sum of counts are dropped.
#[must_use]
pub fn group<T: Clone>(values: &[T], counts: &[usize]) -> Vec<Vec<T>> {
    let mut groups = Vec::with_capacity(counts.len());
    let mut start = 0;
    for &count in counts {
        let end = (start + count).min(values.len());
        groups.push(values[start..end].to_vec());
        start = end;
    }
    groups
}
