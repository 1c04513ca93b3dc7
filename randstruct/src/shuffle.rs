//! Samplers that only need uniform integers and coin flips.
//!
//! - permutations: Fisher–Yates over `0..n`
//! - subsets: the same shuffle stopped after `k` positions
//! - ordered partitions (compositions): one fair cut decision between each
//!   pair of adjacent units

use crate::error::{Result, SampleError};
use crate::rng::UniformSource;

/// Uniformly random permutation of `0..n`.
pub fn random_permutation<S: UniformSource + ?Sized>(source: &mut S, n: usize) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..n).collect();
    shuffle_prefix(source, &mut perm, n);
    perm
}

/// `k` distinct elements of `0..n`, each `k`-subset equally likely.
///
/// The elements come back in shuffle order, not sorted.
pub fn random_subset<S: UniformSource + ?Sized>(
    source: &mut S,
    n: usize,
    k: usize,
) -> Result<Vec<usize>> {
    if k > n {
        return Err(SampleError::InvalidArgument(format!(
            "cannot choose {} elements from {}",
            k, n
        )));
    }
    let mut perm: Vec<usize> = (0..n).collect();
    shuffle_prefix(source, &mut perm, k);
    perm.truncate(k);
    Ok(perm)
}

/// Swap a uniformly chosen element of `items[i..]` into position `i`, for
/// each `i < amount`.
fn shuffle_prefix<T, S: UniformSource + ?Sized>(source: &mut S, items: &mut [T], amount: usize) {
    let len = items.len();
    for i in 0..amount.min(len) {
        let j = source.uniform_int(i, len - 1);
        items.swap(i, j);
    }
}

/// Uniformly random composition of `n`: positive parts, order significant.
///
/// The `n - 1` gaps between units are each cut or not with a fair coin,
/// which matches the `2^(n-1)` compositions one to one.
pub fn random_ordered_partition<S: UniformSource + ?Sized>(source: &mut S, n: usize) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut run = 1;
    for _ in 1..n {
        if source.coin() {
            parts.push(run);
            run = 1;
        } else {
            run += 1;
        }
    }
    parts.push(run);
    parts
}
