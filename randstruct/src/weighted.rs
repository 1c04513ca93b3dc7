//! Weighted sampling by inverse CDF.
//!
//! Given a discrete distribution, build the running sums once and pick a
//! bucket with a left-bound binary search over them. All of the exact
//! samplers (partitions, Dyck words) funnel their choices through here.
//!
//! ## Boundary rule
//!
//! A draw `u` selects the smallest index `i` whose cumulative weight
//! `c_i >= u`. A draw sitting exactly on a boundary therefore belongs to the
//! left bucket: weights `[0.2, 0.3, 0.5]` and `u = 0.2` pick index 0, and
//! `u = 0.0` always picks index 0.

use log::trace;

use crate::error::{Result, SampleError};
use crate::rng::UniformSource;

/// Allowed distance between the weight sum and 1.
pub const SUM_TOLERANCE: f64 = 1e-6;

/// Validated running sums of a probability vector.
#[derive(Debug, Clone)]
pub struct CumulativeWeights {
    sums: Vec<f64>,
}

impl CumulativeWeights {
    /// Validate `weights` and build their prefix sums.
    ///
    /// Fails with [`SampleError::InvalidDistribution`] on a negative or
    /// non-finite entry, or when the total is not within [`SUM_TOLERANCE`]
    /// of 1.
    pub fn new(weights: &[f64]) -> Result<Self> {
        let mut sums = Vec::with_capacity(weights.len());
        let mut total = 0.0;
        for (index, &weight) in weights.iter().enumerate() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SampleError::InvalidDistribution {
                    sum: weights.iter().sum(),
                    negative_at: Some(index),
                });
            }
            total += weight;
            sums.push(total);
        }

        if (total - 1.0).abs() >= SUM_TOLERANCE {
            return Err(SampleError::InvalidDistribution { sum: total, negative_at: None });
        }

        Ok(Self { sums })
    }

    /// Uniform distribution over `count` buckets.
    pub fn uniform(count: usize) -> Result<Self> {
        if count == 0 {
            return Err(SampleError::InvalidDistribution { sum: 0.0, negative_at: None });
        }
        let p = 1.0 / count as f64;
        Self::new(&vec![p; count])
    }

    /// Build from non-negative counts, normalizing by their total.
    ///
    /// Used by the exact samplers, whose weights are ratios of counts.
    pub fn from_counts(counts: &[f64]) -> Result<Self> {
        let total: f64 = counts.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(SampleError::InvalidDistribution { sum: total, negative_at: None });
        }
        let weights: Vec<f64> = counts.iter().map(|c| c / total).collect();
        Self::new(&weights)
    }

    pub fn len(&self) -> usize {
        self.sums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sums.is_empty()
    }

    /// The running sums, last element within tolerance of 1.
    pub fn sums(&self) -> &[f64] {
        &self.sums
    }

    /// Bucket for a fixed draw `u`: the smallest index with `c_i >= u`.
    ///
    /// If rounding leaves `u` above the final sum, the last bucket is used.
    pub fn pick(&self, u: f64) -> usize {
        let index = self.sums.partition_point(|&c| c < u);
        index.min(self.sums.len().saturating_sub(1))
    }

    /// Draw `u` from `source` and pick its bucket.
    pub fn sample<S: UniformSource + ?Sized>(&self, source: &mut S) -> usize {
        let u = source.uniform();
        let index = self.pick(u);
        trace!("weighted pick: u={:.6} -> index {} of {}", u, index, self.sums.len());
        index
    }
}

/// Pick an index in `0..count`, optionally weighted.
///
/// Without weights every index is equally likely.
pub fn sample_index<S: UniformSource + ?Sized>(
    source: &mut S,
    count: usize,
    weights: Option<&[f64]>,
) -> Result<usize> {
    let cumulative = match weights {
        Some(weights) => {
            if weights.len() != count {
                return Err(SampleError::LengthMismatch { items: count, weights: weights.len() });
            }
            CumulativeWeights::new(weights)?
        }
        None => CumulativeWeights::uniform(count)?,
    };
    Ok(cumulative.sample(source))
}

/// Pick one element of `items`, optionally weighted.
pub fn sample_from_sequence<'a, T, S: UniformSource + ?Sized>(
    source: &mut S,
    items: &'a [T],
    weights: Option<&[f64]>,
) -> Result<&'a T> {
    let index = sample_index(source, items.len(), weights)?;
    Ok(&items[index])
}
