//! Integer partitions: exact counting and uniform sampling.
//!
//! A partition of `n` is a non-increasing list of positive parts summing to
//! `n`. The sampler picks the first part with probability proportional to
//! the number of ways to finish the partition, then repeats on the
//! remainder with the first part as the new cap. Because the weights mirror
//! the counting recurrence case for case, every partition comes out with
//! probability `1 / p(n, max_part)`.
//!
//! ## Counting
//!
//! `p(n, m) = p(n, m - 1) + p(n - m, m)`: partitions that avoid part `m`, plus
//! partitions that use it at least once. The table is filled bottom-up and
//! kept for the life of the process, so repeated sampling of the same `n`
//! only pays for lookups.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::error::{Result, SampleError};
use crate::rng::UniformSource;
use crate::weighted::CumulativeWeights;

/// A non-increasing sequence of positive parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Partition {
    parts: Vec<usize>,
}

impl Partition {
    /// Build a partition, checking that parts are positive and non-increasing.
    pub fn new(parts: Vec<usize>) -> Result<Self> {
        if parts.iter().any(|&p| p == 0) {
            return Err(SampleError::InvalidArgument("partition parts must be positive".into()));
        }
        if parts.windows(2).any(|w| w[0] < w[1]) {
            return Err(SampleError::InvalidArgument(
                "partition parts must be non-increasing".into(),
            ));
        }
        Ok(Self { parts })
    }

    pub fn parts(&self) -> &[usize] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<usize> {
        self.parts
    }

    /// The `n` this partitions.
    pub fn total(&self) -> usize {
        self.parts.iter().sum()
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Largest part, 0 for the empty partition.
    pub fn largest(&self) -> usize {
        self.parts.first().copied().unwrap_or(0)
    }

    /// Transpose of the Young diagram: part `j` counts the parts larger than `j`.
    pub fn conjugate(&self) -> Partition {
        let parts = (0..self.largest())
            .map(|j| self.parts.iter().take_while(|&&p| p > j).count())
            .collect();
        Partition { parts }
    }

    /// Render as rows of squares, one row per part.
    pub fn young_diagram(&self) -> String {
        young_diagram_of(&self.parts, false)
    }
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", part)?;
        }
        write!(f, ")")
    }
}

/// Young diagram of an arbitrary list of parts.
///
/// With `sorted` the rows are laid out largest first. Partitions built by
/// this crate already are, so it only matters for hand-built input.
pub fn young_diagram_of(parts: &[usize], sorted: bool) -> String {
    let mut rows = parts.to_vec();
    if sorted {
        rows.sort_unstable_by(|a, b| b.cmp(a));
    }
    rows.iter()
        .map(|&part| "■ ".repeat(part))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Memoized `p(n, max_part)`.
///
/// Keys are stored with `max_part` clamped to `n`, since larger caps admit
/// no extra partitions.
#[derive(Debug, Default)]
pub struct PartitionCounter {
    table: HashMap<(usize, usize), u128>,
}

impl PartitionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached `(n, max_part)` cells.
    pub fn cached(&self) -> usize {
        self.table.len()
    }

    /// Number of partitions of `n` with every part at most `max_part`
    /// (`None` means no cap).
    pub fn count(&mut self, n: usize, max_part: Option<usize>) -> Result<u128> {
        let max_part = max_part.unwrap_or(n);
        if let Some(count) = self.lookup(n, max_part) {
            return Ok(count);
        }
        self.fill(n, max_part.min(n))?;
        self.lookup(n, max_part)
            .ok_or(SampleError::CountOverflow { what: "partitions", n })
    }

    /// Number of partitions of `n` into exactly `k` parts.
    ///
    /// Conjugation maps these onto partitions of `n - k` with parts at most `k`.
    pub fn count_with_parts(&mut self, n: usize, k: usize) -> Result<u128> {
        if k > n {
            return Ok(0);
        }
        if k == 0 {
            return Ok(if n == 0 { 1 } else { 0 });
        }
        self.count(n - k, Some(k))
    }

    fn lookup(&self, n: usize, max_part: usize) -> Option<u128> {
        if n == 0 {
            return Some(1);
        }
        if max_part == 0 {
            return Some(0);
        }
        self.table.get(&(n, max_part.min(n))).copied()
    }

    /// Fill every cell `(total, part)` with `part <= max_part`, `part <= total <= n`.
    ///
    /// Parts ascend in the outer loop and totals in the inner one, so both
    /// terms of the recurrence are already present when a cell is computed.
    fn fill(&mut self, n: usize, max_part: usize) -> Result<()> {
        let before = self.table.len();

        for part in 1..=max_part {
            for total in part..=n {
                if self.table.contains_key(&(total, part)) {
                    continue;
                }
                let without = self.lookup(total, part - 1).unwrap_or(0);
                let with = self.lookup(total - part, part).unwrap_or(0);
                let count = without
                    .checked_add(with)
                    .ok_or(SampleError::CountOverflow { what: "partitions", n: total })?;
                self.table.insert((total, part), count);
            }
        }

        debug!(
            "partition table: {} -> {} cells (n={}, max_part={})",
            before,
            self.table.len(),
            n,
            max_part
        );
        Ok(())
    }
}

static PARTITIONS: LazyLock<Mutex<PartitionCounter>> =
    LazyLock::new(|| Mutex::new(PartitionCounter::new()));

/// The process-wide counter.
///
/// Every cell is a pure function of its key, so a poisoned lock still holds
/// correct values and is simply taken over.
pub fn shared_counter() -> MutexGuard<'static, PartitionCounter> {
    PARTITIONS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// `p(n, max_part)` using the shared cache.
pub fn count_partitions(n: usize, max_part: Option<usize>) -> Result<u128> {
    shared_counter().count(n, max_part)
}

/// Partitions of `n` into exactly `k` parts, using the shared cache.
pub fn count_partitions_with_parts(n: usize, k: usize) -> Result<u128> {
    shared_counter().count_with_parts(n, k)
}

/// Uniformly random partition of `n` with parts at most `max_part`.
///
/// `max_part` defaults to `n` and is clamped to it. `n == 0` or
/// `max_part == 0` give the empty partition.
pub fn random_partition<S: UniformSource + ?Sized>(
    source: &mut S,
    n: usize,
    max_part: Option<usize>,
) -> Result<Partition> {
    random_partition_with(&mut shared_counter(), source, n, max_part)
}

/// [`random_partition`] against an explicit counter.
pub fn random_partition_with<S: UniformSource + ?Sized>(
    counter: &mut PartitionCounter,
    source: &mut S,
    n: usize,
    max_part: Option<usize>,
) -> Result<Partition> {
    let mut remaining = n;
    let mut cap = max_part.map_or(n, |m| m.min(n));
    let mut parts = Vec::new();

    while remaining > 0 && cap > 0 {
        cap = cap.min(remaining);

        // First part i leaves p(remaining - i, i) ways to finish
        let counts = (1..=cap)
            .map(|i| counter.count(remaining - i, Some(i)).map(|c| c as f64))
            .collect::<Result<Vec<f64>>>()?;
        let first = CumulativeWeights::from_counts(&counts)?.sample(source) + 1;

        parts.push(first);
        remaining -= first;
        cap = first;
    }

    Ok(Partition { parts })
}

/// Uniformly random partition of `n` into exactly `k` parts.
///
/// Samples a partition of `n - k` with parts at most `k`, conjugates it
/// (at most `k` parts), pads to `k` columns and adds one to each.
pub fn random_partition_with_parts<S: UniformSource + ?Sized>(
    source: &mut S,
    n: usize,
    k: usize,
) -> Result<Partition> {
    if k > n {
        return Err(SampleError::InvalidArgument(format!(
            "cannot split {} into {} positive parts",
            n, k
        )));
    }
    if k == 0 {
        if n == 0 {
            return Ok(Partition::default());
        }
        return Err(SampleError::InvalidArgument(format!("cannot split {} into 0 parts", n)));
    }

    let base = random_partition(source, n - k, Some(k))?.conjugate();
    let mut parts = base.into_parts();
    parts.resize(k, 0);
    for part in &mut parts {
        *part += 1;
    }
    Ok(Partition { parts })
}

/// Young diagram of a uniformly random partition of `n`.
pub fn random_young_diagram<S: UniformSource + ?Sized>(source: &mut S, n: usize) -> Result<String> {
    Ok(random_partition(source, n, None)?.young_diagram())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RandSource;

    #[test]
    fn known_partition_numbers() {
        let mut counter = PartitionCounter::new();
        let expected = [1u128, 1, 2, 3, 5, 7, 11, 15, 22, 30, 42];
        for (n, &p) in expected.iter().enumerate() {
            assert_eq!(counter.count(n, None).unwrap(), p, "p({})", n);
        }
        assert_eq!(counter.count(100, None).unwrap(), 190_569_292);
    }

    #[test]
    fn capped_counts() {
        let mut counter = PartitionCounter::new();
        assert_eq!(counter.count(6, Some(3)).unwrap(), 7);
        assert_eq!(counter.count(6, Some(1)).unwrap(), 1);
        assert_eq!(counter.count(6, Some(0)).unwrap(), 0);
        assert_eq!(counter.count(0, Some(0)).unwrap(), 1);
        // Caps above n change nothing
        assert_eq!(counter.count(6, Some(50)).unwrap(), 11);
    }

    #[test]
    fn recurrence_is_self_consistent() {
        let mut counter = PartitionCounter::new();
        for n in 1..=25 {
            for m in 1..=n {
                let direct = counter.count(n, Some(m)).unwrap();
                let summed: u128 = (1..=m)
                    .map(|i| counter.count(n - i, Some(i)).unwrap())
                    .sum();
                assert_eq!(direct, summed, "p({}, {})", n, m);
            }
        }
    }

    #[test]
    fn counter_reuses_cells() {
        let mut counter = PartitionCounter::new();
        counter.count(30, None).unwrap();
        let cells = counter.cached();
        counter.count(20, Some(10)).unwrap();
        assert_eq!(counter.cached(), cells);
    }

    #[test]
    fn exact_part_counts_sum_to_total() {
        let mut counter = PartitionCounter::new();
        assert_eq!(counter.count_with_parts(7, 3).unwrap(), 4);
        assert_eq!(counter.count_with_parts(0, 0).unwrap(), 1);
        assert_eq!(counter.count_with_parts(5, 0).unwrap(), 0);
        assert_eq!(counter.count_with_parts(3, 4).unwrap(), 0);
        for n in 1..=15 {
            let total: u128 = (1..=n).map(|k| counter.count_with_parts(n, k).unwrap()).sum();
            assert_eq!(total, counter.count(n, None).unwrap());
        }
    }

    #[test]
    fn sampled_partitions_are_valid() {
        let mut source = RandSource::seeded(11);
        for n in 0..40 {
            for _ in 0..10 {
                let p = random_partition(&mut source, n, None).unwrap();
                assert_eq!(p.total(), n);
                assert!(p.parts().iter().all(|&x| x >= 1));
                assert!(p.parts().windows(2).all(|w| w[0] >= w[1]));
            }
        }
    }

    #[test]
    fn respects_max_part() {
        let mut source = RandSource::seeded(12);
        for _ in 0..200 {
            let p = random_partition(&mut source, 20, Some(4)).unwrap();
            assert_eq!(p.total(), 20);
            assert!(p.largest() <= 4);
        }
    }

    #[test]
    fn degenerate_inputs_give_empty() {
        let mut source = RandSource::seeded(13);
        assert!(random_partition(&mut source, 0, None).unwrap().is_empty());
        assert!(random_partition(&mut source, 5, Some(0)).unwrap().is_empty());
    }

    #[test]
    fn uniform_over_partitions_of_six() {
        let mut source = RandSource::seeded(6);
        let trials = 20_000;
        let mut counts: HashMap<Partition, usize> = HashMap::new();
        for _ in 0..trials {
            *counts.entry(random_partition(&mut source, 6, Some(6)).unwrap()).or_default() += 1;
        }
        assert_eq!(counts.len(), 11);
        for (partition, count) in &counts {
            let freq = *count as f64 / trials as f64;
            assert!((freq - 1.0 / 11.0).abs() < 0.01, "{} seen with freq {}", partition, freq);
        }
    }

    #[test]
    fn fixed_part_count_is_uniform() {
        let mut source = RandSource::seeded(73);
        let trials = 20_000;
        let mut counts: HashMap<Partition, usize> = HashMap::new();
        for _ in 0..trials {
            let p = random_partition_with_parts(&mut source, 7, 3).unwrap();
            assert_eq!(p.len(), 3);
            assert_eq!(p.total(), 7);
            *counts.entry(p).or_default() += 1;
        }
        assert_eq!(counts.len(), 4);
        for count in counts.values() {
            let freq = *count as f64 / trials as f64;
            assert!((freq - 0.25).abs() < 0.015, "freq {}", freq);
        }
    }

    #[test]
    fn fixed_part_count_rejects_impossible() {
        let mut source = RandSource::seeded(1);
        assert!(random_partition_with_parts(&mut source, 3, 4).is_err());
        assert!(random_partition_with_parts(&mut source, 3, 0).is_err());
        assert!(random_partition_with_parts(&mut source, 0, 0).unwrap().is_empty());
        assert_eq!(
            random_partition_with_parts(&mut source, 5, 5).unwrap().parts(),
            &[1, 1, 1, 1, 1]
        );
        assert_eq!(random_partition_with_parts(&mut source, 5, 1).unwrap().parts(), &[5]);
    }

    #[test]
    fn conjugate_transposes() {
        let p = Partition::new(vec![4, 2, 1]).unwrap();
        assert_eq!(p.conjugate().parts(), &[3, 2, 1, 1]);
        assert_eq!(p.conjugate().conjugate(), p);
        assert!(Partition::default().conjugate().is_empty());
    }

    #[test]
    fn new_validates() {
        assert!(Partition::new(vec![1, 2]).is_err());
        assert!(Partition::new(vec![2, 0]).is_err());
        assert!(Partition::new(vec![3, 3, 1]).is_ok());
    }

    #[test]
    fn display_and_diagram() {
        let p = Partition::new(vec![3, 1]).unwrap();
        assert_eq!(p.to_string(), "(3, 1)");
        assert_eq!(Partition::default().to_string(), "()");
        assert_eq!(p.young_diagram(), "■ ■ ■ \n■ ");
        assert_eq!(young_diagram_of(&[1, 2], true), "■ ■ \n■ ");
    }

    #[test]
    fn random_diagram_has_n_squares() {
        let mut source = RandSource::seeded(5);
        let diagram = random_young_diagram(&mut source, 9).unwrap();
        assert_eq!(diagram.matches('■').count(), 9);
    }

    #[test]
    fn shared_caches_across_threads() {
        const PARTITIONS_OF: [u128; 8] = [42, 627, 5604, 37338, 204226, 966467, 4087968, 15796476];
        const CATALAN: [u128; 8] = [
            42,
            1430,
            58786,
            2674440,
            129644790,
            6564120420,
            343059613650,
            18367353072152,
        ];

        let handles: Vec<_> = (0..8)
            .map(|i| {
                std::thread::spawn(move || {
                    let mut source = RandSource::seeded(i as u64);
                    let n = 10 * (i + 1);
                    let pairs = 5 + 3 * i;
                    for _ in 0..20 {
                        let p = random_partition(&mut source, n, None).unwrap();
                        assert_eq!(p.total(), n);
                        assert!(p.parts().windows(2).all(|w| w[0] >= w[1]));

                        let word = crate::dyck::random_dyck_word(&mut source, pairs).unwrap();
                        assert_eq!(word.semilength(), pairs);
                        assert!(crate::dyck::validate(word.symbols()).is_ok());
                    }
                    (
                        count_partitions(n, None).unwrap(),
                        crate::dyck::count_dyck_words(pairs).unwrap(),
                    )
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let (partitions, words) = handle.join().unwrap();
            assert_eq!(partitions, PARTITIONS_OF[i], "p({})", 10 * (i + 1));
            assert_eq!(words, CATALAN[i], "c({})", 5 + 3 * i);
        }
    }

    #[test]
    fn poisoned_shared_counter_still_counts() {
        let _ = std::thread::spawn(|| {
            let _guard = shared_counter();
            panic!("panicking while holding the partition table");
        })
        .join();

        assert_eq!(count_partitions(12, None).unwrap(), 77);
        let mut source = RandSource::seeded(3);
        assert_eq!(random_partition(&mut source, 12, None).unwrap().total(), 12);
    }
}
