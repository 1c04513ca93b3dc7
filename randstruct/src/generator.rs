//! Catalogue of structure generators, addressable by name.
//!
//! Lets a caller (the CLI, a test plan) pick a generator from a string and
//! drive it with a list of integer arguments, getting back a [`Sample`] that
//! can be compared, hashed and printed no matter which generator made it.
//!
//! Besides the uniform structure samplers the catalogue carries the discrete
//! variates, so their frequency tables can be tabulated the same way.
//! Arguments are integers, so probabilities are given in thousandths
//! (`binomial 10 250` is Binomial(10, 0.25)).

use crate::dyck::{self, DyckWord};
use crate::error::{Result, SampleError};
use crate::partition::{self, Partition};
use crate::rng::{SourceRng, UniformSource};
use crate::shuffle;
use crate::tree::{self, BinaryTree};
use crate::variates;

/// Available generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generator {
    Permutation,
    Subset,
    Partition,
    PartitionParts,
    OrderedPartition,
    DyckWord,
    BinaryTree,
    YoungDiagram,
    Bernoulli,
    Binomial,
    Geometric,
    Poisson,
}

/// One outcome of a generator.
///
/// Subsets are stored sorted so that two draws of the same set compare
/// equal regardless of the order the shuffle produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sample {
    Permutation(Vec<usize>),
    Subset(Vec<usize>),
    Partition(Partition),
    Composition(Vec<usize>),
    Word(DyckWord),
    Tree(BinaryTree),
    Diagram(String),
    /// A discrete variate; Bernoulli draws are 0 or 1.
    Count(u64),
}

impl Generator {
    /// Get all available generators.
    pub fn all() -> &'static [Generator] {
        &[
            Generator::Permutation,
            Generator::Subset,
            Generator::Partition,
            Generator::PartitionParts,
            Generator::OrderedPartition,
            Generator::DyckWord,
            Generator::BinaryTree,
            Generator::YoungDiagram,
            Generator::Bernoulli,
            Generator::Binomial,
            Generator::Geometric,
            Generator::Poisson,
        ]
    }

    /// Get generator name as string.
    pub fn name(&self) -> &'static str {
        match self {
            Generator::Permutation => "permutation",
            Generator::Subset => "subset",
            Generator::Partition => "partition",
            Generator::PartitionParts => "partition-parts",
            Generator::OrderedPartition => "ordered-partition",
            Generator::DyckWord => "dyck",
            Generator::BinaryTree => "tree",
            Generator::YoungDiagram => "young",
            Generator::Bernoulli => "bernoulli",
            Generator::Binomial => "binomial",
            Generator::Geometric => "geometric",
            Generator::Poisson => "poisson",
        }
    }

    /// Parse generator from string.
    pub fn from_name(name: &str) -> Option<Generator> {
        match name.to_lowercase().replace('_', "-").as_str() {
            "permutation" | "perm" => Some(Generator::Permutation),
            "subset" | "combination" => Some(Generator::Subset),
            "partition" => Some(Generator::Partition),
            "partition-parts" | "parts" => Some(Generator::PartitionParts),
            "ordered-partition" | "composition" => Some(Generator::OrderedPartition),
            "dyck" | "dyck-word" => Some(Generator::DyckWord),
            "tree" | "binary-tree" => Some(Generator::BinaryTree),
            "young" | "young-diagram" | "tableau" => Some(Generator::YoungDiagram),
            "bernoulli" | "coin" => Some(Generator::Bernoulli),
            "binomial" => Some(Generator::Binomial),
            "geometric" => Some(Generator::Geometric),
            "poisson" => Some(Generator::Poisson),
            _ => None,
        }
    }

    /// Argument names; a trailing `?` marks an optional one.
    pub fn arguments(&self) -> &'static [&'static str] {
        match self {
            Generator::Subset => &["n", "k"],
            Generator::Partition => &["n", "max_part?"],
            Generator::PartitionParts => &["n", "k"],
            Generator::Bernoulli | Generator::Geometric => &["p_permille"],
            Generator::Binomial => &["n", "p_permille"],
            Generator::Poisson => &["lambda"],
            _ => &["n"],
        }
    }

    /// One-line description for listings.
    pub fn describe(&self) -> &'static str {
        match self {
            Generator::Permutation => "uniform permutation of 0..n (Fisher-Yates)",
            Generator::Subset => "uniform k-subset of 0..n (partial Fisher-Yates)",
            Generator::Partition => "uniform partition of n, parts <= max_part",
            Generator::PartitionParts => "uniform partition of n into exactly k parts",
            Generator::OrderedPartition => "uniform composition of n (ordered parts)",
            Generator::DyckWord => "uniform Dyck word with n pairs",
            Generator::BinaryTree => "uniform binary tree with n nodes",
            Generator::YoungDiagram => "Young diagram of a uniform partition of n",
            Generator::Bernoulli => "1 with probability p, else 0",
            Generator::Binomial => "successes in n trials with probability p",
            Generator::Geometric => "failures before the first success",
            Generator::Poisson => "Poisson count with mean lambda",
        }
    }

    /// Usage string such as `subset <n> <k>`.
    pub fn usage(&self) -> String {
        let mut usage = self.name().to_string();
        for arg in self.arguments() {
            match arg.strip_suffix('?') {
                Some(optional) => usage.push_str(&format!(" [{}]", optional)),
                None => usage.push_str(&format!(" <{}>", arg)),
            }
        }
        usage
    }

    /// Check the argument count against [`Generator::arguments`].
    pub fn check_args(&self, args: &[usize]) -> Result<()> {
        let names = self.arguments();
        let required = names.iter().filter(|a| !a.ends_with('?')).count();
        if args.len() < required || args.len() > names.len() {
            return Err(SampleError::InvalidArgument(format!(
                "expected `{}`, got {} argument(s)",
                self.usage(),
                args.len()
            )));
        }
        Ok(())
    }

    /// Draw one outcome.
    pub fn sample<S: UniformSource + ?Sized>(
        &self,
        args: &[usize],
        source: &mut S,
    ) -> Result<Sample> {
        self.check_args(args)?;
        let n = args[0];
        let sample = match self {
            Generator::Permutation => Sample::Permutation(shuffle::random_permutation(source, n)),
            Generator::Subset => {
                let mut subset = shuffle::random_subset(source, n, args[1])?;
                subset.sort_unstable();
                Sample::Subset(subset)
            }
            Generator::Partition => {
                Sample::Partition(partition::random_partition(source, n, args.get(1).copied())?)
            }
            Generator::PartitionParts => {
                Sample::Partition(partition::random_partition_with_parts(source, n, args[1])?)
            }
            Generator::OrderedPartition => {
                Sample::Composition(shuffle::random_ordered_partition(source, n))
            }
            Generator::DyckWord => Sample::Word(dyck::random_dyck_word(source, n)?),
            Generator::BinaryTree => Sample::Tree(tree::random_binary_tree(source, n)?),
            Generator::YoungDiagram => Sample::Diagram(partition::random_young_diagram(source, n)?),
            Generator::Bernoulli => {
                let p = per_mille(n)?;
                Sample::Count(variates::bernoulli(&mut SourceRng::new(source), p)? as u64)
            }
            Generator::Binomial => {
                let p = per_mille(args[1])?;
                Sample::Count(variates::binomial(&mut SourceRng::new(source), n as u64, p)?)
            }
            Generator::Geometric => {
                let p = per_mille(n)?;
                Sample::Count(variates::geometric(&mut SourceRng::new(source), p)?)
            }
            Generator::Poisson => {
                Sample::Count(variates::poisson(&mut SourceRng::new(source), n as f64)?)
            }
        };
        Ok(sample)
    }

    /// Exact number of distinct outcomes for these arguments.
    pub fn support_size(&self, args: &[usize]) -> Result<u128> {
        self.check_args(args)?;
        let n = args[0];
        match self {
            Generator::Permutation => (1..=n as u128)
                .try_fold(1u128, |acc, i| acc.checked_mul(i))
                .ok_or(SampleError::CountOverflow { what: "permutations", n }),
            Generator::Subset => {
                dyck::binomial(n, args[1]).ok_or(SampleError::CountOverflow { what: "subsets", n })
            }
            Generator::Partition => partition::count_partitions(n, args.get(1).copied()),
            Generator::PartitionParts => partition::count_partitions_with_parts(n, args[1]),
            Generator::OrderedPartition => match n {
                0 => Ok(1),
                _ => 1u128
                    .checked_shl((n - 1) as u32)
                    .filter(|_| n <= 128)
                    .ok_or(SampleError::CountOverflow { what: "compositions", n }),
            },
            Generator::DyckWord | Generator::BinaryTree => dyck::count_dyck_words(n),
            Generator::YoungDiagram => partition::count_partitions(n, None),
            Generator::Bernoulli => Ok(if degenerate(per_mille(n)?) { 1 } else { 2 }),
            Generator::Binomial => {
                Ok(if degenerate(per_mille(args[1])?) { 1 } else { n as u128 + 1 })
            }
            Generator::Geometric | Generator::Poisson => Err(SampleError::InvalidArgument(
                format!("{} has unbounded support", self.name()),
            )),
        }
    }
}

/// Thousandths to a probability, rejecting anything above 1000.
fn per_mille(value: usize) -> Result<f64> {
    if value > 1000 {
        return Err(SampleError::InvalidArgument(format!(
            "probability {} per mille exceeds 1000",
            value
        )));
    }
    Ok(value as f64 / 1000.0)
}

fn degenerate(p: f64) -> bool {
    p == 0.0 || p == 1.0
}

fn write_tuple(f: &mut std::fmt::Formatter<'_>, items: &[usize]) -> std::fmt::Result {
    write!(f, "(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, ")")
}

impl std::fmt::Display for Sample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sample::Permutation(items) | Sample::Subset(items) | Sample::Composition(items) => {
                write_tuple(f, items)
            }
            Sample::Partition(p) => write!(f, "{}", p),
            Sample::Word(w) => write!(f, "{}", w),
            Sample::Tree(t) => write!(f, "{}", t),
            Sample::Diagram(d) => write!(f, "{}", d),
            Sample::Count(c) => write!(f, "{}", c),
        }
    }
}
