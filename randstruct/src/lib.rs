//! # randstruct
//!
//! Uniformly random combinatorial structures: permutations, subsets,
//! integer partitions, compositions, Dyck words and binary trees, plus the
//! primitive random variables they are built beside.
//!
//! The exact samplers count first and sample second: a memoized counter
//! says how many structures start each possible way, and the weighted
//! picker chooses a start with probability proportional to that count.
//!
//! ## Rust Lesson #7: Modules
//!
//! Rust modules are like ES6 modules but more explicit:
//! - `mod foo;` = load from `foo.rs` or `foo/mod.rs`
//! - `pub mod foo;` = also export it publicly
//! - `pub use foo::Bar;` = re-export Bar at this level
//!
//! Unlike Node.js, you must explicitly declare every module.

pub mod dyck;
pub mod error;
pub mod generator;
pub mod partition;
pub mod rng;
pub mod shuffle;
pub mod tree;
pub mod variates;
pub mod weighted;

// Re-export common types at crate root for convenience.
pub use dyck::{count_dyck_words, random_dyck_word, DyckCounter, DyckWord, Symbol};
pub use error::{Result, SampleError};
pub use generator::{Generator, Sample};
pub use partition::{
    count_partitions, count_partitions_with_parts, random_partition,
    random_partition_with_parts, random_young_diagram, Partition, PartitionCounter,
};
pub use rng::{RandSource, ReplaySource, SourceRng, UniformSource};
pub use shuffle::{random_ordered_partition, random_permutation, random_subset};
pub use tree::{random_binary_tree, BinaryTree};
pub use weighted::{sample_from_sequence, sample_index, CumulativeWeights};
