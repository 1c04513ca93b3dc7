//! CLI command implementations.
//!
//! This module contains the implementations for the various CLI subcommands:
//! - `sample` - Draw random structures
//! - `count` - Exact number of distinct structures
//! - `test` - Empirical uniformity check with a frequency table
//! - `benchmark` - Time sampling performance
//! - `plan` - Run a YAML batch of uniformity checks

pub mod common;
pub mod sample;
pub mod count;
pub mod harness;
pub mod benchmark;
pub mod plan;

pub use sample::cmd_sample;
pub use count::cmd_count;
pub use harness::cmd_test;
pub use benchmark::cmd_benchmark;
pub use plan::cmd_plan;
