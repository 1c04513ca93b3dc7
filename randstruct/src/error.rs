//! Error type shared by every sampler and counter.
//!
//! ## Rust Lesson #20: Error Handling
//!
//! Rust uses `Result<T, E>` instead of exceptions:
//! - `Ok(value)` = success
//! - `Err(error)` = failure
//!
//! One enum covers the whole library so callers can `?` through a sampler
//! that calls a counter that calls the weighted picker without converting
//! between error types.

/// Everything that can go wrong while counting or sampling.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleError {
    /// Weights are not a probability vector: the entry at `negative_at` is
    /// negative or not finite, or the total is not 1 within tolerance.
    InvalidDistribution { sum: f64, negative_at: Option<usize> },
    /// `items` and `weights` disagree on length.
    LengthMismatch { items: usize, weights: usize },
    /// Input is not a balanced open/close word.
    MalformedDyckWord { position: usize, reason: &'static str },
    /// An exact count no longer fits in a `u128`.
    CountOverflow { what: &'static str, n: usize },
    /// Parameters that describe an empty or impossible structure.
    InvalidArgument(String),
}

impl std::fmt::Display for SampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleError::InvalidDistribution { negative_at: Some(index), .. } => {
                write!(f, "Weight at index {} is not a non-negative number", index)
            }
            SampleError::InvalidDistribution { sum, negative_at: None } => {
                write!(f, "Probabilities must sum to 1 (got {})", sum)
            }
            SampleError::LengthMismatch { items, weights } => {
                write!(f, "{} items but {} weights", items, weights)
            }
            SampleError::MalformedDyckWord { position, reason } => {
                write!(f, "Malformed Dyck word at position {}: {}", position, reason)
            }
            SampleError::CountOverflow { what, n } => {
                write!(f, "Number of {} for n = {} overflows u128", what, n)
            }
            SampleError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

// Makes our error type work with the standard error trait
impl std::error::Error for SampleError {}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, SampleError>;
