//! Dyck words: balanced open/close sequences of length `2n`.
//!
//! Counted by the Catalan numbers and sampled uniformly through the first
//! return decomposition: a non-empty word is `X inner Y trailing`, where the
//! `Y` matches the leading `X`. If the match closes after `k` pairs, `inner`
//! holds `k - 1` pairs and `trailing` holds `n - k`, giving
//! `c(k - 1) * c(n - k)` words for that split.

use std::str::FromStr;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::error::{Result, SampleError};
use crate::rng::UniformSource;
use crate::weighted::CumulativeWeights;

/// One letter of a Dyck word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Open,
    Close,
}

impl Symbol {
    pub fn as_char(self) -> char {
        match self {
            Symbol::Open => 'X',
            Symbol::Close => 'Y',
        }
    }

    /// Accepts `X`/`Y` as well as parentheses.
    pub fn from_char(c: char) -> Option<Symbol> {
        match c {
            'X' | 'x' | '(' => Some(Symbol::Open),
            'Y' | 'y' | ')' => Some(Symbol::Close),
            _ => None,
        }
    }
}

/// Check that `symbols` is balanced and never dips below zero.
pub fn validate(symbols: &[Symbol]) -> Result<()> {
    let mut balance = 0usize;
    for (position, symbol) in symbols.iter().enumerate() {
        match symbol {
            Symbol::Open => balance += 1,
            Symbol::Close => {
                balance = balance.checked_sub(1).ok_or(SampleError::MalformedDyckWord {
                    position,
                    reason: "close symbol with no open symbol to match",
                })?;
            }
        }
    }
    if balance != 0 {
        return Err(SampleError::MalformedDyckWord {
            position: symbols.len(),
            reason: "word ends with unmatched open symbols",
        });
    }
    Ok(())
}

/// A balanced word over `{Open, Close}`.
///
/// Only built through validating constructors or the sampler, so every
/// value satisfies the prefix condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DyckWord {
    symbols: Vec<Symbol>,
}

impl DyckWord {
    pub fn new(symbols: Vec<Symbol>) -> Result<Self> {
        validate(&symbols)?;
        Ok(Self { symbols })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_valid(symbols: Vec<Symbol>) -> Self {
        debug_assert!(validate(&symbols).is_ok());
        Self { symbols }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Total number of symbols (`2n`).
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Number of open/close pairs (`n`).
    pub fn semilength(&self) -> usize {
        self.symbols.len() / 2
    }
}

impl std::fmt::Display for DyckWord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for symbol in &self.symbols {
            write!(f, "{}", symbol.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for DyckWord {
    type Err = SampleError;

    fn from_str(s: &str) -> Result<Self> {
        let symbols = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .enumerate()
            .map(|(position, c)| {
                Symbol::from_char(c).ok_or(SampleError::MalformedDyckWord {
                    position,
                    reason: "unknown symbol",
                })
            })
            .collect::<Result<Vec<_>>>()?;
        DyckWord::new(symbols)
    }
}

/// Exact binomial coefficient, `None` when it overflows `u128`.
///
/// Each step multiplies by `(n - i) / (i + 1)`; dividing the common factor
/// out of the running product first keeps the intermediate value no larger
/// than the result.
pub fn binomial(n: usize, k: usize) -> Option<u128> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        let mut numerator = (n - i) as u128;
        let mut denominator = (i + 1) as u128;
        let g = gcd(result, denominator);
        result /= g;
        denominator /= g;
        numerator /= denominator;
        result = result.checked_mul(numerator)?;
    }
    Some(result)
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Memoized Catalan numbers, `table[n] = c(n)`.
#[derive(Debug)]
pub struct DyckCounter {
    table: Vec<u128>,
}

impl Default for DyckCounter {
    fn default() -> Self {
        Self { table: vec![1] }
    }
}

impl DyckCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cached(&self) -> usize {
        self.table.len()
    }

    /// Number of Dyck words of length `2n`.
    ///
    /// Extends the table with `c(m + 1) = c(m) * (4m + 2) / (m + 2)`. The
    /// common factor of `c(m)` and `m + 2` is divided out before multiplying,
    /// so no intermediate exceeds the next Catalan number and every value up
    /// to `c(69)` is exact.
    pub fn count(&mut self, n: usize) -> Result<u128> {
        let before = self.table.len();
        while self.table.len() <= n {
            let m = self.table.len() - 1;
            let last = self.table[m];
            let mut denominator = m as u128 + 2;
            let g = gcd(last, denominator);
            denominator /= g;
            let numerator = (4 * m as u128 + 2) / denominator;
            let next = (last / g)
                .checked_mul(numerator)
                .ok_or(SampleError::CountOverflow { what: "Dyck words", n })?;
            self.table.push(next);
        }
        if self.table.len() > before {
            debug!("dyck table: grew to c({}) ({} cells)", n, self.table.len());
        }
        Ok(self.table[n])
    }
}

static DYCK_WORDS: LazyLock<Mutex<DyckCounter>> =
    LazyLock::new(|| Mutex::new(DyckCounter::new()));

/// The process-wide Catalan cache.
pub fn shared_counter() -> MutexGuard<'static, DyckCounter> {
    DYCK_WORDS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// `c(n)` using the shared cache.
pub fn count_dyck_words(n: usize) -> Result<u128> {
    shared_counter().count(n)
}

/// Uniformly random Dyck word with `n` pairs.
pub fn random_dyck_word<S: UniformSource + ?Sized>(source: &mut S, n: usize) -> Result<DyckWord> {
    random_dyck_word_with(&mut shared_counter(), source, n)
}

/// [`random_dyck_word`] against an explicit counter.
pub fn random_dyck_word_with<S: UniformSource + ?Sized>(
    counter: &mut DyckCounter,
    source: &mut S,
    n: usize,
) -> Result<DyckWord> {
    // Fails fast when c(n) is out of range; every count below is smaller
    counter.count(n)?;
    let mut symbols = Vec::with_capacity(2 * n);
    push_random_word(counter, source, n, &mut symbols)?;
    Ok(DyckWord::from_valid(symbols))
}

fn push_random_word<S: UniformSource + ?Sized>(
    counter: &mut DyckCounter,
    source: &mut S,
    n: usize,
    out: &mut Vec<Symbol>,
) -> Result<()> {
    if n == 0 {
        return Ok(());
    }

    let counts = (1..=n)
        .map(|k| Ok(counter.count(k - 1)? as f64 * counter.count(n - k)? as f64))
        .collect::<Result<Vec<f64>>>()?;
    let k = CumulativeWeights::from_counts(&counts)?.sample(source) + 1;

    out.push(Symbol::Open);
    push_random_word(counter, source, k - 1, out)?;
    out.push(Symbol::Close);
    push_random_word(counter, source, n - k, out)
}
