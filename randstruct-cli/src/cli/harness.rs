//! Uniformity harness: run a generator many times and compare the observed
//! frequencies with the uniform distribution over its outcomes.
//!
//! This is a smoke test, not an oracle. Discrepancies are measured against
//! `1 / k` where `k` is the number of distinct outcomes actually observed,
//! which is only the true probability when the generator is uniform over a
//! fixed finite support. When the catalogue knows the exact support size it
//! is reported too, so a generator that never reaches some outcomes shows up.

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::Serialize;

use randstruct::{Generator, SampleError, UniformSource};

use super::common::{flag_value, make_source, Invocation, OutputFormat};

/// One distinct outcome and how often it was seen.
#[derive(Debug, Serialize, Clone)]
pub struct OutcomeRow {
    /// Display form of the outcome (may span several lines)
    pub outcome: String,
    pub count: usize,
    /// `count / trials`
    pub probability: f64,
    /// `|probability - 1/k|`, absent in plain frequency reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discrepancy: Option<f64>,
}

/// Result of a frequency or uniformity run.
#[derive(Debug, Serialize)]
pub struct UniformityReport {
    pub generator: String,
    pub args: Vec<usize>,
    pub trials: usize,
    pub distinct_outcomes: usize,
    /// Exact number of possible outcomes, when it fits in a u128
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_support: Option<u128>,
    /// `1 / distinct_outcomes`
    pub theoretical_probability: f64,
    pub total_probability: f64,
    pub max_discrepancy: f64,
    /// Pearson statistic against the uniform distribution over the support
    pub chi_squared: f64,
    pub generated_at: String,
    pub rows: Vec<OutcomeRow>,
}

impl UniformityReport {
    /// Every possible outcome appeared at least once (unknown support counts as yes).
    pub fn support_covered(&self) -> bool {
        self.expected_support
            .is_none_or(|k| k == self.distinct_outcomes as u128)
    }
}

/// Count outcomes of `trials` calls to `draw`, keyed by equality.
pub fn frequency_table<K: Ord, E>(
    trials: usize,
    mut draw: impl FnMut() -> Result<K, E>,
) -> Result<BTreeMap<K, usize>, E> {
    let mut counts = BTreeMap::new();
    for _ in 0..trials {
        *counts.entry(draw()?).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Build the report rows and summary from a frequency table.
pub fn summarize<K: Display>(
    counts: &BTreeMap<K, usize>,
    trials: usize,
    expected_support: Option<u128>,
    with_discrepancy: bool,
) -> (Vec<OutcomeRow>, f64, f64, f64) {
    let distinct = counts.len().max(1);
    let theoretical = 1.0 / distinct as f64;

    let mut total_probability = 0.0;
    let mut max_discrepancy: f64 = 0.0;
    let rows: Vec<OutcomeRow> = counts
        .iter()
        .map(|(outcome, &count)| {
            let probability = count as f64 / trials as f64;
            total_probability += probability;
            let discrepancy = (probability - theoretical).abs();
            max_discrepancy = max_discrepancy.max(discrepancy);
            OutcomeRow {
                outcome: outcome.to_string(),
                count,
                probability,
                discrepancy: with_discrepancy.then_some(discrepancy),
            }
        })
        .collect();

    // Unobserved outcomes each contribute their full expected count
    let support = expected_support.map_or(distinct as f64, |k| k as f64);
    let expected = trials as f64 / support;
    let observed_term: f64 = counts
        .values()
        .map(|&c| (c as f64 - expected).powi(2) / expected)
        .sum();
    let unobserved = (support - counts.len() as f64).max(0.0);
    let chi_squared = observed_term + unobserved * expected;

    (rows, total_probability, max_discrepancy, chi_squared)
}

/// Run `generator` `trials` times and summarize against the uniform distribution.
pub fn uniform_test<S: UniformSource + ?Sized>(
    invocation: &Invocation,
    trials: usize,
    source: &mut S,
    with_discrepancy: bool,
) -> Result<UniformityReport, SampleError> {
    let Invocation { generator, args } = invocation;
    let counts = frequency_table(trials, || generator.sample(args, &mut *source))?;
    let expected_support = generator.support_size(args).ok();
    let (rows, total_probability, max_discrepancy, chi_squared) =
        summarize(&counts, trials, expected_support, with_discrepancy);

    Ok(UniformityReport {
        generator: generator.name().to_string(),
        args: args.clone(),
        trials,
        distinct_outcomes: counts.len(),
        expected_support,
        theoretical_probability: 1.0 / counts.len().max(1) as f64,
        total_probability,
        max_discrepancy,
        chi_squared,
        generated_at: chrono::Local::now().to_rfc3339(),
        rows,
    })
}

/// Fixed-width text table, one block per outcome.
///
/// Multi-line outcomes (trees, Young diagrams) continue in the first column.
pub fn render_table(report: &UniformityReport) -> String {
    let with_discrepancy = report.rows.iter().any(|r| r.discrepancy.is_some());
    let separator = "-".repeat(60);
    let mut out = String::new();

    if with_discrepancy {
        out.push_str(&format!(
            "{:<30} | {:<12} | {:<10}\n",
            "Random Object", "Probability", "Discrepancy"
        ));
    } else {
        out.push_str(&format!("{:<30} | {:<12}\n", "Random Object", "Probability"));
    }
    out.push_str(&separator);
    out.push('\n');

    for row in &report.rows {
        let mut lines = row.outcome.lines();
        let first = lines.next().unwrap_or("");
        match row.discrepancy {
            Some(d) => out.push_str(&format!(
                "{:<30} | {:<12.4} | {:<10.4}\n",
                first, row.probability, d
            )),
            None => out.push_str(&format!("{:<30} | {:<12.4}\n", first, row.probability)),
        }
        for line in lines {
            out.push_str(&format!("{:<30} | {:<12}\n", line, ""));
        }
        out.push_str(&separator);
        out.push('\n');
    }

    out.push_str(&format!("Total Probability: {:.4}\n", report.total_probability));
    out
}

/// Execute the test command.
pub fn cmd_test(args: &[String]) {
    let mut positional: Vec<&str> = Vec::new();
    let mut trials = 10_000usize;
    let mut seed: Option<u64> = None;
    let mut format = OutputFormat::Text;
    let mut with_discrepancy = true;

    let mut i = 0;
    while i < args.len() {
        let parsed = match args[i].as_str() {
            "-N" | "--trials" => {
                i += 1;
                flag_value("--trials", args.get(i)).map(|v| trials = v)
            }
            "--seed" => {
                i += 1;
                flag_value("--seed", args.get(i)).map(|v| seed = Some(v))
            }
            "--json" => {
                format = OutputFormat::Json;
                Ok(())
            }
            "--frequencies" => {
                with_discrepancy = false;
                Ok(())
            }
            "-h" | "--help" => {
                print_usage();
                return;
            }
            other => {
                positional.push(other);
                Ok(())
            }
        };
        if let Err(e) = parsed {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        i += 1;
    }

    let invocation = Invocation::parse(&positional).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage();
        std::process::exit(1);
    });

    if trials == 0 {
        eprintln!("Error: --trials must be positive");
        std::process::exit(1);
    }

    log::info!("testing {} over {} trials", invocation.label(), trials);
    let mut source = make_source(seed);
    let report = uniform_test(&invocation, trials, &mut source, with_discrepancy)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: failed to serialize report: {}", e);
                std::process::exit(1);
            }
        },
        OutputFormat::Text => {
            print!("{}", render_table(&report));
            if with_discrepancy {
                println!("Theoretical Probability: {:.4}", report.theoretical_probability);
                println!("Max Discrepancy: {:.4}", report.max_discrepancy);
            }
            match report.expected_support {
                Some(k) => println!(
                    "Outcomes: {} observed / {} possible",
                    report.distinct_outcomes, k
                ),
                None => println!("Outcomes: {} observed", report.distinct_outcomes),
            }
            println!("Chi-squared: {:.2}", report.chi_squared);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: randstruct test <kind> <args..> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -N, --trials <n>    Number of draws (default: 10000)");
    eprintln!("  --seed <n>          Seed for reproducible runs (default: OS entropy)");
    eprintln!("  --frequencies       Plain frequency table, no uniformity columns");
    eprintln!("  --json              Output the report as JSON");
    eprintln!();
    eprintln!("Kinds:");
    for generator in Generator::all() {
        eprintln!("  {}", generator.usage());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use randstruct::RandSource;

    fn report_for(kind: &[&str], trials: usize, seed: u64) -> UniformityReport {
        let invocation = Invocation::parse(kind).unwrap();
        let mut source = RandSource::seeded(seed);
        uniform_test(&invocation, trials, &mut source, true).unwrap()
    }

    #[test]
    fn frequency_table_counts_everything() {
        let mut next = 0;
        let counts = frequency_table::<_, ()>(9, || {
            next += 1;
            Ok(next % 3)
        })
        .unwrap();
        assert_eq!(counts.len(), 3);
        assert!(counts.values().all(|&c| c == 3));
    }

    #[test]
    fn frequency_table_propagates_errors() {
        let result = frequency_table::<usize, &str>(5, || Err("boom"));
        assert_eq!(result.unwrap_err(), "boom");
    }

    #[test]
    fn partitions_pass_uniformity() {
        let report = report_for(&["partition", "6"], 20_000, 6);
        assert_eq!(report.distinct_outcomes, 11);
        assert_eq!(report.expected_support, Some(11));
        assert!(report.support_covered());
        assert!(report.max_discrepancy < 0.01, "{}", report.max_discrepancy);
        assert!((report.total_probability - 1.0).abs() < 1e-9);
        // 10 degrees of freedom; 40 is far in the tail
        assert!(report.chi_squared < 40.0, "{}", report.chi_squared);
    }

    #[test]
    fn summarize_counts_unobserved_outcomes() {
        let mut counts = BTreeMap::new();
        counts.insert("a", 50usize);
        counts.insert("b", 50usize);
        let (rows, total, max_disc, chi) = summarize(&counts, 100, Some(4), true);
        assert_eq!(rows.len(), 2);
        assert!((total - 1.0).abs() < 1e-12);
        assert_eq!(max_disc, 0.0);
        // expected 25 each: 2 * 25^2/25 + 2 * 25
        assert!((chi - 100.0).abs() < 1e-9);
    }

    #[test]
    fn table_layout() {
        let report = report_for(&["tree", "2"], 1_000, 3);
        let table = render_table(&report);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with("Random Object"));
        assert!(lines[0].contains("| Discrepancy"));
        assert_eq!(lines[1], "-".repeat(60));
        assert!(table.contains("Root: 'X'"));
        assert!(lines.last().unwrap().starts_with("Total Probability: 1.0000"));
    }

    #[test]
    fn frequency_only_table_has_two_columns() {
        let invocation = Invocation::parse(&["composition", "3"]).unwrap();
        let mut source = RandSource::seeded(1);
        let report = uniform_test(&invocation, 500, &mut source, false).unwrap();
        let table = render_table(&report);
        assert!(!table.contains("Discrepancy"));
        assert!(report.rows.iter().all(|r| r.discrepancy.is_none()));
    }

    #[test]
    fn report_serializes() {
        let report = report_for(&["dyck", "3"], 2_000, 9);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"generator\":\"dyck\""));
        assert!(json.contains("\"expected_support\":5"));
        assert!(json.contains("\"generated_at\""));
    }
}
