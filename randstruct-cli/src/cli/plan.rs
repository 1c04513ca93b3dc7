//! Test plans: declarative batches of uniformity checks.
//!
//! Plans are YAML files listing generator invocations, each with a trial
//! count and a tolerance on the largest discrepancy. Running a plan prints
//! one line per check (or a JSON report) and fails the process when any
//! check does not pass.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::common::{make_source, Invocation, OutputFormat};
use super::harness::uniform_test;

const DEFAULT_TRIALS: usize = 10_000;
const DEFAULT_TOLERANCE: f64 = 0.01;

/// A complete plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Plan name/title
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Settings applied to every check unless overridden
    #[serde(default)]
    pub defaults: CheckSettings,

    /// Checks, run in order
    pub checks: Vec<Check>,
}

/// Per-check tunables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckSettings {
    /// Number of draws
    #[serde(default)]
    pub trials: Option<usize>,

    /// Largest allowed |p - 1/k|
    #[serde(default)]
    pub tolerance: Option<f64>,

    /// Seed; omitted means OS entropy
    #[serde(default)]
    pub seed: Option<u64>,
}

impl CheckSettings {
    /// Merge these settings with defaults, preferring self's values.
    pub fn merge_with(&self, defaults: &CheckSettings) -> CheckSettings {
        CheckSettings {
            trials: self.trials.or(defaults.trials),
            tolerance: self.tolerance.or(defaults.tolerance),
            seed: self.seed.or(defaults.seed),
        }
    }

    pub fn trials_or_default(&self) -> usize {
        self.trials.unwrap_or(DEFAULT_TRIALS)
    }

    pub fn tolerance_or_default(&self) -> f64 {
        self.tolerance.unwrap_or(DEFAULT_TOLERANCE)
    }
}

/// A single check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Check {
    /// Check name (for identification)
    pub name: String,

    /// Generator name (e.g., "partition", "dyck", "tree")
    pub generator: String,

    /// Integer arguments passed to the generator
    #[serde(default)]
    pub args: Vec<usize>,

    /// Overrides for this check
    #[serde(flatten)]
    pub settings: CheckSettings,

    /// Whether this check runs
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Outcome of one check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub invocation: String,
    /// "pass", "fail" or "error"
    pub status: String,
    pub trials: usize,
    pub tolerance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_discrepancy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distinct_outcomes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_support: Option<u128>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a whole plan.
#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub name: String,
    pub generated_at: String,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub results: Vec<CheckResult>,
}

impl Plan {
    /// Load a plan from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read plan file: {}", e))?;

        Self::from_yaml(&content)
    }

    /// Parse a plan from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| format!("Failed to parse plan YAML: {}", e))
    }

    /// Run every enabled check.
    pub fn run(&self) -> PlanReport {
        let mut results = Vec::new();
        let mut skipped = 0;

        for check in &self.checks {
            if !check.enabled {
                skipped += 1;
                continue;
            }
            results.push(self.run_check(check));
        }

        let passed = results.iter().filter(|r| r.status == "pass").count();
        PlanReport {
            name: self.name.clone(),
            generated_at: chrono::Local::now().to_rfc3339(),
            passed,
            failed: results.len() - passed,
            skipped,
            results,
        }
    }

    fn run_check(&self, check: &Check) -> CheckResult {
        let settings = check.settings.merge_with(&self.defaults);
        let trials = settings.trials_or_default();
        let tolerance = settings.tolerance_or_default();

        let mut result = CheckResult {
            name: check.name.clone(),
            invocation: check.generator.clone(),
            status: "error".to_string(),
            trials,
            tolerance,
            max_discrepancy: None,
            distinct_outcomes: None,
            expected_support: None,
            error: None,
        };

        let mut positional = vec![check.generator.clone()];
        positional.extend(check.args.iter().map(|a| a.to_string()));
        let positional: Vec<&str> = positional.iter().map(String::as_str).collect();

        let invocation = match Invocation::parse(&positional) {
            Ok(inv) => inv,
            Err(e) => {
                result.error = Some(e);
                return result;
            }
        };
        result.invocation = invocation.label();

        if trials == 0 {
            result.error = Some("trials must be positive".to_string());
            return result;
        }

        log::debug!("plan check '{}': {} x{}", check.name, invocation.label(), trials);
        let mut source = make_source(settings.seed);
        match uniform_test(&invocation, trials, &mut source, true) {
            Ok(report) => {
                let ok = report.max_discrepancy <= tolerance && report.support_covered();
                result.status = if ok { "pass" } else { "fail" }.to_string();
                result.max_discrepancy = Some(report.max_discrepancy);
                result.distinct_outcomes = Some(report.distinct_outcomes);
                result.expected_support = report.expected_support;
            }
            Err(e) => result.error = Some(e.to_string()),
        }
        result
    }
}

/// Execute the plan command.
pub fn cmd_plan(args: &[String]) {
    let mut plan_path: Option<String> = None;
    let mut format = OutputFormat::Text;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => format = OutputFormat::Json,
            "--example" => {
                print_example();
                return;
            }
            "-h" | "--help" => {
                print_usage();
                return;
            }
            path if !path.starts_with('-') => {
                plan_path = Some(path.to_string());
            }
            other => {
                eprintln!("Unknown option: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let plan_path = match plan_path {
        Some(p) => p,
        None => {
            eprintln!("Error: plan file required");
            print_usage();
            std::process::exit(1);
        }
    };

    let plan = match Plan::load(&plan_path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    eprintln!("Plan: {}", plan.name);
    if let Some(description) = &plan.description {
        eprintln!("{}", description);
    }
    eprintln!("Checks: {}", plan.checks.len());

    let report = plan.run();

    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: failed to serialize report: {}", e);
                std::process::exit(1);
            }
        },
        OutputFormat::Text => {
            for r in &report.results {
                let detail = match (&r.error, r.max_discrepancy) {
                    (Some(e), _) => e.clone(),
                    (None, Some(d)) => format!(
                        "max discrepancy {:.4} (tolerance {:.4}), {} outcomes",
                        d,
                        r.tolerance,
                        r.distinct_outcomes.unwrap_or(0)
                    ),
                    (None, None) => String::new(),
                };
                println!(
                    "[{}] {:<24} {:<24} {}",
                    r.status.to_uppercase(),
                    r.name,
                    r.invocation,
                    detail
                );
            }
            println!();
            println!(
                "Passed: {}  Failed: {}  Skipped: {}",
                report.passed, report.failed, report.skipped
            );
        }
    }

    if report.failed > 0 {
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!("randstruct plan - Run a YAML plan of uniformity checks");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    randstruct plan <plan.yaml> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    --json                 Output the report as JSON");
    eprintln!("    --example              Print an example plan YAML");
    eprintln!("    -h, --help             Show this help");
    eprintln!();
    eprintln!("EXAMPLE:");
    eprintln!("    randstruct plan --example > checks.yaml");
    eprintln!("    randstruct plan checks.yaml");
}

pub const EXAMPLE_PLAN: &str = r##"# Example randstruct plan
name: "Small structures"
description: "Uniformity of the exact samplers on small sizes"

defaults:
  trials: 20000
  tolerance: 0.01
  seed: 42          # omit for OS entropy

checks:
  - name: partitions of 6
    generator: partition
    args: [6]

  - name: capped partitions
    generator: partition
    args: [8, 3]

  - name: dyck words of 4
    generator: dyck
    args: [4]

  - name: trees with 3 nodes
    generator: tree
    args: [3]
    tolerance: 0.02

  - name: permutations of 4
    generator: permutation
    args: [4]

  - name: 2-subsets of 5
    generator: subset
    args: [5, 2]

  - name: compositions of 4
    generator: composition
    args: [4]
    enabled: true
"##;

fn print_example() {
    print!("{}", EXAMPLE_PLAN);
}
