//! Benchmark command implementation.

use std::time::Instant;

use super::common::{flag_value, make_source, Invocation};

/// Execute the benchmark command.
pub fn cmd_benchmark(args: &[String]) {
    let mut positional: Vec<&str> = Vec::new();
    let mut trials = 10_000usize;
    let mut seed: Option<u64> = None;

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

    let mut source = make_source(seed);

    // First call pays for filling the counter tables
    let start_warm = Instant::now();
    if let Err(e) = invocation.generator.sample(&invocation.args, &mut source) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    let warm_time = start_warm.elapsed();
    println!("Warm-up sample in {:?}", warm_time);

    println!("\nRunning '{}' {} times...", invocation.label(), trials);
    let start = Instant::now();

    for _ in 0..trials {
        if let Err(e) = invocation.generator.sample(&invocation.args, &mut source) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    let elapsed = start.elapsed();
    let per_sample_us = elapsed.as_secs_f64() * 1e6 / trials.max(1) as f64;

    println!();
    println!("═══════════════════════════════════════════════");
    println!("  BENCHMARK: {}", invocation.label().to_uppercase());
    println!("═══════════════════════════════════════════════");
    println!("  Samples: {}", trials);
    println!("  Time: {:?}", elapsed);
    println!("  Time (ms): {:.2}", elapsed.as_secs_f64() * 1000.0);
    println!("  Avg per sample: {:.3}µs", per_sample_us);
    println!("═══════════════════════════════════════════════");
}

fn print_usage() {
    eprintln!("Usage: randstruct benchmark <kind> <args..> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -N, --trials <n>    Number of samples to time (default: 10000)");
    eprintln!("  --seed <n>          Seed (default: OS entropy)");
    eprintln!();
    eprintln!("Benchmarks sampling performance.");
}
