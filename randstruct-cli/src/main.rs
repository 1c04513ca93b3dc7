//! randstruct - CLI for uniform random combinatorial structures
//!
//! Usage:
//!   randstruct kinds                         List available generators
//!   randstruct sample <kind> <args..>        Draw random structures
//!   randstruct count <kind> <args..>         Exact number of structures
//!   randstruct test <kind> <args..>          Empirical uniformity check
//!   randstruct benchmark <kind> <args..>     Time the sampler
//!   randstruct plan <plan.yaml>              Run a batch of checks

use std::env;

use randstruct::Generator;

mod cli;

use cli::{cmd_benchmark, cmd_count, cmd_plan, cmd_sample, cmd_test};

fn main() {
    let mut args: Vec<String> = env::args().collect();

    let verbose = args.iter().any(|a| a == "-v" || a == "--verbose");
    args.retain(|a| a != "-v" && a != "--verbose");

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "warn" }),
    )
    .init();

    let prog = args.first().cloned().unwrap_or_else(|| "randstruct".to_string());

    if args.len() < 2 {
        print_usage(&prog);
        std::process::exit(1);
    }

    let rest = &args[2..];
    match args[1].as_str() {
        "kinds" => cmd_kinds(),
        "sample" => cmd_sample(rest),
        "count" => cmd_count(rest),
        "test" => cmd_test(rest),
        "benchmark" => cmd_benchmark(rest),
        "plan" => cmd_plan(rest),
        "help" | "--help" | "-h" => print_usage(&prog),
        other => {
            eprintln!("Error: unknown command '{}'", other);
            eprintln!();
            print_usage(&prog);
            std::process::exit(1);
        }
    }
}

fn print_usage(prog: &str) {
    eprintln!("randstruct - uniform random combinatorial structures");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} kinds", prog);
    eprintln!("  {} sample <kind> <args..> [-n <count>] [--seed <n>] [--json]", prog);
    eprintln!("  {} count <kind> <args..>", prog);
    eprintln!(
        "  {} test <kind> <args..> [-N <trials>] [--seed <n>] [--json] [--frequencies]",
        prog
    );
    eprintln!("  {} benchmark <kind> <args..> [-N <trials>] [--seed <n>]", prog);
    eprintln!("  {} plan <plan.yaml> [--json] | --example", prog);
    eprintln!();
    eprintln!("Global options:");
    eprintln!("  -v, --verbose    Debug logging (RUST_LOG overrides)");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} sample partition 10 -n 5", prog);
    eprintln!("  {} sample tree 4 --seed 7", prog);
    eprintln!("  {} count partitions 100", prog);
    eprintln!("  {} test dyck 4 -N 100000", prog);
}

fn cmd_kinds() {
    println!("Available generators:");
    for generator in Generator::all() {
        println!("  {:<28} {}", generator.usage(), generator.describe());
    }
}
