//! Count command: exact number of structures a generator can produce.

use super::common::Invocation;

/// Execute the count command.
pub fn cmd_count(args: &[String]) {
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return;
    }

    let positional: Vec<&str> = args.iter().map(String::as_str).collect();
    let invocation = Invocation::parse(&positional).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage();
        std::process::exit(1);
    });

    match invocation.generator.support_size(&invocation.args) {
        Ok(count) => println!("{}", count),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: randstruct count <kind> <args..>");
    eprintln!();
    eprintln!("Prints the exact number of distinct outcomes, e.g.");
    eprintln!("  randstruct count partitions 100        190569292");
    eprintln!("  randstruct count partitions 6 3        7");
    eprintln!("  randstruct count dyck 5                42");
    eprintln!("  randstruct count parts 7 3             4");
}
