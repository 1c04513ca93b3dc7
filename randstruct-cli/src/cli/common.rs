//! Common utilities shared across CLI commands.

use randstruct::{Generator, RandSource};
use rand::rngs::StdRng;

/// Output format for command results.
#[derive(Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// A generator plus the integer arguments it will be called with.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub generator: Generator,
    pub args: Vec<usize>,
}

impl Invocation {
    /// Parse `<kind> <n> [k]` from positional arguments.
    ///
    /// A trailing plural `s` is accepted (`partitions 6`).
    pub fn parse(positional: &[&str]) -> Result<Self, String> {
        let (name, rest) = positional
            .split_first()
            .ok_or_else(|| "Generator name required (see `randstruct kinds`)".to_string())?;

        let generator = Generator::from_name(name)
            .or_else(|| name.strip_suffix('s').and_then(Generator::from_name))
            .ok_or_else(|| format!("Unknown generator: {}", name))?;

        let args = rest
            .iter()
            .map(|a| a.parse::<usize>().map_err(|_| format!("Not a non-negative integer: {}", a)))
            .collect::<Result<Vec<_>, _>>()?;

        generator.check_args(&args).map_err(|e| e.to_string())?;

        Ok(Self { generator, args })
    }

    /// `partition 6 3` style label for reports.
    pub fn label(&self) -> String {
        let args: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
        format!("{} {}", self.generator.name(), args.join(" "))
    }
}

/// Seeded source when a seed is given, OS entropy otherwise.
pub fn make_source(seed: Option<u64>) -> RandSource<StdRng> {
    match seed {
        Some(seed) => RandSource::seeded(seed),
        None => RandSource::from_os(),
    }
}

/// Parse the value following a flag, reporting which flag was malformed.
pub fn flag_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("{} needs a value", flag))?;
    value
        .parse()
        .map_err(|_| format!("Invalid value for {}: {}", flag, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generator_and_args() {
        let inv = Invocation::parse(&["subset", "5", "2"]).unwrap();
        assert_eq!(inv.generator, Generator::Subset);
        assert_eq!(inv.args, vec![5, 2]);
        assert_eq!(inv.label(), "subset 5 2");
    }

    #[test]
    fn accepts_plural() {
        let inv = Invocation::parse(&["partitions", "6"]).unwrap();
        assert_eq!(inv.generator, Generator::Partition);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Invocation::parse(&[]).is_err());
        assert!(Invocation::parse(&["bogus", "1"]).is_err());
        assert!(Invocation::parse(&["dyck", "-3"]).is_err());
        assert!(Invocation::parse(&["subset", "5"]).is_err());
    }

    #[test]
    fn flag_values() {
        let v = "12".to_string();
        assert_eq!(flag_value::<usize>("-n", Some(&v)).unwrap(), 12);
        assert!(flag_value::<usize>("-n", None).is_err());
        let bad = "x".to_string();
        assert!(flag_value::<u64>("--seed", Some(&bad)).unwrap_err().contains("--seed"));
    }
}
