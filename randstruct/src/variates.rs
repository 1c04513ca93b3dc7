//! Primitive random variables.
//!
//! Thin wrappers over `rand_distr`: each function validates its parameters
//! into a [`SampleError`] and draws one value from the matching
//! distribution. Any `rand::Rng` works as the generator, including
//! [`RandSource`](crate::rng::RandSource) and, through
//! [`SourceRng`](crate::rng::SourceRng), any other
//! [`UniformSource`](crate::rng::UniformSource).

use rand::Rng;
use rand::distr::{Bernoulli, Distribution, Uniform};
use rand_distr::{Binomial, ChiSquared, Exp, Geometric, Normal, Poisson, UnitCircle, UnitDisc};

use crate::error::{Result, SampleError};

fn check_probability(p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(SampleError::InvalidArgument(format!("probability {} outside [0, 1]", p)))
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SampleError::InvalidArgument(format!("{} must be positive, got {}", name, value)))
    }
}

fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SampleError::InvalidArgument(format!(
            "{} must be non-negative, got {}",
            name, value
        )))
    }
}

fn rejected(what: &str, err: impl std::fmt::Display) -> SampleError {
    SampleError::InvalidArgument(format!("{}: {}", what, err))
}

/// Uniform in `[a, b)`; needs `a < b`.
pub fn uniform_between<R: Rng + ?Sized>(rng: &mut R, a: f64, b: f64) -> Result<f64> {
    let dist = Uniform::new(a, b).map_err(|e| rejected("uniform", e))?;
    Ok(dist.sample(rng))
}

/// Normal with mean `mu` and standard deviation `sigma`.
pub fn normal<R: Rng + ?Sized>(rng: &mut R, mu: f64, sigma: f64) -> Result<f64> {
    check_non_negative("sigma", sigma)?;
    let dist = Normal::new(mu, sigma).map_err(|e| rejected("normal", e))?;
    Ok(dist.sample(rng))
}

/// Exponential with rate `lambda`.
pub fn exponential<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> Result<f64> {
    check_positive("lambda", lambda)?;
    let dist = Exp::new(lambda).map_err(|e| rejected("exponential", e))?;
    Ok(dist.sample(rng))
}

/// Poisson with mean `lambda`.
///
/// Same law as counting the arrivals of a rate-`lambda` process strictly
/// before time 1.
pub fn poisson<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> Result<u64> {
    check_positive("lambda", lambda)?;
    let dist = Poisson::new(lambda).map_err(|e| rejected("poisson", e))?;
    let count: f64 = dist.sample(rng);
    Ok(count as u64)
}

/// `true` with probability `p`.
pub fn bernoulli<R: Rng + ?Sized>(rng: &mut R, p: f64) -> Result<bool> {
    check_probability(p)?;
    let dist = Bernoulli::new(p).map_err(|e| rejected("bernoulli", e))?;
    Ok(dist.sample(rng))
}

/// Successes in `n` independent Bernoulli(`p`) trials.
pub fn binomial<R: Rng + ?Sized>(rng: &mut R, n: u64, p: f64) -> Result<u64> {
    check_probability(p)?;
    let dist = Binomial::new(n, p).map_err(|e| rejected("binomial", e))?;
    Ok(dist.sample(rng))
}

/// Failures before the first success, success probability `p > 0`.
pub fn geometric<R: Rng + ?Sized>(rng: &mut R, p: f64) -> Result<u64> {
    check_probability(p)?;
    if p == 0.0 {
        return Err(SampleError::InvalidArgument("geometric needs p > 0".into()));
    }
    let dist = Geometric::new(p).map_err(|e| rejected("geometric", e))?;
    Ok(dist.sample(rng))
}

/// Chi-squared with `k` degrees of freedom; `k = 0` is the constant 0.
pub fn chi_squared<R: Rng + ?Sized>(rng: &mut R, k: u32) -> Result<f64> {
    if k == 0 {
        return Ok(0.0);
    }
    let dist = ChiSquared::new(k as f64).map_err(|e| rejected("chi-squared", e))?;
    Ok(dist.sample(rng))
}

/// Uniform point inside the disk of radius `r` centred at the origin.
pub fn uniform_disk<R: Rng + ?Sized>(rng: &mut R, r: f64) -> Result<[f64; 2]> {
    check_non_negative("radius", r)?;
    let [x, y]: [f64; 2] = UnitDisc.sample(rng);
    Ok([r * x, r * y])
}

/// Uniform point on the circle of radius `r` centred at the origin.
pub fn uniform_circle<R: Rng + ?Sized>(rng: &mut R, r: f64) -> Result<[f64; 2]> {
    check_non_negative("radius", r)?;
    let [x, y]: [f64; 2] = UnitCircle.sample(rng);
    Ok([r * x, r * y])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RandSource, ReplaySource, SourceRng};

    const TRIALS: usize = 20_000;

    fn mean(values: impl Iterator<Item = f64>) -> f64 {
        let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
        sum / count as f64
    }

    #[test]
    fn uniform_between_bounds() {
        let mut rng = RandSource::seeded(1);
        for _ in 0..1000 {
            let v = uniform_between(&mut rng, 10.0, 20.0).unwrap();
            assert!((10.0..20.0).contains(&v));
        }
        assert!(uniform_between(&mut rng, 3.0, 3.0).is_err());
    }

    #[test]
    fn normal_moments() {
        let mut rng = RandSource::seeded(2);
        let values: Vec<f64> = (0..TRIALS).map(|_| normal(&mut rng, 3.0, 2.0).unwrap()).collect();
        let m = mean(values.iter().copied());
        let var = mean(values.iter().map(|v| (v - m).powi(2)));
        assert!((m - 3.0).abs() < 0.1, "mean {}", m);
        assert!((var - 4.0).abs() < 0.3, "variance {}", var);
        assert!(normal(&mut rng, 0.0, -1.0).is_err());
    }

    #[test]
    fn exponential_mean() {
        let mut rng = RandSource::seeded(3);
        let m = mean((0..TRIALS).map(|_| exponential(&mut rng, 2.0).unwrap()));
        assert!((m - 0.5).abs() < 0.03, "mean {}", m);
        assert!(exponential(&mut rng, 0.0).is_err());
    }

    #[test]
    fn poisson_mean() {
        let mut rng = RandSource::seeded(4);
        let m = mean((0..TRIALS).map(|_| poisson(&mut rng, 3.0).unwrap() as f64));
        assert!((m - 3.0).abs() < 0.1, "mean {}", m);
        assert!(poisson(&mut rng, -1.0).is_err());
    }

    #[test]
    fn bernoulli_and_binomial() {
        let mut rng = RandSource::seeded(5);
        let m = mean((0..TRIALS).map(|_| bernoulli(&mut rng, 0.3).unwrap() as u8 as f64));
        assert!((m - 0.3).abs() < 0.02, "mean {}", m);

        let m = mean((0..TRIALS).map(|_| binomial(&mut rng, 10, 0.5).unwrap() as f64));
        assert!((m - 5.0).abs() < 0.1, "mean {}", m);

        assert!(bernoulli(&mut rng, 1.5).is_err());
        assert_eq!(binomial(&mut rng, 10, 1.0).unwrap(), 10);
        assert_eq!(binomial(&mut rng, 10, 0.0).unwrap(), 0);
    }

    #[test]
    fn bernoulli_is_draw_below_p() {
        let mut source = ReplaySource::new(vec![0.29, 0.31]);
        let mut rng = SourceRng::new(&mut source);
        assert!(bernoulli(&mut rng, 0.3).unwrap());
        assert!(!bernoulli(&mut rng, 0.3).unwrap());
    }

    #[test]
    fn geometric_mean() {
        let mut rng = RandSource::seeded(6);
        // Failures before success: (1 - p) / p
        let m = mean((0..TRIALS).map(|_| geometric(&mut rng, 0.25).unwrap() as f64));
        assert!((m - 3.0).abs() < 0.15, "mean {}", m);
        assert_eq!(geometric(&mut rng, 1.0).unwrap(), 0);
        assert!(geometric(&mut rng, 0.0).is_err());
    }

    #[test]
    fn chi_squared_mean() {
        let mut rng = RandSource::seeded(7);
        let m = mean((0..TRIALS).map(|_| chi_squared(&mut rng, 4).unwrap()));
        assert!((m - 4.0).abs() < 0.15, "mean {}", m);
        assert_eq!(chi_squared(&mut rng, 0).unwrap(), 0.0);
    }

    #[test]
    fn disk_and_circle() {
        let mut rng = RandSource::seeded(8);
        for _ in 0..1000 {
            let [x, y] = uniform_disk(&mut rng, 2.0).unwrap();
            assert!(x.hypot(y) <= 2.0 + 1e-12);
            let [x, y] = uniform_circle(&mut rng, 2.0).unwrap();
            assert!((x.hypot(y) - 2.0).abs() < 1e-9);
        }
        assert!(uniform_disk(&mut rng, -1.0).is_err());
    }
}
