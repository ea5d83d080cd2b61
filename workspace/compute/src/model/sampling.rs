//! Random draws used by the uncertainty simulation.

use rand::Rng;

/// Above this mean the Poisson draw switches to a normal approximation.
const POISSON_EXACT_LIMIT: f64 = 30.0;

/// A standard normal draw (Box-Muller).
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = 1.0 - rng.r#gen::<f64>();
    let u2: f64 = rng.r#gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// A draw from a zero-centred Laplace distribution with the given scale.
pub fn laplace<R: Rng + ?Sized>(rng: &mut R, scale: f64) -> f64 {
    let u: f64 = rng.r#gen::<f64>() - 0.5;
    let tail = (1.0 - 2.0 * u.abs()).max(f64::MIN_POSITIVE);
    -scale * u.signum() * tail.ln()
}

/// A Poisson draw with the given mean.
pub fn poisson<R: Rng + ?Sized>(rng: &mut R, mean: f64) -> usize {
    if mean <= 0.0 {
        return 0;
    }

    if mean < POISSON_EXACT_LIMIT {
        let limit = (-mean).exp();
        let mut count = 0usize;
        let mut product: f64 = rng.r#gen::<f64>();
        while product > limit {
            count += 1;
            product *= rng.r#gen::<f64>();
        }
        count
    } else {
        let draw = mean + mean.sqrt() * standard_normal(rng);
        draw.round().max(0.0) as usize
    }
}

/// Linearly interpolated percentile of ascending-sorted values, `q` in `[0, 1]`.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        len => {
            let position = q.clamp(0.0, 1.0) * (len - 1) as f64;
            let lower = position.floor() as usize;
            let upper = position.ceil() as usize;
            let fraction = position - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
        }
    }
}
