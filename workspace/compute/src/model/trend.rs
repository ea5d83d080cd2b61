//! Piecewise-linear trend with changepoints.

/// Positive part of `t - changepoint`, the regressor of a changepoint's slope change.
pub fn hinge(t: f64, changepoint: f64) -> f64 {
    if t > changepoint { t - changepoint } else { 0.0 }
}

/// Places up to `n_changepoints` changepoints on row positions spread evenly
/// over the first `range` share of the history.
///
/// `t` holds the scaled history times in ascending order. The first row is
/// never a changepoint.
pub fn place_changepoints(t: &[f64], n_changepoints: usize, range: f64) -> Vec<f64> {
    let hist_size = (t.len() as f64 * range).floor() as usize;
    let count = n_changepoints.min(hist_size.saturating_sub(1));
    if count == 0 {
        return Vec::new();
    }

    let last = (hist_size - 1) as f64;
    (1..=count)
        .map(|i| {
            let index = (last * i as f64 / count as f64).round() as usize;
            t[index]
        })
        .collect()
}

/// `trend(t) = m + k t + sum_j delta_j (t - s_j)+` in scaled units.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseLinear {
    /// Offset at `t = 0`
    pub m: f64,
    /// Initial growth rate
    pub k: f64,
    /// Changepoint locations in scaled time
    pub changepoints: Vec<f64>,
    /// Rate change at each changepoint
    pub deltas: Vec<f64>,
}

impl PiecewiseLinear {
    pub fn value(&self, t: f64) -> f64 {
        self.changepoints
            .iter()
            .zip(&self.deltas)
            .fold(self.m + self.k * t, |acc, (c, d)| acc + d * hinge(t, *c))
    }

    /// Growth rate in effect after the last changepoint.
    pub fn final_rate(&self) -> f64 {
        self.k + self.deltas.iter().sum::<f64>()
    }

    /// Mean absolute rate change, the scale of simulated future changes.
    pub fn mean_abs_delta(&self) -> f64 {
        if self.deltas.is_empty() {
            0.0
        } else {
            self.deltas.iter().map(|d| d.abs()).sum::<f64>() / self.deltas.len() as f64
        }
    }
}
