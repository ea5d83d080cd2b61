//! Additive time-series model: piecewise-linear trend plus Fourier seasonalities.
//!
//! `y(t) = trend(t) + weekly(t) + yearly(t) + noise`
//!
//! The model is fitted as a maximum a posteriori estimate under Gaussian
//! priors, which reduces to ridge-penalised least squares on the design
//! matrix `[1, t, (t - s_j)+ ..., fourier features ...]`. Prediction
//! intervals come from simulating future trend changes and observation noise.

pub mod sampling;
pub mod seasonality;
pub mod trend;

use chrono::{Duration, NaiveDate};
use common::ForecastPoint;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument, trace};

use crate::error::{ComputeError, Result};
use crate::forecast::ForecastTable;
use crate::linalg;
use crate::training::TrainingSet;

use self::sampling::{laplace, percentile, poisson, standard_normal};
use self::seasonality::{
    FittedSeasonality, Seasonality, SeasonalityKind, detect_seasonalities, epoch_day,
};
use self::trend::{PiecewiseLinear, hinge, place_changepoints};

/// Prior standard deviation of the trend offset and initial rate.
const TREND_PRIOR_SCALE: f64 = 5.0;
/// Lower bound on the noise variance, in scaled units.
const SIGMA2_FLOOR: f64 = 1e-6;
/// Rounds of alternating between coefficient and noise estimates.
const SIGMA_ITERATIONS: usize = 3;
/// Added to the simulated changepoint scale so it is never zero.
const DELTA_SCALE_EPSILON: f64 = 1e-8;

/// Settings of the additive model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Maximum number of potential trend changepoints
    pub n_changepoints: usize,
    /// Share of the history in which changepoints are placed
    pub changepoint_range: f64,
    /// Prior scale of the trend rate changes; larger values make the trend more flexible
    pub changepoint_prior_scale: f64,
    /// Prior scale of the Fourier coefficients
    pub seasonality_prior_scale: f64,
    /// Fourier order of the yearly seasonality; 0 disables it
    pub yearly_fourier_order: usize,
    /// Fourier order of the weekly seasonality; 0 disables it
    pub weekly_fourier_order: usize,
    /// Coverage of the uncertainty intervals
    pub interval_width: f64,
    /// Number of simulated paths used for the intervals; 0 disables them
    pub uncertainty_samples: usize,
    /// Seed of the uncertainty simulation
    pub seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            yearly_fourier_order: 10,
            weekly_fourier_order: 3,
            interval_width: 0.8,
            uncertainty_samples: 1000,
            seed: 0x5eed,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.changepoint_range > 0.0 && self.changepoint_range <= 1.0) {
            return Err(ComputeError::InvalidConfig(format!(
                "changepoint_range must be in (0, 1], got {}",
                self.changepoint_range
            )));
        }
        if !(self.changepoint_prior_scale > 0.0) || !(self.seasonality_prior_scale > 0.0) {
            return Err(ComputeError::InvalidConfig(
                "prior scales must be positive".to_string(),
            ));
        }
        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(ComputeError::InvalidConfig(format!(
                "interval_width must be in (0, 1), got {}",
                self.interval_width
            )));
        }
        Ok(())
    }
}

/// An unfitted additive model.
#[derive(Debug, Clone, Default)]
pub struct AdditiveModel {
    config: ModelConfig,
}

impl AdditiveModel {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Fits the model to the training observations.
    ///
    /// Needs at least two observations on distinct dates. Observations are
    /// sorted by date; for a repeated date the last value is kept.
    #[instrument(skip_all, fields(rows = training.len()))]
    pub fn fit(&self, training: &TrainingSet) -> Result<FittedModel> {
        self.config.validate()?;

        let mut observations: Vec<(NaiveDate, f64)> = training
            .dates
            .iter()
            .copied()
            .zip(training.values.iter().copied())
            .filter(|(_, y)| y.is_finite())
            .collect();
        observations.sort_by_key(|(date, _)| *date);
        observations.dedup_by(|later, earlier| {
            if later.0 == earlier.0 {
                earlier.1 = later.1;
                true
            } else {
                false
            }
        });

        let (Some(&(start, _)), Some(&(end, _))) = (observations.first(), observations.last())
        else {
            return Err(ComputeError::InsufficientData(
                "no observations to fit".to_string(),
            ));
        };
        let span_days = (end - start).num_days();
        if observations.len() < 2 || span_days <= 0 {
            return Err(ComputeError::InsufficientData(format!(
                "need at least 2 observations on distinct dates, got {}",
                observations.len()
            )));
        }

        let dates: Vec<NaiveDate> = observations.iter().map(|(d, _)| *d).collect();
        let y_scale = observations
            .iter()
            .map(|(_, y)| y.abs())
            .fold(0.0_f64, f64::max);
        let y_scale = if y_scale > 0.0 { y_scale } else { 1.0 };
        let y: Vec<f64> = observations.iter().map(|(_, v)| v / y_scale).collect();
        let t: Vec<f64> = dates
            .iter()
            .map(|d| (*d - start).num_days() as f64 / span_days as f64)
            .collect();

        let changepoints = place_changepoints(
            &t,
            self.config.n_changepoints,
            self.config.changepoint_range,
        );
        let seasonalities = detect_seasonalities(
            &dates,
            self.config.weekly_fourier_order,
            self.config.yearly_fourier_order,
        );
        debug!(
            "Fitting {} observations with {} changepoints and seasonalities {:?}",
            y.len(),
            changepoints.len(),
            seasonalities.iter().map(|s| s.kind.name()).collect::<Vec<_>>()
        );

        // Prior variance of every coefficient, in design-matrix column order.
        let mut prior_variance = vec![TREND_PRIOR_SCALE.powi(2), TREND_PRIOR_SCALE.powi(2)];
        // Laplace(0, b) has variance 2b^2.
        prior_variance.extend(
            std::iter::repeat(2.0 * self.config.changepoint_prior_scale.powi(2))
                .take(changepoints.len()),
        );
        for seasonality in &seasonalities {
            prior_variance.extend(
                std::iter::repeat(self.config.seasonality_prior_scale.powi(2))
                    .take(seasonality.width()),
            );
        }
        let width = prior_variance.len();

        let design: Vec<Vec<f64>> = dates
            .iter()
            .zip(&t)
            .map(|(date, t)| design_row(*t, epoch_day(*date), &changepoints, &seasonalities, width))
            .collect();

        let mut xtx = vec![vec![0.0; width]; width];
        let mut xty = vec![0.0; width];
        for (row, target) in design.iter().zip(&y) {
            for i in 0..width {
                if row[i] == 0.0 {
                    continue;
                }
                xty[i] += row[i] * target;
                for j in 0..width {
                    xtx[i][j] += row[i] * row[j];
                }
            }
        }

        let mean = y.iter().sum::<f64>() / y.len() as f64;
        let mut sigma2 =
            (y.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / y.len() as f64).max(SIGMA2_FLOOR);
        let mut theta = vec![0.0; width];

        for round in 0..SIGMA_ITERATIONS {
            let mut system = xtx.clone();
            for (j, variance) in prior_variance.iter().enumerate() {
                system[j][j] += sigma2 / variance;
            }
            theta = linalg::solve(system, xty.clone())?;

            let sse: f64 = design
                .iter()
                .zip(&y)
                .map(|(row, target)| {
                    let fitted: f64 = row.iter().zip(&theta).map(|(x, b)| x * b).sum();
                    (target - fitted).powi(2)
                })
                .sum();
            sigma2 = (sse / y.len() as f64).max(SIGMA2_FLOOR);
            trace!("Fit round {}: sigma^2 = {:e}", round, sigma2);
        }

        let n_changepoints = changepoints.len();
        let trend = PiecewiseLinear {
            m: theta[0],
            k: theta[1],
            deltas: theta[2..2 + n_changepoints].to_vec(),
            changepoints,
        };

        let mut offset = 2 + n_changepoints;
        let seasonalities = seasonalities
            .into_iter()
            .map(|seasonality| {
                let coefficients = theta[offset..offset + seasonality.width()].to_vec();
                offset += seasonality.width();
                FittedSeasonality {
                    seasonality,
                    coefficients,
                }
            })
            .collect();

        let fitted = FittedModel {
            config: self.config.clone(),
            history: dates,
            start,
            span_days: span_days as f64,
            y_scale,
            trend,
            seasonalities,
            sigma: sigma2.sqrt(),
        };
        debug!(
            "Model fitted: final rate {:.4}, sigma {:.5} (scaled)",
            fitted.trend.final_rate(),
            fitted.sigma
        );

        Ok(fitted)
    }
}

fn design_row(
    t: f64,
    day: f64,
    changepoints: &[f64],
    seasonalities: &[Seasonality],
    width: usize,
) -> Vec<f64> {
    let mut row = Vec::with_capacity(width);
    row.push(1.0);
    row.push(t);
    row.extend(changepoints.iter().map(|c| hinge(t, *c)));
    for seasonality in seasonalities {
        seasonality.push_features(day, &mut row);
    }
    row
}

/// A fitted additive model.
#[derive(Debug, Clone)]
pub struct FittedModel {
    config: ModelConfig,
    history: Vec<NaiveDate>,
    start: NaiveDate,
    span_days: f64,
    y_scale: f64,
    trend: PiecewiseLinear,
    seasonalities: Vec<FittedSeasonality>,
    sigma: f64,
}

impl FittedModel {
    pub fn history_dates(&self) -> &[NaiveDate] {
        &self.history
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Observation noise standard deviation in the units of the training values.
    pub fn sigma(&self) -> f64 {
        self.sigma * self.y_scale
    }

    pub fn has_seasonality(&self, kind: SeasonalityKind) -> bool {
        self.seasonalities.iter().any(|s| s.seasonality.kind == kind)
    }

    /// Dates of the trend changepoints.
    pub fn changepoint_dates(&self) -> Vec<NaiveDate> {
        self.trend
            .changepoints
            .iter()
            .map(|t| self.start + Duration::days((t * self.span_days).round() as i64))
            .collect()
    }

    /// The history dates followed by `periods` consecutive days after the last one.
    pub fn make_future_dates(&self, periods: u32) -> Vec<NaiveDate> {
        let mut dates = self.history.clone();
        if let Some(last) = self.history.last().copied() {
            dates.extend((1..=i64::from(periods)).map(|i| last + Duration::days(i)));
        }
        dates
    }

    fn scaled_time(&self, date: NaiveDate) -> f64 {
        (date - self.start).num_days() as f64 / self.span_days
    }

    fn seasonal_value(&self, kind: SeasonalityKind, day: f64) -> f64 {
        self.seasonalities
            .iter()
            .filter(|s| s.seasonality.kind == kind)
            .map(|s| s.value(day))
            .sum()
    }

    /// Predicts every date, with components and uncertainty intervals.
    ///
    /// Intervals come from `uncertainty_samples` simulated paths. Each path adds
    /// future trend changes beyond the end of the history, arriving at the
    /// historical changepoint rate with Laplace-distributed rate changes, plus
    /// Gaussian observation noise.
    #[instrument(skip_all, fields(rows = dates.len()))]
    pub fn predict(&self, dates: &[NaiveDate]) -> Result<ForecastTable> {
        let samples = self.config.uncertainty_samples;
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let t_max = dates
            .iter()
            .map(|d| self.scaled_time(*d))
            .fold(1.0_f64, f64::max);
        let future_span = t_max - 1.0;
        let change_rate = self.trend.changepoints.len() as f64;
        let delta_scale = self.trend.mean_abs_delta() + DELTA_SCALE_EPSILON;

        let future_changes: Vec<Vec<(f64, f64)>> = (0..samples)
            .map(|_| {
                let count = if future_span > 0.0 {
                    poisson(&mut rng, change_rate * future_span)
                } else {
                    0
                };
                (0..count)
                    .map(|_| {
                        let at = 1.0 + rng.r#gen::<f64>() * future_span;
                        (at, laplace(&mut rng, delta_scale))
                    })
                    .collect()
            })
            .collect();
        debug!(
            "Simulating {} paths over {:.3} scaled future time",
            samples, future_span
        );

        let lower_q = (1.0 - self.config.interval_width) / 2.0;
        let upper_q = (1.0 + self.config.interval_width) / 2.0;
        let mut trend_samples = Vec::with_capacity(samples);
        let mut yhat_samples = Vec::with_capacity(samples);

        let mut rows = Vec::with_capacity(dates.len());
        for date in dates {
            let t = self.scaled_time(*date);
            let day = epoch_day(*date);
            let trend = self.trend.value(t);
            let weekly = self.seasonal_value(SeasonalityKind::Weekly, day);
            let yearly = self.seasonal_value(SeasonalityKind::Yearly, day);
            let additive = weekly + yearly;

            let (trend_lower, trend_upper, yhat_lower, yhat_upper) = if samples == 0 {
                (trend, trend, trend + additive, trend + additive)
            } else {
                trend_samples.clear();
                yhat_samples.clear();
                for changes in &future_changes {
                    let sampled_trend = changes
                        .iter()
                        .fold(trend, |acc, (at, delta)| acc + delta * hinge(t, *at));
                    trend_samples.push(sampled_trend);
                    yhat_samples
                        .push(sampled_trend + additive + self.sigma * standard_normal(&mut rng));
                }
                trend_samples.sort_by(|a, b| a.total_cmp(b));
                yhat_samples.sort_by(|a, b| a.total_cmp(b));
                (
                    percentile(&trend_samples, lower_q),
                    percentile(&trend_samples, upper_q),
                    percentile(&yhat_samples, lower_q),
                    percentile(&yhat_samples, upper_q),
                )
            };

            let trend = trend * self.y_scale;
            let weekly = weekly * self.y_scale;
            let yearly = yearly * self.y_scale;
            let additive_terms = weekly + yearly;
            rows.push(ForecastPoint {
                ds: *date,
                trend,
                trend_lower: trend_lower * self.y_scale,
                trend_upper: trend_upper * self.y_scale,
                weekly,
                yearly,
                additive_terms,
                yhat_lower: yhat_lower * self.y_scale,
                yhat_upper: yhat_upper * self.y_scale,
                yhat: trend + additive_terms,
            });
        }

        let history_len = dates
            .iter()
            .take_while(|d| self.history.last().is_some_and(|last| *d <= last))
            .count();

        Ok(ForecastTable::new(
            rows,
            history_len,
            self.has_seasonality(SeasonalityKind::Weekly),
            self.has_seasonality(SeasonalityKind::Yearly),
        ))
    }

    /// Predicts the history plus `periods` days after it.
    pub fn forecast(&self, periods: u32) -> Result<ForecastTable> {
        self.predict(&self.make_future_dates(periods))
    }
}
