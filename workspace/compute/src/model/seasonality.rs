//! Fourier-series seasonal components.

use chrono::{Datelike, NaiveDate};

pub const WEEKLY_PERIOD: f64 = 7.0;
pub const YEARLY_PERIOD: f64 = 365.25;

/// Days between 0001-01-01 and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// History span, in days, from which yearly seasonality is fitted.
const YEARLY_MIN_SPAN_DAYS: i64 = 730;
/// History span, in days, from which weekly seasonality is fitted.
const WEEKLY_MIN_SPAN_DAYS: i64 = 14;

/// Which periodic component a seasonality models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeasonalityKind {
    Weekly,
    Yearly,
}

impl SeasonalityKind {
    pub fn name(&self) -> &'static str {
        match self {
            SeasonalityKind::Weekly => "weekly",
            SeasonalityKind::Yearly => "yearly",
        }
    }
}

/// A seasonality modelled by `order` sine/cosine pairs of the given period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seasonality {
    pub kind: SeasonalityKind,
    pub period: f64,
    pub order: usize,
}

impl Seasonality {
    pub fn weekly(order: usize) -> Self {
        Self {
            kind: SeasonalityKind::Weekly,
            period: WEEKLY_PERIOD,
            order,
        }
    }

    pub fn yearly(order: usize) -> Self {
        Self {
            kind: SeasonalityKind::Yearly,
            period: YEARLY_PERIOD,
            order,
        }
    }

    /// Number of regressors this seasonality adds.
    pub fn width(&self) -> usize {
        2 * self.order
    }

    /// Appends `sin, cos` of each harmonic at `day` (days since the Unix epoch).
    pub fn push_features(&self, day: f64, out: &mut Vec<f64>) {
        for harmonic in 1..=self.order {
            let angle = 2.0 * std::f64::consts::PI * harmonic as f64 * day / self.period;
            out.push(angle.sin());
            out.push(angle.cos());
        }
    }
}

/// A seasonality together with its fitted Fourier coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedSeasonality {
    pub seasonality: Seasonality,
    pub coefficients: Vec<f64>,
}

impl FittedSeasonality {
    pub fn value(&self, day: f64) -> f64 {
        let mut features = Vec::with_capacity(self.seasonality.width());
        self.seasonality.push_features(day, &mut features);
        features
            .iter()
            .zip(&self.coefficients)
            .map(|(x, beta)| x * beta)
            .sum()
    }
}

/// Days since the Unix epoch, the time axis of the Fourier features.
pub fn epoch_day(date: NaiveDate) -> f64 {
    (date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE) as f64
}

/// Picks the seasonalities the history can support.
///
/// Yearly needs two years of history. Weekly needs two weeks of history
/// sampled more often than once a week. `dates` must be ascending.
pub fn detect_seasonalities(
    dates: &[NaiveDate],
    weekly_order: usize,
    yearly_order: usize,
) -> Vec<Seasonality> {
    let (Some(first), Some(last)) = (dates.first(), dates.last()) else {
        return Vec::new();
    };
    let span = (*last - *first).num_days();
    let min_gap = dates
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days())
        .min()
        .unwrap_or(i64::MAX);

    let mut seasonalities = Vec::new();
    if yearly_order > 0 && span >= YEARLY_MIN_SPAN_DAYS {
        seasonalities.push(Seasonality::yearly(yearly_order));
    }
    if weekly_order > 0 && span >= WEEKLY_MIN_SPAN_DAYS && min_gap < 7 {
        seasonalities.push(Seasonality::weekly(weekly_order));
    }
    seasonalities
}
