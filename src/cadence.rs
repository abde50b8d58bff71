//! Irregular survey visit cadences.
//!
//! The sampler mimics a multi-year ground-based survey with crude
//! approximations: visits happen only at night, they cluster around an
//! observable season with a Gaussian shape each year, and the year of each
//! visit is drawn uniformly over the survey span.

use itertools::Itertools;
use log::debug;
use ndarray::{Array1, ArrayView1};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{Error, Result};

/// Length of a survey year in days, as used by the cadence model.
const DAYS_PER_YEAR: f64 = 365.0;

/// Center of the observable season, in days from the start of the year.
const SEASON_CENTER: f64 = DAYS_PER_YEAR / 4.0;

/// Default seasonal clustering width in days.
pub const DEFAULT_SEASON_SCALE: f64 = DAYS_PER_YEAR / 5.0;

/// Sampler for irregular survey visit times.
///
/// Each visit time is the sum of three draws:
/// - a time-of-night offset, uniform in `[-0.25, 0.25)` days around midnight,
/// - a day of year, the floor of a normal draw centered on the middle of the
///   observable season,
/// - a whole-year offset, uniform over the survey span.
///
/// # Example:
/// ```
/// # use rand::{rngs::StdRng, SeedableRng};
/// # use spotsim::VisitCadence;
/// let mut rng = StdRng::seed_from_u64(42);
/// let times = VisitCadence::new(80, 1.0).sample(&mut rng).unwrap();
/// assert_eq!(times.len(), 80);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisitCadence {
    n_visits: usize,
    span_years: f64,
    season_scale: f64,
}

impl VisitCadence {
    /// Create a sampler for `n_visits` visits over `span_years` years,
    /// using the default seasonal clustering width.
    pub fn new(n_visits: usize, span_years: f64) -> Self {
        Self {
            n_visits,
            span_years,
            season_scale: DEFAULT_SEASON_SCALE,
        }
    }

    /// Set the seasonal clustering width in days. Must be finite and non-negative.
    pub fn with_season_scale(mut self, season_scale: f64) -> Self {
        self.season_scale = season_scale;
        self
    }

    /// Sample the visit times in days, sorted ascending.
    ///
    /// Succeeds for any visit count; zero visits yield an empty array. A
    /// negative or non-finite seasonal clustering width fails fast with a
    /// validation error. Deterministic for a caller-seeded generator.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Array1<f64>> {
        if !(self.season_scale.is_finite() && self.season_scale >= 0.0) {
            return Err(Error::invalid(
                "season_scale",
                format!(
                    "must be finite and non-negative, got {}",
                    self.season_scale
                ),
            ));
        }
        let season =
            Normal::new(SEASON_CENTER, self.season_scale).expect("validated season scale");

        let mut days = Vec::with_capacity(self.n_visits);
        for _ in 0..self.n_visits {
            let time_of_night = rng.gen_range(-0.25..0.25);
            let day_of_year = season.sample(rng).floor();
            let year_offset = if self.span_years > 0.0 {
                rng.gen_range(0.0..self.span_years).floor() * DAYS_PER_YEAR
            } else {
                0.0
            };
            days.push(time_of_night + day_of_year + year_offset);
        }

        let sorted = days
            .into_iter()
            .sorted_by(|a, b| a.partial_cmp(b).expect("found nan"))
            .collect_vec();
        debug!(
            "sampled {} visits over {} years",
            sorted.len(),
            self.span_years
        );
        Ok(Array1::from_vec(sorted))
    }
}

/// Basic statistics about the gaps between consecutive visits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CadenceStats {
    /// Mean time between visits, days.
    pub mean_gap: f64,
    /// Median time between visits, days.
    pub median_gap: f64,
}

/// Compute gap statistics for a sorted sequence of visit times.
///
/// Returns `None` for fewer than two visits, where no gap exists.
pub fn gap_stats(times: ArrayView1<f64>) -> Option<CadenceStats> {
    if times.len() < 2 {
        return None;
    }
    let gaps: Array1<f64> = times
        .windows(2)
        .into_iter()
        .map(|w| w[1] - w[0])
        .collect();
    Some(CadenceStats {
        mean_gap: gaps.mean().expect("at least one gap"),
        median_gap: crate::array_utils::median(gaps.view()),
    })
}
