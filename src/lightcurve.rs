//! Assembly of observed light curves: cadence, spots, flux, and noise.

use log::info;
use ndarray::Array1;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::array_utils::median;
use crate::cadence::{VisitCadence, DEFAULT_SEASON_SCALE};
use crate::error::{Error, Result};
use crate::flux::FluxModel;
use crate::spots::{SpotConfig, SpotField};

/// Inclination of the stellar rotation axis against the line of sight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Inclination {
    /// Fixed inclination in radians.
    Fixed(f64),
    /// Draw the inclination with `sin^2(i)` uniform over `[0, 1]`,
    /// i.e. isotropically distributed rotation axes.
    Isotropic,
}

impl Inclination {
    /// Fixed inclination given in degrees.
    pub fn from_degrees(degrees: f64) -> Self {
        Inclination::Fixed(degrees.to_radians())
    }

    fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> f64 {
        match self {
            Inclination::Fixed(inclination) => inclination,
            Inclination::Isotropic => {
                let sin2 = rng.gen_range(0.0..1.0_f64);
                sin2.sqrt().asin()
            }
        }
    }
}

/// An assembled observed dataset, one entry per visit.
///
/// All four arrays have the same length. `flux` carries the injected
/// Gaussian noise on top of `pure_flux`; `flux_err` is constant at the
/// noise level used.
#[derive(Clone, Debug, PartialEq)]
pub struct ObservedLightCurve {
    /// Visit times in days, sorted ascending.
    pub time: Array1<f64>,
    /// Observed (noisy) flux, median-normalized around zero.
    pub flux: Array1<f64>,
    /// Noise-free flux under the equatorial base period.
    pub pure_flux: Array1<f64>,
    /// Per-point flux uncertainty, constant at the noise level.
    pub flux_err: Array1<f64>,
}

/// The central struct of this library.
///
/// Builds the full simulation pipeline for one star: sample a survey
/// cadence, generate a spot field, synthesize the rotational flux, and add
/// measurement noise. Parameters beyond period and noise level are set via
/// `with_*` functions.
///
/// Every stochastic step draws from the caller-owned generator handed to
/// [`simulate`](LightCurveSim::simulate), so runs are reproducible under a
/// fixed seed and independent stars can be simulated in parallel with one
/// generator each.
///
/// # Example:
/// ```
/// # use rand::{rngs::StdRng, SeedableRng};
/// # use spotsim::LightCurveSim;
/// let mut rng = StdRng::seed_from_u64(42);
/// let lc = LightCurveSim::new(10.0, 0.01)
///     .with_visits(80)
///     .with_span_years(1.0)
///     .simulate(&mut rng)
///     .unwrap();
/// assert_eq!(lc.flux.len(), 80);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightCurveSim {
    period: f64,
    noise: f64,
    n_visits: usize,
    span_years: f64,
    amplitude: f64,
    nspot: f64,
    tau_range: (f64, f64),
    diff_rot: f64,
    inclination: Inclination,
    season_scale: f64,
}

impl LightCurveSim {
    /// Create a simulation for a star with the given rotation `period` in
    /// days and per-point Gaussian `noise` level.
    ///
    /// Defaults: 80 visits over 1 year, amplitude 1, 200 simultaneous
    /// spots, lifetimes of 1 to 3 periods, no differential rotation, and an
    /// isotropically drawn inclination.
    pub fn new(period: f64, noise: f64) -> Self {
        Self {
            period,
            noise,
            n_visits: 80,
            span_years: 1.0,
            amplitude: 1.0,
            nspot: 200.0,
            tau_range: (1.0, 3.0),
            diff_rot: 0.0,
            inclination: Inclination::Isotropic,
            season_scale: DEFAULT_SEASON_SCALE,
        }
    }

    /// Set the number of survey visits.
    pub fn with_visits(mut self, n_visits: usize) -> Self {
        self.n_visits = n_visits;
        self
    }

    /// Set the survey span in years.
    pub fn with_span_years(mut self, span_years: f64) -> Self {
        self.span_years = span_years;
        self
    }

    /// Set the target light curve amplitude.
    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Set the desired number of simultaneous spots.
    pub fn with_nspot(mut self, nspot: f64) -> Self {
        self.nspot = nspot;
        self
    }

    /// Set the spot lifetime range as multiples of the rotation period.
    /// The lifetime is drawn log-uniformly within this range.
    pub fn with_tau_range(mut self, low: f64, high: f64) -> Self {
        self.tau_range = (low, high);
        self
    }

    /// Set the differential rotation fraction.
    pub fn with_diff_rot(mut self, diff_rot: f64) -> Self {
        self.diff_rot = diff_rot;
        self
    }

    /// Set the inclination policy.
    pub fn with_inclination(mut self, inclination: Inclination) -> Self {
        self.inclination = inclination;
        self
    }

    /// Set the seasonal clustering width of the cadence, in days.
    pub fn with_season_scale(mut self, season_scale: f64) -> Self {
        self.season_scale = season_scale;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.period.is_finite() && self.period > 0.0) {
            return Err(Error::invalid(
                "period",
                format!("must be finite and positive, got {}", self.period),
            ));
        }
        if !(self.noise.is_finite() && self.noise > 0.0) {
            return Err(Error::invalid(
                "noise",
                format!("must be finite and positive, got {}", self.noise),
            ));
        }
        if !(self.amplitude.is_finite() && self.amplitude >= 0.0) {
            return Err(Error::invalid(
                "amplitude",
                format!("must be finite and non-negative, got {}", self.amplitude),
            ));
        }
        if !(self.nspot.is_finite() && self.nspot >= 0.0) {
            return Err(Error::invalid(
                "nspot",
                format!("must be finite and non-negative, got {}", self.nspot),
            ));
        }
        if !(self.span_years.is_finite() && self.span_years >= 0.0) {
            return Err(Error::invalid(
                "span_years",
                format!("must be finite and non-negative, got {}", self.span_years),
            ));
        }
        let (low, high) = self.tau_range;
        if !(low.is_finite() && high.is_finite() && low > 0.0 && low <= high) {
            return Err(Error::invalid(
                "tau_range",
                format!("must satisfy 0 < low <= high, got ({low}, {high})"),
            ));
        }
        if !(self.season_scale.is_finite() && self.season_scale >= 0.0) {
            return Err(Error::invalid(
                "season_scale",
                format!(
                    "must be finite and non-negative, got {}",
                    self.season_scale
                ),
            ));
        }
        if let Inclination::Fixed(inclination) = self.inclination {
            if !inclination.is_finite() {
                return Err(Error::invalid(
                    "inclination",
                    format!("must be finite, got {inclination}"),
                ));
            }
        }
        Ok(())
    }

    /// Run the full pipeline and return the observed dataset.
    ///
    /// Fails fast on out-of-range parameters; degenerate configurations
    /// (zero visits, zero span) succeed with correspondingly degenerate
    /// output. Zero visits yield four empty arrays.
    pub fn simulate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ObservedLightCurve> {
        self.validate()?;

        let time = VisitCadence::new(self.n_visits, self.span_years)
            .with_season_scale(self.season_scale)
            .sample(rng)?;

        if time.is_empty() {
            return Ok(ObservedLightCurve {
                time,
                flux: Array1::zeros(0),
                pure_flux: Array1::zeros(0),
                flux_err: Array1::zeros(0),
            });
        }

        let inclination = self.inclination.resolve(rng);

        // Spot lifetime, log-uniform over the configured multiple-of-period
        // range.
        let (low, high) = self.tau_range;
        let ln_low = (low * self.period).ln();
        let ln_high = (high * self.period).ln();
        let lifetime = if ln_low < ln_high {
            rng.gen_range(ln_low..ln_high).exp()
        } else {
            low * self.period
        };

        let duration = time[time.len() - 1] - time[0];
        let config = SpotConfig {
            nspot: self.nspot,
            amplitude: self.amplitude,
            lifetime,
            period: self.period,
            diff_rot: self.diff_rot,
        };
        let field = SpotField::generate(&config, duration, rng);
        let (model, diagnostics) = FluxModel::synthesize(&field, time.view(), inclination);
        info!(
            "simulated {} visits, {} spots, effective amplitude {:.4} (requested {:.4})",
            time.len(),
            field.len(),
            diagnostics.effective_amplitude,
            self.amplitude
        );

        // Normalize the noise-free series to a zero-centered baseline. A
        // constant-zero model (zero amplitude) has nothing to normalize.
        let med = median(model.base_flux.view());
        let pure_flux = if med != 0.0 {
            model.base_flux.mapv(|f| f / med - 1.0)
        } else {
            model.base_flux
        };

        let noise = Normal::new(0.0, self.noise).expect("validated noise level");
        let flux = Array1::from_shape_fn(time.len(), |i| pure_flux[i] + noise.sample(rng));
        let flux_err = Array1::from_elem(time.len(), self.noise);

        Ok(ObservedLightCurve {
            time,
            flux,
            pure_flux,
            flux_err,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::array_utils::median;

    #[test]
    fn arrays_have_equal_length_and_constant_errors() {
        let mut rng = StdRng::seed_from_u64(42);
        let lc = LightCurveSim::new(10.0, 0.01)
            .with_visits(80)
            .simulate(&mut rng)
            .unwrap();

        assert_eq!(lc.time.len(), 80);
        assert_eq!(lc.flux.len(), 80);
        assert_eq!(lc.pure_flux.len(), 80);
        assert_eq!(lc.flux_err.len(), 80);
        for &e in &lc.flux_err {
            assert_eq!(e, 0.01);
            assert!(e > 0.0);
        }
    }

    #[test]
    fn identical_seeds_give_bit_identical_output() {
        let sim = LightCurveSim::new(7.3, 0.005)
            .with_visits(120)
            .with_span_years(3.0)
            .with_diff_rot(0.1);

        let mut rng = StdRng::seed_from_u64(1234);
        let first = sim.simulate(&mut rng).unwrap();
        let mut rng = StdRng::seed_from_u64(1234);
        let second = sim.simulate(&mut rng).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn zero_visits_yield_empty_arrays() {
        let mut rng = StdRng::seed_from_u64(42);
        let lc = LightCurveSim::new(10.0, 0.01)
            .with_visits(0)
            .simulate(&mut rng)
            .unwrap();

        assert!(lc.time.is_empty());
        assert!(lc.flux.is_empty());
        assert!(lc.pure_flux.is_empty());
        assert!(lc.flux_err.is_empty());
    }

    #[test]
    fn pure_flux_has_zero_median() {
        let mut rng = StdRng::seed_from_u64(7);
        let lc = LightCurveSim::new(10.0, 0.01)
            .with_visits(200)
            .with_amplitude(0.1)
            .simulate(&mut rng)
            .unwrap();

        assert_abs_diff_eq!(median(lc.pure_flux.view()), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn noise_perturbs_pure_flux_at_the_configured_level() {
        let mut rng = StdRng::seed_from_u64(99);
        let sigma = 0.02;
        let lc = LightCurveSim::new(10.0, sigma)
            .with_visits(2000)
            .with_span_years(10.0)
            .simulate(&mut rng)
            .unwrap();

        let residuals = &lc.flux - &lc.pure_flux;
        let rms = (residuals.mapv(|r| r * r).mean().unwrap()).sqrt();
        assert_abs_diff_eq!(rms, sigma, epsilon = sigma * 0.1);
    }

    #[test]
    fn fixed_inclination_is_honored_deterministically() {
        let sim = LightCurveSim::new(5.0, 0.01)
            .with_visits(50)
            .with_inclination(Inclination::from_degrees(90.0));

        let mut rng = StdRng::seed_from_u64(5);
        let first = sim.simulate(&mut rng).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let second = sim.simulate(&mut rng).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn invalid_parameters_fail_fast() {
        let mut rng = StdRng::seed_from_u64(1);

        assert!(LightCurveSim::new(-5.0, 0.01).simulate(&mut rng).is_err());
        assert!(LightCurveSim::new(10.0, -0.01).simulate(&mut rng).is_err());
        assert!(LightCurveSim::new(10.0, 0.0).simulate(&mut rng).is_err());
        assert!(LightCurveSim::new(10.0, 0.01)
            .with_amplitude(f64::NAN)
            .simulate(&mut rng)
            .is_err());
        assert!(LightCurveSim::new(10.0, 0.01)
            .with_tau_range(3.0, 1.0)
            .simulate(&mut rng)
            .is_err());
        assert!(LightCurveSim::new(10.0, 0.01)
            .with_tau_range(0.0, 1.0)
            .simulate(&mut rng)
            .is_err());
    }

    #[test]
    fn error_message_names_the_parameter() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = LightCurveSim::new(f64::INFINITY, 0.01)
            .simulate(&mut rng)
            .unwrap_err();
        assert!(err.to_string().contains("period"));
    }

    #[test]
    fn degenerate_tau_range_uses_the_lower_bound() {
        // low == high collapses the log-uniform draw to a single value.
        let mut rng = StdRng::seed_from_u64(3);
        let lc = LightCurveSim::new(10.0, 0.01)
            .with_visits(30)
            .with_tau_range(2.0, 2.0)
            .simulate(&mut rng);
        assert!(lc.is_ok());
    }
}
