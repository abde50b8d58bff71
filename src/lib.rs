#![warn(missing_docs)]

//! Rust port of the starspot light curve simulation tools from the Python
//! package rubin_rotation. \
//! The crate simulates stellar rotational light curves as a wide-field
//! synoptic survey would observe them: an irregular multi-year visit
//! cadence, a population of transient dark spots rotating with the star,
//! the resulting dimming integrated into a flux time series, and Gaussian
//! measurement noise on top. The Gaussian-process period fitting of the
//! original package is not ported; it plugs in behind the
//! [`PeriodEstimator`] trait instead.
//!
//! ## Interface
//! The central struct of this library is [`LightCurveSim`]. It is created
//! with the rotation period and noise level, configured via
//! `LightCurveSim::with_*()` functions, and run with a caller-owned random
//! number generator for reproducible, parallel-safe simulation.
//!
//! Example:
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use spotsim::{LightCurveSim, PeriodEstimator, Periodogram};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let lc = LightCurveSim::new(10.0, 0.01)
//!     .with_visits(400)
//!     .with_span_years(2.0)
//!     .with_amplitude(0.1)
//!     .simulate(&mut rng)
//!     .unwrap();
//!
//! let estimate = Periodogram::new()
//!     .with_period_range(2.0, 50.0)
//!     .estimate(&lc, Some(10.0))
//!     .unwrap();
//! assert!(estimate.period > 0.0);
//! ```
//!
//! The lower-level stages are exposed individually: [`VisitCadence`] for
//! the survey sampling, [`SpotField`] for the spot population, and
//! [`FluxModel`] for the noise-free synthesis with its
//! [`FluxDiagnostics`] summary.

pub(crate) mod array_utils;
pub(crate) mod cadence;
pub(crate) mod error;
pub(crate) mod estimator;
pub(crate) mod flux;
pub(crate) mod lightcurve;
pub(crate) mod spots;

pub use cadence::{gap_stats, CadenceStats, VisitCadence, DEFAULT_SEASON_SCALE};
pub use error::{Error, Result};
pub use estimator::{PeriodEstimate, PeriodEstimator, Periodogram};
pub use flux::{FluxDiagnostics, FluxModel};
pub use lightcurve::{Inclination, LightCurveSim, ObservedLightCurve};
pub use spots::{Spot, SpotConfig, SpotField};
