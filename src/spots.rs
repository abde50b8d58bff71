//! Transient circular starspot populations.
//!
//! Spots are dark, point-like, and carry no limb darkening. Each spot grows
//! and decays as a Gaussian in time around its peak; it is never explicitly
//! destroyed and simply contributes a negligible area far from its peak.

use std::f64::consts::TAU;

use log::debug;
use rand::Rng;

/// A single transient spot on the stellar surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spot {
    /// Longitude in radians, uniform over the full circle.
    pub longitude: f64,
    /// Latitude in radians, distributed so that `sin(latitude)` is uniform
    /// in `[-1, 1]` (isotropic on the sphere).
    pub latitude: f64,
    /// Maximum projected area, in units of the visible disk (filling factor).
    pub peak_area: f64,
    /// Gaussian decay timescale in days, shared across the population.
    pub decay: f64,
    /// Time of maximum area in days, relative to the start of the series.
    pub peak_time: f64,
    /// Rotation period in days at the spot's latitude.
    pub period: f64,
    /// Equatorial rotation period in days, ignoring differential rotation.
    pub base_period: f64,
}

/// Population-level parameters for spot field generation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotConfig {
    /// Desired number of spots present on the star at any one time.
    pub nspot: f64,
    /// Desired light curve amplitude.
    pub amplitude: f64,
    /// Characteristic spot lifetime in days.
    pub lifetime: f64,
    /// Equatorial rotation period in days.
    pub period: f64,
    /// Fractional difference between equatorial and polar rotation period.
    /// Zero disables the latitude dependence.
    pub diff_rot: f64,
}

impl Default for SpotConfig {
    fn default() -> Self {
        Self {
            nspot: 200.0,
            amplitude: 1.0,
            lifetime: 30.5,
            period: 10.0,
            diff_rot: 0.0,
        }
    }
}

/// A generated population of spots covering an observation span.
#[derive(Clone, Debug)]
pub struct SpotField {
    spots: Vec<Spot>,
    filling_factor: f64,
}

impl SpotField {
    /// Generate a spot field covering `duration` days.
    ///
    /// The total count is a crude estimate of how many spots are needed so
    /// that the *simultaneous* population stays near `nspot`:
    /// `max(1, round(nspot * duration / (2 * lifetime)))`. Peak times are
    /// drawn over the span padded by three lifetimes on each side so decay
    /// tails are not truncated at the boundaries.
    ///
    /// Every spot gets the same maximum area `amplitude / sqrt(nspot)`.
    /// This targets the combined amplitude only approximately, assuming
    /// incoherent superposition of spot phases; the effective amplitude of
    /// the synthesized flux will generally differ from the requested one.
    ///
    /// Degenerate parameters are floored rather than rejected: a zero
    /// lifetime or zero duration still produces one spot, and a zero target
    /// population is treated as one. Fractional targets between zero and
    /// one are kept as given, so their amplitude scaling is unaltered.
    pub fn generate<R: Rng + ?Sized>(config: &SpotConfig, duration: f64, rng: &mut R) -> Self {
        let nspot = if config.nspot > 0.0 { config.nspot } else { 1.0 };

        let total = if config.lifetime > 0.0 {
            (nspot * duration / (2.0 * config.lifetime)).round() as usize
        } else {
            0
        };
        let total = total.max(1);

        let filling_factor = config.amplitude / nspot.sqrt();
        let pad = 3.0 * config.lifetime;

        let spots = (0..total)
            .map(|_| {
                let longitude = rng.gen_range(0.0..TAU);
                let latitude = f64::asin(rng.gen_range(-1.0..1.0));
                let peak_time = if duration + 2.0 * pad > 0.0 {
                    rng.gen_range(-pad..duration + pad)
                } else {
                    0.0
                };
                let period = ((latitude.sin() - 0.5) * config.diff_rot + 1.0) * config.period;

                Spot {
                    longitude,
                    latitude,
                    peak_area: filling_factor,
                    decay: config.lifetime,
                    peak_time,
                    period,
                    base_period: config.period,
                }
            })
            .collect();

        debug!(
            "generated {total} spots over {duration} days (per-spot filling factor {filling_factor:.4})"
        );
        Self {
            spots,
            filling_factor,
        }
    }

    /// Build a field from an explicit list of spots.
    ///
    /// The filling factor is taken as the mean peak area, matching what
    /// [`generate`](SpotField::generate) would record for a uniform population.
    pub fn from_spots(spots: Vec<Spot>) -> Self {
        let filling_factor = if spots.is_empty() {
            0.0
        } else {
            spots.iter().map(|s| s.peak_area).sum::<f64>() / spots.len() as f64
        };
        Self {
            spots,
            filling_factor,
        }
    }

    /// The spots in this field.
    pub fn spots(&self) -> &[Spot] {
        &self.spots
    }

    /// Number of spots in the field.
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    /// Whether the field holds no spots.
    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    /// The per-spot maximum area used for the whole population.
    pub fn filling_factor(&self) -> f64 {
        self.filling_factor
    }
}
