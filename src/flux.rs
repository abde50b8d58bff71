//! Rotational flux synthesis from a spot population.
//!
//! The projected area of each spot is foreshortened by the angle between the
//! spot normal and the line of sight; a spot on the far hemisphere
//! contributes nothing. Spots only dim the star, so flux contributions are
//! non-positive and add up across the population.

use std::f64::consts::TAU;

use log::debug;
use ndarray::{Array1, ArrayView1};

use crate::array_utils::{clamp_negative, peak_to_trough};
use crate::spots::SpotField;

/// Time-aligned output of the synthesizer.
///
/// The two flux series differ only when the spot periods were modulated by
/// differential rotation: `flux` uses each spot's own period, `base_flux`
/// the uninflected equatorial period.
#[derive(Clone, Debug)]
pub struct FluxModel {
    /// Timestamps in days, shifted so the first observation sits at zero.
    pub time: Array1<f64>,
    /// Cumulative projected spot area per timestamp.
    pub total_area: Array1<f64>,
    /// Flux contribution under the latitude-modulated spot periods, `<= 0`.
    pub flux: Array1<f64>,
    /// Flux contribution under the equatorial base period, `<= 0`.
    pub base_flux: Array1<f64>,
}

/// Scalar diagnostics of a synthesized flux model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FluxDiagnostics {
    /// Mean number of spots contributing at any one time.
    pub mean_spot_count: f64,
    /// Per-spot filling factor used by the generator.
    pub filling_factor: f64,
    /// Peak-to-trough amplitude of the un-normalized flux series. This will
    /// generally differ from the requested amplitude because the per-spot
    /// area scaling assumes incoherent spot phases.
    pub effective_amplitude: f64,
}

impl FluxModel {
    /// Integrate the spot population into flux series sampled at `times`.
    ///
    /// `inclination` is the angle between the rotation axis and the line of
    /// sight, in radians. Per spot and timestamp:
    /// - area decays as a Gaussian around the peak time, except that a spot
    ///   with zero peak time or zero decay timescale keeps its maximum area
    ///   for the whole series (guards the Gaussian exponent);
    /// - the foreshortening factor
    ///   `mu = cos(i) sin(lat) + sin(i) cos(lat) cos(phase)` is clamped at
    ///   zero before use;
    /// - `-area * mu` accumulates into the flux series.
    pub fn synthesize(
        field: &SpotField,
        times: ArrayView1<f64>,
        inclination: f64,
    ) -> (Self, FluxDiagnostics) {
        let tmin = times.iter().copied().fold(f64::INFINITY, f64::min);
        let time = times.mapv(|t| t - tmin);
        let n = time.len();

        let mut total_area = Array1::<f64>::zeros(n);
        let mut flux = Array1::<f64>::zeros(n);
        let mut base_flux = Array1::<f64>::zeros(n);

        let cos_i = inclination.cos();
        let sin_i = inclination.sin();

        for spot in field.spots() {
            let area = if spot.peak_time == 0.0 || spot.decay == 0.0 {
                Array1::from_elem(n, spot.peak_area)
            } else {
                time.mapv(|t| {
                    spot.peak_area
                        * (-(t - spot.peak_time).powi(2) / (2.0 * spot.decay.powi(2))).exp()
                })
            };

            let sin_lat = spot.latitude.sin();
            let cos_lat = spot.latitude.cos();
            let mut mu = time.mapv(|t| {
                let phase = TAU * t / spot.period + spot.longitude;
                cos_i * sin_lat + sin_i * cos_lat * phase.cos()
            });
            let mut base_mu = time.mapv(|t| {
                let phase = TAU * t / spot.base_period + spot.longitude;
                cos_i * sin_lat + sin_i * cos_lat * phase.cos()
            });
            clamp_negative(&mut mu);
            clamp_negative(&mut base_mu);

            total_area += &area;
            flux -= &(&area * &mu);
            base_flux -= &(&area * &base_mu);
        }

        let filling_factor = field.filling_factor();
        let mean_spot_count = if n == 0 || filling_factor == 0.0 {
            0.0
        } else {
            total_area.mean().expect("non-empty series") / filling_factor
        };
        let diagnostics = FluxDiagnostics {
            mean_spot_count,
            filling_factor,
            effective_amplitude: peak_to_trough(flux.view()),
        };
        debug!(
            "synthesized {} spots at {} samples, effective amplitude {:.4}",
            field.len(),
            n,
            diagnostics.effective_amplitude
        );

        (
            Self {
                time,
                total_area,
                flux,
                base_flux,
            },
            diagnostics,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, TAU};

    use approx::assert_abs_diff_eq;
    use ndarray::Array1;
    use ndarray_rand::RandomExt;
    use rand::distributions::Uniform;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::spots::{Spot, SpotConfig, SpotField};

    fn single_spot(latitude: f64, decay: f64, peak_time: f64) -> SpotField {
        SpotField::from_spots(vec![Spot {
            longitude: 0.0,
            latitude,
            peak_area: 0.01,
            decay,
            peak_time,
            period: 10.0,
            base_period: 10.0,
        }])
    }

    #[test]
    fn flux_is_non_positive_and_areas_non_negative() {
        let mut rng = StdRng::seed_from_u64(21);
        let config = SpotConfig {
            amplitude: 0.1,
            diff_rot: 0.3,
            ..SpotConfig::default()
        };
        let field = SpotField::generate(&config, 365.0, &mut rng);
        let times = Array1::random_using(400, Uniform::new(0.0, 365.0), &mut rng);

        let (model, _) = FluxModel::synthesize(&field, times.view(), 1.0);

        for (&a, (&f, &f0)) in model
            .total_area
            .iter()
            .zip(model.flux.iter().zip(model.base_flux.iter()))
        {
            assert!(a >= 0.0);
            assert!(f <= 0.0);
            assert!(f0 <= 0.0);
        }
    }

    #[test]
    fn edge_on_equatorial_spot_reduces_to_clamped_cosine() {
        // Edge-on star, spot at latitude zero with constant area: the
        // foreshortening factor is exactly max(cos(2 pi t / p), 0).
        let field = single_spot(0.0, 0.0, 5.0);
        let times = Array1::linspace(0.0, 20.0, 81);

        let (model, _) = FluxModel::synthesize(&field, times.view(), FRAC_PI_2);

        for (&t, &f) in model.time.iter().zip(model.flux.iter()) {
            let mu = (TAU * t / 10.0).cos().max(0.0);
            assert_abs_diff_eq!(f, -0.01 * mu, epsilon = 1e-12);
        }
    }

    #[test]
    fn zero_decay_keeps_area_constant() {
        let field = single_spot(0.3, 0.0, 7.0);
        let times = Array1::linspace(0.0, 50.0, 51);

        let (model, _) = FluxModel::synthesize(&field, times.view(), 1.0);

        for &a in &model.total_area {
            assert_abs_diff_eq!(a, 0.01);
            assert!(a.is_finite());
        }
    }

    #[test]
    fn zero_peak_time_keeps_area_constant() {
        let field = single_spot(0.3, 30.5, 0.0);
        let times = Array1::linspace(0.0, 50.0, 51);

        let (model, _) = FluxModel::synthesize(&field, times.view(), 1.0);

        for &a in &model.total_area {
            assert_abs_diff_eq!(a, 0.01);
        }
    }

    #[test]
    fn zero_differential_rotation_makes_flux_series_identical() {
        let mut rng = StdRng::seed_from_u64(33);
        let config = SpotConfig {
            diff_rot: 0.0,
            ..SpotConfig::default()
        };
        let field = SpotField::generate(&config, 365.0, &mut rng);
        let times = Array1::linspace(0.0, 365.0, 300);

        let (model, _) = FluxModel::synthesize(&field, times.view(), 1.2);

        assert_eq!(model.flux, model.base_flux);
    }

    #[test]
    fn time_axis_is_shifted_to_zero() {
        let field = single_spot(0.1, 10.0, 5.0);
        let times = ndarray::array![102.5, 100.0, 110.0];

        let (model, _) = FluxModel::synthesize(&field, times.view(), 1.0);

        assert_abs_diff_eq!(model.time[0], 2.5);
        assert_abs_diff_eq!(model.time[1], 0.0);
        assert_abs_diff_eq!(model.time[2], 10.0);
    }

    #[test]
    fn empty_times_yield_empty_model() {
        let field = single_spot(0.1, 10.0, 5.0);
        let times = Array1::<f64>::zeros(0);

        let (model, diagnostics) = FluxModel::synthesize(&field, times.view(), 1.0);

        assert!(model.flux.is_empty());
        assert_abs_diff_eq!(diagnostics.mean_spot_count, 0.0);
        assert_abs_diff_eq!(diagnostics.effective_amplitude, 0.0);
    }

    #[test]
    fn diagnostics_track_mean_spot_count() {
        // Two constant-area spots facing the observer at a pole-on
        // inclination: total area is exactly two filling factors everywhere.
        let field = SpotField::from_spots(vec![
            Spot {
                longitude: 0.0,
                latitude: FRAC_PI_2,
                peak_area: 0.01,
                decay: 0.0,
                peak_time: 0.0,
                period: 10.0,
                base_period: 10.0,
            };
            2
        ]);
        let times = Array1::linspace(0.0, 30.0, 31);

        let (_, diagnostics) = FluxModel::synthesize(&field, times.view(), 0.0);

        assert_abs_diff_eq!(diagnostics.mean_spot_count, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(diagnostics.filling_factor, 0.01);
    }
}
