use crate::common::constants::{KPC, PI, PIXEL_ARCSEC};
use crate::domain::{ProfileError, ProfileResult, RadiusPartition};
use crate::numerics::{CubicSpline, uniform_grid};
use crate::projector::ShellProjector;
use serde::Serialize;
use tracing::debug;

/// Angular-diameter distance implied by the pixel scale.
pub fn angular_diameter_distance(cm_per_pixel: f64) -> f64 {
    cm_per_pixel / (PIXEL_ARCSEC / 3600.0 / 180.0 * PI)
}

pub fn luminosity_distance(cm_per_pixel: f64, redshift: f64) -> f64 {
    angular_diameter_distance(cm_per_pixel) * (1.0 + redshift) * (1.0 + redshift)
}

/// Sum of annulus area times projected surface brightness, in pixel units.
pub fn annulus_flux(partition: &RadiusPartition, projected: &[f64]) -> f64 {
    projected
        .iter()
        .enumerate()
        .map(|(annulus, value)| partition.annulus_area(annulus) * value)
        .sum()
}

pub fn luminosity(flux: f64, luminosity_distance: f64) -> f64 {
    4.0 * PI * luminosity_distance * luminosity_distance * flux
}

/// Boundaries `0, 1 kpc, 2 kpc, ...` below `r_out_kpc`, in pixels.
pub fn luminosity_partition(r_out_kpc: f64, cm_per_pixel: f64) -> ProfileResult<RadiusPartition> {
    let step = KPC / cm_per_pixel;
    let boundaries = uniform_grid(step, r_out_kpc * KPC / cm_per_pixel).ok_or_else(|| {
        ProfileError::input_validation(
            "INPUT.LUMINOSITY_GRID",
            format!("invalid luminosity grid for r_out={r_out_kpc} kpc and cm_per_pixel={cm_per_pixel}"),
        )
    })?;
    Ok(RadiusPartition::new(boundaries)?)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandLuminosity {
    pub band: String,
    pub flux: f64,
    pub luminosity: f64,
}

/// Flux and luminosity per cooling-function band.
///
/// Each band's spline is attached to the projector in turn and the background
/// is forced to zero. The projector's previous cooling function is restored.
pub fn band_luminosities(
    projector: &mut ShellProjector,
    params: &[f64],
    partition: &RadiusPartition,
    bands: Vec<(String, CubicSpline)>,
    luminosity_distance: f64,
) -> ProfileResult<Vec<BandLuminosity>> {
    let mut band_params = params.to_vec();
    if let Some(background) = band_params.last_mut() {
        *background = 0.0;
    }

    let previous = projector.detach_cooling_function();
    let mut results = Vec::with_capacity(bands.len());
    let mut outcome = Ok(());
    for (band, spline) in bands {
        projector.attach_cooling_function(spline);
        match projector.evaluate(partition, &band_params) {
            Ok(projected) => {
                let flux = annulus_flux(partition, &projected);
                debug!(band = %band, flux, "computed band flux");
                results.push(BandLuminosity {
                    band,
                    flux,
                    luminosity: luminosity(flux, luminosity_distance),
                });
            }
            Err(error) => {
                outcome = Err(error);
                break;
            }
        }
    }

    projector.detach_cooling_function();
    if let Some(spline) = previous {
        projector.attach_cooling_function(spline);
    }
    outcome.map(|()| results)
}

#[cfg(test)]
mod tests {
    use super::{
        angular_diameter_distance, annulus_flux, band_luminosities, luminosity,
        luminosity_distance, luminosity_partition,
    };
    use crate::common::constants::{KPC, PI};
    use crate::domain::RadiusPartition;
    use crate::models::RadialModel;
    use crate::numerics::CubicSpline;
    use crate::projector::ShellProjector;

    #[test]
    fn distances_follow_pixel_scale_and_redshift() {
        let da = angular_diameter_distance(1.0);
        let expected = 1.0 / (0.492 / 3600.0 / 180.0 * PI);
        assert!((da - expected).abs() / expected < 1.0e-12);
        assert!((luminosity_distance(1.0, 1.0) - 4.0 * da).abs() / da < 1.0e-12);
    }

    #[test]
    fn flux_sums_area_weighted_annuli() {
        let partition = RadiusPartition::new(vec![0.0, 1.0, 2.0]).expect("partition");
        let flux = annulus_flux(&partition, &[2.0, 1.0]);
        assert!((flux - (2.0 * PI + 3.0 * PI)).abs() < 1.0e-12);
        assert!((luminosity(1.0, 2.0) - 16.0 * PI).abs() < 1.0e-12);
    }

    #[test]
    fn luminosity_partition_steps_one_kpc_in_pixels() {
        let partition = luminosity_partition(3.5, 0.5 * KPC).expect("partition");
        assert_eq!(partition.boundaries(), &[0.0, 2.0, 4.0, 6.0]);
        assert!(luminosity_partition(0.5, KPC).is_err());
    }

    #[test]
    fn bands_swap_cooling_functions_and_restore_the_previous_one() {
        let mut projector = ShellProjector::new(RadialModel::Beta);
        let previous = CubicSpline::natural_from_points([(0.0, 7.0), (10.0, 7.0)]).expect("spline");
        projector.attach_cooling_function(previous.clone());
        let partition = RadiusPartition::new(vec![0.0, 1.0, 2.0, 3.0]).expect("partition");
        let params = [1.0, 0.0, 100.0, 5.0];

        let unit = CubicSpline::natural_from_points([(0.0, 1.0), (10.0, 1.0)]).expect("unit");
        let double = CubicSpline::natural_from_points([(0.0, 2.0), (10.0, 2.0)]).expect("double");
        let bands = vec![("soft".to_string(), unit), ("hard".to_string(), double)];

        let results =
            band_luminosities(&mut projector, &params, &partition, bands, 1.0).expect("bands");
        assert_eq!(results.len(), 2);
        assert!((results[1].flux - 2.0 * results[0].flux).abs() <= 1.0e-12 * results[1].flux);
        // Flat unit density and unit weight: flux equals the shell volume inside r = 3.
        let sphere = 4.0 / 3.0 * PI * 27.0;
        assert!((results[0].flux - sphere).abs() / sphere < 1.0e-12);
        assert_eq!(projector.cooling_function(), Some(&previous));
    }
}
