use crate::common::constants::{
    GRAVITATIONAL_CONSTANT, HUBBLE_CONSTANT, HYDROGEN_PER_ELECTRON,
    HYDROSTATIC_MASS_COEFFICIENT, KEV_TO_ERG, KPC, MOLECULAR_WEIGHT_PER_ELECTRON, MPC,
    OMEGA_MATTER, PI, PROTON_MASS, SECONDS_PER_GYR, SOLAR_MASS,
};
use crate::domain::{ProfileError, ProfileResult};
use crate::models::{RadialModel, nfw_mass_enclosed};
use crate::numerics::{CubicSpline, geometric_grid, log_slope};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cosmology {
    /// Hubble constant in s^-1.
    pub hubble_constant: f64,
    pub omega_matter: f64,
    pub omega_lambda: f64,
}

impl Default for Cosmology {
    fn default() -> Self {
        Self {
            hubble_constant: HUBBLE_CONSTANT,
            omega_matter: OMEGA_MATTER,
            omega_lambda: 1.0 - OMEGA_MATTER,
        }
    }
}

impl Cosmology {
    pub fn hubble_parameter(&self, redshift: f64) -> f64 {
        let scale = (1.0 + redshift).powi(3);
        self.hubble_constant * (self.omega_matter * scale + self.omega_lambda).sqrt()
    }
}

/// Critical density `3H(z)^2 / (8 pi G)` in g cm^-3.
pub fn critical_density(redshift: f64, cosmology: &Cosmology) -> f64 {
    let hubble = cosmology.hubble_parameter(redshift);
    3.0 * hubble * hubble / (8.0 * PI * GRAVITATIONAL_CONSTANT)
}

/// Volume between two concentric spheres.
pub fn shell_volume(r0: f64, r1: f64) -> f64 {
    4.0 / 3.0 * PI * (r1 - r0) * (r1 * r1 + r0 * r0 + r0 * r1)
}

/// Hydrostatic total mass in solar masses at `r` (cm), from temperatures in keV
/// and electron densities sampled at `r` and `r1`.
pub fn hydrostatic_mass(
    r: f64,
    r1: f64,
    density: f64,
    density1: f64,
    temperature: f64,
    temperature1: f64,
) -> Option<f64> {
    let temperature_slope = log_slope(r, r1, temperature, temperature1)?;
    let density_slope = log_slope(r, r1, density, density1)?;
    Some(-HYDROSTATIC_MASS_COEFFICIENT * temperature * (r / MPC) * (temperature_slope + density_slope))
}

/// Entropy `T / n^(2/3)` in keV cm^2.
pub fn entropy(temperature: f64, density: f64) -> Option<f64> {
    if density <= 0.0 {
        return None;
    }
    Some(temperature / density.powf(2.0 / 3.0))
}

/// Isobaric cooling time in seconds with `n_H = 1.2 n_e`.
///
/// `lambda` is the volume emissivity coefficient in erg cm^3 s^-1.
pub fn cooling_time(density: f64, temperature: f64, lambda: f64) -> Option<f64> {
    if density <= 0.0 || lambda <= 0.0 {
        return None;
    }
    let hydrogen = density * HYDROGEN_PER_ELECTRON;
    Some(1.5 * (density + hydrogen) * KEV_TO_ERG * temperature / (density * hydrogen * lambda))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoolingTimeSample {
    pub radius_kpc: f64,
    pub density: f64,
    pub cooling_time_gyr: Option<f64>,
}

/// Cooling times for `(radius_kpc, n_e)` rows.
///
/// `temperature` (keV) and `cooling_function` are splines over kpc. The
/// cooling function is tabulated as a flux per unit emission measure and is
/// converted with `lambda = cf * 4 pi D_L^2`.
pub fn cooling_time_profile(
    rows: &[(f64, f64)],
    temperature: &CubicSpline,
    cooling_function: &CubicSpline,
    luminosity_distance: f64,
) -> ProfileResult<Vec<CoolingTimeSample>> {
    let area = 4.0 * PI * luminosity_distance * luminosity_distance;
    rows.iter()
        .map(|&(radius_kpc, density)| {
            let lambda = cooling_function.evaluate(radius_kpc)? * area;
            let seconds = cooling_time(density, temperature.evaluate(radius_kpc)?, lambda);
            Ok(CoolingTimeSample {
                radius_kpc,
                density,
                cooling_time_gyr: seconds.map(|value| value / SECONDS_PER_GYR),
            })
        })
        .collect()
}

pub const DEFAULT_START_PIXEL: f64 = 1.0;
pub const DEFAULT_RELATIVE_STEP: f64 = 0.01;

#[derive(Debug, Clone, Copy)]
pub struct MassProfileInput<'a> {
    pub model: &'a RadialModel,
    /// Model parameters without the background.
    pub params: &'a [f64],
    /// Temperature in keV over pixel radii.
    pub temperature: &'a CubicSpline,
    pub cm_per_pixel: f64,
    pub redshift: f64,
    pub r_start_pixel: f64,
    pub r_max_pixel: f64,
    pub relative_step: f64,
    pub cosmology: Cosmology,
}

impl<'a> MassProfileInput<'a> {
    pub fn new(
        model: &'a RadialModel,
        params: &'a [f64],
        temperature: &'a CubicSpline,
        cm_per_pixel: f64,
        redshift: f64,
        r_max_pixel: f64,
    ) -> Self {
        Self {
            model,
            params,
            temperature,
            cm_per_pixel,
            redshift,
            r_start_pixel: DEFAULT_START_PIXEL,
            r_max_pixel,
            relative_step: DEFAULT_RELATIVE_STEP,
            cosmology: Cosmology::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MassProfileSample {
    pub radius_kpc: f64,
    pub density: f64,
    pub temperature_kev: f64,
    /// Gas mass in solar masses accumulated through the shell starting at this radius.
    pub gas_mass: f64,
    pub total_mass: Option<f64>,
    pub overdensity: Option<f64>,
    pub entropy: Option<f64>,
}

fn validate_mass_profile_input(input: &MassProfileInput<'_>) -> ProfileResult<()> {
    let positive = [
        ("cm_per_pixel", input.cm_per_pixel),
        ("r_start_pixel", input.r_start_pixel),
        ("r_max_pixel", input.r_max_pixel),
        ("relative_step", input.relative_step),
    ];
    for (name, value) in positive {
        if !value.is_finite() || value <= 0.0 {
            return Err(ProfileError::input_validation(
                "INPUT.MASS_PROFILE",
                format!("{name} must be finite and > 0, got {value}"),
            ));
        }
    }
    if input.redshift <= -1.0 || !input.redshift.is_finite() {
        return Err(ProfileError::input_validation(
            "INPUT.MASS_PROFILE",
            format!("redshift must be finite and > -1, got {}", input.redshift),
        ));
    }
    Ok(())
}

/// Gas density, enclosed gas mass, hydrostatic mass, over-density and entropy
/// on a geometric radius grid.
pub fn derive_mass_profile(input: &MassProfileInput<'_>) -> ProfileResult<Vec<MassProfileSample>> {
    validate_mass_profile_input(input)?;
    let grid = geometric_grid(input.r_start_pixel, input.r_max_pixel, input.relative_step)
        .unwrap_or_default();
    let rho_critical = critical_density(input.redshift, &input.cosmology);
    let factor = 1.0 + input.relative_step;
    let gas_mass_per_electron = MOLECULAR_WEIGHT_PER_ELECTRON * PROTON_MASS / SOLAR_MASS;

    let mut gas_mass = 0.0;
    let mut samples = Vec::with_capacity(grid.len());
    for r in grid {
        let r1 = r * factor;
        let r_cm = r * input.cm_per_pixel;
        let r1_cm = r1 * input.cm_per_pixel;

        let density = input.model.density_at(r, input.params)?;
        let density1 = input.model.density_at(r1, input.params)?;
        let temperature = input.temperature.evaluate(r)?;
        let temperature1 = input.temperature.evaluate(r1)?;

        gas_mass += shell_volume(r_cm, r1_cm) * (density + density1) / 2.0 * gas_mass_per_electron;
        let total_mass = hydrostatic_mass(r_cm, r1_cm, density, density1, temperature, temperature1);
        let overdensity = total_mass.map(|mass| {
            mass * SOLAR_MASS / (4.0 / 3.0 * PI * r_cm * r_cm * r_cm) / rho_critical
        });

        samples.push(MassProfileSample {
            radius_kpc: r_cm / KPC,
            density,
            temperature_kev: temperature,
            gas_mass,
            total_mass,
            overdensity,
            entropy: entropy(temperature, density),
        });
    }

    debug!(samples = samples.len(), "derived mass profile");
    Ok(samples)
}

pub const DEFAULT_OVERDENSITY_FLOOR: f64 = 100.0;
pub const MAX_OVERDENSITY_SAMPLES: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NfwOverdensityInput {
    /// Characteristic density in g cm^-3.
    pub rho0: f64,
    /// Scale radius in cm.
    pub rs_cm: f64,
    pub redshift: f64,
    pub r_start_kpc: f64,
    pub step_kpc: f64,
    /// Stepping stops after the first sample below this over-density.
    pub floor: f64,
    pub cosmology: Cosmology,
}

impl NfwOverdensityInput {
    pub fn new(rho0: f64, rs_cm: f64, redshift: f64) -> Self {
        Self {
            rho0,
            rs_cm,
            redshift,
            r_start_kpc: 1.0,
            step_kpc: 1.0,
            floor: DEFAULT_OVERDENSITY_FLOOR,
            cosmology: Cosmology::default(),
        }
    }

    fn validate(&self) -> ProfileResult<()> {
        let positive = [
            ("rho0", self.rho0),
            ("rs_cm", self.rs_cm),
            ("r_start_kpc", self.r_start_kpc),
            ("step_kpc", self.step_kpc),
            ("floor", self.floor),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ProfileError::input_validation(
                    "INPUT.NFW_OVERDENSITY",
                    format!("{name} must be finite and > 0, got {value}"),
                ));
            }
        }
        if self.redshift <= -1.0 || !self.redshift.is_finite() {
            return Err(ProfileError::input_validation(
                "INPUT.NFW_OVERDENSITY",
                format!("redshift must be finite and > -1, got {}", self.redshift),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverdensitySample {
    pub radius_kpc: f64,
    /// Enclosed NFW mass in solar masses.
    pub enclosed_mass: f64,
    /// Mean density inside the radius in g cm^-3.
    pub mean_density: f64,
    pub overdensity: f64,
}

/// Steps outward from `r_start_kpc` and reports the NFW enclosed mass and mean
/// over-density at each radius. The sample that first falls below `floor` is
/// the last one returned.
pub fn nfw_overdensity_profile(input: &NfwOverdensityInput) -> ProfileResult<Vec<OverdensitySample>> {
    input.validate()?;
    let rho_critical = critical_density(input.redshift, &input.cosmology);

    let mut samples = Vec::new();
    for step in 0..MAX_OVERDENSITY_SAMPLES {
        let radius_kpc = input.r_start_kpc + input.step_kpc * step as f64;
        let r_cm = radius_kpc * KPC;
        let mass = nfw_mass_enclosed(r_cm, input.rho0, input.rs_cm);
        let mean_density = mass / (4.0 / 3.0 * PI * r_cm * r_cm * r_cm);
        let overdensity = mean_density / rho_critical;
        samples.push(OverdensitySample {
            radius_kpc,
            enclosed_mass: mass / SOLAR_MASS,
            mean_density,
            overdensity,
        });
        if overdensity < input.floor {
            debug!(samples = samples.len(), radius_kpc, "NFW over-density fell below floor");
            return Ok(samples);
        }
    }

    Err(ProfileError::computation(
        "RUN.NFW_OVERDENSITY",
        format!(
            "over-density stayed above {} for {MAX_OVERDENSITY_SAMPLES} steps",
            input.floor
        ),
    ))
}
