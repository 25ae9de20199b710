//! Derived physical quantities evaluated from a fitted profile.

pub mod derived;
pub mod luminosity;

pub use derived::{
    CoolingTimeSample, Cosmology, MassProfileInput, MassProfileSample, NfwOverdensityInput,
    OverdensitySample, cooling_time, cooling_time_profile, critical_density, derive_mass_profile,
    entropy, hydrostatic_mass, nfw_overdensity_profile, shell_volume,
};
pub use luminosity::{
    BandLuminosity, angular_diameter_distance, annulus_flux, band_luminosities, luminosity,
    luminosity_distance, luminosity_partition,
};
