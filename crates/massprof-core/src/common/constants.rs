//! Physical and astronomical constants shared by the models and evaluators.
//!
//! All values are cgs unless the name says otherwise.

pub const PI: f64 = std::f64::consts::PI;

/// Gravitational constant, cm^3 g^-1 s^-2.
pub const GRAVITATIONAL_CONSTANT: f64 = 6.673e-8;
/// Proton mass, g.
pub const PROTON_MASS: f64 = 1.672_621_58e-24;
/// Solar mass, g.
pub const SOLAR_MASS: f64 = 1.988_92e33;
/// keV to erg.
pub const KEV_TO_ERG: f64 = 1.602_176_46e-9;

pub const KPC: f64 = 3.086e21;
pub const MPC: f64 = KPC * 1000.0;

/// Mean molecular weight used in the hydrostatic NFW gas-density model.
pub const MEAN_MOLECULAR_WEIGHT: f64 = 1.4074;
/// Mean molecular weight per electron used for gas masses.
pub const MOLECULAR_WEIGHT_PER_ELECTRON: f64 = 1.155;
/// Hydrogen-to-electron density factor used for cooling times.
pub const HYDROGEN_PER_ELECTRON: f64 = 1.2;

/// Coefficient of the hydrostatic mass estimator, in solar masses per keV per Mpc.
pub const HYDROSTATIC_MASS_COEFFICIENT: f64 = 3.68e13;

/// Hubble constant used by the critical-density helper, s^-1.
pub const HUBBLE_CONSTANT: f64 = 2.3e-18;
pub const OMEGA_MATTER: f64 = 0.27;

/// Detector pixel size in arcseconds.
pub const PIXEL_ARCSEC: f64 = 0.492;

pub const SECONDS_PER_GYR: f64 = 24.0 * 3600.0 * 365.0 * 1.0e9;
