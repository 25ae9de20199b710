//! Deprojection of annulus-binned X-ray surface-brightness profiles.
//!
//! Radial 3-D models evaluated on spherical shells are projected onto the
//! observed annuli by [`projector::ShellProjector`]. Tabulated cooling and
//! temperature profiles enter through [`numerics::CubicSpline`]; fitted
//! parameters feed the evaluators in [`physics`].

pub mod common;
pub mod domain;
pub mod fitting;
pub mod io;
pub mod models;
pub mod numerics;
pub mod physics;
pub mod projector;
pub mod report;

pub use domain::{ExecutionMode, ProfileError, ProfileErrorCategory, ProfileResult};
pub use models::RadialModel;
pub use numerics::CubicSpline;
pub use projector::ShellProjector;
