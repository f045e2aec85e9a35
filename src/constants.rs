//! Physical constants used in phase retrieval.
//!
//! Unit conventions follow the CGS-flavoured mix used throughout the
//! synchrotron preprocessing literature: lengths in cm, photon energies in
//! keV. Keeping the constants here, with their units, is the single place
//! where those conventions are documented.

/// Boltzmann constant [erg/K].
pub const BOLTZMANN_CONSTANT: f64 = 1.3806488e-16;

/// Speed of light [cm/s].
pub const SPEED_OF_LIGHT: f64 = 299792458e2;

/// Planck constant [keV*s].
pub const PLANCK_CONSTANT: f64 = 6.58211928e-19;

/// Pi, at the precision the reference filter tables were generated with.
pub const PI: f64 = 3.14159265359;
