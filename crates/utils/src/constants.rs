//! Physical constants and unit conversions in CGS units

/// Speed of light in cm/s
pub const C_CGS: f64 = 2.997_924_58e10;

/// Speed of light in km/s
pub const C_KMS: f64 = 2.997_924_58e5;

/// Speed of light in Angstrom/s
pub const C_ANGSTROM_PER_S: f64 = 2.997_924_58e18;

/// Planck constant in erg s
pub const H_CGS: f64 = 6.626_070_15e-27;

/// Planck constant in eV s
pub const H_EV_S: f64 = 4.135_667_696e-15;

/// Planck constant times the speed of light in eV Angstrom
pub const HC_EV_ANGSTROM: f64 = 12_398.419_843_320_026;

/// Boltzmann constant in eV/K
pub const K_B_EV: f64 = 8.617_333_262e-5;

/// One electron volt in erg
pub const EV_TO_ERG: f64 = 1.602_176_634e-12;

/// One MeV in erg
pub const MEV_TO_ERG: f64 = 1.602_176_634e-6;

/// Solar luminosity in erg/s
pub const LSUN_ERG_S: f64 = 3.828e33;

/// Solar mass in grams, as used for ARTIS model descriptions
pub const MSUN_G: f64 = 1.989e33;

/// Atomic mass unit in grams
pub const AMU_G: f64 = 1.660_539_066_60e-24;

/// Megaparsec in cm
pub const MPC_CM: f64 = 3.085_677_581_491_367e24;

/// Seconds per day
pub const DAY_S: f64 = 86_400.0;

/// Bolometric absolute magnitude of the Sun
pub const MBOL_SUN: f64 = 4.74;

/// Convert a photon energy in MeV to a frequency in Hz
///
/// ```rust
/// # use artistools_utils::constants::mev_to_hz;
/// let nu = mev_to_hz(1.0);
/// assert!((nu / 2.417989242e20 - 1.0).abs() < 1e-6);
/// ```
pub fn mev_to_hz(energy_mev: f64) -> f64 {
    energy_mev * MEV_TO_ERG / H_CGS
}

/// Convert a frequency in Hz to a wavelength in Angstroms
pub fn nu_to_angstrom(nu: f64) -> f64 {
    C_ANGSTROM_PER_S / nu
}

/// Convert a wavelength in Angstroms to a frequency in Hz
pub fn angstrom_to_nu(lambda_angstroms: f64) -> f64 {
    C_ANGSTROM_PER_S / lambda_angstroms
}

/// Convert an energy in erg to eV
pub fn erg_to_ev(energy_erg: f64) -> f64 {
    energy_erg / EV_TO_ERG
}
