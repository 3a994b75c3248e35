//! Analytical decay chain energy deposition from the initial model

// crate modules
use crate::error::{Error, Result};

// external crates
use artistools_inputmodel::InputModel;
use artistools_utils::constants::{AMU_G, DAY_S, LSUN_ERG_S, MEV_TO_ERG};
use log::info;
use serde::{Deserialize, Serialize};

/// Mean life of Ni56 in days
pub const MEANLIFE_NI56_DAYS: f64 = 8.8;

/// Mean life of Co56 in days
pub const MEANLIFE_CO56_DAYS: f64 = 113.7;

/// Atomic mass of Co56 in atomic mass units
const CO56_MASS_AMU: f64 = 55.939_839_3;

/// Fraction of Co56 decays that emit a positron
const CO56_POSITRON_FRACTION: f64 = 0.19;

/// Mean positron kinetic energy of Co56 decay in MeV
const CO56_POSITRON_ENERGY_MEV: f64 = 0.610;

/// Positron deposition in one zone of the model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneDeposition {
    /// Index of the zone in the model
    pub zone: usize,
    /// Inner velocity in km/s
    pub velocity_inner: f64,
    /// Outer velocity in km/s
    pub velocity_outer: f64,
    /// Deposited positron power in erg/s
    pub power: f64,
    /// Deposited power per volume in erg/s/cm^3
    pub epsilon: f64,
}

/// Positron deposition of a whole model at one time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositronDeposition {
    /// Time in days
    pub timedays: f64,
    pub zones: Vec<ZoneDeposition>,
}

impl PositronDeposition {
    /// Total deposited power in erg/s
    pub fn global_posdep(&self) -> f64 {
        self.zones.iter().map(|z| z.power).sum()
    }

    /// Total deposited power in solar luminosities
    pub fn global_posdep_lsun(&self) -> f64 {
        self.global_posdep() / LSUN_ERG_S
    }
}

/// Evolve a parent, daughter, granddaughter chain forward by `tlate` days
///
/// For example Ni56 -> Co56 -> Fe56, where `meanlife1_days` belongs to the
/// parent and `meanlife2_days` to the daughter. The inputs may be abundances
/// or masses, and the results are in the same units.
///
/// ```rust
/// # use artistools_spectra::forward_doubledecay;
/// let (ni, co, fe) = forward_doubledecay(1.0, 0.0, 0.0, 50.0, 8.8, 113.7).unwrap();
/// assert!((ni + co + fe - 1.0).abs() < 1e-12);
/// assert!(co > fe && co > ni);
/// ```
pub fn forward_doubledecay(
    iso1fract0: f64,
    iso2fract0: f64,
    iso3fract0: f64,
    tlate: f64,
    meanlife1_days: f64,
    meanlife2_days: f64,
) -> Result<(f64, f64, f64)> {
    if tlate <= 0.0 {
        return Err(Error::NonPositiveDecayTime(tlate));
    }

    let lamb1 = 1.0 / meanlife1_days;
    let lamb2 = 1.0 / meanlife2_days;
    let exp1 = (-lamb1 * tlate).exp();
    let exp2 = (-lamb2 * tlate).exp();

    let iso1fraclate = iso1fract0 * exp1;

    let iso2fraclate = iso2fract0 * exp2 + iso1fract0 * lamb1 / (lamb1 - lamb2) * (exp2 - exp1);

    let iso3fromdecay = ((iso1fract0 + iso2fract0) * (lamb1 - lamb2)
        - iso2fract0 * lamb1 * exp2
        + iso2fract0 * lamb2 * exp2
        - iso1fract0 * lamb1 * exp2
        + iso1fract0 * lamb2 * exp1)
        / (lamb1 - lamb2);

    Ok((iso1fraclate, iso2fraclate, iso3fract0 + iso3fromdecay))
}

/// Co56 positron power deposited locally at `timedays`
///
/// Assumes every positron deposits its kinetic energy where it is emitted,
/// and uses only the Ni56 and Co56 of the initial model.
pub fn analytical_positron_deposition(model: &InputModel, timedays: f64) -> Result<PositronDeposition> {
    let index_ni56 = model
        .isotope_index("Ni56")
        .ok_or_else(|| Error::MissingIsotope("Ni56".to_string()))?;
    let index_co56 = model
        .isotope_index("Co56")
        .ok_or_else(|| Error::MissingIsotope("Co56".to_string()))?;

    let t_init_seconds = model.t_model_init_seconds();
    let t_now_seconds = timedays * DAY_S;
    info!("t_now = {timedays} d");

    let mut zones = Vec::with_capacity(model.cells.len());
    for (zone, cell) in model.cells.iter().enumerate() {
        let mass_init = cell.rho() * cell.volume(t_init_seconds);
        let mni56_init = cell.massfractions[index_ni56] * mass_init;
        let mco56_init = cell.massfractions[index_co56] * mass_init;

        let (_, mco56_now, _) = forward_doubledecay(
            mni56_init,
            mco56_init,
            0.0,
            timedays - model.t_model_init_days,
            MEANLIFE_NI56_DAYS,
            MEANLIFE_CO56_DAYS,
        )?;

        let power = CO56_POSITRON_FRACTION * CO56_POSITRON_ENERGY_MEV * MEV_TO_ERG
            * (mco56_now / (CO56_MASS_AMU * AMU_G))
            / (MEANLIFE_CO56_DAYS * DAY_S);
        let epsilon = power / cell.volume(t_now_seconds);

        info!(
            "zone {zone:3}, velocity = [{:8.2}, {:8.2}] km/s, epsilon = {epsilon:.3e} erg/s/cm3",
            cell.velocity_inner, cell.velocity_outer
        );

        zones.push(ZoneDeposition {
            zone,
            velocity_inner: cell.velocity_inner,
            velocity_outer: cell.velocity_outer,
            power,
            epsilon,
        });
    }

    let deposition = PositronDeposition { timedays, zones };
    info!("Global posdep: {:.3e} Lsun", deposition.global_posdep_lsun());
    Ok(deposition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_needs_positive_time() {
        assert!(matches!(
            forward_doubledecay(1.0, 0.0, 0.0, 0.0, 8.8, 113.7),
            Err(Error::NonPositiveDecayTime(_))
        ));
    }

    #[test]
    fn daughter_only_decays_exponentially() {
        let (ni, co, fe) = forward_doubledecay(0.0, 1.0, 0.0, 113.7, 8.8, 113.7).unwrap();
        assert_eq!(ni, 0.0);
        assert!((co - (-1.0_f64).exp()).abs() < 1e-12);
        assert!((fe - (1.0 - (-1.0_f64).exp())).abs() < 1e-12);
    }
}
