//! Transformations of an input model that conserve mass

// crate modules
use crate::error::{Error, Result};
use crate::modeldata::InputModel;

// external crates
use artistools_utils::constants::MSUN_G;
use artistools_utils::f;
use log::info;

/// How to scale the velocities of a model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VelocityScale {
    /// Multiply every velocity by a factor
    Velocity(f64),
    /// Multiply the kinetic energy by a factor, velocities by its square root
    KineticEnergy(f64),
}

impl VelocityScale {
    /// Factor applied to the velocities
    pub fn velscale(&self) -> f64 {
        match self {
            Self::Velocity(v) => *v,
            Self::KineticEnergy(ke) => ke.sqrt(),
        }
    }

    /// Factor applied to the kinetic energy
    pub fn kescale(&self) -> f64 {
        match self {
            Self::Velocity(v) => v * v,
            Self::KineticEnergy(ke) => *ke,
        }
    }
}

/// Scale the shell velocities while keeping each shell mass unchanged
///
/// ```rust
/// # use artistools_inputmodel::{parse_modeldata, scale_velocity, VelocityScale};
/// let mut model = parse_modeldata("1\n1.0\n1 1000.0 -10.0 0 1 0 0 0".lines()).unwrap();
/// let mass = model.total_mass_grams();
/// scale_velocity(&mut model, VelocityScale::KineticEnergy(4.0)).unwrap();
///
/// assert_eq!(model.cells[0].velocity_outer, 2000.0);
/// assert!((model.total_mass_grams() / mass - 1.0).abs() < 1e-12);
/// ```
pub fn scale_velocity(model: &mut InputModel, scale: VelocityScale) -> Result<()> {
    let velscale = scale.velscale();
    if !(velscale.is_finite() && velscale > 0.0) {
        return Err(Error::InvalidScaleFactor(velscale));
    }

    info!(
        "Applying velocity factor of {velscale} (kinetic energy factor {}) and conserving shell masses",
        scale.kescale()
    );

    let t_seconds = model.t_model_init_seconds();
    for cell in &mut model.cells {
        cell.velocity_inner *= velscale;
        cell.velocity_outer *= velscale;
        cell.logrho = (cell.cellmass_grams / cell.volume(t_seconds)).log10();
    }
    model.update_cell_masses();

    Ok(())
}

/// Replace every mass fraction by its mass-weighted average over the model
///
/// Isotope and elemental abundances are both mixed. Returns the global mass
/// fraction of each column, isotopes first.
pub fn fully_mix(model: &mut InputModel) -> Result<Vec<(String, f64)>> {
    let masses = model
        .cells
        .iter()
        .map(|c| c.cellmass_grams)
        .collect::<Vec<f64>>();
    let model_mass_grams = masses.iter().sum::<f64>();
    info!("model mass: {:.3} Msun", model_mass_grams / MSUN_G);

    let global = |fractions: &mut dyn Iterator<Item = f64>| -> (f64, f64) {
        let integrated = fractions.zip(&masses).map(|(x, m)| x * m).sum::<f64>();
        let massfrac = match model_mass_grams > 0.0 {
            true => integrated / model_mass_grams,
            false => 0.0,
        };
        (massfrac, integrated)
    };

    let mut mixed = Vec::new();
    for (i, name) in model.isotopes.iter().enumerate() {
        let (massfrac, integrated) = global(&mut model.cells.iter().map(|c| c.massfractions[i]));
        info!(
            "{:>13}: {massfrac:.3}  ({:.3} Msun)",
            isotope_column(name),
            integrated / MSUN_G
        );
        mixed.push((isotope_column(name), massfrac));
    }

    for (i, (_, massfrac)) in mixed.iter().enumerate() {
        for cell in &mut model.cells {
            cell.massfractions[i] = *massfrac;
        }
    }

    if let Some(abundances) = &mut model.abundances {
        if abundances.rows.len() != masses.len() {
            return Err(Error::AbundanceCountMismatch {
                cells: masses.len(),
                abundances: abundances.rows.len(),
            });
        }

        let names = abundances.column_names()?;
        for (i, name) in names.into_iter().enumerate() {
            let z = i + 1;
            let (massfrac, integrated) =
                global(&mut abundances.rows.iter().map(|r| r.massfraction(z)));
            info!("{name:>13}: {massfrac:.3}  ({:.3} Msun)", integrated / MSUN_G);

            for row in &mut abundances.rows {
                if row.massfractions.len() <= i {
                    row.massfractions.resize(i + 1, 0.0);
                }
                row.massfractions[i] = massfrac;
            }
            mixed.push((name, massfrac));
        }
    }

    Ok(mixed)
}

fn isotope_column(isotope: &str) -> String {
    f!("X_{isotope}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abundances::{AbundanceRow, InitialAbundances};
    use crate::modeldata::parse_modeldata;

    fn model() -> InputModel {
        let text = "\
2
1.0
1 5000.0 -10.0 0.0 1.0 0.0 0.0 0.0
2 10000.0 -11.0 0.0 0.0 0.0 0.0 0.0
";
        parse_modeldata(text.lines()).unwrap()
    }

    #[test]
    fn mixing_conserves_species_mass() {
        let mut model = model();
        let ni56_before = model
            .cells
            .iter()
            .map(|c| c.massfractions[1] * c.cellmass_grams)
            .sum::<f64>();

        model.abundances = Some(InitialAbundances {
            rows: vec![
                AbundanceRow { inputcellid: 1, massfractions: vec![1.0] },
                AbundanceRow { inputcellid: 2, massfractions: vec![0.0, 1.0] },
            ],
        });

        let mixed = fully_mix(&mut model).unwrap();
        let ni56_after = model
            .cells
            .iter()
            .map(|c| c.massfractions[1] * c.cellmass_grams)
            .sum::<f64>();

        assert!((ni56_after / ni56_before - 1.0).abs() < 1e-12);
        assert_eq!(model.cells[0].massfractions, model.cells[1].massfractions);
        assert_eq!(mixed[1].0, "X_Ni56");

        let abundances = model.abundances.unwrap();
        let x_h = abundances.rows[0].massfraction(1);
        let x_he = abundances.rows[1].massfraction(2);
        assert_eq!(abundances.rows[1].massfraction(1), x_h);
        assert!((x_h + x_he - 1.0).abs() < 1e-12);
    }

    #[test]
    fn nonpositive_scale_is_rejected() {
        let mut model = model();
        assert!(scale_velocity(&mut model, VelocityScale::Velocity(0.0)).is_err());
        assert!(scale_velocity(&mut model, VelocityScale::KineticEnergy(-1.0)).is_err());
    }
}
