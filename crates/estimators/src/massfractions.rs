//! Element mass fractions from estimator populations

// standard library
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::estimators::{get_cell_estimators, read_estimators};
use crate::estimfile::Estimators;

// external crates
use artistools_model::{get_composition_data, CompositionEntry};
use artistools_utils::{get_elsymbol, Config};
use log::{info, warn};

/// Mass fraction of every element with a population in a cell
///
/// Number densities are weighted by the atomic masses of the composition.
pub fn get_massfractions(
    estimators: &Estimators,
    composition: &[CompositionEntry],
) -> Result<BTreeMap<usize, f64>> {
    let elmass = composition
        .iter()
        .map(|el| (el.atomic_number, el.mass))
        .collect::<BTreeMap<usize, f64>>();

    let numberdens = estimators
        .element_values
        .get("populations")
        .cloned()
        .unwrap_or_default();

    let mut totaldens = 0.0;
    for (atomic_number, dens) in &numberdens {
        let mass = elmass
            .get(atomic_number)
            .ok_or(Error::MissingElementMass(*atomic_number))?;
        totaldens += dens * mass;
    }

    Ok(numberdens
        .iter()
        .map(|(atomic_number, dens)| (*atomic_number, dens * elmass[atomic_number] / totaldens))
        .collect())
}

/// Write the mass fractions of cells at a timestep
///
/// Each cell starts with a `{tdays}d shell {modelgridindex}` line followed by
/// one `Z symbol massfraction` line per element.
pub fn exportmassfractions<P: AsRef<Path>, Q: AsRef<Path>>(
    modelpath: P,
    timestep: usize,
    modelgridindices: &[usize],
    outputpath: Q,
    config: &Config,
) -> Result<()> {
    let modelpath = modelpath.as_ref();
    let composition = get_composition_data(modelpath)?;

    let cells = modelgridindices.iter().map(|&m| m as i64).collect::<Vec<i64>>();
    let estimators = read_estimators(modelpath, &[timestep], &cells, config)?;

    let mut f = BufWriter::new(File::create(outputpath.as_ref())?);
    for &modelgridindex in modelgridindices {
        let cell = get_cell_estimators(&estimators, timestep, modelgridindex)?;
        let tdays = cell.tdays.unwrap_or(f64::NAN);
        let massfracs = get_massfractions(cell, &composition)?;

        writeln!(f, "{tdays:?}d shell {modelgridindex}")?;
        for (atomic_number, massfrac) in &massfracs {
            writeln!(f, "{atomic_number} {} {massfrac:?}", get_elsymbol(*atomic_number)?)?;
        }

        let massfracsum = massfracs.values().sum::<f64>();
        if (massfracsum - 1.0).abs() > 1e-6 {
            warn!("Mass fractions of cell {modelgridindex} sum to {massfracsum}");
        }
    }
    f.flush()?;

    info!("Saved {}", outputpath.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(atomic_number: usize, mass: f64) -> CompositionEntry {
        CompositionEntry {
            atomic_number,
            nions: 1,
            lowermost_ionstage: 1,
            uppermost_ionstage: 1,
            nlevelsmax_readin: -1,
            abundance: 0.0,
            mass,
            startindex: 0,
        }
    }

    #[test]
    fn mass_weighted_fractions() {
        let mut estimators = Estimators::default();
        estimators
            .element_values
            .insert("populations".into(), BTreeMap::from([(8, 2.0), (26, 1.0)]));

        let composition = [element(8, 16.0), element(26, 56.0)];
        let massfracs = get_massfractions(&estimators, &composition).unwrap();
        assert!((massfracs[&8] - 32.0 / 88.0).abs() < 1e-12);
        assert!((massfracs.values().sum::<f64>() - 1.0).abs() < 1e-12);

        assert!(get_massfractions(&estimators, &composition[..1]).is_err());
    }
}
