//! Mass budget of an input model

// standard library
use std::collections::BTreeMap;
use std::fmt;

// crate modules
use crate::error::{Error, Result};
use crate::modeldata::InputModel;

// external crates
use artistools_utils::constants::{C_KMS, DAY_S, MSUN_G};
use artistools_utils::{f, get_atomic_number};
use serde::Serialize;

/// What to include in a [ModelDescription]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DescribeOptions {
    /// Restrict to a single zero-based cell
    pub cell: Option<usize>,
    /// Totals only, no species breakdown
    pub noabund: bool,
    /// Elements only, no isotopes
    pub noisotopes: bool,
}

/// Mass of one species, `Ni56`, `Ni_isosum` or `Ni`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesMass {
    /// Species label
    pub species: String,
    /// Atomic number of the species
    pub atomic_number: usize,
    /// Mass in solar masses
    pub mass_msun: f64,
    /// Fraction of the total mass
    pub massfrac: f64,
    /// Isotope sum as a fraction of the element mass, if both are known
    pub fraction_of_element: Option<f64>,
}

/// Summary of the masses in a model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelDescription {
    /// Model time in days
    pub t_model_init_days: f64,
    /// Number of shells described
    pub ncells: usize,
    /// Outer velocity in km/s
    pub vmax_kms: f64,
    /// Total mass from densities and volumes
    pub mass_msun_rho: f64,
    /// Sum of the elemental masses
    pub mass_msun_elem: f64,
    /// Sum of the isotope masses, unless excluded
    pub mass_msun_isotopes: Option<f64>,
    /// Per species masses ordered by atomic number
    pub species: Vec<SpeciesMass>,
}

/// Total and per species masses of a model, in solar masses
pub fn describe(model: &InputModel, options: &DescribeOptions) -> Result<ModelDescription> {
    let indices = match options.cell {
        Some(mgi) if mgi < model.cells.len() => vec![mgi],
        Some(mgi) => {
            return Err(Error::CellNotFound {
                cell: mgi,
                ncells: model.cells.len(),
            })
        }
        None => (0..model.cells.len()).collect(),
    };

    let masses = indices
        .iter()
        .map(|&i| model.cells[i].cellmass_grams)
        .collect::<Vec<f64>>();
    let mass_msun_rho = masses.iter().sum::<f64>() / MSUN_G;

    let mut speciesmasses: BTreeMap<String, f64> = BTreeMap::new();
    let mut mass_msun_isotopes = 0.0;
    let mut mass_msun_elem = 0.0;

    for (col, isotope) in model.isotopes.iter().enumerate() {
        if isotope.eq_ignore_ascii_case("fegroup") {
            continue;
        }

        let mass_g = indices
            .iter()
            .zip(&masses)
            .map(|(&i, m)| model.cells[i].massfractions[col] * m)
            .sum::<f64>();

        if options.noisotopes {
            continue;
        }

        let isosum = f!("{}_isosum", isotope.trim_end_matches(|c: char| c.is_ascii_digit()));
        *speciesmasses.entry(isosum).or_default() += mass_g;
        mass_msun_isotopes += mass_g / MSUN_G;
        if mass_g > 0.0 {
            speciesmasses.insert(isotope.clone(), mass_g);
        }
    }

    if let Some(abundances) = &model.abundances {
        for (col, name) in abundances.column_names()?.into_iter().enumerate() {
            let mass_g = indices
                .iter()
                .zip(&masses)
                .map(|(&i, m)| abundances.rows[i].massfraction(col + 1) * m)
                .sum::<f64>();

            mass_msun_elem += mass_g / MSUN_G;
            if mass_g > 0.0 {
                speciesmasses.insert(name.trim_start_matches("X_").to_string(), mass_g);
            }
        }
    }

    let mut species = Vec::new();
    if !options.noabund {
        for (label, mass_g) in &speciesmasses {
            if *mass_g <= 0.0 {
                continue;
            }

            let symbol = label
                .trim_end_matches("_isosum")
                .trim_end_matches(|c: char| c.is_ascii_digit());
            let fraction_of_element = match label.strip_suffix("_isosum") {
                Some(elsymb) => speciesmasses
                    .get(elsymb)
                    .filter(|m| **m > 0.0)
                    .map(|elem_mass| mass_g / elem_mass),
                None => None,
            };

            species.push(SpeciesMass {
                species: label.clone(),
                atomic_number: get_atomic_number(symbol).unwrap_or(0),
                mass_msun: mass_g / MSUN_G,
                massfrac: match mass_msun_rho > 0.0 {
                    true => mass_g / MSUN_G / mass_msun_rho,
                    false => 0.0,
                },
                fraction_of_element,
            });
        }
        species.sort_by(|a, b| {
            a.atomic_number
                .cmp(&b.atomic_number)
                .then_with(|| a.species.cmp(&b.species))
        });
    }

    Ok(ModelDescription {
        t_model_init_days: model.t_model_init_days,
        ncells: indices.len(),
        vmax_kms: model.vmax_cmps() * 1e-5,
        mass_msun_rho,
        mass_msun_elem,
        mass_msun_isotopes: (!options.noisotopes).then_some(mass_msun_isotopes),
        species,
    })
}

impl fmt::Display for ModelDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Model is defined at {} days ({:.4} seconds)",
            self.t_model_init_days,
            self.t_model_init_days * DAY_S
        )?;
        writeln!(
            f,
            "Model contains {} 1D spherical shells with vmax = {} km/s ({:.2} * c)",
            self.ncells,
            self.vmax_kms,
            self.vmax_kms / C_KMS
        )?;
        writeln!(f, "M_{:9} {:8.5} MSun (density * volume)", "tot_rho", self.mass_msun_rho)?;

        let percent = |m: f64| match self.mass_msun_rho > 0.0 {
            true => m / self.mass_msun_rho * 100.0,
            false => 0.0,
        };

        if self.mass_msun_elem > 0.0 {
            writeln!(
                f,
                "M_{:9} {:8.5} MSun ({:6.2}% of M_tot_rho)",
                "tot_elem",
                self.mass_msun_elem,
                percent(self.mass_msun_elem)
            )?;
        }

        if let Some(iso) = self.mass_msun_isotopes {
            writeln!(
                f,
                "M_{:9} {iso:8.5} MSun ({:6.2}% of M_tot_rho, but can be < 100% if stable isotopes not tracked)",
                "tot_iso",
                percent(iso)
            )?;
        }

        for s in &self.species {
            let zstr = f!("Z={}", s.atomic_number);
            let comment = match s.fraction_of_element {
                Some(frac) if frac > 1.0 + 1e-10 => f!(
                    " ({:6.2}% of element mass) ERROR! isotope sum is greater than element abundance",
                    frac * 100.0
                ),
                Some(frac) => f!(" ({:6.2}% of element mass)", frac * 100.0),
                None => String::new(),
            };
            writeln!(
                f,
                "{zstr:>5} {:9} {:.3e} Msun    massfrac {:.3e}{comment}",
                s.species, s.mass_msun, s.massfrac
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abundances::{AbundanceRow, InitialAbundances};
    use crate::modeldata::parse_modeldata;

    #[test]
    fn isotope_sums_and_fractions() {
        let text = "2\n1.0\n1 5000.0 -10.0 0.9 0.5 0.0 0.0 0.0\n2 10000.0 -11.0 0.0 0.0 0.0 0.0 0.0\n";
        let mut model = parse_modeldata(text.lines()).unwrap();
        let mut fe_ni = vec![0.0; 28];
        fe_ni[27] = 1.0;
        model.abundances = Some(InitialAbundances {
            rows: vec![
                AbundanceRow { inputcellid: 1, massfractions: fe_ni.clone() },
                AbundanceRow { inputcellid: 2, massfractions: fe_ni },
            ],
        });

        let description = describe(&model, &DescribeOptions::default()).unwrap();
        assert!((description.mass_msun_elem / description.mass_msun_rho - 1.0).abs() < 1e-12);

        let labels = description
            .species
            .iter()
            .map(|s| s.species.as_str())
            .collect::<Vec<&str>>();
        assert_eq!(labels, vec!["Ni", "Ni56", "Ni_isosum"]);

        let isosum = &description.species[2];
        let ni56_share = model.cells[0].cellmass_grams * 0.5 / model.total_mass_grams();
        assert!((isosum.fraction_of_element.unwrap() - ni56_share).abs() < 1e-12);
        assert!(description.to_string().contains("M_tot_rho"));
    }

    #[test]
    fn single_cell_must_exist() {
        let text = "1\n1.0\n1 5000.0 -10.0 0.0 0.5 0.0 0.0 0.0\n";
        let model = parse_modeldata(text.lines()).unwrap();
        let options = DescribeOptions { cell: Some(3), ..Default::default() };
        assert!(matches!(describe(&model, &options), Err(Error::CellNotFound { .. })));
    }
}
