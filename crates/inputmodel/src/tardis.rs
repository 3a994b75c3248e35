//! Export to the TARDIS `.csvy` model format
//!
//! A csvy file is a YAML header between `---` lines describing the fields,
//! followed by CSV rows of shell velocity, density, radiation temperature,
//! dilution factor and one column per species.

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

// crate modules
use crate::error::Result;
use crate::modeldata::InputModel;

// external crates
use artistools_utils::{f, get_atomic_number, ValueExt};
use log::info;
use serde::Serialize;

/// Which abundances to write as species columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbundanceType {
    /// Isotopes from `model.txt`, such as `Ni56`
    Nuclear,
    /// Elements from `abundances.txt`, such as `Fe`
    #[default]
    Elemental,
}

/// Settings for [write_tardis_csvy]
#[derive(Debug, Clone, PartialEq)]
pub struct TardisOptions {
    /// Radiation temperature in K for every shell
    pub temperature: f64,
    /// Dilution factor for every shell
    pub dilution_factor: f64,
    /// Nuclear or elemental species columns
    pub abundtype: AbundanceType,
    /// Drop species above this atomic number, if positive
    pub maxatomicnumber: usize,
}

impl Default for TardisOptions {
    fn default() -> Self {
        Self {
            temperature: 10000.0,
            dilution_factor: 1.0,
            abundtype: AbundanceType::Elemental,
            maxatomicnumber: 92,
        }
    }
}

#[derive(Debug, Serialize)]
struct Field {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
    desc: String,
}

impl Field {
    fn new(name: &str, unit: Option<&str>, desc: &str) -> Self {
        Self {
            name: name.to_string(),
            unit: unit.map(String::from),
            desc: desc.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DataType {
    fields: Vec<Field>,
}

#[derive(Debug, Serialize)]
struct Meta {
    name: String,
    description: String,
    model_density_time_0: String,
    model_isotope_time_0: String,
    tardis_model_config_version: String,
    datatype: DataType,
}

/// Species names and per-cell mass fractions for the requested abundances
fn species_columns(
    model: &InputModel,
    options: &TardisOptions,
) -> Result<Vec<(String, Vec<f64>)>> {
    let mut columns = match options.abundtype {
        AbundanceType::Nuclear => model
            .isotopes
            .iter()
            .enumerate()
            .filter(|(_, iso)| !iso.eq_ignore_ascii_case("fegroup"))
            .map(|(i, iso)| {
                let fractions = model.cells.iter().map(|c| c.massfractions[i]).collect();
                (iso.clone(), fractions)
            })
            .collect::<Vec<(String, Vec<f64>)>>(),
        AbundanceType::Elemental => match &model.abundances {
            Some(abundances) => abundances
                .column_names()?
                .into_iter()
                .enumerate()
                .map(|(i, name)| {
                    let fractions = abundances
                        .rows
                        .iter()
                        .map(|r| r.massfraction(i + 1))
                        .collect();
                    (name.trim_start_matches("X_").to_string(), fractions)
                })
                .collect(),
            None => Vec::new(),
        },
    };

    if options.maxatomicnumber > 0 {
        columns.retain(|(species, _)| {
            let symbol = species.trim_end_matches(|c: char| c.is_ascii_digit());
            get_atomic_number(symbol).is_some_and(|z| z <= options.maxatomicnumber)
        });
    }

    Ok(columns)
}

/// Write a model as `<outputpath>/<modelname>.csvy`, returning the file path
///
/// Elemental abundances require the model to have been read with its
/// abundances.
pub fn write_tardis_csvy<P: AsRef<Path>>(
    model: &InputModel,
    modelname: &str,
    options: &TardisOptions,
    outputpath: P,
) -> Result<PathBuf> {
    let columns = species_columns(model, options)?;
    let outputfilepath = outputpath.as_ref().join(f!("{modelname}.csvy"));

    let mut fields = vec![
        Field::new("velocity", Some("km/s"), "velocities of shell outer boundaries"),
        Field::new("density", Some("g/cm^3"), "density of shell"),
        Field::new("t_rad", Some("K"), "radiative temperature"),
        Field::new("dilution_factor", None, "dilution factor of shell"),
    ];
    for (species, _) in &columns {
        fields.push(Field::new(species, None, &f!("fractional {species} abundance")));
    }

    let meta = Meta {
        name: modelname.to_string(),
        description: "This model was converted from ARTIS format with artistools".to_string(),
        model_density_time_0: f!("{} day", model.t_model_init_days),
        model_isotope_time_0: f!("{} day", model.t_model_init_days),
        tardis_model_config_version: "v1.0".to_string(),
        datatype: DataType { fields },
    };

    let mut writer = BufWriter::new(File::create(&outputfilepath)?);
    writeln!(writer, "---")?;
    serde_yaml::to_writer(&mut writer, &meta)?;
    writeln!(writer, "---")?;

    {
        let mut csv_writer = csv::WriterBuilder::new().from_writer(&mut writer);

        let mut header = vec!["velocity", "density", "t_rad", "dilution_factor"];
        header.extend(columns.iter().map(|(species, _)| species.as_str()));
        csv_writer.write_record(&header)?;

        for (i, cell) in model.cells.iter().enumerate() {
            let mut record = vec![
                f!("{:?}", cell.velocity_outer),
                cell.rho().sci(4, 2),
                f!("{}", options.temperature),
                f!("{}", options.dilution_factor),
            ];
            record.extend(columns.iter().map(|(_, x)| x[i].sci(4, 2)));
            csv_writer.write_record(&record)?;
        }
        csv_writer.flush()?;
    }

    writer.flush()?;
    info!("Saved {}", outputfilepath.display());
    Ok(outputfilepath)
}
