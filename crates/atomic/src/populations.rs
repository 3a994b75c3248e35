//! Level populations in LTE for comparison with NLTE solutions

// standard library
use std::collections::{BTreeMap, BTreeSet};

// crate modules
use crate::error::{Error, Result};
use crate::levels::{find_ion, Ion, Level};

// external crates
use artistools_utils::constants::K_B_EV;
use artistools_utils::{get_elsymbol, get_roman_numeral};
use log::info;
use serde::{Deserialize, Serialize};

/// Level index used for the superlevel in NLTE population files
pub const SUPERLEVEL: i64 = -1;

/// One row of an NLTE population file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelPopulation {
    /// Timestep of the populations
    pub timestep: usize,
    /// Model grid cell
    pub modelgridindex: usize,
    /// Atomic number
    #[serde(rename = "Z")]
    pub atomic_number: usize,
    /// Ion stage, 1 for neutral
    pub ion_stage: usize,
    /// Zero-based level, or [SUPERLEVEL]
    pub level: i64,
    /// Level energy in eV
    pub energy_ev: f64,
    /// LTE population in cm^-3 computed by ARTIS
    #[serde(rename = "n_LTE")]
    pub n_lte: f64,
    /// NLTE population in cm^-3
    #[serde(rename = "n_NLTE")]
    pub n_nlte: f64,
    /// Fraction of the element population in this ion
    pub ion_popfrac: f64,
    /// Extra LTE populations relative to the ground state, by column name
    #[serde(default)]
    pub lte: BTreeMap<String, f64>,
}

/// Population of a level relative to the ground state in LTE
///
/// ```rust
/// # use artistools_atomic::{ltepop, Level};
/// let level = |energy_ev, g| Level {
///     energy_ev,
///     g,
///     transition_count: 0,
///     levelname: String::new(),
///     phixstargetlist: vec![],
///     phixstable: vec![],
/// };
/// assert_eq!(ltepop(&level(0.0, 4.0), &level(0.0, 2.0), 5000.0), 2.0);
/// assert!(ltepop(&level(1.0, 2.0), &level(0.0, 2.0), 5000.0) < 0.1);
/// ```
pub fn ltepop(level: &Level, ground: &Level, t_exc: f64) -> f64 {
    level.g / ground.g * (-(level.energy_ev - ground.energy_ev) / K_B_EV / t_exc).exp()
}

/// Partition function of an ion at an excitation temperature
pub fn partition_function(levels: &[Level], t_exc: f64) -> f64 {
    levels
        .iter()
        .map(|level| level.g * (-level.energy_ev / K_B_EV / t_exc).exp())
        .sum()
}

/// Add LTE populations relative to the ground state to each population row
///
/// Every `(name, temperature)` pair adds a column `name` to [LevelPopulation::lte].
/// A superlevel is assigned the sum over all levels above the highest
/// explicit level, and is renumbered to two above it. With `maxlevel`, a
/// superlevel starting above it is left without LTE values.
pub fn add_lte_pops(
    ions: &[Ion],
    pops: &mut [LevelPopulation],
    columntemperatures: &[(&str, f64)],
    maxlevel: Option<usize>,
) -> Result<()> {
    let groups = pops
        .iter()
        .map(|p| (p.modelgridindex, p.timestep, p.atomic_number, p.ion_stage))
        .collect::<BTreeSet<_>>();

    for (modelgridindex, timestep, atomic_number, ion_stage) in groups {
        let ion = find_ion(ions, atomic_number, ion_stage)?;
        let ground = ion.level(0)?;

        let in_group = |p: &LevelPopulation| {
            p.modelgridindex == modelgridindex
                && p.timestep == timestep
                && p.atomic_number == atomic_number
                && p.ion_stage == ion_stage
        };

        if !pops.iter().any(|p| in_group(p) && p.level == 0) {
            return Err(Error::MissingGroundState {
                atomic_number,
                ion_stage,
            });
        }

        let levelnumber_sl = pops
            .iter()
            .filter(|p| in_group(p))
            .map(|p| p.level)
            .max()
            .unwrap_or(0)
            + 1;

        for pop in pops.iter_mut().filter(|p| in_group(p)) {
            if pop.level == SUPERLEVEL {
                let superlevel_used = maxlevel.map_or(true, |m| levelnumber_sl <= m as i64);
                if superlevel_used {
                    let upper_levels = ion.levels.get(levelnumber_sl as usize..).unwrap_or_default();
                    for (name, t_exc) in columntemperatures {
                        let value = upper_levels.iter().map(|l| ltepop(l, ground, *t_exc)).sum();
                        pop.lte.insert(name.to_string(), value);
                    }
                }
                pop.level = levelnumber_sl + 2;
                continue;
            }

            let level = ion.level(pop.level as usize)?;
            for (name, t_exc) in columntemperatures {
                pop.lte.insert(name.to_string(), ltepop(level, ground, *t_exc));
            }
        }

        if pops.iter().any(|p| in_group(p) && p.level == levelnumber_sl + 2) {
            info!(
                "{} {} has a superlevel at level {levelnumber_sl}",
                get_elsymbol(atomic_number)?,
                get_roman_numeral(ion_stage)?
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(energy_ev: f64, g: f64) -> Level {
        Level {
            energy_ev,
            g,
            transition_count: 0,
            levelname: String::new(),
            phixstargetlist: vec![],
            phixstable: vec![],
        }
    }

    fn pop(level: i64) -> LevelPopulation {
        LevelPopulation {
            timestep: 5,
            modelgridindex: 0,
            atomic_number: 26,
            ion_stage: 2,
            level,
            energy_ev: 0.0,
            n_lte: 0.0,
            n_nlte: 1.0,
            ion_popfrac: 1.0,
            lte: BTreeMap::new(),
        }
    }

    #[test]
    fn superlevel_sums_upper_levels() {
        let ions = vec![Ion {
            atomic_number: 26,
            ion_stage: 2,
            level_count: 4,
            ion_pot: 16.2,
            levels: vec![level(0.0, 10.0), level(0.1, 8.0), level(1.0, 6.0), level(2.0, 4.0)],
            transitions: vec![],
        }];

        let mut pops = vec![pop(0), pop(1), pop(SUPERLEVEL)];
        add_lte_pops(&ions, &mut pops, &[("n_LTE_T_e", 6000.0)], None).unwrap();

        assert_eq!(pops[0].lte["n_LTE_T_e"], 1.0);
        let expected_sl = ltepop(&ions[0].levels[2], &ions[0].levels[0], 6000.0)
            + ltepop(&ions[0].levels[3], &ions[0].levels[0], 6000.0);
        assert!((pops[2].lte["n_LTE_T_e"] - expected_sl).abs() < 1e-15);
        assert_eq!(pops[2].level, 4);
    }

    #[test]
    fn ground_state_is_required() {
        let ions = vec![Ion {
            atomic_number: 26,
            ion_stage: 2,
            level_count: 1,
            ion_pot: 16.2,
            levels: vec![level(0.0, 10.0)],
            transitions: vec![],
        }];
        let mut pops = vec![pop(1)];
        assert!(add_lte_pops(&ions, &mut pops, &[("x", 5000.0)], None).is_err());
    }

    #[test]
    fn partition_function_is_ground_weight_when_cold() {
        let levels = vec![level(0.0, 2.0), level(5.0, 10.0)];
        assert!((partition_function(&levels, 100.0) - 2.0).abs() < 1e-12);
    }
}
