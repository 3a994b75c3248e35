//! Emission line spectra of single ions from level populations

// standard library
use std::collections::BTreeMap;

// crate modules
use crate::error::Result;
use crate::levels::Ion;

// external crates
use artistools_utils::constants::{C_KMS, HC_EV_ANGSTROM, K_B_EV};
use artistools_utils::f;
use serde::{Deserialize, Serialize};

/// Wavelength grid and line broadening of a synthetic ion spectrum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSpectrumOptions {
    /// Lower wavelength limit in Angstroms
    pub xmin: f64,
    /// Upper wavelength limit in Angstroms
    pub xmax: f64,
    /// Gaussian velocity width in km/s
    pub sigma_v: f64,
    /// Half width of each line profile in units of sigma
    pub gaussian_window: f64,
    /// Keep permitted lines as well as forbidden ones
    pub include_permitted: bool,
}

impl Default for LineSpectrumOptions {
    fn default() -> Self {
        Self {
            xmin: 3500.0,
            xmax: 8000.0,
            sigma_v: 5500.0,
            gaussian_window: 3.0,
            include_permitted: false,
        }
    }
}

impl LineSpectrumOptions {
    /// Wavelength bin width, roughly a thousandth of the range but at least 1 Angstrom
    pub fn plot_resolution(&self) -> f64 {
        ((self.xmax - self.xmin) / 1000.0).trunc().max(1.0)
    }

    /// Range of line centres that can contribute inside `[xmin, xmax]`
    pub fn wide_range(&self) -> (f64, f64) {
        let spread = self.gaussian_window * self.sigma_v / C_KMS;
        (self.xmin * (1.0 - spread), self.xmax * (1.0 + spread))
    }

    /// Bin wavelengths from `xmin` up to but excluding `xmax`
    pub fn xvalues(&self) -> Vec<f64> {
        let resolution = self.plot_resolution();
        let count = ((self.xmax - self.xmin) / resolution).ceil().max(0.0) as usize;
        (0..count)
            .map(|i| self.xmin + i as f64 * resolution)
            .collect()
    }
}

/// A line with the level data needed to weight it by population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineTransition {
    /// Zero-based lower level
    pub lower: usize,
    /// Zero-based upper level
    pub upper: usize,
    /// Vacuum wavelength in Angstroms
    pub lambda_angstroms: f64,
    /// Einstein A coefficient in s^-1
    #[serde(rename = "A")]
    pub a: f64,
    /// Energy of the lower level in eV
    pub lower_energy_ev: f64,
    /// Energy of the upper level in eV
    pub upper_energy_ev: f64,
    /// Statistical weight of the upper level
    pub upper_g: f64,
    /// Magnetic dipole or electric quadrupole transition
    pub forbidden: bool,
    /// Emitted power per upper level population, (E_upper - E_lower) * A
    pub flux_factor: f64,
}

/// Lines of an ion that can contribute to the wavelength range, sorted by wavelength
pub fn get_line_transitions(ion: &Ion, options: &LineSpectrumOptions) -> Result<Vec<LineTransition>> {
    let (lambda_min, lambda_max) = options.wide_range();

    let mut lines = Vec::new();
    for transition in &ion.transitions {
        if !(transition.forbidden || options.include_permitted) {
            continue;
        }

        let lower = ion.level(transition.lower)?;
        let upper = ion.level(transition.upper)?;
        let delta_e = upper.energy_ev - lower.energy_ev;
        if delta_e <= 0.0 {
            continue;
        }

        let lambda_angstroms = HC_EV_ANGSTROM / delta_e;
        if lambda_angstroms < lambda_min || lambda_angstroms > lambda_max {
            continue;
        }

        lines.push(LineTransition {
            lower: transition.lower,
            upper: transition.upper,
            lambda_angstroms,
            a: transition.a,
            lower_energy_ev: lower.energy_ev,
            upper_energy_ev: upper.energy_ev,
            upper_g: upper.g,
            forbidden: transition.forbidden,
            flux_factor: delta_e * transition.a,
        });
    }

    lines.sort_by(|a, b| a.lambda_angstroms.total_cmp(&b.lambda_angstroms));
    Ok(lines)
}

/// Column name used for upper level LTE populations at a temperature
pub fn upper_pop_lte_column(t_exc: f64) -> String {
    f!("upper_pop_lte_{t_exc:.0}K")
}

/// Upper level populations of each line assuming LTE within the ion
///
/// `ionpop` is the total ion population and `ltepartfunc` the partition
/// function at `t_exc`.
pub fn add_upper_lte_pop(
    lines: &[LineTransition],
    t_exc: f64,
    ionpop: f64,
    ltepartfunc: f64,
) -> Vec<f64> {
    let scalefactor = ionpop / ltepartfunc;
    lines
        .iter()
        .map(|line| scalefactor * line.upper_g * (-line.upper_energy_ev / K_B_EV / t_exc).exp())
        .collect()
}

/// Upper level populations of each line from known level populations
///
/// Levels missing from `levelpops` are treated as empty.
pub fn upper_pops_from_levels(lines: &[LineTransition], levelpops: &BTreeMap<usize, f64>) -> Vec<f64> {
    lines
        .iter()
        .map(|line| levelpops.get(&line.upper).copied().unwrap_or(0.0))
        .collect()
}

/// Sum Gaussian line profiles on the wavelength grid of `options`
///
/// Each line contributes `flux_factor * upper_pop` spread over a window of
/// `gaussian_window` sigma either side of its centre.
///
/// ```rust
/// # use artistools_atomic::{generate_ion_spectrum, LineSpectrumOptions, LineTransition};
/// let options = LineSpectrumOptions::default();
/// let line = LineTransition {
///     lower: 0,
///     upper: 1,
///     lambda_angstroms: 5000.0,
///     a: 1.0,
///     lower_energy_ev: 0.0,
///     upper_energy_ev: 2.48,
///     upper_g: 1.0,
///     forbidden: true,
///     flux_factor: 2.48,
/// };
/// let xvalues = options.xvalues();
/// let flux = generate_ion_spectrum(&[line], &[1.0], &xvalues, &options);
/// let peak = flux.iter().cloned().fold(0.0, f64::max);
/// assert_eq!(flux[(5000.0 - options.xmin) as usize / 4], peak);
/// ```
pub fn generate_ion_spectrum(
    lines: &[LineTransition],
    upper_pops: &[f64],
    xvalues: &[f64],
    options: &LineSpectrumOptions,
) -> Vec<f64> {
    let resolution = options.plot_resolution();
    let mut yvalues = vec![0.0; xvalues.len()];

    for (line, upper_pop) in lines.iter().zip(upper_pops) {
        let flux = line.flux_factor * upper_pop;

        let centre_index = ((line.lambda_angstroms - options.xmin) / resolution).round() as i64;
        let sigma_angstroms = line.lambda_angstroms * options.sigma_v / C_KMS;
        let sigma_gridpoints = (sigma_angstroms / resolution).ceil() as i64;
        let window = (options.gaussian_window * sigma_gridpoints as f64) as i64;

        let window_left = (centre_index - window).max(0) as usize;
        let window_right = (centre_index + window).clamp(0, xvalues.len() as i64) as usize;

        for x in window_left..window_right {
            let offset = (x as i64 - centre_index) as f64 * resolution / sigma_angstroms;
            yvalues[x] += flux * (-offset.powi(2)).exp() / sigma_angstroms;
        }
    }

    yvalues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::{Level, Transition};

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

    fn ion() -> Ion {
        let transition = |lower, upper, forbidden| Transition {
            lower,
            upper,
            a: 0.5,
            collstr: -1.0,
            forbidden,
        };
        Ion {
            atomic_number: 26,
            ion_stage: 2,
            level_count: 4,
            ion_pot: 16.2,
            levels: vec![
                level(0.0, 10.0),
                level(HC_EV_ANGSTROM / 5000.0, 4.0),
                level(HC_EV_ANGSTROM / 7000.0, 6.0),
                level(HC_EV_ANGSTROM / 100.0, 2.0),
            ],
            transitions: vec![
                transition(0, 1, true),
                transition(0, 2, false),
                transition(0, 3, true),
            ],
        }
    }

    #[test]
    fn only_forbidden_lines_in_range() {
        let options = LineSpectrumOptions::default();
        let lines = get_line_transitions(&ion(), &options).unwrap();
        assert_eq!(lines.len(), 1);
        assert!((lines[0].lambda_angstroms - 5000.0).abs() < 1e-9);

        let options = LineSpectrumOptions {
            include_permitted: true,
            ..options
        };
        let lines = get_line_transitions(&ion(), &options).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].lambda_angstroms < lines[1].lambda_angstroms);
    }

    #[test]
    fn default_grid() {
        let options = LineSpectrumOptions::default();
        assert_eq!(options.plot_resolution(), 4.0);
        let xvalues = options.xvalues();
        assert_eq!(xvalues.len(), 1125);
        assert_eq!(xvalues[0], 3500.0);
    }

    #[test]
    fn upper_lte_pops_sum_to_ion_pop() {
        let ion = ion();
        let t_exc = 8000.0;
        let options = LineSpectrumOptions {
            include_permitted: true,
            ..Default::default()
        };
        let lines = get_line_transitions(&ion, &options).unwrap();
        let partfunc = crate::populations::partition_function(&ion.levels[..3], t_exc);
        let pops = add_upper_lte_pop(&lines, t_exc, 1.0, partfunc);

        let ground = 10.0 / partfunc;
        let total = ground + pops.iter().sum::<f64>();
        assert!((total - 1.0).abs() < 1e-12);
        assert_eq!(upper_pop_lte_column(t_exc), "upper_pop_lte_8000K");
    }

    #[test]
    fn flux_is_conserved_away_from_edges() {
        let options = LineSpectrumOptions {
            sigma_v: 1000.0,
            ..Default::default()
        };
        let lines = get_line_transitions(&ion(), &options).unwrap();
        let xvalues = options.xvalues();
        let flux = generate_ion_spectrum(&lines, &[1.0], &xvalues, &options);

        // profile exp(-x^2)/sigma integrates to sqrt(pi)
        let integral = flux.iter().sum::<f64>() * options.plot_resolution();
        let expected = lines[0].flux_factor * std::f64::consts::PI.sqrt();
        assert!((integral / expected - 1.0).abs() < 1e-3);
    }
}
