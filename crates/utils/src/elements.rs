//! Element symbols, ion stage numerals and ion naming
//!
//! Index zero of [ELSYMBOLS] is the neutron so that the atomic number can be
//! used directly as an index. Ion stages follow the spectroscopic convention
//! where stage 1 (`I`) is the neutral atom.

// crate modules
use crate::error::{Error, Result};
use crate::{f, StringExt};

/// Element symbols indexed by atomic number
pub const ELSYMBOLS: [&str; 119] = [
    "n", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S",
    "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge",
    "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd",
    "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg",
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm",
    "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn",
    "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Roman numerals indexed by ion stage
pub const ROMAN_NUMERALS: [&str; 21] = [
    "", "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII", "XIII", "XIV",
    "XV", "XVI", "XVII", "XVIII", "XIX", "XX",
];

/// Notation used by [get_ionstring]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IonNotation {
    /// Spectroscopic notation, e.g. `Fe II`
    #[default]
    Spectral,
    /// Spectroscopic notation without the space, e.g. `FeII`
    SpectralNoSpace,
    /// Charge notation in TeX, e.g. `Fe$^{+}$`
    Charge,
}

/// Atomic number of an element symbol, ignoring case
///
/// ```rust
/// # use artistools_utils::get_atomic_number;
/// assert_eq!(get_atomic_number("Fe"), Some(26));
/// assert_eq!(get_atomic_number("CO"), Some(27));
/// assert_eq!(get_atomic_number("Xx"), None);
/// ```
pub fn get_atomic_number(elsymbol: &str) -> Option<usize> {
    let symbol = elsymbol.trim().titlecase();
    ELSYMBOLS.iter().position(|s| *s == symbol)
}

/// Element symbol for an atomic number
///
/// ```rust
/// # use artistools_utils::get_elsymbol;
/// assert_eq!(get_elsymbol(28).unwrap(), "Ni");
/// assert!(get_elsymbol(200).is_err());
/// ```
pub fn get_elsymbol(atomic_number: usize) -> Result<&'static str> {
    ELSYMBOLS
        .get(atomic_number)
        .copied()
        .ok_or(Error::AtomicNumberOutOfRange { atomic_number })
}

/// Ion stage of a roman numeral, ignoring case
///
/// ```rust
/// # use artistools_utils::decode_roman_numeral;
/// assert_eq!(decode_roman_numeral("iii"), Some(3));
/// assert_eq!(decode_roman_numeral("XXX"), None);
/// ```
pub fn decode_roman_numeral(numeral: &str) -> Option<usize> {
    let numeral = numeral.trim().to_uppercase();
    if numeral.is_empty() {
        return None;
    }
    ROMAN_NUMERALS.iter().position(|s| *s == numeral)
}

/// Roman numeral for an ion stage
pub fn get_roman_numeral(ion_stage: usize) -> Result<&'static str> {
    ROMAN_NUMERALS
        .get(ion_stage)
        .copied()
        .ok_or(Error::IonStageOutOfRange { ion_stage })
}

/// Human readable name of an ion, or of the element when no stage is given
///
/// ```rust
/// # use artistools_utils::{get_ionstring, IonNotation};
/// assert_eq!(get_ionstring(26, Some(2), IonNotation::Spectral).unwrap(), "Fe II");
/// assert_eq!(get_ionstring(26, Some(2), IonNotation::SpectralNoSpace).unwrap(), "FeII");
/// assert_eq!(get_ionstring(27, Some(1), IonNotation::Charge).unwrap(), "Co");
/// assert_eq!(get_ionstring(27, Some(2), IonNotation::Charge).unwrap(), "Co$^{+}$");
/// assert_eq!(get_ionstring(26, Some(3), IonNotation::Charge).unwrap(), "Fe$^{2{+}}$");
/// assert_eq!(get_ionstring(26, None, IonNotation::Spectral).unwrap(), "Fe");
/// ```
pub fn get_ionstring(
    atomic_number: usize,
    ion_stage: Option<usize>,
    notation: IonNotation,
) -> Result<String> {
    let elsymbol = get_elsymbol(atomic_number)?;

    let Some(ion_stage) = ion_stage else {
        return Ok(elsymbol.to_string());
    };

    Ok(match notation {
        IonNotation::Spectral => f!("{elsymbol} {}", get_roman_numeral(ion_stage)?),
        IonNotation::SpectralNoSpace => f!("{elsymbol}{}", get_roman_numeral(ion_stage)?),
        IonNotation::Charge => match ion_stage {
            0 | 1 => elsymbol.to_string(),
            2 => f!("{elsymbol}$^{{+}}$"),
            _ => f!("{elsymbol}$^{{{}{{+}}}}$", ion_stage - 1),
        },
    })
}

/// Split an ion label like `Fe II` or `fe2` into atomic number and ion stage
///
/// Either a roman numeral or an arabic ion stage may follow the symbol, and an
/// element on its own gives `None` for the stage.
///
/// ```rust
/// # use artistools_utils::parse_ionstring;
/// assert_eq!(parse_ionstring("Fe II").unwrap(), (26, Some(2)));
/// assert_eq!(parse_ionstring("ni3").unwrap(), (28, Some(3)));
/// assert_eq!(parse_ionstring("Co").unwrap(), (27, None));
/// ```
pub fn parse_ionstring(label: &str) -> Result<(usize, Option<usize>)> {
    let label = label.trim();
    let split = label
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(label.len());

    let (symbol, stage) = label.split_at(split);
    let stage = stage.trim();

    let atomic_number = get_atomic_number(symbol).ok_or_else(|| Error::UnknownElement {
        symbol: symbol.to_string(),
    })?;

    if stage.is_empty() {
        return Ok((atomic_number, None));
    }

    let ion_stage = stage
        .parse::<usize>()
        .ok()
        .or_else(|| decode_roman_numeral(stage))
        .ok_or_else(|| Error::UnknownElement {
            symbol: label.to_string(),
        })?;

    Ok((atomic_number, Some(ion_stage)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_line_up_with_atomic_numbers() {
        assert_eq!(ELSYMBOLS[1], "H");
        assert_eq!(ELSYMBOLS[26], "Fe");
        assert_eq!(ELSYMBOLS[92], "U");
        assert_eq!(ELSYMBOLS[118], "Og");
    }

    #[test]
    fn numerals_round_trip_for_every_stage() {
        for stage in 1..ROMAN_NUMERALS.len() {
            let numeral = get_roman_numeral(stage).unwrap();
            assert_eq!(decode_roman_numeral(numeral), Some(stage));
        }
    }

    #[test]
    fn unknown_ion_labels() {
        assert!(parse_ionstring("Zz II").is_err());
        assert!(parse_ionstring("Fe QQ").is_err());
    }
}
