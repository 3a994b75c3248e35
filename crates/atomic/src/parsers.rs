//! Line parsers for the fixed-format atomic data files

// crate modules
use crate::error::{Error, Result};

// nom parser combinators
use nom::branch::alt;
use nom::bytes::complete::{is_not, take_till};
use nom::character::complete::{self, char, space0, space1};
use nom::multi::many1;
use nom::number::complete::double;
use nom::sequence::{delimited, preceded, terminated};
use nom::IResult;

/// A level row of adata.txt before any attached photoionisation data
#[derive(Debug, PartialEq)]
pub(crate) struct LevelRow {
    pub number: usize,
    pub energy_ev: f64,
    pub g: f64,
    pub transition_count: usize,
    pub levelname: String,
}

/// List of consecutive doubles as a vector of f64 values
pub(crate) fn vector_of_f64(i: &str) -> IResult<&str, Vec<f64>> {
    many1(terminated(double, space0))(i.trim_start())
}

/// List of consecutive signed integers as a vector of i64 values
pub(crate) fn vector_of_i64(i: &str) -> IResult<&str, Vec<i64>> {
    many1(terminated(complete::i64, space0))(i.trim_start())
}

/// Unsigned size value, trimming preceding whitespace
fn uint(i: &str) -> IResult<&str, usize> {
    let (i, v) = complete::u64(i.trim_start())?;
    Ok((i, v as usize))
}

/// Float value, trimming preceding whitespace
fn float(i: &str) -> IResult<&str, f64> {
    double(i.trim_start())
}

/// Level name, either quoted or a bare word
fn levelname(i: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('\''), take_till(|c| c == '\''), char('\'')),
        is_not(" \t"),
    ))(i)
}

/// `number energy_ev g transition_count 'levelname'`
pub(crate) fn level_row(i: &str) -> IResult<&str, LevelRow> {
    let (i, number) = uint(i)?;
    let (i, energy_ev) = float(i)?;
    let (i, g) = float(i)?;
    let (i, transition_count) = uint(i)?;
    let (i, name) = preceded(space1, levelname)(i)?;

    Ok((
        i,
        LevelRow {
            number,
            energy_ev,
            g,
            transition_count,
            levelname: name.to_string(),
        },
    ))
}

/// Every value on a line as floats
pub(crate) fn floats(line: &str) -> Result<Vec<f64>> {
    let (_, values) = vector_of_f64(line)?;
    Ok(values)
}

/// Every value on a line as integers, rejecting anything else
pub(crate) fn ints(line: &str) -> Result<Vec<i64>> {
    let (rest, values) = vector_of_i64(line)?;
    match rest.trim().is_empty() {
        true => Ok(values),
        false => Err(Error::ParseError(line.to_string())),
    }
}

/// Integer field at a position, as an unsigned value
pub(crate) fn field(values: &[i64], index: usize, what: &str) -> Result<usize> {
    values
        .get(index)
        .and_then(|v| usize::try_from(*v).ok())
        .ok_or_else(|| Error::ParseError(what.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_and_bare_level_names() {
        let (_, row) = level_row("    3  0.0481  7.0  12 '3d6(5D)4s_a6Dd[7/2]'").unwrap();
        assert_eq!(row.number, 3);
        assert_eq!(row.g, 7.0);
        assert_eq!(row.transition_count, 12);
        assert_eq!(row.levelname, "3d6(5D)4s_a6Dd[7/2]");

        let (_, row) = level_row("1 0.0 1.0 0 ground").unwrap();
        assert_eq!(row.levelname, "ground");
    }

    #[test]
    fn integer_rows() {
        assert_eq!(ints("26 2 3").unwrap(), vec![26, 2, 3]);
        assert!(ints("26 2 3.5").is_err());
        assert_eq!(field(&[26, -1], 1, "level").ok(), None);
    }
}
