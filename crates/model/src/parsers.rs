// nom parser combinators
use nom::character::complete::{self, space0};
use nom::multi::many1;
use nom::number::complete::double;
use nom::sequence::terminated;
use nom::IResult;

// crate modules
use crate::error::{Error, Result};

// external crates
use artistools_utils::f;

/// List of consecutive doubles as a vector of f64 values
pub(crate) fn vector_of_f64(i: &str) -> IResult<&str, Vec<f64>> {
    many1(terminated(double, space0))(i.trim_start())
}

/// List of consecutive signed integers as a vector of i64 values
pub(crate) fn vector_of_i64(i: &str) -> IResult<&str, Vec<i64>> {
    many1(terminated(complete::i64, space0))(i.trim_start())
}

/// Text before any trailing `#` comment
pub(crate) fn uncommented(line: &str) -> &str {
    line.split('#').next().unwrap_or_default()
}

/// Every whitespace separated value on a line as floats
pub(crate) fn floats(line: &str) -> Result<Vec<f64>> {
    if line.trim().is_empty() {
        return Ok(Vec::new());
    }
    let (rest, values) = vector_of_f64(line)?;
    match rest.trim().is_empty() {
        true => Ok(values),
        false => Err(Error::UnexpectedContent(line.to_string())),
    }
}

/// Every whitespace separated value on a line as integers
pub(crate) fn ints(line: &str) -> Result<Vec<i64>> {
    if line.trim().is_empty() {
        return Ok(Vec::new());
    }
    let (rest, values) = vector_of_i64(line)?;
    match rest.trim().is_empty() {
        true => Ok(values),
        false => Err(Error::UnexpectedContent(line.to_string())),
    }
}

/// Convert a list of values into a fixed size array
pub(crate) fn exact<T, const N: usize>(values: Vec<T>, what: &str) -> Result<[T; N]> {
    values
        .try_into()
        .map_err(|v: Vec<T>| Error::WrongNumberOfValues {
            what: what.to_string(),
            expected: N,
            found: v.len(),
        })
}

/// Convert a non-negative integer to an index
pub(crate) fn index(value: i64, what: &str) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::UnexpectedContent(f!("{what} = {value}")))
}
