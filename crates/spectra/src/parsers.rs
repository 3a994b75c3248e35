// nom parser combinators
use nom::character::complete::space0;
use nom::multi::many1;
use nom::number::complete::double;
use nom::sequence::terminated;
use nom::IResult;

// crate modules
use crate::error::{Error, Result};

/// List of consecutive doubles as a vector of f64 values
fn vector_of_f64(i: &str) -> IResult<&str, Vec<f64>> {
    many1(terminated(double, space0))(i.trim_start())
}

/// Every whitespace separated value on a line as floats
pub(crate) fn floats(line: &str) -> Result<Vec<f64>> {
    if line.trim().is_empty() {
        return Ok(Vec::new());
    }
    let (rest, values) = vector_of_f64(line)?;
    match rest.trim().is_empty() {
        true => Ok(values),
        false => Err(Error::ParseError(line.to_string())),
    }
}

/// Evenly spaced points from `start` to `stop` inclusive
pub(crate) fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_of_floats() {
        assert_eq!(floats(" 1e15 0.5 2 ").unwrap(), vec![1e15, 0.5, 2.0]);
        assert!(floats("1.0 nope").is_err());
    }

    #[test]
    fn linspace_includes_ends() {
        assert_eq!(linspace(1.0, 3.0, 3), vec![1.0, 2.0, 3.0]);
        assert_eq!(linspace(1.0, 3.0, 1), vec![1.0]);
        assert!(linspace(1.0, 3.0, 0).is_empty());
    }
}
