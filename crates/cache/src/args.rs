//! Hashable descriptions of the arguments to a cached function

// standard library
use std::fmt;
use std::path::{Path, PathBuf};

// external crates
use artistools_utils::f;

/// A single argument value contributing to a cache key
///
/// The key is built from the text form of every argument, so two calls hash
/// identically exactly when their arguments print identically.
///
/// ```rust
/// # use artistools_cache::CacheArg;
/// # use std::path::PathBuf;
/// let args = [
///     CacheArg::from(PathBuf::from("runs/model")),
///     CacheArg::from(12_i64),
///     CacheArg::from(None::<i64>),
/// ];
/// assert_eq!(CacheArg::tuple_string(&args), "('runs/model', 12, None)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum CacheArg {
    /// A file or directory path
    Path(PathBuf),
    /// Any string value
    Str(String),
    /// Any integer value
    Int(i64),
    /// Any floating point value
    Float(f64),
    /// A boolean flag
    Bool(bool),
    /// An unset optional value
    None,
    /// A list of values
    List(Vec<CacheArg>),
}

impl CacheArg {
    /// The path this argument refers to, if it is path-like
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(p.as_path()),
            Self::Str(s) => Some(Path::new(s)),
            _ => None,
        }
    }

    /// Text form of positional arguments, e.g. `('a', 1)`
    pub fn tuple_string(args: &[CacheArg]) -> String {
        match args {
            [single] => f!("({single},)"),
            _ => f!(
                "({})",
                args.iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<String>>()
                    .join(", ")
            ),
        }
    }

    /// Text form of keyword arguments, e.g. `{'timestep': 3}`
    pub fn dict_string(kwargs: &[(&str, CacheArg)]) -> String {
        f!(
            "{{{}}}",
            kwargs
                .iter()
                .map(|(k, v)| f!("'{k}': {v}"))
                .collect::<Vec<String>>()
                .join(", ")
        )
    }
}

impl fmt::Display for CacheArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => write!(f, "'{}'", p.display()),
            Self::Str(s) => write!(f, "'{s}'"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::None => write!(f, "None"),
            Self::List(values) => {
                let inner = values
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "[{inner}]")
            }
        }
    }
}

impl From<PathBuf> for CacheArg {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<&Path> for CacheArg {
    fn from(value: &Path) -> Self {
        Self::Path(value.to_path_buf())
    }
}

impl From<&str> for CacheArg {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for CacheArg {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for CacheArg {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<usize> for CacheArg {
    fn from(value: usize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f64> for CacheArg {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for CacheArg {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<CacheArg>> From<Option<T>> for CacheArg {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Self::None,
        }
    }
}

impl<T: Into<CacheArg> + Clone> From<&[T]> for CacheArg {
    fn from(value: &[T]) -> Self {
        Self::List(value.iter().cloned().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_text() {
        let kwargs = [("timestep", CacheArg::from(3_i64)), ("gzip", true.into())];
        assert_eq!(
            CacheArg::dict_string(&kwargs),
            "{'timestep': 3, 'gzip': True}"
        );
        assert_eq!(CacheArg::dict_string(&[]), "{}");
    }

    #[test]
    fn single_tuple_has_trailing_comma() {
        assert_eq!(CacheArg::tuple_string(&[1.5_f64.into()]), "(1.5,)");
        assert_eq!(CacheArg::tuple_string(&[]), "()");
    }

    #[test]
    fn lists_of_values() {
        let cells: &[usize] = &[1, 2];
        assert_eq!(CacheArg::from(cells).to_string(), "[1, 2]");
    }
}
