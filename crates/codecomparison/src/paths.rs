// standard library
use std::fmt;
use std::path::{Component, Path, PathBuf};

// crate modules
use crate::error::{Error, Result};

// external crates
use artistools_utils::{f, Config};

/// First component of every virtual code comparison path
pub const VIRTUAL_FOLDER: &str = "codecomparison";

/// A model computed by one code, addressed as `codecomparison/<model>/<code>`
///
/// The files live in `<codecomparison_data_path>/<model>/` and are named
/// `<kind>_<model>_<code>.txt`.
///
/// ```rust
/// # use artistools_codecomparison::CodeComparisonPath;
/// # use artistools_utils::Config;
/// let path = CodeComparisonPath::from_path("codecomparison/DDC10/artisnebular").unwrap();
/// assert_eq!(path.modelname, "DDC10");
///
/// let config = Config { codecomparison_data_path: "/data".into(), ..Default::default() };
/// assert_eq!(
///     path.file_path("phys", &config),
///     std::path::PathBuf::from("/data/DDC10/phys_DDC10_artisnebular.txt")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeComparisonPath {
    pub modelname: String,
    pub codename: String,
}

impl CodeComparisonPath {
    /// Split a virtual path into its model and code names
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let parts = path
            .components()
            .map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy().to_string()),
                _ => None,
            })
            .collect::<Option<Vec<String>>>();

        match parts.as_deref() {
            Some([folder, modelname, codename]) if folder == VIRTUAL_FOLDER => Ok(Self {
                modelname: modelname.clone(),
                codename: codename.clone(),
            }),
            _ => Err(Error::NotCodeComparisonPath(path.display().to_string())),
        }
    }

    /// Directory holding the files of every code for this model
    pub fn folder(&self, config: &Config) -> PathBuf {
        config.codecomparison_data_path.join(&self.modelname)
    }

    /// Path of one kind of file, e.g. `phys` or `spectra`
    pub fn file_path(&self, kind: &str, config: &Config) -> PathBuf {
        self.folder(config)
            .join(f!("{kind}_{}_{}.txt", self.modelname, self.codename))
    }
}

impl fmt::Display for CodeComparisonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{VIRTUAL_FOLDER}/{}/{}", self.modelname, self.codename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_three_part_virtual_paths() {
        assert!(CodeComparisonPath::from_path("codecomparison/DDC10").is_err());
        assert!(CodeComparisonPath::from_path("models/DDC10/artis").is_err());
        assert!(CodeComparisonPath::from_path("/codecomparison/DDC10/artis").is_err());

        let path = CodeComparisonPath::from_path("codecomparison/DDC10/artis").unwrap();
        assert_eq!(path.to_string(), "codecomparison/DDC10/artis");
    }
}
