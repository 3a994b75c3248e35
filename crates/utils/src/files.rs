//! File discovery and transparently decompressed reading
//!
//! Every ARTIS output file may have been compressed after a run with either
//! `xz` or `gzip`, keeping the original name plus the usual suffix. These
//! helpers hide that detail from the parsers.

// standard library
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

// crate modules
use crate::error::{Error, Result};
use crate::f;

// external crates
use flate2::read::MultiGzDecoder;
use log::trace;
use xz2::read::XzDecoder;

/// Return the first path in `dir` from a list of candidate file names
///
/// The error lists every candidate that was tried.
///
/// ```rust
/// # use artistools_utils::firstexisting;
/// let result = firstexisting(&["missing.out.xz", "missing.out"], "/nonexistent");
/// assert!(result.is_err());
/// ```
pub fn firstexisting<S, P>(names: &[S], dir: P) -> Result<PathBuf>
where
    S: AsRef<Path>,
    P: AsRef<Path>,
{
    let candidates = names
        .iter()
        .map(|name| dir.as_ref().join(name))
        .collect::<Vec<PathBuf>>();

    candidates
        .iter()
        .find(|path| path.exists())
        .cloned()
        .ok_or_else(|| Error::FileNotFound {
            candidates: candidates.iter().map(|p| p.display().to_string()).collect(),
        })
}

/// The compressed and uncompressed names of a file, in order of preference
///
/// ```rust
/// # use artistools_utils::compression_variants;
/// assert_eq!(
///     compression_variants("grid.out"),
///     ["grid.out.xz", "grid.out.gz", "grid.out"]
/// );
/// ```
pub fn compression_variants(name: &str) -> [String; 3] {
    [f!("{name}.xz"), f!("{name}.gz"), name.to_string()]
}

/// Open `path.xz`, `path.gz` or `path`, whichever exists first
///
/// A path already carrying a compression suffix is opened directly with the
/// matching decoder.
pub fn zopen<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead + Send>> {
    let path = path.as_ref();
    let name = path.display().to_string();

    let path_xz = match name.ends_with(".xz") {
        true => path.to_path_buf(),
        false => PathBuf::from(f!("{name}.xz")),
    };

    let path_gz = match name.ends_with(".gz") {
        true => path.to_path_buf(),
        false => PathBuf::from(f!("{name}.gz")),
    };

    if path_xz.exists() {
        trace!("Opening {} with xz decompression", path_xz.display());
        let file = File::open(path_xz)?;
        Ok(Box::new(BufReader::new(XzDecoder::new(file))))
    } else if path_gz.exists() {
        trace!("Opening {} with gzip decompression", path_gz.display());
        let file = File::open(path_gz)?;
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Whether `path` or one of its compressed variants exists
pub fn zexists<P: AsRef<Path>>(path: P) -> bool {
    let name = path.as_ref().display().to_string();
    compression_variants(&name)
        .iter()
        .any(|p| Path::new(p).exists())
}

/// Read a full, possibly compressed, file into a vector of lines
pub fn zread_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let reader = zopen(path)?;
    Ok(reader.lines().collect::<std::io::Result<Vec<String>>>()?)
}

/// Read the next line that is neither blank nor a `#` comment
///
/// ```rust
/// # use artistools_utils::readnoncommentline;
/// let mut lines = "# comment\n\n  42 # trailing\n".lines().map(|l| l.to_string());
/// assert_eq!(readnoncommentline(&mut lines).unwrap(), "  42 # trailing");
/// assert!(readnoncommentline(&mut lines).is_err());
/// ```
pub fn readnoncommentline<I>(lines: &mut I) -> Result<String>
where
    I: Iterator<Item = String>,
{
    lines
        .find(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .ok_or(Error::UnexpectedEndOfFile)
}

/// Size of a file in MiB for log messages, zero when unavailable
pub fn file_size_mib<P: AsRef<Path>>(path: P) -> f64 {
    std::fs::metadata(path)
        .map(|m| m.len() as f64 / 1024.0 / 1024.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    #[test]
    fn zopen_prefers_compressed_variant() {
        let dir = tempfile::tempdir().unwrap();

        std::fs::write(dir.path().join("data.txt"), "plain\n").unwrap();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"gzipped\n").unwrap();
        std::fs::write(dir.path().join("data.txt.gz"), encoder.finish().unwrap()).unwrap();

        let lines = zread_lines(dir.path().join("data.txt")).unwrap();
        assert_eq!(lines, vec!["gzipped".to_string()]);
        assert!(zexists(dir.path().join("data.txt")));
    }

    #[test]
    fn firstexisting_returns_first_match() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("grid.out"), "").unwrap();
        std::fs::write(dir.path().join("grid.out.gz"), "").unwrap();

        let found = firstexisting(&compression_variants("grid.out"), dir.path()).unwrap();
        assert_eq!(found, dir.path().join("grid.out.gz"));
    }

    #[test]
    fn firstexisting_error_lists_candidates() {
        let dir = tempfile::tempdir().unwrap();
        match firstexisting(&["a.txt", "b.txt"], dir.path()) {
            Err(Error::FileNotFound { candidates }) => assert_eq!(candidates.len(), 2),
            other => panic!("unexpected result {other:?}"),
        }
    }
}
