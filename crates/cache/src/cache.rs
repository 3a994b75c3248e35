// standard library
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

// crate modules
use crate::args::CacheArg;
use crate::error::{Error, Result};

// external crates
use artistools_utils::{f, file_size_mib};
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Name of the cache folder created inside a model directory
pub const CACHE_FOLDER_NAME: &str = "__artistoolscache__.nosync";

/// Extended attribute asking sync clients to skip the cache folder
const IGNORE_XATTR: &str = "com.dropbox.ignored";

/// Memoize an expensive function to a file in the model directory
///
/// Build one of these for each cached function, then wrap every call in
/// [DiskCache::call] with the arguments that determine the result.
///
/// ```rust
/// # use artistools_cache::{CacheArg, DiskCache};
/// # let dir = tempfile::tempdir().unwrap();
/// let cache = DiskCache::new("estimators", "read_estimators")
///     .version("2")
///     .gzip(true)
///     .quiet(true);
///
/// let args = [CacheArg::from(dir.path())];
/// let value: Vec<f64> = cache
///     .call::<_, artistools_cache::Error, _>(&args, &[], || Ok(vec![1.0, 2.0]))
///     .unwrap();
/// assert_eq!(value, vec![1.0, 2.0]);
/// ```
#[derive(Debug, Clone)]
pub struct DiskCache {
    module: String,
    qualname: String,
    version: Option<String>,
    gzip: bool,
    quiet: bool,
    saveonly: bool,
    ignore_args: Vec<usize>,
    ignore_kwargs: Vec<String>,
    min_save_duration: Duration,
    enabled: bool,
}

impl DiskCache {
    /// Start a new cache for the function `qualname` in `module`
    pub fn new(module: &str, qualname: &str) -> Self {
        Self {
            module: module.to_string(),
            qualname: qualname.to_string(),
            version: None,
            gzip: false,
            quiet: false,
            saveonly: false,
            ignore_args: Vec::new(),
            ignore_kwargs: Vec::new(),
            min_save_duration: Duration::from_secs(1),
            enabled: true,
        }
    }

    /// Declare a version, stale entries are recomputed when this changes
    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Store entries gzip compressed
    pub fn gzip(mut self, gzip: bool) -> Self {
        self.gzip = gzip;
        self
    }

    /// Suppress the load and save messages
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Never load an existing entry, only write new ones
    pub fn saveonly(mut self, saveonly: bool) -> Self {
        self.saveonly = saveonly;
        self
    }

    /// Positional argument indices excluded from the key
    pub fn ignore_args(mut self, indices: &[usize]) -> Self {
        self.ignore_args = indices.to_vec();
        self
    }

    /// Keyword argument names excluded from the key
    pub fn ignore_kwargs(mut self, names: &[&str]) -> Self {
        self.ignore_kwargs = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Minimum run time of the function before a result is worth saving
    pub fn min_save_duration(mut self, duration: Duration) -> Self {
        self.min_save_duration = duration;
        self
    }

    /// Globally enable or bypass the cache
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Tag written alongside every stored value
    pub fn version_tag(&self) -> String {
        match &self.version {
            Some(v) if !v.is_empty() => f!("funcversion_{v}"),
            _ => "funcversion_none".to_string(),
        }
    }

    /// Directory holding the cache files for a call with these arguments
    ///
    /// This is `modelpath` if given as a keyword, otherwise the first
    /// positional directory, or the parent of the first positional file.
    pub fn cache_folder(args: &[CacheArg], kwargs: &[(&str, CacheArg)]) -> PathBuf {
        let modelpath = kwargs
            .iter()
            .find(|(k, _)| *k == "modelpath")
            .and_then(|(_, v)| v.as_path())
            .map(Path::to_path_buf)
            .or_else(|| {
                args.iter().filter_map(CacheArg::as_path).find_map(|p| {
                    if p.is_dir() {
                        Some(Some(p.to_path_buf()))
                    } else if p.is_file() {
                        Some(p.parent().map(Path::to_path_buf))
                    } else {
                        None
                    }
                })?
            })
            .unwrap_or_default();

        modelpath.join(CACHE_FOLDER_NAME)
    }

    /// Hex digest identifying a call from the function name and arguments
    pub fn key(&self, args: &[CacheArg], kwargs: &[(&str, CacheArg)]) -> String {
        let kept_args = args
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.ignore_args.contains(i))
            .map(|(_, a)| a.clone())
            .collect::<Vec<CacheArg>>();

        let kept_kwargs = kwargs
            .iter()
            .filter(|(k, _)| !self.ignore_kwargs.iter().any(|name| name == k))
            .cloned()
            .collect::<Vec<(&str, CacheArg)>>();

        let mut hasher = Sha256::new();
        hasher.update(self.module.as_bytes());
        hasher.update(self.qualname.as_bytes());
        hasher.update(CacheArg::tuple_string(&kept_args).as_bytes());
        hasher.update(CacheArg::dict_string(&kept_kwargs).as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Plain and gzipped file paths for a key
    pub fn file_paths(&self, folder: &Path, key: &str) -> (PathBuf, PathBuf) {
        let stem = f!("cached-{}.{}-{key}.tmp", self.module, self.qualname);
        (folder.join(&stem), folder.join(f!("{stem}.gz")))
    }

    /// Return the cached result for these arguments, or compute and maybe store it
    ///
    /// Any failure to load an entry is logged and treated as a miss. Results are
    /// saved when `func` took at least the minimum save duration, or when the
    /// entry on disk uses the other compression format.
    pub fn call<T, E, F>(
        &self,
        args: &[CacheArg],
        kwargs: &[(&str, CacheArg)],
        func: F,
    ) -> core::result::Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<Error>,
        F: FnOnce() -> core::result::Result<T, E>,
    {
        if !self.enabled {
            return func();
        }

        let folder = Self::cache_folder(args, kwargs);
        if folder.is_dir() {
            mark_ignored(&folder);
        }

        let key = self.key(args, kwargs);
        let (path_plain, path_gz) = self.file_paths(&folder, &key);

        let mut cached = None;
        if !self.saveonly && (path_plain.exists() || path_gz.exists()) {
            let path = match path_plain.exists() {
                true => &path_plain,
                false => &path_gz,
            };

            self.log(&f!(
                "diskcache: Loading '{}' ({:.1} MiB)...",
                path.display(),
                file_size_mib(path)
            ));

            match self.load::<T>(path) {
                Ok(value) => cached = Some(value),
                Err(e) => self.log(&f!("diskcache: Overwriting '{}' ({e})", path.display())),
            }
        }

        let (result, functime) = match cached {
            Some(value) => (value, None),
            None => {
                let start = Instant::now();
                let value = func()?;
                (value, Some(start.elapsed()))
            }
        };

        let save = match functime {
            Some(t) if self.slow_enough(t) => true,
            _ => match self.gzip {
                true => path_plain.exists(),
                false => path_gz.exists(),
            },
        };

        if save {
            self.save(&result, &folder, &path_plain, &path_gz, functime)?;
        }

        Ok(result)
    }

    fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let file = BufReader::new(File::open(path)?);

        let (value, tag): (T, String) = match path.extension().is_some_and(|e| e == "gz") {
            true => bincode::deserialize_from(MultiGzDecoder::new(file))?,
            false => bincode::deserialize_from(file)?,
        };

        let expected = self.version_tag();
        let unversioned = self.version.as_deref().map_or(true, str::is_empty);
        if tag == expected || (unversioned && !tag.starts_with("funcversion_")) {
            Ok(value)
        } else {
            Err(Error::VersionMismatch {
                path: path.display().to_string(),
                found: tag,
                expected,
            })
        }
    }

    fn save<T: Serialize>(
        &self,
        result: &T,
        folder: &Path,
        path_plain: &Path,
        path_gz: &Path,
        functime: Option<Duration>,
    ) -> Result<()> {
        std::fs::create_dir_all(folder)?;
        mark_ignored(folder);

        let target = match self.gzip {
            true => path_gz,
            false => path_plain,
        };

        // written beside the target then renamed so readers never see a partial entry
        let mut temp = tempfile::NamedTempFile::new_in(folder)?;
        let entry = (result, self.version_tag());
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            match self.gzip {
                true => {
                    let mut encoder = GzEncoder::new(&mut writer, Compression::default());
                    bincode::serialize_into(&mut encoder, &entry)?;
                    encoder.finish()?;
                }
                false => bincode::serialize_into(&mut writer, &entry)?,
            }
            writer.flush()?;
        }

        for path in [path_plain, path_gz] {
            if path != target && path.exists() {
                debug!("Removing {}", path.display());
                std::fs::remove_file(path)?;
            }
        }

        temp.persist(target)?;

        let functime = functime.map(|t| t.as_secs_f64()).unwrap_or(-1.0);
        self.log(&f!(
            "diskcache: Saved '{}' ({:.1} MiB, functime {functime:.1}s)",
            target.display(),
            file_size_mib(target)
        ));

        Ok(())
    }

    /// Results are only kept for functions that ran longer than the threshold
    fn slow_enough(&self, functime: Duration) -> bool {
        functime > self.min_save_duration
    }

    fn log(&self, message: &str) {
        if !self.quiet {
            info!("{message}");
        }
    }
}

/// Best effort, most filesystems or platforms may refuse
fn mark_ignored(folder: &Path) {
    if let Err(e) = xattr::set(folder, IGNORE_XATTR, b"1") {
        debug!("Unable to set {IGNORE_XATTR} on {}: {e}", folder.display());
    }
}
