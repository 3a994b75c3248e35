//! Integration tests for cached calls in a temporary model directory

use std::cell::Cell;
use std::path::Path;
use std::time::Duration;

use artistools_cache::{CacheArg, DiskCache, Error, CACHE_FOLDER_NAME};
use rstest::{fixture, rstest};
use tempfile::TempDir;

#[fixture]
fn modeldir() -> TempDir {
    tempfile::tempdir().unwrap()
}

fn cache() -> DiskCache {
    DiskCache::new("tests", "expensive")
        .quiet(true)
        .min_save_duration(Duration::ZERO)
}

fn call_counted(cache: &DiskCache, dir: &Path, counter: &Cell<u32>, value: f64) -> Vec<f64> {
    cache
        .call::<_, Error, _>(&[CacheArg::from(dir), 3_i64.into()], &[], || {
            counter.set(counter.get() + 1);
            std::thread::sleep(Duration::from_millis(2));
            Ok(vec![value, value * 2.0])
        })
        .unwrap()
}

fn entry_paths(cache: &DiskCache, dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let args = [CacheArg::from(dir), 3_i64.into()];
    let key = cache.key(&args, &[]);
    cache.file_paths(&dir.join(CACHE_FOLDER_NAME), &key)
}

#[rstest]
fn second_call_is_loaded(modeldir: TempDir) {
    let counter = Cell::new(0);
    let first = call_counted(&cache(), modeldir.path(), &counter, 1.5);
    let second = call_counted(&cache(), modeldir.path(), &counter, 99.0);

    assert_eq!(counter.get(), 1);
    assert_eq!(first, second);
    assert_eq!(second, vec![1.5, 3.0]);
}

#[rstest]
fn version_bump_recomputes(modeldir: TempDir) {
    let counter = Cell::new(0);
    call_counted(&cache().version("1"), modeldir.path(), &counter, 1.0);
    call_counted(&cache().version("1"), modeldir.path(), &counter, 1.0);
    let bumped = call_counted(&cache().version("2"), modeldir.path(), &counter, 5.0);

    assert_eq!(counter.get(), 2);
    assert_eq!(bumped, vec![5.0, 10.0]);
}

#[rstest]
fn unversioned_entries_without_tag_prefix_are_reused(modeldir: TempDir) {
    let (plain, _) = entry_paths(&cache(), modeldir.path());
    std::fs::create_dir_all(plain.parent().unwrap()).unwrap();
    let legacy = (vec![7.0_f64, 8.0], "legacy".to_string());
    std::fs::write(&plain, bincode::serialize(&legacy).unwrap()).unwrap();

    let counter = Cell::new(0);
    let value = call_counted(&cache(), modeldir.path(), &counter, 1.0);
    assert_eq!(counter.get(), 0);
    assert_eq!(value, vec![7.0, 8.0]);

    // a function with a declared version never accepts it
    let value = call_counted(&cache().version("1"), modeldir.path(), &counter, 1.0);
    assert_eq!(counter.get(), 1);
    assert_eq!(value, vec![1.0, 2.0]);
}

#[rstest]
fn compression_is_switched_on_load(modeldir: TempDir) {
    let counter = Cell::new(0);
    let (plain, gz) = entry_paths(&cache(), modeldir.path());

    call_counted(&cache(), modeldir.path(), &counter, 1.0);
    assert!(plain.exists() && !gz.exists());

    // a slow threshold shows the switch does not depend on timing
    let gzipped = cache().gzip(true).min_save_duration(Duration::from_secs(3600));
    call_counted(&gzipped, modeldir.path(), &counter, 1.0);
    assert_eq!(counter.get(), 1);
    assert!(!plain.exists() && gz.exists());

    let value = call_counted(&gzipped, modeldir.path(), &counter, 1.0);
    assert_eq!(counter.get(), 1);
    assert_eq!(value, vec![1.0, 2.0]);
}

#[rstest]
fn fast_functions_are_not_saved(modeldir: TempDir) {
    let counter = Cell::new(0);
    let slow_threshold = cache().min_save_duration(Duration::from_secs(3600));
    call_counted(&slow_threshold, modeldir.path(), &counter, 1.0);
    call_counted(&slow_threshold, modeldir.path(), &counter, 1.0);

    assert_eq!(counter.get(), 2);
    assert!(!modeldir.path().join(CACHE_FOLDER_NAME).exists());
}

#[rstest]
fn disabled_cache_always_calls(modeldir: TempDir) {
    let counter = Cell::new(0);
    let disabled = cache().enabled(false);
    call_counted(&disabled, modeldir.path(), &counter, 1.0);
    call_counted(&disabled, modeldir.path(), &counter, 1.0);

    assert_eq!(counter.get(), 2);
    assert!(!modeldir.path().join(CACHE_FOLDER_NAME).exists());
}

#[rstest]
fn corrupt_entry_is_overwritten(modeldir: TempDir) {
    let (plain, _) = entry_paths(&cache(), modeldir.path());
    std::fs::create_dir_all(plain.parent().unwrap()).unwrap();
    std::fs::write(&plain, b"not a cache entry").unwrap();

    let counter = Cell::new(0);
    let value = call_counted(&cache(), modeldir.path(), &counter, 4.0);
    assert_eq!(counter.get(), 1);
    assert_eq!(value, vec![4.0, 8.0]);

    call_counted(&cache(), modeldir.path(), &counter, 4.0);
    assert_eq!(counter.get(), 1);
}

#[rstest]
fn saveonly_never_loads(modeldir: TempDir) {
    let counter = Cell::new(0);
    call_counted(&cache().saveonly(true), modeldir.path(), &counter, 1.0);
    call_counted(&cache().saveonly(true), modeldir.path(), &counter, 1.0);
    assert_eq!(counter.get(), 2);
}

#[rstest]
#[case(&[1], 2_i64, 3_i64, true)] // ignored argument changes
#[case(&[], 2_i64, 3_i64, false)] // key argument changes
fn ignored_arguments_share_entries(
    modeldir: TempDir,
    #[case] ignored: &[usize],
    #[case] first: i64,
    #[case] second: i64,
    #[case] shared: bool,
) {
    let counter = Cell::new(0);
    let cache = cache().ignore_args(ignored);
    for arg in [first, second] {
        cache
            .call::<_, Error, _>(&[CacheArg::from(modeldir.path()), arg.into()], &[], || {
                counter.set(counter.get() + 1);
                std::thread::sleep(Duration::from_millis(2));
                Ok(arg)
            })
            .unwrap();
    }

    let expected = match shared {
        true => 1,
        false => 2,
    };
    assert_eq!(counter.get(), expected);
}
