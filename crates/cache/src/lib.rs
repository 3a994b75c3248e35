//! Disk-backed memoization of expensive readers
#![doc = include_str!("../readme.md")]

mod args;
mod cache;
mod entries;
mod error;

#[doc(inline)]
pub use args::CacheArg;

#[doc(inline)]
pub use cache::{DiskCache, CACHE_FOLDER_NAME};

#[doc(inline)]
pub use entries::{cache_entries, clear_cache, CacheEntry};

#[doc(inline)]
pub use error::{Error, Result};
