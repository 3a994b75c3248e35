//! Common utilities shared by the artistools crates
//!
//! These are left public for convenience.
//!
//! For example, finding the compressed variant of an output file, looking up
//! element symbols, or integrating a spectrum are useful everywhere.

// Alias for the format! macro
pub use std::format as f;

// Modules
pub mod constants;
mod config;
mod elements;
mod error;
mod files;
mod option_ext;
mod ranges;
mod slice_ext;
mod sort_ext;
mod string_ext;
mod table;
mod value_ext;

// Flatten
pub use config::Config;
pub use elements::{
    decode_roman_numeral, get_atomic_number, get_elsymbol, get_ionstring, get_roman_numeral,
    parse_ionstring, IonNotation, ELSYMBOLS, ROMAN_NUMERALS,
};
pub use error::{Error, Result};
pub use files::{
    compression_variants, file_size_mib, firstexisting, readnoncommentline, zexists, zopen,
    zread_lines,
};
pub use option_ext::OptionExt;
pub use ranges::{match_closest_time, parse_range, parse_range_list, trim_or_pad};
pub use slice_ext::SliceExt;
pub use sort_ext::SortExt;
pub use string_ext::StringExt;
pub use table::WhitespaceTable;
pub use value_ext::ValueExt;
