//! `artistools` is a modular toolkit for post-processing the output of the
//! ARTIS Monte Carlo radiative transfer code
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use artistools_utils as utils;

#[cfg(feature = "atomic")]
#[cfg_attr(docsrs, doc(cfg(feature = "atomic")))]
#[doc(inline)]
pub use artistools_atomic as atomic;

#[cfg(feature = "cache")]
#[cfg_attr(docsrs, doc(cfg(feature = "cache")))]
#[doc(inline)]
pub use artistools_cache as cache;

#[cfg(feature = "codecomparison")]
#[cfg_attr(docsrs, doc(cfg(feature = "codecomparison")))]
#[doc(inline)]
pub use artistools_codecomparison as codecomparison;

#[cfg(feature = "estimators")]
#[cfg_attr(docsrs, doc(cfg(feature = "estimators")))]
#[doc(inline)]
pub use artistools_estimators as estimators;

#[cfg(feature = "inputmodel")]
#[cfg_attr(docsrs, doc(cfg(feature = "inputmodel")))]
#[doc(inline)]
pub use artistools_inputmodel as inputmodel;

#[cfg(feature = "model")]
#[cfg_attr(docsrs, doc(cfg(feature = "model")))]
#[doc(inline)]
pub use artistools_model as model;

#[cfg(feature = "spectra")]
#[cfg_attr(docsrs, doc(cfg(feature = "spectra")))]
#[doc(inline)]
pub use artistools_spectra as spectra;
