//! Cover art normalization.
//!
//! Every cover that goes through this module comes out as a baseline JPEG of
//! a fixed size (600×600 by default). Covers that already satisfy that are
//! passed through untouched, so repeated runs never stack JPEG generations.
//!
//! # Example
//!
//! ```ignore
//! use coverkit_core::cover::{CoverConfig, CoverNormalizer};
//!
//! let normalizer = CoverNormalizer::new(CoverConfig::default());
//! let out = normalizer.normalize(&png_bytes)?;
//! assert!(out.changed);
//! ```

mod config;
mod error;
mod normalizer;
mod sidecar;
mod types;

pub use config::CoverConfig;
pub use error::CoverError;
pub use normalizer::CoverNormalizer;
pub use sidecar::find_sidecar_cover;
pub use types::{CoverImage, CoverOrigin, ImageKind, NormalizedCover};
