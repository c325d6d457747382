//! # Nebula
//!
//! `nebula` draws animated decorative backgrounds: stacked, slowly rotating blobs whose
//! outlines pulse organically.
//!
//! The geometry and animation engine lives in [`nebula_core`] and is re-exported here.
//! A Skia painter for its frames is available as [`skia`].

pub use nebula_core::*;
pub use nebula_skia as skia;
