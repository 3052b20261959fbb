#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! GeoJSON normalization and region-of-interest conversion.
//!
//! User-supplied catalogs frequently carry geometry the strict 2D
//! schema of the remote classification service rejects (residual
//! altitude coordinates, loosely shaped Feature wrappers). This crate
//! repairs such input and converts any GeoJSON object into a uniform
//! [`BoundaryRegion`]: a set of labeled sub-regions plus one union
//! geometry used for clipping and zonal statistics.

pub mod convert;
pub mod normalize;

pub use convert::{BoundaryRegion, RoiRegion, to_boundary_region};
pub use normalize::normalize_geometry;

use thiserror::Error;

/// Errors from geometry normalization and the manual conversion path.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// Input is not a well-formed geometry object.
    #[error("invalid geometry: {message}")]
    Invalid {
        /// Description of what went wrong.
        message: String,
    },

    /// A `FeatureCollection` yielded no usable geometry.
    #[error("feature collection contains no usable geometry")]
    EmptyRegion,

    /// A `Feature` lacks its `geometry` member.
    #[error("feature has no geometry")]
    MissingGeometry,

    /// The `type` tag names no supported GeoJSON object.
    #[error("unsupported GeoJSON type: {type_name}")]
    UnsupportedType {
        /// The offending `type` value.
        type_name: String,
    },
}

/// Failure from the typed (primary) conversion path.
#[derive(Debug, Error)]
pub enum TypedConversionError {
    /// The `geojson`/`geo` parse or conversion rejected the input.
    #[error("GeoJSON error: {0}")]
    Geojson(#[from] geojson::Error),

    /// The collection parsed but holds no features.
    #[error("feature collection is empty")]
    Empty,

    /// A feature parsed without any geometry member.
    #[error("feature has no geometry")]
    NoGeometry,

    /// A coordinate tuple carries more than two components. The
    /// downstream schema is strictly 2D; the fallback path repairs
    /// this by truncation.
    #[error("coordinates are not strictly 2D")]
    ExtraDimensions,
}

/// Conversion failed on both the typed path and the manual fallback.
///
/// Both stage failures are kept so diagnostics can show why the strict
/// path rejected the input and why the repair path could not save it.
#[derive(Debug, Error)]
#[error("GeoJSON conversion failed: {fallback} (typed path: {primary})")]
pub struct ConversionError {
    /// Failure reported by the typed conversion path.
    pub primary: TypedConversionError,
    /// Failure reported by the manual fallback path.
    #[source]
    pub fallback: GeometryError,
}
