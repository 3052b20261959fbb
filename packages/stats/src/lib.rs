#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Remote zonal-statistics client for the classification layer.
//!
//! All raster work (storage, reprojection, clipping, pixel
//! aggregation) happens on the remote geospatial service. This crate
//! holds the session bootstrap (credentials are minted by the hosting
//! environment, never here) and issues one area-by-class aggregation
//! request per interaction.

pub mod session;
pub mod zonal;

pub use session::EeSession;
pub use zonal::{compute_area_by_class, rows_from_groups};

use thiserror::Error;

/// Errors from session bootstrap and zonal-statistics requests.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Credentials are missing or unusable. Fatal to the process: the
    /// whole system is unusable without a session.
    #[error("authentication is not configured: {message}")]
    Authentication {
        /// Description of what is missing.
        message: String,
    },

    /// The requested year has no classification band.
    #[error("no classification band for year {year}: supported years are 1985-2024")]
    UnsupportedYear {
        /// The rejected year.
        year: u16,
    },

    /// Transport-level failure talking to the remote service.
    #[error("zonal statistics request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote service answered with a non-success status.
    #[error("zonal statistics request failed with HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body excerpt.
        message: String,
    },

    /// JSON handling failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
