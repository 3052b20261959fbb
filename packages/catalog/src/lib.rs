#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Local ROI polygon catalog.
//!
//! The catalog is a single static GeoJSON `FeatureCollection` file in
//! which each feature is expected to carry a `Name` string property and
//! a geometry. It is loaded once per process through [`CatalogCache`]
//! and treated as immutable thereafter.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde_json::Value;
use thiserror::Error;

/// Default catalog location, overridable via `ROI_CATALOG_PATH`.
pub const DEFAULT_CATALOG_PATH: &str = "data/rois.geojson";

/// Errors that can occur while loading the ROI catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file does not exist.
    #[error("ROI catalog not found: {path}")]
    NotFound {
        /// The path that was probed.
        path: String,
    },

    /// The catalog is valid JSON but not a `FeatureCollection`.
    #[error("ROI catalog must be a FeatureCollection, found type {found:?}")]
    Schema {
        /// The top-level `type` value actually found.
        found: String,
    },

    /// The catalog is not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading the catalog file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The parsed, immutable ROI catalog.
#[derive(Debug, Clone)]
pub struct RegionCatalog {
    features: Vec<Value>,
}

impl RegionCatalog {
    /// Loads and validates the catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the file does not exist,
    /// [`CatalogError::Schema`] if the top-level object is not a
    /// `FeatureCollection`, or a JSON/I/O variant for unreadable input.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::NotFound {
                path: path.display().to_string(),
            });
        }
        let raw = std::fs::read_to_string(path)?;
        let data: Value = serde_json::from_str(&raw)?;
        let catalog = Self::from_value(&data)?;
        log::info!(
            "Loaded {} ROI features from {}",
            catalog.features.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Builds a catalog from an already-parsed JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Schema`] if the top-level object is not
    /// a `FeatureCollection`.
    pub fn from_value(data: &Value) -> Result<Self, CatalogError> {
        let top_type = data.get("type").and_then(Value::as_str).unwrap_or("");
        if top_type != "FeatureCollection" {
            return Err(CatalogError::Schema {
                found: top_type.to_string(),
            });
        }
        let features = data
            .get("features")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(Self { features })
    }

    /// Selectable region names, in ascending lexicographic order.
    ///
    /// Features lacking a `Name` string property (or carrying an empty
    /// one) are skipped silently. Duplicate names in the source are
    /// preserved here; [`Self::find_by_name`] resolves the first match,
    /// so the later duplicates are unreachable by name — a property of
    /// the source data model, kept as-is.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .features
            .iter()
            .filter_map(feature_name)
            .map(ToString::to_string)
            .collect();
        names.sort();
        names
    }

    /// Returns the first feature whose `Name` property matches exactly
    /// (case-sensitive), or `None`.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Value> {
        self.features
            .iter()
            .find(|feature| feature_name(feature) == Some(name))
    }

    /// Number of features in the catalog (named or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns `true` if the catalog holds no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn feature_name(feature: &Value) -> Option<&str> {
    feature
        .get("properties")
        .and_then(|props| props.get("Name"))
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
}

/// Once-per-process memoized catalog load.
///
/// Owned by the binary's shared state and passed by reference to
/// consumers; after the first successful load for a path, subsequent
/// calls return the cached catalog without touching the filesystem.
#[derive(Debug, Default)]
pub struct CatalogCache {
    slot: OnceLock<(PathBuf, RegionCatalog)>,
}

impl CatalogCache {
    /// Creates an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Returns the cached catalog, loading it on first use.
    ///
    /// The cache key is the source path of the first successful load; a
    /// later request for a different path returns the cached catalog
    /// with a warning rather than reloading.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the first load fails. Failed loads
    /// are not cached.
    pub fn get_or_load(&self, path: &Path) -> Result<&RegionCatalog, CatalogError> {
        if let Some((cached_path, catalog)) = self.slot.get() {
            if cached_path != path {
                log::warn!(
                    "ROI catalog already loaded from {}; ignoring request for {}",
                    cached_path.display(),
                    path.display()
                );
            }
            return Ok(catalog);
        }
        let catalog = RegionCatalog::load(path)?;
        let (_, cached) = self.slot.get_or_init(|| (path.to_path_buf(), catalog));
        Ok(cached)
    }
}
