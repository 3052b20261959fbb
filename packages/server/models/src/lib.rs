#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the landcover map server.
//!
//! These types are serialized to JSON for the REST API consumed by the
//! map frontend. They are separate from the domain types so the API
//! contract can evolve independently.

use std::collections::BTreeMap;

use landcover_map_classes::ClassAreaRow;
use landcover_map_presentation::ChartSlice;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `GET /api/health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Always `true` when the server can respond.
    pub healthy: bool,
    /// Server crate version.
    pub version: String,
}

/// `GET /api/years` response: the selectable year range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiYears {
    /// First year with a classification band.
    pub min: u16,
    /// Last year with a classification band.
    pub max: u16,
    /// Year preselected by the frontend.
    #[serde(rename = "default")]
    pub default_year: u16,
}

/// Visualization parameters for a classification overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVisParams {
    /// Lower bound of the class value range.
    pub min: u8,
    /// Upper bound of the class value range.
    pub max: u8,
    /// Palette applied across the value range.
    pub palette: Vec<String>,
}

/// A classification layer overlay descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLayer {
    /// Asset id on the remote service.
    pub asset: String,
    /// Band name for the selected year.
    pub band: String,
    /// Visualization parameters.
    pub vis: ApiVisParams,
}

/// Query parameters for the base layer endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerQueryParams {
    /// Calendar year; defaults to the newest band.
    pub year: Option<u16>,
}

/// `POST /api/analyze` request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// ROI name as listed by `GET /api/regions`.
    pub region: String,
    /// Calendar year to analyze.
    pub year: u16,
}

/// A per-class result row as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiClassArea {
    /// Integer class code.
    pub class_code: u16,
    /// Resolved class display name.
    pub name: String,
    /// Resolved hex display color.
    pub color: String,
    /// Area in hectares.
    pub area_ha: f64,
}

impl From<ClassAreaRow> for ApiClassArea {
    fn from(row: ClassAreaRow) -> Self {
        Self {
            class_code: row.class_code,
            name: row.name,
            color: row.color,
            area_ha: row.area_ha,
        }
    }
}

/// ROI outline overlay: boundary contour only, transparent interior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOutline {
    /// The ROI sub-regions as a GeoJSON `FeatureCollection`.
    pub geometry: Value,
    /// Stroke color.
    pub color: String,
    /// Fill color (RGBA hex; fully transparent).
    pub fill_color: String,
}

/// Clipped classification overlay: the base layer restricted to the
/// ROI boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiClippedLayer {
    /// Asset id on the remote service.
    pub asset: String,
    /// Band name for the selected year.
    pub band: String,
    /// Clip boundary as a GeoJSON geometry.
    pub boundary: Value,
    /// Visualization parameters.
    pub vis: ApiVisParams,
}

/// `POST /api/analyze` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAnalysis {
    /// Echo of the analyzed region name.
    pub region: String,
    /// Echo of the analyzed year.
    pub year: u16,
    /// `true` when the remote service reported no groups (ROI outside
    /// data coverage, or all no-data pixels). Not an error.
    pub no_data: bool,
    /// Human-readable notice accompanying a no-data result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Result rows, sorted by descending area.
    pub rows: Vec<ApiClassArea>,
    /// Class name → hex color, shared by both charts.
    pub color_map: BTreeMap<String, String>,
    /// Chart-ready series in row order.
    pub series: Vec<ChartSlice>,
    /// ROI outline overlay.
    pub outline: ApiOutline,
    /// Clipped classification overlay.
    pub clipped: ApiClippedLayer,
}

/// Error body returned by any failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable description of the failure.
    pub error: String,
}
