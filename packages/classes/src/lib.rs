#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Land-cover class taxonomy for the MapBiomas collection-10 layer.
//!
//! This crate defines the canonical class code → display name/color
//! mapping used across the landcover-map system, plus the identity of
//! the remote classification layer (asset id, band naming, supported
//! year range, map visualization palette). All other packages resolve
//! class metadata through this shared table.

use serde::{Deserialize, Serialize};

/// Asset id of the classification layer on the remote service.
pub const LAYER_ASSET: &str =
    "projects/mapbiomas-public/assets/brazil/lulc/collection10/mapbiomas_brazil_collection10_integration_v2";

/// First calendar year with a classification band.
pub const YEAR_MIN: u16 = 1985;

/// Last calendar year with a classification band.
pub const YEAR_MAX: u16 = 2024;

/// Default year offered by the interactive surfaces.
pub const YEAR_DEFAULT: u16 = 2024;

/// Lower bound of the class value range for map visualization.
pub const VIS_MIN: u8 = 0;

/// Upper bound of the class value range for map visualization.
pub const VIS_MAX: u8 = 69;

/// Palette applied to the base classification overlay (value range
/// [`VIS_MIN`]..=[`VIS_MAX`]).
pub const VIS_PALETTE: [&str; 28] = [
    "#ffffff", "#32a65e", "#1f8d49", "#7dc975", "#04381d", "#026975", "#000000", "#7a6c00",
    "#ad975a", "#519799", "#d6bc74", "#d89f5c", "#FFFFB2", "#edde8e", "#f5b3c8", "#C27BA0",
    "#db7093", "#ffefc3", "#db4d4f", "#ffa07a", "#d4271e", "#0000FF", "#2532e4", "#091077",
    "#fc8114", "#93dfe6", "#9065d0", "#d082de",
];

/// Returns the band name for a calendar year (e.g. `classification_2024`).
#[must_use]
pub fn band_name(year: u16) -> String {
    format!("classification_{year}")
}

/// Returns `true` if the layer carries a band for `year`.
#[must_use]
pub const fn year_is_supported(year: u16) -> bool {
    year >= YEAR_MIN && year <= YEAR_MAX
}

/// Display metadata for one land-cover class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassInfo {
    /// Published display name (Portuguese, as released).
    pub name: &'static str,
    /// Hex display color.
    pub color: &'static str,
}

/// Looks up the display metadata for a class code.
///
/// Covers the codes observed in the collection-10 integration layer;
/// returns `None` for anything else so callers can apply their own
/// fallback rendering.
#[must_use]
pub const fn class_info(code: u16) -> Option<ClassInfo> {
    macro_rules! info {
        ($name:literal, $color:literal) => {
            Some(ClassInfo {
                name: $name,
                color: $color,
            })
        };
    }
    match code {
        0 => info!("Não Observado", "#FFFFFF"),
        3 => info!("Formação Florestal", "#129918"),
        4 => info!("Formação Savânica", "#006400"),
        5 => info!("Mangue", "#004529"),
        9 => info!("Silvicultura", "#33A2DC"),
        11 => info!("Campo Alagado e Área Pantanosa", "#B8AF4F"),
        12 => info!("Formação Campestre", "#6A6A51"),
        15 => info!("Outras Áreas Não Florestais", "#A1FDFF"),
        18 => info!("Agricultura", "#E5E500"),
        19 => info!("Pastagem", "#FFEEAD"),
        21 => info!("Mosaico de Agricultura e Pastagem", "#F1C232"),
        24 => info!("Outras Áreas Não Vegetadas", "#A5A5A5"),
        25 => info!("Praia e Duna", "#F8A033"),
        26 => info!("Afloramento Rochoso", "#FAFAD2"),
        29 => info!("Mineração", "#FF00FF"),
        30 => info!("Área Urbana", "#FFC0CB"),
        33 => info!("Rio, Lago e Oceano", "#0000FF"),
        39 => info!("AQUICULTURA", "#6EADF0"),
        62 => info!("Outras Culturas (permanente)", "#C3B19D"),
        63 => info!("Cana", "#A0522D"),
        _ => None,
    }
}

/// Per-class area before display metadata has been resolved.
///
/// Produced by the zonal-statistics requester; enriched into a
/// [`ClassAreaRow`] by the presentation adapter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassArea {
    /// Integer class code from the classification scheme.
    pub class_code: u16,
    /// Area covered by this class inside the ROI, in hectares.
    pub area_ha: f64,
}

/// A fully resolved per-class result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAreaRow {
    /// Integer class code from the classification scheme.
    pub class_code: u16,
    /// Area covered by this class inside the ROI, in hectares.
    pub area_ha: f64,
    /// Resolved display name (generic label for unknown codes).
    pub name: String,
    /// Resolved hex display color (neutral gray for unknown codes).
    pub color: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_known_classes() {
        let forest = class_info(3).unwrap();
        assert_eq!(forest.name, "Formação Florestal");
        assert_eq!(forest.color, "#129918");

        let pasture = class_info(19).unwrap();
        assert_eq!(pasture.name, "Pastagem");
        assert_eq!(pasture.color, "#FFEEAD");
    }

    #[test]
    fn unknown_class_has_no_metadata() {
        assert_eq!(class_info(70), None);
        assert_eq!(class_info(1), None);
    }

    #[test]
    fn band_names_follow_year() {
        assert_eq!(band_name(1985), "classification_1985");
        assert_eq!(band_name(2024), "classification_2024");
    }

    #[test]
    fn year_range_is_inclusive() {
        assert!(year_is_supported(YEAR_MIN));
        assert!(year_is_supported(YEAR_MAX));
        assert!(!year_is_supported(1984));
        assert!(!year_is_supported(2025));
    }
}
