#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chart and table shaping for per-class area results.
//!
//! Joins the area table coming back from the zonal-statistics
//! requester against the static class metadata table and produces the
//! structures the charts and the table view consume. Everything here
//! is a pure function of its inputs.

use std::collections::BTreeMap;

use landcover_map_classes::{ClassArea, ClassAreaRow, class_info};
use serde::{Deserialize, Serialize};

/// Display color for class codes missing from the metadata table.
pub const FALLBACK_COLOR: &str = "#CCCCCC";

/// Resolves display name and color for each row.
///
/// Unknown class codes still render, labeled `Classe {code}` in
/// [`FALLBACK_COLOR`]. Row order is preserved.
#[must_use]
pub fn enrich(rows: Vec<ClassArea>) -> Vec<ClassAreaRow> {
    rows.into_iter()
        .map(|row| {
            let (name, color) = class_info(row.class_code).map_or_else(
                || (format!("Classe {}", row.class_code), FALLBACK_COLOR.to_string()),
                |info| (info.name.to_string(), info.color.to_string()),
            );
            ClassAreaRow {
                class_code: row.class_code,
                area_ha: row.area_ha,
                name,
                color,
            }
        })
        .collect()
}

/// Class name → hex color, for consistent styling across the bar and
/// pie charts.
#[must_use]
pub fn color_mapping(rows: &[ClassAreaRow]) -> BTreeMap<String, String> {
    rows.iter()
        .map(|row| (row.name.clone(), row.color.clone()))
        .collect()
}

/// One chart mark: label, value, and fill color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSlice {
    /// Class display name.
    pub label: String,
    /// Area in hectares.
    pub value: f64,
    /// Hex fill color.
    pub color: String,
}

/// Chart-ready series in row order (rows arrive sorted by descending
/// area, so the series is too).
#[must_use]
pub fn chart_series(rows: &[ClassAreaRow]) -> Vec<ChartSlice> {
    rows.iter()
        .map(|row| ChartSlice {
            label: row.name.clone(),
            value: row.area_ha,
            color: row.color.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(class_code: u16, area_ha: f64) -> ClassArea {
        ClassArea {
            class_code,
            area_ha,
        }
    }

    #[test]
    fn resolves_known_class_names_and_colors() {
        let rows = enrich(vec![area(3, 300.0), area(19, 120.5)]);
        assert_eq!(rows[0].name, "Formação Florestal");
        assert_eq!(rows[0].color, "#129918");
        assert_eq!(rows[1].name, "Pastagem");
        assert_eq!(rows[1].color, "#FFEEAD");
    }

    #[test]
    fn unknown_codes_get_the_generic_label_and_gray() {
        let rows = enrich(vec![area(70, 12.0)]);
        assert_eq!(rows[0].name, "Classe 70");
        assert_eq!(rows[0].color, "#CCCCCC");
    }

    #[test]
    fn enrich_preserves_row_order_and_values() {
        let rows = enrich(vec![area(3, 300.0), area(19, 120.5), area(33, 4.25)]);
        let codes: Vec<u16> = rows.iter().map(|r| r.class_code).collect();
        assert_eq!(codes, vec![3, 19, 33]);
        assert!((rows[2].area_ha - 4.25).abs() < f64::EPSILON);
    }

    #[test]
    fn enrich_is_deterministic() {
        let input = vec![area(3, 300.0), area(70, 12.0)];
        assert_eq!(enrich(input.clone()), enrich(input));
    }

    #[test]
    fn color_mapping_keys_by_class_name() {
        let rows = enrich(vec![area(3, 300.0), area(19, 120.5)]);
        let mapping = color_mapping(&rows);
        assert_eq!(mapping["Formação Florestal"], "#129918");
        assert_eq!(mapping["Pastagem"], "#FFEEAD");
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn chart_series_follows_row_order() {
        let rows = enrich(vec![area(3, 300.0), area(19, 120.5)]);
        let series = chart_series(&rows);
        assert_eq!(series[0].label, "Formação Florestal");
        assert!((series[0].value - 300.0).abs() < f64::EPSILON);
        assert_eq!(series[1].color, "#FFEEAD");
    }
}
