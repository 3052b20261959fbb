//! Area-by-class aggregation against the classification layer.
//!
//! One POST per interaction: the remote service clips the selected
//! year's band to the boundary geometry, sums per-pixel area in
//! hectares grouped by class code, and answers with the groups. The
//! evaluation is best-effort under a max-pixel ceiling; for very
//! large regions the service may approximate rather than cover every
//! pixel, which is an accepted trade-off.

use std::cmp::Ordering;

use landcover_map_classes::{ClassArea, LAYER_ASSET, band_name, year_is_supported};
use serde::{Deserialize, Serialize};

use crate::{EeSession, StatsError};

/// Spatial resolution of the aggregation, in meters.
pub const SCALE_METERS: u32 = 30;

/// Pixel-count ceiling for best-effort evaluation.
pub const MAX_PIXELS: u64 = 10_000_000_000_000;

/// Wire request for one grouped-area aggregation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ZonalRequest<'a> {
    asset: &'a str,
    band: String,
    geometry: &'a geojson::Geometry,
    scale_meters: u32,
    max_pixels: u64,
    best_effort: bool,
    area_unit: &'a str,
    group_by: &'a str,
}

/// Wire response: per-class area sums.
#[derive(Debug, Deserialize)]
struct ZonalResponse {
    #[serde(default)]
    groups: Vec<ZonalGroup>,
}

/// One aggregation group as reported by the remote service.
#[derive(Debug, Deserialize)]
pub struct ZonalGroup {
    /// Class code of the group.
    #[serde(rename = "class")]
    pub class_code: u16,
    /// Summed area in hectares.
    pub sum: f64,
}

/// Computes the area occupied by each land-cover class inside
/// `boundary` for the given year.
///
/// An empty result (ROI outside data coverage, or all no-data pixels)
/// returns an empty `Vec`, not an error. Rows come back sorted by
/// descending area. No retries and no local timeout: the single
/// failure boundary is the returned [`StatsError`], and the caller
/// decides how to surface it.
///
/// # Errors
///
/// Returns [`StatsError::UnsupportedYear`] before any request is made
/// if `year` has no classification band, or a transport/HTTP/decode
/// variant if the remote evaluation fails.
pub async fn compute_area_by_class(
    session: &EeSession,
    boundary: &geojson::Geometry,
    year: u16,
) -> Result<Vec<ClassArea>, StatsError> {
    ensure_supported_year(year)?;

    let request = ZonalRequest {
        asset: LAYER_ASSET,
        band: band_name(year),
        geometry: boundary,
        scale_meters: SCALE_METERS,
        max_pixels: MAX_PIXELS,
        best_effort: true,
        area_unit: "HECTARES",
        group_by: "class",
    };

    log::info!("Requesting area by class for band {}", request.band);

    let response = session
        .client()
        .post(session.zonal_statistics_url())
        .bearer_auth(session.token())
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(StatsError::Http {
            status: status.as_u16(),
            message: excerpt(&message),
        });
    }

    let payload: ZonalResponse = response.json().await?;
    let rows = rows_from_groups(&payload.groups);
    log::info!("Received {} class groups", rows.len());
    Ok(rows)
}

fn ensure_supported_year(year: u16) -> Result<(), StatsError> {
    if year_is_supported(year) {
        Ok(())
    } else {
        Err(StatsError::UnsupportedYear { year })
    }
}

/// Shapes raw response groups into result rows.
///
/// Duplicate class codes are collapsed by summation so codes are
/// unique per result set; rows are sorted by descending area (code
/// ascending on ties) to keep downstream presentation deterministic.
#[must_use]
pub fn rows_from_groups(groups: &[ZonalGroup]) -> Vec<ClassArea> {
    let mut by_code = std::collections::BTreeMap::new();
    for group in groups {
        *by_code.entry(group.class_code).or_insert(0.0) += group.sum;
    }

    let mut rows: Vec<ClassArea> = by_code
        .into_iter()
        .map(|(class_code, area_ha)| ClassArea {
            class_code,
            area_ha,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.area_ha
            .partial_cmp(&a.area_ha)
            .unwrap_or(Ordering::Equal)
            .then(a.class_code.cmp(&b.class_code))
    });
    rows
}

/// Truncates a response body for error messages.
fn excerpt(body: &str) -> String {
    const LIMIT: usize = 300;
    if body.len() <= LIMIT {
        body.to_string()
    } else {
        let cut = body
            .char_indices()
            .take_while(|(idx, _)| *idx < LIMIT)
            .last()
            .map_or(0, |(idx, c)| idx + c.len_utf8());
        format!("{}…", &body[..cut])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_sorted_by_descending_area() {
        let groups = [
            ZonalGroup {
                class_code: 19,
                sum: 120.5,
            },
            ZonalGroup {
                class_code: 3,
                sum: 300.0,
            },
        ];
        let rows = rows_from_groups(&groups);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].class_code, 3);
        assert!((rows[0].area_ha - 300.0).abs() < f64::EPSILON);
        assert_eq!(rows[1].class_code, 19);
        assert!((rows[1].area_ha - 120.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_groups_produce_an_empty_result() {
        assert!(rows_from_groups(&[]).is_empty());
    }

    #[test]
    fn duplicate_codes_are_collapsed_by_summation() {
        let groups = [
            ZonalGroup {
                class_code: 33,
                sum: 10.0,
            },
            ZonalGroup {
                class_code: 33,
                sum: 5.0,
            },
        ];
        let rows = rows_from_groups(&groups);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].class_code, 33);
        assert!((rows[0].area_ha - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn response_groups_default_to_empty() {
        let payload: ZonalResponse = serde_json::from_str("{}").unwrap();
        assert!(payload.groups.is_empty());

        let payload: ZonalResponse =
            serde_json::from_str(r#"{"groups":[{"class":19,"sum":120.5},{"class":3,"sum":300.0}]}"#)
                .unwrap();
        assert_eq!(payload.groups.len(), 2);
    }

    #[test]
    fn years_outside_the_band_range_are_rejected_locally() {
        assert!(matches!(
            ensure_supported_year(1984),
            Err(StatsError::UnsupportedYear { year: 1984 })
        ));
        assert!(matches!(
            ensure_supported_year(2025),
            Err(StatsError::UnsupportedYear { year: 2025 })
        ));
        assert!(ensure_supported_year(2024).is_ok());
    }

    #[test]
    fn request_body_uses_the_wire_field_names() {
        let geometry = geojson::Geometry::new(geojson::Value::Point(vec![-52.0, -14.5]));
        let request = ZonalRequest {
            asset: LAYER_ASSET,
            band: band_name(2024),
            geometry: &geometry,
            scale_meters: SCALE_METERS,
            max_pixels: MAX_PIXELS,
            best_effort: true,
            area_unit: "HECTARES",
            group_by: "class",
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["band"], "classification_2024");
        assert_eq!(body["scaleMeters"], 30);
        assert_eq!(body["bestEffort"], true);
        assert_eq!(body["maxPixels"], 10_000_000_000_000_u64);
        assert_eq!(body["geometry"]["type"], "Point");
    }
}
