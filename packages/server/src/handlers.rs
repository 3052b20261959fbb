//! HTTP handler functions for the landcover map API.

use actix_web::{HttpResponse, web};
use landcover_map_classes::{
    LAYER_ASSET, VIS_MAX, VIS_MIN, VIS_PALETTE, YEAR_DEFAULT, YEAR_MAX, YEAR_MIN, band_name,
    year_is_supported,
};
use landcover_map_geometry::{BoundaryRegion, to_boundary_region};
use landcover_map_presentation::{chart_series, color_mapping, enrich};
use landcover_map_server_models::{
    AnalyzeRequest, ApiAnalysis, ApiClassArea, ApiClippedLayer, ApiError, ApiHealth, ApiLayer,
    ApiOutline, ApiVisParams, ApiYears, LayerQueryParams,
};
use landcover_map_stats::{StatsError, compute_area_by_class};
use serde_json::{Value, json};

use crate::AppState;

/// Stroke color of the ROI outline overlay.
const OUTLINE_COLOR: &str = "#FF0000";

/// Fill of the ROI outline overlay (fully transparent).
const OUTLINE_FILL: &str = "#00000000";

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/years`
///
/// Returns the selectable year range of the classification layer.
pub async fn years() -> HttpResponse {
    HttpResponse::Ok().json(ApiYears {
        min: YEAR_MIN,
        max: YEAR_MAX,
        default_year: YEAR_DEFAULT,
    })
}

/// `GET /api/regions`
///
/// Returns the selectable ROI names, sorted.
pub async fn regions(state: web::Data<AppState>) -> HttpResponse {
    match state.catalog.get_or_load(&state.catalog_path) {
        Ok(catalog) => HttpResponse::Ok().json(catalog.names()),
        Err(e) => {
            log::error!("Failed to read ROI catalog: {e}");
            HttpResponse::InternalServerError().json(ApiError {
                error: "Failed to read ROI catalog".to_string(),
            })
        }
    }
}

/// `GET /api/layer?year=`
///
/// Returns the base classification overlay descriptor for a year.
pub async fn layer(params: web::Query<LayerQueryParams>) -> HttpResponse {
    let year = params.year.unwrap_or(YEAR_DEFAULT);
    if !year_is_supported(year) {
        return HttpResponse::UnprocessableEntity().json(ApiError {
            error: format!("no classification band for year {year}"),
        });
    }
    HttpResponse::Ok().json(ApiLayer {
        asset: LAYER_ASSET.to_string(),
        band: band_name(year),
        vis: vis_params(),
    })
}

/// `POST /api/analyze`
///
/// Runs one full analysis: catalog lookup, geometry conversion, zonal
/// statistics, presentation shaping. Per-interaction failures map to
/// 4xx/5xx without touching server state; an empty remote result is a
/// 200 with an explicit no-data marker.
pub async fn analyze(state: web::Data<AppState>, body: web::Json<AnalyzeRequest>) -> HttpResponse {
    let request = body.into_inner();

    let catalog = match state.catalog.get_or_load(&state.catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!("Failed to read ROI catalog: {e}");
            return HttpResponse::InternalServerError().json(ApiError {
                error: "Failed to read ROI catalog".to_string(),
            });
        }
    };

    let Some(feature) = catalog.find_by_name(&request.region) else {
        return HttpResponse::NotFound().json(ApiError {
            error: format!("no ROI named {:?}", request.region),
        });
    };

    let boundary_region = match to_boundary_region(feature) {
        Ok(region) => region,
        Err(e) => {
            log::warn!("GeoJSON conversion failed for {:?}: {e}", request.region);
            return HttpResponse::UnprocessableEntity().json(ApiError {
                error: format!("failed to convert ROI geometry: {e}"),
            });
        }
    };

    let rows = match compute_area_by_class(&state.session, &boundary_region.boundary, request.year)
        .await
    {
        Ok(rows) => rows,
        Err(e @ StatsError::UnsupportedYear { .. }) => {
            return HttpResponse::UnprocessableEntity().json(ApiError {
                error: e.to_string(),
            });
        }
        Err(e) => {
            log::error!("Zonal statistics request failed: {e}");
            return HttpResponse::BadGateway().json(ApiError {
                error: format!("zonal statistics request failed: {e}"),
            });
        }
    };

    let no_data = rows.is_empty();
    let message = no_data.then(|| {
        format!(
            "No area computed for ROI {:?} — check that the geometry lies within Brazil \
             and that year {} has data",
            request.region, request.year
        )
    });

    let rows = enrich(rows);
    let color_map = color_mapping(&rows);
    let series = chart_series(&rows);
    let boundary = serde_json::to_value(&boundary_region.boundary).unwrap_or(Value::Null);

    HttpResponse::Ok().json(ApiAnalysis {
        region: request.region,
        year: request.year,
        no_data,
        message,
        rows: rows.into_iter().map(ApiClassArea::from).collect(),
        color_map,
        series,
        outline: ApiOutline {
            geometry: outline_feature_collection(&boundary_region),
            color: OUTLINE_COLOR.to_string(),
            fill_color: OUTLINE_FILL.to_string(),
        },
        clipped: ApiClippedLayer {
            asset: LAYER_ASSET.to_string(),
            band: band_name(request.year),
            boundary,
            vis: vis_params(),
        },
    })
}

fn vis_params() -> ApiVisParams {
    ApiVisParams {
        min: VIS_MIN,
        max: VIS_MAX,
        palette: VIS_PALETTE.iter().map(ToString::to_string).collect(),
    }
}

/// Rebuilds the ROI sub-regions as a GeoJSON `FeatureCollection` for
/// the outline overlay.
fn outline_feature_collection(region: &BoundaryRegion) -> Value {
    let features: Vec<Value> = region
        .regions
        .iter()
        .map(|sub| {
            json!({
                "type": "Feature",
                "properties": { "Name": sub.label },
                "geometry": serde_json::to_value(&sub.geometry).unwrap_or(Value::Null),
            })
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn outline_keeps_sub_region_labels() {
        let fc = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "Name": "ETE Norte" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                }
            }]
        });
        let region = to_boundary_region(&fc).unwrap();
        let outline = outline_feature_collection(&region);
        assert_eq!(outline["type"], "FeatureCollection");
        assert_eq!(outline["features"][0]["properties"]["Name"], "ETE Norte");
        assert_eq!(outline["features"][0]["geometry"]["type"], "Polygon");
    }
}
