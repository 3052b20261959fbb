//! GeoJSON → boundary region conversion.
//!
//! The typed path parses through the `geojson` crate and proves each
//! member converts into `geo` types, so anything it accepts the remote
//! service will too. The typed path is strict by design: input it
//! rejects (residual 3D coordinates, loosely shaped wrappers) goes
//! through a manual dispatch on the `type` tag that repairs the
//! geometry with [`normalize_geometry`] before wrapping it.

use geo::BooleanOps;
use geojson::{Feature, GeoJson, Geometry};
use serde_json::Value;

use crate::{ConversionError, GeometryError, TypedConversionError, normalize_geometry};

/// One individually addressable sub-region of an ROI.
#[derive(Debug, Clone, PartialEq)]
pub struct RoiRegion {
    /// Label from the source feature's `Name` property, when present.
    pub label: Option<String>,
    /// The sub-region geometry.
    pub geometry: Geometry,
}

/// Uniform region-of-interest representation produced by conversion.
///
/// Conversion is atomic: on success `regions` is non-empty and
/// `boundary` is derivable; on failure no partial state is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryRegion {
    /// The individual sub-regions, in source order.
    pub regions: Vec<RoiRegion>,
    /// Union geometry used for clipping and zonal statistics.
    pub boundary: Geometry,
}

/// Converts any GeoJSON object (`Feature`, `FeatureCollection`, or
/// bare geometry) into a [`BoundaryRegion`].
///
/// The typed path is tried first; on any typed-path failure the manual
/// fallback runs, and if that fails too the returned
/// [`ConversionError`] carries both failure reasons.
///
/// # Errors
///
/// Returns [`ConversionError`] when no representation can be produced.
pub fn to_boundary_region(geojson: &Value) -> Result<BoundaryRegion, ConversionError> {
    match typed_convert(geojson) {
        Ok(region) => Ok(region),
        Err(primary) => {
            log::debug!("typed GeoJSON conversion rejected input ({primary}); trying manual fallback");
            fallback_convert(geojson).map_err(|fallback| ConversionError { primary, fallback })
        }
    }
}

/// Strict conversion through the `geojson` crate's typed API.
fn typed_convert(value: &Value) -> Result<BoundaryRegion, TypedConversionError> {
    let regions = match GeoJson::from_json_value(value.clone())? {
        GeoJson::Geometry(geometry) => vec![RoiRegion {
            label: None,
            geometry,
        }],
        GeoJson::Feature(feature) => vec![region_from_feature(feature)?],
        GeoJson::FeatureCollection(collection) => {
            if collection.features.is_empty() {
                return Err(TypedConversionError::Empty);
            }
            collection
                .features
                .into_iter()
                .map(region_from_feature)
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    // Prove every member is strictly 2D and converts into geo types;
    // this is the validation the fallback path trades away for
    // repairability.
    for region in &regions {
        if !is_strictly_2d(&region.geometry.value) {
            return Err(TypedConversionError::ExtraDimensions);
        }
        let _: geo::Geometry<f64> = region.geometry.clone().try_into()?;
    }

    Ok(assemble(regions))
}

fn is_strictly_2d(value: &geojson::Value) -> bool {
    use geojson::Value as V;
    match value {
        V::Point(position) => position.len() == 2,
        V::MultiPoint(positions) | V::LineString(positions) => {
            positions.iter().all(|position| position.len() == 2)
        }
        V::MultiLineString(lines) | V::Polygon(lines) => {
            lines.iter().flatten().all(|position| position.len() == 2)
        }
        V::MultiPolygon(polygons) => polygons
            .iter()
            .flatten()
            .flatten()
            .all(|position| position.len() == 2),
        V::GeometryCollection(members) => {
            members.iter().all(|member| is_strictly_2d(&member.value))
        }
    }
}

fn region_from_feature(feature: Feature) -> Result<RoiRegion, TypedConversionError> {
    let label = feature
        .properties
        .as_ref()
        .and_then(|props| props.get("Name"))
        .and_then(Value::as_str)
        .map(ToString::to_string);
    let geometry = feature
        .geometry
        .ok_or(TypedConversionError::NoGeometry)?;
    Ok(RoiRegion { label, geometry })
}

/// Manual dispatch on the `type` tag, repairing geometry on the way.
fn fallback_convert(value: &Value) -> Result<BoundaryRegion, GeometryError> {
    let Some(obj) = value.as_object() else {
        return Err(GeometryError::Invalid {
            message: "input is not a JSON object".to_string(),
        });
    };

    match obj.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            let features = obj
                .get("features")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            if features.is_empty() {
                return Err(GeometryError::EmptyRegion);
            }

            let mut regions = Vec::new();
            for feature in features {
                let Some(geometry) = feature.get("geometry").filter(|g| !g.is_null()) else {
                    continue;
                };
                regions.push(RoiRegion {
                    label: label_of(feature),
                    geometry: repaired_geometry(geometry)?,
                });
            }
            if regions.is_empty() {
                return Err(GeometryError::EmptyRegion);
            }
            Ok(assemble(regions))
        }

        Some("Feature") => {
            let geometry = obj
                .get("geometry")
                .filter(|g| !g.is_null())
                .ok_or(GeometryError::MissingGeometry)?;
            Ok(assemble(vec![RoiRegion {
                label: label_of(value),
                geometry: repaired_geometry(geometry)?,
            }]))
        }

        Some(
            "Point" | "MultiPoint" | "LineString" | "MultiLineString" | "Polygon"
            | "MultiPolygon" | "GeometryCollection",
        ) => Ok(assemble(vec![RoiRegion {
            label: None,
            geometry: repaired_geometry(value)?,
        }])),

        Some(other) => Err(GeometryError::UnsupportedType {
            type_name: other.to_string(),
        }),

        None => Err(GeometryError::UnsupportedType {
            type_name: "(missing)".to_string(),
        }),
    }
}

fn label_of(feature: &Value) -> Option<String> {
    feature
        .get("properties")
        .and_then(|props| props.get("Name"))
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

/// Normalizes a raw geometry value and parses the repaired result.
fn repaired_geometry(raw: &Value) -> Result<Geometry, GeometryError> {
    let normalized = normalize_geometry(raw)?;
    serde_json::from_value(normalized).map_err(|err| GeometryError::Invalid {
        message: err.to_string(),
    })
}

fn assemble(regions: Vec<RoiRegion>) -> BoundaryRegion {
    let boundary = derive_union(&regions);
    BoundaryRegion { regions, boundary }
}

/// Derives the union geometry for a non-empty region set.
///
/// All-polygonal sets are unioned into a `MultiPolygon`; anything else
/// degrades to a `GeometryCollection` of the members.
fn derive_union(regions: &[RoiRegion]) -> Geometry {
    if regions.len() == 1 {
        return regions[0].geometry.clone();
    }

    let mut parts: Vec<geo::MultiPolygon<f64>> = Vec::with_capacity(regions.len());
    for region in regions {
        match geo::Geometry::<f64>::try_from(region.geometry.clone()) {
            Ok(geo::Geometry::Polygon(polygon)) => parts.push(geo::MultiPolygon(vec![polygon])),
            Ok(geo::Geometry::MultiPolygon(multi)) => parts.push(multi),
            _ => return collection_of(regions),
        }
    }

    parts
        .into_iter()
        .reduce(|acc, next| acc.union(&next))
        .map_or_else(
            || collection_of(regions),
            |unioned| Geometry::new(geojson::Value::from(&unioned)),
        )
}

fn collection_of(regions: &[RoiRegion]) -> Geometry {
    Geometry::new(geojson::Value::GeometryCollection(
        regions.iter().map(|r| r.geometry.clone()).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn square(x: f64, y: f64) -> Value {
        json!({
            "type": "Polygon",
            "coordinates": [[[x, y], [x + 1.0, y], [x + 1.0, y + 1.0], [x, y + 1.0], [x, y]]]
        })
    }

    #[test]
    fn converts_a_feature_collection_with_labels() {
        let fc = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "Name": "ETE Norte" }, "geometry": square(-47.0, -15.0) },
                { "type": "Feature", "properties": { "Name": "ETE Sul" }, "geometry": square(-44.0, -20.0) }
            ]
        });

        let region = to_boundary_region(&fc).unwrap();
        assert_eq!(region.regions.len(), 2);
        assert_eq!(region.regions[0].label.as_deref(), Some("ETE Norte"));
        assert_eq!(region.regions[1].label.as_deref(), Some("ETE Sul"));

        match &region.boundary.value {
            geojson::Value::MultiPolygon(polygons) => assert_eq!(polygons.len(), 2),
            other => panic!("expected MultiPolygon union, got {other:?}"),
        }
    }

    #[test]
    fn wraps_a_bare_geometry_into_one_region() {
        let polygon = square(-47.0, -15.0);
        let region = to_boundary_region(&polygon).unwrap();
        assert_eq!(region.regions.len(), 1);
        assert_eq!(region.regions[0].label, None);
        assert_eq!(region.boundary, region.regions[0].geometry);
    }

    #[test]
    fn mixed_members_degrade_to_a_geometry_collection() {
        let fc = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": {}, "geometry": square(-47.0, -15.0) },
                { "type": "Feature", "properties": {}, "geometry": { "type": "Point", "coordinates": [-52.0, -14.5] } }
            ]
        });

        let region = to_boundary_region(&fc).unwrap();
        match &region.boundary.value {
            geojson::Value::GeometryCollection(members) => assert_eq!(members.len(), 2),
            other => panic!("expected GeometryCollection union, got {other:?}"),
        }
    }

    #[test]
    fn empty_feature_collection_fails_with_empty_region() {
        let fc = json!({ "type": "FeatureCollection", "features": [] });
        let err = to_boundary_region(&fc).unwrap_err();
        assert!(matches!(err.fallback, GeometryError::EmptyRegion));
        // Both stage failures stay inspectable.
        assert!(matches!(err.primary, TypedConversionError::Empty));
    }

    #[test]
    fn collection_of_geometryless_features_fails_with_empty_region() {
        let fc = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "Name": "a" } },
                { "type": "Feature", "properties": { "Name": "b" }, "geometry": null }
            ]
        });
        let err = to_boundary_region(&fc).unwrap_err();
        assert!(matches!(err.fallback, GeometryError::EmptyRegion));
    }

    #[test]
    fn feature_without_geometry_fails_with_missing_geometry() {
        let feature = json!({ "type": "Feature", "properties": { "Name": "a" } });
        let err = to_boundary_region(&feature).unwrap_err();
        assert!(matches!(err.fallback, GeometryError::MissingGeometry));
    }

    #[test]
    fn unsupported_type_is_named_in_the_error() {
        let circle = json!({ "type": "Circle", "coordinates": [-52.0, -14.5], "radius": 3.0 });
        let err = to_boundary_region(&circle).unwrap_err();
        match &err.fallback {
            GeometryError::UnsupportedType { type_name } => assert_eq!(type_name, "Circle"),
            other => panic!("expected UnsupportedType, got {other:?}"),
        }
        assert!(err.to_string().contains("Circle"));
    }

    #[test]
    fn residual_3d_coordinates_fall_through_to_the_repair_path() {
        let feature = json!({
            "type": "Feature",
            "properties": { "Name": "ETE Norte" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-47.0, -15.0, 812.0], [-46.0, -15.0, 810.0], [-46.0, -14.0, 811.0], [-47.0, -15.0, 812.0]]]
            }
        });

        let region = to_boundary_region(&feature).unwrap();
        assert_eq!(region.regions[0].label.as_deref(), Some("ETE Norte"));
        match &region.regions[0].geometry.value {
            geojson::Value::Polygon(rings) => {
                assert!(rings[0].iter().all(|position| position.len() == 2));
            }
            other => panic!("expected Polygon, got {other:?}"),
        }
    }

    #[test]
    fn fallback_repairs_residual_3d_coordinates() {
        let polygon = json!({
            "type": "Polygon",
            "coordinates": [[[-47.0, -15.0, 812.0], [-46.0, -15.0, 810.0], [-46.0, -14.0, 811.0], [-47.0, -15.0, 812.0]]]
        });

        let region = fallback_convert(&polygon).unwrap();
        match &region.regions[0].geometry.value {
            geojson::Value::Polygon(rings) => {
                assert!(rings[0].iter().all(|position| position.len() == 2));
            }
            other => panic!("expected Polygon, got {other:?}"),
        }
    }

    #[test]
    fn fallback_skips_features_without_geometry() {
        let fc = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "Name": "skipped" } },
                { "type": "Feature", "properties": { "Name": "kept" }, "geometry": square(-47.0, -15.0) }
            ]
        });

        let region = fallback_convert(&fc).unwrap();
        assert_eq!(region.regions.len(), 1);
        assert_eq!(region.regions[0].label.as_deref(), Some("kept"));
    }

    #[test]
    fn overlapping_polygons_union_into_one() {
        let fc = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": {}, "geometry": square(0.0, 0.0) },
                { "type": "Feature", "properties": {}, "geometry": square(0.5, 0.0) }
            ]
        });

        let region = to_boundary_region(&fc).unwrap();
        match &region.boundary.value {
            geojson::Value::MultiPolygon(polygons) => assert_eq!(polygons.len(), 1),
            other => panic!("expected MultiPolygon union, got {other:?}"),
        }
    }
}
