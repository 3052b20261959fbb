//! Geometry repair: strip coordinate dimensions beyond 2D.
//!
//! Catalogs exported from CAD/KML tooling routinely carry an altitude
//! component on every position. The remote service's strict schema
//! accepts 2D positions only, so the repair pass truncates every
//! position to its first two components, at any nesting depth.

use serde_json::Value;

use crate::GeometryError;

/// Returns a copy of a GeoJSON geometry object with every coordinate
/// tuple truncated to 2D.
///
/// Recurses through `coordinates` at arbitrary depth, through
/// `GeometryCollection` members under `geometries`, and through a
/// `Feature`'s `geometry` member. Other keys pass through unchanged.
/// The input value is never mutated. Applying the function twice
/// yields the same result as applying it once.
///
/// # Errors
///
/// Returns [`GeometryError::Invalid`] if `geometry` (or a nested
/// `geometries` member) is not a JSON object.
pub fn normalize_geometry(geometry: &Value) -> Result<Value, GeometryError> {
    let Some(obj) = geometry.as_object() else {
        return Err(GeometryError::Invalid {
            message: "geometry is not a JSON object".to_string(),
        });
    };

    let mut out = obj.clone();

    if let Some(coords) = obj.get("coordinates") {
        out.insert("coordinates".to_string(), drop_z(coords));
    }

    if let Some(Value::Array(members)) = obj.get("geometries") {
        let normalized = members
            .iter()
            .map(normalize_geometry)
            .collect::<Result<Vec<_>, _>>()?;
        out.insert("geometries".to_string(), Value::Array(normalized));
    }

    if let Some(inner @ Value::Object(_)) = obj.get("geometry") {
        out.insert("geometry".to_string(), normalize_geometry(inner)?);
    }

    Ok(Value::Object(out))
}

/// Truncates positions to their first two components.
///
/// A sequence whose first element is numeric is a position; anything
/// else recurses. Non-sequence leaves are returned unchanged.
fn drop_z(coords: &Value) -> Value {
    match coords {
        Value::Array(items) => {
            if items.first().is_some_and(Value::is_number) {
                Value::Array(items.iter().take(2).cloned().collect())
            } else {
                Value::Array(items.iter().map(drop_z).collect())
            }
        }
        other => other.clone(),
    }
}
