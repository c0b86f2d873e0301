use serde_json::{Map, Value};
use tracing::warn;

/// A GeoJSON feature with its geometry left undecoded.
///
/// Decoders for specific datasets interpret `properties` and `geometry`
/// leniently; only the collection envelope is validated here.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFeature {
    /// Position in the source `features` array.
    pub index: usize,
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    pub geometry: Option<Value>,
}

impl RawFeature {
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key).filter(|v| !v.is_null())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    pub features: Vec<RawFeature>,
}

#[derive(Debug)]
pub enum GeoJsonError {
    Json(serde_json::Error),
    NotAFeatureCollection,
}

impl std::fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoJsonError::Json(e) => write!(f, "JSON parse error: {e}"),
            GeoJsonError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
        }
    }
}

impl std::error::Error for GeoJsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeoJsonError::Json(e) => Some(e),
            GeoJsonError::NotAFeatureCollection => None,
        }
    }
}

impl FeatureCollection {
    pub fn from_geojson_str(payload: &str) -> Result<Self, GeoJsonError> {
        let value: Value = serde_json::from_str(payload).map_err(GeoJsonError::Json)?;
        Self::from_geojson_value(value)
    }

    /// Validates the envelope. Entries of `features` that are not objects are
    /// skipped with a warning rather than failing the whole collection.
    pub fn from_geojson_value(value: Value) -> Result<Self, GeoJsonError> {
        let Value::Object(mut obj) = value else {
            return Err(GeoJsonError::NotAFeatureCollection);
        };
        if obj.get("type").and_then(|v| v.as_str()) != Some("FeatureCollection") {
            return Err(GeoJsonError::NotAFeatureCollection);
        }
        let Some(Value::Array(features_val)) = obj.remove("features") else {
            return Err(GeoJsonError::NotAFeatureCollection);
        };

        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.into_iter().enumerate() {
            let Value::Object(mut feat_obj) = feat_val else {
                warn!(index, "skipping feature that is not an object");
                continue;
            };

            let id = match feat_obj.get("id") {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            };

            let properties = match feat_obj.remove("properties") {
                Some(Value::Object(map)) => map,
                _ => Map::new(),
            };

            let geometry = feat_obj.remove("geometry").filter(|g| !g.is_null());

            features.push(RawFeature {
                index,
                id,
                properties,
                geometry,
            });
        }

        Ok(Self { features })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Reads a number the way a loosely typed feed may carry it: as a JSON
/// number or as a numeric string. Non-finite results are rejected.
pub fn lenient_f64(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

/// Parses a `[x, y, ...]` position.
pub fn position(value: &Value) -> Option<[f64; 2]> {
    let arr = value.as_array()?;
    if arr.len() < 2 {
        return None;
    }
    Some([lenient_f64(&arr[0])?, lenient_f64(&arr[1])?])
}
