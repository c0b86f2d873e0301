use geo::{Coord, LineString, Polygon};
use scene::RegionTable;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::feature_collection::{FeatureCollection, RawFeature, position};

pub const NAME_KEY: &str = "NAME";

/// Decodes region boundary features into a [`RegionTable`].
///
/// Features without a `NAME` are skipped. Polygon parts that fail to parse
/// are dropped; a named region left with no usable part is still listed so it
/// can be selected, it simply contains nothing.
pub fn decode_regions(fc: &FeatureCollection) -> RegionTable {
    let mut table = RegionTable::new();
    let mut skipped = 0usize;

    for feature in &fc.features {
        let Some(name) = region_name(feature) else {
            warn!(index = feature.index, "skipping region feature without a name");
            skipped += 1;
            continue;
        };
        let polygons = feature
            .geometry
            .as_ref()
            .map(|g| region_polygons(g, feature.index))
            .unwrap_or_default();
        if polygons.is_empty() {
            warn!(index = feature.index, name = %name, "region has no usable polygon");
        }
        table.insert(&name, polygons);
    }

    info!(regions = table.len(), skipped, "decoded regions");
    table
}

fn region_name(feature: &RawFeature) -> Option<String> {
    match feature.property(NAME_KEY)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn region_polygons(geometry: &Value, index: usize) -> Vec<Polygon<f64>> {
    let Some(obj) = geometry.as_object() else {
        return Vec::new();
    };
    let Some(coords) = obj.get("coordinates").and_then(|v| v.as_array()) else {
        return Vec::new();
    };
    match obj.get("type").and_then(|v| v.as_str()) {
        Some("Polygon") => parse_polygon(coords).into_iter().collect(),
        Some("MultiPolygon") => {
            let mut out = Vec::with_capacity(coords.len());
            for (part, poly) in coords.iter().enumerate() {
                match poly.as_array().and_then(|rings| parse_polygon(rings)) {
                    Some(p) => out.push(p),
                    None => debug!(index, part, "dropping malformed polygon part"),
                }
            }
            out
        }
        other => {
            warn!(index, geometry = ?other, "unsupported region geometry");
            Vec::new()
        }
    }
}

/// Parses `[exterior, hole, ...]`. A bad exterior rejects the polygon; bad
/// holes are dropped.
fn parse_polygon(rings: &[Value]) -> Option<Polygon<f64>> {
    let (exterior, holes) = rings.split_first()?;
    let exterior = parse_ring(exterior)?;
    let interiors = holes.iter().filter_map(parse_ring).collect();
    Some(Polygon::new(exterior, interiors))
}

/// A ring needs at least four positions, all finite.
fn parse_ring(value: &Value) -> Option<LineString<f64>> {
    let positions = value.as_array()?;
    if positions.len() < 4 {
        return None;
    }
    let coords = positions
        .iter()
        .map(|p| position(p).map(|[x, y]| Coord { x, y }))
        .collect::<Option<Vec<_>>>()?;
    Some(LineString::new(coords))
}
