//! Session data model: hotspot records and the named regions they fall in.
//!
//! Records reference regions by [`RegionId`] only; the polygons live in the
//! [`RegionTable`], so there is no ownership cycle between the two.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use foundation::bounds::Aabb2;
use foundation::ids::{RecordId, RegionId};
use foundation::time::Month;
use geo::{BoundingRect, MultiPolygon, Polygon};
use tracing::warn;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn as_array(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum DayNight {
    Day,
    Night,
    #[default]
    Unknown,
}

impl DayNight {
    /// Parses the satellite `D`/`N` flag, case-insensitively.
    pub fn from_flag(flag: &str) -> Self {
        match flag.trim().to_ascii_uppercase().as_str() {
            "D" | "DAY" => DayNight::Day,
            "N" | "NIGHT" => DayNight::Night,
            _ => DayNight::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DayNight::Day => "Day",
            DayNight::Night => "Night",
            DayNight::Unknown => "Unknown",
        }
    }
}

/// Acquisition timestamp. The time of day is optional in the source feeds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Acquisition {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

/// One satellite hotspot detection.
///
/// Every field that can be malformed in the input is optional; a record with
/// missing fields is kept and simply skipped by computations that need them.
#[derive(Debug, Clone, PartialEq)]
pub struct FireRecord {
    pub id: RecordId,
    pub position: Option<LonLat>,
    pub brightness: Option<f64>,
    pub acquired: Option<Acquisition>,
    /// Date text as found in the input, kept for display when it did not parse.
    pub raw_date: Option<String>,
    pub day_night: DayNight,
    containing_regions: Option<Vec<RegionId>>,
}

impl FireRecord {
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            position: None,
            brightness: None,
            acquired: None,
            raw_date: None,
            day_night: DayNight::Unknown,
            containing_regions: None,
        }
    }

    pub fn with_position(mut self, lon: f64, lat: f64) -> Self {
        self.position = Some(LonLat::new(lon, lat));
        self
    }

    pub fn with_brightness(mut self, brightness: f64) -> Self {
        self.brightness = Some(brightness);
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.acquired = Some(Acquisition { date, time: None });
        self
    }

    pub fn month(&self) -> Option<Month> {
        self.acquired.map(|a| Month::of(a.date))
    }

    /// Containing regions, empty until indexing has tagged this record.
    pub fn containing_regions(&self) -> &[RegionId] {
        self.containing_regions.as_deref().unwrap_or(&[])
    }

    pub fn is_indexed(&self) -> bool {
        self.containing_regions.is_some()
    }

    /// Tags the record with its containing regions. Only the first call has
    /// an effect; returns whether it did.
    pub fn set_containing_regions(&mut self, mut regions: Vec<RegionId>) -> bool {
        if self.containing_regions.is_some() {
            warn!(record = %self.id, "record already indexed; ignoring retag");
            return false;
        }
        regions.sort();
        regions.dedup();
        self.containing_regions = Some(regions);
        true
    }
}

/// A named region with its boundary geometry in lon/lat degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPolygon {
    pub id: RegionId,
    pub name: String,
    pub geometry: MultiPolygon<f64>,
    /// Geographic extent; `None` when the region has no usable polygon.
    pub bounds: Option<Aabb2>,
}

impl RegionPolygon {
    /// All exterior ring vertices as `[lon, lat]`.
    pub fn exterior_vertices(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.geometry
            .0
            .iter()
            .flat_map(|poly| poly.exterior().0.iter().map(|c| [c.x, c.y]))
    }

    fn recompute_bounds(&mut self) {
        self.bounds = self
            .geometry
            .bounding_rect()
            .map(|r| Aabb2::new([r.min().x, r.min().y], [r.max().x, r.max().y]));
    }
}

/// Regions keyed by name. Features sharing a name form one region.
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    regions: Vec<RegionPolygon>,
    by_name: HashMap<String, RegionId>,
}

impl RegionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds polygons under `name`, creating the region on first sight.
    pub fn insert(&mut self, name: &str, polygons: Vec<Polygon<f64>>) -> RegionId {
        let id = match self.by_name.get(name) {
            Some(id) => *id,
            None => {
                let id = RegionId(self.regions.len() as u32);
                self.regions.push(RegionPolygon {
                    id,
                    name: name.to_string(),
                    geometry: MultiPolygon::new(Vec::new()),
                    bounds: None,
                });
                self.by_name.insert(name.to_string(), id);
                id
            }
        };
        let region = &mut self.regions[id.index() as usize];
        region.geometry.0.extend(polygons);
        region.recompute_bounds();
        id
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, id: RegionId) -> Option<&RegionPolygon> {
        self.regions.get(id.index() as usize)
    }

    pub fn id_of(&self, name: &str) -> Option<RegionId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: RegionId) -> Option<&str> {
        self.get(id).map(|r| r.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegionPolygon> {
        self.regions.iter()
    }
}
