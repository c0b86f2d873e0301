use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};
use foundation::ids::RecordId;
use scene::{Acquisition, DayNight, FireRecord, LonLat};
use serde_json::Value;
use tracing::{info, warn};

use crate::feature_collection::{FeatureCollection, RawFeature, lenient_f64, position};

pub const BRIGHTNESS_KEY: &str = "BRIGHTNESS";
pub const DATE_KEY: &str = "ACQ_DATE";
pub const TIME_KEY: &str = "ACQ_TIME";
/// Property names that may carry the day/night flag, in lookup order.
pub const DAY_NIGHT_KEYS: [&str; 3] = ["DAYNIGHT", "DAY_NIGHT", "DAY"];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Decodes hotspot point features into records.
///
/// No feature is dropped: unusable coordinates, brightness or dates leave the
/// corresponding field empty. Ids come from `properties.id`, then the feature
/// id, then the feature index; repeated ids get a `#<index>` suffix, extended
/// further if that suffix is itself taken.
pub fn decode_fire_records(fc: &FeatureCollection) -> Vec<FireRecord> {
    let mut seen: HashSet<String> = HashSet::with_capacity(fc.len());
    let mut out = Vec::with_capacity(fc.len());
    let mut missing_position = 0usize;

    for feature in &fc.features {
        let mut id = record_id(feature);
        if !seen.insert(id.clone()) {
            warn!(id = %id, index = feature.index, "duplicate hotspot id; disambiguating");
            let base = id;
            let mut candidate = format!("{base}#{}", feature.index);
            let mut n = 1usize;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{base}#{}#{n}", feature.index);
                n += 1;
            }
            id = candidate;
        }

        let mut record = FireRecord::new(RecordId::new(id));
        record.position = point_position(feature);
        if record.position.is_none() {
            missing_position += 1;
        }
        record.brightness = feature.property(BRIGHTNESS_KEY).and_then(lenient_f64);

        if let Some(raw) = feature.property(DATE_KEY) {
            let text = match raw {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            record.acquired = parse_acq_date(&text).map(|date| Acquisition {
                date,
                time: feature.property(TIME_KEY).and_then(parse_acq_time),
            });
            record.raw_date = Some(text);
        }

        record.day_night = DAY_NIGHT_KEYS
            .iter()
            .find_map(|k| match feature.property(k)? {
                Value::String(s) if s.trim().is_empty() => None,
                Value::Null => None,
                Value::String(s) => Some(DayNight::from_flag(s)),
                _ => Some(DayNight::Unknown),
            })
            .unwrap_or_default();

        out.push(record);
    }

    info!(
        records = out.len(),
        missing_position, "decoded hotspot records"
    );
    out
}

fn record_id(feature: &RawFeature) -> String {
    match feature.property("id") {
        Some(Value::String(s)) => return s.clone(),
        Some(Value::Number(n)) => return n.to_string(),
        _ => {}
    }
    feature
        .id
        .clone()
        .unwrap_or_else(|| feature.index.to_string())
}

fn point_position(feature: &RawFeature) -> Option<LonLat> {
    let geometry = feature.geometry.as_ref()?.as_object()?;
    if geometry.get("type").and_then(|v| v.as_str()) != Some("Point") {
        return None;
    }
    let [lon, lat] = position(geometry.get("coordinates")?)?;
    Some(LonLat::new(lon, lat))
}

/// Parses an acquisition date. Datetime strings contribute their date part.
pub fn parse_acq_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let date_part = text.split(['T', ' ']).next().unwrap_or(text);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Parses an `HHMM` acquisition time given as a number or a string.
pub fn parse_acq_time(value: &Value) -> Option<NaiveTime> {
    let digits = match value {
        Value::Number(n) => n.as_u64()?.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    if digits.is_empty() || digits.len() > 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let padded = format!("{digits:0>4}");
    let hh: u32 = padded[..2].parse().ok()?;
    let mm: u32 = padded[2..].parse().ok()?;
    NaiveTime::from_hms_opt(hh, mm, 0)
}
