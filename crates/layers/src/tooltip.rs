use scene::{FireRecord, RegionTable};

/// Display strings for the hover tooltip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipFields {
    pub brightness: String,
    pub date: String,
    pub day_night: String,
    pub region: String,
    /// `None` when the record has no usable position.
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// Formats a record for the tooltip. Missing data shows as `N/A`,
/// `unknown` or `Unknown` rather than failing.
pub fn describe_record(record: &FireRecord, regions: &RegionTable) -> TooltipFields {
    let brightness = record
        .brightness
        .map_or_else(|| "N/A".to_string(), |b| format!("{b:.2}"));

    let date = match (&record.acquired, &record.raw_date) {
        (Some(acq), _) => {
            let day = acq.date.format("%-m/%-d/%Y").to_string();
            match acq.time {
                Some(t) => format!("{day} {}", t.format("%H:%M")),
                None => day,
            }
        }
        (None, Some(raw)) if !raw.is_empty() => raw.clone(),
        _ => "unknown".to_string(),
    };

    let names: Vec<&str> = record
        .containing_regions()
        .iter()
        .filter_map(|id| regions.name(*id))
        .collect();
    let region = if names.is_empty() {
        "Unknown".to_string()
    } else {
        names.join(", ")
    };

    let (lat, lon) = match record.position {
        Some(p) if p.lat.is_finite() && p.lon.is_finite() => {
            (Some(format!("{:.4}°", p.lat)), Some(format!("{:.4}°", p.lon)))
        }
        _ => (None, None),
    };

    TooltipFields {
        brightness,
        date,
        day_night: record.day_night.label().to_string(),
        region,
        lat,
        lon,
    }
}
