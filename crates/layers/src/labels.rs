use foundation::math::{Projection, Vec2};

/// Latitude used to place longitude labels.
pub const LON_LABEL_LAT: f64 = 40.0;
/// Longitude used to place latitude labels.
pub const LAT_LABEL_LON: f64 = -95.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GraticuleAxis {
    Longitude,
    Latitude,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraticuleLabel {
    pub axis: GraticuleAxis,
    pub degrees: i32,
    pub text: String,
    /// Text anchor in map pixels.
    pub anchor: Vec2,
}

/// Degree labels for the meridians and parallels that land on screen.
///
/// Longitude labels run along the top edge at the x of each meridian;
/// latitude labels run along the left edge at the y of each parallel.
pub fn graticule_labels(
    projection: &dyn Projection,
    width: f64,
    height: f64,
    step_deg: u32,
) -> Vec<GraticuleLabel> {
    let step = step_deg.max(1) as usize;
    let mut out = Vec::new();

    for lon in (-180..=180).step_by(step) {
        let Some(p) = projection.project(lon as f64, LON_LABEL_LAT) else {
            continue;
        };
        if p.x.is_finite() && (0.0..=width).contains(&p.x) {
            out.push(GraticuleLabel {
                axis: GraticuleAxis::Longitude,
                degrees: lon,
                text: format!("{lon}°"),
                anchor: Vec2::new(p.x, 14.0),
            });
        }
    }
    for lat in (-90..=90).step_by(step) {
        let Some(p) = projection.project(LAT_LABEL_LON, lat as f64) else {
            continue;
        };
        if p.y.is_finite() && (0.0..=height).contains(&p.y) {
            out.push(GraticuleLabel {
                axis: GraticuleAxis::Latitude,
                degrees: lat,
                text: format!("{lat}°"),
                anchor: Vec2::new(8.0, p.y + 4.0),
            });
        }
    }
    out
}
