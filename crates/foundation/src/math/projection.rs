use super::Vec2;

/// Map projection capability supplied by the host (e.g. an Albers USA
/// projection from the drawing library).
///
/// Returns `None` for locations the projection cannot place, which callers
/// treat like a missing coordinate.
pub trait Projection {
    fn project(&self, lon_deg: f64, lat_deg: f64) -> Option<Vec2>;
}

impl<F> Projection for F
where
    F: Fn(f64, f64) -> Option<Vec2>,
{
    fn project(&self, lon_deg: f64, lat_deg: f64) -> Option<Vec2> {
        self(lon_deg, lat_deg)
    }
}

/// Plate carrée fitted to a geographic window, y growing downwards.
///
/// Only meant for headless runs and tests; interactive hosts plug in their
/// own projection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Equirectangular {
    pub lon_range: [f64; 2],
    pub lat_range: [f64; 2],
    pub width: f64,
    pub height: f64,
}

impl Equirectangular {
    /// Contiguous US window used when nothing better is configured.
    pub fn conus(width: f64, height: f64) -> Self {
        Self {
            lon_range: [-125.0, -66.0],
            lat_range: [24.0, 50.0],
            width,
            height,
        }
    }
}

impl Projection for Equirectangular {
    fn project(&self, lon_deg: f64, lat_deg: f64) -> Option<Vec2> {
        let dlon = self.lon_range[1] - self.lon_range[0];
        let dlat = self.lat_range[1] - self.lat_range[0];
        if dlon == 0.0 || dlat == 0.0 || !lon_deg.is_finite() || !lat_deg.is_finite() {
            return None;
        }
        let x = (lon_deg - self.lon_range[0]) / dlon * self.width;
        let y = (self.lat_range[1] - lat_deg) / dlat * self.height;
        Some(Vec2::new(x, y))
    }
}
