use foundation::bounds::Aabb2;
use foundation::math::{Projection, Vec2};

use crate::records::{RegionPolygon, RegionTable};
use crate::selection::SelectionSet;

/// Uniform scale followed by translation, applied to the whole map layer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl ViewportTransform {
    pub const fn identity() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x * self.scale + self.translate_x,
            p.y * self.scale + self.translate_y,
        )
    }

    /// SVG `transform` attribute value; `None` for the identity.
    pub fn svg_transform(&self) -> Option<String> {
        if self.is_identity() {
            return None;
        }
        Some(format!(
            "translate({},{}) scale({})",
            self.translate_x, self.translate_y, self.scale
        ))
    }
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FitOptions {
    /// Total pixels kept free around the fitted box (split across both sides).
    pub padding_px: f64,
    /// Fraction of the maximal fit scale actually used.
    pub damping: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            padding_px: 40.0,
            damping: 0.95,
        }
    }
}

/// Tightest transform that centers `bounds` in the viewport.
///
/// Returns `None` for degenerate bounds (zero area or non-finite).
pub fn fit_bounds(
    bounds: Aabb2,
    viewport: ViewportSize,
    opts: FitOptions,
) -> Option<ViewportTransform> {
    if bounds.is_degenerate() {
        return None;
    }
    let k = ((viewport.width - opts.padding_px) / bounds.width())
        .min((viewport.height - opts.padding_px) / bounds.height())
        * opts.damping;
    if !k.is_finite() || k <= 0.0 {
        return None;
    }
    let [cx, cy] = bounds.center();
    Some(ViewportTransform {
        scale: k,
        translate_x: viewport.width / 2.0 - k * cx,
        translate_y: viewport.height / 2.0 - k * cy,
    })
}

/// Projected pixel bounds of one region's exterior rings.
///
/// Vertices the projection cannot place are skipped; `None` when nothing
/// could be projected.
pub fn projected_bounds(region: &RegionPolygon, projection: &dyn Projection) -> Option<Aabb2> {
    let points = region
        .exterior_vertices()
        .filter_map(|[lon, lat]| projection.project(lon, lat))
        .map(Vec2::to_array);
    Aabb2::from_points(points)
}

/// Union of [`projected_bounds`] over the selected regions.
pub fn selection_bounds(
    regions: &RegionTable,
    selection: &SelectionSet,
    projection: &dyn Projection,
) -> Option<Aabb2> {
    selection
        .iter()
        .filter_map(|id| regions.get(id))
        .filter_map(|region| projected_bounds(region, projection))
        .reduce(Aabb2::union)
}
