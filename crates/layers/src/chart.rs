//! Monthly-average brightness chart.
//!
//! Coordinates are relative to the plot area, whose top-left corner sits at
//! `(margin.left, margin.top)` inside the container.

use compute::MonthlyAverages;
use foundation::math::Vec2;
use foundation::time::{Month, MonthSet};
use scene::viewport::ViewportSize;

use crate::symbology::{FireSymbology, LinearScale, Rgb};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 18.0,
            right: 12.0,
            bottom: 48.0,
            left: 36.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ChartStyle {
    pub margin: Margins,
    /// Smallest plot width/height, whatever the container size.
    pub min_extent_px: f64,
    /// Y domain when no month has an average.
    pub fallback_domain: [f64; 2],
    pub y_ticks: usize,
    pub point_radius_px: f64,
    pub band_opacity: f64,
    pub empty_band_fill: Rgb,
    pub empty_band_opacity: f64,
    /// Band colors follow the point layer's brightness colors.
    pub symbology: FireSymbology,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            margin: Margins::default(),
            min_extent_px: 10.0,
            fallback_domain: [300.0, 340.0],
            y_ticks: 3,
            point_radius_px: 3.0,
            band_opacity: 0.16,
            empty_band_fill: Rgb::STEELBLUE,
            empty_band_opacity: 0.12,
            symbology: FireSymbology::default(),
        }
    }
}

/// Background highlight for one month column.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBand {
    pub month: Month,
    pub x: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Rgb,
    pub opacity: f64,
    /// Only months of the selected seasons are highlighted.
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub month: Month,
    pub x: f64,
    /// `None` for months without an average; the point is hidden.
    pub y: Option<f64>,
    pub value: Option<f64>,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    /// Pixel offset along the axis.
    pub offset: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub margin: Margins,
    pub width: f64,
    pub height: f64,
    pub y_domain: [f64; 2],
    pub bands: Vec<MonthBand>,
    /// Polyline pieces; a month without an average breaks the line.
    pub line: Vec<Vec<Vec2>>,
    pub points: Vec<ChartPoint>,
    pub x_ticks: Vec<AxisTick>,
    pub y_ticks: Vec<AxisTick>,
    pub x_label: (Vec2, &'static str),
    /// Anchor before the -90° rotation.
    pub y_label: (Vec2, &'static str),
}

pub struct ChartLayout;

impl ChartLayout {
    /// Lays out the chart for the current container size. Called on every
    /// redraw and resize; nothing is cached between calls.
    pub fn compute(
        averages: &MonthlyAverages,
        container: ViewportSize,
        highlighted: &MonthSet,
        style: &ChartStyle,
    ) -> ChartFrame {
        let m = style.margin;
        let width = (container.width - m.left - m.right).max(style.min_extent_px);
        let height = (container.height - m.top - m.bottom).max(style.min_extent_px);

        let step = width / 12.0;
        let x_of = |month: Month| step * (month.index() as f64 + 0.5);

        let domain = averages.extent().map_or(style.fallback_domain, |(lo, hi)| [lo, hi]);
        let y = LinearScale::new(domain, [height, 0.0]).nice(10);

        let bands = Month::ALL
            .into_iter()
            .map(|month| {
                let (fill, opacity) = match averages.get(month) {
                    Some(avg) => (style.symbology.color(avg), style.band_opacity),
                    None => (style.empty_band_fill, style.empty_band_opacity),
                };
                MonthBand {
                    month,
                    x: x_of(month) - step / 2.0,
                    width: step,
                    height,
                    fill,
                    opacity,
                    visible: highlighted.contains(month),
                }
            })
            .collect();

        let points: Vec<ChartPoint> = averages
            .iter()
            .map(|(month, value)| ChartPoint {
                month,
                x: x_of(month),
                y: value.map(|v| y.map(v)),
                value,
                radius: style.point_radius_px,
            })
            .collect();

        let mut line: Vec<Vec<Vec2>> = Vec::new();
        let mut current: Vec<Vec2> = Vec::new();
        for p in &points {
            match p.y {
                Some(py) => current.push(Vec2::new(p.x, py)),
                None if !current.is_empty() => line.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            line.push(current);
        }

        let x_ticks = Month::ALL
            .into_iter()
            .map(|month| AxisTick {
                offset: x_of(month),
                label: month.number().to_string(),
            })
            .collect();
        let y_ticks = y
            .ticks(style.y_ticks)
            .into_iter()
            .map(|v| AxisTick {
                offset: y.map(v),
                label: format_tick(v),
            })
            .collect();

        ChartFrame {
            margin: m,
            width,
            height,
            y_domain: y.domain,
            bands,
            line,
            points,
            x_ticks,
            y_ticks,
            x_label: (Vec2::new(width / 2.0, height + m.bottom - 10.0), "month"),
            y_label: (Vec2::new(-28.0, height / 2.0), "Brightness"),
        }
    }
}

fn format_tick(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        let s = format!("{v:.6}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartLayout, ChartStyle};
    use crate::symbology::Rgb;
    use chrono::NaiveDate;
    use compute::MonthlyAverages;
    use foundation::ids::RecordId;
    use foundation::time::{Month, MonthSet};
    use pretty_assertions::assert_eq;
    use scene::FireRecord;
    use scene::viewport::ViewportSize;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {a} ~= {b}");
    }

    fn averages(entries: &[(u32, f64)]) -> MonthlyAverages {
        let records: Vec<FireRecord> = entries
            .iter()
            .enumerate()
            .map(|(i, (m, b))| {
                FireRecord::new(RecordId::new(i.to_string()))
                    .with_brightness(*b)
                    .with_date(NaiveDate::from_ymd_opt(2024, *m, 1).unwrap())
            })
            .collect();
        MonthlyAverages::from_records(&records)
    }

    #[test]
    fn layout_follows_container_size() {
        let avg = averages(&[(1, 341.0), (2, 360.0), (4, 398.0), (5, 380.0)]);
        let winter: MonthSet = [Month::November, Month::December, Month::January]
            .into_iter()
            .collect();
        let frame = ChartLayout::compute(
            &avg,
            ViewportSize::new(288.0, 166.0),
            &winter,
            &ChartStyle::default(),
        );
        assert_close(frame.width, 240.0);
        assert_close(frame.height, 100.0);
        assert_eq!(frame.y_domain, [340.0, 400.0]);

        assert_close(frame.points[0].x, 10.0);
        assert_close(frame.points[11].x, 230.0);
        assert_close(frame.points[0].y.unwrap(), 100.0 - 100.0 / 60.0);
        assert_eq!(frame.points[2].y, None);

        // January and February join; March breaks the line.
        assert_eq!(frame.line.len(), 2);
        assert_eq!(frame.line[0].len(), 2);
        assert_eq!(frame.line[1].len(), 2);

        let visible: Vec<Month> = frame.bands.iter().filter(|b| b.visible).map(|b| b.month).collect();
        assert_eq!(visible, vec![Month::January, Month::November, Month::December]);
        assert_close(frame.bands[0].x, 0.0);
        assert_close(frame.bands[0].width, 20.0);
        assert_eq!(frame.bands[2].fill, Rgb::STEELBLUE);
        assert_close(frame.bands[2].opacity, 0.12);
        assert_close(frame.bands[0].opacity, 0.16);

        let labels: Vec<&str> = frame.y_ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["340", "360", "380", "400"]);
        assert_eq!(frame.x_ticks[11].label, "12");
    }

    #[test]
    fn empty_averages_use_fallback_domain() {
        let frame = ChartLayout::compute(
            &MonthlyAverages::default(),
            ViewportSize::new(10.0, 10.0),
            &MonthSet::all(),
            &ChartStyle::default(),
        );
        assert_close(frame.width, 10.0);
        assert_close(frame.height, 10.0);
        assert_eq!(frame.y_domain, [300.0, 340.0]);
        assert!(frame.line.is_empty());
        assert!(frame.points.iter().all(|p| p.y.is_none()));
        assert!(frame.bands.iter().all(|b| b.fill == Rgb::STEELBLUE));
    }
}
