//! Explorer settings. Every field has a default, so an empty JSON object is
//! a complete configuration.

use std::fmt;
use std::path::{Path, PathBuf};

use compute::{NotchError, NotchSet, Season};
use layers::chart::{ChartStyle, Margins};
use layers::fire::FireTransitions;
use layers::symbology::{FireSymbology, Rgb, SymbologyStyle};
use scene::viewport::FitOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json(serde_json::Error),
    Notches(NotchError),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Json(e) => write!(f, "config parse error: {e}"),
            ConfigError::Notches(e) => write!(f, "invalid notches: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Json(e) => Some(e),
            ConfigError::Notches(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotchConfig {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl Default for NotchConfig {
    fn default() -> Self {
        Self {
            start: 325.0,
            end: 500.0,
            step: 25.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbologyConfig {
    pub domain: [f64; 2],
    pub radius_px: [f64; 2],
    pub opacity: [f64; 2],
    pub low_color: [u8; 3],
    pub high_color: [u8; 3],
}

impl Default for SymbologyConfig {
    fn default() -> Self {
        Self {
            domain: [325.0, 510.0],
            radius_px: [1.0, 6.0],
            opacity: [0.35, 0.9],
            low_color: [255, 0, 0],
            high_color: [255, 255, 0],
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub enter_ms: u32,
    pub update_ms: u32,
    pub viewport_ms: u32,
    pub reset_ms: u32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            enter_ms: 150,
            update_ms: 150,
            viewport_ms: 700,
            reset_ms: 600,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    pub padding_px: f64,
    pub damping: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            padding_px: 40.0,
            damping: 0.95,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginConfig {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            top: 18.0,
            right: 12.0,
            bottom: 48.0,
            left: 36.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub margin: MarginConfig,
    pub min_extent_px: f64,
    pub fallback_domain: [f64; 2],
    pub y_ticks: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            margin: MarginConfig::default(),
            min_extent_px: 10.0,
            fallback_domain: [300.0, 340.0],
            y_ticks: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub notches: NotchConfig,
    /// Padding added around each region's bounding box before the
    /// containment prefilter, in degrees.
    pub bbox_padding_deg: f64,
    pub symbology: SymbologyConfig,
    pub transitions: TransitionConfig,
    pub fit: FitConfig,
    pub chart: ChartConfig,
    /// Delay before the containment pass starts, so a loading indicator can
    /// paint first.
    pub index_delay_s: f64,
    pub initial_seasons: Vec<Season>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            notches: NotchConfig::default(),
            bbox_padding_deg: 0.01,
            symbology: SymbologyConfig::default(),
            transitions: TransitionConfig::default(),
            fit: FitConfig::default(),
            chart: ChartConfig::default(),
            index_delay_s: 0.02,
            initial_seasons: Season::ALL.to_vec(),
        }
    }
}

impl ExplorerConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(payload).map_err(ConfigError::Json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let payload = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&payload)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.notch_set()?;
        let [d0, d1] = self.symbology.domain;
        if !d0.is_finite() || !d1.is_finite() || d0 == d1 {
            return Err(ConfigError::Invalid(format!(
                "symbology domain [{d0}, {d1}] is degenerate"
            )));
        }
        if !(self.fit.damping > 0.0 && self.fit.damping <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "fit damping {} must be in (0, 1]",
                self.fit.damping
            )));
        }
        if !self.bbox_padding_deg.is_finite() || self.bbox_padding_deg < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "bbox padding {} must be a non-negative number",
                self.bbox_padding_deg
            )));
        }
        if !self.index_delay_s.is_finite() || self.index_delay_s < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "index delay {} must be a non-negative number",
                self.index_delay_s
            )));
        }
        Ok(())
    }

    pub fn notch_set(&self) -> Result<NotchSet, ConfigError> {
        let n = self.notches;
        NotchSet::new(n.start, n.end, n.step).map_err(ConfigError::Notches)
    }

    pub fn symbology_style(&self) -> SymbologyStyle {
        let s = self.symbology;
        let rgb = |c: [u8; 3]| Rgb::new(c[0], c[1], c[2]);
        SymbologyStyle {
            domain: s.domain,
            radius_px: s.radius_px,
            opacity: s.opacity,
            low_color: rgb(s.low_color),
            high_color: rgb(s.high_color),
        }
    }

    pub fn fire_symbology(&self) -> FireSymbology {
        FireSymbology::new(&self.symbology_style())
    }

    pub fn fire_transitions(&self) -> FireTransitions {
        FireTransitions {
            enter_ms: self.transitions.enter_ms,
            update_ms: self.transitions.update_ms,
        }
    }

    pub fn fit_options(&self) -> FitOptions {
        FitOptions {
            padding_px: self.fit.padding_px,
            damping: self.fit.damping,
        }
    }

    pub fn chart_style(&self) -> ChartStyle {
        let c = self.chart;
        ChartStyle {
            margin: Margins {
                top: c.margin.top,
                right: c.margin.right,
                bottom: c.margin.bottom,
                left: c.margin.left,
            },
            min_extent_px: c.min_extent_px,
            fallback_domain: c.fallback_domain,
            y_ticks: c.y_ticks,
            symbology: self.fire_symbology(),
            ..ChartStyle::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ExplorerConfig};
    use compute::{NotchError, NotchSet, Season};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_is_the_default() {
        let cfg = ExplorerConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, ExplorerConfig::default());
        assert_eq!(cfg.notch_set().unwrap(), NotchSet::default());
        assert_eq!(cfg.initial_seasons.len(), 4);
    }

    #[test]
    fn partial_overrides() {
        let cfg = ExplorerConfig::from_json_str(
            r#"{ "notches": { "step": 50 }, "initial_seasons": ["Summer"], "fit": { "damping": 0.8 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.notch_set().unwrap().values(), &[325.0, 375.0, 425.0, 475.0]);
        assert_eq!(cfg.initial_seasons, vec![Season::Summer]);
        assert_eq!(cfg.fit_options().damping, 0.8);
        assert_eq!(cfg.fit.padding_px, 40.0);
    }

    #[test]
    fn rejects_bad_values() {
        let err = ExplorerConfig::from_json_str(r#"{ "notches": { "step": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Notches(_)));
        let err = ExplorerConfig::from_json_str(r#"{ "notches": { "step": 1e-9 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Notches(NotchError::TooMany { .. })));
        let err = ExplorerConfig::from_json_str(r#"{ "fit": { "damping": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = ExplorerConfig::from_json_str(r#"{ "symbology": { "domain": [1, 1] } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("degenerate"));
        assert!(matches!(
            ExplorerConfig::from_json_str("not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
