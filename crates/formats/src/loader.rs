use std::path::{Path, PathBuf};

use scene::{FireRecord, RegionTable};
use tracing::info;

use crate::feature_collection::{FeatureCollection, GeoJsonError};
use crate::hotspots::decode_fire_records;
use crate::regions::decode_regions;

#[derive(Debug)]
pub enum LoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    GeoJson {
        path: PathBuf,
        source: GeoJsonError,
    },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            LoadError::GeoJson { path, source } => {
                write!(f, "invalid GeoJSON in {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::GeoJson { source, .. } => Some(source),
        }
    }
}

/// Reads a GeoJSON FeatureCollection from disk.
pub fn load_feature_collection(path: &Path) -> Result<FeatureCollection, LoadError> {
    let payload = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let fc = FeatureCollection::from_geojson_str(&payload).map_err(|source| {
        LoadError::GeoJson {
            path: path.to_path_buf(),
            source,
        }
    })?;
    info!(path = %path.display(), features = fc.len(), "loaded feature collection");
    Ok(fc)
}

pub fn load_fire_records(path: &Path) -> Result<Vec<FireRecord>, LoadError> {
    load_feature_collection(path).map(|fc| decode_fire_records(&fc))
}

pub fn load_regions(path: &Path) -> Result<RegionTable, LoadError> {
    load_feature_collection(path).map(|fc| decode_regions(&fc))
}
