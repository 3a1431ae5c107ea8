//! Reading grid files into resident volumes.
//!
//! Vp and Vs come as whitespace-delimited text records of seven numbers:
//!
//! ```text
//! <unused> <unused> <depth km> <y km> <x km> <velocity km/s> <unused>
//! ```
//!
//! Each record is placed into the cell whose layer is the first breakpoint at
//! or below its depth, and whose horizontal index is derived from the file
//! origin with the x axis flipped. Cells not covered by any record keep the
//! sentinel `-1`.
//!
//! The DEM is a raw array of little-endian `f32` elevations (metres), one per
//! horizontal DEM cell.

use crate::config::ModelConfig;
use crate::types::SENTINEL;
use crate::{ModelError, Result};
use bytes::Buf;
use linthurber_grid::{DepthTable, GridDims, GridError, GridGeometry, GridKind, GridVolume};
use std::path::{Path, PathBuf};
use tracing::info;

/// Number of numeric fields in one Vp/Vs record.
const FIELDS_PER_RECORD: usize = 7;

/// Locations of the three grid files inside a model data directory.
#[derive(Debug, Clone)]
pub struct GridFiles {
    pub vp: PathBuf,
    pub vs: PathBuf,
    pub dem: PathBuf,
}

impl GridFiles {
    /// Standard file names under `data_dir`.
    pub fn in_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        let dir = data_dir.as_ref();
        Self {
            vp: dir.join("lin-thurber.vp"),
            vs: dir.join("lin-thurber.vs"),
            dem: dir.join("lin-thurber.dem"),
        }
    }
}

/// One parsed Vp/Vs record.
#[derive(Debug, Clone, Copy, PartialEq)]
struct VelocityRecord {
    depth_km: f64,
    y_km: f64,
    x_km: f64,
    velocity_km_s: f64,
}

/// Parse the full text of a Vp/Vs file into records.
fn parse_records(text: &str) -> Result<Vec<VelocityRecord>> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() % FIELDS_PER_RECORD != 0 {
        return Err(ModelError::Load(format!(
            "record {} is truncated ({} of {} fields)",
            tokens.len() / FIELDS_PER_RECORD,
            tokens.len() % FIELDS_PER_RECORD,
            FIELDS_PER_RECORD
        )));
    }

    tokens
        .chunks_exact(FIELDS_PER_RECORD)
        .enumerate()
        .map(|(n, fields)| {
            let mut values = [0.0f64; FIELDS_PER_RECORD];
            for (slot, field) in values.iter_mut().zip(fields) {
                *slot = field
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| {
                        ModelError::Load(format!("record {}: '{}' is not a finite number", n, field))
                    })?;
            }
            Ok(VelocityRecord {
                depth_km: values[2],
                y_km: values[3],
                x_km: values[4],
                velocity_km_s: values[5],
            })
        })
        .collect()
}

/// Place velocity records into a volume.
///
/// `origin` is the file origin `[y, x]` in km and `extent_x` the projected
/// width in metres.
fn fill_velocity(
    records: &[VelocityRecord],
    dims: GridDims,
    spacing: f64,
    origin: [f64; 2],
    extent_x: f64,
    depths: &DepthTable,
) -> Result<GridVolume> {
    let mut volume = GridVolume::filled(dims, SENTINEL as f32)?;

    for (n, record) in records.iter().enumerate() {
        let k = depths.containing_layer(record.depth_km).ok_or_else(|| {
            ModelError::Load(format!(
                "record {}: depth {} km is below the deepest layer",
                n, record.depth_km
            ))
        })?;
        let j = ((record.y_km - origin[0]) * 1000.0 / spacing).round();
        let i = ((extent_x / 1000.0 - (record.x_km - origin[1])) * 1000.0 / spacing).round();
        // `as i64` saturates, and maps NaN to 0.
        if !(i.is_finite() && j.is_finite()) {
            return Err(ModelError::Load(format!(
                "record {}: invalid index calculated ({}, {})",
                n, i, j
            )));
        }
        let (i, j) = (i as i64, j as i64);
        let value = (record.velocity_km_s * 1000.0) as f32;
        if !value.is_finite() {
            return Err(ModelError::Load(format!(
                "record {}: velocity {} km/s does not fit the grid",
                n, record.velocity_km_s
            )));
        }

        volume
            .set(i, j, k as i64, value)
            .map_err(|e| match e {
                GridError::IndexOutOfRange { .. } => {
                    ModelError::Load(format!("record {}: invalid index calculated ({})", n, e))
                }
                other => other.into(),
            })?;
    }

    Ok(volume)
}

/// The grids stored as velocity text records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VelocityGrid {
    Vp,
    Vs,
}

impl VelocityGrid {
    /// The grid this file fills.
    pub fn kind(self) -> GridKind {
        match self {
            VelocityGrid::Vp => GridKind::Vp,
            VelocityGrid::Vs => GridKind::Vs,
        }
    }

    /// File origin `[y, x]` in km.
    pub fn origin(self, config: &ModelConfig) -> [f64; 2] {
        match self {
            VelocityGrid::Vp => config.vp_origin,
            VelocityGrid::Vs => config.vs_origin,
        }
    }
}

/// Load a Vp or Vs text file.
pub fn load_velocity(
    path: &Path,
    grid: VelocityGrid,
    config: &ModelConfig,
    geometry: &GridGeometry,
    depths: &DepthTable,
) -> Result<GridVolume> {
    let kind = grid.kind();
    let text = std::fs::read_to_string(path).map_err(|e| ModelError::io(path, e))?;
    let records = parse_records(&text)
        .map_err(|e| ModelError::Load(format!("{}: {}", path.display(), e)))?;
    let dims = geometry.dims(kind);
    let volume = fill_velocity(
        &records,
        dims,
        geometry.spacing(kind),
        grid.origin(config),
        geometry.extent()[0],
        depths,
    )
    .map_err(|e| ModelError::Load(format!("{}: {}", path.display(), e)))?;

    info!(
        grid = kind.name(),
        records = records.len(),
        nx = dims.nx,
        ny = dims.ny,
        nz = dims.nz,
        "Loaded velocity grid"
    );
    Ok(volume)
}

/// Decode little-endian `f32` elevations.
fn decode_dem(mut bytes: &[u8], dims: GridDims) -> Result<GridVolume> {
    let count = dims.len();
    let expected = count * std::mem::size_of::<f32>();
    if bytes.len() != expected {
        return Err(ModelError::Load(format!(
            "DEM holds {} bytes, expected {} ({} x {} floats)",
            bytes.len(),
            expected,
            dims.nx,
            dims.ny
        )));
    }

    let mut values = Vec::with_capacity(count);
    while bytes.has_remaining() {
        values.push(bytes.get_f32_le());
    }
    Ok(GridVolume::resident(dims, values)?)
}

/// Load the raw binary DEM file.
pub fn load_dem(path: &Path, geometry: &GridGeometry) -> Result<GridVolume> {
    let dims = geometry.dims(GridKind::Dem);
    let bytes = std::fs::read(path).map_err(|e| ModelError::io(path, e))?;
    let volume = decode_dem(&bytes, dims)
        .map_err(|e| ModelError::Load(format!("{}: {}", path.display(), e)))?;

    info!(grid = GridKind::Dem.name(), nx = dims.nx, ny = dims.ny, "Loaded DEM grid");
    Ok(volume)
}
