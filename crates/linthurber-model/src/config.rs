//! Model configuration.
//!
//! The configuration file is a list of `key = value` lines. Lines starting
//! with `#` or a space, and blank lines, are ignored. List values are
//! comma-separated. Unknown keys are ignored so that the same file can carry
//! settings for other tools.

use crate::{ModelError, Result};
use linthurber_grid::{DepthTable, GridGeometry, MAX_Z_DIM};
use linthurber_proj::BilinearProjector;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// UTM zone assumed when the configuration does not name one.
pub const DEFAULT_UTM_ZONE: i32 = 11;

/// How Vp/Vs are sampled between grid nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interpolation {
    /// Blend the eight surrounding nodes.
    #[default]
    Trilinear,
    /// Take the nearest node.
    Nearest,
}

/// How query depth is turned into a layer coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DepthMode {
    /// Subtract the DEM surface elevation, then blend between layers.
    #[default]
    DemRelative,
    /// Use the raw depth and snap to a layer without blending.
    Absolute,
}

/// Parsed model configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelConfig {
    /// UTM zone of the source data. Recorded only; the bilinear projection
    /// does not depend on it.
    pub utm_zone: i32,
    /// Sub-directory of the data directory holding the grid files.
    pub model_dir: String,
    /// Horizontal Vp spacing in metres.
    pub spacing_vp: f64,
    /// Horizontal Vs spacing in metres.
    pub spacing_vs: f64,
    /// DEM spacing in metres.
    pub spacing_dem: f64,
    /// Number of depth layers.
    pub num_z: usize,
    /// Corner longitudes of the model region.
    pub proj_xi: [f64; 4],
    /// Corner latitudes of the model region.
    pub proj_yi: [f64; 4],
    /// Projected extent `[x, y]` in metres.
    pub proj_dims: [f64; 2],
    /// Layer depths in km below mean sea level.
    pub depths_msl: Vec<f64>,
    /// Vp file origin `[y, x]` in km.
    pub vp_origin: [f64; 2],
    /// Vs file origin `[y, x]` in km.
    pub vs_origin: [f64; 2],
    /// Vp/Vs sampling between nodes (`interpolation = on|off`).
    pub interpolation: Interpolation,
    /// Whether query depth is corrected by the DEM (`use_dem = on|off`).
    pub depth_mode: DepthMode,
}

impl ModelConfig {
    /// Read and parse a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ModelError::io(path, e))?;
        let config: Self = text.parse()?;
        debug!(
            path = %path.display(),
            model_dir = %config.model_dir,
            num_z = config.num_z,
            spacing_vp = config.spacing_vp,
            spacing_vs = config.spacing_vs,
            spacing_dem = config.spacing_dem,
            proj_dims = ?config.proj_dims,
            interpolation = ?config.interpolation,
            depth_mode = ?config.depth_mode,
            "Parsed model configuration"
        );
        Ok(config)
    }

    /// Check that the values are mutually consistent.
    pub fn validate(&self) -> Result<()> {
        if self.model_dir.is_empty() {
            return Err(ModelError::Config("model_dir is empty".to_string()));
        }
        if self.depths_msl.len() != self.num_z {
            return Err(ModelError::Config(format!(
                "num_z is {} but depths_msl has {} entries",
                self.num_z,
                self.depths_msl.len()
            )));
        }
        self.geometry()?;
        self.depth_table()?;
        self.projector()?;
        Ok(())
    }

    /// Grid dimensions implied by this configuration.
    pub fn geometry(&self) -> Result<GridGeometry> {
        Ok(GridGeometry::new(
            self.proj_dims,
            self.spacing_dem,
            self.spacing_vp,
            self.spacing_vs,
            self.num_z,
        )?)
    }

    /// Depth breakpoint table.
    pub fn depth_table(&self) -> Result<DepthTable> {
        Ok(DepthTable::new(self.depths_msl.clone())?)
    }

    /// Projection from the configured bounding quadrilateral.
    pub fn projector(&self) -> Result<BilinearProjector> {
        BilinearProjector::new(self.proj_xi, self.proj_yi, self.proj_dims)
            .map_err(|e| ModelError::Config(e.to_string()))
    }
}

/// Values collected while scanning the file, before required keys are checked.
#[derive(Default)]
struct PartialConfig {
    utm_zone: Option<i32>,
    model_dir: Option<String>,
    spacing_vp: Option<f64>,
    spacing_vs: Option<f64>,
    spacing_dem: Option<f64>,
    num_z: Option<usize>,
    proj_xi: Option<[f64; 4]>,
    proj_yi: Option<[f64; 4]>,
    proj_dims: Option<[f64; 2]>,
    depths_msl: Option<Vec<f64>>,
    vp_origin: Option<[f64; 2]>,
    vs_origin: Option<[f64; 2]>,
    interpolation: Option<Interpolation>,
    depth_mode: Option<DepthMode>,
}

impl PartialConfig {
    fn apply(&mut self, line_no: usize, key: &str, value: &str) -> Result<()> {
        match key {
            "utm_zone" => self.utm_zone = Some(parse_scalar(line_no, key, value)?),
            "model_dir" => self.model_dir = Some(value.to_string()),
            "spacing_vp" => self.spacing_vp = Some(parse_scalar(line_no, key, value)?),
            "spacing_vs" => self.spacing_vs = Some(parse_scalar(line_no, key, value)?),
            "spacing_dem" => self.spacing_dem = Some(parse_scalar(line_no, key, value)?),
            "num_z" => self.num_z = Some(parse_scalar(line_no, key, value)?),
            "proj_xi" => self.proj_xi = Some(parse_array(line_no, key, value)?),
            "proj_yi" => self.proj_yi = Some(parse_array(line_no, key, value)?),
            "proj_dims" => self.proj_dims = Some(parse_array(line_no, key, value)?),
            "depths_msl" => {
                let depths = parse_list(line_no, key, value)?;
                if depths.len() > MAX_Z_DIM {
                    return Err(ModelError::Config(format!(
                        "line {}: depths_msl has {} entries, maximum is {}",
                        line_no,
                        depths.len(),
                        MAX_Z_DIM
                    )));
                }
                self.depths_msl = Some(depths);
            }
            "vp_origin" => self.vp_origin = Some(parse_array(line_no, key, value)?),
            "vs_origin" => self.vs_origin = Some(parse_array(line_no, key, value)?),
            "interpolation" => {
                self.interpolation = Some(if value == "on" {
                    Interpolation::Trilinear
                } else {
                    Interpolation::Nearest
                })
            }
            "use_dem" => {
                self.depth_mode = Some(if value == "on" {
                    DepthMode::DemRelative
                } else {
                    DepthMode::Absolute
                })
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<ModelConfig> {
        fn required<T>(value: Option<T>, key: &str) -> Result<T> {
            value.ok_or_else(|| ModelError::Config(format!("missing required key '{}'", key)))
        }

        let vp_origin = required(self.vp_origin, "vp_origin")?;
        let config = ModelConfig {
            utm_zone: self.utm_zone.unwrap_or(DEFAULT_UTM_ZONE),
            model_dir: required(self.model_dir, "model_dir")?,
            spacing_vp: required(self.spacing_vp, "spacing_vp")?,
            spacing_vs: required(self.spacing_vs, "spacing_vs")?,
            spacing_dem: required(self.spacing_dem, "spacing_dem")?,
            num_z: required(self.num_z, "num_z")?,
            proj_xi: required(self.proj_xi, "proj_xi")?,
            proj_yi: required(self.proj_yi, "proj_yi")?,
            proj_dims: required(self.proj_dims, "proj_dims")?,
            depths_msl: required(self.depths_msl, "depths_msl")?,
            vp_origin,
            vs_origin: self.vs_origin.unwrap_or(vp_origin),
            interpolation: self.interpolation.unwrap_or_default(),
            depth_mode: self.depth_mode.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}

impl FromStr for ModelConfig {
    type Err = ModelError;

    fn from_str(text: &str) -> Result<Self> {
        let mut partial = PartialConfig::default();

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            if raw.starts_with('#') || raw.starts_with(' ') || raw.trim().is_empty() {
                continue;
            }
            let (key, value) = raw.split_once('=').ok_or_else(|| {
                ModelError::Config(format!("line {}: expected 'key = value', got '{}'", line_no, raw.trim()))
            })?;
            partial.apply(line_no, key.trim(), value.trim())?;
        }

        partial.finish()
    }
}

fn parse_scalar<T: FromStr>(line_no: usize, key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        ModelError::Config(format!("line {}: invalid value '{}' for {}", line_no, value, key))
    })
}

fn parse_list(line_no: usize, key: &str, value: &str) -> Result<Vec<f64>> {
    value
        .split(',')
        .map(|item| parse_scalar(line_no, key, item.trim()))
        .collect()
}

fn parse_array<const N: usize>(line_no: usize, key: &str, value: &str) -> Result<[f64; N]> {
    let items = parse_list(line_no, key, value)?;
    let count = items.len();
    items.try_into().map_err(|_| {
        ModelError::Config(format!(
            "line {}: {} needs {} values, got {}",
            line_no, key, N, count
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use linthurber_grid::{GridDims, GridKind};

    const SAMPLE: &str = "\
# Lin-Thurber model configuration
utm_zone = 10
model_dir = lin-thurber

spacing_vp = 1000
spacing_vs = 2000
spacing_dem = 500
num_z = 3
 indented lines are comments too
proj_xi = -122.0,-121.0,-121.0,-122.0
proj_yi = 36.0,36.0,37.0,37.0
proj_dims = 10000,6000
depths_msl = -1.0, 0.0, 3.0
vp_origin = 1.5,-2.0
interpolation = on
unknown_key = ignored
";

    #[test]
    fn test_parse_sample() {
        let config: ModelConfig = SAMPLE.parse().expect("valid config");
        assert_eq!(config.utm_zone, 10);
        assert_eq!(config.model_dir, "lin-thurber");
        assert_eq!(config.spacing_vp, 1000.0);
        assert_eq!(config.spacing_vs, 2000.0);
        assert_eq!(config.spacing_dem, 500.0);
        assert_eq!(config.num_z, 3);
        assert_eq!(config.proj_xi, [-122.0, -121.0, -121.0, -122.0]);
        assert_eq!(config.proj_dims, [10000.0, 6000.0]);
        assert_eq!(config.depths_msl, vec![-1.0, 0.0, 3.0]);
        assert_eq!(config.vp_origin, [1.5, -2.0]);
        // vs_origin falls back to vp_origin
        assert_eq!(config.vs_origin, [1.5, -2.0]);
        assert_eq!(config.interpolation, Interpolation::Trilinear);
        assert_eq!(config.depth_mode, DepthMode::DemRelative);
    }

    #[test]
    fn test_geometry_from_config() {
        let config: ModelConfig = SAMPLE.parse().unwrap();
        let geometry = config.geometry().unwrap();
        assert_eq!(geometry.dims(GridKind::Dem), GridDims::new(21, 13, 1));
        assert_eq!(geometry.dims(GridKind::Vp), GridDims::new(11, 7, 3));
        assert_eq!(geometry.dims(GridKind::Vs), GridDims::new(6, 4, 3));
    }

    #[test]
    fn test_switches() {
        let text = SAMPLE
            .replace("interpolation = on", "interpolation = off")
            .replace("unknown_key = ignored", "use_dem = off\nvs_origin = 0.5,0.25");
        let config: ModelConfig = text.parse().unwrap();
        assert_eq!(config.interpolation, Interpolation::Nearest);
        assert_eq!(config.depth_mode, DepthMode::Absolute);
        assert_eq!(config.vs_origin, [0.5, 0.25]);
    }

    #[test]
    fn test_missing_key() {
        let text = SAMPLE.replace("spacing_dem = 500\n", "");
        match text.parse::<ModelConfig>() {
            Err(ModelError::Config(msg)) => assert!(msg.contains("spacing_dem"), "{}", msg),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_values() {
        let text = SAMPLE.replace("num_z = 3", "num_z = three");
        assert!(matches!(text.parse::<ModelConfig>(), Err(ModelError::Config(_))));

        let text = SAMPLE.replace("proj_dims = 10000,6000", "proj_dims = 10000");
        assert!(matches!(text.parse::<ModelConfig>(), Err(ModelError::Config(_))));

        let text = SAMPLE.replace("model_dir = lin-thurber", "model_dir lin-thurber");
        assert!(matches!(text.parse::<ModelConfig>(), Err(ModelError::Config(_))));
    }

    #[test]
    fn test_inconsistent_values() {
        let text = SAMPLE.replace("num_z = 3", "num_z = 4");
        assert!(matches!(text.parse::<ModelConfig>(), Err(ModelError::Config(_))));

        let text = SAMPLE.replace("depths_msl = -1.0, 0.0, 3.0", "depths_msl = -1.0,3.0,3.0");
        assert!(matches!(text.parse::<ModelConfig>(), Err(ModelError::Config(_))));

        let text = SAMPLE.replace("spacing_vs = 2000", "spacing_vs = 0");
        assert!(matches!(text.parse::<ModelConfig>(), Err(ModelError::Config(_))));

        let text = SAMPLE.replace("proj_yi = 36.0,36.0,37.0,37.0", "proj_yi = 36.0,36.0,36.0,36.0");
        assert!(matches!(text.parse::<ModelConfig>(), Err(ModelError::Config(_))));
    }

    #[test]
    fn test_from_file_missing() {
        let result = ModelConfig::from_file("/nonexistent/linthurber/config");
        assert!(matches!(result, Err(ModelError::Io { .. })));
    }
}
