//! The assembled velocity model and its point queries.

use crate::config::{DepthMode, Interpolation, ModelConfig};
use crate::density::nafe_drake_density;
use crate::loader::{load_dem, load_velocity, GridFiles, VelocityGrid};
use crate::types::{GeoPoint, MaterialProperties};
use crate::{ModelError, Result};
use linthurber_grid::{DepthTable, GridGeometry, GridKind, GridVolume};
use linthurber_proj::Projector;
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, trace};

/// Identifier reported by [`VelocityModel::version`].
pub const VERSION: &str = "linthurber";

/// The Lin-Thurber velocity model, loaded and ready for queries.
///
/// A model owns its configuration, projection and the three grid volumes.
/// Queries only read from it, so a single model can be shared across
/// threads. Dropping the model (or calling [`VelocityModel::finalize`])
/// releases all grid memory.
///
/// # Example
///
/// ```no_run
/// use linthurber_model::{GeoPoint, MaterialProperties, VelocityModel};
///
/// let model = VelocityModel::init("/opt/ucvm", "linthurber")?;
///
/// let points = [GeoPoint::new(-121.5, 36.5, 1000.0)];
/// let mut props = [MaterialProperties::default()];
/// model.query(&points, &mut props)?;
/// println!("vp={} vs={} rho={}", props[0].vp, props[0].vs, props[0].rho);
///
/// model.finalize()?;
/// # Ok::<(), linthurber_model::ModelError>(())
/// ```
pub struct VelocityModel {
    config: ModelConfig,
    config_path: Option<PathBuf>,
    geometry: GridGeometry,
    depths: DepthTable,
    projector: Box<dyn Projector>,
    dem: GridVolume,
    vp: GridVolume,
    vs: GridVolume,
}

impl fmt::Debug for VelocityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VelocityModel")
            .field("config", &self.config)
            .field("config_path", &self.config_path)
            .field("geometry", &self.geometry)
            .field("projector", &"<projector>")
            .field("dem", &self.dem.status())
            .field("vp", &self.vp.status())
            .field("vs", &self.vs.status())
            .finish()
    }
}

impl VelocityModel {
    /// Load the model named `label` from a framework installation at `base_dir`.
    ///
    /// The configuration is read from `{base_dir}/model/{label}/data/config`
    /// and the grid files from `{base_dir}/model/{label}/data/{model_dir}/`.
    pub fn init<P: AsRef<Path>>(base_dir: P, label: &str) -> Result<Self> {
        let data_dir = base_dir.as_ref().join("model").join(label).join("data");
        let config_path = data_dir.join("config");
        let config = ModelConfig::from_file(&config_path)?;

        let geometry = config.geometry()?;
        let depths = config.depth_table()?;
        let projector = config.projector()?;

        let files = GridFiles::in_dir(data_dir.join(&config.model_dir));
        let vp = load_velocity(&files.vp, VelocityGrid::Vp, &config, &geometry, &depths)?;
        let vs = load_velocity(&files.vs, VelocityGrid::Vs, &config, &geometry, &depths)?;
        let dem = load_dem(&files.dem, &geometry)?;

        info!(
            label,
            config = %config_path.display(),
            num_z = geometry.num_z(),
            "Velocity model initialised"
        );

        let mut model = Self::from_parts(config, Box::new(projector), dem, vp, vs)?;
        model.config_path = Some(config_path);
        Ok(model)
    }

    /// Assemble a model from already-built volumes.
    ///
    /// The volumes' dimensions must match the geometry implied by `config`.
    pub fn from_parts(
        config: ModelConfig,
        projector: Box<dyn Projector>,
        dem: GridVolume,
        vp: GridVolume,
        vs: GridVolume,
    ) -> Result<Self> {
        config.validate()?;
        let geometry = config.geometry()?;
        let depths = config.depth_table()?;

        for (kind, volume) in [(GridKind::Dem, &dem), (GridKind::Vp, &vp), (GridKind::Vs, &vs)] {
            let expected = geometry.dims(kind);
            if volume.dims() != expected {
                return Err(ModelError::Load(format!(
                    "{} grid is {:?}, configuration expects {:?}",
                    kind.name(),
                    volume.dims().as_array(),
                    expected.as_array()
                )));
            }
        }

        Ok(Self {
            config,
            config_path: None,
            geometry,
            depths,
            projector,
            dem,
            vp,
            vs,
        })
    }

    /// Replace the projection used to place query points.
    pub fn with_projector(mut self, projector: Box<dyn Projector>) -> Self {
        self.projector = projector;
        self
    }

    /// Model identifier.
    pub fn version() -> &'static str {
        VERSION
    }

    /// One-line description of where the configuration came from.
    pub fn config_summary(&self) -> String {
        match &self.config_path {
            Some(path) => format!("config = {}", path.display()),
            None => "config = <in-memory>".to_string(),
        }
    }

    /// The configuration the model was built from.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Grid geometry.
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// The volume backing one grid.
    pub fn volume(&self, kind: GridKind) -> &GridVolume {
        match kind {
            GridKind::Dem => &self.dem,
            GridKind::Vp => &self.vp,
            GridKind::Vs => &self.vs,
        }
    }

    /// Release all grid memory.
    pub fn finalize(self) -> Result<()> {
        info!(config = %self.config_summary(), "Velocity model finalised");
        drop(self);
        Ok(())
    }

    /// Query a batch of points.
    ///
    /// Each point is handled independently. A point that cannot be resolved
    /// (outside the projection, outside a grid, grid not resident) leaves its
    /// output at the sentinel `-1`; the batch itself only fails when the two
    /// slices differ in length.
    pub fn query(&self, points: &[GeoPoint], out: &mut [MaterialProperties]) -> Result<()> {
        check_lengths(points, out)?;
        for (point, props) in points.iter().zip(out.iter_mut()) {
            *props = self.query_point(point);
        }
        Ok(())
    }

    /// Query a batch of points in parallel.
    ///
    /// Produces exactly the same output as [`VelocityModel::query`].
    pub fn query_par(&self, points: &[GeoPoint], out: &mut [MaterialProperties]) -> Result<()> {
        check_lengths(points, out)?;
        out.par_iter_mut()
            .zip(points.par_iter())
            .for_each(|(props, point)| *props = self.query_point(point));
        Ok(())
    }

    /// Query a single point.
    pub fn query_point(&self, point: &GeoPoint) -> MaterialProperties {
        let mut props = MaterialProperties::unknown();

        let (x, y) = match self.projector.geo_to_xy(point.longitude, point.latitude) {
            Ok(xy) => xy,
            Err(e) => {
                trace!(lon = point.longitude, lat = point.latitude, error = %e, "Point not projected");
                return props;
            }
        };

        let z = match self.config.depth_mode {
            DepthMode::DemRelative => match self.sample(GridKind::Dem, x, y, 0.0) {
                Ok(elevation) => {
                    let depth_km = (point.depth - elevation) / 1000.0;
                    self.depths.fractional_layer(depth_km)
                }
                Err(e) => {
                    trace!(x, y, error = %e, "No surface elevation");
                    return props;
                }
            },
            DepthMode::Absolute => self.depths.discrete_layer(point.depth / 1000.0) as f64,
        };

        match self.sample(GridKind::Vp, x, y, z) {
            Ok(vp) => props.vp = vp,
            Err(e) => trace!(x, y, z, error = %e, "No Vp sample"),
        }
        match self.sample(GridKind::Vs, x, y, z) {
            Ok(vs) => props.vs = vs,
            Err(e) => trace!(x, y, z, error = %e, "No Vs sample"),
        }

        if props.vp > 0.0 {
            props.rho = nafe_drake_density(props.vp);
        }
        props
    }

    /// Sample one grid at a projected position (metres) and layer coordinate.
    fn sample(&self, kind: GridKind, x: f64, y: f64, z: f64) -> Result<f64> {
        let (i, j) = self.geometry.to_index_space(kind, x, y);
        let volume = self.volume(kind);
        let value = match self.config.interpolation {
            Interpolation::Trilinear => volume.sample(i, j, z)?,
            Interpolation::Nearest => volume.sample_nearest(i, j, z)?,
        };
        Ok(value)
    }
}

fn check_lengths(points: &[GeoPoint], out: &[MaterialProperties]) -> Result<()> {
    if points.len() != out.len() {
        return Err(ModelError::LengthMismatch {
            points: points.len(),
            outputs: out.len(),
        });
    }
    Ok(())
}
