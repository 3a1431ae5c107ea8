//! # linthurber-model
//!
//! The Lin-Thurber seismic velocity model.
//!
//! Given a longitude, latitude and depth, the model reports P-wave velocity,
//! S-wave velocity and density. Internally it:
//!
//! 1. projects the point onto the model plane ([`linthurber_proj`]),
//! 2. optionally corrects the depth by the surface elevation from the DEM,
//! 3. converts depth to a layer coordinate with the depth breakpoint table,
//! 4. samples the Vp and Vs grids ([`linthurber_grid`]), and
//! 5. derives density from Vp with the Nafe-Drake relation.
//!
//! ## Model layout on disk
//!
//! ```text
//! {base_dir}/model/{label}/data/config
//! {base_dir}/model/{label}/data/{model_dir}/lin-thurber.vp
//! {base_dir}/model/{label}/data/{model_dir}/lin-thurber.vs
//! {base_dir}/model/{label}/data/{model_dir}/lin-thurber.dem
//! ```
//!
//! See [`ModelConfig`] for the configuration keys and [`loader`] for the
//! grid file formats.
//!
//! ## Example
//!
//! ```no_run
//! use linthurber_model::{GeoPoint, MaterialProperties, VelocityModel};
//!
//! let model = VelocityModel::init("/opt/ucvm", "linthurber")?;
//! let props = model.query_point(&GeoPoint::new(-121.5, 36.5, 2000.0));
//! if props.vp > 0.0 {
//!     println!("vp={:.0} m/s rho={:.0} kg/m^3", props.vp, props.rho);
//! }
//! # Ok::<(), linthurber_model::ModelError>(())
//! ```

mod config;
mod density;
mod error;
pub mod loader;
mod model;
mod types;

pub use config::{DepthMode, Interpolation, ModelConfig, DEFAULT_UTM_ZONE};
pub use density::nafe_drake_density;
pub use error::ModelError;
pub use model::{VelocityModel, VERSION};
pub use types::{GeoPoint, MaterialProperties, SENTINEL};

// Re-export the building blocks so hosts only need this crate.
pub use linthurber_grid::{DepthTable, GridDims, GridGeometry, GridKind, GridVolume, VolumeStatus};
pub use linthurber_proj::{BilinearProjector, ProjectionError, Projector};

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
