//! The tractography engine seam.
//!
//! The engine itself (UKF filtering, fiber propagation, stopping
//! criteria) is an external collaborator. This module defines the
//! interface the bridge drives it through, the shared parameter set,
//! and the handle that owns the single per-process instance.

mod errors;
mod handle;
mod parameters;

pub use errors::{EngineError, EngineResult};
pub use handle::{BoxedEngine, EngineHandle, EngineLauncher};
pub use parameters::EngineParameters;

use crate::geometry::VoxelSeed;
use crate::marshal::EngineVolume;
use crate::models::SharedPolyData;

/// Interface consumed from the tractography engine.
///
/// Calls arrive strictly sequenced by the session: data and seeds are
/// installed before `run`, and `run` blocks until the installed output
/// target is fully populated.
pub trait TractographyEngine: Send {
    /// Install working input data, replacing any previous set.
    ///
    /// `seed` is `None` when no seeding volume exists; the engine must
    /// treat the seed region as unavailable rather than reusing a
    /// bundle from an earlier call.
    fn set_data(
        &mut self,
        dwi: EngineVolume,
        mask: EngineVolume,
        seed: Option<EngineVolume>,
        normalized_dwi: bool,
    ) -> EngineResult<()>;

    /// Replace the seed list with an ordered set of voxel-space seeds.
    fn set_seeds(&mut self, seeds: Vec<VoxelSeed>);

    /// Install the mesh the next run writes into.
    fn set_output_polydata(&mut self, target: SharedPolyData);

    /// Execute tractography, populating the installed output target.
    ///
    /// Blocking and CPU-bound; returns once the mesh is complete.
    fn run(&mut self) -> EngineResult<()>;

    /// Recompute the internal filter model after input changes.
    ///
    /// Engines whose model does not depend on input shape may keep the
    /// default no-op.
    fn update_filter_model_type(&mut self) {}

    /// Read the shared runtime configuration.
    fn parameters(&self) -> &EngineParameters;

    /// Mutate the shared runtime configuration.
    ///
    /// Changes become effective on the next run.
    fn parameters_mut(&mut self) -> &mut EngineParameters;
}
