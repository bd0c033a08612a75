//! Engine-native volume bundle.

use nalgebra::{Matrix3, Matrix4};

use crate::models::{GradientTable, VolumeRole};

/// A volume packaged for the engine.
///
/// Holds its own sample copy; ownership passes to the engine at
/// `set_data` and the bridge never touches the bundle afterward.
/// Orientation is always present. Measurement frame and gradients exist
/// only on diffusion bundles, and only when the source volume carried
/// them; absent metadata stays absent instead of decaying to zeros.
#[derive(Debug, Clone)]
pub struct EngineVolume {
    /// Role this bundle was marshaled for.
    pub role: VolumeRole,
    /// Grid extent along I, J, K.
    pub dims: [usize; 3],
    /// Samples per voxel.
    pub num_components: usize,
    /// Owned sample copy, component-interleaved.
    pub samples: Vec<f32>,
    /// Index-to-world affine (attached for every role).
    pub ijk_to_ras: Matrix4<f64>,
    /// Measurement frame (diffusion role only, when known).
    pub measurement_frame: Option<Matrix3<f64>>,
    /// Gradient directions and b-values (diffusion role only, when present).
    pub gradients: Option<GradientTable>,
}

impl EngineVolume {
    /// Whether acquisition gradients are attached.
    pub fn has_gradients(&self) -> bool {
        self.gradients.is_some()
    }

    /// Number of voxels in the grid.
    pub fn voxel_count(&self) -> usize {
        self.dims.iter().product()
    }
}
