//! Volume-to-bundle conversion.

use thiserror::Error;

use super::engine_volume::EngineVolume;
use crate::models::{Volume, VolumeRole};

/// Errors from packaging a host volume for the engine.
#[derive(Error, Debug)]
pub enum MarshalError {
    /// Sample buffer length disagrees with the declared grid.
    #[error("sample buffer of '{volume}' holds {actual} values, expected {expected}")]
    ShapeMismatch {
        volume: String,
        expected: usize,
        actual: usize,
    },

    /// Gradient directions and b-values disagree in length.
    #[error("gradient table of '{volume}' has {directions} directions and {b_values} b-values")]
    InconsistentGradients {
        volume: String,
        directions: usize,
        b_values: usize,
    },

    /// Gradient count disagrees with the diffusion component count.
    #[error("gradient table of '{volume}' has {directions} directions for {components} diffusion components")]
    GradientCountMismatch {
        volume: String,
        directions: usize,
        components: usize,
    },
}

impl MarshalError {
    /// Create a shape mismatch error.
    pub fn shape_mismatch(volume: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            volume: volume.into(),
            expected,
            actual,
        }
    }

    /// Create an inconsistent gradients error.
    pub fn inconsistent_gradients(
        volume: impl Into<String>,
        directions: usize,
        b_values: usize,
    ) -> Self {
        Self::InconsistentGradients {
            volume: volume.into(),
            directions,
            b_values,
        }
    }

    /// Create a gradient count mismatch error.
    pub fn gradient_count_mismatch(
        volume: impl Into<String>,
        directions: usize,
        components: usize,
    ) -> Self {
        Self::GradientCountMismatch {
            volume: volume.into(),
            directions,
            components,
        }
    }
}

/// Result type for marshaling operations.
pub type MarshalResult<T> = Result<T, MarshalError>;

/// Package a host volume into the engine's native bundle for `role`.
///
/// Orientation travels with every role so the diffusion, mask and seed
/// grids stay spatially aligned. Only the diffusion role carries the
/// measurement frame and gradient table, and only when the source
/// volume has them; mask and seed bundles are stripped of acquisition
/// metadata even if the host attached some.
pub fn marshal_volume(volume: &Volume, role: VolumeRole) -> MarshalResult<EngineVolume> {
    let expected = volume.expected_len();
    if volume.samples.len() != expected {
        return Err(MarshalError::shape_mismatch(
            &volume.name,
            expected,
            volume.samples.len(),
        ));
    }

    let (measurement_frame, gradients) = if role == VolumeRole::Diffusion {
        let gradients = match &volume.gradients {
            Some(table) => {
                if !table.is_consistent() {
                    return Err(MarshalError::inconsistent_gradients(
                        &volume.name,
                        table.directions.len(),
                        table.b_values.len(),
                    ));
                }
                if table.len() != volume.num_components {
                    return Err(MarshalError::gradient_count_mismatch(
                        &volume.name,
                        table.len(),
                        volume.num_components,
                    ));
                }
                Some(table.clone())
            }
            None => None,
        };
        (volume.measurement_frame, gradients)
    } else {
        (None, None)
    };

    tracing::debug!(
        volume = %volume.name,
        %role,
        voxels = volume.voxel_count(),
        components = volume.num_components,
        gradients = gradients.is_some(),
        "marshaled volume"
    );

    Ok(EngineVolume {
        role,
        dims: volume.dims,
        num_components: volume.num_components,
        samples: volume.samples.clone(),
        ijk_to_ras: volume.ijk_to_ras,
        measurement_frame,
        gradients,
    })
}
