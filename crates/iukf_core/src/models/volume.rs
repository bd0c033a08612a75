//! Host-side volume representation.
//!
//! A [`Volume`] is owned by the host; the bridge borrows it read-only
//! and derives an engine-native copy through the marshaler. Geometry is
//! carried as an IJK-to-RAS affine; diffusion volumes additionally carry
//! a measurement frame and a gradient table.

use nalgebra::{Matrix3, Matrix4};

/// Per-direction diffusion gradient metadata.
///
/// Directions and b-values always travel together; a volume without
/// acquisition metadata simply has no table at all.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientTable {
    /// Gradient direction per diffusion component.
    pub directions: Vec<[f64; 3]>,
    /// b-value per diffusion component.
    pub b_values: Vec<f64>,
}

impl GradientTable {
    /// Create a new gradient table.
    pub fn new(directions: Vec<[f64; 3]>, b_values: Vec<f64>) -> Self {
        Self {
            directions,
            b_values,
        }
    }

    /// Number of gradient directions.
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    /// Whether directions and b-values agree in length.
    pub fn is_consistent(&self) -> bool {
        self.directions.len() == self.b_values.len()
    }
}

/// A 3-D (or 4-D multi-direction) scalar/vector image with geometry.
#[derive(Debug, Clone)]
pub struct Volume {
    /// Host-side node name (used in logs and errors).
    pub name: String,
    /// Grid extent along I, J, K.
    pub dims: [usize; 3],
    /// Samples per voxel (gradient directions for DWI, 1 otherwise).
    pub num_components: usize,
    /// Sample buffer, component-interleaved, I fastest.
    pub samples: Vec<f32>,
    /// Index-to-world affine (IJK-to-RAS).
    pub ijk_to_ras: Matrix4<f64>,
    /// Frame the gradient directions are expressed in, when known.
    pub measurement_frame: Option<Matrix3<f64>>,
    /// Acquisition gradients and b-values, when present.
    pub gradients: Option<GradientTable>,
}

impl Volume {
    /// Create a single-component volume with an identity orientation.
    pub fn new(name: impl Into<String>, dims: [usize; 3], samples: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            dims,
            num_components: 1,
            samples,
            ijk_to_ras: Matrix4::identity(),
            measurement_frame: None,
            gradients: None,
        }
    }

    /// Set the number of per-voxel components.
    pub fn with_components(mut self, num_components: usize) -> Self {
        self.num_components = num_components;
        self
    }

    /// Set the IJK-to-RAS affine.
    pub fn with_ijk_to_ras(mut self, matrix: Matrix4<f64>) -> Self {
        self.ijk_to_ras = matrix;
        self
    }

    /// Set the measurement frame.
    pub fn with_measurement_frame(mut self, frame: Matrix3<f64>) -> Self {
        self.measurement_frame = Some(frame);
        self
    }

    /// Attach a gradient table.
    pub fn with_gradients(mut self, gradients: GradientTable) -> Self {
        self.gradients = Some(gradients);
        self
    }

    /// Number of voxels in the grid.
    pub fn voxel_count(&self) -> usize {
        self.dims.iter().product()
    }

    /// Sample count the buffer must hold for this grid.
    pub fn expected_len(&self) -> usize {
        self.voxel_count() * self.num_components
    }
}
