//! World-to-voxel transform resolution and seed mapping.
//!
//! The engine stores the fastest-varying image axis last, while the
//! host's world-to-index transform yields it first; every mapped point
//! therefore has its axis order reversed after the affine is applied.

use nalgebra::{Matrix4, Point3};
use thiserror::Error;

use crate::host::SeedPointSource;
use crate::models::Volume;

/// Errors from resolving a volume's geometry.
#[derive(Error, Debug)]
pub enum TransformError {
    /// The volume's index-to-world affine cannot be inverted.
    #[error("index-to-world transform of '{0}' is not invertible")]
    NonInvertible(String),
}

/// Result type for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// A seed point in the engine's voxel-index axis order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelSeed(pub [f64; 3]);

impl VoxelSeed {
    /// Coordinates in engine axis order (fastest-varying axis last).
    pub fn coords(&self) -> [f64; 3] {
        self.0
    }
}

/// World-to-voxel resolver for one volume.
///
/// Built from the volume's own IJK-to-RAS affine so mapped seeds stay in
/// the same coordinate frame as the intensity data handed to the engine.
#[derive(Debug, Clone)]
pub struct WorldToVoxel {
    ijk_to_ras: Matrix4<f64>,
    ras_to_ijk: Matrix4<f64>,
}

impl WorldToVoxel {
    /// Resolve the transform for a volume.
    ///
    /// A non-invertible affine means the volume cannot be geometrically
    /// registered and is a fatal configuration error.
    pub fn resolve(volume: &Volume) -> TransformResult<Self> {
        let ras_to_ijk = volume
            .ijk_to_ras
            .try_inverse()
            .ok_or_else(|| TransformError::NonInvertible(volume.name.clone()))?;

        Ok(Self {
            ijk_to_ras: volume.ijk_to_ras,
            ras_to_ijk,
        })
    }

    /// Map one world-space point into engine voxel order.
    ///
    /// `out = reverse3(M⁻¹ · in)` with no other reordering or scaling.
    pub fn map_point(&self, world: [f64; 3]) -> VoxelSeed {
        let ijk = self
            .ras_to_ijk
            .transform_point(&Point3::new(world[0], world[1], world[2]));
        VoxelSeed([ijk.z, ijk.y, ijk.x])
    }

    /// Map an ordered seed collection, preserving order.
    pub fn map_seed_points(&self, seeds: &dyn SeedPointSource) -> Vec<VoxelSeed> {
        (0..seeds.len())
            .map(|i| self.map_point(seeds.world_position(i)))
            .collect()
    }

    /// Map a voxel seed back to world space (inverse of [`map_point`]).
    ///
    /// [`map_point`]: WorldToVoxel::map_point
    pub fn unmap(&self, seed: VoxelSeed) -> [f64; 3] {
        let [k, j, i] = seed.coords();
        let world = self.ijk_to_ras.transform_point(&Point3::new(i, j, k));
        [world.x, world.y, world.z]
    }
}
