//! Geometric transform resolution.

mod transform;

pub use transform::{TransformError, TransformResult, VoxelSeed, WorldToVoxel};
