//! Data structures shared across the bridge.

mod enums;
mod mesh;
mod volume;

pub use enums::{GeometryKind, SceneEvent, VolumeRole};
pub use mesh::{FiberBundleNode, PolyData, SharedPolyData};
pub use volume::{GradientTable, Volume};
