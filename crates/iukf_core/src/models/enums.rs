//! Core enums used throughout the bridge.

use serde::{Deserialize, Serialize};

/// Role a volume plays in an engine invocation.
///
/// The role decides which geometric metadata the marshaler attaches:
/// orientation always, measurement frame and gradient tables only for
/// the diffusion role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeRole {
    /// Diffusion-weighted input volume (carries gradients when present).
    Diffusion,
    /// Brain mask restricting propagation.
    Mask,
    /// Optional seeding region volume.
    Seed,
}

impl VolumeRole {
    /// Get all roles in marshaling order.
    pub fn all() -> &'static [VolumeRole] {
        &[Self::Diffusion, Self::Mask, Self::Seed]
    }
}

impl std::fmt::Display for VolumeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VolumeRole::Diffusion => write!(f, "diffusion"),
            VolumeRole::Mask => write!(f, "mask"),
            VolumeRole::Seed => write!(f, "seed"),
        }
    }
}

/// Kind of host geometry node handed in as an output target.
///
/// Fiber output must land on a fiber-bundle node; handing any other
/// node kind to a run is a caller contract violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    /// Polyline fiber-bundle node (the expected output kind).
    FiberBundle,
    /// Generic surface/model node.
    Model,
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryKind::FiberBundle => write!(f, "fiber bundle"),
            GeometryKind::Model => write!(f, "model"),
        }
    }
}

/// Scene-lifecycle notifications delivered by the host.
///
/// The bridge registers for these so the host keeps it informed, but it
/// does not interpret them; see
/// [`SceneEvent::observed`] for the subscription list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneEvent {
    /// A node was added to the host scene.
    NodeAdded,
    /// A node was removed from the host scene.
    NodeRemoved,
    /// A batch of scene mutations finished.
    BatchProcessEnded,
}

impl SceneEvent {
    /// Events a host should deliver to the bridge.
    pub fn observed() -> &'static [SceneEvent] {
        &[Self::NodeAdded, Self::NodeRemoved, Self::BatchProcessEnded]
    }
}

impl std::fmt::Display for SceneEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneEvent::NodeAdded => write!(f, "node added"),
            SceneEvent::NodeRemoved => write!(f, "node removed"),
            SceneEvent::BatchProcessEnded => write!(f, "batch process ended"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_role_serializes_lowercase() {
        let json = serde_json::to_string(&VolumeRole::Diffusion).unwrap();
        assert_eq!(json, "\"diffusion\"");
    }

    #[test]
    fn scene_event_list_is_complete() {
        assert_eq!(SceneEvent::observed().len(), 3);
        assert!(SceneEvent::observed().contains(&SceneEvent::BatchProcessEnded));
    }

    #[test]
    fn geometry_kind_displays() {
        assert_eq!(GeometryKind::FiberBundle.to_string(), "fiber bundle");
    }
}
