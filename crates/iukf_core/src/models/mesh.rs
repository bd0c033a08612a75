//! Output fiber geometry.
//!
//! The engine writes polylines into a [`PolyData`] that the host node
//! owns. [`SharedPolyData`] is the handle both sides hold while a run is
//! in flight: the bridge installs it as the engine's write target, the
//! host keeps it attached to its node.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::host::FiberSink;
use crate::models::GeometryKind;

/// Polyline mesh payload (points plus per-fiber point indices).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyData {
    /// World-space vertex positions.
    pub points: Vec<[f64; 3]>,
    /// One index run per fiber, referencing `points`.
    pub lines: Vec<Vec<usize>>,
}

impl PolyData {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fiber as a run of world-space points.
    pub fn add_polyline(&mut self, fiber: &[[f64; 3]]) {
        let start = self.points.len();
        self.points.extend_from_slice(fiber);
        self.lines.push((start..start + fiber.len()).collect());
    }

    /// Remove all geometry.
    pub fn clear(&mut self) {
        self.points.clear();
        self.lines.clear();
    }

    /// Number of vertices.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Number of fibers.
    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    /// Whether the mesh holds no geometry.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.lines.is_empty()
    }
}

/// Shared handle to a mesh payload.
///
/// Clones refer to the same underlying mesh; the engine holds one clone
/// as its write target while the host node holds another.
#[derive(Debug, Clone, Default)]
pub struct SharedPolyData {
    inner: Arc<Mutex<PolyData>>,
    generation: Arc<AtomicU64>,
}

impl SharedPolyData {
    /// Wrap a mesh in a shared handle.
    pub fn new(polydata: PolyData) -> Self {
        Self {
            inner: Arc::new(Mutex::new(polydata)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Lock the mesh for reading or writing.
    pub fn lock(&self) -> MutexGuard<'_, PolyData> {
        self.inner.lock()
    }

    /// Record that the mesh contents changed.
    pub fn mark_modified(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Modification generation, bumped by [`mark_modified`].
    ///
    /// [`mark_modified`]: SharedPolyData::mark_modified
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Whether two handles refer to the same mesh.
    pub fn same_mesh(&self, other: &SharedPolyData) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Host-side fiber-bundle node wrapper.
///
/// Owns the mesh handle and a modification counter the host's display
/// pipeline observes to re-render.
#[derive(Debug, Default)]
pub struct FiberBundleNode {
    /// Node name (used in logs).
    pub name: String,
    polydata: Option<SharedPolyData>,
    modified: u64,
}

impl FiberBundleNode {
    /// Create a node with no mesh attached yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            polydata: None,
            modified: 0,
        }
    }

    /// How many times the node has been marked modified.
    pub fn modified_count(&self) -> u64 {
        self.modified
    }
}

impl FiberSink for FiberBundleNode {
    fn kind(&self) -> GeometryKind {
        GeometryKind::FiberBundle
    }

    fn polydata(&self) -> Option<SharedPolyData> {
        self.polydata.clone()
    }

    fn install_polydata(&mut self, polydata: SharedPolyData) {
        self.polydata = Some(polydata);
    }

    fn mark_modified(&mut self) {
        self.modified += 1;
        tracing::debug!(node = %self.name, count = self.modified, "fiber node modified");
    }
}
