//! Trait seams toward the host application.
//!
//! The host owns the interactive objects (markup point lists, fiber
//! nodes); the bridge reaches them only through these traits so the
//! core stays free of GUI and scene machinery.

use crate::models::{GeometryKind, SharedPolyData};

/// Ordered collection of interactively-placed world-space seed points.
///
/// Implemented by the host's markup list; a plain slice of coordinates
/// works too, which tests rely on.
pub trait SeedPointSource {
    /// Number of placed points.
    fn len(&self) -> usize;

    /// Whether the collection holds no points.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// World-space position of the point at `index`.
    fn world_position(&self, index: usize) -> [f64; 3];
}

impl SeedPointSource for [[f64; 3]] {
    fn len(&self) -> usize {
        <[[f64; 3]]>::len(self)
    }

    fn world_position(&self, index: usize) -> [f64; 3] {
        self[index]
    }
}

impl SeedPointSource for Vec<[f64; 3]> {
    fn len(&self) -> usize {
        <[[f64; 3]]>::len(self)
    }

    fn world_position(&self, index: usize) -> [f64; 3] {
        self[index]
    }
}

/// Host geometry node that receives the engine's fiber output.
///
/// The node may start without a mesh attached; the bridge creates and
/// installs one before the first run. After a run the bridge calls
/// [`FiberSink::mark_modified`] so downstream observers re-render.
pub trait FiberSink {
    /// Kind of geometry node this sink wraps.
    fn kind(&self) -> GeometryKind;

    /// Currently attached mesh handle, if any.
    fn polydata(&self) -> Option<SharedPolyData>;

    /// Attach a mesh handle to the node.
    fn install_polydata(&mut self, polydata: SharedPolyData);

    /// Notify the host that the node's geometry changed.
    fn mark_modified(&mut self);
}
