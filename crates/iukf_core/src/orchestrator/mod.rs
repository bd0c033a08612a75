//! Session orchestration between the host and the engine.
//!
//! This module is the bridge's public operation surface. A session
//! owns the engine handle and sequences every interaction:
//!
//! ```text
//! InteractiveTractography
//!     ├── set_input_volumes   (marshal dwi/mask/seed → engine)
//!     ├── run_from_seed_points (map seeds → engine run → mark output)
//!     ├── set_* parameter setters
//!     └── bootstrap_engine    (apply-and-wait deferred launch)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use iukf_core::orchestrator::InteractiveTractography;
//!
//! let session = InteractiveTractography::with_engine(engine, settings, logger);
//! session.set_input_volumes(&dwi, &mask, None)?;
//! session.set_seeds_per_voxel(2)?;
//! session.run_from_seed_points(&dwi, &mut fiber_node, &markup_points)?;
//! ```

mod errors;
mod interactive;

pub use errors::{SessionError, SessionResult};
pub use interactive::InteractiveTractography;
