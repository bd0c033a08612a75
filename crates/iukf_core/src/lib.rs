//! IUKF Core - host/engine bridge for interactive UKF tractography
//!
//! This crate contains the data-marshaling and orchestration layer
//! between an interactive host application and an external UKF
//! tractography engine, with zero UI dependencies. It converts host
//! volumes into the engine's native format, maps interactively-placed
//! seed points into engine voxel space, manages the single shared
//! engine instance, and sequences the run/parameter-update protocol.
//!
//! The engine itself (filtering, fiber propagation, stopping criteria)
//! sits behind the [`engine::TractographyEngine`] trait; the host's
//! interactive objects sit behind the traits in [`host`].

pub mod config;
pub mod engine;
pub mod geometry;
pub mod host;
pub mod logging;
pub mod marshal;
pub mod models;
pub mod orchestrator;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
