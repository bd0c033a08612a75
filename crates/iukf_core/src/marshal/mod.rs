//! Conversion of host volumes into the engine's native format.
//!
//! The marshaler reads a borrowed [`Volume`](crate::models::Volume) and
//! produces an [`EngineVolume`] bundle the engine takes ownership of.
//! What a bundle carries depends on its [`VolumeRole`](crate::models::VolumeRole):
//! orientation always, acquisition metadata only for the diffusion role
//! and only when actually present on the source.

mod engine_volume;
mod marshaler;

pub use engine_volume::EngineVolume;
pub use marshaler::{marshal_volume, MarshalError, MarshalResult};
