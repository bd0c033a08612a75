//! Engine runtime parameters.

use serde::{Deserialize, Serialize};

/// Flat scalar/boolean configuration shared with the engine.
///
/// Setters on the session write these one field at a time; the engine
/// reads them at the start of each run, so a change is effective on the
/// next run. Record length is stored as submitted and the step count it
/// implies is derived at use time (see
/// [`steps_per_record`](EngineParameters::steps_per_record)), so the
/// derivation can never go stale between setter calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineParameters {
    /// Number of seeds started per seed voxel.
    #[serde(default = "default_seeds_per_voxel")]
    pub seeds_per_voxel: u32,

    /// Anisotropy below which propagation stops.
    #[serde(default = "default_stopping_fa")]
    pub stopping_fa: f64,

    /// Anisotropy a voxel needs before it may seed.
    #[serde(default = "default_seeding_threshold")]
    pub seeding_threshold: f64,

    /// Mean-signal threshold below which propagation stops.
    #[serde(default = "default_stopping_threshold")]
    pub stopping_threshold: f64,

    /// Number of tensors in the fitted model.
    #[serde(default = "default_num_tensor")]
    pub num_tensor: u32,

    /// Propagation step length in millimeters.
    #[serde(default = "default_step_length")]
    pub step_length: f64,

    /// Distance between recorded points in millimeters.
    #[serde(default = "default_record_length")]
    pub record_length: f64,

    /// Use the NODDI multi-compartment model.
    #[serde(default)]
    pub noddi: bool,
}

fn default_seeds_per_voxel() -> u32 {
    1
}

fn default_stopping_fa() -> f64 {
    0.15
}

fn default_seeding_threshold() -> f64 {
    0.18
}

fn default_stopping_threshold() -> f64 {
    0.1
}

fn default_num_tensor() -> u32 {
    2
}

fn default_step_length() -> f64 {
    0.3
}

fn default_record_length() -> f64 {
    0.9
}

impl Default for EngineParameters {
    fn default() -> Self {
        Self {
            seeds_per_voxel: default_seeds_per_voxel(),
            stopping_fa: default_stopping_fa(),
            seeding_threshold: default_seeding_threshold(),
            stopping_threshold: default_stopping_threshold(),
            num_tensor: default_num_tensor(),
            step_length: default_step_length(),
            record_length: default_record_length(),
            noddi: false,
        }
    }
}

impl EngineParameters {
    /// Points recorded per step interval, derived from the current
    /// record and step lengths.
    ///
    /// Derived lazily so the value always reflects the latest of both
    /// fields, whichever was set last.
    pub fn steps_per_record(&self) -> f64 {
        self.record_length / self.step_length
    }
}
