//! Interactive tractography session.
//!
//! Sequences the marshaler, the transform resolver and the engine
//! handle behind the public operation surface the host calls:
//! install input volumes, run from interactively-placed seed points,
//! and adjust engine parameters between runs.
//!
//! All operations execute on the host's interaction thread and run to
//! completion before the next host event; the engine handle's lock is
//! the explicit guard behind that discipline.

use std::sync::Arc;

use super::errors::{SessionError, SessionResult};
use crate::config::Settings;
use crate::engine::{EngineHandle, EngineLauncher, EngineParameters};
use crate::geometry::WorldToVoxel;
use crate::host::{FiberSink, SeedPointSource};
use crate::logging::SessionLogger;
use crate::marshal::marshal_volume;
use crate::models::{GeometryKind, SceneEvent, SharedPolyData, Volume, VolumeRole};

/// Orchestrates an interactive tractography session against the one
/// shared engine instance.
///
/// The engine is an injected dependency: attach a handle at
/// construction, later via [`attach_engine`], or let the host deliver
/// one through [`bootstrap_engine`]. Every operation fails fast with
/// [`SessionError::EngineUnavailable`] until a handle is present.
///
/// [`attach_engine`]: InteractiveTractography::attach_engine
/// [`bootstrap_engine`]: InteractiveTractography::bootstrap_engine
pub struct InteractiveTractography {
    engine: Option<EngineHandle>,
    settings: Settings,
    logger: Arc<SessionLogger>,
}

impl InteractiveTractography {
    /// Create a session with no engine attached yet.
    pub fn new(settings: Settings, logger: Arc<SessionLogger>) -> Self {
        Self {
            engine: None,
            settings,
            logger,
        }
    }

    /// Create a session around an existing engine instance.
    pub fn with_engine(
        engine: EngineHandle,
        settings: Settings,
        logger: Arc<SessionLogger>,
    ) -> Self {
        Self {
            engine: Some(engine),
            settings,
            logger,
        }
    }

    /// Attach an engine handle, replacing any previous one.
    pub fn attach_engine(&mut self, engine: EngineHandle) {
        self.engine = Some(engine);
    }

    /// Whether an engine is currently attached.
    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    /// The session settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Request a deferred engine launch and wait for it to be ready.
    ///
    /// Blocks until the host delivers the engine or the configured
    /// bootstrap timeout elapses. On success the engine is attached and
    /// immediately usable.
    pub fn bootstrap_engine(&mut self, launcher: &dyn EngineLauncher) -> SessionResult<()> {
        self.logger.section("Engine bootstrap");
        let handle = EngineHandle::bootstrap(
            launcher,
            &self.settings.engine.defaults,
            self.settings.bootstrap.timeout(),
        )?;
        self.engine = Some(handle);
        self.logger.success("Engine attached");
        Ok(())
    }

    /// Install the working input volumes on the engine.
    ///
    /// Marshal all three roles (seed optional), hand the bundles across
    /// the engine boundary, and trigger the engine's derived-model
    /// recomputation. Fully replaces prior input state: omitting `seed`
    /// clears a previously installed seed bundle.
    pub fn set_input_volumes(
        &self,
        dwi: &Volume,
        mask: &Volume,
        seed: Option<&Volume>,
    ) -> SessionResult<()> {
        let handle = self.engine()?;

        self.logger.section("Input volumes");
        let dwi_bundle = marshal_volume(dwi, VolumeRole::Diffusion)?;
        let mask_bundle = marshal_volume(mask, VolumeRole::Mask)?;
        let seed_bundle = seed
            .map(|vol| marshal_volume(vol, VolumeRole::Seed))
            .transpose()?;

        self.logger.info(&format!(
            "Diffusion '{}' ({} direction(s), gradients: {}), mask '{}', seed volume: {}",
            dwi.name,
            dwi_bundle.num_components,
            if dwi_bundle.has_gradients() { "yes" } else { "no" },
            mask.name,
            seed.map_or("none".to_string(), |v| format!("'{}'", v.name)),
        ));

        let mut engine = handle.lock();
        engine.set_data(
            dwi_bundle,
            mask_bundle,
            seed_bundle,
            self.settings.engine.normalized_dwi,
        )?;
        engine.update_filter_model_type();

        self.logger.success("Input volumes installed");
        Ok(())
    }

    /// Run tractography from interactively-placed seed points.
    ///
    /// Maps every seed through the diffusion volume's own world-to-voxel
    /// transform, installs the resulting ordered sequence (replacing any
    /// previous seed set), installs the sink's mesh as the engine's
    /// write target (creating one if the sink has none), and invokes
    /// the blocking run. An empty seed collection still runs. Afterward
    /// both the mesh and the sink are marked modified so the host
    /// re-renders.
    pub fn run_from_seed_points(
        &self,
        dwi: &Volume,
        sink: &mut dyn FiberSink,
        seeds: &dyn SeedPointSource,
    ) -> SessionResult<()> {
        let handle = self.engine()?;

        debug_assert_eq!(
            sink.kind(),
            GeometryKind::FiberBundle,
            "output node must be a fiber bundle"
        );
        if sink.kind() != GeometryKind::FiberBundle {
            let message = format!(
                "output node is a {} node, expected a fiber bundle",
                sink.kind()
            );
            self.logger.error(&message);
            return Err(SessionError::precondition(message));
        }

        self.logger.section("Interactive seeding");

        let polydata = match sink.polydata() {
            Some(existing) => existing,
            None => {
                let fresh = SharedPolyData::default();
                sink.install_polydata(fresh.clone());
                fresh
            }
        };

        let resolver = WorldToVoxel::resolve(dwi)?;
        let voxel_seeds = resolver.map_seed_points(seeds);
        self.logger.info(&format!(
            "Mapped {} seed point(s) into '{}' voxel space",
            voxel_seeds.len(),
            dwi.name
        ));

        {
            let mut engine = handle.lock();
            engine.set_seeds(voxel_seeds);
            engine.set_output_polydata(polydata.clone());
            engine.run().inspect_err(|e| {
                self.logger.error(&format!("Engine run failed: {}", e));
            })?;
        }

        polydata.mark_modified();
        sink.mark_modified();

        self.logger.success(&format!(
            "Run complete: {} fiber(s)",
            polydata.lock().num_lines()
        ));
        Ok(())
    }

    /// Set the number of seeds started per seed voxel.
    pub fn set_seeds_per_voxel(&self, value: u32) -> SessionResult<()> {
        self.with_parameters(|p| p.seeds_per_voxel = value)
    }

    /// Set the anisotropy below which propagation stops.
    pub fn set_stopping_fa(&self, value: f64) -> SessionResult<()> {
        self.with_parameters(|p| p.stopping_fa = value)
    }

    /// Set the anisotropy a voxel needs before it may seed.
    pub fn set_seeding_threshold(&self, value: f64) -> SessionResult<()> {
        self.with_parameters(|p| p.seeding_threshold = value)
    }

    /// Set the mean-signal threshold below which propagation stops.
    pub fn set_stopping_threshold(&self, value: f64) -> SessionResult<()> {
        self.with_parameters(|p| p.stopping_threshold = value)
    }

    /// Set the number of tensors in the fitted model.
    pub fn set_num_tensor(&self, value: u32) -> SessionResult<()> {
        self.with_parameters(|p| p.num_tensor = value)
    }

    /// Set the propagation step length in millimeters.
    pub fn set_step_length(&self, value: f64) -> SessionResult<()> {
        self.with_parameters(|p| p.step_length = value)
    }

    /// Set the distance between recorded points in millimeters.
    pub fn set_record_length(&self, value: f64) -> SessionResult<()> {
        self.with_parameters(|p| p.record_length = value)
    }

    /// Toggle the NODDI multi-compartment model.
    pub fn set_noddi(&self, value: bool) -> SessionResult<()> {
        self.with_parameters(|p| p.noddi = value)
    }

    /// Accept a scene-lifecycle notification from the host.
    ///
    /// The session only needs to be kept informed; events are not
    /// interpreted.
    pub fn on_scene_event(&self, event: SceneEvent) {
        tracing::trace!(%event, "scene event observed");
    }

    /// Write one field of the shared engine configuration.
    ///
    /// No range or cross-field validation; the change takes effect on
    /// the next run.
    fn with_parameters<F>(&self, apply: F) -> SessionResult<()>
    where
        F: FnOnce(&mut EngineParameters),
    {
        let handle = self.engine()?;
        apply(handle.lock().parameters_mut());
        Ok(())
    }

    /// The attached engine, or a fast failure.
    fn engine(&self) -> SessionResult<&EngineHandle> {
        self.engine.as_ref().ok_or_else(|| {
            self.logger
                .error("No tractography engine is attached; operation aborted");
            SessionError::EngineUnavailable
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::{self, Receiver};
    use std::thread;

    use nalgebra::{Matrix4, Vector4};
    use parking_lot::Mutex;
    use tempfile::{tempdir, TempDir};

    use super::*;
    use crate::engine::{BoxedEngine, EngineResult, TractographyEngine};
    use crate::geometry::VoxelSeed;
    use crate::logging::LogConfig;
    use crate::marshal::EngineVolume;
    use crate::models::FiberBundleNode;

    /// Observable engine state, shared with the test body.
    #[derive(Default)]
    struct MockState {
        seed_bundle_history: Vec<Option<String>>,
        normalized_flags: Vec<bool>,
        seeds: Vec<VoxelSeed>,
        output: Option<SharedPolyData>,
        run_count: usize,
        model_updates: usize,
    }

    struct MockEngine {
        parameters: EngineParameters,
        state: Arc<Mutex<MockState>>,
    }

    impl MockEngine {
        fn new(state: Arc<Mutex<MockState>>) -> Self {
            Self {
                parameters: EngineParameters::default(),
                state,
            }
        }
    }

    impl TractographyEngine for MockEngine {
        fn set_data(
            &mut self,
            _dwi: EngineVolume,
            _mask: EngineVolume,
            seed: Option<EngineVolume>,
            normalized_dwi: bool,
        ) -> EngineResult<()> {
            let mut state = self.state.lock();
            state
                .seed_bundle_history
                .push(seed.map(|_| "seed".to_string()));
            state.normalized_flags.push(normalized_dwi);
            Ok(())
        }

        fn set_seeds(&mut self, seeds: Vec<VoxelSeed>) {
            self.state.lock().seeds = seeds;
        }

        fn set_output_polydata(&mut self, target: SharedPolyData) {
            self.state.lock().output = Some(target);
        }

        fn run(&mut self) -> EngineResult<()> {
            let mut state = self.state.lock();
            state.run_count += 1;
            // One short fiber per installed seed, written in place.
            if let Some(output) = &state.output {
                let mut pd = output.lock();
                pd.clear();
                for seed in &state.seeds {
                    let [k, j, i] = seed.coords();
                    pd.add_polyline(&[[i, j, k], [i + 1.0, j, k]]);
                }
            }
            Ok(())
        }

        fn update_filter_model_type(&mut self) {
            self.state.lock().model_updates += 1;
        }

        fn parameters(&self) -> &EngineParameters {
            &self.parameters
        }

        fn parameters_mut(&mut self) -> &mut EngineParameters {
            &mut self.parameters
        }
    }

    fn test_logger(dir: &TempDir) -> Arc<SessionLogger> {
        Arc::new(SessionLogger::new("test", dir.path(), LogConfig::default(), None).unwrap())
    }

    fn session_with_mock() -> (InteractiveTractography, Arc<Mutex<MockState>>, TempDir) {
        let dir = tempdir().unwrap();
        let state = Arc::new(Mutex::new(MockState::default()));
        let engine = EngineHandle::new(Box::new(MockEngine::new(Arc::clone(&state))));
        let session =
            InteractiveTractography::with_engine(engine, Settings::default(), test_logger(&dir));
        (session, state, dir)
    }

    fn scaled_dwi() -> Volume {
        Volume::new("dwi", [2, 2, 2], vec![0.0; 8])
            .with_ijk_to_ras(Matrix4::from_diagonal(&Vector4::new(2.0, 2.0, 2.0, 1.0)))
    }

    fn mask() -> Volume {
        Volume::new("mask", [2, 2, 2], vec![1.0; 8])
    }

    #[test]
    fn operations_fail_fast_without_engine() {
        let dir = tempdir().unwrap();
        let session = InteractiveTractography::new(Settings::default(), test_logger(&dir));

        let err = session
            .set_input_volumes(&scaled_dwi(), &mask(), None)
            .unwrap_err();
        assert!(matches!(err, SessionError::EngineUnavailable));

        let err = session.set_step_length(0.5).unwrap_err();
        assert!(matches!(err, SessionError::EngineUnavailable));
    }

    #[test]
    fn omitted_seed_volume_clears_previous_bundle() {
        let (session, state, _dir) = session_with_mock();
        let seed_volume = Volume::new("seedvol", [2, 2, 2], vec![0.0; 8]);

        session
            .set_input_volumes(&scaled_dwi(), &mask(), None)
            .unwrap();
        session
            .set_input_volumes(&scaled_dwi(), &mask(), Some(&seed_volume))
            .unwrap();
        session
            .set_input_volumes(&scaled_dwi(), &mask(), None)
            .unwrap();

        let state = state.lock();
        assert_eq!(state.seed_bundle_history.len(), 3);
        assert!(state.seed_bundle_history[1].is_some());
        assert_eq!(state.seed_bundle_history[2], state.seed_bundle_history[0]);
        assert_eq!(state.model_updates, 3);
    }

    #[test]
    fn run_maps_seeds_and_marks_output_modified() {
        let (session, state, _dir) = session_with_mock();
        let mut node = FiberBundleNode::new("tracts");
        let seeds = vec![[4.0, 6.0, 8.0]];

        session
            .run_from_seed_points(&scaled_dwi(), &mut node, &seeds)
            .unwrap();

        {
            let state = state.lock();
            assert_eq!(state.run_count, 1);
            assert_eq!(state.seeds, vec![VoxelSeed([4.0, 3.0, 2.0])]);
        }

        // The mesh was auto-created, populated in place, and flagged.
        let polydata = node.polydata().expect("mesh installed on the node");
        assert_eq!(polydata.lock().num_lines(), 1);
        assert_eq!(polydata.generation(), 1);
        assert_eq!(node.modified_count(), 1);
    }

    #[test]
    fn empty_seed_collection_still_runs() {
        let (session, state, _dir) = session_with_mock();
        let mut node = FiberBundleNode::new("tracts");
        let seeds: Vec<[f64; 3]> = Vec::new();

        session
            .run_from_seed_points(&scaled_dwi(), &mut node, &seeds)
            .unwrap();

        let state = state.lock();
        assert_eq!(state.run_count, 1);
        assert!(state.seeds.is_empty());
    }

    #[test]
    fn repeated_runs_replace_the_seed_set() {
        let (session, state, _dir) = session_with_mock();
        let mut node = FiberBundleNode::new("tracts");

        session
            .run_from_seed_points(&scaled_dwi(), &mut node, &vec![[2.0, 2.0, 2.0]])
            .unwrap();
        session
            .run_from_seed_points(&scaled_dwi(), &mut node, &vec![[4.0, 6.0, 8.0]])
            .unwrap();

        let state = state.lock();
        assert_eq!(state.seeds, vec![VoxelSeed([4.0, 3.0, 2.0])]);
        assert_eq!(state.run_count, 2);
    }

    #[test]
    fn non_invertible_dwi_transform_aborts_before_the_engine() {
        let (session, state, _dir) = session_with_mock();
        let mut node = FiberBundleNode::new("tracts");
        let dwi = Volume::new("dwi", [2, 2, 2], vec![0.0; 8]).with_ijk_to_ras(Matrix4::zeros());

        let err = session
            .run_from_seed_points(&dwi, &mut node, &vec![[1.0, 1.0, 1.0]])
            .unwrap_err();

        assert!(matches!(err, SessionError::Transform { .. }));
        assert_eq!(state.lock().run_count, 0);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "output node must be a fiber bundle"))]
    fn wrong_geometry_kind_is_rejected() {
        struct ModelNode;

        impl FiberSink for ModelNode {
            fn kind(&self) -> GeometryKind {
                GeometryKind::Model
            }

            fn polydata(&self) -> Option<SharedPolyData> {
                None
            }

            fn install_polydata(&mut self, _polydata: SharedPolyData) {}

            fn mark_modified(&mut self) {}
        }

        let (session, _state, _dir) = session_with_mock();
        let mut node = ModelNode;
        let seeds: Vec<[f64; 3]> = Vec::new();

        // Release builds surface a loud error instead of asserting.
        let result = session.run_from_seed_points(&scaled_dwi(), &mut node, &seeds);
        assert!(matches!(result, Err(SessionError::Precondition(_))));
    }

    #[test]
    fn record_step_derivation_reflects_latest_values() {
        let (session, _state, _dir) = session_with_mock();

        session.set_record_length(20.0).unwrap();
        session.set_step_length(2.0).unwrap();
        let handle = session.engine().unwrap();
        assert_eq!(handle.lock().parameters().steps_per_record(), 10.0);

        // Same result with the setter order reversed.
        session.set_step_length(4.0).unwrap();
        session.set_record_length(20.0).unwrap();
        assert_eq!(handle.lock().parameters().steps_per_record(), 5.0);
    }

    #[test]
    fn setters_write_single_parameter_fields() {
        let (session, _state, _dir) = session_with_mock();

        session.set_seeds_per_voxel(3).unwrap();
        session.set_stopping_fa(0.12).unwrap();
        session.set_noddi(true).unwrap();

        let handle = session.engine().unwrap();
        let engine = handle.lock();
        let params = engine.parameters();
        assert_eq!(params.seeds_per_voxel, 3);
        assert_eq!(params.stopping_fa, 0.12);
        assert!(params.noddi);
        // Untouched fields keep their defaults.
        assert_eq!(params.num_tensor, 2);
    }

    #[test]
    fn bootstrap_attaches_a_ready_engine() {
        struct ThreadLauncher {
            state: Arc<Mutex<MockState>>,
        }

        impl EngineLauncher for ThreadLauncher {
            fn request_launch(&self, _parameters: &EngineParameters) -> Receiver<BoxedEngine> {
                let (tx, rx) = mpsc::channel();
                let state = Arc::clone(&self.state);
                thread::spawn(move || {
                    let _ = tx.send(Box::new(MockEngine::new(state)) as BoxedEngine);
                });
                rx
            }
        }

        let dir = tempdir().unwrap();
        let mut session = InteractiveTractography::new(Settings::default(), test_logger(&dir));
        assert!(!session.has_engine());

        let state = Arc::new(Mutex::new(MockState::default()));
        session
            .bootstrap_engine(&ThreadLauncher {
                state: Arc::clone(&state),
            })
            .unwrap();

        assert!(session.has_engine());
        session.set_num_tensor(1).unwrap();
    }

    #[test]
    fn normalized_flag_comes_from_settings() {
        let dir = tempdir().unwrap();
        let state = Arc::new(Mutex::new(MockState::default()));
        let engine = EngineHandle::new(Box::new(MockEngine::new(Arc::clone(&state))));

        let mut settings = Settings::default();
        settings.engine.normalized_dwi = true;
        let session = InteractiveTractography::with_engine(engine, settings, test_logger(&dir));

        session
            .set_input_volumes(&scaled_dwi(), &mask(), None)
            .unwrap();
        assert_eq!(state.lock().normalized_flags, vec![true]);
    }
}
