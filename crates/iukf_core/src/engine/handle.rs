//! Shared ownership of the single engine instance.
//!
//! Exactly one engine lives per process. The handle wraps it in an
//! exclusive-access guard so the single-threaded discipline the host
//! promises is enforced here rather than assumed. Handles are created
//! either directly around an existing engine or through the deferred
//! bootstrap protocol, where the host instantiates the engine through
//! an asynchronous channel that [`EngineHandle::bootstrap`] awaits
//! synchronously.

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};

use super::errors::{EngineError, EngineResult};
use super::parameters::EngineParameters;
use super::TractographyEngine;

/// Owned engine trait object.
pub type BoxedEngine = Box<dyn TractographyEngine>;

/// Host-provided channel for out-of-process engine instantiation.
///
/// `request_launch` must return immediately; the engine arrives on the
/// returned receiver once the host has it running.
pub trait EngineLauncher {
    /// Ask the host to instantiate an engine with the given parameters.
    fn request_launch(&self, parameters: &EngineParameters) -> Receiver<BoxedEngine>;
}

/// Clone-able reference to the process's one engine instance.
#[derive(Clone)]
pub struct EngineHandle {
    inner: Arc<Mutex<BoxedEngine>>,
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle").finish_non_exhaustive()
    }
}

impl EngineHandle {
    /// Wrap an existing engine instance.
    pub fn new(engine: BoxedEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Request a deferred launch and block until the engine is ready.
    ///
    /// Callers may rely on the engine being usable exactly when this
    /// returns `Ok`; there is no partially-bootstrapped state visible
    /// outside this call.
    pub fn bootstrap(
        launcher: &dyn EngineLauncher,
        parameters: &EngineParameters,
        timeout: Duration,
    ) -> EngineResult<Self> {
        tracing::info!(timeout_secs = timeout.as_secs(), "requesting engine launch");
        let receiver = launcher.request_launch(parameters);

        match receiver.recv_timeout(timeout) {
            Ok(engine) => {
                tracing::info!("engine ready");
                Ok(Self::new(engine))
            }
            Err(RecvTimeoutError::Timeout) => {
                Err(EngineError::bootstrap_timed_out(timeout.as_secs()))
            }
            Err(RecvTimeoutError::Disconnected) => Err(EngineError::BootstrapChannelClosed),
        }
    }

    /// Take exclusive access to the engine.
    pub fn lock(&self) -> MutexGuard<'_, BoxedEngine> {
        self.inner.lock()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;

    use super::*;
    use crate::geometry::VoxelSeed;
    use crate::marshal::EngineVolume;
    use crate::models::SharedPolyData;

    struct IdleEngine {
        parameters: EngineParameters,
    }

    impl TractographyEngine for IdleEngine {
        fn set_data(
            &mut self,
            _dwi: EngineVolume,
            _mask: EngineVolume,
            _seed: Option<EngineVolume>,
            _normalized_dwi: bool,
        ) -> EngineResult<()> {
            Ok(())
        }

        fn set_seeds(&mut self, _seeds: Vec<VoxelSeed>) {}

        fn set_output_polydata(&mut self, _target: SharedPolyData) {}

        fn run(&mut self) -> EngineResult<()> {
            Ok(())
        }

        fn parameters(&self) -> &EngineParameters {
            &self.parameters
        }

        fn parameters_mut(&mut self) -> &mut EngineParameters {
            &mut self.parameters
        }
    }

    struct ThreadLauncher {
        deliver: bool,
    }

    impl EngineLauncher for ThreadLauncher {
        fn request_launch(&self, parameters: &EngineParameters) -> Receiver<BoxedEngine> {
            let (tx, rx) = mpsc::channel();
            let parameters = parameters.clone();
            let deliver = self.deliver;
            thread::spawn(move || {
                if deliver {
                    let _ = tx.send(Box::new(IdleEngine { parameters }) as BoxedEngine);
                }
                // Dropping tx without sending closes the channel.
            });
            rx
        }
    }

    #[test]
    fn bootstrap_waits_for_delivered_engine() {
        let launcher = ThreadLauncher { deliver: true };
        let handle = EngineHandle::bootstrap(
            &launcher,
            &EngineParameters::default(),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(handle.lock().parameters().num_tensor, 2);
    }

    #[test]
    fn closed_channel_fails_bootstrap() {
        let launcher = ThreadLauncher { deliver: false };
        let err = EngineHandle::bootstrap(
            &launcher,
            &EngineParameters::default(),
            Duration::from_secs(5),
        )
        .unwrap_err();

        assert!(matches!(err, EngineError::BootstrapChannelClosed));
    }

    #[test]
    fn silent_launcher_times_out() {
        struct SilentLauncher {
            // Keep the sender alive so the channel never disconnects.
            held: Mutex<Vec<mpsc::Sender<BoxedEngine>>>,
        }

        impl EngineLauncher for SilentLauncher {
            fn request_launch(&self, _parameters: &EngineParameters) -> Receiver<BoxedEngine> {
                let (tx, rx) = mpsc::channel();
                self.held.lock().push(tx);
                rx
            }
        }

        let launcher = SilentLauncher {
            held: Mutex::new(Vec::new()),
        };
        let err = EngineHandle::bootstrap(
            &launcher,
            &EngineParameters::default(),
            Duration::from_millis(20),
        )
        .unwrap_err();

        assert!(matches!(err, EngineError::BootstrapTimedOut { .. }));
    }

    #[test]
    fn clones_share_one_engine() {
        let handle = EngineHandle::new(Box::new(IdleEngine {
            parameters: EngineParameters::default(),
        }));
        let alias = handle.clone();

        alias.lock().parameters_mut().seeds_per_voxel = 7;
        assert_eq!(handle.lock().parameters().seeds_per_voxel, 7);
    }
}
