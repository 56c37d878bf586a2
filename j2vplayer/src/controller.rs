//! Single point of control over the player engine.
//!
//! [`PlaybackController`] owns at most one engine instance. `reset` tears
//! the current one down before building the next, so two engines never
//! coexist. Engine signals are folded into a [`PlaybackStatus`] and every
//! change is pushed synchronously to the view through the
//! [`PlayerEventBus`].
//!
//! ## Stale callbacks
//!
//! Listeners capture the id of the session that registered them. Teardown
//! unregisters them and moves to a new session id, so a signal that still
//! reaches an old listener finds a different id and is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossbeam_channel::Receiver;
use tracing::{debug, info, trace, warn};

use crate::engine::{EngineEvent, EngineFactory, Listener, PlayerEngine};
use crate::events::{PlayerEvent, PlayerEventBus, SessionId};
use crate::status::PlaybackStatus;

#[derive(Debug, Default)]
struct SessionState {
    id: SessionId,
    status: PlaybackStatus,
}

pub struct PlaybackController<F: EngineFactory> {
    factory: F,
    engine: Option<F::Engine>,
    url: Option<String>,
    state: Arc<Mutex<SessionState>>,
    bus: PlayerEventBus,
}

impl<F: EngineFactory> PlaybackController<F> {
    pub fn new(factory: F) -> Self {
        Self::with_bus(factory, PlayerEventBus::new())
    }

    pub fn with_bus(factory: F, bus: PlayerEventBus) -> Self {
        Self {
            factory,
            engine: None,
            url: None,
            state: Arc::new(Mutex::new(SessionState::default())),
            bus,
        }
    }

    /// Tears down the current session and, if `url` is non-empty, starts a
    /// new one bound to `mount_point`.
    ///
    /// The new engine is initialized without autoplay and asked to
    /// preload. Its status moves to `Ready` later, when it signals it can
    /// play. Engine failures are logged; the status stays `None`.
    pub fn reset(&mut self, mount_point: &str, url: Option<&str>) {
        self.teardown();

        let Some(url) = url.filter(|url| !url.is_empty()) else {
            debug!("Player reset without url, staying idle");
            return;
        };

        let mut engine = match self.factory.create() {
            Ok(engine) => engine,
            Err(err) => {
                warn!(error = %err, url, "Failed to create player engine");
                return;
            }
        };

        let session = self.lock_state().id;
        for event in EngineEvent::ALL {
            engine.on(event, self.listener(session, event));
        }

        if let Err(err) = engine.initialize(mount_point, url, false) {
            warn!(error = %err, %session, mount_point, url, "Player engine initialization failed");
        }

        self.engine = Some(engine);
        self.url = Some(url.to_string());
        info!(%session, mount_point, url, "Playback session opened");
        self.bus.broadcast(PlayerEvent::SessionOpened {
            session,
            url: url.to_string(),
        });

        if let Some(engine) = self.engine.as_mut() {
            if let Err(err) = engine.preload() {
                warn!(error = %err, %session, "Player engine preload failed");
            }
        }
    }

    pub fn play(&mut self) {
        self.with_engine("play", |engine| engine.play());
    }

    pub fn pause(&mut self) {
        self.with_engine("pause", |engine| engine.pause());
    }

    /// Seeks to `time_offset` seconds.
    pub fn seek(&mut self, time_offset: f64) {
        self.with_engine("seek", |engine| engine.seek(time_offset));
    }

    pub fn status(&self) -> PlaybackStatus {
        self.lock_state().status
    }

    /// True once the session is established: ready, playing or paused.
    pub fn is_ready(&self) -> bool {
        self.status().is_ready()
    }

    pub fn is_playing(&self) -> bool {
        self.status().is_playing()
    }

    pub fn is_paused(&self) -> bool {
        self.status().is_paused()
    }

    pub fn is_ended(&self) -> bool {
        self.status().is_ended()
    }

    pub fn has_session(&self) -> bool {
        self.engine.is_some()
    }

    /// Id of the active session, if any.
    pub fn session(&self) -> Option<SessionId> {
        self.engine.as_ref().map(|_| self.lock_state().id)
    }

    /// Manifest URL of the active session, if any.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        self.bus.subscribe()
    }

    pub fn bus(&self) -> &PlayerEventBus {
        &self.bus
    }

    fn with_engine<O>(&mut self, operation: &str, op: O)
    where
        O: FnOnce(&mut F::Engine) -> Result<(), crate::errors::PlayerError>,
    {
        match self.engine.as_mut() {
            Some(engine) => {
                if let Err(err) = op(engine) {
                    warn!(error = %err, operation, "Player engine rejected operation");
                }
            }
            None => trace!(operation, "No playback session, ignoring"),
        }
    }

    fn teardown(&mut self) {
        let Some(mut engine) = self.engine.take() else {
            return;
        };

        for event in EngineEvent::ALL {
            engine.off(event);
        }
        engine.reset();
        drop(engine);
        self.url = None;

        let closed = {
            let mut state = self.lock_state();
            let closed = state.id;
            state.id = closed.next();
            state.status = PlaybackStatus::None;
            closed
        };

        info!(session = %closed, "Playback session closed");
        self.bus
            .broadcast(PlayerEvent::SessionClosed { session: closed });
        self.bus.broadcast(PlayerEvent::StatusChanged {
            session: closed,
            status: PlaybackStatus::None,
        });
    }

    fn listener(&self, session: SessionId, event: EngineEvent) -> Listener {
        let state = Arc::clone(&self.state);
        let bus = self.bus.clone();

        Box::new(move || {
            let status = {
                let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                if state.id != session {
                    trace!(%session, current = %state.id, %event, "Dropping event from a closed session");
                    return;
                }

                let Some(next) = state.status.on_event(event) else {
                    trace!(%session, %event, status = %state.status, "Event leaves status unchanged");
                    return;
                };

                if !state.status.is_expected_transition(next) {
                    debug!(%session, %event, from = %state.status, to = %next, "Unexpected status transition");
                }
                state.status = next;
                next
            };

            bus.broadcast(PlayerEvent::StatusChanged { session, status });
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<F: EngineFactory> Drop for PlaybackController<F> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PlayerError;
    use std::collections::HashMap;

    type Shared = Arc<Mutex<HashMap<EngineEvent, Vec<Listener>>>>;

    /// Engine that keeps its listeners even after `off`, like an engine
    /// without proper listener teardown.
    struct LeakyEngine {
        listeners: Shared,
    }

    impl PlayerEngine for LeakyEngine {
        fn on(&mut self, event: EngineEvent, listener: Listener) {
            self.listeners
                .lock()
                .unwrap()
                .entry(event)
                .or_default()
                .push(listener);
        }
        fn off(&mut self, _event: EngineEvent) {}
        fn initialize(&mut self, _: &str, _: &str, _: bool) -> Result<(), PlayerError> {
            Ok(())
        }
        fn preload(&mut self) -> Result<(), PlayerError> {
            Ok(())
        }
        fn play(&mut self) -> Result<(), PlayerError> {
            Err(PlayerError::engine("not ready"))
        }
        fn pause(&mut self) -> Result<(), PlayerError> {
            Ok(())
        }
        fn seek(&mut self, _: f64) -> Result<(), PlayerError> {
            Ok(())
        }
        fn reset(&mut self) {}
    }

    fn fire(listeners: &Shared, event: EngineEvent) {
        let mut listeners = listeners.lock().unwrap();
        for listener in listeners.get_mut(&event).into_iter().flatten() {
            listener();
        }
    }

    fn leaky_controller() -> (
        PlaybackController<impl EngineFactory<Engine = LeakyEngine>>,
        Arc<Mutex<Vec<Shared>>>,
    ) {
        let created: Arc<Mutex<Vec<Shared>>> = Arc::default();
        let handle = Arc::clone(&created);
        let factory = move || -> Result<LeakyEngine, PlayerError> {
            let listeners: Shared = Arc::default();
            handle.lock().unwrap().push(Arc::clone(&listeners));
            Ok(LeakyEngine { listeners })
        };
        (PlaybackController::new(factory), created)
    }

    #[test]
    fn stale_listener_cannot_touch_new_session() {
        let (mut controller, created) = leaky_controller();

        controller.reset("video_player", Some("vidfeed/cam1/stream.mpd"));
        controller.reset("video_player", Some("vidfeed/cam2/stream.mpd"));
        let first = Arc::clone(&created.lock().unwrap()[0]);
        let second = Arc::clone(&created.lock().unwrap()[1]);

        fire(&first, EngineEvent::CanPlay);
        fire(&first, EngineEvent::PlaybackPlaying);
        assert_eq!(controller.status(), PlaybackStatus::None);

        fire(&second, EngineEvent::CanPlay);
        assert_eq!(controller.status(), PlaybackStatus::Ready);
        fire(&first, EngineEvent::PlaybackEnded);
        assert_eq!(controller.status(), PlaybackStatus::Ready);
    }

    #[test]
    fn engine_errors_are_swallowed() {
        let (mut controller, _created) = leaky_controller();
        controller.reset("video_player", Some("vidfeed/cam1/stream.mpd"));
        controller.play();
        assert_eq!(controller.status(), PlaybackStatus::None);
        assert!(controller.has_session());
    }

    #[test]
    fn factory_failure_leaves_controller_idle() {
        let factory = || -> Result<LeakyEngine, PlayerError> { Err(PlayerError::engine("no MSE")) };
        let mut controller = PlaybackController::new(factory);
        controller.reset("video_player", Some("vidfeed/cam1/stream.mpd"));

        assert!(!controller.has_session());
        assert_eq!(controller.url(), None);
        assert_eq!(controller.session(), None);
    }
}
