//! Headless player engine.
//!
//! [`HeadlessEngine`] renders nothing. It records every call it receives
//! and lets its owner fire engine signals by hand through a
//! [`HeadlessProbe`]. In simulated mode it also answers transport calls
//! the way a DASH player would once the manifest is loaded: `preload`
//! signals `canPlay`, `play` signals `playbackPlaying`, `pause` signals
//! `playbackPaused`.
//!
//! It backs the command-line client and the tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::engine::{EngineEvent, EngineFactory, Listener, PlayerEngine};
use crate::errors::PlayerError;

/// One call received by a headless engine.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineCall {
    On(EngineEvent),
    Off(EngineEvent),
    Initialize {
        mount_point: String,
        url: String,
        autoplay: bool,
    },
    Preload,
    Play,
    Pause,
    Seek(f64),
    Reset,
}

#[derive(Default)]
struct ProbeInner {
    calls: Mutex<Vec<EngineCall>>,
    listeners: Mutex<HashMap<EngineEvent, Vec<Listener>>>,
}

/// Observation and control handle on one headless engine instance.
#[derive(Clone, Default)]
pub struct HeadlessProbe {
    inner: Arc<ProbeInner>,
}

impl HeadlessProbe {
    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<EngineCall> {
        lock(&self.inner.calls).clone()
    }

    /// Invokes the listeners registered for `event` and returns how many ran.
    pub fn fire(&self, event: EngineEvent) -> usize {
        let mut listeners = lock(&self.inner.listeners);
        match listeners.get_mut(&event) {
            Some(registered) => {
                for listener in registered.iter_mut() {
                    listener();
                }
                registered.len()
            }
            None => 0,
        }
    }

    /// Number of listeners currently registered, all events included.
    pub fn listener_count(&self) -> usize {
        lock(&self.inner.listeners).values().map(Vec::len).sum()
    }

    /// True once the engine has been reset.
    pub fn is_reset(&self) -> bool {
        self.calls().contains(&EngineCall::Reset)
    }

    fn record(&self, call: EngineCall) {
        lock(&self.inner.calls).push(call);
    }
}

impl std::fmt::Debug for HeadlessProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessProbe")
            .field("calls", &self.calls())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

pub struct HeadlessEngine {
    probe: HeadlessProbe,
    simulate: bool,
    initialized: bool,
}

impl HeadlessEngine {
    pub fn new(simulate: bool) -> Self {
        Self {
            probe: HeadlessProbe::default(),
            simulate,
            initialized: false,
        }
    }

    pub fn probe(&self) -> HeadlessProbe {
        self.probe.clone()
    }

    fn simulate(&self, event: EngineEvent) {
        if self.simulate && self.initialized {
            debug!(%event, "Headless engine signal");
            self.probe.fire(event);
        }
    }

    fn ensure_initialized(&self, operation: &str) -> Result<(), PlayerError> {
        if self.initialized {
            Ok(())
        } else {
            Err(PlayerError::not_initialized(operation))
        }
    }
}

impl PlayerEngine for HeadlessEngine {
    fn on(&mut self, event: EngineEvent, listener: Listener) {
        self.probe.record(EngineCall::On(event));
        lock(&self.probe.inner.listeners)
            .entry(event)
            .or_default()
            .push(listener);
    }

    fn off(&mut self, event: EngineEvent) {
        self.probe.record(EngineCall::Off(event));
        lock(&self.probe.inner.listeners).remove(&event);
    }

    fn initialize(
        &mut self,
        mount_point: &str,
        url: &str,
        autoplay: bool,
    ) -> Result<(), PlayerError> {
        self.probe.record(EngineCall::Initialize {
            mount_point: mount_point.to_string(),
            url: url.to_string(),
            autoplay,
        });
        if mount_point.trim().is_empty() {
            return Err(PlayerError::MountPointNotFound(mount_point.to_string()));
        }
        self.initialized = true;
        Ok(())
    }

    fn preload(&mut self) -> Result<(), PlayerError> {
        self.probe.record(EngineCall::Preload);
        self.ensure_initialized("preload")?;
        self.simulate(EngineEvent::CanPlay);
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        self.probe.record(EngineCall::Play);
        self.ensure_initialized("play")?;
        self.simulate(EngineEvent::PlaybackPlaying);
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        self.probe.record(EngineCall::Pause);
        self.ensure_initialized("pause")?;
        self.simulate(EngineEvent::PlaybackPaused);
        Ok(())
    }

    fn seek(&mut self, time: f64) -> Result<(), PlayerError> {
        self.probe.record(EngineCall::Seek(time));
        self.ensure_initialized("seek")
    }

    fn reset(&mut self) {
        self.probe.record(EngineCall::Reset);
        self.initialized = false;
        lock(&self.probe.inner.listeners).clear();
    }
}

/// Builds headless engines and keeps a probe on each of them.
///
/// Clones share the list of probes, so a clone kept aside still sees the
/// engines built by a factory moved into a controller.
#[derive(Clone, Default)]
pub struct HeadlessEngineFactory {
    simulate: bool,
    probes: Arc<Mutex<Vec<HeadlessProbe>>>,
}

impl HeadlessEngineFactory {
    /// Engines that only fire signals on request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engines that answer preload/play/pause with the matching signal.
    pub fn simulated() -> Self {
        Self {
            simulate: true,
            ..Self::default()
        }
    }

    pub fn with_simulation(simulate: bool) -> Self {
        Self {
            simulate,
            ..Self::default()
        }
    }

    /// Number of engines built so far.
    pub fn created(&self) -> usize {
        lock(&self.probes).len()
    }

    /// Probes of every engine built so far, oldest first.
    pub fn probes(&self) -> Vec<HeadlessProbe> {
        lock(&self.probes).clone()
    }

    /// Probe of the most recent engine.
    pub fn latest(&self) -> Option<HeadlessProbe> {
        lock(&self.probes).last().cloned()
    }
}

impl EngineFactory for HeadlessEngineFactory {
    type Engine = HeadlessEngine;

    fn create(&self) -> Result<HeadlessEngine, PlayerError> {
        let engine = HeadlessEngine::new(self.simulate);
        lock(&self.probes).push(engine.probe());
        Ok(engine)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
