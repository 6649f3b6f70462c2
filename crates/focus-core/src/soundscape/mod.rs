//! Layered procedural soundscape behind an [`AudioBackend`].
//!
//! The engine decides *what* plays and *when*; the backend owns the actual
//! signal graph. All layers feed one master gain which the backend routes
//! through an analysis tap before the output.
//!
//! Typical usage:
//! - Construct with `Soundscape::new(backend, params, seed)` after a user gesture
//! - `activate()` / `deactivate()` follow the session state
//! - Call `pump()` on a fixed timer while `needs_tick()` is true
//! - `shutdown()` on unmount returns the backend for final release

mod layers;
mod music;
mod noise;
mod scheduler;

pub use layers::*;
pub use music::*;
pub use noise::*;
pub use scheduler::*;

use crate::constants::*;
use crate::error::AudioError;
use fnv::FnvHashMap;
use rand::prelude::*;

/// Platform signal graph driven by the soundscape.
pub trait AudioBackend {
    /// Nodes owned by one layer; dropping the handle alone does not disconnect.
    type Bus;

    /// Audio-clock time in seconds.
    fn current_time(&self) -> f64;
    fn sample_rate(&self) -> f32;
    /// Cancel pending master automation and ramp linearly from the current
    /// value to `target` over `duration_sec`.
    fn ramp_master(&mut self, target: f32, duration_sec: f64);
    fn open_bus(&mut self, spec: &BusSpec<'_>) -> Result<Self::Bus, AudioError>;
    fn modulate(&mut self, bus: &Self::Bus, modulation: &Modulation, at: f64);
    fn play(&mut self, bus: &Self::Bus, voice: &Transient) -> Result<(), AudioError>;
    /// Stop sources and disconnect every node of the bus.
    fn close_bus(&mut self, bus: Self::Bus);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Active,
}

#[derive(Clone, Debug)]
pub struct SoundscapeParams {
    pub master_level: f32,
    pub fade_in_sec: f64,
    pub fade_out_sec: f64,
    pub modulation_tick_sec: f64,
    pub lookahead_sec: f64,
    pub layers: Vec<LayerKind>,
}

impl Default for SoundscapeParams {
    fn default() -> Self {
        Self {
            master_level: MASTER_LEVEL,
            fade_in_sec: MASTER_FADE_IN_SEC,
            fade_out_sec: MASTER_FADE_OUT_SEC,
            modulation_tick_sec: MODULATION_TICK_SEC,
            lookahead_sec: SCHEDULE_LOOKAHEAD_SEC,
            layers: LayerKind::ALL.to_vec(),
        }
    }
}

pub struct Soundscape<B: AudioBackend> {
    backend: B,
    params: SoundscapeParams,
    state: EngineState,
    layers: FnvHashMap<LayerKind, B::Bus>,
    /// Buses of deactivated layers, closed once the master fade-out ends.
    retiring: Vec<(f64, LayerKind, B::Bus)>,
    scheduler: Scheduler,
    rng: StdRng,
    noise: Vec<f32>,
}

impl<B: AudioBackend> Soundscape<B> {
    pub fn new(backend: B, params: SoundscapeParams, seed: u64) -> Self {
        Self {
            backend,
            params,
            state: EngineState::Idle,
            layers: FnvHashMap::default(),
            retiring: Vec::new(),
            scheduler: Scheduler::new(),
            rng: StdRng::seed_from_u64(seed),
            noise: Vec::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == EngineState::Active
    }

    pub fn has_layer(&self, kind: LayerKind) -> bool {
        self.layers.contains_key(&kind)
    }

    pub fn live_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    pub fn retiring_buses(&self) -> usize {
        self.retiring.len()
    }

    /// True while there is scheduled work or a retiring bus to close.
    pub fn needs_tick(&self) -> bool {
        !self.scheduler.is_empty() || !self.retiring.is_empty()
    }

    /// Build any missing layer and fade the master in. Layers that already
    /// exist are left untouched; layers still fading out are taken back
    /// rather than closed under a rising master.
    pub fn activate(&mut self) {
        let kinds = self.params.layers.clone();
        for kind in kinds {
            if self.layers.contains_key(&kind) {
                continue;
            }
            if let Some(i) = self.retiring.iter().position(|(_, k, _)| *k == kind) {
                let (_, _, bus) = self.retiring.swap_remove(i);
                self.layers.insert(kind, bus);
                self.schedule_layer(kind);
                log::debug!("[audio] layer {:?} resumed", kind);
                continue;
            }
            if let Err(e) = self.open_layer(kind) {
                log::warn!("[audio] layer {:?} unavailable: {}", kind, e);
            }
        }
        if self.state != EngineState::Active {
            self.backend
                .ramp_master(self.params.master_level, self.params.fade_in_sec);
            self.state = EngineState::Active;
            log::info!("[audio] active with {} layers", self.layers.len());
        }
    }

    /// Cancel every pending task, fade the master out and retire the layers.
    pub fn deactivate(&mut self) {
        if self.state == EngineState::Idle {
            return;
        }
        self.state = EngineState::Idle;
        let cancelled = self.scheduler.clear();
        self.backend.ramp_master(0.0, self.params.fade_out_sec);
        let deadline = self.backend.current_time() + self.params.fade_out_sec;
        for (kind, bus) in self.layers.drain() {
            self.retiring.push((deadline, kind, bus));
        }
        log::info!(
            "[audio] idle; cancelled {} tasks, retiring {} buses",
            cancelled,
            self.retiring.len()
        );
    }

    /// Run every task due within the look-ahead window and close retired
    /// buses whose fade-out has completed. Returns the number of jobs run.
    pub fn pump(&mut self) -> usize {
        let now = self.backend.current_time();

        let mut i = 0;
        while i < self.retiring.len() {
            if self.retiring[i].0 <= now {
                let (_, _, bus) = self.retiring.swap_remove(i);
                self.backend.close_bus(bus);
            } else {
                i += 1;
            }
        }

        let horizon = now + self.params.lookahead_sec;
        let mut ran = 0;
        while let Some(task) = self.scheduler.pop_due(horizon) {
            self.run(task, now);
            ran += 1;
        }
        ran
    }

    /// Tear everything down immediately and hand the backend back for release.
    pub fn shutdown(mut self) -> B {
        self.scheduler.clear();
        self.state = EngineState::Idle;
        for (_, bus) in self.layers.drain() {
            self.backend.close_bus(bus);
        }
        for (_, _, bus) in self.retiring.drain(..) {
            self.backend.close_bus(bus);
        }
        log::info!("[audio] shut down");
        self.backend
    }

    fn open_layer(&mut self, kind: LayerKind) -> Result<(), AudioError> {
        if kind == LayerKind::NoiseBed && self.noise.is_empty() {
            let len = (self.backend.sample_rate() * NOISE_BUFFER_SEC) as usize;
            self.noise = brown_noise(len.max(1), &mut self.rng);
        }
        let bus = self.backend.open_bus(&bus_spec_for(kind, &self.noise))?;
        self.layers.insert(kind, bus);
        self.schedule_layer(kind);
        log::debug!("[audio] layer {:?} open", kind);
        Ok(())
    }

    /// Queue the first task of every job a layer runs.
    fn schedule_layer(&mut self, kind: LayerKind) {
        let now = self.backend.current_time();
        match kind {
            LayerKind::NoiseBed | LayerKind::Drone => {
                self.scheduler.schedule(now, kind, Job::Modulate);
            }
            LayerKind::Shimmer => {
                let first = now + random_interval(&mut self.rng, SHIMMER_INTERVAL_SEC);
                self.scheduler.schedule(first, kind, Job::Shimmer);
            }
            LayerKind::Signal => {
                let first = now + random_interval(&mut self.rng, SIGNAL_INTERVAL_SEC);
                self.scheduler.schedule(first, kind, Job::Signal);
            }
            LayerKind::Sequencer => {
                self.scheduler.schedule(now + 0.5, kind, Job::DroneNote);
                let first = now + random_interval(&mut self.rng, SEQ_MELODY_INTERVAL_SEC);
                self.scheduler.schedule(first, kind, Job::MelodyNote);
            }
        }
    }

    fn run(&mut self, task: Task, now: f64) {
        // A torn-down layer never reschedules.
        let Some(bus) = self.layers.get(&task.layer) else {
            return;
        };
        let at = task.due.max(now);
        let next = match task.job {
            Job::Modulate => {
                let modulation = match task.layer {
                    LayerKind::NoiseBed => noise_bed_modulation(at),
                    _ => drone_modulation(at),
                };
                self.backend.modulate(bus, &modulation, at);
                task.due + self.params.modulation_tick_sec
            }
            Job::Shimmer => {
                let voice = plan_shimmer(&mut self.rng, at);
                if let Err(e) = self.backend.play(bus, &voice) {
                    log::warn!("[audio] shimmer skipped: {}", e);
                }
                task.due + random_interval(&mut self.rng, SHIMMER_INTERVAL_SEC)
            }
            Job::Signal => {
                let voice = plan_signal(&mut self.rng, at);
                if let Err(e) = self.backend.play(bus, &voice) {
                    log::warn!("[audio] signal skipped: {}", e);
                }
                task.due + random_interval(&mut self.rng, SIGNAL_INTERVAL_SEC)
            }
            Job::DroneNote => {
                let voice = plan_drone_note(&mut self.rng, at);
                if let Err(e) = self.backend.play(bus, &voice) {
                    log::warn!("[audio] drone note skipped: {}", e);
                }
                task.due + SEQ_DRONE_INTERVAL_SEC
            }
            Job::MelodyNote => {
                let voice = plan_melody_note(&mut self.rng, at);
                if let Err(e) = self.backend.play(bus, &voice) {
                    log::warn!("[audio] melody note skipped: {}", e);
                }
                task.due + random_interval(&mut self.rng, SEQ_MELODY_INTERVAL_SEC)
            }
        };
        // Never schedule into the past: a stalled pump resumes from now.
        self.scheduler.schedule(next.max(now), task.layer, task.job);
    }
}
