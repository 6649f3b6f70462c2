//! Cooperative one-shot task queue for soundscape layers.
//!
//! Every recurring behaviour is a one-shot task that, when it runs, enqueues
//! its successor. Cancelling a layer removes its tasks synchronously, so no
//! successor can be enqueued once the layer is gone.

/// One synthesis voice of the soundscape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    NoiseBed,
    Drone,
    Shimmer,
    Signal,
    Sequencer,
}

impl LayerKind {
    pub const ALL: [LayerKind; 5] = [
        LayerKind::NoiseBed,
        LayerKind::Drone,
        LayerKind::Shimmer,
        LayerKind::Signal,
        LayerKind::Sequencer,
    ];
}

/// Unit of work a task performs when it comes due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Job {
    /// Recompute slow LFO modulation on a continuous bed.
    Modulate,
    Shimmer,
    Signal,
    DroneNote,
    MelodyNote,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Task {
    /// Audio-clock time in seconds.
    pub due: f64,
    pub layer: LayerKind,
    pub job: Job,
}

#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    tasks: Vec<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: f64, layer: LayerKind, job: Job) {
        self.tasks.push(Task { due, layer, job });
    }

    /// Drop every pending task owned by `layer`; returns how many were removed.
    pub fn cancel_layer(&mut self, layer: LayerKind) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.layer != layer);
        before - self.tasks.len()
    }

    pub fn clear(&mut self) -> usize {
        let n = self.tasks.len();
        self.tasks.clear();
        n
    }

    /// Remove and return the earliest task due at or before `horizon`.
    pub fn pop_due(&mut self, horizon: f64) -> Option<Task> {
        let (index, _) = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= horizon)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due))?;
        Some(self.tasks.swap_remove(index))
    }

    pub fn next_due(&self) -> Option<f64> {
        self.tasks.iter().map(|t| t.due).min_by(|a, b| a.total_cmp(b))
    }

    pub fn pending_for(&self, layer: LayerKind) -> usize {
        self.tasks.iter().filter(|t| t.layer == layer).count()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
