use crate::constants::{BEAT_FLOOR, BEAT_HISTORY_LEN, BEAT_RATIO, BEAT_REFRACTORY_SEC};
use smallvec::SmallVec;

/// Bass-onset detector over a short rolling history.
///
/// A beat fires when the sample exceeds `BEAT_RATIO` x the rolling average,
/// exceeds an absolute floor, and the refractory interval has elapsed since
/// the previous beat.
#[derive(Clone, Debug)]
pub struct BeatDetector {
    history: SmallVec<[f32; BEAT_HISTORY_LEN]>,
    cursor: usize,
    last_beat_sec: Option<f64>,
}

impl Default for BeatDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl BeatDetector {
    pub fn new() -> Self {
        Self {
            history: SmallVec::new(),
            cursor: 0,
            last_beat_sec: None,
        }
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.cursor = 0;
        self.last_beat_sec = None;
    }

    pub fn rolling_average(&self) -> f32 {
        if self.history.is_empty() {
            return 0.0;
        }
        self.history.iter().sum::<f32>() / self.history.len() as f32
    }

    /// Feed one bass sample taken at `now_sec`; returns true on a beat.
    pub fn push(&mut self, bass: f32, now_sec: f64) -> bool {
        let bass = if bass.is_finite() { bass.max(0.0) } else { 0.0 };
        let average = self.rolling_average();
        let refractory_done = self
            .last_beat_sec
            .map_or(true, |t| now_sec - t >= BEAT_REFRACTORY_SEC);
        let beat = !self.history.is_empty()
            && bass > average * BEAT_RATIO
            && bass > BEAT_FLOOR
            && refractory_done;

        if self.history.len() < BEAT_HISTORY_LEN {
            self.history.push(bass);
        } else {
            self.history[self.cursor] = bass;
        }
        self.cursor = (self.cursor + 1) % BEAT_HISTORY_LEN;

        if beat {
            self.last_beat_sec = Some(now_sec);
        }
        beat
    }
}
