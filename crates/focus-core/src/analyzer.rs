//! Frequency-snapshot reduction into coarse band levels plus beat onsets.

use crate::beat::BeatDetector;
use crate::constants::{BASS_BAND_FRACTION, MID_BAND_FRACTION};

/// Mean band magnitudes, each normalized to [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BandLevels {
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
}

/// What the pulse entity consumes from audio each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioFrame {
    pub levels: BandLevels,
    pub beat: bool,
}

/// Index ranges `(bass_end, mid_end)` for a snapshot of `bins` magnitudes.
/// Every non-empty snapshot gets at least one bass bin.
#[inline]
pub fn band_edges(bins: usize) -> (usize, usize) {
    if bins == 0 {
        return (0, 0);
    }
    let bass_end = ((bins as f32 * BASS_BAND_FRACTION).round() as usize).clamp(1, bins);
    let mid_end = ((bins as f32 * (BASS_BAND_FRACTION + MID_BAND_FRACTION)).round() as usize)
        .clamp(bass_end, bins);
    (bass_end, mid_end)
}

fn mean_normalized(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u32 = bins.iter().map(|&b| b as u32).sum();
    (sum as f32 / bins.len() as f32 / 255.0).clamp(0.0, 1.0)
}

/// Split a byte frequency snapshot (0..=255 per bin) into bass/mid/high.
pub fn band_levels(snapshot: &[u8]) -> BandLevels {
    let (bass_end, mid_end) = band_edges(snapshot.len());
    BandLevels {
        bass: mean_normalized(&snapshot[..bass_end]),
        mid: mean_normalized(&snapshot[bass_end..mid_end]),
        high: mean_normalized(&snapshot[mid_end..]),
    }
}

/// Per-frame bridge from the analyser tap to the pulse entity.
///
/// With no snapshot (no analyser, audio unavailable) every level is zero and
/// no beat is ever reported.
#[derive(Clone, Debug, Default)]
pub struct AnalyzerBridge {
    detector: BeatDetector,
}

impl AnalyzerBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample(&mut self, snapshot: Option<&[u8]>, now_sec: f64) -> AudioFrame {
        match snapshot {
            Some(bins) if !bins.is_empty() => {
                let levels = band_levels(bins);
                let beat = self.detector.push(levels.bass, now_sec);
                AudioFrame { levels, beat }
            }
            _ => AudioFrame::default(),
        }
    }

    pub fn reset(&mut self) {
        self.detector.reset();
    }
}
