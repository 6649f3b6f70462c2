//! Signal-graph descriptions and per-event parameter planning for each layer.
//!
//! Nothing here touches an audio API: the backend turns a [`BusSpec`] into
//! nodes and a [`Transient`] into a short-lived chain.

use super::music::{drone_note_midi, melody_note_midi, midi_to_hz, Waveform, MINOR_PENTATONIC};
use crate::constants::*;
use rand::prelude::*;
use std::f64::consts::{PI, TAU};

/// Long-lived routing owned by a layer, feeding the master gain.
#[derive(Clone, Debug, PartialEq)]
pub enum BusSpec<'a> {
    /// Looped noise buffer through a low-pass filter.
    NoiseBed {
        samples: &'a [f32],
        filter_hz: f32,
        q: f32,
        gain: f32,
    },
    /// Continuous low oscillator through a low-pass filter.
    Drone {
        frequency_hz: f32,
        cutoff_hz: f32,
        gain: f32,
    },
    /// Plain gain bus for one-shot events.
    Events { gain: f32 },
    /// Gain bus with a feedback delay send for note events.
    Echo {
        delay_sec: f32,
        feedback: f32,
        wet: f32,
    },
}

/// Slow parameter targets applied to a continuous bus at a given time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Modulation {
    pub gain: f32,
    pub filter_hz: Option<f32>,
}

/// A one-shot sound: its chain is built, started and torn down by the backend
/// once the envelope completes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transient {
    Shimmer {
        start: f64,
        duration: f64,
        frequency_hz: f32,
        waveform: Waveform,
        pan: f32,
        peak: f32,
    },
    Signal {
        start: f64,
        duration: f64,
        freq_start_hz: f32,
        freq_end_hz: f32,
        q: f32,
        pan: f32,
        peak: f32,
    },
    Note {
        start: f64,
        frequency_hz: f32,
        waveform: Waveform,
        attack: f64,
        release: f64,
        peak: f32,
    },
}

impl Transient {
    pub fn start(&self) -> f64 {
        match *self {
            Transient::Shimmer { start, .. }
            | Transient::Signal { start, .. }
            | Transient::Note { start, .. } => start,
        }
    }

    /// Audio-clock time at which the envelope reaches silence.
    pub fn end(&self) -> f64 {
        match *self {
            Transient::Shimmer { start, duration, .. } | Transient::Signal { start, duration, .. } => {
                start + duration
            }
            Transient::Note {
                start,
                attack,
                release,
                ..
            } => start + attack + release,
        }
    }
}

#[inline]
fn lfo(t: f64, period: f64) -> f32 {
    (TAU * t / period).sin() as f32
}

/// Noise bed gain and filter center at audio time `t`.
pub fn noise_bed_modulation(t: f64) -> Modulation {
    let gain = NOISE_BED_GAIN + NOISE_BED_GAIN_DEPTH * lfo(t, NOISE_BED_GAIN_PERIOD_SEC);
    let filter_hz =
        NOISE_BED_FILTER_HZ + NOISE_BED_FILTER_DEPTH_HZ * lfo(t, NOISE_BED_FILTER_PERIOD_SEC);
    Modulation {
        gain: gain.max(0.0),
        filter_hz: Some(filter_hz.max(20.0)),
    }
}

/// Drone "breathing": a rectified, squared sinusoid lifting the base gain.
pub fn drone_modulation(t: f64) -> Modulation {
    let breath = (PI * t / DRONE_BREATH_PERIOD_SEC).sin().abs().powi(2) as f32;
    Modulation {
        gain: DRONE_GAIN + DRONE_BREATH_DEPTH * breath,
        filter_hz: None,
    }
}

pub fn bus_spec_for(kind: super::LayerKind, noise: &[f32]) -> BusSpec<'_> {
    use super::LayerKind;
    match kind {
        LayerKind::NoiseBed => BusSpec::NoiseBed {
            samples: noise,
            filter_hz: NOISE_BED_FILTER_HZ,
            q: NOISE_BED_FILTER_Q,
            gain: 0.0,
        },
        LayerKind::Drone => BusSpec::Drone {
            frequency_hz: DRONE_FREQ_HZ,
            cutoff_hz: DRONE_CUTOFF_HZ,
            gain: 0.0,
        },
        LayerKind::Shimmer | LayerKind::Signal => BusSpec::Events { gain: 1.0 },
        LayerKind::Sequencer => BusSpec::Echo {
            delay_sec: SEQ_DELAY_SEC,
            feedback: SEQ_DELAY_FEEDBACK,
            wet: SEQ_DELAY_WET,
        },
    }
}

#[inline]
pub fn random_interval<R: Rng + ?Sized>(rng: &mut R, range: (f64, f64)) -> f64 {
    rng.gen_range(range.0..=range.1)
}

/// High, soft glint: a scale note three octaves above the sequencer root.
pub fn plan_shimmer<R: Rng + ?Sized>(rng: &mut R, start: f64) -> Transient {
    let degree = MINOR_PENTATONIC[rng.gen_range(0..MINOR_PENTATONIC.len())];
    let midi = SEQ_ROOT_MIDI + 36 + degree;
    Transient::Shimmer {
        start,
        duration: random_interval(rng, SHIMMER_DURATION_SEC),
        frequency_hz: midi_to_hz(midi as f32),
        waveform: if rng.gen_bool(0.5) {
            Waveform::Sine
        } else {
            Waveform::Triangle
        },
        pan: rng.gen_range(-SHIMMER_PAN..=SHIMMER_PAN),
        peak: SHIMMER_PEAK,
    }
}

/// Sparse "signal" burst: a square tone and its band-pass filter sweeping
/// together between two frequencies.
pub fn plan_signal<R: Rng + ?Sized>(rng: &mut R, start: f64) -> Transient {
    let freq_start_hz = rng.gen_range(SIGNAL_FREQ_HZ.0..=SIGNAL_FREQ_HZ.1);
    let freq_end_hz = rng.gen_range(SIGNAL_FREQ_HZ.0..=SIGNAL_FREQ_HZ.1);
    Transient::Signal {
        start,
        duration: random_interval(rng, SIGNAL_DURATION_SEC),
        freq_start_hz,
        freq_end_hz,
        q: SIGNAL_Q,
        pan: rng.gen_range(-1.0..=1.0),
        peak: SIGNAL_PEAK,
    }
}

pub fn plan_drone_note<R: Rng + ?Sized>(rng: &mut R, start: f64) -> Transient {
    Transient::Note {
        start,
        frequency_hz: midi_to_hz(drone_note_midi(SEQ_ROOT_MIDI, rng) as f32),
        waveform: Waveform::Sine,
        attack: SEQ_DRONE_ATTACK_SEC,
        release: SEQ_DRONE_RELEASE_SEC,
        peak: SEQ_DRONE_PEAK,
    }
}

pub fn plan_melody_note<R: Rng + ?Sized>(rng: &mut R, start: f64) -> Transient {
    Transient::Note {
        start,
        frequency_hz: midi_to_hz(melody_note_midi(SEQ_ROOT_MIDI, rng) as f32),
        waveform: Waveform::Triangle,
        attack: SEQ_MELODY_ATTACK_SEC,
        release: SEQ_MELODY_RELEASE_SEC,
        peak: SEQ_MELODY_PEAK,
    }
}
