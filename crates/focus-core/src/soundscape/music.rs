use crate::constants::SEQ_OCTAVE_JUMP_PROB;
use rand::distributions::{Distribution, WeightedIndex};
use rand::prelude::*;

/// Basic oscillator shape used by synthesized voices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Saw,
    Triangle,
}

/// Minor pentatonic degrees (semitones above the root).
pub const MINOR_PENTATONIC: &[i32] = &[0, 3, 5, 7, 10];

/// Selection weights per degree of [`MINOR_PENTATONIC`]; root and fifth are
/// favoured.
pub const MINOR_PENTATONIC_WEIGHTS: &[u32] = &[3, 1, 1, 3, 1];

/// Convert a MIDI note number to Hertz (A4=440 Hz).
pub fn midi_to_hz(midi: f32) -> f32 {
    440.0 * (2.0_f32).powf((midi - 69.0) / 12.0)
}

/// Weighted pick of a scale degree. Falls back to the root when the weights
/// do not line up with the scale.
pub fn choose_degree<R: Rng + ?Sized>(scale: &[i32], weights: &[u32], rng: &mut R) -> i32 {
    if scale.is_empty() {
        return 0;
    }
    if weights.len() != scale.len() {
        return scale[0];
    }
    match WeightedIndex::new(weights) {
        Ok(dist) => scale[dist.sample(rng)],
        Err(_) => scale[0],
    }
}

/// Long sustained note: root or fifth at the sequencer root octave.
pub fn drone_note_midi<R: Rng + ?Sized>(root_midi: i32, rng: &mut R) -> i32 {
    if rng.gen_bool(0.5) {
        root_midi
    } else {
        root_midi + 7
    }
}

/// Melody note one octave above the root, occasionally jumping another octave.
pub fn melody_note_midi<R: Rng + ?Sized>(root_midi: i32, rng: &mut R) -> i32 {
    let degree = choose_degree(MINOR_PENTATONIC, MINOR_PENTATONIC_WEIGHTS, rng);
    let jump = if rng.gen_bool(SEQ_OCTAVE_JUMP_PROB) { 12 } else { 0 };
    root_midi + 12 + degree + jump
}
