// Host-side tests for browser wiring constants and how they relate to the
// simulation tuning in focus-core.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;
use focus_core::constants as core;

#[test]
#[allow(clippy::assertions_on_constants)]
fn audio_pump_runs_inside_the_lookahead_window() {
    let tick_sec = AUDIO_TICK_MS as f64 / 1000.0;
    assert!(tick_sec > 0.0);
    assert!(tick_sec < core::SCHEDULE_LOOKAHEAD_SEC);
    assert!((tick_sec - core::MODULATION_TICK_SEC).abs() < 1e-9);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn analyser_fft_size_is_a_power_of_two() {
    assert!(ANALYSER_FFT_SIZE.is_power_of_two());
    assert!((32..=32768).contains(&ANALYSER_FFT_SIZE));
    assert!((0.0..1.0).contains(&ANALYSER_SMOOTHING));
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn frame_delta_cap_is_short() {
    assert!(MAX_FRAME_DT_SEC > 1.0 / 60.0);
    assert!(MAX_FRAME_DT_SEC <= 0.25);
}

#[test]
fn canvas_ids_are_distinct() {
    assert_ne!(STARFIELD_CANVAS_ID, PULSE_CANVAS_ID);
    assert!(!STARFIELD_CANVAS_ID.contains(' '));
    assert!(REPORT_ENDPOINT.starts_with('/'));
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn starfield_parallax_is_subtler_than_pulse() {
    let star = STARFIELD_PARALLAX_MAX_PX * core::STAR_PARALLAX_DEPTH;
    let pulse = core::PULSE_PARALLAX_MAX_PX * core::PULSE_PARALLAX_DEPTH;
    assert!(star > 0.0);
    assert!(star < pulse);
}
