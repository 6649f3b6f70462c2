// Host-side tests for the soundscape engine, driven through a recording
// backend with a manually advanced clock.

use focus_core::constants::*;
use focus_core::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Default)]
struct RecordingBackend {
    now: f64,
    next_bus: u32,
    opened: Vec<u32>,
    closed: Vec<u32>,
    played: Vec<Transient>,
    modulations: Vec<(u32, Modulation, f64)>,
    master: Vec<(f32, f64)>,
    noise_len: usize,
    fail_drone: bool,
}

impl AudioBackend for RecordingBackend {
    type Bus = u32;

    fn current_time(&self) -> f64 {
        self.now
    }

    fn sample_rate(&self) -> f32 {
        8_000.0
    }

    fn ramp_master(&mut self, target: f32, duration_sec: f64) {
        self.master.push((target, duration_sec));
    }

    fn open_bus(&mut self, spec: &BusSpec<'_>) -> Result<u32, AudioError> {
        match spec {
            BusSpec::Drone { .. } if self.fail_drone => {
                return Err(AudioError::NodeConstruction {
                    node: "OscillatorNode",
                    reason: "test".into(),
                })
            }
            BusSpec::NoiseBed { samples, .. } => self.noise_len = samples.len(),
            _ => {}
        }
        self.next_bus += 1;
        self.opened.push(self.next_bus);
        Ok(self.next_bus)
    }

    fn modulate(&mut self, bus: &u32, modulation: &Modulation, at: f64) {
        self.modulations.push((*bus, *modulation, at));
    }

    fn play(&mut self, _bus: &u32, voice: &Transient) -> Result<(), AudioError> {
        self.played.push(*voice);
        Ok(())
    }

    fn close_bus(&mut self, bus: u32) {
        self.closed.push(bus);
    }
}

fn engine() -> Soundscape<RecordingBackend> {
    Soundscape::new(RecordingBackend::default(), SoundscapeParams::default(), 11)
}

fn run_for(engine: &mut Soundscape<RecordingBackend>, seconds: f64) {
    let ticks = (seconds / MODULATION_TICK_SEC).round() as usize;
    for _ in 0..ticks {
        engine.backend_mut().now += MODULATION_TICK_SEC;
        engine.pump();
    }
}

#[test]
fn activate_builds_every_layer_and_fades_in() {
    let mut s = engine();
    s.activate();
    assert!(s.is_active());
    assert_eq!(s.live_layers(), LayerKind::ALL.len());
    assert_eq!(s.backend().master, vec![(MASTER_LEVEL, MASTER_FADE_IN_SEC)]);
    assert_eq!(s.backend().noise_len, (8_000.0 * NOISE_BUFFER_SEC) as usize);
    assert!(s.needs_tick());
}

#[test]
fn activate_is_idempotent() {
    let mut s = engine();
    s.activate();
    let tasks = s.pending_tasks();
    s.activate();
    assert_eq!(s.backend().opened.len(), LayerKind::ALL.len());
    assert_eq!(s.backend().master.len(), 1);
    assert_eq!(s.pending_tasks(), tasks);
}

#[test]
fn immediate_deactivate_leaves_nothing_scheduled() {
    let mut s = engine();
    s.activate();
    s.deactivate();
    assert_eq!(s.pending_tasks(), 0);
    assert_eq!(s.live_layers(), 0);
    assert_eq!(s.backend().master.last(), Some(&(0.0, MASTER_FADE_OUT_SEC)));

    run_for(&mut s, MASTER_FADE_OUT_SEC + 0.5);
    assert_eq!(s.pending_tasks(), 0);
    assert_eq!(s.retiring_buses(), 0);
    assert!(!s.needs_tick());
    assert!(s.backend().played.is_empty());
    assert_eq!(s.backend().closed.len(), LayerKind::ALL.len());
}

#[test]
fn retired_buses_outlive_the_fade() {
    let mut s = engine();
    s.activate();
    run_for(&mut s, 1.0);
    s.deactivate();
    s.pump();
    assert_eq!(s.retiring_buses(), LayerKind::ALL.len());
    assert!(s.backend().closed.is_empty());

    run_for(&mut s, MASTER_FADE_OUT_SEC + 0.2);
    assert_eq!(s.retiring_buses(), 0);
}

#[test]
fn running_session_plays_layered_events() {
    let mut s = engine();
    s.activate();
    run_for(&mut s, 60.0);

    let b = s.backend();
    assert!(b.modulations.len() > 500);
    let notes = b
        .played
        .iter()
        .filter(|t| matches!(t, Transient::Note { .. }))
        .count();
    let shimmers = b
        .played
        .iter()
        .filter(|t| matches!(t, Transient::Shimmer { .. }))
        .count();
    let signals = b
        .played
        .iter()
        .filter(|t| matches!(t, Transient::Signal { .. }))
        .count();
    assert!(notes >= 6, "notes={notes}");
    assert!(shimmers >= 8, "shimmers={shimmers}");
    assert!(signals >= 1, "signals={signals}");

    for voice in &b.played {
        assert!(voice.end() > voice.start());
        assert!(voice.start() >= 0.0);
    }
    // One recurring task per continuous layer and shimmer/signal, two for the sequencer.
    assert_eq!(s.pending_tasks(), 6);
}

#[test]
fn events_are_scheduled_no_earlier_than_the_clock() {
    let mut s = engine();
    s.activate();
    for _ in 0..300 {
        let before = s.backend().played.len();
        s.backend_mut().now += MODULATION_TICK_SEC;
        s.pump();
        let now = s.backend().now;
        for voice in &s.backend().played[before..] {
            assert!(voice.start() >= now - 1e-9);
            assert!(voice.start() <= now + SCHEDULE_LOOKAHEAD_SEC + 1e-9);
        }
    }
}

#[test]
fn failing_layer_is_skipped() {
    let backend = RecordingBackend {
        fail_drone: true,
        ..Default::default()
    };
    let mut s = Soundscape::new(backend, SoundscapeParams::default(), 5);
    s.activate();
    assert!(s.is_active());
    assert!(!s.has_layer(LayerKind::Drone));
    assert_eq!(s.live_layers(), LayerKind::ALL.len() - 1);
    run_for(&mut s, 5.0);
    assert!(!s.backend().played.is_empty());
}

#[test]
fn reactivation_during_fade_takes_back_the_fading_layers() {
    let mut s = engine();
    s.activate();
    s.deactivate();
    s.backend_mut().now += MASTER_FADE_OUT_SEC * 0.5;
    s.activate();
    assert_eq!(s.live_layers(), LayerKind::ALL.len());
    assert_eq!(s.retiring_buses(), 0);
    assert_eq!(s.backend().opened.len(), LayerKind::ALL.len());
    assert_eq!(s.backend().master.last(), Some(&(MASTER_LEVEL, MASTER_FADE_IN_SEC)));

    run_for(&mut s, MASTER_FADE_OUT_SEC + 0.5);
    assert!(s.backend().closed.is_empty(), "a live bus was closed");
    assert_eq!(s.live_layers(), LayerKind::ALL.len());
    assert!(s.pending_tasks() > 0);
}

#[test]
fn buses_close_only_after_a_completed_fade_out() {
    let mut s = engine();
    s.activate();
    s.deactivate();
    s.activate();
    s.deactivate();
    let deadline = s.backend().now + MASTER_FADE_OUT_SEC;
    for _ in 0..20 {
        s.backend_mut().now += MODULATION_TICK_SEC;
        let before = s.backend().closed.len();
        s.pump();
        if s.backend().closed.len() > before {
            assert!(s.backend().now >= deadline - 1e-9);
            assert_eq!(s.backend().master.last().map(|m| m.0), Some(0.0));
        }
    }
    assert_eq!(s.backend().closed.len(), LayerKind::ALL.len());
}

#[test]
fn shutdown_closes_everything() {
    let mut s = engine();
    s.activate();
    run_for(&mut s, 2.0);
    s.deactivate();
    s.activate();
    let backend = s.shutdown();
    assert_eq!(backend.closed.len(), backend.opened.len());
}

#[test]
fn scheduler_pops_earliest_due_first() {
    let mut sched = Scheduler::new();
    sched.schedule(2.0, LayerKind::Drone, Job::Modulate);
    sched.schedule(0.5, LayerKind::Shimmer, Job::Shimmer);
    sched.schedule(1.0, LayerKind::Sequencer, Job::DroneNote);

    assert_eq!(sched.next_due(), Some(0.5));
    assert_eq!(sched.pop_due(1.5).map(|t| t.layer), Some(LayerKind::Shimmer));
    assert_eq!(sched.pop_due(1.5).map(|t| t.layer), Some(LayerKind::Sequencer));
    assert!(sched.pop_due(1.5).is_none());
    assert_eq!(sched.cancel_layer(LayerKind::Drone), 1);
    assert!(sched.is_empty());
}

#[test]
fn melody_notes_stay_in_scale_range() {
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..500 {
        let m = melody_note_midi(SEQ_ROOT_MIDI, &mut rng);
        let rel = (m - SEQ_ROOT_MIDI - 12).rem_euclid(12);
        assert!(MINOR_PENTATONIC.contains(&rel));
        assert!(m >= SEQ_ROOT_MIDI + 12 && m <= SEQ_ROOT_MIDI + 12 + 10 + 12);

        let d = drone_note_midi(SEQ_ROOT_MIDI, &mut rng);
        assert!(d == SEQ_ROOT_MIDI || d == SEQ_ROOT_MIDI + 7);
    }
}

#[test]
fn midi_to_hz_matches_a4_and_octave() {
    assert!((midi_to_hz(69.0) - 440.0).abs() < 1e-4);
    assert!((midi_to_hz(81.0) / midi_to_hz(69.0) - 2.0).abs() < 1e-4);
}

#[test]
fn mismatched_weights_fall_back_to_root() {
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(choose_degree(MINOR_PENTATONIC, &[1, 2], &mut rng), 0);
    assert_eq!(choose_degree(&[], &[], &mut rng), 0);
}

#[test]
fn brown_noise_is_normalized_and_loops_cleanly() {
    let mut rng = StdRng::seed_from_u64(2);
    let noise = brown_noise(24_000, &mut rng);
    assert_eq!(noise.len(), 24_000);
    let peak = noise.iter().fold(0.0_f32, |m, v| m.max(v.abs()));
    assert!((peak - NOISE_PEAK).abs() < 1e-4);
    let first = noise[0];
    let last = noise[noise.len() - 1];
    assert!((first - last).abs() < 1e-5);
}

#[test]
fn drone_breath_stays_above_base_gain() {
    for i in 0..200 {
        let m = drone_modulation(i as f64 * 0.1);
        assert!(m.gain >= DRONE_GAIN - 1e-6);
        assert!(m.gain <= DRONE_GAIN + DRONE_BREATH_DEPTH + 1e-6);
        assert!(m.filter_hz.is_none());
    }
    let bed = noise_bed_modulation(3.0);
    assert!(bed.filter_hz.is_some());
}
