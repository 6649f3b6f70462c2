// Shared simulation/audio tuning constants used by the core and the web front-end.

// ---------------- Motion input ----------------
pub const ORIENTATION_RANGE_DEG: f32 = 30.0; // tilt mapped onto the full [-1, 1] range
pub const ORIENTATION_BETA_NEUTRAL_DEG: f32 = 45.0; // typical hand-held front/back tilt
pub const SMALL_VIEWPORT_MAX_WIDTH: f32 = 768.0;

// ---------------- Parallax ----------------
pub const PARALLAX_FOLLOW_SPEED: f32 = 0.08; // fraction of the gap closed per frame
pub const PARALLAX_CENTER_ATTRACTION: f32 = 0.985; // per-frame decay toward center

// ---------------- Starfield ----------------
pub const STAR_COUNT: usize = 600;
pub const STAR_MAX_DEPTH: f32 = 1000.0;
pub const STAR_FOCAL_LENGTH: f32 = 300.0;
pub const STAR_SIZE: f32 = 2.6; // projected radius at the viewer plane
pub const STAR_SPEED_GAIN: f32 = 24.0; // external 0..1 speed -> depth units per frame
pub const STAR_SPEED_FLOOR: f32 = 0.6;
pub const STAR_COLLAPSED_SPEED: f32 = 0.05;
pub const STAR_COLLAPSED_SIZE_SCALE: f32 = 0.55;
pub const STAR_COLLAPSED_OPACITY_SCALE: f32 = 0.35;
pub const STAR_STREAK_THRESHOLD: f32 = 0.35; // external speed above which streaks are drawn
pub const STAR_STREAK_GAIN: f32 = 0.9;
pub const STAR_TRAIL_ALPHA_ACTIVE: f32 = 0.28;
pub const STAR_TRAIL_ALPHA_COLLAPSED: f32 = 0.12;
pub const STAR_PARALLAX_DEPTH: f32 = 0.35;
pub const STAR_PALETTE_SIZE: usize = 3;

// ---------------- Pulse entity ----------------
pub const BREATH_PERIOD_SEC: f32 = 4.5;
pub const BREATH_AMPLITUDE: f32 = 0.08;
pub const BASS_RADIUS_GAIN: f32 = 0.35;
pub const BASE_RADIUS_RATIO: f32 = 0.08; // base radius relative to min(viewport w, h)
pub const BLOOM_LAYERS: [(f32, f32); 4] = [(1.0, 0.9), (1.6, 0.45), (2.4, 0.2), (3.4, 0.08)];
pub const FADE_TAU_SEC: f32 = 0.6;
pub const FADE_SKIP_EPSILON: f32 = 0.01;
pub const PULSE_PARALLAX_DEPTH: f32 = 1.0;
pub const PULSE_PARALLAX_MAX_PX: f32 = 20.0;

pub const MAX_RIPPLES: usize = 6;
pub const RIPPLE_EPSILON: f32 = 0.01;
pub const RIPPLE_FADE_PER_FRAME: f32 = 0.97; // geometric decay at 60 fps
pub const BEAT_RIPPLE_SPEED: f32 = 60.0; // px/s at zero bass
pub const BEAT_RIPPLE_SPEED_BASS: f32 = 140.0; // extra px/s at full bass
pub const BEAT_RIPPLE_MAX_RADIUS: f32 = 4.0; // x base radius
pub const RELEASE_RIPPLE_SPEED: f32 = 220.0;
pub const RELEASE_RIPPLE_MAX_RADIUS: f32 = 6.0; // x base radius
pub const RELEASE_RIPPLE_OPACITY: f32 = 0.8;

pub const PARTICLE_COUNT: usize = 70;
pub const PARTICLE_ORBIT_MIN: f32 = 1.5; // x base radius
pub const PARTICLE_ORBIT_MAX: f32 = 3.2; // x base radius
pub const PARTICLE_FIELD_RADIUS: f32 = 5.0; // x base radius; hard bound on particle distance
pub const PARTICLE_WOBBLE: f32 = 0.12; // fraction of orbit radius
pub const PARTICLE_WOBBLE_RATE: f32 = 0.8;
pub const PARTICLE_SPRING: f32 = 0.02; // per frame at 60 fps
pub const PARTICLE_SPRING_INFLUENCED: f32 = 0.3; // spring scale while under interaction
pub const PARTICLE_DAMPING: f32 = 0.95; // velocity kept per frame at 60 fps
pub const PARTICLE_SIZE_MIN: f32 = 0.8;
pub const PARTICLE_SIZE_MAX: f32 = 2.4;
pub const PARTICLE_HIGH_SIZE_GAIN: f32 = 2.0;
pub const PARTICLE_SIZE_SMOOTHING: f32 = 0.15;
pub const PARTICLE_OPACITY_MIN: f32 = 0.25;
pub const PARTICLE_OPACITY_MAX: f32 = 0.9;
pub const PARTICLE_OPACITY_SMOOTHING: f32 = 0.1;
pub const PARTICLE_TWINKLE_RATE: f32 = 2.0;

pub const INFLUENCE_RADIUS: f32 = 180.0; // px
pub const INTERACTION_MAX_FORCE: f32 = 1.6; // px/frame^2 at zero distance, strength 1
pub const INTERACTION_ATTRACT_WEIGHT: f32 = 0.7;
pub const INTERACTION_SWIRL_WEIGHT: f32 = 0.3;
pub const PRESS_RAMP_SEC: f32 = 0.5;
pub const HOVER_STRENGTH: f32 = 0.25;
pub const FEEDBACK_GLOW_RADIUS: f32 = 40.0;
pub const FEEDBACK_GLOW_OPACITY: f32 = 0.35;

// ---------------- Analyzer / beat ----------------
pub const BASS_BAND_FRACTION: f32 = 0.10;
pub const MID_BAND_FRACTION: f32 = 0.40;
pub const BEAT_HISTORY_LEN: usize = 10;
pub const BEAT_RATIO: f32 = 1.5;
pub const BEAT_FLOOR: f32 = 0.3;
pub const BEAT_REFRACTORY_SEC: f64 = 0.3;

// ---------------- Soundscape ----------------
pub const MASTER_LEVEL: f32 = 0.6;
pub const MASTER_FADE_IN_SEC: f64 = 3.0;
pub const MASTER_FADE_OUT_SEC: f64 = 0.8;
pub const MODULATION_TICK_SEC: f64 = 0.1;
pub const SCHEDULE_LOOKAHEAD_SEC: f64 = 0.15;
pub const SMOOTHING_TIME_CONSTANT_SEC: f64 = 0.05;

pub const NOISE_BUFFER_SEC: f32 = 3.0;
pub const NOISE_LEAK: f32 = 0.02; // brown noise integrator leak
pub const NOISE_PEAK: f32 = 0.9;
pub const NOISE_BED_GAIN: f32 = 0.12;
pub const NOISE_BED_GAIN_DEPTH: f32 = 0.04;
pub const NOISE_BED_GAIN_PERIOD_SEC: f64 = 8.0;
pub const NOISE_BED_FILTER_HZ: f32 = 420.0;
pub const NOISE_BED_FILTER_DEPTH_HZ: f32 = 220.0;
pub const NOISE_BED_FILTER_PERIOD_SEC: f64 = 13.0;
pub const NOISE_BED_FILTER_Q: f32 = 0.7;

pub const DRONE_FREQ_HZ: f32 = 30.0;
pub const DRONE_CUTOFF_HZ: f32 = 120.0;
pub const DRONE_GAIN: f32 = 0.08;
pub const DRONE_BREATH_DEPTH: f32 = 0.1;
pub const DRONE_BREATH_PERIOD_SEC: f64 = 10.0;

pub const SHIMMER_INTERVAL_SEC: (f64, f64) = (3.0, 7.0);
pub const SHIMMER_DURATION_SEC: (f64, f64) = (1.5, 3.0);
pub const SHIMMER_PEAK: f32 = 0.03;
pub const SHIMMER_PAN: f32 = 0.8;

pub const SIGNAL_INTERVAL_SEC: (f64, f64) = (15.0, 40.0);
pub const SIGNAL_DURATION_SEC: (f64, f64) = (0.4, 1.2);
pub const SIGNAL_FREQ_HZ: (f32, f32) = (1200.0, 2400.0);
pub const SIGNAL_Q: f32 = 8.0;
pub const SIGNAL_PEAK: f32 = 0.05;

pub const SEQ_ROOT_MIDI: i32 = 45; // A2
pub const SEQ_DRONE_INTERVAL_SEC: f64 = 9.0;
pub const SEQ_DRONE_ATTACK_SEC: f64 = 3.0;
pub const SEQ_DRONE_RELEASE_SEC: f64 = 5.0;
pub const SEQ_DRONE_PEAK: f32 = 0.06;
pub const SEQ_MELODY_INTERVAL_SEC: (f64, f64) = (4.0, 7.0);
pub const SEQ_MELODY_ATTACK_SEC: f64 = 1.2;
pub const SEQ_MELODY_RELEASE_SEC: f64 = 3.0;
pub const SEQ_MELODY_PEAK: f32 = 0.04;
pub const SEQ_OCTAVE_JUMP_PROB: f64 = 0.15;
pub const SEQ_DELAY_SEC: f32 = 0.45;
pub const SEQ_DELAY_FEEDBACK: f32 = 0.35;
pub const SEQ_DELAY_WET: f32 = 0.3;
