// Browser-side wiring constants: DOM ids, timer cadences and drawing tuning.
// Simulation tuning lives in `focus_core::constants`.

// DOM
pub const STARFIELD_CANVAS_ID: &str = "starfield-canvas";
pub const PULSE_CANVAS_ID: &str = "pulse-canvas";

// Soundscape pump cadence (ms); must be shorter than the scheduler look-ahead
pub const AUDIO_TICK_MS: i32 = 100;
pub const ANALYSER_FFT_SIZE: u32 = 512;
pub const ANALYSER_SMOOTHING: f64 = 0.8;

// Report service
pub const REPORT_ENDPOINT: &str = "/api/report";

// Largest frame delta fed to simulations (s); longer gaps are treated as a pause
pub const MAX_FRAME_DT_SEC: f32 = 0.1;

// Parallax travel in CSS px at depth 1.0
pub const STARFIELD_PARALLAX_MAX_PX: f32 = 40.0;

// Canvas colours
pub const BACKGROUND_RGB: [u8; 3] = [3, 5, 14];
pub const PULSE_CORE_RGB: [u8; 3] = [150, 205, 255];
pub const PULSE_RIPPLE_RGB: [u8; 3] = [170, 220, 255];
pub const PULSE_PARTICLE_RGB: [u8; 3] = [210, 235, 255];
pub const RIPPLE_LINE_WIDTH: f64 = 1.5;
