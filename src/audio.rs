use crate::constants::{ANALYSER_FFT_SIZE, ANALYSER_SMOOTHING, AUDIO_TICK_MS};
use focus_core::constants::SMOOTHING_TIME_CONSTANT_SEC;
use focus_core::{
    AudioBackend, AudioError, BusSpec, Modulation, Soundscape, SoundscapeParams, Transient,
    Waveform,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

// Extra time after an envelope ends before its source is stopped
const VOICE_STOP_PAD_SEC: f64 = 0.05;
const ECHO_MAX_DELAY_SEC: f64 = 2.0;

fn node_err(node: &'static str) -> impl Fn(JsValue) -> AudioError {
    move |e| AudioError::NodeConstruction {
        node,
        reason: format!("{:?}", e),
    }
}

// Create a GainNode with an initial value; logs on failure
fn create_gain(
    audio_ctx: &web::AudioContext,
    value: f32,
    label: &str,
) -> Result<web::GainNode, AudioError> {
    match web::GainNode::new(audio_ctx) {
        Ok(g) => {
            g.gain().set_value(value);
            Ok(g)
        }
        Err(e) => {
            log::error!("[audio] {} GainNode error: {:?}", label, e);
            Err(node_err("GainNode")(e))
        }
    }
}

fn oscillator_type(waveform: Waveform) -> web::OscillatorType {
    match waveform {
        Waveform::Sine => web::OscillatorType::Sine,
        Waveform::Square => web::OscillatorType::Square,
        Waveform::Saw => web::OscillatorType::Sawtooth,
        Waveform::Triangle => web::OscillatorType::Triangle,
    }
}

/// Nodes owned by one soundscape layer.
pub enum WebBus {
    NoiseBed {
        source: web::AudioBufferSourceNode,
        filter: web::BiquadFilterNode,
        gain: web::GainNode,
    },
    Drone {
        osc: web::OscillatorNode,
        filter: web::BiquadFilterNode,
        gain: web::GainNode,
    },
    Events {
        gain: web::GainNode,
    },
    Echo {
        input: web::GainNode,
        delay: web::DelayNode,
        feedback: web::GainNode,
        wet: web::GainNode,
    },
}

impl WebBus {
    /// Node transient voices connect into.
    fn input(&self) -> &web::AudioNode {
        match self {
            WebBus::NoiseBed { gain, .. } | WebBus::Drone { gain, .. } | WebBus::Events { gain } => {
                gain.unchecked_ref()
            }
            WebBus::Echo { input, .. } => input.unchecked_ref(),
        }
    }
}

/// Web Audio graph: every bus feeds `master -> analyser -> destination`.
pub struct WebAudioBackend {
    ctx: web::AudioContext,
    master: web::GainNode,
    analyser: web::AnalyserNode,
}

impl WebAudioBackend {
    /// Must run inside a user-gesture handler so the context may start.
    pub fn new() -> Result<Self, AudioError> {
        let ctx = web::AudioContext::new().map_err(|e| {
            log::warn!("[audio] AudioContext error: {:?}", e);
            AudioError::Unsupported
        })?;
        _ = ctx.resume();

        let master = create_gain(&ctx, 0.0, "master")?;
        let analyser = web::AnalyserNode::new(&ctx).map_err(node_err("AnalyserNode"))?;
        analyser.set_fft_size(ANALYSER_FFT_SIZE);
        analyser.set_smoothing_time_constant(ANALYSER_SMOOTHING);
        _ = master.connect_with_audio_node(&analyser);
        _ = analyser.connect_with_audio_node(&ctx.destination());

        log::info!(
            "[audio] context ready: {} Hz, {} analyser bins",
            ctx.sample_rate(),
            analyser.frequency_bin_count()
        );
        Ok(Self {
            ctx,
            master,
            analyser,
        })
    }

    pub fn analyser(&self) -> &web::AnalyserNode {
        &self.analyser
    }

    pub fn resume(&self) {
        if self.ctx.state() == web::AudioContextState::Suspended {
            _ = self.ctx.resume();
        }
    }

    /// Disconnect the output chain and release the context.
    pub fn close(self) {
        _ = self.master.disconnect();
        _ = self.analyser.disconnect();
        _ = self.ctx.close();
        log::info!("[audio] context closed");
    }

    fn biquad(
        &self,
        kind: web::BiquadFilterType,
        frequency_hz: f32,
        q: f32,
    ) -> Result<web::BiquadFilterNode, AudioError> {
        let filter = web::BiquadFilterNode::new(&self.ctx).map_err(node_err("BiquadFilterNode"))?;
        filter.set_type(kind);
        filter.frequency().set_value(frequency_hz);
        filter.q().set_value(q);
        Ok(filter)
    }

    fn oscillator(&self, waveform: Waveform, frequency_hz: f32) -> Result<web::OscillatorNode, AudioError> {
        let osc = web::OscillatorNode::new(&self.ctx).map_err(node_err("OscillatorNode"))?;
        osc.set_type(oscillator_type(waveform));
        osc.frequency().set_value(frequency_hz);
        Ok(osc)
    }

    /// Gain node shaped as silence -> `peak` at `peak_at` -> silence at `end`.
    fn envelope(&self, start: f64, peak_at: f64, end: f64, peak: f32) -> Result<web::GainNode, AudioError> {
        let env = create_gain(&self.ctx, 0.0, "envelope")?;
        let g = env.gain();
        _ = g.set_value_at_time(0.0, start);
        _ = g.linear_ramp_to_value_at_time(peak, peak_at);
        _ = g.linear_ramp_to_value_at_time(0.0, end);
        Ok(env)
    }

    fn panner(&self, pan: f32) -> Result<web::StereoPannerNode, AudioError> {
        let panner = web::StereoPannerNode::new(&self.ctx).map_err(node_err("StereoPannerNode"))?;
        panner.pan().set_value(pan.clamp(-1.0, 1.0));
        Ok(panner)
    }
}

/// Start `osc` at `start`, stop it shortly after `end`, and disconnect every
/// node of the voice once the source has ended.
fn run_voice(
    osc: &web::OscillatorNode,
    start: f64,
    end: f64,
    chain: Vec<web::AudioNode>,
) -> Result<(), AudioError> {
    let cleanup = Closure::once_into_js(move || {
        for node in &chain {
            _ = node.disconnect();
        }
    });
    osc.set_onended(Some(cleanup.unchecked_ref()));
    osc.start_with_when(start)
        .map_err(node_err("OscillatorNode"))?;
    osc.stop_with_when(end + VOICE_STOP_PAD_SEC)
        .map_err(node_err("OscillatorNode"))?;
    Ok(())
}

impl AudioBackend for WebAudioBackend {
    type Bus = WebBus;

    fn current_time(&self) -> f64 {
        self.ctx.current_time()
    }

    fn sample_rate(&self) -> f32 {
        self.ctx.sample_rate()
    }

    fn ramp_master(&mut self, target: f32, duration_sec: f64) {
        let param = self.master.gain();
        let now = self.ctx.current_time();
        _ = param.cancel_scheduled_values(now);
        _ = param.set_value_at_time(param.value(), now);
        _ = param.linear_ramp_to_value_at_time(target, now + duration_sec);
    }

    fn open_bus(&mut self, spec: &BusSpec<'_>) -> Result<WebBus, AudioError> {
        match *spec {
            BusSpec::NoiseBed {
                samples,
                filter_hz,
                q,
                gain,
            } => {
                let buffer = self
                    .ctx
                    .create_buffer(1, samples.len() as u32, self.ctx.sample_rate())
                    .map_err(node_err("AudioBuffer"))?;
                let mut data = samples.to_vec();
                buffer
                    .copy_to_channel(&mut data, 0)
                    .map_err(node_err("AudioBuffer"))?;
                let source = web::AudioBufferSourceNode::new(&self.ctx)
                    .map_err(node_err("AudioBufferSourceNode"))?;
                source.set_buffer(Some(&buffer));
                source.set_loop(true);
                let filter = self.biquad(web::BiquadFilterType::Lowpass, filter_hz, q)?;
                let gain = create_gain(&self.ctx, gain, "noise bed")?;
                _ = source.connect_with_audio_node(&filter);
                _ = filter.connect_with_audio_node(&gain);
                _ = gain.connect_with_audio_node(&self.master);
                source.start().map_err(node_err("AudioBufferSourceNode"))?;
                Ok(WebBus::NoiseBed {
                    source,
                    filter,
                    gain,
                })
            }
            BusSpec::Drone {
                frequency_hz,
                cutoff_hz,
                gain,
            } => {
                let osc = self.oscillator(Waveform::Sine, frequency_hz)?;
                let filter = self.biquad(web::BiquadFilterType::Lowpass, cutoff_hz, 0.7)?;
                let gain = create_gain(&self.ctx, gain, "drone")?;
                _ = osc.connect_with_audio_node(&filter);
                _ = filter.connect_with_audio_node(&gain);
                _ = gain.connect_with_audio_node(&self.master);
                osc.start().map_err(node_err("OscillatorNode"))?;
                Ok(WebBus::Drone { osc, filter, gain })
            }
            BusSpec::Events { gain } => {
                let gain = create_gain(&self.ctx, gain, "events")?;
                _ = gain.connect_with_audio_node(&self.master);
                Ok(WebBus::Events { gain })
            }
            BusSpec::Echo {
                delay_sec,
                feedback,
                wet,
            } => {
                let input = create_gain(&self.ctx, 1.0, "echo in")?;
                let delay = self
                    .ctx
                    .create_delay_with_max_delay_time(ECHO_MAX_DELAY_SEC)
                    .map_err(node_err("DelayNode"))?;
                delay.delay_time().set_value(delay_sec);
                let feedback = create_gain(&self.ctx, feedback, "echo feedback")?;
                let wet = create_gain(&self.ctx, wet, "echo wet")?;
                _ = input.connect_with_audio_node(&self.master);
                _ = input.connect_with_audio_node(&delay);
                _ = delay.connect_with_audio_node(&feedback);
                _ = feedback.connect_with_audio_node(&delay);
                _ = delay.connect_with_audio_node(&wet);
                _ = wet.connect_with_audio_node(&self.master);
                Ok(WebBus::Echo {
                    input,
                    delay,
                    feedback,
                    wet,
                })
            }
        }
    }

    fn modulate(&mut self, bus: &WebBus, modulation: &Modulation, at: f64) {
        let (gain, filter) = match bus {
            WebBus::NoiseBed { gain, filter, .. } => (gain, Some(filter)),
            WebBus::Drone { gain, .. } => (gain, None),
            _ => return,
        };
        _ = gain
            .gain()
            .set_target_at_time(modulation.gain, at, SMOOTHING_TIME_CONSTANT_SEC);
        if let (Some(filter), Some(hz)) = (filter, modulation.filter_hz) {
            _ = filter
                .frequency()
                .set_target_at_time(hz, at, SMOOTHING_TIME_CONSTANT_SEC);
        }
    }

    fn play(&mut self, bus: &WebBus, voice: &Transient) -> Result<(), AudioError> {
        let end = voice.end();
        match *voice {
            Transient::Shimmer {
                start,
                duration,
                frequency_hz,
                waveform,
                pan,
                peak,
            } => {
                let osc = self.oscillator(waveform, frequency_hz)?;
                let env = self.envelope(start, start + duration * 0.4, end, peak)?;
                let panner = self.panner(pan)?;
                _ = osc.connect_with_audio_node(&env);
                _ = env.connect_with_audio_node(&panner);
                _ = panner.connect_with_audio_node(bus.input());
                run_voice(&osc, start, end, vec![osc.clone().into(), env.into(), panner.into()])
            }
            Transient::Signal {
                start,
                duration,
                freq_start_hz,
                freq_end_hz,
                q,
                pan,
                peak,
            } => {
                let osc = self.oscillator(Waveform::Square, freq_start_hz)?;
                _ = osc.frequency().set_value_at_time(freq_start_hz, start);
                _ = osc
                    .frequency()
                    .exponential_ramp_to_value_at_time(freq_end_hz, end);
                let filter = self.biquad(web::BiquadFilterType::Bandpass, freq_start_hz, q)?;
                _ = filter.frequency().set_value_at_time(freq_start_hz, start);
                _ = filter
                    .frequency()
                    .exponential_ramp_to_value_at_time(freq_end_hz, end);
                let env = self.envelope(start, start + (duration * 0.1).min(0.05), end, peak)?;
                let panner = self.panner(pan)?;
                _ = osc.connect_with_audio_node(&filter);
                _ = filter.connect_with_audio_node(&env);
                _ = env.connect_with_audio_node(&panner);
                _ = panner.connect_with_audio_node(bus.input());
                run_voice(
                    &osc,
                    start,
                    end,
                    vec![osc.clone().into(), filter.into(), env.into(), panner.into()],
                )
            }
            Transient::Note {
                start,
                frequency_hz,
                waveform,
                attack,
                peak,
                ..
            } => {
                let osc = self.oscillator(waveform, frequency_hz)?;
                let env = self.envelope(start, start + attack, end, peak)?;
                _ = osc.connect_with_audio_node(&env);
                _ = env.connect_with_audio_node(bus.input());
                run_voice(&osc, start, end, vec![osc.clone().into(), env.into()])
            }
        }
    }

    fn close_bus(&mut self, bus: WebBus) {
        match bus {
            WebBus::NoiseBed {
                source,
                filter,
                gain,
            } => {
                _ = source.stop();
                _ = source.disconnect();
                _ = filter.disconnect();
                _ = gain.disconnect();
            }
            WebBus::Drone { osc, filter, gain } => {
                _ = osc.stop();
                _ = osc.disconnect();
                _ = filter.disconnect();
                _ = gain.disconnect();
            }
            WebBus::Events { gain } => {
                _ = gain.disconnect();
            }
            WebBus::Echo {
                input,
                delay,
                feedback,
                wet,
            } => {
                _ = input.disconnect();
                _ = delay.disconnect();
                _ = feedback.disconnect();
                _ = wet.disconnect();
            }
        }
    }
}

type AnalyserListener = Box<dyn Fn(&web::AnalyserNode)>;

/// Owns the soundscape and its lifecycle on the page: lazy construction on
/// the first user gesture, the interval pump, and final release on unmount.
pub struct AudioHost {
    engine: Option<Soundscape<WebAudioBackend>>,
    want_active: bool,
    /// Set once construction failed or the host was shut down.
    disabled: bool,
    interval: Option<i32>,
    pump: Option<Closure<dyn FnMut()>>,
    listeners: Vec<AnalyserListener>,
    seed: u64,
}

impl AudioHost {
    pub fn new(seed: u64) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            engine: None,
            want_active: false,
            disabled: false,
            interval: None,
            pump: None,
            listeners: Vec::new(),
            seed,
        }))
    }

    fn analyser(&self) -> Option<web::AnalyserNode> {
        self.engine.as_ref().map(|e| e.backend().analyser().clone())
    }
}

/// Register a callback receiving the analysis tap once the context exists.
/// Fires immediately when audio is already running.
pub fn on_analyser_ready(host: &Rc<RefCell<AudioHost>>, listener: impl Fn(&web::AnalyserNode) + 'static) {
    let mut h = host.borrow_mut();
    if let Some(analyser) = h.analyser() {
        listener(&analyser);
    }
    h.listeners.push(Box::new(listener));
}

/// Called from a genuine user gesture.
pub fn unlock(host: &Rc<RefCell<AudioHost>>) {
    let analyser = {
        let mut h = host.borrow_mut();
        if h.disabled {
            return;
        }
        if let Some(engine) = &h.engine {
            engine.backend().resume();
            return;
        }
        match WebAudioBackend::new() {
            Ok(backend) => {
                let mut engine = Soundscape::new(backend, SoundscapeParams::default(), h.seed);
                if h.want_active {
                    engine.activate();
                }
                h.engine = Some(engine);
            }
            Err(e) => {
                log::warn!("[audio] unavailable, continuing silently: {}", e);
                h.disabled = true;
                return;
            }
        }
        h.analyser()
    };
    if let Some(analyser) = analyser {
        for listener in &host.borrow().listeners {
            listener(&analyser);
        }
    }
    ensure_pump(host);
}

pub fn set_active(host: &Rc<RefCell<AudioHost>>, active: bool) {
    {
        let mut h = host.borrow_mut();
        h.want_active = active;
        if let Some(engine) = h.engine.as_mut() {
            if active {
                engine.activate();
            } else {
                engine.deactivate();
            }
        }
    }
    ensure_pump(host);
}

fn ensure_pump(host: &Rc<RefCell<AudioHost>>) {
    let mut guard = host.borrow_mut();
    let h = &mut *guard;
    let needs_tick = h.engine.as_ref().map_or(false, |e| e.needs_tick());
    if !needs_tick || h.interval.is_some() {
        return;
    }
    if h.pump.is_none() {
        let weak = Rc::downgrade(host);
        h.pump = Some(Closure::wrap(Box::new(move || {
            if let Some(host) = weak.upgrade() {
                pump(&host);
            }
        }) as Box<dyn FnMut()>));
    }
    let (Some(window), Some(cb)) = (web::window(), h.pump.as_ref()) else {
        return;
    };
    match window.set_interval_with_callback_and_timeout_and_arguments_0(
        cb.as_ref().unchecked_ref(),
        AUDIO_TICK_MS,
    ) {
        Ok(id) => h.interval = Some(id),
        Err(e) => log::error!("[audio] setInterval error: {:?}", e),
    }
}

fn pump(host: &Rc<RefCell<AudioHost>>) {
    let mut guard = host.borrow_mut();
    let h = &mut *guard;
    let idle = match h.engine.as_mut() {
        Some(engine) => {
            engine.pump();
            !engine.needs_tick()
        }
        None => true,
    };
    if idle {
        clear_pump_interval(h);
        log::debug!("[audio] pump idle");
    }
}

fn clear_pump_interval(h: &mut AudioHost) {
    if let Some(id) = h.interval.take() {
        if let Some(w) = web::window() {
            w.clear_interval_with_handle(id);
        }
    }
}

/// Tear down every layer and close the context. Later gestures are ignored.
pub fn shutdown(host: &Rc<RefCell<AudioHost>>) {
    let mut h = host.borrow_mut();
    clear_pump_interval(&mut h);
    h.disabled = true;
    if let Some(engine) = h.engine.take() {
        engine.shutdown().close();
    }
}
