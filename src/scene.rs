use crate::audio::{self, AudioHost};
use crate::constants::{PULSE_CANVAS_ID, STARFIELD_CANVAS_ID, STARFIELD_PARALLAX_MAX_PX};
use crate::dom;
use crate::frame::AnimationLoop;
use crate::input;
use crate::render;
use focus_core::constants::{PULSE_PARALLAX_DEPTH, PULSE_PARALLAX_MAX_PX, STAR_PARALLAX_DEPTH};
use focus_core::{
    resolve_input_source, trail_alpha, AnalyzerBridge, Capabilities, Displacement, MotionTracker,
    ParallaxEngine, PulseEntity, PulseParams, Stage, StarSprite, Starfield, StarfieldInput,
    StarfieldParams,
};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use web_sys as web;

pub struct StarfieldView {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    field: Starfield,
    pub input: StarfieldInput,
    sprites: Vec<StarSprite>,
    displacement: Displacement,
}

impl StarfieldView {
    fn new(document: &web::Document, displacement: Displacement, seed: u64) -> anyhow::Result<Self> {
        let canvas = dom::canvas_by_id(document, STARFIELD_CANVAS_ID)?;
        let ctx = dom::context_2d(&canvas)?;
        let (w, h) = dom::sync_canvas_backing_size(&canvas);
        let mut field = Starfield::new(StarfieldParams::default(), seed);
        field.init(w, h);
        Ok(Self {
            canvas,
            ctx,
            field,
            input: StarfieldInput::default(),
            sprites: Vec::new(),
            displacement,
        })
    }

    fn frame(&mut self) {
        let offset = self
            .displacement
            .get(STAR_PARALLAX_DEPTH, STARFIELD_PARALLAX_MAX_PX * dom::device_pixel_ratio());
        self.field.step(&self.input, offset, &mut self.sprites);
        let (w, h) = self.field.viewport();
        render::starfield::draw(
            &self.ctx,
            w,
            h,
            &self.sprites,
            trail_alpha(self.input.collapsed),
        );
    }

    fn resize(&mut self) {
        let (w, h) = dom::sync_canvas_backing_size(&self.canvas);
        self.field.resize(w, h);
    }
}

pub struct PulseView {
    pub canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    pub entity: PulseEntity,
    displacement: Displacement,
    bridge: AnalyzerBridge,
    analyser: Option<web::AnalyserNode>,
    bins: Vec<u8>,
    started: Instant,
}

impl PulseView {
    fn new(document: &web::Document, displacement: Displacement, seed: u64) -> anyhow::Result<Self> {
        let canvas = dom::canvas_by_id(document, PULSE_CANVAS_ID)?;
        let ctx = dom::context_2d(&canvas)?;
        let (w, h) = dom::sync_canvas_backing_size(&canvas);
        Ok(Self {
            canvas,
            ctx,
            entity: PulseEntity::new(PulseParams::default(), w, h, seed),
            displacement,
            bridge: AnalyzerBridge::new(),
            analyser: None,
            bins: Vec::new(),
            started: Instant::now(),
        })
    }

    fn set_analyser(&mut self, analyser: &web::AnalyserNode) {
        self.bins = vec![0; analyser.frequency_bin_count() as usize];
        self.analyser = Some(analyser.clone());
        self.bridge.reset();
        log::info!("[pulse] analyser attached ({} bins)", self.bins.len());
    }

    fn frame(&mut self, dt: f32) {
        let now = self.started.elapsed().as_secs_f64();
        let snapshot = match &self.analyser {
            Some(a) => {
                a.get_byte_frequency_data(&mut self.bins);
                Some(&self.bins[..])
            }
            None => None,
        };
        let audio = self.bridge.sample(snapshot, now);
        let offset = self
            .displacement
            .get(PULSE_PARALLAX_DEPTH, PULSE_PARALLAX_MAX_PX * dom::device_pixel_ratio());
        let (w, h) = self.entity.viewport();
        let frame = self.entity.step(dt, &audio, offset);
        render::pulse::draw(&self.ctx, w, h, &frame);
    }

    fn resize(&mut self) {
        let (w, h) = dom::sync_canvas_backing_size(&self.canvas);
        self.entity.resize(w, h);
    }
}

/// Every visual and audio component of the page, plus the loops driving them.
pub struct Scene {
    pub motion: Rc<RefCell<MotionTracker>>,
    pub parallax: Rc<RefCell<ParallaxEngine>>,
    pub starfield: Rc<RefCell<StarfieldView>>,
    pub pulse: Rc<RefCell<PulseView>>,
    pub audio: Rc<RefCell<AudioHost>>,
    capabilities: Cell<Capabilities>,
    parallax_loop: RefCell<Option<AnimationLoop>>,
    loops: RefCell<Vec<AnimationLoop>>,
}

impl Scene {
    pub fn new(window: &web::Window, document: &web::Document, seed: u64) -> anyhow::Result<Rc<Self>> {
        let parallax = ParallaxEngine::default();
        let starfield = StarfieldView::new(document, parallax.reader(), seed)?;
        let pulse = PulseView::new(document, parallax.reader(), seed.wrapping_add(1))?;

        let capabilities = input::detect_capabilities(window);
        let source = resolve_input_source(&capabilities);
        log::info!("[motion] capabilities {:?} -> {:?}", capabilities, source);

        let scene = Rc::new(Self {
            motion: Rc::new(RefCell::new(MotionTracker::new(source))),
            parallax: Rc::new(RefCell::new(parallax)),
            starfield: Rc::new(RefCell::new(starfield)),
            pulse: Rc::new(RefCell::new(pulse)),
            audio: AudioHost::new(seed.wrapping_add(2)),
            capabilities: Cell::new(capabilities),
            parallax_loop: RefCell::new(None),
            loops: RefCell::new(Vec::new()),
        });

        let pulse = scene.pulse.clone();
        audio::on_analyser_ready(&scene.audio, move |analyser| {
            pulse.borrow_mut().set_analyser(analyser);
        });
        Ok(scene)
    }

    /// Start the starfield and pulse frame loops.
    pub fn start(&self) {
        let starfield = self.starfield.clone();
        let pulse = self.pulse.clone();
        let mut loops = self.loops.borrow_mut();
        loops.push(AnimationLoop::start("starfield", move |_| {
            starfield.borrow_mut().frame();
        }));
        loops.push(AnimationLoop::start("pulse", move |dt| {
            pulse.borrow_mut().frame(dt);
        }));
    }

    pub fn set_parallax_enabled(&self, enabled: bool) {
        self.parallax.borrow_mut().set_enabled(enabled);
        let mut slot = self.parallax_loop.borrow_mut();
        if enabled {
            if slot.is_none() {
                let parallax = self.parallax.clone();
                *slot = Some(AnimationLoop::start("parallax", move |_| {
                    parallax.borrow_mut().step();
                }));
            }
        } else if let Some(l) = slot.take() {
            l.stop();
        }
    }

    pub fn set_session_active(&self, active: bool) {
        self.pulse.borrow_mut().entity.set_active(active);
        audio::set_active(&self.audio, active);
    }

    pub fn set_warp_speed(&self, speed: f32) {
        self.starfield.borrow_mut().input.speed = if speed.is_finite() {
            speed.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    pub fn set_collapsed(&self, collapsed: bool) {
        self.starfield.borrow_mut().input.collapsed = collapsed;
    }

    pub fn set_stage(&self, stage: Stage) {
        self.starfield.borrow_mut().input.stage = stage;
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities.get()
    }

    /// Re-resolve the motion source after a capability change.
    pub fn apply_capabilities(&self, capabilities: Capabilities) {
        self.capabilities.set(capabilities);
        let source = resolve_input_source(&capabilities);
        self.motion.borrow_mut().set_source(source);
        self.parallax.borrow_mut().set_target(self.motion.borrow().target());
    }

    /// Forward the tracker's latest target to the parallax engine.
    pub fn sync_motion_target(&self) {
        let target = self.motion.borrow().target();
        self.parallax.borrow_mut().set_target(target);
    }

    /// Recompute canvas backing sizes and every viewport-dependent buffer.
    pub fn resize(&self) {
        self.starfield.borrow_mut().resize();
        self.pulse.borrow_mut().resize();
        if let Some(window) = web::window() {
            let mut caps = self.capabilities.get();
            caps.viewport_width = input::viewport_size(&window).0;
            self.apply_capabilities(caps);
        }
    }

    /// Stop every loop and release audio.
    pub fn shutdown(&self) {
        if let Some(l) = self.parallax_loop.borrow_mut().take() {
            l.stop();
        }
        for l in self.loops.borrow_mut().drain(..) {
            l.stop();
        }
        self.parallax.borrow_mut().set_enabled(false);
        audio::shutdown(&self.audio);
        log::info!("[scene] shut down");
    }
}
