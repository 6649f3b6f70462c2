use crate::constants::MAX_FRAME_DT_SEC;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Wall-clock delta between animation frames, capped so a backgrounded tab
/// does not produce one huge simulation step.
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last).as_secs_f32();
        self.last = now;
        dt.min(MAX_FRAME_DT_SEC)
    }
}

type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// One self-rescheduling requestAnimationFrame chain.
///
/// `stop` cancels the pending request synchronously; no tick runs after it.
/// Dropping the loop stops it.
pub struct AnimationLoop {
    label: &'static str,
    tick: Tick,
    handle: Rc<Cell<Option<i32>>>,
    running: Rc<Cell<bool>>,
}

impl AnimationLoop {
    /// Start a loop calling `frame(dt_sec)` once per animation frame.
    pub fn start(label: &'static str, mut frame: impl FnMut(f32) + 'static) -> Self {
        let tick: Tick = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));
        let running = Rc::new(Cell::new(true));

        let tick_clone = tick.clone();
        let handle_clone = handle.clone();
        let running_clone = running.clone();
        let mut clock = FrameClock::new();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            handle_clone.set(None);
            if !running_clone.get() {
                return;
            }
            frame(clock.tick());
            if running_clone.get() {
                handle_clone.set(request_frame(&tick_clone));
            }
        }) as Box<dyn FnMut()>));

        handle.set(request_frame(&tick));
        log::info!("[frame] {} loop started", label);
        Self {
            label,
            tick,
            handle,
            running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn stop(&self) {
        if !self.running.replace(false) {
            return;
        }
        if let Some(id) = self.handle.take() {
            if let Some(w) = web::window() {
                _ = w.cancel_animation_frame(id);
            }
        }
        log::info!("[frame] {} loop stopped", self.label);
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
        // Break the closure's self-reference so it can be freed.
        if let Ok(mut slot) = self.tick.try_borrow_mut() {
            slot.take();
        }
    }
}

fn request_frame(tick: &Tick) -> Option<i32> {
    let w = web::window()?;
    let slot = tick.borrow();
    let cb = slot.as_ref()?;
    w.request_animation_frame(cb.as_ref().unchecked_ref()).ok()
}
