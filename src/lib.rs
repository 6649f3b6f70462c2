#![cfg(target_arch = "wasm32")]
use focus_core::Stage;
use scene::Scene;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod render;
mod report;
mod scene;

thread_local! {
    static SCENE: RefCell<Option<Rc<Scene>>> = RefCell::new(None);
}

fn with_scene(f: impl FnOnce(&Rc<Scene>)) {
    let scene = SCENE.with(|s| s.borrow().clone());
    match scene {
        Some(scene) => f(&scene),
        None => log::warn!("scene not ready"),
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("focus-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let seed = js_sys::Date::now() as u64;
    let scene = Scene::new(&window, &document, seed)?;

    events::wire_gesture_unlock(&window, &scene);
    events::wire_input_handlers(&window, &scene);
    events::wire_orientation(&window, &scene);
    events::wire_resize(&window, &scene);
    wire_unmount(&window);

    scene.start();
    SCENE.with(|s| *s.borrow_mut() = Some(scene));
    Ok(())
}

fn wire_unmount(window: &web::Window) {
    dom::listen(window, "pagehide", move |_: web::Event| {
        shutdown();
    });
}

/// Session running state: drives the pulse fade and the soundscape.
#[wasm_bindgen(js_name = setSessionActive)]
pub fn set_session_active(active: bool) {
    with_scene(|s| s.set_session_active(active));
}

/// Starfield speed in 0..1.
#[wasm_bindgen(js_name = setWarpSpeed)]
pub fn set_warp_speed(speed: f32) {
    with_scene(|s| s.set_warp_speed(speed));
}

#[wasm_bindgen(js_name = setCollapsed)]
pub fn set_collapsed(collapsed: bool) {
    with_scene(|s| s.set_collapsed(collapsed));
}

/// 0 = start, 1 = mid, anything else = end.
#[wasm_bindgen(js_name = setStage)]
pub fn set_stage(stage: u8) {
    with_scene(|s| s.set_stage(Stage::from_index(stage)));
}

#[wasm_bindgen(js_name = setParallaxEnabled)]
pub fn set_parallax_enabled(enabled: bool) {
    with_scene(|s| s.set_parallax_enabled(enabled));
}

/// Must be called from a user gesture on platforms that gate orientation.
#[wasm_bindgen(js_name = requestMotionPermission)]
pub async fn request_motion_permission() -> bool {
    let scene = SCENE.with(|s| s.borrow().clone());
    match scene {
        Some(scene) => events::request_orientation_permission(&scene).await,
        None => false,
    }
}

/// Stop every loop and close the audio context.
#[wasm_bindgen]
pub fn shutdown() {
    if let Some(scene) = SCENE.with(|s| s.borrow_mut().take()) {
        scene.shutdown();
    }
}
