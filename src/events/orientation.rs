use crate::dom;
use crate::scene::Scene;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

pub fn wire_orientation(window: &web::Window, scene: &Rc<Scene>) {
    if !scene.capabilities().orientation_api {
        return;
    }
    let scene = scene.clone();
    dom::listen(window, "deviceorientation", move |ev: web::DeviceOrientationEvent| {
        let (Some(beta), Some(gamma)) = (ev.beta(), ev.gamma()) else {
            return;
        };
        scene
            .motion
            .borrow_mut()
            .on_orientation(beta as f32, gamma as f32);
        scene.sync_motion_target();
    });
}

/// Ask for device-orientation access. Platforms without an explicit
/// permission API grant it implicitly when the API exists.
pub async fn request_orientation_permission(scene: &Rc<Scene>) -> bool {
    let mut caps = scene.capabilities();
    if !caps.orientation_api {
        return false;
    }
    let granted = match permission_request_fn() {
        Some((ctor, request)) => match request.call0(&ctor) {
            Ok(promise) => match JsFuture::from(js_sys::Promise::resolve(&promise)).await {
                Ok(state) => state.as_string().as_deref() == Some("granted"),
                Err(e) => {
                    log::warn!("[motion] permission request rejected: {:?}", e);
                    false
                }
            },
            Err(e) => {
                log::warn!("[motion] permission request failed: {:?}", e);
                false
            }
        },
        None => true,
    };
    log::info!("[motion] orientation permission granted={}", granted);
    caps.orientation_granted = granted;
    scene.apply_capabilities(caps);
    granted
}

fn permission_request_fn() -> Option<(JsValue, js_sys::Function)> {
    let ctor = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("DeviceOrientationEvent")).ok()?;
    let request = js_sys::Reflect::get(&ctor, &JsValue::from_str("requestPermission")).ok()?;
    let request = request.dyn_into::<js_sys::Function>().ok()?;
    Some((ctor, request))
}
