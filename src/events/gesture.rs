use crate::audio;
use crate::dom;
use crate::scene::Scene;
use std::rc::Rc;
use web_sys as web;

/// Audio may only start after a real user interaction; the first click,
/// key press or touch builds the context, later ones resume it if suspended.
pub fn wire_gesture_unlock(window: &web::Window, scene: &Rc<Scene>) {
    for name in ["pointerdown", "keydown", "touchend"] {
        let host = scene.audio.clone();
        dom::listen(window, name, move |_: web::Event| {
            audio::unlock(&host);
        });
    }
}
