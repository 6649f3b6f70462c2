use crate::dom;
use crate::input;
use crate::scene::Scene;
use std::rc::Rc;
use web_sys as web;

/// Touch is handled through touch events; pointer events of type "touch" are
/// ignored so the two sources stay independent.
#[inline]
fn is_touch(ev: &web::PointerEvent) -> bool {
    ev.pointer_type() == "touch"
}

pub fn wire_input_handlers(window: &web::Window, scene: &Rc<Scene>) {
    wire_pointermove(window, scene);
    wire_pointer_buttons(scene);
    wire_pointerleave(window, scene);
    wire_touch(scene);
}

fn wire_pointermove(window: &web::Window, scene: &Rc<Scene>) {
    let scene = scene.clone();
    dom::listen(window, "pointermove", move |ev: web::PointerEvent| {
        if is_touch(&ev) {
            return;
        }
        if let Some(w) = web::window() {
            let (width, height) = input::viewport_size(&w);
            scene.motion.borrow_mut().on_pointer_move(
                ev.client_x() as f32,
                ev.client_y() as f32,
                width,
                height,
            );
            scene.sync_motion_target();
        }
        let mut pulse = scene.pulse.borrow_mut();
        let pos = input::pointer_canvas_px(&ev, &pulse.canvas);
        pulse.entity.pointer_move(pos);
    });
}

fn wire_pointer_buttons(scene: &Rc<Scene>) {
    let canvas = scene.pulse.borrow().canvas.clone();

    let scene_down = scene.clone();
    dom::listen(&canvas, "pointerdown", move |ev: web::PointerEvent| {
        if is_touch(&ev) {
            return;
        }
        let mut pulse = scene_down.pulse.borrow_mut();
        let pos = input::pointer_canvas_px(&ev, &pulse.canvas);
        pulse.entity.pointer_down(pos);
    });

    // Release is tracked on the window so a drag ending off-canvas still lands.
    let scene_up = scene.clone();
    if let Some(window) = web::window() {
        dom::listen(&window, "pointerup", move |ev: web::PointerEvent| {
            if is_touch(&ev) {
                return;
            }
            let mut pulse = scene_up.pulse.borrow_mut();
            let pos = input::pointer_canvas_px(&ev, &pulse.canvas);
            pulse.entity.pointer_up(pos);
        });
    }
}

fn wire_pointerleave(window: &web::Window, scene: &Rc<Scene>) {
    let Some(document) = window.document() else {
        return;
    };
    let scene = scene.clone();
    dom::listen(&document, "pointerleave", move |ev: web::PointerEvent| {
        if is_touch(&ev) {
            return;
        }
        scene.motion.borrow_mut().on_pointer_leave();
        scene.sync_motion_target();
        scene.pulse.borrow_mut().entity.pointer_leave();
    });
}

fn wire_touch(scene: &Rc<Scene>) {
    let canvas = scene.pulse.borrow().canvas.clone();

    let scene_start = scene.clone();
    dom::listen(&canvas, "touchstart", move |ev: web::TouchEvent| {
        let mut pulse = scene_start.pulse.borrow_mut();
        if let Some(pos) = input::touch_canvas_px(&ev.touches(), &pulse.canvas) {
            pulse.entity.touch_start(pos);
        }
    });

    let scene_move = scene.clone();
    dom::listen(&canvas, "touchmove", move |ev: web::TouchEvent| {
        let mut pulse = scene_move.pulse.borrow_mut();
        if let Some(pos) = input::touch_canvas_px(&ev.touches(), &pulse.canvas) {
            pulse.entity.touch_move(pos);
        }
    });

    for name in ["touchend", "touchcancel"] {
        let scene_end = scene.clone();
        dom::listen(&canvas, name, move |ev: web::TouchEvent| {
            if ev.touches().length() == 0 {
                scene_end.pulse.borrow_mut().entity.touch_end();
            }
        });
    }
}

pub fn wire_resize(window: &web::Window, scene: &Rc<Scene>) {
    let scene = scene.clone();
    dom::listen(window, "resize", move |_: web::Event| {
        scene.resize();
    });
}
