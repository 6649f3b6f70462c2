pub mod gesture;
pub mod orientation;
pub mod pointer;

pub use gesture::wire_gesture_unlock;
pub use orientation::{request_orientation_permission, wire_orientation};
pub use pointer::{wire_input_handlers, wire_resize};
