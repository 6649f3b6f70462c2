//! Platform-free core of the ambient focus timer.
//!
//! Everything here runs on the host as well as in the browser: the web
//! front-end owns the DOM, canvases and the Web Audio graph, and feeds this
//! crate with input events, frame deltas and analyser snapshots.

pub mod analyzer;
pub mod beat;
pub mod constants;
pub mod error;
pub mod motion;
pub mod parallax;
pub mod pulse;
pub mod report;
pub mod soundscape;
pub mod starfield;

pub use analyzer::*;
pub use beat::*;
pub use error::*;
pub use motion::*;
pub use parallax::*;
pub use pulse::*;
pub use report::*;
pub use soundscape::*;
pub use starfield::*;
