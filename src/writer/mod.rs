//! Output artifacts: the tileless map and its Lua rebuild script.
pub mod bin;
pub mod lua;
pub mod signature;

pub use signature::{FixedClock, SignatureClock, SystemClock};
