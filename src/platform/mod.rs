//! Platform abstraction layer
//!
//! Turns browser input events into per-tick simulation commands. Storage
//! lives in `persistence`.

pub mod clock;
pub mod input;

pub use clock::FrameClock;
pub use input::InputState;
