//! Controller input.
//!
//! The standard NES controller reports its eight buttons one bit at a
//! time through $4016, driven by the strobe protocol implemented in
//! [`Controller`]. Button state itself is pushed in by the host's input
//! source between frames.

mod controller;

pub use controller::{Button, Controller};
