//! Crate-level tests driving the engine end to end.

mod helpers;

pub use helpers::*;
