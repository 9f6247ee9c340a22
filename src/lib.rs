//! Sub-microsecond timing of hot code paths.
//!
//! A [`Timer`] pairs a hardware cycle-counter read with a monotonic
//! wall-clock read at start and at stop, then reports both deltas to a text
//! sink. Misuse never panics: out-of-order calls are ignored and leave an
//! `ERROR` line in the sink instead.

mod timer;

pub use timer::*;
