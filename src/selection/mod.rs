//! Rectangle selection gestures in display space.

mod tracker;

pub use tracker::{GestureOutcome, GestureState, SelectionTracker, DEFAULT_MIN_SELECTION_SIZE};
