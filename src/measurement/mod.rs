//! Conversion of a selection rectangle into physical dimensions.

mod calculator;

pub use calculator::{measure, round_to_tenth, MeasurementError, MeasurementResult};
