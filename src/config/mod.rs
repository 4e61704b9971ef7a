//! Configuration module for ref-measure.

mod i18n;
mod measure;

pub use i18n::{get_messages, Messages, MESSAGES_EN, MESSAGES_JA};
pub use measure::MeasureConfig;
