//! Events emitted to the view layer.

use crate::calibration::{CalibrationData, ReferenceKind, ReferenceObject, ReferenceSize};
use crate::geometry::{DisplayGeometry, Rect};
use crate::measurement::MeasurementResult;
use crate::source::ImageToken;

use super::state::WorkflowState;

/// User-facing notices. The view decides how to word them.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Detection ran but found no reference object.
    ReferenceNotFound,
    /// Detection failed; carries the error text.
    DetectionFailed(String),
    /// The user rejected the detected box; manual correction is not available.
    ManualAdjustUnavailable,
}

/// Something the view may want to redraw for.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StateChanged {
        from: WorkflowState,
        to: WorkflowState,
    },
    ImageLoaded {
        token: ImageToken,
        geometry: DisplayGeometry,
    },
    ReferenceDetected(ReferenceObject),
    /// The user should enter the reference size; `suggested` prefills the input.
    SizeRequested {
        kind: ReferenceKind,
        suggested: ReferenceSize,
    },
    Calibrated(CalibrationData),
    /// Live selection in display space; `None` clears it.
    SelectionChanged(Option<Rect>),
    Measured(MeasurementResult),
    Notice(Notice),
}

/// Callback type for session event subscribers.
pub type EventCallback = Box<dyn Fn(&SessionEvent) + Send + Sync>;
