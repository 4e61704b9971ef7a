//! A single measurement session.
//!
//! The session owns every entity of one measurement (image, display
//! geometry, reference, calibration, selection, result) and is the only
//! place that changes the workflow state. Detection is the one async step:
//! [`Session::start_analysis`] hands out a request tagged with the image's
//! token and [`Session::complete_analysis`] drops any answer whose token no
//! longer matches the loaded image.

use thiserror::Error;

use super::events::{EventCallback, Notice, SessionEvent};
use super::state::{StateViolation, Workflow, WorkflowState};
use crate::calibration::{CalibrationData, ReferenceObject, ReferenceSize, ValidationError};
use crate::config::MeasureConfig;
use crate::detection::{DetectionError, ReferenceDetector};
use crate::geometry::{compute_display_geometry, DisplayGeometry, GeometryError, Point, Rect};
use crate::measurement::{measure, MeasurementError, MeasurementResult};
use crate::selection::{GestureOutcome, SelectionTracker};
use crate::source::{ImageToken, SourceImage};

/// Session errors.
///
/// None of these leave the session in a different state than before the
/// failing call.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    State(#[from] StateViolation),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Measurement(#[from] MeasurementError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("No image has been loaded")]
    NoImage,
}

/// A detection request for the image loaded when it was issued.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub token: ImageToken,
    pub image: SourceImage,
}

/// What happened to a detection response.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionStatus {
    /// A reference was found; the user must confirm it.
    Detected(ReferenceObject),
    /// Detection succeeded but found nothing.
    NotFound,
    /// Detection failed; carries the error text.
    Failed(String),
    /// The response belongs to an image that is no longer loaded.
    Stale,
}

/// Result of rejecting the detected reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectOutcome {
    /// Manual box correction does not exist; the session keeps waiting for
    /// confirmation.
    ManualAdjustUnavailable,
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerRelease {
    /// No gesture was in progress.
    Ignored,
    /// The rectangle was too small and was dropped.
    Discarded,
    /// The rectangle was measured.
    Measured(MeasurementResult),
}

/// One measurement session.
pub struct Session {
    config: MeasureConfig,
    workflow: Workflow,
    image: Option<SourceImage>,
    geometry: Option<DisplayGeometry>,
    reference: Option<ReferenceObject>,
    calibration: Option<CalibrationData>,
    tracker: SelectionTracker,
    selection: Option<Rect>,
    measurement: Option<MeasurementResult>,
    listeners: Vec<EventCallback>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(MeasureConfig::default())
    }
}

impl Session {
    /// Create an empty session.
    pub fn new(config: MeasureConfig) -> Self {
        let tracker = SelectionTracker::new(config.min_selection_size);
        Self {
            config,
            workflow: Workflow::new(),
            image: None,
            geometry: None,
            reference: None,
            calibration: None,
            tracker,
            selection: None,
            measurement: None,
            listeners: Vec::new(),
        }
    }

    /// Register a callback for session events.
    pub fn subscribe(&mut self, callback: impl Fn(&SessionEvent) + Send + Sync + 'static) {
        self.listeners.push(Box::new(callback));
    }

    pub fn config(&self) -> &MeasureConfig {
        &self.config
    }

    pub fn state(&self) -> WorkflowState {
        self.workflow.state()
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn geometry(&self) -> Option<&DisplayGeometry> {
        self.geometry.as_ref()
    }

    pub fn reference(&self) -> Option<&ReferenceObject> {
        self.reference.as_ref()
    }

    /// The reference bounding box converted to display space.
    pub fn reference_in_display(&self) -> Option<Rect> {
        let geometry = self.geometry.as_ref()?;
        let reference = self.reference.as_ref()?;
        Some(geometry.to_display(reference.bounding_box))
    }

    pub fn calibration(&self) -> Option<&CalibrationData> {
        self.calibration.as_ref()
    }

    /// The live or finalized selection, in display space.
    pub fn selection(&self) -> Option<Rect> {
        self.selection
    }

    pub fn measurement(&self) -> Option<&MeasurementResult> {
        self.measurement.as_ref()
    }

    /// Load a new source image, discarding everything derived from the
    /// previous one. Allowed in any state.
    pub fn load_image(&mut self, image: SourceImage) -> Result<DisplayGeometry, SessionError> {
        let geometry = compute_display_geometry(
            image.width() as f64,
            image.height() as f64,
            self.config.max_display_width,
            self.config.max_display_height,
        )?;

        self.clear_derived();
        let token = image.token();
        tracing::info!(
            "Loaded {}x{} image {} (display {:.0}x{:.0}, scale {:.3})",
            image.width(),
            image.height(),
            token,
            geometry.display_width,
            geometry.display_height,
            geometry.scale
        );
        self.image = Some(image);
        self.geometry = Some(geometry);

        let previous = self.workflow.reset();
        if previous != WorkflowState::Idle {
            self.emit(SessionEvent::StateChanged {
                from: previous,
                to: WorkflowState::Idle,
            });
        }
        self.emit(SessionEvent::ImageLoaded { token, geometry });
        Ok(geometry)
    }

    /// Drop the image and everything derived from it.
    pub fn reset(&mut self) {
        self.clear_derived();
        self.image = None;
        self.geometry = None;
        let previous = self.workflow.reset();
        if previous != WorkflowState::Idle {
            self.emit(SessionEvent::StateChanged {
                from: previous,
                to: WorkflowState::Idle,
            });
        }
    }

    /// Enter `Analyzing` and return the request to send to a detector.
    pub fn start_analysis(&mut self) -> Result<AnalysisRequest, SessionError> {
        self.workflow.require(WorkflowState::Idle, "start analysis")?;
        let image = self.image.clone().ok_or(SessionError::NoImage)?;
        self.advance(WorkflowState::Analyzing, "start analysis")?;
        Ok(AnalysisRequest {
            token: image.token(),
            image,
        })
    }

    /// Apply a detector's answer for the request tagged `token`.
    pub fn complete_analysis(
        &mut self,
        token: ImageToken,
        outcome: Result<Option<ReferenceObject>, DetectionError>,
    ) -> CompletionStatus {
        let current = self.image.as_ref().map(SourceImage::token);
        if current != Some(token) || self.state() != WorkflowState::Analyzing {
            tracing::warn!("Discarding stale detection response for image {}", token);
            return CompletionStatus::Stale;
        }

        match outcome {
            Ok(Some(reference)) => {
                tracing::info!(
                    "Detected {} at {:?} (confidence {:.2})",
                    reference.kind,
                    reference.bounding_box,
                    reference.confidence
                );
                self.reference = Some(reference.clone());
                self.force_advance(WorkflowState::ConfirmReference);
                self.emit(SessionEvent::ReferenceDetected(reference.clone()));
                CompletionStatus::Detected(reference)
            }
            Ok(None) => {
                tracing::info!("No reference object found");
                self.force_advance(WorkflowState::Idle);
                self.emit(SessionEvent::Notice(Notice::ReferenceNotFound));
                CompletionStatus::NotFound
            }
            Err(e) => {
                tracing::error!("Detection failed: {}", e);
                let message = e.to_string();
                self.force_advance(WorkflowState::Idle);
                self.emit(SessionEvent::Notice(Notice::DetectionFailed(message.clone())));
                CompletionStatus::Failed(message)
            }
        }
    }

    /// Run detection for the loaded image and apply the result.
    pub async fn analyze_with<D: ReferenceDetector>(
        &mut self,
        detector: &D,
    ) -> Result<CompletionStatus, SessionError> {
        let request = self.start_analysis()?;
        let outcome = detector.detect(&request.image).await;
        Ok(self.complete_analysis(request.token, outcome))
    }

    /// Accept the detected box and ask for the reference size.
    ///
    /// Returns the size suggestion for prefilling the input.
    pub fn confirm_reference(&mut self) -> Result<ReferenceSize, SessionError> {
        self.workflow
            .require(WorkflowState::ConfirmReference, "confirm reference")?;
        let kind = self
            .reference
            .as_ref()
            .map(|reference| reference.kind.clone())
            .ok_or(ValidationError::MissingReference)?;
        self.advance(WorkflowState::SetReferenceSize, "confirm reference")?;

        let suggested = kind.suggested_size();
        self.emit(SessionEvent::SizeRequested { kind, suggested });
        Ok(suggested)
    }

    /// Reject the detected box. The session stays in `ConfirmReference`.
    pub fn reject_reference(&mut self) -> Result<RejectOutcome, SessionError> {
        self.workflow
            .require(WorkflowState::ConfirmReference, "reject reference")?;
        tracing::info!("Reference rejected; manual adjustment is not available");
        self.emit(SessionEvent::Notice(Notice::ManualAdjustUnavailable));
        Ok(RejectOutcome::ManualAdjustUnavailable)
    }

    /// Declare the reference's physical size and calibrate.
    pub fn set_reference_size(
        &mut self,
        width_mm: f64,
        height_mm: f64,
    ) -> Result<CalibrationData, SessionError> {
        self.workflow
            .require(WorkflowState::SetReferenceSize, "set reference size")?;
        let reference = self
            .reference
            .as_ref()
            .ok_or(ValidationError::MissingReference)?;

        let calibration =
            CalibrationData::from_reference(reference, ReferenceSize::new(width_mm, height_mm))?;
        self.advance(WorkflowState::SelectRect, "set reference size")?;
        self.calibration = Some(calibration.clone());
        self.emit(SessionEvent::Calibrated(calibration.clone()));
        Ok(calibration)
    }

    /// Pointer pressed at a display-space position.
    ///
    /// Returns whether a gesture started. Ignored outside selection states.
    pub fn pointer_down(&mut self, point: Point) -> bool {
        let state = self.state();
        if !state.accepts_gestures() {
            tracing::debug!("Ignoring pointer down in state {}", state);
            return false;
        }
        if state == WorkflowState::RectDone {
            self.measurement = None;
            self.force_advance(WorkflowState::SelectRect);
        }

        self.tracker.begin(point);
        self.selection = self.tracker.current();
        self.emit(SessionEvent::SelectionChanged(self.selection));
        true
    }

    /// Pointer moved. Returns the live selection when a gesture is active.
    pub fn pointer_move(&mut self, point: Point) -> Option<Rect> {
        if self.state() != WorkflowState::SelectRect {
            return None;
        }
        let rect = self.tracker.update(point)?;
        self.selection = Some(rect);
        self.emit(SessionEvent::SelectionChanged(self.selection));
        Some(rect)
    }

    /// Pointer released or left the canvas.
    pub fn pointer_up(&mut self, point: Point) -> Result<PointerRelease, SessionError> {
        if self.state() != WorkflowState::SelectRect {
            return Ok(PointerRelease::Ignored);
        }

        match self.tracker.end(point) {
            GestureOutcome::Ignored => Ok(PointerRelease::Ignored),
            GestureOutcome::Discarded(rect) => {
                tracing::debug!("Selection {:?} too small, discarded", rect);
                self.selection = None;
                self.emit(SessionEvent::SelectionChanged(None));
                Ok(PointerRelease::Discarded)
            }
            GestureOutcome::Finalized(rect) => {
                let geometry = self.geometry.ok_or(SessionError::NoImage)?;
                let result = match measure(rect, &geometry, self.calibration.as_ref()) {
                    Ok(result) => result,
                    Err(e) => {
                        self.selection = None;
                        return Err(e.into());
                    }
                };
                self.advance(WorkflowState::RectDone, "finish selection")?;
                self.selection = Some(rect);
                self.measurement = Some(result);
                self.emit(SessionEvent::Measured(result));
                Ok(PointerRelease::Measured(result))
            }
        }
    }

    fn clear_derived(&mut self) {
        self.reference = None;
        self.calibration = None;
        self.tracker.cancel();
        self.selection = None;
        self.measurement = None;
    }

    fn advance(
        &mut self,
        next: WorkflowState,
        operation: &'static str,
    ) -> Result<(), StateViolation> {
        let from = self.workflow.transition(next, operation)?;
        self.emit(SessionEvent::StateChanged { from, to: next });
        Ok(())
    }

    /// Advance along an edge already known to be legal from the current state.
    fn force_advance(&mut self, next: WorkflowState) {
        if let Err(e) = self.advance(next, "advance workflow") {
            tracing::error!("Unexpected workflow violation: {}", e);
        }
    }

    fn emit(&self, event: SessionEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
    }
}
