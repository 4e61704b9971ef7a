//! Measurement workflow: the session state machine and its events.

mod events;
mod session;
mod state;

pub use events::{EventCallback, Notice, SessionEvent};
pub use session::{AnalysisRequest, CompletionStatus, PointerRelease, RejectOutcome, Session, SessionError};
pub use state::{StateViolation, Workflow, WorkflowState};
