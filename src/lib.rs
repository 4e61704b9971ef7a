// Copyright 2025 The ref-measure Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # ref-measure
//!
//! Measure real-world sizes in a photo using an object of known size as the
//! reference.
//!
//! A photo is shown downscaled, a detection service locates a reference
//! object (postbox, intercom, block), the user confirms it and enters its
//! physical width, and every rectangle dragged afterwards is reported in
//! millimeters together with its aspect ratio.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ref_measure::{MockDetector, Point, Session, SourceImage};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut session = Session::default();
//!     session.load_image(SourceImage::from_path("facade.jpg")?)?;
//!     session.analyze_with(&MockDetector::default()).await?;
//!
//!     let suggested = session.confirm_reference()?;
//!     session.set_reference_size(suggested.width_mm, suggested.height_mm)?;
//!
//!     session.pointer_down(Point::new(100.0, 100.0));
//!     session.pointer_move(Point::new(200.0, 150.0));
//!     let release = session.pointer_up(Point::new(200.0, 150.0))?;
//!     println!("{:?}", release);
//!     Ok(())
//! }
//! ```

pub mod calibration;
pub mod config;
pub mod detection;
pub mod geometry;
pub mod measurement;
pub mod preview;
pub mod selection;
pub mod settings;
pub mod source;
pub mod workflow;

pub use calibration::{CalibrationData, ReferenceKind, ReferenceObject, ReferenceSize, ValidationError};
pub use config::{get_messages, MeasureConfig, Messages};
pub use detection::{DetectionError, DetectorConfig, HttpDetector, MockDetector, ReferenceDetector};
pub use geometry::{compute_display_geometry, DisplayGeometry, Point, Rect};
pub use measurement::{measure, MeasurementResult};
pub use preview::render_preview;
pub use settings::AppSettings;
pub use source::{ImageToken, SourceImage};
pub use workflow::{
    CompletionStatus, Notice, PointerRelease, Session, SessionError, SessionEvent, WorkflowState,
};
