//! Surveygauge - fieldwork progress dashboard
//!
//! Surveygauge reads a CSV export of household-interview survey data, counts
//! the completed interviews and shows them on a gauge against a fixed target
//! sample size. When the target is reached the page switches to a celebration
//! overlay (fireworks image or video with blinking congratulation text).
//!
//! # Quick Start
//!
//! ```no_run
//! use surveygauge::{DashboardConfig, SurveyCount};
//!
//! let config = DashboardConfig::default();
//! let survey = SurveyCount::from_path("interviews.csv", &config.count_column).unwrap();
//! let state = config.presenter().unwrap().evaluate_survey(&survey).unwrap();
//!
//! if state.is_celebrating() {
//!     println!("Target reached with {} interviews!", survey.completed);
//! }
//! ```
//!
//! # Celebration Rule
//!
//! | Count | Overlay | Text | Video |
//! |-------|---------|------|-------|
//! | `count < target` | hidden | hidden | hidden |
//! | `count >= target` | visible | visible | visible |
//!
//! Negative counts and non-positive targets are rejected with
//! [`PresenterError::InvalidInput`].
//!
//! # Modules
//!
//! - [`presenter`]: the threshold rule and the presentation state
//! - [`survey`]: CSV loading and completed-interview counting
//! - [`config`]: dashboard settings from JSON and defaults
//! - [`assets`]: logo discovery and static file lookup
//! - [`report`]: HTML and JSON dashboard writers
//! - [`serve`]: HTTP server for the live dashboard

pub mod assets;
pub mod config;
pub mod presenter;
pub mod report;
pub mod serve;
pub mod survey;

pub use config::{ConfigError, DashboardConfig, Media};
pub use presenter::{compute_visibility, PresentationState, PresenterError, Region, ThresholdPresenter};
pub use report::Dashboard;
pub use survey::{SurveyCount, SurveyError};
