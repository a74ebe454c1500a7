//! Diabetes risk & BMI advisor.
//!
//! A small web app: a health form goes through a pretrained classifier and
//! comes back as a prediction, a certainty and a target-weight recommendation.

pub mod about;
pub mod advisor;
pub mod config;
pub mod error;
pub mod model;
pub mod pages;
pub mod server;
pub mod types;

pub use advisor::{predict_and_recommend, recommend, Outcome, Recommendation};
pub use config::AdvisorConfig;
pub use error::{AdvisorError, InferenceError, ValidationError};
pub use model::{load_classifier, Classifier, SvmModel};
pub use server::{router, AppState};
pub use types::{PredictionForm, PredictionOut, PredictionRequest};
