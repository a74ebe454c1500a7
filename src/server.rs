use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::about::AboutCards;
use crate::advisor;
use crate::error::AdvisorError;
use crate::model::Classifier;
use crate::pages::{self, Submission};
use crate::types::{PredictionForm, PredictionOut, PredictionRequest};

// ---------- Server state ----------

#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn Classifier>,
    pub about: Arc<AboutCards>,
}

impl AppState {
    pub fn new(model: Arc<dyn Classifier>, about: AboutCards) -> Self {
        Self {
            model,
            about: Arc::new(about),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/predict", get(prediction_form).post(submit_prediction))
        .route("/api/predict", post(api_predict))
        .route("/about", get(about))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------- Handlers ----------

async fn health() -> &'static str {
    "ok"
}

async fn home() -> Html<String> {
    Html(pages::home())
}

async fn about(State(state): State<AppState>) -> Html<String> {
    Html(pages::about(&state.about))
}

async fn prediction_form() -> Html<String> {
    Html(pages::prediction(&PredictionForm::default(), Submission::None))
}

async fn submit_prediction(
    State(state): State<AppState>,
    Form(form): Form<PredictionForm>,
) -> Html<String> {
    let outcome = form
        .parse()
        .map_err(AdvisorError::from)
        .and_then(|req| advisor::recommend(state.model.as_ref(), &req));

    match outcome {
        Ok(rec) => Html(pages::prediction(&form, Submission::Ok(&rec))),
        Err(e) => {
            tracing::warn!(error = %e, "prediction form failed");
            Html(pages::prediction(&form, Submission::Err(e.to_string())))
        }
    }
}

async fn api_predict(
    State(state): State<AppState>,
    Json(req): Json<PredictionRequest>,
) -> Result<Json<PredictionOut>, (StatusCode, Json<serde_json::Value>)> {
    let rec = advisor::recommend(state.model.as_ref(), &req).map_err(|e| {
        let status = if e.is_validation() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            tracing::error!(error = %e, "inference failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "error": e.to_string() })))
    })?;
    Ok(Json(rec.to_out()))
}
