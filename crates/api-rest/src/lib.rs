//! # API REST
//!
//! REST API implementation for the triage service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON rejections, status codes, CORS)
//!
//! Uses `api-shared` for wire types and `triage-core` for all prediction logic.

#![warn(rust_2018_idioms)]

use api_shared::{
    DiseaseProbability, EnrichedDisease, ErrorRes, HealthRes, HealthService, ScoredDoctor,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use triage_core::{TriageError, TriageService};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    service: TriageService,
}

impl AppState {
    pub fn new(service: TriageService) -> Self {
        Self { service }
    }
}

/// Error returned by every handler.
///
/// Serialises as `{"kind": ..., "error": ...}` with a status derived from the error kind.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl ApiError {
    fn bad_request(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl From<TriageError> for ApiError {
    fn from(err: TriageError) -> Self {
        let status = match &err {
            TriageError::InvalidInput(_) | TriageError::ModelCapability(_) => {
                StatusCode::BAD_REQUEST
            }
            TriageError::InsufficientClasses { .. }
            | TriageError::UnknownDisease(_)
            | TriageError::UnknownSpecialtyMapping(_)
            | TriageError::MalformedDoctorRecord { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            TriageError::FileRead { .. } | TriageError::Csv { .. } | TriageError::Json { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("invalid_input", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorRes {
            kind: self.kind.into(),
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, predict_disease, predict_doctor),
    components(schemas(HealthRes, ErrorRes, DiseaseProbability, EnrichedDisease, ScoredDoctor))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI, CORS and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/predict/disease", post(predict_disease))
        .route("/api/predict/doctor", post(predict_doctor))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/api/predict/disease",
    request_body(content = Vec<f64>, description = "Symptom indicators in the classifier's feature order"),
    responses(
        (status = 200, description = "Three most probable diseases, most probable first", body = Vec<EnrichedDisease>),
        (status = 400, description = "Malformed symptom vector or model without probability inference", body = ErrorRes),
        (status = 422, description = "Reference data does not cover a predicted disease", body = ErrorRes)
    )
)]
/// Predict the most likely diseases for a symptom vector
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - the body is not a JSON array of numbers of the expected length,
/// - the loaded model cannot produce class probabilities.
///
/// Returns `422 Unprocessable Entity` if a predicted disease has no metadata row.
#[axum::debug_handler]
async fn predict_disease(
    State(state): State<AppState>,
    payload: Result<Json<Vec<f64>>, JsonRejection>,
) -> Result<Json<Vec<EnrichedDisease>>, ApiError> {
    let Json(symptoms) = payload.inspect_err(|e| {
        tracing::error!("Predict disease rejection: {:?}", e);
    })?;

    tracing::debug!("predicting diseases for {} symptom features", symptoms.len());
    match state.service.predict_disease(&symptoms) {
        Ok(diseases) => Ok(Json(diseases)),
        Err(e) => {
            tracing::error!("Predict disease error: {:?}", e);
            Err(e.into())
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/predict/doctor",
    request_body = Vec<DiseaseProbability>,
    responses(
        (status = 200, description = "Doctors with a positive score, highest first", body = Vec<ScoredDoctor>),
        (status = 400, description = "Malformed prediction list", body = ErrorRes),
        (status = 422, description = "A disease has no specialty mapping", body = ErrorRes)
    )
)]
/// Rank doctors against a list of disease predictions
///
/// Accepts the output of disease prediction unchanged, since `name` is read as `disease`.
///
/// # Errors
/// Returns `400 Bad Request` if the body is not a list of `{disease, probability}` objects with
/// probabilities in `[0, 1]`.
///
/// Returns `422 Unprocessable Entity` if a disease has no specialty mapping.
#[axum::debug_handler]
async fn predict_doctor(
    State(state): State<AppState>,
    payload: Result<Json<Vec<DiseaseProbability>>, JsonRejection>,
) -> Result<Json<Vec<ScoredDoctor>>, ApiError> {
    let Json(predictions) = payload.inspect_err(|e| {
        tracing::error!("Predict doctor rejection: {:?}", e);
    })?;

    tracing::debug!("ranking doctors against {} predictions", predictions.len());
    match state.service.predict_doctor(&predictions) {
        Ok(doctors) => Ok(Json(doctors)),
        Err(e) => {
            tracing::error!("Predict doctor error: {:?}", e);
            Err(e.into())
        }
    }
}
