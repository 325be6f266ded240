//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderValue, Method, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tracing::{debug, error, warn};

use crate::planner::PlanError;
use crate::store::StoreError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/get/:from/:destination", get(get_routes))
        .route("/api/post", post(add_booking))
        .layer(cors)
        .with_state(state)
}

/// CORS policy allowing the given frontend origin.
///
/// Without an origin (or with one that isn't a valid header value) no
/// cross-origin requests are allowed.
pub fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(err)) => {
            warn!(error = %err, "Ignoring invalid CORS origin");
            layer
        }
        None => layer,
    }
}

/// Health check endpoint.
async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    let current = state.service.current().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        pricelist_id: current.map(|summary| summary.id),
    }))
}

/// Every itinerary between two locations under the current price list.
async fn get_routes(
    State(state): State<AppState>,
    Path((from, destination)): Path<(String, String)>,
) -> Result<Json<RoutesResponse>, AppError> {
    let plan = state.service.get_routes(&from, &destination).await?;
    debug!(
        %from,
        %destination,
        routes = plan.itineraries.len(),
        "Served route query"
    );
    Ok(Json(RoutesResponse::from_plan(&plan)))
}

/// Record a booking.
async fn add_booking(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = request.into_booking(state.service.graph())?;
    let id = state.service.add_booking(booking).await?;
    Ok(Json(BookingResponse { id }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        let message = e.to_string();
        match e {
            PlanError::UnknownLocation(_) => AppError::BadRequest { message },
            PlanError::NoProviders { .. } => AppError::NotFound { message },
            PlanError::NoPriceList => AppError::Unavailable { message },
            PlanError::Storage(_) => AppError::Internal { message },
        }
    }
}

impl From<BookingError> for AppError {
    fn from(e: BookingError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        let message = e.to_string();
        match e {
            StoreError::NoPriceList => AppError::Unavailable { message },
            _ => AppError::Internal { message },
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Unavailable { message }
            | AppError::Internal { message } => message,
        };

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else {
            debug!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
