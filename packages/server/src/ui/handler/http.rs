//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    infrastructure::dto::{
        http::{ErrorDto, IdentityExchangeRequestDto, IdentityProfileDto, RoomInfoDto},
        websocket::RoomStateDto,
    },
    ui::state::AppState,
    usecase::ExchangeIdentityError,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Keep-alive probe (empty 200)
pub async fn keep_alive() -> StatusCode {
    StatusCode::OK
}

/// Current room state (for inspection)
pub async fn get_room(State(state): State<Arc<AppState>>) -> Json<RoomInfoDto> {
    let (room_state, connections) = state.get_room_state_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(RoomInfoDto {
        state: RoomStateDto::from(&room_state),
        connections,
    })
}

/// Exchange an authorization code for a display profile
pub async fn exchange_identity(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IdentityExchangeRequestDto>,
) -> Response {
    match state
        .exchange_identity_usecase
        .execute(request.code, request.redirect_uri)
        .await
    {
        Ok(profile) => Json(IdentityProfileDto::from(profile)).into_response(),
        Err(ExchangeIdentityError::MissingCode) => {
            error_response(StatusCode::BAD_REQUEST, "missing authorization code")
        }
        Err(ExchangeIdentityError::NotConfigured) => error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "identity provider is not configured",
        ),
        Err(ExchangeIdentityError::Exchange(_)) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "authentication failed")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorDto {
            error: message.to_string(),
        }),
    )
        .into_response()
}
