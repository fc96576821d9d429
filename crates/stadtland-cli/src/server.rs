//! HTTP API: round evaluation plus the open-games lobby.
//!
//! | Route | Method | Success |
//! |-------|--------|---------|
//! | `/api/evaluate` | POST | 200 `{"table": [...]}` |
//! | `/api/games` | GET | 200 list, newest first (games older than an hour are dropped) |
//! | `/api/games` | POST | 201 created game |
//! | `/api/games/{id}` | DELETE | 200 `{"message": ...}` |
//!
//! Failures answer with `{"error": "..."}`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use stadtland_core::{LobbyError, LobbyStore, NewGame, OpenGame, Round, RoundEngine, RoundError};
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RoundEngine>,
    pub lobby: Arc<dyn LobbyStore>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/evaluate", post(evaluate))
        .route("/api/games", post(create_game).get(list_games))
        .route("/api/games/{id}", delete(delete_game))
        .with_state(state)
}

pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<RoundError> for ApiError {
    fn from(err: RoundError) -> Self {
        let status = match &err {
            RoundError::Validation { .. } => StatusCode::BAD_REQUEST,
            RoundError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RoundError::ExternalService { .. } | RoundError::ResponseFormat { .. } => {
                StatusCode::BAD_GATEWAY
            }
        };
        error!(status = status.as_u16(), error = %err, "round evaluation failed");
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<LobbyError> for ApiError {
    fn from(err: LobbyError) -> Self {
        let status = match &err {
            LobbyError::MissingFields => StatusCode::BAD_REQUEST,
            LobbyError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error!(status = status.as_u16(), error = %err, "lobby request failed");
        Self {
            status,
            message: err.to_string(),
        }
    }
}

// Raw bodies so malformed JSON still gets the `{error}` shape.
async fn evaluate(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<serde_json::Value>, ApiError> {
    let round = Round::from_json(&body)?;
    let table = state.engine.evaluate(round).await?;
    Ok(Json(json!({ "table": table })))
}

async fn list_games(State(state): State<AppState>) -> Result<Json<Vec<OpenGame>>, ApiError> {
    Ok(Json(state.lobby.list_fresh(Utc::now())?))
}

async fn create_game(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<OpenGame>), ApiError> {
    let game: NewGame = serde_json::from_str(&body).map_err(|e| ApiError {
        status: StatusCode::BAD_REQUEST,
        message: format!("invalid game: {}", e),
    })?;
    let game = state.lobby.create(game, Utc::now())?;
    info!(id = %game.id, name = %game.game_name, "game opened");
    Ok((StatusCode::CREATED, Json(game)))
}

async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.lobby.delete(&id)?;
    info!(id = %id, "game closed");
    Ok(Json(json!({ "message": format!("game {} deleted", id) })))
}
