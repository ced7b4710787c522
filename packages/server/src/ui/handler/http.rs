//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::RoomId,
    infrastructure::dto::http::{HealthDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    let status = state.get_server_status_usecase.execute().await;
    Json(HealthDto {
        status: "ok".to_string(),
        rooms: status.rooms,
        connections: status.connections,
    })
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    // 形式として不正な ID の Room は存在しない
    let room_id = RoomId::try_from(room_id).map_err(|_| StatusCode::NOT_FOUND)?;

    let room = state
        .get_room_detail_usecase
        .execute(&room_id)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    Ok(Json(RoomDetailDto::from(&room)))
}
