//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Room summary for list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub participant_count: usize,
    pub created_at: String, // ISO 8601
}

/// Room detail for detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub participant_count: usize,
    pub message_count: usize,
    pub video_url: Option<String>,
    pub playlist: Vec<String>,
    pub current_video_index: i64,
    pub created_at: String, // ISO 8601
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    pub rooms: usize,
    pub connections: usize,
}
