//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, GetRoomDetailUseCase,
    GetRoomsUseCase, GetServerStatusUseCase,
};

use super::{command::CommandRouter, shutdown::ShutdownCoordinator};

/// Shared application state
pub struct AppState {
    /// ConnectParticipantUseCase（接続開始のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（接続終了のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// WebSocket コマンドのルーター
    pub command_router: Arc<CommandRouter>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// GetServerStatusUseCase（稼働状況取得のユースケース）
    pub get_server_status_usecase: Arc<GetServerStatusUseCase>,
    pub shutdown: ShutdownCoordinator,
}
