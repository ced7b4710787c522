//! Server execution logic.

use std::{net::SocketAddr, sync::Arc};

use axum::{Router, routing::get};
use chanoma_shared::time::{Clock, SystemClock};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    domain::{ConnectionRepository, MessagePusher, RoomRepository},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryConnectionRepository, InMemoryRoomRepository},
    },
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, EventDispatcher,
        GetRoomDetailUseCase, GetRoomsUseCase, GetServerStatusUseCase, RoomCommandRunner,
    },
};

use super::{
    command::CommandRouter,
    config::ServerConfig,
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    shutdown::{ShutdownCoordinator, ShutdownPhase, listen_for_signals},
    state::AppState,
};

/// Errors that stop the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Room coordination server
///
/// This struct owns the wiring between the layers and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(ServerConfig::default().port(3000));
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
    dispatcher: EventDispatcher,
}

impl Server {
    /// Create a server backed by in-memory stores and the system clock
    pub fn new(config: ServerConfig) -> Self {
        Self::with_dependencies(
            config,
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(InMemoryConnectionRepository::new()),
            Arc::new(WebSocketMessagePusher::new()),
            Arc::new(SystemClock),
        )
    }

    /// Create a server from explicit dependencies
    ///
    /// Initialization order:
    /// 1. Repositories and MessagePusher (passed in)
    /// 2. UseCases
    /// 3. AppState
    pub fn with_dependencies(
        config: ServerConfig,
        rooms: Arc<dyn RoomRepository>,
        connections: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let runner = RoomCommandRunner::new(rooms.clone(), message_pusher.clone());

        let state = Arc::new(AppState {
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
                connections.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                connections.clone(),
                message_pusher,
                runner.clone(),
            )),
            command_router: Arc::new(CommandRouter::new(
                runner.clone(),
                connections.clone(),
                clock,
            )),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(rooms.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(rooms.clone())),
            get_server_status_usecase: Arc::new(GetServerStatusUseCase::new(rooms, connections)),
            shutdown: ShutdownCoordinator::new(),
        });

        Self {
            config,
            state,
            dispatcher: runner.dispatcher().clone(),
        }
    }

    /// Handle for triggering or observing shutdown
    pub fn shutdown_handle(&self) -> ShutdownCoordinator {
        self.state.shutdown.clone()
    }

    /// Build the HTTP and WebSocket routes
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind to the configured address and run until shutdown.
    ///
    /// SIGINT and SIGTERM start the drain sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address or
    /// if there's an error during server execution.
    pub async fn run(self) -> Result<(), ServerError> {
        let bind_addr = self.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: bind_addr.clone(),
                source,
            })?;

        tokio::spawn(listen_for_signals(self.shutdown_handle()));
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener).await
    }

    /// Serve on an already bound listener until the shutdown sequence finishes.
    ///
    /// OS signals are not installed here; drive shutdown through
    /// [`Server::shutdown_handle`].
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let local_addr: SocketAddr = listener.local_addr()?;
        tracing::info!("Room coordination server listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}/ws", local_addr);

        let app = self.router();
        let shutdown = self.shutdown_handle();

        let exit_timer = shutdown.spawn_exit_timer(self.config.effective_shutdown_timeout());
        let driver = {
            let shutdown = shutdown.clone();
            let dispatcher = self.dispatcher.clone();
            let grace = self.config.shutdown_grace;
            tokio::spawn(async move { shutdown.drive(dispatcher, grace).await })
        };

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.wait_for(ShutdownPhase::Stopped).await })
            .await;
        driver.abort();
        exit_timer.abort();

        result?;
        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
