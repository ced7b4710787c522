//! Graceful shutdown coordination.
//!
//! The server moves through three phases:
//!
//! - `Running`: normal operation
//! - `Draining`: new WebSocket connections are refused, open ones have been
//!   told the server is going away
//! - `Stopped`: the listener is closed and open sockets are closed
//!
//! Phases only move forward. Every task that cares about shutdown holds a
//! clone of [`ShutdownCoordinator`] and waits on the phase it needs.

use std::{sync::Arc, time::Duration};

use tokio::{sync::watch, task::JoinHandle};

use crate::{domain::ServerEvent, usecase::EventDispatcher};

/// Message carried by the `server-shutdown` notice
pub const SHUTDOWN_NOTICE: &str = "Server is shutting down";

/// Close reason used for refused and closed sockets
pub const SHUTDOWN_CLOSE_REASON: &str = "server shutting down";

/// Shutdown phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ShutdownPhase {
    Running,
    Draining,
    Stopped,
}

/// Shared handle to the shutdown state
#[derive(Debug, Clone)]
pub struct ShutdownCoordinator {
    phase: Arc<watch::Sender<ShutdownPhase>>,
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (phase, _) = watch::channel(ShutdownPhase::Running);
        Self {
            phase: Arc::new(phase),
        }
    }

    /// Current phase
    pub fn phase(&self) -> ShutdownPhase {
        *self.phase.borrow()
    }

    /// Whether new connections must be refused
    pub fn is_draining(&self) -> bool {
        self.phase() >= ShutdownPhase::Draining
    }

    /// Start draining.
    ///
    /// Returns `false` when a drain is already in progress (or finished), in
    /// which case nothing changes.
    pub fn begin_drain(&self) -> bool {
        self.phase.send_if_modified(|phase| {
            if *phase == ShutdownPhase::Running {
                *phase = ShutdownPhase::Draining;
                true
            } else {
                false
            }
        })
    }

    /// Move to the final phase
    pub fn mark_stopped(&self) {
        self.phase.send_replace(ShutdownPhase::Stopped);
    }

    /// Resolve once the phase has reached `target`
    pub async fn wait_for(&self, target: ShutdownPhase) {
        let mut rx = self.phase.subscribe();
        // The sender lives in `self`, so the channel cannot close while waiting.
        let _ = rx.wait_for(|phase| *phase >= target).await;
    }

    /// Arm the forced exit timer.
    ///
    /// Once draining starts, the process exits with code 1 unless the
    /// returned handle is aborted within `timeout`. The server aborts it as
    /// soon as it has finished serving.
    pub fn spawn_exit_timer(&self, timeout: Duration) -> JoinHandle<()> {
        let coordinator = self.clone();
        tokio::spawn(async move {
            coordinator.wait_for(ShutdownPhase::Draining).await;
            tokio::time::sleep(timeout).await;
            tracing::error!("Shutdown did not finish within {:?}, unclean shutdown", timeout);
            std::process::exit(1);
        })
    }

    /// Run the drain sequence once the phase leaves `Running`.
    ///
    /// 1. Send `server-shutdown` to every open connection
    /// 2. Wait for the grace period, then move to `Stopped`
    pub async fn drive(&self, dispatcher: EventDispatcher, grace: Duration) {
        self.wait_for(ShutdownPhase::Draining).await;
        tracing::info!(
            "Shutdown started: refusing new connections, closing in {:?}",
            grace
        );

        let notified = dispatcher
            .announce(&ServerEvent::ServerShutdown {
                message: SHUTDOWN_NOTICE.to_string(),
            })
            .await;
        tracing::info!("Sent shutdown notice to {} connection(s)", notified);

        tokio::time::sleep(grace).await;
        self.mark_stopped();
        tracing::info!("Grace period over, closing listener and open sockets");
    }
}

/// Resolve on SIGINT (Ctrl+C) or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}

/// Turn OS signals into drain requests for as long as the process runs.
///
/// Signals after the first one are logged and ignored.
pub async fn listen_for_signals(coordinator: ShutdownCoordinator) {
    loop {
        shutdown_signal().await;
        if !coordinator.begin_drain() {
            tracing::info!("Shutdown already in progress, ignoring signal");
        }
    }
}
