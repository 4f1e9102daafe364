//! Shutdown signal sources

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{info, warn};

/// Source of process shutdown requests
#[async_trait]
pub trait SignalSource: Send + Sync {
    /// Resolve with the name of the next shutdown signal received
    async fn wait_for_shutdown(&self) -> String;
}

/// SIGINT (Ctrl+C) and, on unix, SIGTERM
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSignalSource;

#[async_trait]
impl SignalSource for OsSignalSource {
    async fn wait_for_shutdown(&self) -> String {
        let ctrl_c = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C signal, shutting down gracefully"),
                Err(e) => {
                    warn!("Failed to install Ctrl+C handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                    info!("Received terminate signal, shutting down gracefully");
                }
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => "SIGINT".to_string(),
            _ = terminate => "SIGTERM".to_string(),
        }
    }
}

/// Signal source driven by a [`SignalTrigger`], for tests and embedding
#[derive(Debug, Clone)]
///
/// Clones share one receiver, so each sent signal is delivered once.
pub struct ChannelSignalSource {
    receiver: Arc<Mutex<watch::Receiver<Option<String>>>>,
}

/// Sends a shutdown request to its [`ChannelSignalSource`]
#[derive(Debug, Clone)]
pub struct SignalTrigger {
    sender: Arc<watch::Sender<Option<String>>>,
}

impl ChannelSignalSource {
    pub fn new() -> (Self, SignalTrigger) {
        let (sender, receiver) = watch::channel(None);
        (
            Self {
                receiver: Arc::new(Mutex::new(receiver)),
            },
            SignalTrigger {
                sender: Arc::new(sender),
            },
        )
    }
}

impl SignalTrigger {
    pub fn send(&self, signal: &str) {
        self.sender.send_replace(Some(signal.to_string()));
    }
}

#[async_trait]
impl SignalSource for ChannelSignalSource {
    async fn wait_for_shutdown(&self) -> String {
        let mut receiver = self.receiver.lock().await;
        if receiver.changed().await.is_err() {
            // Trigger dropped
            return std::future::pending().await;
        }
        let signal = receiver.borrow_and_update().clone();
        signal.unwrap_or_default()
    }
}
