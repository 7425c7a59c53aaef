//! HTTP surface: HTML fragments for the contact pages, the save endpoint, and
//! a server-sent events channel carrying `Update` notifications.

mod error;
mod handlers;
mod types;
mod views;

pub use error::{error_fragment, ApiError};
pub use types::HealthResponse;
pub use views::Views;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::notify::BroadcastHub;
use crate::service::ContactService;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ContactService>,
    pub hub: BroadcastHub,
    pub views: Arc<Views>,
    /// Cancelled on shutdown so open event streams end
    pub shutdown: CancellationToken,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(service: Arc<ContactService>, hub: BroadcastHub, views: Views) -> Self {
        Self {
            service,
            hub,
            views: Arc::new(views),
            shutdown: CancellationToken::new(),
            started_at: Instant::now(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/Contacts/Index", get(handlers::index))
        .route("/Contacts/GetContacts", get(handlers::get_contacts))
        .route("/Contacts/NewContact", get(handlers::new_contact))
        .route("/Contacts/EditContact", get(handlers::edit_contact))
        .route("/Contacts/SaveContact", post(handlers::save_contact))
        .route("/Contacts/DeleteContact", get(handlers::delete_contact))
        .route("/Contacts/Events", get(handlers::events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C, then end event streams and drain open requests.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(address = %listener.local_addr()?, "Contact manager listening");

    let shutdown = state.shutdown.clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(token: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => {
                error!(error = %e, "Could not listen for shutdown signal");
                token.cancelled().await;
            }
        },
        _ = token.cancelled() => {}
    }
    token.cancel();
}
