use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::db::{Database, SqliteContactRepository};
use crate::mail::{DisabledMailer, Mailer, SmtpMailer};
use crate::notify::BroadcastHub;
use crate::service::ContactService;
use crate::web::{self, AppState, Views};

/// Wire the store, hub, and mailer together and run the web server.
pub async fn run_serve(config: &Config) -> Result<()> {
    let path = config.resolve_database_path()?;
    let db = Database::open_at(path.clone())
        .with_context(|| format!("Could not open database at {}", path.display()))?;
    info!(path = %path.display(), "Opened contact database");

    let mailer: Arc<dyn Mailer> = if config.mail.enabled {
        let mailer = SmtpMailer::from_config(&config.mail)?;
        info!(
            host = %config.mail.smtp_host,
            port = config.mail.smtp_port,
            tls = ?config.mail.tls,
            dispatch = ?config.mail.dispatch,
            "Contact alerts will be mailed"
        );
        Arc::new(mailer)
    } else {
        info!("Mail disabled; contact alerts will only be logged");
        Arc::new(DisabledMailer)
    };

    let hub = BroadcastHub::default();
    let service = ContactService::new(
        Arc::new(SqliteContactRepository::new(Arc::new(db))),
        Arc::new(hub.clone()),
        mailer,
        config.mail.dispatch,
    );
    let views = Views::new().context("Could not load page templates")?;

    let state = AppState::new(Arc::new(service), hub, views);
    web::serve(config.bind_address, state).await
}
