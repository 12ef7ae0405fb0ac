//! OrgDesk API Server
//!
//! Main entry point for the OrgDesk onboarding service.

mod notifier;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orgdesk_api::{AppState, create_router};
use orgdesk_core::OnboardingService;
use orgdesk_db::{connect, stores};
use orgdesk_shared::{AppConfig, EmailService, JwtConfig, JwtService};

use crate::notifier::EmailNotifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orgdesk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_minutes: i64::try_from(config.jwt.access_token_expiry_secs / 60)
            .context("jwt.access_token_expiry_secs is out of range")?,
    };
    let jwt_service = JwtService::new(jwt_config);

    let email_service = EmailService::new(config.email.clone());
    info!(
        enabled = email_service.is_enabled(),
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        "Email service configured"
    );

    let catalog_ttl = Duration::from_secs(config.pricing.catalog_ttl_secs);
    let service = OnboardingService::new(
        stores(&db),
        catalog_ttl,
        Arc::new(EmailNotifier::new(email_service)),
    );
    info!(catalog_ttl_secs = config.pricing.catalog_ttl_secs, "Onboarding service ready");

    let state = AppState {
        service,
        jwt_service: Arc::new(jwt_service),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
