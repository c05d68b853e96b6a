use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recipe_accounts::config::{init_db, Config};
use recipe_accounts::modules::account::{AccountStore, InMemoryAccountStore, MySqlAccountStore};
use recipe_accounts::services::clock::SystemClock;
use recipe_accounts::services::jwt::JwtService;
use recipe_accounts::services::notifier::{LogNotifier, Notifier, RelayMailer};
use recipe_accounts::{create_app, AppState, Dependencies};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipe_accounts=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn AccountStore> = match &config.database_url {
        Some(url) => {
            let db = init_db(url).await?;
            tracing::info!("Connected to MySQL");
            Arc::new(MySqlAccountStore::new(db))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, accounts are kept in memory and lost on restart");
            Arc::new(InMemoryAccountStore::new())
        }
    };

    let notifier: Arc<dyn Notifier> = match &config.mail_relay {
        Some(relay) => {
            tracing::info!(url = %relay.url, "Sending email through relay");
            Arc::new(RelayMailer::new(
                relay.url.clone(),
                relay.secret.clone(),
                relay.from_address.clone(),
            )?)
        }
        None => {
            tracing::warn!("MAIL_RELAY_URL not set, emails are only logged");
            Arc::new(LogNotifier)
        }
    };

    let state = AppState::new(Dependencies {
        store,
        notifier,
        clock: Arc::new(SystemClock),
        jwt_service: JwtService::new(&config.jwt_secret),
        otp_requests_per_hour: config.otp_requests_per_hour,
    })?;

    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
