use std::sync::Arc;

use lodging_shared::clients::{db, rabbitmq::RabbitMQClient};

use lodging_notification::config::AppConfig;
use lodging_notification::events::subscriber;
use lodging_notification::services::{NotificationService, SettingsService};
use lodging_notification::socket::LiveRegistry;
use lodging_notification::store::{PgNotificationStore, PgSettingsStore};
use lodging_notification::{routes, seed, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lodging_shared::middleware::init_tracing("lodging-notification");

    let config = AppConfig::load()?;
    let port = config.port;

    let metrics_handle = lodging_shared::middleware::init_metrics()?;

    let pool = db::create_pool(&config.database_url, config.db_pool_size)?;
    let settings_store = Arc::new(PgSettingsStore::new(pool.clone()));
    let notification_store = Arc::new(PgNotificationStore::new(pool));

    if config.seed_dev_data {
        seed::seed_dev_settings(settings_store.as_ref())?;
    }

    let live = Arc::new(LiveRegistry::new());
    let settings = SettingsService::new(settings_store);
    let notifications = NotificationService::new(notification_store, settings.clone(), live.clone());

    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url, &config.exchange).await?;

    let state = Arc::new(AppState {
        config,
        settings,
        notifications,
        live,
        metrics_handle: Some(metrics_handle),
    });

    let sub_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = subscriber::listen_platform_events(sub_state, rabbitmq).await {
            tracing::error!(error = %e, "platform event subscriber failed");
        }
    });

    let app = routes::router(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "lodging-notification starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
