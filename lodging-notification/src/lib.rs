pub mod config;
pub mod events;
pub mod models;
pub mod routes;
pub mod schema;
pub mod seed;
pub mod services;
pub mod socket;
pub mod store;

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::services::{NotificationService, SettingsService};
use crate::socket::LiveRegistry;

pub struct AppState {
    pub config: config::AppConfig,
    pub settings: SettingsService,
    pub notifications: NotificationService,
    pub live: Arc<LiveRegistry>,
    pub metrics_handle: Option<PrometheusHandle>,
}
