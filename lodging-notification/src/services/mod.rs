pub mod notification_service;
pub mod settings_service;

pub use notification_service::{DispatchOutcome, NotificationService};
pub use settings_service::SettingsService;
