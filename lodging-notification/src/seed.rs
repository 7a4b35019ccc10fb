use uuid::Uuid;

use lodging_shared::errors::AppResult;

use crate::models::{NotificationType, SubscriptionSetting};
use crate::store::SettingsStore;

/// Sample host used by local frontends.
pub const DEV_USER_ID: Uuid = Uuid::from_u128(0x57325353_5469_4930_8ec9_35c003e1b967);

fn dev_settings() -> Vec<(Uuid, Vec<SubscriptionSetting>)> {
    use NotificationType::*;

    vec![(
        DEV_USER_ID,
        vec![
            SubscriptionSetting::new(CancelReservation, true),
            SubscriptionSetting::new(NewReservationRequest, true),
            SubscriptionSetting::new(NewHostReview, false),
            SubscriptionSetting::new(NewAccommodationReview, true),
        ],
    )]
}

/// Insert the sample settings records that are not there yet and return how
/// many were added. Only called when `seed_dev_data` is enabled.
pub fn seed_dev_settings(store: &dyn SettingsStore) -> AppResult<usize> {
    let mut inserted = 0;

    for (user_id, settings) in dev_settings() {
        if store.get_by_user(user_id)?.is_some() {
            continue;
        }
        store.insert(user_id, &settings)?;
        inserted += 1;
    }

    tracing::info!(inserted, "dev notification settings seeded");
    Ok(inserted)
}
