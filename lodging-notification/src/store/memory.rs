use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use uuid::Uuid;

use lodging_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{BellNotification, NewBellNotification, SubscriptionSetting, UserSettings};

use super::{NotificationStore, SettingsStore};

fn unavailable() -> AppError {
    AppError::new(ErrorCode::ServiceUnavailable, "store unavailable")
}

#[derive(Default)]
pub struct MemoryNotificationStore {
    rows: Mutex<Vec<BellNotification>>,
    inserts: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryNotificationStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful inserts since creation.
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    fn check(&self) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(unavailable())
        } else {
            Ok(())
        }
    }
}

impl NotificationStore for MemoryNotificationStore {
    fn insert(&self, notification: NewBellNotification) -> AppResult<BellNotification> {
        self.check()?;
        let stored = notification.into_stored();
        self.rows.lock().unwrap().push(stored.clone());
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(stored)
    }

    fn get_all_by_user(&self, user_id: Uuid) -> AppResult<Vec<BellNotification>> {
        self.check()?;
        let mut items: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            b.time_stamp
                .cmp(&a.time_stamp)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(items)
    }

    fn count_unseen(&self, user_id: Uuid) -> AppResult<i64> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|n| n.user_id == user_id && !n.seen).count() as i64)
    }

    fn mark_seen(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<BellNotification>> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        Ok(rows
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
            .map(|n| {
                n.seen = true;
                n.clone()
            }))
    }

    fn mark_all_seen(&self, user_id: Uuid) -> AppResult<usize> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let mut updated = 0;
        for n in rows.iter_mut().filter(|n| n.user_id == user_id && !n.seen) {
            n.seen = true;
            updated += 1;
        }
        Ok(updated)
    }
}

#[derive(Default)]
pub struct MemorySettingsStore {
    rows: Mutex<Vec<UserSettings>>,
    failing: AtomicBool,
}

impl MemorySettingsStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn check(&self) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(unavailable())
        } else {
            Ok(())
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get_by_user(&self, user_id: Uuid) -> AppResult<Option<UserSettings>> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|s| s.user_id == user_id).cloned())
    }

    fn insert(&self, user_id: Uuid, settings: &[SubscriptionSetting]) -> AppResult<UserSettings> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|s| s.user_id == user_id) {
            return Err(AppError::new(
                ErrorCode::SettingsAlreadyExist,
                format!("notification settings already exist for user {user_id}"),
            ));
        }
        let record = UserSettings {
            id: Uuid::now_v7(),
            user_id,
            settings: settings.to_vec(),
        };
        rows.push(record.clone());
        Ok(record)
    }

    fn replace(&self, id: Uuid, settings: &[SubscriptionSetting]) -> AppResult<()> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let record = rows
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::new(ErrorCode::SettingsNotFound, "notification settings not found"))?;
        record.settings = settings.to_vec();
        Ok(())
    }

    fn delete_by_user(&self, user_id: Uuid) -> AppResult<usize> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|s| s.user_id != user_id);
        Ok(before - rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationType;

    #[test]
    fn insert_then_fetch_returns_equal_record() {
        let store = MemoryNotificationStore::default();
        let user = Uuid::now_v7();
        let new = NewBellNotification::unseen(user, "hi", "accommodation/9", true);

        let stored = store.insert(new.clone()).unwrap();
        let fetched = store.get_all_by_user(user).unwrap();

        assert_eq!(fetched, vec![stored.clone()]);
        assert_eq!(new.into_stored(), stored);
    }

    #[test]
    fn equal_timestamps_list_later_id_first() {
        let store = MemoryNotificationStore::default();
        let user = Uuid::now_v7();
        let first = NewBellNotification::unseen(user, "first", "", false);
        let mut second = NewBellNotification::unseen(user, "second", "", false);
        second.time_stamp = first.time_stamp;
        assert!(second.id > first.id);

        store.insert(first).unwrap();
        store.insert(second).unwrap();

        let messages: Vec<_> = store
            .get_all_by_user(user)
            .unwrap()
            .into_iter()
            .map(|n| n.message)
            .collect();
        assert_eq!(messages, vec!["second", "first"]);
    }

    #[test]
    fn mark_all_seen_is_scoped_by_user() {
        let store = MemoryNotificationStore::default();
        let alice = Uuid::now_v7();
        let bob = Uuid::now_v7();
        store.insert(NewBellNotification::unseen(alice, "a", "", false)).unwrap();
        store.insert(NewBellNotification::unseen(alice, "a2", "", false)).unwrap();
        store.insert(NewBellNotification::unseen(bob, "b", "", false)).unwrap();

        assert_eq!(store.mark_all_seen(alice).unwrap(), 2);
        assert!(store.get_all_by_user(alice).unwrap().iter().all(|n| n.seen));
        assert!(store.get_all_by_user(bob).unwrap().iter().all(|n| !n.seen));
        assert_eq!(store.count_unseen(bob).unwrap(), 1);
    }

    #[test]
    fn mark_seen_requires_owner() {
        let store = MemoryNotificationStore::default();
        let owner = Uuid::now_v7();
        let stored = store.insert(NewBellNotification::unseen(owner, "x", "", false)).unwrap();

        assert!(store.mark_seen(stored.id, Uuid::now_v7()).unwrap().is_none());
        assert!(store.mark_seen(stored.id, owner).unwrap().unwrap().seen);
    }

    #[test]
    fn settings_insert_is_unique_per_user() {
        let store = MemorySettingsStore::default();
        let user = Uuid::now_v7();
        let list = [SubscriptionSetting::new(NotificationType::ReviewReservation, true)];

        store.insert(user, &list).unwrap();
        let err = store.insert(user, &list).unwrap_err();

        assert_eq!(err.code(), ErrorCode::SettingsAlreadyExist);
        assert_eq!(store.len(), 1);
    }
}
