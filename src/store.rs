//! Per-user session state: current mode and the live booking, plus the
//! per-user lock that serializes the message path against reminder
//! callbacks.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::models::{Booking, Mode, Session};

type Sessions = Arc<RwLock<HashMap<String, Session>>>;
type UserLocks = Arc<RwLock<HashMap<String, Arc<Mutex<()>>>>>;

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Sessions,
    locks: UserLocks,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn mode(&self, user_id: &str) -> Mode {
        self.sessions
            .read()
            .await
            .get(user_id)
            .map(|s| s.mode)
            .unwrap_or_default()
    }

    pub async fn set_mode(&self, user_id: &str, mode: Mode) {
        let mut sessions = self.sessions.write().await;
        sessions.entry(user_id.to_string()).or_default().mode = mode;
    }

    pub async fn booking(&self, user_id: &str) -> Option<Booking> {
        self.sessions
            .read()
            .await
            .get(user_id)
            .and_then(|s| s.booking.clone())
    }

    /// Overwriting with `None` ends the booking lifecycle for the session.
    pub async fn set_booking(&self, user_id: &str, booking: Option<Booking>) {
        let mut sessions = self.sessions.write().await;
        sessions.entry(user_id.to_string()).or_default().booking = booking;
    }

    /// Count of confirmed bookings across all sessions.
    pub async fn active_bookings(&self) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|s| s.booking.as_ref().is_some_and(|b| b.confirmed))
            .count()
    }

    /// Mutual-exclusion handle for one user. Everything that reads and then
    /// writes that user's booking must hold this across the read-write span.
    pub async fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        {
            let locks = self.locks.read().await;
            if let Some(lock) = locks.get(user_id) {
                return lock.clone();
            }
        }
        let mut locks = self.locks.write().await;
        locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn mode_defaults_to_ai() {
        let store = SessionStore::new();
        assert_eq!(store.mode("nobody").await, Mode::Ai);
    }

    #[tokio::test]
    async fn booking_roundtrip_and_clear() {
        let store = SessionStore::new();
        store
            .set_booking("u1", Some(Booking::new(Utc::now())))
            .await;
        assert!(store.booking("u1").await.is_some());

        store.set_booking("u1", None).await;
        assert!(store.booking("u1").await.is_none());
    }

    #[tokio::test]
    async fn active_bookings_counts_only_confirmed() {
        let store = SessionStore::new();
        let mut confirmed = Booking::new(Utc::now());
        confirmed.confirmed = true;
        store.set_booking("u1", Some(confirmed)).await;
        store.set_booking("u2", Some(Booking::new(Utc::now()))).await;

        assert_eq!(store.active_bookings().await, 1);
    }

    #[tokio::test]
    async fn user_lock_is_stable_per_user() {
        let store = SessionStore::new();
        let a = store.user_lock("u1").await;
        let b = store.user_lock("u1").await;
        assert!(Arc::ptr_eq(&a, &b));
    }
}
