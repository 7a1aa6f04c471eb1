//! One-shot deferred re-match tasks for advance bookings. One outstanding
//! task per user; arming again replaces the previous one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::flow::ParkingBot;
use crate::models::Booking;

struct ReminderEntry {
    id: u64,
    handle: JoinHandle<()>,
}

#[derive(Clone, Default)]
pub struct ReminderScheduler {
    entries: Arc<Mutex<HashMap<String, ReminderEntry>>>,
    next_id: Arc<AtomicU64>,
}

impl ReminderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the reminder at `scheduled_time - lead`. Returns `false` when
    /// the booking carries no schedule or the reminder instant is already in
    /// the past. The fired task re-reads the live booking; it never re-arms
    /// itself.
    pub async fn arm(&self, user_id: &str, snapshot: Booking, bot: ParkingBot) -> bool {
        let Some(scheduled) = snapshot.scheduled_time else {
            return false;
        };
        let fire_at = scheduled - bot.config().reminder_lead;
        let Ok(delay) = (fire_at - Utc::now()).to_std() else {
            return false;
        };

        log::info!(
            "Scheduling reminder for {user_id} at {} (in {} minutes)",
            fire_at.format("%d/%m/%Y %H:%M"),
            delay.as_secs() / 60
        );

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        // Holding the map lock until the new entry is inserted keeps a
        // zero-delay task from removing its entry before it exists.
        let mut entries = self.entries.lock().await;
        let handle = tokio::spawn({
            let entries = self.entries.clone();
            let user = user_id.to_string();
            async move {
                tokio::time::sleep(delay).await;
                bot.fire_reminder(&user, &snapshot).await;
                let mut map = entries.lock().await;
                if map.get(&user).is_some_and(|e| e.id == id) {
                    map.remove(&user);
                }
            }
        });
        if let Some(previous) = entries.insert(user_id.to_string(), ReminderEntry { id, handle }) {
            previous.handle.abort();
        }
        true
    }

    pub async fn cancel(&self, user_id: &str) -> bool {
        match self.entries.lock().await.remove(user_id) {
            Some(entry) => {
                entry.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Number of armed, not-yet-fired reminders.
    pub async fn outstanding(&self) -> usize {
        self.entries.lock().await.len()
    }
}
