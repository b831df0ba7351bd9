//! In-memory [`ReviewStore`] for unit tests.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use anyhow::{anyhow, bail};
use chrono::{DateTime, Utc};
use cue_db::models::UserStats;
use cue_srs::{Schedule, SchedulingState};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::review::{ReviewStore, advance_progress};

#[derive(Default)]
struct Tables {
    cards: HashMap<Uuid, SchedulingState>,
    users: HashMap<Uuid, UserStats>,
    failing_saves: u32,
    save_attempts: u32,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    /// When set, every schedule write waits for a permit
    gate: Option<Semaphore>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose schedule writes block until [`release`](Self::release) is called.
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    pub fn release(&self, writes: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(writes);
        }
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn add_card(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.tables().cards.insert(id, SchedulingState::default());
        id
    }

    pub fn add_user(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.tables().users.insert(
            id,
            UserStats {
                xp: 0,
                streak: 0,
                last_study_date: None,
            },
        );
        id
    }

    pub fn fail_next_saves(&self, count: u32) {
        self.tables().failing_saves = count;
    }

    pub fn save_attempts(&self) -> u32 {
        self.tables().save_attempts
    }

    pub fn schedule_of(&self, card_id: Uuid) -> Option<SchedulingState> {
        self.tables().cards.get(&card_id).copied()
    }

    pub fn stats_of(&self, user_id: Uuid) -> Option<UserStats> {
        self.tables().users.get(&user_id).cloned()
    }
}

impl ReviewStore for MemoryStore {
    async fn load_schedule(&self, card_id: Uuid) -> anyhow::Result<SchedulingState> {
        self.schedule_of(card_id)
            .ok_or_else(|| anyhow!("card {card_id} not found"))
    }

    async fn save_schedule(&self, card_id: Uuid, schedule: Schedule) -> anyhow::Result<()> {
        if let Some(gate) = &self.gate {
            gate.acquire().await?.forget();
        }

        let mut tables = self.tables();
        tables.save_attempts += 1;
        if tables.failing_saves > 0 {
            tables.failing_saves -= 1;
            bail!("simulated write failure");
        }
        match tables.cards.get_mut(&card_id) {
            Some(state) => {
                *state = schedule.state();
                Ok(())
            }
            None => bail!("card {card_id} not found"),
        }
    }

    async fn record_progress(
        &self,
        user_id: Uuid,
        reviewed_at: DateTime<Utc>,
    ) -> anyhow::Result<UserStats> {
        let mut tables = self.tables();
        let stats = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| anyhow!("user {user_id} not found"))?;
        *stats = advance_progress(stats, reviewed_at);
        Ok(stats.clone())
    }
}
