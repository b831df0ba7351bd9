use chrono::{DateTime, Utc};
use cue_db::models::UserStats;
use cue_srs::{Level, level_for_xp};
use serde::Serialize;

/// Gamification counters shown on the dashboard
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub xp: i32,
    pub streak: i32,
    pub last_study_date: Option<DateTime<Utc>>,
    pub level: Level,
}

impl From<UserStats> for StatsResponse {
    fn from(stats: UserStats) -> Self {
        Self {
            level: level_for_xp(stats.xp),
            xp: stats.xp,
            streak: stats.streak,
            last_study_date: stats.last_study_date,
        }
    }
}
