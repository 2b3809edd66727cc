use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Materialized dashboard summary. There is a single row, rewritten by
/// whatever recomputes it; it is never derived from the other tables here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub id: i64,
    pub active_clients: i64,
    pub ongoing_cases: i64,
    pub ai_calls: i64,
    /// Percent change since the previous period.
    pub active_clients_change: f64,
    pub ongoing_cases_change: f64,
    pub ai_calls_change: f64,
    pub updated_at: DateTime<Utc>,
}

impl Stats {
    pub const ROW_ID: i64 = 1;

    pub fn empty(now: DateTime<Utc>) -> Self {
        Self::from_input(InsertStats::default(), now)
    }

    pub fn from_input(input: InsertStats, now: DateTime<Utc>) -> Self {
        Self {
            id: Self::ROW_ID,
            active_clients: input.active_clients,
            ongoing_cases: input.ongoing_cases,
            ai_calls: input.ai_calls,
            active_clients_change: input.active_clients_change,
            ongoing_cases_change: input.ongoing_cases_change,
            ai_calls_change: input.ai_calls_change,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsertStats {
    pub active_clients: i64,
    pub ongoing_cases: i64,
    pub ai_calls: i64,
    pub active_clients_change: f64,
    pub ongoing_cases_change: f64,
    pub ai_calls_change: f64,
}
