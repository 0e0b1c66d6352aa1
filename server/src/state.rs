use attendance::Position;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use util::config;

/// Validation policy for attendance submissions.
#[derive(Debug, Clone)]
pub struct Settings {
    pub default_bus_no: String,
    pub geofence_radius_meters: f64,
    pub token_max_age_seconds: i64,
}

impl Settings {
    pub fn from_config() -> Self {
        Self {
            default_bus_no: config::bus_no(),
            geofence_radius_meters: config::geofence_radius_meters(),
            token_max_age_seconds: config::token_max_age_seconds(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_bus_no: "Bus-10".into(),
            geofence_radius_meters: 15.0,
            token_max_age_seconds: 60,
        }
    }
}

/// Latest reported fix of a bus.
#[derive(Debug, Clone, Copy)]
pub struct BusFix {
    pub position: Position,
    pub reported_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AttendanceRecord {
    pub bus_no: String,
    pub device_id: String,
    pub qr_data: String,
    pub position: Position,
    pub distance_meters: f64,
    pub marked_at: DateTime<Utc>,
}

/// Shared server state. Everything lives in memory; a restart forgets all buses.
#[derive(Clone, Default)]
pub struct ServerState {
    pub settings: Arc<Settings>,
    buses: Arc<RwLock<HashMap<String, BusFix>>>,
    records: Arc<RwLock<Vec<AttendanceRecord>>>,
}

impl ServerState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
            ..Self::default()
        }
    }

    pub async fn update_bus(&self, bus_no: &str, position: Position) {
        let fix = BusFix {
            position,
            reported_at: Utc::now(),
        };
        self.buses.write().await.insert(bus_no.to_owned(), fix);
    }

    pub async fn bus(&self, bus_no: &str) -> Option<BusFix> {
        self.buses.read().await.get(bus_no).copied()
    }

    /// Stores `record` unless the same device already marked this bus with the
    /// same token. Records from earlier days are dropped first, so only the
    /// current day is ever held.
    pub async fn try_record(&self, record: AttendanceRecord) -> bool {
        let today = record.marked_at.date_naive();
        let mut records = self.records.write().await;
        records.retain(|r| r.marked_at.date_naive() == today);

        let repeat = records.iter().any(|r| {
            r.bus_no == record.bus_no && r.device_id == record.device_id && r.qr_data == record.qr_data
        });
        if repeat {
            return false;
        }
        records.push(record);
        true
    }

    /// Records marked on `day`, most recent first, capped at `limit`.
    pub async fn manifest(&self, bus_no: &str, day: NaiveDate, limit: usize) -> Vec<AttendanceRecord> {
        self.records
            .read()
            .await
            .iter()
            .rev()
            .filter(|r| r.bus_no == bus_no && r.marked_at.date_naive() == day)
            .take(limit)
            .cloned()
            .collect()
    }
}
