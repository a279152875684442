//! Deduplicated store of weather sensor observations.

use parking_lot::Mutex;
use rusqlite::{Connection, params};

use crate::error::Result;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS sensor_observations (
    inserted_at_utc       TEXT NOT NULL,
    station               TEXT NOT NULL,
    observation_time      TEXT NOT NULL,
    air_temp              REAL,
    relative_humidity     REAL,
    dew_point             REAL,
    wind_speed            REAL,
    PRIMARY KEY (station, observation_time)
) WITHOUT ROWID;
"#;

/// One deduplicated sensor reading.
#[derive(Debug, Clone)]
pub struct SensorObservationRow {
    pub inserted_at_utc: String,
    pub station: String,
    pub observation_time: String,
    pub air_temp: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub dew_point: Option<f64>,
    pub wind_speed: Option<f64>,
}

/// Store for `sensor_observations`, opened at `WEATHER_DB_PATH`.
pub struct SensorStore {
    conn: Mutex<Connection>,
}

impl SensorStore {
    pub fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Bulk-insert observations from one poll iteration in a single
    /// transaction, skipping rows already seen for `(station, observation_time)`.
    pub fn insert_batch(&self, rows: &[SensorObservationRow]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let conn = self.conn.lock();
        conn.execute("BEGIN IMMEDIATE", [])?;

        let mut inserted = 0usize;
        for row in rows {
            let changed = conn.execute(
                "INSERT OR IGNORE INTO sensor_observations
                    (inserted_at_utc, station, observation_time, air_temp, relative_humidity, dew_point, wind_speed)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    row.inserted_at_utc,
                    row.station,
                    row.observation_time,
                    row.air_temp,
                    row.relative_humidity,
                    row.dew_point,
                    row.wind_speed,
                ],
            )?;
            inserted += changed;
        }

        conn.execute("COMMIT", [])?;
        Ok(inserted)
    }

    #[cfg(test)]
    pub fn count(&self) -> i64 {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM sensor_observations", [], |r| r.get(0))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(station: &str, obs_time: &str, temp: f64) -> SensorObservationRow {
        SensorObservationRow {
            inserted_at_utc: "2026-01-01T00:00:00.000000Z".to_string(),
            station: station.to_string(),
            observation_time: obs_time.to_string(),
            air_temp: Some(temp),
            relative_humidity: Some(40.0),
            dew_point: Some(20.0),
            wind_speed: Some(5.0),
        }
    }

    #[test]
    fn test_insert_batch_dedups_across_calls() {
        let store = SensorStore::open(":memory:").unwrap();
        let first = vec![
            row("KNYC", "2026-01-01T00:00:00-05:00", 40.0),
            row("KNYC", "2026-01-01T00:01:00-05:00", 41.0),
        ];
        let inserted = store.insert_batch(&first).unwrap();
        assert_eq!(inserted, 2);

        // Second poll overlaps one observation with the first.
        let second = vec![
            row("KNYC", "2026-01-01T00:01:00-05:00", 41.0),
            row("KNYC", "2026-01-01T00:02:00-05:00", 42.0),
        ];
        let inserted = store.insert_batch(&second).unwrap();
        assert_eq!(inserted, 1);
        assert_eq!(store.count(), 3);
    }

    #[test]
    fn test_insert_batch_empty_is_noop() {
        let store = SensorStore::open(":memory:").unwrap();
        assert_eq!(store.insert_batch(&[]).unwrap(), 0);
    }
}
