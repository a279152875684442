//! Deduplicated store of scraped hourly forecast rows.

use parking_lot::Mutex;
use rusqlite::{Connection, params};

use crate::error::Result;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS forecast_rows (
    inserted_at_utc   TEXT NOT NULL,
    idx               INTEGER NOT NULL,
    station           TEXT NOT NULL,
    observation_time  TEXT NOT NULL,
    air_temp          REAL,
    relative_humidity REAL,
    dew_point         REAL,
    wind_speed        REAL,
    PRIMARY KEY (idx, station, observation_time)
) WITHOUT ROWID;
"#;

/// One row of a scraped hourly forecast horizon.
#[derive(Debug, Clone)]
pub struct ForecastRow {
    pub inserted_at_utc: String,
    pub idx: i64,
    pub station: String,
    pub observation_time: String,
    pub air_temp: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub dew_point: Option<f64>,
    pub wind_speed: Option<f64>,
}

/// Store for `forecast_rows`, opened at `FORECAST_DB_PATH`.
pub struct ForecastStore {
    conn: Mutex<Connection>,
}

impl ForecastStore {
    pub fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Persist one station's scraped horizon in a single transaction.
    pub fn insert_horizon(&self, rows: &[ForecastRow]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let conn = self.conn.lock();
        conn.execute("BEGIN IMMEDIATE", [])?;

        let mut inserted = 0usize;
        for row in rows {
            let changed = conn.execute(
                "INSERT OR IGNORE INTO forecast_rows
                    (inserted_at_utc, idx, station, observation_time, air_temp, relative_humidity, dew_point, wind_speed)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    row.inserted_at_utc,
                    row.idx,
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
        conn.query_row("SELECT COUNT(*) FROM forecast_rows", [], |r| r.get(0))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(idx: i64, station: &str, obs_time: &str) -> ForecastRow {
        ForecastRow {
            inserted_at_utc: "2026-01-01T00:00:00.000000Z".to_string(),
            idx,
            station: station.to_string(),
            observation_time: obs_time.to_string(),
            air_temp: Some(32.0),
            relative_humidity: Some(50.0),
            dew_point: Some(20.0),
            wind_speed: Some(8.0),
        }
    }

    #[test]
    fn test_insert_horizon_dedups_by_idx_station_time() {
        let store = ForecastStore::open(":memory:").unwrap();
        let rows = vec![
            row(0, "NYC", "2026-01-01T00:00:00-05:00"),
            row(1, "NYC", "2026-01-01T01:00:00-05:00"),
        ];
        assert_eq!(store.insert_horizon(&rows).unwrap(), 2);
        // Re-scraping the same horizon again is a no-op.
        assert_eq!(store.insert_horizon(&rows).unwrap(), 0);
        assert_eq!(store.count(), 2);
    }
}
