//! Periodic weather sensor poll (§4.3): one HTTP GET per iteration against a
//! synoptic-style timeseries endpoint, persisted and re-broadcast per station.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use tokio::time::Instant;
use tracing::warn;

use crate::bus::{Bus, BusMessage};
use crate::error::{Error, Result};
use crate::persistence::{SensorObservationRow, SensorStore};

const POLL_INTERVAL: Duration = Duration::from_secs(1);
const RECENT_MINUTES: u32 = 10;

#[derive(Debug, Deserialize)]
struct SynopticResponse {
    #[serde(rename = "STATION", default)]
    station: Vec<StationEntry>,
}

#[derive(Debug, Deserialize)]
struct StationEntry {
    #[serde(rename = "STID")]
    stid: String,
    #[serde(rename = "OBSERVATIONS")]
    observations: Observations,
}

#[derive(Debug, Deserialize)]
struct Observations {
    date_time: Vec<String>,
    #[serde(rename = "air_temp_set_1", default)]
    air_temp: Vec<Option<f64>>,
    #[serde(rename = "relative_humidity_set_1", default)]
    relative_humidity: Vec<Option<f64>>,
    #[serde(rename = "dew_point_temperature_set_1d", default)]
    dew_point: Vec<Option<f64>>,
    #[serde(rename = "wind_speed_set_1", default)]
    wind_speed: Vec<Option<f64>>,
}

/// Run the sensor poll loop until `shutdown` fires.
///
/// Each iteration's target period is 1 s; a slow or failed request is not
/// retried within the iteration, and the next tick is scheduled from the
/// previous target rather than `now`, so repeated slippage does not drift
/// the loop's long-run cadence.
pub async fn run_sensor_poll(
    http: reqwest::Client,
    stations: Vec<String>,
    token: String,
    store: Arc<SensorStore>,
    bus: Bus,
    mut shutdown: tokio::sync::watch::Receiver<bool>,
) -> Result<()> {
    let station_list = stations.join(",");
    let mut next_tick = Instant::now();

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            () = tokio::time::sleep_until(next_tick) => {}
        }
        if *shutdown.borrow() {
            break;
        }
        next_tick += POLL_INTERVAL;

        if let Err(e) = poll_once(&http, &station_list, &token, &store, &bus).await {
            warn!("sensor poll iteration failed: {e}");
        }
    }

    Ok(())
}

async fn poll_once(
    http: &reqwest::Client,
    station_list: &str,
    token: &str,
    store: &SensorStore,
    bus: &Bus,
) -> Result<()> {
    let url = "https://api.synopticdata.com/v2/stations/timeseries";
    let response = http
        .get(url)
        .query(&[
            ("stid", station_list),
            ("units", "temp|F"),
            ("recent", &RECENT_MINUTES.to_string()),
            ("token", token.to_string().as_str()),
            ("complete", "0"),
            ("obtimezone", "local"),
        ])
        .send()
        .await
        .map_err(Error::Http)?;

    let body: SynopticResponse = response.json().await.map_err(Error::Http)?;
    let inserted_at_utc = Utc::now().to_rfc3339();

    for entry in &body.station {
        let mut rows = Vec::with_capacity(entry.observations.date_time.len());
        let mut payload = Vec::new();

        for (i, observation_time) in entry.observations.date_time.iter().enumerate() {
            let air_temp = entry.observations.air_temp.get(i).copied().flatten();
            rows.push(SensorObservationRow {
                inserted_at_utc: inserted_at_utc.clone(),
                station: entry.stid.clone(),
                observation_time: observation_time.clone(),
                air_temp,
                relative_humidity: entry.observations.relative_humidity.get(i).copied().flatten(),
                dew_point: entry.observations.dew_point.get(i).copied().flatten(),
                wind_speed: entry.observations.wind_speed.get(i).copied().flatten(),
            });
            if let Some(temp) = air_temp {
                payload.push((observation_time.clone(), temp));
            }
        }

        store.insert_batch(&rows)?;
        bus.publish(BusMessage::SensorPoll {
            site: entry.stid.clone(),
            payload,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_synoptic_response_shape() {
        let json = r#"{
            "STATION": [{
                "STID": "KNYC",
                "OBSERVATIONS": {
                    "date_time": ["2026-01-01T00:00:00-05:00", "2026-01-01T00:01:00-05:00"],
                    "air_temp_set_1": [40.5, null],
                    "relative_humidity_set_1": [60.0, 61.0],
                    "dew_point_temperature_set_1d": [30.0, 31.0],
                    "wind_speed_set_1": [5.0, 6.0]
                }
            }]
        }"#;
        let parsed: SynopticResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.station.len(), 1);
        assert_eq!(parsed.station[0].stid, "KNYC");
        assert_eq!(parsed.station[0].observations.date_time.len(), 2);
        assert_eq!(parsed.station[0].observations.air_temp[0], Some(40.5));
        assert_eq!(parsed.station[0].observations.air_temp[1], None);
    }

    #[tokio::test]
    async fn test_poll_once_dedups_and_skips_missing_temp_in_payload() {
        let store = SensorStore::open(":memory:").unwrap();
        let bus = Bus::new();
        let mut rx = bus.subscribe();

        // Simulate the parse-and-persist half directly, since poll_once needs
        // a live HTTP endpoint; the parsing and row-building logic is what's
        // under test here.
        let body: SynopticResponse = serde_json::from_str(
            r#"{"STATION": [{"STID": "KNYC", "OBSERVATIONS": {
                "date_time": ["t0", "t1"],
                "air_temp_set_1": [40.0, null],
                "relative_humidity_set_1": [60.0, 61.0],
                "dew_point_temperature_set_1d": [30.0, 31.0],
                "wind_speed_set_1": [5.0, 6.0]
            }}]}"#,
        )
        .unwrap();

        for entry in &body.station {
            let mut rows = Vec::new();
            let mut payload = Vec::new();
            for (i, observation_time) in entry.observations.date_time.iter().enumerate() {
                let air_temp = entry.observations.air_temp.get(i).copied().flatten();
                rows.push(SensorObservationRow {
                    inserted_at_utc: "2026-01-01T00:00:00Z".to_string(),
                    station: entry.stid.clone(),
                    observation_time: observation_time.clone(),
                    air_temp,
                    relative_humidity: entry.observations.relative_humidity.get(i).copied().flatten(),
                    dew_point: entry.observations.dew_point.get(i).copied().flatten(),
                    wind_speed: entry.observations.wind_speed.get(i).copied().flatten(),
                });
                if let Some(temp) = air_temp {
                    payload.push((observation_time.clone(), temp));
                }
            }
            store.insert_batch(&rows).unwrap();
            bus.publish(BusMessage::SensorPoll {
                site: entry.stid.clone(),
                payload,
            });
        }

        assert_eq!(store.count(), 2);
        match rx.recv().await.unwrap() {
            BusMessage::SensorPoll { site, payload } => {
                assert_eq!(site, "KNYC");
                assert_eq!(payload.len(), 1);
                assert_eq!(payload[0].0, "t0");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
