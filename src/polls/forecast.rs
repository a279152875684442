//! Periodic scraped-forecast poll (§4.4): fetches a digital hourly forecast
//! page per station and parses the 5th HTML table into a persisted horizon.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use scraper::{Html, Selector};
use tokio::time::Instant;
use tracing::warn;

use crate::bus::{Bus, BusMessage};
use crate::config::ForecastStation;
use crate::error::{Error, Result};
use crate::persistence::{ForecastRow, ForecastStore};

const POLL_INTERVAL: Duration = Duration::from_secs(5);
const FORECAST_TABLE_INDEX: usize = 4;

/// Run the forecast poll loop until `shutdown` fires.
///
/// A single station's scrape failure only empties that station's result for
/// the current iteration; it never aborts the other stations or the loop.
pub async fn run_forecast_poll(
    http: reqwest::Client,
    stations: Vec<ForecastStation>,
    store: Arc<ForecastStore>,
    bus: Bus,
    mut shutdown: tokio::sync::watch::Receiver<bool>,
) -> Result<()> {
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

        for station in &stations {
            match fetch_and_parse(&http, station).await {
                Ok(rows) => {
                    store.insert_horizon(&rows)?;
                    let payload = rows
                        .iter()
                        .filter_map(|r| r.air_temp.map(|t| (r.observation_time.clone(), t)))
                        .collect();
                    bus.publish(BusMessage::ForecastPoll {
                        site: station.name.clone(),
                        payload,
                    });
                }
                Err(e) => {
                    warn!("forecast scrape failed for {}: {e}", station.name);
                    bus.publish(BusMessage::ForecastPoll {
                        site: station.name.clone(),
                        payload: Vec::new(),
                    });
                }
            }
        }
    }

    Ok(())
}

async fn fetch_and_parse(http: &reqwest::Client, station: &ForecastStation) -> Result<Vec<ForecastRow>> {
    let url = format!(
        "https://forecast.weather.gov/MapClick.php?lat={}&lon={}&FcstType=digital",
        station.lat, station.lon
    );
    let body = http
        .get(&url)
        .send()
        .await
        .map_err(Error::Http)?
        .text()
        .await
        .map_err(Error::Http)?;

    parse_digital_forecast(&body, &station.name)
}

/// Parse the 5th `<table>` in a forecast.weather.gov digital-forecast page
/// into one row per hourly column.
///
/// Row layout: the first cell of each row is a label (`Date`, `Hour (EST)`,
/// `Temperature (°F)`, ...); the remaining cells are per-hour values aligned
/// by column. `Date` cells are sparse (printed only at day boundaries) and
/// are forward-filled across columns before being combined with `Hour`.
fn parse_digital_forecast(html: &str, station: &str) -> Result<Vec<ForecastRow>> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table")
        .map_err(|e| Error::Api(format!("invalid table selector: {e:?}")))?;
    let row_selector =
        Selector::parse("tr").map_err(|e| Error::Api(format!("invalid row selector: {e:?}")))?;
    let cell_selector = Selector::parse("td, th")
        .map_err(|e| Error::Api(format!("invalid cell selector: {e:?}")))?;

    let table = document
        .select(&table_selector)
        .nth(FORECAST_TABLE_INDEX)
        .ok_or_else(|| Error::Api(format!("forecast page for {station} has fewer than 5 tables")))?;

    let mut labeled_rows: HashMap<String, Vec<String>> = HashMap::new();
    let mut row_order = Vec::new();

    for row in table.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|c| c.text().collect::<String>().trim().to_string())
            .collect();
        let Some((label, values)) = cells.split_first() else {
            continue;
        };
        if label.is_empty() {
            continue;
        }
        row_order.push(label.clone());
        labeled_rows.insert(label.clone(), values.to_vec());
    }

    let Some(dates) = labeled_rows.get("Date") else {
        return Ok(Vec::new());
    };
    let Some(hours) = labeled_rows.get("Hour (EST)").or_else(|| labeled_rows.get("Hour (EDT)")) else {
        return Ok(Vec::new());
    };

    let filled_dates = forward_fill(dates);
    let inserted_at_utc = Utc::now().to_rfc3339();

    let temps = labeled_rows.get("Temperature (°F)");
    let dewpoints = labeled_rows.get("Dewpoint (°F)");
    let humidity = labeled_rows.get("Relative Humidity (%)");
    let wind = labeled_rows.get("Wind Speed (mph)");

    let mut rows = Vec::with_capacity(hours.len());
    for (idx, hour) in hours.iter().enumerate() {
        let Some(date) = filled_dates.get(idx) else {
            continue;
        };
        if date.is_empty() || hour.is_empty() {
            continue;
        }
        let observation_time = format!("{date} {hour}:00");

        rows.push(ForecastRow {
            inserted_at_utc: inserted_at_utc.clone(),
            idx: idx as i64,
            station: station.to_string(),
            observation_time,
            air_temp: temps.and_then(|v| v.get(idx)).and_then(|s| s.parse().ok()),
            relative_humidity: humidity.and_then(|v| v.get(idx)).and_then(|s| s.parse().ok()),
            dew_point: dewpoints.and_then(|v| v.get(idx)).and_then(|s| s.parse().ok()),
            wind_speed: wind.and_then(|v| v.get(idx)).and_then(|s| s.parse().ok()),
        });
    }

    Ok(rows)
}

/// Forward-fill sparse values: an empty cell takes the most recent
/// non-empty value to its left.
fn forward_fill(values: &[String]) -> Vec<String> {
    let mut filled = Vec::with_capacity(values.len());
    let mut last = String::new();
    for v in values {
        if !v.is_empty() {
            last = v.clone();
        }
        filled.push(last.clone());
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> String {
        // Five tables so the digital forecast grid lands at index 4; only the
        // 5th table's rows matter to the parser.
        let filler = "<table><tr><td>x</td></tr></table>";
        format!(
            "<html><body>{filler}{filler}{filler}{filler}<table>\
            <tr><td>Date</td><td>Jan 01</td><td></td><td>Jan 02</td></tr>\
            <tr><td>Hour (EST)</td><td>12</td><td>13</td><td>00</td></tr>\
            <tr><td>Temperature (°F)</td><td>40</td><td>41</td><td>38</td></tr>\
            <tr><td>Dewpoint (°F)</td><td>30</td><td>30</td><td>29</td></tr>\
            <tr><td>Relative Humidity (%)</td><td>60</td><td>61</td><td>65</td></tr>\
            <tr><td>Wind Speed (mph)</td><td>5</td><td>6</td><td>4</td></tr>\
            </table></body></html>"
        )
    }

    #[test]
    fn test_parse_digital_forecast_forward_fills_date_and_combines_columns() {
        let rows = parse_digital_forecast(&sample_page(), "NYC").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].observation_time, "Jan 01 12:00");
        assert_eq!(rows[1].observation_time, "Jan 01 13:00");
        assert_eq!(rows[2].observation_time, "Jan 02 00:00");
        assert_eq!(rows[0].air_temp, Some(40.0));
        assert_eq!(rows[2].air_temp, Some(38.0));
        assert_eq!(rows[0].idx, 0);
        assert_eq!(rows[2].idx, 2);
    }

    #[test]
    fn test_forward_fill_carries_last_nonempty() {
        let filled = forward_fill(&[
            "Jan 01".to_string(),
            String::new(),
            "Jan 02".to_string(),
            String::new(),
        ]);
        assert_eq!(filled, vec!["Jan 01", "Jan 01", "Jan 02", "Jan 02"]);
    }

    #[test]
    fn test_parse_digital_forecast_missing_table_errors() {
        let html = "<html><body><table><tr><td>x</td></tr></table></body></html>";
        assert!(parse_digital_forecast(html, "NYC").is_err());
    }
}
