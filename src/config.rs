//! Startup configuration, validated once before any task is spawned.

use std::env;

use crate::error::{Error, Result};

const DEFAULT_GATEWAY_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_TRADER_MAX_PRICE: i64 = 97;
const DEFAULT_TRADER_MIN_EDGE: i64 = 66;

/// Engine-wide configuration, read once from the process environment.
///
/// Every field here is fatal-at-startup if missing or malformed: a missing
/// `PROD_KEYFILE` is no different from a missing `ORDERBOOK_DB_PATH` as far as
/// the process is concerned, both mean we refuse to start.
#[derive(Debug, Clone)]
pub struct Config {
    pub kalshi_key_id: String,
    pub kalshi_key_file: String,

    pub orderbook_db_path: String,
    pub orders_db_path: String,
    pub weather_db_path: String,
    pub forecast_db_path: String,

    pub watched_series: Vec<String>,
    pub watched_tickers: Vec<String>,

    pub weather_stations: Vec<String>,
    pub weather_api_token: String,

    pub forecast_stations: Vec<ForecastStation>,

    pub gateway_addr: String,

    pub trader_max_price: i64,
    pub trader_min_edge: i64,
}

/// A forecast.weather.gov station to poll, identified by lat/lon.
#[derive(Debug, Clone)]
pub struct ForecastStation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Config {
    /// Validate every required variable up front and return a fully populated
    /// `Config`, or the first `Error::Config` encountered.
    ///
    /// DB path variables are not checked for existence here; the persistence
    /// layer creates them if missing.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            kalshi_key_id: required("PROD_KEYID")?,
            kalshi_key_file: required_existing_file("PROD_KEYFILE")?,

            orderbook_db_path: required("ORDERBOOK_DB_PATH")?,
            orders_db_path: required("ORDERS_DB_PATH")?,
            weather_db_path: required("WEATHER_DB_PATH")?,
            forecast_db_path: required("FORECAST_DB_PATH")?,

            watched_series: required_csv("WATCHED_SERIES")?,
            watched_tickers: optional_csv("WATCHED_TICKERS"),

            weather_stations: required_csv("WEATHER_STATIONS")?,
            weather_api_token: required("WEATHER_API_TOKEN")?,

            forecast_stations: parse_forecast_stations(&required("FORECAST_STATIONS")?)?,

            gateway_addr: env::var("GATEWAY_ADDR").unwrap_or_else(|_| DEFAULT_GATEWAY_ADDR.to_string()),

            trader_max_price: optional_int("TRADER_MAX_PRICE", DEFAULT_TRADER_MAX_PRICE)?,
            trader_min_edge: optional_int("TRADER_MIN_EDGE", DEFAULT_TRADER_MIN_EDGE)?,
        })
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("missing required env var {name}")))
}

fn required_existing_file(name: &str) -> Result<String> {
    let path = required(name)?;
    if !std::path::Path::new(&path).exists() {
        return Err(Error::Config(format!(
            "{name} points to a non-existent file: {path}"
        )));
    }
    Ok(path)
}

fn required_csv(name: &str) -> Result<Vec<String>> {
    let raw = required(name)?;
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if items.is_empty() {
        return Err(Error::Config(format!("{name} must contain at least one entry")));
    }
    Ok(items)
}

fn optional_csv(name: &str) -> Vec<String> {
    env::var(name)
        .ok()
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn optional_int(name: &str, default: i64) -> Result<i64> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| Error::Config(format!("{name} must be an integer, got {raw:?}"))),
        Err(_) => Ok(default),
    }
}

/// `FORECAST_STATIONS` is `name:lat:lon` entries separated by `;`.
fn parse_forecast_stations(raw: &str) -> Result<Vec<ForecastStation>> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| {
            let mut parts = entry.split(':');
            let name = parts
                .next()
                .ok_or_else(|| Error::Config(format!("malformed FORECAST_STATIONS entry: {entry}")))?
                .to_string();
            let lat: f64 = parts
                .next()
                .ok_or_else(|| Error::Config(format!("malformed FORECAST_STATIONS entry: {entry}")))?
                .parse()
                .map_err(|_| Error::Config(format!("malformed latitude in: {entry}")))?;
            let lon: f64 = parts
                .next()
                .ok_or_else(|| Error::Config(format!("malformed FORECAST_STATIONS entry: {entry}")))?
                .parse()
                .map_err(|_| Error::Config(format!("malformed longitude in: {entry}")))?;
            Ok(ForecastStation { name, lat, lon })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_required_csv_splits_and_trims() {
        unsafe { env::set_var("TEST_CSV_VAR", "a, b ,c") };
        let _guard = ENV_LOCK.lock().unwrap();
        assert_eq!(
            required_csv("TEST_CSV_VAR").unwrap(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        unsafe { env::remove_var("TEST_CSV_VAR") };
    }

    #[test]
    fn test_required_csv_rejects_empty() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe { env::set_var("TEST_EMPTY_CSV_VAR", "") };
        assert!(required_csv("TEST_EMPTY_CSV_VAR").is_err());
        unsafe { env::remove_var("TEST_EMPTY_CSV_VAR") };
    }

    #[test]
    fn test_optional_int_falls_back_to_default() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe { env::remove_var("TEST_INT_VAR") };
        assert_eq!(optional_int("TEST_INT_VAR", 42).unwrap(), 42);
    }

    #[test]
    fn test_parse_forecast_stations() {
        let stations = parse_forecast_stations("NYC:40.7:-74.0; Boston:42.36:-71.06").unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].name, "NYC");
        assert_eq!(stations[1].lat, 42.36);
    }

    #[test]
    fn test_missing_required_var_is_config_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe { env::remove_var("TEST_MISSING_VAR_XYZ") };
        match required("TEST_MISSING_VAR_XYZ") {
            Err(Error::Config(_)) => {}
            other => panic!("expected Error::Config, got {other:?}"),
        }
    }
}
