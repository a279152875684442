//! Periodic external pollers: weather sensor readings and scraped forecasts.

mod forecast;
mod sensor;

pub use forecast::run_forecast_poll;
pub use sensor::run_sensor_poll;
