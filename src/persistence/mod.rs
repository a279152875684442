//! SQLite-backed append logs and the positions dump.
//!
//! Each store opens its own file, wrapped in a [`parking_lot::Mutex`] because
//! rusqlite's calls are synchronous and held only for the duration of a single
//! statement. Append-style stores dedup via `INSERT OR IGNORE` on a unique
//! key; the positions store is the one upsert (`INSERT ... ON CONFLICT DO
//! UPDATE`).

mod book_events;
mod forecast;
mod positions;
mod sensor;

pub use book_events::{BookEventRow, BookEventStore};
pub use forecast::{ForecastRow, ForecastStore};
pub use positions::{PositionRow, PositionStore};
pub use sensor::{SensorObservationRow, SensorStore};
