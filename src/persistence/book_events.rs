//! Append-only log of order book price-level changes.

use parking_lot::Mutex;
use rusqlite::{Connection, params};

use crate::error::Result;
use crate::models::Side;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS book_events (
    local_receive_ts TEXT NOT NULL,
    exchange_ts      INTEGER,
    sequence_number  INTEGER,
    ticker           TEXT NOT NULL,
    side             INTEGER NOT NULL,
    price            INTEGER NOT NULL,
    signed_qty       INTEGER NOT NULL,
    is_delta         INTEGER NOT NULL,
    PRIMARY KEY (ticker, local_receive_ts, side, price, is_delta)
) WITHOUT ROWID;

CREATE INDEX IF NOT EXISTS idx_book_events_ticker_seq
    ON book_events(ticker, sequence_number, local_receive_ts);
"#;

/// One row of the book event log.
#[derive(Debug, Clone)]
pub struct BookEventRow {
    pub local_receive_ts: String,
    pub exchange_ts: Option<i64>,
    pub sequence_number: Option<i64>,
    pub ticker: String,
    pub side: Side,
    pub price: i64,
    pub signed_qty: i64,
    pub is_delta: bool,
}

/// Append-only store for `book_events` rows, opened at `ORDERBOOK_DB_PATH`.
pub struct BookEventStore {
    conn: Mutex<Connection>,
}

impl BookEventStore {
    pub fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert one row, ignoring if the key already exists (reconnect replays
    /// will re-stamp a fresh `local_receive_ts`, so duplicates here are rare
    /// but harmless either way).
    pub fn insert(&self, row: &BookEventRow) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR IGNORE INTO book_events
                (local_receive_ts, exchange_ts, sequence_number, ticker, side, price, signed_qty, is_delta)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                row.local_receive_ts,
                row.exchange_ts,
                row.sequence_number,
                row.ticker,
                side_to_int(row.side),
                row.price,
                row.signed_qty,
                row.is_delta as i64,
            ],
        )?;
        Ok(())
    }

    /// Insert every level of a snapshot as one non-delta row each.
    pub fn insert_snapshot_rows(&self, rows: &[BookEventRow]) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute("BEGIN IMMEDIATE", [])?;
        for row in rows {
            conn.execute(
                "INSERT OR IGNORE INTO book_events
                    (local_receive_ts, exchange_ts, sequence_number, ticker, side, price, signed_qty, is_delta)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    row.local_receive_ts,
                    row.exchange_ts,
                    row.sequence_number,
                    row.ticker,
                    side_to_int(row.side),
                    row.price,
                    row.signed_qty,
                    row.is_delta as i64,
                ],
            )?;
        }
        conn.execute("COMMIT", [])?;
        Ok(())
    }

    #[cfg(test)]
    pub fn count(&self, ticker: &str) -> i64 {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT COUNT(*) FROM book_events WHERE ticker = ?1",
            params![ticker],
            |r| r.get(0),
        )
        .unwrap_or(0)
    }
}

fn side_to_int(side: Side) -> i64 {
    match side {
        Side::Yes => 1,
        Side::No => -1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ticker: &str, ts: &str, price: i64, qty: i64, is_delta: bool) -> BookEventRow {
        BookEventRow {
            local_receive_ts: ts.to_string(),
            exchange_ts: None,
            sequence_number: Some(1),
            ticker: ticker.to_string(),
            side: Side::Yes,
            price,
            signed_qty: qty,
            is_delta,
        }
    }

    #[test]
    fn test_insert_and_count() {
        let store = BookEventStore::open(":memory:").unwrap();
        store.insert(&row("T1", "2026-01-01T00:00:00.000000Z", 45, 100, false)).unwrap();
        store.insert(&row("T1", "2026-01-01T00:00:01.000000Z", 45, -10, true)).unwrap();
        assert_eq!(store.count("T1"), 2);
    }

    #[test]
    fn test_duplicate_row_is_ignored() {
        let store = BookEventStore::open(":memory:").unwrap();
        let r = row("T1", "2026-01-01T00:00:00.000000Z", 45, 100, false);
        store.insert(&r).unwrap();
        store.insert(&r).unwrap();
        assert_eq!(store.count("T1"), 1);
    }

    #[test]
    fn test_insert_snapshot_rows_batches() {
        let store = BookEventStore::open(":memory:").unwrap();
        let rows = vec![
            row("T1", "2026-01-01T00:00:00.000000Z", 45, 100, false),
            row("T1", "2026-01-01T00:00:00.000001Z", 50, 200, false),
        ];
        store.insert_snapshot_rows(&rows).unwrap();
        assert_eq!(store.count("T1"), 2);
    }
}
