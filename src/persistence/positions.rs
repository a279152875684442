//! Upserted dump of the trader's per-ticker strategy positions.
//!
//! This table is an inspection aid, not a source of truth: the trader's
//! in-memory position is authoritative between reconciliations (§9).

use parking_lot::Mutex;
use rusqlite::{Connection, params};

use crate::error::Result;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS positions (
    strategy        TEXT NOT NULL,
    ticker          TEXT NOT NULL,
    avg_price_cents INTEGER NOT NULL,
    signed_qty      INTEGER NOT NULL,
    order_id        TEXT,
    PRIMARY KEY (strategy, ticker)
) WITHOUT ROWID;
"#;

/// One strategy-scoped position row.
#[derive(Debug, Clone)]
pub struct PositionRow {
    pub strategy: String,
    pub ticker: String,
    pub avg_price_cents: i64,
    pub signed_qty: i64,
    pub order_id: Option<String>,
}

/// Store for `positions`, opened at `ORDERS_DB_PATH`.
pub struct PositionStore {
    conn: Mutex<Connection>,
}

impl PositionStore {
    pub fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Upsert a position row, replacing price, quantity, and order id.
    pub fn upsert(&self, row: &PositionRow) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO positions (strategy, ticker, avg_price_cents, signed_qty, order_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(strategy, ticker) DO UPDATE SET
                avg_price_cents = excluded.avg_price_cents,
                signed_qty = excluded.signed_qty,
                order_id = excluded.order_id",
            params![
                row.strategy,
                row.ticker,
                row.avg_price_cents,
                row.signed_qty,
                row.order_id,
            ],
        )?;
        Ok(())
    }

    #[cfg(test)]
    pub fn get(&self, strategy: &str, ticker: &str) -> Option<PositionRow> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT strategy, ticker, avg_price_cents, signed_qty, order_id
             FROM positions WHERE strategy = ?1 AND ticker = ?2",
            params![strategy, ticker],
            |r| {
                Ok(PositionRow {
                    strategy: r.get(0)?,
                    ticker: r.get(1)?,
                    avg_price_cents: r.get(2)?,
                    signed_qty: r.get(3)?,
                    order_id: r.get(4)?,
                })
            },
        )
        .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_inserts_then_replaces() {
        let store = PositionStore::open(":memory:").unwrap();
        store
            .upsert(&PositionRow {
                strategy: "momentum".to_string(),
                ticker: "T1".to_string(),
                avg_price_cents: 45,
                signed_qty: 1,
                order_id: Some("abc".to_string()),
            })
            .unwrap();

        store
            .upsert(&PositionRow {
                strategy: "momentum".to_string(),
                ticker: "T1".to_string(),
                avg_price_cents: 50,
                signed_qty: -1,
                order_id: Some("def".to_string()),
            })
            .unwrap();

        let row = store.get("momentum", "T1").unwrap();
        assert_eq!(row.avg_price_cents, 50);
        assert_eq!(row.signed_qty, -1);
        assert_eq!(row.order_id, Some("def".to_string()));
    }
}
