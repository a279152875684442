//! Momentum trader (§4.7): consumes `orderbook` bus messages for a watched
//! set of tickers, decides on an order via [`decision::decide_trade`], and
//! keeps an optimistic in-memory position authoritative between periodic
//! reconciliations against the exchange.

mod decision;

pub use decision::{decide_trade, parse_side, passes_gates};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api;
use crate::bus::{Bus, BusMessage};
use crate::client::HttpClient;
use crate::error::Result;
use crate::models::{Action, CreateOrderRequest, GetPositionsParams, Side};
use crate::persistence::{PositionRow, PositionStore};

const STRATEGY: &str = "momentum";
const POSITION_REFRESH_INTERVAL: Duration = Duration::from_secs(5);
const BALANCE_REFRESH_INTERVAL: Duration = Duration::from_secs(1);
const LATENCY_LOG_EVERY: u64 = 10;

#[derive(Debug, Clone, Copy, Default)]
struct Position {
    avg_price_cents: i64,
    signed_qty: i64,
}

struct TraderState {
    positions: HashMap<String, Position>,
    balance_cents: i64,
}

/// Construction-time gating thresholds, read once from config (§9 open
/// question: tunable via env, not a CLI surface).
#[derive(Debug, Clone, Copy)]
pub struct TraderConfig {
    pub max_price: i64,
    pub min_edge: i64,
}

/// Run the momentum trader until `shutdown` fires.
///
/// Spawns two background tasks (position reconciliation, balance refresh)
/// sharing state with the main orderbook-consumer loop through a
/// [`parking_lot::Mutex`]; §4.7 reconciliation always clobbers the optimistic
/// view, never the other way around.
pub async fn run_trader(
    http: HttpClient,
    watched_tickers: Vec<String>,
    store: Arc<PositionStore>,
    bus: Bus,
    trader_config: TraderConfig,
    mut shutdown: tokio::sync::watch::Receiver<bool>,
) -> Result<()> {
    let state = Arc::new(Mutex::new(TraderState {
        positions: HashMap::new(),
        balance_cents: 0,
    }));

    let position_task = tokio::spawn(run_position_refresh(
        http.clone(),
        watched_tickers.clone(),
        Arc::clone(&state),
        Arc::clone(&store),
        shutdown.clone(),
    ));
    let balance_task = tokio::spawn(run_balance_refresh(http.clone(), Arc::clone(&state), shutdown.clone()));

    let watched: std::collections::HashSet<String> = watched_tickers.into_iter().collect();
    let mut rx = bus.subscribe();
    let mut processed: u64 = 0;
    let mut latency_sum = Duration::ZERO;

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    break;
                }
            }
            msg = rx.recv() => {
                let msg = match msg {
                    Ok(msg) => msg,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("trader lagged, skipped {skipped} bus messages");
                        continue;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                };

                let BusMessage::Orderbook { ticker, yes, no } = msg else {
                    continue;
                };
                if !watched.contains(&ticker) {
                    continue;
                }

                let start = Instant::now();
                handle_orderbook_update(&http, &ticker, &yes, &no, &state, &store, &bus, trader_config).await;
                let elapsed = start.elapsed();

                processed += 1;
                latency_sum += elapsed;
                if processed % LATENCY_LOG_EVERY == 0 {
                    let avg = latency_sum / LATENCY_LOG_EVERY as u32;
                    info!("trader processed {processed} messages, rolling avg latency {avg:?}");
                    latency_sum = Duration::ZERO;
                }
            }
        }
    }

    position_task.abort();
    balance_task.abort();
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn handle_orderbook_update(
    http: &HttpClient,
    ticker: &str,
    yes: &str,
    no: &str,
    state: &Arc<Mutex<TraderState>>,
    store: &PositionStore,
    bus: &Bus,
    trader_config: TraderConfig,
) {
    let p_yes = parse_side(yes);
    let p_no = parse_side(no);

    let signed_qty = {
        let guard = state.lock();
        guard.positions.get(ticker).copied().unwrap_or_default().signed_qty
    };

    let (order_qty, limit_price) = match (p_yes, p_no) {
        (Some((py, _)), Some((pn, _))) => decide_trade(signed_qty, py, pn),
        _ => (0, None),
    };

    if order_qty == 0 {
        return;
    }

    let balance_cents = state.lock().balance_cents;
    if !passes_gates(
        p_yes.map(|(p, _)| p),
        p_no.map(|(p, _)| p),
        order_qty,
        balance_cents,
        trader_config.max_price,
        trader_config.min_edge,
    ) {
        return;
    }

    let Some(limit_price) = limit_price else { return };
    submit_order(http, ticker, order_qty, limit_price, signed_qty, state, store, bus).await;
}

#[allow(clippy::too_many_arguments)]
async fn submit_order(
    http: &HttpClient,
    ticker: &str,
    order_qty: i64,
    limit_price: i64,
    prior_qty: i64,
    state: &Arc<Mutex<TraderState>>,
    store: &PositionStore,
    bus: &Bus,
) {
    let side = if order_qty > 0 { Side::Yes } else { Side::No };
    let client_order_id = Uuid::new_v4().to_string();
    // Market order: Kalshi fills at the best available price. `limit_price`
    // is only the decision table's reference price for the optimistic
    // position update below, never part of the request body.
    let request = if side == Side::Yes {
        CreateOrderRequest::market_yes(ticker, Action::Buy, order_qty.abs(), client_order_id)
    } else {
        CreateOrderRequest::market_no(ticker, Action::Buy, order_qty.abs(), client_order_id)
    };

    match api::create_order(http, request).await {
        Ok(_) => {
            let new_qty = prior_qty + order_qty;
            {
                let mut guard = state.lock();
                guard.positions.insert(
                    ticker.to_string(),
                    Position {
                        avg_price_cents: limit_price,
                        signed_qty: new_qty,
                    },
                );
            }
            if let Err(e) = store.upsert(&PositionRow {
                strategy: STRATEGY.to_string(),
                ticker: ticker.to_string(),
                avg_price_cents: limit_price,
                signed_qty: new_qty,
                order_id: None,
            }) {
                warn!("failed to persist optimistic position for {ticker}: {e}");
            }
            bus.publish(BusMessage::PositionUpdate {
                ticker: ticker.to_string(),
                pos: new_qty,
            });
        }
        Err(e) => {
            // Optimistic state was never applied, so there is nothing to roll back.
            error!("order submission rejected for {ticker}: {e}");
        }
    }
}

async fn run_position_refresh(
    http: HttpClient,
    watched_tickers: Vec<String>,
    state: Arc<Mutex<TraderState>>,
    store: Arc<PositionStore>,
    mut shutdown: tokio::sync::watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(POSITION_REFRESH_INTERVAL);
    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    break;
                }
            }
            _ = interval.tick() => {
                for ticker in &watched_tickers {
                    let params = GetPositionsParams::new().ticker(ticker.clone());
                    match api::get_positions(&http, params).await {
                        Ok(response) => {
                            for mp in response.market_positions {
                                let position = Position {
                                    avg_price_cents: if mp.position != 0 {
                                        (mp.market_exposure / mp.position).abs()
                                    } else {
                                        0
                                    },
                                    signed_qty: mp.position,
                                };
                                state.lock().positions.insert(mp.ticker.clone(), position);
                                if let Err(e) = store.upsert(&PositionRow {
                                    strategy: STRATEGY.to_string(),
                                    ticker: mp.ticker,
                                    avg_price_cents: position.avg_price_cents,
                                    signed_qty: position.signed_qty,
                                    order_id: None,
                                }) {
                                    warn!("failed to persist reconciled position: {e}");
                                }
                            }
                        }
                        Err(e) => warn!("position reconciliation failed for {ticker}: {e}"),
                    }
                }
            }
        }
    }
}

async fn run_balance_refresh(
    http: HttpClient,
    state: Arc<Mutex<TraderState>>,
    mut shutdown: tokio::sync::watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(BALANCE_REFRESH_INTERVAL);
    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    break;
                }
            }
            _ = interval.tick() => {
                match api::get_balance(&http).await {
                    Ok(response) => {
                        state.lock().balance_cents = response.balance;
                    }
                    Err(e) => warn!("balance refresh failed: {e}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_default_is_flat() {
        let p = Position::default();
        assert_eq!(p.signed_qty, 0);
        assert_eq!(p.avg_price_cents, 0);
    }
}
