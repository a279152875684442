//! Binary entry point: wires every component together and runs until a
//! fatal configuration error or a shutdown signal.

use std::sync::Arc;

use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use kalshi_trade_rs::bus::{Bus, GatewayState, run_gateway};
use kalshi_trade_rs::config::Config;
use kalshi_trade_rs::orderbook::OrderBookStore;
use kalshi_trade_rs::persistence::{BookEventStore, ForecastStore, PositionStore, SensorStore};
use kalshi_trade_rs::polls::{run_forecast_poll, run_sensor_poll};
use kalshi_trade_rs::trader::{TraderConfig, run_trader};
use kalshi_trade_rs::{BookFeed, Error, ExchangeClient, KalshiConfig, Result};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    if let Err(e) = run().await {
        error!("fatal startup error: {e}");
        return Err(e);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;
    let kalshi_config = KalshiConfig::from_env()?;
    let exchange = ExchangeClient::new(kalshi_config.clone())?;

    let bus = Bus::new();
    let orderbook_store = OrderBookStore::new();
    let book_events = Arc::new(BookEventStore::open(&config.orderbook_db_path)?);
    let position_store = Arc::new(PositionStore::open(&config.orders_db_path)?);
    let sensor_store = Arc::new(SensorStore::open(&config.weather_db_path)?);
    let forecast_store = Arc::new(ForecastStore::open(&config.forecast_db_path)?);

    let http_client = reqwest::Client::builder()
        .build()
        .map_err(Error::Http)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let book_feed = BookFeed::new(
        kalshi_config,
        exchange.clone(),
        config.watched_series.clone(),
        config.watched_tickers.clone(),
        orderbook_store,
        Arc::clone(&book_events),
        bus.clone(),
    );

    let mut tasks = Vec::new();

    let gateway_book_feed = book_feed.clone();
    tasks.push(tokio::spawn(book_feed.run(shutdown_rx.clone())));

    tasks.push(tokio::spawn(run_sensor_poll(
        http_client.clone(),
        config.weather_stations.clone(),
        config.weather_api_token.clone(),
        Arc::clone(&sensor_store),
        bus.clone(),
        shutdown_rx.clone(),
    )));

    tasks.push(tokio::spawn(run_forecast_poll(
        http_client.clone(),
        config.forecast_stations.clone(),
        Arc::clone(&forecast_store),
        bus.clone(),
        shutdown_rx.clone(),
    )));

    let gateway_addr = config.gateway_addr.clone();
    let gateway_state = GatewayState::new(bus.clone(), gateway_book_feed);
    let gateway_shutdown = shutdown_rx.clone();
    tasks.push(tokio::spawn(async move {
        run_gateway(&gateway_addr, gateway_state, gateway_shutdown).await
    }));

    let watched_for_trader = if config.watched_tickers.is_empty() {
        config.watched_series.clone()
    } else {
        config.watched_tickers.clone()
    };

    tasks.push(tokio::spawn(run_trader(
        exchange.http().clone(),
        watched_for_trader,
        position_store,
        bus.clone(),
        TraderConfig {
            max_price: config.trader_max_price,
            min_edge: config.trader_min_edge,
        },
        shutdown_rx.clone(),
    )));

    info!("kalshi-engine started, gateway on {}", config.gateway_addr);

    signal::ctrl_c().await.map_err(|e| Error::Config(format!("failed to listen for ctrl_c: {e}")))?;
    info!("shutdown signal received, draining tasks");
    let _ = shutdown_tx.send(true);

    for task in tasks {
        match task.await {
            Ok(Err(e)) => error!("task exited with error during shutdown: {e}"),
            Err(e) => error!("task join error during shutdown: {e}"),
            Ok(Ok(())) => {}
        }
    }

    Ok(())
}
