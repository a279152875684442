//! Wire protocol helpers: building outgoing command frames and parsing incoming ones.

use serde_json::Value as JsonValue;

use super::channel::Channel;

/// Build a `subscribe` command frame for the given channels and market tickers.
pub fn build_subscribe(id: u64, channels: &[Channel], market_tickers: &[&str]) -> String {
    let channel_names: Vec<&str> = channels.iter().map(Channel::as_str).collect();
    let mut params = serde_json::json!({ "channels": channel_names });
    if !market_tickers.is_empty() {
        params["market_tickers"] = serde_json::json!(market_tickers);
    }
    serde_json::json!({
        "id": id,
        "cmd": "subscribe",
        "params": params,
    })
    .to_string()
}

/// Build an `unsubscribe` command frame for the given subscription IDs.
pub fn build_unsubscribe(id: u64, sids: &[i64]) -> String {
    serde_json::json!({
        "id": id,
        "cmd": "unsubscribe",
        "params": { "sids": sids },
    })
    .to_string()
}

/// A parsed incoming WebSocket text frame.
pub enum IncomingMessage {
    /// A response to a request we sent (subscribe/unsubscribe).
    Response {
        id: u64,
        msg_type: String,
        msg: JsonValue,
    },
    /// An unsolicited update on an existing subscription.
    Update {
        msg_type: String,
        sid: i64,
        msg: JsonValue,
    },
    /// An error response, optionally tied to a request ID.
    Error {
        id: Option<u64>,
        code: String,
        message: String,
    },
}

/// Parse an incoming text frame into one of [`IncomingMessage`]'s variants.
pub fn parse_incoming(text: &str) -> Result<IncomingMessage, String> {
    let value: JsonValue = serde_json::from_str(text).map_err(|e| e.to_string())?;

    if let Some(error) = value.get("error") {
        let code = error
            .get("code")
            .and_then(|c| c.as_str())
            .unwrap_or("unknown")
            .to_string();
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("")
            .to_string();
        let id = value.get("id").and_then(|i| i.as_u64());
        return Ok(IncomingMessage::Error { id, code, message });
    }

    let msg_type = value
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or("missing 'type' field")?
        .to_string();

    if let Some(id) = value.get("id").and_then(|i| i.as_u64()) {
        let msg = value.get("msg").cloned().unwrap_or(JsonValue::Null);
        return Ok(IncomingMessage::Response { id, msg_type, msg });
    }

    let sid = value
        .get("sid")
        .and_then(|s| s.as_i64())
        .ok_or("missing 'sid' field on update")?;
    let msg = value.get("msg").cloned().unwrap_or(JsonValue::Null);
    Ok(IncomingMessage::Update { msg_type, sid, msg })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_subscribe_with_tickers() {
        let msg = build_subscribe(1, &[Channel::OrderbookDelta], &["TEST-TICKER"]);
        let value: JsonValue = serde_json::from_str(&msg).unwrap();
        assert_eq!(value["cmd"], "subscribe");
        assert_eq!(value["params"]["channels"][0], "orderbook_delta");
        assert_eq!(value["params"]["market_tickers"][0], "TEST-TICKER");
    }

    #[test]
    fn test_build_unsubscribe() {
        let msg = build_unsubscribe(2, &[42, 43]);
        let value: JsonValue = serde_json::from_str(&msg).unwrap();
        assert_eq!(value["cmd"], "unsubscribe");
        assert_eq!(value["params"]["sids"][0], 42);
    }

    #[test]
    fn test_parse_response() {
        let json = r#"{"id": 1, "type": "subscribed", "msg": {"channel": "orderbook_delta", "sid": 7}}"#;
        match parse_incoming(json).unwrap() {
            IncomingMessage::Response { id, msg_type, .. } => {
                assert_eq!(id, 1);
                assert_eq!(msg_type, "subscribed");
            }
            _ => panic!("expected Response"),
        }
    }

    #[test]
    fn test_parse_update() {
        let json = r#"{"type": "orderbook_delta", "sid": 7, "seq": 3, "msg": {"market_ticker": "T", "price": 45, "delta": 1, "side": "yes"}}"#;
        match parse_incoming(json).unwrap() {
            IncomingMessage::Update { sid, msg_type, .. } => {
                assert_eq!(sid, 7);
                assert_eq!(msg_type, "orderbook_delta");
            }
            _ => panic!("expected Update"),
        }
    }

    #[test]
    fn test_parse_error() {
        let json = r#"{"id": 1, "error": {"code": "invalid_ticker", "message": "not found"}}"#;
        match parse_incoming(json).unwrap() {
            IncomingMessage::Error { id, code, .. } => {
                assert_eq!(id, Some(1));
                assert_eq!(code, "invalid_ticker");
            }
            _ => panic!("expected Error"),
        }
    }
}
