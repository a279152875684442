//! Tracks in-flight requests awaiting a server response, keyed by request ID.

use std::collections::HashMap;

use serde_json::Value as JsonValue;
use tokio::sync::oneshot;

/// Pending request state: who to notify, and how many channels we're still waiting on.
struct PendingRequest {
    response: oneshot::Sender<Result<JsonValue, String>>,
}

/// Maps outgoing request IDs to the caller awaiting their response.
///
/// The session actor assigns a monotonically increasing ID to every subscribe/unsubscribe
/// command it sends, registers the caller's response channel here, and looks it up again
/// when the matching response frame arrives.
#[derive(Default)]
pub struct RequestHandler {
    next_id: u64,
    pending: HashMap<u64, PendingRequest>,
}

impl RequestHandler {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            pending: HashMap::new(),
        }
    }

    /// Allocates a fresh request ID and registers the caller to be notified on response.
    pub fn register(&mut self, response: oneshot::Sender<Result<JsonValue, String>>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.insert(id, PendingRequest { response });
        id
    }

    /// Registers a caller under a caller-assigned request ID.
    ///
    /// Used when the ID space is shared with another allocator (e.g. subscribe
    /// requests tracked by a separate collector map on the same wire connection).
    pub fn register_with_id(&mut self, id: u64, response: oneshot::Sender<Result<JsonValue, String>>) {
        self.pending.insert(id, PendingRequest { response });
    }

    /// Delivers a response to the caller that registered the given request ID.
    ///
    /// No-op if the ID is unknown (e.g. the caller already dropped its receiver).
    pub fn handle_response(&mut self, id: u64, result: Result<JsonValue, String>) {
        if let Some(pending) = self.pending.remove(&id) {
            let _ = pending.response.send(result);
        }
    }

    /// Fails every pending request, used when the connection is lost.
    pub fn cancel_all(&mut self, reason: &str) {
        for (_, pending) in self.pending.drain() {
            let _ = pending.response.send(Err(reason.to_string()));
        }
    }

    /// Number of requests currently awaiting a response.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_respond() {
        let mut handler = RequestHandler::new();
        let (tx, rx) = oneshot::channel();
        let id = handler.register(tx);
        assert_eq!(handler.pending_count(), 1);

        handler.handle_response(id, Ok(serde_json::json!({"ok": true})));
        assert_eq!(handler.pending_count(), 0);
        assert!(rx.blocking_recv().unwrap().is_ok());
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut handler = RequestHandler::new();
        handler.handle_response(999, Ok(JsonValue::Null));
        assert_eq!(handler.pending_count(), 0);
    }

    #[test]
    fn test_cancel_all() {
        let mut handler = RequestHandler::new();
        let (tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();
        handler.register(tx1);
        handler.register(tx2);

        handler.cancel_all("connection lost");
        assert_eq!(handler.pending_count(), 0);
        assert!(rx1.blocking_recv().unwrap().is_err());
        assert!(rx2.blocking_recv().unwrap().is_err());
    }

    #[test]
    fn test_ids_increment() {
        let mut handler = RequestHandler::new();
        let (tx1, _rx1) = oneshot::channel();
        let (tx2, _rx2) = oneshot::channel();
        let id1 = handler.register(tx1);
        let id2 = handler.register(tx2);
        assert_eq!(id2, id1 + 1);
    }
}
