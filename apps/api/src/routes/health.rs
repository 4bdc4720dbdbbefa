use serde_json::{json, Value};

use crate::response::Reply;

/// GET /health
/// Liveness probe with the service version. No auth.
pub async fn health_handler() -> Reply<Value> {
    Reply::ok(
        "Service is healthy",
        json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "service": "agenda-api"
        }),
    )
}
