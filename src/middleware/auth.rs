use serde_json::json;

use crate::middleware::Flow;
use crate::registry::{ParamSpec, Registry};

/// Token-presence auth middleware.
///
/// Registers the `auth` controller with a `verify_token` action that checks
/// for an `Authorization` header. Requests without one are rejected with a
/// 401 and halted before the handler runs. Attach to routes as
/// `MiddlewareRef::method("auth", "verify_token", vec![])`.
pub fn register(registry: &mut Registry) {
    registry.register_action(
        "auth",
        "verify_token",
        vec![ParamSpec::request("request"), ParamSpec::response("response")],
        |inv| {
            if inv.request.header("Authorization").is_some() {
                return Flow::Continue;
            }
            inv.response
                .header("Content-Type", "application/json")
                .status(401, "Unauthorized")
                .body(json!({ "message": "token invalid", "status": "failed" }))
                .send();
            Flow::Halt
        },
    );
}
