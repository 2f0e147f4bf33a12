use tracing::info;

use crate::middleware::Flow;
use crate::registry::{ParamSpec, Registry};

/// Registers `request_log`, a named global middleware function that emits a
/// structured log line for every dispatch it is attached to. Attach with
/// `MiddlewareRef::named("request_log")`, or with
/// `MiddlewareRef::named_with_arg("request_log", json!("tag"))` to label
/// the line.
pub fn register_request_log(registry: &mut Registry) {
    registry.register_function(
        "request_log",
        vec![ParamSpec::request("request"), ParamSpec::scalar("tag")],
        |inv| {
            info!(
                method = %inv.request.method(),
                path = %inv.request.path(),
                tag = inv.args.str("tag").unwrap_or(""),
                "Request received"
            );
            Flow::Continue
        },
    );
}
