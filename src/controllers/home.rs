// Demo controller for the /home routes.

use serde_json::json;

use crate::middleware::Flow;
use crate::registry::{ParamSpec, Registry};

pub fn register(registry: &mut Registry) {
    registry.register_action(
        "home",
        "index",
        vec![ParamSpec::request("request"), ParamSpec::response("response")],
        |inv| {
            let message = inv.request.get("message").cloned().unwrap_or_default();
            inv.response
                .header("Content-Type", "application/json")
                .status(200, "OK")
                .body(json!({ "message": message }))
                .send();
            Flow::Continue
        },
    );

    registry.register_action(
        "home",
        "view",
        vec![ParamSpec::request("request"), ParamSpec::response("response")],
        |inv| {
            let data = inv.request.get("message").cloned().unwrap_or_default();
            inv.response
                .header("Content-Type", "application/json")
                .status(200, "OK")
                .body(json!({ "message": data }))
                .send();
            Flow::Continue
        },
    );
}
