// Demo controller for the /agents routes.

use serde_json::json;

use crate::middleware::Flow;
use crate::registry::{ParamSpec, Registry};

pub fn register(registry: &mut Registry) {
    registry.register_action("agent", "all", vec![ParamSpec::response("response")], |inv| {
        let agents: Vec<serde_json::Value> = Vec::new();
        inv.response
            .header("Content-Type", "application/json")
            .status(200, "OK")
            .body(json!({ "message": agents }))
            .send();
        Flow::Continue
    });

    registry.register_action(
        "agent",
        "create",
        vec![ParamSpec::request("request"), ParamSpec::response("response")],
        |inv| {
            let data = inv.request.get_all();
            let auth = inv.request.header("Authorization");
            inv.response
                .header("Content-Type", "application/json")
                .status(200, "OK")
                .body(json!({ "datas": data, "headers": auth }))
                .send();
            Flow::Continue
        },
    );
}
