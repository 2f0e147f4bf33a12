//! Integration tests for the HTTP transport adapter.
//!
//! Spins up a real `may_minihttp` server around an `AppService` and drives
//! it with raw HTTP over a TCP socket, verifying the end-to-end flow:
//! request parsing → dispatch → response/error rendering.

use corridor::dispatcher::Dispatcher;
use corridor::middleware::Flow;
use corridor::registry::{ParamSpec, Registry};
use corridor::router::{HandlerRef, Router};
use corridor::server::{AppService, HttpServer, ServerHandle};
use serde_json::json;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

fn start_service(addr: &str) -> ServerHandle {
    may::config().set_stack_size(0x8000);

    let mut registry = Registry::new();
    corridor::controllers::register_all(&mut registry);

    let mut router = Router::new();
    router
        .get(
            "/greet/{name}",
            HandlerRef::inline(
                vec![ParamSpec::scalar("name"), ParamSpec::response("response")],
                |inv| {
                    let name = inv.args.str("name").unwrap_or("world").to_string();
                    inv.response
                        .status(200, "OK")
                        .body(json!({ "greeting": format!("hello {name}") }))
                        .send();
                    Flow::Continue
                },
            ),
        )
        .save();
    router.get("/agents", HandlerRef::method("agent", "all")).save();

    let service = AppService::new(Arc::new(router), Arc::new(Dispatcher::new(registry)));
    let handle = HttpServer(service).start(addr).expect("start server");
    handle.wait_ready().expect("server ready");
    handle
}

fn raw_request(addr: &str, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).expect("connect");
    stream
        .set_read_timeout(Some(Duration::from_millis(500)))
        .expect("set timeout");
    stream.write_all(request.as_bytes()).expect("write");

    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(_) => break,
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

#[test]
fn test_dynamic_route_over_http() {
    let addr = "127.0.0.1:8761";
    let handle = start_service(addr);

    let response = raw_request(
        addr,
        "GET /greet/ada HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    );
    assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");
    assert!(response.contains(r#"{"greeting":"hello ada"}"#), "got: {response}");

    handle.stop();
}

#[test]
fn test_missing_route_renders_message_verbatim() {
    let addr = "127.0.0.1:8762";
    let handle = start_service(addr);

    let response = raw_request(
        addr,
        "GET /nope HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    );
    assert!(response.starts_with("HTTP/1.1 404"), "got: {response}");
    assert!(response.contains("Route /nope not found"), "got: {response}");

    handle.stop();
}

#[test]
fn test_controller_route_over_http() {
    let addr = "127.0.0.1:8763";
    let handle = start_service(addr);

    let response = raw_request(
        addr,
        "GET /agents HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    );
    assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");
    assert!(response.contains(r#""message":[]"#), "got: {response}");

    handle.stop();
}
