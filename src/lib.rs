//! # Corridor
//!
//! **Corridor** is a registry-driven HTTP request router for Rust: routes are
//! declared through a fluent builder, matched with compiled regex patterns,
//! and dispatched to named callables with automatically resolved arguments,
//! all served on the `may` coroutine runtime via `may_minihttp`.
//!
//! ## Architecture
//!
//! - **[`router`]** - Route-table construction (prefix and middleware
//!   scoping, `{param}` placeholder compilation) and route matching (exact
//!   lookup, then a dynamic scan under a segment-count pre-filter)
//! - **[`registry`]** - Named global functions and controller actions, each
//!   registered with the declared parameter list the binder resolves against
//! - **[`dispatcher`]** - Per-request MATCH → MIDDLEWARE → BIND → INVOKE
//!   orchestration and argument resolution
//! - **[`middleware`]** - Middleware references, chain execution, and the
//!   bundled auth/request-log middleware
//! - **[`server`]** - The request/response collaborators plus the
//!   `may_minihttp` transport adapter
//! - **[`errors`]** - The two terminal failures: `RouteNotFound` and
//!   `CallbackNotFound`, both carrying a message and a 404-style code
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use corridor::dispatcher::Dispatcher;
//! use corridor::middleware::Flow;
//! use corridor::registry::{ParamSpec, Registry};
//! use corridor::router::{HandlerRef, Router};
//! use corridor::server::{AppService, HttpServer};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let mut registry = Registry::new();
//! corridor::controllers::register_all(&mut registry);
//!
//! let mut router = Router::new();
//! router
//!     .prefix("/home")
//!     .get("/", HandlerRef::inline(
//!         vec![ParamSpec::response("response")],
//!         |inv| {
//!             inv.response
//!                 .header("Content-Type", "application/json")
//!                 .status(200, "OK")
//!                 .body(json!({ "message": "Get message with body json" }))
//!                 .send();
//!             Flow::Continue
//!         },
//!     ))
//!     .save();
//!
//! let service = AppService::new(
//!     Arc::new(router),
//!     Arc::new(Dispatcher::new(registry)),
//! );
//! let handle = HttpServer(service).start("0.0.0.0:8080")?;
//! handle.join().unwrap();
//! ```
//!
//! ## Path Placeholders
//!
//! Registered paths may contain `{name}` or `{type:name}` placeholders with
//! `type` one of `int`, `float`, `double`, `bool` (default `string`).
//! Extracted values are coerced best-effort: `/users/{int:id}` matched
//! against `/users/42` binds `id` to integer `42`; against `/users/abc` it
//! still matches and binds `0`.
//!
//! ## Runtime Considerations
//!
//! Corridor runs on the `may` coroutine runtime, not tokio. The route table
//! and registry are built once before serving starts and shared immutably
//! across connection coroutines; every piece of per-request state lives in
//! the request/response collaborators, so no locking is involved on the
//! dispatch path. Coroutine stack size is configurable via
//! `CORRIDOR_STACK_SIZE`.

pub mod controllers;
pub mod dispatcher;
pub mod errors;
pub mod middleware;
pub mod registry;
pub mod router;
pub mod runtime_config;
pub mod server;

pub use dispatcher::{Args, Dispatcher, Invocation};
pub use errors::RouterError;
pub use middleware::{Flow, MiddlewareRef};
pub use registry::{ParamSpec, Registry, TypeTag};
pub use router::{HandlerRef, ParamKind, ParamValue, RouteTable, Router};
pub use server::{AppService, HttpServer, Request, Response};
