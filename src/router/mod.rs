//! # Router Module
//!
//! Route-table construction and route resolution. Paths are declared through
//! a fluent builder that scopes a prefix and a middleware chain over a block
//! of registrations; dynamic paths (`{name}` / `{type:name}` placeholders)
//! are compiled into anchored regex patterns at registration time.
//!
//! ## Matching
//!
//! Resolution is a two-step affair:
//!
//! 1. **Exact lookup** in the per-method bucket for the normalized path.
//! 2. **Dynamic scan** over pattern-bearing routes whose registered path has
//!    the same number of `/`-delimited segments as the request path, tested
//!    in registration order; the first regex match wins.
//!
//! Extracted parameter values are coerced to their declared scalar kind
//! (`int`, `float`/`double`, `bool`, default string) on the way out.
//!
//! ## Example
//!
//! ```rust,ignore
//! use corridor::router::{HandlerRef, Router};
//! use corridor::middleware::Flow;
//!
//! let mut router = Router::new();
//! router
//!     .prefix("/api")
//!     .get("/users/{int:id}", HandlerRef::method("users", "show"))
//!     .save();
//!
//! let m = router.match_route(&http::Method::GET, "/api/users/42")?;
//! ```

mod core;
pub mod pattern;

pub use core::{
    HandlerRef, ParamVec, RouteEntry, RouteMatch, RouteTable, Router, MAX_INLINE_PARAMS,
};
pub(crate) use core::normalize_path;
pub use pattern::{ParamKind, ParamValue, Placeholder, RoutePattern};
