//! # Dispatcher Module
//!
//! Per-request orchestration: MATCH → MIDDLEWARE → BIND → INVOKE.
//!
//! ## Request Flow
//!
//! 1. The router resolves the inbound (method, path) pair to a route,
//!    extracting typed path parameters.
//! 2. The route's handler is resolved against the registry up front, so an
//!    unresolvable target fails before any middleware output is produced.
//! 3. The middleware chain runs in registration order; any middleware may
//!    halt the request, which skips the rest of the chain and the handler
//!    and is a normal outcome, not an error.
//! 4. The argument resolver binds the handler's declared parameters to the
//!    request/response collaborators, extracted path parameters, and
//!    registration-time injected literals.
//! 5. The handler is invoked with the resolved [`Invocation`].
//!
//! ## Error Handling
//!
//! There is no retry; `RouteNotFound` and `CallbackNotFound` propagate to
//! the caller of [`Dispatcher::handle`] with a message and a 404-style
//! code. The dispatcher never writes status codes itself — that is the
//! response collaborator's job.

pub mod args;
mod core;

pub use args::{resolve, resolve_middleware, ArgValue, Args, Invocation};
pub use core::Dispatcher;
