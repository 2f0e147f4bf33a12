pub mod auth;
mod core;
mod log;

pub use core::{execute, Flow, MiddlewareRef};
pub use log::register_request_log;
