//! Demo controllers registered through the callable registry.

pub mod agent;
pub mod home;

use crate::registry::Registry;

/// Register every demo controller action plus the bundled middleware
/// functions.
pub fn register_all(registry: &mut Registry) {
    home::register(registry);
    agent::register(registry);
    crate::middleware::auth::register(registry);
    crate::middleware::register_request_log(registry);
}
