use tracing::{debug, error, info};

use super::args::{self, Invocation};
use crate::errors::RouterError;
use crate::middleware;
use crate::middleware::Flow;
use crate::registry::{Callable, Registry};
use crate::router::{HandlerRef, Router};
use crate::server::{Request, Response};

/// Request dispatcher.
///
/// Orchestrates one pass through MATCH → MIDDLEWARE → BIND → INVOKE per
/// request against an immutable [`Router`] and [`Registry`]. Failures are
/// terminal: `RouteNotFound` out of the match step, `CallbackNotFound` when
/// a handler or middleware target cannot be resolved. Both carry a message
/// and a 404-style code; the embedding layer decides how to render them.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Registry,
}

impl Dispatcher {
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Dispatcher { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Handle one request.
    ///
    /// The inbound method and path are read from the request collaborator;
    /// the handler and middleware write their output through the response
    /// collaborator. A middleware halt is a normal `Ok` outcome.
    pub fn handle(
        &self,
        router: &Router,
        request: &Request,
        response: &mut Response,
    ) -> Result<(), RouterError> {
        let method = request.method().clone();
        let path = request.path().to_string();

        let matched = router.match_route(&method, &path)?;

        // Resolve the handler before any middleware runs so an unresolvable
        // target fails with no partial side effects.
        let callable = self.resolve_handler(&matched.entry.handler, &path)?;

        debug!(
            method = %method,
            path = %path,
            middleware_count = matched.entry.middlewares.len(),
            "Dispatching matched route"
        );

        let flow = middleware::execute(
            &self.registry,
            &matched.entry.middlewares,
            request,
            response,
            &matched.params,
        )?;
        if let Flow::Halt = flow {
            info!(method = %method, path = %path, "Request halted by middleware");
            return Ok(());
        }

        let resolved = args::resolve(&callable.params, &matched.params, &matched.entry.injected);
        let mut invocation = Invocation {
            request,
            response,
            args: resolved,
        };
        (callable.func)(&mut invocation);

        info!(
            method = %method,
            path = %path,
            status = response.status_code(),
            "Handler invoked"
        );
        Ok(())
    }

    fn resolve_handler(&self, handler: &HandlerRef, path: &str) -> Result<Callable, RouterError> {
        match handler {
            HandlerRef::Inline(callable) => Ok(callable.clone()),
            HandlerRef::Method {
                controller, action, ..
            } => self
                .registry
                .action(controller, action)
                .cloned()
                .ok_or_else(|| {
                    error!(
                        controller = %controller,
                        action = %action,
                        "Handler not found in registry"
                    );
                    RouterError::no_callback(path)
                }),
            HandlerRef::Invokable { controller } => self
                .registry
                .action(controller, "invoke")
                .cloned()
                .ok_or_else(|| {
                    error!(controller = %controller, "Invokable handler not found in registry");
                    RouterError::no_callback(path)
                }),
        }
    }
}
