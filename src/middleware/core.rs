use serde_json::Value;
use tracing::debug;

use crate::dispatcher::{resolve_middleware, Invocation};
use crate::errors::RouterError;
use crate::registry::Registry;
use crate::router::ParamVec;
use crate::server::{Request, Response};

/// Outcome of one middleware call.
///
/// `Halt` short-circuits the request: the remaining middleware and the
/// route handler are skipped. Handlers also return a `Flow`, but theirs is
/// ignored by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

/// Reference to a middleware callable, resolved through the registry at
/// dispatch time.
#[derive(Debug, Clone)]
pub enum MiddlewareRef {
    /// A globally registered function.
    Named(String),
    /// A named map entry: the function plus its sole literal argument.
    NamedWithArg { name: String, arg: Value },
    /// A controller action with pre-bound positional literal arguments.
    Method {
        controller: String,
        action: String,
        args: Vec<Value>,
    },
}

impl MiddlewareRef {
    #[must_use]
    pub fn named(name: &str) -> Self {
        MiddlewareRef::Named(name.to_string())
    }

    #[must_use]
    pub fn named_with_arg(name: &str, arg: Value) -> Self {
        MiddlewareRef::NamedWithArg {
            name: name.to_string(),
            arg,
        }
    }

    #[must_use]
    pub fn method(controller: &str, action: &str, args: Vec<Value>) -> Self {
        MiddlewareRef::Method {
            controller: controller.to_string(),
            action: action.to_string(),
            args,
        }
    }

    fn describe(&self) -> String {
        match self {
            MiddlewareRef::Named(name) | MiddlewareRef::NamedWithArg { name, .. } => name.clone(),
            MiddlewareRef::Method {
                controller, action, ..
            } => format!("{controller}::{action}"),
        }
    }
}

/// Run a route's middleware chain in declaration order.
///
/// Path parameters are extracted once per dispatch and shared by every
/// middleware in the chain. Each middleware's arguments are resolved with
/// the same binder as handlers, except remaining names fall back to the
/// middleware's own literal arguments by parameter position. Returns
/// `Flow::Halt` as soon as one middleware halts; fails with
/// `CallbackNotFound` when a referenced callable is not registered.
pub fn execute(
    registry: &Registry,
    refs: &[MiddlewareRef],
    request: &Request,
    response: &mut Response,
    path_params: &ParamVec,
) -> Result<Flow, RouterError> {
    for mw in refs {
        let (callable, literals) = match mw {
            MiddlewareRef::Named(name) => (registry.function(name), Vec::new()),
            MiddlewareRef::NamedWithArg { name, arg } => {
                (registry.function(name), vec![arg.clone()])
            }
            MiddlewareRef::Method {
                controller,
                action,
                args,
            } => (registry.action(controller, action), args.clone()),
        };
        let callable = callable
            .ok_or_else(|| RouterError::middleware_not_found(&mw.describe()))?
            .clone();

        let resolved = resolve_middleware(&callable.params, path_params, &literals);
        let mut invocation = Invocation {
            request,
            response: &mut *response,
            args: resolved,
        };
        if let Flow::Halt = (callable.func)(&mut invocation) {
            debug!(middleware = %mw.describe(), "Middleware halted the request");
            return Ok(Flow::Halt);
        }
    }
    Ok(Flow::Continue)
}
