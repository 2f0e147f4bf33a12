//! Named-callable registry.
//!
//! The statically typed stand-in for runtime class/method lookup: handlers
//! and middleware are registered up front under a global function name or a
//! controller/action pair, each carrying the declared parameter list the
//! argument resolver binds against. A failed lookup at dispatch time is a
//! `CallbackNotFound`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::middleware::Flow;
use crate::Invocation;

/// Declared type of a formal parameter.
///
/// `Request`/`Response` mark the two framework-injected collaborator types.
/// `Untyped` is the sentinel for parameters declared without a type and
/// `Mixed` for union-typed ones; both fall through to by-name resolution,
/// the same as `Scalar`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Request,
    Response,
    Scalar,
    Untyped,
    Mixed,
}

/// One formal parameter of a registered callable: its name plus declared
/// type tag.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: String,
    pub tag: TypeTag,
}

impl ParamSpec {
    #[must_use]
    pub fn new(name: &str, tag: TypeTag) -> Self {
        ParamSpec {
            name: name.to_string(),
            tag,
        }
    }

    /// A parameter bound to the per-dispatch request instance.
    #[must_use]
    pub fn request(name: &str) -> Self {
        Self::new(name, TypeTag::Request)
    }

    /// A parameter bound to the per-dispatch response instance.
    #[must_use]
    pub fn response(name: &str) -> Self {
        Self::new(name, TypeTag::Response)
    }

    /// A scalar parameter resolved by name from path parameters.
    #[must_use]
    pub fn scalar(name: &str) -> Self {
        Self::new(name, TypeTag::Scalar)
    }

    /// A parameter declared without a type.
    #[must_use]
    pub fn untyped(name: &str) -> Self {
        Self::new(name, TypeTag::Untyped)
    }

    /// A union-typed parameter, treated as opaque.
    #[must_use]
    pub fn mixed(name: &str) -> Self {
        Self::new(name, TypeTag::Mixed)
    }
}

/// The function type all registered callables share.
///
/// Middleware signal an early halt by returning [`Flow::Halt`]; for route
/// handlers the returned flow is ignored.
pub type CallableFn = Arc<dyn Fn(&mut Invocation<'_>) -> Flow + Send + Sync>;

/// A registered callable: its declared parameters plus the function itself.
#[derive(Clone)]
pub struct Callable {
    pub params: Vec<ParamSpec>,
    pub func: CallableFn,
}

impl Callable {
    pub fn new<F>(params: Vec<ParamSpec>, func: F) -> Self
    where
        F: Fn(&mut Invocation<'_>) -> Flow + Send + Sync + 'static,
    {
        Callable {
            params,
            func: Arc::new(func),
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Registry of named global functions and controller actions.
///
/// Built once before serving starts and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    functions: HashMap<String, Callable>,
    actions: HashMap<(String, String), Callable>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a globally resolvable function.
    ///
    /// Re-registering a name replaces the previous callable.
    pub fn register_function<F>(&mut self, name: &str, params: Vec<ParamSpec>, func: F)
    where
        F: Fn(&mut Invocation<'_>) -> Flow + Send + Sync + 'static,
    {
        if self
            .functions
            .insert(name.to_string(), Callable::new(params, func))
            .is_some()
        {
            warn!(function = %name, "Replaced existing registered function");
        } else {
            info!(function = %name, total = self.functions.len(), "Function registered");
        }
    }

    /// Register a controller action.
    ///
    /// Re-registering a (controller, action) pair replaces the previous
    /// callable.
    pub fn register_action<F>(
        &mut self,
        controller: &str,
        action: &str,
        params: Vec<ParamSpec>,
        func: F,
    ) where
        F: Fn(&mut Invocation<'_>) -> Flow + Send + Sync + 'static,
    {
        let key = (controller.to_string(), action.to_string());
        if self.actions.insert(key, Callable::new(params, func)).is_some() {
            warn!(controller = %controller, action = %action, "Replaced existing registered action");
        } else {
            info!(
                controller = %controller,
                action = %action,
                total = self.actions.len(),
                "Action registered"
            );
        }
    }

    #[must_use]
    pub fn function(&self, name: &str) -> Option<&Callable> {
        self.functions.get(name)
    }

    #[must_use]
    pub fn action(&self, controller: &str, action: &str) -> Option<&Callable> {
        self.actions
            .get(&(controller.to_string(), action.to_string()))
    }
}
