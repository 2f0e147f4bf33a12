use std::fmt;

/// Terminal routing failure
///
/// Both variants are surfaced to the caller of `Dispatcher::handle` and map
/// to a 404-style code. The embedding layer decides how to render them; the
/// reference behavior is to write the message verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// No method bucket exists for the request method, or no exact/dynamic
    /// path matched the request path.
    RouteNotFound {
        /// The normalized request path that failed to match
        path: String,
    },
    /// The matched route's handler, or a middleware in its chain, could not
    /// be resolved to a registered callable.
    CallbackNotFound {
        /// Human-readable description of the unresolvable target
        message: String,
    },
}

impl RouterError {
    /// Numeric code carried by the failure. 404 is used uniformly.
    #[must_use]
    pub fn code(&self) -> u16 {
        404
    }

    pub(crate) fn no_callback(path: &str) -> Self {
        RouterError::CallbackNotFound {
            message: format!("Unable to execute callback for {path}"),
        }
    }

    pub(crate) fn middleware_not_found(target: &str) -> Self {
        RouterError::CallbackNotFound {
            message: format!("Middleware method {target} not found"),
        }
    }
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::RouteNotFound { path } => write!(f, "Route {path} not found"),
            RouterError::CallbackNotFound { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for RouterError {}
