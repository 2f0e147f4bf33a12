use http::Method;
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::pattern::{self, ParamValue, RoutePattern};
use crate::errors::RouterError;
use crate::middleware::{Flow, MiddlewareRef};
use crate::registry::{Callable, ParamSpec};
use crate::Invocation;

/// Maximum number of extracted path parameters before heap allocation.
/// Most routes have well under 8 placeholders.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated storage for extracted, typed path parameters.
pub type ParamVec = SmallVec<[(String, ParamValue); MAX_INLINE_PARAMS]>;

/// Reference to the callable that services a route.
///
/// Mirrors the three registration shapes: an inline closure registered with
/// its declared parameter list, a controller/action pair resolved through
/// the registry, and a controller resolved through its default `invoke`
/// action. `Method` may carry extra registration-time literals that are
/// peeled into the route's injected dependency list at commit.
#[derive(Debug, Clone)]
pub enum HandlerRef {
    Inline(Callable),
    Method {
        controller: String,
        action: String,
        extras: Vec<Value>,
    },
    Invokable {
        controller: String,
    },
}

impl HandlerRef {
    /// An inline handler with its declared parameter list.
    pub fn inline<F>(params: Vec<ParamSpec>, func: F) -> Self
    where
        F: Fn(&mut Invocation<'_>) -> Flow + Send + Sync + 'static,
    {
        HandlerRef::Inline(Callable::new(params, func))
    }

    /// A controller/action pair resolved through the registry at dispatch.
    #[must_use]
    pub fn method(controller: &str, action: &str) -> Self {
        HandlerRef::Method {
            controller: controller.to_string(),
            action: action.to_string(),
            extras: Vec::new(),
        }
    }

    /// A controller/action pair carrying extra injected dependencies.
    ///
    /// Each extra must be a single-key JSON object mapping a parameter name
    /// to a literal value; non-conforming extras are dropped at commit.
    #[must_use]
    pub fn method_with(controller: &str, action: &str, extras: Vec<Value>) -> Self {
        HandlerRef::Method {
            controller: controller.to_string(),
            action: action.to_string(),
            extras,
        }
    }

    /// A controller resolved through its default `invoke` action.
    #[must_use]
    pub fn invokable(controller: &str) -> Self {
        HandlerRef::Invokable {
            controller: controller.to_string(),
        }
    }
}

/// One committed route definition. Immutable once merged into the table.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub handler: HandlerRef,
    pub middlewares: Vec<MiddlewareRef>,
    pub pattern: Option<RoutePattern>,
    pub injected: Vec<(String, Value)>,
}

/// Per-method route storage.
///
/// Keeps an index for exact lookup plus the entries in insertion order; the
/// dynamic-route scan depends on registration order, and overwriting a path
/// keeps its original position.
#[derive(Debug, Clone, Default)]
struct MethodBucket {
    index: HashMap<String, usize>,
    entries: Vec<(String, RouteEntry)>,
}

impl MethodBucket {
    /// Insert or overwrite. Returns true when an existing entry was replaced.
    fn insert(&mut self, path: String, entry: RouteEntry) -> bool {
        if let Some(&pos) = self.index.get(&path) {
            self.entries[pos].1 = entry;
            true
        } else {
            self.index.insert(path.clone(), self.entries.len());
            self.entries.push((path, entry));
            false
        }
    }

    fn get(&self, path: &str) -> Option<&RouteEntry> {
        self.index.get(path).map(|&pos| &self.entries[pos].1)
    }

    fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &RouteEntry)> {
        self.entries.iter().map(|(p, e)| (p.as_str(), e))
    }
}

/// The committed method → path → route mapping.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    buckets: HashMap<Method, MethodBucket>,
}

impl RouteTable {
    #[must_use]
    pub fn get(&self, method: &Method, path: &str) -> Option<&RouteEntry> {
        self.buckets.get(method).and_then(|b| b.get(path))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.values().map(|b| b.entries.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate all committed routes as (method, path, entry).
    pub fn entries(&self) -> impl Iterator<Item = (&Method, &str, &RouteEntry)> {
        self.buckets
            .iter()
            .flat_map(|(m, b)| b.iter().map(move |(p, e)| (m, p, e)))
    }

    /// Merge a foreign table into this one. Existing entries take precedence
    /// over incoming ones on key collision.
    pub fn append(&mut self, incoming: RouteTable) {
        for (method, bucket) in incoming.buckets {
            let target = self.buckets.entry(method).or_default();
            for (path, entry) in bucket.entries {
                if !target.contains(&path) {
                    target.insert(path, entry);
                }
            }
        }
    }
}

/// Request router with a fluent registration API.
///
/// Routes are staged by `route`/`get`/`post`/... together with the prefix
/// and middleware currently in scope, and become queryable immediately via
/// an internal non-resetting commit. A final `save()` closes the declaration
/// block and resets the prefix/middleware scope; `save_keeping_scope()`
/// commits without the reset.
///
/// The table is built once at startup and read-only during dispatch, so a
/// `Router` can be shared by reference across coroutines with no locking.
#[derive(Debug, Default)]
pub struct Router {
    table: RouteTable,
    prefix: String,
    middlewares: Vec<MiddlewareRef>,
    staged: HashMap<Method, Vec<(String, RouteEntry)>>,
}

/// Result of matching an inbound (method, path) pair.
#[derive(Debug)]
pub struct RouteMatch<'r> {
    pub entry: &'r RouteEntry,
    /// Extracted path parameters, coerced per their declared kind. Empty for
    /// exact (static) matches.
    pub params: ParamVec,
}

/// Strip a trailing `/` except for the root path.
pub(crate) fn normalize_path(path: &str) -> String {
    if path != "/" {
        path.trim_end_matches('/').to_string()
    } else {
        path.to_string()
    }
}

fn segment_count(path: &str) -> usize {
    path.split('/').count()
}

fn extract_params(pattern: &RoutePattern, path: &str) -> ParamVec {
    let mut params = ParamVec::new();
    if let Some(caps) = pattern.regex.captures(path) {
        for (idx, ph) in pattern.placeholders.iter().enumerate() {
            let raw = caps.get(idx + 1).map(|m| m.as_str()).unwrap_or("");
            params.push((ph.name.clone(), ph.kind.coerce(raw)));
        }
    }
    params
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the staged route prefix. Cumulative until a resetting
    /// commit clears it.
    pub fn prefix(&mut self, prefix: &str) -> &mut Self {
        self.prefix.push_str(prefix);
        self
    }

    /// Append middleware to the staged scope. Applied to routes declared
    /// until a resetting commit clears it.
    pub fn middleware(&mut self, refs: Vec<MiddlewareRef>) -> &mut Self {
        self.middlewares.extend(refs);
        self
    }

    /// Stage one path under an arbitrary set of methods, then commit without
    /// resetting the prefix/middleware scope.
    pub fn route(&mut self, path: &str, handler: HandlerRef, methods: &[Method]) -> &mut Self {
        let mut path = path.to_string();
        if !self.prefix.is_empty() {
            path = format!("{}{}", self.prefix, path);
        }
        let path = normalize_path(&path);
        let pattern = pattern::compile(&path);

        let entry = RouteEntry {
            handler,
            middlewares: self.middlewares.clone(),
            pattern,
            injected: Vec::new(),
        };
        for method in methods {
            self.staged
                .entry(method.clone())
                .or_default()
                .push((path.clone(), entry.clone()));
        }

        self.commit(false);
        self
    }

    pub fn get(&mut self, path: &str, handler: HandlerRef) -> &mut Self {
        self.route(path, handler, &[Method::GET])
    }

    pub fn post(&mut self, path: &str, handler: HandlerRef) -> &mut Self {
        self.route(path, handler, &[Method::POST])
    }

    pub fn put(&mut self, path: &str, handler: HandlerRef) -> &mut Self {
        self.route(path, handler, &[Method::PUT])
    }

    pub fn patch(&mut self, path: &str, handler: HandlerRef) -> &mut Self {
        self.route(path, handler, &[Method::PATCH])
    }

    pub fn delete(&mut self, path: &str, handler: HandlerRef) -> &mut Self {
        self.route(path, handler, &[Method::DELETE])
    }

    pub fn options(&mut self, path: &str, handler: HandlerRef) -> &mut Self {
        self.route(path, handler, &[Method::OPTIONS])
    }

    /// `route` followed by a resetting `save`.
    pub fn add(&mut self, path: &str, handler: HandlerRef, methods: &[Method]) -> &mut Self {
        self.route(path, handler, methods);
        self.save()
    }

    /// Commit staged routes and reset the prefix/middleware scope.
    pub fn save(&mut self) -> &mut Self {
        self.commit(true);
        self
    }

    /// Commit staged routes but keep the current prefix/middleware scope for
    /// subsequent declarations.
    pub fn save_keeping_scope(&mut self) -> &mut Self {
        self.commit(false);
        self
    }

    /// Merge a foreign route table; existing entries win on collision.
    pub fn append(&mut self, routes: RouteTable) -> &mut Self {
        self.table.append(routes);
        self
    }

    /// The committed route table.
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.table
    }

    /// Consume the router, returning its committed table (for `append`ing
    /// into another router).
    #[must_use]
    pub fn into_routes(self) -> RouteTable {
        self.table
    }

    /// Print all committed routes to stdout.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.table.len());
        for (method, path, entry) in self.table.entries() {
            println!(
                "[route] {method} {path} middlewares={} dynamic={}",
                entry.middlewares.len(),
                entry.pattern.is_some()
            );
        }
    }

    fn commit(&mut self, reset: bool) {
        let staged = std::mem::take(&mut self.staged);
        for (method, routes) in staged {
            let Some((path, mut entry)) = routes.into_iter().next() else {
                continue;
            };

            // Scope middleware only fills in when the route declared none of
            // its own (covers middleware() calls made after route()).
            if !self.middlewares.is_empty() && entry.middlewares.is_empty() {
                entry.middlewares = self.middlewares.clone();
            }

            // Peel handler extras into the injected dependency list.
            if let HandlerRef::Method { extras, .. } = &mut entry.handler {
                while let Some(extra) = extras.pop() {
                    match single_entry(&extra) {
                        Some((name, value)) => entry.injected.push((name, value)),
                        None => warn!(
                            method = %method,
                            path = %path,
                            "Dropped injected dependency: expected a single-key object"
                        ),
                    }
                }
            }

            // Re-key when a prefix is in scope and the staged path was built
            // before the prefix was (entirely) set.
            let key = if !self.prefix.is_empty() && !path.starts_with(&self.prefix) {
                normalize_path(&format!("{}{}", self.prefix, path))
            } else {
                path
            };

            let replaced = self
                .table
                .buckets
                .entry(method.clone())
                .or_default()
                .insert(key.clone(), entry);
            if replaced {
                debug!(method = %method, path = %key, "Route overwritten (last write wins)");
            } else {
                debug!(method = %method, path = %key, "Route committed");
            }
        }

        if reset {
            self.prefix.clear();
            self.middlewares.clear();
        }
    }

    /// Resolve an inbound (method, path) pair to a route.
    ///
    /// Exact lookup first, then dynamic candidates with the same number of
    /// `/`-delimited segments as the request path, tested in registration
    /// order. The path must already be normalized (query stripped, trailing
    /// slash removed).
    pub fn match_route(&self, method: &Method, path: &str) -> Result<RouteMatch<'_>, RouterError> {
        debug!(method = %method, path = %path, "Route match attempt");

        let bucket = self
            .table
            .buckets
            .get(method)
            .ok_or_else(|| RouterError::RouteNotFound {
                path: path.to_string(),
            })?;

        if let Some(entry) = bucket.get(path) {
            info!(method = %method, path = %path, "Route matched (exact)");
            return Ok(RouteMatch {
                entry,
                params: ParamVec::new(),
            });
        }

        let request_segments = segment_count(path);
        for (route_path, entry) in bucket.iter() {
            let Some(pattern) = &entry.pattern else {
                continue;
            };
            if segment_count(route_path) != request_segments {
                continue;
            }
            if pattern.regex.is_match(path) {
                let params = extract_params(pattern, path);
                info!(
                    method = %method,
                    path = %path,
                    route_pattern = %route_path,
                    path_params = ?params,
                    "Route matched (dynamic)"
                );
                return Ok(RouteMatch { entry, params });
            }
        }

        warn!(method = %method, path = %path, "No route matched");
        Err(RouterError::RouteNotFound {
            path: path.to_string(),
        })
    }
}

/// Destructure a single-key JSON object into its (name, value) pair.
fn single_entry(value: &Value) -> Option<(String, Value)> {
    let map = value.as_object()?;
    if map.len() != 1 {
        return None;
    }
    map.iter().next().map(|(k, v)| (k.clone(), v.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/users/"), "/users");
        assert_eq!(normalize_path("/users"), "/users");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_segment_count() {
        assert_eq!(segment_count("/"), 2);
        assert_eq!(segment_count("/users"), 2);
        assert_eq!(segment_count("/users/42"), 3);
    }

    #[test]
    fn test_single_entry() {
        assert_eq!(
            single_entry(&serde_json::json!({ "apiKey": "secret" })),
            Some(("apiKey".to_string(), serde_json::json!("secret")))
        );
        assert_eq!(single_entry(&serde_json::json!({ "a": 1, "b": 2 })), None);
        assert_eq!(single_entry(&serde_json::json!("plain")), None);
    }
}
