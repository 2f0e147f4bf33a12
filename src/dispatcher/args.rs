//! Per-dispatch argument resolution.
//!
//! Given a callable's declared parameter list, produces an ordered
//! name→value binding. Resolution order per parameter, first match wins:
//! the request collaborator by declared type, the response collaborator by
//! declared type, an extracted path parameter by name, and finally an
//! explicit [`ArgValue::Absent`] marker. Untyped and union-typed parameters
//! fall through to the by-name steps. Registration-time injected literals
//! are overlaid afterwards and never shadow an already-bound name.

use serde_json::Value;
use smallvec::SmallVec;

use crate::registry::{ParamSpec, TypeTag};
use crate::router::{ParamValue, ParamVec, MAX_INLINE_PARAMS};
use crate::server::{Request, Response};

/// A resolved argument value.
///
/// `Request`/`Response` are markers for the shared per-dispatch collaborator
/// instances carried on the [`Invocation`]. `Absent` is not an error;
/// callables must tolerate missing optional parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Request,
    Response,
    Path(ParamValue),
    Literal(Value),
    Absent,
}

/// Ordered name→value argument binding for one callable invocation.
#[derive(Debug, Clone, Default)]
pub struct Args {
    values: SmallVec<[(String, ArgValue); MAX_INLINE_PARAMS]>,
}

impl Args {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// True when the named parameter resolved to the explicit absence marker.
    #[must_use]
    pub fn is_absent(&self, name: &str) -> bool {
        matches!(self.get(name), Some(ArgValue::Absent))
    }

    /// String view of a path or literal argument.
    #[must_use]
    pub fn str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            ArgValue::Path(ParamValue::Str(s)) => Some(s),
            ArgValue::Literal(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            ArgValue::Path(ParamValue::Int(v)) => Some(*v),
            ArgValue::Literal(v) => v.as_i64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn float(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            ArgValue::Path(ParamValue::Float(v)) => Some(*v),
            ArgValue::Path(ParamValue::Int(v)) => Some(*v as f64),
            ArgValue::Literal(v) => v.as_f64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            ArgValue::Path(ParamValue::Bool(v)) => Some(*v),
            ArgValue::Literal(Value::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    /// JSON view of a path or literal argument.
    #[must_use]
    pub fn json(&self, name: &str) -> Option<Value> {
        match self.get(name)? {
            ArgValue::Path(param) => Some(Value::from(param)),
            ArgValue::Literal(v) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn push(&mut self, name: &str, value: ArgValue) {
        self.values.push((name.to_string(), value));
    }
}

/// Everything a callable sees for one dispatch: the shared request and
/// response collaborators plus its resolved arguments.
pub struct Invocation<'a> {
    pub request: &'a Request,
    pub response: &'a mut Response,
    pub args: Args,
}

/// Duplicate parameter names bind to the last extracted occurrence.
fn path_lookup(path_params: &ParamVec, name: &str) -> ArgValue {
    path_params
        .iter()
        .rfind(|(k, _)| k == name)
        .map(|(_, v)| ArgValue::Path(v.clone()))
        .unwrap_or(ArgValue::Absent)
}

/// Resolve a handler's arguments.
#[must_use]
pub fn resolve(
    params: &[ParamSpec],
    path_params: &ParamVec,
    injected: &[(String, Value)],
) -> Args {
    let mut args = Args::default();
    for spec in params {
        if args.contains(&spec.name) {
            continue;
        }
        let value = match spec.tag {
            TypeTag::Request => ArgValue::Request,
            TypeTag::Response => ArgValue::Response,
            TypeTag::Scalar | TypeTag::Untyped | TypeTag::Mixed => {
                path_lookup(path_params, &spec.name)
            }
        };
        args.push(&spec.name, value);
    }

    // Injected literals fill names that are missing or unresolved, never
    // names already bound from the request, response or path.
    for (name, value) in injected {
        match args.values.iter().position(|(k, _)| k == name) {
            None => args.push(name, ArgValue::Literal(value.clone())),
            Some(pos) => {
                if args.values[pos].1 == ArgValue::Absent {
                    args.values[pos].1 = ArgValue::Literal(value.clone());
                }
            }
        }
    }

    args
}

/// Resolve a middleware's arguments.
///
/// Same binder as [`resolve`], except remaining parameters pull by name
/// from the route's extracted path parameters before falling back to the
/// middleware's own literal arguments, consumed by parameter position.
#[must_use]
pub fn resolve_middleware(
    params: &[ParamSpec],
    path_params: &ParamVec,
    literals: &[Value],
) -> Args {
    let mut args = Args::default();
    for (idx, spec) in params.iter().enumerate() {
        if args.contains(&spec.name) {
            continue;
        }
        let value = match spec.tag {
            TypeTag::Request => ArgValue::Request,
            TypeTag::Response => ArgValue::Response,
            TypeTag::Scalar | TypeTag::Untyped | TypeTag::Mixed => {
                match path_lookup(path_params, &spec.name) {
                    ArgValue::Absent => literals
                        .get(idx)
                        .map(|v| ArgValue::Literal(v.clone()))
                        .unwrap_or(ArgValue::Absent),
                    found => found,
                }
            }
        };
        args.push(&spec.name, value);
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path_params() -> ParamVec {
        let mut params = ParamVec::new();
        params.push(("id".to_string(), ParamValue::Int(42)));
        params.push(("slug".to_string(), ParamValue::Str("intro".to_string())));
        params
    }

    #[test]
    fn test_request_and_response_bind_by_type() {
        let specs = vec![
            ParamSpec::request("req"),
            ParamSpec::response("res"),
            ParamSpec::scalar("id"),
        ];
        let args = resolve(&specs, &path_params(), &[]);
        assert_eq!(args.get("req"), Some(&ArgValue::Request));
        assert_eq!(args.get("res"), Some(&ArgValue::Response));
        assert_eq!(args.int("id"), Some(42));
    }

    #[test]
    fn test_untyped_and_mixed_fall_through_to_name() {
        let specs = vec![ParamSpec::untyped("slug"), ParamSpec::mixed("id")];
        let args = resolve(&specs, &path_params(), &[]);
        assert_eq!(args.str("slug"), Some("intro"));
        assert_eq!(args.int("id"), Some(42));
    }

    #[test]
    fn test_unmatched_parameter_is_absent_not_error() {
        let specs = vec![ParamSpec::scalar("missing")];
        let args = resolve(&specs, &path_params(), &[]);
        assert!(args.is_absent("missing"));
    }

    #[test]
    fn test_injected_fills_absent_but_never_overwrites() {
        let specs = vec![ParamSpec::scalar("id"), ParamSpec::scalar("apiKey")];
        let injected = vec![
            ("id".to_string(), json!(999)),
            ("apiKey".to_string(), json!("secret")),
            ("extra".to_string(), json!(true)),
        ];
        let args = resolve(&specs, &path_params(), &injected);
        // "id" came from the path; the injected 999 must not shadow it.
        assert_eq!(args.int("id"), Some(42));
        assert_eq!(args.str("apiKey"), Some("secret"));
        // Injected names that were never declared are still added.
        assert_eq!(args.bool("extra"), Some(true));
    }

    #[test]
    fn test_duplicate_path_names_bind_last_occurrence() {
        let mut params = ParamVec::new();
        params.push(("id".to_string(), ParamValue::Int(1)));
        params.push(("id".to_string(), ParamValue::Int(2)));
        let args = resolve(&[ParamSpec::scalar("id")], &params, &[]);
        assert_eq!(args.int("id"), Some(2));
    }

    #[test]
    fn test_middleware_path_params_win_over_literals() {
        let specs = vec![ParamSpec::request("request"), ParamSpec::scalar("id")];
        let literals = vec![json!("ignored"), json!("fallback")];
        let args = resolve_middleware(&specs, &path_params(), &literals);
        assert_eq!(args.get("request"), Some(&ArgValue::Request));
        assert_eq!(args.int("id"), Some(42));
    }

    #[test]
    fn test_middleware_literal_fallback_by_position() {
        let specs = vec![ParamSpec::scalar("role")];
        let literals = vec![json!("admin")];
        let args = resolve_middleware(&specs, &ParamVec::new(), &literals);
        assert_eq!(args.str("role"), Some("admin"));
    }
}
