use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Matches one `{...}` placeholder token in a registered path.
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(.+?)\}").expect("placeholder regex"));

/// Declared scalar type of a path placeholder.
///
/// Parsed from the optional `type:` prefix inside a placeholder token;
/// unknown or missing types fall back to `Str`. Both `float` and `double`
/// map to the same floating-point kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Str,
    Int,
    Float,
    Bool,
}

impl ParamKind {
    fn from_token(token: &str) -> Self {
        match token {
            "int" => ParamKind::Int,
            "float" | "double" => ParamKind::Float,
            "bool" => ParamKind::Bool,
            _ => ParamKind::Str,
        }
    }

    /// Coerce a raw captured string to this kind.
    ///
    /// Coercion is best-effort, never validating: numeric kinds parse the
    /// longest numeric prefix and fall back to zero, `bool` treats numeric
    /// strings by magnitude and otherwise compares against literal `"true"`.
    #[must_use]
    pub fn coerce(&self, raw: &str) -> ParamValue {
        match self {
            ParamKind::Int => ParamValue::Int(leading_parse::<i64>(raw).unwrap_or(0)),
            ParamKind::Float => ParamValue::Float(leading_parse::<f64>(raw).unwrap_or(0.0)),
            ParamKind::Bool => match raw.trim().parse::<f64>() {
                Ok(n) => ParamValue::Bool(n != 0.0),
                Err(_) => ParamValue::Bool(raw == "true"),
            },
            ParamKind::Str => ParamValue::Str(raw.to_string()),
        }
    }
}

/// Parse the longest prefix of `raw` that forms a valid value.
fn leading_parse<T: std::str::FromStr>(raw: &str) -> Option<T> {
    let trimmed = raw.trim();
    for end in (1..=trimmed.len()).rev() {
        if !trimmed.is_char_boundary(end) {
            continue;
        }
        if let Ok(v) = trimmed[..end].parse::<T>() {
            return Some(v);
        }
    }
    None
}

/// A typed path parameter value extracted from a matched route.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl ParamValue {
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl From<&ParamValue> for Value {
    fn from(param: &ParamValue) -> Self {
        match param {
            ParamValue::Int(v) => Value::from(*v),
            ParamValue::Float(v) => Value::from(*v),
            ParamValue::Bool(v) => Value::from(*v),
            ParamValue::Str(v) => Value::from(v.as_str()),
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Value::from(self).serialize(serializer)
    }
}

/// One placeholder descriptor, in the order it appears in the path.
#[derive(Debug, Clone)]
pub struct Placeholder {
    pub name: String,
    pub kind: ParamKind,
}

impl Placeholder {
    /// Parse a placeholder token body (`name` or `type:name`).
    fn parse(token: &str) -> Self {
        match token.split_once(':') {
            Some((ty, name)) => Placeholder {
                name: name.to_string(),
                kind: ParamKind::from_token(ty),
            },
            None => Placeholder {
                name: token.to_string(),
                kind: ParamKind::Str,
            },
        }
    }
}

/// Compiled matching expression for a dynamic route.
///
/// Every `{...}` token becomes a `(.+?)` capture and the expression is
/// anchored to the full path; static text is carried through untouched.
/// The segment-count pre-filter in the matcher keeps the permissive
/// captures from spanning `/` boundaries.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    pub regex: Regex,
    pub placeholders: Vec<Placeholder>,
}

/// Compile a registered path into a `RoutePattern`.
///
/// Returns `None` for static paths (no `{` present), which are matched by
/// exact lookup instead.
pub fn compile(path: &str) -> Option<RoutePattern> {
    if !path.contains('{') {
        return None;
    }

    let placeholders = PLACEHOLDER
        .captures_iter(path)
        .map(|cap| Placeholder::parse(&cap[1]))
        .collect();

    let pattern = format!("^{}$", PLACEHOLDER.replace_all(path, "(.+?)"));
    let regex = Regex::new(&pattern).expect("failed to compile route pattern");

    Some(RoutePattern { regex, placeholders })
}
