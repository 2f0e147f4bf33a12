use http::Method;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::router::normalize_path;

/// Matches the field name in a multipart Content-Disposition header.
static CONTENT_DISPOSITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"name="([^"]+)"(; *filename="([^"]+)")?"#).expect("disposition regex"));

/// The request collaborator.
///
/// Carries the inbound method, normalized path, headers, cookies and query
/// parameters, plus a single flat key→value data map built by parsing the
/// raw body (JSON object, URL-encoded form, or multipart/form-data) and
/// merging it over the query-string parameters. Built once per request and
/// shared read-only with every middleware and the handler.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    headers: HashMap<String, String>,
    cookies: HashMap<String, String>,
    query_params: HashMap<String, String>,
    data: HashMap<String, Value>,
}

impl Request {
    /// Build a request from its transport-level parts.
    ///
    /// `target` is the raw request target including any query string;
    /// header keys are lowercased for case-insensitive lookup.
    #[must_use]
    pub fn new(
        method: Method,
        target: &str,
        headers: HashMap<String, String>,
        body: &str,
    ) -> Self {
        let headers: HashMap<String, String> = headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        let cookies = parse_cookies(&headers);
        let query_params = parse_query_params(target);
        let path = normalize_path(target.split('?').next().unwrap_or("/"));

        let mut data: HashMap<String, Value> = query_params
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        if !body.is_empty() {
            let parsed = parse_body(body);
            debug!(fields = parsed.len(), "Request body parsed");
            data.extend(parsed);
        }

        Request {
            method,
            path,
            headers,
            cookies,
            query_params,
            data,
        }
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Normalized request path: query stripped, trailing `/` removed except
    /// for the root path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Value of one request data field, or `None` if it does not exist.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// The full flat request data map.
    #[must_use]
    pub fn get_all(&self) -> &HashMap<String, Value> {
        &self.data
    }

    /// Header lookup, case-insensitive.
    #[must_use]
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// All headers, keys lowercased.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }
}

/// Parse cookies out of the `Cookie` header.
pub fn parse_cookies(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .get("cookie")
        .map(|c| {
            c.split(';')
                .filter_map(|pair| {
                    let mut parts = pair.trim().splitn(2, '=');
                    let name = parts.next()?.trim().to_string();
                    let value = parts.next().unwrap_or("").trim().to_string();
                    Some((name, value))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Parse query string parameters from a request target.
pub fn parse_query_params(target: &str) -> HashMap<String, String> {
    if let Some(pos) = target.find('?') {
        let query_str = &target[pos + 1..];
        url::form_urlencoded::parse(query_str.as_bytes())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    } else {
        HashMap::new()
    }
}

/// Normalize a raw body into a flat key→value map.
///
/// Tries a JSON object first, then multipart (detected by a leading
/// boundary line), then falls back to URL-encoded form data.
fn parse_body(raw: &str) -> HashMap<String, Value> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) {
        return map.into_iter().collect();
    }
    if raw.starts_with("--") && raw.contains("\r\n") {
        return parse_multipart(raw);
    }
    url::form_urlencoded::parse(raw.as_bytes())
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}

/// Extract form fields from a multipart/form-data body.
///
/// The boundary is taken from the first line. File parts are skipped; only
/// plain fields land in the data map.
fn parse_multipart(raw: &str) -> HashMap<String, Value> {
    let mut data = HashMap::new();
    let Some(boundary) = raw.split("\r\n").next() else {
        return data;
    };

    for part in raw.split(boundary).skip(1) {
        if part == "--\r\n" || part == "--" {
            break;
        }
        let part = part.trim_start_matches("\r\n");
        let Some((raw_headers, body)) = part.split_once("\r\n\r\n") else {
            continue;
        };

        let disposition = raw_headers
            .split("\r\n")
            .find(|h| h.to_ascii_lowercase().starts_with("content-disposition"));
        let Some(disposition) = disposition else {
            continue;
        };
        let Some(caps) = CONTENT_DISPOSITION.captures(disposition) else {
            continue;
        };
        if caps.get(3).is_some() {
            // File upload part
            continue;
        }
        let name = caps[1].to_string();
        let value = body.strip_suffix("\r\n").unwrap_or(body);
        data.insert(name, Value::String(value.to_string()));
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookies() {
        let mut h = HashMap::new();
        h.insert("cookie".to_string(), "a=b; c=d".to_string());
        let cookies = parse_cookies(&h);
        assert_eq!(cookies.get("a"), Some(&"b".to_string()));
        assert_eq!(cookies.get("c"), Some(&"d".to_string()));
    }

    #[test]
    fn test_parse_query_params() {
        let q = parse_query_params("/p?x=1&y=2");
        assert_eq!(q.get("x"), Some(&"1".to_string()));
        assert_eq!(q.get("y"), Some(&"2".to_string()));
    }

    #[test]
    fn test_json_body() {
        let data = parse_body(r#"{"name":"Ada","age":36}"#);
        assert_eq!(data.get("name"), Some(&Value::String("Ada".to_string())));
        assert_eq!(data.get("age"), Some(&serde_json::json!(36)));
    }

    #[test]
    fn test_urlencoded_body() {
        let data = parse_body("name=Ada+Lovelace&lang=en");
        assert_eq!(
            data.get("name"),
            Some(&Value::String("Ada Lovelace".to_string()))
        );
        assert_eq!(data.get("lang"), Some(&Value::String("en".to_string())));
    }

    #[test]
    fn test_multipart_body() {
        let body = "--XBOUND\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nhello\r\n--XBOUND\r\nContent-Disposition: form-data; name=\"upload\"; filename=\"a.txt\"\r\n\r\nfilebytes\r\n--XBOUND--\r\n";
        let data = parse_body(body);
        assert_eq!(data.get("title"), Some(&Value::String("hello".to_string())));
        // File parts are not merged into the data map.
        assert!(!data.contains_key("upload"));
    }

    #[test]
    fn test_body_merges_over_query() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        let req = Request::new(
            Method::POST,
            "/submit?name=query&keep=1",
            headers,
            r#"{"name":"body"}"#,
        );
        assert_eq!(req.get("name"), Some(&Value::String("body".to_string())));
        assert_eq!(req.get("keep"), Some(&Value::String("1".to_string())));
        assert_eq!(req.path(), "/submit");
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), "Bearer tok".to_string());
        let req = Request::new(Method::GET, "/", headers, "");
        assert_eq!(req.header("authorization"), Some("Bearer tok"));
        assert_eq!(req.header("AUTHORIZATION"), Some("Bearer tok"));
        assert_eq!(req.header("missing"), None);
    }
}
