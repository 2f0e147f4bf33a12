use serde_json::Value;

/// Map a status code to its wire reason phrase.
pub(crate) fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

/// The response collaborator.
///
/// Builder-style accumulator handlers and middleware write into; the
/// transport adapter flushes it to the wire after the dispatch completes.
/// `send()` marks the response finalized with the body serialized as JSON.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    reason: String,
    headers: Vec<(String, String)>,
    body: Option<Value>,
    sent: bool,
}

impl Default for Response {
    fn default() -> Self {
        Response {
            status: 200,
            reason: "OK".to_string(),
            headers: Vec::new(),
            body: None,
            sent: false,
        }
    }
}

impl Response {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a header.
    pub fn header(&mut self, name: &str, value: &str) -> &mut Self {
        self.headers
            .retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Set the status code and reason phrase.
    pub fn status(&mut self, code: u16, reason: &str) -> &mut Self {
        self.status = code;
        self.reason = reason.to_string();
        self
    }

    /// Set the structured response body.
    pub fn body(&mut self, body: Value) -> &mut Self {
        self.body = Some(body);
        self
    }

    /// Finalize the response. The accumulated body is serialized as JSON
    /// when the transport adapter flushes it.
    pub fn send(&mut self) -> &mut Self {
        self.sent = true;
        self
    }

    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn body_value(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// True once `send()` has been called.
    #[must_use]
    pub fn is_sent(&self) -> bool {
        self.sent
    }

    /// Serialized body bytes, empty when no body was set.
    #[must_use]
    pub fn body_bytes(&self) -> Vec<u8> {
        match &self.body {
            Some(value) => serde_json::to_vec(value).unwrap_or_default(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(404), "Not Found");
    }

    #[test]
    fn test_builder_chain() {
        let mut res = Response::new();
        res.header("Content-Type", "application/json")
            .status(201, "Created")
            .body(json!({ "ok": true }))
            .send();
        assert_eq!(res.status_code(), 201);
        assert_eq!(res.reason(), "Created");
        assert_eq!(res.get_header("content-type"), Some("application/json"));
        assert!(res.is_sent());
        assert_eq!(res.body_bytes(), br#"{"ok":true}"#.to_vec());
    }

    #[test]
    fn test_header_replaces_same_name() {
        let mut res = Response::new();
        res.header("X-Tag", "a").header("x-tag", "b");
        assert_eq!(res.headers().len(), 1);
        assert_eq!(res.get_header("X-Tag"), Some("b"));
    }
}
