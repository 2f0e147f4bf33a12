use http::Method;
use may_minihttp::{HttpService, Request as HttpRequest, Response as HttpResponse};
use std::collections::HashMap;
use std::io;
use std::io::Read;
use std::sync::Arc;
use tracing::{info, warn};

use super::request::Request;
use super::response::{status_reason, Response};
use crate::dispatcher::Dispatcher;
use crate::errors::RouterError;
use crate::router::Router;

/// Transport adapter tying the router and dispatcher to `may_minihttp`.
///
/// The router and dispatcher are built before serving starts and shared
/// immutably across connection coroutines; all per-request state lives in
/// the `Request`/`Response` collaborators created here.
#[derive(Clone)]
pub struct AppService {
    pub router: Arc<Router>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppService {
    #[must_use]
    pub fn new(router: Arc<Router>, dispatcher: Arc<Dispatcher>) -> Self {
        AppService { router, dispatcher }
    }
}

/// Extract our request collaborator from a raw `may_minihttp` request.
fn parse_request(req: HttpRequest) -> Request {
    let method = Method::from_bytes(req.method().as_bytes()).unwrap_or(Method::GET);
    let target = req.path().to_string();

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_string(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let mut body = String::new();
    let _ = req.body().read_to_string(&mut body);

    Request::new(method, &target, headers, &body)
}

/// Flush an accumulated response collaborator to the wire.
fn write_response(out: &mut HttpResponse, response: &Response) {
    let status = response.status_code();
    out.status_code(status as usize, status_reason(status));

    let mut has_content_type = false;
    for (name, value) in response.headers() {
        if name.eq_ignore_ascii_case("content-type") {
            has_content_type = true;
        }
        let header = format!("{name}: {value}").into_boxed_str();
        out.header(Box::leak(header));
    }
    if response.body_value().is_some() {
        if !has_content_type {
            out.header("Content-Type: application/json");
        }
        out.body_vec(response.body_bytes());
    }
}

/// Render a terminal routing failure: 404 with the message verbatim.
fn write_error(out: &mut HttpResponse, err: &RouterError) {
    out.status_code(err.code() as usize, status_reason(err.code()));
    out.header("Content-Type: text/plain");
    out.body_vec(err.to_string().into_bytes());
}

impl HttpService for AppService {
    fn call(&mut self, req: HttpRequest, res: &mut HttpResponse) -> io::Result<()> {
        let request = parse_request(req);
        let mut response = Response::new();

        match self.dispatcher.handle(&self.router, &request, &mut response) {
            Ok(()) => {
                info!(
                    method = %request.method(),
                    path = %request.path(),
                    status = response.status_code(),
                    "Request completed"
                );
                write_response(res, &response);
            }
            Err(err) => {
                warn!(
                    method = %request.method(),
                    path = %request.path(),
                    error = %err,
                    code = err.code(),
                    "Request failed"
                );
                write_error(res, &err);
            }
        }
        Ok(())
    }
}
