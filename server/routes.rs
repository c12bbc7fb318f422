use std::io::Cursor;

use tiny_http::{Header, Method, Request, Response, StatusCode};

use ironsight::Classifier;

use crate::handlers;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub fn json_response(status: u16, body: String) -> Response<Cursor<Vec<u8>>> {
    let bytes = body.into_bytes();
    let len = bytes.len();
    Response::new(
        StatusCode(status),
        vec![Header::from_bytes(b"Content-Type", b"application/json").unwrap()],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

/// Every failure leaves the server as `{"error": "<message>"}` with the
/// given status, whatever stage produced it.
pub fn error_response(status: u16, message: &str) -> Response<Cursor<Vec<u8>>> {
    let body = serde_json::json!({ "error": message });
    json_response(status, body.to_string())
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    error_response(404, "not found")
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Dispatches one request to its handler and sends the response.
///
/// Handlers receive a `&mut Request` so that the dispatcher retains
/// ownership and can call `request.respond(response)` at the end.
pub fn dispatch(mut request: Request, classifier: &Classifier) {
    let method = request.method().clone();
    let url = request.url().to_owned();

    // Match on the bare path; a stray query string must not turn a valid
    // route into a 404.
    let path = match url.find('?') {
        Some(pos) => &url[..pos],
        None => url.as_str(),
    };

    let response = match (method, path) {
        (Method::Get, "/") => handlers::handle_home(classifier),
        (Method::Get, "/labels") => handlers::handle_labels(classifier),
        (Method::Post, "/predict") => handlers::handle_predict(&mut request, classifier),
        _ => not_found(),
    };

    let _ = request.respond(response);
}
