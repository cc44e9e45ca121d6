use std::io::Cursor;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::state::StudioState;
use crate::handlers;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn header(name: &[u8], value: &[u8]) -> Header {
    // Only called with static ASCII names and values.
    Header::from_bytes(name, value).expect("static header is valid")
}

pub fn html_response(body: String) -> Response<Cursor<Vec<u8>>> {
    html_with_status(StatusCode(200), body)
}

pub fn html_with_status(status: StatusCode, body: String) -> Response<Cursor<Vec<u8>>> {
    let bytes = body.into_bytes();
    let len = bytes.len();
    Response::new(
        status,
        vec![header(b"Content-Type", b"text/html; charset=utf-8")],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    let body = b"404 Not Found".to_vec();
    let len = body.len();
    Response::new(
        StatusCode(404),
        vec![header(b"Content-Type", b"text/plain")],
        Cursor::new(body),
        Some(len),
        None,
    )
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Dispatches one request to its handler and sends the response.
pub fn dispatch(mut request: Request, state: &StudioState) {
    let method = request.method().clone();
    let url    = request.url().to_owned();
    let path   = url.split('?').next().unwrap_or("").to_owned();

    let response = match (method, path.as_str()) {
        (Method::Get,  "/")         => handlers::diagnose::handle_get(state),
        (Method::Post, "/diagnose") => handlers::diagnose::handle_post(&mut request, state),
        _ => not_found(),
    };

    if let Err(e) = request.respond(response) {
        tracing::warn!(error = %e, "failed to send response");
    }
}
