// src/middleware/etag.rs

use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{Method, StatusCode, header},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};

// Camada de cache por ETag: calcula o hash do corpo de respostas 200 de GET
// e devolve 304 quando o If-None-Match do cliente já bate.
pub async fn etag_middleware(request: Request, next: Next) -> Response {
    let is_get = request.method() == Method::GET;
    let if_none_match = request
        .headers()
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let response = next.run(request).await;

    if !is_get || response.status() != StatusCode::OK {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        // corpo em streaming que não coube: devolve sem ETag
        Err(_) => return Response::from_parts(parts, Body::empty()),
    };

    let etag = body_etag(&bytes);

    if let Some(candidates) = if_none_match {
        if none_match(&candidates, &etag) {
            let mut not_modified = Response::new(Body::empty());
            *not_modified.status_mut() = StatusCode::NOT_MODIFIED;
            if let Ok(value) = etag.parse() {
                not_modified.headers_mut().insert(header::ETAG, value);
            }
            return not_modified;
        }
    }

    parts.headers.remove(header::CONTENT_LENGTH);
    if let Ok(value) = etag.parse() {
        parts.headers.insert(header::ETAG, value);
    }
    Response::from_parts(parts, Body::from(bytes))
}

fn body_etag(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    format!("\"{hex}\"")
}

// If-None-Match pode trazer uma lista de candidatos ou o curinga "*"
fn none_match(header_value: &str, etag: &str) -> bool {
    header_value
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || candidate == etag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn etag_is_stable_and_quoted() {
        let a = body_etag(b"{\"status\":200}");
        let b = body_etag(b"{\"status\":200}");
        assert_eq!(a, b);
        assert!(a.starts_with('"') && a.ends_with('"'));
    }

    #[test]
    fn different_bodies_differ() {
        assert_ne!(body_etag(b"a"), body_etag(b"b"));
    }

    #[test]
    fn none_match_handles_lists_and_wildcard() {
        let etag = body_etag(b"payload");
        assert!(none_match(&etag, &etag));
        assert!(none_match(&format!("\"outro\", {etag}"), &etag));
        assert!(none_match("*", &etag));
        assert!(!none_match("\"outro\"", &etag));
    }
}
