//! Response headers for relayed images.
//!
//! # Design Decisions
//! - Relayed images are never cacheable, by browsers or intermediaries
//! - Only `Content-Type` is taken from the upstream; no other upstream
//!   header reaches the client

use axum::http::{header, HeaderMap, HeaderValue};

pub const NO_CACHE: &str = "no-cache, no-store, must-revalidate";

/// Cache suppression headers sent with every relayed image.
pub fn no_cache_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(4);
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    headers
}

/// Headers for a relayed image of type `content_type`.
pub fn image_headers(content_type: HeaderValue) -> HeaderMap {
    let mut headers = no_cache_headers();
    headers.insert(header::CONTENT_TYPE, content_type);
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_headers() {
        let headers = image_headers(HeaderValue::from_static("image/gif"));
        assert_eq!(headers.len(), 4);
        assert_eq!(headers[header::CONTENT_TYPE], "image/gif");
        assert_eq!(headers[header::CACHE_CONTROL], NO_CACHE);
        assert_eq!(headers[header::PRAGMA], "no-cache");
        assert_eq!(headers[header::EXPIRES], "0");
    }
}
