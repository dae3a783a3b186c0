//! CORS layer built from the configured origin allow-list.

use crate::domain::config::AllowedOrigins;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

/// Create the CORS layer, or `None` when no origins are configured.
///
/// Listed origins get any method and any header. Entries that are not valid
/// header values are skipped.
pub fn create_cors_layer(origins: &AllowedOrigins) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    Some(
        CorsLayer::new()
            .allow_origin(allowed)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_origins_disable_cors() {
        assert!(create_cors_layer(&AllowedOrigins::parse(None)).is_none());
        assert!(create_cors_layer(&AllowedOrigins::parse(Some(" , ,"))).is_none());
    }

    #[test]
    fn test_origins_enable_cors() {
        let origins = AllowedOrigins::parse(Some("http://a.local, http://b.local"));
        assert!(create_cors_layer(&origins).is_some());
    }
}
