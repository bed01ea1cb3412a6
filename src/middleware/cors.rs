use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::error::{Error, Result};

/// Permissive when no origin is configured, otherwise pinned to it.
pub fn cors_layer(origin: Option<&str>) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers(Any);

    match origin {
        None => Ok(layer.allow_origin(Any)),
        Some(origin) => {
            let value = HeaderValue::from_str(origin)
                .map_err(|e| Error::Config(format!("Invalid CORS_ORIGIN '{}': {}", origin, e)))?;
            Ok(layer.allow_origin(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_origin() {
        assert!(cors_layer(Some("bad\norigin")).is_err());
        assert!(cors_layer(Some("https://exam.example.com")).is_ok());
        assert!(cors_layer(None).is_ok());
    }
}
