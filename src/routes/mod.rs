mod health;
mod results;
mod review;

use std::path::Path;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use serde::de::DeserializeOwned;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;

use crate::state::AppState;

pub use results::{GradedAnswer, SaveResultRequest};
pub use review::ReviewRequest;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(review::routes())
        .merge(results::routes())
        .merge(health::routes())
        .with_state(state)
}

/// Decodes a JSON body whatever its `Content-Type`; an empty body yields the
/// default request.
fn parse_json_body<T>(body: &[u8]) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
}

/// Static assets answer every path no API route claims.
pub fn with_static_files(app: Router, dir: &Path) -> Router {
    app.fallback_service(ServeDir::new(dir))
}

pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
