use http::{Method, header::HeaderName};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use voxhook_config::{AnyOrList, CorsConfig};

/// Build a Tower CORS layer from configuration
///
/// The speech endpoints only accept `POST`, so methods are not configurable.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new().allow_methods([Method::GET, Method::POST]);

    layer = match &config.origins {
        AnyOrList::Any => layer.allow_origin(AllowOrigin::any()),
        AnyOrList::List(origins) => {
            let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            layer.allow_origin(origins)
        }
    };

    layer = match &config.headers {
        AnyOrList::Any => layer.allow_headers(AllowHeaders::any()),
        AnyOrList::List(headers) => {
            let headers: Vec<HeaderName> = headers.iter().filter_map(|h| h.parse().ok()).collect();
            layer.allow_headers(headers)
        }
    };

    if let Some(duration) = config.max_age_duration() {
        layer = layer.max_age(duration);
    }

    layer
}
