use axum::{
    Router,
    http::{self, HeaderName},
};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::{
    adapters::{self, http::app_state::AppState},
    infra::webhook_signature::{ASAAS_TOKEN_HEADER, STRIPE_SIGNATURE_HEADER},
};

pub fn create_app(app_state: AppState) -> Router {
    // Products and the hub UI call from arbitrary origins; auth is per-request.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([http::Method::GET, http::Method::POST, http::Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("apikey"),
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static(STRIPE_SIGNATURE_HEADER),
            HeaderName::from_static(ASAAS_TOKEN_HEADER),
        ]);

    Router::new()
        .merge(adapters::http::routes::router())
        .with_state(app_state)
        .layer(CatchPanicLayer::new())
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            http::header::X_CONTENT_TYPE_OPTIONS,
            http::HeaderValue::from_static("nosniff"),
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &http::Request<_>| {
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http-request",
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                    request_id = %request_id
                )
            }),
        )
}
