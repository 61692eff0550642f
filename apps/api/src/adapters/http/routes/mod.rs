mod assets;
mod billing_webhook;
mod common;
mod company;
mod contacts;
mod cross_token;
mod health;
mod partner;
mod permission;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(billing_webhook::router())
        .merge(permission::router())
        .merge(cross_token::router())
        .merge(company::router())
        .merge(contacts::router())
        .merge(partner::router())
        .merge(assets::router())
}
