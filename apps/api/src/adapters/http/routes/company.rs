//! Public company lookups: branding and backend server resolution.
//! Both accept the company id as a query parameter (GET) or JSON body (POST).

use super::common::*;
use axum::response::Response;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/resolve-server",
            get(resolve_server_query).post(resolve_server_body),
        )
        .route(
            "/get-company-branding",
            get(branding_query).post(branding_body),
        )
}

async fn resolve_server(app_state: &AppState, company: CompanyRef) -> AppResult<Response> {
    let company_id = required_uuid("company_id", company.company_id.as_deref())?;
    let resolution = app_state.company_use_cases.resolve_server(company_id).await?;
    Ok(cached_json(CACHE_PUBLIC_60, resolution).into_response())
}

async fn branding(app_state: &AppState, company: CompanyRef) -> AppResult<Response> {
    let company_id = required_uuid("company_id", company.company_id.as_deref())?;
    let branding = app_state.company_use_cases.get_branding(company_id).await?;
    Ok(cached_json(CACHE_PUBLIC_300, branding).into_response())
}

/// GET /resolve-server?company_id=
async fn resolve_server_query(
    State(app_state): State<AppState>,
    Query(company): Query<CompanyRef>,
) -> AppResult<Response> {
    resolve_server(&app_state, company).await
}

/// POST /resolve-server
async fn resolve_server_body(
    State(app_state): State<AppState>,
    payload: Result<Json<CompanyRef>, JsonRejection>,
) -> AppResult<Response> {
    resolve_server(&app_state, json_body(payload)?).await
}

/// GET /get-company-branding?company_id=
async fn branding_query(
    State(app_state): State<AppState>,
    Query(company): Query<CompanyRef>,
) -> AppResult<Response> {
    branding(&app_state, company).await
}

/// POST /get-company-branding
async fn branding_body(
    State(app_state): State<AppState>,
    payload: Result<Json<CompanyRef>, JsonRejection>,
) -> AppResult<Response> {
    branding(&app_state, json_body(payload)?).await
}
