use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use folio::{Folio, RepositoryProvider};

use crate::{
    error::Result,
    middleware::{AccessGate, AppState, access_gate},
    types::{CookieConfig, HealthResponse},
};

mod admin;
mod auth;
mod contact;
mod public;

pub fn create_router<R>(
    folio: Arc<Folio<R>>,
    gate: AccessGate,
    cookie_config: CookieConfig,
) -> Router
where
    R: RepositoryProvider + 'static,
{
    let state = AppState {
        folio,
        gate: Arc::new(gate),
        cookie_config,
    };

    Router::new()
        .route("/health", get(health_handler))
        .merge(public::routes())
        .merge(contact::routes())
        .merge(auth::routes())
        .merge(admin::routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            access_gate::<R>,
        ))
        .with_state(state)
}

async fn health_handler<R>(State(state): State<AppState<R>>) -> Result<Json<HealthResponse>>
where
    R: RepositoryProvider,
{
    state.folio.health_check().await?;
    Ok(Json(HealthResponse { status: "ok" }))
}
