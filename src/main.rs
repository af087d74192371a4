mod auth;
mod config;
mod db;
mod error;
mod models;
mod money;
mod reset;
mod routes;
mod store;

use std::sync::Arc;

use crate::{
    config::Config,
    models::AppState,
    reset::PgResetLinkProvider,
    store::postgres::{PgAppointmentStore, PgUserStore},
};

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use axum::http::header;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cfg = Config::from_env()?;
    let pool = db::connect_pg(&cfg.database_url).await?;

    let users: Arc<dyn store::UserStore> = Arc::new(PgUserStore::new(pool.clone()));
    let appointments: Arc<dyn store::AppointmentStore> =
        Arc::new(PgAppointmentStore::new(pool.clone()));
    let reset_links = Arc::new(PgResetLinkProvider::new(
        pool,
        users.clone(),
        cfg.reset_link_base.clone(),
        cfg.reset_ttl_hours,
    ));

    let state = AppState {
        users,
        appointments,
        reset_links,
    };

    // Browser clients call the API cross-origin; let preflight through.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    tracing::info!("Listening on http://{}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
