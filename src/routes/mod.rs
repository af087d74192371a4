use crate::models::AppState;
use axum::Router;

pub mod appointment_routes;
pub mod finance_routes;
pub mod home_routes;
pub mod user_routes;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(user_routes::router())
        .merge(appointment_routes::router())
        .merge(finance_routes::router())
        .merge(home_routes::router())
        .with_state(state)
}
