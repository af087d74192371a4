use axum::{Json, Router, routing::get};

use crate::models::{AppState, MensagemResponse};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(home))
}

pub async fn home() -> Json<MensagemResponse> {
    Json(MensagemResponse::new("API da clínica no ar."))
}
