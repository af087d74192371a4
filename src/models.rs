use std::sync::Arc;

use serde::Serialize;

use crate::reset::ResetLinkProvider;
use crate::store::{AppointmentStore, UserStore};

/// Handlers only ever see these trait objects; production wires the Postgres
/// accessors, tests wire the in-memory doubles.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub appointments: Arc<dyn AppointmentStore>,
    pub reset_links: Arc<dyn ResetLinkProvider>,
}

/* -------------------------
   API DTOs
--------------------------*/

#[derive(Debug, Serialize)]
pub struct MensagemResponse {
    pub mensagem: String,
}

impl MensagemResponse {
    pub fn new(mensagem: &str) -> Self {
        Self {
            mensagem: mensagem.to_string(),
        }
    }
}
