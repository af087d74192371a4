// src/routes/appointment_routes.rs

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::ApiError,
    models::{AppState, MensagemResponse},
    store::Doc,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/agendar_consulta", post(agendar_consulta))
}

#[derive(Debug, Deserialize)]
pub struct AgendamentoRequest {
    pub email: Option<String>,
    pub data_consulta: Option<String>,
    pub hora_consulta: Option<String>,
    pub dentista: Option<String>,
    pub procedimento: Option<String>,

    pub valor: Option<String>,
    pub forma: Option<String>,
    pub paciente: Option<String>,

    // Medical-history fields are stored verbatim, and only when supplied.
    pub relato_cliente: Option<Value>,
    pub diabetes: Option<Value>,
    pub hipertensao: Option<Value>,
    pub cardio: Option<Value>,
    pub alergias: Option<Value>,
    pub coagulacao: Option<Value>,
    pub none: Option<Value>,
    pub medication: Option<Value>,
    pub dentes_afetados: Option<Value>,
}

/// The first required field that is missing or empty is the one named in the
/// error message.
fn obrigatorio(campo: &'static str, valor: &Option<String>) -> Result<String, ApiError> {
    valor
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::BadRequest(format!("Campo '{campo}' é obrigatório.")))
}

pub async fn agendar_consulta(
    State(state): State<AppState>,
    Json(req): Json<AgendamentoRequest>,
) -> Result<(StatusCode, Json<MensagemResponse>), ApiError> {
    let email = obrigatorio("email", &req.email)?;
    let data_consulta = obrigatorio("data_consulta", &req.data_consulta)?;
    let hora_consulta = obrigatorio("hora_consulta", &req.hora_consulta)?;
    let dentista = obrigatorio("dentista", &req.dentista)?;
    let procedimento = obrigatorio("procedimento", &req.procedimento)?;

    let mut dados = Doc::new();
    dados.insert("email_paciente".into(), Value::String(email));
    dados.insert("data_consulta".into(), Value::String(data_consulta));
    dados.insert("hora_consulta".into(), Value::String(hora_consulta));
    dados.insert("dentista".into(), Value::String(dentista));
    dados.insert("procedimento".into(), Value::String(procedimento));
    // New bookings always start out pending; the store stamps the creation
    // time on insert.
    dados.insert("status".into(), Value::String("Pendente".into()));
    dados.insert(
        "valor".into(),
        Value::String(req.valor.unwrap_or_else(|| "R$ 0,00".into())),
    );
    dados.insert(
        "forma".into(),
        Value::String(req.forma.unwrap_or_else(|| "A Definir".into())),
    );
    dados.insert(
        "paciente".into(),
        Value::String(req.paciente.unwrap_or_else(|| "N/A".into())),
    );

    let historico = [
        ("relato_cliente", req.relato_cliente),
        ("diabetes", req.diabetes),
        ("hipertensao", req.hipertensao),
        ("cardio", req.cardio),
        ("alergias", req.alergias),
        ("coagulacao", req.coagulacao),
        ("none", req.none),
        ("medication", req.medication),
        ("dentes_afetados", req.dentes_afetados),
    ];
    for (campo, valor) in historico {
        if let Some(valor) = valor {
            dados.insert(campo.to_string(), valor);
        }
    }

    let doc_id = state
        .appointments
        .add(&dados)
        .await
        .map_err(|e| ApiError::internal(e, "Erro interno ao agendar consulta."))?;

    tracing::info!(%doc_id, "appointment booked");
    Ok((
        StatusCode::CREATED,
        Json(MensagemResponse::new("Agendamento realizado com sucesso.")),
    ))
}

/* ============================================================
   Tests
   ============================================================ */
