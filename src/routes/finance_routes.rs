// src/routes/finance_routes.rs

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::ApiError,
    models::AppState,
    money::{format_brl, parse_brl},
    store::Doc,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/financeiro/dados", get(dados_financeiros))
}

#[derive(Debug, Deserialize)]
pub struct FinanceiroQuery {
    pub ano: Option<i32>,
    pub mes: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct FinanceiroResponse {
    pub resumo: Resumo,
    pub pagamentos: Vec<Pagamento>,
}

#[derive(Debug, Serialize)]
pub struct Resumo {
    pub recebido: String,
    pub pendente: String,
    pub total_faturado: String,
}

#[derive(Debug, Serialize)]
pub struct Pagamento {
    pub paciente: String,
    pub servico: String,
    pub data: String,
    pub valor: String,
    pub status: String,
    pub forma: String,
}

/// Inclusive start and exclusive end of the month, as `YYYY-MM-DD` strings.
/// December rolls over into January of the next year.
fn limites_do_mes(ano: i32, mes: u32) -> anyhow::Result<(String, String)> {
    let inicio = NaiveDate::from_ymd_opt(ano, mes, 1)
        .ok_or_else(|| anyhow::anyhow!("invalid month start: {ano}-{mes}"))?;
    let fim = if mes == 12 {
        NaiveDate::from_ymd_opt(ano + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(ano, mes + 1, 1)
    }
    .ok_or_else(|| anyhow::anyhow!("invalid month end: {ano}-{mes}"))?;

    Ok((
        inicio.format("%Y-%m-%d").to_string(),
        fim.format("%Y-%m-%d").to_string(),
    ))
}

fn texto_ou<'a>(doc: &'a Doc, campo: &str, padrao: &'a str) -> &'a str {
    doc.get(campo).and_then(Value::as_str).unwrap_or(padrao)
}

pub async fn dados_financeiros(
    State(state): State<AppState>,
    Query(q): Query<FinanceiroQuery>,
) -> Result<Json<FinanceiroResponse>, ApiError> {
    // Zero is rejected like an absent parameter.
    let (Some(ano), Some(mes)) = (q.ano.filter(|a| *a != 0), q.mes.filter(|m| *m != 0)) else {
        return Err(ApiError::BadRequest("Ano e mês são obrigatórios.".into()));
    };

    let resposta = dados_no_periodo(&state, ano, mes)
        .await
        .map_err(|e| ApiError::internal(e, "Erro interno ao obter dados financeiros."))?;

    Ok(Json(resposta))
}

/// One pass over the month's appointments: parse each stored value, bucket
/// it by status and keep the itemized projection in store order. A value
/// that fails to parse aborts the whole aggregation.
async fn dados_no_periodo(
    state: &AppState,
    ano: i32,
    mes: u32,
) -> anyhow::Result<FinanceiroResponse> {
    let (inicio, fim) = limites_do_mes(ano, mes)?;
    let docs = state.appointments.find_by_date_range(&inicio, &fim).await?;

    let mut recebido: i64 = 0;
    let mut pendente: i64 = 0;
    let mut pagamentos = Vec::with_capacity(docs.len());

    for doc in &docs {
        let centavos = parse_brl(texto_ou(doc, "valor", "R$ 0,00"))?;
        let status = texto_ou(doc, "status", "Pendente");

        // Any status other than these two stays out of both totals.
        match status {
            "Pago" => recebido += centavos,
            "Pendente" => pendente += centavos,
            _ => {}
        }

        pagamentos.push(Pagamento {
            paciente: texto_ou(doc, "paciente", "N/A").to_string(),
            servico: texto_ou(doc, "procedimento", "N/A").to_string(),
            data: texto_ou(doc, "data_consulta", "N/A").to_string(),
            valor: format_brl(centavos),
            status: status.to_string(),
            forma: texto_ou(doc, "forma", "N/A").to_string(),
        });
    }

    Ok(FinanceiroResponse {
        resumo: Resumo {
            recebido: format_brl(recebido),
            pendente: format_brl(pendente),
            total_faturado: format_brl(recebido + pendente),
        },
        pagamentos,
    })
}

/* ============================================================
   Tests
   ============================================================ */
