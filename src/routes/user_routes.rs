// src/routes/user_routes.rs

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    auth::{hash_password, verify_password},
    error::ApiError,
    models::{AppState, MensagemResponse},
    store::Doc,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cadastrar_usuario", post(cadastrar_usuario))
        .route("/completar_perfil", post(completar_perfil))
        .route("/login_usuario", post(login_usuario))
        .route("/recuperar-senha", post(recuperar_senha))
}

/// Required fields are rejected both when missing and when empty.
fn preenchido(valor: Option<String>) -> Option<String> {
    valor.filter(|v| !v.is_empty())
}

/* ============================================================
   Registration
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct CadastroRequest {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub senha: Option<String>,
}

pub async fn cadastrar_usuario(
    State(state): State<AppState>,
    Json(req): Json<CadastroRequest>,
) -> Result<(StatusCode, Json<MensagemResponse>), ApiError> {
    let (Some(nome), Some(email), Some(senha)) = (
        preenchido(req.nome),
        preenchido(req.email),
        preenchido(req.senha),
    ) else {
        return Err(ApiError::BadRequest("Campos obrigatórios faltando.".into()));
    };

    // Lookup and insert are not atomic: two concurrent registrations for the
    // same address can both pass this check.
    let existente = state
        .users
        .find_by_email(&email)
        .await
        .map_err(|e| ApiError::internal(e, "Erro interno ao cadastrar usuário."))?;
    if existente.is_some() {
        return Err(ApiError::Conflict("E-mail já cadastrado.".into()));
    }

    let senha_hash = match hash_password(&senha) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!(error = %e, "hash_password failed");
            return Err(ApiError::Internal(
                "Erro interno ao cadastrar usuário.".into(),
            ));
        }
    };

    let mut dados = Doc::new();
    dados.insert("nome".into(), Value::String(nome));
    dados.insert("email".into(), Value::String(email));
    dados.insert("senha".into(), Value::String(senha_hash));

    let doc_id = state
        .users
        .add(&dados)
        .await
        .map_err(|e| ApiError::internal(e, "Erro interno ao cadastrar usuário."))?;

    tracing::info!(%doc_id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MensagemResponse::new("Usuário cadastrado com sucesso.")),
    ))
}

/* ============================================================
   Profile completion
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct PerfilRequest {
    pub email: Option<String>,
    pub cpf: Option<String>,
    pub telefone: Option<String>,
    pub data_nascimento: Option<String>,
    pub sexo: Option<String>,
    pub endereco: Option<String>,
    pub plano: Option<String>,
    pub quick_notes: Option<String>,
}

pub async fn completar_perfil(
    State(state): State<AppState>,
    Json(req): Json<PerfilRequest>,
) -> Result<Json<MensagemResponse>, ApiError> {
    let Some(email) = preenchido(req.email) else {
        return Err(ApiError::BadRequest("E-mail é obrigatório.".into()));
    };

    let usuario = state
        .users
        .find_by_email(&email)
        .await
        .map_err(|e| ApiError::internal(e, "Erro interno ao atualizar perfil."))?
        .ok_or_else(|| ApiError::NotFound("Usuário não encontrado.".into()))?;

    // Only fields present in the request reach the document; absent ones are
    // never written, not even as nulls.
    let mut campos = Doc::new();
    let opcionais = [
        ("cpf", req.cpf),
        ("telefone", req.telefone),
        ("data_nascimento", req.data_nascimento),
        ("sexo", req.sexo),
        ("endereco", req.endereco),
        ("plano", req.plano),
        ("quick_notes", req.quick_notes),
    ];
    for (campo, valor) in opcionais {
        if let Some(valor) = valor {
            campos.insert(campo.to_string(), Value::String(valor));
        }
    }

    state
        .users
        .merge(usuario.doc_id, &campos)
        .await
        .map_err(|e| ApiError::internal(e, "Erro interno ao atualizar perfil."))?;

    Ok(Json(MensagemResponse::new("Perfil atualizado com sucesso.")))
}

/* ============================================================
   Login
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub senha: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub mensagem: String,
    pub usuario: Doc,
}

pub async fn login_usuario(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (Some(email), Some(senha)) = (preenchido(req.email), preenchido(req.senha)) else {
        return Err(ApiError::BadRequest("Email e senha obrigatórios.".into()));
    };

    let usuario = state
        .users
        .find_by_email(&email)
        .await
        .map_err(|e| ApiError::internal(e, "Erro interno ao efetuar login."))?
        .ok_or_else(ApiError::invalid_credentials)?;

    let Some(senha_hash) = usuario.dados.get("senha").and_then(Value::as_str) else {
        return Err(ApiError::invalid_credentials());
    };
    if !verify_password(&senha, senha_hash) {
        return Err(ApiError::invalid_credentials());
    }

    // The stored hash never leaves the server.
    let mut dados = usuario.dados;
    dados.remove("senha");

    Ok(Json(LoginResponse {
        mensagem: "Login válido".to_string(),
        usuario: dados,
    }))
}

/* ============================================================
   Password recovery
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct RecuperarSenhaRequest {
    pub email: Option<String>,
}

pub async fn recuperar_senha(
    State(state): State<AppState>,
    Json(req): Json<RecuperarSenhaRequest>,
) -> Result<Json<MensagemResponse>, ApiError> {
    let Some(email) = preenchido(req.email) else {
        return Err(ApiError::BadRequest("O e-mail é obrigatório.".into()));
    };

    // Unknown address, generation failure and delivery failure all look the
    // same to the caller.
    if let Err(e) = state.reset_links.send_reset_link(&email).await {
        tracing::warn!(error = %e, "reset link generation failed");
        return Err(ApiError::BadRequest(
            "Não foi possível enviar o e-mail. Por favor, verifique se o endereço está correto e tente novamente."
                .into(),
        ));
    }

    Ok(Json(MensagemResponse::new(
        "Link de redefinição de senha enviado para o seu e-mail.",
    )))
}

/* ============================================================
   Tests
   ============================================================ */

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::reset::ResetLinkProvider;
    use crate::store::memory::{MemAppointmentStore, MemUserStore};

    struct StubResetProvider {
        ok: bool,
    }

    #[async_trait]
    impl ResetLinkProvider for StubResetProvider {
        async fn send_reset_link(&self, _email: &str) -> anyhow::Result<()> {
            if self.ok {
                Ok(())
            } else {
                anyhow::bail!("address not recognized")
            }
        }
    }

    fn test_state(reset_ok: bool) -> AppState {
        AppState {
            users: Arc::new(MemUserStore::default()),
            appointments: Arc::new(MemAppointmentStore::default()),
            reset_links: Arc::new(StubResetProvider { ok: reset_ok }),
        }
    }

    fn cadastro(nome: &str, email: &str, senha: &str) -> CadastroRequest {
        CadastroRequest {
            nome: Some(nome.into()),
            email: Some(email.into()),
            senha: Some(senha.into()),
        }
    }

    fn perfil(email: &str) -> PerfilRequest {
        PerfilRequest {
            email: Some(email.into()),
            cpf: None,
            telefone: None,
            data_nascimento: None,
            sexo: None,
            endereco: None,
            plano: None,
            quick_notes: None,
        }
    }

    async fn registrar(state: &AppState, nome: &str, email: &str, senha: &str) {
        let (status, _) =
            cadastrar_usuario(State(state.clone()), Json(cadastro(nome, email, senha)))
                .await
                .expect("registration should succeed");
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn register_then_login_succeeds() {
        let state = test_state(true);
        registrar(&state, "Ana", "ana@exemplo.com", "s3nha-forte").await;

        let Json(resp) = login_usuario(
            State(state.clone()),
            Json(LoginRequest {
                email: Some("ana@exemplo.com".into()),
                senha: Some("s3nha-forte".into()),
            }),
        )
        .await
        .expect("login should succeed");

        assert_eq!(resp.mensagem, "Login válido");
        assert_eq!(resp.usuario.get("nome").and_then(Value::as_str), Some("Ana"));
    }

    #[tokio::test]
    async fn login_response_never_carries_the_hash() {
        let state = test_state(true);
        registrar(&state, "Ana", "ana@exemplo.com", "s3nha-forte").await;

        let Json(resp) = login_usuario(
            State(state.clone()),
            Json(LoginRequest {
                email: Some("ana@exemplo.com".into()),
                senha: Some("s3nha-forte".into()),
            }),
        )
        .await
        .unwrap();

        assert!(!resp.usuario.contains_key("senha"));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let state = test_state(true);
        registrar(&state, "Ana", "ana@exemplo.com", "s3nha-forte").await;

        let err = cadastrar_usuario(
            State(state.clone()),
            Json(cadastro("Outra Ana", "ana@exemplo.com", "outra-senha")),
        )
        .await
        .unwrap_err();

        match err {
            ApiError::Conflict(msg) => assert_eq!(msg, "E-mail já cadastrado."),
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_or_empty_registration_fields_are_rejected() {
        let state = test_state(true);

        for req in [
            CadastroRequest {
                nome: None,
                email: Some("a@b.c".into()),
                senha: Some("x".into()),
            },
            CadastroRequest {
                nome: Some("Ana".into()),
                email: Some("".into()),
                senha: Some("x".into()),
            },
        ] {
            let err = cadastrar_usuario(State(state.clone()), Json(req))
                .await
                .unwrap_err();
            match err {
                ApiError::BadRequest(msg) => assert_eq!(msg, "Campos obrigatórios faltando."),
                other => panic!("expected BadRequest, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable() {
        let state = test_state(true);
        registrar(&state, "Ana", "ana@exemplo.com", "s3nha-forte").await;

        let senha_errada = login_usuario(
            State(state.clone()),
            Json(LoginRequest {
                email: Some("ana@exemplo.com".into()),
                senha: Some("chute".into()),
            }),
        )
        .await
        .unwrap_err();

        let email_desconhecido = login_usuario(
            State(state.clone()),
            Json(LoginRequest {
                email: Some("ninguem@exemplo.com".into()),
                senha: Some("chute".into()),
            }),
        )
        .await
        .unwrap_err();

        match (senha_errada, email_desconhecido) {
            (ApiError::Unauthorized(a), ApiError::Unauthorized(b)) => assert_eq!(a, b),
            other => panic!("expected two Unauthorized errors, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn profile_merge_touches_only_supplied_fields() {
        let state = test_state(true);
        registrar(&state, "Ana", "ana@exemplo.com", "s3nha-forte").await;

        completar_perfil(
            State(state.clone()),
            Json(PerfilRequest {
                cpf: Some("123.456.789-00".into()),
                ..perfil("ana@exemplo.com")
            }),
        )
        .await
        .expect("first update should succeed");

        completar_perfil(
            State(state.clone()),
            Json(PerfilRequest {
                telefone: Some("123".into()),
                ..perfil("ana@exemplo.com")
            }),
        )
        .await
        .expect("second update should succeed");

        let doc = state
            .users
            .find_by_email("ana@exemplo.com")
            .await
            .unwrap()
            .unwrap()
            .dados;
        assert_eq!(
            doc.get("cpf").and_then(Value::as_str),
            Some("123.456.789-00")
        );
        assert_eq!(doc.get("telefone").and_then(Value::as_str), Some("123"));
        assert_eq!(doc.get("nome").and_then(Value::as_str), Some("Ana"));
        assert!(!doc.contains_key("endereco"));
    }

    #[tokio::test]
    async fn profile_update_for_unknown_email_is_not_found() {
        let state = test_state(true);

        let err = completar_perfil(State(state.clone()), Json(perfil("ninguem@exemplo.com")))
            .await
            .unwrap_err();

        match err {
            ApiError::NotFound(msg) => assert_eq!(msg, "Usuário não encontrado."),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn recovery_reports_success_generically() {
        let state = test_state(true);
        let Json(resp) = recuperar_senha(
            State(state.clone()),
            Json(RecuperarSenhaRequest {
                email: Some("ana@exemplo.com".into()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(
            resp.mensagem,
            "Link de redefinição de senha enviado para o seu e-mail."
        );
    }

    #[tokio::test]
    async fn recovery_failure_is_a_generic_bad_request() {
        let state = test_state(false);
        let err = recuperar_senha(
            State(state.clone()),
            Json(RecuperarSenhaRequest {
                email: Some("ana@exemplo.com".into()),
            }),
        )
        .await
        .unwrap_err();

        match err {
            ApiError::BadRequest(msg) => {
                assert!(msg.starts_with("Não foi possível enviar o e-mail."));
                assert!(!msg.contains("address not recognized"));
            }
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn recovery_without_email_is_rejected() {
        let state = test_state(true);
        let err = recuperar_senha(State(state.clone()), Json(RecuperarSenhaRequest { email: None }))
            .await
            .unwrap_err();

        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "O e-mail é obrigatório."),
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }
}
