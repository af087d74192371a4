use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use super::{AppointmentStore, Doc, UserDoc, UserStore};

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserDoc>> {
        let row: Option<(Uuid, Value)> = sqlx::query_as(
            r#"
            SELECT doc_id, dados
            FROM usuario
            WHERE dados->>'email' = $1
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((doc_id, dados)) => Ok(Some(UserDoc {
                doc_id,
                dados: as_object(dados)?,
            })),
            None => Ok(None),
        }
    }

    async fn add(&self, dados: &Doc) -> anyhow::Result<Uuid> {
        let (doc_id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO usuario (dados)
            VALUES ($1)
            RETURNING doc_id
            "#,
        )
        .bind(Value::Object(dados.clone()))
        .fetch_one(&self.pool)
        .await?;

        Ok(doc_id)
    }

    async fn merge(&self, doc_id: Uuid, campos: &Doc) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE usuario
            SET dados = dados || $2
            WHERE doc_id = $1
            "#,
        )
        .bind(doc_id)
        .bind(Value::Object(campos.clone()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[derive(Clone)]
pub struct PgAppointmentStore {
    pool: PgPool,
}

impl PgAppointmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentStore for PgAppointmentStore {
    async fn add(&self, dados: &Doc) -> anyhow::Result<Uuid> {
        let (doc_id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO agendamento (dados)
            VALUES ($1)
            RETURNING doc_id
            "#,
        )
        .bind(Value::Object(dados.clone()))
        .fetch_one(&self.pool)
        .await?;

        Ok(doc_id)
    }

    async fn find_by_date_range(&self, inicio: &str, fim: &str) -> anyhow::Result<Vec<Doc>> {
        let rows: Vec<(Value,)> = sqlx::query_as(
            r#"
            SELECT dados
            FROM agendamento
            WHERE dados->>'data_consulta' >= $1
              AND dados->>'data_consulta' < $2
            "#,
        )
        .bind(inicio)
        .bind(fim)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|(dados,)| as_object(dados)).collect()
    }
}

fn as_object(valor: Value) -> anyhow::Result<Doc> {
    match valor {
        Value::Object(m) => Ok(m),
        other => anyhow::bail!("stored document is not a JSON object: {other}"),
    }
}
