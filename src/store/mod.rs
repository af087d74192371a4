use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

pub mod postgres;

#[cfg(test)]
pub mod memory;

/// A stored document: schema-flexible JSON fields keyed by name.
pub type Doc = Map<String, Value>;

#[derive(Debug, Clone)]
pub struct UserDoc {
    pub doc_id: Uuid,
    pub dados: Doc,
}

/// Accessor for the user collection, queried by the `email` field.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserDoc>>;

    async fn add(&self, dados: &Doc) -> anyhow::Result<Uuid>;

    /// Merge-update: only the supplied keys are written, everything else in
    /// the document is left untouched.
    async fn merge(&self, doc_id: Uuid, campos: &Doc) -> anyhow::Result<()>;
}

/// Accessor for the appointment collection.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Insert one appointment. The store stamps the creation time with its
    /// own clock at commit.
    async fn add(&self, dados: &Doc) -> anyhow::Result<Uuid>;

    /// All appointments whose `data_consulta` falls in `[inicio, fim)`.
    /// The field holds fixed-width `YYYY-MM-DD` text, so the store's string
    /// comparison is chronological.
    async fn find_by_date_range(&self, inicio: &str, fim: &str) -> anyhow::Result<Vec<Doc>>;
}
