//! In-memory doubles mirroring the Postgres accessors, for handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::{AppointmentStore, Doc, UserDoc, UserStore};

#[derive(Default)]
pub struct MemUserStore {
    docs: Mutex<Vec<(Uuid, Doc)>>,
}

#[async_trait]
impl UserStore for MemUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserDoc>> {
        let docs = self.docs.lock().unwrap();
        Ok(docs
            .iter()
            .find(|(_, d)| d.get("email").and_then(|v| v.as_str()) == Some(email))
            .map(|(doc_id, dados)| UserDoc {
                doc_id: *doc_id,
                dados: dados.clone(),
            }))
    }

    async fn add(&self, dados: &Doc) -> anyhow::Result<Uuid> {
        let doc_id = Uuid::new_v4();
        self.docs.lock().unwrap().push((doc_id, dados.clone()));
        Ok(doc_id)
    }

    async fn merge(&self, doc_id: Uuid, campos: &Doc) -> anyhow::Result<()> {
        let mut docs = self.docs.lock().unwrap();
        if let Some((_, dados)) = docs.iter_mut().find(|(id, _)| *id == doc_id) {
            for (campo, valor) in campos {
                dados.insert(campo.clone(), valor.clone());
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemAppointmentStore {
    docs: Mutex<Vec<(Uuid, Doc)>>,
}

#[async_trait]
impl AppointmentStore for MemAppointmentStore {
    async fn add(&self, dados: &Doc) -> anyhow::Result<Uuid> {
        let doc_id = Uuid::new_v4();
        self.docs.lock().unwrap().push((doc_id, dados.clone()));
        Ok(doc_id)
    }

    async fn find_by_date_range(&self, inicio: &str, fim: &str) -> anyhow::Result<Vec<Doc>> {
        let docs = self.docs.lock().unwrap();
        Ok(docs
            .iter()
            .filter(|(_, d)| {
                let data = d.get("data_consulta").and_then(|v| v.as_str()).unwrap_or("");
                data >= inicio && data < fim
            })
            .map(|(_, d)| d.clone())
            .collect())
    }
}
