use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::Client;
use crate::store::ClientStore;

#[derive(Debug, Clone, Serialize)]
pub struct ClientMetrics {
    pub client_id: Uuid,
    pub bmi: Option<f64>,
    pub bmr: Option<f64>,
}

/// Client lookups and the dietitian-ownership check shared by the
/// dietitian-facing operations.
#[derive(Clone)]
pub struct ClientService {
    clients: Arc<dyn ClientStore>,
}

impl ClientService {
    pub fn new(clients: Arc<dyn ClientStore>) -> Self {
        Self { clients }
    }

    pub async fn verify_dietitian_client(
        &self,
        dietitian_id: Uuid,
        client_id: Uuid,
    ) -> EngineResult<Client> {
        let client = self
            .clients
            .client(client_id)
            .await?
            .ok_or(EngineError::NotFound("client"))?;
        if client.dietitian_id != Some(dietitian_id) {
            return Err(EngineError::Unauthorized(
                "the client is not linked to this dietitian",
            ));
        }
        Ok(client)
    }

    pub async fn metrics(
        &self,
        dietitian_id: Uuid,
        client_id: Uuid,
    ) -> EngineResult<ClientMetrics> {
        let client = self.verify_dietitian_client(dietitian_id, client_id).await?;
        let today = Utc::now().date_naive();
        Ok(ClientMetrics {
            client_id,
            bmi: client.bmi(),
            bmr: client.bmr(today),
        })
    }
}
