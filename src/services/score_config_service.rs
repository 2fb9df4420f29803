use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::ComplianceScoreConfig;
use crate::store::ScoreConfigStore;

/// Resolves the score config for a plan/dietitian with a three-level
/// fallback: plan-scoped, then dietitian default, then the global default.
#[derive(Clone)]
pub struct ScoreConfigService {
    configs: Arc<dyn ScoreConfigStore>,
}

impl ScoreConfigService {
    pub fn new(configs: Arc<dyn ScoreConfigStore>) -> Self {
        Self { configs }
    }

    pub async fn resolve(
        &self,
        dietitian_id: Option<Uuid>,
        plan_id: Option<Uuid>,
    ) -> EngineResult<ComplianceScoreConfig> {
        if let Some(plan_id) = plan_id {
            if let Some(config) = self.configs.config_for_plan(plan_id).await? {
                return Ok(config);
            }
        }
        if let Some(dietitian_id) = dietitian_id {
            if let Some(config) = self.configs.config_for_dietitian(dietitian_id).await? {
                return Ok(config);
            }
        }
        if let Some(config) = self.configs.global_config().await? {
            return Ok(config);
        }
        self.seed_global_default().await
    }

    /// First-use creation of the global default. Concurrent first callers
    /// race on the (dietitian_id, plan_id) unique key; the loser re-reads
    /// the row the winner created.
    async fn seed_global_default(&self) -> EngineResult<ComplianceScoreConfig> {
        match self
            .configs
            .insert_config(ComplianceScoreConfig::global_default())
            .await
        {
            Ok(config) => {
                info!("Seeded the global default score config");
                Ok(config)
            }
            Err(EngineError::Conflict) => self
                .configs
                .global_config()
                .await?
                .ok_or(EngineError::NotFound("global score config")),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn resolve_seeds_the_global_default_once() {
        tokio_test::block_on(async {
            let store = Arc::new(MemoryStore::new());
            let service = ScoreConfigService::new(store);

            let first = service.resolve(None, None).await.unwrap();
            assert_eq!(first.mandatory_done, 10);
            assert_eq!(first.optional_done, 3);

            let second = service.resolve(Some(Uuid::new_v4()), None).await.unwrap();
            assert_eq!(second.id, first.id);
        });
    }
}
