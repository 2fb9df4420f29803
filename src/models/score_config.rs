use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::ComplianceStatus;

/// Seed values for the lazily-created global default config.
pub const DEFAULT_MANDATORY_DONE: i32 = 10;
pub const DEFAULT_MANDATORY_ALTERNATIVE: i32 = 7;
pub const DEFAULT_MANDATORY_SKIPPED: i32 = 0;
pub const DEFAULT_OPTIONAL_DONE: i32 = 3;
pub const DEFAULT_OPTIONAL_SKIPPED: i32 = 0;

/// Point values used to turn compliance marks into percentages.
///
/// Scoped to exactly one of: a plan (both ids set), a dietitian (plan id
/// null), or the global default (both null). Unique per
/// (dietitian_id, plan_id).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ComplianceScoreConfig {
    pub id: Uuid,
    pub dietitian_id: Option<Uuid>,
    pub plan_id: Option<Uuid>,
    pub mandatory_done: i32,
    pub mandatory_alternative: i32,
    pub mandatory_skipped: i32,
    pub optional_done: i32,
    pub optional_skipped: i32,
}

impl ComplianceScoreConfig {
    pub fn global_default() -> Self {
        Self {
            id: Uuid::new_v4(),
            dietitian_id: None,
            plan_id: None,
            mandatory_done: DEFAULT_MANDATORY_DONE,
            mandatory_alternative: DEFAULT_MANDATORY_ALTERNATIVE,
            mandatory_skipped: DEFAULT_MANDATORY_SKIPPED,
            optional_done: DEFAULT_OPTIONAL_DONE,
            optional_skipped: DEFAULT_OPTIONAL_SKIPPED,
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.plan_id.is_some() && self.dietitian_id.is_none() {
            return Err(EngineError::InvalidArgument(
                "a plan-scoped score config must also carry its dietitian".to_string(),
            ));
        }
        let weights = [
            self.mandatory_done,
            self.mandatory_alternative,
            self.mandatory_skipped,
            self.optional_done,
            self.optional_skipped,
        ];
        if weights.iter().any(|w| *w < 0) {
            return Err(EngineError::InvalidArgument(
                "score weights must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// The best score a meal item can reach under this config.
    pub fn max_points(&self, mandatory: bool) -> i32 {
        if mandatory {
            self.mandatory_done
        } else {
            self.optional_done
        }
    }

    /// The (mandatory flag, status) -> points table. An unmarked item scores
    /// zero; so does an optional item marked Alternative, which has no
    /// defined transition.
    pub fn points(&self, mandatory: bool, status: Option<ComplianceStatus>) -> i32 {
        match (mandatory, status) {
            (true, Some(ComplianceStatus::Done)) => self.mandatory_done,
            (true, Some(ComplianceStatus::Alternative)) => self.mandatory_alternative,
            (true, Some(ComplianceStatus::Skipped)) => self.mandatory_skipped,
            (false, Some(ComplianceStatus::Done)) => self.optional_done,
            (false, Some(ComplianceStatus::Skipped)) => self.optional_skipped,
            (false, Some(ComplianceStatus::Alternative)) => 0,
            (_, None) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_seed_values() {
        let config = ComplianceScoreConfig::global_default();
        assert_eq!(config.mandatory_done, 10);
        assert_eq!(config.mandatory_alternative, 7);
        assert_eq!(config.mandatory_skipped, 0);
        assert_eq!(config.optional_done, 3);
        assert_eq!(config.optional_skipped, 0);
        assert!(config.dietitian_id.is_none());
        assert!(config.plan_id.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn score_table_covers_every_transition() {
        let config = ComplianceScoreConfig::global_default();
        assert_eq!(config.points(true, Some(ComplianceStatus::Done)), 10);
        assert_eq!(config.points(true, Some(ComplianceStatus::Alternative)), 7);
        assert_eq!(config.points(true, Some(ComplianceStatus::Skipped)), 0);
        assert_eq!(config.points(false, Some(ComplianceStatus::Done)), 3);
        assert_eq!(config.points(false, Some(ComplianceStatus::Skipped)), 0);
        assert_eq!(config.points(false, Some(ComplianceStatus::Alternative)), 0);
        assert_eq!(config.points(true, None), 0);
        assert_eq!(config.points(false, None), 0);
        assert_eq!(config.max_points(true), 10);
        assert_eq!(config.max_points(false), 3);
    }

    #[test]
    fn validation_rejects_bad_configs() {
        let mut config = ComplianceScoreConfig::global_default();
        config.plan_id = Some(Uuid::new_v4());
        assert!(config.validate().is_err());

        config.dietitian_id = Some(Uuid::new_v4());
        assert!(config.validate().is_ok());

        config.optional_done = -1;
        assert!(config.validate().is_err());
    }
}
