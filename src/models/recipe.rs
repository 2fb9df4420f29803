use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::MealType;

/// A catalog ingredient. Maintained externally; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
}

/// A dietitian's recipe with its three disjoint ingredient sets.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub dietitian_id: Uuid,
    pub name: String,
    pub meal_type: MealType,
    pub mandatory_ingredients: Vec<Uuid>,
    pub optional_ingredients: Vec<Uuid>,
    pub prohibited_ingredients: Vec<Uuid>,
}

impl Recipe {
    pub fn validate(&self) -> EngineResult<()> {
        let mandatory: HashSet<Uuid> = self.mandatory_ingredients.iter().copied().collect();
        let optional: HashSet<Uuid> = self.optional_ingredients.iter().copied().collect();
        let prohibited: HashSet<Uuid> = self.prohibited_ingredients.iter().copied().collect();

        if mandatory.intersection(&prohibited).next().is_some() {
            return Err(EngineError::InvalidArgument(
                "an ingredient cannot be both mandatory and prohibited".to_string(),
            ));
        }
        if optional.intersection(&prohibited).next().is_some()
            || mandatory.intersection(&optional).next().is_some()
        {
            return Err(EngineError::InvalidArgument(
                "recipe ingredient sets must be disjoint".to_string(),
            ));
        }
        Ok(())
    }

    /// Mandatory and optional ingredients together, the denominator of the
    /// plain match percentage.
    pub fn planned_ingredients(&self) -> HashSet<Uuid> {
        self.mandatory_ingredients
            .iter()
            .chain(self.optional_ingredients.iter())
            .copied()
            .collect()
    }
}
