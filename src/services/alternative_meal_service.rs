use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{MealType, Recipe};
use crate::store::RecipeStore;

/// A recipe passes as cookable when this share of its planned ingredients is
/// on hand.
pub const ORIGINAL_MATCH_THRESHOLD: f64 = 80.0;
/// Ranking weights for the alternative search: mandatory coverage carries
/// 70 points, optional coverage the remaining 30.
const MANDATORY_WEIGHT: f64 = 70.0;
const OPTIONAL_WEIGHT: f64 = 30.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub dietitian_id: Uuid,
    pub planned_recipe_id: Uuid,
    pub meal_type: MealType,
    pub client_ingredient_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlternativeRecommendation {
    pub recipe_id: Uuid,
    pub recipe_name: String,
    pub match_percentage: f64,
    pub missing_ingredients: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub can_cook_original: bool,
    pub missing_ingredients: Vec<String>,
    pub alternative: Option<AlternativeRecommendation>,
    pub explanation: String,
}

/// Decides whether a client can cook the planned recipe from the
/// ingredients on hand, and picks the best-matching sibling recipe when
/// they cannot.
#[derive(Clone)]
pub struct AlternativeMealService {
    recipes: Arc<dyn RecipeStore>,
}

impl AlternativeMealService {
    pub fn new(recipes: Arc<dyn RecipeStore>) -> Self {
        Self { recipes }
    }

    pub async fn decide(&self, request: DecisionRequest) -> EngineResult<Decision> {
        let Some(recipe) = self.recipes.recipe(request.planned_recipe_id).await? else {
            // Defensive: a dangling recipe reference is reported as a
            // decision, not as an error, and no substitute is searched.
            return Ok(Decision {
                can_cook_original: false,
                missing_ingredients: Vec::new(),
                alternative: None,
                explanation: "The planned recipe no longer exists; no substitute was searched."
                    .to_string(),
            });
        };

        let on_hand: HashSet<Uuid> = request.client_ingredient_ids.iter().copied().collect();

        let conflicts: Vec<Uuid> = recipe
            .prohibited_ingredients
            .iter()
            .filter(|id| on_hand.contains(*id))
            .copied()
            .collect();
        if !conflicts.is_empty() {
            let conflict_names = self.ingredient_names(&conflicts).await?;
            let missing = self.missing_mandatory_names(&recipe, &on_hand).await?;
            let reason = format!(
                "Cannot cook {}: prohibited ingredient present ({}).",
                recipe.name,
                conflict_names.join(", ")
            );
            return self.search_alternative(&request, &on_hand, missing, reason).await;
        }

        let missing_mandatory: Vec<Uuid> = recipe
            .mandatory_ingredients
            .iter()
            .filter(|id| !on_hand.contains(*id))
            .copied()
            .collect();
        if !missing_mandatory.is_empty() {
            let missing = self.ingredient_names(&missing_mandatory).await?;
            let reason = format!(
                "Cannot cook {}: missing mandatory ingredients ({}).",
                recipe.name,
                missing.join(", ")
            );
            return self.search_alternative(&request, &on_hand, missing, reason).await;
        }

        let match_pct = plain_match_percentage(&recipe, &on_hand);
        let missing_optional: Vec<Uuid> = recipe
            .optional_ingredients
            .iter()
            .filter(|id| !on_hand.contains(*id))
            .copied()
            .collect();
        let missing = self.ingredient_names(&missing_optional).await?;

        if match_pct >= ORIGINAL_MATCH_THRESHOLD {
            return Ok(Decision {
                can_cook_original: true,
                missing_ingredients: missing,
                alternative: None,
                explanation: format!(
                    "{} can be cooked as planned with {:.0}% of its ingredients on hand.",
                    recipe.name, match_pct
                ),
            });
        }

        let reason = format!(
            "Only {:.0}% of the ingredients for {} are on hand (80% needed); missing: {}.",
            match_pct,
            recipe.name,
            missing.join(", ")
        );
        self.search_alternative(&request, &on_hand, missing, reason).await
    }

    /// Rank the dietitian's other recipes of the same meal type. Prohibited
    /// conflicts and unmet mandatory ingredients disqualify; the remainder
    /// score by weighted coverage and the first enumerated candidate wins
    /// ties.
    async fn search_alternative(
        &self,
        request: &DecisionRequest,
        on_hand: &HashSet<Uuid>,
        missing_ingredients: Vec<String>,
        reason: String,
    ) -> EngineResult<Decision> {
        let candidates = self
            .recipes
            .recipes_for_dietitian(request.dietitian_id)
            .await?;

        let mut best: Option<(f64, &Recipe)> = None;
        for candidate in &candidates {
            if candidate.id == request.planned_recipe_id {
                continue;
            }
            if candidate.meal_type != request.meal_type {
                continue;
            }
            if candidate
                .prohibited_ingredients
                .iter()
                .any(|id| on_hand.contains(id))
            {
                continue;
            }
            if !candidate
                .mandatory_ingredients
                .iter()
                .all(|id| on_hand.contains(id))
            {
                continue;
            }
            let score = weighted_match_percentage(candidate, on_hand);
            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, candidate));
            }
        }

        let Some((score, winner)) = best else {
            return Ok(Decision {
                can_cook_original: false,
                missing_ingredients,
                alternative: None,
                explanation: format!("{reason} No suitable alternative was found."),
            });
        };

        let still_missing: Vec<Uuid> = winner
            .optional_ingredients
            .iter()
            .filter(|id| !on_hand.contains(*id))
            .copied()
            .collect();
        let alternative = AlternativeRecommendation {
            recipe_id: winner.id,
            recipe_name: winner.name.clone(),
            match_percentage: score,
            missing_ingredients: self.ingredient_names(&still_missing).await?,
        };
        info!(
            planned_recipe_id = %request.planned_recipe_id,
            alternative_recipe_id = %winner.id,
            match_percentage = score,
            "Recommending an alternative recipe"
        );
        Ok(Decision {
            can_cook_original: false,
            missing_ingredients,
            alternative: Some(alternative),
            explanation: format!(
                "{reason} Suggested substitute: {} ({:.0}% match).",
                winner.name, score
            ),
        })
    }

    async fn missing_mandatory_names(
        &self,
        recipe: &Recipe,
        on_hand: &HashSet<Uuid>,
    ) -> EngineResult<Vec<String>> {
        let missing: Vec<Uuid> = recipe
            .mandatory_ingredients
            .iter()
            .filter(|id| !on_hand.contains(*id))
            .copied()
            .collect();
        self.ingredient_names(&missing).await
    }

    /// Resolve ingredient ids to display names, preserving the input order.
    /// An id without a catalog row falls back to its uuid.
    async fn ingredient_names(&self, ids: &[Uuid]) -> EngineResult<Vec<String>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let by_id: HashMap<Uuid, String> = self
            .recipes
            .ingredients_by_ids(ids)
            .await?
            .into_iter()
            .map(|i| (i.id, i.name))
            .collect();
        Ok(ids
            .iter()
            .map(|id| by_id.get(id).cloned().unwrap_or_else(|| id.to_string()))
            .collect())
    }
}

/// Plain coverage of the mandatory+optional union; 100 when the union is
/// empty. Used only for the original-recipe gate.
fn plain_match_percentage(recipe: &Recipe, on_hand: &HashSet<Uuid>) -> f64 {
    let planned = recipe.planned_ingredients();
    if planned.is_empty() {
        return 100.0;
    }
    let have = planned.iter().filter(|id| on_hand.contains(*id)).count();
    100.0 * have as f64 / planned.len() as f64
}

/// Ranking score for the alternative search: mandatory coverage up to 70
/// points, optional coverage up to 30; a recipe with no optional
/// ingredients is scored by mandatory coverage alone.
fn weighted_match_percentage(recipe: &Recipe, on_hand: &HashSet<Uuid>) -> f64 {
    let mandatory_total = recipe.mandatory_ingredients.len();
    let mandatory_coverage = if mandatory_total == 0 {
        1.0
    } else {
        recipe
            .mandatory_ingredients
            .iter()
            .filter(|id| on_hand.contains(*id))
            .count() as f64
            / mandatory_total as f64
    };

    let optional_total = recipe.optional_ingredients.len();
    if optional_total == 0 {
        return 100.0 * mandatory_coverage;
    }
    let optional_coverage = recipe
        .optional_ingredients
        .iter()
        .filter(|id| on_hand.contains(*id))
        .count() as f64
        / optional_total as f64;

    MANDATORY_WEIGHT * mandatory_coverage + OPTIONAL_WEIGHT * optional_coverage
}
