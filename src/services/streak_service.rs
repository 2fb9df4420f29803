use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::services::ComplianceCalculator;
use crate::store::PlanStore;

/// Trailing window scanned for streaks, in days.
pub const STREAK_WINDOW_DAYS: i64 = 90;
/// A day is on-track when its compliance percentage reaches this value.
pub const ON_TRACK_THRESHOLD: f64 = 75.0;

#[derive(Debug, Clone, Serialize)]
pub struct StreakSummary {
    pub current: u32,
    pub longest: u32,
    pub message: String,
}

/// Computes current and longest on-track streaks over a 90-day window of
/// day-level compliance scores, restricted to days belonging to one of the
/// client's active plans.
#[derive(Clone)]
pub struct StreakService {
    plans: Arc<dyn PlanStore>,
    calculator: ComplianceCalculator,
}

impl StreakService {
    pub fn new(plans: Arc<dyn PlanStore>, calculator: ComplianceCalculator) -> Self {
        Self { plans, calculator }
    }

    pub async fn streak(&self, client_id: Uuid) -> EngineResult<StreakSummary> {
        self.streak_as_of(client_id, Utc::now().date_naive()).await
    }

    pub async fn streak_as_of(
        &self,
        client_id: Uuid,
        today: NaiveDate,
    ) -> EngineResult<StreakSummary> {
        let window_start = today - Duration::days(STREAK_WINDOW_DAYS - 1);

        // Days with no plan data stay absent from the map and count as
        // streak-breaking gaps, not as on-track.
        let mut scores: HashMap<NaiveDate, f64> = HashMap::new();
        for plan in self.plans.active_plans_for_client(client_id).await? {
            for day in self
                .plans
                .days_in_range(plan.id, window_start, today)
                .await?
            {
                let pct = self
                    .calculator
                    .daily_compliance(client_id, plan.id, day.date)
                    .await?;
                scores.insert(day.date, pct);
            }
        }

        let (current, longest) = streaks_from_scores(today, &scores);
        Ok(StreakSummary {
            current,
            longest,
            message: streak_message(current),
        })
    }
}

/// Current streak walks backward from `today`; longest scans the window in
/// chronological order. Both treat a missing or below-threshold day as a
/// break.
fn streaks_from_scores(today: NaiveDate, scores: &HashMap<NaiveDate, f64>) -> (u32, u32) {
    let mut current = 0u32;
    for offset in 0..STREAK_WINDOW_DAYS {
        let date = today - Duration::days(offset);
        match scores.get(&date) {
            Some(&score) if score >= ON_TRACK_THRESHOLD => current += 1,
            _ => break,
        }
    }

    let mut longest = 0u32;
    let mut run = 0u32;
    for offset in (0..STREAK_WINDOW_DAYS).rev() {
        let date = today - Duration::days(offset);
        match scores.get(&date) {
            Some(&score) if score >= ON_TRACK_THRESHOLD => {
                run += 1;
                longest = longest.max(run);
            }
            _ => run = 0,
        }
    }

    (current, longest)
}

/// Message wording is free; the banding over `current` is the contract.
fn streak_message(current: u32) -> String {
    match current {
        0 => "No streak yet. Mark today's meals to get one started.".to_string(),
        1 => "Day one is in the books. Come back tomorrow to keep it going.".to_string(),
        2..=6 => format!("{current} days on track. Keep the momentum going!"),
        7..=13 => format!("{current} days on track. That's over a week of sticking to the plan!"),
        _ => format!("{current} days on track. Outstanding consistency!"),
    }
}
