use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "client_sex", rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

/// A dietitian's client. Identity and linkage are managed externally; this
/// engine reads the record for ownership checks and profile metrics.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub dietitian_id: Option<Uuid>,
    pub premium: bool,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub birth_date: Option<NaiveDate>,
    pub sex: Option<Sex>,
}

impl Client {
    pub fn age_years(&self, today: NaiveDate) -> Option<i32> {
        let birth = self.birth_date?;
        let mut age = today.year() - birth.year();
        if (today.month(), today.day()) < (birth.month(), birth.day()) {
            age -= 1;
        }
        Some(age)
    }

    /// Body mass index: kg / m^2.
    pub fn bmi(&self) -> Option<f64> {
        let weight = self.weight_kg?;
        let height_m = self.height_cm? / 100.0;
        if height_m <= 0.0 {
            return None;
        }
        Some(weight / (height_m * height_m))
    }

    /// Basal metabolic rate per Mifflin-St Jeor.
    pub fn bmr(&self, today: NaiveDate) -> Option<f64> {
        let weight = self.weight_kg?;
        let height = self.height_cm?;
        let age = self.age_years(today)? as f64;
        let sex_term = match self.sex? {
            Sex::Male => 5.0,
            Sex::Female => -161.0,
        };
        Some(10.0 * weight + 6.25 * height - 5.0 * age + sex_term)
    }
}
