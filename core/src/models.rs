use serde::{Deserialize, Serialize};

/// One row of the remote `foods` collection. `food` is the primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub food: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub calories: i64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fiber: f64,
    #[serde(default, alias = "vitaminC")]
    pub vitamin_c: f64,
    #[serde(default)]
    pub antioxidant: i64,
}

impl FoodRecord {
    /// Case-insensitive substring match on `food`, or on `origin` when it is set.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.food.to_lowercase().contains(&term)
            || (!self.origin.is_empty() && self.origin.to_lowercase().contains(&term))
    }
}

/// Records visible for `term`, in snapshot order.
#[must_use]
pub fn filter_records<'a>(records: &'a [FoodRecord], term: &str) -> Vec<&'a FoodRecord> {
    records.iter().filter(|r| r.matches_search(term)).collect()
}

/// Parse a `GET /foods` body. The backend answers `null` for an empty table.
pub fn parse_collection(body: &[u8]) -> serde_json::Result<Vec<FoodRecord>> {
    serde_json::from_slice::<Option<Vec<FoodRecord>>>(body).map(Option::unwrap_or_default)
}
