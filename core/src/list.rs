//! List view model: rows for the visible records, or a "no results" marker,
//! and the edit/delete intents a row can emit.

use serde::Serialize;

use crate::controller::Intent;
use crate::models::FoodRecord;

pub const NO_RESULTS: &str = "No foods found.";

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[must_use]
pub fn delete_prompt(food: &str) -> String {
    format!("Are you sure you want to delete \"{food}\"?")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListRow {
    pub food: String,
    pub origin: String,
    pub calories: i64,
    pub protein: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    Empty,
    Rows(Vec<ListRow>),
}

impl ListView {
    #[must_use]
    pub fn from_records(records: &[&FoodRecord]) -> Self {
        if records.is_empty() {
            return Self::Empty;
        }
        Self::Rows(
            records
                .iter()
                .map(|r| ListRow {
                    food: r.food.clone(),
                    origin: r.origin.clone(),
                    calories: r.calories,
                    protein: r.protein,
                })
                .collect(),
        )
    }
}

/// Edit fires immediately.
#[must_use]
pub fn edit_intent(record: &FoodRecord) -> Intent {
    Intent::RequestEdit(record.clone())
}

/// Delete fires only if the user confirms.
pub fn delete_intent(record: &FoodRecord, confirm: &mut impl Confirm) -> Option<Intent> {
    confirm
        .confirm(&delete_prompt(&record.food))
        .then(|| Intent::RequestDelete(record.food.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(food: &str) -> FoodRecord {
        FoodRecord {
            food: food.to_string(),
            origin: "US".to_string(),
            calories: 95,
            protein: 0.5,
            fiber: 4.4,
            vitamin_c: 8.4,
            antioxidant: 3,
        }
    }

    #[test]
    fn test_empty_list_renders_no_results() {
        assert_eq!(ListView::from_records(&[]), ListView::Empty);
    }

    #[test]
    fn test_rows_keep_order_and_display_fields() {
        let apple = record("Apple");
        let kale = record("Kale");
        let view = ListView::from_records(&[&kale, &apple]);
        let ListView::Rows(rows) = view else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].food, "Kale");
        assert_eq!(rows[1].food, "Apple");
        assert_eq!(rows[1].origin, "US");
        assert_eq!(rows[1].calories, 95);
        assert!((rows[1].protein - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_edit_intent_is_immediate() {
        let apple = record("Apple");
        assert_eq!(edit_intent(&apple), Intent::RequestEdit(apple.clone()));
    }

    #[test]
    fn test_delete_intent_confirmed() {
        let apple = record("Apple");
        let mut asked = Vec::new();
        let intent = delete_intent(&apple, &mut |prompt: &str| {
            asked.push(prompt.to_string());
            true
        });
        assert_eq!(intent, Some(Intent::RequestDelete("Apple".to_string())));
        assert_eq!(asked, vec!["Are you sure you want to delete \"Apple\"?"]);
    }

    #[test]
    fn test_delete_intent_declined_fires_nothing() {
        let apple = record("Apple");
        let intent = delete_intent(&apple, &mut |_: &str| false);
        assert!(intent.is_none());
    }
}
