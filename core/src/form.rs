//! Create/edit form: raw text inputs, required-field validation and numeric
//! coercion into a [`FoodRecord`] payload.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};

use crate::models::FoodRecord;

pub const REQUIRED_NOTICE: &str = "Food and Origin are required";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Food,
    Origin,
    Calories,
    Protein,
    Fiber,
    VitaminC,
    Antioxidant,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Food,
        FormField::Origin,
        FormField::Calories,
        FormField::Protein,
        FormField::Fiber,
        FormField::VitaminC,
        FormField::Antioxidant,
    ];

    /// Wire/field name, as used in the JSON payload.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Origin => "origin",
            Self::Calories => "calories",
            Self::Protein => "protein",
            Self::Fiber => "fiber",
            Self::VitaminC => "vitamin_c",
            Self::Antioxidant => "antioxidant",
        }
    }

    /// Placeholder text shown next to an empty input.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Food => "Food name",
            Self::Origin => "Origin (string)",
            Self::Calories => "Calories",
            Self::Protein => "Protein",
            Self::Fiber => "Fiber",
            Self::VitaminC => "Vitamin C",
            Self::Antioxidant => "Antioxidant",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        let field = match normalized.as_str() {
            "food" | "name" => Self::Food,
            "origin" => Self::Origin,
            "calories" => Self::Calories,
            "protein" => Self::Protein,
            "fiber" => Self::Fiber,
            "vitamin_c" | "vitaminc" => Self::VitaminC,
            "antioxidant" => Self::Antioxidant,
            _ => bail!(
                "Unknown field '{s}'. Valid: food, origin, calories, protein, \
                 fiber, vitamin_c, antioxidant"
            ),
        };
        Ok(field)
    }
}

/// Text state of the form. Every input is kept as typed; coercion happens on submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodForm {
    food: String,
    origin: String,
    calories: String,
    protein: String,
    fiber: String,
    vitamin_c: String,
    antioxidant: String,
    /// Key of the record being edited. While set, `food` is read-only.
    editing: Option<String>,
}

impl FoodForm {
    #[must_use]
    pub fn blank() -> Self {
        Self::default()
    }

    /// Pre-populate from the editing selection, or blank when there is none.
    /// Zero values render as empty inputs.
    #[must_use]
    pub fn for_selection(selection: Option<&FoodRecord>) -> Self {
        let Some(record) = selection else {
            return Self::blank();
        };
        Self {
            food: record.food.clone(),
            origin: record.origin.clone(),
            calories: prefill_int(record.calories),
            protein: prefill_float(record.protein),
            fiber: prefill_float(record.fiber),
            vitamin_c: prefill_float(record.vitamin_c),
            antioxidant: prefill_int(record.antioxidant),
            editing: Some(record.food.clone()),
        }
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        if self.is_editing() {
            "Edit Food"
        } else {
            "Add Food"
        }
    }

    #[must_use]
    pub fn is_read_only(&self, field: FormField) -> bool {
        field == FormField::Food && self.is_editing()
    }

    #[must_use]
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Food => &self.food,
            FormField::Origin => &self.origin,
            FormField::Calories => &self.calories,
            FormField::Protein => &self.protein,
            FormField::Fiber => &self.fiber,
            FormField::VitaminC => &self.vitamin_c,
            FormField::Antioxidant => &self.antioxidant,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) -> Result<()> {
        if self.is_read_only(field) {
            bail!("The food name cannot be changed while editing");
        }
        let slot = match field {
            FormField::Food => &mut self.food,
            FormField::Origin => &mut self.origin,
            FormField::Calories => &mut self.calories,
            FormField::Protein => &mut self.protein,
            FormField::Fiber => &mut self.fiber,
            FormField::VitaminC => &mut self.vitamin_c,
            FormField::Antioxidant => &mut self.antioxidant,
        };
        *slot = value.into();
        Ok(())
    }

    /// Validate and coerce into a payload. Fails with [`REQUIRED_NOTICE`] when
    /// `food` or `origin` is empty; nothing should be sent in that case.
    pub fn submit(&self) -> Result<FoodRecord> {
        if self.food.is_empty() || self.origin.is_empty() {
            bail!(REQUIRED_NOTICE);
        }
        Ok(FoodRecord {
            food: self.food.clone(),
            origin: self.origin.clone(),
            calories: coerce_int(&self.calories),
            protein: coerce_float(&self.protein),
            fiber: coerce_float(&self.fiber),
            vitamin_c: coerce_float(&self.vitamin_c),
            antioxidant: coerce_int(&self.antioxidant),
        })
    }
}

fn prefill_int(v: i64) -> String {
    if v == 0 { String::new() } else { v.to_string() }
}

fn prefill_float(v: f64) -> String {
    if v == 0.0 { String::new() } else { v.to_string() }
}

/// Leading integer prefix of `input`, truncated toward zero.
/// Empty, unparsable and negative input all give 0.
#[must_use]
pub fn coerce_int(input: &str) -> i64 {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut value: i64 = 0;
    let mut seen_digit = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    if !seen_digit || negative {
        return 0;
    }
    value
}

/// Leading decimal prefix of `input` (sign, digits, fraction, exponent).
/// Empty, unparsable, non-finite and negative input all give 0.
#[must_use]
pub fn coerce_float(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return 0.0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-' | b'+')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    match s[..end].parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}
