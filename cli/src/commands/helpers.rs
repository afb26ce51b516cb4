use std::fmt::Write as _;
use std::io::{self, BufRead, Write};

use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use foodsearch_core::form::{FoodForm, FormField};
use foodsearch_core::list::{ListView, NO_RESULTS};

pub(crate) fn render_list_view(view: &ListView) -> String {
    #[derive(Tabled)]
    struct FoodRow {
        #[tabled(rename = "#")]
        idx: usize,
        #[tabled(rename = "Food")]
        food: String,
        #[tabled(rename = "Origin")]
        origin: String,
        #[tabled(rename = "Calories")]
        calories: i64,
        #[tabled(rename = "Protein (g)")]
        protein: String,
    }

    let ListView::Rows(rows) = view else {
        return NO_RESULTS.to_string();
    };

    let rows: Vec<FoodRow> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| FoodRow {
            idx: i + 1,
            food: truncate(&r.food, 35),
            origin: truncate(&r.origin, 20),
            calories: r.calories,
            protein: {
                let protein = r.protein;
                format!("{protein:.1}")
            },
        })
        .collect();

    Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..5)).with(Alignment::right()))
        .to_string()
}

pub(crate) fn print_list_view(view: &ListView) {
    println!("{}", render_list_view(view));
}

pub(crate) fn render_form(form: &FoodForm) -> String {
    let mut out = format!("{}\n", form.title());
    for field in FormField::ALL {
        let value = form.value(field);
        let shown = if value.is_empty() {
            format!("<{}>", field.label())
        } else {
            value.to_string()
        };
        let lock = if form.is_read_only(field) {
            " (locked)"
        } else {
            ""
        };
        let _ = writeln!(out, "  {:<12} {shown}{lock}", field.name());
    }
    out
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

/// Only an explicit yes confirms.
pub(crate) fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Ask on stderr, read the answer from stdin. EOF or a read error declines.
pub(crate) fn prompt_confirm(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    if io::stderr().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => is_yes(&answer),
    }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}
