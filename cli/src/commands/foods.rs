use std::process;

use anyhow::Result;
use clap::Args;

use foodsearch_core::controller::{Controller, FoodsBackend, Intent, Outcome};
use foodsearch_core::form::{FoodForm, FormField};
use foodsearch_core::list::{ListView, delete_intent, edit_intent};
use foodsearch_core::models::FoodRecord;

use super::helpers::{json_error, print_list_view, prompt_confirm};

/// Form inputs accepted on the command line. Numbers are taken as typed and
/// coerced the same way the interactive form does it.
#[derive(Args, Debug, Default)]
pub(crate) struct FieldArgs {
    /// Country or region of origin
    #[arg(long)]
    pub(crate) origin: Option<String>,
    /// Calories (integer)
    #[arg(long)]
    pub(crate) calories: Option<String>,
    /// Protein in grams
    #[arg(long)]
    pub(crate) protein: Option<String>,
    /// Fiber in grams
    #[arg(long)]
    pub(crate) fiber: Option<String>,
    /// Vitamin C
    #[arg(long)]
    pub(crate) vitamin_c: Option<String>,
    /// Antioxidant score (integer)
    #[arg(long)]
    pub(crate) antioxidant: Option<String>,
}

impl FieldArgs {
    fn apply(&self, form: &mut FoodForm) -> Result<()> {
        let inputs = [
            (FormField::Origin, &self.origin),
            (FormField::Calories, &self.calories),
            (FormField::Protein, &self.protein),
            (FormField::Fiber, &self.fiber),
            (FormField::VitaminC, &self.vitamin_c),
            (FormField::Antioxidant, &self.antioxidant),
        ];
        for (field, value) in inputs {
            if let Some(value) = value {
                form.set(field, value.as_str())?;
            }
        }
        Ok(())
    }
}

pub(crate) async fn cmd_list<B: FoodsBackend>(
    controller: &mut Controller<B>,
    search: Option<&str>,
    json: bool,
) -> Result<()> {
    controller.mount().await;
    let search = search.unwrap_or_default().to_string();
    controller.dispatch(Intent::SetSearch(search)).await;

    let visible = controller.state().visible();
    if json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
    } else {
        print_list_view(&ListView::from_records(&visible));
    }
    Ok(())
}

pub(crate) async fn cmd_add<B: FoodsBackend>(
    controller: &mut Controller<B>,
    food: &str,
    fields: &FieldArgs,
    json: bool,
) -> Result<()> {
    let mut form = FoodForm::blank();
    form.set(FormField::Food, food)?;
    fields.apply(&mut form)?;

    let payload = match form.submit() {
        Ok(payload) => payload,
        Err(e) => notice(&e.to_string(), json),
    };
    let outcome = controller.dispatch(Intent::Submit(payload.clone())).await;
    report_saved(controller, &payload, outcome, "Added", json)
}

pub(crate) async fn cmd_edit<B: FoodsBackend>(
    controller: &mut Controller<B>,
    food: &str,
    fields: &FieldArgs,
    json: bool,
) -> Result<()> {
    controller.mount().await;
    let Some(record) = controller.state().find(food).cloned() else {
        notice(&format!("No food named '{food}'"), json);
    };
    controller.dispatch(edit_intent(&record)).await;

    let mut form = FoodForm::for_selection(controller.state().selection().record());
    fields.apply(&mut form)?;

    let payload = match form.submit() {
        Ok(payload) => payload,
        Err(e) => {
            controller.dispatch(Intent::Cancel).await;
            notice(&e.to_string(), json)
        }
    };
    let outcome = controller.dispatch(Intent::Submit(payload.clone())).await;
    report_saved(controller, &payload, outcome, "Updated", json)
}

pub(crate) async fn cmd_delete<B: FoodsBackend>(
    controller: &mut Controller<B>,
    food: &str,
    yes: bool,
    json: bool,
) -> Result<()> {
    controller.mount().await;
    let Some(record) = controller.state().find(food).cloned() else {
        notice(&format!("No food named '{food}'"), json);
    };

    let intent = if yes {
        delete_intent(&record, &mut |_: &str| true)
    } else {
        delete_intent(&record, &mut prompt_confirm)
    };
    let Some(intent) = intent else {
        if json {
            println!("{}", serde_json::json!({ "deleted": null }));
        } else {
            eprintln!("Cancelled");
        }
        return Ok(());
    };

    if controller.dispatch(intent).await.is_applied() {
        if json {
            println!("{}", serde_json::json!({ "deleted": record.food }));
        } else {
            println!("Deleted food: {}", record.food);
        }
        Ok(())
    } else {
        failed("delete", &record.food, json)
    }
}

fn report_saved<B: FoodsBackend>(
    controller: &Controller<B>,
    payload: &FoodRecord,
    outcome: Outcome,
    verb: &str,
    json: bool,
) -> Result<()> {
    if !outcome.is_applied() {
        failed("save", &payload.food, json);
    }
    let saved = controller.state().find(&payload.food).unwrap_or(payload);
    if json {
        println!("{}", serde_json::to_string_pretty(saved)?);
    } else {
        println!("{verb} food: {} ({})", saved.food, saved.origin);
    }
    Ok(())
}

/// Validation or lookup problem: nothing was sent. Exits with status 2.
fn notice(message: &str, json: bool) -> ! {
    if json {
        println!("{}", json_error(message));
    } else {
        eprintln!("{message}");
    }
    process::exit(2);
}

/// The backend call failed and has already been logged. Exits with status 1.
fn failed(action: &str, food: &str, json: bool) -> ! {
    let message = format!("Could not {action} '{food}': the foods API call failed");
    if json {
        println!("{}", json_error(&message));
    } else {
        eprintln!("{message}");
    }
    process::exit(1);
}
