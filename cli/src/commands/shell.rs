//! Interactive single-page session: search box, form and list driven by typed
//! commands against one long-lived controller.

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{Context, Result, bail};

use foodsearch_core::controller::{Controller, FoodsBackend, Intent};
use foodsearch_core::form::{FoodForm, FormField};
use foodsearch_core::list::{ListView, delete_intent, edit_intent};

use super::helpers::{is_yes, render_form, render_list_view};

const HELP: &str = "\
Commands:
  list                   show the foods matching the current search
  search [text]          set the search text (no text clears it)
  edit <food>            load a food into the form
  set <field> <value>    fill a form field (food, origin, calories, protein,
                         fiber, vitamin_c, antioxidant)
  form                   show the form
  save                   submit the form (creates, or updates while editing)
  cancel                 discard the form and stop editing
  delete <food>          delete a food (asks first)
  refresh                reload from the server
  help                   show this help
  quit                   leave";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ShellCommand {
    List,
    Search(String),
    Edit(String),
    Set(FormField, String),
    Form,
    Save,
    Cancel,
    Delete(String),
    Refresh,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match verb.to_lowercase().as_str() {
            "list" | "ls" => Self::List,
            "search" | "/" => Self::Search(rest.to_string()),
            "edit" => Self::Edit(required(rest, "edit <food>")?),
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if field.is_empty() {
                    bail!("Usage: set <field> <value>");
                }
                Self::Set(field.parse()?, value.trim().to_string())
            }
            "form" => Self::Form,
            "save" => Self::Save,
            "cancel" => Self::Cancel,
            "delete" | "rm" => Self::Delete(required(rest, "delete <food>")?),
            "refresh" => Self::Refresh,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => bail!("Unknown command '{verb}'. Type 'help' for a list."),
        };
        Ok(command)
    }
}

fn required(arg: &str, usage: &str) -> Result<String> {
    if arg.is_empty() {
        bail!("Usage: {usage}");
    }
    Ok(arg.to_string())
}

struct Session<'a, B> {
    controller: &'a mut Controller<B>,
    form: FoodForm,
}

impl<B: FoodsBackend> Session<'_, B> {
    /// The form follows the selection; rebuild it whenever the selection may have changed.
    fn sync_form(&mut self) {
        self.form = FoodForm::for_selection(self.controller.state().selection().record());
    }

    fn render_list(&self) -> String {
        let state = self.controller.state();
        let header = if state.search().is_empty() {
            String::new()
        } else {
            format!("Search: {}\n", state.search())
        };
        format!(
            "{header}{}",
            render_list_view(&ListView::from_records(&state.visible()))
        )
    }
}

pub(crate) async fn run_shell<B, R, W>(
    controller: &mut Controller<B>,
    mut input: R,
    out: &mut W,
) -> Result<()>
where
    B: FoodsBackend,
    R: BufRead,
    W: Write,
{
    controller.mount().await;
    let mut session = Session {
        controller,
        form: FoodForm::blank(),
    };
    session.sync_form();

    writeln!(out, "Healthy Foods (type 'help' for commands)")?;
    writeln!(out, "{}", session.render_list())?;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).context("Failed to read input")? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ShellCommand>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => writeln!(out, "{HELP}")?,
            ShellCommand::List => writeln!(out, "{}", session.render_list())?,
            ShellCommand::Form => write!(out, "{}", render_form(&session.form))?,
            ShellCommand::Refresh => {
                if !session.controller.dispatch(Intent::Refresh).await.is_applied() {
                    writeln!(out, "Refresh failed; showing the last loaded list.")?;
                }
                writeln!(out, "{}", session.render_list())?;
            }
            ShellCommand::Search(text) => {
                session.controller.dispatch(Intent::SetSearch(text)).await;
                writeln!(out, "{}", session.render_list())?;
            }
            ShellCommand::Edit(food) => {
                let Some(record) = session.controller.state().find(&food).cloned() else {
                    writeln!(out, "No food named '{food}'")?;
                    continue;
                };
                session.controller.dispatch(edit_intent(&record)).await;
                session.sync_form();
                write!(out, "{}", render_form(&session.form))?;
            }
            ShellCommand::Set(field, value) => match session.form.set(field, value) {
                Ok(()) => write!(out, "{}", render_form(&session.form))?,
                Err(e) => writeln!(out, "{e}")?,
            },
            ShellCommand::Save => {
                let payload = match session.form.submit() {
                    Ok(payload) => payload,
                    Err(e) => {
                        writeln!(out, "{e}")?;
                        continue;
                    }
                };
                let outcome = session.controller.dispatch(Intent::Submit(payload)).await;
                session.sync_form();
                if outcome.is_applied() {
                    writeln!(out, "Saved.")?;
                } else {
                    writeln!(out, "Save failed; see the log for details.")?;
                }
                writeln!(out, "{}", session.render_list())?;
            }
            ShellCommand::Cancel => {
                session.controller.dispatch(Intent::Cancel).await;
                session.sync_form();
                write!(out, "{}", render_form(&session.form))?;
            }
            ShellCommand::Delete(food) => {
                let Some(record) = session.controller.state().find(&food).cloned() else {
                    writeln!(out, "No food named '{food}'")?;
                    continue;
                };
                let intent = delete_intent(&record, &mut |prompt: &str| {
                    let _ = write!(out, "{prompt} [y/N] ");
                    let _ = out.flush();
                    let mut answer = String::new();
                    matches!(input.read_line(&mut answer), Ok(n) if n > 0) && is_yes(&answer)
                });
                let Some(intent) = intent else {
                    writeln!(out, "Cancelled.")?;
                    continue;
                };
                if session.controller.dispatch(intent).await.is_applied() {
                    writeln!(out, "Deleted.")?;
                } else {
                    writeln!(out, "Delete failed; see the log for details.")?;
                }
                writeln!(out, "{}", session.render_list())?;
            }
        }
    }

    Ok(())
}
