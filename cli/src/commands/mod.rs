mod foods;
mod helpers;
mod shell;

pub(crate) use foods::{FieldArgs, cmd_add, cmd_delete, cmd_edit, cmd_list};
pub(crate) use shell::run_shell;
