//! An editing session: a store, its settings, and the file it came from.
//!
//! The session executes parsed [`Command`]s against its [`Store`] and writes
//! human-readable results to a caller-provided writer. Operations the model
//! declines (a duplicate name, a missing class) are reported as messages and
//! the session carries on.

use std::{
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use log::{debug, info};

use classweave::{ClassweaveError, Store, config::AppConfig, persist};

use crate::{
    command::{COMMANDS, Command},
    error::CliError,
    error_adapter,
};

/// Whether the session keeps reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

const BANNER: &str = "classweave: an editor for UML class diagrams\nType `help` for a list of commands.";

pub struct Session {
    store: Store,
    config: AppConfig,
    current_file: Option<PathBuf>,
    banner: bool,
}

impl Session {
    /// Creates a session with an empty diagram.
    pub fn new(config: AppConfig) -> Self {
        let banner = config.editor().banner();
        Self {
            store: Store::new(),
            config,
            current_file: None,
            banner,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The file the diagram was last loaded from or saved to.
    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn set_banner(&mut self, banner: bool) {
        self.banner = banner;
    }

    /// Replaces the diagram with the one stored at `path`.
    ///
    /// On failure the current diagram is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the [`persist::PersistError`] of the failed load.
    pub fn load(&mut self, path: &Path) -> Result<(), ClassweaveError> {
        self.store = persist::load(path)?;
        self.current_file = Some(path.to_path_buf());
        Ok(())
    }

    /// Writes the diagram to `path` and remembers it as the current file.
    ///
    /// # Errors
    ///
    /// Returns the [`persist::PersistError`] of the failed save.
    pub fn save(&mut self, path: &Path) -> Result<(), ClassweaveError> {
        persist::save(&self.store, path, self.config.persistence().pretty())?;
        self.current_file = Some(path.to_path_buf());
        Ok(())
    }

    // =========================================================================
    // Input loops
    // =========================================================================

    /// Parses and executes one command line.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Command`] for lines that do not parse, and
    /// [`CliError::App`] for model, persistence and output failures.
    pub fn run_line(&mut self, line: &str, out: &mut impl Write) -> Result<Flow, CliError> {
        let command = Command::parse(line).map_err(|err| CliError::new_command_error(err, line))?;
        match command {
            Some(command) => Ok(self.execute(command, out)?),
            None => Ok(Flow::Continue),
        }
    }

    /// Executes every line of a script, stopping at the first error or at
    /// an `exit` command.
    ///
    /// # Errors
    ///
    /// Returns the error of the failing line. Command errors point into
    /// `source` as a whole, so reports show the line they came from.
    pub fn run_script(&mut self, source: &str, out: &mut impl Write) -> Result<(), CliError> {
        let mut offset = 0;
        for (number, line) in source.split_inclusive('\n').enumerate() {
            let text = line.trim_end_matches(['\n', '\r']);
            debug!(line = number + 1; "Executing script line");

            let command = Command::parse(text)
                .map_err(|err| CliError::new_command_error(err.offset(offset), source))?;
            offset += line.len();

            if let Some(command) = command {
                if self.execute(command, out)? == Flow::Exit {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Runs the interactive loop until `exit` or end of input.
    ///
    /// Errors of individual lines are rendered to `err` and the loop
    /// continues.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub fn run_interactive(
        &mut self,
        mut input: impl BufRead,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> Result<(), CliError> {
        if self.banner {
            writeln!(out, "{BANNER}")?;
        }

        let mut line = String::new();
        loop {
            write!(out, "{}", self.config.editor().prompt())?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                break;
            }

            match self.run_line(&line, out) {
                Ok(Flow::Exit) => break,
                Ok(Flow::Continue) => {}
                Err(error) => {
                    write!(err, "{}", error_adapter::render(&error))?;
                    err.flush()?;
                }
            }
        }

        info!("Interactive session closed");
        Ok(())
    }

    // =========================================================================
    // Command execution
    // =========================================================================

    /// Executes one command, writing its outcome to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassweaveError::Model`] when the model rejects a name,
    /// [`ClassweaveError::Persist`] when saving or loading fails, and
    /// [`ClassweaveError::Io`] when writing to `out` fails.
    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<Flow, ClassweaveError> {
        let store = &mut self.store;
        let (done, message) = match command {
            Command::Help => {
                write_help(out)?;
                return Ok(Flow::Continue);
            }
            Command::Exit => {
                writeln!(out, "Closing editor.")?;
                return Ok(Flow::Exit);
            }
            Command::List => {
                if store.is_empty() {
                    writeln!(out, "No classes.")?;
                }
                for name in store.class_names() {
                    writeln!(out, "{name}")?;
                }
                return Ok(Flow::Continue);
            }
            Command::Display(None) => {
                if store.is_empty() {
                    writeln!(out, "No classes.")?;
                } else {
                    write!(out, "{store}")?;
                }
                return Ok(Flow::Continue);
            }
            Command::Display(Some(class)) => match store.describe_class(&class) {
                Some(text) => {
                    write!(out, "{text}")?;
                    return Ok(Flow::Continue);
                }
                None => (false, format!("No class named `{class}`.")),
            },

            Command::AddClass(name) => outcome(
                store.add_class(&name)?,
                format!("Added class `{name}`."),
                format!("Class `{name}` already exists."),
            ),
            Command::RenameClass { old, new } => outcome(
                store.rename_class(&old, &new)?,
                format!("Renamed class `{old}` to `{new}`."),
                format!("Could not rename `{old}`: no such class, or `{new}` is taken."),
            ),
            Command::DeleteClass(name) => outcome(
                store.delete_class(&name),
                format!("Deleted class `{name}`."),
                format!("No class named `{name}`."),
            ),

            Command::AddField {
                class,
                ty,
                name,
                access,
            } => {
                let access = match access {
                    Some(access) => access,
                    None => self.config.editor().default_field_access()?,
                };
                outcome(
                    store.add_field(&class, &ty, &name, access)?,
                    format!("Added field `{access} {ty} {name}` to `{class}`."),
                    format!("Could not add field `{name}`: no class `{class}`, or the name is taken."),
                )
            }
            Command::RenameField { class, old, new } => outcome(
                store.rename_field(&class, &old, &new)?,
                format!("Renamed field `{old}` to `{new}` in `{class}`."),
                format!("Could not rename field `{old}` in `{class}`."),
            ),
            Command::DeleteField { class, name } => outcome(
                store.delete_field(&class, &name),
                format!("Deleted field `{name}` from `{class}`."),
                format!("No field `{name}` in class `{class}`."),
            ),
            Command::RetypeField { class, name, ty } => outcome(
                store.change_field_type(&class, &name, &ty),
                format!("Field `{name}` of `{class}` now has type `{ty}`."),
                format!("No field `{name}` in class `{class}`."),
            ),
            Command::AccessField {
                class,
                name,
                access,
            } => outcome(
                store.change_field_access(&class, &name, access),
                format!("Field `{name}` of `{class}` is now {access}."),
                format!("No field `{name}` in class `{class}`."),
            ),

            Command::AddMethod {
                class,
                return_type,
                name,
                params,
            } => {
                let access = self.config.editor().default_method_access()?;
                outcome(
                    store.add_method(&class, &return_type, &name, params, access)?,
                    format!("Added method `{name}` to `{class}`."),
                    format!(
                        "Could not add method `{name}`: no class `{class}`, the signature is taken, or parameter names repeat."
                    ),
                )
            }
            Command::RenameMethod { class, method, new } => outcome(
                store.rename_method(&class, &method, &new)?,
                format!("Renamed method `{method}` to `{new}` in `{class}`."),
                format!("Could not rename method `{method}` in `{class}`."),
            ),
            Command::DeleteMethod { class, method } => outcome(
                store.delete_method(&class, &method),
                format!("Deleted method `{method}` from `{class}`."),
                format!("No method `{method}` in class `{class}`."),
            ),
            Command::RetypeMethod { class, method, ty } => outcome(
                store.change_method_type(&class, &method, &ty),
                format!("Method `{method}` of `{class}` now returns `{ty}`."),
                format!("No method `{method}` in class `{class}`."),
            ),
            Command::AccessMethod {
                class,
                method,
                access,
            } => outcome(
                store.change_method_access(&class, &method, access),
                format!("Method `{method}` of `{class}` is now {access}."),
                format!("No method `{method}` in class `{class}`."),
            ),
            Command::AddParameter {
                class,
                method,
                param,
            } => outcome(
                store.add_parameter(&class, &method, param.clone()),
                format!("Added parameter `{param}` to `{method}`."),
                format!("Could not add parameter `{param}` to `{method}` in `{class}`."),
            ),
            Command::DeleteParameter {
                class,
                method,
                param,
            } => outcome(
                store.delete_parameter(&class, &method, &param),
                format!("Removed parameter `{param}` from `{method}`."),
                format!("Could not remove parameter `{param}` from `{method}` in `{class}`."),
            ),

            Command::AddRelationship { from, to, kind } => outcome(
                store.add_relationship(&from, &to, kind)?,
                format!("Added {kind} relationship from `{from}` to `{to}`."),
                format!("Could not relate `{from}` to `{to}`: a class is missing or they are already related."),
            ),
            Command::DeleteRelationship { from, to } => outcome(
                store.delete_relationship(&from, &to),
                format!("Deleted the relationship from `{from}` to `{to}`."),
                format!("No relationship from `{from}` to `{to}`."),
            ),

            Command::Save(path) => match path.or_else(|| self.current_file.clone()) {
                Some(path) => {
                    self.save(&path)?;
                    (true, format!("Saved to {}.", path.display()))
                }
                None => (
                    false,
                    "No file to save to; use `save <file>`.".to_string(),
                ),
            },
            Command::Load(path) => {
                self.load(&path)?;
                (true, format!("Loaded {}.", path.display()))
            }
        };

        if !done {
            debug!(message = message.as_str(); "Operation not performed");
        }
        writeln!(out, "{message}")?;
        Ok(Flow::Continue)
    }
}

fn outcome(done: bool, success: String, failure: String) -> (bool, String) {
    if done { (true, success) } else { (false, failure) }
}

fn write_help(out: &mut impl Write) -> std::io::Result<()> {
    let width = COMMANDS.iter().map(|entry| entry.usage.len()).max().unwrap_or(0);
    for entry in COMMANDS {
        writeln!(out, "{:<width$}  {}", entry.usage, entry.summary)?;
    }
    Ok(())
}
