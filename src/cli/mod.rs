pub mod account;
pub mod admin;
pub mod budget;
pub mod commands;
pub mod document;
pub mod project;
pub mod task;

pub use commands::*;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use chrono::{Local, NaiveDate};
use serde_json::Value;

use crate::api::{ApiClient, AuthSession};
use crate::config::{self, Settings};
use crate::error::ObraError;
use crate::models::{Identified, Validate};
use crate::output;
use crate::screen::{CrudScreen, Resource};

/// Everything a command handler needs from the global flags.
pub struct Context {
    pub json: bool,
    pub api_url: Option<String>,
    pub project: Option<i64>,
    pub today: NaiveDate,
    pub settings: Settings,
}

impl Context {
    pub fn new(cli: &Cli) -> Result<Self, ObraError> {
        Ok(Self {
            json: cli.json,
            api_url: cli.api_url.clone(),
            project: cli.project,
            today: cli.today.unwrap_or_else(|| Local::now().date_naive()),
            settings: Settings::load()?,
        })
    }

    pub fn api_url(&self) -> String {
        self.settings.effective_api_url(self.api_url.as_deref())
    }

    /// Client for an established session. Fails before any request when
    /// nobody is signed in.
    pub fn client(&self) -> Result<ApiClient, ObraError> {
        let session = AuthSession::load(config::session_path()?)?;
        if !session.is_signed_in() {
            return Err(ObraError::not_authenticated());
        }
        ApiClient::from_settings(&self.settings, self.api_url.as_deref(), session)
    }

    /// Client that may or may not carry a token; used to sign in.
    pub fn guest_client(&self) -> Result<ApiClient, ObraError> {
        let session = AuthSession::load(config::session_path()?)?;
        ApiClient::from_settings(&self.settings, self.api_url.as_deref(), session)
    }

    /// `--project`, then the active project, else an error.
    pub fn project_id(&self) -> Result<i64, ObraError> {
        self.project
            .or(self.settings.active_project_id)
            .ok_or_else(ObraError::no_active_project)
    }

    /// Print `data` in the JSON envelope, or run the text renderer.
    pub fn emit<F: FnOnce()>(&self, data: Value, text: F) {
        if self.json {
            output::json::print(&output::json::success(data));
        } else {
            text();
        }
    }
}

/// Turn a handler result into an exit code, printing the error.
pub fn report(result: Result<i32, ObraError>, json_output: bool) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            if json_output {
                output::json::print(&output::json::error(&e));
            } else {
                eprintln!("Error: {}", e.message);
            }
            e.exit_code()
        }
    }
}

/// Ask on stderr, read the answer from stdin. `--yes` skips the prompt.
pub fn confirm(yes: bool, prompt: &str) -> bool {
    if yes {
        return true;
    }
    eprint!("{prompt} [y/N] ");
    let _ = io::stderr().flush();
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "si" | "sí"),
    }
}

pub(crate) fn save_bytes(path: &Path, bytes: &[u8]) -> Result<(), ObraError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)
        .map_err(|e| ObraError::io(format!("Cannot write {}: {e}", path.display())))
}

// ─── Screen flows shared by the entity handlers ────────

/// New-record flow: validate, write, refetch.
pub(crate) fn create_record<R: Resource>(resource: R, draft: &R::Draft) -> Result<R::Record, ObraError> {
    draft.validate()?;
    let mut screen = CrudScreen::open(resource)?;
    screen.begin_new();
    screen.submit(draft)
}

/// Edit flow: select `id`, build the draft from the loaded record, submit.
pub(crate) fn edit_record<R, F>(resource: R, id: i64, edit: F) -> Result<R::Record, ObraError>
where
    R: Resource,
    F: FnOnce(&R::Record) -> Result<R::Draft, ObraError>,
{
    let mut screen = CrudScreen::open(resource)?;
    screen.select(id)?;
    let draft = edit(screen.begin_edit()?)?;
    screen.submit(&draft)
}

/// Delete flow with confirmation. `describe` names the record in the prompt.
pub(crate) fn delete_record<R, F>(resource: R, id: i64, yes: bool, describe: F) -> Result<i64, ObraError>
where
    R: Resource,
    F: FnOnce(&R::Record) -> String,
{
    let mut screen = CrudScreen::open(resource)?;
    screen.select(id)?;
    screen.delete_selected(|record| {
        confirm(
            yes,
            &format!("Delete {} {} ({})?", R::LABEL.to_lowercase(), record.id(), describe(record)),
        )
    })
}
