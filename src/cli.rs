// ABOUTME: Command-line surface for SwiftDash
// ABOUTME: Parses arguments into a Command and dispatches it, rendering the ApiResponse as JSON

use serde::Serialize;
use thiserror::Error;

use crate::commands::{self, ServiceForm};
use crate::db::DashboardStore;
use crate::launcher::UrlOpener;
use crate::resolver::ServiceDraft;
use crate::ApiResponse;

pub const USAGE: &str = "\
Usage: swiftdash <command> [args]

Services:
  services                         List services grouped by category
  service <id>                     Show one service
  add [flags]                      Create a service
  update <id> [flags]              Replace a service's fields
  remove <id>                      Delete a service
  url <id>                         Print a service's URL
  open <id>                        Open a service in the browser
  preview [flags]                  Preview the label for unsaved form values

  flags: --name <text> --port <n> --host <host> --https <true|false>
         --symbol <icon> --category <name>

Categories:
  categories                       List categories
  category-choices                 Names offered by the service form
  category-add <name>              Create a category
  category-rename <id> <name>      Rename a category (services follow)
  category-delete <id>             Delete a category (services become uncategorized)
  category-seed                    Add the default categories

Settings:
  settings                         Show default host and scheme
  set-host <host>                  Set the default host
  set-https <true|false>           Set the default scheme
  symbols [query]                  Search the icon catalog
";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UsageError {
    #[error("No command given")]
    NoCommand,
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("Unknown flag: {0}")]
    UnknownFlag(String),
    #[error("Flag {0} needs a value")]
    MissingValue(String),
    #[error("Invalid boolean '{0}' (expected true or false)")]
    InvalidBool(String),
}

#[derive(Debug, Clone)]
pub enum Command {
    Help,
    Services,
    Service(String),
    Add(ServiceForm),
    Update(String, ServiceForm),
    Remove(String),
    Url(String),
    Open(String),
    Preview(ServiceDraft),
    Categories,
    CategoryChoices,
    CategoryAdd(String),
    CategoryRename(String, String),
    CategoryDelete(String),
    CategorySeed,
    Settings,
    SetHost(String),
    SetHttps(bool),
    Symbols(String),
}

/// Parse arguments (without the program name)
pub fn parse(args: &[String]) -> Result<Command, UsageError> {
    let (name, rest) = args.split_first().ok_or(UsageError::NoCommand)?;
    let positional = |i: usize, what: &'static str| -> Result<String, UsageError> {
        rest.get(i).cloned().ok_or(UsageError::MissingArgument(what))
    };

    let command = match name.as_str() {
        "help" | "--help" | "-h" => Command::Help,
        "services" => Command::Services,
        "service" => Command::Service(positional(0, "id")?),
        "add" => Command::Add(parse_form(rest)?),
        "update" => Command::Update(positional(0, "id")?, parse_form(rest.get(1..).unwrap_or(&[]))?),
        "remove" => Command::Remove(positional(0, "id")?),
        "url" => Command::Url(positional(0, "id")?),
        "open" => Command::Open(positional(0, "id")?),
        "preview" => Command::Preview(parse_draft(rest)?),
        "categories" => Command::Categories,
        "category-choices" => Command::CategoryChoices,
        "category-add" => Command::CategoryAdd(positional(0, "name")?),
        "category-rename" => {
            Command::CategoryRename(positional(0, "id")?, positional(1, "name")?)
        }
        "category-delete" => Command::CategoryDelete(positional(0, "id")?),
        "category-seed" => Command::CategorySeed,
        "settings" => Command::Settings,
        // An empty default host is allowed, so the argument may be ""
        "set-host" => Command::SetHost(positional(0, "host")?),
        "set-https" => Command::SetHttps(parse_bool(&positional(0, "true|false")?)?),
        "symbols" => Command::Symbols(rest.join(" ")),
        other => return Err(UsageError::UnknownCommand(other.to_string())),
    };
    Ok(command)
}

fn parse_bool(value: &str) -> Result<bool, UsageError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(UsageError::InvalidBool(value.to_string())),
    }
}

/// `--flag value` pairs
fn flag_pairs(args: &[String]) -> Result<Vec<(&str, &str)>, UsageError> {
    let mut pairs = Vec::new();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        if !flag.starts_with("--") {
            return Err(UsageError::UnknownFlag(flag.clone()));
        }
        let value = iter
            .next()
            .ok_or_else(|| UsageError::MissingValue(flag.clone()))?;
        pairs.push((flag.as_str(), value.as_str()));
    }
    Ok(pairs)
}

fn parse_form(args: &[String]) -> Result<ServiceForm, UsageError> {
    let mut form = ServiceForm::default();
    for (flag, value) in flag_pairs(args)? {
        match flag {
            "--name" => form.name = value.to_string(),
            "--port" => form.port = value.to_string(),
            "--host" => form.host = value.to_string(),
            "--https" => form.use_https = Some(parse_bool(value)?),
            "--symbol" => form.symbol = value.to_string(),
            "--category" => form.category = value.to_string(),
            other => return Err(UsageError::UnknownFlag(other.to_string())),
        }
    }
    Ok(form)
}

fn parse_draft(args: &[String]) -> Result<ServiceDraft, UsageError> {
    let mut draft = ServiceDraft::default();
    for (flag, value) in flag_pairs(args)? {
        match flag {
            "--name" => draft.name = value.to_string(),
            "--port" => draft.port = value.to_string(),
            "--host" => draft.host = value.to_string(),
            "--https" => draft.use_https = parse_bool(value)?,
            other => return Err(UsageError::UnknownFlag(other.to_string())),
        }
    }
    Ok(draft)
}

/// Rendered result of one command
pub struct Output {
    pub success: bool,
    pub json: String,
}

fn render<T: Serialize>(response: ApiResponse<T>) -> Output {
    let json = serde_json::to_string_pretty(&response).unwrap_or_else(|e| {
        format!(
            "{{\"success\": false, \"messages\": {{\"error\": [\"Failed to render response: {}\"]}}}}",
            e
        )
    });
    Output {
        success: response.success,
        json,
    }
}

/// Run a parsed command against the store
pub fn dispatch(store: &DashboardStore, opener: &dyn UrlOpener, command: Command) -> Output {
    match command {
        Command::Help => Output {
            success: true,
            json: USAGE.to_string(),
        },
        Command::Services => render(commands::get_services(store)),
        Command::Service(id) => render(commands::get_service(store, &id)),
        Command::Add(form) => render(commands::create_service(store, form)),
        Command::Update(id, form) => render(commands::update_service(store, &id, form)),
        Command::Remove(id) => render(commands::delete_service(store, &id)),
        Command::Url(id) => render(commands::service_url(store, &id)),
        Command::Open(id) => render(commands::open_service(store, opener, &id)),
        Command::Preview(draft) => render(commands::preview_service(store, draft)),
        Command::Categories => render(commands::get_categories(store)),
        Command::CategoryChoices => render(commands::get_category_choices(store)),
        Command::CategoryAdd(name) => render(commands::add_category(store, &name)),
        Command::CategoryRename(id, name) => {
            render(commands::rename_category(store, &id, &name))
        }
        Command::CategoryDelete(id) => render(commands::delete_category(store, &id)),
        Command::CategorySeed => render(commands::seed_default_categories(store)),
        Command::Settings => render(commands::get_settings(store)),
        Command::SetHost(host) => render(commands::set_host(store, &host)),
        Command::SetHttps(use_https) => render(commands::set_use_https(store, use_https)),
        Command::Symbols(query) => render(commands::search_symbols(&query)),
    }
}
