//! CLI-only commands: config info, tool catalogue, consent, templates, history, status.
//!
//! These produce plain text output and exit 1 on error.

use std::path::PathBuf;

use tokio_util::sync::CancellationToken;

use crate::core::app;
use crate::core::config::Config;
use crate::core::history::{self, HistoryStore};
use crate::core::paths;
use crate::core::service::ServiceClient;
use crate::core::state::{AppState, Consent, FileStateStore, StateStore};
use crate::core::templates::{self, ResolvedTemplate, Template, TemplatesError};
use crate::core::tools::{ChatTool, LANGUAGES, ToolId, WritingTool};

fn exit_with(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

fn open_state() -> (FileStateStore, AppState) {
    let store = FileStateStore::open_default().unwrap_or_else(|e| exit_with(e));
    let state = store.load_or_default();
    (store, state)
}

fn save_state(store: &FileStateStore, state: &AppState) {
    if let Err(e) = store.save(state) {
        exit_with(e);
    }
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

/// Run the `config` command: display paths, service settings, and consent status.
pub fn run_config(config: &Config) {
    let consent = match FileStateStore::open_default() {
        Ok(store) => {
            let state = store.load_or_default();
            if state.consent_recorded() {
                "recorded"
            } else {
                "not recorded"
            }
        }
        Err(_) => "unavailable",
    };
    let max_history = match config.max_history {
        0 => "unlimited".to_string(),
        n => n.to_string(),
    };

    println!("Config:     {}", paths::display(paths::config_dir()));
    println!("Data:       {}", paths::display(paths::data_dir()));
    println!("Templates:  {}", paths::display(paths::templates_path()));
    println!("History:    {}", paths::display(paths::history_dir()));
    println!("Service:    {}", config.base_url);
    println!("Timeout:    {}s", config.timeout.as_secs());
    println!(
        "Save history: {} (max {})",
        on_off(config.save_history),
        max_history
    );
    println!("Consent:    {}", consent);
}

fn print_tools(active: ToolId) {
    for tool in ToolId::ALL {
        let marker = if tool == active { "*" } else { " " };
        println!(
            "{} {:<13} {:<13} {} {}",
            marker,
            tool.as_str(),
            tool.label(),
            app::NAME,
            tool.command()
        );
    }
}

/// Run the `tools` command (also the default with no subcommand).
pub fn run_tools() {
    let active = FileStateStore::open_default()
        .map(|store| store.load_or_default().active_tool)
        .unwrap_or_default();
    print_tools(active);
}

/// Run the `tool` command: show the active tool, or switch to `id`.
pub fn run_tool(id: Option<&str>) {
    let (store, mut state) = open_state();
    let Some(id) = id else {
        let tool = state.active_tool;
        println!("{} ({})", tool.title(), tool.as_str());
        return;
    };
    let tool = state.set_active_tool(id).unwrap_or_else(|e| exit_with(e));
    save_state(&store, &state);
    println!("Active tool: {}", tool.title());
}

fn print_consent(state: &AppState) {
    if !state.consent_recorded() {
        println!("No choice recorded; only essential data use is enabled.");
    }
    let consent = state.consent();
    println!("essential:       on (required)");
    println!("analytics:       {}", on_off(consent.analytics));
    println!("personalization: {}", on_off(consent.personalization));
    println!("training:        {}", on_off(consent.training));
}

/// A consent change requested on the command line.
pub enum ConsentChange {
    AcceptAll,
    RejectAll,
    Set(Consent),
}

/// Run the `consent` command: show choices, or record a change.
pub fn run_consent(change: Option<ConsentChange>) {
    let (store, mut state) = open_state();
    let Some(change) = change else {
        print_consent(&state);
        return;
    };
    match change {
        ConsentChange::AcceptAll => state.accept_all(),
        ConsentChange::RejectAll => state.reject_all(),
        ConsentChange::Set(consent) => state.set_consent(consent),
    }
    save_state(&store, &state);
    log::info!("Consent recorded: {:?}", state.consent());
    print_consent(&state);
}

/// Run `translate --languages`.
pub fn run_languages() {
    for lang in LANGUAGES.iter().filter(|l| l.code != "auto") {
        println!("{:<4} {}", lang.code, lang.name);
    }
}

/// All templates: built-ins plus custom ones. An unreadable `templates.json`
/// is reported on stderr and only built-ins are returned.
pub fn load_templates() -> Vec<ResolvedTemplate> {
    let custom = match paths::templates_path() {
        Some(path) => templates::load_custom(&path).unwrap_or_else(|e| {
            eprintln!("Warning: {}", e.safe_mode_message());
            Vec::new()
        }),
        None => Vec::new(),
    };
    templates::resolve(custom)
}

fn templates_path() -> PathBuf {
    paths::templates_path().unwrap_or_else(|| exit_with(TemplatesError::NoConfigDir))
}

/// Run `templates list`.
pub fn run_templates_list(query: Option<&str>) {
    let all = load_templates();
    let filtered = templates::filter(&all, query.unwrap_or(""));
    if filtered.is_empty() {
        println!("No templates found.");
        return;
    }
    let name_w = filtered
        .iter()
        .map(|t| t.template.name.len())
        .max()
        .unwrap_or(12)
        .max(12);
    for t in &filtered {
        let origin = if t.is_custom { "custom" } else { "built-in" };
        println!(
            "{:<name_w$}  {:<8}  {}",
            t.template.name, origin, t.template.description
        );
    }
}

/// Run `templates show`.
pub fn run_templates_show(name: &str) {
    let all = load_templates();
    let Some(t) = templates::find(&all, name) else {
        exit_with(TemplatesError::NotFound(name.to_string()));
    };
    println!("{}: {}", t.template.name, t.template.description);
    println!();
    println!("{}", t.template.prompt_prefix);
}

/// Run `templates add`.
pub fn run_templates_add(name: &str, description: &str, prompt: &str) {
    let template = Template {
        name: name.trim().to_string(),
        description: description.trim().to_string(),
        prompt_prefix: prompt.trim().to_string(),
    };
    match templates::add_custom(&templates_path(), template) {
        Ok(()) => println!("Template '{}' added.", name.trim()),
        Err(e) => exit_with(e),
    }
}

/// Run `templates remove`.
pub fn run_templates_remove(name: &str) {
    match templates::remove_custom(&templates_path(), name) {
        Ok(()) => println!("Template '{}' removed.", name.trim()),
        Err(e) => exit_with(e),
    }
}

fn history_store() -> HistoryStore {
    HistoryStore::open_default().unwrap_or_else(|e| exit_with(e))
}

/// Run `history list`: entries newest first, with optional tool/query filter and limit.
pub fn run_history_list(tool: Option<ToolId>, query: Option<&str>, limit: Option<usize>) {
    let entries = history_store().list().unwrap_or_else(|e| exit_with(e));
    let filtered = history::filter_entries(&entries, tool, query.unwrap_or(""));
    if filtered.is_empty() {
        println!("No history entries.");
        return;
    }

    let take = limit.unwrap_or(filtered.len());
    for m in filtered.into_iter().take(take) {
        println!(
            "{}\t{}\t{}\t{}",
            short_id(&m.id),
            format_timestamp(m.created_at),
            m.tool,
            m.title
        );
    }
}

/// Run `history show`.
pub fn run_history_show(id: &str) {
    let entry = history_store().get(id).unwrap_or_else(|e| exit_with(e));
    println!("Id:      {}", entry.id);
    println!("Tool:    {}", entry.tool.title());
    if let Some(label) = &entry.label {
        println!("Options: {}", label);
    }
    println!("Date:    {}", format_timestamp(entry.created_at));
    println!();
    println!("{}", entry.input.trim());
    println!();
    println!("---");
    println!();
    println!("{}", entry.output);
}

/// Run `history delete`.
pub fn run_history_delete(id: &str) {
    match history_store().delete(id) {
        Ok(id) => println!("Deleted {}", short_id(&id)),
        Err(e) => exit_with(e),
    }
}

/// Run `history clear`.
pub fn run_history_clear() {
    match history_store().clear() {
        Ok(n) => println!("Deleted {} entr{}", n, if n == 1 { "y" } else { "ies" }),
        Err(e) => exit_with(e),
    }
}

/// Run the `status` command: probe the chat endpoint. Exits 1 when offline.
pub async fn run_status(config: &Config) {
    let client = ServiceClient::new(config).unwrap_or_else(|e| exit_with(e));
    let cancel = CancellationToken::new();
    match client.check_connection(&ChatTool.endpoint(), &cancel).await {
        Ok(()) => println!("Online: {}", client.base_url()),
        Err(e) => {
            println!("Offline: {}", client.base_url());
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// First 8 characters of an id, enough to address it with `history show`.
fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn format_timestamp(secs: u64) -> String {
    use chrono::{TimeZone, Utc};
    let dt = Utc.timestamp_opt(secs as i64, 0).single();
    dt.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| secs.to_string())
}
