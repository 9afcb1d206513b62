//! Application run modes: logger init, input handling, tool runs, interactive chat.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::cli::{Args, InputArgs, OutputArgs};
use crate::core::config::{self, Config};
use crate::core::history::{HistoryStore, NewEntry};
use crate::core::service::{ServiceClient, ServiceError};
use crate::core::state::{AppState, FileStateStore, StateStore};
use crate::core::templates;
use crate::core::tools::{
    self, ChatTool, ToolError, ToolId, ToolOutput, TranslateTool, WritingTool, fallback_message,
    reduction_percentage,
};
use crate::core::util::{char_count, word_count};
use crate::core::{app, cli as commands, normalize};

/// File types accepted by `--file`.
const SUPPORTED_EXTENSIONS: [&str; 3] = ["txt", "md", "doc"];

/// Initialize env_logger on stderr so stdout carries only tool output.
pub fn init_logger(args: &Args) {
    let log_level = args.log_level();
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .target(env_logger::Target::Stderr)
        .try_init();
}

/// Print `Error: <msg>` and exit 1.
pub fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}

/// Load configuration or exit with a readable error.
pub fn load_config() -> Config {
    config::load().unwrap_or_else(|e| fail(e))
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Failed to read stdin: {0}")]
    Stdin(io::Error),
    #[error("Failed to read {path}: {source}")]
    File { path: PathBuf, source: io::Error },
    #[error("Unsupported file type: {0} (use .txt, .md or .doc)")]
    UnsupportedFile(PathBuf),
}

/// Read tool input from the positional text, stdin (`-`), or `--file`.
/// `Ok(None)` when no input was given.
pub fn read_input(input: &InputArgs) -> Result<Option<String>, InputError> {
    if let Some(path) = &input.file {
        return read_file(path).map(Some);
    }
    match input.text.as_deref() {
        Some("-") => io::read_to_string(io::stdin())
            .map(Some)
            .map_err(InputError::Stdin),
        Some(text) => Ok(Some(text.to_string())),
        None => Ok(None),
    }
}

fn read_file(path: &Path) -> Result<String, InputError> {
    let supported = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(e)));
    if !supported {
        return Err(InputError::UnsupportedFile(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|source| InputError::File {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Input text, exiting when none was given or it could not be read.
fn require_input(input: &InputArgs) -> String {
    match read_input(input) {
        Ok(Some(text)) => text,
        Ok(None) => fail("no input text (pass TEXT, '-' for stdin, or --file PATH)"),
        Err(e) => fail(e),
    }
}

/// Cancels its token on Ctrl-C while alive.
struct CtrlC {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl CtrlC {
    fn install() -> Self {
        let token = CancellationToken::new();
        let child = token.clone();
        let task = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::info!("Interrupted; cancelling request");
                child.cancel();
            }
        });
        Self { token, task }
    }
}

impl Drop for CtrlC {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Persisted state for the duration of a command.
struct Session {
    store: Option<FileStateStore>,
    state: AppState,
}

impl Session {
    fn open() -> Self {
        match FileStateStore::open_default() {
            Ok(store) => {
                let state = store.load_or_default();
                Self {
                    store: Some(store),
                    state,
                }
            }
            Err(e) => {
                log::warn!("State not persisted: {}", e);
                Self {
                    store: None,
                    state: AppState::default(),
                }
            }
        }
    }

    fn consent_notice(&self) {
        if !self.state.consent_recorded() {
            eprintln!(
                "Note: only essential data use is enabled. Run `{} consent` to review your choices.",
                app::NAME
            );
        }
    }

    /// Make `tool` the active tool and save the state.
    fn activate(&mut self, tool: ToolId) {
        if let Err(e) = self.state.set_active_tool(tool.as_str()) {
            log::warn!("{}", e);
            return;
        }
        if let Some(store) = &self.store
            && let Err(e) = store.save(&self.state)
        {
            log::warn!("Failed to save state: {}", e);
        }
    }
}

fn service_client(config: &Config) -> ServiceClient {
    ServiceClient::new(config).unwrap_or_else(|e| fail(e))
}

/// Result of a request: the service reply, or the chat fallback text.
#[derive(Debug)]
enum Answer {
    Reply(ToolOutput),
    Fallback(String),
}

impl Answer {
    fn text(&self) -> &str {
        match self {
            Answer::Reply(out) => &out.text,
            Answer::Fallback(text) => text,
        }
    }
}

/// Send one request; Ctrl-C cancels it.
async fn execute(
    client: &ServiceClient,
    tool: &dyn WritingTool,
    text: &str,
) -> Result<Answer, ToolError> {
    let ctrl_c = CtrlC::install();
    execute_with(client, tool, text, &ctrl_c.token).await
}

/// Chat failures (other than cancellation) become the fallback reply.
async fn execute_with(
    client: &ServiceClient,
    tool: &dyn WritingTool,
    text: &str,
    cancel: &CancellationToken,
) -> Result<Answer, ToolError> {
    match tools::run(client, tool, text, cancel).await {
        Ok(out) => Ok(Answer::Reply(out)),
        Err(ToolError::Service(e))
            if tool.id() == ToolId::AiChat && !matches!(e, ServiceError::Cancelled) =>
        {
            log::warn!("Chat request failed: {}", e);
            eprintln!("Warning: {}", tool.failure_message());
            Ok(Answer::Fallback(fallback_message(text, &e)))
        }
        Err(e) => Err(e),
    }
}

fn report_failure(tool: &dyn WritingTool, err: &ToolError, client: &ServiceClient) {
    match err {
        ToolError::EmptyInput(msg) => eprintln!("Error: {}", msg),
        ToolError::Service(ServiceError::Cancelled) => eprintln!("Cancelled."),
        ToolError::Service(e) => {
            eprintln!("{}", tool.failure_message());
            eprintln!("Error: {}", e);
            if e.is_unavailable() {
                eprintln!(
                    "Is the AI service running at {}? Set AVIDIA_BASE_URL to change it.",
                    client.base_url()
                );
            }
        }
    }
}

/// Text to print: raw or normalized, wrapped when a width is set.
fn render(text: &str, raw: &str, args: &OutputArgs) -> String {
    let text = if args.raw { raw } else { text };
    match args.width {
        Some(width) if width > 0 => textwrap::fill(text, width),
        _ => text.to_string(),
    }
}

fn render_answer(answer: &Answer, args: &OutputArgs) -> String {
    match answer {
        Answer::Reply(out) => render(&out.text, &out.raw, args),
        Answer::Fallback(text) => render(text, text, args),
    }
}

fn print_stats(text: &str) {
    eprintln!("{} words, {} characters", word_count(text), char_count(text));
}

fn write_output(path: &Path, contents: &str) {
    match fs::write(path, contents) {
        Ok(()) => eprintln!("Saved to {}", path.display()),
        Err(e) => fail(format!("failed to write {}: {}", path.display(), e)),
    }
}

fn record_history(config: &Config, tool: ToolId, label: Option<String>, input: &str, output: &str) {
    if !config.save_history {
        return;
    }
    let result = HistoryStore::open_default().and_then(|store| {
        store.record(
            NewEntry {
                tool,
                label,
                input,
                output,
            },
            config.max_history,
        )
    });
    if let Err(e) = result {
        log::warn!("Failed to save history: {}", e);
    }
}

/// Options for a single-shot tool run.
pub struct ToolRun<'a> {
    /// Tool recorded in state and history.
    pub id: ToolId,
    pub tool: &'a dyn WritingTool,
    /// Tool options shown in history (e.g. "→ Spanish").
    pub label: Option<String>,
    /// Text to send; when `None`, the input args are read.
    pub text: Option<String>,
}

/// Run one tool request and print the result. Exits 1 on failure.
pub async fn run_tool(config: &Config, run: ToolRun<'_>, input: &InputArgs, output: &OutputArgs) {
    let text = match run.text {
        Some(text) => text,
        None => require_input(input),
    };
    let mut session = Session::open();
    session.consent_notice();
    session.activate(run.id);

    let client = service_client(config);
    let answer = match execute(&client, run.tool, &text).await {
        Ok(answer) => answer,
        Err(e) => {
            report_failure(run.tool, &e, &client);
            std::process::exit(1);
        }
    };

    let rendered = render_answer(&answer, output);
    println!("{}", rendered);

    if let Answer::Reply(out) = &answer {
        if output.stats {
            print_stats(&out.text);
            if let Some(summary) = &out.summary {
                eprintln!(
                    "Summary: {} words from {} (model: {})",
                    summary.summary_word_count.unwrap_or(0),
                    summary.original_word_count.unwrap_or(0),
                    summary.model.as_deref().unwrap_or("unknown")
                );
                eprintln!("Reduction: {}%", reduction_percentage(&text, &out.text));
            }
        }
        record_history(config, run.id, run.label, &text, &out.text);
    }

    if let Some(path) = &output.output {
        let contents = match &answer {
            Answer::Reply(out) => run.tool.saved_text(text.trim(), out).unwrap_or(rendered),
            Answer::Fallback(_) => rendered,
        };
        write_output(path, &contents);
    }
}

/// `translate`: resolve the target language and run.
pub async fn run_translate(config: &Config, to: &str, input: &InputArgs, output: &OutputArgs) {
    let tool = TranslateTool::new(to);
    let label = Some(format!("→ {}", tool.target()));
    let run = ToolRun {
        id: ToolId::Translate,
        tool: &tool,
        label,
        text: None,
    };
    run_tool(config, run, input, output).await;
}

/// `templates run`: compose the template prompt and send it through chat.
pub async fn run_template(config: &Config, name: &str, input: &InputArgs, output: &OutputArgs) {
    let all = commands::load_templates();
    let Some(resolved) = templates::find(&all, name) else {
        fail(templates::TemplatesError::NotFound(name.to_string()));
    };
    let text = match read_input(input) {
        Ok(text) => text.unwrap_or_default(),
        Err(e) => fail(e),
    };
    let prompt = templates::compose_prompt(&resolved.template.prompt_prefix, &text);
    let run = ToolRun {
        id: ToolId::Templates,
        tool: &ChatTool,
        label: Some(resolved.template.name.clone()),
        text: Some(prompt),
    };
    run_tool(config, run, input, output).await;
}

/// `chat`: single prompt when input is given, otherwise the interactive loop.
pub async fn run_chat(config: &Config, input: &InputArgs, output: &OutputArgs) {
    if input.text.is_some() || input.file.is_some() {
        let run = ToolRun {
            id: ToolId::AiChat,
            tool: &ChatTool,
            label: None,
            text: None,
        };
        run_tool(config, run, input, output).await;
        return;
    }
    chat_repl(config, output).await;
}

fn transcript_text(transcript: &[(String, String)]) -> String {
    transcript
        .iter()
        .map(|(you, ai)| format!("You: {}\n\nAI: {}", you, ai))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn save_transcript(path: &str, transcript: &[(String, String)]) {
    if path.is_empty() {
        eprintln!("Usage: /save <path>");
        return;
    }
    match fs::write(path, transcript_text(transcript)) {
        Ok(()) => eprintln!("Saved {} message(s) to {}", transcript.len() * 2, path),
        Err(e) => eprintln!("Error: failed to write {}: {}", path, e),
    }
}

async fn chat_repl(config: &Config, output: &OutputArgs) {
    let mut session = Session::open();
    session.consent_notice();
    session.activate(ToolId::AiChat);
    let client = service_client(config);

    eprintln!(
        "{} ({}). Commands: /clear, /save <path>, /exit",
        ToolId::AiChat.title(),
        client.base_url()
    );

    let mut transcript: Vec<(String, String)> = Vec::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
        let prompt = line.trim();
        match prompt {
            "" => continue,
            "/exit" | "/quit" => break,
            "/clear" => {
                transcript.clear();
                eprintln!("Chat cleared");
                continue;
            }
            _ => {}
        }
        if let Some(path) = prompt.strip_prefix("/save") {
            save_transcript(path.trim(), &transcript);
            continue;
        }

        match execute(&client, &ChatTool, prompt).await {
            Ok(answer) => {
                println!("{}\n", render_answer(&answer, output));
                if let Answer::Reply(out) = &answer {
                    if output.stats {
                        print_stats(&out.text);
                    }
                    record_history(config, ToolId::AiChat, None, prompt, &out.text);
                }
                transcript.push((prompt.to_string(), answer.text().to_string()));
            }
            Err(e) => report_failure(&ChatTool, &e, &client),
        }
    }

    if let Some(path) = &output.output
        && !transcript.is_empty()
    {
        write_output(path, &transcript_text(&transcript));
    }
}

/// `normalize`: clean text locally and print it.
pub fn run_normalize(input: &InputArgs, width: Option<usize>) {
    let text = require_input(input);
    let clean = normalize::normalize(&text);
    match width {
        Some(width) if width > 0 => println!("{}", textwrap::fill(&clean, width)),
        _ => println!("{}", clean),
    }
}
